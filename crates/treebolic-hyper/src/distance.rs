//! Distances in the disk and conversions between hyperbolic and Euclidean
//! distance to the origin.

use crate::Complex;

pub fn euclidean_distance(z1: Complex, z2: Complex) -> f64 {
    (z1 - z2).abs()
}

pub fn euclidean_distance_sq(z1: Complex, z2: Complex) -> f64 {
    (z1 - z2).abs2()
}

/// Hyperbolic distance between two points of the disk.
pub fn hyperbolic_distance(z1: Complex, z2: Complex) -> f64 {
    let num = z1 - z2;
    let denom = Complex::ONE - z1 * z2.conj();
    2.0 * (num / denom).abs().atanh()
}

/// Euclidean distance to origin to hyperbolic distance to origin.
pub fn e2h(r: f64) -> f64 {
    2.0 * r.atanh()
}

/// Hyperbolic distance to origin to Euclidean distance to origin.
pub fn h2e(r: f64) -> f64 {
    (r / 2.0).tanh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance_to_origin_matches_conversion() {
        let z = Complex::new(0.4, 0.3);
        let d = hyperbolic_distance(z, Complex::ZERO);
        assert!((d - e2h(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_distance() {
        let z = Complex::new(-0.2, 0.6);
        assert_eq!(hyperbolic_distance(z, z), 0.0);
    }

    proptest! {
        #[test]
        fn prop_conversions_are_inverse(r in 0.0f64..0.99) {
            prop_assert!((h2e(e2h(r)) - r).abs() < 1e-9);
        }

        #[test]
        fn prop_hyperbolic_distance_is_symmetric(
            a in 0.0f64..std::f64::consts::TAU, ra in 0.0f64..0.95,
            b in 0.0f64..std::f64::consts::TAU, rb in 0.0f64..0.95,
        ) {
            let z1 = Complex::from_arg_abs(a, ra);
            let z2 = Complex::from_arg_abs(b, rb);
            prop_assert!((hyperbolic_distance(z1, z2) - hyperbolic_distance(z2, z1)).abs() < 1e-9);
        }
    }
}
