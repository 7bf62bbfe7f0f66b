//! Disk automorphisms.
//!
//! A [`HyperTransform`] is `z -> (rot * z + xlat) / (1 + conj(xlat) * rot * z)`:
//! a rotation followed by a hyperbolic translation.

use crate::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hyperbolic translation by `p`: `z -> (z + p) / (1 + conj(p) * z)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperTranslation(pub Complex);

impl HyperTranslation {
    pub fn new(p: Complex) -> Self {
        Self(p)
    }

    /// The translation that carries `from` onto `to`.
    pub fn between(from: Complex, to: Complex) -> Self {
        let w = to * from;
        let q = to - from;
        let d = 1.0 - w.abs2();
        Self((q + w * q.conj()).scale(1.0 / d))
    }

    /// Plain vector difference `to - from`, used when orientation is not preserved.
    pub fn euclidean(from: Complex, to: Complex) -> Self {
        Self(to - from)
    }

    pub fn map_by(z: Complex, p: Complex) -> Complex {
        (z + p) / (p.conj() * z + Complex::ONE)
    }

    pub fn mapinv_by(z: Complex, p: Complex) -> Complex {
        (z - p) / (Complex::ONE - p.conj() * z)
    }

    /// Translate by `p1` then by `p2`.
    pub fn map2(z: Complex, p1: Complex, p2: Complex) -> Complex {
        Self::map_by(Self::map_by(z, p1), p2)
    }

    pub fn map(&self, z: Complex) -> Complex {
        Self::map_by(z, self.0)
    }

    pub fn mapinv(&self, z: Complex) -> Complex {
        Self::mapinv_by(z, self.0)
    }

    pub fn inverse(self) -> Self {
        Self(-self.0)
    }

    /// Composition of two translations, `t1` first. The result generally carries a rotation.
    pub fn compose(t1: HyperTranslation, t2: HyperTranslation) -> HyperTransform {
        let (p1, p2) = (t1.0, t2.0);
        let denom = p2.conj() * p1 + Complex::ONE;
        HyperTransform {
            xlat: (p1 + p2) / denom,
            rot: ((p1.conj() * p2 + Complex::ONE) / denom).normalize(),
        }
    }
}

/// Rotation by a unit complex number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperRotation(pub Complex);

impl Default for HyperRotation {
    fn default() -> Self {
        Self(Complex::ONE)
    }
}

impl HyperRotation {
    pub fn map(&self, z: Complex) -> Complex {
        z * self.0
    }

    pub fn inverse(self) -> Self {
        Self(self.0.conj())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperTransform {
    pub xlat: Complex,
    pub rot: Complex,
}

impl Default for HyperTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl HyperTransform {
    pub const IDENTITY: HyperTransform = HyperTransform {
        xlat: Complex::ZERO,
        rot: Complex::ONE,
    };

    pub fn new(xlat: HyperTranslation, rot: HyperRotation) -> Self {
        Self {
            xlat: xlat.0,
            rot: rot.0,
        }
    }

    pub fn from_translation(xlat: HyperTranslation) -> Self {
        Self {
            xlat: xlat.0,
            rot: Complex::ONE,
        }
    }

    pub fn from_rotation(rot: HyperRotation) -> Self {
        Self {
            xlat: Complex::ZERO,
            rot: rot.0,
        }
    }

    /// Transform that carries `from` onto `to` while keeping the direction
    /// `orientation` pointing the same way at the destination.
    pub fn orientation_preserving(from: Complex, to: Complex, orientation: Complex) -> Self {
        let start = Self::from_translation(HyperTranslation(from).inverse());
        let head = -orientation;
        let t2 = HyperTranslation(to);
        let theta1 = HyperTranslation::map_by(head, start.xlat);
        let theta2 = t2.mapinv(head) / theta1;
        start.compose(&Self {
            xlat: t2.0,
            rot: theta2,
        })
    }

    /// Transform that carries `from` onto `to` keeping the tree root's radial
    /// direction, `root` being the current image of the root.
    pub fn radial_orientation_preserving(from: Complex, to: Complex, root: Complex) -> Self {
        let back = HyperTranslation(root).inverse();
        let from1 = back.map(from);
        HyperTranslation::compose(back, HyperTranslation::between(from1, to))
    }

    pub fn map(&self, z: Complex) -> Complex {
        let num = z * self.rot + self.xlat;
        let denom = self.xlat.conj() * z * self.rot + Complex::ONE;
        num / denom
    }

    /// Apply `self` then `other`.
    pub fn compose(&self, other: &HyperTransform) -> HyperTransform {
        let (p1, r1) = (self.xlat, self.rot);
        let (p2, r2) = (other.xlat, other.rot);
        let denom = p2.conj() * p1 * r2 + Complex::ONE;
        HyperTransform {
            xlat: (p1 * r2 + p2) / denom,
            rot: (((p1.conj() * p2) + r2) * r1 / denom).normalize(),
        }
    }

    pub fn inverse(&self) -> HyperTransform {
        let rot = self.rot.conj();
        HyperTransform {
            xlat: -(self.xlat * rot),
            rot,
        }
    }
}

impl fmt::Display for HyperTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p={} theta={}", self.xlat, self.rot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Complex, b: Complex) -> bool {
        (a - b).abs() < 1e-9
    }

    fn disk_point() -> impl Strategy<Value = Complex> {
        (0.0f64..std::f64::consts::TAU, 0.0f64..0.9).prop_map(|(a, r)| Complex::from_arg_abs(a, r))
    }

    #[test]
    fn test_identity_maps_to_itself() {
        let z = Complex::new(0.25, -0.5);
        assert!(close(HyperTransform::IDENTITY.map(z), z));
    }

    #[test]
    fn test_translation_between_points() {
        let from = Complex::new(0.3, 0.1);
        let to = Complex::new(-0.2, 0.4);
        assert!(close(HyperTranslation::between(from, to).map(from), to));
    }

    #[test]
    fn test_compose_applies_self_first() {
        let t1 = HyperTransform::from_translation(HyperTranslation(Complex::new(0.2, 0.0)));
        let t2 = HyperTransform::from_rotation(HyperRotation(Complex::NORTH));
        let z = Complex::new(0.1, 0.1);
        assert!(close(t1.compose(&t2).map(z), t2.map(t1.map(z))));
    }

    proptest! {
        #[test]
        fn prop_inverse_undoes_transform(p in disk_point(), a in 0.0f64..std::f64::consts::TAU, z in disk_point()) {
            let t = HyperTransform { xlat: p, rot: Complex::from_arg(a) };
            prop_assert!(close(t.inverse().map(t.map(z)), z));
        }

        #[test]
        fn prop_orientation_preserving_reaches_destination(from in disk_point(), to in disk_point()) {
            let t = HyperTransform::orientation_preserving(from, to, Complex::SOUTH);
            prop_assert!(close(t.map(from), to));
        }

        #[test]
        fn prop_radial_reaches_destination(from in disk_point(), root in disk_point()) {
            let t = HyperTransform::radial_orientation_preserving(from, Complex::ZERO, root);
            prop_assert!(close(t.map(from), Complex::ZERO));
        }

        #[test]
        fn prop_translation_composition(p1 in disk_point(), p2 in disk_point(), z in disk_point()) {
            let t = HyperTranslation::compose(HyperTranslation(p1), HyperTranslation(p2));
            prop_assert!(close(t.map(z), HyperTranslation::map2(z, p1, p2)));
        }
    }
}
