use crate::Complex;
use crate::distance::euclidean_distance;
use std::f64::consts::{PI, TAU};

const EPSILON: f64 = 1e-4;
const MAX_RADIUS: f64 = 30.0;

/// Geodesic between two disk points.
///
/// A geodesic is a circle arc orthogonal to the unit circle, or a straight
/// segment when it passes through the origin. `r == 0` marks the segment case;
/// very flat arcs (radius above 30) are also treated as segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub from: Complex,
    pub to: Complex,
    /// Circle center.
    pub x: f64,
    pub y: f64,
    pub r: f64,
    /// Start angle in `[0, 2π)`.
    pub start: f64,
    /// Signed sweep in `[-π, π]`.
    pub angle: f64,
}

impl Arc {
    pub fn new(z1: Complex, z2: Complex) -> Self {
        let line = Self {
            from: z1,
            to: z2,
            x: 0.0,
            y: 0.0,
            r: 0.0,
            start: 0.0,
            angle: 0.0,
        };
        if intersects_origin(z1, z2) {
            return line;
        }

        let s1 = 1.0 + z1.abs2();
        let s2 = 1.0 + z2.abs2();
        let norm = 1.0 / (2.0 * (z1.re * z2.im - z2.re * z1.im));
        let center = Complex::new(
            (s1 * z2.im - s2 * z1.im) * norm,
            -(s1 * z2.re - s2 * z1.re) * norm,
        );
        let radius = euclidean_distance(center, z2);
        if radius > MAX_RADIUS {
            return line;
        }

        let mut start = (z1 - center).arg();
        let mut end = (z2 - center).arg();
        if start < 0.0 {
            start += TAU;
        }
        if end < 0.0 {
            end += TAU;
        }
        let mut extent = end - start;
        if extent > PI {
            extent -= TAU;
        } else if extent < -PI {
            extent += TAU;
        }

        Self {
            x: center.re,
            y: center.im,
            r: radius,
            start,
            angle: extent,
            ..line
        }
    }

    pub fn is_line(&self) -> bool {
        self.r == 0.0
    }

    pub fn center(&self) -> Complex {
        Complex::new(self.x, self.y)
    }

    pub fn counterclockwise(&self) -> bool {
        self.angle < 0.0
    }
}

fn intersects_origin(from: Complex, to: Complex) -> bool {
    let from_abs = from.abs2();
    let to_abs = to.abs2();
    if from_abs < EPSILON || to_abs < EPSILON {
        return true;
    }
    let delta = from.arg() - to.arg();
    delta.abs() < EPSILON || (delta - PI).abs() < EPSILON || (delta + PI).abs() < EPSILON
}
