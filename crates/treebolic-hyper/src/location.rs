use crate::Complex;
use crate::distance::h2e;
use serde::{Deserialize, Serialize};

/// Circle in hyperbolic space. `center0` is the laid-out position, `center`
/// its image under the current transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperCircle {
    pub center0: Complex,
    pub center: Complex,
    pub radius: f64,
    /// Euclidean distance of `center` to the origin.
    pub dist: f64,
    pub is_dirty: bool,
    /// Too close to the disk rim to be drawn.
    pub is_border: bool,
}

impl HyperCircle {
    pub const BORDER: f64 = 0.95;

    pub fn set(&mut self, center: Complex, radius: f64) {
        self.center0 = center;
        self.center = center;
        self.dist = center.abs();
        self.is_border = self.dist > Self::BORDER;
        self.radius = radius;
        self.is_dirty = true;
    }

    pub fn reset(&mut self) {
        self.center = self.center0;
        self.dist = self.center.abs();
        self.is_border = self.dist > Self::BORDER;
        self.is_dirty = true;
    }

    /// Move `center` to `center` (clamped to the unit circle) and refresh the flags.
    pub fn place(&mut self, center: Complex) {
        self.center = center;
        self.dist = center.abs();
        if self.dist > 1.0 {
            self.center = center.normalize();
            self.dist = self.center.abs();
        }
        self.is_border = self.dist > Self::BORDER;
        self.is_dirty = true;
    }
}

/// Circle in the disk's Euclidean embedding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EuclideanCircle {
    pub center: Complex,
    pub radius: f64,
}

/// Where a node is: its hyperbolic circle and the cached Euclidean image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub hyper: HyperCircle,
    pub euclidean: EuclideanCircle,
    /// Half of the angular wedge allotted to the node by layout.
    pub half_wedge: f64,
    /// Direction the node's subtree grows towards.
    pub orientation: f64,
}

impl Location {
    pub fn set(&mut self, center: Complex, radius: f64) {
        self.hyper.set(center, radius);
    }
}

/// Recompute `location.euclidean` from `location.hyper`.
///
/// A hyperbolic circle maps to a Euclidean circle whose center is not the
/// image of the hyperbolic center: both radial extremes are pushed through
/// the translation and the midpoint taken.
pub fn map_to_euclidean(location: &mut Location) {
    let hyper = &location.hyper;
    let er = h2e(hyper.radius);
    if hyper.dist != 0.0 {
        let z1 = hyper.center.scale(er / hyper.dist);
        let z2 = -z1;
        let p = hyper.center;
        let z1 = crate::HyperTranslation::map_by(z1, p);
        let z2 = crate::HyperTranslation::map_by(z2, p);
        let mid = (z1 + z2).scale(0.5);
        location.euclidean.center = mid;
        location.euclidean.radius = (z2 - mid).abs();
    } else {
        location.euclidean.center = hyper.center;
        location.euclidean.radius = er;
    }
    location.hyper.is_dirty = false;
}
