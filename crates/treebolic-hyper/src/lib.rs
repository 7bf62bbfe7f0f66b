//! Poincaré disk geometry.
//!
//! Points of the unit disk are [`Complex`] numbers. Disk automorphisms are
//! [`HyperTransform`]s built from a translation and a rotation. Geodesics
//! between two points are [`Arc`]s, and node positions are tracked as
//! [`Location`]s holding both their hyperbolic and Euclidean circles.

pub mod arc;
pub mod complex;
pub mod distance;
pub mod location;
pub mod transform;

pub use arc::Arc;
pub use complex::Complex;
pub use location::{EuclideanCircle, HyperCircle, Location, map_to_euclidean};
pub use transform::{HyperRotation, HyperTransform, HyperTranslation};
