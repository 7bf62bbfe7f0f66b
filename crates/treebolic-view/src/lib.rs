//! Rendering and interaction for a hyperbolic tree.
//!
//! [`Mapper`] converts between disk and view coordinates, [`Painter`] draws
//! nodes and edges through the [`Graphics`] trait, and [`AnimationTransforms`]
//! plus [`Animation`] move the tree smoothly between two focus points.
//! [`View`] ties these to a [`Model`](treebolic_core::Model) and
//! [`Controller`] maps pointer gestures and search commands onto it.
//!
//! A host drives one frame like this:
//!
//! ```ignore
//! controller.tick(&mut view, Instant::now());
//! controller.drag(&mut view);
//! if view.needs_repaint() {
//!     view.paint(&mut graphics);
//! }
//! ```

pub mod animation;
pub mod arc_math;
pub mod config;
pub mod controller;
pub mod crop;
pub mod error;
pub mod geom;
pub mod graphics;
pub mod mapper;
pub mod painter;
pub mod view;

pub use animation::{Animation, AnimationTarget, AnimationTransforms, Animator};
pub use config::PainterConfig;
pub use controller::{Controller, DragMode, MAX_SHIFT_SPAN, SearchCommand};
pub use error::{Result, ViewError};
pub use geom::{Arc2D, Point, Rect};
pub use graphics::Graphics;
pub use mapper::Mapper;
pub use painter::{NodeLayout, Painter};
pub use view::View;
