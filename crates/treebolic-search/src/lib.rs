//! Incremental tree search.
//!
//! [`Generator`] turns a recursive producer into a pull-driven sequence backed
//! by a worker thread and a one-item handshake. [`Traverser`] walks a subtree
//! in pre-order and yields the nodes a [`Matcher`] accepts, either directly as
//! an iterator or through a generator that can be kept between searches.

pub mod cancellation;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod traverser;

pub use cancellation::CancellationToken;
pub use error::GeneratorError;
pub use generator::{Generator, Interrupted, Yielder};
pub use matcher::{AllMatcher, CaseMatcher, MatchMode, MatchScope, Matcher, NoCaseMatcher};
pub use traverser::{Traverser, spawn_traverser};
