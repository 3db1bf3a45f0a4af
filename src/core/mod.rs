//! Building blocks with no knowledge of elements or physics.

pub mod clock;
pub mod debounce;
pub mod deferred;
pub mod error;
pub mod geometry;

pub use debounce::Debounce;
pub use deferred::{Deferred, Resolver};
pub use error::CanvasError;
pub use geometry::{Rect, Size, Vec2};
