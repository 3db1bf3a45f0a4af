pub mod color;
pub mod element;
pub mod shapes;

pub use element::{ElementHandle, ElementTransform, ManagedElement, PresentationState, Surface};
pub use shapes::{ShapeKind, ShapeParams};
