//! RigidBody - one simulated body owned by `SimpleWorld`
//!
//! Shape is kept as the descriptor's analytic shape (circle or rectangle);
//! collision uses the axis-aligned bounds of that shape.

mod body;

pub use body::RigidBody;
