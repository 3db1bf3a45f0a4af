//! SimpleWorld - Minimal rigid-body world for the canvas
//!
//! This is intentionally simple (no SAT / no constraint solver).
//! Goals:
//! - Give the canvas a working `PhysicsWorld` without an external engine.
//! - Keep bodies stable and deterministic.
//!
//! Current behavior:
//! - Gravity integration with air friction damping and a speed clamp.
//! - AABB collision with restitution and tangent friction.
//! - Circles pick up spin from rolling contact; rectangles never rotate.
//! - Pointer drag pulls the grabbed body towards the pointer.

mod collision;
mod system;

pub use system::{SimpleWorld, DT_MS};
