pub mod body_factory;
pub mod boundary;
pub mod physics;
pub mod pointer_drag;
pub mod render_batch;
pub mod rigid_body;
pub mod rigid_body_system;
pub mod scheduler;
