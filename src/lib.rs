//! Physics Canvas - keeps DOM elements in sync with a 2-D physics world
//!
//! Architecture:
//! - core/          - Geometry, errors, deferred results, debounce, clock
//! - domain/        - Elements, shape parameters, presentation state
//! - systems/       - Physics adapter, body factory, walls, drag, batching
//! - simulation/    - Canvas lifecycle controller
//! - api/           - Browser binding

pub mod core;
pub mod domain;
pub mod systems;
pub mod simulation;
pub mod api;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the module
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    api::console::init_logging(tracing::level_filters::LevelFilter::INFO);

    web_sys::console::log_1(&"Physics canvas initialized".into());
}

/// Get crate version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Random `hsl(...)` color for demo elements.
#[wasm_bindgen]
pub fn random_color(seed: u32) -> String {
    let mut state = seed.max(1);
    domain::color::random_hsl(&mut state)
}

// Re-export main types
pub use api::wasm::WasmCanvas;
pub use crate::core::{CanvasError, Deferred};
pub use domain::{ElementHandle, ManagedElement, PresentationState, ShapeParams, Surface};
pub use simulation::{Canvas, CanvasConfig, LifecycleState, Registration};
pub use systems::physics::{PhysicsWorld, PointerInput};
pub use systems::pointer_drag::PointerEvent;
pub use systems::rigid_body_system::SimpleWorld;
pub use systems::scheduler::{FrameRequest, FrameScheduler};
