//! Public API exposed to JavaScript.

pub mod console;
pub mod wasm;

pub use wasm::{RafScheduler, RegisteredElement, WasmCanvas};
