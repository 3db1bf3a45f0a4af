use thiserror::Error;

/// Errors surfaced synchronously by the canvas controller.
///
/// Missing elements are never errors: lookups and removals report them as
/// `None`, and deferred registrations always resolve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    #[error("start() called without a bound container")]
    NoContainer,

    #[error("invalid shape parameter `{field}`: {value}")]
    InvalidShape { field: &'static str, value: f32 },

    #[error("invalid attribute `{name}`: {value:?}")]
    InvalidAttribute { name: &'static str, value: Option<String> },

    #[error("frame scheduler failed: {0}")]
    Scheduler(String),

    #[error("invalid canvas config: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CanvasError {
    fn from(e: serde_json::Error) -> Self {
        CanvasError::Config(e.to_string())
    }
}
