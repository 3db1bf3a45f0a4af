use serde::{Deserialize, Serialize};

use crate::core::CanvasError;
use crate::systems::physics::Gravity;

/// Canvas options, usually supplied once by the host page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Attach a pointer drag constraint
    pub interactive: bool,
    /// Surround the container with static walls
    pub bounded: bool,
    pub gravity: Gravity,
    /// Quiescent interval before a resize rebuild
    pub resize_debounce_ms: f64,
    pub wall_thickness: f32,
    pub drag_stiffness: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            interactive: false,
            bounded: true,
            gravity: Gravity::default(),
            resize_debounce_ms: 50.0,
            wall_thickness: 50.0,
            drag_stiffness: 0.2,
        }
    }
}

impl CanvasConfig {
    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CanvasError> {
        let g = self.gravity;
        if !(g.x.is_finite() && g.y.is_finite() && g.scale.is_finite()) {
            return Err(CanvasError::Config("gravity must be finite".into()));
        }
        if !(self.wall_thickness.is_finite() && self.wall_thickness > 0.0) {
            return Err(CanvasError::Config("wallThickness must be > 0".into()));
        }
        if !(self.drag_stiffness > 0.0 && self.drag_stiffness <= 1.0) {
            return Err(CanvasError::Config("dragStiffness must be in (0, 1]".into()));
        }
        if !(self.resize_debounce_ms.is_finite() && self.resize_debounce_ms >= 0.0) {
            return Err(CanvasError::Config("resizeDebounceMs must be >= 0".into()));
        }
        Ok(())
    }
}
