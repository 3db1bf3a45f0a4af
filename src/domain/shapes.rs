//! Declared physical shape of an element.

use serde::{Deserialize, Serialize};

use crate::core::CanvasError;

pub const ATTR_SHAPE: &str = "data-shape";
pub const ATTR_DENSITY: &str = "data-density";
pub const ATTR_FRICTION: &str = "data-friction";
pub const ATTR_FRICTION_AIR: &str = "data-friction-air";
pub const ATTR_FRICTION_STATIC: &str = "data-friction-static";
pub const ATTR_RESTITUTION: &str = "data-restitution";
pub const ATTR_IS_STATIC: &str = "data-is-static";
pub const ATTR_RADIUS: &str = "data-radius";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
}

/// Material and shape parameters read once at registration.
///
/// Size is not declared here: bodies take their dimensions from the
/// element's on-screen geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeParams {
    pub kind: ShapeKind,
    pub density: f32,
    pub friction: f32,
    pub friction_air: f32,
    pub friction_static: f32,
    pub restitution: f32,
    pub is_static: bool,
    /// Corner rounding for rectangles (ignored for circles)
    #[serde(default)]
    pub radius: f32,
}

impl ShapeParams {
    pub fn circle() -> Self {
        Self {
            kind: ShapeKind::Circle,
            density: 0.001,
            friction: 0.1,
            friction_air: 0.01,
            friction_static: 0.5,
            restitution: 0.0,
            is_static: false,
            radius: 0.0,
        }
    }

    pub fn rectangle() -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            ..Self::circle()
        }
    }

    /// Reject values that would put NaN or nonsense into the simulation.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(CanvasError::InvalidShape { field: "density", value: self.density });
        }
        let non_negative = [
            ("friction", self.friction),
            ("frictionAir", self.friction_air),
            ("frictionStatic", self.friction_static),
            ("restitution", self.restitution),
            ("radius", self.radius),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CanvasError::InvalidShape { field, value });
            }
        }
        Ok(())
    }

    /// Parse `data-*` attributes through `attr` (returns the raw attribute text).
    pub fn from_attributes<F>(attr: F) -> Result<Self, CanvasError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match attr(ATTR_SHAPE).as_deref() {
            Some("rectangle") => ShapeKind::Rectangle,
            _ => ShapeKind::Circle,
        };
        let is_static = attr(ATTR_IS_STATIC).as_deref() == Some("true");
        let radius = match attr(ATTR_RADIUS) {
            Some(raw) => parse_number(ATTR_RADIUS, Some(raw))?,
            None => 0.0,
        };

        let params = Self {
            kind,
            density: parse_number(ATTR_DENSITY, attr(ATTR_DENSITY))?,
            friction: parse_number(ATTR_FRICTION, attr(ATTR_FRICTION))?,
            friction_air: parse_number(ATTR_FRICTION_AIR, attr(ATTR_FRICTION_AIR))?,
            friction_static: parse_number(ATTR_FRICTION_STATIC, attr(ATTR_FRICTION_STATIC))?,
            restitution: parse_number(ATTR_RESTITUTION, attr(ATTR_RESTITUTION))?,
            is_static,
            radius,
        };
        params.validate()?;
        Ok(params)
    }
}

fn parse_number(name: &'static str, raw: Option<String>) -> Result<f32, CanvasError> {
    let parsed = raw
        .as_deref()
        .map(str::trim)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|v| v.is_finite());
    parsed.ok_or(CanvasError::InvalidAttribute { name, value: raw })
}
