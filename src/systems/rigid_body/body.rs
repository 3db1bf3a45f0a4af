use std::f32::consts::PI;

use crate::core::{Rect, Vec2};
use crate::systems::physics::{BodyDescriptor, BodyId, BodyMaterial, BodyShape, BodyState};

/// Rigid Body - moves as a single unit
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Unique ID for this body
    pub id: BodyId,

    // === Physics State ===
    /// World position (center of mass)
    pub pos: Vec2,
    /// Velocity vector (pixels per frame)
    pub velocity: Vec2,
    /// Rotation angle (radians)
    pub angle: f32,
    /// Angular velocity (radians per frame)
    pub angular_vel: f32,
    /// density * area, 0 for static bodies
    pub mass: f32,
    pub inverse_mass: f32,
    /// Static bodies are never integrated or pushed
    pub is_static: bool,

    // === Shape Definition ===
    pub shape: BodyShape,

    // === Bounding Box (AABB) ===
    pub half_width: f32,
    pub half_height: f32,

    // === Material properties ===
    pub material: BodyMaterial,
}

impl RigidBody {
    pub fn from_descriptor(id: BodyId, desc: &BodyDescriptor) -> Self {
        let (half_width, half_height, area) = match desc.shape {
            BodyShape::Circle { radius } => (radius, radius, PI * radius * radius),
            BodyShape::Rectangle { width, height, .. } => (width / 2.0, height / 2.0, width * height),
        };

        let (mass, inverse_mass) = if desc.is_static {
            (0.0, 0.0)
        } else {
            // Ensure minimum mass to avoid division issues
            let mass = (desc.material.density * area).max(1e-4);
            (mass, 1.0 / mass)
        };

        Self {
            id,
            pos: desc.position,
            velocity: Vec2::zero(),
            angle: 0.0,
            angular_vel: 0.0,
            mass,
            inverse_mass,
            is_static: desc.is_static,
            shape: desc.shape,
            half_width,
            half_height,
            material: desc.material,
        }
    }

    /// Axis-aligned bounds around the unrotated shape
    pub fn aabb(&self) -> Rect {
        Rect::new(
            self.pos.x - self.half_width,
            self.pos.y - self.half_height,
            self.half_width * 2.0,
            self.half_height * 2.0,
        )
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        match self.shape {
            BodyShape::Circle { radius } => (p - self.pos).length_squared() <= radius * radius,
            BodyShape::Rectangle { .. } => self.aabb().contains(p),
        }
    }

    pub fn state(&self) -> BodyState {
        BodyState {
            position: self.pos,
            angle: self.angle,
            velocity: self.velocity,
            is_static: self.is_static,
        }
    }

    /// Apply impulse at center of mass
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity = self.velocity + impulse * self.inverse_mass;
    }
}
