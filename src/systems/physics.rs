//! Physics world adapter.
//!
//! The canvas never holds body objects. It hands descriptors to the world,
//! keeps the returned [`BodyId`], and reads body state back by id each step.
//! Worlds are free to copy or replace their internal body records.

use serde::{Deserialize, Serialize};

use crate::core::{Rect, Vec2};

/// Stable lookup key for a body inside one world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Stable lookup key for a constraint inside one world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub u32);

/// Gravity vector and scale (world units per ms²).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gravity {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for Gravity {
    fn default() -> Self {
        Self { x: 0.0, y: 1.0, scale: 0.001 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyShape {
    Circle { radius: f32 },
    Rectangle { width: f32, height: f32, chamfer: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyMaterial {
    pub density: f32,
    pub friction: f32,
    pub friction_air: f32,
    pub friction_static: f32,
    pub restitution: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            density: 0.001,
            friction: 0.1,
            friction_air: 0.01,
            friction_static: 0.5,
            restitution: 0.0,
        }
    }
}

/// Everything a world needs to create one body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDescriptor {
    /// Center of mass in container coordinates
    pub position: Vec2,
    pub shape: BodyShape,
    pub material: BodyMaterial,
    pub is_static: bool,
}

impl BodyDescriptor {
    pub fn static_rect(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            shape: BodyShape::Rectangle { width, height, chamfer: 0.0 },
            material: BodyMaterial::default(),
            is_static: true,
        }
    }
}

/// Read-only snapshot of a body after the last step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub is_static: bool,
}

/// Pointer-bound spring constraint confined to a container region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerConstraint {
    /// Container rect in client coordinates
    pub region: Rect,
    pub stiffness: f32,
}

/// Pointer input already translated into container coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Move(Vec2),
    Up,
}

pub trait PhysicsWorld {
    /// Create an empty world.
    fn with_gravity(gravity: Gravity) -> Self
    where
        Self: Sized;

    /// Drop every body and constraint.
    fn clear(&mut self);

    fn insert_body(&mut self, descriptor: BodyDescriptor) -> BodyId;

    fn insert_bodies(&mut self, descriptors: &[BodyDescriptor]) -> Vec<BodyId> {
        descriptors.iter().map(|d| self.insert_body(*d)).collect()
    }

    /// Returns `false` if the id is unknown.
    fn remove_body(&mut self, id: BodyId) -> bool;

    fn remove_bodies(&mut self, ids: &[BodyId]) {
        for id in ids {
            self.remove_body(*id);
        }
    }

    fn body(&self, id: BodyId) -> Option<BodyState>;

    fn body_count(&self) -> usize;

    /// Advance one tick.
    fn step(&mut self);

    fn insert_pointer_constraint(&mut self, constraint: PointerConstraint) -> ConstraintId;

    fn remove_constraint(&mut self, id: ConstraintId) -> bool;

    fn pointer_input(&mut self, id: ConstraintId, input: PointerInput);
}
