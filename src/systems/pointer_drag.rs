//! Optional drag constraint bound to pointer input over the container.

use crate::core::{Rect, Vec2};
use crate::systems::physics::{ConstraintId, PhysicsWorld, PointerConstraint, PointerInput};

/// Pointer event in client (viewport) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
}

#[derive(Debug)]
pub struct PointerDrag {
    stiffness: f32,
    constraint: Option<ConstraintId>,
    region: Rect,
}

impl PointerDrag {
    pub fn new(stiffness: f32) -> Self {
        Self {
            stiffness,
            constraint: None,
            region: Rect::default(),
        }
    }

    pub fn constraint(&self) -> Option<ConstraintId> {
        self.constraint
    }

    /// Replace the constraint with one bound to `region`.
    pub fn rebuild<W: PhysicsWorld>(&mut self, world: &mut W, region: Rect) {
        self.remove_from(world);
        self.region = region;
        self.constraint = Some(world.insert_pointer_constraint(PointerConstraint {
            region,
            stiffness: self.stiffness,
        }));
    }

    pub fn remove_from<W: PhysicsWorld>(&mut self, world: &mut W) {
        if let Some(id) = self.constraint.take() {
            world.remove_constraint(id);
        }
    }

    pub fn reset(&mut self) {
        self.constraint = None;
    }

    /// Translate a client-space event into container space and forward it.
    /// Ignored when no constraint exists.
    pub fn forward<W: PhysicsWorld>(&self, world: &mut W, event: PointerEvent) {
        let Some(id) = self.constraint else {
            return;
        };
        let origin = self.region.origin();
        let input = match event {
            PointerEvent::Down { x, y } => PointerInput::Down(Vec2::new(x, y) - origin),
            PointerEvent::Move { x, y } => PointerInput::Move(Vec2::new(x, y) - origin),
            PointerEvent::Up => PointerInput::Up,
        };
        world.pointer_input(id, input);
    }
}
