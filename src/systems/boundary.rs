//! Four static walls just outside the container.

use crate::core::{Size, Vec2};
use crate::systems::physics::{BodyDescriptor, BodyId, PhysicsWorld};

/// Wall descriptors for a container of `size`: top, bottom, right, left.
pub fn wall_bodies(size: Size, thickness: f32) -> [BodyDescriptor; 4] {
    let Size { width, height } = size;
    let half = thickness / 2.0;
    [
        BodyDescriptor::static_rect(Vec2::new(width / 2.0, -half), width, thickness),
        BodyDescriptor::static_rect(Vec2::new(width / 2.0, height + half), width, thickness),
        BodyDescriptor::static_rect(Vec2::new(width + half, height / 2.0), thickness, height),
        BodyDescriptor::static_rect(Vec2::new(-half, height / 2.0), thickness, height),
    ]
}

/// Owns the current wall set and replaces it as a unit.
#[derive(Debug)]
pub struct Boundary {
    walls: Vec<BodyId>,
    thickness: f32,
}

impl Boundary {
    pub fn new(thickness: f32) -> Self {
        Self { walls: Vec::new(), thickness }
    }

    pub fn walls(&self) -> &[BodyId] {
        &self.walls
    }

    /// Remove the previous walls (if any) and insert walls for `size`.
    pub fn rebuild<W: PhysicsWorld>(&mut self, world: &mut W, size: Size) {
        self.remove_from(world);
        self.walls = world.insert_bodies(&wall_bodies(size, self.thickness));
    }

    pub fn remove_from<W: PhysicsWorld>(&mut self, world: &mut W) {
        if !self.walls.is_empty() {
            world.remove_bodies(&self.walls);
            self.walls.clear();
        }
    }

    /// Forget the walls without touching a world (the world is being dropped).
    pub fn reset(&mut self) {
        self.walls.clear();
    }
}
