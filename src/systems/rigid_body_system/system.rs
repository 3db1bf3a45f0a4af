use tracing::debug;

use crate::core::Vec2;
use crate::systems::physics::{
    BodyDescriptor, BodyId, BodyState, ConstraintId, Gravity, PhysicsWorld, PointerConstraint,
    PointerInput,
};
use crate::systems::rigid_body::RigidBody;

use super::collision::{penetration, resolve};

/// Fixed tick length (ms), one display refresh at 60 Hz
pub const DT_MS: f32 = 1000.0 / 60.0;

/// Per-axis speed clamp (pixels per tick) to avoid tunneling through walls
const MAX_SPEED: f32 = 40.0;

struct DragConstraint {
    id: ConstraintId,
    settings: PointerConstraint,
    pointer: Option<Vec2>,
    grabbed: Option<BodyId>,
}

/// Minimal rigid-body world
pub struct SimpleWorld {
    gravity: Gravity,
    bodies: Vec<RigidBody>,
    constraints: Vec<DragConstraint>,
    next_body_id: u32,
    next_constraint_id: u32,
    steps: u64,
}

impl SimpleWorld {
    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Body currently held by a drag constraint.
    pub fn grabbed(&self, id: ConstraintId) -> Option<BodyId> {
        self.constraints.iter().find(|c| c.id == id).and_then(|c| c.grabbed)
    }

    /// Set a body's velocity directly (test and scripting hook).
    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) -> bool {
        match self.bodies.iter_mut().find(|b| b.id == id) {
            Some(body) if !body.is_static => {
                body.velocity = velocity;
                true
            }
            _ => false,
        }
    }

    fn apply_drag(&mut self) {
        for c in self.constraints.iter() {
            let (Some(target), Some(id)) = (c.pointer, c.grabbed) else {
                continue;
            };
            if let Some(body) = self.bodies.iter_mut().find(|b| b.id == id) {
                let delta = (target - body.pos) * c.settings.stiffness;
                body.pos = body.pos + delta;
                body.velocity = delta;
            }
        }
    }

    fn integrate(&mut self) {
        let g = self.gravity;
        let accel = Vec2::new(g.x, g.y) * (g.scale * DT_MS * DT_MS);

        for body in self.bodies.iter_mut() {
            if body.is_static {
                continue;
            }

            let damping = 1.0 - body.material.friction_air.clamp(0.0, 1.0);
            body.velocity = (body.velocity + accel) * damping;

            // Clamp to keep cost bounded and avoid tunneling.
            body.velocity.x = body.velocity.x.clamp(-MAX_SPEED, MAX_SPEED);
            body.velocity.y = body.velocity.y.clamp(-MAX_SPEED, MAX_SPEED);

            body.angular_vel *= damping;
            body.pos = body.pos + body.velocity;
            body.angle += body.angular_vel;
        }
    }

    fn collide(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.bodies.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];
                if a.is_static && b.is_static {
                    continue;
                }
                if let Some((normal, depth)) = penetration(a, b) {
                    resolve(a, b, normal, depth);
                }
            }
        }
    }
}

impl PhysicsWorld for SimpleWorld {
    fn with_gravity(gravity: Gravity) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            constraints: Vec::new(),
            next_body_id: 1,
            next_constraint_id: 1,
            steps: 0,
        }
    }

    /// Remove all bodies and constraints. Ids keep counting so stale ids
    /// never alias new bodies.
    fn clear(&mut self) {
        self.bodies.clear();
        self.constraints.clear();
    }

    fn insert_body(&mut self, descriptor: BodyDescriptor) -> BodyId {
        let id = BodyId(self.next_body_id);
        self.next_body_id = self.next_body_id.saturating_add(1);
        self.bodies.push(RigidBody::from_descriptor(id, &descriptor));
        id
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(idx) = self.bodies.iter().position(|b| b.id == id) else {
            return false;
        };
        self.bodies.remove(idx);
        for c in self.constraints.iter_mut() {
            if c.grabbed == Some(id) {
                c.grabbed = None;
            }
        }
        true
    }

    fn body(&self, id: BodyId) -> Option<BodyState> {
        self.bodies.iter().find(|b| b.id == id).map(RigidBody::state)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn step(&mut self) {
        self.apply_drag();
        self.integrate();
        self.collide();
        self.steps += 1;
    }

    fn insert_pointer_constraint(&mut self, settings: PointerConstraint) -> ConstraintId {
        let id = ConstraintId(self.next_constraint_id);
        self.next_constraint_id = self.next_constraint_id.saturating_add(1);
        self.constraints.push(DragConstraint {
            id,
            settings,
            pointer: None,
            grabbed: None,
        });
        id
    }

    fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        let before = self.constraints.len();
        self.constraints.retain(|c| c.id != id);
        self.constraints.len() != before
    }

    fn pointer_input(&mut self, id: ConstraintId, input: PointerInput) {
        let Some(c) = self.constraints.iter_mut().find(|c| c.id == id) else {
            return;
        };
        match input {
            PointerInput::Down(p) => {
                c.pointer = Some(p);
                // Topmost (last inserted) dynamic body under the pointer.
                c.grabbed = self
                    .bodies
                    .iter()
                    .rev()
                    .find(|b| !b.is_static && b.contains_point(p))
                    .map(|b| b.id);
                if let Some(body) = c.grabbed {
                    debug!(?body, "pointer grabbed body");
                }
            }
            PointerInput::Move(p) => c.pointer = Some(p),
            PointerInput::Up => {
                c.pointer = None;
                c.grabbed = None;
            }
        }
    }
}
