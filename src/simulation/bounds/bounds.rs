use tracing::debug;

use crate::domain::element::ElementHandle;
use crate::systems::physics::PhysicsWorld;
use crate::systems::pointer_drag::PointerEvent;
use crate::systems::scheduler::FrameScheduler;

use super::Canvas;

pub(super) fn notify_resize<W, S, E>(canvas: &mut Canvas<W, S, E>, now_ms: f64)
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if canvas.observing_resize {
        canvas.resize.trigger(now_ms);
    }
}

pub(super) fn poll_resize<W, S, E>(canvas: &mut Canvas<W, S, E>, now_ms: f64) -> bool
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if canvas.world.is_none() || !canvas.resize.poll(now_ms) {
        return false;
    }
    refresh_bounds(canvas);
    true
}

/// Replace walls and drag constraint to match the container. Safe to call
/// any number of times.
pub(super) fn refresh_bounds<W, S, E>(canvas: &mut Canvas<W, S, E>)
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    let (Some(world), Some(container)) = (canvas.world.as_mut(), canvas.container.as_deref()) else {
        return;
    };

    if canvas.config.bounded {
        let size = container.client_size();
        canvas.boundary.rebuild(world, size);
        debug!(width = size.width, height = size.height, "walls rebuilt");
    }

    if canvas.config.interactive {
        canvas.drag.rebuild(world, container.bounding_rect());
        debug!(constraint = ?canvas.drag.constraint(), "drag constraint rebuilt");
    }
}

pub(super) fn pointer_input<W, S, E>(canvas: &mut Canvas<W, S, E>, event: PointerEvent)
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if let Some(world) = canvas.world.as_mut() {
        canvas.drag.forward(world, event);
    }
}
