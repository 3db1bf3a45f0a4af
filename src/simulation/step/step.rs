use crate::core::CanvasError;
use crate::domain::element::ElementHandle;
use crate::systems::physics::PhysicsWorld;
use crate::systems::scheduler::FrameScheduler;

use super::{render_pass, Canvas, LifecycleState};

/// One frame: resize rebuild (if due), render pass, world step, next frame.
///
/// The resize rebuild runs before the render pass so it never lands in the
/// middle of a batch.
pub(super) fn tick<W, S, E>(canvas: &mut Canvas<W, S, E>, now_ms: f64) -> Result<(), CanvasError>
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if canvas.state() != LifecycleState::Running {
        return Ok(());
    }
    // The request that delivered this frame is spent.
    canvas.frame = None;

    canvas.poll_resize(now_ms);
    render_pass::render_and_step(canvas);
    canvas.request_frame()
}
