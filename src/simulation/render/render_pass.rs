use crate::domain::element::ElementHandle;
use crate::systems::physics::PhysicsWorld;
use crate::systems::scheduler::FrameScheduler;

use super::Canvas;

/// Compute every element's transform from the current body states, apply
/// the whole batch, then advance the world.
///
/// All body reads happen before the first presentation write.
pub(super) fn render_and_step<W, S, E>(canvas: &mut Canvas<W, S, E>) -> usize
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    let Some(world) = canvas.world.as_mut() else {
        return 0;
    };

    for element in canvas.elements.iter() {
        element.compute_transform(&*world, &mut canvas.batch);
    }
    let applied = canvas.batch.apply();

    world.step();
    applied
}
