use tracing::{debug, info, warn};

use crate::domain::element::{ElementHandle, ManagedElement};
use crate::systems::physics::PhysicsWorld;
use crate::systems::scheduler::FrameScheduler;

use super::commands::insert_live;
use super::{Canvas, PendingRegistration};
use crate::core::CanvasError;

pub(super) fn start<W, S, E>(canvas: &mut Canvas<W, S, E>) -> Result<(), CanvasError>
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if canvas.world.is_some() {
        return Ok(());
    }
    if canvas.container.is_none() {
        return Err(CanvasError::NoContainer);
    }

    // Nothing is committed until the first frame is booked.
    canvas.request_frame()?;

    canvas.world = Some(W::with_gravity(canvas.config.gravity));
    canvas.paused = false;

    drain_pending(canvas);
    canvas.refresh_bounds();
    canvas.observing_resize = true;

    info!(elements = canvas.elements.len(), "canvas started");
    Ok(())
}

pub(super) fn stop<W, S, E>(canvas: &mut Canvas<W, S, E>)
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    let Some(mut world) = canvas.world.take() else {
        return;
    };

    canvas.observing_resize = false;
    canvas.resize.cancel();
    canvas.cancel_frame();
    canvas.batch.clear();

    // Live elements go back to the front of the queue, without waiters;
    // entries queued while paused keep theirs and follow.
    let mut requeued: Vec<PendingRegistration<E>> =
        Vec::with_capacity(canvas.elements.len() + canvas.pending.len());
    for element in canvas.elements.drain(..) {
        element.restore();
        requeued.push(PendingRegistration::new(element.into_handle()));
    }
    requeued.append(&mut canvas.pending);
    canvas.pending = requeued;

    canvas.boundary.reset();
    canvas.drag.reset();
    world.clear();
    canvas.paused = false;

    info!(pending = canvas.pending.len(), "canvas stopped");
}

pub(super) fn pause<W, S, E>(canvas: &mut Canvas<W, S, E>)
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if canvas.world.is_none() || canvas.paused {
        return;
    }
    canvas.cancel_frame();
    canvas.paused = true;
    debug!("canvas paused");
}

pub(super) fn resume<W, S, E>(canvas: &mut Canvas<W, S, E>) -> Result<(), CanvasError>
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if canvas.world.is_none() || !canvas.paused {
        return Ok(());
    }
    canvas.request_frame()?;
    canvas.paused = false;
    drain_pending(canvas);
    debug!(elements = canvas.elements.len(), "canvas resumed");
    Ok(())
}

/// Insert every pending element in queue order and resolve its waiters.
///
/// An element that can no longer be built (its parameters went bad while it
/// waited) is dropped and its waiters get `None`.
fn drain_pending<W, S, E>(canvas: &mut Canvas<W, S, E>)
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    let (Some(world), Some(container)) = (canvas.world.as_mut(), canvas.container.as_deref()) else {
        return;
    };
    let container_rect = container.bounding_rect();

    let pending = std::mem::take(&mut canvas.pending);
    let drained = pending.len();
    for entry in pending {
        let outcome: Option<ManagedElement<E>> = match insert_live(world, container_rect, &entry.handle) {
            Ok(element) => {
                canvas.elements.push(element.clone());
                Some(element)
            }
            Err(err) => {
                warn!(%err, "dropping pending element");
                None
            }
        };
        entry.resolve(outcome);
    }
    if drained > 0 {
        debug!(drained, "pending registrations drained");
    }
}
