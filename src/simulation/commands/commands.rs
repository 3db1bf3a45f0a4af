use tracing::debug;

use crate::core::{CanvasError, Deferred, Rect};
use crate::domain::element::{ElementHandle, ManagedElement};
use crate::systems::body_factory::build_body;
use crate::systems::physics::PhysicsWorld;
use crate::systems::scheduler::FrameScheduler;

use super::{Canvas, PendingRegistration, Registration};

/// Build and insert a body for `handle`, snapshotting its presentation.
pub(super) fn insert_live<W, E>(world: &mut W, container: Rect, handle: &E) -> Result<ManagedElement<E>, CanvasError>
where
    W: PhysicsWorld,
    E: ElementHandle,
{
    let params = handle.shape_params()?;
    let descriptor = build_body(handle.bounding_rect(), container, &params)?;
    let original = handle.presentation();
    let body_id = world.insert_body(descriptor);
    Ok(ManagedElement::new(handle.clone(), original, body_id))
}

pub(super) fn add_element<W, S, E>(canvas: &mut Canvas<W, S, E>, handle: E) -> Result<Registration<E>, CanvasError>
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    // Reject bad parameters before anything is queued.
    handle.shape_params()?.validate()?;

    if let Some(existing) = canvas.find_live(&handle) {
        return Ok(Deferred::ready(Some(existing.clone())));
    }

    if !canvas.paused {
        if let Some(world) = canvas.world.as_mut() {
            let container = canvas
                .container
                .as_deref()
                .ok_or(CanvasError::NoContainer)?
                .bounding_rect();
            let element = insert_live(world, container, &handle)?;
            canvas.elements.push(element.clone());
            debug!(body = ?element.body_id(), "element added");
            return Ok(Deferred::ready(Some(element)));
        }
    }

    // Stopped or paused: queue, joining an existing entry for the same handle.
    let entry = match canvas.pending.iter().position(|p| p.handle == handle) {
        Some(idx) => &mut canvas.pending[idx],
        None => {
            canvas.pending.push(PendingRegistration::new(handle));
            let last = canvas.pending.len() - 1;
            &mut canvas.pending[last]
        }
    };
    let deferred = entry.subscribe();
    debug!(waiters = entry.waiter_count(), "element queued");
    Ok(deferred)
}

pub(super) fn remove_element<W, S, E>(canvas: &mut Canvas<W, S, E>, handle: &E) -> Option<ManagedElement<E>>
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if let Some(world) = canvas.world.as_mut() {
        if let Some(idx) = canvas.elements.iter().position(|e| e.handle() == handle) {
            let element = canvas.elements.remove(idx);
            world.remove_body(element.body_id());
            element.restore();
            debug!(body = ?element.body_id(), "element removed");
            return Some(element);
        }
    }

    // Not live: discard a queued entry, telling its waiters it never made it.
    if let Some(idx) = canvas.pending.iter().position(|p| &p.handle == handle) {
        let entry = canvas.pending.remove(idx);
        debug!(waiters = entry.waiter_count(), "pending element discarded");
        entry.resolve(None);
    }
    None
}

pub(super) fn get_element<W, S, E>(canvas: &mut Canvas<W, S, E>, handle: &E) -> Registration<E>
where
    W: PhysicsWorld,
    S: FrameScheduler,
    E: ElementHandle,
{
    if let Some(element) = canvas.find_live(handle) {
        return Deferred::ready(Some(element.clone()));
    }
    match canvas.pending.iter_mut().find(|p| &p.handle == handle) {
        Some(entry) => entry.subscribe(),
        None => Deferred::ready(None),
    }
}
