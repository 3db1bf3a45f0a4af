//! Canvas - keeps a set of elements in sync with a physics world
//!
//! The canvas owns:
//! - the lifecycle (stopped / running / paused),
//! - the live registry of element/body pairs,
//! - the pending queue of elements registered while not running,
//! - the boundary walls, the drag constraint, and the resize debounce.
//!
//! Work is split by concern, mirroring the public methods:
//! lifecycle/ (transitions), commands/ (add/remove/get),
//! step/ (frame tick), render/ (compute-then-apply pass), bounds/ (walls,
//! drag, resize).

use tracing::debug;

use crate::core::{CanvasError, Debounce, Deferred, Resolver};
use crate::domain::element::{ElementHandle, ManagedElement, Surface};
use crate::systems::boundary::Boundary;
use crate::systems::physics::{BodyId, ConstraintId, PhysicsWorld};
use crate::systems::pointer_drag::{PointerDrag, PointerEvent};
use crate::systems::render_batch::RenderBatch;
use crate::systems::scheduler::{FrameRequest, FrameScheduler};

#[path = "init/settings.rs"]
mod settings;
#[path = "lifecycle/lifecycle.rs"]
mod lifecycle;
#[path = "commands/commands.rs"]
mod commands;
#[path = "step/step.rs"]
mod step;
#[path = "render/render_pass.rs"]
mod render_pass;
#[path = "bounds/bounds.rs"]
mod bounds;

pub use settings::CanvasConfig;

/// Deferred outcome of a registration or lookup: the live element, or
/// `None` if the element was discarded before insertion.
pub type Registration<E> = Deferred<Option<ManagedElement<E>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Running,
    Paused,
}

/// An element waiting for the canvas to run.
pub struct PendingRegistration<E> {
    handle: E,
    waiters: Vec<Resolver<Option<ManagedElement<E>>>>,
}

impl<E: ElementHandle> PendingRegistration<E> {
    fn new(handle: E) -> Self {
        Self {
            handle,
            waiters: Vec::new(),
        }
    }

    pub fn handle(&self) -> &E {
        &self.handle
    }

    pub fn waiter_count(&self) -> usize {
        self.waiters.len()
    }

    /// Attach a new waiter and return its deferred.
    fn subscribe(&mut self) -> Registration<E> {
        let (resolver, deferred) = crate::core::deferred::channel();
        self.waiters.push(resolver);
        deferred
    }

    /// Resolve every waiter, in attach order, with the same outcome.
    fn resolve(self, outcome: Option<ManagedElement<E>>) {
        for waiter in self.waiters {
            waiter.resolve(outcome.clone());
        }
    }
}

/// The lifecycle controller.
///
/// `W` is the physics world, `S` the frame scheduler, `E` the element handle.
/// A world exists exactly while the canvas is running or paused.
pub struct Canvas<W: PhysicsWorld, S: FrameScheduler, E: ElementHandle> {
    config: CanvasConfig,
    container: Option<Box<dyn Surface>>,
    scheduler: S,

    world: Option<W>,
    paused: bool,

    elements: Vec<ManagedElement<E>>,
    pending: Vec<PendingRegistration<E>>,

    boundary: Boundary,
    drag: PointerDrag,
    resize: Debounce,
    observing_resize: bool,

    frame: Option<FrameRequest>,
    batch: RenderBatch,
}

impl<W: PhysicsWorld, S: FrameScheduler, E: ElementHandle> Canvas<W, S, E> {
    pub fn new(config: CanvasConfig, scheduler: S) -> Self {
        Self {
            boundary: Boundary::new(config.wall_thickness),
            drag: PointerDrag::new(config.drag_stiffness),
            resize: Debounce::new(config.resize_debounce_ms),
            config,
            container: None,
            scheduler,
            world: None,
            paused: false,
            elements: Vec::new(),
            pending: Vec::new(),
            observing_resize: false,
            frame: None,
            batch: RenderBatch::new(),
        }
    }

    /// Bind (or replace) the container the bodies live in.
    pub fn bind_container<C: Surface + 'static>(&mut self, container: C) {
        self.container = Some(Box::new(container));
        debug!("container bound");
    }

    pub fn has_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        match (&self.world, self.paused) {
            (None, _) => LifecycleState::Stopped,
            (Some(_), false) => LifecycleState::Running,
            (Some(_), true) => LifecycleState::Paused,
        }
    }

    /// Live elements in registration order.
    pub fn elements(&self) -> &[ManagedElement<E>] {
        &self.elements
    }

    pub fn pending(&self) -> &[PendingRegistration<E>] {
        &self.pending
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: &E) -> bool {
        self.pending.iter().any(|p| &p.handle == handle)
    }

    pub fn world(&self) -> Option<&W> {
        self.world.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Outstanding frame request, if any.
    pub fn scheduled_frame(&self) -> Option<FrameRequest> {
        self.frame
    }

    pub fn walls(&self) -> &[BodyId] {
        self.boundary.walls()
    }

    pub fn drag_constraint(&self) -> Option<ConstraintId> {
        self.drag.constraint()
    }

    /// Whether a resize rebuild is waiting for its quiescent interval.
    pub fn resize_pending(&self) -> bool {
        self.resize.is_armed()
    }

    // === LIFECYCLE ===

    /// Create the world and begin stepping. No-op unless stopped.
    pub fn start(&mut self) -> Result<(), CanvasError> {
        lifecycle::start(self)
    }

    /// Tear the world down, keeping every element queued for the next start.
    pub fn stop(&mut self) {
        lifecycle::stop(self)
    }

    pub fn pause(&mut self) {
        lifecycle::pause(self)
    }

    pub fn resume(&mut self) -> Result<(), CanvasError> {
        lifecycle::resume(self)
    }

    // === ELEMENTS ===

    /// Register an element. Resolves now when running, otherwise on the
    /// next transition into running (or to `None` if removed first).
    ///
    /// A queued element's body is built from its geometry when it goes
    /// live, not when it was queued: the body starts under the element as
    /// it is laid out at that moment.
    pub fn add_element(&mut self, handle: E) -> Result<Registration<E>, CanvasError> {
        commands::add_element(self, handle)
    }

    /// Unregister an element, restoring its presentation.
    pub fn remove_element(&mut self, handle: &E) -> Option<ManagedElement<E>> {
        commands::remove_element(self, handle)
    }

    pub fn get_element(&mut self, handle: &E) -> Registration<E> {
        commands::get_element(self, handle)
    }

    // === FRAMES ===

    /// Frame callback: render the batch, advance the world, schedule the
    /// next frame. Ignored unless running.
    pub fn tick(&mut self, now_ms: f64) -> Result<(), CanvasError> {
        step::tick(self, now_ms)
    }

    // === BOUNDS ===

    /// Container size changed; rebuild after the debounce interval.
    pub fn notify_resize(&mut self, now_ms: f64) {
        bounds::notify_resize(self, now_ms)
    }

    /// Fire the resize rebuild if it is due. Returns `true` if it fired.
    pub fn poll_resize(&mut self, now_ms: f64) -> bool {
        bounds::poll_resize(self, now_ms)
    }

    /// Rebuild walls and drag constraint from the container right now.
    pub fn refresh_bounds(&mut self) {
        bounds::refresh_bounds(self)
    }

    /// Forward a client-space pointer event to the drag constraint.
    pub fn pointer_input(&mut self, event: PointerEvent) {
        bounds::pointer_input(self, event)
    }

    fn find_live(&self, handle: &E) -> Option<&ManagedElement<E>> {
        self.elements.iter().find(|e| e.handle() == handle)
    }

    fn request_frame(&mut self) -> Result<(), CanvasError> {
        self.frame = Some(self.scheduler.request_frame()?);
        Ok(())
    }

    fn cancel_frame(&mut self) {
        if let Some(request) = self.frame.take() {
            self.scheduler.cancel_frame(request);
        }
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
