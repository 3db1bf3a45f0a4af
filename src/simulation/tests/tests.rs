use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::core::{Rect, Size, Vec2};
use crate::domain::element::PresentationState;
use crate::domain::shapes::ShapeParams;
use crate::systems::rigid_body_system::SimpleWorld;

// === Test doubles ===

#[derive(Default)]
struct Scheduler {
    next: i32,
    requested: Vec<FrameRequest>,
    cancelled: Vec<FrameRequest>,
    unavailable: bool,
}

impl FrameScheduler for Scheduler {
    fn request_frame(&mut self) -> Result<FrameRequest, CanvasError> {
        if self.unavailable {
            return Err(CanvasError::Scheduler("no display".into()));
        }
        self.next += 1;
        let req = FrameRequest(self.next);
        self.requested.push(req);
        Ok(req)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.cancelled.push(request);
    }
}

struct Container(Rect);

impl Surface for Container {
    fn bounding_rect(&self) -> Rect {
        self.0
    }
    fn client_size(&self) -> Size {
        self.0.size()
    }
}

struct ElementState {
    rect: Rect,
    params: Result<ShapeParams, CanvasError>,
    presentation: PresentationState,
    writes: usize,
}

/// Shares an event log across elements so tests can check read/write order.
#[derive(Clone)]
struct Element {
    id: u32,
    state: Rc<RefCell<ElementState>>,
    log: Rc<RefCell<Vec<String>>>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Surface for Element {
    fn bounding_rect(&self) -> Rect {
        self.state.borrow().rect
    }
    fn client_size(&self) -> Size {
        self.log.borrow_mut().push(format!("read {}", self.id));
        self.state.borrow().rect.size()
    }
}

impl ElementHandle for Element {
    fn shape_params(&self) -> Result<ShapeParams, CanvasError> {
        self.state.borrow().params.clone()
    }
    fn presentation(&self) -> PresentationState {
        self.state.borrow().presentation.clone()
    }
    fn set_presentation(&self, p: &PresentationState) {
        self.log.borrow_mut().push(format!("write {}", self.id));
        let mut s = self.state.borrow_mut();
        s.presentation = p.clone();
        s.writes += 1;
    }
}

type TestCanvas = Canvas<SimpleWorld, Scheduler, Element>;

fn original_style() -> PresentationState {
    PresentationState {
        position: Some("relative".into()),
        ..PresentationState::default()
    }
}

fn element(id: u32, log: &Rc<RefCell<Vec<String>>>, x: f32, y: f32) -> Element {
    Element {
        id,
        state: Rc::new(RefCell::new(ElementState {
            rect: Rect::new(x, y, 40.0, 40.0),
            params: Ok(ShapeParams::circle()),
            presentation: original_style(),
            writes: 0,
        })),
        log: log.clone(),
    }
}

fn canvas_with(config: CanvasConfig) -> TestCanvas {
    let mut canvas = Canvas::new(config, Scheduler::default());
    canvas.bind_container(Container(Rect::new(0.0, 0.0, 500.0, 300.0)));
    canvas
}

fn canvas() -> TestCanvas {
    canvas_with(CanvasConfig::default())
}

fn handles(canvas: &TestCanvas) -> Vec<u32> {
    canvas.elements().iter().map(|e| e.handle().id).collect()
}

// === Lifecycle ===

#[test]
fn start_without_container_fails() {
    let mut canvas: TestCanvas = Canvas::new(CanvasConfig::default(), Scheduler::default());
    assert_eq!(canvas.start(), Err(CanvasError::NoContainer));
    assert_eq!(canvas.state(), LifecycleState::Stopped);
    assert!(canvas.world().is_none());
}

#[test]
fn start_creates_world_walls_and_first_frame() {
    let mut canvas = canvas();
    canvas.start().unwrap();

    assert_eq!(canvas.state(), LifecycleState::Running);
    assert_eq!(canvas.walls().len(), 4);
    assert_eq!(canvas.world().unwrap().body_count(), 4);
    assert_eq!(canvas.scheduled_frame(), Some(FrameRequest(1)));
    assert!(canvas.drag_constraint().is_none());

    // Already running: no second world, no second frame.
    canvas.start().unwrap();
    assert_eq!(canvas.scheduler().requested.len(), 1);
}

#[test]
fn unbounded_interactive_canvas_gets_drag_but_no_walls() {
    let mut canvas = canvas_with(CanvasConfig {
        bounded: false,
        interactive: true,
        ..CanvasConfig::default()
    });
    canvas.start().unwrap();
    assert!(canvas.walls().is_empty());
    assert!(canvas.drag_constraint().is_some());
    assert_eq!(canvas.world().unwrap().constraint_count(), 1);
}

#[test]
fn pending_elements_drain_on_start_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    let a = element(1, &log, 10.0, 10.0);
    let b = element(2, &log, 100.0, 10.0);

    let ra = canvas.add_element(a.clone()).unwrap();
    let rb = canvas.add_element(b.clone()).unwrap();
    assert!(!ra.is_resolved());
    assert_eq!(canvas.pending_len(), 2);

    canvas.start().unwrap();

    assert_eq!(handles(&canvas), vec![1, 2]);
    assert_eq!(ra.peek().unwrap().unwrap().handle().id, 1);
    assert_eq!(rb.peek().unwrap().unwrap().handle().id, 2);
    assert_eq!(canvas.pending_len(), 0);
}

#[test]
fn start_and_resume_commit_nothing_when_no_frame_can_be_booked() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    let a = element(1, &log, 10.0, 10.0);
    let ra = canvas.add_element(a.clone()).unwrap();
    canvas.scheduler.unavailable = true;

    assert!(matches!(canvas.start(), Err(CanvasError::Scheduler(_))));
    assert_eq!(canvas.state(), LifecycleState::Stopped);
    assert!(canvas.world().is_none());
    assert!(!ra.is_resolved());
    assert!(canvas.is_pending(&a));

    // A retry once frames are available goes through in full.
    canvas.scheduler.unavailable = false;
    canvas.start().unwrap();
    assert_eq!(canvas.state(), LifecycleState::Running);
    assert_eq!(handles(&canvas), vec![1]);
    assert!(canvas.scheduled_frame().is_some());

    canvas.pause();
    let b = element(2, &log, 100.0, 10.0);
    let rb = canvas.add_element(b.clone()).unwrap();
    canvas.scheduler.unavailable = true;
    assert!(matches!(canvas.resume(), Err(CanvasError::Scheduler(_))));
    assert_eq!(canvas.state(), LifecycleState::Paused);
    assert!(!rb.is_resolved());
    assert_eq!(canvas.scheduled_frame(), None);

    canvas.scheduler.unavailable = false;
    canvas.resume().unwrap();
    assert_eq!(canvas.state(), LifecycleState::Running);
    assert_eq!(handles(&canvas), vec![1, 2]);
}

#[test]
fn queued_body_starts_under_the_element_as_laid_out_at_drain() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    let a = element(1, &log, 10.0, 10.0);
    let ra = canvas.add_element(a.clone()).unwrap();

    a.state.borrow_mut().rect = Rect::new(200.0, 100.0, 40.0, 40.0);
    canvas.start().unwrap();

    let managed = ra.peek().unwrap().unwrap();
    let body = managed.body(canvas.world().unwrap()).unwrap();
    assert_eq!(body.position, Vec2::new(220.0, 120.0));
}

#[test]
fn stop_restores_presentation_and_requeues_without_waiters() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    let a = element(1, &log, 10.0, 10.0);
    let b = element(2, &log, 100.0, 10.0);
    canvas.add_element(a.clone()).unwrap();
    canvas.add_element(b.clone()).unwrap();

    canvas.tick(16.0).unwrap();
    assert_ne!(a.presentation(), original_style());

    canvas.stop();

    assert_eq!(canvas.state(), LifecycleState::Stopped);
    assert!(canvas.elements().is_empty());
    assert!(canvas.world().is_none());
    assert!(canvas.walls().is_empty());
    assert_eq!(a.presentation(), original_style());
    assert_eq!(b.presentation(), original_style());
    assert!(canvas.is_pending(&a) && canvas.is_pending(&b));
    assert!(canvas.pending().iter().all(|p| p.waiter_count() == 0));
    assert!(canvas.scheduler().cancelled.contains(&FrameRequest(2)));
}

#[test]
fn stop_then_start_reproduces_the_same_elements() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    for i in 0..3 {
        canvas.add_element(element(i, &log, 20.0 + 60.0 * i as f32, 20.0)).unwrap();
    }
    let before = handles(&canvas);

    canvas.stop();
    canvas.start().unwrap();

    assert_eq!(handles(&canvas), before);
    // Fresh world: walls + three bodies.
    assert_eq!(canvas.world().unwrap().body_count(), 7);
}

#[test]
fn stop_and_pause_are_idempotent() {
    let mut canvas = canvas();
    canvas.stop();
    canvas.pause();
    assert_eq!(canvas.state(), LifecycleState::Stopped);
    assert!(canvas.scheduler().cancelled.is_empty());

    canvas.start().unwrap();
    canvas.pause();
    canvas.pause();
    assert_eq!(canvas.state(), LifecycleState::Paused);
    assert_eq!(canvas.scheduler().cancelled.len(), 1);
    assert_eq!(canvas.scheduled_frame(), None);

    // resume() from stopped is also a no-op.
    canvas.stop();
    canvas.resume().unwrap();
    assert_eq!(canvas.state(), LifecycleState::Stopped);
}

#[test]
fn pause_resume_keeps_members_and_adds_queued_ones_after() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    canvas.add_element(element(1, &log, 10.0, 10.0)).unwrap();
    canvas.add_element(element(2, &log, 60.0, 10.0)).unwrap();

    canvas.pause();
    let c = element(3, &log, 120.0, 10.0);
    let rc = canvas.add_element(c.clone()).unwrap();
    assert!(!rc.is_resolved());
    assert_eq!(handles(&canvas), vec![1, 2]);

    canvas.resume().unwrap();
    assert_eq!(canvas.state(), LifecycleState::Running);
    assert_eq!(handles(&canvas), vec![1, 2, 3]);
    assert!(rc.peek().unwrap().is_some());
    assert!(canvas.scheduled_frame().is_some());
}

#[test]
fn paused_ticks_are_ignored() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    canvas.add_element(element(1, &log, 10.0, 10.0)).unwrap();
    canvas.pause();

    let steps = canvas.world().unwrap().steps();
    canvas.tick(16.0).unwrap();
    assert_eq!(canvas.world().unwrap().steps(), steps);
    assert_eq!(canvas.scheduled_frame(), None);
}

// === Registration ===

#[test]
fn add_while_running_resolves_immediately_with_centered_body() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    let a = element(1, &log, 100.0, 50.0);

    let reg = canvas.add_element(a.clone()).unwrap();
    let managed = reg.peek().unwrap().unwrap();
    let body = managed.body(canvas.world().unwrap()).unwrap();
    assert_eq!(body.position, Vec2::new(120.0, 70.0));
    assert_eq!(managed.original(), &original_style());
}

#[test]
fn adding_a_live_element_again_does_not_duplicate_it() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    let a = element(1, &log, 10.0, 10.0);
    let first = canvas.add_element(a.clone()).unwrap().peek().unwrap().unwrap();
    let second = canvas.add_element(a.clone()).unwrap().peek().unwrap().unwrap();
    assert_eq!(first.body_id(), second.body_id());
    assert_eq!(canvas.elements().len(), 1);
}

#[test]
fn duplicate_pending_registration_shares_one_entry() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    let a = element(1, &log, 10.0, 10.0);
    let r1 = canvas.add_element(a.clone()).unwrap();
    let r2 = canvas.add_element(a.clone()).unwrap();

    assert_eq!(canvas.pending_len(), 1);
    assert_eq!(canvas.pending()[0].waiter_count(), 2);

    canvas.start().unwrap();
    let e1 = r1.peek().unwrap().unwrap();
    let e2 = r2.peek().unwrap().unwrap();
    assert_eq!(e1.body_id(), e2.body_id());
    assert_eq!(canvas.elements().len(), 1);
}

#[test]
fn invalid_parameters_are_rejected_in_every_state() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    let bad = element(9, &log, 0.0, 0.0);
    bad.state.borrow_mut().params = Ok(ShapeParams { density: f32::NAN, ..ShapeParams::circle() });

    assert!(matches!(canvas.add_element(bad.clone()), Err(CanvasError::InvalidShape { .. })));
    assert_eq!(canvas.pending_len(), 0);

    canvas.start().unwrap();
    assert!(canvas.add_element(bad).is_err());
    assert!(canvas.elements().is_empty());
}

#[test]
fn element_that_goes_bad_while_pending_resolves_to_none() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    let a = element(1, &log, 10.0, 10.0);
    let reg = canvas.add_element(a.clone()).unwrap();

    a.state.borrow_mut().params = Err(CanvasError::InvalidAttribute { name: "data-density", value: None });
    canvas.start().unwrap();

    assert!(matches!(reg.peek(), Some(None)));
    assert!(canvas.elements().is_empty());
}

// === Removal & lookup ===

#[test]
fn remove_before_start_discards_and_resolves_none() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    let a = element(1, &log, 10.0, 10.0);
    let reg = canvas.add_element(a.clone()).unwrap();

    assert!(canvas.remove_element(&a).is_none());
    assert!(matches!(reg.peek(), Some(None)));

    canvas.start().unwrap();
    assert!(canvas.elements().is_empty());
}

#[test]
fn remove_live_element_drops_body_and_restores_style() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    let a = element(1, &log, 10.0, 10.0);
    canvas.add_element(a.clone()).unwrap();
    canvas.tick(16.0).unwrap();

    let removed = canvas.remove_element(&a).unwrap();
    assert!(canvas.world().unwrap().body(removed.body_id()).is_none());
    assert_eq!(a.presentation(), original_style());
    assert!(canvas.elements().is_empty());

    // Unknown handle: absent, no error.
    assert!(canvas.remove_element(&a).is_none());
}

#[test]
fn remove_while_paused_discards_entries_queued_during_pause() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    canvas.pause();
    let a = element(1, &log, 10.0, 10.0);
    let reg = canvas.add_element(a.clone()).unwrap();

    assert!(canvas.remove_element(&a).is_none());
    assert!(matches!(reg.peek(), Some(None)));
    canvas.resume().unwrap();
    assert!(canvas.elements().is_empty());
}

#[test]
fn get_element_follows_state() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    let a = element(1, &log, 10.0, 10.0);
    let unknown = element(2, &log, 10.0, 10.0);

    // Stopped, unknown: resolved absent right away.
    assert!(matches!(canvas.get_element(&unknown).peek(), Some(None)));

    // Stopped, pending: waits for start.
    canvas.add_element(a.clone()).unwrap();
    let lookup = canvas.get_element(&a);
    assert!(!lookup.is_resolved());
    canvas.start().unwrap();
    assert_eq!(lookup.peek().unwrap().unwrap().handle().id, 1);

    // Running: synchronous.
    assert!(canvas.get_element(&a).peek().unwrap().is_some());
    assert!(matches!(canvas.get_element(&unknown).peek(), Some(None)));
}

#[test]
fn lookup_on_requeued_element_waits_for_restart() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    let a = element(1, &log, 10.0, 10.0);
    canvas.add_element(a.clone()).unwrap();
    canvas.stop();

    // Entry has no waiters after stop; a lookup attaches one.
    let lookup = canvas.get_element(&a);
    assert_eq!(canvas.pending()[0].waiter_count(), 1);
    canvas.start().unwrap();
    assert!(lookup.peek().unwrap().is_some());
}

// === Frames ===

#[test]
fn tick_reads_every_body_before_writing_any_element() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    for i in 0..3 {
        canvas.add_element(element(i, &log, 20.0 + 60.0 * i as f32, 20.0)).unwrap();
    }
    log.borrow_mut().clear();

    canvas.tick(16.0).unwrap();

    let events = log.borrow().clone();
    assert_eq!(events.len(), 6);
    let first_write = events.iter().position(|e| e.starts_with("write")).unwrap();
    assert!(events[..first_write].iter().all(|e| e.starts_with("read")));
    assert_eq!(first_write, 3);
    assert_eq!(&events[3..], &["write 0", "write 1", "write 2"]);
}

#[test]
fn tick_applies_pre_step_positions_then_advances() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = canvas();
    canvas.start().unwrap();
    let a = element(1, &log, 100.0, 50.0);
    let managed = canvas.add_element(a.clone()).unwrap().peek().unwrap().unwrap();

    canvas.tick(16.0).unwrap();

    // Written transform reflects the body before this tick's step.
    assert_eq!(
        a.presentation().transform.as_deref(),
        Some("translate(100px, 50px) rotate(0rad)")
    );
    assert_eq!(a.state.borrow().writes, 1);
    let after = managed.body(canvas.world().unwrap()).unwrap();
    assert!(after.position.y > 70.0);
    assert_eq!(canvas.world().unwrap().steps(), 1);
    assert_eq!(canvas.scheduled_frame(), Some(FrameRequest(2)));
}

// === Resize ===

#[test]
fn resize_rebuilds_walls_once_after_quiet_period() {
    let mut canvas = canvas();
    canvas.notify_resize(0.0);
    assert!(!canvas.resize_pending(), "not observing while stopped");

    canvas.start().unwrap();
    let walls = canvas.walls().to_vec();

    canvas.notify_resize(0.0);
    canvas.notify_resize(30.0);
    canvas.tick(60.0).unwrap();
    assert_eq!(canvas.walls(), walls.as_slice());

    canvas.tick(90.0).unwrap();
    assert_ne!(canvas.walls(), walls.as_slice());
    assert_eq!(canvas.walls().len(), 4);
    // Old walls are gone from the world.
    assert_eq!(canvas.world().unwrap().body_count(), 4);
    assert!(!canvas.resize_pending());
}

#[test]
fn stop_cancels_armed_resize() {
    let mut canvas = canvas();
    canvas.start().unwrap();
    canvas.notify_resize(0.0);
    canvas.stop();
    assert!(!canvas.resize_pending());
    assert!(!canvas.poll_resize(1_000.0));
}
