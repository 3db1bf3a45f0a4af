//! Browser binding
//!
//! - `web_sys::HtmlElement` is the element handle (inline style + data-* attributes)
//! - `requestAnimationFrame` drives `Canvas::tick`
//! - a `ResizeObserver` on the container feeds `Canvas::notify_resize`
//! - deferred registrations surface as `js_sys::Promise`

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Promise};
use tracing::{debug, error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, HtmlElement, ResizeObserver, Window};

use crate::core::clock;
use crate::core::{CanvasError, Rect, Size};
use crate::domain::element::{ElementHandle, ManagedElement, PresentationState, Surface};
use crate::domain::shapes::ShapeParams;
use crate::simulation::{Canvas, CanvasConfig, LifecycleState, Registration};
use crate::systems::pointer_drag::PointerEvent;
use crate::systems::rigid_body_system::SimpleWorld;
use crate::systems::scheduler::{FrameRequest, FrameScheduler};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type BrowserCanvas = Canvas<SimpleWorld, RafScheduler, HtmlElement>;

impl From<CanvasError> for JsValue {
    fn from(err: CanvasError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

// === DOM ELEMENTS ===

impl Surface for HtmlElement {
    fn bounding_rect(&self) -> Rect {
        let r = self.get_bounding_client_rect();
        Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
    }

    fn client_size(&self) -> Size {
        Size::new(self.client_width() as f32, self.client_height() as f32)
    }
}

impl ElementHandle for HtmlElement {
    fn shape_params(&self) -> Result<ShapeParams, CanvasError> {
        ShapeParams::from_attributes(|name| self.get_attribute(name))
    }

    fn presentation(&self) -> PresentationState {
        let style = self.style();
        PresentationState {
            position: read_style(&style, "position"),
            top: read_style(&style, "top"),
            left: read_style(&style, "left"),
            transform: read_style(&style, "transform"),
        }
    }

    fn set_presentation(&self, state: &PresentationState) {
        let style = self.style();
        write_style(&style, "position", state.position.as_deref());
        write_style(&style, "top", state.top.as_deref());
        write_style(&style, "left", state.left.as_deref());
        write_style(&style, "transform", state.transform.as_deref());
    }
}

/// Inline value of `name`; an empty string means the property is unset.
fn read_style(style: &CssStyleDeclaration, name: &str) -> Option<String> {
    style.get_property_value(name).ok().filter(|v| !v.is_empty())
}

fn write_style(style: &CssStyleDeclaration, name: &str, value: Option<&str>) {
    let result = match value {
        Some(v) => style.set_property(name, v),
        None => style.remove_property(name).map(|_| ()),
    };
    if let Err(err) = result {
        warn!(property = name, ?err, "style write failed");
    }
}

// === FRAME SCHEDULER ===

/// `requestAnimationFrame` scheduler. The callback is installed once the
/// canvas it drives exists.
pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameRequest, CanvasError> {
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            return Err(CanvasError::Scheduler("frame callback not installed".into()));
        };
        self.window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map(FrameRequest)
            .map_err(|err| CanvasError::Scheduler(format!("{err:?}")))
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Err(err) = self.window.cancel_animation_frame(request.0) {
            warn!(?err, "cancelAnimationFrame failed");
        }
    }
}

// === JS FACADE ===

/// A registered element as seen from JS.
#[wasm_bindgen]
pub struct RegisteredElement {
    element: HtmlElement,
    body_id: u32,
}

#[wasm_bindgen]
impl RegisteredElement {
    #[wasm_bindgen(getter)]
    pub fn element(&self) -> HtmlElement {
        self.element.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn body_id(&self) -> u32 {
        self.body_id
    }
}

impl From<&ManagedElement<HtmlElement>> for RegisteredElement {
    fn from(managed: &ManagedElement<HtmlElement>) -> Self {
        Self {
            element: managed.handle().clone(),
            body_id: managed.body_id().0,
        }
    }
}

/// Promise resolving to a `RegisteredElement`, or `null` if the element was
/// discarded before it ever went live.
fn registration_promise(registration: Registration<HtmlElement>) -> Promise {
    Promise::new(&mut |resolve: Function, _reject: Function| {
        registration.on_resolve(move |outcome| {
            let value = match outcome {
                Some(managed) => JsValue::from(RegisteredElement::from(managed)),
                None => JsValue::NULL,
            };
            if let Err(err) = resolve.call1(&JsValue::UNDEFINED, &value) {
                error!(?err, "registration resolve failed");
            }
        });
    })
}

/// Keeps a container's elements in sync with a physics world.
#[wasm_bindgen]
pub struct WasmCanvas {
    canvas: Rc<RefCell<BrowserCanvas>>,
    observer: ResizeObserver,
    // Owned so the observer callback outlives construction
    _on_resize: Closure<dyn FnMut(JsValue)>,
}

#[wasm_bindgen]
impl WasmCanvas {
    /// Bind to `container`. `config` is an optional JSON `CanvasConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, config: Option<String>) -> Result<WasmCanvas, JsValue> {
        let config = match config {
            Some(json) => CanvasConfig::from_json(&json)?,
            None => CanvasConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler {
            window,
            callback: callback.clone(),
        };
        let mut canvas: BrowserCanvas = Canvas::new(config, scheduler);
        canvas.bind_container(container.clone());
        let canvas = Rc::new(RefCell::new(canvas));

        let weak = Rc::downgrade(&canvas);
        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_ts: f64| {
            on_frame(&weak);
        }));

        let weak = Rc::downgrade(&canvas);
        let on_resize = Closure::<dyn FnMut(JsValue)>::new(move |_entries: JsValue| {
            if let Some(canvas) = weak.upgrade() {
                match canvas.try_borrow_mut() {
                    Ok(mut canvas) => canvas.notify_resize(clock::now_ms()),
                    Err(_) => debug!("resize notification dropped, canvas busy"),
                }
            }
        });
        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
        observer.observe(&container);

        Ok(Self {
            canvas,
            observer,
            _on_resize: on_resize,
        })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        self.canvas.borrow_mut().start().map_err(JsValue::from)
    }

    pub fn stop(&self) {
        self.canvas.borrow_mut().stop();
    }

    pub fn pause(&self) {
        self.canvas.borrow_mut().pause();
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        self.canvas.borrow_mut().resume().map_err(JsValue::from)
    }

    /// "stopped", "running" or "paused"
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        let state = match self.canvas.borrow().state() {
            LifecycleState::Stopped => "stopped",
            LifecycleState::Running => "running",
            LifecycleState::Paused => "paused",
        };
        state.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn element_count(&self) -> u32 {
        self.canvas.borrow().elements().len() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn pending_count(&self) -> u32 {
        self.canvas.borrow().pending_len() as u32
    }

    /// Register `element`; the promise settles once it is live.
    pub fn add_element(&self, element: HtmlElement) -> Result<Promise, JsValue> {
        let registration = self.canvas.borrow_mut().add_element(element)?;
        Ok(registration_promise(registration))
    }

    pub fn remove_element(&self, element: HtmlElement) -> Option<RegisteredElement> {
        self.canvas
            .borrow_mut()
            .remove_element(&element)
            .map(|managed| RegisteredElement::from(&managed))
    }

    pub fn get_element(&self, element: HtmlElement) -> Promise {
        let registration = self.canvas.borrow_mut().get_element(&element);
        registration_promise(registration)
    }

    /// Rebuild walls and drag constraint now instead of waiting for a resize.
    pub fn refresh_bounds(&self) {
        self.canvas.borrow_mut().refresh_bounds();
    }

    pub fn pointer_down(&self, client_x: f32, client_y: f32) {
        self.canvas
            .borrow_mut()
            .pointer_input(PointerEvent::Down { x: client_x, y: client_y });
    }

    pub fn pointer_move(&self, client_x: f32, client_y: f32) {
        self.canvas
            .borrow_mut()
            .pointer_input(PointerEvent::Move { x: client_x, y: client_y });
    }

    pub fn pointer_up(&self) {
        self.canvas.borrow_mut().pointer_input(PointerEvent::Up);
    }
}

impl Drop for WasmCanvas {
    fn drop(&mut self) {
        self.observer.disconnect();
        if let Ok(mut canvas) = self.canvas.try_borrow_mut() {
            canvas.stop();
        }
    }
}

fn on_frame(canvas: &Weak<RefCell<BrowserCanvas>>) {
    let Some(canvas) = canvas.upgrade() else {
        return;
    };
    let Ok(mut canvas) = canvas.try_borrow_mut() else {
        warn!("frame skipped, canvas busy");
        return;
    };
    if let Err(err) = canvas.tick(clock::now_ms()) {
        error!(%err, "frame failed");
    }
}
