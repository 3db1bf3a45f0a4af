//! Visual elements as seen by the canvas.

use crate::core::{CanvasError, Rect, Size, Vec2};
use crate::domain::shapes::ShapeParams;
use crate::systems::physics::{BodyId, BodyState, PhysicsWorld};
use crate::systems::render_batch::RenderBatch;

/// Anything with on-screen geometry (elements and the container).
pub trait Surface {
    /// Border box in client (viewport) coordinates.
    fn bounding_rect(&self) -> Rect;

    /// Inner size without borders or scrollbars.
    fn client_size(&self) -> Size;
}

/// Caller-owned visual element.
///
/// `PartialEq` is identity: two handles are equal when they refer to the same
/// element. Handles are cheap to clone and mutate the element through `&self`.
pub trait ElementHandle: Surface + Clone + PartialEq + 'static {
    fn shape_params(&self) -> Result<ShapeParams, CanvasError>;

    fn presentation(&self) -> PresentationState;

    fn set_presentation(&self, state: &PresentationState);
}

/// Inline presentation properties the canvas writes. `None` means unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresentationState {
    pub position: Option<String>,
    pub top: Option<String>,
    pub left: Option<String>,
    pub transform: Option<String>,
}

/// Where an element's top-left corner goes and how it is rotated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementTransform {
    pub translate: Vec2,
    pub angle: f32,
}

impl ElementTransform {
    /// Place an element of `size` so its center sits on `center`.
    pub fn centered(center: Vec2, angle: f32, size: Size) -> Self {
        Self {
            translate: Vec2::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            angle,
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}rad)",
            self.translate.x, self.translate.y, self.angle
        )
    }

    /// Presentation that pins the element to the container origin and
    /// moves it with a transform.
    pub fn presentation(&self) -> PresentationState {
        PresentationState {
            position: Some("absolute".into()),
            top: Some("0".into()),
            left: Some("0".into()),
            transform: Some(self.to_css()),
        }
    }
}

/// A registered element paired with its body.
#[derive(Clone, Debug)]
pub struct ManagedElement<E> {
    handle: E,
    original: PresentationState,
    body_id: BodyId,
}

impl<E: ElementHandle> ManagedElement<E> {
    pub(crate) fn new(handle: E, original: PresentationState, body_id: BodyId) -> Self {
        Self { handle, original, body_id }
    }

    pub fn handle(&self) -> &E {
        &self.handle
    }

    /// Presentation captured at registration.
    pub fn original(&self) -> &PresentationState {
        &self.original
    }

    pub fn body_id(&self) -> BodyId {
        self.body_id
    }

    pub fn body<W: PhysicsWorld>(&self, world: &W) -> Option<BodyState> {
        world.body(self.body_id)
    }

    /// Read the body now, queue the presentation write for later.
    ///
    /// Returns `false` (and queues nothing) if the world no longer knows the
    /// body.
    pub fn compute_transform<W: PhysicsWorld>(&self, world: &W, batch: &mut RenderBatch) -> bool {
        let Some(state) = world.body(self.body_id) else {
            return false;
        };
        let transform = ElementTransform::centered(state.position, state.angle, self.handle.client_size());
        let handle = self.handle.clone();
        batch.push(move || handle.set_presentation(&transform.presentation()));
        true
    }

    pub(crate) fn restore(&self) {
        self.handle.set_presentation(&self.original);
    }

    pub(crate) fn into_handle(self) -> E {
        self.handle
    }
}
