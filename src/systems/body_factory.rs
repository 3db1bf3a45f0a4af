use crate::core::{CanvasError, Rect, Vec2};
use crate::domain::shapes::{ShapeKind, ShapeParams};
use crate::systems::physics::{BodyDescriptor, BodyMaterial, BodyShape};

/// Build a body descriptor for an element.
///
/// `element` and `container` are both client rects; the body is centered on
/// the element's center expressed in container coordinates. Circles take
/// half the element width as radius.
pub fn build_body(element: Rect, container: Rect, params: &ShapeParams) -> Result<BodyDescriptor, CanvasError> {
    params.validate()?;

    let position = Vec2::new(
        (element.x - container.x) + element.width / 2.0,
        (element.y - container.y) + element.height / 2.0,
    );
    if !position.is_finite() {
        return Err(CanvasError::InvalidShape { field: "position", value: f32::NAN });
    }

    let shape = match params.kind {
        ShapeKind::Rectangle => BodyShape::Rectangle {
            width: element.width,
            height: element.height,
            chamfer: params.radius,
        },
        ShapeKind::Circle => BodyShape::Circle { radius: element.width / 2.0 },
    };

    Ok(BodyDescriptor {
        position,
        shape,
        material: BodyMaterial {
            density: params.density,
            friction: params.friction,
            friction_air: params.friction_air,
            friction_static: params.friction_static,
            restitution: params.restitution,
        },
        is_static: params.is_static,
    })
}
