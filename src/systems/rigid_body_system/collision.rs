use crate::core::Vec2;
use crate::systems::physics::BodyShape;
use crate::systems::rigid_body::RigidBody;

/// Penetration of `a` into `b` along the axis of least overlap.
///
/// The returned normal points from `b` towards `a`; `None` if the bounds do
/// not overlap.
pub(super) fn penetration(a: &RigidBody, b: &RigidBody) -> Option<(Vec2, f32)> {
    let dx = a.pos.x - b.pos.x;
    let dy = a.pos.y - b.pos.y;
    let overlap_x = a.half_width + b.half_width - dx.abs();
    let overlap_y = a.half_height + b.half_height - dy.abs();

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    if overlap_x < overlap_y {
        let nx = if dx < 0.0 { -1.0 } else { 1.0 };
        Some((Vec2::new(nx, 0.0), overlap_x))
    } else {
        let ny = if dy < 0.0 { -1.0 } else { 1.0 };
        Some((Vec2::new(0.0, ny), overlap_y))
    }
}

/// Separate two overlapping bodies and exchange the normal impulse.
///
/// Static bodies (zero inverse mass) never move.
pub(super) fn resolve(a: &mut RigidBody, b: &mut RigidBody, normal: Vec2, depth: f32) {
    let inv_sum = a.inverse_mass + b.inverse_mass;
    if inv_sum == 0.0 {
        return;
    }

    // Positional correction split by inverse mass.
    a.pos = a.pos + normal * (depth * a.inverse_mass / inv_sum);
    b.pos = b.pos - normal * (depth * b.inverse_mass / inv_sum);

    let relative = a.velocity - b.velocity;
    let along_normal = relative.x * normal.x + relative.y * normal.y;
    if along_normal >= 0.0 {
        return;
    }

    let restitution = a.material.restitution.max(b.material.restitution);
    let j = -(1.0 + restitution) * along_normal / inv_sum;
    let impulse = normal * j;
    a.apply_impulse(impulse);
    b.apply_impulse(impulse * -1.0);

    // Coulomb-ish friction on the tangent axis.
    let tangent = Vec2::new(-normal.y, normal.x);
    let friction = (a.material.friction + b.material.friction) * 0.5;
    let keep = (1.0 - friction).clamp(0.0, 1.0);
    for body in [a, b] {
        if body.is_static {
            continue;
        }
        let vt = body.velocity.x * tangent.x + body.velocity.y * tangent.y;
        body.velocity = body.velocity - tangent * (vt * (1.0 - keep));
        if let BodyShape::Circle { radius } = body.shape {
            if radius > 0.0 {
                // Rolling: spin follows the remaining tangential speed.
                body.angular_vel = vt * keep / radius;
            }
        }
    }
}
