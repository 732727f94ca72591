use super::Body;
use crate::math::{self as m, Vec2};

/// Advance a body's velocity, position and rotation by one time step
/// using semi-implicit Euler integration, then apply drag.
///
/// Gravity pulls along the negative y axis.
/// Drag subtracts `drag * dt` times the velocity, with the velocity's magnitude
/// clamped to 1 first so drag can't overshoot and reverse a fast body.
/// Accumulated force and torque are consumed.
/// Static bodies are left untouched.
pub fn integrate(body: &mut Body, dt: f64, gravity: f64, drag: f64) {
    if body.is_static {
        return;
    }

    let accel = body.force * body.inverse_mass() - Vec2::unit_y() * gravity;
    body.velocity.linear += accel * dt;
    body.position += body.velocity.linear * dt;

    let ang_accel = body.torque * body.inverse_moment_of_inertia();
    body.velocity.angular += ang_accel * dt;
    body.rotation += body.velocity.angular * dt;

    body.velocity.linear -= m::clamp_magnitude(body.velocity.linear, 1.0) * drag * dt;
    body.velocity.angular -= m::clamp_magnitude_scalar(body.velocity.angular, 1.0) * drag * dt;

    body.force = Vec2::zero();
    body.torque = 0.0;
    body.dirty_transform = true;
}
