//! Collision response: impulses and positional correction for one contact.

use super::{collision::Penetration, Body};
use crate::math::Vec2;

/// How detected collisions are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionMode {
    /// Exchange an impulse between the bodies and nudge them apart.
    #[default]
    Impulse,
    /// Only push the bodies apart, fully, without touching velocities.
    ///
    /// Nothing ever cancels gravity, so a body resting on a static one keeps
    /// gaining downward speed while being pushed back up every step.
    /// Once it moves further in one step than the distance to the other body's
    /// centerline, it gets pushed out the far side and falls through.
    PositionalOnly,
}

/// What [`resolve`][self::resolve] ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved,
    /// Neither body can move, so there was nothing to do.
    SkippedStatic,
}

/// Resolve a collision between two bodies.
///
/// `pen.axis` must point from `a` towards `b`,
/// and `contact_points` are the world-space points of contact on `a` and `b` respectively.
///
/// The impulse is split between the bodies in proportion to their masses,
/// not their inverse masses. This makes collisions with a light static body
/// bouncier than the restitution alone would suggest; it's part of how the
/// simulation is tuned, so keep it.
///
/// `correction_factor` is the fraction of the penetration removed
/// by positional correction in impulse mode. Positional-only mode always removes all of it.
pub fn resolve(
    a: &mut Body,
    b: &mut Body,
    pen: &Penetration,
    contact_points: [Vec2; 2],
    mode: ResolutionMode,
    correction_factor: f64,
) -> ResolveOutcome {
    let inv_mass_sum = a.inverse_mass() + b.inverse_mass();
    if inv_mass_sum == 0.0 {
        log::debug!("two static bodies reached collision resolution, skipping");
        return ResolveOutcome::SkippedStatic;
    }

    match mode {
        ResolutionMode::Impulse => {
            let normal = *pen.axis;
            let normal_vel = (b.velocity.linear - a.velocity.linear).dot(normal);
            let restitution = a.restitution.min(b.restitution);
            let impulse_mag = (1.0 + restitution) * normal_vel / inv_mass_sum;
            let impulse = impulse_mag * normal;

            let mass_sum = a.mass() + b.mass();
            let impulse_a = (a.mass() / mass_sum) * impulse;
            let impulse_b = -(b.mass() / mass_sum) * impulse;

            let offset_a = contact_points[0] - a.transformed.centroid();
            let offset_b = contact_points[1] - b.transformed.centroid();
            a.apply_impulse(impulse_a, offset_a);
            b.apply_impulse(impulse_b, offset_b);

            correct_positions(a, b, pen, inv_mass_sum, correction_factor);
        }
        ResolutionMode::PositionalOnly => {
            correct_positions(a, b, pen, inv_mass_sum, 1.0);
        }
    }

    ResolveOutcome::Resolved
}

fn correct_positions(
    a: &mut Body,
    b: &mut Body,
    pen: &Penetration,
    inv_mass_sum: f64,
    factor: f64,
) {
    let correction = pen.depth / inv_mass_sum * factor * *pen.axis;
    // translating a static body by zero would still dirty its transform
    if !a.is_static {
        a.translate(-a.inverse_mass() * correction);
    }
    if !b.is_static {
        b.translate(b.inverse_mass() * correction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::Unit,
        physics::{collision::Shape, BodyBuilder, Velocity},
    };

    fn ball(mass: f64, x: f64, vel_x: f64, restitution: f64) -> Body {
        BodyBuilder::new(Shape::new_circle(1.0).unwrap(), mass)
            .with_position([x, 0.0])
            .with_velocity(Velocity {
                linear: Vec2::new(vel_x, 0.0),
                angular: 0.0,
            })
            .with_restitution(restitution)
            .build()
            .unwrap()
    }

    fn head_on() -> Penetration {
        Penetration {
            axis: Unit::unit_x(),
            depth: 0.5,
        }
    }

    fn centers(a: &Body, b: &Body) -> [Vec2; 2] {
        [a.transformed().centroid(), b.transformed().centroid()]
    }

    #[test]
    fn impulse_split_by_mass() {
        let mut a = ball(3.0, 0.0, 1.0, 1.0);
        let mut b = ball(1.0, 1.5, -1.0, 1.0);
        let points = centers(&a, &b);
        let outcome = resolve(&mut a, &mut b, &head_on(), points, ResolutionMode::Impulse, 0.2);
        assert_eq!(outcome, ResolveOutcome::Resolved);

        // j = 2 * -2 / (1/3 + 1) = -3, a gets 3/4 of it and b gets 1/4 the other way
        assert!((a.velocity.linear.x - (1.0 - 0.75)).abs() < 1e-12);
        assert!((b.velocity.linear.x - (-1.0 + 0.75)).abs() < 1e-12);
        assert_eq!(a.velocity.angular, 0.0);

        // correction = 0.5 / (4/3) * 0.2
        let correction = 0.075;
        assert!((a.position().x + correction / 3.0).abs() < 1e-12);
        assert!((b.position().x - (1.5 + correction)).abs() < 1e-12);
    }

    #[test]
    fn positional_only_separates_fully() {
        let mut a = ball(1.0, 0.0, 1.0, 0.5);
        let mut b = ball(1.0, 1.5, -1.0, 0.5);
        let points = centers(&a, &b);
        resolve(
            &mut a,
            &mut b,
            &head_on(),
            points,
            ResolutionMode::PositionalOnly,
            0.2,
        );
        assert_eq!(a.velocity.linear.x, 1.0);
        assert_eq!(b.velocity.linear.x, -1.0);
        assert!((a.position().x + 0.25).abs() < 1e-12);
        assert!((b.position().x - 1.75).abs() < 1e-12);
    }

    #[test]
    fn static_pairs_are_skipped() {
        let floor = |x: f64| {
            BodyBuilder::new(Shape::new_rect(2.0, 2.0).unwrap(), 1.0)
                .with_position([x, 0.0])
                .make_static()
                .build()
                .unwrap()
        };
        let mut a = floor(0.0);
        let mut b = floor(1.0);
        let points = centers(&a, &b);
        let outcome = resolve(&mut a, &mut b, &head_on(), points, ResolutionMode::Impulse, 0.2);
        assert_eq!(outcome, ResolveOutcome::SkippedStatic);
        assert_eq!(a.position(), Vec2::zero());
        assert_eq!(b.position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn static_side_stays_put() {
        let mut wall = BodyBuilder::new(Shape::new_rect(2.0, 2.0).unwrap(), 1.0)
            .make_static()
            .build()
            .unwrap();
        let mut b = ball(1.0, 1.5, -2.0, 0.0);
        let points = centers(&wall, &b);
        resolve(&mut wall, &mut b, &head_on(), points, ResolutionMode::Impulse, 0.2);
        assert_eq!(wall.position(), Vec2::zero());
        assert_eq!(wall.velocity.linear, Vec2::zero());
        // j = -2 / 1, b gets half of it back
        assert!((b.velocity.linear.x - (-2.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn off_center_contact_spins() {
        let mut a = ball(1.0, 0.0, 0.0, 0.0);
        let mut b = ball(1.0, 1.5, -1.0, 0.0);
        let points = [Vec2::new(1.0, 0.5), Vec2::new(0.5, 0.5)];
        resolve(&mut a, &mut b, &head_on(), points, ResolutionMode::Impulse, 0.2);
        assert!(a.velocity.angular != 0.0);
        assert!(b.velocity.angular != 0.0);
    }
}
