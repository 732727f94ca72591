use super::{
    collision::{query, Shape, ShapeError, TransformedShape},
    Velocity,
};
use crate::math::{self as m, Angle, Vec2};

/// An error when building a [`Body`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BodyError {
    #[error("Mass must be positive and finite, got {0}")]
    InvalidMass(f64),
    #[error("Restitution must be between 0 and 1, got {0}")]
    InvalidRestitution(f64),
    #[error("Invalid shape")]
    Shape(#[from] ShapeError),
}

/// A rigid body with a shape, moved around by the physics world.
///
/// Static bodies have a mass like any other, but their inverse mass and
/// inverse moment of inertia are zero, so nothing in the simulation moves them.
/// Only explicitly setting their position does.
#[derive(Clone, Debug)]
pub struct Body {
    pub(crate) shape: Shape,
    pub(crate) mass: Mass,
    pub(crate) moment_of_inertia: Mass,
    pub(crate) position: Vec2,
    /// Rotation in radians.
    pub(crate) rotation: f64,
    pub velocity: Velocity,
    pub(crate) force: Vec2,
    pub(crate) torque: f64,
    pub(crate) restitution: f64,
    pub(crate) is_static: bool,
    pub(crate) dirty_transform: bool,
    pub(crate) transformed: TransformedShape,
    pub(crate) contact: Option<Vec2>,
}

impl Body {
    // accessors

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The mass of the body. Finite even for static bodies.
    pub fn mass(&self) -> f64 {
        self.mass.mass()
    }

    /// Returns the inverse mass of the body, which is zero for static bodies.
    pub fn inverse_mass(&self) -> f64 {
        if self.is_static {
            0.0
        } else {
            self.mass.inv()
        }
    }

    pub fn moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia.mass()
    }

    /// Returns the inverse moment of inertia, which is zero for static bodies.
    pub fn inverse_moment_of_inertia(&self) -> f64 {
        if self.is_static {
            0.0
        } else {
            self.moment_of_inertia.inv()
        }
    }

    /// Force accumulated since the last step.
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Torque accumulated since the last step.
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// The world-space shape as of the last transform refresh.
    pub fn transformed(&self) -> &TransformedShape {
        &self.transformed
    }

    /// Whether the body has moved since its transformed shape was last computed.
    pub fn is_transform_dirty(&self) -> bool {
        self.dirty_transform
    }

    /// The point where this body was last touched by another,
    /// if it collided with anything during the last step.
    pub fn contact(&self) -> Option<Vec2> {
        self.contact
    }

    // mutation

    /// Move the body directly, bypassing the simulation.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.dirty_transform = true;
    }

    pub fn set_rotation(&mut self, rotation: Angle) {
        self.rotation = rotation.rad();
        self.dirty_transform = true;
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        self.dirty_transform = true;
    }

    /// Make the body static or dynamic.
    ///
    /// A body becoming static stops moving and forgets any accumulated forces.
    pub fn set_static(&mut self, is_static: bool) {
        if is_static {
            self.velocity = Velocity::default();
            self.force = Vec2::zero();
            self.torque = 0.0;
        }
        self.is_static = is_static;
    }

    /// Accumulate a force to be applied on the next step,
    /// acting at `offset` from the body's centroid.
    /// Has no effect on static bodies.
    pub fn apply_force(&mut self, force: Vec2, offset: Vec2) {
        if self.is_static {
            return;
        }
        self.force += force;
        self.torque += m::cross(offset, force);
    }

    /// Immediately change the body's velocity with an impulse
    /// acting at `offset` from the body's centroid.
    /// Has no effect on static bodies.
    pub fn apply_impulse(&mut self, impulse: Vec2, offset: Vec2) {
        self.velocity.linear += impulse * self.inverse_mass();
        self.velocity.angular += m::cross(offset, impulse) * self.inverse_moment_of_inertia();
    }

    /// Recompute the world-space shape if the body has moved since the last time.
    /// Returns whether anything was recomputed.
    pub fn refresh_transform(&mut self) -> bool {
        if !self.dirty_transform {
            return false;
        }
        self.transformed
            .update(&self.shape, self.position, self.rotation);
        self.dirty_transform = false;
        true
    }

    /// Check whether a world-space point is inside the body's shape.
    pub fn contains_point(&self, point: Vec2) -> bool {
        query::point_in_shape(point, self.position, self.rotation, &self.shape)
    }
}

/// A builder to create [`Body`]s.
///
/// # Example
/// ```
/// # use impulse2d::{BodyBuilder, Shape};
/// let ball = BodyBuilder::new(Shape::new_circle(1.0)?, 10.0)
///     .with_position([0.0, 5.0])
///     .with_restitution(0.5)
///     .build()?;
/// assert_eq!(ball.inverse_mass(), 0.1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct BodyBuilder {
    shape: Shape,
    mass: f64,
    position: [f64; 2],
    rotation: Angle,
    velocity: Velocity,
    restitution: f64,
    is_static: bool,
}

impl BodyBuilder {
    pub fn new(shape: Shape, mass: f64) -> Self {
        BodyBuilder {
            shape,
            mass,
            position: [0.0, 0.0],
            rotation: Angle::default(),
            velocity: Velocity::default(),
            restitution: 0.0,
            is_static: false,
        }
    }

    #[inline]
    pub fn with_position(mut self, pos: impl Into<[f64; 2]>) -> Self {
        self.position = pos.into();
        self
    }

    #[inline]
    pub fn with_rotation(mut self, angle: Angle) -> Self {
        self.rotation = angle;
        self
    }

    #[inline]
    pub fn with_velocity(mut self, vel: Velocity) -> Self {
        self.velocity = vel;
        self
    }

    #[inline]
    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    /// Make the body static.
    #[inline]
    pub fn make_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn build(self) -> Result<Body, BodyError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(BodyError::InvalidMass(self.mass));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(BodyError::InvalidRestitution(self.restitution));
        }

        let position = Vec2::new(self.position[0], self.position[1]);
        let rotation = self.rotation.rad();
        let transformed = TransformedShape::new(&self.shape, position, rotation);
        let moment_of_inertia = Mass::new(self.shape.moment_of_inertia_coef() * self.mass);
        let mut body = Body {
            mass: Mass::new(self.mass),
            moment_of_inertia,
            shape: self.shape,
            position,
            rotation,
            velocity: self.velocity,
            force: Vec2::zero(),
            torque: 0.0,
            restitution: self.restitution,
            is_static: false,
            dirty_transform: false,
            transformed,
            contact: None,
        };
        body.set_static(self.is_static);
        Ok(body)
    }
}

/// This stores both a mass value and its inverse, because calculating inverse mass
/// is expensive and needed a lot in physics calculations.
#[derive(Clone, Copy, Debug)]
pub struct Mass {
    mass: f64,
    inverse: f64,
}

impl Mass {
    pub fn new(mass: f64) -> Self {
        Mass {
            mass,
            inverse: 1.0 / mass,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv(&self) -> f64 {
        self.inverse
    }
}
