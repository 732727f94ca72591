//! Collision detection: shapes, their cached world-space form,
//! and the broad and narrow phase tests run on them.

use crate::math::Vec2;

pub mod shape;
pub use shape::{ConvexPolygon, Shape, ShapeError};

pub mod transformed;
pub use transformed::{Geometry, TransformedShape};

pub mod broadphase;
pub use broadphase::{BroadPhase, BruteForce};

pub mod narrowphase;
pub use narrowphase::{minimum_translation_vector, Penetration};

pub mod contact;
pub use contact::{contact_point, ContactMode};

pub mod query;

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// The smallest box containing all the given points.
    ///
    /// Returns None if there are no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            AABB {
                min: first,
                max: first,
            },
            |aabb, p| AABB {
                min: aabb.min.min_by_component(p),
                max: aabb.max.max_by_component(p),
            },
        ))
    }

    /// A box around a circle.
    pub fn around_circle(center: Vec2, r: f64) -> Self {
        AABB {
            min: center - Vec2::broadcast(r),
            max: center + Vec2::broadcast(r),
        }
    }

    /// Check whether two boxes overlap.
    ///
    /// Boxes are closed on both axes, so boxes that only touch count as overlapping.
    #[inline]
    pub fn overlaps(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Check whether two boxes overlap, see [`AABB::overlaps`][self::AABB::overlaps].
#[inline]
pub fn aabb_overlap(a: &AABB, b: &AABB) -> bool {
    a.overlaps(b)
}
