//! Intersection queries for points vs. shapes.

use super::Shape;
use crate::math::{self as m, Vec2};

/// Check whether or not a world-space point intersects with a shape
/// placed at the given position and rotation.
pub fn point_in_shape(point: Vec2, position: Vec2, rotation: f64, shape: &Shape) -> bool {
    let p_wrt_shape = m::rotate(point - position, -rotation);
    shape.contains_local_point(p_wrt_shape)
}
