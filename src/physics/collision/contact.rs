use super::TransformedShape;
use crate::math::{Unit, Vec2};

/// How the point of contact on a colliding shape is estimated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactMode {
    /// Use the centroid of the shape. Cheap, but never produces any spin.
    Centroid,
    /// Average the boundary points furthest along the collision axis.
    #[default]
    Precise,
}

/// Estimate where a shape is touching another one.
///
/// `axis` must point from this shape towards the other one,
/// so the two sides of a collision pass opposite axes.
pub fn contact_point(shape: &TransformedShape, axis: Unit<Vec2>, mode: ContactMode) -> Vec2 {
    match mode {
        ContactMode::Centroid => shape.centroid(),
        ContactMode::Precise => shape.support_point(*axis),
    }
}
