//! Separating axis test between two transformed shapes.

use super::{Geometry, TransformedShape};
use crate::math::{Unit, Vec2};

/// Candidate axes shorter than this can't be normalized reliably and are skipped.
const MIN_AXIS_MAGNITUDE: f64 = 1e-9;

/// The minimum translation vector between two overlapping shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Penetration {
    /// Axis of least penetration, pointing from the first shape towards the second.
    pub axis: Unit<Vec2>,
    /// Overlap along the axis. Always positive.
    pub depth: f64,
}

/// Test two shapes for overlap using the separating axis theorem.
///
/// The candidate axes are the edge normals of every polygon involved,
/// plus the axis from a circle's center to the nearest vertex of a polygon
/// (or the axis between centers for two circles).
/// Returns None if the shapes are separated on any axis,
/// including when they only touch (zero overlap).
/// Ties between axes with equal overlap go to the one tested first.
pub fn minimum_translation_vector(
    a: &TransformedShape,
    b: &TransformedShape,
) -> Option<Penetration> {
    let mut best: Option<(Unit<Vec2>, f64)> = None;
    for candidate in candidate_axes(a, b) {
        let axis = match Unit::try_new(candidate, MIN_AXIS_MAGNITUDE) {
            Some(axis) => axis,
            None => continue,
        };
        let (min_a, max_a) = a.project(*axis);
        let (min_b, max_b) = b.project(*axis);
        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap <= 0.0 {
            return None;
        }
        if best.map_or(true, |(_, depth)| overlap < depth) {
            best = Some((axis, overlap));
        }
    }

    let (axis, depth) = match best {
        Some(b) => b,
        None => {
            // Every candidate axis was vanishingly small. Validated polygons
            // always contribute nonzero edge normals and two circles always
            // get an axis, so this only guards against shapes built some other way.
            log::debug!("degenerate collision axis, ignoring the pair this step");
            return None;
        }
    };

    let centroid_dist = b.centroid() - a.centroid();
    let axis = if axis.dot(centroid_dist) < 0.0 {
        -axis
    } else {
        axis
    };
    Some(Penetration { axis, depth })
}

fn candidate_axes(a: &TransformedShape, b: &TransformedShape) -> Vec<Vec2> {
    let mut axes: Vec<Vec2> = a.edge_normals().chain(b.edge_normals()).collect();
    match (a.geometry(), b.geometry()) {
        (Geometry::Circle { center: c1, .. }, Geometry::Circle { center: c2, .. }) => {
            let dist = *c2 - *c1;
            // concentric circles overlap on every axis, pick one
            axes.push(if dist.mag_sq() > MIN_AXIS_MAGNITUDE * MIN_AXIS_MAGNITUDE {
                dist
            } else {
                Vec2::unit_x()
            });
        }
        (Geometry::Circle { center, .. }, Geometry::Polygon { vertices })
        | (Geometry::Polygon { vertices }, Geometry::Circle { center, .. }) => {
            if let Some(nearest) = nearest_vertex(vertices, *center) {
                axes.push(nearest - *center);
            }
        }
        (Geometry::Polygon { .. }, Geometry::Polygon { .. }) => (),
    }
    axes
}

fn nearest_vertex(vertices: &[Vec2], point: Vec2) -> Option<Vec2> {
    vertices
        .iter()
        .copied()
        .min_by(|v1, v2| (*v1 - point).mag_sq().total_cmp(&(*v2 - point).mag_sq()))
}
