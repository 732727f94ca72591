use super::{shape::edges_of, Shape, AABB};
use crate::math::{self as m, Vec2};

/// Vertices within this distance of the most extreme one along an axis
/// are considered part of the same supporting face.
const SUPPORT_FACE_TOLERANCE: f64 = 1e-3;

/// World-space geometry of a transformed shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Circle { center: Vec2, r: f64 },
    /// Vertices in counterclockwise order.
    Polygon { vertices: Vec<Vec2> },
}

/// A shape moved into world space by its body's position and rotation,
/// along with the derived values collision detection needs.
///
/// Bodies cache this and only recompute it when they've moved.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformedShape {
    geometry: Geometry,
    centroid: Vec2,
    aabb: AABB,
}

impl TransformedShape {
    pub fn new(shape: &Shape, position: Vec2, rotation: f64) -> Self {
        let geometry = match shape {
            Shape::Circle { r } => Geometry::Circle {
                center: position,
                r: *r,
            },
            Shape::Polygon(poly) => Geometry::Polygon {
                vertices: Vec::with_capacity(poly.vertices().len()),
            },
        };
        let mut ts = TransformedShape {
            geometry,
            centroid: position,
            aabb: AABB {
                min: position,
                max: position,
            },
        };
        ts.update(shape, position, rotation);
        ts
    }

    /// Recompute everything for a new position and rotation,
    /// reusing the vertex buffer.
    pub(crate) fn update(&mut self, shape: &Shape, position: Vec2, rotation: f64) {
        match (shape, &mut self.geometry) {
            (Shape::Circle { r }, Geometry::Circle { center, r: cached_r }) => {
                *center = position;
                *cached_r = *r;
                self.centroid = position;
                self.aabb = AABB::around_circle(position, *r);
            }
            (Shape::Polygon(poly), Geometry::Polygon { vertices }) => {
                vertices.clear();
                vertices.extend(
                    poly.vertices()
                        .iter()
                        .map(|v| position + m::rotate(*v, rotation)),
                );
                self.centroid = position + m::rotate(poly.centroid(), rotation);
                // polygons always have at least three vertices
                if let Some(aabb) = AABB::from_points(vertices.iter().copied()) {
                    self.aabb = aabb;
                }
            }
            // shapes never change kind, but rebuild if somebody hands us a different one
            _ => *self = Self::new(shape, position, rotation),
        }
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    #[inline]
    pub fn aabb(&self) -> AABB {
        self.aabb
    }

    /// Project the shape onto a unit axis, returning the (min, max) interval.
    pub fn project(&self, axis: Vec2) -> (f64, f64) {
        match &self.geometry {
            Geometry::Circle { center, r } => {
                let c = center.dot(axis);
                (c - r, c + r)
            }
            Geometry::Polygon { vertices } => vertices.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(min, max), v| {
                    let d = v.dot(axis);
                    (min.min(d), max.max(d))
                },
            ),
        }
    }

    /// The average of the boundary points that are furthest along a unit axis.
    ///
    /// For a circle this is the single point in the direction of the axis.
    /// For a polygon it's either the extreme vertex
    /// or the middle of the edge facing the axis.
    pub fn support_point(&self, axis: Vec2) -> Vec2 {
        match &self.geometry {
            Geometry::Circle { center, r } => *center + *r * axis,
            Geometry::Polygon { vertices } => {
                let max = vertices
                    .iter()
                    .map(|v| v.dot(axis))
                    .fold(f64::NEG_INFINITY, f64::max);
                let (sum, count) = vertices
                    .iter()
                    .filter(|v| max - v.dot(axis) <= SUPPORT_FACE_TOLERANCE)
                    .fold((Vec2::zero(), 0usize), |(sum, count), v| (sum + *v, count + 1));
                sum / count.max(1) as f64
            }
        }
    }

    /// Outward normals of the edges, not normalized.
    /// Circles have none.
    pub fn edge_normals(&self) -> impl Iterator<Item = Vec2> + '_ {
        let vertices: &[Vec2] = match &self.geometry {
            Geometry::Circle { .. } => &[],
            Geometry::Polygon { vertices } => vertices,
        };
        edges_of(vertices).map(|(start, end)| m::right_normal(end - start))
    }
}
