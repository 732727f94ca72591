use crate::math::{self as m, Vec2};
use rand::{seq::SliceRandom, Rng};

/// Polygons with less area than this are rejected as degenerate.
const MIN_POLYGON_AREA: f64 = 1e-9;
/// How far past zero the turn at a vertex is allowed to go before
/// the polygon is considered concave.
const CONVEXITY_TOLERANCE: f64 = 1e-9;

/// An error when constructing a [`Shape`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("Circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("A convex polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("Vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
    #[error("Vertex {0} is a duplicate of the vertex before it")]
    DuplicateVertex(usize),
    #[error("Polygon is not convex at vertex {0}")]
    NotConvex(usize),
    #[error("Polygon has zero area")]
    ZeroArea,
}

/// The physical shape of a body in its local coordinate space.
///
/// Shapes are immutable once created.
#[derive(Clone, Debug)]
pub enum Shape {
    Circle { r: f64 },
    Polygon(ConvexPolygon),
}

impl Shape {
    /// Create a circle from a radius.
    pub fn new_circle(r: f64) -> Result<Self, ShapeError> {
        if !(r.is_finite() && r > 0.0) {
            return Err(ShapeError::InvalidRadius(r));
        }
        Ok(Shape::Circle { r })
    }

    /// Create a convex polygon from vertices in local space.
    /// See [`ConvexPolygon::new`][self::ConvexPolygon::new].
    pub fn new_polygon(vertices: impl Into<Vec<Vec2>>) -> Result<Self, ShapeError> {
        ConvexPolygon::new(vertices).map(Shape::Polygon)
    }

    /// Create a rectangle centered on the local origin.
    pub fn new_rect(width: f64, height: f64) -> Result<Self, ShapeError> {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new_polygon(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Create a regular polygon with `n` vertices on a circle of radius `r`.
    pub fn new_regular_polygon(n: usize, r: f64) -> Result<Self, ShapeError> {
        let step = std::f64::consts::TAU / n as f64;
        let vertices: Vec<Vec2> = (0..n)
            .map(|i| m::rotate(Vec2::new(r, 0.0), i as f64 * step))
            .collect();
        Self::new_polygon(vertices)
    }

    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle { r } => std::f64::consts::PI * r * r,
            Shape::Polygon(poly) => poly.area,
        }
    }

    /// Moment of inertia about the centroid for a body of unit mass.
    pub fn moment_of_inertia_coef(&self) -> f64 {
        match self {
            Shape::Circle { r } => r * r / 2.0,
            Shape::Polygon(poly) => poly.second_moment / poly.area,
        }
    }

    /// Centroid of the shape in local space.
    pub fn local_centroid(&self) -> Vec2 {
        match self {
            Shape::Circle { .. } => Vec2::zero(),
            Shape::Polygon(poly) => poly.centroid,
        }
    }

    /// Check whether a point given in local space is inside the shape.
    /// Points on the boundary count as inside.
    pub fn contains_local_point(&self, point: Vec2) -> bool {
        match self {
            Shape::Circle { r } => point.mag_sq() <= r * r,
            Shape::Polygon(poly) => poly.edges().all(|(start, end)| {
                // vertices are counterclockwise so the inside is on the left of every edge
                m::cross(end - start, point - start) >= 0.0
            }),
        }
    }
}

/// A convex polygon with its vertices in counterclockwise order.
#[derive(Clone, Debug)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
    centroid: Vec2,
    area: f64,
    /// Polar second moment of area about the centroid.
    second_moment: f64,
}

impl ConvexPolygon {
    /// Create a polygon from vertices in local space.
    ///
    /// The vertices may be given in either winding order,
    /// they're stored counterclockwise.
    /// Fails if there are fewer than three vertices, the polygon isn't convex,
    /// or it has no area.
    pub fn new(vertices: impl Into<Vec<Vec2>>) -> Result<Self, ShapeError> {
        let mut vertices: Vec<Vec2> = vertices.into();
        if vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(vertices.len()));
        }
        if let Some(idx) = vertices
            .iter()
            .position(|v| !(v.x.is_finite() && v.y.is_finite()))
        {
            return Err(ShapeError::NonFiniteVertex(idx));
        }
        let n = vertices.len();
        if let Some(idx) = (0..n).find(|&i| vertices[i] == vertices[(i + n - 1) % n]) {
            return Err(ShapeError::DuplicateVertex(idx));
        }

        let (mut area, mut centroid, mut second_moment) = mass_properties(&vertices);
        if area.abs() < MIN_POLYGON_AREA {
            return Err(ShapeError::ZeroArea);
        }
        if area < 0.0 {
            vertices.reverse();
            let props = mass_properties(&vertices);
            area = props.0;
            centroid = props.1;
            second_moment = props.2;
        }

        for i in 0..n {
            let prev = vertices[(i + n - 1) % n];
            let curr = vertices[i];
            let next = vertices[(i + 1) % n];
            if m::cross(curr - prev, next - curr) < -CONVEXITY_TOLERANCE {
                return Err(ShapeError::NotConvex(i));
            }
        }

        Ok(ConvexPolygon {
            vertices,
            centroid,
            area,
            second_moment: second_moment - area * centroid.mag_sq(),
        })
    }

    /// Generate a random convex polygon with `n` vertices
    /// fitting in a square with side length `scale`, centered on the origin.
    ///
    /// Uses Valtr's algorithm: random x and y coordinates are split into two chains each,
    /// turned into edge vectors that sum to zero,
    /// and the edges are sorted by angle and laid end to end.
    pub fn random(rng: &mut impl Rng, n: usize, scale: f64) -> Result<Self, ShapeError> {
        if n < 3 {
            return Err(ShapeError::TooFewVertices(n));
        }

        let mut x_components = random_chain_components(rng, n);
        let y_components = random_chain_components(rng, n);
        x_components.shuffle(rng);

        let mut edges: Vec<Vec2> = x_components
            .into_iter()
            .zip(y_components)
            .map(|(x, y)| Vec2::new(x, y))
            .collect();
        edges.sort_by(|a, b| a.y.atan2(a.x).total_cmp(&b.y.atan2(b.x)));

        let mut vertices = Vec::with_capacity(n);
        let mut point = Vec2::zero();
        for edge in edges {
            vertices.push(point);
            point += edge;
        }

        let min = vertices
            .iter()
            .fold(vertices[0], |acc, v| acc.min_by_component(*v));
        let max = vertices
            .iter()
            .fold(vertices[0], |acc, v| acc.max_by_component(*v));
        let center = (min + max) / 2.0;
        for v in &mut vertices {
            *v = (*v - center) * scale;
        }

        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Iterate over the edges of the polygon as (start, end) pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        edges_of(&self.vertices)
    }
}

/// Iterate over the edges of a closed polygon as (start, end) pairs.
pub(crate) fn edges_of(vertices: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(start, end)| (*start, *end))
}

/// Signed area, centroid and polar second moment of area about the origin.
/// Area is positive for counterclockwise polygons.
fn mass_properties(vertices: &[Vec2]) -> (f64, Vec2, f64) {
    let mut area = 0.0;
    let mut centroid_acc = Vec2::zero();
    let mut second_moment = 0.0;
    for (a, b) in edges_of(vertices) {
        let cross = m::cross(a, b);
        area += cross;
        centroid_acc += (a + b) * cross;
        second_moment += cross * (a.dot(a) + a.dot(b) + b.dot(b));
    }
    area /= 2.0;
    let centroid = if area != 0.0 {
        centroid_acc / (6.0 * area)
    } else {
        Vec2::zero()
    };
    (area, centroid, second_moment / 12.0)
}

/// Pick `n` random coordinates, split them into two chains between the extreme values
/// and return the differences along the chains. The result sums to zero.
fn random_chain_components(rng: &mut impl Rng, n: usize) -> Vec<f64> {
    let mut coords: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
    coords.sort_by(f64::total_cmp);
    let min = coords[0];
    let max = coords[n - 1];

    let mut components = Vec::with_capacity(n);
    let mut last_top = min;
    let mut last_bot = min;
    for &c in &coords[1..n - 1] {
        if rng.gen::<bool>() {
            components.push(c - last_top);
            last_top = c;
        } else {
            components.push(last_bot - c);
            last_bot = c;
        }
    }
    components.push(max - last_top);
    components.push(last_bot - max);
    components
}
