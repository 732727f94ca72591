//! A small 2D rigid body simulation of circles and convex polygons,
//! with impulse-based collision response.

// Profiling span that does nothing unless a tracy client is running.
macro_rules! tracy_span {
    ($name:literal) => {
        tracy_client::Client::running()
            .map(|client| client.span(tracy_client::span_location!($name), 0))
    };
}

pub mod math;
pub use math::{uv, Angle, Unit, Vec2};

pub mod config;
pub use config::{ConfigError, ConfigValue, SpawnShape, WorldConfig};

pub mod physics;
pub use physics::{
    body::{Body, BodyBuilder, BodyError, Mass},
    collision::{self, ContactMode, ConvexPolygon, Shape, ShapeError, TransformedShape, AABB},
    BodyHandle, ResolutionMode, StepStats, Velocity, World,
};

pub mod mousegrab;
pub use mousegrab::MouseGrabber;

pub mod render;
pub use render::DebugDraw;

pub mod sandbox;
pub use sandbox::{Sandbox, SandboxError};
