//! An interactive scene that a host application drives with lifecycle and input events.

use rand::Rng;

use crate::{
    config::{ConfigError, ConfigValue, SpawnShape, WorldConfig},
    math::Vec2,
    mousegrab::MouseGrabber,
    physics::{
        collision::{ConvexPolygon, Shape, ShapeError},
        Body, BodyBuilder, BodyError, BodyHandle, StepStats, World,
    },
    render::{self, DebugDraw},
};

/// Mass of bodies created with [`Sandbox::spawn_shape`].
const SPAWN_MASS: f64 = 10.0;
/// Spawned polygons fit in a square this big.
const SPAWN_POLYGON_SCALE: f64 = 5.0;

#[derive(thiserror::Error, Debug)]
pub enum SandboxError {
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),
    #[error("Failed to create a body")]
    Body(#[from] BodyError),
}

impl From<ShapeError> for SandboxError {
    fn from(err: ShapeError) -> Self {
        SandboxError::Body(err.into())
    }
}

/// A world with a falling triangle above a long floor,
/// where more shapes can be spawned and everything can be picked up and thrown around.
///
/// # Example
/// ```
/// # use impulse2d::{Sandbox, WorldConfig, Vec2};
/// let mut sandbox = Sandbox::load(WorldConfig::default())?;
/// for _ in 0..60 {
///     sandbox.frame(1.0 / 60.0);
/// }
/// sandbox.spawn_shape(Vec2::new(0.0, 5.0), &mut rand::thread_rng())?;
/// assert_eq!(sandbox.world().len(), 3);
/// sandbox.unload();
/// # Ok::<(), impulse2d::SandboxError>(())
/// ```
pub struct Sandbox {
    world: World,
    grabber: MouseGrabber,
}

impl Sandbox {
    /// Set up the initial scene.
    pub fn load(config: WorldConfig) -> Result<Self, SandboxError> {
        config.validate()?;
        let mut world = World::new(config);

        let triangle = BodyBuilder::new(
            Shape::new_polygon(vec![
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(0.0, 1.0),
            ])?,
            10.0,
        )
        .with_position([10.0, 0.0])
        .with_restitution(0.5)
        .build()?;
        world.add_body(triangle);

        let floor = BodyBuilder::new(Shape::new_rect(100.0, 0.2)?, 1.0)
            .with_position([10.0, -10.0])
            .make_static()
            .build()?;
        world.add_body(floor);

        log::info!("sandbox loaded with {} bodies", world.len());
        Ok(Sandbox {
            world,
            grabber: MouseGrabber::new(),
        })
    }

    /// Tear the scene down.
    pub fn unload(self) {
        log::info!("sandbox unloaded with {} bodies", self.world.len());
    }

    /// Advance the simulation by `dt` seconds.
    pub fn frame(&mut self, dt: f64) -> StepStats {
        self.world.step(dt)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &WorldConfig {
        &self.world.config
    }

    /// Change a config option by name. See [`WorldConfig::set`].
    pub fn set_option(
        &mut self,
        name: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<(), ConfigError> {
        self.world.config.set(name, value)
    }

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        self.world.add_body(body)
    }

    /// Remove a body, letting go of it first if it's being held.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        self.grabber.forget(handle);
        self.world.remove_body(handle)
    }

    /// Spawn a random shape at the given position.
    /// The kind of shape depends on [`WorldConfig::spawn_shape`].
    pub fn spawn_shape(
        &mut self,
        position: Vec2,
        rng: &mut impl Rng,
    ) -> Result<BodyHandle, SandboxError> {
        let shape = match self.world.config.spawn_shape {
            SpawnShape::Polygon => {
                let n = rng.gen_range(3..8);
                Shape::Polygon(ConvexPolygon::random(rng, n, SPAWN_POLYGON_SCALE)?)
            }
            SpawnShape::Circle => {
                let r = rng.gen_range(0..10) as f64 * 0.05 + 1.0;
                Shape::new_circle(r)?
            }
        };
        let body = BodyBuilder::new(shape, SPAWN_MASS)
            .with_position(position)
            .build()?;
        Ok(self.world.add_body(body))
    }

    //
    // input
    //

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.grabber.pointer_moved(&mut self.world, position);
    }

    /// Pick up the topmost body at the given position.
    pub fn pick(&mut self, position: Vec2) -> Option<BodyHandle> {
        self.grabber.pick(&mut self.world, position)
    }

    /// Let go of the held body, throwing it along the pointer's latest motion.
    pub fn release(&mut self) -> Option<BodyHandle> {
        let scale = self.world.config.release_force_scale;
        self.grabber.release(&mut self.world, scale)
    }

    pub fn grabbed(&self) -> Option<BodyHandle> {
        self.grabber.grabbed()
    }

    /// Draw every body, plus contact points if they're enabled in the config.
    pub fn draw(&self, drawer: &mut impl DebugDraw) {
        render::draw_world(&self.world, self.world.config.show_contact_points, drawer);
    }
}
