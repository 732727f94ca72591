use crate::{config::WorldConfig, math as m};

use thunderdome as td;

//

pub mod body;
pub use body::{Body, BodyBuilder, BodyError, Mass};

pub mod collision;
use collision::{BroadPhase, AABB};

pub mod integrator;

pub mod solver;
pub use solver::{ResolutionMode, ResolveOutcome};

//

/// Velocity of an object.
///
// Equivalent to a Vec3 but with names for the translational and rotational part.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    /// Linear velocity in metres per second.
    pub linear: m::Vec2,
    /// Angular velocity in radians per second.
    pub angular: f64,
}

/// A handle to a body in a [`World`][self::World].
///
/// Handles of removed bodies never point to a different body later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(td::Index);

/// Counters describing what happened during one [`World::step`][self::World::step].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Number of distinct body pairs whose bounding boxes were compared.
    pub pairs_tested: usize,
    /// Number of pairs dropped because their bounding boxes didn't overlap.
    pub broad_phase_rejections: usize,
    /// Number of pairs that were found to penetrate and got resolved.
    pub collisions: usize,
}

/// The physics world. Owns every body and the configuration they're simulated with.
pub struct World {
    pub config: WorldConfig,
    bodies: td::Arena<Body>,
    /// Handles in the order bodies were added,
    /// which is also the order collision pairs are generated and resolved in.
    order: Vec<td::Index>,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        World {
            config,
            bodies: td::Arena::new(),
            order: Vec::new(),
        }
    }

    /// Add a body to the world. It will be simulated starting from the next step.
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let idx = self.bodies.insert(body);
        self.order.push(idx);
        BodyHandle(idx)
    }

    /// Remove a body from the world. Returns the body if it still existed.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        let body = self.bodies.remove(handle.0)?;
        self.order.retain(|idx| *idx != handle.0);
        Some(body)
    }

    /// Remove all bodies.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.order.clear();
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over bodies in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.order
            .iter()
            .filter_map(move |idx| Some((BodyHandle(*idx), self.bodies.get(*idx)?)))
    }

    /// Find the topmost (most recently added) body that contains the given point.
    pub fn query_point(&self, point: m::Vec2) -> Option<BodyHandle> {
        self.order.iter().rev().find_map(|idx| {
            let body = self.bodies.get(*idx)?;
            if body.contains_point(point) {
                Some(BodyHandle(*idx))
            } else {
                None
            }
        })
    }

    /// Advance the simulation by `dt` seconds:
    /// integrate motion, refresh cached shapes,
    /// then detect and resolve collisions between every pair of bodies.
    ///
    /// Pairs are resolved once each, in the order the bodies were added.
    pub fn step(&mut self, dt: f64) -> StepStats {
        let config = &self.config;
        let mut stats = StepStats::default();

        //
        // Move bodies
        //

        {
            let _span = tracy_span!("integrate");
            for idx in &self.order {
                if let Some(body) = self.bodies.get_mut(*idx) {
                    integrator::integrate(body, dt, config.gravity, config.drag);
                    body.refresh_transform();
                    body.contact = None;
                }
            }
        }

        //
        // Detect and resolve collisions
        //

        let pairs = {
            let _span = tracy_span!("collision detection");
            let aabbs: Vec<AABB> = self
                .order
                .iter()
                .filter_map(|idx| self.bodies.get(*idx))
                .map(|body| body.transformed().aabb())
                .collect();
            stats.pairs_tested = aabbs.len() * aabbs.len().saturating_sub(1) / 2;
            collision::BruteForce::pairs(&aabbs)
        };
        stats.broad_phase_rejections = stats.pairs_tested - pairs.len();

        let _span = tracy_span!("resolve");
        for [i, j] in pairs {
            let (a, b) = match self.bodies.get2_mut(self.order[i], self.order[j]) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            if a.is_static && b.is_static {
                continue;
            }

            let pen = match collision::minimum_translation_vector(a.transformed(), b.transformed())
            {
                Some(pen) => pen,
                None => continue,
            };

            let contact_points = [
                collision::contact_point(a.transformed(), pen.axis, config.contact_mode),
                collision::contact_point(b.transformed(), -pen.axis, config.contact_mode),
            ];
            a.contact = Some(contact_points[0]);
            b.contact = Some(contact_points[1]);

            if solver::resolve(
                a,
                b,
                &pen,
                contact_points,
                config.resolution,
                config.positional_correction,
            ) == ResolveOutcome::Resolved
            {
                stats.collisions += 1;
            }
        }

        log::trace!("physics step: {:?}", stats);
        stats
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collision::Shape;
    use m::Vec2;

    fn circle_at(x: f64, y: f64) -> Body {
        BodyBuilder::new(Shape::new_circle(1.0).unwrap(), 1.0)
            .with_position([x, y])
            .build()
            .unwrap()
    }

    #[test]
    fn empty_world_steps() {
        let mut world = World::default();
        assert!(world.is_empty());
        assert_eq!(world.step(1.0 / 60.0), StepStats::default());

        world.add_body(circle_at(0.0, 0.0));
        let stats = world.step(1.0 / 60.0);
        assert_eq!(stats.pairs_tested, 0);
        assert_eq!(stats.collisions, 0);
    }

    #[test]
    fn removed_handles_stay_dead() {
        let mut world = World::default();
        let a = world.add_body(circle_at(0.0, 0.0));
        let b = world.add_body(circle_at(5.0, 0.0));
        assert!(world.remove_body(a).is_some());
        assert!(world.remove_body(a).is_none());
        assert!(world.get(a).is_none());

        let c = world.add_body(circle_at(10.0, 0.0));
        assert_ne!(a, c);
        assert!(world.get(a).is_none());
        itertools::assert_equal(world.iter().map(|(h, _)| h), [b, c]);
        assert_eq!(world.len(), 2);

        world.clear();
        assert!(world.is_empty());
        assert!(world.get(b).is_none());
    }

    #[test]
    fn topmost_body_is_picked() {
        let mut world = World::default();
        let below = world.add_body(circle_at(0.0, 0.0));
        let above = world.add_body(circle_at(1.0, 0.0));
        assert_eq!(world.query_point(Vec2::new(0.5, 0.0)), Some(above));
        assert_eq!(world.query_point(Vec2::new(-0.5, 0.0)), Some(below));
        assert_eq!(world.query_point(Vec2::new(0.0, 5.0)), None);
    }

    #[test]
    fn colliding_pair_records_contacts() {
        let mut world = World::new(WorldConfig {
            gravity: 0.0,
            drag: 0.0,
            ..Default::default()
        });
        let a = world.add_body(circle_at(0.0, 0.0));
        let b = world.add_body(circle_at(1.5, 0.0));
        let far = world.add_body(circle_at(50.0, 0.0));
        let stats = world.step(1.0 / 60.0);
        assert_eq!(stats.pairs_tested, 3);
        assert_eq!(stats.broad_phase_rejections, 2);
        assert_eq!(stats.collisions, 1);

        let contact_a = world.get(a).unwrap().contact().unwrap();
        let contact_b = world.get(b).unwrap().contact().unwrap();
        assert!((contact_a - Vec2::new(1.0, 0.0)).mag() < 1e-9);
        assert!((contact_b - Vec2::new(0.5, 0.0)).mag() < 1e-9);
        assert!(world.get(far).unwrap().contact().is_none());

        // pushed apart
        assert!(world.get(a).unwrap().position().x < 0.0);
        assert!(world.get(b).unwrap().position().x > 1.5);
    }

    #[test]
    fn overlapping_static_bodies_are_left_alone() {
        let mut world = World::default();
        let make = |x: f64| {
            BodyBuilder::new(Shape::new_rect(2.0, 2.0).unwrap(), 1.0)
                .with_position([x, 0.0])
                .make_static()
                .build()
                .unwrap()
        };
        let a = world.add_body(make(0.0));
        world.add_body(make(1.0));
        let stats = world.step(1.0 / 60.0);
        assert_eq!(stats.broad_phase_rejections, 0);
        assert_eq!(stats.collisions, 0);
        assert_eq!(world.get(a).unwrap().position(), Vec2::zero());
    }

    #[test]
    fn positional_only_resting_body_speeds_up_and_falls_through() {
        let mut world = World::new(WorldConfig {
            resolution: ResolutionMode::PositionalOnly,
            ..Default::default()
        });
        let floor = BodyBuilder::new(Shape::new_rect(100.0, 0.2).unwrap(), 1.0)
            .make_static()
            .build()
            .unwrap();
        world.add_body(floor);
        let resting_y = 1.1;
        let ball = world.add_body(circle_at(0.0, resting_y));

        // held on top of the floor, but velocity isn't touched
        for _ in 0..120 {
            assert_eq!(world.step(1.0 / 60.0).collisions, 1);
            let ball = world.get(ball).unwrap();
            assert!((ball.position().y - resting_y).abs() < 1e-9);
        }
        assert!(world.get(ball).unwrap().velocity.linear.y < -10.0);

        let mut steps = 0;
        while world.get(ball).unwrap().position().y > 0.0 {
            world.step(1.0 / 60.0);
            steps += 1;
            assert!(steps < 1000, "ball never fell through the floor");
        }
    }
}
