//! Hooks for drawing the state of the world.
//!
//! The crate doesn't draw anything itself;
//! implement [`DebugDraw`] for whatever renderer you have and hand it to
//! [`Sandbox::draw`][crate::Sandbox::draw] or [`draw_world`].

use crate::{
    math::Vec2,
    physics::{collision::TransformedShape, World},
};

/// Something that can draw simple debug shapes.
pub trait DebugDraw {
    /// Draw the outline or fill of a body's world-space shape.
    fn shape(&mut self, shape: &TransformedShape);
    /// Mark the point where a body was last touched.
    fn contact_point(&mut self, point: Vec2);
}

/// Draw every body in the world in the order they were added,
/// followed by each body's last contact point if `show_contact_points` is set.
pub fn draw_world(world: &World, show_contact_points: bool, drawer: &mut impl DebugDraw) {
    for (_, body) in world.iter() {
        drawer.shape(body.transformed());
        if show_contact_points {
            if let Some(contact) = body.contact() {
                drawer.contact_point(contact);
            }
        }
    }
}
