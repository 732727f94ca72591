use crate::{
    math::Vec2,
    physics::{BodyHandle, World},
};

#[derive(Clone, Copy, Debug)]
struct Grab {
    body: BodyHandle,
    /// Pointer position relative to the body's position at the time it was picked.
    offset: Vec2,
    was_static: bool,
}

/// Lets the user pick up bodies with the pointer, drag them around and throw them.
///
/// A grabbed body is made static for the duration of the grab
/// so that nothing else in the world moves it.
#[derive(Clone, Copy, Debug, Default)]
pub struct MouseGrabber {
    grab: Option<Grab>,
    pointer: Option<Vec2>,
    pointer_last: Option<Vec2>,
}

impl MouseGrabber {
    pub fn new() -> Self {
        Self::default()
    }

    /// The body currently being held, if any.
    pub fn grabbed(&self) -> Option<BodyHandle> {
        self.grab.map(|g| g.body)
    }

    /// Latest known pointer position.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Record a new pointer position and drag the grabbed body along with it.
    pub fn pointer_moved(&mut self, world: &mut World, point: Vec2) {
        self.pointer_last = self.pointer;
        self.pointer = Some(point);

        let grab = match self.grab {
            Some(grab) => grab,
            None => return,
        };
        match world.get_mut(grab.body) {
            Some(body) => body.set_position(point - grab.offset),
            None => self.grab = None,
        }
    }

    /// Grab the topmost body under the given point.
    ///
    /// If something is already being held, it stays held and nothing else is picked.
    pub fn pick(&mut self, world: &mut World, point: Vec2) -> Option<BodyHandle> {
        if let Some(held) = self.grabbed() {
            if world.get(held).is_some() {
                return Some(held);
            }
            self.grab = None;
        }

        if self.pointer != Some(point) {
            // no motion history at a fresh press location
            self.pointer = Some(point);
            self.pointer_last = None;
        }

        let handle = world.query_point(point)?;
        let body = world.get_mut(handle)?;
        let grab = Grab {
            body: handle,
            offset: point - body.position(),
            was_static: body.is_static(),
        };
        body.set_static(true);
        self.grab = Some(grab);
        log::debug!("grabbed {:?}", handle);
        Some(handle)
    }

    /// Let go of the held body, throwing it in the direction the pointer last moved.
    ///
    /// The throw is a force of `(pointer - previous pointer) * force_scale`
    /// applied at the point where the body was grabbed.
    /// Returns the body that was released.
    pub fn release(&mut self, world: &mut World, force_scale: f64) -> Option<BodyHandle> {
        let grab = self.grab.take()?;
        let body = world.get_mut(grab.body)?;
        body.set_static(grab.was_static);

        let force = match (self.pointer, self.pointer_last) {
            (Some(p), Some(last)) => (p - last) * force_scale,
            _ => Vec2::zero(),
        };
        body.apply_force(force, grab.offset);
        log::debug!("released {:?} with force {:?}", grab.body, force);
        Some(grab.body)
    }

    /// Forget the grab on the given body without touching it,
    /// e.g. because it's being removed.
    pub(crate) fn forget(&mut self, handle: BodyHandle) {
        if self.grabbed() == Some(handle) {
            self.grab = None;
        }
    }
}
