//! Physics collaborator seam.
//!
//! The core never resolves collisions itself. It asks a [`ContactQuery`]
//! whether an object would touch solid geometry if shifted, and lets it
//! integrate velocities. [`SolidGrid`] is a small tile-based implementation
//! used by the host binary and tests; [`OpenSpace`] has no geometry at all.

use glam::Vec2;
use log::trace;
use rustc_hash::FxHashSet;

use crate::world::object::{Aabb, WorldObject};

/// Shrinks boxes before cell lookup so that resting exactly on a cell edge
/// does not count as overlap.
const EDGE_EPSILON: f32 = 1e-4;

pub trait ContactQuery {
    /// Whether `object`'s bounding box, shifted by `(dx, dy)`, touches solid
    /// geometry. Called every frame, must be cheap.
    fn contact_adjacent(&self, object: &WorldObject, dx: f32, dy: f32) -> bool;

    /// Advances `object` by `dt` seconds. Defaults to a plain Euler step.
    fn integrate(&self, object: &mut WorldObject, dt: f32) {
        let delta = object.velocity() * dt;
        object.set_position(object.position() + delta);
    }
}

/// Empty space: nothing is ever solid.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSpace;

impl ContactQuery for OpenSpace {
    fn contact_adjacent(&self, _object: &WorldObject, _dx: f32, _dy: f32) -> bool {
        false
    }
}

/// Unit cells of solid ground. Cell `(x, y)` covers `[x, x+1) x [y, y+1)`.
///
/// Rigid objects fall with `gravity` and are stopped per axis by solid
/// cells. Non-rigid objects move freely.
#[derive(Debug, Clone, Default)]
pub struct SolidGrid {
    cells: FxHashSet<(i32, i32)>,
    pub gravity: f32,
}

impl SolidGrid {
    pub fn new(gravity: f32) -> Self {
        Self {
            cells: FxHashSet::default(),
            gravity,
        }
    }

    /// Adds a horizontal row of cells `x0..=x1` at height `y`.
    pub fn with_floor(mut self, x0: i32, x1: i32, y: i32) -> Self {
        for x in x0..=x1 {
            self.cells.insert((x, y));
        }
        self
    }

    pub fn add_cell(&mut self, x: i32, y: i32) {
        self.cells.insert((x, y));
    }

    pub fn remove_cell(&mut self, x: i32, y: i32) -> bool {
        self.cells.remove(&(x, y))
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.cells.contains(&(x, y))
    }

    pub fn overlaps_solid(&self, bounds: &Aabb) -> bool {
        let x0 = (bounds.min.x + EDGE_EPSILON).floor() as i32;
        let x1 = (bounds.max.x - EDGE_EPSILON).floor() as i32;
        let y0 = (bounds.min.y + EDGE_EPSILON).floor() as i32;
        let y1 = (bounds.max.y - EDGE_EPSILON).floor() as i32;
        (y0..=y1).any(|y| (x0..=x1).any(|x| self.is_solid(x, y)))
    }
}

impl ContactQuery for SolidGrid {
    fn contact_adjacent(&self, object: &WorldObject, dx: f32, dy: f32) -> bool {
        self.overlaps_solid(&object.bounds().translated(Vec2::new(dx, dy)))
    }

    fn integrate(&self, object: &mut WorldObject, dt: f32) {
        if !object.physics().rigid {
            let delta = object.velocity() * dt;
            object.set_position(object.position() + delta);
            return;
        }

        let mut velocity = object.velocity();
        velocity.y -= self.gravity * dt;

        let start = object.position();
        object.set_x(start.x + velocity.x * dt);
        if self.overlaps_solid(&object.bounds()) {
            trace!("horizontal contact at {:?}", object.position());
            object.set_x(start.x);
            velocity.x = 0.0;
        }

        object.set_y(start.y + velocity.y * dt);
        if self.overlaps_solid(&object.bounds()) {
            let half_height = object.bounding_height() * 0.5;
            if velocity.y < 0.0 {
                // rest on top of the cell that was hit
                let floor_top = (object.bounds().min.y + EDGE_EPSILON).floor() + 1.0;
                object.set_y(floor_top + half_height);
                if self.overlaps_solid(&object.bounds()) {
                    object.set_y(start.y);
                }
            } else {
                object.set_y(start.y);
            }
            velocity.y = 0.0;
        }

        object.physics_mut().velocity = velocity;
    }
}
