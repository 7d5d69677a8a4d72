//! World camera.
//!
//! Holds the world-space focus point and zoom the renderer pushes as
//! `camX`/`camY`/`camZoom`. The camera can follow one object of the world it
//! belongs to; the relation is an [`ObjectId`], not a reference, so the
//! camera never keeps its target alive.

use glam::Vec2;
use log::{debug, warn};

use crate::world::object::GameObject;

/// Zoom multiplier for one scroll tick towards the scene.
pub const SCROLL_ZOOM_IN: f32 = 1.15;
/// Zoom multiplier for one scroll tick away from the scene.
pub const SCROLL_ZOOM_OUT: f32 = 0.85;

const MIN_ZOOM: f32 = 1e-3;
const MAX_ZOOM: f32 = 1e3;

/// Index of an object in its world's object list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec2,
    zoom: f32,
    target: Option<ObjectId>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Camera {
    pub fn new(zoom: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            target: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn target(&self) -> Option<ObjectId> {
        self.target
    }

    /// Starts tracking `target` from the next update on.
    pub fn follow(&mut self, target: ObjectId) {
        self.target = Some(target);
    }

    pub fn unfollow(&mut self) {
        self.target = None;
    }

    /// Multiplies the zoom by `factor`. Non-positive factors are ignored.
    pub fn zoom_by(&mut self, factor: f32) {
        if !(factor > 0.0 && factor.is_finite()) {
            warn!("ignoring zoom factor {}", factor);
            return;
        }
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        debug!("camera zoom {:.3}", self.zoom);
    }

    /// Applies one scroll event: zoom in for positive `dy`, out for negative.
    pub fn scroll(&mut self, dy: f64) {
        if dy > 0.0 {
            self.zoom_by(SCROLL_ZOOM_IN);
        } else if dy < 0.0 {
            self.zoom_by(SCROLL_ZOOM_OUT);
        }
    }

    /// Moves onto the followed object, if any. A target that no longer
    /// exists ends the follow.
    pub fn update(&mut self, objects: &[Box<dyn GameObject>]) {
        let Some(id) = self.target else {
            return;
        };
        match objects.get(id.0) {
            Some(object) => self.position = object.position(),
            None => {
                warn!("camera target {:?} is gone, no longer following", id);
                self.target = None;
            }
        }
    }
}
