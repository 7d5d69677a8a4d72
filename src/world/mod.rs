//! The game world.
//!
//! A [`World`] owns every simulated object, the [`Camera`] and the shader
//! context objects are drawn with. Each frame the host calls
//! [`World::update`] and then [`World::render`]:
//!
//! 1. queued window events are applied (scroll zoom, resize),
//! 2. objects update in insertion order,
//! 3. the camera updates last, so a followed object is seen at its new
//!    position,
//! 4. render binds the context once, writes the per-frame uniforms, then lets
//!    each object set its own uniforms and draw, in the same order.
//!
//! Submodules:
//! - [`camera`] – focus point, zoom and follow relation
//! - [`entity`] – six-state animated entities
//! - [`events`] – scroll/resize event queue
//! - [`object`] – the [`GameObject`] contract and [`WorldObject`]
//! - [`physics`] – contact queries and integration

pub mod camera;
pub mod entity;
pub mod events;
pub mod object;
pub mod physics;

use crossbeam_channel::Sender;
use log::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::graphics::shader::{ShaderContext, uniforms};

pub use camera::{Camera, ObjectId};
pub use entity::Entity;
pub use events::WorldEvent;
pub use object::{GameObject, WorldObject};
pub use physics::ContactQuery;

use events::EventQueue;

/// Texture unit the world sampler reads from.
const TEXTURE_UNIT: i32 = 0;

pub struct World<S: ShaderContext, P: ContactQuery> {
    objects: Vec<Box<dyn GameObject>>,
    camera: Camera,
    shader: Option<S>,
    physics: P,
    aspect_ratio: f32,
    aspect_ratio_action: bool,
    events: EventQueue,
    cleaned_up: bool,
}

impl<S: ShaderContext, P: ContactQuery> World<S, P> {
    /// Creates an empty world and registers the world uniforms on `shader`.
    pub fn new(config: &EngineConfig, mut shader: S, physics: P) -> Self {
        for name in uniforms::ALL {
            shader.register_uniform(name);
        }
        let mut world = Self::without_shader(config, physics);
        world.shader = Some(shader);
        world
    }

    /// Creates a world that simulates but has nothing to draw with.
    pub fn without_shader(config: &EngineConfig, physics: P) -> Self {
        Self {
            objects: Vec::new(),
            camera: Camera::new(config.camera_zoom),
            shader: None,
            physics,
            aspect_ratio: config.aspect_ratio(),
            aspect_ratio_action: config.aspect_ratio_action,
            events: EventQueue::new(),
            cleaned_up: false,
        }
    }

    /// Appends `object` and returns its id. No duplicate check.
    pub fn add_object(&mut self, object: impl GameObject + 'static) -> ObjectId {
        self.add_boxed(Box::new(object))
    }

    pub fn add_boxed(&mut self, object: Box<dyn GameObject>) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Object at index `i`, or `None` (logged) when out of range.
    pub fn get_object(&self, i: usize) -> Option<&dyn GameObject> {
        match self.objects.get(i) {
            Some(object) => Some(&**object),
            None => {
                error!(
                    "World::get_object: index {} out of range (len {})",
                    i,
                    self.objects.len()
                );
                None
            }
        }
    }

    pub fn get_object_mut(&mut self, i: usize) -> Option<&mut dyn GameObject> {
        let len = self.objects.len();
        match self.objects.get_mut(i) {
            Some(object) => Some(&mut **object),
            None => {
                error!(
                    "World::get_object_mut: index {} out of range (len {})",
                    i, len
                );
                None
            }
        }
    }

    /// The object behind `id` if it is an [`Entity`].
    pub fn entity_mut(&mut self, id: ObjectId) -> Option<&mut Entity> {
        self.get_object_mut(id.0)?.as_entity_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = &dyn GameObject> {
        self.objects.iter().map(|o| &**o as &dyn GameObject)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn shader(&self) -> Option<&S> {
        self.shader.as_ref()
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn aspect_ratio_action(&self) -> bool {
        self.aspect_ratio_action
    }

    /// Sender the windowing layer uses to queue scroll and resize events.
    pub fn event_sender(&self) -> Sender<WorldEvent> {
        self.events.sender()
    }

    /// Applies every queued event now.
    pub fn process_events(&mut self) {
        for event in self.events.drain() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: WorldEvent) {
        match event {
            WorldEvent::Scroll { dy } => self.scroll(dy),
            WorldEvent::Resized {
                aspect_ratio,
                aspect_ratio_action,
            } => self.resized(aspect_ratio, aspect_ratio_action),
        }
    }

    /// One scroll tick: x1.15 zoom for positive `dy`, x0.85 for negative.
    pub fn scroll(&mut self, dy: f64) {
        self.camera.scroll(dy);
    }

    /// Stores the aspect ratio and handling mode used by later renders.
    pub fn resized(&mut self, aspect_ratio: f32, aspect_ratio_action: bool) {
        if !(aspect_ratio > 0.0 && aspect_ratio.is_finite()) {
            warn!("ignoring invalid aspect ratio {}", aspect_ratio);
            return;
        }
        debug!(
            "world resized: ar={:.3} action={}",
            aspect_ratio, aspect_ratio_action
        );
        self.aspect_ratio = aspect_ratio;
        self.aspect_ratio_action = aspect_ratio_action;
    }

    /// Updates every object in insertion order, then the camera.
    pub fn update(&mut self, dt: f32) {
        self.process_events();
        if dt.is_finite() && dt >= 0.0 {
            for object in self.objects.iter_mut() {
                object.update(dt, &self.physics);
            }
        } else {
            warn!("skipping object update for invalid dt {}", dt);
        }
        self.camera.update(&self.objects);
    }

    /// Draws every object in insertion order with the per-frame uniforms
    /// committed once up front.
    pub fn render(&mut self) {
        let Some(shader) = self.shader.as_mut() else {
            debug!("World::render: no shader context, nothing drawn");
            return;
        };
        if self.cleaned_up {
            warn!("World::render called after cleanup");
            return;
        }
        shader.bind();
        shader.set_uniform(uniforms::TEX_SAMPLER, TEXTURE_UNIT.into());
        shader.set_uniform(uniforms::ASPECT_RATIO, self.aspect_ratio.into());
        shader.set_uniform(uniforms::ASPECT_RATIO_ACTION, self.aspect_ratio_action.into());
        shader.set_uniform(uniforms::CAMERA_X, self.camera.x().into());
        shader.set_uniform(uniforms::CAMERA_Y, self.camera.y().into());
        shader.set_uniform(uniforms::CAMERA_ZOOM, self.camera.zoom().into());
        for object in self.objects.iter() {
            object.render(shader);
        }
        shader.unbind();
    }

    /// Releases the shader program, then every object's GPU resources.
    ///
    /// Objects are dropped afterwards. Calling this again does nothing.
    pub fn cleanup(&mut self) {
        if self.cleaned_up {
            debug!("World::cleanup: already cleaned up");
            return;
        }
        self.cleaned_up = true;
        match self.shader.as_mut() {
            Some(shader) => {
                shader.release();
                for object in self.objects.iter_mut() {
                    object.cleanup(shader);
                }
            }
            None => debug!("World::cleanup: no shader context, skipping GPU cleanup"),
        }
        info!("world cleaned up ({} objects)", self.objects.len());
        self.objects.clear();
        self.camera.unfollow();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::headless::HeadlessContext;
    use crate::graphics::material::Material;
    use crate::world::physics::OpenSpace;

    fn make_world() -> World<HeadlessContext, OpenSpace> {
        World::new(&EngineConfig::new(), HeadlessContext::new(), OpenSpace)
    }

    fn block() -> WorldObject {
        WorldObject::new(WorldObject::rect_model(1.0, 1.0), Material::default())
    }

    #[test]
    fn new_world_registers_all_uniforms() {
        let world = make_world();
        let shader = world.shader().unwrap();
        for name in uniforms::ALL {
            assert!(shader.is_registered(name), "{} not registered", name);
        }
    }

    #[test]
    fn add_object_returns_sequential_ids() {
        let mut world = make_world();
        assert_eq!(world.add_object(block()), ObjectId(0));
        assert_eq!(world.add_object(block()), ObjectId(1));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn get_object_out_of_range_is_none() {
        let mut world = make_world();
        world.add_object(block());
        assert!(world.get_object(0).is_some());
        assert!(world.get_object(1).is_none());
        assert!(world.get_object(usize::MAX).is_none());
        assert!(world.get_object_mut(3).is_none());
    }

    #[test]
    fn entity_mut_only_matches_entities() {
        let mut world = make_world();
        let id = world.add_object(block());
        assert!(world.entity_mut(id).is_none());
        assert!(world.entity_mut(ObjectId(9)).is_none());
    }

    #[test]
    fn invalid_resize_is_ignored() {
        let mut world = make_world();
        let before = world.aspect_ratio();
        world.resized(0.0, true);
        assert_eq!(world.aspect_ratio(), before);
        assert!(!world.aspect_ratio_action());
    }

    #[test]
    fn cleanup_twice_is_harmless() {
        let mut world = make_world();
        world.add_object(block());
        world.cleanup();
        world.cleanup();
        assert!(world.is_empty());
        assert!(world.shader().unwrap().is_released());
    }

    #[test]
    fn world_without_shader_still_simulates() {
        let mut world: World<HeadlessContext, OpenSpace> =
            World::without_shader(&EngineConfig::new(), OpenSpace);
        let mut o = block();
        o.set_vx(2.0);
        world.add_object(o);
        world.update(0.5);
        world.render();
        world.cleanup();
        assert!(world.shader().is_none());
    }
}
