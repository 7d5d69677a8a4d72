//! Simulated objects.
//!
//! [`GameObject`] is the contract the [`World`](crate::world::World) drives
//! every frame. [`WorldObject`] is the plain implementation: a positioned,
//! scaled quad with a material and the physics record the collision
//! collaborator reads.

use glam::Vec2;

use crate::graphics::material::Material;
use crate::graphics::shader::{Quad, ShaderContext, uniforms};
use crate::graphics::texture::{FULL_TEX_COORDS, QuadCoords, Texture};
use crate::world::entity::Entity;
use crate::world::physics::ContactQuery;

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Data the physics collaborator reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicsProperties {
    /// Rigid objects are stopped by solid geometry and pulled by gravity.
    pub rigid: bool,
    /// World units per second.
    pub velocity: Vec2,
}

/// Something the world updates and renders each frame.
pub trait GameObject {
    fn update(&mut self, dt: f32, physics: &dyn ContactQuery);

    /// Sets per-object uniforms and issues the draw. `ctx` is already bound
    /// and must not be kept past this call.
    fn render(&self, ctx: &mut dyn ShaderContext);

    /// Frees GPU resources owned by the object.
    fn cleanup(&mut self, ctx: &mut dyn ShaderContext);

    fn object(&self) -> &WorldObject;

    fn object_mut(&mut self) -> &mut WorldObject;

    fn position(&self) -> Vec2 {
        self.object().position()
    }

    fn as_entity(&self) -> Option<&Entity> {
        None
    }

    fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    position: Vec2,
    scale: Vec2,
    bounding_width: f32,
    bounding_height: f32,
    physics: PhysicsProperties,
    model_coords: QuadCoords,
    pub material: Material,
}

impl WorldObject {
    /// Creates an object at the origin. The bounding box starts out as the
    /// extent of `model_coords`.
    pub fn new(model_coords: QuadCoords, material: Material) -> Self {
        let (w, h) = model_extent(&model_coords);
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            bounding_width: w,
            bounding_height: h,
            physics: PhysicsProperties::default(),
            model_coords,
            material,
        }
    }

    /// Axis-aligned rectangle of `width` x `height` centered on the origin.
    pub fn rect_model(width: f32, height: f32) -> QuadCoords {
        let (w2, h2) = (width / 2.0, height / 2.0);
        [-w2, -h2, -w2, h2, w2, h2, w2, -h2]
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, sx: f32, sy: f32) {
        self.scale = Vec2::new(sx, sy);
    }

    pub fn bounding_width(&self) -> f32 {
        self.bounding_width
    }

    pub fn bounding_height(&self) -> f32 {
        self.bounding_height
    }

    pub fn set_bounding_width(&mut self, width: f32) {
        self.bounding_width = width;
    }

    pub fn set_bounding_height(&mut self, height: f32) {
        self.bounding_height = height;
    }

    /// World-space bounding box centered on the position.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(
            self.position,
            Vec2::new(self.bounding_width, self.bounding_height),
        )
    }

    pub fn physics(&self) -> &PhysicsProperties {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsProperties {
        &mut self.physics
    }

    pub fn velocity(&self) -> Vec2 {
        self.physics.velocity
    }

    pub fn set_vx(&mut self, vx: f32) {
        self.physics.velocity.x = vx;
    }

    pub fn set_vy(&mut self, vy: f32) {
        self.physics.velocity.y = vy;
    }

    pub fn model_coords(&self) -> &QuadCoords {
        &self.model_coords
    }

    /// Sets position and scale uniforms.
    pub fn set_transform_uniforms(&self, ctx: &mut dyn ShaderContext) {
        ctx.set_uniform(uniforms::X, self.position.x.into());
        ctx.set_uniform(uniforms::Y, self.position.y.into());
        ctx.set_uniform(uniforms::SCALE_X, self.scale.x.into());
        ctx.set_uniform(uniforms::SCALE_Y, self.scale.y.into());
    }

    /// Draws the model with an explicit texture and UVs in place of the
    /// material's own texture.
    pub fn render_with(
        &self,
        ctx: &mut dyn ShaderContext,
        texture: Option<&Texture>,
        tex_coords: QuadCoords,
    ) {
        self.set_transform_uniforms(ctx);
        self.material.set_uniforms(ctx, texture);
        let handle = texture.filter(|t| t.is_loaded()).and_then(Texture::handle);
        ctx.draw(&Quad {
            model_coords: self.model_coords,
            tex_coords,
            texture: handle,
        });
    }
}

impl GameObject for WorldObject {
    fn update(&mut self, dt: f32, physics: &dyn ContactQuery) {
        self.material.update(dt);
        physics.integrate(self, dt);
    }

    fn render(&self, ctx: &mut dyn ShaderContext) {
        match &self.material.texture {
            Some(kind) => self.render_with(ctx, Some(kind.texture()), kind.tex_coords()),
            None => self.render_with(ctx, None, FULL_TEX_COORDS),
        }
    }

    fn cleanup(&mut self, ctx: &mut dyn ShaderContext) {
        self.material.cleanup(ctx);
    }

    fn object(&self) -> &WorldObject {
        self
    }

    fn object_mut(&mut self) -> &mut WorldObject {
        self
    }
}

fn model_extent(coords: &QuadCoords) -> (f32, f32) {
    let xs = coords.iter().step_by(2);
    let ys = coords.iter().skip(1).step_by(2);
    let (min_x, max_x) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (min_y, max_y) = ys.fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    (max_x - min_x, max_y - min_y)
}
