//! Headless shader context.
//!
//! Records what the renderer asks of it instead of talking to a GPU. The
//! host binary renders into one when no window is attached, and tests use it
//! to inspect uniform writes and draw order.

use log::{debug, trace, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::graphics::shader::{Quad, ShaderContext, UniformValue};
use crate::graphics::texture::TextureHandle;

/// A draw call together with the uniform values in effect when it was issued.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub quad: Quad,
    pub uniforms: FxHashMap<String, UniformValue>,
}

impl DrawRecord {
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

/// One operation observed between a bind and the next bind.
#[derive(Debug, Clone)]
pub enum ContextOp {
    Bind,
    Unbind,
    SetUniform(String, UniformValue),
    Draw(DrawRecord),
}

#[derive(Debug, Default)]
pub struct HeadlessContext {
    registered: FxHashSet<String>,
    values: FxHashMap<String, UniformValue>,
    frame_ops: Vec<ContextOp>,
    deleted: FxHashSet<TextureHandle>,
    bound: bool,
    released: bool,
    bind_count: usize,
    draw_count: usize,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.contains(name)
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Number of binds since creation.
    pub fn bind_count(&self) -> usize {
        self.bind_count
    }

    /// Number of draws since creation.
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Last value written to `name`.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    /// Operations since the most recent bind, in order.
    pub fn frame_ops(&self) -> &[ContextOp] {
        &self.frame_ops
    }

    /// Draws since the most recent bind, in order.
    pub fn frame_draws(&self) -> impl Iterator<Item = &DrawRecord> {
        self.frame_ops.iter().filter_map(|op| match op {
            ContextOp::Draw(record) => Some(record),
            _ => None,
        })
    }

    pub fn is_deleted(&self, handle: TextureHandle) -> bool {
        self.deleted.contains(&handle)
    }
}

impl ShaderContext for HeadlessContext {
    fn register_uniform(&mut self, name: &str) {
        self.registered.insert(name.to_string());
    }

    fn bind(&mut self) {
        if self.released {
            warn!("bind on a released shader program");
            return;
        }
        self.frame_ops.clear();
        self.frame_ops.push(ContextOp::Bind);
        self.bound = true;
        self.bind_count += 1;
    }

    fn unbind(&mut self) {
        if self.bound {
            self.frame_ops.push(ContextOp::Unbind);
        }
        self.bound = false;
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if !self.registered.contains(name) {
            warn!("uniform '{}' was never registered", name);
            return;
        }
        if !self.bound {
            warn!("uniform '{}' set while no program is bound", name);
            return;
        }
        trace!("uniform {} = {:?}", name, value);
        self.values.insert(name.to_string(), value);
        self.frame_ops
            .push(ContextOp::SetUniform(name.to_string(), value));
    }

    fn draw(&mut self, quad: &Quad) {
        if !self.bound {
            warn!("draw issued while no program is bound");
            return;
        }
        self.draw_count += 1;
        self.frame_ops.push(ContextOp::Draw(DrawRecord {
            quad: *quad,
            uniforms: self.values.clone(),
        }));
    }

    fn delete_texture(&mut self, handle: TextureHandle) {
        if !self.deleted.insert(handle) {
            debug!("texture {:?} already deleted", handle);
        }
    }

    fn release(&mut self) {
        self.bound = false;
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::texture::FULL_TEX_COORDS;

    fn quad() -> Quad {
        Quad {
            model_coords: [0.0; 8],
            tex_coords: FULL_TEX_COORDS,
            texture: None,
        }
    }

    #[test]
    fn unregistered_uniforms_are_dropped() {
        let mut ctx = HeadlessContext::new();
        ctx.bind();
        ctx.set_uniform("x", 1.0f32.into());
        assert_eq!(ctx.uniform("x"), None);
        ctx.register_uniform("x");
        ctx.set_uniform("x", 1.0f32.into());
        assert_eq!(ctx.uniform("x"), Some(UniformValue::Float(1.0)));
    }

    #[test]
    fn draws_snapshot_current_uniforms() {
        let mut ctx = HeadlessContext::new();
        ctx.register_uniform("x");
        ctx.bind();
        ctx.set_uniform("x", 1.0f32.into());
        ctx.draw(&quad());
        ctx.set_uniform("x", 2.0f32.into());
        ctx.draw(&quad());
        let xs: Vec<_> = ctx
            .frame_draws()
            .map(|d| d.uniform("x").and_then(|v| v.as_float()))
            .collect();
        assert_eq!(xs, vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn draw_without_bind_is_ignored() {
        let mut ctx = HeadlessContext::new();
        ctx.draw(&quad());
        assert_eq!(ctx.draw_count(), 0);
    }

    #[test]
    fn release_blocks_binding_but_not_deletion() {
        let mut ctx = HeadlessContext::new();
        ctx.release();
        ctx.bind();
        assert!(!ctx.is_bound());
        ctx.delete_texture(TextureHandle(4));
        ctx.delete_texture(TextureHandle(4));
        assert!(ctx.is_deleted(TextureHandle(4)));
    }
}
