//! Shader/uniform binding seam.
//!
//! The world renders through a [`ShaderContext`], an opaque program handle
//! owned by the windowing layer. The world binds it once per frame, writes
//! the per-frame uniforms, then lends it to each object for the object's own
//! uniforms and draw call.

use serde::{Deserialize, Serialize};

use crate::graphics::texture::{QuadCoords, TextureHandle};

/// Uniform names understood by the world shader.
pub mod uniforms {
    /// Object world x.
    pub const X: &str = "x";
    /// Object world y.
    pub const Y: &str = "y";
    pub const SCALE_X: &str = "scaleX";
    pub const SCALE_Y: &str = "scaleY";
    /// Window aspect ratio.
    pub const ASPECT_RATIO: &str = "ar";
    /// Aspect-ratio handling mode (0 or 1).
    pub const ASPECT_RATIO_ACTION: &str = "arAction";
    pub const IS_TEXTURED: &str = "isTextured";
    pub const COLOR: &str = "color";
    pub const BLEND: &str = "blend";
    /// Texture unit the sampler reads from.
    pub const TEX_SAMPLER: &str = "texSampler";
    pub const CAMERA_X: &str = "camX";
    pub const CAMERA_Y: &str = "camY";
    pub const CAMERA_ZOOM: &str = "camZoom";

    /// Every uniform the world registers on its program.
    pub const ALL: &[&str] = &[
        X,
        Y,
        SCALE_X,
        SCALE_Y,
        ASPECT_RATIO,
        ASPECT_RATIO_ACTION,
        IS_TEXTURED,
        COLOR,
        BLEND,
        TEX_SAMPLER,
        CAMERA_X,
        CAMERA_Y,
        CAMERA_ZOOM,
    ];
}

/// Value written to a named uniform slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec4([f32; 4]),
}

impl UniformValue {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            UniformValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Int(v as i32)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

/// One textured or solid quad, in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub model_coords: QuadCoords,
    pub tex_coords: QuadCoords,
    /// Texture bound to the sampler unit, `None` for solid quads.
    pub texture: Option<TextureHandle>,
}

/// Program and draw surface used by the world renderer.
///
/// Implementations must tolerate [`ShaderContext::delete_texture`] on a
/// handle that was already deleted.
pub trait ShaderContext {
    /// Declares a uniform slot before first use.
    fn register_uniform(&mut self, name: &str);
    fn bind(&mut self);
    fn unbind(&mut self);
    fn set_uniform(&mut self, name: &str, value: UniformValue);
    /// Draws `quad` with the currently bound program and uniforms.
    fn draw(&mut self, quad: &Quad);
    fn delete_texture(&mut self, handle: TextureHandle);
    /// Frees the program. Texture deletion must keep working afterwards.
    fn release(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_expected_variants() {
        assert_eq!(UniformValue::from(true), UniformValue::Int(1));
        assert_eq!(UniformValue::from(false), UniformValue::Int(0));
        assert_eq!(UniformValue::from(0.5f32).as_float(), Some(0.5));
        assert_eq!(UniformValue::from(3).as_int(), Some(3));
        assert_eq!(UniformValue::from([1.0; 4]).as_float(), None);
    }

    #[test]
    fn uniform_list_has_no_duplicates() {
        let mut names: Vec<&str> = uniforms::ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), uniforms::ALL.len());
        assert_eq!(names.len(), 13);
    }
}
