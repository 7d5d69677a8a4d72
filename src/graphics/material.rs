//! Materials: what an object looks like.
//!
//! A [`Material`] pairs an optional texture with a solid color and a blend
//! mode. The texture is one of the closed set of variants in [`TextureKind`],
//! all addressed the same way through [`TextureKind::tex_coords`].

use crate::graphics::animated::AnimatedTexture;
use crate::graphics::msat::MultiStateAnimatedTexture;
use crate::graphics::shader::{ShaderContext, uniforms};
use crate::graphics::texture::{FULL_TEX_COORDS, QuadCoords, Texture};

#[derive(Debug, Clone, PartialEq)]
pub enum TextureKind {
    Static(Texture),
    Animated(AnimatedTexture),
    MultiState(MultiStateAnimatedTexture),
}

impl TextureKind {
    pub fn texture(&self) -> &Texture {
        match self {
            TextureKind::Static(t) => t,
            TextureKind::Animated(a) => a.texture(),
            TextureKind::MultiState(m) => m.texture(),
        }
    }

    /// Advances time-driven variants. Multi-state textures only move the
    /// active state.
    pub fn update(&mut self, dt: f32) {
        match self {
            TextureKind::Static(_) => {}
            TextureKind::Animated(a) => a.update(dt),
            TextureKind::MultiState(m) => m.update(dt),
        }
    }

    pub fn tex_coords(&self) -> QuadCoords {
        match self {
            TextureKind::Static(_) => FULL_TEX_COORDS,
            TextureKind::Animated(a) => a.tex_coords(),
            TextureKind::MultiState(m) => m.tex_coords(),
        }
    }
}

impl From<Texture> for TextureKind {
    fn from(t: Texture) -> Self {
        TextureKind::Static(t)
    }
}

impl From<AnimatedTexture> for TextureKind {
    fn from(a: AnimatedTexture) -> Self {
        TextureKind::Animated(a)
    }
}

impl From<MultiStateAnimatedTexture> for TextureKind {
    fn from(m: MultiStateAnimatedTexture) -> Self {
        TextureKind::MultiState(m)
    }
}

/// How the texture sample and the solid color are combined in the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Texture only (color only when untextured).
    #[default]
    None,
    Multiplicative,
    Averaged,
}

impl BlendMode {
    pub fn as_uniform(self) -> i32 {
        match self {
            BlendMode::None => 0,
            BlendMode::Multiplicative => 1,
            BlendMode::Averaged => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub texture: Option<TextureKind>,
    pub color: [f32; 4],
    pub blend: BlendMode,
}

impl Default for Material {
    fn default() -> Self {
        Self::solid([1.0, 1.0, 1.0, 1.0])
    }
}

impl Material {
    pub fn solid(color: [f32; 4]) -> Self {
        Self {
            texture: None,
            color,
            blend: BlendMode::None,
        }
    }

    pub fn textured(texture: impl Into<TextureKind>) -> Self {
        Self {
            texture: Some(texture.into()),
            ..Self::default()
        }
    }

    pub fn with_blend(mut self, color: [f32; 4], blend: BlendMode) -> Self {
        self.color = color;
        self.blend = blend;
        self
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(texture) = self.texture.as_mut() {
            texture.update(dt);
        }
    }

    /// Writes `isTextured`, `color` and `blend` for a draw with `texture`.
    ///
    /// Unloaded textures count as untextured.
    pub fn set_uniforms(&self, ctx: &mut dyn ShaderContext, texture: Option<&Texture>) {
        let textured = texture.is_some_and(Texture::is_loaded);
        ctx.set_uniform(uniforms::IS_TEXTURED, textured.into());
        ctx.set_uniform(uniforms::COLOR, self.color.into());
        ctx.set_uniform(uniforms::BLEND, self.blend.as_uniform().into());
    }

    pub fn cleanup(&self, ctx: &mut dyn ShaderContext) {
        if let Some(texture) = &self.texture {
            texture.texture().cleanup(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::texture::TextureHandle;

    #[test]
    fn static_textures_use_full_coords() {
        let kind = TextureKind::from(Texture::new(TextureHandle(1), 8, 8));
        assert_eq!(kind.tex_coords(), FULL_TEX_COORDS);
    }

    #[test]
    fn update_advances_animated_variant() {
        let anim = Texture::new(TextureHandle(1), 32, 8)
            .animate(4, 0.25, false)
            .unwrap();
        let mut material = Material::textured(anim);
        material.update(0.5);
        match &material.texture {
            Some(TextureKind::Animated(a)) => assert_eq!(a.current_frame(), 2),
            other => panic!("unexpected texture {:?}", other),
        }
    }

    #[test]
    fn blend_modes_map_to_shader_ints() {
        assert_eq!(BlendMode::None.as_uniform(), 0);
        assert_eq!(BlendMode::Multiplicative.as_uniform(), 1);
        assert_eq!(BlendMode::Averaged.as_uniform(), 2);
    }
}
