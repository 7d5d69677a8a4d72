//! Static textures.
//!
//! A [`Texture`] is an immutable handle to GPU-resident pixel data plus its
//! size in pixels. The loader that produces the handle lives outside this
//! crate; a texture whose upload failed is represented by
//! [`Texture::placeholder`] and renders as a solid-color quad.

use serde::{Deserialize, Serialize};

use crate::graphics::animated::AnimatedTexture;
use crate::graphics::shader::ShaderContext;

/// Opaque backend identifier of an uploaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Four 2D corners in bottom-left, top-left, top-right, bottom-right order.
pub type QuadCoords = [f32; 8];

/// Texture coordinates covering the whole image.
pub const FULL_TEX_COORDS: QuadCoords = [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0];

/// Builds a UV quad for the sub-rectangle `[u0, u1] x [v0, v1]`.
///
/// `v0` is the top edge of the region (images are stored top row first).
pub fn tex_coords_for(u0: f32, v0: f32, u1: f32, v1: f32) -> QuadCoords {
    [u0, v1, u0, v0, u1, v0, u1, v1]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    handle: Option<TextureHandle>,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn new(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self {
            handle: Some(handle),
            width,
            height,
        }
    }

    /// Stand-in for a texture whose pixel data never reached the GPU.
    pub fn placeholder() -> Self {
        Self {
            handle: None,
            width: 0,
            height: 0,
        }
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the texture has a handle and a non-empty size.
    pub fn is_loaded(&self) -> bool {
        self.handle.is_some() && self.width > 0 && self.height > 0
    }

    /// Model-space corners for showing the texture at its native aspect ratio.
    ///
    /// With `relative_to = 32`, a 64x128 texture yields a model 2 wide and 4
    /// tall centered on the origin. Smaller values give larger models.
    pub fn model_coords(&self, relative_to: f32) -> QuadCoords {
        if relative_to <= 0.0 || !self.is_loaded() {
            return [0.0; 8];
        }
        let w2 = self.width as f32 / relative_to / 2.0;
        let h2 = self.height as f32 / relative_to / 2.0;
        [-w2, -h2, -w2, h2, w2, h2, w2, -h2]
    }

    /// Turns this texture into a horizontally-stripped animation that keeps
    /// using the same GPU handle.
    pub fn animate(
        self,
        frames: usize,
        frame_time: f32,
        rand_start: bool,
    ) -> Result<AnimatedTexture, String> {
        AnimatedTexture::new(self, frames, frame_time, rand_start)
    }

    /// Deletes the GPU texture. Placeholders are skipped.
    pub fn cleanup(&self, ctx: &mut dyn ShaderContext) {
        if let Some(handle) = self.handle {
            ctx.delete_texture(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_coords_follow_native_aspect() {
        let t = Texture::new(TextureHandle(1), 64, 128);
        assert_eq!(
            t.model_coords(32.0),
            [-1.0, -2.0, -1.0, 2.0, 1.0, 2.0, 1.0, -2.0]
        );
    }

    #[test]
    fn placeholder_has_no_size() {
        let t = Texture::placeholder();
        assert!(!t.is_loaded());
        assert_eq!(t.handle(), None);
        assert_eq!(t.model_coords(16.0), [0.0; 8]);
    }

    #[test]
    fn tex_coords_for_orders_corners() {
        let uv = tex_coords_for(0.25, 0.0, 0.5, 0.5);
        assert_eq!(uv, [0.25, 0.5, 0.25, 0.0, 0.5, 0.0, 0.5, 0.5]);
        assert_eq!(tex_coords_for(0.0, 0.0, 1.0, 1.0), FULL_TEX_COORDS);
    }
}
