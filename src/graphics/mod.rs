//! Textures, materials and the shader seam.
//!
//! Submodules overview:
//! - [`texture`] – static GPU textures and quad coordinate helpers
//! - [`animated`] – frame clocks and time-driven animated textures
//! - [`msat`] – multi-state animated textures switched by their owner
//! - [`material`] – texture variants plus solid color and blend mode
//! - [`shader`] – the [`ShaderContext`](shader::ShaderContext) trait and uniform names
//! - [`headless`] – recording shader context for headless runs and tests

pub mod animated;
pub mod headless;
pub mod material;
pub mod msat;
pub mod shader;
pub mod texture;
