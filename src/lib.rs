//! Ambulare world core.
//!
//! Simulation and presentation core of a 2D game world: the [`world::World`]
//! container with its camera and per-frame render contract, six-state
//! animated [`world::Entity`]s, and the texture family (static, timed and
//! multi-state animations) they draw with.
//!
//! Windowing, asset decoding and collision geometry stay outside; the core
//! talks to them through [`graphics::shader::ShaderContext`] and
//! [`world::physics::ContactQuery`].

pub mod config;
pub mod graphics;
pub mod world;
