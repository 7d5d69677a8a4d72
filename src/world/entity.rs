//! Animated entities.
//!
//! An [`Entity`] is a [`WorldObject`] whose look comes from a
//! [`MultiStateAnimatedTexture`] with six rows:
//!
//! | state | meaning                  |
//! |-------|--------------------------|
//! | 0     | standing, facing left    |
//! | 1     | standing, facing right   |
//! | 2     | airborne, facing left    |
//! | 3     | airborne, facing right   |
//! | 4     | moving on ground, left   |
//! | 5     | moving on ground, right  |
//!
//! The state is only pushed to the texture when one of the three flags
//! actually changes, so an animation in progress keeps playing while the
//! same input repeats every frame.

use glam::Vec2;
use log::debug;

use crate::graphics::material::Material;
use crate::graphics::msat::MultiStateAnimatedTexture;
use crate::graphics::shader::ShaderContext;
use crate::graphics::texture::QuadCoords;
use crate::world::object::{GameObject, WorldObject};
use crate::world::physics::ContactQuery;

/// Number of texture rows an entity addresses.
pub const ENTITY_STATE_COUNT: usize = 6;

/// Offset probed below the entity to decide whether it stands on something.
const SUPPORT_PROBE: Vec2 = Vec2::new(0.0, -1.0);

/// Visual state for the given flags.
///
/// The moving rows only apply on the ground; an airborne entity shows the
/// airborne rows whether or not it is moving.
pub fn state_index(facing_right: bool, airborne: bool, moving: bool) -> usize {
    let mut state = facing_right as usize + if airborne { 2 } else { 0 };
    if !airborne && moving {
        state += 4;
    }
    state
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    object: WorldObject,
    msat: MultiStateAnimatedTexture,
    facing_right: bool,
    airborne: bool,
    moving: bool,
}

impl Entity {
    /// Creates an entity standing still and facing left.
    ///
    /// Fails if `msat` has fewer than [`ENTITY_STATE_COUNT`] states.
    pub fn new(
        model_coords: QuadCoords,
        mut msat: MultiStateAnimatedTexture,
    ) -> Result<Self, String> {
        if msat.state_count() < ENTITY_STATE_COUNT {
            return Err(format!(
                "entity texture needs {} states, got {}",
                ENTITY_STATE_COUNT,
                msat.state_count()
            ));
        }
        msat.set_state(state_index(false, false, false));
        Ok(Self {
            object: WorldObject::new(model_coords, Material::default()),
            msat,
            facing_right: false,
            airborne: false,
            moving: false,
        })
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Current visual state in `0..ENTITY_STATE_COUNT`.
    pub fn state(&self) -> usize {
        state_index(self.facing_right, self.airborne, self.moving)
    }

    pub fn msat(&self) -> &MultiStateAnimatedTexture {
        &self.msat
    }

    /// Faces right when `right` is true, left otherwise.
    pub fn set_facing(&mut self, right: bool) {
        if right != self.facing_right {
            self.facing_right = right;
            self.push_state();
        }
    }

    pub fn set_is_moving(&mut self, moving: bool) {
        if moving != self.moving {
            self.moving = moving;
            self.push_state();
        }
    }

    fn set_airborne(&mut self, airborne: bool) {
        if airborne != self.airborne {
            self.airborne = airborne;
            self.push_state();
        }
    }

    /// Gives the entity upward velocity `speed` if it is standing on
    /// something. Returns whether the jump happened.
    pub fn attempt_jump(&mut self, speed: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.object.set_vy(speed);
        true
    }

    fn push_state(&mut self) {
        let state = self.state();
        debug!(
            "entity state -> {} (right={}, airborne={}, moving={})",
            state, self.facing_right, self.airborne, self.moving
        );
        self.msat.set_state(state);
    }
}

impl GameObject for Entity {
    fn update(&mut self, dt: f32, physics: &dyn ContactQuery) {
        self.object.update(dt, physics);
        self.msat.update(dt);
        let airborne = !physics.contact_adjacent(&self.object, SUPPORT_PROBE.x, SUPPORT_PROBE.y);
        self.set_airborne(airborne);
    }

    fn render(&self, ctx: &mut dyn ShaderContext) {
        self.object
            .render_with(ctx, Some(self.msat.texture()), self.msat.tex_coords());
    }

    fn cleanup(&mut self, ctx: &mut dyn ShaderContext) {
        self.msat.texture().cleanup(ctx);
        self.object.cleanup(ctx);
    }

    fn object(&self) -> &WorldObject {
        &self.object
    }

    fn object_mut(&mut self) -> &mut WorldObject {
        &mut self.object
    }

    fn as_entity(&self) -> Option<&Entity> {
        Some(self)
    }

    fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::msat::AnimationState;
    use crate::graphics::texture::{Texture, TextureHandle};
    use crate::world::physics::{OpenSpace, SolidGrid};

    fn six_state_msat() -> MultiStateAnimatedTexture {
        MultiStateAnimatedTexture::new(
            Texture::new(TextureHandle(5), 96, 96),
            &[AnimationState::new(4, 0.25); ENTITY_STATE_COUNT],
        )
        .unwrap()
    }

    fn entity() -> Entity {
        Entity::new(WorldObject::rect_model(1.0, 2.0), six_state_msat()).unwrap()
    }

    #[test]
    fn state_formula_covers_all_flag_combinations() {
        for facing in [false, true] {
            for airborne in [false, true] {
                for moving in [false, true] {
                    let expected = facing as usize
                        + 2 * airborne as usize
                        + if !airborne && moving { 4 } else { 0 };
                    let state = state_index(facing, airborne, moving);
                    assert_eq!(state, expected);
                    assert!(state < ENTITY_STATE_COUNT);
                }
            }
        }
    }

    #[test]
    fn rejects_texture_without_six_states() {
        let msat = MultiStateAnimatedTexture::new(
            Texture::new(TextureHandle(5), 96, 48),
            &[AnimationState::new(2, 0.5); 3],
        )
        .unwrap();
        assert!(Entity::new(WorldObject::rect_model(1.0, 2.0), msat).is_err());
    }

    #[test]
    fn repeated_flags_keep_animation_progress() {
        let mut e = entity();
        e.set_facing(true);
        e.msat.update(0.5);
        let before = *e.msat().clock();
        e.set_facing(true);
        e.set_is_moving(false);
        assert_eq!(*e.msat().clock(), before);
        assert_eq!(before.current_frame(), 2);
    }

    #[test]
    fn flag_change_restarts_new_state() {
        let mut e = entity();
        e.msat.update(0.5);
        e.set_is_moving(true);
        assert_eq!(e.msat().state(), 4);
        assert_eq!(e.msat().clock().current_frame(), 0);
    }

    #[test]
    fn unsupported_entity_becomes_airborne() {
        let mut e = entity();
        e.update(1.0 / 60.0, &OpenSpace);
        assert!(e.is_airborne());
        assert_eq!(e.msat().state(), 2);
    }

    #[test]
    fn jump_requires_support() {
        let grid = SolidGrid::new(0.0).with_floor(-2, 2, 0);
        let mut e = entity();
        e.object_mut().set_position(Vec2::new(0.5, 2.0));
        e.update(0.0, &grid);
        assert!(!e.is_airborne());
        assert!(e.attempt_jump(5.0));
        assert_eq!(e.object().velocity().y, 5.0);

        let mut floating = entity();
        floating.update(0.0, &OpenSpace);
        assert!(!floating.attempt_jump(5.0));
    }
}
