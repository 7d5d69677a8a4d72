//! Multi-state animated textures (MSAT).
//!
//! One atlas holds several independently timed animations, one per row. The
//! active row is chosen by the owner through [`MultiStateAnimatedTexture::set_state`];
//! time only advances the active row.
//!
//! Layouts can be described in JSON:
//!
//! ```json
//! [
//!   { "frames": 2, "frame_time": 0.5 },
//!   { "frames": 1, "frame_time": 1.0 },
//!   { "frames": 12, "frame_time": 0.035 }
//! ]
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::graphics::animated::FrameClock;
use crate::graphics::texture::{QuadCoords, Texture, tex_coords_for};

/// Definition of one row of an MSAT atlas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub frames: usize,
    pub frame_time: f32,
}

impl AnimationState {
    pub fn new(frames: usize, frame_time: f32) -> Self {
        Self { frames, frame_time }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiStateAnimatedTexture {
    texture: Texture,
    states: SmallVec<[FrameClock; 6]>,
    current: usize,
    max_frames: usize,
}

impl MultiStateAnimatedTexture {
    /// Builds an MSAT with state 0 active.
    pub fn new(texture: Texture, states: &[AnimationState]) -> Result<Self, String> {
        if states.is_empty() {
            return Err("multi-state texture needs at least one state".to_string());
        }
        let states = states
            .iter()
            .enumerate()
            .map(|(i, s)| {
                FrameClock::new(s.frames, s.frame_time).map_err(|e| format!("state {}: {}", i, e))
            })
            .collect::<Result<SmallVec<[FrameClock; 6]>, String>>()?;
        let max_frames = states
            .iter()
            .map(FrameClock::frame_count)
            .max()
            .unwrap_or(1);
        Ok(Self {
            texture,
            states,
            current: 0,
            max_frames,
        })
    }

    /// Builds an MSAT from a JSON array of [`AnimationState`] objects.
    pub fn from_json(texture: Texture, json: &str) -> Result<Self, String> {
        let states: Vec<AnimationState> = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse animation states: {}", e))?;
        Self::new(texture, &states)
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self) -> usize {
        self.current
    }

    /// Progress of the active state.
    pub fn clock(&self) -> &FrameClock {
        &self.states[self.current]
    }

    /// Progress of any state, active or not.
    pub fn state_clock(&self, state: usize) -> Option<&FrameClock> {
        self.states.get(state)
    }

    /// Switches to `state`, restarting its animation from the first frame.
    ///
    /// Setting the already active state keeps its progress. Returns false and
    /// leaves the texture unchanged when `state` is out of range.
    pub fn set_state(&mut self, state: usize) -> bool {
        if state >= self.states.len() {
            warn!(
                "ignoring state {} on multi-state texture with {} states",
                state,
                self.states.len()
            );
            return false;
        }
        if state != self.current {
            debug!("multi-state texture: state {} -> {}", self.current, state);
            self.current = state;
            self.states[state].reset();
        }
        true
    }

    /// Advances the active state only.
    pub fn update(&mut self, dt: f32) {
        self.states[self.current].advance(dt);
    }

    /// UVs of the current frame of the active state.
    pub fn tex_coords(&self) -> QuadCoords {
        let column = 1.0 / self.max_frames as f32;
        let row = 1.0 / self.states.len() as f32;
        let u0 = self.clock().current_frame() as f32 * column;
        let v0 = self.current as f32 * row;
        tex_coords_for(u0, v0, u0 + column, v0 + row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::texture::TextureHandle;

    fn atlas() -> Texture {
        Texture::new(TextureHandle(9), 192, 48)
    }

    fn three_states() -> MultiStateAnimatedTexture {
        MultiStateAnimatedTexture::new(
            atlas(),
            &[
                AnimationState::new(2, 0.5),
                AnimationState::new(1, 1.0),
                AnimationState::new(4, 0.25),
            ],
        )
        .unwrap()
    }

    #[test]
    fn starts_in_state_zero() {
        let msat = three_states();
        assert_eq!(msat.state(), 0);
        assert_eq!(msat.state_count(), 3);
        assert_eq!(msat.clock().current_frame(), 0);
    }

    #[test]
    fn redundant_set_state_keeps_progress() {
        let mut msat = three_states();
        msat.set_state(2);
        msat.update(0.625);
        let before = *msat.clock();
        assert!(msat.set_state(2));
        assert_eq!(*msat.clock(), before);
        assert_eq!(before.current_frame(), 2);
    }

    #[test]
    fn switching_resets_target_state() {
        let mut msat = three_states();
        msat.set_state(2);
        msat.update(0.5);
        msat.set_state(0);
        msat.set_state(2);
        assert_eq!(msat.clock().current_frame(), 0);
        assert_eq!(msat.clock().elapsed(), 0.0);
    }

    #[test]
    fn inactive_states_do_not_advance() {
        let mut msat = three_states();
        msat.update(0.75);
        assert_eq!(msat.state_clock(0).unwrap().current_frame(), 1);
        assert_eq!(msat.state_clock(2).unwrap().current_frame(), 0);
        assert_eq!(msat.state_clock(2).unwrap().elapsed(), 0.0);
    }

    #[test]
    fn out_of_range_state_is_ignored() {
        let mut msat = three_states();
        msat.update(0.5);
        assert!(!msat.set_state(5));
        assert_eq!(msat.state(), 0);
        assert_eq!(msat.clock().current_frame(), 1);
    }

    #[test]
    fn tex_coords_address_row_and_column() {
        let mut msat = three_states();
        msat.set_state(2);
        msat.update(0.5);
        // 4 columns (widest state), 3 rows
        let uv = msat.tex_coords();
        let expected = tex_coords_for(0.5, 2.0 / 3.0, 0.75, 1.0);
        for (a, b) in uv.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn from_json_parses_layout() {
        let msat = MultiStateAnimatedTexture::from_json(
            atlas(),
            r#"[{"frames":2,"frame_time":0.5},{"frames":12,"frame_time":0.035}]"#,
        )
        .unwrap();
        assert_eq!(msat.state_count(), 2);
        assert_eq!(msat.state_clock(1).unwrap().frame_count(), 12);
    }

    #[test]
    fn from_json_rejects_invalid_layouts() {
        assert!(MultiStateAnimatedTexture::from_json(atlas(), "[]").is_err());
        assert!(MultiStateAnimatedTexture::from_json(atlas(), "not json").is_err());
        assert!(
            MultiStateAnimatedTexture::from_json(atlas(), r#"[{"frames":0,"frame_time":1.0}]"#)
                .is_err()
        );
    }
}
