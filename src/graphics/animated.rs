//! Time-driven frame animation.
//!
//! [`FrameClock`] holds the frame/elapsed arithmetic shared by
//! [`AnimatedTexture`] and every state of a
//! [`MultiStateAnimatedTexture`](crate::graphics::msat::MultiStateAnimatedTexture).

use log::warn;

use crate::graphics::texture::{QuadCoords, Texture, tex_coords_for};

/// Playback progress through a looping sequence of equally long frames.
///
/// Invariants: `current_frame < frame_count` and
/// `0 <= elapsed < frame_duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    frame_count: usize,
    frame_duration: f32,
    current_frame: usize,
    elapsed: f32,
}

impl FrameClock {
    pub fn new(frame_count: usize, frame_duration: f32) -> Result<Self, String> {
        if frame_count == 0 {
            return Err("animation needs at least one frame".to_string());
        }
        if !(frame_duration > 0.0 && frame_duration.is_finite()) {
            return Err(format!(
                "frame duration must be positive and finite, got {}",
                frame_duration
            ));
        }
        Ok(Self {
            frame_count,
            frame_duration,
            current_frame: 0,
            elapsed: 0.0,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Time already spent on the current frame.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances by `dt` seconds, crossing as many frame boundaries as needed.
    ///
    /// A long stall wraps through whole cycles instead of snapping back to the
    /// first frame. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            warn!("ignoring invalid animation delta {}", dt);
            return;
        }
        self.elapsed += dt;
        if self.elapsed < self.frame_duration {
            return;
        }
        let steps = (self.elapsed / self.frame_duration).floor();
        self.elapsed = (self.elapsed - steps * self.frame_duration).max(0.0);
        let mut steps = (steps as u64 % self.frame_count as u64) as usize;
        // float division can land one boundary short
        if self.elapsed >= self.frame_duration {
            self.elapsed -= self.frame_duration;
            steps += 1;
        }
        self.current_frame = (self.current_frame + steps) % self.frame_count;
    }

    /// Jumps to `frame` with no time spent on it. Out-of-range frames wrap.
    pub fn seek(&mut self, frame: usize) {
        self.current_frame = frame % self.frame_count;
        self.elapsed = 0.0;
    }

    pub fn reset(&mut self) {
        self.seek(0);
    }
}

/// A texture holding `frame_count` frames side by side, advanced by time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedTexture {
    texture: Texture,
    clock: FrameClock,
    randomized_start: bool,
}

impl AnimatedTexture {
    /// Builds an animation over `texture`.
    ///
    /// With `rand_start` the first frame is picked at random so that several
    /// copies of the same animation do not play in lockstep.
    pub fn new(
        texture: Texture,
        frames: usize,
        frame_time: f32,
        rand_start: bool,
    ) -> Result<Self, String> {
        Self::with_rng(texture, frames, frame_time, rand_start, &mut fastrand::Rng::new())
    }

    /// Same as [`AnimatedTexture::new`] with a caller-provided random source.
    pub fn with_rng(
        texture: Texture,
        frames: usize,
        frame_time: f32,
        rand_start: bool,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, String> {
        let mut clock = FrameClock::new(frames, frame_time)?;
        if rand_start {
            clock.seek(rng.usize(0..frames));
        }
        Ok(Self {
            texture,
            clock,
            randomized_start: rand_start,
        })
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn current_frame(&self) -> usize {
        self.clock.current_frame()
    }

    pub fn randomized_start(&self) -> bool {
        self.randomized_start
    }

    pub fn update(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    /// UVs of the current frame.
    pub fn tex_coords(&self) -> QuadCoords {
        let width = 1.0 / self.clock.frame_count() as f32;
        let u0 = self.clock.current_frame() as f32 * width;
        tex_coords_for(u0, 0.0, u0 + width, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::texture::TextureHandle;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(FrameClock::new(0, 0.1).is_err());
        assert!(FrameClock::new(3, 0.0).is_err());
        assert!(FrameClock::new(3, -1.0).is_err());
        assert!(FrameClock::new(3, f32::NAN).is_err());
    }

    #[test]
    fn whole_multiples_land_on_k_mod_n() {
        for k in 0..12u32 {
            let mut clock = FrameClock::new(4, 0.25).unwrap();
            clock.advance(k as f32 * 0.25);
            assert_eq!(clock.current_frame(), (k % 4) as usize, "k = {}", k);
            assert!(approx_eq(clock.elapsed(), 0.0));
        }
    }

    #[test]
    fn halves_accumulate_like_whole_step() {
        let mut split = FrameClock::new(3, 0.5).unwrap();
        split.advance(0.25);
        split.advance(0.25);
        let mut whole = FrameClock::new(3, 0.5).unwrap();
        whole.advance(0.5);
        assert_eq!(split.current_frame(), whole.current_frame());
        assert!(approx_eq(split.elapsed(), whole.elapsed()));
        assert_eq!(split.current_frame(), 1);
    }

    #[test]
    fn large_stall_wraps_through_cycles() {
        let mut clock = FrameClock::new(5, 0.5).unwrap();
        clock.advance(0.5 * 23.0 + 0.25);
        assert_eq!(clock.current_frame(), 3);
        assert!(approx_eq(clock.elapsed(), 0.25));
    }

    #[test]
    fn single_frame_never_moves() {
        let mut clock = FrameClock::new(1, 0.1).unwrap();
        clock.advance(7.3);
        assert_eq!(clock.current_frame(), 0);
        assert!(clock.elapsed() < 0.1);
    }

    #[test]
    fn invalid_delta_is_ignored() {
        let mut clock = FrameClock::new(2, 0.5).unwrap();
        clock.advance(0.25);
        clock.advance(-1.0);
        clock.advance(f32::INFINITY);
        assert_eq!(clock.current_frame(), 0);
        assert!(approx_eq(clock.elapsed(), 0.25));
    }

    #[test]
    fn random_start_picks_valid_frame() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..32 {
            let anim = AnimatedTexture::with_rng(
                Texture::new(TextureHandle(3), 64, 16),
                4,
                0.1,
                true,
                &mut rng,
            )
            .unwrap();
            assert!(anim.current_frame() < 4);
            assert!(anim.randomized_start());
        }
    }

    #[test]
    fn tex_coords_select_frame_column() {
        let mut anim = Texture::new(TextureHandle(3), 64, 16)
            .animate(4, 0.5, false)
            .unwrap();
        anim.update(1.0);
        assert_eq!(anim.current_frame(), 2);
        assert_eq!(
            anim.tex_coords(),
            [0.5, 1.0, 0.5, 0.0, 0.75, 0.0, 0.75, 1.0]
        );
    }
}
