//! Post-processing: dither the frame, then fringe moving sprites
//!
//! The pre-dither copy is kept between frames and only reallocated when the
//! frame size changes.

use glam::Vec2;

use super::dither::{Dither, aberrate_sprites, dither_frame};
use super::frame::{FrameBuffer, Rgba, pixel_count};
use crate::error::SetupError;
use crate::settings::EffectSettings;
use crate::sim::Sprite;

/// Two-pass pixel post-processor
#[derive(Debug, Clone)]
pub struct PostProcessor {
    dither: Dither,
    /// Red/blue offset in pixels, `None` when aberration is off
    aberration: Option<f32>,
    scratch: Vec<Rgba>,
    scratch_size: (u32, u32),
}

impl PostProcessor {
    /// Create for a surface of the given size; fails if it has no pixels
    pub fn new(width: u32, height: u32, fx: &EffectSettings) -> Result<Self, SetupError> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            dither: Dither::from_settings(fx),
            aberration: fx.aberration.then_some(fx.aberration_strength),
            scratch: Vec::with_capacity(len),
            scratch_size: (0, 0),
        })
    }

    pub fn dither(&self) -> &Dither {
        &self.dither
    }

    /// Swap in new effect settings
    pub fn configure(&mut self, fx: &EffectSettings) {
        self.dither = Dither::from_settings(fx);
        self.aberration = fx.aberration.then_some(fx.aberration_strength);
    }

    /// Dither `frame` in place and fringe the moving `sprites`
    ///
    /// `button` (center, radius) is kept free of fringing. Returns the number
    /// of fringed pixels.
    pub fn process(&mut self, frame: &mut FrameBuffer, sprites: &[Sprite], button: (Vec2, f32)) -> usize {
        let Some(strength) = self.aberration else {
            dither_frame(frame, &self.dither);
            return 0;
        };

        let size = (frame.width(), frame.height());
        if self.scratch_size != size {
            self.scratch = frame.pixels().to_vec();
            self.scratch_size = size;
        } else {
            self.scratch.copy_from_slice(frame.pixels());
        }

        dither_frame(frame, &self.dither);
        aberrate_sprites(frame, &self.scratch, sprites, button, strength, &self.dither)
    }
}
