//! Ordered dithering and sprite-local chromatic aberration
//!
//! Dithering covers the whole frame. Aberration only touches pixels inside
//! moving sprites and reads from an untouched copy of the frame, so the two
//! passes never compound.

use glam::Vec2;

use super::frame::{FrameBuffer, Rgba};
use crate::settings::EffectSettings;
use crate::sim::Sprite;

/// 4x4 Bayer threshold ranks; threshold is rank / 16
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Bayer threshold in [0, 1) for a pixel
#[inline]
pub fn bayer(x: u32, y: u32) -> f32 {
    BAYER_4X4[(y % 4) as usize][(x % 4) as usize] as f32 / 16.0
}

/// Quantizer shared by both passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dither {
    /// Discrete levels per channel (>= 2)
    pub levels: u32,
    /// Perturbation strength, added to the unit channel value
    pub strength: f32,
}

impl Default for Dither {
    fn default() -> Self {
        Self {
            levels: 3,
            strength: 0.7,
        }
    }
}

impl Dither {
    pub fn from_settings(fx: &EffectSettings) -> Self {
        Self {
            levels: fx.color_levels.max(2),
            strength: fx.dither_strength,
        }
    }

    /// Signed perturbation for a pixel
    #[inline]
    pub fn threshold(&self, x: u32, y: u32) -> f32 {
        (bayer(x, y) - 0.5) * self.strength
    }

    /// Quantize a unit channel value with a given perturbation
    #[inline]
    pub fn quantize(&self, value: f32, threshold: f32) -> f32 {
        let steps = (self.levels - 1) as f32;
        (((value + threshold) * steps).round() / steps).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn quantize_channel(&self, channel: u8, threshold: f32) -> u8 {
        let v = self.quantize(channel as f32 / 255.0, threshold);
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    }

    /// Quantize a pixel at its screen position; alpha becomes opaque
    #[inline]
    pub fn apply(&self, px: Rgba, x: u32, y: u32) -> Rgba {
        let t = self.threshold(x, y);
        Rgba::rgb(
            self.quantize_channel(px.r, t),
            self.quantize_channel(px.g, t),
            self.quantize_channel(px.b, t),
        )
    }
}

/// Pass 1: dither every pixel in place
pub fn dither_frame(frame: &mut FrameBuffer, dither: &Dither) {
    let width = frame.width() as usize;
    for (i, px) in frame.pixels_mut().iter_mut().enumerate() {
        let x = (i % width) as u32;
        let y = (i / width) as u32;
        *px = dither.apply(*px, x, y);
    }
}

/// Pass 2: fringe red forward and blue backward along each sprite's motion
///
/// `source` is the pre-dither copy of `frame`. Pixels inside `exclude`
/// (center, radius) are left alone. Returns the number of pixels rewritten.
pub fn aberrate_sprites(
    frame: &mut FrameBuffer,
    source: &[Rgba],
    sprites: &[Sprite],
    exclude: (Vec2, f32),
    strength: f32,
    dither: &Dither,
) -> usize {
    let (width, height) = (frame.width(), frame.height());
    debug_assert_eq!(source.len(), width as usize * height as usize);

    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;
    let sample = |p: Vec2| -> Rgba {
        let x = p.x.round().clamp(0.0, max_x) as usize;
        let y = p.y.round().clamp(0.0, max_y) as usize;
        source[y * width as usize + x]
    };

    let (exclude_center, exclude_radius) = exclude;
    let exclude_r2 = exclude_radius * exclude_radius;
    let mut touched = 0;

    for sprite in sprites {
        let dir = sprite.vel.normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        let shift = dir * strength;
        let radius = sprite.radius();
        let r2 = radius * radius;
        let reach = radius + strength;

        let x0 = (sprite.pos.x - reach).floor().max(0.0);
        let y0 = (sprite.pos.y - reach).floor().max(0.0);
        let x1 = (sprite.pos.x + reach).ceil().min(max_x);
        let y1 = (sprite.pos.y + reach).ceil().min(max_y);
        if x0 > x1 || y0 > y1 {
            continue;
        }

        for y in y0 as u32..=y1 as u32 {
            for x in x0 as u32..=x1 as u32 {
                let p = Vec2::new(x as f32, y as f32);
                if p.distance_squared(sprite.pos) > r2 {
                    continue;
                }
                if p.distance_squared(exclude_center) <= exclude_r2 {
                    continue;
                }

                let i = frame.index(x, y);
                let shifted = Rgba::rgb(sample(p + shift).r, source[i].g, sample(p - shift).b);
                frame.pixels_mut()[i] = dither.apply(shifted, x, y);
                touched += 1;
            }
        }
    }

    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bayer_covers_all_ranks() {
        let mut seen = [false; 16];
        for y in 0..4 {
            for x in 0..4 {
                seen[(bayer(x, y) * 16.0) as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        // Pattern repeats every 4 pixels
        assert_eq!(bayer(1, 2), bayer(5, 6));
    }

    #[test]
    fn test_quantize_hits_levels() {
        let d = Dither::default();
        for v in 0..=255u8 {
            for (x, y) in [(0, 0), (1, 0), (3, 3), (2, 1)] {
                let q = d.quantize_channel(v, d.threshold(x, y));
                assert!(q == 0 || q == 128 || q == 255, "unexpected level {}", q);
            }
        }
    }

    #[test]
    fn test_level_snap_is_idempotent() {
        for levels in 2..=4 {
            let d = Dither {
                levels,
                strength: 0.7,
            };
            for v in 0..=255u8 {
                let once = d.quantize_channel(v, 0.0);
                assert_eq!(d.quantize_channel(once, 0.0), once);
            }
        }
    }

    #[test]
    fn test_two_levels_idempotent_at_every_position() {
        let d = Dither {
            levels: 2,
            strength: 0.7,
        };
        for y in 0..4 {
            for x in 0..4 {
                let t = d.threshold(x, y);
                for v in 0..=255u8 {
                    let once = d.quantize_channel(v, t);
                    assert_eq!(d.quantize_channel(once, t), once);
                }
            }
        }
    }

    #[test]
    fn test_perturbation_applies_to_channel_value() {
        let d = Dither::default();
        // (109/255 - 0.35) * 2 rounds to 0
        assert_eq!(d.quantize_channel(109, d.threshold(0, 0)), 0);
        for y in 0..4 {
            for x in 0..4 {
                let t = d.threshold(x, y);
                for v in 0..=255u8 {
                    let expected =
                        ((((v as f32 / 255.0) + t) * 2.0).round() / 2.0).clamp(0.0, 1.0);
                    let expected = (expected * 255.0).round() as u8;
                    assert_eq!(d.quantize_channel(v, t), expected);
                }
            }
        }
    }

    #[test]
    fn test_zero_strength_is_plain_rounding() {
        let d = Dither {
            levels: 2,
            strength: 0.0,
        };
        assert_eq!(d.quantize_channel(100, d.threshold(0, 0)), 0);
        assert_eq!(d.quantize_channel(200, d.threshold(0, 0)), 255);
    }

    #[test]
    fn test_dither_forces_opaque() {
        let mut frame = FrameBuffer::new(4, 4).unwrap();
        dither_frame(&mut frame, &Dither::default());
        assert!(frame.pixels().iter().all(|p| p.a == 255));
    }

    #[test]
    fn test_dither_mid_gray_mixes_levels() {
        let mut frame = FrameBuffer::new(4, 4).unwrap();
        frame.clear(Rgba::rgb(64, 64, 64));
        dither_frame(&mut frame, &Dither::default());
        let dark = frame.pixels().iter().filter(|p| p.r == 0).count();
        assert!(dark > 0 && dark < 16);
    }

    fn striped_frame() -> FrameBuffer {
        // Red left of x=50, blue from x=50 on
        let mut frame = FrameBuffer::new(100, 100).unwrap();
        for y in 0..100 {
            for x in 0..100 {
                let c = if x < 50 { Rgba::rgb(255, 0, 0) } else { Rgba::rgb(0, 0, 255) };
                frame.set(x, y, c);
            }
        }
        frame
    }

    #[test]
    fn test_still_sprite_is_untouched() {
        let mut frame = striped_frame();
        let source = frame.pixels().to_vec();
        let sprite = Sprite::new(1, Vec2::new(50.0, 50.0), Vec2::ZERO, 40.0, "🎯");
        let touched = aberrate_sprites(
            &mut frame,
            &source,
            &[sprite],
            (Vec2::new(-100.0, -100.0), 1.0),
            4.0,
            &Dither::default(),
        );
        assert_eq!(touched, 0);
        assert_eq!(frame.pixels(), &source[..]);
    }

    #[test]
    fn test_moving_sprite_fringes_at_edge() {
        let mut frame = striped_frame();
        let source = frame.pixels().to_vec();
        // Moving right: red sampled 4px ahead, blue 4px behind
        let sprite = Sprite::new(1, Vec2::new(50.0, 50.0), Vec2::new(2.0, 0.0), 40.0, "🎯");
        let touched = aberrate_sprites(
            &mut frame,
            &source,
            &[sprite],
            (Vec2::new(-100.0, -100.0), 1.0),
            4.0,
            &Dither {
                levels: 2,
                strength: 0.0,
            },
        );
        assert!(touched > 0);

        // Near the edge both shifted samples land on the other stripe
        assert_eq!(frame.get(48, 50), Some(Rgba::rgb(0, 0, 0)));
        assert_eq!(frame.get(51, 50), Some(Rgba::rgb(0, 0, 0)));
        // Far from the edge nothing changes
        assert_eq!(frame.get(40, 50), Some(Rgba::rgb(255, 0, 0)));
        // Outside the sprite circle nothing changes
        assert_eq!(frame.get(5, 5), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn test_button_region_is_excluded() {
        let mut frame = striped_frame();
        let source = frame.pixels().to_vec();
        let sprite = Sprite::new(1, Vec2::new(50.0, 50.0), Vec2::new(2.0, 0.0), 40.0, "🎯");
        let touched = aberrate_sprites(
            &mut frame,
            &source,
            &[sprite],
            (Vec2::new(50.0, 50.0), 100.0),
            4.0,
            &Dither::default(),
        );
        assert_eq!(touched, 0);
        assert_eq!(frame.pixels(), &source[..]);
    }
}
