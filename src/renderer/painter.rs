//! Sprite drawing
//!
//! Glyph rasterization belongs to the host (font stack, emoji atlas, ...).
//! It plugs in through `GlyphPainter`; `DiscPainter` is a flat stand-in.

use glam::Vec2;

use super::frame::{FrameBuffer, Rgba};
use crate::consts::COLLISION_RADIUS_FACTOR;
use crate::sim::Sprite;

/// Draws one glyph centered at a point
pub trait GlyphPainter {
    /// `size` is the glyph's em size in pixels, already scaled for
    /// spawn animation and grab feedback
    fn paint(&mut self, frame: &mut FrameBuffer, glyph: &str, center: Vec2, size: f32);
}

/// Flat disc per glyph, colored from a hash of the glyph
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscPainter;

/// Saturated palette for the disc fallback
const PALETTE: [u32; 8] = [
    0xffb300, 0x43a047, 0x1e88e5, 0x8e24aa, 0xf4511e, 0x00acc1, 0xfdd835, 0x6d4c41,
];

impl DiscPainter {
    /// Stable color for a glyph (FNV-1a over its bytes)
    pub fn color_for(glyph: &str) -> Rgba {
        let hash = glyph
            .bytes()
            .fold(0x811c9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x01000193));
        Rgba::from_hex(PALETTE[hash as usize % PALETTE.len()])
    }
}

impl GlyphPainter for DiscPainter {
    fn paint(&mut self, frame: &mut FrameBuffer, glyph: &str, center: Vec2, size: f32) {
        let color = Self::color_for(glyph).to_unit();
        frame.shade_disc(center, size * COLLISION_RADIUS_FACTOR, |_| (color, 1.0));
    }
}

/// Draw sprites in order so later ones end up on top
pub fn draw_sprites<P: GlyphPainter + ?Sized>(
    frame: &mut FrameBuffer,
    sprites: &[Sprite],
    now_ms: f64,
    painter: &mut P,
) {
    for sprite in sprites {
        let size = sprite.display_size(now_ms);
        if size > 0.0 {
            painter.paint(frame, sprite.glyph, sprite.pos, size);
        }
    }
}
