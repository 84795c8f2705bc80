//! RGBA frame buffer
//!
//! The host uploads `as_bytes()` to whatever surface it owns.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::error::SetupError;

/// One RGBA8 pixel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb`
    pub fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Channels as floats in [0, 1]
    #[inline]
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Source-over blend of `color` (unit RGB) with `alpha` coverage
    #[inline]
    pub fn blend(self, color: [f32; 3], alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |dst: u8, src: f32| {
            let dst = dst as f32 / 255.0;
            ((dst + (src - dst) * alpha) * 255.0).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, color[0]),
            g: mix(self.g, color[1]),
            b: mix(self.b, color[2]),
            a: 255,
        }
    }
}

/// Software frame buffer, row-major
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl FrameBuffer {
    /// Allocate a frame; fails for surfaces with no pixels
    pub fn new(width: u32, height: u32) -> Result<Self, SetupError> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Rgba::default(); len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Reallocate for a new size, discarding contents
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SetupError> {
        let len = pixel_count(width, height)?;
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(len, Rgba::default());
        Ok(())
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = color;
        }
    }

    /// Blend a unit-RGB color over one pixel
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: [f32; 3], alpha: f32) {
        if x < 0 || y < 0 || alpha <= 0.0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = self.pixels[i].blend(color, alpha);
        }
    }

    /// Fill an anti-aliased disc, shading each covered pixel
    ///
    /// `shade` gets the pixel center and returns a unit RGB color and an
    /// alpha that is multiplied by edge coverage.
    pub fn shade_disc<F>(&mut self, center: Vec2, radius: f32, mut shade: F)
    where
        F: FnMut(Vec2) -> ([f32; 3], f32),
    {
        if radius <= 0.0 {
            return;
        }
        let x0 = (center.x - radius - 1.0).floor().max(0.0) as i32;
        let y0 = (center.y - radius - 1.0).floor().max(0.0) as i32;
        let x1 = (center.x + radius + 1.0).ceil().min(self.width as f32 - 1.0) as i32;
        let y1 = (center.y + radius + 1.0).ceil().min(self.height as f32 - 1.0) as i32;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius - p.distance(center) + 0.5).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let (color, alpha) = shade(p);
                self.blend(x, y, color, alpha * coverage);
            }
        }
    }
}

/// Pixel count for a surface, or why it is unusable
pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize, SetupError> {
    if width == 0 || height == 0 {
        return Err(SetupError::EmptySurface { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .filter(|n| n.checked_mul(std::mem::size_of::<Rgba>()).is_some())
        .ok_or(SetupError::SurfaceTooLarge { width, height })
}
