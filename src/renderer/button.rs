//! Pressable dome button overlay
//!
//! Purely visual: hover and press ease toward their targets every frame and
//! drive the dome's brightness, highlight and press depth. The physics
//! obstacle lives in `sim::Button`.

use glam::Vec2;

use super::frame::{FrameBuffer, Rgba};
use crate::consts::*;
use crate::sim::PointerKind;
use crate::{button_scale, ease_toward};

/// Rim gradient, top to bottom
const RIM_STOPS: [(f32, u32); 7] = [
    (0.0, 0xf5f5f5),
    (0.1, 0xe8e8e8),
    (0.3, 0xd0d0d0),
    (0.5, 0xa8a8a8),
    (0.7, 0x888888),
    (0.9, 0x707070),
    (1.0, 0x606060),
];

/// Dome gradient, top to bottom
const DOME_STOPS: [(f32, u32); 6] = [
    (0.0, 0xff5252),
    (0.2, 0xf44336),
    (0.4, 0xe53935),
    (0.6, 0xd32f2f),
    (0.8, 0xc62828),
    (1.0, 0xb71c1c),
];

const SHADOW_BLUR: f32 = 12.0;
const SHADOW_ALPHA: f32 = 0.5;
const PRESS_DEPTH: f32 = 15.0;
const SHADOW_LIFT: f32 = 18.0;

/// Linear gradient lookup with per-stop brightening
fn gradient(stops: &[(f32, u32)], t: f32, brightness: f32) -> [f32; 3] {
    let color = |hex: u32| {
        let c = Rgba::from_hex(hex).to_unit();
        [
            (c[0] * brightness).min(1.0),
            (c[1] * brightness).min(1.0),
            (c[2] * brightness).min(1.0),
        ]
    };

    let t = t.clamp(0.0, 1.0);
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let u = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let (a, b) = (color(c0), color(c1));
            return [
                a[0] + (b[0] - a[0]) * u,
                a[1] + (b[1] - a[1]) * u,
                a[2] + (b[2] - a[2]) * u,
            ];
        }
    }
    stops.last().map(|&(_, c)| color(c)).unwrap_or([0.0; 3])
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Animated button state
#[derive(Debug, Clone, Default)]
pub struct ButtonOverlay {
    hovering: bool,
    pressed: bool,
    /// 0 = resting, 1 = fully hovered
    pub hover_amount: f32,
    /// 0 = up, 1 = fully pressed
    pub press_amount: f32,
}

impl ButtonOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Hit circle for a viewport: center and radius
    pub fn hit_circle(width: f32, height: f32) -> (Vec2, f32) {
        (
            Vec2::new(width / 2.0, height / 2.0),
            BUTTON_VISUAL_RADIUS * button_scale(width),
        )
    }

    /// Whether `pos` is over the button
    pub fn is_over(pos: Vec2, width: f32, height: f32) -> bool {
        let (center, radius) = Self::hit_circle(width, height);
        pos.distance(center) <= radius
    }

    /// Returns true when hover changed
    pub fn pointer_move(&mut self, pos: Vec2, width: f32, height: f32) -> bool {
        let was = self.hovering;
        self.hovering = Self::is_over(pos, width, height);
        was != self.hovering
    }

    /// Returns true when the press landed on the button
    pub fn pointer_down(&mut self, pos: Vec2, width: f32, height: f32) -> bool {
        if Self::is_over(pos, width, height) {
            self.pressed = true;
            // Touch has no hover, so pressing implies it
            self.hovering = true;
            true
        } else {
            false
        }
    }

    /// Returns true when a press was released over the button (a click)
    pub fn pointer_up(&mut self, pos: Vec2, width: f32, height: f32, kind: PointerKind) -> bool {
        let clicked = self.pressed && Self::is_over(pos, width, height);
        self.pressed = false;
        if kind == PointerKind::Touch {
            self.hovering = false;
        }
        clicked
    }

    /// Pointer cancelled or left the surface
    pub fn pointer_cancel(&mut self) {
        self.pressed = false;
        self.hovering = false;
    }

    /// Ease hover and press one frame toward their targets
    pub fn update(&mut self) {
        let hover_target = if self.hovering { 1.0 } else { 0.0 };
        let press_target = if self.pressed { 1.0 } else { 0.0 };
        let press_rate = if self.pressed { PRESS_EASE } else { RELEASE_EASE };

        self.hover_amount = ease_toward(self.hover_amount, hover_target, HOVER_EASE);
        self.press_amount = ease_toward(self.press_amount, press_target, press_rate);
    }

    /// Dome center and radius for a viewport at the current press amount
    pub fn dome(&self, width: f32, height: f32) -> (Vec2, f32) {
        let scale = button_scale(width);
        let radius = BUTTON_VISUAL_RADIUS * scale;
        let depth = BUTTON_DEPTH * scale;
        let press_offset = self.press_amount * PRESS_DEPTH * scale;
        (
            Vec2::new(width / 2.0, height / 2.0 - depth + press_offset),
            radius - BUTTON_RIM * scale,
        )
    }

    /// Draw shadow, rim, dome and highlight
    pub fn draw(&self, frame: &mut FrameBuffer) {
        let (width, height) = (frame.width() as f32, frame.height() as f32);
        let scale = button_scale(width);
        let center = Vec2::new(width / 2.0, height / 2.0);
        let radius = BUTTON_VISUAL_RADIUS * scale;
        let depth = BUTTON_DEPTH * scale;

        // Shadow
        let shadow_y = depth + 6.0 * scale - self.press_amount * SHADOW_LIFT * scale;
        let shadow_center = center + Vec2::new(0.0, shadow_y);
        frame.shade_disc(shadow_center, radius + SHADOW_BLUR, |p| {
            let d = p.distance(shadow_center);
            let falloff = 1.0 - smoothstep(radius - SHADOW_BLUR, radius + SHADOW_BLUR, d);
            ([0.0; 3], SHADOW_ALPHA * falloff)
        });

        // Rim
        let top = center.y - radius;
        frame.shade_disc(center, radius, |p| {
            (gradient(&RIM_STOPS, (p.y - top) / (2.0 * radius), 1.0), 1.0)
        });

        // Dome
        let (dome_center, dome_radius) = self.dome(width, height);
        let brightness = 1.0 + self.hover_amount * 0.1;
        let dome_top = dome_center.y - dome_radius;
        frame.shade_disc(dome_center, dome_radius, |p| {
            let t = (p.y - dome_top) / (2.0 * dome_radius);
            (gradient(&DOME_STOPS, t, brightness), 1.0)
        });

        // Glossy highlight, clipped to the dome
        let glint = dome_center - Vec2::splat(dome_radius * 0.3);
        let glint_radius = dome_radius * 0.8;
        let peak = 0.6 + self.hover_amount * 0.1;
        frame.shade_disc(dome_center, dome_radius, |p| {
            let t = p.distance(glint) / glint_radius;
            let alpha = if t < 0.4 {
                peak + (0.2 - peak) * (t / 0.4)
            } else if t < 1.0 {
                0.2 * (1.0 - (t - 0.4) / 0.6)
            } else {
                0.0
            };
            ([1.0; 3], alpha)
        });
    }
}
