//! Sprite state and per-sprite motion
//!
//! A sprite is a glyph drifting in a straight line, bouncing off the
//! viewport edges without losing energy.

use std::collections::HashSet;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::consts::*;
use crate::{elastic_out, sprite_scale};

/// Glyphs a sprite can display
pub const GLYPH_POOL: [&str; 80] = [
    "😎", "🫡", "🤠", "👾", "🫶", "🙌", "✌️", "🤘", "🤝", "🦾",
    "👁️", "🧠", "👀", "🤙", "🧑‍💻", "🤳", "👑", "💼", "🍀", "🌱",
    "🌞", "⚡️", "💥", "🔥", "🍾", "☕️", "🏆", "🎬", "🎧", "🎤",
    "🎟️", "🧩", "🎯", "🚀", "📱", "💻", "🖥️", "💾", "🎞️", "📺",
    "🎥", "🎛️", "🎚️", "🧭", "🕹️", "🔋", "💡", "🔌", "💸", "💰",
    "💎", "🪜", "🛠️", "🔧", "⚙️", "🔮", "🔭", "🧪", "🔑", "🎈",
    "🛍️", "🎉", "📥", "📬", "📈", "🗃️", "🗂️", "📚", "📝", "🔐",
    "❤️‍🔥", "⚛️", "💯", "🔆", "✅", "🛜", "💲", "👁️‍🗨️", "🔔", "💬",
];

/// A free-floating glyph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Nominal glyph size in pixels
    pub size: f32,
    pub glyph: &'static str,
    /// Scene clock time at spawn
    pub spawned_at_ms: f64,
    /// Smoothed display scale for hover/drag feedback
    pub grab_scale: f32,
}

impl Sprite {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: f32, glyph: &'static str) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            glyph,
            spawned_at_ms: 0.0,
            grab_scale: 1.0,
        }
    }

    /// Circle used for collisions and hit testing
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size * COLLISION_RADIUS_FACTOR
    }

    /// Whether `point` is inside the collision circle
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let r = self.radius();
        self.pos.distance_squared(point) <= r * r
    }

    /// Spawn animation progress in [0, 1]
    pub fn spawn_progress(&self, now_ms: f64) -> f32 {
        ((now_ms - self.spawned_at_ms) / SPAWN_ANIMATION_MS).clamp(0.0, 1.0) as f32
    }

    /// Size to draw at, including spawn pop-in and grab feedback
    pub fn display_size(&self, now_ms: f64) -> f32 {
        self.size * elastic_out(self.spawn_progress(now_ms)) * self.grab_scale
    }
}

/// Advance one tick and bounce off the viewport edges
pub fn integrate(sprite: &mut Sprite, bounds_w: f32, bounds_h: f32) {
    sprite.pos += sprite.vel;

    let half = sprite.size / 2.0;

    if sprite.pos.x <= half {
        sprite.pos.x = half;
        sprite.vel.x = -sprite.vel.x;
    } else if sprite.pos.x >= bounds_w - half {
        sprite.pos.x = bounds_w - half;
        sprite.vel.x = -sprite.vel.x;
    }

    if sprite.pos.y <= half {
        sprite.pos.y = half;
        sprite.vel.y = -sprite.vel.y;
    } else if sprite.pos.y >= bounds_h - half {
        sprite.pos.y = bounds_h - half;
        sprite.vel.y = -sprite.vel.y;
    }
}

/// Uniform magnitude in the speed band with a random sign
fn random_axis_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let speed = rng.random_range(MIN_SPEED..=MAX_SPEED);
    if rng.random_bool(0.5) { speed } else { -speed }
}

/// Pick a glyph not in `exclude`, or any glyph once all are taken
pub fn pick_glyph<R: Rng + ?Sized>(rng: &mut R, exclude: &HashSet<&str>) -> &'static str {
    let available: Vec<&'static str> = GLYPH_POOL
        .iter()
        .copied()
        .filter(|g| !exclude.contains(g))
        .collect();

    if available.is_empty() {
        GLYPH_POOL[rng.random_range(0..GLYPH_POOL.len())]
    } else {
        available[rng.random_range(0..available.len())]
    }
}

/// Create a sprite on the spawn ring around the viewport center
pub fn spawn<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    bounds_w: f32,
    bounds_h: f32,
    exclude: &HashSet<&str>,
    now_ms: f64,
) -> Sprite {
    let scale = sprite_scale(bounds_w);
    let size = rng.random_range(MIN_SIZE * scale..=MAX_SIZE * scale);

    let center = Vec2::new(bounds_w / 2.0, bounds_h / 2.0);
    let angle = rng.random_range(0.0..TAU);
    let distance = rng.random_range(SPAWN_RADIUS_MIN * scale..=SPAWN_RADIUS_MAX * scale);
    let pos = center + Vec2::from_angle(angle) * distance;

    let vel = Vec2::new(random_axis_speed(rng), random_axis_speed(rng));
    let glyph = pick_glyph(rng, exclude);

    let mut sprite = Sprite::new(id, pos, vel, size, glyph);
    sprite.spawned_at_ms = now_ms;
    sprite
}
