//! Scene state: the single owner of the sprite collection
//!
//! Everything the physics mutates lives here. Other components borrow the
//! sprites for the length of one call and refer to them by id otherwise.

use std::collections::HashSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::sprite::{self, Sprite};
use crate::button_scale;
use crate::consts::*;

/// The static circular obstacle at the middle of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Button {
    /// Collision center (viewport center plus vertical offset)
    pub center: Vec2,
    /// Collision radius
    pub radius: f32,
}

impl Button {
    /// Button geometry for a viewport
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let scale = button_scale(width);
        Self {
            center: Vec2::new(width / 2.0, height / 2.0 + BUTTON_OFFSET_Y * scale),
            radius: BUTTON_COLLISION_RADIUS * scale,
        }
    }
}

/// Mutable simulation state
#[derive(Debug, Clone)]
pub struct SceneState {
    /// Viewport size in pixels
    pub width: f32,
    pub height: f32,
    pub button: Button,
    /// Sprites in draw order (last drawn is topmost)
    pub sprites: Vec<Sprite>,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl SceneState {
    /// Create an empty scene with a seeded RNG
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            width,
            height,
            button: Button::for_viewport(width, height),
            sprites: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Scene clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.time_ticks as f64 * TICK_MS
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add `count` sprites, avoiding glyphs already on screen where possible
    pub fn spawn(&mut self, count: usize) {
        let now_ms = self.now_ms();
        for _ in 0..count {
            let id = self.next_entity_id();
            let on_screen: HashSet<&str> = self.sprites.iter().map(|s| s.glyph).collect();
            let sprite = sprite::spawn(&mut self.rng, id, self.width, self.height, &on_screen, now_ms);
            self.sprites.push(sprite);
        }
        log::info!("Spawned {} sprites ({} total)", count, self.sprites.len());
    }

    /// Random count in `[min, max]` from the scene RNG
    pub fn roll_count(&mut self, min: usize, max: usize) -> usize {
        use rand::Rng;
        self.rng.random_range(min..=max.max(min))
    }

    /// Adopt a new viewport size
    ///
    /// Sprites outside the new bounds are pulled back inside; velocities are
    /// kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.button = Button::for_viewport(width, height);
        for s in &mut self.sprites {
            let half = s.size / 2.0;
            s.pos.x = s.pos.x.clamp(half, (width - half).max(half));
            s.pos.y = s.pos.y.clamp(half, (height - half).max(half));
        }
        log::info!("Viewport resized to {}x{}", width, height);
    }

    pub fn sprite(&self, id: u32) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }
}
