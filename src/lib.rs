//! Emoji Drift - bouncing, throwable emoji sprites with a dithered post pass
//!
//! Core modules:
//! - `sim`: Sprite physics, collisions, drag-and-throw, per-tick step
//! - `renderer`: Frame buffer, button overlay, ordered dither + chromatic aberration
//! - `stage`: Coordinator owning all runtime state, the host-facing API
//! - `settings`: Tunables and quality presets
//! - `error`: Setup and settings errors

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stage;

pub use error::{SettingsError, SetupError};
pub use settings::{EffectQuality, Settings};
pub use stage::Stage;

/// Tuning constants
pub mod consts {
    /// Simulation rate the per-tick velocities are expressed in
    pub const TICK_HZ: f64 = 60.0;
    /// Milliseconds per simulation tick
    pub const TICK_MS: f64 = 1000.0 / TICK_HZ;

    /// Viewports at or below this width use the small-viewport scales
    pub const SMALL_VIEWPORT_WIDTH: f32 = 768.0;
    /// Sprite size and spawn ring scale on small viewports
    pub const SMALL_SPRITE_SCALE: f32 = 0.75;
    /// Button scale on small viewports
    pub const SMALL_BUTTON_SCALE: f32 = 0.5;

    /// Emojis don't fill their bounding box, so collide on a tighter circle
    pub const COLLISION_RADIUS_FACTOR: f32 = 0.42;

    /// Sprite speed band (pixels per tick, per axis)
    pub const MIN_SPEED: f32 = 0.75;
    pub const MAX_SPEED: f32 = 1.9;
    /// Sprite size band before viewport scaling
    pub const MIN_SIZE: f32 = 54.0;
    pub const MAX_SIZE: f32 = 108.0;
    /// Spawn ring around the viewport center before viewport scaling
    pub const SPAWN_RADIUS_MIN: f32 = 225.0;
    pub const SPAWN_RADIUS_MAX: f32 = 375.0;
    /// Spawn pop-in animation length
    pub const SPAWN_ANIMATION_MS: f64 = 500.0;

    /// Button geometry before viewport scaling
    pub const BUTTON_SIZE: f32 = 270.0;
    pub const BUTTON_VISUAL_RADIUS: f32 = BUTTON_SIZE / 2.0;
    pub const BUTTON_DEPTH: f32 = 21.0;
    pub const BUTTON_RIM: f32 = 21.0;
    /// Collision circle includes the rim plus a small buffer
    pub const BUTTON_COLLISION_RADIUS: f32 = 140.0;
    /// The dome sits above the rim center, so the obstacle does too
    pub const BUTTON_OFFSET_Y: f32 = -BUTTON_DEPTH / 2.0;

    /// Grab scale targets and easing
    pub const DRAG_SCALE: f32 = 1.3;
    pub const HOVER_SCALE: f32 = 1.12;
    pub const SCALE_SMOOTHING: f32 = 0.2;

    /// Throw velocity estimation
    pub const SAMPLE_CAPACITY: usize = 5;
    pub const THROW_WINDOW_MS: f64 = 100.0;
    pub const MAX_THROW_SPEED: f32 = 30.0;
    pub const MIN_THROW_SPEED: f32 = 0.5;

    /// Button press/hover easing rates (per frame)
    pub const HOVER_EASE: f32 = 0.15;
    pub const PRESS_EASE: f32 = 0.25;
    pub const RELEASE_EASE: f32 = 0.12;

    /// Sprites added when the button is clicked
    pub const BURST_MIN: usize = 3;
    pub const BURST_MAX: usize = 5;
}

/// True when the viewport uses the reduced small-screen scales
#[inline]
pub fn is_small_viewport(width: f32) -> bool {
    width <= consts::SMALL_VIEWPORT_WIDTH
}

/// Scale applied to sprite sizes and the spawn ring
#[inline]
pub fn sprite_scale(width: f32) -> f32 {
    if is_small_viewport(width) {
        consts::SMALL_SPRITE_SCALE
    } else {
        1.0
    }
}

/// Scale applied to the button geometry
#[inline]
pub fn button_scale(width: f32) -> f32 {
    if is_small_viewport(width) {
        consts::SMALL_BUTTON_SCALE
    } else {
        1.0
    }
}

/// Elastic ease-out: overshoots then settles at 1
pub fn elastic_out(t: f32) -> f32 {
    use std::f32::consts::TAU;
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let p = 0.4;
    2f32.powf(-10.0 * t) * ((t - p / 4.0) * TAU / p).sin() + 1.0
}

/// Exponential smoothing step toward `target`
#[inline]
pub fn ease_toward(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}
