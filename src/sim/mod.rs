//! Deterministic sprite simulation
//!
//! All motion lives here. This module must stay pure:
//! - Fixed tick, velocities in pixels per tick
//! - Seeded RNG only
//! - Stable iteration order (draw order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod drag;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionStrategy, Contact, PairwiseScan, bounce_off_button, circle_contact, reflect_velocity,
    resolve_pair,
};
pub use drag::{
    Cursor, DragController, DragState, PointerKind, PointerResponse, PointerSample, SampleRing,
    sprite_at, throw_velocity,
};
pub use sprite::{GLYPH_POOL, Sprite, integrate, spawn};
pub use state::{Button, SceneState};
pub use tick::tick;
