//! Pointer drag-and-throw
//!
//! While a sprite is held it follows the pointer and ignores physics. On
//! release it is thrown with a velocity estimated from the last few pointer
//! samples.

use std::collections::VecDeque;

use glam::Vec2;

use super::sprite::Sprite;
use crate::consts::*;

/// Pointer device kind reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Cursor the host should show after a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Over a sprite that can be picked up
    Grab,
    /// Holding a sprite
    Grabbing,
    /// Over the button
    Pointer,
}

/// Outcome of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerResponse {
    /// The host should suppress its default pointer behavior
    pub consumed: bool,
    pub cursor: Cursor,
}

/// One timestamped pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pos: Vec2,
    pub time_ms: f64,
}

impl PointerSample {
    pub fn new(pos: Vec2, time_ms: f64) -> Self {
        Self { pos, time_ms }
    }
}

/// Bounded history of recent pointer samples, oldest first
#[derive(Debug, Clone)]
pub struct SampleRing {
    samples: VecDeque<PointerSample>,
    capacity: usize,
}

impl Default for SampleRing {
    fn default() -> Self {
        Self::with_capacity(SAMPLE_CAPACITY)
    }
}

impl SampleRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample, evicting the oldest beyond capacity
    pub fn push(&mut self, sample: PointerSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Drop all samples and start over from `sample`
    pub fn reset(&mut self, sample: PointerSample) {
        self.samples.clear();
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointerSample> {
        self.samples.iter()
    }

    pub fn newest(&self) -> Option<&PointerSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&PointerSample> {
        self.samples.front()
    }
}

/// Estimate release velocity in pixels per tick
///
/// The newest sample anchors the estimate. The reference sample is the
/// oldest earlier sample within the look-back window, or the ring's oldest
/// when every earlier sample is stale. Results are clamped to the max throw
/// speed and snapped to zero below the min.
pub fn throw_velocity(samples: &SampleRing) -> Vec2 {
    let (Some(newest), Some(oldest)) = (samples.newest(), samples.oldest()) else {
        return Vec2::ZERO;
    };
    if samples.len() < 2 {
        return Vec2::ZERO;
    }

    let reference = samples
        .iter()
        .take(samples.len() - 1)
        .find(|s| newest.time_ms - s.time_ms <= THROW_WINDOW_MS)
        .unwrap_or(oldest);

    let dt_ms = newest.time_ms - reference.time_ms;
    if dt_ms <= 0.0 {
        return Vec2::ZERO;
    }

    // px/ms -> px/s -> px per 60 Hz tick
    let per_tick = ((1000.0 / dt_ms) / TICK_HZ) as f32;
    let vel = (newest.pos - reference.pos) * per_tick;

    let speed = vel.length();
    if speed > MAX_THROW_SPEED {
        vel * (MAX_THROW_SPEED / speed)
    } else if speed < MIN_THROW_SPEED {
        Vec2::ZERO
    } else {
        vel
    }
}

/// Drag interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer over a sprite, nothing held
    Hovering { sprite: u32 },
    /// Sprite held by the pointer
    Dragging { sprite: u32 },
}

/// Topmost sprite under `point` (last drawn wins)
pub fn sprite_at(sprites: &[Sprite], point: Vec2) -> Option<usize> {
    sprites.iter().rposition(|s| s.contains(point))
}

/// Pointer-driven pick up, move and throw
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    samples: SampleRing,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Id of the held sprite, if any
    pub fn dragged(&self) -> Option<u32> {
        match self.state {
            DragState::Dragging { sprite } => Some(sprite),
            _ => None,
        }
    }

    /// Id of the hovered sprite, if any (never the held one)
    pub fn hovered(&self) -> Option<u32> {
        match self.state {
            DragState::Hovering { sprite } => Some(sprite),
            _ => None,
        }
    }

    pub fn samples(&self) -> &SampleRing {
        &self.samples
    }

    /// Grab scale a sprite should ease toward
    pub fn scale_target(&self, id: u32) -> f32 {
        match self.state {
            DragState::Dragging { sprite } if sprite == id => DRAG_SCALE,
            DragState::Hovering { sprite } if sprite == id => HOVER_SCALE,
            _ => 1.0,
        }
    }

    /// Press: pick up the topmost sprite under the pointer
    pub fn pointer_down(
        &mut self,
        sprites: &mut [Sprite],
        pos: Vec2,
        time_ms: f64,
    ) -> PointerResponse {
        let Some(index) = sprite_at(sprites, pos) else {
            return PointerResponse::default();
        };

        let sprite = &mut sprites[index];
        sprite.vel = Vec2::ZERO;
        self.state = DragState::Dragging { sprite: sprite.id };
        self.samples.reset(PointerSample::new(pos, time_ms));
        log::debug!("Picked up sprite {} ({})", sprite.id, sprite.glyph);

        PointerResponse {
            consumed: true,
            cursor: Cursor::Grabbing,
        }
    }

    /// Move: drag the held sprite, or refresh hover
    pub fn pointer_move(
        &mut self,
        sprites: &mut [Sprite],
        pos: Vec2,
        time_ms: f64,
    ) -> PointerResponse {
        if let DragState::Dragging { sprite } = self.state {
            if let Some(held) = sprites.iter_mut().find(|s| s.id == sprite) {
                held.pos = pos;
                self.samples.push(PointerSample::new(pos, time_ms));
                return PointerResponse {
                    consumed: true,
                    cursor: Cursor::Grabbing,
                };
            }
            // Held sprite vanished; fall back to hover handling
            self.state = DragState::Idle;
            self.samples.clear();
        }

        match sprite_at(sprites, pos) {
            Some(index) => {
                self.state = DragState::Hovering {
                    sprite: sprites[index].id,
                };
                PointerResponse {
                    consumed: false,
                    cursor: Cursor::Grab,
                }
            }
            None => {
                self.state = DragState::Idle;
                PointerResponse::default()
            }
        }
    }

    /// Release: throw the held sprite
    pub fn pointer_up(
        &mut self,
        sprites: &mut [Sprite],
        pos: Vec2,
        time_ms: f64,
        kind: PointerKind,
    ) -> PointerResponse {
        let DragState::Dragging { sprite } = self.state else {
            // Touch has no hover once the finger lifts
            if kind == PointerKind::Touch {
                self.state = DragState::Idle;
            }
            return PointerResponse::default();
        };

        self.samples.push(PointerSample::new(pos, time_ms));
        let vel = throw_velocity(&self.samples);

        if let Some(held) = sprites.iter_mut().find(|s| s.id == sprite) {
            held.pos = pos;
            held.vel = vel;
            log::debug!("Threw sprite {} at ({:.2}, {:.2}) px/tick", sprite, vel.x, vel.y);
        }

        self.samples.clear();
        self.state = match kind {
            PointerKind::Touch => DragState::Idle,
            _ if sprites.iter().any(|s| s.id == sprite && s.contains(pos)) => {
                DragState::Hovering { sprite }
            }
            _ => DragState::Idle,
        };

        PointerResponse {
            consumed: true,
            cursor: match self.state {
                DragState::Hovering { .. } => Cursor::Grab,
                _ => Cursor::Default,
            },
        }
    }

    /// Cancel: drop any held sprite in place and forget hover
    pub fn pointer_cancel(&mut self, sprites: &mut [Sprite]) -> PointerResponse {
        if let DragState::Dragging { sprite } = self.state {
            if let Some(held) = sprites.iter_mut().find(|s| s.id == sprite) {
                held.vel = Vec2::ZERO;
            }
            log::debug!("Drag of sprite {} cancelled", sprite);
        }
        self.samples.clear();
        self.state = DragState::Idle;
        PointerResponse::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(samples: &[(f32, f32, f64)]) -> SampleRing {
        let mut ring = SampleRing::default();
        for &(x, y, t) in samples {
            ring.push(PointerSample::new(Vec2::new(x, y), t));
        }
        ring
    }

    fn field() -> Vec<Sprite> {
        vec![
            Sprite::new(10, Vec2::new(100.0, 100.0), Vec2::new(1.0, 1.0), 60.0, "🔥"),
            Sprite::new(11, Vec2::new(110.0, 100.0), Vec2::new(-1.0, 1.0), 60.0, "💡"),
            Sprite::new(12, Vec2::new(500.0, 500.0), Vec2::new(1.0, -1.0), 60.0, "🎯"),
        ]
    }

    #[test]
    fn test_throw_one_pixel_per_tick() {
        let vel = throw_velocity(&ring(&[(0.0, 0.0, 0.0), (60.0, 0.0, 1000.0)]));
        assert!((vel.x - 1.0).abs() < 1e-5);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_throw_clamps_preserving_direction() {
        let vel = throw_velocity(&ring(&[(0.0, 0.0, 0.0), (300.0, 400.0, 10.0)]));
        assert!((vel.length() - MAX_THROW_SPEED).abs() < 1e-4);
        let dir = vel.normalize();
        assert!((dir.x - 0.6).abs() < 1e-5);
        assert!((dir.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_throw_below_threshold_snaps_to_zero() {
        // 6px over a second: 0.1 px/tick
        let vel = throw_velocity(&ring(&[(0.0, 0.0, 0.0), (6.0, 0.0, 1000.0)]));
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn test_throw_uses_recent_window() {
        // Slow drift then a fast flick in the last 100ms
        let vel = throw_velocity(&ring(&[
            (0.0, 0.0, 0.0),
            (5.0, 0.0, 500.0),
            (10.0, 0.0, 920.0),
            (30.0, 0.0, 960.0),
            (50.0, 0.0, 1000.0),
        ]));
        // Reference is the 920ms sample: 40px / 80ms
        let expected = (40.0 / 80.0) * 1000.0 / 60.0;
        assert!((vel.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_throw_underflow_is_zero() {
        assert_eq!(throw_velocity(&SampleRing::default()), Vec2::ZERO);
        assert_eq!(throw_velocity(&ring(&[(5.0, 5.0, 10.0)])), Vec2::ZERO);
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let mut r = SampleRing::default();
        for i in 0..8 {
            r.push(PointerSample::new(Vec2::splat(i as f32), i as f64));
        }
        assert_eq!(r.len(), SAMPLE_CAPACITY);
        assert_eq!(r.oldest().map(|s| s.time_ms), Some(3.0));
        assert_eq!(r.newest().map(|s| s.time_ms), Some(7.0));
    }

    #[test]
    fn test_topmost_sprite_wins() {
        let sprites = field();
        // Both 10 and 11 overlap this point; 11 is drawn last
        assert_eq!(sprite_at(&sprites, Vec2::new(105.0, 100.0)), Some(1));
        assert_eq!(sprite_at(&sprites, Vec2::new(300.0, 300.0)), None);
    }

    #[test]
    fn test_hover_transitions() {
        let mut sprites = field();
        let mut drag = DragController::new();

        let resp = drag.pointer_move(&mut sprites, Vec2::new(500.0, 500.0), 0.0);
        assert_eq!(drag.state(), DragState::Hovering { sprite: 12 });
        assert_eq!(resp.cursor, Cursor::Grab);
        assert!(!resp.consumed);

        // Repeating the same move is idempotent
        drag.pointer_move(&mut sprites, Vec2::new(500.0, 500.0), 1.0);
        assert_eq!(drag.state(), DragState::Hovering { sprite: 12 });

        drag.pointer_move(&mut sprites, Vec2::new(300.0, 300.0), 2.0);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_press_picks_up_and_zeroes_velocity() {
        let mut sprites = field();
        let mut drag = DragController::new();

        let resp = drag.pointer_down(&mut sprites, Vec2::new(500.0, 500.0), 0.0);
        assert!(resp.consumed);
        assert_eq!(drag.dragged(), Some(12));
        assert_eq!(sprites[2].vel, Vec2::ZERO);
        assert_eq!(drag.samples().len(), 1);
        assert_eq!(drag.scale_target(12), DRAG_SCALE);
        assert_eq!(drag.scale_target(10), 1.0);
    }

    #[test]
    fn test_press_on_empty_space_is_ignored() {
        let mut sprites = field();
        let mut drag = DragController::new();
        let resp = drag.pointer_down(&mut sprites, Vec2::new(800.0, 50.0), 0.0);
        assert!(!resp.consumed);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_drag_moves_sprite_and_throws() {
        let mut sprites = field();
        let mut drag = DragController::new();

        drag.pointer_down(&mut sprites, Vec2::new(500.0, 500.0), 0.0);
        drag.pointer_move(&mut sprites, Vec2::new(520.0, 500.0), 20.0);
        assert_eq!(sprites[2].pos, Vec2::new(520.0, 500.0));
        drag.pointer_move(&mut sprites, Vec2::new(540.0, 500.0), 40.0);

        let resp = drag.pointer_up(&mut sprites, Vec2::new(560.0, 500.0), 60.0, PointerKind::Mouse);
        assert!(resp.consumed);
        assert_eq!(drag.dragged(), None);
        // 60px over 60ms is 1000 px/s, 16.67 px/tick
        assert!((sprites[2].vel.x - 1000.0 / 60.0).abs() < 1e-3);
        assert_eq!(sprites[2].vel.y, 0.0);
        assert!(drag.samples().is_empty());
    }

    #[test]
    fn test_release_without_motion_is_still() {
        let mut sprites = field();
        let mut drag = DragController::new();

        drag.pointer_down(&mut sprites, Vec2::new(500.0, 500.0), 0.0);
        drag.pointer_up(&mut sprites, Vec2::new(500.0, 500.0), 250.0, PointerKind::Mouse);
        assert_eq!(sprites[2].vel, Vec2::ZERO);
        assert_eq!(drag.state(), DragState::Hovering { sprite: 12 });
    }

    #[test]
    fn test_touch_release_clears_hover() {
        let mut sprites = field();
        let mut drag = DragController::new();

        drag.pointer_down(&mut sprites, Vec2::new(500.0, 500.0), 0.0);
        drag.pointer_up(&mut sprites, Vec2::new(500.0, 500.0), 10.0, PointerKind::Touch);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_cancel_drops_sprite() {
        let mut sprites = field();
        let mut drag = DragController::new();

        drag.pointer_down(&mut sprites, Vec2::new(500.0, 500.0), 0.0);
        drag.pointer_move(&mut sprites, Vec2::new(600.0, 500.0), 10.0);
        drag.pointer_cancel(&mut sprites);

        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(sprites[2].vel, Vec2::ZERO);
        assert_eq!(sprites[2].pos, Vec2::new(600.0, 500.0));
    }
}
