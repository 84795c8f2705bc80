//! Stage: the host-facing owner of all runtime state
//!
//! The host calls `step` then `render` once per animation frame, forwards
//! pointer events, and uploads `frame().as_bytes()`.

use glam::Vec2;

use crate::consts::{BURST_MAX, BURST_MIN};
use crate::error::SetupError;
use crate::renderer::{ButtonOverlay, FrameBuffer, GlyphPainter, PostProcessor, Rgba, draw_sprites};
use crate::settings::Settings;
use crate::sim::{
    CollisionStrategy, Cursor, DragController, PairwiseScan, PointerKind, PointerResponse,
    SceneState, Sprite, tick,
};

pub struct Stage {
    scene: SceneState,
    drag: DragController,
    overlay: ButtonOverlay,
    collider: Box<dyn CollisionStrategy>,
    frame: FrameBuffer,
    post: PostProcessor,
    background: Rgba,
    settings: Settings,
}

impl Stage {
    /// Create a stage and spawn the initial sprites
    pub fn new(width: u32, height: u32, settings: Settings) -> Result<Self, SetupError> {
        Self::with_collider(width, height, settings, Box::new(PairwiseScan))
    }

    /// Same as `new` with a custom collision strategy
    pub fn with_collider(
        width: u32,
        height: u32,
        settings: Settings,
        collider: Box<dyn CollisionStrategy>,
    ) -> Result<Self, SetupError> {
        let frame = FrameBuffer::new(width, height)?;
        let post = PostProcessor::new(width, height, &settings.effects)?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let [r, g, b] = settings.effects.background;

        let mut scene = SceneState::new(width as f32, height as f32, seed);
        scene.spawn(settings.initial_sprites);
        log::info!(
            "Stage {}x{} ready (quality {}, seed {})",
            width,
            height,
            settings.quality.as_str(),
            seed
        );

        Ok(Self {
            scene,
            drag: DragController::new(),
            overlay: ButtonOverlay::new(),
            collider,
            frame,
            post,
            background: Rgba::rgb(r, g, b),
            settings,
        })
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.scene.sprites
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn overlay(&self) -> &ButtonOverlay {
        &self.overlay
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap in new effect settings; takes effect on the next `render`
    ///
    /// Seed and initial sprite count only matter at construction and are
    /// stored as given.
    pub fn apply_settings(&mut self, settings: Settings) {
        let [r, g, b] = settings.effects.background;
        self.background = Rgba::rgb(r, g, b);
        self.post.configure(&settings.effects);
        log::info!("Applied settings (quality {})", settings.quality.as_str());
        self.settings = settings;
    }

    /// Last rendered frame
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Scene clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.scene.now_ms()
    }

    pub fn spawn(&mut self, count: usize) {
        self.scene.spawn(count);
    }

    /// Advance physics by one tick
    pub fn step(&mut self) {
        tick(&mut self.scene, &self.drag, self.collider.as_ref());
    }

    /// Draw sprites and button, then post-process the frame in place
    pub fn render<P: GlyphPainter + ?Sized>(&mut self, painter: &mut P) {
        self.frame.clear(self.background);
        draw_sprites(&mut self.frame, &self.scene.sprites, self.scene.now_ms(), painter);

        self.overlay.update();
        self.overlay.draw(&mut self.frame);

        let hit = ButtonOverlay::hit_circle(self.scene.width, self.scene.height);
        self.post.process(&mut self.frame, &self.scene.sprites, hit);
    }

    /// Adopt a new surface size; the old frame is kept on failure
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SetupError> {
        self.frame.resize(width, height)?;
        self.scene.resize(width as f32, height as f32);
        Ok(())
    }

    pub fn pointer_down(&mut self, pos: Vec2, time_ms: f64, _kind: PointerKind) -> PointerResponse {
        // The button is drawn over the sprites, so it takes the press first
        if self.overlay.pointer_down(pos, self.scene.width, self.scene.height) {
            return PointerResponse {
                consumed: true,
                cursor: Cursor::Pointer,
            };
        }
        self.drag.pointer_down(&mut self.scene.sprites, pos, time_ms)
    }

    pub fn pointer_move(&mut self, pos: Vec2, time_ms: f64, _kind: PointerKind) -> PointerResponse {
        if self.drag.dragged().is_some() {
            return self.drag.pointer_move(&mut self.scene.sprites, pos, time_ms);
        }

        self.overlay.pointer_move(pos, self.scene.width, self.scene.height);
        let response = self.drag.pointer_move(&mut self.scene.sprites, pos, time_ms);
        if self.overlay.is_hovering() {
            PointerResponse {
                cursor: Cursor::Pointer,
                ..response
            }
        } else {
            response
        }
    }

    pub fn pointer_up(&mut self, pos: Vec2, time_ms: f64, kind: PointerKind) -> PointerResponse {
        let clicked = self.overlay.pointer_up(pos, self.scene.width, self.scene.height, kind);
        let response = self.drag.pointer_up(&mut self.scene.sprites, pos, time_ms, kind);

        if clicked {
            let count = self.scene.roll_count(BURST_MIN, BURST_MAX);
            log::info!("Button clicked, spawning {} sprites", count);
            self.scene.spawn(count);
            return PointerResponse {
                consumed: true,
                cursor: if kind == PointerKind::Touch {
                    Cursor::Default
                } else {
                    Cursor::Pointer
                },
            };
        }
        response
    }

    pub fn pointer_cancel(&mut self) -> PointerResponse {
        self.overlay.pointer_cancel();
        self.drag.pointer_cancel(&mut self.scene.sprites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::renderer::DiscPainter;
    use crate::settings::EffectQuality;

    fn seeded() -> Settings {
        Settings {
            seed: Some(7),
            ..Settings::default()
        }
    }

    /// A point over a sprite that no later sprite covers
    fn grab_point(stage: &Stage) -> (u32, Vec2) {
        let sprites = stage.sprites();
        let top = sprites.last().unwrap();
        (top.id, top.pos)
    }

    #[test]
    fn test_new_spawns_initial_sprites() {
        let stage = Stage::new(1000, 800, seeded()).unwrap();
        assert_eq!(stage.sprites().len(), 5);
        assert_eq!(stage.frame().pixels().len(), 800_000);
    }

    #[test]
    fn test_empty_surface_is_rejected() {
        assert!(matches!(
            Stage::new(0, 800, seeded()),
            Err(SetupError::EmptySurface { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_scene() {
        let mut a = Stage::new(1000, 800, seeded()).unwrap();
        let mut b = Stage::new(1000, 800, seeded()).unwrap();
        for _ in 0..120 {
            a.step();
            b.step();
        }
        assert_eq!(a.sprites(), b.sprites());
        assert!((a.now_ms() - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn test_drag_and_throw() {
        let mut stage = Stage::new(1000, 800, seeded()).unwrap();
        let (id, start) = grab_point(&stage);

        let down = stage.pointer_down(start, 0.0, PointerKind::Mouse);
        assert!(down.consumed);
        assert_eq!(down.cursor, Cursor::Grabbing);
        assert_eq!(stage.drag().dragged(), Some(id));

        stage.pointer_move(start + Vec2::new(10.0, 0.0), 16.0, PointerKind::Mouse);
        stage.step();
        // Held sprite follows the pointer, not its velocity
        assert_eq!(stage.scene().sprite(id).unwrap().pos, start + Vec2::new(10.0, 0.0));

        let end = start + Vec2::new(20.0, 0.0);
        stage.pointer_up(end, 32.0, PointerKind::Mouse);
        assert_eq!(stage.drag().dragged(), None);
        let vel = stage.scene().sprite(id).unwrap().vel;
        assert!(vel.x > 0.5 && vel.y.abs() < 1e-6);
    }

    #[test]
    fn test_button_click_spawns_burst() {
        let mut stage = Stage::new(1000, 800, seeded()).unwrap();
        let center = Vec2::new(500.0, 400.0);

        let down = stage.pointer_down(center, 0.0, PointerKind::Mouse);
        assert_eq!(down.cursor, Cursor::Pointer);
        assert!(stage.overlay().is_pressed());

        let up = stage.pointer_up(center, 50.0, PointerKind::Mouse);
        assert!(up.consumed);
        let added = stage.sprites().len() - 5;
        assert!((BURST_MIN..=BURST_MAX).contains(&added));

        // New ids are unique
        let ids: HashSet<u32> = stage.sprites().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), stage.sprites().len());
    }

    #[test]
    fn test_release_off_button_spawns_nothing() {
        let mut stage = Stage::new(1000, 800, seeded()).unwrap();
        stage.pointer_down(Vec2::new(500.0, 400.0), 0.0, PointerKind::Mouse);
        stage.pointer_up(Vec2::new(5.0, 5.0), 50.0, PointerKind::Mouse);
        assert_eq!(stage.sprites().len(), 5);
    }

    #[test]
    fn test_hovering_button_shows_pointer() {
        let mut stage = Stage::new(1000, 800, seeded()).unwrap();
        let r = stage.pointer_move(Vec2::new(500.0, 400.0), 0.0, PointerKind::Mouse);
        assert_eq!(r.cursor, Cursor::Pointer);
        assert!(stage.overlay().is_hovering());
    }

    #[test]
    fn test_cancel_drops_held_sprite() {
        let mut stage = Stage::new(1000, 800, seeded()).unwrap();
        let (id, start) = grab_point(&stage);
        stage.pointer_down(start, 0.0, PointerKind::Touch);
        stage.pointer_move(start + Vec2::new(30.0, 0.0), 10.0, PointerKind::Touch);
        stage.pointer_cancel();
        assert_eq!(stage.drag().dragged(), None);
        assert_eq!(stage.scene().sprite(id).unwrap().vel, Vec2::ZERO);
    }

    #[test]
    fn test_render_outputs_dithered_opaque_frame() {
        let mut stage = Stage::new(320, 240, Settings::from_preset(EffectQuality::High)).unwrap();
        for _ in 0..40 {
            stage.step();
        }
        stage.render(&mut DiscPainter);

        let levels = stage.settings().effects.color_levels;
        let steps = (levels - 1) as f32;
        for px in stage.frame().pixels() {
            assert_eq!(px.a, 255);
            for c in [px.r, px.g, px.b] {
                let scaled = c as f32 / 255.0 * steps;
                assert!((scaled - scaled.round()).abs() < 0.01, "off-level channel {}", c);
            }
        }
    }

    #[test]
    fn test_apply_settings_switches_quality() {
        let mut stage = Stage::new(200, 160, seeded()).unwrap();
        let mut low = Settings::from_preset(EffectQuality::Low);
        low.effects.background = [0xff, 0xff, 0xff];
        stage.apply_settings(low);
        assert_eq!(stage.settings().quality, EffectQuality::Low);
        assert_eq!(stage.post.dither().levels, 2);

        stage.render(&mut DiscPainter);
        // Two levels leave only pure channel values
        for px in stage.frame().pixels() {
            for c in [px.r, px.g, px.b] {
                assert!(c == 0 || c == 255, "off-level channel {}", c);
            }
        }
    }

    #[test]
    fn test_resize_updates_frame_and_button() {
        let mut stage = Stage::new(1000, 800, seeded()).unwrap();
        stage.resize(600, 400).unwrap();
        assert_eq!(stage.frame().width(), 600);
        assert_eq!(stage.scene().button.center.x, 300.0);
        for s in stage.sprites() {
            assert!(s.pos.x <= 600.0 && s.pos.y <= 400.0);
        }
        assert!(stage.resize(0, 0).is_err());
        assert_eq!(stage.frame().width(), 600);

        // Rendering at the new size works
        stage.render(&mut DiscPainter);
    }
}
