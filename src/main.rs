//! Emoji Drift headless demo
//!
//! Runs the stage for a few seconds with a scripted throw and button click,
//! rendering every frame with the disc painter. Pass a settings JSON path as
//! the first argument to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use emoji_drift::renderer::DiscPainter;
    use emoji_drift::sim::PointerKind;
    use emoji_drift::{Settings, Stage};
    use glam::Vec2;

    const WIDTH: u32 = 1000;
    const HEIGHT: u32 = 800;
    const FRAMES: u32 = 300;

    env_logger::init();
    log::info!("Emoji Drift (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut stage = match Stage::new(WIDTH, HEIGHT, settings) {
        Ok(stage) => stage,
        Err(err) => {
            log::error!("Failed to create stage: {}", err);
            std::process::exit(1);
        }
    };

    let mut painter = DiscPainter;
    let center = Vec2::new(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
    let mut grab: Option<Vec2> = None;

    for frame in 0..FRAMES {
        let now = stage.now_ms();
        match frame {
            // Pick up the topmost sprite once it has popped in
            60 => {
                if let Some(top) = stage.sprites().last() {
                    grab = Some(top.pos);
                    stage.pointer_down(top.pos, now, PointerKind::Mouse);
                }
            }
            61..=70 => {
                if let Some(start) = grab {
                    let offset = Vec2::new(12.0, -6.0) * (frame - 60) as f32;
                    stage.pointer_move(start + offset, now, PointerKind::Mouse);
                }
            }
            71 => {
                if let Some(start) = grab.take() {
                    let end = start + Vec2::new(130.0, -65.0);
                    stage.pointer_up(end, now, PointerKind::Mouse);
                }
            }
            120 => {
                stage.pointer_down(center, now, PointerKind::Touch);
            }
            124 => {
                stage.pointer_up(center, now, PointerKind::Touch);
            }
            _ => {}
        }

        stage.step();
        stage.render(&mut painter);
    }

    let fastest = stage
        .sprites()
        .iter()
        .map(|s| s.vel.length())
        .fold(0.0f32, f32::max);
    let lit = stage
        .frame()
        .as_bytes()
        .chunks_exact(4)
        .filter(|px| px[0] > 0 || px[1] > 0 || px[2] > 0)
        .count();

    log::info!(
        "Ran {} frames ({:.0} ms): {} sprites, fastest {:.2} px/tick, {} lit pixels",
        FRAMES,
        stage.now_ms(),
        stage.sprites().len(),
        fastest,
        lit
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; the host drives `Stage` directly
}
