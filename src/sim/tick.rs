//! One physics tick
//!
//! Order matters: the held sprite's position comes from the pointer, so it
//! is skipped by every stage that could move it.

use super::collision::{CollisionStrategy, bounce_off_button};
use super::drag::DragController;
use super::sprite::integrate;
use super::state::SceneState;
use crate::consts::SCALE_SMOOTHING;
use crate::ease_toward;

/// Advance the scene by one tick
pub fn tick<C: CollisionStrategy + ?Sized>(
    state: &mut SceneState,
    drag: &DragController,
    collider: &C,
) {
    let dragged = drag.dragged();
    let (width, height) = (state.width, state.height);
    let button = state.button;

    for sprite in &mut state.sprites {
        let target = drag.scale_target(sprite.id);
        sprite.grab_scale = ease_toward(sprite.grab_scale, target, SCALE_SMOOTHING);

        if Some(sprite.id) == dragged {
            continue;
        }
        integrate(sprite, width, height);
        bounce_off_button(sprite, button.center, button.radius);
    }

    collider.resolve_all(&mut state.sprites, dragged);

    state.time_ticks += 1;
}
