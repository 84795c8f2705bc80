//! Collision detection and response for circular sprites
//!
//! Sprites bounce off the static button and off each other. Both checks are
//! circle-circle overlaps; they differ only in who moves afterwards.

use glam::Vec2;

use super::sprite::Sprite;

/// Overlap between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first circle's center toward the second's
    pub normal: Vec2,
    /// Current center distance
    pub distance: f32,
    /// Sum of radii
    pub min_distance: f32,
}

impl Contact {
    /// How far the circles overlap
    #[inline]
    pub fn penetration(&self) -> f32 {
        self.min_distance - self.distance
    }
}

/// Overlap test for two circles
///
/// Coincident centers have no usable normal and report no contact.
pub fn circle_contact(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> Option<Contact> {
    let delta = b - a;
    let distance = delta.length();
    let min_distance = a_radius + b_radius;

    if distance < min_distance && distance > 0.0 {
        Some(Contact {
            normal: delta / distance,
            distance,
            min_distance,
        })
    } else {
        None
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce a sprite off the immovable button circle
///
/// The sprite is placed exactly on the button boundary so it can't stick or
/// tunnel on the next tick. Returns true on contact.
pub fn bounce_off_button(sprite: &mut Sprite, button_center: Vec2, button_radius: f32) -> bool {
    let Some(contact) = circle_contact(button_center, button_radius, sprite.pos, sprite.radius())
    else {
        return false;
    };

    sprite.vel = reflect_velocity(sprite.vel, contact.normal);
    sprite.pos = button_center + contact.normal * contact.min_distance;
    true
}

/// Resolve one sprite pair (equal masses)
///
/// Velocities are exchanged along the normal only while the pair is
/// approaching, but overlap is always pushed apart.
pub fn resolve_pair(a: &mut Sprite, b: &mut Sprite) -> bool {
    let Some(contact) = circle_contact(a.pos, a.radius(), b.pos, b.radius()) else {
        return false;
    };
    let n = contact.normal;

    let approach = (a.vel - b.vel).dot(n);
    if approach > 0.0 {
        a.vel -= approach * n;
        b.vel += approach * n;
    }

    let push = contact.penetration() / 2.0;
    a.pos -= push * n;
    b.pos += push * n;
    true
}

/// Strategy for resolving all sprite-sprite contacts in a tick
pub trait CollisionStrategy {
    /// Resolve contacts among `sprites`, leaving the sprite with id `skip`
    /// untouched and out of every pair. Returns the number of contacts.
    fn resolve_all(&self, sprites: &mut [Sprite], skip: Option<u32>) -> usize;
}

/// Test every unordered pair, O(n²)
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseScan;

impl CollisionStrategy for PairwiseScan {
    fn resolve_all(&self, sprites: &mut [Sprite], skip: Option<u32>) -> usize {
        let mut contacts = 0;
        for i in 0..sprites.len() {
            if Some(sprites[i].id) == skip {
                continue;
            }
            // Split so both sprites can be borrowed mutably
            let (head, tail) = sprites.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if Some(b.id) == skip {
                    continue;
                }
                if resolve_pair(a, b) {
                    contacts += 1;
                }
            }
        }
        contacts
    }
}
