//! Software rendering and post-processing
//!
//! Sprites are painted into an RGBA frame, the button is drawn over them,
//! then the frame is dithered and moving sprites get chromatic fringes.

pub mod button;
pub mod dither;
pub mod frame;
pub mod painter;
pub mod post;

pub use button::ButtonOverlay;
pub use dither::{BAYER_4X4, Dither, aberrate_sprites, bayer, dither_frame};
pub use frame::{FrameBuffer, Rgba};
pub use painter::{DiscPainter, GlyphPainter, draw_sprites};
pub use post::PostProcessor;
