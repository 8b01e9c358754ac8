//! Coordinate types shared by input handling, derivations and the scene.
//!
//! Two spaces are in play:
//! - viewport space: logical pixels, origin top-left, +Y down (pointer, scroll, viewport)
//! - scene space: world units, origin at the view centre, +Y up (object positions)
//!
//! Conversions between them live in the derivations, not here.

mod vec2;
mod vec3;
mod viewport;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use viewport::Viewport;
