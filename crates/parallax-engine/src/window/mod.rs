//! Window and event loop.
//!
//! Owns the `winit` event loop and the single scene window, and wires them to the
//! GPU surface, input translation and the frame clock.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
