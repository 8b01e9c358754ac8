//! Parallax engine crate.
//!
//! Scroll, pointer and time signals are spring-smoothed, pushed through a graph of
//! pure derivations, and bound to a fixed set of renderable objects. A [`Session`]
//! runs that pipeline once per tick and hands out a [`scene::FrameSnapshot`]; the
//! windowed runtime in [`window`] drives it from a real event loop.

pub mod constants;

pub mod logging;
pub mod time;
pub mod coords;
pub mod paint;
pub mod input;

pub mod signal;
pub mod derive;
pub mod layout;
pub mod asset;
pub mod scene;
mod session;

pub mod core;
pub mod device;
pub mod window;

pub use session::{Session, SessionError};
