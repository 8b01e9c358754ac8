//! Contracts between the windowed runtime and the application driving a scene.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
