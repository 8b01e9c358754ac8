use anyhow::Result;

use crate::coords::Viewport;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by the runtime: one start, one `on_frame` per redraw, one exit.
pub trait App {
    /// Called once the window exists, with its logical size. An error ends the runtime.
    fn on_start(&mut self, viewport: Viewport) -> Result<()>;

    /// Called once per redraw. Input that arrived since the previous frame is in
    /// `ctx.input_frame`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the runtime returns, however it stops.
    fn on_exit(&mut self) {}
}
