use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::input::platform::winit::logical_viewport;
use crate::paint::Color;
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-frame context passed to [`super::App::on_frame`].
///
/// `'a` is the callback; `'w` is the window borrow carried by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Logical window size.
    pub fn viewport(&self) -> Viewport {
        logical_viewport(self.window, self.window.inner_size())
    }

    /// Clears the surface to `clear` and presents. Only an unrecoverable surface
    /// error asks the runtime to stop.
    pub fn present(&mut self, clear: Color) -> AppControl {
        self.window.pre_present_notify();
        match self.gpu.clear_and_present(clear) {
            Ok(()) | Err(SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame) => {
                AppControl::Continue
            }
            Err(SurfaceErrorAction::Fatal) => AppControl::Exit,
        }
    }
}
