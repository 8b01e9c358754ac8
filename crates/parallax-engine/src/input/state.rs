use super::frame::InputFrame;
use super::types::{InputEvent, KeyState, PointerMoveEvent};
use crate::coords::Viewport;

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    /// Last known logical window size.
    pub viewport: Viewport,
}

impl InputState {
    /// Folds an event into the current state and records it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => self.focused = *f,

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Resized(vp) => self.viewport = *vp,

            InputEvent::Key { key, state: KeyState::Pressed, .. } => {
                frame.keys_pressed.insert(*key);
            }

            InputEvent::Key { .. } | InputEvent::MouseWheel { .. } => {}
        }

        frame.push_event(ev);
    }
}
