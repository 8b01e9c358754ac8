//! Input subsystem.
//!
//! The public API is platform-agnostic and does not expose winit types. The runtime
//! translates window-system events into `InputEvent`s (see `platform`), folds them into
//! `InputState` and hands the per-frame stream to the app through `InputFrame`.

mod frame;
pub(crate) mod platform;
mod scroll;
mod state;
mod types;

pub use frame::InputFrame;
pub use scroll::ScrollContainer;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, MouseWheelDelta, PointerMoveEvent};
