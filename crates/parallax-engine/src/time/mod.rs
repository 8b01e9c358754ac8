//! Time subsystem.
//!
//! Two clocks feed a session:
//! - `FrameClock`: one `tick()` per presented frame, produces the clamped frame delta
//!   used for spring integration
//! - `IntervalTimer`: turns frame deltas into whole timer periods for the elapsed-time signal

mod frame_clock;
mod interval;

pub use frame_clock::{FrameClock, FrameTime};
pub use interval::IntervalTimer;
