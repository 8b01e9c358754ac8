//! Signals: named, continuously valued inputs and their spring smoothing.
//!
//! Data flow is one way:
//! raw target (`SignalSource` / `TargetSender`) → `Smoother` integrates once per tick →
//! `SignalSnapshot` read by the derivation graph.
//!
//! Targets may be posted from anywhere; the visible value only moves inside
//! `Smoother::tick`, so every consumer within one tick sees the same snapshot.

mod error;
mod id;
mod sender;
mod smoother;
mod source;
mod spring;
mod value;

pub use error::SignalError;
pub use id::{SignalId, ELAPSED, POINTER, SCROLL_TOP, VIEWPORT_HEIGHT};
pub use sender::TargetSender;
pub use smoother::{SignalIndex, SignalSnapshot, Smoother, Smoothing};
pub use source::SignalSource;
pub use spring::{SpringConfig, SpringState};
pub use value::{Value, ValueKind};
