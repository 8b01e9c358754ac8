//! Static layout dataset: per-layer placements plus the scene's tunables.
//!
//! Loaded once, before the session starts, and read-only afterwards.

mod config;
mod entry;
mod error;

pub use config::{SceneConfig, ScrollConfig, TimerConfig};
pub use entry::LayoutEntry;
pub use error::ConfigError;
