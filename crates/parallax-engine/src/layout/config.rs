use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::{ConfigError, LayoutEntry};
use crate::signal::SpringConfig;

/// Elapsed-time timer settings.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub period_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { period_ms: 100 }
    }
}

impl TimerConfig {
    #[inline]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

/// Scroll container settings.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Content height in viewport heights.
    pub content_screens: f32,
    /// Pixels scrolled per wheel line.
    pub line_height: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            content_screens: 8.0,
            line_height: 40.0,
        }
    }
}

/// Everything the session needs besides the window: layer dataset and tunables.
///
/// Missing tables and keys fall back to [`SceneConfig::default`], which carries the
/// built-in dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub asset_root: PathBuf,
    pub timer: TimerConfig,
    pub scroll: ScrollConfig,
    pub spring: SpringConfig,
    pub images: Vec<LayoutEntry>,
    pub messages: Vec<LayoutEntry>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            timer: TimerConfig::default(),
            scroll: ScrollConfig::default(),
            spring: SpringConfig::default(),
            images: vec![
                LayoutEntry::new("images/photo-1.jpg", 0.0, -16.0, 10.0, 0.0, 1.0),
                LayoutEntry::new("images/photo-2.jpg", 2.5, -22.0, 6.0, -1.0, 1.0),
                LayoutEntry::new("images/photo-3.jpg", -2.5, -28.0, 8.0, -0.5, 1.0),
            ],
            messages: vec![
                LayoutEntry::new("images/crop-1.jpg", 0.0, -16.0, 10.0, 0.0, 1.0),
                LayoutEntry::new("images/crop-2.jpg", 0.0, -20.0, 10.0, 0.0, 1.0),
                LayoutEntry::new("images/crop-3.jpg", 0.0, -24.0, 10.0, 0.0, 1.0),
                LayoutEntry::new("images/crop-4.jpg", 0.0, -18.0, 10.0, 0.0, 1.0),
            ],
        }
    }
}

impl SceneConfig {
    /// Reads and validates a TOML layout file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        log::debug!(
            "layout loaded from {}: {} images, {} messages",
            path.display(),
            config.images.len(),
            config.messages.len()
        );
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.period_ms == 0 {
            return Err(ConfigError::Invalid("timer.period_ms must be positive".into()));
        }
        if !self.scroll.content_screens.is_finite() || self.scroll.content_screens < 1.0 {
            return Err(ConfigError::Invalid(
                "scroll.content_screens must be at least 1".into(),
            ));
        }
        if !self.scroll.line_height.is_finite() || self.scroll.line_height <= 0.0 {
            return Err(ConfigError::Invalid("scroll.line_height must be positive".into()));
        }
        if !self.spring.is_valid() {
            return Err(ConfigError::Invalid(
                "spring parameters must be finite and positive".into(),
            ));
        }

        let groups = [("images", &self.images), ("messages", &self.messages)];
        for (group, entries) in groups {
            for (i, e) in entries.iter().enumerate() {
                if e.asset.is_empty() {
                    return Err(ConfigError::Invalid(format!("{group}[{i}]: empty asset reference")));
                }
                if !e.is_finite() {
                    return Err(ConfigError::Invalid(format!("{group}[{i}]: non-finite value")));
                }
            }
        }
        Ok(())
    }

    /// Filesystem path of a layer's asset.
    pub fn asset_path(&self, entry: &LayoutEntry) -> PathBuf {
        self.asset_root.join(&entry.asset)
    }
}
