use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read layout file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse layout: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid layout: {0}")]
    Invalid(String),
}
