use thiserror::Error;

use crate::derive::GraphError;

/// Scene construction failures. Asset problems are not among them: a layer whose
/// asset is unusable is still built, just transparent.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("invalid colour constant: {0}")]
    InvalidColor(&'static str),
}
