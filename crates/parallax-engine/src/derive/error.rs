use thiserror::Error;

use crate::signal::ValueKind;

/// Registration-time graph errors. All of them are fatal before the first tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("unknown signal or property: {0}")]
    UnknownSignal(String),

    #[error("name already in use: {0}")]
    DuplicateProperty(String),

    #[error("cyclic derivation: {}", .path.join(" → "))]
    CyclicDerivation { path: Vec<String> },
}

/// Per-property evaluation fault. Contained to one property for one tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("input {index} has no value yet")]
    MissingInput { index: usize },

    #[error("input {index} is {found:?}, expected {expected:?}")]
    TypeMismatch {
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("result is not finite")]
    NonFinite,

    #[error("mapping panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}
