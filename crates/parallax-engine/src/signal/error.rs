use thiserror::Error;

use super::{SignalId, ValueKind};

/// Errors raised by signal registration and target updates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("unknown signal: {0}")]
    UnknownSignal(String),

    #[error("signal registered twice: {0}")]
    DuplicateSignal(SignalId),

    #[error("signal {signal} holds {expected:?} values, got {found:?}")]
    KindMismatch {
        signal: SignalId,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("signal {signal} cannot be spring smoothed as {kind:?}")]
    Unsmoothable { signal: SignalId, kind: ValueKind },

    #[error("smoother was dropped; target not delivered")]
    Disconnected,
}
