use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;

use super::{SignalError, SignalId, Value, ValueKind};

/// A target posted through a [`TargetSender`], waiting for the next tick.
#[derive(Debug)]
pub(crate) struct Posted {
    pub(crate) index: usize,
    pub(crate) value: Value,
}

/// Name → (index, kind) table shared with senders.
#[derive(Debug, Default)]
pub(crate) struct Directory {
    entries: HashMap<SignalId, (usize, ValueKind)>,
}

impl Directory {
    pub(crate) fn from_channels(channels: impl Iterator<Item = (SignalId, ValueKind)>) -> Self {
        Self {
            entries: channels
                .enumerate()
                .map(|(i, (id, kind))| (id, (i, kind)))
                .collect(),
        }
    }
}

/// Cloneable, `Send` handle for posting signal targets.
///
/// Names and kinds are checked when posting; the smoother applies queued targets at
/// the start of its next tick, so several posts between ticks collapse to the last.
#[derive(Debug, Clone)]
pub struct TargetSender {
    tx: mpsc::Sender<Posted>,
    directory: Arc<Directory>,
}

impl TargetSender {
    pub(crate) fn new(tx: mpsc::Sender<Posted>, directory: Arc<Directory>) -> Self {
        Self { tx, directory }
    }

    pub fn post(&self, name: &str, value: Value) -> Result<(), SignalError> {
        let Some((id, &(index, expected))) = self.directory.entries.get_key_value(name) else {
            return Err(SignalError::UnknownSignal(name.to_string()));
        };

        if value.kind() != expected {
            return Err(SignalError::KindMismatch {
                signal: id.clone(),
                expected,
                found: value.kind(),
            });
        }

        self.tx
            .send(Posted { index, value })
            .map_err(|_| SignalError::Disconnected)
    }
}
