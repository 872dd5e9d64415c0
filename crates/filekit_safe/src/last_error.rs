use std::sync::{Mutex, MutexGuard};

use filekit_fs::{Error, ErrorCode};

use crate::Operation;

/// The most recent failure seen by a safe operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub operation: Operation,
    pub code: ErrorCode,
    pub message: String,
}

/// Slot holding the failure of the latest safe call, cleared when a call
/// starts. Concurrent callers sharing one slot see the last writer.
#[derive(Debug, Default)]
pub struct LastError(Mutex<Option<Failure>>);

impl LastError {
    fn slot(&self) -> MutexGuard<'_, Option<Failure>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn clear(&self) {
        *self.slot() = None;
    }

    pub fn record(&self, operation: Operation, error: &Error) {
        *self.slot() = Some(Failure {
            operation,
            code: error.code(),
            message: error.to_string(),
        });
    }

    pub fn get(&self) -> Option<Failure> {
        self.slot().clone()
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.slot().as_ref().map(|failure| failure.code)
    }
}
