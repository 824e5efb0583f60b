//! Status reporting between pipeline phases.
//!
//! The pipeline never sleeps or yields on its own. It calls the sink at each
//! phase boundary and the host decides how to stay responsive.

use std::time::Duration;

use tracing::{info, warn};

/// How long a working message should stay up.
pub const WORKING_HINT: Duration = Duration::from_secs(20);
/// How long a success message should stay up.
pub const SUCCESS_HINT: Duration = Duration::from_secs(3);
/// How long a failure message should stay up.
pub const FAILURE_HINT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Working,
    Success,
    Failure,
}

/// One human-readable status line with a display duration hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub message: String,
    pub kind: StatusKind,
    pub hint: Duration,
}

impl StatusUpdate {
    pub fn working(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Working,
            hint: WORKING_HINT,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
            hint: SUCCESS_HINT,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Failure,
            hint: FAILURE_HINT,
        }
    }
}

/// Receives phase updates.
pub trait ProgressSink {
    fn report(&mut self, update: StatusUpdate);
}

impl<F: FnMut(StatusUpdate)> ProgressSink for F {
    fn report(&mut self, update: StatusUpdate) {
        self(update)
    }
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _update: StatusUpdate) {}
}

/// Forwards updates to `tracing`: failures at warn, everything else at info.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&mut self, update: StatusUpdate) {
        let hint_ms = update.hint.as_millis() as u64;
        match update.kind {
            StatusKind::Failure => warn!(hint_ms, "{}", update.message),
            _ => info!(hint_ms, "{}", update.message),
        }
    }
}
