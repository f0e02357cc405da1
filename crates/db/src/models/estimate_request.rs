//! Estimation request entity model and status values.
//!
//! One row per submission. `result` is written by the external estimator
//! process (never by the HTTP layer); `status` is written by the launcher
//! supervisor.

use serde::Serialize;
use sqlx::FromRow;

use estimator_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A single estimation request and its eventual result.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EstimateRequest {
    pub id: DbId,
    /// Expanded submission values (scalar => 1-element array).
    pub input: Vec<f64>,
    /// Written back by the external estimator; `None` until it finishes.
    pub result: Option<Vec<f64>>,
    /// Launcher lifecycle status, see [`RequestStatus`].
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Status values
// ---------------------------------------------------------------------------

/// Lifecycle status of the launched estimator process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Row created, estimator not yet spawned.
    Pending,
    /// Estimator process spawned and still running.
    Running,
    /// Estimator exited 0.
    Completed,
    /// Estimator failed to spawn or exited non-zero.
    Failed,
    /// Estimator exceeded the configured timeout and was killed.
    TimedOut,
}

impl RequestStatus {
    /// Database representation (stored in the `status` TEXT column).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        }
    }

    /// Whether this status is terminal (the supervisor will not advance it).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Running.is_terminal());
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Failed.is_terminal());
        assert!(RequestStatus::TimedOut.is_terminal());
    }
}
