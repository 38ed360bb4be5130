//! Error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! Store errors are surfaced to the caller and never partially applied.
//! Reminder errors are collected into a reconciliation report and never fail
//! the mutation that triggered the pass.

use crate::features::assignments::AssignmentId;
use chrono::{DateTime, Utc};

/// Rejected assignment mutation. No state change and no reconciliation happen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    #[error("assignment {0} not found")]
    NotFound(AssignmentId),
}

/// Errors reported by the notification subsystem
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("notification permission not granted")]
    PermissionDenied,

    #[error("trigger {trigger} is not in the future")]
    InvalidTrigger { trigger: DateTime<Utc> },

    #[error("notification rejected: {0}")]
    Rejected(String),

    #[error("notification subsystem unavailable: {0}")]
    Unavailable(String),
}

/// Non-fatal problems collected during one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReminderError {
    #[error("notification permission not granted; no reminders scheduled")]
    PermissionDenied,

    #[error("failed to schedule reminder for assignment {assignment_id}: {source}")]
    Scheduling {
        assignment_id: AssignmentId,
        #[source]
        source: NotifyError,
    },

    #[error("failed to cancel pending reminders: {0}")]
    Cancel(#[source] NotifyError),
}
