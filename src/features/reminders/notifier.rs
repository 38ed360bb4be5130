//! Port to the device notification subsystem
//!
//! The scheduler is the only writer. Implementations deliver a one-shot alert
//! at or after the trigger even when the application is not running.

use super::plan::ReminderRequest;
use crate::core::NotifyError;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Never asked; a request may still be granted
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// Acknowledgement for a scheduled reminder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationHandle(pub String);

impl std::fmt::Display for NotificationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn permission_status(&self) -> Result<PermissionStatus, NotifyError>;

    /// Ask the user for permission; returns the resulting status
    async fn request_permission(&self) -> Result<PermissionStatus, NotifyError>;

    /// Remove every reminder previously submitted by this application
    async fn cancel_all(&self) -> Result<(), NotifyError>;

    async fn schedule(&self, request: &ReminderRequest) -> Result<NotificationHandle, NotifyError>;
}
