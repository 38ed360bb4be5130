//! # In-Memory Notification Backend
//!
//! Process-local implementation of [`Notifier`]. Holds pending reminders in a
//! DashMap keyed by handle and delivers them when [`InMemoryNotifier::fire_due`]
//! runs. Also keeps a journal of every call for inspection.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use super::notifier::{NotificationHandle, Notifier, PermissionStatus};
use super::plan::ReminderRequest;
use crate::core::{Clock, NotifyError};
use crate::features::assignments::AssignmentId;
use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

/// A reminder accepted by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReminder {
    pub handle: NotificationHandle,
    pub request: ReminderRequest,
}

/// Journal entry for one call into the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    PermissionStatus,
    RequestPermission,
    CancelAll,
    Schedule(AssignmentId),
}

pub struct InMemoryNotifier {
    clock: Arc<dyn Clock>,
    permission: RwLock<PermissionStatus>,
    grant_on_request: AtomicBool,
    pending: DashMap<NotificationHandle, ScheduledReminder>,
    delivered: Mutex<Vec<ScheduledReminder>>,
    journal: Mutex<Vec<NotifierCall>>,
}

impl InMemoryNotifier {
    /// Permission starts undetermined and is granted on the first request
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            permission: RwLock::new(PermissionStatus::Undetermined),
            grant_on_request: AtomicBool::new(true),
            pending: DashMap::new(),
            delivered: Mutex::new(Vec::new()),
            journal: Mutex::new(Vec::new()),
        }
    }

    pub fn with_permission(self, status: PermissionStatus) -> Self {
        self.set_permission(status);
        self
    }

    /// Whether `request_permission` grants when the status is undetermined
    pub fn grant_on_request(self, grant: bool) -> Self {
        self.grant_on_request.store(grant, Ordering::SeqCst);
        self
    }

    /// Simulate the user changing the permission in system settings
    pub fn set_permission(&self, status: PermissionStatus) {
        *self.permission.write().unwrap_or_else(|e| e.into_inner()) = status;
    }

    /// Pending reminders ordered by trigger time
    pub fn pending(&self) -> Vec<ScheduledReminder> {
        let mut pending: Vec<ScheduledReminder> =
            self.pending.iter().map(|entry| entry.value().clone()).collect();
        pending.sort_by(|a, b| {
            a.request
                .trigger_at
                .cmp(&b.request.trigger_at)
                .then_with(|| a.request.assignment_id.cmp(&b.request.assignment_id))
        });
        pending
    }

    pub fn pending_for(&self, assignment_id: AssignmentId) -> Vec<ScheduledReminder> {
        self.pending()
            .into_iter()
            .filter(|r| r.request.assignment_id == assignment_id)
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn delivered(&self) -> Vec<ScheduledReminder> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.journal.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear_calls(&self) {
        self.journal.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Deliver every pending reminder whose trigger has been reached.
    ///
    /// Delivery consumes the reminder; it is never re-armed.
    pub fn fire_due(&self) -> Vec<ScheduledReminder> {
        let now = self.clock.now();
        let due: Vec<NotificationHandle> = self
            .pending
            .iter()
            .filter(|entry| entry.value().request.trigger_at <= now)
            .map(|entry| entry.key().clone())
            .collect();

        let mut fired: Vec<ScheduledReminder> = due
            .into_iter()
            .filter_map(|handle| self.pending.remove(&handle).map(|(_, reminder)| reminder))
            .collect();
        fired.sort_by_key(|r| r.request.trigger_at);

        for reminder in &fired {
            info!(
                "🔔 {}: {} (assignment {})",
                reminder.request.title, reminder.request.body, reminder.request.assignment_id
            );
        }

        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(fired.iter().cloned());
        fired
    }

    fn record(&self, call: NotifierCall) {
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn current_permission(&self) -> PermissionStatus {
        *self.permission.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn permission_status(&self) -> Result<PermissionStatus, NotifyError> {
        self.record(NotifierCall::PermissionStatus);
        Ok(self.current_permission())
    }

    async fn request_permission(&self) -> Result<PermissionStatus, NotifyError> {
        self.record(NotifierCall::RequestPermission);
        let current = self.current_permission();
        if current != PermissionStatus::Undetermined {
            return Ok(current);
        }

        let status = if self.grant_on_request.load(Ordering::SeqCst) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        self.set_permission(status);
        Ok(status)
    }

    async fn cancel_all(&self) -> Result<(), NotifyError> {
        self.record(NotifierCall::CancelAll);
        let cancelled = self.pending.len();
        self.pending.clear();
        debug!("Cancelled {} pending reminder(s)", cancelled);
        Ok(())
    }

    async fn schedule(&self, request: &ReminderRequest) -> Result<NotificationHandle, NotifyError> {
        self.record(NotifierCall::Schedule(request.assignment_id));

        if !self.current_permission().is_granted() {
            return Err(NotifyError::PermissionDenied);
        }
        if request.trigger_at <= self.clock.now() {
            return Err(NotifyError::InvalidTrigger {
                trigger: request.trigger_at,
            });
        }

        let handle = NotificationHandle(Uuid::new_v4().to_string());
        self.pending.insert(
            handle.clone(),
            ScheduledReminder {
                handle: handle.clone(),
                request: request.clone(),
            },
        );
        Ok(handle)
    }
}
