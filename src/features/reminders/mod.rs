//! # Feature: Deadline Reminders
//!
//! One reminder per incomplete assignment, firing a fixed lead interval before
//! the due date. Re-derived from the full assignment list after every change.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

pub mod memory;
pub mod notifier;
pub mod plan;
pub mod scheduler;

pub use memory::{InMemoryNotifier, NotifierCall, ScheduledReminder};
pub use notifier::{NotificationHandle, Notifier, PermissionStatus};
pub use plan::{plan_reminders, reminder_state, DisarmReason, ReminderRequest, ReminderState};
pub use scheduler::{ReconcileReport, ReminderScheduler, SyncStatus};
