//! # Features
//!
//! - `assignments`: the assignment store and its list views
//! - `reminders`: deadline reminder planning and reconciliation

pub mod assignments;
pub mod reminders;

pub use assignments::{Assignment, AssignmentId, AssignmentStore, NewAssignment, Priority};
pub use reminders::{InMemoryNotifier, Notifier, ReconcileReport, ReminderScheduler};
