// Core layer - configuration, clock, and error taxonomy
pub mod core;

// Features layer - assignments and deadline reminders
pub mod features;

// Application layer - the facade the screens use
pub mod planner;

pub use crate::core::Config;

pub use features::{
    // Assignments
    Assignment, AssignmentId, AssignmentStore, NewAssignment, Priority,
    // Reminders
    InMemoryNotifier, Notifier, ReconcileReport, ReminderScheduler,
};

pub use planner::{Mutation, StudyPlanner};
