//! # Core Module
//!
//! Configuration, wall-clock access, and the error taxonomy shared by the
//! assignment store and the reminder scheduler.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add clock module so reconciliation can run against a manual clock
//! - 1.0.0: Initial creation with config and error modules

pub mod clock;
pub mod config;
pub mod error;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{NotifyError, ReminderError, StoreError};
