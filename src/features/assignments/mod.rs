//! # Feature: Assignments
//!
//! Authoritative in-memory assignment collection with create, toggle-complete,
//! delete and edit, plus the list views the screens render from it.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: YAML seed files alongside the built-in samples
//! - 1.1.0: Filter tabs, counters, due labels and upcoming list
//! - 1.0.0: Initial release with the assignment store

pub mod model;
pub mod seed;
pub mod store;
pub mod view;

pub use model::{Assignment, AssignmentId, AssignmentPatch, NewAssignment, Priority};
pub use seed::{demo_assignments, SeedAssignment, SeedFile};
pub use store::{AssignmentStore, ChangeKind, StoreChange};
pub use view::{due_label, upcoming, AssignmentCounts, AssignmentFilter, DueLabel};
