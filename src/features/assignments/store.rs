//! # Assignment Store
//!
//! Authoritative in-memory collection of assignments. Every successful
//! mutation bumps the store revision; rejected mutations leave both the
//! collection and the revision untouched.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Added revision counter for reconciliation coalescing
//! - 1.0.0: Initial release with create, toggle, delete and edit

use super::model::{Assignment, AssignmentId, AssignmentPatch, NewAssignment};
use crate::core::StoreError;
use log::debug;

/// Kind of change applied to the store, handed to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Toggled,
    Deleted,
    Edited,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Created => write!(f, "created"),
            ChangeKind::Toggled => write!(f, "toggled"),
            ChangeKind::Deleted => write!(f, "deleted"),
            ChangeKind::Edited => write!(f, "edited"),
        }
    }
}

/// One successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub kind: ChangeKind,
    pub assignment_id: AssignmentId,
    /// Store revision after the change was applied
    pub revision: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentStore {
    assignments: Vec<Assignment>,
    revision: u64,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new incomplete assignment with a freshly generated identifier
    pub fn create(&mut self, input: NewAssignment) -> Result<(Assignment, StoreChange), StoreError> {
        require_text("title", &input.title)?;
        require_text("subject", &input.subject)?;

        let assignment = Assignment {
            id: AssignmentId::new(),
            title: input.title,
            subject: input.subject,
            description: input.description,
            due_date: input.due_date,
            completed: false,
            priority: input.priority,
        };
        self.assignments.push(assignment.clone());

        let change = self.record(ChangeKind::Created, assignment.id);
        Ok((assignment, change))
    }

    /// Flip the completion flag, returning the new value
    pub fn toggle_complete(&mut self, id: AssignmentId) -> Result<(bool, StoreChange), StoreError> {
        let assignment = self
            .assignments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound(id))?;
        assignment.completed = !assignment.completed;
        let completed = assignment.completed;

        let change = self.record(ChangeKind::Toggled, id);
        Ok((completed, change))
    }

    /// Remove an assignment, returning the removed record
    pub fn delete(&mut self, id: AssignmentId) -> Result<(Assignment, StoreChange), StoreError> {
        let index = self
            .assignments
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = self.assignments.remove(index);

        let change = self.record(ChangeKind::Deleted, id);
        Ok((removed, change))
    }

    /// Apply a partial update. The result is validated before anything is written.
    pub fn edit(
        &mut self,
        id: AssignmentId,
        patch: AssignmentPatch,
    ) -> Result<(Assignment, StoreChange), StoreError> {
        let current = self
            .assignments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut updated = current.clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(subject) = patch.subject {
            updated.subject = subject;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(due_date) = patch.due_date {
            updated.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            updated.priority = priority;
        }
        require_text("title", &updated.title)?;
        require_text("subject", &updated.subject)?;

        *current = updated.clone();
        let change = self.record(ChangeKind::Edited, id);
        Ok((updated, change))
    }

    pub fn get(&self, id: AssignmentId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    /// Assignments in insertion order
    pub fn list(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Monotonic counter bumped by every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn record(&mut self, kind: ChangeKind, assignment_id: AssignmentId) -> StoreChange {
        self.revision += 1;
        debug!(
            "Assignment {} {} (revision {})",
            assignment_id, kind, self.revision
        );
        StoreChange {
            kind,
            assignment_id,
            revision: self.revision,
        }
    }
}

/// Whitespace-only text counts as empty
fn require_text(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        Err(StoreError::Validation { field })
    } else {
        Ok(())
    }
}
