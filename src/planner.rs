//! # Study Planner
//!
//! Facade the screens talk to. Owns the assignment store and the reminder
//! scheduler; every successful mutation is reconciled before the call returns.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Atomic seeding from demo data or YAML
//! - 1.0.0: Initial release

use crate::core::{Clock, StoreError};
use crate::features::assignments::{
    upcoming, Assignment, AssignmentCounts, AssignmentFilter, AssignmentId, AssignmentPatch,
    AssignmentStore, NewAssignment, SeedAssignment, StoreChange,
};
use crate::features::reminders::{ReconcileReport, ReminderScheduler};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A successful mutation together with the reconciliation it triggered
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub value: T,
    pub change: StoreChange,
    pub reminders: ReconcileReport,
}

pub struct StudyPlanner {
    store: Arc<RwLock<AssignmentStore>>,
    scheduler: Arc<ReminderScheduler>,
}

impl StudyPlanner {
    pub fn new(scheduler: ReminderScheduler) -> Self {
        Self {
            store: Arc::new(RwLock::new(AssignmentStore::new())),
            scheduler: Arc::new(scheduler),
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.scheduler.clock().now()
    }

    pub async fn create(&self, input: NewAssignment) -> Result<Mutation<Assignment>, StoreError> {
        let (assignment, change) = self.store.write().await.create(input)?;
        Ok(self.reconcile_after(assignment, change).await)
    }

    /// Returns the new completion flag
    pub async fn toggle_complete(&self, id: AssignmentId) -> Result<Mutation<bool>, StoreError> {
        let (completed, change) = self.store.write().await.toggle_complete(id)?;
        Ok(self.reconcile_after(completed, change).await)
    }

    pub async fn delete(&self, id: AssignmentId) -> Result<Mutation<Assignment>, StoreError> {
        let (removed, change) = self.store.write().await.delete(id)?;
        Ok(self.reconcile_after(removed, change).await)
    }

    pub async fn edit(
        &self,
        id: AssignmentId,
        patch: AssignmentPatch,
    ) -> Result<Mutation<Assignment>, StoreError> {
        let (updated, change) = self.store.write().await.edit(id, patch)?;
        Ok(self.reconcile_after(updated, change).await)
    }

    /// Force a pass, e.g. after the user granted notification permission
    pub async fn refresh(&self) -> ReconcileReport {
        self.scheduler.refresh(&self.store).await
    }

    /// Load startup data all-or-nothing, then reconcile once
    pub async fn seed(&self, seed: Vec<SeedAssignment>) -> Result<ReconcileReport, StoreError> {
        {
            let mut store = self.store.write().await;
            let mut staged = (*store).clone();
            for entry in seed {
                let (assignment, _) = staged.create(entry.input)?;
                if entry.completed {
                    staged.toggle_complete(assignment.id)?;
                }
            }
            info!("Seeded {} assignment(s)", staged.len() - store.len());
            *store = staged;
        }
        Ok(self.scheduler.sync(&self.store).await)
    }

    pub async fn get(&self, id: AssignmentId) -> Option<Assignment> {
        self.store.read().await.get(id).cloned()
    }

    pub async fn assignments(&self) -> Vec<Assignment> {
        self.store.read().await.list().to_vec()
    }

    pub async fn filtered(&self, filter: AssignmentFilter) -> Vec<Assignment> {
        let store = self.store.read().await;
        filter.apply(store.list()).into_iter().cloned().collect()
    }

    pub async fn counts(&self) -> AssignmentCounts {
        AssignmentCounts::from_assignments(self.store.read().await.list())
    }

    pub async fn upcoming(&self, limit: usize) -> Vec<Assignment> {
        let store = self.store.read().await;
        upcoming(store.list(), limit).into_iter().cloned().collect()
    }

    async fn reconcile_after<T>(&self, value: T, change: StoreChange) -> Mutation<T> {
        info!(
            "Assignment {} {}, reconciling reminders",
            change.assignment_id, change.kind
        );
        let reminders = self.scheduler.sync(&self.store).await;
        if !reminders.errors.is_empty() {
            warn!(
                "Reminder reconciliation after {} finished {} with {} problem(s)",
                change.kind,
                reminders.status,
                reminders.errors.len()
            );
        }
        Mutation {
            value,
            change,
            reminders,
        }
    }
}
