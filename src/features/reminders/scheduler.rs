//! # Reminder Scheduler
//!
//! Keeps the notification subsystem consistent with the assignment list by
//! full reconciliation: cancel every pending reminder, then submit one reminder
//! per incomplete assignment whose trigger is still in the future.
//!
//! Passes are serialised. A pass reads the store only after it holds the gate,
//! so a queued pass always works from the latest snapshot, and a pass whose
//! revision has already been reconciled is skipped.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.1.0: Coalesce queued passes onto the latest store revision
//! - 2.0.0: Split pure planning from the notifier adapter; per-assignment failure isolation
//! - 1.0.0: Initial release with cancel-all and reschedule

use super::notifier::{Notifier, PermissionStatus};
use super::plan::{plan_reminders, ReminderRequest};
use crate::core::{Clock, NotifyError, ReminderError};
use crate::features::assignments::{Assignment, AssignmentId, AssignmentStore};
use chrono::Duration;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Outcome of one reconciliation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Pending reminders now match the plan, apart from any listed failures
    Synced,
    /// This revision was already reconciled; nothing was sent
    Coalesced,
    /// Permission missing; nothing was scheduled
    PermissionDenied,
    /// Pending reminders could not be cleared; nothing was scheduled
    Aborted,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "synced"),
            SyncStatus::Coalesced => write!(f, "coalesced"),
            SyncStatus::PermissionDenied => write!(f, "permission denied"),
            SyncStatus::Aborted => write!(f, "aborted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    /// Store revision the pass was computed from
    pub revision: u64,
    pub status: SyncStatus,
    /// Reminders accepted by the notification subsystem
    pub armed: Vec<ReminderRequest>,
    /// Non-fatal problems; the triggering mutation still succeeded
    pub errors: Vec<ReminderError>,
}

impl ReconcileReport {
    fn new(revision: u64, status: SyncStatus) -> Self {
        Self {
            revision,
            status,
            armed: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn permission_denied(&self) -> bool {
        self.status == SyncStatus::PermissionDenied
    }

    /// Synced (or coalesced onto a synced pass) with no failures
    pub fn is_clean(&self) -> bool {
        matches!(self.status, SyncStatus::Synced | SyncStatus::Coalesced) && self.errors.is_empty()
    }

    pub fn armed_for(&self, assignment_id: AssignmentId) -> Option<&ReminderRequest> {
        self.armed.iter().find(|r| r.assignment_id == assignment_id)
    }
}

#[derive(Default)]
struct SyncState {
    /// Last pass that reached the notifier with permission granted
    last_synced: Option<ReconcileReport>,
}

pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    lead: Duration,
    gate: Mutex<SyncState>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>, lead: Duration) -> Self {
        Self {
            notifier,
            clock,
            lead,
            gate: Mutex::new(SyncState::default()),
        }
    }

    pub fn lead(&self) -> Duration {
        self.lead
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Reconcile after a store change, coalescing onto an already-reconciled revision
    pub async fn sync(&self, store: &RwLock<AssignmentStore>) -> ReconcileReport {
        self.run(store, false).await
    }

    /// Reconcile unconditionally, e.g. after permission was granted or time has passed
    pub async fn refresh(&self, store: &RwLock<AssignmentStore>) -> ReconcileReport {
        self.run(store, true).await
    }

    async fn run(&self, store: &RwLock<AssignmentStore>, force: bool) -> ReconcileReport {
        let mut state = self.gate.lock().await;

        let (revision, assignments) = {
            let store = store.read().await;
            (store.revision(), store.list().to_vec())
        };

        if !force {
            if let Some(last) = state.last_synced.as_ref().filter(|r| r.revision == revision) {
                debug!("Revision {} already reconciled, skipping pass", revision);
                let mut report = last.clone();
                report.status = SyncStatus::Coalesced;
                return report;
            }
        }

        let report = self.reconcile(revision, &assignments).await;
        state.last_synced = match report.status {
            SyncStatus::Synced => Some(report.clone()),
            _ => None,
        };
        report
    }

    /// One full pass against an explicit snapshot. Only called with the gate held.
    async fn reconcile(&self, revision: u64, assignments: &[Assignment]) -> ReconcileReport {
        let permission = self.ensure_permission().await;
        if !permission.is_granted() {
            warn!(
                "Notification permission {}; reminders disabled for revision {}",
                permission, revision
            );
            if let Err(e) = self.notifier.cancel_all().await {
                warn!("Failed to cancel pending reminders without permission: {}", e);
            }
            let mut report = ReconcileReport::new(revision, SyncStatus::PermissionDenied);
            report.errors.push(ReminderError::PermissionDenied);
            return report;
        }

        if let Err(e) = self.notifier.cancel_all().await {
            error!(
                "Failed to cancel pending reminders, skipping revision {}: {}",
                revision, e
            );
            let mut report = ReconcileReport::new(revision, SyncStatus::Aborted);
            report.errors.push(ReminderError::Cancel(e));
            return report;
        }

        let now = self.clock.now();
        let plan = plan_reminders(assignments, now, self.lead);
        let mut report = ReconcileReport::new(revision, SyncStatus::Synced);

        for request in plan {
            match self.notifier.schedule(&request).await {
                Ok(handle) => {
                    debug!(
                        "Armed reminder {} for assignment {} at {}",
                        handle, request.assignment_id, request.trigger_at
                    );
                    report.armed.push(request);
                }
                Err(e) => {
                    warn!(
                        "Failed to schedule reminder for assignment {}: {}",
                        request.assignment_id, e
                    );
                    report.errors.push(ReminderError::Scheduling {
                        assignment_id: request.assignment_id,
                        source: e,
                    });
                }
            }
        }

        info!(
            "Reconciled revision {}: {} reminder(s) armed, {} failed, {} assignment(s) without reminder",
            revision,
            report.armed.len(),
            report.errors.len(),
            assignments.len() - report.armed.len() - report.errors.len()
        );
        report
    }

    async fn ensure_permission(&self) -> PermissionStatus {
        let status = match self.notifier.permission_status().await {
            Ok(status) => status,
            Err(e) => return Self::permission_error(e),
        };
        if status != PermissionStatus::Undetermined {
            return status;
        }

        match self.notifier.request_permission().await {
            Ok(status) => status,
            Err(e) => Self::permission_error(e),
        }
    }

    fn permission_error(e: NotifyError) -> PermissionStatus {
        warn!("Could not determine notification permission: {}", e);
        PermissionStatus::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::assignments::NewAssignment;
    use crate::features::reminders::memory::{InMemoryNotifier, NotifierCall};
    use crate::features::reminders::notifier::NotificationHandle;
    use async_trait::async_trait;
    use chrono::Utc;

    struct Harness {
        clock: Arc<ManualClock>,
        notifier: Arc<InMemoryNotifier>,
        scheduler: ReminderScheduler,
        store: RwLock<AssignmentStore>,
    }

    fn harness() -> Harness {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let notifier = Arc::new(
            InMemoryNotifier::new(clock.clone()).with_permission(PermissionStatus::Granted),
        );
        let scheduler = ReminderScheduler::new(notifier.clone(), clock.clone(), Duration::hours(24));
        Harness {
            clock,
            notifier,
            scheduler,
            store: RwLock::new(AssignmentStore::new()),
        }
    }

    impl Harness {
        async fn add(&self, title: &str, due_in_hours: i64) -> AssignmentId {
            let input =
                NewAssignment::new(title, "Mathematics", self.clock.now() + Duration::hours(due_in_hours));
            let (assignment, _) = self.store.write().await.create(input).unwrap();
            assignment.id
        }
    }

    /// Rejects reminders for titles containing "Broken"; can fail the permission query or cancel-all
    struct FlakyNotifier {
        inner: InMemoryNotifier,
        fail_permission: bool,
        fail_cancel: bool,
    }

    #[async_trait]
    impl Notifier for FlakyNotifier {
        async fn permission_status(&self) -> Result<PermissionStatus, NotifyError> {
            if self.fail_permission {
                return Err(NotifyError::Unavailable("settings unreachable".to_string()));
            }
            self.inner.permission_status().await
        }

        async fn request_permission(&self) -> Result<PermissionStatus, NotifyError> {
            self.inner.request_permission().await
        }

        async fn cancel_all(&self) -> Result<(), NotifyError> {
            if self.fail_cancel {
                return Err(NotifyError::Unavailable("service restarting".to_string()));
            }
            self.inner.cancel_all().await
        }

        async fn schedule(&self, request: &ReminderRequest) -> Result<NotificationHandle, NotifyError> {
            if request.body.contains("Broken") {
                return Err(NotifyError::Rejected("malformed payload".to_string()));
            }
            self.inner.schedule(request).await
        }
    }

    #[tokio::test]
    async fn test_sync_arms_eligible_assignments() {
        let h = harness();
        let eligible = h.add("Quadratics", 48).await;
        h.add("Lab report", 10).await;

        let report = h.scheduler.sync(&h.store).await;

        assert_eq!(report.status, SyncStatus::Synced);
        assert!(report.is_clean());
        assert_eq!(report.armed.len(), 1);
        let pending = h.notifier.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].request.assignment_id, eligible);
        assert_eq!(pending[0].request.trigger_at, h.clock.now() + Duration::hours(24));
        assert_eq!(h.scheduler.lead(), Duration::hours(24));
    }

    #[tokio::test]
    async fn test_sync_coalesces_same_revision() {
        let h = harness();
        h.add("Essay", 72).await;

        let first = h.scheduler.sync(&h.store).await;
        h.notifier.clear_calls();
        let second = h.scheduler.sync(&h.store).await;

        assert_eq!(second.status, SyncStatus::Coalesced);
        assert_eq!(second.armed, first.armed);
        assert!(h.notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let h = harness();
        h.add("Essay", 72).await;
        h.add("Project", 200).await;

        h.scheduler.refresh(&h.store).await;
        let once: Vec<_> = h.notifier.pending().into_iter().map(|r| r.request).collect();
        h.scheduler.refresh(&h.store).await;
        let twice: Vec<_> = h.notifier.pending().into_iter().map(|r| r.request).collect();

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_drops_reminders_whose_trigger_passed() {
        let h = harness();
        h.add("Essay", 30).await;
        h.scheduler.sync(&h.store).await;
        assert_eq!(h.notifier.pending_count(), 1);

        h.clock.advance(Duration::hours(8));
        let report = h.scheduler.refresh(&h.store).await;

        assert!(report.armed.is_empty());
        assert_eq!(h.notifier.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_undetermined_permission_is_requested_first() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let notifier = Arc::new(InMemoryNotifier::new(clock.clone()));
        let scheduler = ReminderScheduler::new(notifier.clone(), clock.clone(), Duration::hours(24));
        let store = RwLock::new(AssignmentStore::new());
        store
            .write()
            .await
            .create(NewAssignment::new("Essay", "English", clock.now() + Duration::days(3)))
            .unwrap();

        let report = scheduler.sync(&store).await;

        assert!(report.is_clean());
        let calls = notifier.calls();
        assert_eq!(calls[0], NotifierCall::PermissionStatus);
        assert_eq!(calls[1], NotifierCall::RequestPermission);
        assert_eq!(calls[2], NotifierCall::CancelAll);
        assert!(matches!(calls[3], NotifierCall::Schedule(_)));
    }

    #[tokio::test]
    async fn test_permission_denied_schedules_nothing() {
        let h = harness();
        h.add("Essay", 72).await;
        h.scheduler.sync(&h.store).await;
        assert_eq!(h.notifier.pending_count(), 1);

        h.notifier.set_permission(PermissionStatus::Denied);
        h.add("Project", 96).await;
        let report = h.scheduler.sync(&h.store).await;

        assert!(report.permission_denied());
        assert_eq!(report.errors, vec![ReminderError::PermissionDenied]);
        assert!(report.armed.is_empty());
        assert_eq!(h.notifier.pending_count(), 0);
        assert!(!h
            .notifier
            .calls()
            .iter()
            .any(|c| matches!(c, NotifierCall::Schedule(_))));
    }

    #[tokio::test]
    async fn test_denied_pass_is_not_coalesced() {
        let h = harness();
        h.add("Essay", 72).await;
        h.notifier.set_permission(PermissionStatus::Denied);
        assert!(h.scheduler.sync(&h.store).await.permission_denied());

        h.notifier.set_permission(PermissionStatus::Granted);
        let retry = h.scheduler.sync(&h.store).await;

        assert_eq!(retry.status, SyncStatus::Synced);
        assert_eq!(h.notifier.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_single_failure_is_isolated() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let notifier = Arc::new(FlakyNotifier {
            inner: InMemoryNotifier::new(clock.clone()).with_permission(PermissionStatus::Granted),
            fail_permission: false,
            fail_cancel: false,
        });
        let scheduler = ReminderScheduler::new(notifier.clone(), clock.clone(), Duration::hours(24));
        let store = RwLock::new(AssignmentStore::new());
        let mut ids = Vec::new();
        for title in ["Essay", "Broken worksheet", "Project"] {
            let input = NewAssignment::new(title, "English", clock.now() + Duration::days(3));
            ids.push(store.write().await.create(input).unwrap().0.id);
        }

        let report = scheduler.sync(&store).await;

        assert_eq!(report.status, SyncStatus::Synced);
        assert!(!report.is_clean());
        assert_eq!(report.armed.len(), 2);
        assert!(report.armed_for(ids[0]).is_some());
        assert!(report.armed_for(ids[2]).is_some());
        assert!(matches!(
            &report.errors[..],
            [ReminderError::Scheduling { assignment_id, .. }] if *assignment_id == ids[1]
        ));
        assert_eq!(notifier.inner.pending_count(), 2);
    }

    #[tokio::test]
    async fn test_cancel_failure_aborts_pass() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let notifier = Arc::new(FlakyNotifier {
            inner: InMemoryNotifier::new(clock.clone()).with_permission(PermissionStatus::Granted),
            fail_permission: false,
            fail_cancel: true,
        });
        let scheduler = ReminderScheduler::new(notifier.clone(), clock.clone(), Duration::hours(24));
        let store = RwLock::new(AssignmentStore::new());
        store
            .write()
            .await
            .create(NewAssignment::new("Essay", "English", clock.now() + Duration::days(3)))
            .unwrap();

        let report = scheduler.sync(&store).await;

        assert_eq!(report.status, SyncStatus::Aborted);
        assert!(matches!(report.errors[..], [ReminderError::Cancel(_)]));
        assert_eq!(notifier.inner.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_permission_query_error_counts_as_denied() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let notifier = Arc::new(FlakyNotifier {
            inner: InMemoryNotifier::new(clock.clone()).with_permission(PermissionStatus::Granted),
            fail_permission: true,
            fail_cancel: false,
        });
        let scheduler = ReminderScheduler::new(notifier.clone(), clock.clone(), Duration::hours(24));
        let store = RwLock::new(AssignmentStore::new());
        store
            .write()
            .await
            .create(NewAssignment::new("Essay", "English", clock.now() + Duration::days(3)))
            .unwrap();

        let report = scheduler.sync(&store).await;

        assert_eq!(report.status, SyncStatus::PermissionDenied);
        assert!(report.permission_denied());
        assert!(report.armed.is_empty());
        assert!(matches!(report.errors[..], [ReminderError::PermissionDenied]));
        assert!(!notifier
            .inner
            .calls()
            .iter()
            .any(|call| matches!(call, NotifierCall::Schedule(_))));
        assert_eq!(notifier.inner.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_syncs_leave_no_duplicates() {
        let h = harness();
        let ids = vec![h.add("a", 48).await, h.add("b", 60).await, h.add("c", 72).await];

        tokio::join!(
            h.scheduler.sync(&h.store),
            h.scheduler.sync(&h.store),
            h.scheduler.refresh(&h.store),
            h.scheduler.sync(&h.store),
        );

        assert_eq!(h.notifier.pending_count(), 3);
        for id in ids {
            assert_eq!(h.notifier.pending_for(id).len(), 1);
        }
    }
}
