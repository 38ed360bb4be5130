//! Pure reminder planning
//!
//! Maps the current assignment list and "now" to the set of reminders that
//! should be pending. No I/O happens here; the scheduler submits the result.

use crate::features::assignments::{Assignment, AssignmentId};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;

/// Notification title shared by every assignment reminder
pub const REMINDER_TITLE: &str = "Assignment Reminder 📚";

/// Why an assignment has no reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisarmReason {
    Completed,
    /// The trigger (due date minus lead) is not strictly after now. Covers
    /// overdue assignments and ones due within the lead interval.
    TriggerPassed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    Armed { trigger: DateTime<Utc> },
    Disarmed(DisarmReason),
}

impl ReminderState {
    pub fn is_armed(&self) -> bool {
        matches!(self, ReminderState::Armed { .. })
    }
}

/// One reminder to hand to the notification subsystem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderRequest {
    /// Correlation id; at most one request exists per assignment
    pub assignment_id: AssignmentId,
    pub trigger_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

pub fn reminder_state(assignment: &Assignment, now: DateTime<Utc>, lead: Duration) -> ReminderState {
    if assignment.completed {
        return ReminderState::Disarmed(DisarmReason::Completed);
    }

    // A trigger before the representable range can never be in the future
    match assignment.due_date.checked_sub_signed(lead) {
        Some(trigger) if trigger > now => ReminderState::Armed { trigger },
        _ => ReminderState::Disarmed(DisarmReason::TriggerPassed),
    }
}

/// Desired reminder set for `assignments` at `now`, in list order
pub fn plan_reminders(
    assignments: &[Assignment],
    now: DateTime<Utc>,
    lead: Duration,
) -> Vec<ReminderRequest> {
    assignments
        .iter()
        .filter_map(|assignment| match reminder_state(assignment, now, lead) {
            ReminderState::Armed { trigger } => Some(reminder_request(assignment, trigger, lead)),
            ReminderState::Disarmed(_) => None,
        })
        .collect()
}

fn reminder_request(assignment: &Assignment, trigger: DateTime<Utc>, lead: Duration) -> ReminderRequest {
    ReminderRequest {
        assignment_id: assignment.id,
        trigger_at: trigger,
        title: REMINDER_TITLE.to_string(),
        body: reminder_body(&assignment.title, lead),
        data: json!({ "assignmentId": assignment.id.to_string() }),
    }
}

fn reminder_body(title: &str, lead: Duration) -> String {
    if lead == Duration::hours(24) {
        format!("{} is due tomorrow!", title)
    } else {
        let hours = lead.num_hours();
        format!(
            "{} is due in {} hour{}!",
            title,
            hours,
            if hours == 1 { "" } else { "s" }
        )
    }
}
