//! List views over the assignment collection: filter tabs, counters,
//! due-date labels and the home screen's upcoming list.

use super::model::Assignment;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl AssignmentFilter {
    pub fn matches(&self, assignment: &Assignment) -> bool {
        match self {
            AssignmentFilter::All => true,
            AssignmentFilter::Pending => !assignment.completed,
            AssignmentFilter::Completed => assignment.completed,
        }
    }

    pub fn apply<'a>(&self, assignments: &'a [Assignment]) -> Vec<&'a Assignment> {
        assignments.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Counters shown on the filter tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
}

impl AssignmentCounts {
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let completed = assignments.iter().filter(|a| a.completed).count();
        Self {
            all: assignments.len(),
            pending: assignments.len() - completed,
            completed,
        }
    }
}

/// Human-facing description of how far away a due date is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    DueToday,
    DueTomorrow,
    Overdue,
    DueInDays(i64),
    OnDate(NaiveDate),
}

impl std::fmt::Display for DueLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DueLabel::DueToday => write!(f, "Due today"),
            DueLabel::DueTomorrow => write!(f, "Due tomorrow"),
            DueLabel::Overdue => write!(f, "Overdue"),
            DueLabel::DueInDays(days) => write!(f, "Due in {} days", days),
            DueLabel::OnDate(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Label a due date relative to `now`, counting partial days as whole ones.
///
/// Something due less than a day ago still rounds up to "today".
pub fn due_label(due: DateTime<Utc>, now: DateTime<Utc>) -> DueLabel {
    let diff_ms = (due - now).num_milliseconds();
    let days = -(-diff_ms).div_euclid(MILLIS_PER_DAY);

    match days {
        0 => DueLabel::DueToday,
        1 => DueLabel::DueTomorrow,
        d if d < 0 => DueLabel::Overdue,
        d if d < 7 => DueLabel::DueInDays(d),
        _ => DueLabel::OnDate(due.date_naive()),
    }
}

/// Incomplete assignments, soonest first, at most `limit` of them
pub fn upcoming(assignments: &[Assignment], limit: usize) -> Vec<&Assignment> {
    let mut pending: Vec<&Assignment> = assignments.iter().filter(|a| !a.completed).collect();
    pending.sort_by_key(|a| a.due_date);
    pending.truncate(limit);
    pending
}
