//! Startup data: the built-in sample assignments and YAML seed files.

use super::model::{NewAssignment, Priority};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An assignment to load at start, optionally already completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAssignment {
    pub input: NewAssignment,
    pub completed: bool,
}

/// The four sample assignments shown on first launch
pub fn demo_assignments(now: DateTime<Utc>) -> Vec<SeedAssignment> {
    vec![
        SeedAssignment {
            input: NewAssignment::new(
                "Mathematics Assignment - Quadratic Equations",
                "Mathematics",
                now + Duration::days(2),
            )
            .description("Solve problems 1-20 from chapter 5")
            .priority(Priority::High),
            completed: false,
        },
        SeedAssignment {
            input: NewAssignment::new(
                "English Essay - Ghanaian Literature",
                "English",
                now + Duration::days(4),
            )
            .description("Write a 500-word essay on Ama Ata Aidoo")
            .priority(Priority::Medium),
            completed: false,
        },
        SeedAssignment {
            input: NewAssignment::new(
                "Science Lab Report - Chemistry",
                "Science",
                now + Duration::days(1),
            )
            .description("Complete lab report on acid-base reactions")
            .priority(Priority::High),
            completed: false,
        },
        SeedAssignment {
            input: NewAssignment::new(
                "History Project - Independence",
                "History",
                now + Duration::days(7),
            )
            .description("Research Ghana's independence movement")
            .priority(Priority::Low),
            completed: true,
        },
    ]
}

/// YAML seed file
///
/// ```yaml
/// assignments:
///   - title: Physics worksheet
///     subject: Physics
///     due_in_hours: 72
///     priority: high
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedFile {
    pub assignments: Vec<SeedEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedEntry {
    pub title: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    /// Negative values produce overdue assignments
    pub due_in_hours: i64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl SeedFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid seed file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let file: SeedFile = serde_yaml::from_str(contents)?;
        Ok(file)
    }

    /// Resolve relative due dates against `now`
    pub fn into_seed(self, now: DateTime<Utc>) -> Result<Vec<SeedAssignment>> {
        self.assignments
            .into_iter()
            .map(|entry| {
                let due_date = Duration::try_hours(entry.due_in_hours)
                    .and_then(|offset| now.checked_add_signed(offset))
                    .with_context(|| format!("due_in_hours out of range for {}", entry.title))?;
                Ok(SeedAssignment {
                    input: NewAssignment {
                        title: entry.title,
                        subject: entry.subject,
                        description: entry.description,
                        due_date,
                        priority: entry.priority,
                    },
                    completed: entry.completed,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_assignments() {
        let now = Utc::now();
        let demo = demo_assignments(now);
        assert_eq!(demo.len(), 4);
        assert_eq!(demo.iter().filter(|s| s.completed).count(), 1);
        assert_eq!(demo[2].input.due_date, now + Duration::days(1));
    }

    #[test]
    fn test_parse_seed_file() {
        let yaml = r#"
assignments:
  - title: Physics worksheet
    subject: Physics
    due_in_hours: 72
    priority: high
  - title: Old quiz
    subject: Biology
    description: Chapter 3
    due_in_hours: -5
    completed: true
"#;
        let now = Utc::now();
        let seed = SeedFile::parse(yaml).unwrap().into_seed(now).unwrap();

        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].input.priority, Priority::High);
        assert_eq!(seed[0].input.due_date, now + Duration::hours(72));
        assert!(!seed[0].completed);
        assert_eq!(seed[1].input.priority, Priority::Medium);
        assert_eq!(seed[1].input.description, "Chapter 3");
        assert!(seed[1].completed);
    }

    #[test]
    fn test_out_of_range_offset_is_an_error() {
        let yaml = "assignments:\n  - {title: Far future, subject: Physics, due_in_hours: 9000000000000000}\n";
        let err = SeedFile::parse(yaml)
            .unwrap()
            .into_seed(Utc::now())
            .unwrap_err();
        assert!(err.to_string().contains("due_in_hours out of range for Far future"));

        let yaml = "assignments:\n  - {title: Edge, subject: Physics, due_in_hours: 30000000000}\n";
        assert!(SeedFile::parse(yaml).unwrap().into_seed(Utc::now()).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_priority() {
        let yaml = "assignments:\n  - {title: a, subject: b, due_in_hours: 1, priority: urgent}\n";
        assert!(SeedFile::parse(yaml).is_err());
    }
}
