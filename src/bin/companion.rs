use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{error, info, warn};
use std::sync::Arc;

use study_companion::core::{Clock, Config, SystemClock};
use study_companion::features::assignments::{demo_assignments, due_label, SeedFile};
use study_companion::features::reminders::{InMemoryNotifier, ReminderScheduler};
use study_companion::StudyPlanner;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting study companion...");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier = Arc::new(
        InMemoryNotifier::new(clock.clone()).grant_on_request(config.notifications_granted),
    );
    let scheduler = ReminderScheduler::new(notifier.clone(), clock.clone(), config.reminder_lead());
    let planner = StudyPlanner::new(scheduler);
    info!(
        "⏰ Reminders fire {}h before the due date",
        planner.scheduler().lead().num_hours()
    );

    let now = clock.now();
    let mut seed = Vec::new();
    if config.seed_demo_data {
        seed.extend(demo_assignments(now));
    }
    if let Some(path) = &config.seed_file {
        let file = SeedFile::load(path)?;
        info!("📄 Loaded {} assignment(s) from {}", file.assignments.len(), path.display());
        seed.extend(file.into_seed(now)?);
    }

    let report = planner
        .seed(seed)
        .await
        .context("Seed data contains an invalid assignment")?;

    if report.permission_denied() {
        warn!("🔕 Notifications are disabled; reminders will not be delivered");
        warn!("Set NOTIFICATIONS_GRANTED=true to simulate granting permission");
    }
    for problem in &report.errors {
        error!("{problem}");
    }

    let counts = planner.counts().await;
    info!(
        "📚 {} assignment(s): {} pending, {} completed",
        counts.all, counts.pending, counts.completed
    );

    for assignment in planner.assignments().await {
        let reminder = report
            .armed_for(assignment.id)
            .map(|r| format!("reminder at {}", r.trigger_at.format("%Y-%m-%d %H:%M UTC")))
            .unwrap_or_else(|| "no reminder".to_string());
        info!(
            "  [{}] {} ({}, {} priority) - {} - {}",
            if assignment.completed { "x" } else { " " },
            assignment.title,
            assignment.subject,
            assignment.priority,
            due_label(assignment.due_date, now),
            reminder
        );
    }

    let pending = notifier.pending();
    info!("⏰ {} reminder(s) pending", pending.len());
    if let Some(next) = pending.first() {
        info!(
            "Next: \"{}\" at {}",
            next.request.body,
            next.request.trigger_at.format("%Y-%m-%d %H:%M UTC")
        );
    }

    Ok(())
}
