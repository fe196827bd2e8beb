//! Expiry lifecycle engine: a periodic sweep over every stored medication.

use chrono::{Local, NaiveDate};
use futures::future;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::constants::{EXPIRY_WARNING_DAYS, REMINDER_INTERVAL_DAYS, REMINDER_SWEEP_CRON};
use crate::db::models::MedicationSummary;
use crate::db::repository::MedicineRepository;
use crate::formatters;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryState {
    Active,
    DueForReminder,
    Expired,
}

/// Pure policy: first reminder 60 days out, then every 14 days inside the
/// window, removal once the date has passed.
pub fn classify_expiry(days_to_expiry: i64) -> ExpiryState {
    if days_to_expiry < 0 {
        ExpiryState::Expired
    } else if days_to_expiry == EXPIRY_WARNING_DAYS
        || (days_to_expiry < EXPIRY_WARNING_DAYS
            && (EXPIRY_WARNING_DAYS - days_to_expiry) % REMINDER_INTERVAL_DAYS == 0)
    {
        ExpiryState::DueForReminder
    } else {
        ExpiryState::Active
    }
}

/// Registers the hourly sweep job and starts the scheduler for the life of
/// the process. The per-day marker inside the sweep keeps the hourly poll
/// from double-notifying.
pub async fn schedule_reminder_sweeps(
    repo: Arc<dyn MedicineRepository>,
    notifier: Arc<dyn Notifier>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let sched = JobScheduler::new().await?;

    let job = Job::new_async(REMINDER_SWEEP_CRON, move |_uuid, _l| {
        let repo = repo.clone();
        let notifier = notifier.clone();
        Box::pin(async move {
            run_reminder_sweep(repo.as_ref(), notifier.as_ref(), Local::now().date_naive()).await;
            log::info!("Reminder sweep completed");
        })
    })?;

    sched.add(job).await?;

    tokio::spawn(async move {
        if let Err(e) = sched.start().await {
            log::error!("Scheduler error: {}", e);
        }
    });

    log::info!("Reminder scheduler started");
    Ok(())
}

/// One full pass over all stored medications. Every item is committed
/// independently; a failure on one item never aborts the rest.
pub async fn run_reminder_sweep(
    repo: &dyn MedicineRepository,
    notifier: &dyn Notifier,
    today: NaiveDate,
) {
    let medications = match repo.scan_all_medications().await {
        Ok(medications) => medications,
        Err(e) => {
            log::error!("Reminder sweep could not scan medications: {}", e);
            return;
        }
    };

    let mut due: Vec<(MedicationSummary, i64)> = Vec::new();
    for med in medications {
        let days_to_expiry = (med.expiry_date - today).num_days();
        match classify_expiry(days_to_expiry) {
            ExpiryState::Expired => {
                log::info!(
                    "Removing expired medication {} for user {}",
                    med.name,
                    med.user_id
                );
                // Deletion first; a failed notification is never rolled back.
                if let Err(e) = repo.delete_medication(med.id).await {
                    log::error!("Failed to remove expired medication {}: {}", med.name, e);
                    continue;
                }
                if let Err(e) = notifier
                    .send(
                        med.user_id,
                        &formatters::expired_removed(&med.name, med.expiry_date),
                    )
                    .await
                {
                    log::error!(
                        "Failed to notify user {} about removed medication {}: {}",
                        med.user_id,
                        med.name,
                        e
                    );
                }
            }
            ExpiryState::DueForReminder => match repo.mark_reminder_sent(med.id, today).await {
                Ok(true) => due.push((med, days_to_expiry)),
                Ok(false) => {}
                Err(e) => log::error!("Failed to record reminder marker for {}: {}", med.name, e),
            },
            ExpiryState::Active => {}
        }
    }

    let messages: Vec<(i64, String)> = due
        .iter()
        .map(|(med, days)| (med.user_id, formatters::reminder_text(&med.name, *days)))
        .collect();
    let results = future::join_all(
        messages
            .iter()
            .map(|(user_id, text)| notifier.send(*user_id, text)),
    )
    .await;
    for result in results {
        if let Err(e) = result {
            log::error!("Failed to send reminder: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NewMedication;
    use crate::db::repository::tests::memory_repository;
    use crate::notify::testing::RecordingNotifier;

    #[test]
    fn negative_day_counts_are_expired() {
        assert_eq!(classify_expiry(-1), ExpiryState::Expired);
        assert_eq!(classify_expiry(-100), ExpiryState::Expired);
    }

    #[test]
    fn reminder_window_hits_sixty_then_every_fourteen_days() {
        for days in [60, 46, 32, 18, 4] {
            assert_eq!(classify_expiry(days), ExpiryState::DueForReminder, "{days}");
        }
    }

    #[test]
    fn day_counts_off_the_cadence_are_active() {
        for days in [0, 50, 59, 61, 120] {
            assert_eq!(classify_expiry(days), ExpiryState::Active, "{days}");
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    async fn add_med(
        repo: &crate::db::repository::SqliteRepository,
        user_id: i64,
        name: &str,
        days_out: i64,
    ) {
        repo.add_medication(
            user_id,
            &NewMedication {
                name: name.to_string(),
                expiry_date: today() + chrono::Duration::days(days_out),
                quantity: 1,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn expired_item_is_removed_and_owner_notified_once() {
        let repo = memory_repository().await;
        let notifier = RecordingNotifier::default();
        add_med(&repo, 10, "Анальгин", -1).await;

        run_reminder_sweep(&repo, &notifier, today()).await;

        assert!(repo.list_medications(10).await.unwrap().is_empty());
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, 10);
        assert!(messages[0].1.contains("Анальгин"));
    }

    #[tokio::test]
    async fn reminder_goes_out_on_the_cadence_only() {
        let repo = memory_repository().await;
        let notifier = RecordingNotifier::default();
        add_med(&repo, 10, "На-границе", 60).await;
        add_med(&repo, 10, "В-окне", 46).await;
        add_med(&repo, 10, "Мимо-окна", 50).await;

        run_reminder_sweep(&repo, &notifier, today()).await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|(_, m)| m.contains("через 60 дней")));
        assert!(messages.iter().any(|(_, m)| m.contains("через 46 дней")));
        assert!(!messages.iter().any(|(_, m)| m.contains("Мимо-окна")));
    }

    #[tokio::test]
    async fn second_sweep_on_the_same_day_sends_nothing_new() {
        let repo = memory_repository().await;
        let notifier = RecordingNotifier::default();
        add_med(&repo, 10, "Аспирин", 60).await;

        run_reminder_sweep(&repo, &notifier, today()).await;
        run_reminder_sweep(&repo, &notifier, today()).await;

        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn failed_expiry_notification_leaves_the_item_deleted() {
        let repo = memory_repository().await;
        let notifier = RecordingNotifier::failing();
        add_med(&repo, 10, "Просрочка", -5).await;

        run_reminder_sweep(&repo, &notifier, today()).await;

        assert!(repo.list_medications(10).await.unwrap().is_empty());
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn one_failing_send_does_not_stop_the_rest_of_the_sweep() {
        let repo = memory_repository().await;
        let notifier = RecordingNotifier::failing();
        add_med(&repo, 10, "Первое", -2).await;
        add_med(&repo, 11, "Второе", 60).await;

        run_reminder_sweep(&repo, &notifier, today()).await;

        // Both items were processed despite every delivery failing.
        assert!(repo.list_medications(10).await.unwrap().is_empty());
        assert_eq!(notifier.messages().len(), 2);
    }
}
