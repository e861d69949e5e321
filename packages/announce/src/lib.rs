#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Announcement and notification fan-out.
//!
//! Emails are never sent from here. Every message becomes an [`EmailJob`]
//! pushed to an injected [`EmailQueue`]; a queue failure is logged and
//! counted in the returned [`FanOutSummary`] but never aborts the other
//! jobs.

pub mod job;

use std::collections::BTreeSet;

use futures::future::join_all;
use hackathon_registration_models::{Inscription, RosterEntry};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use job::{EmailJob, EmailJobKind, Recipient};

/// Errors reported by an [`EmailQueue`].
#[derive(Debug, thiserror::Error)]
pub enum AnnounceError {
    /// The queue refused the job.
    #[error("Queue error: {message}")]
    Queue {
        /// Description of what went wrong.
        message: String,
    },
}

/// Who an announcement is shown to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Audience {
    /// Everyone, shown on the public site only.
    Public,
    /// Registrants, who are also emailed.
    Inscrits,
}

/// An announcement published by the organizers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Announcement identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Target audience.
    pub audience: Audience,
    /// Hackathon the announcement belongs to; `None` addresses the
    /// registrants of every hackathon.
    #[serde(default)]
    pub hackathon_id: Option<String>,
}

/// Destination for email jobs.
#[async_trait::async_trait]
pub trait EmailQueue: Send + Sync {
    /// Queues one email.
    ///
    /// # Errors
    ///
    /// Returns [`AnnounceError`] if the job could not be queued.
    async fn enqueue(&self, job: EmailJob) -> Result<(), AnnounceError>;
}

/// Queue that only logs the jobs it receives.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingQueue;

#[async_trait::async_trait]
impl EmailQueue for LoggingQueue {
    async fn enqueue(&self, job: EmailJob) -> Result<(), AnnounceError> {
        log::info!("[{}] would email {}", job.kind(), job.recipient().email);
        Ok(())
    }
}

/// Result of dispatching a batch of jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FanOutSummary {
    /// Jobs accepted by the queue.
    pub dispatched: usize,
    /// Jobs the queue rejected.
    pub failed: usize,
}

/// Registrants an announcement should be emailed to: users registered to
/// the announcement's hackathon, or to any hackathon when it has none.
/// Each email address appears once.
#[must_use]
pub fn recipients_for(announcement: &Announcement, inscriptions: &[Inscription]) -> Vec<Recipient> {
    let mut seen = BTreeSet::new();

    inscriptions
        .iter()
        .filter(|i| {
            announcement
                .hackathon_id
                .as_deref()
                .is_none_or(|id| i.hackathon_id == id)
        })
        .filter(|i| seen.insert(i.user.email.to_lowercase()))
        .map(|i| Recipient::from(&i.user))
        .collect()
}

/// Emails an announcement to its registrants.
///
/// Only [`Audience::Inscrits`] announcements are emailed; public ones
/// return an empty summary.
pub async fn fan_out(
    queue: &dyn EmailQueue,
    announcement: &Announcement,
    inscriptions: &[Inscription],
) -> FanOutSummary {
    if announcement.audience != Audience::Inscrits {
        log::debug!("Announcement {} is not for registrants, nothing to send", announcement.id);
        return FanOutSummary::default();
    }

    let jobs = recipients_for(announcement, inscriptions)
        .into_iter()
        .map(|recipient| EmailJob::AnnouncementToRegistrants {
            recipient,
            title: announcement.title.clone(),
            content: announcement.content.clone(),
        })
        .collect();

    let summary = dispatch(queue, jobs).await;
    log::info!(
        "Announcement {}: {} emails queued, {} failed",
        announcement.id,
        summary.dispatched,
        summary.failed
    );
    summary
}

/// Notifies pre-selected users. Emails missing from the roster are
/// skipped.
pub async fn notify_preselected(
    queue: &dyn EmailQueue,
    preselected: &[String],
    roster: &[RosterEntry],
    hackathon_name: &str,
) -> FanOutSummary {
    let jobs = preselected
        .iter()
        .filter_map(|email| {
            let entry = roster.iter().find(|e| e.email.eq_ignore_ascii_case(email));
            if entry.is_none() {
                log::warn!("Pre-selected {email} is not on the roster, skipping notice");
            }
            entry
        })
        .map(|entry| EmailJob::PreselectionNotice {
            recipient: Recipient::from(entry),
            hackathon_name: hackathon_name.to_owned(),
        })
        .collect();

    dispatch(queue, jobs).await
}

/// Queues every job concurrently and tallies the outcome.
pub async fn dispatch(queue: &dyn EmailQueue, jobs: Vec<EmailJob>) -> FanOutSummary {
    let results = join_all(jobs.into_iter().map(|job| async move {
        let kind = job.kind();
        let email = job.recipient().email.clone();
        queue.enqueue(job).await.map_err(|e| (kind, email, e))
    }))
    .await;

    let mut summary = FanOutSummary::default();
    for result in results {
        match result {
            Ok(()) => summary.dispatched += 1,
            Err((kind, email, e)) => {
                log::warn!("[{kind}] failed to queue email for {email}: {e}");
                summary.failed += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{TimeZone as _, Utc};
    use hackathon_registration_models::{InscriptionStatus, Role, UserProfile};

    use super::*;

    #[derive(Default)]
    struct RecordingQueue {
        jobs: Mutex<Vec<EmailJob>>,
        reject: Vec<String>,
    }

    impl RecordingQueue {
        fn rejecting(emails: &[&str]) -> Self {
            Self {
                jobs: Mutex::default(),
                reject: emails.iter().map(|e| (*e).to_string()).collect(),
            }
        }

        fn emails(&self) -> Vec<String> {
            let mut emails: Vec<String> = self
                .jobs
                .lock()
                .unwrap()
                .iter()
                .map(|j| j.recipient().email.clone())
                .collect();
            emails.sort();
            emails
        }
    }

    #[async_trait::async_trait]
    impl EmailQueue for RecordingQueue {
        async fn enqueue(&self, job: EmailJob) -> Result<(), AnnounceError> {
            if self.reject.contains(&job.recipient().email) {
                return Err(AnnounceError::Queue {
                    message: "mailbox unavailable".to_string(),
                });
            }
            self.jobs.lock().unwrap().push(job);
            Ok(())
        }
    }

    fn inscription(hackathon_id: &str, email: &str) -> Inscription {
        Inscription {
            id: format!("{hackathon_id}-{email}"),
            hackathon_id: hackathon_id.to_string(),
            user: UserProfile {
                id: email.to_string(),
                email: email.to_string(),
                last_name: "Dupont".to_string(),
                first_name: "Jean".to_string(),
                role: Role::User,
            },
            status: InscriptionStatus::Valide,
            cohort: Some("L1".to_string()),
            class_label: None,
            technologies: vec!["Rust".to_string()],
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn announcement(audience: Audience, hackathon_id: Option<&str>) -> Announcement {
        Announcement {
            id: "ann-1".to_string(),
            title: "Rappel".to_string(),
            content: "Rendez-vous demain".to_string(),
            audience,
            hackathon_id: hackathon_id.map(str::to_string),
        }
    }

    fn inscriptions() -> Vec<Inscription> {
        vec![
            inscription("h1", "a@x.com"),
            inscription("h1", "b@x.com"),
            inscription("h2", "c@x.com"),
            inscription("h2", "A@X.com"),
        ]
    }

    #[test]
    fn recipients_of_linked_hackathon_only() {
        let recipients = recipients_for(&announcement(Audience::Inscrits, Some("h2")), &inscriptions());
        let emails: Vec<&str> = recipients.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, vec!["c@x.com", "A@X.com"]);
    }

    #[test]
    fn unlinked_announcement_reaches_everyone_once() {
        let recipients = recipients_for(&announcement(Audience::Inscrits, None), &inscriptions());
        let emails: Vec<&str> = recipients.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn fan_out_queues_one_job_per_recipient() {
        let queue = RecordingQueue::default();

        let summary = fan_out(&queue, &announcement(Audience::Inscrits, Some("h1")), &inscriptions()).await;

        assert_eq!(summary, FanOutSummary { dispatched: 2, failed: 0 });
        assert_eq!(queue.emails(), vec!["a@x.com", "b@x.com"]);
        let jobs = queue.jobs.lock().unwrap();
        assert!(jobs.iter().all(|j| j.kind() == EmailJobKind::AnnonceInscrits));
    }

    #[tokio::test]
    async fn public_announcements_are_not_emailed() {
        let queue = RecordingQueue::default();

        let summary = fan_out(&queue, &announcement(Audience::Public, None), &inscriptions()).await;

        assert_eq!(summary, FanOutSummary::default());
        assert!(queue.emails().is_empty());
    }

    #[tokio::test]
    async fn failures_are_counted_and_do_not_stop_other_jobs() {
        let queue = RecordingQueue::rejecting(&["b@x.com"]);

        let summary = fan_out(&queue, &announcement(Audience::Inscrits, None), &inscriptions()).await;

        assert_eq!(summary, FanOutSummary { dispatched: 2, failed: 1 });
        assert_eq!(queue.emails(), vec!["a@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn preselection_notices_use_roster_identity() {
        let queue = RecordingQueue::default();
        let roster = vec![RosterEntry {
            id: "u1".to_string(),
            email: "Jean@Test.fr".to_string(),
            last_name: "Dupont".to_string(),
            first_name: "Jean".to_string(),
        }];
        let preselected = vec!["jean@test.fr".to_string(), "ghost@test.fr".to_string()];

        let summary = notify_preselected(&queue, &preselected, &roster, "CFI").await;

        assert_eq!(summary, FanOutSummary { dispatched: 1, failed: 0 });
        let jobs = queue.jobs.lock().unwrap();
        assert_eq!(
            jobs[0],
            EmailJob::PreselectionNotice {
                recipient: Recipient::from(&roster[0]),
                hackathon_name: "CFI".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn logging_queue_accepts_everything() {
        let job = EmailJob::receipt(&inscription("h1", "a@x.com"), "CFI");
        assert_eq!(job.kind(), EmailJobKind::AccusReception);
        assert!(LoggingQueue.enqueue(job).await.is_ok());
    }
}
