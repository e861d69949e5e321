#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pre-selection document processing.
//!
//! Organizers upload a PDF listing the applicants they pre-selected. This
//! crate extracts the participants from it, matches them against the users
//! registered to the hackathon and summarizes the outcome in a
//! [`PreselectionReport`]. Persisting the pre-selection is left to the
//! caller.

pub mod config;

use std::collections::BTreeSet;

use hackathon_matcher::ParticipantMatcher;
use hackathon_pdf::{Extraction, ExtractionTier, PdfExtractor};
use hackathon_registration_models::{Inscription, RosterEntry};
use serde::Serialize;

pub use config::{ConfigError, PreselectionConfig};

/// Outcome of processing one pre-selection document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreselectionReport {
    /// Name of the uploaded document.
    pub document_name: String,
    /// Number of participants extracted from the document.
    pub extracted_count: usize,
    /// Number of distinct roster users matched.
    pub matched_count: usize,
    /// Matched roster emails, in first-match order.
    pub preselected: Vec<String>,
    /// Extracted emails, capped at the configured sample limit.
    pub extracted_emails: Vec<String>,
    /// Emails of the extracted participants no matching rule resolved to a
    /// roster user, capped at the configured sample limit.
    pub unmatched_emails: Vec<String>,
    /// Extraction strategy that produced the participants.
    pub tier: Option<ExtractionTier>,
    /// Lines skipped during extraction.
    pub rejected_line_count: usize,
}

/// Builds the matching roster for a hackathon: every non-admin user with
/// an inscription to it, whatever the inscription status, once per user.
#[must_use]
pub fn roster_from_inscriptions(inscriptions: &[Inscription], hackathon_id: &str) -> Vec<RosterEntry> {
    let mut seen = BTreeSet::new();

    inscriptions
        .iter()
        .filter(|i| i.hackathon_id == hackathon_id && !i.user.is_admin())
        .filter(|i| seen.insert(i.user.id.as_str()))
        .map(|i| i.user.roster_entry())
        .collect()
}

/// Processes the extracted text of a pre-selection document.
#[must_use]
pub fn process_text(
    document_name: &str,
    text: &str,
    roster: &[RosterEntry],
    config: &PreselectionConfig,
) -> PreselectionReport {
    let extraction = PdfExtractor::new().extract_with_diagnostics(text);
    build_report(document_name, &extraction, roster, config)
}

/// Processes a pre-selection PDF. A PDF without extractable text produces
/// an empty report.
#[must_use]
pub fn process_pdf(
    document_name: &str,
    bytes: &[u8],
    roster: &[RosterEntry],
    config: &PreselectionConfig,
) -> PreselectionReport {
    let extraction = PdfExtractor::new().extract_from_pdf(bytes);
    build_report(document_name, &extraction, roster, config)
}

fn build_report(
    document_name: &str,
    extraction: &Extraction,
    roster: &[RosterEntry],
    config: &PreselectionConfig,
) -> PreselectionReport {
    let participants = &extraction.participants;
    let outcome = ParticipantMatcher::new(roster).match_with_decisions(participants);

    let unmatched_emails: Vec<String> = outcome
        .decisions
        .iter()
        .filter(|d| d.rule.is_none())
        .take(config.sample_limit)
        .map(|d| d.participant_email.clone())
        .collect();
    let preselected = outcome.emails;

    let report = PreselectionReport {
        document_name: document_name.to_owned(),
        extracted_count: participants.len(),
        matched_count: preselected.len(),
        extracted_emails: participants
            .iter()
            .take(config.sample_limit)
            .map(|p| p.email.clone())
            .collect(),
        unmatched_emails,
        tier: extraction.diagnostics.tier,
        rejected_line_count: extraction.diagnostics.rejected.len(),
        preselected,
    };

    log::info!(
        "{}: {} extracted, {} pre-selected, {} rejected lines",
        report.document_name,
        report.extracted_count,
        report.matched_count,
        report.rejected_line_count
    );
    if report.extracted_count > 0 && report.matched_count == 0 {
        log::warn!(
            "{}: none of the extracted participants is registered",
            report.document_name
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use hackathon_registration_models::{InscriptionStatus, Role, UserProfile};

    use super::*;

    fn inscription(hackathon_id: &str, user_id: &str, email: &str, role: Role) -> Inscription {
        Inscription {
            id: format!("ins-{user_id}-{hackathon_id}"),
            hackathon_id: hackathon_id.to_string(),
            user: UserProfile {
                id: user_id.to_string(),
                email: email.to_string(),
                last_name: "Dupont".to_string(),
                first_name: "Jean".to_string(),
                role,
            },
            status: InscriptionStatus::EnAttente,
            cohort: None,
            class_label: None,
            technologies: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap(),
        }
    }

    fn roster_entry(email: &str, last_name: &str, first_name: &str) -> RosterEntry {
        RosterEntry {
            id: email.to_string(),
            email: email.to_string(),
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
        }
    }

    #[test]
    fn roster_keeps_registered_non_admins_once() {
        let inscriptions = vec![
            inscription("h1", "u1", "jean@test.fr", Role::User),
            inscription("h1", "u1", "jean@test.fr", Role::User),
            inscription("h1", "u2", "admin@test.fr", Role::Admin),
            inscription("h2", "u3", "other@test.fr", Role::User),
        ];

        let roster = roster_from_inscriptions(&inscriptions, "h1");

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].email, "jean@test.fr");
    }

    #[test]
    fn report_lists_matched_and_unmatched_emails() {
        let roster = vec![
            roster_entry("Jean@Test.fr", "Dupont", "Jean"),
            roster_entry("anne@univ.com", "Martin", "Anne"),
        ];
        let text = "N° | Nom | Prénom | Email | Classe | Statut\n\
                    1 | DUPONT | Jean | jean@test.fr | L2 | VALIDE\n\
                    2 | MARTIN | Anne | a.martin@gmail.com | L1 | VALIDE\n\
                    3 | KONE | Awa | awa@test.org | L1 | VALIDE\n\
                    4 | BAD | Row | nope | L1 | VALIDE";

        let report = process_text("preselection.pdf", text, &roster, &PreselectionConfig::default());

        assert_eq!(report.extracted_count, 3);
        assert_eq!(report.matched_count, 2);
        assert_eq!(report.preselected, vec!["Jean@Test.fr", "anne@univ.com"]);
        assert_eq!(
            report.extracted_emails,
            vec!["jean@test.fr", "a.martin@gmail.com", "awa@test.org"]
        );
        assert_eq!(report.unmatched_emails, vec!["awa@test.org"]);
        assert_eq!(report.tier, Some(ExtractionTier::DelimitedTable));
        assert_eq!(report.rejected_line_count, 1);
    }

    #[test]
    fn name_matched_participant_is_not_unmatched() {
        let roster = vec![roster_entry("anne@univ.com", "Martin", "Anne")];

        let report = process_text(
            "doc",
            "Anne Martin a.martin@gmail.com",
            &roster,
            &PreselectionConfig::default(),
        );

        assert_eq!(report.extracted_count, 1);
        assert_eq!(report.preselected, vec!["anne@univ.com"]);
        assert!(report.unmatched_emails.is_empty());
    }

    #[test]
    fn samples_are_capped_but_counts_are_not() {
        let text = "a@x.com\nb@x.com\nc@x.com";
        let config = PreselectionConfig { sample_limit: 2 };

        let report = process_text("doc", text, &[], &config);

        assert_eq!(report.extracted_count, 3);
        assert_eq!(report.extracted_emails, vec!["a@x.com", "b@x.com"]);
        assert_eq!(report.unmatched_emails.len(), 2);
        assert!(report.preselected.is_empty());
    }

    #[test]
    fn unreadable_pdf_gives_empty_report() {
        let report = process_pdf("broken.pdf", b"not a pdf", &[], &PreselectionConfig::default());

        assert_eq!(report.extracted_count, 0);
        assert_eq!(report.tier, None);
        assert!(report.extracted_emails.is_empty());
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = process_text("doc", "", &[], &PreselectionConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["documentName"], "doc");
        assert_eq!(json["rejectedLineCount"], 0);
        assert!(json["tier"].is_null());
    }
}
