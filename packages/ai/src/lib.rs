#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Rule-based applicant scoring.
//!
//! Scores how trustworthy and complete an applicant's registrations look,
//! from 100 (nothing to report) down to 0, and suggests what the applicant
//! could fill in. The score is a fixed list of [`PenaltyRule`]s; no model
//! is called.

use hackathon_registration_models::Inscription;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Score before any penalty.
pub const MAX_SCORE: u8 = 100;

/// Applicants with more inscriptions than this are penalized.
pub const MAX_EXPECTED_INSCRIPTIONS: usize = 5;

/// Scores below this get a suggestion to complete the profile.
pub const INCOMPLETE_PROFILE_SCORE: u8 = 50;

/// Substrings of throwaway email addresses.
const SUSPICIOUS_EMAIL_MARKERS: &[&str] = &["test", "fake"];

const NO_ISSUE_REASON: &str = "no issue detected";

/// What the scorer knows about one applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    /// Applicant email.
    pub email: String,
    /// Number of hackathons the applicant signed up for.
    pub inscription_count: usize,
    /// Technologies listed on the most recent inscription.
    pub latest_technologies: Vec<String>,
    /// Cohort declared on the most recent inscription.
    pub latest_cohort: Option<String>,
}

impl ApplicantProfile {
    /// Builds the profile of the user registered as `email` from all
    /// known inscriptions.
    #[must_use]
    pub fn from_inscriptions(email: &str, inscriptions: &[Inscription]) -> Self {
        let own: Vec<&Inscription> = inscriptions
            .iter()
            .filter(|i| i.user.email.eq_ignore_ascii_case(email))
            .collect();
        let latest = own.iter().max_by_key(|i| i.created_at);

        Self {
            email: email.to_owned(),
            inscription_count: own.len(),
            latest_technologies: latest
                .map(|i| {
                    i.technologies
                        .iter()
                        .filter(|t| !t.trim().is_empty())
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            latest_cohort: latest
                .and_then(|i| i.cohort.as_deref())
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_owned),
        }
    }
}

/// One reason to lower an applicant's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PenaltyRule {
    /// The email looks like a throwaway address.
    SuspiciousEmail,
    /// More inscriptions than a real applicant would make.
    ManyInscriptions,
    /// The latest inscription lists no technology.
    NoTechnologies,
    /// The latest inscription declares no cohort.
    NoCohort,
}

impl PenaltyRule {
    /// All rules, in evaluation order.
    pub const ALL: &[Self] = &[
        Self::SuspiciousEmail,
        Self::ManyInscriptions,
        Self::NoTechnologies,
        Self::NoCohort,
    ];

    /// Points removed from the score.
    #[must_use]
    pub const fn penalty(self) -> u8 {
        match self {
            Self::SuspiciousEmail => 20,
            Self::ManyInscriptions => 15,
            Self::NoTechnologies => 10,
            Self::NoCohort => 5,
        }
    }

    /// Human-readable reason.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::SuspiciousEmail => "suspicious email (contains \"test\" or \"fake\")",
            Self::ManyInscriptions => "unusually high number of inscriptions",
            Self::NoTechnologies => "no technology listed on the inscription",
            Self::NoCohort => "no cohort declared on the inscription",
        }
    }

    fn applies(self, profile: &ApplicantProfile) -> bool {
        match self {
            Self::SuspiciousEmail => {
                let email = profile.email.to_lowercase();
                SUSPICIOUS_EMAIL_MARKERS.iter().any(|m| email.contains(m))
            }
            Self::ManyInscriptions => profile.inscription_count > MAX_EXPECTED_INSCRIPTIONS,
            Self::NoTechnologies => profile.latest_technologies.is_empty(),
            Self::NoCohort => profile.latest_cohort.is_none(),
        }
    }
}

/// Outcome of scoring one applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0 to 100, higher is better.
    pub score: u8,
    /// What the applicant could do to improve their profile.
    pub suggestions: Vec<String>,
    /// Why points were removed.
    pub reasons: Vec<String>,
    /// How much the score can be trusted, from 0.5 to 0.9.
    pub confidence: f64,
}

/// Scores an applicant.
#[must_use]
pub fn analyze(profile: &ApplicantProfile) -> AnalysisResult {
    let fired: Vec<PenaltyRule> = PenaltyRule::ALL
        .iter()
        .copied()
        .filter(|rule| rule.applies(profile))
        .collect();

    let score = fired
        .iter()
        .fold(MAX_SCORE, |score, rule| score.saturating_sub(rule.penalty()));

    let mut suggestions = Vec::new();
    if fired.contains(&PenaltyRule::NoTechnologies) {
        suggestions.push("Add your favorite technologies to your inscription".to_string());
    }
    if fired.contains(&PenaltyRule::NoCohort) {
        suggestions.push("Declare your cohort on your inscription".to_string());
    }
    match profile.inscription_count {
        0 => suggestions.push("You are not registered to any hackathon yet".to_string()),
        1 => suggestions.push("Consider registering to other hackathons".to_string()),
        _ => {}
    }
    if score < INCOMPLETE_PROFILE_SCORE {
        suggestions.push("Your profile looks incomplete, consider completing it".to_string());
    }

    let reasons = if fired.is_empty() {
        vec![NO_ISSUE_REASON.to_string()]
    } else {
        fired.iter().map(|rule| rule.reason().to_string()).collect()
    };

    let confidence = match score {
        71.. => 0.9,
        41..=70 => 0.7,
        _ => 0.5,
    };

    log::debug!(
        "Scored {}: {score} ({})",
        profile.email,
        fired.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    );

    AnalysisResult {
        score,
        suggestions,
        reasons,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use hackathon_registration_models::{InscriptionStatus, Role, UserProfile};

    use super::*;

    fn inscription(email: &str, day: u32, cohort: Option<&str>, technologies: &[&str]) -> Inscription {
        Inscription {
            id: format!("ins-{day}"),
            hackathon_id: format!("h{day}"),
            user: UserProfile {
                id: "u1".to_string(),
                email: email.to_string(),
                last_name: "Dupont".to_string(),
                first_name: "Jean".to_string(),
                role: Role::User,
            },
            status: InscriptionStatus::Valide,
            cohort: cohort.map(str::to_string),
            class_label: None,
            technologies: technologies.iter().map(|t| (*t).to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2025, 4, day, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn complete_profile_scores_full_marks() {
        let inscriptions = vec![
            inscription("jean@univ.fr", 1, Some("L1"), &["Rust"]),
            inscription("jean@univ.fr", 2, Some("L1"), &["Rust", "SQL"]),
        ];
        let profile = ApplicantProfile::from_inscriptions("jean@univ.fr", &inscriptions);

        let result = analyze(&profile);

        assert_eq!(result.score, 100);
        assert_eq!(result.reasons, vec!["no issue detected"]);
        assert!(result.suggestions.is_empty());
        assert!((result.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn profile_reads_latest_inscription() {
        let inscriptions = vec![
            inscription("jean@univ.fr", 5, None, &[]),
            inscription("JEAN@univ.fr", 2, Some("L2"), &["Go"]),
            inscription("other@univ.fr", 9, Some("L1"), &["C"]),
        ];

        let profile = ApplicantProfile::from_inscriptions("jean@univ.fr", &inscriptions);

        assert_eq!(profile.inscription_count, 2);
        assert!(profile.latest_technologies.is_empty());
        assert_eq!(profile.latest_cohort, None);
    }

    #[test]
    fn penalties_accumulate_in_rule_order() {
        let profile = ApplicantProfile {
            email: "fake.user@test.com".to_string(),
            inscription_count: 6,
            latest_technologies: Vec::new(),
            latest_cohort: None,
        };

        let result = analyze(&profile);

        assert_eq!(result.score, 50);
        assert_eq!(
            result.reasons,
            PenaltyRule::ALL
                .iter()
                .map(|r| r.reason().to_string())
                .collect::<Vec<_>>()
        );
        assert_eq!(result.suggestions.len(), 2);
        assert!((result.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_applicant_gets_registration_suggestion() {
        let profile = ApplicantProfile::from_inscriptions("test@x.com", &[]);

        let result = analyze(&profile);

        assert_eq!(result.score, 65);
        assert!(
            result
                .suggestions
                .contains(&"You are not registered to any hackathon yet".to_string())
        );
    }

    #[test]
    fn single_inscription_suggests_more() {
        let inscriptions = vec![inscription("jean@univ.fr", 1, Some("L1"), &["Rust"])];
        let result = analyze(&ApplicantProfile::from_inscriptions("jean@univ.fr", &inscriptions));
        assert_eq!(
            result.suggestions,
            vec!["Consider registering to other hackathons"]
        );
    }

    #[test]
    fn result_serializes_camel_case() {
        let json = serde_json::to_value(analyze(&ApplicantProfile::default())).unwrap();
        assert!(json["score"].is_number());
        assert!(json["suggestions"].is_array());
    }
}
