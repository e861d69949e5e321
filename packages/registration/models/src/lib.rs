#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Registration, roster and extracted-participant types.
//!
//! These types are shared by every hackathon crate: the PDF extractor
//! produces [`ExtractedParticipant`] records, the matcher reconciles them
//! against a roster of [`RosterEntry`] values, and the announcement and
//! scoring crates read [`Inscription`] snapshots handed over by the
//! persistence layer.

pub mod cohort;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use cohort::CohortYear;

/// Account role of a registered user.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular participant account
    #[default]
    User,
    /// Organizer account, never part of a participant roster
    Admin,
}

/// Review status of an inscription.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InscriptionStatus {
    /// Submitted, not yet reviewed
    #[default]
    EnAttente,
    /// Accepted by the organizers
    Valide,
}

/// A registered user as seen by the registration toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: String,
    /// Login email, stored with the casing the user registered with.
    pub email: String,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Account role.
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    /// Returns `true` for organizer accounts.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Projects this user onto the roster shape used for matching.
    #[must_use]
    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            id: self.id.clone(),
            email: self.email.clone(),
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
        }
    }
}

/// A user's sign-up to a hackathon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inscription {
    /// Inscription identifier.
    pub id: String,
    /// Hackathon the user signed up for.
    pub hackathon_id: String,
    /// The registered user.
    pub user: UserProfile,
    /// Review status.
    #[serde(default)]
    pub status: InscriptionStatus,
    /// Cohort the user declared (e.g. `"L1"`).
    #[serde(default)]
    pub cohort: Option<String>,
    /// Class code the user declared (e.g. `"LIC1 A"`).
    #[serde(default)]
    pub class_label: Option<String>,
    /// Technologies listed on the inscription form.
    #[serde(default)]
    pub technologies: Vec<String>,
    /// When the inscription was submitted.
    pub created_at: DateTime<Utc>,
}

impl Inscription {
    /// Returns the class code to display for this inscription.
    ///
    /// Older inscriptions stored the class as the first entry of the
    /// technologies list, so that is used when no explicit class label is
    /// present.
    #[must_use]
    pub fn class_code(&self) -> Option<&str> {
        non_blank(self.class_label.as_deref()).or_else(|| {
            self.technologies
                .iter()
                .map(String::as_str)
                .find(|t| !t.trim().is_empty())
                .map(str::trim)
        })
    }
}

/// A roster member that extracted participants are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// User identifier.
    pub id: String,
    /// Stored email; matched emails are always returned in this casing.
    pub email: String,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
}

/// A participant record recovered from the text of a PDF.
///
/// Only `email` is guaranteed. Every other field is `None` when the
/// extraction strategy that produced the record could not recover it;
/// empty strings are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedParticipant {
    /// Email address, always plausible (see [`is_plausible_email`]).
    pub email: String,
    /// Family name.
    pub name: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Unsplit "first last" name.
    pub full_name: Option<String>,
    /// Free-text class code (e.g. `"LIC1 A"`).
    pub cohort_label: Option<String>,
    /// Year inferred from the class code.
    pub cohort_year: Option<CohortYear>,
    /// Phone number found near the email.
    pub phone: Option<String>,
}

impl ExtractedParticipant {
    /// Creates a participant carrying only an email.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Sets the family name. Blank values are ignored.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = owned_non_blank(name);
        self
    }

    /// Sets the given name. Blank values are ignored.
    #[must_use]
    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = owned_non_blank(first_name);
        self
    }

    /// Sets the unsplit full name. Blank values are ignored.
    #[must_use]
    pub fn with_full_name(mut self, full_name: &str) -> Self {
        self.full_name = owned_non_blank(full_name);
        self
    }

    /// Sets the class code. Blank values are ignored.
    #[must_use]
    pub fn with_cohort_label(mut self, label: &str) -> Self {
        self.cohort_label = owned_non_blank(label);
        self
    }

    /// Sets the cohort year.
    #[must_use]
    pub const fn with_cohort_year(mut self, year: CohortYear) -> Self {
        self.cohort_year = Some(year);
        self
    }

    /// Sets the phone number. Blank values are ignored.
    #[must_use]
    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = owned_non_blank(phone);
        self
    }
}

/// Returns `true` if `email` has exactly one `@`, a non-empty local part
/// and a dotted domain with no empty first or last label.
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn owned_non_blank(value: &str) -> Option<String> {
    non_blank(Some(value)).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn inscription(class_label: Option<&str>, technologies: &[&str]) -> Inscription {
        Inscription {
            id: "ins-1".to_string(),
            hackathon_id: "hack-1".to_string(),
            user: UserProfile {
                id: "u-1".to_string(),
                email: "jean@test.fr".to_string(),
                last_name: "Dupont".to_string(),
                first_name: "Jean".to_string(),
                role: Role::User,
            },
            status: InscriptionStatus::Valide,
            cohort: None,
            class_label: class_label.map(str::to_string),
            technologies: technologies.iter().map(|t| (*t).to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn plausible_emails() {
        assert!(is_plausible_email("jean@test.fr"));
        assert!(is_plausible_email("a.b+c@sub.domain.org"));
        assert!(!is_plausible_email("jean.test.fr"));
        assert!(!is_plausible_email("jean@test"));
        assert!(!is_plausible_email("@test.fr"));
        assert!(!is_plausible_email("jean@te@st.fr"));
        assert!(!is_plausible_email("jean@test."));
    }

    #[test]
    fn builder_ignores_blank_values() {
        let p = ExtractedParticipant::new("jean@test.fr")
            .with_name("  ")
            .with_first_name(" Jean ")
            .with_cohort_label("");
        assert_eq!(p.name, None);
        assert_eq!(p.first_name.as_deref(), Some("Jean"));
        assert_eq!(p.cohort_label, None);
    }

    #[test]
    fn class_code_prefers_label_then_technologies() {
        assert_eq!(
            inscription(Some("LIC1 A"), &["LRT B"]).class_code(),
            Some("LIC1 A")
        );
        assert_eq!(inscription(None, &[" ", "LRT B"]).class_code(), Some("LRT B"));
        assert_eq!(inscription(Some(" "), &[]).class_code(), None);
    }

    #[test]
    fn roles_round_trip_through_strum_and_serde() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!("VALIDE".parse::<InscriptionStatus>().unwrap(), InscriptionStatus::Valide);
        assert_eq!(
            serde_json::to_string(&InscriptionStatus::EnAttente).unwrap(),
            "\"EN_ATTENTE\""
        );
    }

    #[test]
    fn roster_entry_copies_identity() {
        let user = inscription(None, &[]).user;
        let entry = user.roster_entry();
        assert_eq!(entry.email, "jean@test.fr");
        assert_eq!(entry.last_name, "Dupont");
        assert!(!user.is_admin());
    }
}
