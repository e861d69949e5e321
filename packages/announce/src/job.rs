//! Email jobs handed to an [`crate::EmailQueue`].

use hackathon_registration_models::{Inscription, RosterEntry, UserProfile};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Who an email is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Email address.
    pub email: String,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
}

impl From<&UserProfile> for Recipient {
    fn from(user: &UserProfile) -> Self {
        Self {
            email: user.email.clone(),
            last_name: user.last_name.clone(),
            first_name: user.first_name.clone(),
        }
    }
}

impl From<&RosterEntry> for Recipient {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            email: entry.email.clone(),
            last_name: entry.last_name.clone(),
            first_name: entry.first_name.clone(),
        }
    }
}

/// Stable job type names, as understood by the mail worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum EmailJobKind {
    /// Registration acknowledgement.
    AccusReception,
    /// Announcement addressed to registrants.
    AnnonceInscrits,
    /// Pre-selection notice.
    Preselection,
}

/// One email to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum EmailJob {
    /// Acknowledges a new inscription.
    #[serde(rename = "accus_reception", rename_all = "camelCase")]
    InscriptionReceipt {
        /// The registrant.
        recipient: Recipient,
        /// Hackathon the registrant signed up for.
        hackathon_name: String,
        /// Declared cohort.
        cohort: Option<String>,
        /// Declared technologies.
        technologies: Vec<String>,
    },
    /// Forwards an announcement to a registrant.
    #[serde(rename = "annonce_inscrits", rename_all = "camelCase")]
    AnnouncementToRegistrants {
        /// The registrant.
        recipient: Recipient,
        /// Announcement title.
        title: String,
        /// Announcement body.
        content: String,
    },
    /// Tells a registrant they were pre-selected.
    #[serde(rename = "preselection", rename_all = "camelCase")]
    PreselectionNotice {
        /// The pre-selected user.
        recipient: Recipient,
        /// Hackathon the user was pre-selected for.
        hackathon_name: String,
    },
}

impl EmailJob {
    /// Builds the acknowledgement for a new inscription.
    #[must_use]
    pub fn receipt(inscription: &Inscription, hackathon_name: &str) -> Self {
        Self::InscriptionReceipt {
            recipient: Recipient::from(&inscription.user),
            hackathon_name: hackathon_name.to_owned(),
            cohort: inscription.cohort.clone(),
            technologies: inscription.technologies.clone(),
        }
    }

    /// Job type name.
    #[must_use]
    pub const fn kind(&self) -> EmailJobKind {
        match self {
            Self::InscriptionReceipt { .. } => EmailJobKind::AccusReception,
            Self::AnnouncementToRegistrants { .. } => EmailJobKind::AnnonceInscrits,
            Self::PreselectionNotice { .. } => EmailJobKind::Preselection,
        }
    }

    /// Who the email goes to.
    #[must_use]
    pub const fn recipient(&self) -> &Recipient {
        match self {
            Self::InscriptionReceipt { recipient, .. }
            | Self::AnnouncementToRegistrants { recipient, .. }
            | Self::PreselectionNotice { recipient, .. } => recipient,
        }
    }
}
