//! Inscription list layout.
//!
//! Organizers download the list of validated registrants, annotate it and
//! upload the pre-selected subset back as a PDF. The list is written as a
//! pipe-delimited table so that [`crate::table`] can read it back after
//! the round trip through a PDF.

use hackathon_registration_models::{Inscription, InscriptionStatus};

use crate::table::DELIMITER;

/// Column titles, in order.
pub const HEADER: [&str; 6] = ["N°", "Nom", "Prénom", "Email", "Classe", "Statut"];

const NAME_WIDTH: usize = 18;
const CODE_WIDTH: usize = 15;
const MISSING: &str = "-";

/// One registrant on the inscription list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InscriptionListRow {
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Email address.
    pub email: String,
    /// Class code, falling back to the declared cohort.
    pub class_code: Option<String>,
    /// Review status.
    pub status: InscriptionStatus,
}

impl InscriptionListRow {
    /// Builds the rows of the list: validated inscriptions of non-admin
    /// users, oldest first.
    #[must_use]
    pub fn from_inscriptions(inscriptions: &[Inscription]) -> Vec<Self> {
        let mut selected: Vec<&Inscription> = inscriptions
            .iter()
            .filter(|i| i.status == InscriptionStatus::Valide && !i.user.is_admin())
            .collect();
        selected.sort_by_key(|i| i.created_at);

        selected
            .into_iter()
            .map(|i| Self {
                last_name: i.user.last_name.clone(),
                first_name: i.user.first_name.clone(),
                email: i.user.email.clone(),
                class_code: i
                    .class_code()
                    .or(i.cohort.as_deref())
                    .map(str::to_owned),
                status: i.status,
            })
            .collect()
    }
}

/// Renders the inscription list as text.
///
/// The output starts with a title and total, then the [`HEADER`] row and
/// one numbered row per registrant. Names and codes are truncated to the
/// widths of the printed columns; emails are always written in full so they
/// read back unchanged. Missing values are written as `-`.
#[must_use]
pub fn render_inscription_list(hackathon_name: &str, rows: &[InscriptionListRow]) -> String {
    let separator = format!(" {DELIMITER} ");
    let mut lines = Vec::with_capacity(rows.len() + 3);

    lines.push(format!("Liste des inscrits - {hackathon_name}"));
    lines.push(format!("Total: {}", rows.len()));
    lines.push(HEADER.join(separator.as_str()));

    for (index, row) in rows.iter().enumerate() {
        let status = row.status.to_string();
        let cells = [
            (index + 1).to_string(),
            fit(&row.last_name, NAME_WIDTH),
            fit(&row.first_name, NAME_WIDTH),
            cell(&row.email),
            fit(row.class_code.as_deref().unwrap_or_default(), CODE_WIDTH),
            fit(&status, CODE_WIDTH),
        ];
        lines.push(cells.join(separator.as_str()));
    }

    lines.join("\n")
}

fn fit(value: &str, width: usize) -> String {
    let value = value.trim();
    let end = value.char_indices().nth(width).map_or(value.len(), |(i, _)| i);
    cell(&value[..end])
}

fn cell(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return MISSING.to_owned();
    }
    value.replace(DELIMITER, "/")
}
