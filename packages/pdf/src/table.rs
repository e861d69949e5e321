//! Pipe-delimited table extraction.
//!
//! Handles the machine-generated layout written by
//! [`crate::inscription_list`]:
//!
//! ```text
//! N° | Nom | Prénom | Email | Classe | Statut
//! 1 | DUPONT | Jean | jean@test.fr | LIC1 A | VALIDE
//! ```
//!
//! Rows are only read after a header line; a header repeated on a later
//! page simply keeps the data section open.

use std::sync::LazyLock;

use hackathon_registration_models::{ExtractedParticipant, is_plausible_email};
use regex::Regex;

use crate::{Document, ExtractionDiagnostics, ExtractionTier, RejectReason};

/// A data row starts with the row number followed by the first delimiter.
static DATA_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*\|").expect("valid regex"));

/// Column delimiter.
pub const DELIMITER: char = '|';

/// Index, last name, first name, email, class, status.
pub const MIN_COLUMNS: usize = 6;

const LAST_NAME_COLUMN: usize = 1;
const FIRST_NAME_COLUMN: usize = 2;
const EMAIL_COLUMN: usize = 3;
const CLASS_COLUMN: usize = 4;

/// Placeholder the list renderer writes for missing values.
const EMPTY_CELL: &str = "-";

/// Returns `true` for the table header line (`N° | Nom | ...`).
#[must_use]
pub fn is_header(line: &str) -> bool {
    line.contains(DELIMITER) && line.to_lowercase().contains("n°")
}

pub(crate) fn extract(
    document: &Document<'_>,
    diagnostics: &mut ExtractionDiagnostics,
) -> Vec<ExtractedParticipant> {
    let mut participants = Vec::new();
    let mut in_data_section = false;

    for &(line_number, line) in &document.lines {
        if is_header(line) {
            if !in_data_section {
                log::debug!("Table header found on line {line_number}");
            }
            in_data_section = true;
            continue;
        }

        if !in_data_section || !DATA_ROW_RE.is_match(line) {
            continue;
        }

        let columns: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
        if columns.len() < MIN_COLUMNS {
            diagnostics.reject(
                ExtractionTier::DelimitedTable,
                line_number,
                line,
                RejectReason::TooFewColumns {
                    found: columns.len(),
                },
            );
            continue;
        }

        let email = columns[EMAIL_COLUMN];
        if !is_plausible_email(email) {
            diagnostics.reject(
                ExtractionTier::DelimitedTable,
                line_number,
                line,
                RejectReason::InvalidEmail {
                    value: email.to_owned(),
                },
            );
            continue;
        }

        participants.push(
            ExtractedParticipant::new(email)
                .with_name(cell(columns[LAST_NAME_COLUMN]))
                .with_first_name(cell(columns[FIRST_NAME_COLUMN]))
                .with_cohort_label(cell(columns[CLASS_COLUMN])),
        );
    }

    participants
}

fn cell(value: &str) -> &str {
    if value == EMPTY_CELL { "" } else { value }
}
