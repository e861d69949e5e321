//! Reading rosters and inscription exports from disk.

use std::io::Read;
use std::path::Path;

use hackathon_registration_models::{Inscription, RosterEntry};
use serde::Deserialize;

/// Errors reading CLI input files.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A roster CSV row could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An inscriptions export is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One roster CSV row. English and French column names are accepted.
#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(default)]
    id: String,
    email: String,
    #[serde(alias = "nom", alias = "lastName")]
    last_name: String,
    #[serde(alias = "prenom", alias = "prénom", alias = "firstName")]
    first_name: String,
}

/// Parses a roster CSV with an `email, last_name, first_name` header
/// (and optionally `id`). Rows without an id use their email as id.
///
/// # Errors
///
/// Returns [`InputError::Csv`] if a row is malformed.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterEntry>, InputError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut roster = Vec::new();
    for row in csv_reader.deserialize() {
        let row: RosterRow = row?;
        roster.push(RosterEntry {
            id: if row.id.is_empty() { row.email.clone() } else { row.id },
            email: row.email,
            last_name: row.last_name,
            first_name: row.first_name,
        });
    }

    log::debug!("Read {} roster entries", roster.len());
    Ok(roster)
}

/// Reads a roster CSV file.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read or parsed.
pub fn read_roster(path: &Path) -> Result<Vec<RosterEntry>, InputError> {
    parse_roster(std::fs::File::open(path)?)
}

/// Reads a JSON array of inscriptions.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read or parsed.
pub fn read_inscriptions(path: &Path) -> Result<Vec<Inscription>, InputError> {
    let text = std::fs::read_to_string(path)?;
    let inscriptions: Vec<Inscription> = serde_json::from_str(&text)?;
    log::debug!("Read {} inscriptions from {}", inscriptions.len(), path.display());
    Ok(inscriptions)
}
