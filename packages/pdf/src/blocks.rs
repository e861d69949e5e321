//! Record-block extraction.
//!
//! Some PDFs lose their table structure entirely during text extraction
//! and come out one cell per line:
//!
//! ```text
//! 1
//! Jean
//! Dupont
//! jean@test.fr
//! LIC1 A
//! 2
//! ...
//! ```
//!
//! A line holding only a positive integer starts a new record. Name-like
//! lines are buffered until the record's email shows up, and a class code
//! anywhere in the record sets its cohort.

use std::sync::LazyLock;

use hackathon_registration_models::{CohortYear, ExtractedParticipant};
use regex::Regex;

use crate::Document;
use crate::email::find_emails;
use crate::names::{name_tokens, split_residual};

/// Class code at the start of a line, optionally followed by a group
/// letter (`"LIC1 A"`, `"lrt b"`, `"L2"`).
static COHORT_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(LIC1|LIC2|LRT|L1|L2)(\s*[A-Z])?\b").expect("valid regex")
});

/// Column titles that sometimes survive as their own line.
const FIELD_LABELS: &[&str] = &["nom", "prénom", "prenom", "email", "classe"];

/// Lowercase words that look like names but never are.
const RESERVED_WORDS: &[&str] = &["valide", "statut", "total", "n°"];

/// Lowercase prefixes of title lines.
const RESERVED_PREFIXES: &[&str] = &["liste", "hackathon"];

const MIN_NAME_CHARS: usize = 3;
const MAX_NAME_CHARS: usize = 29;

/// Returns `true` if `line` is a record separator: a positive integer on
/// its own.
#[must_use]
pub fn is_record_separator(line: &str) -> bool {
    !line.is_empty()
        && line.bytes().all(|b| b.is_ascii_digit())
        && line.bytes().any(|b| b != b'0')
}

/// Returns `true` if `line` could be a given or family name.
#[must_use]
pub fn is_plausible_name(line: &str) -> bool {
    let len = line.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len) {
        return false;
    }
    if line.starts_with(|c: char| c.is_ascii_digit()) || line.contains(['@', '.', ':']) {
        return false;
    }

    let lower = line.to_lowercase();
    !RESERVED_WORDS.contains(&lower.as_str())
        && !RESERVED_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// A class code found at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortCode {
    /// Uppercased code with single spaces (`"LIC1 A"`).
    pub label: String,
    /// Year the code belongs to.
    pub year: Option<CohortYear>,
}

/// Parses a class code at the start of `line`.
#[must_use]
pub fn cohort_code(line: &str) -> Option<CohortCode> {
    let m = COHORT_CODE_RE.find(line)?;
    let label = m
        .as_str()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    let year = CohortYear::from_label(&label);

    Some(CohortCode { label, year })
}

#[derive(Debug, Default)]
struct Block {
    participant: Option<ExtractedParticipant>,
    cohort: Option<CohortCode>,
    pending_names: Vec<String>,
}

impl Block {
    fn take_email_line(&mut self, email: String, residual: &str) {
        let mut participant = ExtractedParticipant::new(email);

        match self.pending_names.as_slice() {
            [.., first, last] => {
                participant = participant.with_first_name(first).with_name(last);
            }
            [pending] => match name_tokens(residual).as_slice() {
                [] => participant = participant.with_name(pending),
                [first] => participant = participant.with_first_name(first).with_name(pending),
                [first, rest @ ..] => {
                    participant = participant
                        .with_first_name(first)
                        .with_name(&rest.join(" "));
                }
            },
            [] => {
                let names = split_residual(residual);
                participant.first_name = names.first_name;
                participant.name = names.last_name;
            }
        }

        self.pending_names.clear();
        self.participant = Some(participant);
    }

    fn finish(self) -> Option<ExtractedParticipant> {
        let mut participant = self.participant?;
        if let Some(cohort) = self.cohort {
            participant = participant.with_cohort_label(&cohort.label);
            participant.cohort_year = cohort.year;
        }
        Some(participant)
    }
}

pub(crate) fn extract(document: &Document<'_>) -> Vec<ExtractedParticipant> {
    let mut participants = Vec::new();
    let mut current: Option<Block> = None;

    for &(line_number, line) in &document.lines {
        if is_record_separator(line) {
            if let Some(participant) = current.take().and_then(Block::finish) {
                participants.push(participant);
            }
            log::trace!("Record {line} starts on line {line_number}");
            current = Some(Block::default());
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        let lower = line.to_lowercase();
        if FIELD_LABELS.contains(&lower.as_str()) {
            continue;
        }

        if line.contains('@') && line.contains('.') {
            if let Some(token) = find_emails(line).into_iter().next() {
                let residual = line.replace(token.raw, " ");
                block.take_email_line(token.email, &residual);
            }
            continue;
        }

        if let Some(code) = cohort_code(line) {
            block.cohort = Some(code);
            continue;
        }

        if is_plausible_name(line) {
            block.pending_names.push(line.to_owned());
        }
    }

    if let Some(participant) = current.and_then(Block::finish) {
        participants.push(participant);
    }

    participants
}
