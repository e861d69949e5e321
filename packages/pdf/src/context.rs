//! Last-resort extraction from the context around each email.
//!
//! Every distinct email in the text becomes a participant. The line where
//! it first appears, plus two lines on either side, is searched for a
//! name, a class code and a phone number.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use hackathon_registration_models::{CohortYear, ExtractedParticipant};
use regex::Regex;

use crate::Document;
use crate::email::{EmailToken, find_emails, strip_emails};

/// Class code with its group letter (`"LIC1 A"`); sets label and year.
static CLASS_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(LIC1|LIC2)\s+[A-Z]").expect("valid regex"));

/// Any cohort token; only sets the year.
static LOOSE_COHORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(LIC1|LIC2|L1|L2|LRT\s*2|LRT)\s*[A-Z]?\b").expect("valid regex")
});

/// Loose phone number: optional country code, then digit groups
/// separated by spaces or dashes.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{1,4}[\s-]?)?\(?\d{1,4}\)?[\s-]?\d{1,4}[\s-]?\d{1,9}").expect("valid regex")
});

/// Lines searched on each side of the email line.
const CONTEXT_RADIUS: usize = 2;

/// Fewer digits than this is a row number or a year, not a phone.
const MIN_PHONE_DIGITS: usize = 8;

/// Name tokens taken from directly before the email.
const MAX_NAME_TOKENS: usize = 2;

pub(crate) fn extract(document: &Document<'_>) -> Vec<ExtractedParticipant> {
    let raw_lines: Vec<&str> = document.text.lines().collect();
    let mut seen = BTreeSet::new();

    find_emails(document.text)
        .into_iter()
        .filter(|token| seen.insert(token.email.to_ascii_lowercase()))
        .map(|token| participant_from_context(&token, &raw_lines))
        .collect()
}

fn participant_from_context(token: &EmailToken<'_>, lines: &[&str]) -> ExtractedParticipant {
    let mut participant = ExtractedParticipant::new(token.email.clone());

    let Some(index) = lines.iter().position(|line| line.contains(token.raw)) else {
        return participant;
    };

    let current = lines[index].trim();
    let words: Vec<&str> = current.split_whitespace().collect();
    if let Some(email_pos) = words.iter().position(|w| w.contains(token.raw)) {
        let before: Vec<&str> = words[email_pos.saturating_sub(MAX_NAME_TOKENS)..email_pos]
            .iter()
            .copied()
            .filter(|w| w.chars().any(char::is_alphabetic))
            .collect();

        match before.as_slice() {
            [first, last] => {
                participant = participant
                    .with_first_name(first)
                    .with_name(last)
                    .with_full_name(&format!("{first} {last}"));
            }
            [only] => participant = participant.with_full_name(only),
            _ => {}
        }
    }

    let start = index.saturating_sub(CONTEXT_RADIUS);
    let end = (index + CONTEXT_RADIUS).min(lines.len() - 1);
    let context = lines[start..=end]
        .iter()
        .map(|line| strip_emails(line.trim()))
        .filter(|line| !line.trim().is_empty());

    for line in context {
        if participant.cohort_label.is_none() && participant.cohort_year.is_none() {
            if let Some(m) = CLASS_CODE_RE.find(&line) {
                participant = participant.with_cohort_label(m.as_str());
                participant.cohort_year = CohortYear::from_label(m.as_str());
            } else if let Some(m) = LOOSE_COHORT_RE.find(&line) {
                participant.cohort_year = CohortYear::from_label(&m.as_str().replace(' ', ""));
            }
        }

        if participant.phone.is_none()
            && let Some(phone) = find_phone(&line)
        {
            participant = participant.with_phone(phone);
        }
    }

    log::debug!(
        "Context match: {} ({} {}) cohort={:?} phone={:?}",
        participant.email,
        participant.first_name.as_deref().unwrap_or("?"),
        participant.name.as_deref().unwrap_or("?"),
        participant.cohort_year,
        participant.phone,
    );

    participant
}

fn find_phone(line: &str) -> Option<&str> {
    PHONE_RE
        .find_iter(line)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            candidate.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
        })
}
