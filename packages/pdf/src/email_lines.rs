//! One-email-per-line extraction.
//!
//! Used when the document has no recognizable table: every line holding
//! exactly one email becomes a participant. The words before the email are
//! read as the name; the words after it only when nothing precedes it, since
//! trailing columns usually hold the class and status.

use std::collections::BTreeSet;

use hackathon_registration_models::ExtractedParticipant;

use crate::email::{EmailToken, find_emails};
use crate::names::{NameParts, name_tokens, split_residual};
use crate::{Document, ExtractionDiagnostics, ExtractionTier, RejectReason};

/// Minimum line length, in characters, worth looking at.
const MIN_LINE_CHARS: usize = 3;

/// Lowercase phrases marking list titles and footers.
const BOILERPLATE_PHRASES: &[&str] = &["liste des inscrits", "total:"];

/// Returns `true` for title, footer and header lines.
fn is_boilerplate(line: &str) -> bool {
    if line.chars().count() < MIN_LINE_CHARS {
        return true;
    }

    let lower = line.to_lowercase();
    BOILERPLATE_PHRASES.iter().any(|p| lower.contains(p))
        || (lower.contains("n°") && lower.contains("nom"))
}

pub(crate) fn extract(
    document: &Document<'_>,
    diagnostics: &mut ExtractionDiagnostics,
) -> Vec<ExtractedParticipant> {
    let mut participants = Vec::new();

    for &(line_number, line) in &document.lines {
        if is_boilerplate(line) {
            continue;
        }

        let tokens = find_emails(line);
        let distinct = distinct_count(&tokens);

        if distinct > 1 {
            diagnostics.reject(
                ExtractionTier::EmailPerLine,
                line_number,
                line,
                RejectReason::AmbiguousEmails { count: distinct },
            );
            continue;
        }

        let Some(token) = tokens.first() else {
            continue;
        };

        let names = residual_names(line, &tokens, token);

        let mut participant = ExtractedParticipant::new(token.email.clone());
        participant.first_name = names.first_name;
        participant.name = names.last_name;

        log::debug!(
            "Line {line_number}: {} ({} {})",
            participant.email,
            participant.first_name.as_deref().unwrap_or("?"),
            participant.name.as_deref().unwrap_or("?"),
        );
        participants.push(participant);
    }

    participants
}

fn residual_names(line: &str, tokens: &[EmailToken<'_>], first: &EmailToken<'_>) -> NameParts {
    let (before, after) = line.split_once(first.raw).unwrap_or((line, ""));
    if !name_tokens(before).is_empty() {
        return split_residual(before);
    }

    let after = tokens
        .iter()
        .fold(after.to_owned(), |acc, t| acc.replace(t.raw, " "));
    split_residual(&after)
}

fn distinct_count(tokens: &[EmailToken<'_>]) -> usize {
    tokens
        .iter()
        .map(|token| token.email.to_ascii_lowercase())
        .collect::<BTreeSet<_>>()
        .len()
}
