//! Email detection and cleanup for PDF text.
//!
//! PDF-to-text conversion often glues the next table cell onto an email,
//! producing tokens such as `jean@test.frLRT` or `ana@univ.comLIC1`. Emails
//! are first captured with a permissive pattern, then the noise glued to
//! the top-level domain is cut off by [`clean_email`].

use std::sync::LazyLock;

use hackathon_registration_models::is_plausible_email;
use regex::Regex;

/// Permissive email pattern: anything email-shaped, including trailing
/// alphanumeric noise after the top-level domain.
static PERMISSIVE_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}[A-Za-z0-9]*").expect("valid regex")
});

/// Top-level domains recognized underneath glued noise.
pub const KNOWN_TLDS: &[&str] = &[
    "com", "fr", "org", "net", "edu", "gov", "mil", "biz", "info",
];

/// An email found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailToken<'a> {
    /// The text the permissive pattern matched, noise included.
    pub raw: &'a str,
    /// The cleaned address.
    pub email: String,
}

/// Finds every email in `text`, in order of appearance.
///
/// Candidates that are no longer plausible after cleanup are dropped.
#[must_use]
pub fn find_emails(text: &str) -> Vec<EmailToken<'_>> {
    PERMISSIVE_EMAIL_RE
        .find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str();
            let cleaned = clean_email(raw);
            if cleaned.is_none() {
                log::debug!("Discarding email candidate {raw:?}");
            }
            cleaned.map(|email| EmailToken { raw, email })
        })
        .collect()
}

/// Removes noise glued to the top-level domain of an email candidate.
///
/// Returns `None` when the result is not a plausible address.
#[must_use]
pub fn clean_email(candidate: &str) -> Option<String> {
    let (local, domain) = candidate.trim().split_once('@')?;
    let dot = domain.rfind('.')?;
    let host = &domain[..dot];
    let tld = trim_tld_noise(&domain[dot + 1..]);

    if tld.len() < 2 {
        return None;
    }

    let email = format!("{local}@{host}.{tld}");
    is_plausible_email(&email).then_some(email)
}

/// Cuts glued noise off a top-level domain.
///
/// * a known TLD is returned unchanged
/// * a known TLD followed by an uppercase letter or digit is cut back to
///   the known TLD (`frLRT` -> `fr`)
/// * any other lowercase head followed by an uppercase letter or digit
///   keeps the head (`ciLIC1` -> `ci`)
fn trim_tld_noise(tld: &str) -> &str {
    if KNOWN_TLDS.iter().any(|known| tld.eq_ignore_ascii_case(known)) {
        return tld;
    }

    for known in KNOWN_TLDS {
        if let Some(head) = tld.get(..known.len())
            && head.eq_ignore_ascii_case(known)
            && tld[known.len()..].starts_with(is_noise_start)
        {
            return head;
        }
    }

    let head_len = tld
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(tld.len());
    if head_len >= 2 && tld[head_len..].starts_with(is_noise_start) {
        &tld[..head_len]
    } else {
        tld
    }
}

const fn is_noise_start(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit()
}

/// Replaces every email-shaped token in `text` with a space.
#[must_use]
pub fn strip_emails(text: &str) -> String {
    PERMISSIVE_EMAIL_RE.replace_all(text, " ").into_owned()
}
