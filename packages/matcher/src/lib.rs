#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reconciles participants extracted from a PDF against the roster of
//! registered users.
//!
//! Each participant is tried against an ordered list of [`MatchRule`]s and
//! the first rule that finds a roster entry wins. All comparisons ignore
//! case and surrounding whitespace. The result is the list of matched
//! roster emails, in the casing stored on the roster, without duplicates
//! and in the order participants were first matched.

use std::collections::{BTreeMap, BTreeSet};

use hackathon_registration_models::{ExtractedParticipant, RosterEntry};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// One way of recognizing a participant on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchRule {
    /// Same email address.
    Email,
    /// Same family and given name.
    NamePair,
    /// Unsplit full name read as "first last".
    FullName,
}

impl MatchRule {
    /// All rules, in evaluation order.
    pub const ALL: &[Self] = &[Self::Email, Self::NamePair, Self::FullName];
}

/// How one participant was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDecision {
    /// Email of the extracted participant.
    pub participant_email: String,
    /// Rule that matched, or `None` if the participant was dropped.
    pub rule: Option<MatchRule>,
    /// Roster email the participant resolved to.
    pub roster_email: Option<String>,
}

/// Matched roster emails together with the per-participant decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    /// Deduplicated roster emails, in first-match order.
    pub emails: Vec<String>,
    /// One decision per extracted participant, in input order.
    pub decisions: Vec<MatchDecision>,
}

impl MatchOutcome {
    /// Number of participants no rule could match.
    #[must_use]
    pub fn unmatched_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.rule.is_none()).count()
    }
}

/// Roster entry with its comparison keys folded once up front.
#[derive(Debug)]
struct IndexedEntry<'a> {
    entry: &'a RosterEntry,
    last_name: String,
    first_name: String,
}

/// Matches extracted participants against a roster.
#[derive(Debug)]
pub struct ParticipantMatcher<'a> {
    entries: Vec<IndexedEntry<'a>>,
    by_email: BTreeMap<String, usize>,
}

impl<'a> ParticipantMatcher<'a> {
    /// Indexes `roster` for matching. When several entries share an email
    /// or a name, the first one wins.
    #[must_use]
    pub fn new(roster: &'a [RosterEntry]) -> Self {
        let mut by_email = BTreeMap::new();
        let entries = roster
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                by_email.entry(fold(&entry.email)).or_insert(index);
                IndexedEntry {
                    entry,
                    last_name: fold(&entry.last_name),
                    first_name: fold(&entry.first_name),
                }
            })
            .collect();

        Self { entries, by_email }
    }

    /// Returns the roster emails of the matched participants.
    #[must_use]
    pub fn match_participants(&self, participants: &[ExtractedParticipant]) -> Vec<String> {
        self.match_with_decisions(participants).emails
    }

    /// Matches every participant and records which rule fired for each.
    #[must_use]
    pub fn match_with_decisions(&self, participants: &[ExtractedParticipant]) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();
        let mut seen = BTreeSet::new();

        for participant in participants {
            let found = MatchRule::ALL
                .iter()
                .find_map(|&rule| self.apply(rule, participant).map(|entry| (rule, entry)));

            let decision = match found {
                Some((rule, entry)) => {
                    log::debug!(
                        "Matched {} to {} by {rule}",
                        participant.email,
                        entry.email
                    );
                    if seen.insert(fold(&entry.email)) {
                        outcome.emails.push(entry.email.clone());
                    }
                    MatchDecision {
                        participant_email: participant.email.clone(),
                        rule: Some(rule),
                        roster_email: Some(entry.email.clone()),
                    }
                }
                None => {
                    log::debug!("No roster entry for {}", participant.email);
                    MatchDecision {
                        participant_email: participant.email.clone(),
                        rule: None,
                        roster_email: None,
                    }
                }
            };
            outcome.decisions.push(decision);
        }

        log::info!(
            "Matched {} of {} participants to {} roster entries",
            participants.len() - outcome.unmatched_count(),
            participants.len(),
            outcome.emails.len()
        );

        outcome
    }

    fn apply(&self, rule: MatchRule, participant: &ExtractedParticipant) -> Option<&'a RosterEntry> {
        match rule {
            MatchRule::Email => self
                .by_email
                .get(&fold(&participant.email))
                .map(|&index| self.entries[index].entry),
            MatchRule::NamePair => {
                let last_name = participant.name.as_deref()?;
                let first_name = participant.first_name.as_deref()?;
                self.find_by_name(first_name, last_name)
            }
            MatchRule::FullName => {
                let full_name = participant.full_name.as_deref()?;
                let mut tokens = full_name.split_whitespace();
                let first_name = tokens.next()?;
                let last_name = tokens.collect::<Vec<_>>().join(" ");
                if last_name.is_empty() {
                    return None;
                }
                self.find_by_name(first_name, &last_name)
            }
        }
    }

    fn find_by_name(&self, first_name: &str, last_name: &str) -> Option<&'a RosterEntry> {
        let first_name = fold(first_name);
        let last_name = fold(last_name);
        if first_name.is_empty() || last_name.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|e| e.last_name == last_name && e.first_name == first_name)
            .map(|e| e.entry)
    }
}

/// Case- and whitespace-insensitive comparison key.
fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}
