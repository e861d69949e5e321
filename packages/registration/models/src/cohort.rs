//! Cohort codes and the year they belong to.
//!
//! Class codes printed on registration lists (`"LIC1 A"`, `"LRT B"`,
//! `"L2"`) map onto a study year through a fixed prefix table.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Study year inferred from a class code.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum CohortYear {
    /// First year
    L1,
    /// Second year
    L2,
}

/// Class-code prefixes and their year, checked in order.
///
/// Longer codes come first so `LIC1` is not shadowed by `L1`-style
/// entries.
pub const COHORT_PREFIXES: &[(&str, CohortYear)] = &[
    ("LIC1", CohortYear::L1),
    ("LIC2", CohortYear::L2),
    ("LRT", CohortYear::L1),
    ("L1", CohortYear::L1),
    ("L2", CohortYear::L2),
];

impl CohortYear {
    /// Infers the year from a class code such as `"LIC1 A"`.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` when the code starts with none of
    /// [`COHORT_PREFIXES`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase();
        COHORT_PREFIXES
            .iter()
            .find(|(prefix, _)| label.starts_with(prefix))
            .map(|&(_, year)| year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_prefixes() {
        assert_eq!(CohortYear::from_label("LIC1 A"), Some(CohortYear::L1));
        assert_eq!(CohortYear::from_label("lic2 b"), Some(CohortYear::L2));
        assert_eq!(CohortYear::from_label("LRT 2"), Some(CohortYear::L1));
        assert_eq!(CohortYear::from_label(" L2 "), Some(CohortYear::L2));
        assert_eq!(CohortYear::from_label("L1"), Some(CohortYear::L1));
    }

    #[test]
    fn unknown_codes_have_no_year() {
        assert_eq!(CohortYear::from_label("M1"), None);
        assert_eq!(CohortYear::from_label(""), None);
    }

    #[test]
    fn displays_as_code() {
        assert_eq!(CohortYear::L2.to_string(), "L2");
    }
}
