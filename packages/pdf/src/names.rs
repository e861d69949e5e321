//! Splitting free text around an email into name parts.

/// Given and family name recovered from free text.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct NameParts {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Returns the whitespace-separated tokens of `text` that contain at least
/// one letter. Row numbers and separators are not names.
pub(crate) fn name_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphabetic))
        .collect()
}

/// Splits residual text into a given name and a family name.
///
/// Two or more tokens: the first is the given name and the rest, joined
/// with single spaces, the family name. A single token is taken as the
/// family name.
pub(crate) fn split_residual(text: &str) -> NameParts {
    match name_tokens(text).as_slice() {
        [] => NameParts::default(),
        [last] => NameParts {
            first_name: None,
            last_name: Some((*last).to_owned()),
        },
        [first, rest @ ..] => NameParts {
            first_name: Some((*first).to_owned()),
            last_name: Some(rest.join(" ")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_tokens_are_first_then_last() {
        assert_eq!(
            split_residual("Jean Dupont"),
            NameParts {
                first_name: Some("Jean".to_string()),
                last_name: Some("Dupont".to_string()),
            }
        );
    }

    #[test]
    fn compound_family_names_are_joined() {
        let parts = split_residual("  Marie  De La   Tour ");
        assert_eq!(parts.first_name.as_deref(), Some("Marie"));
        assert_eq!(parts.last_name.as_deref(), Some("De La Tour"));
    }

    #[test]
    fn single_token_is_family_name() {
        let parts = split_residual("Dupont");
        assert_eq!(parts.first_name, None);
        assert_eq!(parts.last_name.as_deref(), Some("Dupont"));
    }

    #[test]
    fn numbers_and_separators_are_ignored() {
        assert_eq!(name_tokens("12 | Jean - Dupont"), vec!["Jean", "Dupont"]);
        assert_eq!(split_residual(" 3 | "), NameParts::default());
    }
}
