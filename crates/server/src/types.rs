//! Request and response bodies

use serde::{Deserialize, Serialize};

/// Fields of the name form
///
/// Both fields are optional at the parsing layer; the handler decides
/// whether they are usable.
#[derive(Debug, Default, Deserialize)]
pub struct NameForm {
    /// First name
    pub first: Option<String>,
    /// Last name
    pub last: Option<String>,
}

impl NameForm {
    /// `"<first> <last>"` when both fields are present and non-empty
    pub fn full_name(&self) -> Option<String> {
        match (self.first.as_deref(), self.last.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                Some(format!("{} {}", first, last))
            }
            _ => None,
        }
    }
}

/// Successful response to `POST /name`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameResponse {
    /// The composed full name
    pub name: String,
}

/// Error payload
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(first: Option<&str>, last: Option<&str>) -> NameForm {
        NameForm {
            first: first.map(String::from),
            last: last.map(String::from),
        }
    }

    #[test]
    fn test_full_name_joins_with_one_space() {
        assert_eq!(
            form(Some("Juan"), Some("Perez")).full_name().as_deref(),
            Some("Juan Perez")
        );
    }

    #[test]
    fn test_full_name_keeps_whitespace() {
        assert_eq!(
            form(Some(" Ana "), Some("Gómez")).full_name().as_deref(),
            Some(" Ana  Gómez")
        );
    }

    #[test]
    fn test_missing_or_empty_fields() {
        assert_eq!(form(Some("Juan"), None).full_name(), None);
        assert_eq!(form(None, Some("Perez")).full_name(), None);
        assert_eq!(form(Some(""), Some("Perez")).full_name(), None);
        assert_eq!(form(Some("Juan"), Some("")).full_name(), None);
    }
}
