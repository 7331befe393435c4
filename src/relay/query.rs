//! The user's question.

use crate::relay::error::RelayError;

/// A question that passed validation.
///
/// Holds the caller's text exactly as received; trimming is only used to
/// decide whether the text is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Accept `raw` if it is present and not blank.
    pub fn parse(raw: Option<&str>) -> Result<Self, RelayError> {
        match raw {
            Some(text) if !text.trim().is_empty() => Ok(Self(text.to_owned())),
            _ => Err(RelayError::InvalidQuery),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
