use std::fmt::{Display, Formatter};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod collection;
mod filter;

pub use collection::Collection;
pub use filter::Filter;

/// Identifier of a record within its collection.
///
/// Ids are derived from the creation timestamp and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    /// Builds the id for a record created at the given millisecond timestamp.
    pub fn from_millis(millis: i64) -> Self {
        RecordId(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId(id)
    }
}

/// Reasons a record cannot be created or edited from user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{0}' must not be empty")]
    MissingField(&'static str),
    #[error("Unknown grade '{0}'")]
    UnknownGrade(String),
    #[error("Unknown major '{0}'")]
    UnknownMajor(String),
    #[error("Unknown status filter '{0}'")]
    UnknownStatus(String),
}

/// A flat entity stored in a [`Collection`].
///
/// `Fields` is the complete input for a new record, `Patch` the partial input
/// merged into an existing one. Both are validated; `id` is never touched by a
/// merge.
pub trait Record: Clone {
    type Fields;
    type Patch;

    fn id(&self) -> &RecordId;

    fn create(id: RecordId, fields: Self::Fields) -> Result<Self, ValidationError>;

    fn merge(&self, patch: Self::Patch) -> Result<Self, ValidationError>;
}

/// Fails with [`ValidationError::MissingField`] if `value` is empty or only whitespace.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_from_millis_is_the_decimal_timestamp() {
        let id = RecordId::from_millis(1_700_000_000_123);

        assert_eq!(id.as_str(), "1700000000123");
    }

    #[test]
    fn require_rejects_whitespace_only_values() {
        assert_eq!(require("name", ""), Err(ValidationError::MissingField("name")));
        assert_eq!(
            require("name", "  \t"),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(require("name", " Ani "), Ok(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_id_serializes_as_plain_string() {
        let id = RecordId::new("42");

        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, "\"42\"");
    }
}
