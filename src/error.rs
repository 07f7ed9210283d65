//! Error types for pmfilter.

use thiserror::Error;

/// Error type for filter file operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Fewer bytes available than a field requires
    #[error("truncated input: needed {needed} bytes at offset {offset}")]
    TruncatedInput { offset: u64, needed: usize },

    /// Stored value is not valid UTF-16LE text
    #[error("invalid UTF-16LE text in rule value")]
    InvalidText,

    /// Relation index outside the relation table
    #[error("invalid relation index: {0}")]
    InvalidRelationIndex(u32),

    /// Action index outside the action table
    #[error("invalid action index: {0}")]
    InvalidActionIndex(u8),

    /// Rule with the same column, relation, action and value already exists
    #[error("duplicated rule")]
    DuplicateRule,

    /// Column name not present in the column table
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Relation name not present in the relation table
    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    /// Action name not present in the action table
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error comes from decoding a malformed or short file.
    ///
    /// The store recovers from these by starting with an empty rule set.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::TruncatedInput { .. }
                | Error::InvalidText
                | Error::InvalidRelationIndex(_)
                | Error::InvalidActionIndex(_)
        )
    }
}

/// Result type alias for pmfilter operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_errors() {
        assert!(Error::TruncatedInput { offset: 0, needed: 4 }.is_format_error());
        assert!(Error::InvalidText.is_format_error());
        assert!(Error::InvalidRelationIndex(9).is_format_error());
        assert!(Error::InvalidActionIndex(2).is_format_error());
        assert!(!Error::DuplicateRule.is_format_error());
        assert!(!Error::UnknownColumn("Foo".to_string()).is_format_error());
    }

    #[test]
    fn test_error_display() {
        let err = Error::TruncatedInput { offset: 5, needed: 4 };
        assert_eq!(err.to_string(), "truncated input: needed 4 bytes at offset 5");
        assert_eq!(Error::DuplicateRule.to_string(), "duplicated rule");
        assert_eq!(
            Error::UnknownRelation("near".to_string()).to_string(),
            "unknown relation: near"
        );
    }
}
