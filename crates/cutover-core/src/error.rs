//! # Error Types
//!
//! Errors shared by every crate in the workspace. Domain crates wrap these
//! or define narrower enums next to the code that raises them.

use thiserror::Error;

/// Top-level error type for foundational validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CutoverError {
    /// An identifier was empty or whitespace-only.
    #[error("invalid {kind} identifier: must be non-empty")]
    InvalidIdentifier {
        /// Which identifier namespace rejected the value ("partner", "process").
        kind: &'static str,
    },

    /// A timestamp string could not be parsed or was not UTC.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A catalog name (state or action) did not match any member.
    #[error("unknown {kind} name: {name:?}")]
    UnknownName {
        /// Catalog that was searched ("state", "action").
        kind: &'static str,
        /// The name that failed to resolve.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_identifier_message_names_the_kind() {
        let err = CutoverError::InvalidIdentifier { kind: "partner" };
        assert_eq!(
            err.to_string(),
            "invalid partner identifier: must be non-empty"
        );
    }

    #[test]
    fn unknown_name_message_quotes_input() {
        let err = CutoverError::UnknownName {
            kind: "action",
            name: "LAUNCH".into(),
        };
        assert!(err.to_string().contains("\"LAUNCH\""));
    }
}
