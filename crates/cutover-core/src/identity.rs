//! # Identity Newtypes
//!
//! Partners and processes are addressed by the ids they were seeded with
//! (e.g. `ASIM`, `ASIM_1`), so both are string newtypes rather than UUIDs.
//! Each execution of a workflow action gets a random [`ExecutionId`] used to
//! correlate its log events and report.
//!
//! ## Validation
//!
//! String identifiers are trimmed and must be non-empty. The check runs at
//! construction and again on deserialization, so a roster file cannot
//! smuggle in a blank id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CutoverError;

/// Generates a validated string identifier newtype.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`CutoverError::InvalidIdentifier`] if the value is
            /// empty or whitespace-only.
            pub fn new(value: impl Into<String>) -> Result<Self, CutoverError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(CutoverError::InvalidIdentifier { kind: $kind });
                }
                Ok(Self(trimmed))
            }

            /// Access the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = CutoverError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_id!(
    /// Identifier of a partner (external counterparty) within a release.
    PartnerId,
    "partner"
);

string_id!(
    /// Identifier of a process line. Unique across the whole release, not
    /// only within its partner.
    ProcessId,
    "process"
);

/// Unique identifier for one `execute_action` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    /// Generate a new random execution identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "execution:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn partner_id_valid() {
        let id = PartnerId::new("ASIM").unwrap();
        assert_eq!(id.as_str(), "ASIM");
        assert_eq!(id.to_string(), "ASIM");
    }

    #[test]
    fn partner_id_is_trimmed() {
        let id = PartnerId::new("  HASSAN \n").unwrap();
        assert_eq!(id.as_str(), "HASSAN");
    }

    #[test]
    fn blank_ids_rejected() {
        assert_eq!(
            PartnerId::new(""),
            Err(CutoverError::InvalidIdentifier { kind: "partner" })
        );
        assert_eq!(
            ProcessId::new("   "),
            Err(CutoverError::InvalidIdentifier { kind: "process" })
        );
    }

    #[test]
    fn process_id_from_str() {
        let id: ProcessId = "AAMIR_2".parse().unwrap();
        assert_eq!(id.as_str(), "AAMIR_2");
    }

    #[test]
    fn deserialize_rejects_blank() {
        let result: Result<ProcessId, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id = PartnerId::new("AHMED").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"AHMED\"");
        let parsed: PartnerId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn execution_ids_are_unique() {
        assert_ne!(ExecutionId::new(), ExecutionId::new());
        assert!(ExecutionId::new().to_string().starts_with("execution:"));
    }

    proptest! {
        #[test]
        fn any_non_blank_id_roundtrips_trimmed(raw in "[ ]{0,3}[A-Z0-9_]{1,12}[ ]{0,3}") {
            let id = ProcessId::new(raw.clone()).unwrap();
            prop_assert_eq!(id.as_str(), raw.trim());
        }
    }
}
