//! # Process States
//!
//! The closed set of states a process line moves through during a release.
//!
//! ## Main path
//!
//! ```text
//! START ─▶ T-45 letter ─▶ connection testing ─▶ T-15 ─▶ T-5 ─▶ T-1 ─▶ GOLIVE ─▶ RELEASE_COMPLETE
//! ```
//!
//! Each letter stage is `*_LETTER_SENT → *_LETTER_ACKNOWLEDGED →
//! *_STAGE_COMPLETE`. Postponement parks a process in `MIGRATION_POSTPONED`
//! until `CONNECTION_RETEST_DUE` sends it back into the connection stage.
//!
//! Terminal states: `RELEASE_COMPLETE` (retained) and `EJECTED` (removed by
//! the purge in the same engine call that produced it).
//!
//! Equality, ordering and hashing are by discriminant only; the metadata
//! accessors are derived from the variant, so two values of the same state
//! can never disagree about their classification.

use serde::{Deserialize, Serialize};

use cutover_core::CutoverError;

/// A state in the release workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Initial state of every seeded process.
    Start,
    MigrationT45LetterSent,
    MigrationT45LetterAcknowledged,
    MigrationT45StageComplete,

    ConnectionInfoRequested,
    ConnectionInfoReceived,
    ConnectionTestDateProposed,
    ConnectionTestDateConfirmed,
    ConnectionTestOk,
    ConnectionStageComplete,

    MigrationT15LetterSent,
    MigrationT15LetterAcknowledged,
    MigrationT15StageComplete,
    MigrationT5LetterSent,
    MigrationT5LetterAcknowledged,
    MigrationT5StageComplete,
    MigrationT1LetterSent,
    MigrationT1LetterAcknowledged,
    MigrationT1StageComplete,
    /// Migration done; go-live letter and release finalization follow.
    Golive,
    GoliveLetterSent,
    /// Successful terminal state.
    ReleaseComplete,

    /// Failure terminal state. Never survives an engine call.
    Ejected,
    ConnectionTestFailed,
    MigrationPostponed,
    ConnectionRetestDue,
}

impl ProcessState {
    /// Every state, in declaration order.
    pub const ALL: [ProcessState; 26] = [
        Self::Start,
        Self::MigrationT45LetterSent,
        Self::MigrationT45LetterAcknowledged,
        Self::MigrationT45StageComplete,
        Self::ConnectionInfoRequested,
        Self::ConnectionInfoReceived,
        Self::ConnectionTestDateProposed,
        Self::ConnectionTestDateConfirmed,
        Self::ConnectionTestOk,
        Self::ConnectionStageComplete,
        Self::MigrationT15LetterSent,
        Self::MigrationT15LetterAcknowledged,
        Self::MigrationT15StageComplete,
        Self::MigrationT5LetterSent,
        Self::MigrationT5LetterAcknowledged,
        Self::MigrationT5StageComplete,
        Self::MigrationT1LetterSent,
        Self::MigrationT1LetterAcknowledged,
        Self::MigrationT1StageComplete,
        Self::Golive,
        Self::GoliveLetterSent,
        Self::ReleaseComplete,
        Self::Ejected,
        Self::ConnectionTestFailed,
        Self::MigrationPostponed,
        Self::ConnectionRetestDue,
    ];

    /// The state every process is seeded in.
    pub const INITIAL: ProcessState = Self::Start;

    /// Canonical name, identical to the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::MigrationT45LetterSent => "MIGRATION_T45_LETTER_SENT",
            Self::MigrationT45LetterAcknowledged => "MIGRATION_T45_LETTER_ACKNOWLEDGED",
            Self::MigrationT45StageComplete => "MIGRATION_T45_STAGE_COMPLETE",
            Self::ConnectionInfoRequested => "CONNECTION_INFO_REQUESTED",
            Self::ConnectionInfoReceived => "CONNECTION_INFO_RECEIVED",
            Self::ConnectionTestDateProposed => "CONNECTION_TEST_DATE_PROPOSED",
            Self::ConnectionTestDateConfirmed => "CONNECTION_TEST_DATE_CONFIRMED",
            Self::ConnectionTestOk => "CONNECTION_TEST_OK",
            Self::ConnectionStageComplete => "CONNECTION_STAGE_COMPLETE",
            Self::MigrationT15LetterSent => "MIGRATION_T15_LETTER_SENT",
            Self::MigrationT15LetterAcknowledged => "MIGRATION_T15_LETTER_ACKNOWLEDGED",
            Self::MigrationT15StageComplete => "MIGRATION_T15_STAGE_COMPLETE",
            Self::MigrationT5LetterSent => "MIGRATION_T5_LETTER_SENT",
            Self::MigrationT5LetterAcknowledged => "MIGRATION_T5_LETTER_ACKNOWLEDGED",
            Self::MigrationT5StageComplete => "MIGRATION_T5_STAGE_COMPLETE",
            Self::MigrationT1LetterSent => "MIGRATION_T1_LETTER_SENT",
            Self::MigrationT1LetterAcknowledged => "MIGRATION_T1_LETTER_ACKNOWLEDGED",
            Self::MigrationT1StageComplete => "MIGRATION_T1_STAGE_COMPLETE",
            Self::Golive => "GOLIVE",
            Self::GoliveLetterSent => "GOLIVE_LETTER_SENT",
            Self::ReleaseComplete => "RELEASE_COMPLETE",
            Self::Ejected => "EJECTED",
            Self::ConnectionTestFailed => "CONNECTION_TEST_FAILED",
            Self::MigrationPostponed => "MIGRATION_POSTPONED",
            Self::ConnectionRetestDue => "CONNECTION_RETEST_DUE",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::MigrationT45LetterSent => "Migration T-45 letter sent",
            Self::MigrationT45LetterAcknowledged => "Migration T-45 letter acknowledged",
            Self::MigrationT45StageComplete => "Migration T-45 stage complete",
            Self::ConnectionInfoRequested => "Connection info requested",
            Self::ConnectionInfoReceived => "Connection info received",
            Self::ConnectionTestDateProposed => "Connection test date proposed",
            Self::ConnectionTestDateConfirmed => "Connection test date confirmed",
            Self::ConnectionTestOk => "Connection test ok",
            Self::ConnectionStageComplete => "Connection stage complete",
            Self::MigrationT15LetterSent => "Migration T-15 letter sent",
            Self::MigrationT15LetterAcknowledged => "Migration T-15 letter acknowledged",
            Self::MigrationT15StageComplete => "Migration T-15 stage complete",
            Self::MigrationT5LetterSent => "Migration T-5 letter sent",
            Self::MigrationT5LetterAcknowledged => "Migration T-5 letter acknowledged",
            Self::MigrationT5StageComplete => "Migration T-5 stage complete",
            Self::MigrationT1LetterSent => "Migration T-1 letter sent",
            Self::MigrationT1LetterAcknowledged => "Migration T-1 letter acknowledged",
            Self::MigrationT1StageComplete => "Migration T-1 stage complete",
            Self::Golive => "Migration done",
            Self::GoliveLetterSent => "Golive letter sent",
            Self::ReleaseComplete => "Release complete",
            Self::Ejected => "Ejected",
            Self::ConnectionTestFailed => "Connection test failed",
            Self::MigrationPostponed => "Migration postponed",
            Self::ConnectionRetestDue => "Connection retest due",
        }
    }

    /// Whether the process is waiting on the partner to answer a letter or
    /// request.
    pub fn awaiting_reply(self) -> bool {
        matches!(
            self,
            Self::MigrationT45LetterSent
                | Self::ConnectionInfoRequested
                | Self::ConnectionTestDateProposed
                | Self::MigrationT15LetterSent
                | Self::MigrationT5LetterSent
                | Self::MigrationT1LetterSent
                | Self::GoliveLetterSent
        )
    }

    /// Whether the state lies on the happy path.
    ///
    /// `MIGRATION_POSTPONED` is both on the main path and an error state.
    pub fn along_main_path(self) -> bool {
        !matches!(
            self,
            Self::GoliveLetterSent
                | Self::Ejected
                | Self::ConnectionTestFailed
                | Self::ConnectionRetestDue
        )
    }

    /// Whether the state represents a failure or deviation.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::Ejected
                | Self::ConnectionTestFailed
                | Self::MigrationPostponed
                | Self::ConnectionRetestDue
        )
    }

    /// Whether no transition leaves this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ReleaseComplete | Self::Ejected)
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ProcessState {
    type Err = CutoverError;

    /// Resolve a canonical name (`connection-test-ok`, `CONNECTION_TEST_OK`)
    /// or a label (`Connection test ok`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = crate::normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|state| state.name() == wanted || state.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CutoverError::UnknownName {
                kind: "state",
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_26_distinct_states() {
        let names: HashSet<_> = ProcessState::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), 26);
    }

    #[test]
    fn retest_due_is_distinct_from_test_failed() {
        assert_ne!(
            ProcessState::ConnectionRetestDue,
            ProcessState::ConnectionTestFailed
        );
        assert_ne!(
            ProcessState::ConnectionRetestDue.name(),
            ProcessState::ConnectionTestFailed.name()
        );
    }

    #[test]
    fn serde_matches_canonical_name() {
        for state in ProcessState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.name()));
            let parsed: ProcessState = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, state);
        }
    }

    #[test]
    fn terminal_states() {
        let terminal: Vec<_> = ProcessState::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![ProcessState::ReleaseComplete, ProcessState::Ejected]
        );
    }

    #[test]
    fn classifiers_match_catalog() {
        assert!(ProcessState::MigrationT45LetterSent.awaiting_reply());
        assert!(ProcessState::GoliveLetterSent.awaiting_reply());
        assert!(!ProcessState::GoliveLetterSent.along_main_path());
        assert!(!ProcessState::Start.awaiting_reply());

        assert!(ProcessState::Ejected.is_error());
        assert!(!ProcessState::Ejected.along_main_path());

        assert!(ProcessState::MigrationPostponed.is_error());
        assert!(ProcessState::MigrationPostponed.along_main_path());

        assert!(ProcessState::ReleaseComplete.along_main_path());
        assert!(!ProcessState::ReleaseComplete.is_error());
    }

    #[test]
    fn golive_label_differs_from_name() {
        assert_eq!(ProcessState::Golive.label(), "Migration done");
        assert_eq!(ProcessState::Golive.to_string(), "Migration done");
    }

    #[test]
    fn parse_by_name_kebab_and_label() {
        assert_eq!(
            "CONNECTION_TEST_OK".parse::<ProcessState>().unwrap(),
            ProcessState::ConnectionTestOk
        );
        assert_eq!(
            "migration-t45-letter-sent".parse::<ProcessState>().unwrap(),
            ProcessState::MigrationT45LetterSent
        );
        assert_eq!(
            "Connection retest due".parse::<ProcessState>().unwrap(),
            ProcessState::ConnectionRetestDue
        );
    }

    #[test]
    fn parse_unknown_fails() {
        assert!(matches!(
            "OPERATIONAL".parse::<ProcessState>(),
            Err(CutoverError::UnknownName { kind: "state", .. })
        ));
    }
}
