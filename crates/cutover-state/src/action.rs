//! # Workflow Actions
//!
//! The closed set of actions a user (or automation) can apply to a release.
//! Each action carries three pieces of metadata that the engine consults:
//!
//! - **release action**: applies to the whole partner roster and cannot be
//!   scoped down to a subset of partners.
//! - **blocking states**: if any audience process sits in one of these, the
//!   action is rejected outright.
//! - **email audience**: which parties the engine asks the notifier to
//!   contact after the transitions are applied.
//!
//! Which states an action leaves from, and where it lands, is not action
//! metadata; that lives in the workflow definition's transition table.

use serde::{Deserialize, Serialize};

use cutover_core::CutoverError;

use crate::state::ProcessState;

/// Who receives a notification when an action is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailAudience {
    /// Partners that lost at least one process to ejection in this execution.
    EjectedPartners,
    /// Partners that owned at least one process taking a table edge.
    NonEjectedPartners,
    /// The customer running the release. Notified once per execution.
    Customer,
}

impl EmailAudience {
    /// Canonical name, identical to the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            Self::EjectedPartners => "EJECTED_PARTNERS",
            Self::NonEjectedPartners => "NON_EJECTED_PARTNERS",
            Self::Customer => "CUSTOMER",
        }
    }
}

impl std::fmt::Display for EmailAudience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An action in the release workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SendMigrationT45Letter,
    FinalizeMigrationT45Stage,

    RequestConnectionInfo,
    ReceiveConnectionInfo,
    ProposeConnectionTestDate,
    ConfirmConnectionTestDate,
    ConnectionTestOk,
    ConnectionTestFailed,
    FinalizeConnectionStage,

    SendMigrationT15Letter,
    FinalizeMigrationT15Stage,

    SendMigrationT5Letter,
    FinalizeMigrationT5Stage,

    SendMigrationT1Letter,
    FinalizeMigrationT1Stage,

    Golive,
    SendGoliveLetter,
    FinalizeRelease,

    AcknowledgeMigrationLetter,
    PostponeMigration,
    ResumeMigration,
    /// Re-sends the pending letter or request. Maps a waiting state to itself.
    SendReminder,
}

use EmailAudience::{Customer, EjectedPartners, NonEjectedPartners};
use ProcessState as S;

const NOTIFY_PARTNERS_AND_CUSTOMER: &[EmailAudience] = &[NonEjectedPartners, Customer];
const NOTIFY_EJECTED_AND_CUSTOMER: &[EmailAudience] = &[EjectedPartners, Customer];

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 22] = [
        Self::SendMigrationT45Letter,
        Self::FinalizeMigrationT45Stage,
        Self::RequestConnectionInfo,
        Self::ReceiveConnectionInfo,
        Self::ProposeConnectionTestDate,
        Self::ConfirmConnectionTestDate,
        Self::ConnectionTestOk,
        Self::ConnectionTestFailed,
        Self::FinalizeConnectionStage,
        Self::SendMigrationT15Letter,
        Self::FinalizeMigrationT15Stage,
        Self::SendMigrationT5Letter,
        Self::FinalizeMigrationT5Stage,
        Self::SendMigrationT1Letter,
        Self::FinalizeMigrationT1Stage,
        Self::Golive,
        Self::SendGoliveLetter,
        Self::FinalizeRelease,
        Self::AcknowledgeMigrationLetter,
        Self::PostponeMigration,
        Self::ResumeMigration,
        Self::SendReminder,
    ];

    /// Canonical name, identical to the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            Self::SendMigrationT45Letter => "SEND_MIGRATION_T45_LETTER",
            Self::FinalizeMigrationT45Stage => "FINALIZE_MIGRATION_T45_STAGE",
            Self::RequestConnectionInfo => "REQUEST_CONNECTION_INFO",
            Self::ReceiveConnectionInfo => "RECEIVE_CONNECTION_INFO",
            Self::ProposeConnectionTestDate => "PROPOSE_CONNECTION_TEST_DATE",
            Self::ConfirmConnectionTestDate => "CONFIRM_CONNECTION_TEST_DATE",
            Self::ConnectionTestOk => "CONNECTION_TEST_OK",
            Self::ConnectionTestFailed => "CONNECTION_TEST_FAILED",
            Self::FinalizeConnectionStage => "FINALIZE_CONNECTION_STAGE",
            Self::SendMigrationT15Letter => "SEND_MIGRATION_T15_LETTER",
            Self::FinalizeMigrationT15Stage => "FINALIZE_MIGRATION_T15_STAGE",
            Self::SendMigrationT5Letter => "SEND_MIGRATION_T5_LETTER",
            Self::FinalizeMigrationT5Stage => "FINALIZE_MIGRATION_T5_STAGE",
            Self::SendMigrationT1Letter => "SEND_MIGRATION_T1_LETTER",
            Self::FinalizeMigrationT1Stage => "FINALIZE_MIGRATION_T1_STAGE",
            Self::Golive => "GOLIVE",
            Self::SendGoliveLetter => "SEND_GOLIVE_LETTER",
            Self::FinalizeRelease => "FINALIZE_RELEASE",
            Self::AcknowledgeMigrationLetter => "ACKNOWLEDGE_MIGRATION_LETTER",
            Self::PostponeMigration => "POSTPONE_MIGRATION",
            Self::ResumeMigration => "RESUME_MIGRATION",
            Self::SendReminder => "SEND_REMINDER",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::SendMigrationT45Letter => "Send migration T-45 letter",
            Self::FinalizeMigrationT45Stage => "Finalize migration T-45 stage",
            Self::RequestConnectionInfo => "Request connection info",
            Self::ReceiveConnectionInfo => "Receive connection info",
            Self::ProposeConnectionTestDate => "Propose connection test date",
            Self::ConfirmConnectionTestDate => "Confirm connection test date",
            Self::ConnectionTestOk => "Connection test ok",
            Self::ConnectionTestFailed => "Connection test failed",
            Self::FinalizeConnectionStage => "Finalize connection stage",
            Self::SendMigrationT15Letter => "Send migration T-15 letter",
            Self::FinalizeMigrationT15Stage => "Finalize migration T-15 stage",
            Self::SendMigrationT5Letter => "Send migration T-5 letter",
            Self::FinalizeMigrationT5Stage => "Finalize migration T-5 stage",
            Self::SendMigrationT1Letter => "Send migration T-1 letter",
            Self::FinalizeMigrationT1Stage => "Finalize migration T-1 stage",
            Self::Golive => "GoLive",
            Self::SendGoliveLetter => "Send GoLive letter",
            Self::FinalizeRelease => "Finalize release",
            Self::AcknowledgeMigrationLetter => "Acknowledge migration letter",
            Self::PostponeMigration => "Postpone migration",
            Self::ResumeMigration => "Resume migration",
            Self::SendReminder => "Send reminder",
        }
    }

    /// Whether the action always applies to every partner in the release.
    pub fn is_release_action(self) -> bool {
        matches!(
            self,
            Self::SendMigrationT45Letter
                | Self::FinalizeMigrationT45Stage
                | Self::FinalizeConnectionStage
                | Self::SendMigrationT15Letter
                | Self::FinalizeMigrationT15Stage
                | Self::SendMigrationT5Letter
                | Self::FinalizeMigrationT5Stage
                | Self::SendMigrationT1Letter
                | Self::FinalizeMigrationT1Stage
                | Self::Golive
                | Self::SendGoliveLetter
                | Self::FinalizeRelease
                | Self::PostponeMigration
                | Self::ResumeMigration
        )
    }

    /// States that must be absent from the audience for the action to run.
    ///
    /// Each later stage blocks on every earlier stage-complete state, so a
    /// process left behind in an earlier stage stops the release from moving
    /// on without it.
    pub fn block_for_states(self) -> &'static [ProcessState] {
        match self {
            Self::FinalizeConnectionStage | Self::SendMigrationT15Letter => {
                &[S::MigrationT45StageComplete]
            }
            Self::FinalizeMigrationT15Stage | Self::SendMigrationT5Letter => {
                &[S::MigrationT45StageComplete, S::ConnectionStageComplete]
            }
            Self::FinalizeMigrationT5Stage | Self::SendMigrationT1Letter => &[
                S::MigrationT45StageComplete,
                S::ConnectionStageComplete,
                S::MigrationT15StageComplete,
            ],
            Self::FinalizeMigrationT1Stage | Self::Golive => &[
                S::MigrationT45StageComplete,
                S::ConnectionStageComplete,
                S::MigrationT15StageComplete,
                S::MigrationT5StageComplete,
            ],
            Self::FinalizeRelease => &[
                S::MigrationT45StageComplete,
                S::ConnectionStageComplete,
                S::MigrationT15StageComplete,
                S::MigrationT5StageComplete,
                S::MigrationT1StageComplete,
            ],
            _ => &[],
        }
    }

    /// Parties the engine notifies after applying this action.
    pub fn email_audience(self) -> &'static [EmailAudience] {
        match self {
            Self::SendMigrationT45Letter
            | Self::SendMigrationT15Letter
            | Self::SendMigrationT5Letter
            | Self::SendMigrationT1Letter
            | Self::Golive
            | Self::FinalizeRelease
            | Self::PostponeMigration
            | Self::ResumeMigration => NOTIFY_PARTNERS_AND_CUSTOMER,
            Self::FinalizeMigrationT45Stage
            | Self::FinalizeConnectionStage
            | Self::FinalizeMigrationT15Stage
            | Self::FinalizeMigrationT5Stage
            | Self::FinalizeMigrationT1Stage => NOTIFY_EJECTED_AND_CUSTOMER,
            Self::RequestConnectionInfo
            | Self::ProposeConnectionTestDate
            | Self::SendGoliveLetter => &[NonEjectedPartners],
            Self::ReceiveConnectionInfo
            | Self::ConfirmConnectionTestDate
            | Self::ConnectionTestOk
            | Self::ConnectionTestFailed
            | Self::AcknowledgeMigrationLetter
            | Self::SendReminder => &[],
        }
    }

    /// Whether `audience` is among the parties notified by this action.
    pub fn notifies(self, audience: EmailAudience) -> bool {
        self.email_audience().contains(&audience)
    }

    /// Message template used when notifying `audience` about this action.
    pub fn template(self, audience: EmailAudience) -> &'static str {
        match audience {
            EjectedPartners => "release-ejection",
            Customer => match self {
                Self::SendMigrationT45Letter => "migration-t45-letter",
                Self::SendMigrationT15Letter => "migration-t15-letter",
                Self::SendMigrationT5Letter => "migration-t5-letter",
                Self::SendMigrationT1Letter => "migration-t1-letter",
                Self::Golive => "golive",
                Self::PostponeMigration => "migration-postponed",
                Self::ResumeMigration => "migration-resumed",
                _ => "release-report",
            },
            NonEjectedPartners => match self {
                Self::SendMigrationT45Letter => "migration-t45-letter",
                Self::SendMigrationT15Letter => "migration-t15-letter",
                Self::SendMigrationT5Letter => "migration-t5-letter",
                Self::SendMigrationT1Letter => "migration-t1-letter",
                Self::RequestConnectionInfo => "connection-info-request",
                Self::ProposeConnectionTestDate => "connection-test-date-proposal",
                Self::Golive => "golive",
                Self::SendGoliveLetter => "golive-letter",
                Self::FinalizeRelease => "release-ok",
                Self::PostponeMigration => "migration-postponed",
                Self::ResumeMigration => "migration-resumed",
                Self::SendReminder => "reminder",
                _ => "partner-update",
            },
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.label())
    }
}

impl std::str::FromStr for Action {
    type Err = CutoverError;

    /// Resolve a canonical name or a label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = crate::normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|action| {
                action.name() == wanted || action.label().eq_ignore_ascii_case(s.trim())
            })
            .ok_or_else(|| CutoverError::UnknownName {
                kind: "action",
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_22_distinct_actions() {
        let names: HashSet<_> = Action::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names.len(), 22);
        let labels: HashSet<_> = Action::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(labels.len(), 22);
    }

    #[test]
    fn serde_matches_canonical_name() {
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.name()));
        }
        for audience in [EjectedPartners, NonEjectedPartners, Customer] {
            let json = serde_json::to_string(&audience).unwrap();
            assert_eq!(json, format!("\"{}\"", audience.name()));
        }
    }

    #[test]
    fn release_actions() {
        let release: Vec<_> = Action::ALL
            .into_iter()
            .filter(|a| a.is_release_action())
            .collect();
        assert_eq!(release.len(), 14);
        assert!(!Action::AcknowledgeMigrationLetter.is_release_action());
        assert!(!Action::SendReminder.is_release_action());
        assert!(!Action::RequestConnectionInfo.is_release_action());
        assert!(Action::SendGoliveLetter.is_release_action());
    }

    #[test]
    fn block_lists_grow_stage_by_stage() {
        assert!(Action::SendMigrationT45Letter.block_for_states().is_empty());
        assert_eq!(Action::SendMigrationT15Letter.block_for_states().len(), 1);
        assert_eq!(Action::FinalizeMigrationT15Stage.block_for_states().len(), 2);
        assert_eq!(Action::SendMigrationT1Letter.block_for_states().len(), 3);
        assert_eq!(Action::Golive.block_for_states().len(), 4);
        assert_eq!(Action::FinalizeRelease.block_for_states().len(), 5);
        assert!(Action::FinalizeRelease
            .block_for_states()
            .contains(&ProcessState::MigrationT1StageComplete));
    }

    #[test]
    fn only_release_actions_block() {
        for action in Action::ALL {
            if !action.block_for_states().is_empty() {
                assert!(action.is_release_action(), "{action} blocks but is scoped");
            }
        }
    }

    #[test]
    fn email_audience_flags() {
        assert!(Action::SendMigrationT45Letter.notifies(NonEjectedPartners));
        assert!(Action::SendMigrationT45Letter.notifies(Customer));
        assert!(!Action::SendMigrationT45Letter.notifies(EjectedPartners));

        assert!(Action::FinalizeMigrationT45Stage.notifies(EjectedPartners));
        assert!(!Action::FinalizeMigrationT45Stage.notifies(NonEjectedPartners));

        assert!(Action::SendGoliveLetter.notifies(NonEjectedPartners));
        assert!(!Action::SendGoliveLetter.notifies(Customer));

        assert!(Action::SendReminder.email_audience().is_empty());
        assert!(Action::AcknowledgeMigrationLetter.email_audience().is_empty());
    }

    #[test]
    fn templates() {
        assert_eq!(
            Action::SendMigrationT45Letter.template(NonEjectedPartners),
            "migration-t45-letter"
        );
        assert_eq!(
            Action::FinalizeConnectionStage.template(EjectedPartners),
            "release-ejection"
        );
        assert_eq!(
            Action::FinalizeConnectionStage.template(Customer),
            "release-report"
        );
        assert_eq!(Action::FinalizeRelease.template(NonEjectedPartners), "release-ok");
    }

    #[test]
    fn display_brackets_label() {
        assert_eq!(Action::Golive.to_string(), "[GoLive]");
    }

    #[test]
    fn parse_by_name_and_label() {
        assert_eq!(
            "send-migration-t45-letter".parse::<Action>().unwrap(),
            Action::SendMigrationT45Letter
        );
        assert_eq!(
            "Finalize migration T-45 stage".parse::<Action>().unwrap(),
            Action::FinalizeMigrationT45Stage
        );
        assert_eq!("golive".parse::<Action>().unwrap(), Action::Golive);
        assert!("launch".parse::<Action>().is_err());
    }
}
