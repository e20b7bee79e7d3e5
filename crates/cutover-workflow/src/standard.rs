//! # Standard Workflow (version 2)
//!
//! The release workflow as authored: 51 edges over 24 source states, and
//! visibility entries for 22 states. `MIGRATION_T15_STAGE_COMPLETE` and
//! `MIGRATION_T5_STAGE_COMPLETE` have outgoing edges but no visibility
//! entry; that is how the table was written and it is kept as-is.
//!
//! Edges from a waiting state into `EJECTED` are the explicit "finalize
//! this stage without an answer" paths. Everything else that lands in
//! `EJECTED` does so through the engine's fallback, not through this table.

use cutover_state::{Action as A, ProcessState as S};

use crate::definition::WorkflowDefinition;

pub const STANDARD_VERSION: u32 = 2;

const EDGES: &[(S, A, S)] = &[
    (S::Start, A::SendMigrationT45Letter, S::MigrationT45LetterSent),
    // T-45
    (S::MigrationT45LetterSent, A::AcknowledgeMigrationLetter, S::MigrationT45LetterAcknowledged),
    (S::MigrationT45LetterSent, A::SendReminder, S::MigrationT45LetterSent),
    (S::MigrationT45LetterSent, A::FinalizeMigrationT45Stage, S::Ejected),
    (S::MigrationT45LetterAcknowledged, A::FinalizeMigrationT45Stage, S::MigrationT45StageComplete),
    (S::MigrationT45StageComplete, A::RequestConnectionInfo, S::ConnectionInfoRequested),
    // Connection
    (S::ConnectionInfoRequested, A::ReceiveConnectionInfo, S::ConnectionInfoReceived),
    (S::ConnectionInfoRequested, A::SendReminder, S::ConnectionInfoRequested),
    (S::ConnectionInfoRequested, A::FinalizeConnectionStage, S::Ejected),
    (S::ConnectionInfoReceived, A::ProposeConnectionTestDate, S::ConnectionTestDateProposed),
    (S::ConnectionInfoReceived, A::ConnectionTestOk, S::ConnectionTestOk),
    (S::ConnectionInfoReceived, A::FinalizeConnectionStage, S::Ejected),
    (S::ConnectionTestDateProposed, A::ConfirmConnectionTestDate, S::ConnectionTestDateConfirmed),
    (S::ConnectionTestDateProposed, A::SendReminder, S::ConnectionTestDateProposed),
    (S::ConnectionTestDateProposed, A::FinalizeConnectionStage, S::Ejected),
    (S::ConnectionTestDateConfirmed, A::ConnectionTestOk, S::ConnectionTestOk),
    (S::ConnectionTestDateConfirmed, A::ConnectionTestFailed, S::ConnectionTestFailed),
    (S::ConnectionTestDateConfirmed, A::FinalizeConnectionStage, S::Ejected),
    (S::ConnectionTestOk, A::RequestConnectionInfo, S::ConnectionInfoRequested),
    (S::ConnectionTestOk, A::FinalizeConnectionStage, S::ConnectionStageComplete),
    (S::ConnectionTestFailed, A::ConnectionTestOk, S::ConnectionTestOk),
    (S::ConnectionTestFailed, A::ProposeConnectionTestDate, S::ConnectionTestDateProposed),
    (S::ConnectionTestFailed, A::FinalizeConnectionStage, S::Ejected),
    (S::ConnectionStageComplete, A::SendMigrationT15Letter, S::MigrationT15LetterSent),
    // T-15
    (S::MigrationT15LetterSent, A::AcknowledgeMigrationLetter, S::MigrationT15LetterAcknowledged),
    (S::MigrationT15LetterSent, A::SendReminder, S::MigrationT15LetterSent),
    (S::MigrationT15LetterSent, A::PostponeMigration, S::MigrationPostponed),
    (S::MigrationT15LetterSent, A::FinalizeMigrationT15Stage, S::Ejected),
    (S::MigrationT15LetterAcknowledged, A::FinalizeMigrationT15Stage, S::MigrationT15StageComplete),
    (S::MigrationT15LetterAcknowledged, A::PostponeMigration, S::MigrationPostponed),
    (S::MigrationT15StageComplete, A::SendMigrationT5Letter, S::MigrationT5LetterSent),
    // T-5
    (S::MigrationT5LetterSent, A::AcknowledgeMigrationLetter, S::MigrationT5LetterAcknowledged),
    (S::MigrationT5LetterSent, A::SendReminder, S::MigrationT5LetterSent),
    (S::MigrationT5LetterSent, A::PostponeMigration, S::MigrationPostponed),
    (S::MigrationT5LetterSent, A::FinalizeMigrationT5Stage, S::Ejected),
    (S::MigrationT5LetterAcknowledged, A::PostponeMigration, S::MigrationPostponed),
    (S::MigrationT5LetterAcknowledged, A::FinalizeMigrationT5Stage, S::MigrationT5StageComplete),
    (S::MigrationT5StageComplete, A::SendMigrationT1Letter, S::MigrationT1LetterSent),
    // T-1
    (S::MigrationT1LetterSent, A::AcknowledgeMigrationLetter, S::MigrationT1LetterAcknowledged),
    (S::MigrationT1LetterSent, A::FinalizeMigrationT1Stage, S::Ejected),
    (S::MigrationT1LetterSent, A::SendReminder, S::MigrationT1LetterSent),
    (S::MigrationT1LetterSent, A::PostponeMigration, S::MigrationPostponed),
    (S::MigrationT1LetterAcknowledged, A::PostponeMigration, S::MigrationPostponed),
    (S::MigrationT1LetterAcknowledged, A::FinalizeMigrationT1Stage, S::MigrationT1StageComplete),
    (S::MigrationT1StageComplete, A::Golive, S::Golive),
    // Postponement loop
    (S::MigrationPostponed, A::ResumeMigration, S::ConnectionRetestDue),
    (S::ConnectionRetestDue, A::ConnectionTestOk, S::ConnectionStageComplete),
    (S::ConnectionRetestDue, A::ConnectionTestFailed, S::MigrationT45StageComplete),
    // Go-live
    (S::Golive, A::SendGoliveLetter, S::GoliveLetterSent),
    (S::Golive, A::FinalizeRelease, S::ReleaseComplete),
    (S::GoliveLetterSent, A::FinalizeRelease, S::ReleaseComplete),
];

const VISIBILITY: &[(S, &[A])] = &[
    (S::Start, &[A::SendMigrationT45Letter]),
    (
        S::MigrationT45LetterSent,
        &[A::AcknowledgeMigrationLetter, A::SendReminder, A::FinalizeMigrationT45Stage],
    ),
    (S::MigrationT45LetterAcknowledged, &[A::FinalizeMigrationT45Stage]),
    (S::MigrationT45StageComplete, &[A::RequestConnectionInfo]),
    (
        S::ConnectionInfoRequested,
        &[A::ReceiveConnectionInfo, A::SendReminder, A::FinalizeConnectionStage],
    ),
    (
        S::ConnectionInfoReceived,
        &[A::ProposeConnectionTestDate, A::ConnectionTestOk, A::FinalizeConnectionStage],
    ),
    (
        S::ConnectionTestDateProposed,
        &[A::ConfirmConnectionTestDate, A::SendReminder, A::FinalizeConnectionStage],
    ),
    (
        S::ConnectionTestDateConfirmed,
        &[A::ConnectionTestOk, A::ConnectionTestFailed, A::FinalizeConnectionStage],
    ),
    (S::ConnectionTestOk, &[A::RequestConnectionInfo, A::FinalizeConnectionStage]),
    (
        S::ConnectionTestFailed,
        &[A::ConnectionTestOk, A::ProposeConnectionTestDate, A::FinalizeConnectionStage],
    ),
    (S::ConnectionStageComplete, &[A::SendMigrationT15Letter]),
    (
        S::MigrationT15LetterSent,
        &[A::AcknowledgeMigrationLetter, A::SendReminder, A::PostponeMigration],
    ),
    (
        S::MigrationT15LetterAcknowledged,
        &[A::FinalizeMigrationT15Stage, A::PostponeMigration],
    ),
    (
        S::MigrationT5LetterSent,
        &[
            A::AcknowledgeMigrationLetter,
            A::SendReminder,
            A::PostponeMigration,
            A::FinalizeMigrationT5Stage,
        ],
    ),
    (
        S::MigrationT5LetterAcknowledged,
        &[A::PostponeMigration, A::FinalizeMigrationT5Stage],
    ),
    (
        S::MigrationT1LetterSent,
        &[A::AcknowledgeMigrationLetter, A::SendReminder, A::PostponeMigration],
    ),
    (
        S::MigrationT1LetterAcknowledged,
        &[A::PostponeMigration, A::FinalizeMigrationT1Stage],
    ),
    (S::MigrationPostponed, &[A::ResumeMigration]),
    (S::ConnectionRetestDue, &[A::ConnectionTestOk, A::ConnectionTestFailed]),
    (S::MigrationT1StageComplete, &[A::Golive]),
    (S::Golive, &[A::SendGoliveLetter, A::FinalizeRelease]),
    (S::GoliveLetterSent, &[A::FinalizeRelease]),
];

impl WorkflowDefinition {
    /// The version-2 release workflow.
    pub fn standard() -> Self {
        Self::from_static(STANDARD_VERSION, EDGES, VISIBILITY)
    }
}
