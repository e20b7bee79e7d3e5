//! # Execution Outcomes
//!
//! Every `execute_action` call either commits completely or not at all.
//! [`Execution::Applied`] carries the new release and a report of what
//! happened; [`Execution::Rejected`] carries the caller's release unchanged
//! and the reason.

use serde::Serialize;
use thiserror::Error;

use cutover_core::{ExecutionId, PartnerId, ProcessId, Timestamp};
use cutover_release::Release;
use cutover_state::{Action, ProcessState};

use crate::notify::Notification;

/// Why an action was not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Rejection {
    /// Some audience process still sits in a state the action blocks on.
    #[error(
        "{} blocked: {} process(es) still in {}",
        .action.label(),
        .processes.len(),
        state_list(.blocking)
    )]
    Blocked {
        action: Action,
        /// Distinct blocking states found in the audience.
        blocking: Vec<ProcessState>,
        /// Audience processes in those states.
        processes: Vec<ProcessId>,
    },

    /// The audience named a partner that is not in the release.
    #[error("unknown partner in audience: {0}")]
    UnknownPartner(PartnerId),

    /// An inconsistency detected while applying the action.
    #[error("internal error: {0}")]
    Internal(String),
}

fn state_list(states: &[ProcessState]) -> String {
    states.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
}

/// How a process reached its post-action state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// A table edge to a different state.
    Edge,
    /// A table edge back to the same state.
    SelfLoop,
    /// No edge existed; the process was ejected.
    Fallback,
}

/// One audience process's transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    pub process: ProcessId,
    pub partner: PartnerId,
    pub from: ProcessState,
    pub to: ProcessState,
    pub cause: TransitionCause,
}

impl TransitionRecord {
    pub fn is_ejection(&self) -> bool {
        self.to == ProcessState::Ejected
    }

    /// Took a table edge that did not eject. Self-loops count.
    pub fn is_valid(&self) -> bool {
        self.cause != TransitionCause::Fallback && !self.is_ejection()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Failed { error: String },
}

/// A notification and what became of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRecord {
    pub notification: Notification,
    pub delivery: DeliveryStatus,
}

/// Everything one applied execution did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub id: ExecutionId,
    pub executed_at: Timestamp,
    pub action: Action,
    /// Partners the action was applied to, after widening.
    pub audience: Vec<PartnerId>,
    /// Whether a release action's audience was widened to every partner.
    pub widened: bool,
    pub transitions: Vec<TransitionRecord>,
    /// Every process the purge removed, including lines that were already
    /// ejected outside the audience.
    pub purged_processes: Vec<ProcessId>,
    pub removed_partners: Vec<PartnerId>,
    pub notifications: Vec<NotificationRecord>,
}

impl ExecutionReport {
    pub fn ejections(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.transitions.iter().filter(|t| t.is_ejection())
    }

    pub fn fallback_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.cause == TransitionCause::Fallback)
            .count()
    }

    pub fn failed_notifications(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.notifications
            .iter()
            .filter(|n| matches!(n.delivery, DeliveryStatus::Failed { .. }))
    }
}

/// Result of `execute_action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    Applied {
        release: Release,
        report: ExecutionReport,
    },
    Rejected {
        /// The caller's release, untouched.
        release: Release,
        rejection: Rejection,
    },
}

impl Execution {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn release(&self) -> &Release {
        match self {
            Self::Applied { release, .. } | Self::Rejected { release, .. } => release,
        }
    }

    pub fn into_release(self) -> Release {
        match self {
            Self::Applied { release, .. } | Self::Rejected { release, .. } => release,
        }
    }

    pub fn report(&self) -> Option<&ExecutionReport> {
        match self {
            Self::Applied { report, .. } => Some(report),
            Self::Rejected { .. } => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied { .. } => None,
            Self::Rejected { rejection, .. } => Some(rejection),
        }
    }
}
