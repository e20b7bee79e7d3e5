//! # cutover-workflow: Workflow Engine
//!
//! Drives a [`Release`](cutover_release::Release) through the cutover
//! workflow.
//!
//! - **Definition** (`definition.rs`, `standard.rs`): the transition and
//!   visibility tables, their builder and document form, and the standard
//!   version-2 workflow.
//! - **Audience** (`audience.rs`): who an action targets.
//! - **Engine** (`engine.rs`): `execute_action` and the action listings.
//! - **Notify** (`notify.rs`): the [`Notifier`] seam the engine reports
//!   through.
//! - **Outcome** (`outcome.rs`): [`Execution`], [`Rejection`] and the
//!   per-call [`ExecutionReport`].
//!
//! ## Undefined transitions
//!
//! An action applied to a process whose state has no edge for it ejects
//! that process. Each such ejection is logged at `warn` and recorded with
//! [`TransitionCause::Fallback`] so it can be told apart from the explicit
//! finalize-without-answer edges.

pub mod audience;
pub mod definition;
pub mod engine;
pub mod notify;
pub mod outcome;
pub mod standard;

pub use audience::Audience;
pub use definition::{
    DefinitionError, Edge, VisibilityEntry, WorkflowBuilder, WorkflowDefinition, WorkflowDocument,
};
pub use engine::WorkflowEngine;
pub use notify::{
    LogNotifier, Notification, NotificationKind, Notifier, NotifyError, Recipient,
    RecordingNotifier,
};
pub use outcome::{
    DeliveryStatus, Execution, ExecutionReport, NotificationRecord, Rejection, TransitionCause,
    TransitionRecord,
};
pub use standard::STANDARD_VERSION;
