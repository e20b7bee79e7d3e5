//! # Roster Errors

use thiserror::Error;

use cutover_core::{CutoverError, PartnerId, ProcessId};

/// Failures building, loading or addressing into a release roster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// A partner was declared without any process line.
    #[error("partner {partner} has no processes")]
    EmptyPartner {
        /// The offending partner.
        partner: PartnerId,
    },

    /// Two partners share an id.
    #[error("duplicate partner id: {partner}")]
    DuplicatePartner {
        /// The repeated id.
        partner: PartnerId,
    },

    /// A process id appears twice, within one partner or across partners.
    #[error("duplicate process id: {process}")]
    DuplicateProcess {
        /// The repeated id.
        process: ProcessId,
    },

    /// A mutator or query named a partner that is not in the release.
    #[error("unknown partner: {0}")]
    UnknownPartner(PartnerId),

    /// A mutator named a process that is not in the release.
    #[error("unknown process: {0}")]
    UnknownProcess(ProcessId),

    /// A roster document could not be parsed.
    #[error("malformed {format} roster: {reason}")]
    Malformed {
        /// `"yaml"` or `"json"`.
        format: &'static str,
        /// Parser diagnostic.
        reason: String,
    },

    /// An identifier in the roster failed validation.
    #[error(transparent)]
    Identifier(#[from] CutoverError),
}
