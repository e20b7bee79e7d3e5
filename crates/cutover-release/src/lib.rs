//! # cutover-release: Release Aggregate
//!
//! The data the workflow engine operates on:
//!
//! - **Process** (`process.rs`): one migration line with its current state.
//! - **Partner** (`partner.rs`): a counterparty owning one or more process
//!   lines, plus a selection flag.
//! - **Release** (`release.rs`): the aggregate root, an ordered roster of
//!   partners with derived queries and copy-on-write mutators.
//! - **Roster** (`roster.rs`, `seed.rs`): YAML/JSON roster documents and the
//!   built-in demo roster.
//!
//! ## Copy-on-write
//!
//! No method takes `&mut self`. Every mutator clones the levels it touches
//! and returns a new value, leaving the receiver usable. Callers that want
//! undo keep the old values.

pub mod error;
pub mod partner;
pub mod process;
pub mod release;
pub mod roster;
pub mod seed;

pub use error::RosterError;
pub use partner::Partner;
pub use process::Process;
pub use release::Release;
pub use roster::{PartnerEntry, ProcessEntry, RosterDocument};
pub use seed::demo_release;
