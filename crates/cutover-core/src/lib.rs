//! # cutover-core: Foundational Types
//!
//! Leaf crate of the cutover workspace. Every other crate depends on it;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `PartnerId` and `ProcessId` are
//!    validated, trimmed, non-empty strings. A process id can never be passed
//!    where a partner id is expected.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is seconds-precision UTC and is
//!    only used on execution reports, never inside a release snapshot, so two
//!    snapshots produced by identical invocations compare equal.
//!
//! 3. **One error hierarchy.** Identifier and timestamp validation failures
//!    surface as [`CutoverError`]; domain crates define their own `thiserror`
//!    enums for their own failure modes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cutover-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::CutoverError;
pub use identity::{ExecutionId, PartnerId, ProcessId};
pub use temporal::Timestamp;
