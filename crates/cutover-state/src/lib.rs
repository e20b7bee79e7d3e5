//! # cutover-state: Workflow Catalogs
//!
//! The two closed vocabularies of the cutover workflow:
//!
//! - **States** (`state.rs`): 26 process states, from `START` through the
//!   T-45, connection, T-15, T-5 and T-1 stages to `RELEASE_COMPLETE`, plus
//!   the error branch (`EJECTED`, `CONNECTION_TEST_FAILED`,
//!   `MIGRATION_POSTPONED`, `CONNECTION_RETEST_DUE`).
//!
//! - **Actions** (`action.rs`): 22 actions with their release-action flag,
//!   blocking states and notification audience.
//!
//! Both are plain `Copy` enums. Identity is the variant; labels and flags
//! are computed from it, so there is no runtime registry to keep in sync.
//! The transition table that links the two lives in `cutover-workflow`.

pub mod action;
pub mod state;

pub use action::{Action, EmailAudience};
pub use state::ProcessState;

/// Fold user input onto canonical catalog spelling: `migration-t45 letter`
/// becomes `MIGRATION_T45_LETTER`.
pub(crate) fn normalize_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}
