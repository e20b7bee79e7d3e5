//! # cutover-cli: Cutover Command-Line Interface
//!
//! Handlers for the `cutover` binary. Each subcommand module exposes an
//! `Args` struct and a `run_*` function returning the process exit code;
//! `main.rs` only parses flags, sets up logging and dispatches.
//!
//! ## Subcommands
//!
//! - `workflow`: print the workflow definition in use
//! - `roster`: print the loaded release
//! - `actions`: list actions for given states or for the checked partners
//! - `run`: apply a script of actions and report what happened
//!
//! Domain logic lives in `cutover-workflow`; nothing here decides state.

pub mod actions;
pub mod config;
pub mod output;
pub mod roster;
pub mod run;
pub mod session;
pub mod workflow;
