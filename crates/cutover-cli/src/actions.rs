//! # Actions Subcommand
//!
//! Lists what can be done next. With `--state`, answers for those states
//! directly: every action the transition table accepts, plus the subset a
//! user would be offered. Without it, answers for the checked partners of
//! the loaded roster.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use cutover_core::PartnerId;
use cutover_state::{Action, ProcessState};

use crate::output::{action_list, structured, OutputFormat};
use crate::session::{check_partners, Session};

/// Arguments for `cutover actions`.
#[derive(Args, Debug)]
pub struct ActionsArgs {
    /// Process state to query, by name or label. Repeatable.
    #[arg(long = "state", value_name = "STATE")]
    pub states: Vec<ProcessState>,

    /// Partner to mark as checked. Repeatable. Ignored with `--state`.
    #[arg(long = "check", value_name = "PARTNER")]
    pub check: Vec<PartnerId>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ActionListing {
    states: Vec<ProcessState>,
    actions: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visible: Option<Vec<Action>>,
}

pub fn run_actions(args: &ActionsArgs, session: &Session) -> Result<u8> {
    print!("{}", render_actions(args, session)?);
    Ok(0)
}

fn listing(args: &ActionsArgs, session: &Session) -> Result<ActionListing> {
    let engine = &session.engine;
    if !args.states.is_empty() {
        return Ok(ActionListing {
            states: args.states.clone(),
            actions: engine.actions_for_states(&args.states),
            visible: Some(engine.definition().visible_actions_for_states(&args.states)),
        });
    }
    let release = check_partners(session.release.clone(), &args.check)?;
    let mut states = Vec::new();
    for process in release.checked_processes() {
        if !states.contains(&process.state()) {
            states.push(process.state());
        }
    }
    Ok(ActionListing {
        states,
        actions: engine.bulk_actions(&release),
        visible: None,
    })
}

fn render_actions(args: &ActionsArgs, session: &Session) -> Result<String> {
    let listing = listing(args, session)?;
    if let Some(text) = structured(&listing, args.format)? {
        return Ok(text);
    }
    let states: Vec<&str> = listing.states.iter().map(|s| s.name()).collect();
    let mut out = if states.is_empty() {
        "No checked processes.\n".to_string()
    } else {
        format!("States: {}\n", states.join(", "))
    };
    out.push_str("Actions:\n");
    out.push_str(&action_list(&listing.actions));
    if let Some(visible) = &listing.visible {
        out.push_str("Offered:\n");
        out.push_str(&action_list(visible));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(states: Vec<ProcessState>, check: &[&str]) -> ActionsArgs {
        ActionsArgs {
            states,
            check: check.iter().map(|c| PartnerId::new(*c).unwrap()).collect(),
            format: OutputFormat::Table,
        }
    }

    #[test]
    fn by_state_includes_offered_subset() {
        let session = Session::standard("Contoso").unwrap();
        let listing = listing(
            &args(vec![ProcessState::MigrationT45LetterSent], &[]),
            &session,
        )
        .unwrap();
        assert!(listing.actions.contains(&Action::AcknowledgeMigrationLetter));
        assert!(listing.actions.contains(&Action::SendReminder));
        let visible = listing.visible.unwrap();
        assert!(visible.iter().all(|a| listing.actions.contains(a)));
    }

    #[test]
    fn checked_partners_drive_bulk_actions() {
        let session = Session::standard("Contoso").unwrap();
        let listing = listing(&args(vec![], &["HASSAN"]), &session).unwrap();
        assert_eq!(listing.states, vec![ProcessState::Start]);
        assert_eq!(listing.actions, vec![Action::SendMigrationT45Letter]);
        assert!(listing.visible.is_none());
    }

    #[test]
    fn nothing_checked() {
        let session = Session::standard("Contoso").unwrap();
        let text = render_actions(&args(vec![], &[]), &session).unwrap();
        assert_eq!(text, "No checked processes.\nActions:\n  (none)\n");
    }
}
