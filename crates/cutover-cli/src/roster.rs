//! # Roster Subcommand
//!
//! Prints the loaded release with every process and its state.

use anyhow::Result;
use clap::Args;

use cutover_core::PartnerId;

use crate::output::{release_table, structured, OutputFormat};
use crate::session::{check_partners, Session};

/// Arguments for `cutover roster`.
#[derive(Args, Debug)]
pub struct RosterArgs {
    /// Partner to mark as checked before printing. Repeatable.
    #[arg(long = "check", value_name = "PARTNER")]
    pub check: Vec<PartnerId>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn run_roster(args: &RosterArgs, session: &Session) -> Result<u8> {
    print!("{}", render_roster(args, session)?);
    Ok(0)
}

fn render_roster(args: &RosterArgs, session: &Session) -> Result<String> {
    let release = check_partners(session.release.clone(), &args.check)?;
    Ok(match structured(&release, args.format)? {
        Some(text) => text,
        None => release_table(&release),
    })
}
