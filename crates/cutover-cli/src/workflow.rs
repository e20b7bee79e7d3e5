//! # Workflow Subcommand
//!
//! Prints the transition and visibility tables in use. YAML and JSON output
//! is a [`WorkflowDocument`](cutover_workflow::WorkflowDocument) and can be
//! edited and fed back through `--workflow`.

use anyhow::Result;
use clap::Args;

use crate::output::{structured, workflow_table, OutputFormat};
use crate::session::Session;

/// Arguments for `cutover workflow`.
#[derive(Args, Debug)]
pub struct WorkflowArgs {
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn run_workflow(args: &WorkflowArgs, session: &Session) -> Result<u8> {
    print!("{}", render_workflow(args, session)?);
    Ok(0)
}

fn render_workflow(args: &WorkflowArgs, session: &Session) -> Result<String> {
    let definition = session.engine.definition();
    Ok(match structured(&definition.to_document(), args.format)? {
        Some(text) => text,
        None => workflow_table(definition),
    })
}
