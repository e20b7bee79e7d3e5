//! # Run Subcommand
//!
//! Applies a script of actions to the loaded roster, one `--step` at a
//! time, feeding each step the release the previous one produced. A
//! rejected step leaves the release as it was and the script carries on.
//!
//! ```text
//! cutover run --check ASIM \
//!     --step SEND_MIGRATION_T45_LETTER \
//!     --step ACKNOWLEDGE_MIGRATION_LETTER@ASIM,AAMIR \
//!     --step FINALIZE_MIGRATION_T45_STAGE@all
//! ```
//!
//! Exit code 2 if any step was rejected.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use cutover_core::{CutoverError, PartnerId};
use cutover_release::Release;
use cutover_state::Action;
use cutover_workflow::{
    Audience, DeliveryStatus, Execution, ExecutionReport, LogNotifier, Recipient, Rejection,
};

use crate::output::{release_table, structured, OutputFormat};
use crate::session::{check_partners, Session};

/// One scripted action and who it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub action: Action,
    pub audience: Audience,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.action.name(), self.audience)
    }
}

impl std::str::FromStr for Step {
    type Err = CutoverError;

    /// `ACTION` or `ACTION@TARGET`; the target defaults to `checked`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, audience) = match s.split_once('@') {
            Some((action, target)) => (action, target.parse()?),
            None => (s, Audience::Checked),
        };
        Ok(Self {
            action: action.parse()?,
            audience,
        })
    }
}

/// Arguments for `cutover run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Step to apply, as ACTION[@TARGET]. TARGET is `all`, `checked`, or
    /// comma-separated partner ids. Repeatable; applied in order.
    #[arg(long = "step", value_name = "ACTION[@TARGET]", required = true)]
    pub steps: Vec<Step>,

    /// Partner to mark as checked before the first step. Repeatable.
    #[arg(long = "check", value_name = "PARTNER")]
    pub check: Vec<PartnerId>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct StepOutcome {
    step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ExecutionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<Rejection>,
}

#[derive(Debug, Serialize)]
struct RunOutcome {
    steps: Vec<StepOutcome>,
    release: Release,
}

impl RunOutcome {
    fn rejected(&self) -> usize {
        self.steps.iter().filter(|s| s.rejection.is_some()).count()
    }
}

pub fn run_run(args: &RunArgs, session: &Session) -> Result<u8> {
    let outcome = execute_script(args, session)?;
    match structured(&outcome, args.format)? {
        Some(text) => println!("{text}"),
        None => print!("{}", render_table(&outcome, &session.customer)),
    }
    let rejected = outcome.rejected();
    if rejected > 0 {
        tracing::warn!(
            rejected,
            steps = outcome.steps.len(),
            "script finished with rejected steps"
        );
        return Ok(2);
    }
    Ok(0)
}

fn execute_script(args: &RunArgs, session: &Session) -> Result<RunOutcome> {
    let mut release = check_partners(session.release.clone(), &args.check)?;
    let mut notifier = LogNotifier::new(session.customer.clone());
    let mut steps = Vec::with_capacity(args.steps.len());

    for step in &args.steps {
        let execution =
            session
                .engine
                .execute_action(&release, step.action, &step.audience, &mut notifier);
        let (next, report, rejection) = match execution {
            Execution::Applied { release, report } => (release, Some(report), None),
            Execution::Rejected { release, rejection } => (release, None, Some(rejection)),
        };
        steps.push(StepOutcome {
            step: step.to_string(),
            report,
            rejection,
        });
        release = next;
    }

    Ok(RunOutcome { steps, release })
}

fn render_table(outcome: &RunOutcome, customer: &str) -> String {
    let mut out = String::new();
    for (n, step) in outcome.steps.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", n + 1, step.step));
        if let Some(rejection) = &step.rejection {
            out.push_str(&format!("    rejected: {rejection}\n"));
        }
        if let Some(report) = &step.report {
            render_report(&mut out, report, customer);
        }
    }
    out.push('\n');
    out.push_str(&release_table(&outcome.release));
    out
}

fn render_report(out: &mut String, report: &ExecutionReport, customer: &str) {
    let audience: Vec<&str> = report.audience.iter().map(PartnerId::as_str).collect();
    let widened = if report.widened { " (widened)" } else { "" };
    out.push_str(&format!("    audience: {}{widened}\n", audience.join(", ")));
    for t in &report.transitions {
        let fallback = if t.cause == cutover_workflow::TransitionCause::Fallback {
            " (no transition defined)"
        } else {
            ""
        };
        out.push_str(&format!(
            "    {:<10} {} -> {}{fallback}\n",
            t.process,
            t.from.name(),
            t.to.name()
        ));
    }
    if !report.removed_partners.is_empty() {
        let removed: Vec<&str> = report.removed_partners.iter().map(PartnerId::as_str).collect();
        out.push_str(&format!("    removed partners: {}\n", removed.join(", ")));
    }
    for record in &report.notifications {
        let recipient = match &record.notification.recipient {
            Recipient::Customer => customer.to_string(),
            partner => partner.to_string(),
        };
        let status = match &record.delivery {
            DeliveryStatus::Delivered => String::new(),
            DeliveryStatus::Failed { error } => format!(" [failed: {error}]"),
        };
        out.push_str(&format!(
            "    notify {recipient}: {}{status}\n",
            record.notification.template
        ));
    }
}
