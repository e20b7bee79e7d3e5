//! # Session Loading
//!
//! Turns [`Settings`] into the engine and release every subcommand works
//! on. Files ending in `.json` are parsed as JSON; anything else as YAML.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use cutover_core::PartnerId;
use cutover_release::{demo_release, Release, RosterDocument};
use cutover_workflow::{WorkflowDefinition, WorkflowDocument, WorkflowEngine};

use crate::config::Settings;

/// Everything a subcommand needs.
#[derive(Debug, Clone)]
pub struct Session {
    pub engine: WorkflowEngine,
    pub release: Release,
    pub customer: String,
}

impl Session {
    pub fn load(settings: &Settings) -> Result<Self> {
        let definition = match &settings.workflow {
            Some(path) => load_workflow(path)?,
            None => WorkflowDefinition::standard(),
        };
        let release = match &settings.roster {
            Some(path) => load_roster(path)?,
            None => demo_release().context("built-in roster is invalid")?,
        };
        tracing::debug!(
            release = release.name(),
            partners = release.partners().len(),
            workflow_version = definition.version(),
            "session loaded"
        );
        Ok(Self {
            engine: WorkflowEngine::new(Arc::new(definition)),
            release,
            customer: settings.customer.clone(),
        })
    }

    /// Built-in roster, standard workflow.
    pub fn standard(customer: impl Into<String>) -> Result<Self> {
        Ok(Self {
            engine: WorkflowEngine::standard(),
            release: demo_release().context("built-in roster is invalid")?,
            customer: customer.into(),
        })
    }
}

/// Mark each of `ids` as checked on top of whatever the roster says.
pub fn check_partners(release: Release, ids: &[PartnerId]) -> Result<Release> {
    ids.iter().try_fold(release, |release, id| {
        release
            .with_partner_checked(id, true)
            .with_context(|| format!("cannot check partner {id}"))
    })
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn load_roster(path: &Path) -> Result<Release> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster: {}", path.display()))?;
    let document = if is_json(path) {
        RosterDocument::from_json_str(&content)
    } else {
        RosterDocument::from_yaml_str(&content)
    }
    .with_context(|| format!("invalid roster in {}", path.display()))?;
    document
        .into_release()
        .with_context(|| format!("inconsistent roster in {}", path.display()))
}

pub fn load_workflow(path: &Path) -> Result<WorkflowDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read workflow definition: {}", path.display()))?;
    let document = if is_json(path) {
        WorkflowDocument::from_json_str(&content)
    } else {
        WorkflowDocument::from_yaml_str(&content)
    }
    .with_context(|| format!("invalid workflow definition in {}", path.display()))?;
    document
        .into_definition()
        .with_context(|| format!("invalid workflow definition in {}", path.display()))
}
