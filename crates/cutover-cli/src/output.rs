//! # Output Rendering
//!
//! Plain-text tables for people, YAML and JSON for scripts.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use cutover_release::Release;
use cutover_state::Action;
use cutover_workflow::WorkflowDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain text.
    #[default]
    Table,
    Yaml,
    Json,
}

/// Serialize `value` as YAML or pretty JSON.
///
/// Returns `None` for [`OutputFormat::Table`], which each caller renders
/// itself.
pub fn structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Table => Ok(None),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(Some)
            .context("failed to render YAML"),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(Some)
            .context("failed to render JSON"),
    }
}

pub fn release_table(release: &Release) -> String {
    let mut out = format!("Release: {}\n", release.name());
    if release.is_empty() {
        out.push_str("  (no partners)\n");
    }
    for partner in release.partners() {
        let mark = if partner.is_checked() { "x" } else { " " };
        out.push_str(&format!("  [{mark}] {:<10} {}\n", partner.id(), partner.name()));
        for process in partner.processes() {
            out.push_str(&format!(
                "        {:<10} {:<10} {}\n",
                process.id(),
                process.name(),
                process.state().name()
            ));
        }
    }
    out
}

pub fn workflow_table(definition: &WorkflowDefinition) -> String {
    let mut out = format!(
        "Workflow v{} ({} edges)\n",
        definition.version(),
        definition.edges().len()
    );
    for state in definition.source_states() {
        out.push_str(&format!("{}\n", state.name()));
        let visible = definition.visible_actions(state);
        for edge in definition.edges().iter().filter(|e| e.from == state) {
            let mark = if visible.contains(&edge.action) { "*" } else { " " };
            out.push_str(&format!(
                "  {mark} {:<30} -> {}\n",
                edge.action.name(),
                edge.to.name()
            ));
        }
    }
    out.push_str("(* offered to users in that state)\n");
    out
}

pub fn action_list(actions: &[Action]) -> String {
    if actions.is_empty() {
        return "  (none)\n".to_string();
    }
    actions
        .iter()
        .map(|a| format!("  {:<30} {}\n", a.name(), a.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutover_release::demo_release;

    #[test]
    fn release_table_lists_every_process() {
        let table = release_table(&demo_release().unwrap());
        assert!(table.starts_with("Release: Release\n"));
        assert_eq!(table.matches("START").count(), 10);
        assert!(table.contains("[ ] HASSAN"));
    }

    #[test]
    fn workflow_table_marks_visible_edges() {
        let table = workflow_table(&WorkflowDefinition::standard());
        assert!(table.starts_with("Workflow v2 (51 edges)\n"));
        assert!(table.contains("* SEND_MIGRATION_T45_LETTER"));
    }

    #[test]
    fn structured_formats() {
        let release = demo_release().unwrap();
        assert!(structured(&release, OutputFormat::Table).unwrap().is_none());
        let json = structured(&release, OutputFormat::Json).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["partners"][0]["id"], "ASIM");
        let yaml = structured(&release, OutputFormat::Yaml).unwrap().unwrap();
        assert!(yaml.contains("name: Release"));
    }

    #[test]
    fn empty_action_list() {
        assert_eq!(action_list(&[]), "  (none)\n");
        assert!(action_list(&[Action::Golive]).contains("GoLive"));
    }
}
