//! # Workflow Definition
//!
//! The static configuration the engine runs on:
//!
//! - a sparse **transition table** `(state, action) → state`; a missing
//!   pair means the action does not apply to a process in that state;
//! - an advisory **visibility table** `state → actions` listing what a user
//!   should be offered while a process sits in that state. It never gates
//!   execution.
//!
//! A definition is built once, validated, and then shared read-only (the
//! engine holds it behind an `Arc`). There is no global instance.
//!
//! Edges keep their authoring order so that action listings come out in
//! the order the table was written, not in catalog order.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cutover_state::{Action, ProcessState};

/// One transition-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: ProcessState,
    pub action: Action,
    pub to: ProcessState,
}

/// Validation failures when building or loading a definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The same `(state, action)` pair was given two targets.
    #[error("duplicate edge from {} on {}", .from.name(), .action.name())]
    DuplicateEdge {
        from: ProcessState,
        action: Action,
    },

    /// An edge leaves a terminal state.
    #[error("edge on {} leaves terminal state {}", .action.name(), .from.name())]
    TerminalSource {
        from: ProcessState,
        action: Action,
    },

    /// A state appears twice in the visibility table.
    #[error("duplicate visibility entry for {}", .state.name())]
    DuplicateVisibility { state: ProcessState },

    /// A workflow document could not be parsed.
    #[error("malformed {format} workflow document: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },
}

/// An immutable, validated workflow definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowDefinition {
    version: u32,
    edges: Vec<Edge>,
    index: BTreeMap<(ProcessState, Action), ProcessState>,
    visibility: BTreeMap<ProcessState, Vec<Action>>,
}

impl WorkflowDefinition {
    pub fn builder(version: u32) -> WorkflowBuilder {
        WorkflowBuilder {
            version,
            edges: Vec::new(),
            visibility: Vec::new(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// All edges in authoring order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Distinct states with at least one outgoing edge, in authoring order.
    pub fn source_states(&self) -> Vec<ProcessState> {
        let mut states = Vec::new();
        for edge in &self.edges {
            if !states.contains(&edge.from) {
                states.push(edge.from);
            }
        }
        states
    }

    /// Target of `(state, action)`, or `None` when the action does not
    /// apply to a process in `state`.
    pub fn next_state(&self, state: ProcessState, action: Action) -> Option<ProcessState> {
        self.index.get(&(state, action)).copied()
    }

    /// Union of actions with an edge from any of `states`, deduplicated,
    /// ordered by the given states then by authoring order.
    pub fn actions_for_states(&self, states: &[ProcessState]) -> Vec<Action> {
        let mut actions = Vec::new();
        for state in states {
            for edge in self.edges.iter().filter(|e| e.from == *state) {
                if !actions.contains(&edge.action) {
                    actions.push(edge.action);
                }
            }
        }
        actions
    }

    /// Actions to offer for `state`. Empty when the state has no entry.
    pub fn visible_actions(&self, state: ProcessState) -> &[Action] {
        self.visibility.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Union of [`visible_actions`](Self::visible_actions) over `states`.
    pub fn visible_actions_for_states(&self, states: &[ProcessState]) -> Vec<Action> {
        let mut actions = Vec::new();
        for state in states {
            for action in self.visible_actions(*state) {
                if !actions.contains(action) {
                    actions.push(*action);
                }
            }
        }
        actions
    }

    /// States with a visibility entry.
    pub fn visibility_states(&self) -> impl Iterator<Item = ProcessState> + '_ {
        self.visibility.keys().copied()
    }

    /// Serializable form of this definition.
    pub fn to_document(&self) -> WorkflowDocument {
        WorkflowDocument {
            version: self.version,
            edges: self.edges.clone(),
            visibility: self
                .visibility
                .iter()
                .map(|(state, actions)| VisibilityEntry {
                    state: *state,
                    actions: actions.clone(),
                })
                .collect(),
        }
    }

    /// Build without validation. Callers must only pass tables that are
    /// covered by a test running them through [`WorkflowBuilder::build`].
    pub(crate) fn from_static(
        version: u32,
        edges: &[(ProcessState, Action, ProcessState)],
        visibility: &[(ProcessState, &[Action])],
    ) -> Self {
        let edges: Vec<Edge> = edges
            .iter()
            .map(|&(from, action, to)| Edge { from, action, to })
            .collect();
        let index = edges.iter().map(|e| ((e.from, e.action), e.to)).collect();
        let visibility = visibility
            .iter()
            .map(|(state, actions)| (*state, actions.to_vec()))
            .collect();
        Self {
            version,
            edges,
            index,
            visibility,
        }
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Accumulates edges and visibility entries, validating on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    version: u32,
    edges: Vec<Edge>,
    visibility: Vec<(ProcessState, Vec<Action>)>,
}

impl WorkflowBuilder {
    pub fn edge(mut self, from: ProcessState, action: Action, to: ProcessState) -> Self {
        self.edges.push(Edge { from, action, to });
        self
    }

    /// Offer `actions` for `state`. Repeated actions are collapsed.
    pub fn visible(mut self, state: ProcessState, actions: &[Action]) -> Self {
        let mut list = Vec::with_capacity(actions.len());
        for action in actions {
            if !list.contains(action) {
                list.push(*action);
            }
        }
        self.visibility.push((state, list));
        self
    }

    /// # Errors
    ///
    /// See [`DefinitionError`].
    pub fn build(self) -> Result<WorkflowDefinition, DefinitionError> {
        let mut index = BTreeMap::new();
        for edge in &self.edges {
            if edge.from.is_terminal() {
                return Err(DefinitionError::TerminalSource {
                    from: edge.from,
                    action: edge.action,
                });
            }
            if index.insert((edge.from, edge.action), edge.to).is_some() {
                return Err(DefinitionError::DuplicateEdge {
                    from: edge.from,
                    action: edge.action,
                });
            }
        }

        let mut visibility = BTreeMap::new();
        for (state, actions) in self.visibility {
            if visibility.insert(state, actions).is_some() {
                return Err(DefinitionError::DuplicateVisibility { state });
            }
        }

        Ok(WorkflowDefinition {
            version: self.version,
            edges: self.edges,
            index,
            visibility,
        })
    }
}

// ─── Document form ───────────────────────────────────────────────────

/// Visibility row in a [`WorkflowDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityEntry {
    pub state: ProcessState,
    pub actions: Vec<Action>,
}

/// Serialized workflow definition (YAML or JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub version: u32,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub visibility: Vec<VisibilityEntry>,
}

impl WorkflowDocument {
    /// # Errors
    ///
    /// [`DefinitionError::Malformed`] on parse failure.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DefinitionError> {
        serde_yaml::from_str(yaml).map_err(|e| DefinitionError::Malformed {
            format: "yaml",
            reason: e.to_string(),
        })
    }

    /// # Errors
    ///
    /// [`DefinitionError::Malformed`] on parse failure.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::Malformed {
            format: "json",
            reason: e.to_string(),
        })
    }

    /// Validate into a definition.
    ///
    /// # Errors
    ///
    /// Any builder validation failure.
    pub fn into_definition(self) -> Result<WorkflowDefinition, DefinitionError> {
        let mut builder = WorkflowDefinition::builder(self.version);
        for edge in self.edges {
            builder = builder.edge(edge.from, edge.action, edge.to);
        }
        for entry in self.visibility {
            builder = builder.visible(entry.state, &entry.actions);
        }
        builder.build()
    }
}
