//! # Partners
//!
//! A partner owns an ordered, non-empty list of process lines with unique
//! ids, plus the `checked` selection flag the caller uses to build bulk
//! audiences. Mutation is copy-on-write like the rest of the aggregate.

use std::collections::HashSet;

use serde::Serialize;

use cutover_core::{PartnerId, ProcessId};
use cutover_state::ProcessState;

use crate::error::RosterError;
use crate::process::Process;

/// An external counterparty and its process lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partner {
    id: PartnerId,
    name: String,
    checked: bool,
    processes: Vec<Process>,
}

impl Partner {
    /// Create an unchecked partner.
    ///
    /// # Errors
    ///
    /// [`RosterError::EmptyPartner`] if `processes` is empty,
    /// [`RosterError::DuplicateProcess`] if two processes share an id.
    pub fn new(
        id: PartnerId,
        name: impl Into<String>,
        processes: Vec<Process>,
    ) -> Result<Self, RosterError> {
        if processes.is_empty() {
            return Err(RosterError::EmptyPartner { partner: id });
        }
        let mut seen = HashSet::new();
        for process in &processes {
            if !seen.insert(process.id()) {
                return Err(RosterError::DuplicateProcess {
                    process: process.id().clone(),
                });
            }
        }
        Ok(Self {
            id,
            name: name.into(),
            checked: false,
            processes,
        })
    }

    pub fn id(&self) -> &PartnerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, id: &ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.id() == id)
    }

    pub fn owns(&self, id: &ProcessId) -> bool {
        self.process(id).is_some()
    }

    /// Distinct states among the partner's processes, in first-seen order.
    pub fn states(&self) -> Vec<ProcessState> {
        let mut states = Vec::new();
        for process in &self.processes {
            if !states.contains(&process.state()) {
                states.push(process.state());
            }
        }
        states
    }

    pub fn ejected_processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| p.is_ejected())
    }

    /// Every process is ejected.
    pub fn is_fully_ejected(&self) -> bool {
        self.processes.iter().all(Process::is_ejected)
    }

    /// At least one process is ejected. True for fully ejected partners too.
    pub fn has_ejected(&self) -> bool {
        self.processes.iter().any(Process::is_ejected)
    }

    pub fn with_checked(&self, checked: bool) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            checked,
            processes: self.processes.clone(),
        }
    }

    /// # Errors
    ///
    /// [`RosterError::UnknownProcess`] if the partner does not own `id`.
    pub fn with_process_state(
        &self,
        id: &ProcessId,
        state: ProcessState,
    ) -> Result<Self, RosterError> {
        if !self.owns(id) {
            return Err(RosterError::UnknownProcess(id.clone()));
        }
        let processes = self
            .processes
            .iter()
            .map(|p| if p.id() == id { p.with_state(state) } else { p.clone() })
            .collect();
        Ok(self.with_processes(processes))
    }

    /// Drop ejected processes. `None` when nothing is left.
    pub fn without_ejected(&self) -> Option<Self> {
        let processes: Vec<Process> = self
            .processes
            .iter()
            .filter(|p| !p.is_ejected())
            .cloned()
            .collect();
        if processes.is_empty() {
            return None;
        }
        Some(self.with_processes(processes))
    }

    /// Same partner, replacement process list.
    fn with_processes(&self, processes: Vec<Process>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            checked: self.checked,
            processes,
        }
    }
}
