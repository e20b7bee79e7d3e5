//! # Process Lines
//!
//! A process is one document-exchange line (e.g. `850 EDI`) being migrated
//! for a partner. It is a plain value: changing its state yields a new
//! `Process` with the same id and name.

use serde::Serialize;

use cutover_core::ProcessId;
use cutover_state::ProcessState;

/// One migration line and its current workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Process {
    id: ProcessId,
    name: String,
    state: ProcessState,
}

impl Process {
    /// A new process in [`ProcessState::INITIAL`].
    pub fn new(id: ProcessId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state: ProcessState::INITIAL,
        }
    }

    pub fn id(&self) -> &ProcessId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_ejected(&self) -> bool {
        self.state == ProcessState::Ejected
    }

    /// Same process, different state.
    pub(crate) fn with_state(&self, state: ProcessState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ProcessId {
        ProcessId::new(s).unwrap()
    }

    #[test]
    fn new_process_starts_at_start() {
        let p = Process::new(pid("ASIM_1"), "850 EDI");
        assert_eq!(p.state(), ProcessState::Start);
        assert_eq!(p.name(), "850 EDI");
        assert!(!p.is_ejected());
    }

    #[test]
    fn with_state_leaves_original_untouched() {
        let p = Process::new(pid("ASIM_1"), "850 EDI");
        let q = p.with_state(ProcessState::Ejected);
        assert_eq!(p.state(), ProcessState::Start);
        assert!(q.is_ejected());
        assert_eq!(q.id(), p.id());
    }

    #[test]
    fn serializes_state_by_name() {
        let p = Process::new(pid("AHMED_2"), "890 EDI");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], "AHMED_2");
        assert_eq!(json["state"], "START");
    }
}
