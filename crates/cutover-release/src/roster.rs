//! # Roster Documents
//!
//! The on-disk shape of a release roster, loadable from YAML or JSON:
//!
//! ```yaml
//! name: Release
//! partners:
//!   - id: ASIM
//!     name: Asim
//!     checked: true
//!     processes:
//!       - id: ASIM_1
//!         name: 850 EDI
//! ```
//!
//! `name` fields default to the id and `checked` defaults to `false`.
//! Process states are not part of the document: every loaded process starts
//! in `START`.

use serde::{Deserialize, Serialize};

use cutover_core::{PartnerId, ProcessId};

use crate::error::RosterError;
use crate::partner::Partner;
use crate::process::Process;
use crate::release::Release;

/// A roster as written by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDocument {
    pub name: String,
    pub partners: Vec<PartnerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerEntry {
    pub id: PartnerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub checked: bool,
    pub processes: Vec<ProcessEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub id: ProcessId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RosterDocument {
    /// # Errors
    ///
    /// [`RosterError::Malformed`] if the text is not a valid roster.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RosterError> {
        serde_yaml::from_str(yaml).map_err(|e| RosterError::Malformed {
            format: "yaml",
            reason: e.to_string(),
        })
    }

    /// # Errors
    ///
    /// [`RosterError::Malformed`] if the text is not a valid roster.
    pub fn from_json_str(json: &str) -> Result<Self, RosterError> {
        serde_json::from_str(json).map_err(|e| RosterError::Malformed {
            format: "json",
            reason: e.to_string(),
        })
    }

    /// The document describing `release`'s current roster. States are
    /// dropped.
    pub fn from_release(release: &Release) -> Self {
        Self {
            name: release.name().to_string(),
            partners: release
                .partners()
                .iter()
                .map(|partner| PartnerEntry {
                    id: partner.id().clone(),
                    name: Some(partner.name().to_string()),
                    checked: partner.is_checked(),
                    processes: partner
                        .processes()
                        .iter()
                        .map(|process| ProcessEntry {
                            id: process.id().clone(),
                            name: Some(process.name().to_string()),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Build the release, every process in `START`.
    ///
    /// # Errors
    ///
    /// Any [`RosterError`] raised by [`Partner::new`] or [`Release::new`].
    pub fn into_release(self) -> Result<Release, RosterError> {
        let mut partners = Vec::with_capacity(self.partners.len());
        for entry in self.partners {
            let processes = entry
                .processes
                .into_iter()
                .map(|p| {
                    let name = p.name.unwrap_or_else(|| p.id.to_string());
                    Process::new(p.id, name)
                })
                .collect();
            let name = entry.name.unwrap_or_else(|| entry.id.to_string());
            let partner = Partner::new(entry.id, name, processes)?;
            partners.push(partner.with_checked(entry.checked));
        }
        Release::new(self.name, partners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutover_state::ProcessState;

    const ROSTER: &str = r#"
name: Spring cutover
partners:
  - id: ACME
    name: Acme Corp
    checked: true
    processes:
      - id: ACME_1
        name: 850 EDI
      - id: ACME_2
  - id: GLOBEX
    processes:
      - id: GLOBEX_1
        name: 810 EDI
"#;

    #[test]
    fn yaml_roster_builds_release_at_start() {
        let release = RosterDocument::from_yaml_str(ROSTER)
            .unwrap()
            .into_release()
            .unwrap();
        assert_eq!(release.name(), "Spring cutover");
        assert_eq!(release.partners().len(), 2);
        assert_eq!(release.states(), vec![ProcessState::Start]);
        assert_eq!(release.checked_partners().len(), 1);
    }

    #[test]
    fn names_default_to_ids() {
        let release = RosterDocument::from_yaml_str(ROSTER)
            .unwrap()
            .into_release()
            .unwrap();
        let globex = release.partner(&PartnerId::new("GLOBEX").unwrap()).unwrap();
        assert_eq!(globex.name(), "GLOBEX");
        let acme_2 = release.process(&ProcessId::new("ACME_2").unwrap()).unwrap();
        assert_eq!(acme_2.name(), "ACME_2");
    }

    #[test]
    fn json_roster_is_accepted() {
        let json = r#"{"name":"R","partners":[{"id":"P","processes":[{"id":"P_1"}]}]}"#;
        let release = RosterDocument::from_json_str(json)
            .unwrap()
            .into_release()
            .unwrap();
        assert_eq!(release.processes().count(), 1);
    }

    #[test]
    fn blank_ids_are_malformed() {
        let yaml = "name: R\npartners:\n  - id: ' '\n    processes:\n      - id: X\n";
        assert!(matches!(
            RosterDocument::from_yaml_str(yaml),
            Err(RosterError::Malformed { format: "yaml", .. })
        ));
    }

    #[test]
    fn partner_without_processes_is_rejected() {
        let yaml = "name: R\npartners:\n  - id: P\n    processes: []\n";
        let err = RosterDocument::from_yaml_str(yaml)
            .unwrap()
            .into_release()
            .unwrap_err();
        assert!(matches!(err, RosterError::EmptyPartner { .. }));
    }

    #[test]
    fn document_reflects_current_roster() {
        let release = RosterDocument::from_yaml_str(ROSTER)
            .unwrap()
            .into_release()
            .unwrap();
        let doc = RosterDocument::from_release(&release);
        assert_eq!(doc.partners[0].name.as_deref(), Some("Acme Corp"));
        assert!(doc.partners[0].checked);
        assert_eq!(doc.clone().into_release().unwrap(), release);
    }
}
