//! # Release Aggregate
//!
//! The aggregate root: a named, ordered roster of partners. Every mutator
//! takes `&self` and returns a new `Release`, so a caller can keep any number
//! of earlier snapshots (for undo, diffing or audit) without the engine
//! knowing about them.
//!
//! ## Invariants
//!
//! - Partner ids are unique within the release.
//! - Process ids are unique across the whole release.
//! - Every partner owns at least one process at construction.
//!
//! A partner whose processes are all `EJECTED` may exist transiently
//! between a state change and [`Release::purge_ejected`]; the workflow
//! engine never returns such a release.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use cutover_core::{PartnerId, ProcessId};
use cutover_state::ProcessState;

use crate::error::RosterError;
use crate::partner::Partner;
use crate::process::Process;

/// A migration cycle for a roster of partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    name: String,
    partners: Vec<Partner>,
}

impl Release {
    /// # Errors
    ///
    /// [`RosterError::DuplicatePartner`] or [`RosterError::DuplicateProcess`]
    /// when ids collide.
    pub fn new(name: impl Into<String>, partners: Vec<Partner>) -> Result<Self, RosterError> {
        let mut partner_ids = HashSet::new();
        let mut process_ids = HashSet::new();
        for partner in &partners {
            if !partner_ids.insert(partner.id()) {
                return Err(RosterError::DuplicatePartner {
                    partner: partner.id().clone(),
                });
            }
            for process in partner.processes() {
                if !process_ids.insert(process.id()) {
                    return Err(RosterError::DuplicateProcess {
                        process: process.id().clone(),
                    });
                }
            }
        }
        Ok(Self {
            name: name.into(),
            partners,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partners(&self) -> &[Partner] {
        &self.partners
    }

    pub fn partner_ids(&self) -> Vec<PartnerId> {
        self.partners.iter().map(|p| p.id().clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    pub fn partner(&self, id: &PartnerId) -> Option<&Partner> {
        self.partners.iter().find(|p| p.id() == id)
    }

    pub fn process(&self, id: &ProcessId) -> Option<&Process> {
        self.processes().find(|p| p.id() == id)
    }

    /// The partner owning process `id`.
    pub fn owner_of(&self, id: &ProcessId) -> Option<&Partner> {
        self.partners.iter().find(|p| p.owns(id))
    }

    /// All processes, partner by partner, in roster order.
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.partners.iter().flat_map(|p| p.processes().iter())
    }

    /// Processes owned by the given partners, in roster order. Ids not in
    /// the release contribute nothing.
    pub fn processes_of(&self, partners: &[PartnerId]) -> Vec<&Process> {
        self.partners
            .iter()
            .filter(|p| partners.contains(p.id()))
            .flat_map(|p| p.processes().iter())
            .collect()
    }

    pub fn checked_partners(&self) -> Vec<&Partner> {
        self.partners.iter().filter(|p| p.is_checked()).collect()
    }

    pub fn checked_processes(&self) -> Vec<&Process> {
        self.partners
            .iter()
            .filter(|p| p.is_checked())
            .flat_map(|p| p.processes().iter())
            .collect()
    }

    /// Partners whose every process is ejected.
    pub fn fully_ejected_partners(&self) -> Vec<&Partner> {
        self.partners
            .iter()
            .filter(|p| p.is_fully_ejected())
            .collect()
    }

    /// Partners with at least one ejected process. Includes the fully
    /// ejected ones.
    pub fn partially_ejected_partners(&self) -> Vec<&Partner> {
        self.partners.iter().filter(|p| p.has_ejected()).collect()
    }

    /// Owners of the given processes, deduplicated, in roster order.
    pub fn partners_for_processes(&self, processes: &[ProcessId]) -> Vec<&Partner> {
        self.partners
            .iter()
            .filter(|p| processes.iter().any(|id| p.owns(id)))
            .collect()
    }

    /// Distinct states across the release, in first-seen order.
    pub fn states(&self) -> Vec<ProcessState> {
        let mut states = Vec::new();
        for process in self.processes() {
            if !states.contains(&process.state()) {
                states.push(process.state());
            }
        }
        states
    }

    // ── Copy-on-write mutators ───────────────────────────────────────

    /// # Errors
    ///
    /// [`RosterError::UnknownPartner`] if `id` is not in the release.
    pub fn with_partner_checked(&self, id: &PartnerId, checked: bool) -> Result<Self, RosterError> {
        if self.partner(id).is_none() {
            return Err(RosterError::UnknownPartner(id.clone()));
        }
        let partners = self
            .partners
            .iter()
            .map(|p| if p.id() == id { p.with_checked(checked) } else { p.clone() })
            .collect();
        Ok(self.with_partners(partners))
    }

    pub fn with_all_partners_checked(&self, checked: bool) -> Self {
        let partners = self.partners.iter().map(|p| p.with_checked(checked)).collect();
        self.with_partners(partners)
    }

    /// # Errors
    ///
    /// [`RosterError::UnknownProcess`] if `id` is not in the release.
    pub fn with_process_state(
        &self,
        id: &ProcessId,
        state: ProcessState,
    ) -> Result<Self, RosterError> {
        let mut updates = BTreeMap::new();
        updates.insert(id.clone(), state);
        self.with_process_states(&updates)
    }

    /// Apply several state changes at once. Either every id resolves and
    /// all changes land, or nothing changes.
    ///
    /// # Errors
    ///
    /// [`RosterError::UnknownProcess`] for the first id not in the release.
    pub fn with_process_states(
        &self,
        updates: &BTreeMap<ProcessId, ProcessState>,
    ) -> Result<Self, RosterError> {
        if let Some(missing) = updates.keys().find(|id| self.process(id).is_none()) {
            return Err(RosterError::UnknownProcess(missing.clone()));
        }
        let mut partners = Vec::with_capacity(self.partners.len());
        for partner in &self.partners {
            let mut next = partner.clone();
            for process in partner.processes() {
                if let Some(state) = updates.get(process.id()) {
                    next = next.with_process_state(process.id(), *state)?;
                }
            }
            partners.push(next);
        }
        Ok(self.with_partners(partners))
    }

    /// Remove every ejected process, then every partner left without
    /// processes. Idempotent.
    pub fn purge_ejected(&self) -> Self {
        let partners = self
            .partners
            .iter()
            .filter_map(Partner::without_ejected)
            .collect();
        self.with_partners(partners)
    }

    fn with_partners(&self, partners: Vec<Partner>) -> Self {
        Self {
            name: self.name.clone(),
            partners,
        }
    }
}
