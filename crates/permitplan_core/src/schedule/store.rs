//! Permit store and conflict resolution.
//!
//! # Responsibility
//! - Own the ordered ground-truth collection of placed permits.
//! - Resolve same-kind conflicts on insert: evict overlaps, toggle exact
//!   re-picks off.
//!
//! # Invariants
//! - Permits stay sorted ascending by start date after every mutation.
//! - Conflict resolution only ever considers permits of the same kind;
//!   a Regular and a Temporary permit may cover the same days.
//! - A mutation either applies completely or not at all.
//!
//! # See also
//! - `crate::schedule::rounds` and `crate::schedule::gaps` read the
//!   ordered list this store maintains.

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::model::permit::{end_of_span, Permit, PermitId, PermitType};

/// Result of one insert call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The candidate was placed. Same-kind overlapping permits, if any,
    /// were evicted in one step.
    Placed { permit: Permit, evicted: Vec<Permit> },
    /// The candidate matched an already-placed permit exactly and
    /// toggled it off instead.
    Removed { permit: Permit },
}

/// Ordered ground-truth collection of placed permits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermitStore {
    permits: Vec<Permit>,
}

impl PermitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All permits, ascending by start date.
    pub fn permits(&self) -> &[Permit] {
        &self.permits
    }

    pub fn len(&self) -> usize {
        self.permits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permits.is_empty()
    }

    /// Looks up one permit by id.
    pub fn get(&self, id: PermitId) -> Option<&Permit> {
        self.permits.iter().find(|permit| permit.id == id)
    }

    /// Permits starting in `year`, preserving store order.
    pub fn permits_starting_in(&self, year: i32) -> Vec<Permit> {
        self.permits
            .iter()
            .filter(|permit| permit.start_year() == year)
            .cloned()
            .collect()
    }

    /// Places a permit of `kind` starting at `start_date`.
    ///
    /// When the candidate interval is identical to exactly one placed
    /// permit of the same kind, that permit is removed instead (picking a
    /// placed start date toggles it off). Otherwise every same-kind
    /// permit overlapping the candidate is evicted and the candidate is
    /// placed.
    pub fn insert(
        &mut self,
        start_date: NaiveDate,
        kind: PermitType,
        config: &EngineConfig,
    ) -> InsertOutcome {
        let duration = config.duration_days(kind);
        let end_date = end_of_span(start_date, duration);

        let overlapping: Vec<PermitId> = self
            .permits
            .iter()
            .filter(|permit| permit.kind == kind && permit.overlaps_range(start_date, end_date))
            .map(|permit| permit.id)
            .collect();

        if overlapping.len() == 1 {
            let existing = self.get(overlapping[0]).cloned();
            if let Some(existing) = existing {
                if existing.start_date == start_date && existing.end_date == end_date {
                    self.permits.retain(|permit| permit.id != existing.id);
                    return InsertOutcome::Removed { permit: existing };
                }
            }
        }

        let evicted = self.take_all(&overlapping);
        let permit = Permit::new(start_date, kind, duration);
        self.permits.push(permit.clone());
        self.sort();
        InsertOutcome::Placed { permit, evicted }
    }

    /// Removes one permit by id; `None` when the id is unknown.
    pub fn remove(&mut self, id: PermitId) -> Option<Permit> {
        let index = self.permits.iter().position(|permit| permit.id == id)?;
        Some(self.permits.remove(index))
    }

    /// Removes every listed permit, returning the removed ones in store order.
    pub fn remove_all(&mut self, ids: &[PermitId]) -> Vec<Permit> {
        self.take_all(ids)
    }

    /// Replaces the whole content (plan switch, persisted load).
    pub fn replace_all(&mut self, permits: Vec<Permit>) {
        self.permits = permits;
        self.sort();
    }

    /// Removes every permit.
    pub fn clear(&mut self) {
        self.permits.clear();
    }

    fn take_all(&mut self, ids: &[PermitId]) -> Vec<Permit> {
        let mut taken = Vec::new();
        self.permits.retain(|permit| {
            if ids.contains(&permit.id) {
                taken.push(permit.clone());
                false
            } else {
                true
            }
        });
        taken
    }

    fn sort(&mut self) {
        // Stable, so equal start dates keep their insertion order.
        self.permits.sort_by_key(|permit| permit.start_date);
    }
}
