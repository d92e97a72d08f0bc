//! Year-scoped round grouping.
//!
//! # Responsibility
//! - Partition one year's ordered permits into application rounds.
//!
//! # Invariants
//! - Only Regular permits consume round capacity; Temporary permits join
//!   the open round without counting.
//! - A round closes lazily: the Regular permit that would exceed the
//!   capacity opens the next round, so trailing Temporary permits still
//!   belong to the round of the Regulars they follow.
//!
//! # See also
//! - `crate::config::EngineConfig::round_size` for the capacity.

use crate::config::EngineConfig;
use crate::model::permit::{Permit, PermitType};

/// One application round: up to `round_size` Regular permits plus the
/// Temporary permits interleaved among them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Round {
    permits: Vec<Permit>,
}

impl Round {
    /// Permits in this round, ascending by start date.
    pub fn permits(&self) -> &[Permit] {
        &self.permits
    }

    /// Number of Regular permits counted against the round capacity.
    pub fn regular_count(&self) -> usize {
        self.permits
            .iter()
            .filter(|permit| permit.kind == PermitType::Regular)
            .count()
    }

    pub fn len(&self) -> usize {
        self.permits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permits.is_empty()
    }
}

/// Partitions permits (sorted ascending by start date) into rounds.
///
/// Callers pass one year's permits; the grouping itself is year-agnostic.
pub fn group_by_round(permits: &[Permit], config: &EngineConfig) -> Vec<Round> {
    let mut rounds = Vec::new();
    let mut current = Round::default();
    let mut regulars_in_current = 0usize;

    for permit in permits {
        if permit.kind == PermitType::Regular {
            if regulars_in_current >= config.round_size {
                rounds.push(std::mem::take(&mut current));
                regulars_in_current = 0;
            }
            regulars_in_current += 1;
        }
        current.permits.push(permit.clone());
    }

    if !current.permits.is_empty() {
        rounds.push(current);
    }

    rounds
}
