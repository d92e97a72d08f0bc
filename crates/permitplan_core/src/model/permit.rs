//! Permit domain model.
//!
//! # Responsibility
//! - Define the permit record placed on the calendar.
//! - Provide the interval arithmetic shared by conflict resolution and
//!   gap annotation.
//!
//! # Invariants
//! - `end_date = start_date + duration - 1`; the span length comes from
//!   configuration and is never stored independently of the kind.
//! - Intervals are inclusive on both ends, at whole-day granularity.
//!
//! # See also
//! - `crate::config::EngineConfig` for the per-kind span lengths.
//! - `crate::schedule::store` for conflict resolution over these intervals.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one placed permit.
pub type PermitId = Uuid;

/// Closed set of permit kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermitType {
    /// Seven-day entry permit; counts toward round capacity.
    Regular,
    /// Fifteen-day temporary-plate permit; never counts toward rounds.
    Temporary,
}

impl PermitType {
    /// Single-character tag used by the share codec.
    pub fn code_char(self) -> char {
        match self {
            Self::Regular => 'R',
            Self::Temporary => 'T',
        }
    }

    /// Parses a share codec tag back into a kind.
    pub fn from_code_char(value: char) -> Option<Self> {
        match value {
            'R' => Some(Self::Regular),
            'T' => Some(Self::Temporary),
            _ => None,
        }
    }
}

/// One placed permit: an inclusive date interval of a fixed kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    pub id: PermitId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: PermitType,
}

impl Permit {
    /// Creates a permit starting at `start_date` and spanning `duration_days`.
    pub fn new(start_date: NaiveDate, kind: PermitType, duration_days: u32) -> Self {
        Self::with_id(Uuid::new_v4(), start_date, kind, duration_days)
    }

    /// Creates a permit with a caller-provided stable id.
    pub fn with_id(
        id: PermitId,
        start_date: NaiveDate,
        kind: PermitType,
        duration_days: u32,
    ) -> Self {
        Self {
            id,
            start_date,
            end_date: end_of_span(start_date, duration_days),
            kind,
        }
    }

    /// Calendar year the permit starts in.
    pub fn start_year(&self) -> i32 {
        self.start_date.year()
    }

    /// Inclusive interval overlap against another permit.
    pub fn overlaps(&self, other: &Permit) -> bool {
        ranges_overlap(self.start_date, self.end_date, other.start_date, other.end_date)
    }

    /// Inclusive interval overlap against a raw date range.
    pub fn overlaps_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        ranges_overlap(self.start_date, self.end_date, start, end)
    }

    /// Whether `date` falls inside this permit, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Last day of an inclusive span of `duration_days` starting at `start`.
pub fn end_of_span(start: NaiveDate, duration_days: u32) -> NaiveDate {
    start + Duration::days(i64::from(duration_days.saturating_sub(1)))
}

/// Inclusive overlap test. Shared boundary days count as overlapping.
pub fn ranges_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && s2 <= e1
}
