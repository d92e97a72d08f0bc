//! Holiday calendar capability seam.
//!
//! # Responsibility
//! - Define the date lookup consumed by gap annotation.
//! - Ship small implementations for embedding and tests.
//!
//! # Invariants
//! - The engine never depends on a concrete holiday data source; hosts
//!   supply one per locale and the engine stays data-free.
//!
//! # See also
//! - `crate::schedule::gaps` for the only in-crate consumer.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Holiday metadata for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayInfo {
    /// Display name, e.g. `春节`.
    pub name: String,
    /// `true` for a public-holiday day off; `false` for a furlough
    /// workday scheduled around a holiday block. Only days off label
    /// gaps.
    pub is_public_holiday: bool,
}

impl HolidayInfo {
    /// A named public-holiday day off.
    pub fn public_holiday(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public_holiday: true,
        }
    }

    /// A furlough workday attached to a holiday block.
    pub fn furlough_workday(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public_holiday: false,
        }
    }
}

/// Date lookup collaborator.
pub trait HolidayCalendar {
    /// Returns holiday info for `date`, or `None` for a plain day.
    fn lookup(&self, date: NaiveDate) -> Option<HolidayInfo>;
}

/// Calendar that knows no holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn lookup(&self, _date: NaiveDate) -> Option<HolidayInfo> {
        None
    }
}

/// Table-driven calendar for tests and fixed embedded datasets.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidayCalendar {
    entries: BTreeMap<NaiveDate, HolidayInfo>,
}

impl StaticHolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one dated entry, replacing any existing entry for that date.
    pub fn with_entry(mut self, date: NaiveDate, info: HolidayInfo) -> Self {
        self.entries.insert(date, info);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HolidayCalendar for StaticHolidayCalendar {
    fn lookup(&self, date: NaiveDate) -> Option<HolidayInfo> {
        self.entries.get(&date).cloned()
    }
}
