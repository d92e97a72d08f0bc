//! Idle-gap annotation between Regular permits.
//!
//! # Responsibility
//! - Measure the idle days before each Regular permit and label the
//!   stretch with what covers it: temporary plates, holidays off.
//!
//! # Invariants
//! - The predecessor is the nearest preceding Regular permit; Temporary
//!   permits in between are skipped, not measured against.
//! - `days` counts whole days strictly between the two intervals; gaps
//!   of zero or negative length are omitted entirely.
//! - Labels are deduplicated in first-seen order: the temporary-plate
//!   marker first, then holiday names in date order.
//!
//! # See also
//! - `crate::holiday::HolidayCalendar` supplies the holiday names.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::holiday::HolidayCalendar;
use crate::model::permit::{Permit, PermitId, PermitType};

/// Annotation for the idle span before one Regular permit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapInfo {
    /// Whole idle days strictly between the two permits.
    pub days: i64,
    /// Deduplicated labels in first-seen order.
    pub labels: Vec<String>,
}

impl GapInfo {
    /// Joins the labels with `delimiter`; `None` when there are none.
    pub fn label_text(&self, delimiter: &str) -> Option<String> {
        if self.labels.is_empty() {
            None
        } else {
            Some(self.labels.join(delimiter))
        }
    }
}

/// Computes gap annotations for one year's permits (sorted ascending).
///
/// The result maps the id of the later Regular permit to the gap before
/// it. The first Regular permit of the list never carries a gap.
pub fn annotate_gaps(
    permits: &[Permit],
    calendar: &dyn HolidayCalendar,
    config: &EngineConfig,
) -> BTreeMap<PermitId, GapInfo> {
    let mut gaps = BTreeMap::new();

    for (index, current) in permits.iter().enumerate() {
        if current.kind != PermitType::Regular {
            continue;
        }
        let Some(previous) = permits[..index]
            .iter()
            .rev()
            .find(|permit| permit.kind == PermitType::Regular)
        else {
            continue;
        };

        let days = (current.start_date - previous.end_date).num_days() - 1;
        if days <= 0 {
            continue;
        }

        let mut labels = Vec::new();

        let has_temporary = permits.iter().any(|permit| {
            permit.kind == PermitType::Temporary
                && permit.start_date > previous.end_date
                && permit.end_date < current.start_date
        });
        if has_temporary {
            labels.push(config.temporary_gap_label.clone());
        }

        for day in days_between(previous.end_date, current.start_date) {
            if let Some(info) = calendar.lookup(day) {
                if info.is_public_holiday && !labels.contains(&info.name) {
                    labels.push(info.name);
                }
            }
        }

        gaps.insert(current.id, GapInfo { days, labels });
    }

    gaps
}

/// Days strictly between `after` and `before`, ascending.
fn days_between(after: NaiveDate, before: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    after.iter_days().skip(1).take_while(move |day| *day < before)
}
