//! Engine configuration.
//!
//! # Responsibility
//! - Own every externalized constant shared across engine components.
//! - Keep storage keys, span lengths and display markers in one place so
//!   callers never hard-code them twice.
//!
//! # Invariants
//! - Span lengths are whole days and never zero.
//! - `round_size` counts Regular permits only; Temporary permits never
//!   consume round capacity.
//!
//! # See also
//! - `crate::schedule::store` consumes the span lengths.
//! - `crate::service::schedule_service` consumes the storage keys.

use crate::model::permit::PermitType;

/// Storage key holding the encoded active schedule.
pub const DEFAULT_SCHEDULE_KEY: &str = "jjz-schedule-permits";

/// Storage key holding the saved plans array.
pub const DEFAULT_PLANS_KEY: &str = "jjz-schedule-plans";

/// Engine-wide configuration.
///
/// Components receive this by reference instead of reading global state,
/// which keeps tests free to shrink spans or rename storage keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Length of one Regular permit in days (inclusive interval length).
    pub regular_duration_days: u32,
    /// Length of one Temporary permit in days (inclusive interval length).
    pub temporary_duration_days: u32,
    /// Number of Regular permits that fills one round.
    pub round_size: usize,
    /// Key-value entry holding the encoded active schedule.
    pub schedule_key: String,
    /// Key-value entry holding the saved plans array.
    pub plans_key: String,
    /// Gap label marking a covered stretch of temporary plates.
    pub temporary_gap_label: String,
    /// Delimiter joining gap labels for display.
    pub gap_label_delimiter: String,
    /// Prefix for auto-generated plan names.
    pub plan_name_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            regular_duration_days: 7,
            temporary_duration_days: 15,
            round_size: 12,
            schedule_key: DEFAULT_SCHEDULE_KEY.to_string(),
            plans_key: DEFAULT_PLANS_KEY.to_string(),
            temporary_gap_label: "临牌".to_string(),
            gap_label_delimiter: "&".to_string(),
            plan_name_prefix: "方案".to_string(),
        }
    }
}

impl EngineConfig {
    /// Returns the configured span length in days for one permit kind.
    pub fn duration_days(&self, kind: PermitType) -> u32 {
        match kind {
            PermitType::Regular => self.regular_duration_days,
            PermitType::Temporary => self.temporary_duration_days,
        }
    }
}
