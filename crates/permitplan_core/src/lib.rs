//! Core engine for the permit schedule planner.
//!
//! # Responsibility
//! - Own every scheduling invariant: conflict-free insertion, round
//!   grouping, gap annotation, the share codec and plan snapshots.
//! - Stay presentation-free; hosts supply calendars, confirmation and
//!   storage through the seams this crate defines.
//!
//! # Invariants
//! - The active permit list is always ordered ascending by start date.
//! - Decoding persisted or shared input never fails; it degrades to an
//!   empty schedule.

pub mod config;
pub mod db;
pub mod holiday;
pub mod logging;
pub mod model;
pub mod plans;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod share;

pub use config::EngineConfig;
pub use holiday::{HolidayCalendar, HolidayInfo, NoHolidays, StaticHolidayCalendar};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::permit::{Permit, PermitId, PermitType};
pub use model::plan::{Plan, PlanId};
pub use plans::{PlanRegistry, PlanRegistryError, PlanRegistryResult};
pub use repo::kv::{KvRepository, MemoryKvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use schedule::gaps::{annotate_gaps, GapInfo};
pub use schedule::rounds::{group_by_round, Round};
pub use schedule::store::{InsertOutcome, PermitStore};
pub use service::confirm::{ApproveAll, ConfirmationGate, DestructiveAction};
pub use service::schedule_service::{ScheduleService, ServiceError, ServiceResult, YearOverview};
pub use share::{decode_permits, encode_permits};

/// Returns the engine crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
