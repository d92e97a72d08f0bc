//! Schedule use-case service.
//!
//! # Responsibility
//! - Orchestrate store mutations, plan snapshots and persistence behind
//!   one facade.
//! - Derive the per-year presentation model (rounds plus gaps).
//!
//! # Invariants
//! - Every mutating call persists the schedule and the plans array
//!   before returning.
//! - Store mutations propagate into the bound plan's snapshot.
//! - Corrupt persisted state degrades to empty on load, never to an
//!   error; only repository transport failures surface as `Err`.
//!
//! # See also
//! - `crate::schedule` for the pure core this service drives.
//! - `crate::service::confirm` for the destructive-action gate.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use log::{info, warn};

use crate::config::EngineConfig;
use crate::holiday::HolidayCalendar;
use crate::model::permit::{Permit, PermitId, PermitType};
use crate::model::plan::{Plan, PlanId};
use crate::plans::{PlanRegistry, PlanRegistryError};
use crate::repo::kv::{KvRepository, RepoError};
use crate::schedule::gaps::{annotate_gaps, GapInfo};
use crate::schedule::rounds::{group_by_round, Round};
use crate::schedule::store::{InsertOutcome, PermitStore};
use crate::service::confirm::{ConfirmationGate, DestructiveAction};
use crate::share::{decode_permits, encode_permits};

/// Result type used by schedule service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from schedule service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Plan registry rejection.
    PlanRegistry(PlanRegistryError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::PlanRegistry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::PlanRegistry(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PlanRegistryError> for ServiceError {
    fn from(value: PlanRegistryError) -> Self {
        Self::PlanRegistry(value)
    }
}

/// Per-year presentation model for display and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearOverview {
    pub year: i32,
    /// Rounds in chronological order.
    pub rounds: Vec<Round>,
    /// Gap annotations keyed by the id of the later Regular permit.
    pub gaps: BTreeMap<PermitId, GapInfo>,
    /// Regular permits starting in this year, i.e. the consumed quota.
    pub regular_count: usize,
}

/// Use-case facade owning the active store, saved plans and persistence.
pub struct ScheduleService<R: KvRepository> {
    config: EngineConfig,
    repo: R,
    store: PermitStore,
    plans: PlanRegistry,
}

impl<R: KvRepository> ScheduleService<R> {
    /// Creates a service with empty state; call [`Self::load`] to read
    /// persisted data.
    pub fn new(repo: R, config: EngineConfig) -> Self {
        Self {
            config,
            repo,
            store: PermitStore::new(),
            plans: PlanRegistry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying repository, mainly for host-side diagnostics.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Active permits, ascending by start date.
    pub fn permits(&self) -> &[Permit] {
        self.store.permits()
    }

    /// Saved plans in save order.
    pub fn plans(&self) -> &[Plan] {
        self.plans.plans()
    }

    /// Bound plan id, if the active schedule tracks a saved plan.
    pub fn active_plan_id(&self) -> Option<PlanId> {
        self.plans.active_plan_id()
    }

    /// Loads the persisted schedule and plans.
    ///
    /// Unreadable entries degrade to empty state; the binding always
    /// starts detached.
    pub fn load(&mut self) -> ServiceResult<()> {
        let permits = match self.repo.get(&self.config.schedule_key)? {
            Some(value) => decode_permits(&value, &self.config),
            None => Vec::new(),
        };
        self.store.replace_all(permits);

        self.plans = match self.repo.get(&self.config.plans_key)? {
            Some(value) => match PlanRegistry::from_stored_json(&value, &self.config) {
                Some(registry) => registry,
                None => {
                    warn!("event=plans_load module=service status=degraded reason=unreadable_entry");
                    PlanRegistry::new()
                }
            },
            None => PlanRegistry::new(),
        };

        info!(
            "event=schedule_load module=service status=ok permits={} plans={}",
            self.store.len(),
            self.plans.len()
        );
        Ok(())
    }

    /// Places a permit, resolving same-kind conflicts, and persists.
    pub fn insert_permit(
        &mut self,
        start_date: NaiveDate,
        kind: PermitType,
    ) -> ServiceResult<InsertOutcome> {
        let outcome = self.store.insert(start_date, kind, &self.config);
        match &outcome {
            InsertOutcome::Placed { permit, evicted } => info!(
                "event=permit_insert module=service status=placed id={} start={} evicted={}",
                permit.id,
                permit.start_date,
                evicted.len()
            ),
            InsertOutcome::Removed { permit } => info!(
                "event=permit_insert module=service status=toggled_off id={} start={}",
                permit.id, permit.start_date
            ),
        }
        self.persist()?;
        Ok(outcome)
    }

    /// Removes one permit by id and persists; `None` when the id is
    /// unknown.
    pub fn remove_permit(&mut self, id: PermitId) -> ServiceResult<Option<Permit>> {
        let removed = self.store.remove(id);
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Deletes every permit of one round in `year` and persists.
    ///
    /// Returns the removed permits; an out-of-range round index removes
    /// nothing.
    pub fn remove_round(&mut self, year: i32, round_index: usize) -> ServiceResult<Vec<Permit>> {
        let year_permits = self.store.permits_starting_in(year);
        let rounds = group_by_round(&year_permits, &self.config);
        let Some(round) = rounds.get(round_index) else {
            return Ok(Vec::new());
        };

        let ids: Vec<PermitId> = round.permits().iter().map(|permit| permit.id).collect();
        let removed = self.store.remove_all(&ids);
        if !removed.is_empty() {
            info!(
                "event=round_remove module=service status=ok year={year} round={round_index} removed={}",
                removed.len()
            );
            self.persist()?;
        }
        Ok(removed)
    }

    /// Removes every permit after external confirmation.
    ///
    /// Returns `false` without touching any state when the gate declines.
    pub fn clear_all(&mut self, gate: &dyn ConfirmationGate) -> ServiceResult<bool> {
        if !gate.confirm(DestructiveAction::ClearAll) {
            info!("event=clear_all module=service status=declined");
            return Ok(false);
        }
        self.store.clear();
        self.persist()?;
        info!("event=clear_all module=service status=ok");
        Ok(true)
    }

    /// Saves the active permits as a new bound plan and persists.
    pub fn save_as_new_plan(&mut self) -> ServiceResult<Plan> {
        let plan = self.plans.save_as_new_plan(self.store.permits(), &self.config);
        self.persist()?;
        info!(
            "event=plan_save module=service status=ok plan_id={} permits={}",
            plan.id,
            plan.permits.len()
        );
        Ok(plan)
    }

    /// Switches the active schedule to a saved plan wholesale and binds it.
    pub fn switch_plan(&mut self, plan_id: PlanId) -> ServiceResult<()> {
        let permits = self.plans.switch_to(plan_id)?;
        self.store.replace_all(permits);
        self.persist()?;
        info!("event=plan_switch module=service status=ok plan_id={plan_id}");
        Ok(())
    }

    /// Deletes one saved plan after external confirmation.
    ///
    /// Returns `false` without touching any state when the gate declines.
    /// Deleting the bound plan unbinds the active schedule, which keeps
    /// its permits.
    pub fn remove_plan(
        &mut self,
        plan_id: PlanId,
        gate: &dyn ConfirmationGate,
    ) -> ServiceResult<bool> {
        if !gate.confirm(DestructiveAction::RemovePlan) {
            info!("event=plan_remove module=service status=declined plan_id={plan_id}");
            return Ok(false);
        }
        self.plans.remove(plan_id)?;
        self.persist()?;
        info!("event=plan_remove module=service status=ok plan_id={plan_id}");
        Ok(true)
    }

    /// Detaches the active schedule from its bound plan, keeping permits.
    ///
    /// The binding is runtime state, so nothing needs persisting.
    pub fn unbind_plan(&mut self) {
        self.plans.unbind();
    }

    /// Derives the per-year presentation model.
    pub fn year_overview(&self, year: i32, calendar: &dyn HolidayCalendar) -> YearOverview {
        let year_permits = self.store.permits_starting_in(year);
        let rounds = group_by_round(&year_permits, &self.config);
        let gaps = annotate_gaps(&year_permits, calendar, &self.config);
        let regular_count = year_permits
            .iter()
            .filter(|permit| permit.kind == PermitType::Regular)
            .count();
        YearOverview {
            year,
            rounds,
            gaps,
            regular_count,
        }
    }

    /// Current share code; `filter_year` restricts it to one year.
    pub fn share_code(&self, filter_year: Option<i32>) -> String {
        encode_permits(self.store.permits(), filter_year)
    }

    /// Writes the encoded schedule and the plans array, propagating the
    /// store into the bound plan first.
    fn persist(&mut self) -> ServiceResult<()> {
        self.plans.sync_bound(self.store.permits());
        let encoded = encode_permits(self.store.permits(), None);
        self.repo.set(&self.config.schedule_key, &encoded)?;
        self.repo.set(&self.config.plans_key, &self.plans.to_stored_json())?;
        Ok(())
    }
}
