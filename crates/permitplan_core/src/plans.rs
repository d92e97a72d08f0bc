//! Saved plans and active-plan binding.
//!
//! # Responsibility
//! - Keep the saved plan snapshots and the optional binding between one
//!   plan and the active schedule.
//! - Serialize the registry to and from the persisted plans array.
//!
//! # Invariants
//! - Plan ids are unique within the registry.
//! - Removing the bound plan unbinds; the active permits stay untouched.
//! - The binding is runtime state only and is never persisted, so a
//!   fresh load always starts unbound.
//!
//! # See also
//! - `crate::service::schedule_service` for bound-plan propagation on
//!   every store mutation.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use uuid::Uuid;

use crate::config::EngineConfig;
use crate::model::legacy::LegacyPlanRecord;
use crate::model::permit::Permit;
use crate::model::plan::{Plan, PlanId};

pub type PlanRegistryResult<T> = Result<T, PlanRegistryError>;

/// Errors from plan registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRegistryError {
    /// The referenced plan id is not in the registry.
    PlanNotFound(PlanId),
}

impl Display for PlanRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlanNotFound(plan_id) => write!(f, "plan not found: {plan_id}"),
        }
    }
}

impl Error for PlanRegistryError {}

/// Registry of saved plans plus the optional bound plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanRegistry {
    plans: Vec<Plan>,
    active_plan_id: Option<PlanId>,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved plans in save order.
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Looks up one plan by id.
    pub fn get(&self, plan_id: PlanId) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }

    /// Currently bound plan id, if any.
    pub fn active_plan_id(&self) -> Option<PlanId> {
        self.active_plan_id
    }

    /// Saves `permits` as a new auto-named plan and binds it.
    pub fn save_as_new_plan(&mut self, permits: &[Permit], config: &EngineConfig) -> Plan {
        let plan = Plan {
            id: Uuid::new_v4(),
            name: format!("{} {}", config.plan_name_prefix, self.plans.len() + 1),
            permits: permits.to_vec(),
        };
        self.plans.push(plan.clone());
        self.active_plan_id = Some(plan.id);
        plan
    }

    /// Binds `plan_id` and returns its snapshot for the caller to adopt
    /// wholesale.
    pub fn switch_to(&mut self, plan_id: PlanId) -> PlanRegistryResult<Vec<Permit>> {
        let plan = self
            .get(plan_id)
            .ok_or(PlanRegistryError::PlanNotFound(plan_id))?;
        let permits = plan.permits.clone();
        self.active_plan_id = Some(plan_id);
        Ok(permits)
    }

    /// Removes one plan. Removing the bound plan unbinds first.
    pub fn remove(&mut self, plan_id: PlanId) -> PlanRegistryResult<Plan> {
        let index = self
            .plans
            .iter()
            .position(|plan| plan.id == plan_id)
            .ok_or(PlanRegistryError::PlanNotFound(plan_id))?;
        if self.active_plan_id == Some(plan_id) {
            self.active_plan_id = None;
        }
        Ok(self.plans.remove(index))
    }

    /// Detaches the binding without touching any snapshot.
    pub fn unbind(&mut self) {
        self.active_plan_id = None;
    }

    /// Propagates the active permit list into the bound plan's snapshot.
    ///
    /// Returns whether a bound plan received the update.
    pub fn sync_bound(&mut self, permits: &[Permit]) -> bool {
        let Some(active_id) = self.active_plan_id else {
            return false;
        };
        match self.plans.iter_mut().find(|plan| plan.id == active_id) {
            Some(plan) => {
                plan.permits = permits.to_vec();
                true
            }
            None => false,
        }
    }

    /// Serializes the saved plans to the persisted JSON array.
    pub fn to_stored_json(&self) -> String {
        serde_json::to_string(&self.plans).unwrap_or_else(|_| "[]".to_string())
    }

    /// Rebuilds a registry from the persisted JSON array.
    ///
    /// Tolerates records written by earlier releases. Unreadable input
    /// yields `None` so callers can degrade to an empty registry.
    pub fn from_stored_json(input: &str, config: &EngineConfig) -> Option<Self> {
        let records = serde_json::from_str::<Vec<LegacyPlanRecord>>(input.trim()).ok()?;
        let plans = records
            .into_iter()
            .map(|record| record.migrate(config))
            .collect();
        Some(Self {
            plans,
            active_plan_id: None,
        })
    }
}
