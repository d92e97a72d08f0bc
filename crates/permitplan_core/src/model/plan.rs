//! Plan snapshot model.
//!
//! # Responsibility
//! - Define the named snapshot of a whole permit list.
//!
//! # Invariants
//! - A plan is an independent copy. Mutations to the active schedule reach
//!   a plan only while that plan is bound, via explicit propagation.
//!
//! # See also
//! - `crate::plans::PlanRegistry` for save/switch/remove semantics.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::permit::Permit;

/// Stable identifier for one saved plan.
pub type PlanId = Uuid;

/// Named snapshot of a whole permit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub permits: Vec<Permit>,
}
