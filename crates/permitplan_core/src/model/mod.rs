//! Domain model types shared across the engine.

pub(crate) mod legacy;
pub mod permit;
pub mod plan;
