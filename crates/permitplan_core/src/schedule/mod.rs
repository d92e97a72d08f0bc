//! Scheduling core: the permit store plus the pure derivations over it.

pub mod gaps;
pub mod rounds;
pub mod store;
