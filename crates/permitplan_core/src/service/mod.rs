//! Use-case services orchestrating the scheduling core and persistence.

pub mod confirm;
pub mod schedule_service;
