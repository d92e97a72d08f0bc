//! Persistence contracts and their implementations.

pub mod kv;
