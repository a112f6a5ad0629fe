//! Shared control-plane domain primitives.
//!
//! This crate owns the request/response contracts, DNS reconciliation
//! decisions, route tables, storage key layout, manifest projection, and the
//! Server List Ping wire primitives. It intentionally excludes AWS SDK,
//! Lambda runtime, and socket concerns.
//! See `crates/mc_api_core/README.md` for ownership boundaries.

pub mod contract;
pub mod dns;
pub mod ping;
pub mod routes;
pub mod storage_keys;
pub mod worlds;
