//! AWS-oriented adapters and handlers for the Minecraft server API.
//!
//! This crate owns runtime integration details (Lambda handlers, instance
//! and DNS provider adapters, bucket reads, and the status probe socket)
//! and exposes a single runtime module boundary for contract, DNS, ping,
//! route, and storage key primitives.
//! See `crates/mc_api_lambda/README.md` for ownership boundaries.

pub mod adapters;
pub mod handlers;
pub mod runtime;
