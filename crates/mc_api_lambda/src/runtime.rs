//! Single import boundary for the domain primitives shared with
//! `mc_api_core`. Handlers and binaries reach the core crate through this
//! module only, so the dependency surface stays visible in one place.

pub use mc_api_core::contract;
pub use mc_api_core::dns;
pub use mc_api_core::ping;
pub use mc_api_core::routes;
pub use mc_api_core::storage_keys;
pub use mc_api_core::worlds;
