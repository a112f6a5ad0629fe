//! Object keys for the map archive bucket. The layout under the configured
//! prefix is fixed:
//!
//! ```text
//! {prefix}world_manifest.json          index of all worlds
//! {prefix}{world}/manifest.json        one world's manifest
//! {prefix}{world}/{map}/manifest.json  one map's manifest
//! ```
//!
//! The prefix is concatenated verbatim, so it must carry its own trailing
//! slash (the default is `maps/`).

pub const WORLD_INDEX_FILE: &str = "world_manifest.json";
pub const MANIFEST_FILE: &str = "manifest.json";

pub fn world_index_key(prefix: &str) -> String {
    format!("{prefix}{WORLD_INDEX_FILE}")
}

pub fn world_manifest_key(prefix: &str, world: &str) -> String {
    format!("{prefix}{world}/{MANIFEST_FILE}")
}

pub fn map_manifest_key(prefix: &str, world: &str, map: &str) -> String {
    format!("{prefix}{world}/{map}/{MANIFEST_FILE}")
}
