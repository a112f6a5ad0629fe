pub mod compute;
pub mod dns;
pub mod object_store;
pub mod status_probe;
