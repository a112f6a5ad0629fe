pub mod control;
pub mod details;
pub mod gateway;
pub mod worlds;
