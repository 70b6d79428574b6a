//! Command implementations

pub mod config;
pub mod plan;
pub mod provision;
pub mod render;
pub mod version;
