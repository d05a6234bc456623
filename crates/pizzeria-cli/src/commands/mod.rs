//! CLI command implementations

pub mod completions;
pub mod config;
pub mod offer;
pub mod pizza;
pub mod restaurant;
pub mod seed;
