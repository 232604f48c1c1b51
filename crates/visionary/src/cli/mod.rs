//! CLI command implementations.

pub mod config;
pub mod interactive;
pub mod run;
