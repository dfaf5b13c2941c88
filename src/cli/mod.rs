//! CLI interface for automata-sim
//!
//! Loads a description, runs the matching simulator and reports the verdict.

pub mod args;
pub mod commands;
pub mod paths;

pub use args::{Cli, Commands, RunArgs};
pub use paths::{config_dir, SimulatorConfig};
