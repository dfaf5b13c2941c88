//! CLI argument definitions

use crate::search::RevisitPolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "automata-sim")]
#[command(about = "Simulate nondeterministic automata and context-free grammars")]
#[command(version)]
pub struct Cli {
    /// Custom configuration file path
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Log search progress (repeat for fired-rule logging)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate a nondeterministic finite automaton
    Nfa(RunArgs),

    /// Simulate a nondeterministic pushdown automaton
    Npda(RunArgs),

    /// Search for a derivation in a context-free grammar
    Cfg(RunArgs),

    /// Show or change persistent settings
    Settings {
        /// Set the default step budget
        #[arg(long)]
        set_max_steps: Option<usize>,

        /// Remove the default step budget
        #[arg(long, conflicts_with = "set_max_steps")]
        clear_max_steps: bool,

        /// Set the default revisit policy (explore or prune)
        #[arg(long)]
        set_revisit: Option<RevisitPolicy>,

        /// Set whether rule traces are printed by default
        #[arg(long)]
        set_trace: Option<bool>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Arguments shared by the three simulators.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Description file
    pub desc: PathBuf,

    /// Input string (`~` for the empty string)
    #[arg(short, long, conflicts_with = "data", required_unless_present = "data")]
    pub input: Option<String>,

    /// Read the input string from a file (whitespace is ignored)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Print every fired rule
    #[arg(short, long)]
    pub trace: bool,

    /// Abort after exploring this many configurations
    #[arg(short = 'm', long)]
    pub max_steps: Option<usize>,

    /// Skip configurations and sentential forms that were already seen
    #[arg(short = 'p', long)]
    pub prune_revisits: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}
