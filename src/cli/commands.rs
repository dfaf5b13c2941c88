//! CLI command implementations

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::cfg::{CfgOutcome, DerivationSearch};
use crate::definition::{FiniteAutomaton, Grammar, PushdownAutomaton};
use crate::description::{parse_input, read_data_file, Description};
use crate::nfa::{NfaOutcome, NfaSimulator};
use crate::npda::{NpdaExecutor, NpdaOutcome};
use crate::search::{RevisitPolicy, Verdict};
use crate::trace::{LogSink, NoTrace, TraceEvent, TraceSink, VecSink};

use super::args::{Cli, Commands, RunArgs};
use super::paths::SimulatorConfig;

/// Execute a CLI command.
///
/// Returns the verdict of a simulation command, or `None` for commands
/// that do not simulate anything.
pub fn execute(cli: Cli) -> Result<Option<Verdict>> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Nfa(args) => cmd_nfa(&args, config_path).map(Some),
        Commands::Npda(args) => cmd_npda(&args, config_path).map(Some),
        Commands::Cfg(args) => cmd_cfg(&args, config_path).map(Some),
        Commands::Settings {
            set_max_steps,
            clear_max_steps,
            set_revisit,
            set_trace,
            reset,
        } => cmd_settings(
            config_path,
            set_max_steps,
            clear_max_steps,
            set_revisit,
            set_trace,
            reset,
        )
        .map(|()| None),
    }
}

/// Everything a simulation command needs besides the definition.
struct Run {
    input: String,
    config: SimulatorConfig,
    json: bool,
    sink: VecSink,
}

impl Run {
    fn prepare(args: &RunArgs, config_path: Option<&Path>) -> Result<Self> {
        let stored = SimulatorConfig::load_from(config_path)?;
        let config = stored.merge_with_cli(
            args.trace.then_some(true),
            args.max_steps,
            args.prune_revisits.then_some(RevisitPolicy::Prune),
        );

        let input = match (&args.input, &args.data) {
            (Some(input), _) => parse_input(input),
            (None, Some(path)) => read_data_file(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))?,
            (None, None) => anyhow::bail!("Input/Input-File required"),
        };

        log::debug!(
            "running {} with {} input symbol(s), limits {:?}",
            args.desc.display(),
            input.chars().count(),
            config.limits()
        );

        Ok(Self {
            input,
            config,
            json: args.json,
            sink: VecSink::new(),
        })
    }

    /// Sink for this run: collected when tracing is on, otherwise forwarded
    /// to the logger when trace logging is enabled.
    fn sink(&mut self) -> Box<dyn TraceSink + '_> {
        if self.config.trace_enabled() {
            Box::new(&mut self.sink)
        } else if LogSink.enabled() {
            Box::new(LogSink)
        } else {
            Box::new(NoTrace)
        }
    }

    fn print_trace(&self) {
        for event in &self.sink.events {
            println!("{}", event);
        }
    }

    fn print_json<T: Serialize>(&self, outcome: &T) -> Result<()> {
        let trace: Option<&[TraceEvent]> = self
            .config
            .trace_enabled()
            .then_some(self.sink.events.as_slice());
        let report = serde_json::json!({
            "outcome": outcome,
            "trace": trace,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

fn load<D: Description>(args: &RunArgs) -> Result<D> {
    D::load(&args.desc)
        .with_context(|| format!("Failed to load description: {}", args.desc.display()))
}

fn warn_incomplete(kind: &str) {
    eprintln!(
        "{}: Incomplete specification of {}. One or more rules are undefined.",
        "Warning".yellow().bold(),
        kind
    );
}

fn print_verdict(verdict: Verdict, detail: &str) {
    let label = match verdict {
        Verdict::Accept => "String accepted".green().bold(),
        Verdict::Reject => "String rejected".red().bold(),
    };
    println!("{}: {}", label, detail);
}

/// NFA command
fn cmd_nfa(args: &RunArgs, config_path: Option<&Path>) -> Result<Verdict> {
    let nfa: FiniteAutomaton = load(args)?;
    if !nfa.is_complete() {
        warn_incomplete("NFA");
    }

    let mut run = Run::prepare(args, config_path)?;
    let input = run.input.clone();
    let outcome: NfaOutcome = NfaSimulator::new(&nfa).run(&input, &mut *run.sink())?;

    if run.json {
        run.print_json(&outcome)?;
        return Ok(outcome.verdict);
    }

    run.print_trace();
    match &outcome.halting_state {
        Some(state) => print_verdict(
            outcome.verdict,
            &format!("NFA halted in state '{}'", state.cyan()),
        ),
        None => print_verdict(
            outcome.verdict,
            &format!(
                "NFA halted in states: {}",
                crate::definition::render_names(&outcome.active)
            ),
        ),
    }
    Ok(outcome.verdict)
}

/// NPDA command
fn cmd_npda(args: &RunArgs, config_path: Option<&Path>) -> Result<Verdict> {
    let npda: PushdownAutomaton = load(args)?;
    if !npda.is_complete() {
        warn_incomplete("NPDA");
    }

    let mut run = Run::prepare(args, config_path)?;
    let input = run.input.clone();
    let limits = run.config.limits();
    let outcome: NpdaOutcome = NpdaExecutor::new(&npda)
        .with_limits(limits)
        .run(&input, &mut *run.sink())?;

    if run.json {
        run.print_json(&outcome)?;
        return Ok(outcome.verdict);
    }

    run.print_trace();
    match &outcome.witness {
        Some(witness) => {
            print_verdict(
                outcome.verdict,
                &format!("NPDA halted in state '{}'", witness.state.cyan()),
            );
            println!("Stack Contents: {}", witness.stack);
        }
        None => print_verdict(outcome.verdict, "no branch of the NPDA accepts the input"),
    }
    println!(
        "{} configurations explored, {} pruned",
        outcome.stats.explored, outcome.stats.pruned
    );
    Ok(outcome.verdict)
}

/// CFG command
fn cmd_cfg(args: &RunArgs, config_path: Option<&Path>) -> Result<Verdict> {
    let grammar: Grammar = load(args)?;

    let mut run = Run::prepare(args, config_path)?;
    let input = run.input.clone();
    let limits = run.config.limits();
    // Text output prints the derivation itself rather than its events.
    let outcome: CfgOutcome = DerivationSearch::new(&grammar)
        .with_limits(limits)
        .run(&input, &mut *run.sink())?;

    if run.json {
        run.print_json(&outcome)?;
        return Ok(outcome.verdict);
    }

    match &outcome.derivation {
        Some(derivation) => {
            println!(
                "{}",
                "The string can be derived from the given CFG".green().bold()
            );
            if run.config.trace_enabled() {
                println!("Derivation:");
                println!("{}", derivation);
            }
        }
        None => println!(
            "{}",
            "The given string does not belong to the language specified by the given CFG"
                .red()
                .bold()
        ),
    }
    Ok(outcome.verdict)
}

/// Settings command
fn cmd_settings(
    config_path: Option<&Path>,
    set_max_steps: Option<usize>,
    clear_max_steps: bool,
    set_revisit: Option<RevisitPolicy>,
    set_trace: Option<bool>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = SimulatorConfig::default();
        config.save_to(config_path)?;
        println!("{}", "Configuration reset to defaults".green().bold());
        println!();
        print_config(&config);
        return Ok(());
    }

    let mut config = SimulatorConfig::load_from(config_path)?;
    let mut changed = false;

    if let Some(max_steps) = set_max_steps {
        config.max_steps = Some(max_steps);
        println!("  Set default step budget: {}", max_steps.to_string().green());
        changed = true;
    }

    if clear_max_steps {
        config.max_steps = None;
        println!("  Removed default step budget");
        changed = true;
    }

    if let Some(revisit) = set_revisit {
        config.revisit = Some(revisit);
        println!("  Set default revisit policy: {}", format!("{:?}", revisit).green());
        changed = true;
    }

    if let Some(trace) = set_trace {
        config.trace = Some(trace);
        println!("  Set default tracing: {}", trace.to_string().green());
        changed = true;
    }

    if changed {
        config.save_to(config_path)?;
        println!();
        println!("{}", "Configuration saved".green().bold());
    }

    println!();
    print_config(&config);
    Ok(())
}

fn print_config(config: &SimulatorConfig) {
    println!("{}", "Current configuration:".bold());
    println!("  trace:     {}", config.trace_enabled());
    println!(
        "  max steps: {}",
        config
            .max_steps
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );
    println!("  revisit:   {:?}", config.revisit.unwrap_or_default());
}
