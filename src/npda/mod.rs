//! Depth-first backtracking search for nondeterministic pushdown automata.
//!
//! At a configuration `(state, stack, pos)` the executor tries, in order:
//!
//! 1. every λ-move for `(state, top)`, in declaration order, at `pos`
//! 2. if the input is consumed: accept iff `state` is final
//! 3. otherwise every move for `(state, input[pos], top)`, in declaration
//!    order, at `pos + 1`
//!
//! The first accepting branch ends the search. An empty stack fails only its
//! own branch. The search order is a pure function of the automaton and its
//! rule declaration order, so the reported witness is reproducible.
//!
//! The frontier is an explicit work stack rather than native recursion, so
//! deep searches do not exhaust the call stack. Tasks are pushed in reverse
//! so they pop in exactly the order listed above.
//!
//! A λ-cycle that neither empties the stack nor advances the input makes the
//! baseline search run forever. Bound it with [`SearchLimits::max_steps`] or
//! cut it with [`RevisitPolicy::Prune`](crate::search::RevisitPolicy::Prune).

mod stack;

pub use stack::{Configuration, Stack};

use crate::definition::{PdaMove, PushdownAutomaton, StateId};
use crate::error::{BranchFailure, Result, SimulationError};
use crate::search::{SearchLimits, SearchStats, Verdict};
use crate::trace::{NoTrace, TraceEvent, TraceSink};
use rustc_hash::FxHashSet;

/// The accepting branch reported by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NpdaWitness {
    /// State the branch halted in
    pub state: String,
    /// Final stack contents, bottom-first
    pub stack: String,
    /// Number of moves on the branch
    pub moves: usize,
}

/// Result of an NPDA run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NpdaOutcome {
    /// Accept or reject
    pub verdict: Verdict,
    /// The accepting branch, present iff the verdict is Accept
    pub witness: Option<NpdaWitness>,
    /// Search counters
    pub stats: SearchStats,
}

/// The rule that produced a configuration, kept so the trace event can be
/// emitted when the configuration is actually explored.
struct Fired<'a> {
    from: StateId,
    input: Option<char>,
    top: char,
    mv: &'a PdaMove,
}

enum Task<'a> {
    Explore {
        config: Configuration,
        depth: usize,
        fired: Option<Fired<'a>>,
    },
    Halt {
        config: Configuration,
        depth: usize,
    },
}

/// Executor for a [`PushdownAutomaton`].
#[derive(Debug, Clone, Copy)]
pub struct NpdaExecutor<'a> {
    npda: &'a PushdownAutomaton,
    limits: SearchLimits,
}

impl<'a> NpdaExecutor<'a> {
    /// Create an unbounded executor for `npda`.
    pub fn new(npda: &'a PushdownAutomaton) -> Self {
        Self {
            npda,
            limits: SearchLimits::unbounded(),
        }
    }

    /// Apply search limits.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The initial configuration: initial state, start symbol, position 0.
    pub fn initial_configuration(&self) -> Configuration {
        Configuration {
            state: self.npda.initial(),
            stack: Stack::with_start(self.npda.start_symbol()),
            position: 0,
        }
    }

    /// Decide whether `input` is accepted, without tracing.
    pub fn accepts(&self, input: &str) -> Result<bool> {
        Ok(self.run(input, &mut NoTrace)?.verdict.is_accept())
    }

    /// Search for an accepting branch over `input`.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::UndefinedSymbol`] if `input` contains a symbol
    ///   outside the input alphabet
    /// - [`SimulationError::BudgetExhausted`] if a step budget is set and
    ///   runs out
    pub fn run<S: TraceSink + ?Sized>(&self, input: &str, sink: &mut S) -> Result<NpdaOutcome> {
        let symbols: Vec<char> = input.chars().collect();
        let columns = symbols
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                self.npda
                    .input_column(symbol)
                    .ok_or(SimulationError::UndefinedSymbol { symbol, position })
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut stats = SearchStats::default();
        let mut visited: FxHashSet<Configuration> = FxHashSet::default();
        let mut work: Vec<Task<'a>> = vec![Task::Explore {
            config: self.initial_configuration(),
            depth: 0,
            fired: None,
        }];

        while let Some(task) = work.pop() {
            let (config, depth, fired) = match task {
                Task::Halt { config, depth } => {
                    if self.npda.is_final(config.state) {
                        let witness = NpdaWitness {
                            state: self.state_name(&config),
                            stack: config.stack.to_string(),
                            moves: depth,
                        };
                        log::debug!(
                            "npda accepted in state '{}' with stack '{}' ({} explored)",
                            witness.state,
                            witness.stack,
                            stats.explored
                        );
                        return Ok(NpdaOutcome {
                            verdict: Verdict::Accept,
                            witness: Some(witness),
                            stats,
                        });
                    }
                    self.fail(&config, BranchFailure::NotFinal, sink);
                    continue;
                }
                Task::Explore {
                    config,
                    depth,
                    fired,
                } => (config, depth, fired),
            };

            stats.explore(&self.limits)?;

            if let Some(fired) = fired {
                if sink.enabled() {
                    sink.record(TraceEvent::NpdaRule {
                        from: self.npda.states().name(fired.from).to_string(),
                        input: fired.input,
                        top: fired.top,
                        to: self.state_name(&config),
                        push: fired.mv.push_display(),
                        stack_after: config.stack.to_string(),
                    });
                }
            }

            if self.limits.prunes_revisits() && !visited.insert(config.clone()) {
                stats.pruned += 1;
                self.fail(&config, BranchFailure::Revisited, sink);
                continue;
            }

            let Some(top) = config.stack.top() else {
                self.fail(&config, BranchFailure::StackExhausted, sink);
                continue;
            };
            let top_column = self.npda.stack_column(top).ok_or(SimulationError::UndefinedSymbol {
                symbol: top,
                position: config.position,
            })?;

            let mut next: Vec<Task<'a>> = Vec::new();

            if let Some(moves) = self.npda.moves(config.state, None, top_column) {
                for mv in moves {
                    next.push(Task::Explore {
                        config: config.successor(mv, 0),
                        depth: depth + 1,
                        fired: Some(Fired {
                            from: config.state,
                            input: None,
                            top,
                            mv,
                        }),
                    });
                }
            }

            if config.position == symbols.len() {
                next.push(Task::Halt { config, depth });
            } else {
                let column = columns[config.position];
                if let Some(moves) = self.npda.moves(config.state, Some(column), top_column) {
                    for mv in moves {
                        next.push(Task::Explore {
                            config: config.successor(mv, 1),
                            depth: depth + 1,
                            fired: Some(Fired {
                                from: config.state,
                                input: Some(symbols[config.position]),
                                top,
                                mv,
                            }),
                        });
                    }
                }
                if next.is_empty() {
                    self.fail(&config, BranchFailure::NoRuleDefined, sink);
                }
            }

            work.extend(next.into_iter().rev());
            stats.observe_frontier(work.len());
        }

        log::debug!(
            "npda rejected after exploring {} configurations ({} pruned)",
            stats.explored,
            stats.pruned
        );
        Ok(NpdaOutcome {
            verdict: Verdict::Reject,
            witness: None,
            stats,
        })
    }

    fn state_name(&self, config: &Configuration) -> String {
        self.npda.states().name(config.state).to_string()
    }

    fn fail<S: TraceSink + ?Sized>(&self, config: &Configuration, failure: BranchFailure, sink: &mut S) {
        if sink.enabled() {
            sink.record(TraceEvent::NpdaBranchFailed {
                state: self.state_name(config),
                position: config.position,
                failure,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::RevisitPolicy;
    use crate::trace::VecSink;

    /// aⁿbⁿ, accepting by moving to q1 on an exposed bottom marker.
    fn anbn() -> PushdownAutomaton {
        PushdownAutomaton::builder()
            .states(["q0", "q1"])
            .input_alphabet("ab".chars())
            .stack_alphabet("ZA".chars())
            .start_symbol('Z')
            .initial("q0")
            .finals(["q1"])
            .rule("q0", 'a', 'Z', [("q0", "AZ")])
            .rule("q0", 'a', 'A', [("q0", "AA")])
            .rule("q0", 'b', 'A', [("q0", "~")])
            .rule("q0", '~', 'Z', [("q1", "Z")])
            .build()
            .unwrap()
    }

    #[test]
    fn test_anbn() {
        let npda = anbn();
        let exec = NpdaExecutor::new(&npda);
        assert!(exec.accepts("aabb").unwrap());
        assert!(exec.accepts("").unwrap());
        assert!(!exec.accepts("aab").unwrap());
        assert!(!exec.accepts("abb").unwrap());
        assert!(!exec.accepts("ba").unwrap());
    }

    #[test]
    fn test_witness() {
        let npda = anbn();
        let outcome = NpdaExecutor::new(&npda).run("ab", &mut NoTrace).unwrap();
        assert_eq!(
            outcome.witness,
            Some(NpdaWitness {
                state: "q1".into(),
                stack: "Z".into(),
                moves: 3,
            })
        );
    }

    #[test]
    fn test_lambda_moves_tried_before_input_moves() {
        // Both alternatives accept "a"; the λ branch must win.
        let npda = PushdownAutomaton::builder()
            .states(["q0", "viaLambda", "viaInput"])
            .input_alphabet("a".chars())
            .stack_alphabet("Z".chars())
            .start_symbol('Z')
            .initial("q0")
            .finals(["viaLambda", "viaInput"])
            .rule("q0", 'a', 'Z', [("viaInput", "Z")])
            .rule("q0", '~', 'Z', [("viaLambda", "Z")])
            .rule("viaLambda", 'a', 'Z', [("viaLambda", "Z")])
            .build()
            .unwrap();
        let outcome = NpdaExecutor::new(&npda).run("a", &mut NoTrace).unwrap();
        assert_eq!(outcome.witness.unwrap().state, "viaLambda");
    }

    #[test]
    fn test_declaration_order_picks_witness() {
        let npda = PushdownAutomaton::builder()
            .states(["q0", "first", "second"])
            .input_alphabet("a".chars())
            .stack_alphabet("Z".chars())
            .start_symbol('Z')
            .initial("q0")
            .finals(["first", "second"])
            .rule("q0", 'a', 'Z', [("second", "Z"), ("first", "ZZ")])
            .build()
            .unwrap();
        let outcome = NpdaExecutor::new(&npda).run("a", &mut NoTrace).unwrap();
        assert_eq!(outcome.witness.unwrap().state, "second");
    }

    #[test]
    fn test_stack_exhaustion_fails_only_its_branch() {
        // First alternative pops the bottom marker and dies; second survives.
        let npda = PushdownAutomaton::builder()
            .states(["q0", "q1"])
            .input_alphabet("a".chars())
            .stack_alphabet("Z".chars())
            .start_symbol('Z')
            .initial("q0")
            .finals(["q1"])
            .rule("q0", 'a', 'Z', [("q0", "~"), ("q1", "Z")])
            .build()
            .unwrap();
        let mut sink = VecSink::new();
        let outcome = NpdaExecutor::new(&npda).run("a", &mut sink).unwrap();
        assert_eq!(outcome.verdict, Verdict::Accept);
        assert!(sink.events.iter().any(|e| matches!(
            e,
            TraceEvent::NpdaBranchFailed {
                failure: BranchFailure::StackExhausted,
                ..
            }
        )));
    }

    #[test]
    fn test_undefined_symbol() {
        let npda = anbn();
        assert_eq!(
            NpdaExecutor::new(&npda).run("abx", &mut NoTrace),
            Err(SimulationError::UndefinedSymbol {
                symbol: 'x',
                position: 2
            })
        );
    }

    fn lambda_cycle() -> PushdownAutomaton {
        PushdownAutomaton::builder()
            .states(["q0", "q1"])
            .input_alphabet("a".chars())
            .stack_alphabet("Z".chars())
            .start_symbol('Z')
            .initial("q0")
            .finals(["q1"])
            .rule("q0", '~', 'Z', [("q0", "Z")])
            .build()
            .unwrap()
    }

    #[test]
    fn test_budget_bounds_lambda_cycle() {
        let npda = lambda_cycle();
        let exec = NpdaExecutor::new(&npda).with_limits(SearchLimits::unbounded().with_max_steps(100));
        assert_eq!(
            exec.run("a", &mut NoTrace),
            Err(SimulationError::BudgetExhausted { explored: 100 })
        );
    }

    #[test]
    fn test_prune_cuts_lambda_cycle() {
        let npda = lambda_cycle();
        let exec = NpdaExecutor::new(&npda)
            .with_limits(SearchLimits::unbounded().with_revisit(RevisitPolicy::Prune));
        let outcome = exec.run("a", &mut NoTrace).unwrap();
        assert_eq!(outcome.verdict, Verdict::Reject);
        assert_eq!(outcome.stats.pruned, 1);
    }

    #[test]
    fn test_trace_follows_search_order() {
        let npda = anbn();
        let mut sink = VecSink::new();
        NpdaExecutor::new(&npda).run("ab", &mut sink).unwrap();
        let rules: Vec<String> = sink
            .events
            .iter()
            .filter(|e| matches!(e, TraceEvent::NpdaRule { .. }))
            .map(|e| e.to_string().lines().next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            rules,
            vec![
                "Executing Rule: δ(q0, ε, Z) = (q1, Z)",
                "Executing Rule: δ(q0, a, Z) = (q0, AZ)",
                "Executing Rule: δ(q0, b, A) = (q0, ε)",
                "Executing Rule: δ(q0, ε, Z) = (q1, Z)",
            ]
        );
    }
}
