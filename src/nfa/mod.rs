//! Subset simulation of nondeterministic finite automata.
//!
//! The simulator keeps the set of active states. Before the first symbol
//! and after every symbol the set is λ-closed, so an empty input is decided
//! by the closure of `{initial}` alone. Because the result is the union of
//! every branch, no tie-break is needed: the outcome is fully deterministic.

mod closure;

pub use closure::lambda_closure;

use crate::definition::{FiniteAutomaton, StateSet};
use crate::error::{Result, SimulationError};
use crate::search::Verdict;
use crate::trace::{NoTrace, TraceEvent, TraceSink};

/// Result of an NFA run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NfaOutcome {
    /// Accept or reject
    pub verdict: Verdict,
    /// The closed active-state set after the whole input, in state order
    pub active: Vec<String>,
    /// First final state in `active`, if any
    pub halting_state: Option<String>,
}

/// Simulator for a [`FiniteAutomaton`].
#[derive(Debug, Clone, Copy)]
pub struct NfaSimulator<'a> {
    nfa: &'a FiniteAutomaton,
}

impl<'a> NfaSimulator<'a> {
    /// Create a simulator for `nfa`.
    pub fn new(nfa: &'a FiniteAutomaton) -> Self {
        Self { nfa }
    }

    /// The closed start set, `closure({initial})`.
    pub fn start<S: TraceSink + ?Sized>(&self, sink: &mut S) -> StateSet {
        lambda_closure(self.nfa, &StateSet::from([self.nfa.initial()]), sink)
    }

    /// Consume `symbol` from the closed set `active`, returning the closed
    /// successor set.
    ///
    /// `position` is only used to locate an [`SimulationError::UndefinedSymbol`]
    /// fault. Cells without a rule contribute nothing.
    pub fn step<S: TraceSink + ?Sized>(
        &self,
        active: &StateSet,
        symbol: char,
        position: usize,
        sink: &mut S,
    ) -> Result<StateSet> {
        let column = self
            .nfa
            .column(symbol)
            .ok_or(SimulationError::UndefinedSymbol { symbol, position })?;

        let mut next = StateSet::new();
        for &state in active {
            let Some(targets) = self.nfa.targets(state, column) else {
                continue;
            };
            if sink.enabled() {
                sink.record(TraceEvent::NfaRule {
                    from: self.nfa.states().name(state).to_string(),
                    symbol: Some(symbol),
                    targets: self.nfa.states().names_of(targets),
                });
            }
            next.extend(targets.iter().copied());
        }

        Ok(lambda_closure(self.nfa, &next, sink))
    }

    /// Decide whether `input` is accepted, without tracing.
    pub fn accepts(&self, input: &str) -> Result<bool> {
        Ok(self.run(input, &mut NoTrace)?.verdict.is_accept())
    }

    /// Run the automaton over `input`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::UndefinedSymbol`] if `input` contains a symbol
    /// outside the input alphabet.
    pub fn run<S: TraceSink + ?Sized>(&self, input: &str, sink: &mut S) -> Result<NfaOutcome> {
        let mut active = self.start(sink);
        for (position, symbol) in input.chars().enumerate() {
            active = self.step(&active, symbol, position, sink)?;
        }

        let halting_state = active
            .iter()
            .find(|&&state| self.nfa.is_final(state))
            .map(|&state| self.nfa.states().name(state).to_string());
        let verdict = if halting_state.is_some() {
            Verdict::Accept
        } else {
            Verdict::Reject
        };

        log::debug!(
            "nfa run over {} symbol(s) {}: active = {}",
            input.chars().count(),
            verdict,
            self.nfa.states().render_set(&active)
        );

        Ok(NfaOutcome {
            verdict,
            active: self.nfa.states().names_of(&active),
            halting_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::VecSink;

    fn ends_with_a() -> FiniteAutomaton {
        FiniteAutomaton::builder()
            .states(["q0", "q1"])
            .alphabet("ab".chars())
            .initial("q0")
            .finals(["q1"])
            .rule("q0", 'a', ["q0", "q1"])
            .rule("q0", 'b', ["q0"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_accepts_and_rejects() {
        let nfa = ends_with_a();
        let sim = NfaSimulator::new(&nfa);
        assert!(sim.accepts("ba").unwrap());
        assert!(!sim.accepts("ab").unwrap());
        assert!(!sim.accepts("").unwrap());
    }

    #[test]
    fn test_outcome_reports_active_set() {
        let nfa = ends_with_a();
        let outcome = NfaSimulator::new(&nfa).run("ba", &mut NoTrace).unwrap();
        assert_eq!(outcome.verdict, Verdict::Accept);
        assert_eq!(outcome.active, vec!["q0", "q1"]);
        assert_eq!(outcome.halting_state.as_deref(), Some("q1"));
    }

    #[test]
    fn test_dead_set_stays_dead() {
        let nfa = ends_with_a();
        let sim = NfaSimulator::new(&nfa);
        let q1 = StateSet::from([nfa.states().resolve("q1").unwrap()]);
        let next = sim.step(&q1, 'a', 0, &mut NoTrace).unwrap();
        assert!(next.is_empty());
    }

    #[test]
    fn test_undefined_symbol_is_a_fault() {
        let nfa = ends_with_a();
        let result = NfaSimulator::new(&nfa).run("abc", &mut NoTrace);
        assert_eq!(
            result,
            Err(SimulationError::UndefinedSymbol {
                symbol: 'c',
                position: 2
            })
        );
    }

    #[test]
    fn test_lambda_moves_before_and_after_symbols() {
        // q0 -λ-> q1 -a-> q2 -λ-> q3 (final)
        let nfa = FiniteAutomaton::builder()
            .states(["q0", "q1", "q2", "q3"])
            .alphabet("a".chars())
            .initial("q0")
            .finals(["q3"])
            .rule("q0", '~', ["q1"])
            .rule("q1", 'a', ["q2"])
            .rule("q2", '~', ["q3"])
            .build()
            .unwrap();
        let mut sink = VecSink::new();
        let outcome = NfaSimulator::new(&nfa).run("a", &mut sink).unwrap();
        assert_eq!(outcome.verdict, Verdict::Accept);
        assert_eq!(sink.events.len(), 3);
    }

    #[test]
    fn test_empty_input_uses_start_closure() {
        let nfa = FiniteAutomaton::builder()
            .states(["q0", "q1"])
            .alphabet("a".chars())
            .initial("q0")
            .finals(["q1"])
            .rule("q0", '~', ["q1"])
            .build()
            .unwrap();
        assert!(NfaSimulator::new(&nfa).accepts("").unwrap());
    }
}
