//! λ-closure of a state set.

use crate::definition::{FiniteAutomaton, StateSet};
use crate::trace::{TraceEvent, TraceSink};
use std::collections::VecDeque;

/// Every state reachable from `set` using only λ-moves, `set` included.
///
/// This is the least fixpoint of `S ↦ S ∪ λ(S)`, so the result always
/// contains `set` and `lambda_closure(lambda_closure(S)) == lambda_closure(S)`.
///
/// States are processed first-in-first-out in set order, and each state's
/// λ-cell fires at most once, so the emitted trace is reproducible.
pub fn lambda_closure<S>(nfa: &FiniteAutomaton, set: &StateSet, sink: &mut S) -> StateSet
where
    S: TraceSink + ?Sized,
{
    let mut closed = set.clone();
    let mut pending: VecDeque<_> = set.iter().copied().collect();

    while let Some(state) = pending.pop_front() {
        let Some(targets) = nfa.lambda_targets(state) else {
            continue;
        };

        if sink.enabled() {
            sink.record(TraceEvent::NfaRule {
                from: nfa.states().name(state).to_string(),
                symbol: None,
                targets: nfa.states().names_of(targets),
            });
        }

        for &target in targets {
            if closed.insert(target) {
                pending.push_back(target);
            }
        }
    }

    closed
}
