//! Breadth-first membership search over sentential forms.
//!
//! The root of the search is the bare start variable. A form with no
//! variables is a leaf and is compared with the target when it is dequeued.
//! Any other form is expanded into one child per (variable occurrence,
//! production for that variable) pair, scanning occurrences left to right
//! and productions in declaration order.
//!
//! A child whose terminal count already exceeds the target length is
//! dropped: productions never remove a terminal once placed. Because the
//! frontier is strictly first-in-first-out, the first matching leaf has the
//! fewest production applications of any leaf the search would enqueue.
//!
//! ```rust
//! use automata_sim::cfg::DerivationSearch;
//! use automata_sim::definition::Grammar;
//! use automata_sim::trace::NoTrace;
//!
//! let grammar = Grammar::builder()
//!     .variables(['S'])
//!     .terminals(['a', 'b'])
//!     .start('S')
//!     .production('S', ["aSb", "~"])
//!     .build()
//!     .unwrap();
//!
//! let outcome = DerivationSearch::new(&grammar).run("aabb", &mut NoTrace).unwrap();
//! let derivation = outcome.derivation.unwrap();
//! assert_eq!(derivation.production_count(), 3);
//! ```

mod tree;

pub use tree::{DerivationNode, DerivationTree, NodeId};

use crate::definition::{Grammar, Production};
use crate::error::{Result, SimulationError};
use crate::search::{SearchLimits, SearchStats, Verdict};
use crate::symbol::display_word;
use crate::trace::{NoTrace, TraceEvent, TraceSink};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::fmt;

/// One line of a reported derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DerivationStep {
    /// The sentential form, ε when empty
    pub form: String,
    /// Production that produced this form; `None` for the start variable
    pub production: Option<Production>,
}

/// A derivation from the start variable to the target, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Derivation {
    /// Forms in derivation order
    pub steps: Vec<DerivationStep>,
}

impl Derivation {
    /// Number of productions applied.
    pub fn production_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// The forms alone, in derivation order.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.form.as_str())
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .steps
            .iter()
            .map(|step| step.form.chars().count())
            .max()
            .unwrap_or(0);
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match &step.production {
                Some(production) => {
                    write!(f, "{:<width$}\t\tusing: {}", step.form, production, width = width)?
                }
                None => f.write_str(&step.form)?,
            }
        }
        Ok(())
    }
}

/// Result of a CFG membership search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CfgOutcome {
    /// Accept or reject
    pub verdict: Verdict,
    /// A minimal derivation, present iff the verdict is Accept
    pub derivation: Option<Derivation>,
    /// Search counters
    pub stats: SearchStats,
}

/// Membership search for a [`Grammar`].
#[derive(Debug, Clone, Copy)]
pub struct DerivationSearch<'g> {
    grammar: &'g Grammar,
    limits: SearchLimits,
}

impl<'g> DerivationSearch<'g> {
    /// Create an unbounded search over `grammar`.
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            limits: SearchLimits::unbounded(),
        }
    }

    /// Apply search limits.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Decide whether `target` is derivable, without tracing.
    pub fn accepts(&self, target: &str) -> Result<bool> {
        Ok(self.run(target, &mut NoTrace)?.verdict.is_accept())
    }

    /// Search for a derivation of `target`.
    ///
    /// When `sink` is enabled and a derivation is found, one
    /// [`TraceEvent::Derivation`] is emitted per form, root first.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::UndefinedSymbol`] if `target` contains a
    ///   non-terminal character
    /// - [`SimulationError::BudgetExhausted`] if a node budget is set and
    ///   runs out
    pub fn run<S: TraceSink + ?Sized>(&self, target: &str, sink: &mut S) -> Result<CfgOutcome> {
        let target: Vec<char> = target.chars().collect();
        if let Some(position) = target.iter().position(|&c| !self.grammar.is_terminal(c)) {
            return Err(SimulationError::UndefinedSymbol {
                symbol: target[position],
                position,
            });
        }

        let mut tree = DerivationTree::new(self.grammar.start());
        let mut stats = SearchStats::default();
        let mut seen: FxHashSet<Vec<char>> = FxHashSet::default();
        if self.limits.prunes_revisits() {
            seen.insert(tree.node(tree.root()).form.clone());
        }

        let mut frontier = VecDeque::from([tree.root()]);
        while let Some(id) = frontier.pop_front() {
            stats.explore(&self.limits)?;

            let form = tree.node(id).form.clone();
            if !form.iter().any(|&c| self.grammar.is_variable(c)) {
                if form == target {
                    let derivation = self.derivation(&tree, id);
                    if sink.enabled() {
                        for step in &derivation.steps {
                            sink.record(TraceEvent::Derivation {
                                form: step.form.clone(),
                                production: step.production.as_ref().map(ToString::to_string),
                            });
                        }
                    }
                    log::debug!(
                        "cfg derived target in {} step(s) ({} nodes explored)",
                        derivation.production_count(),
                        stats.explored
                    );
                    return Ok(CfgOutcome {
                        verdict: Verdict::Accept,
                        derivation: Some(derivation),
                        stats,
                    });
                }
                continue;
            }

            for (position, &symbol) in form.iter().enumerate() {
                let Some(productions) = self.grammar.productions(symbol) else {
                    continue;
                };
                for production in productions {
                    let child = substitute(&form, position, &production.rhs);
                    if self.grammar.terminal_count(&child) > target.len() {
                        stats.pruned += 1;
                        continue;
                    }
                    if self.limits.prunes_revisits() && !seen.insert(child.clone()) {
                        stats.pruned += 1;
                        continue;
                    }
                    frontier.push_back(tree.add_child(id, child, production));
                }
            }
            stats.observe_frontier(frontier.len());
        }

        log::debug!(
            "cfg frontier exhausted after {} nodes ({} pruned)",
            stats.explored,
            stats.pruned
        );
        Ok(CfgOutcome {
            verdict: Verdict::Reject,
            derivation: None,
            stats,
        })
    }

    fn derivation(&self, tree: &DerivationTree<'g>, leaf: NodeId) -> Derivation {
        let steps = tree
            .path(leaf)
            .into_iter()
            .map(|id| {
                let node = tree.node(id);
                DerivationStep {
                    form: display_word(&node.form),
                    production: node.production.cloned(),
                }
            })
            .collect();
        Derivation { steps }
    }
}

/// `form` with the symbol at `position` replaced by `rhs`.
fn substitute(form: &[char], position: usize, rhs: &[char]) -> Vec<char> {
    let mut child = Vec::with_capacity(form.len() + rhs.len());
    child.extend_from_slice(&form[..position]);
    child.extend_from_slice(rhs);
    child.extend_from_slice(&form[position + 1..]);
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::RevisitPolicy;
    use crate::trace::VecSink;

    fn balanced() -> Grammar {
        Grammar::builder()
            .variables(['S'])
            .terminals(['a', 'b'])
            .start('S')
            .production('S', ["aSb", "~"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_balanced_derivation() {
        let grammar = balanced();
        let outcome = DerivationSearch::new(&grammar).run("aabb", &mut NoTrace).unwrap();
        assert_eq!(outcome.verdict, Verdict::Accept);
        let derivation = outcome.derivation.unwrap();
        let forms: Vec<&str> = derivation.forms().collect();
        assert_eq!(forms, vec!["S", "aSb", "aaSbb", "aabb"]);
        assert!(derivation.steps[3].production.as_ref().unwrap().is_lambda());
    }

    #[test]
    fn test_length_bound_rejects() {
        let grammar = balanced();
        let outcome = DerivationSearch::new(&grammar).run("aab", &mut NoTrace).unwrap();
        assert_eq!(outcome.verdict, Verdict::Reject);
        assert!(outcome.derivation.is_none());
        assert!(outcome.stats.pruned > 0);
    }

    #[test]
    fn test_empty_target() {
        let grammar = balanced();
        let outcome = DerivationSearch::new(&grammar).run("", &mut NoTrace).unwrap();
        let derivation = outcome.derivation.unwrap();
        assert_eq!(derivation.production_count(), 1);
        assert_eq!(derivation.steps[1].form, "ε");
    }

    #[test]
    fn test_shortest_derivation_wins() {
        // aab is reachable in one step directly or in three through A and B.
        let grammar = Grammar::builder()
            .variables(['S', 'A', 'B'])
            .terminals(['a', 'b'])
            .start('S')
            .production('S', ["A", "aab"])
            .production('A', ["aB"])
            .production('B', ["ab"])
            .build()
            .unwrap();
        let outcome = DerivationSearch::new(&grammar).run("aab", &mut NoTrace).unwrap();
        assert_eq!(outcome.derivation.unwrap().production_count(), 1);
    }

    #[test]
    fn test_undefined_target_symbol() {
        let grammar = balanced();
        assert_eq!(
            DerivationSearch::new(&grammar).run("abS", &mut NoTrace),
            Err(SimulationError::UndefinedSymbol {
                symbol: 'S',
                position: 2
            })
        );
    }

    fn self_loop() -> Grammar {
        Grammar::builder()
            .variables(['S'])
            .terminals(['a'])
            .start('S')
            .production('S', ["S", "a"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_budget_bounds_unit_cycle() {
        let grammar = self_loop();
        let search =
            DerivationSearch::new(&grammar).with_limits(SearchLimits::unbounded().with_max_steps(50));
        assert_eq!(
            search.run("aa", &mut NoTrace),
            Err(SimulationError::BudgetExhausted { explored: 50 })
        );
    }

    #[test]
    fn test_prune_cuts_unit_cycle() {
        let grammar = self_loop();
        let search = DerivationSearch::new(&grammar)
            .with_limits(SearchLimits::unbounded().with_revisit(RevisitPolicy::Prune));
        assert!(!search.accepts("aa").unwrap());
        assert!(search.accepts("a").unwrap());
    }

    #[test]
    fn test_trace_emits_derivation_root_first() {
        let grammar = balanced();
        let mut sink = VecSink::new();
        DerivationSearch::new(&grammar).run("ab", &mut sink).unwrap();
        let lines: Vec<String> = sink.events.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec!["S", "aSb\t\tusing: S → aSb", "ab\t\tusing: S → ε"]
        );
    }

    #[test]
    fn test_derivation_display_pads_forms() {
        let grammar = balanced();
        let outcome = DerivationSearch::new(&grammar).run("ab", &mut NoTrace).unwrap();
        assert_eq!(
            outcome.derivation.unwrap().to_string(),
            "S\naSb\t\tusing: S → aSb\nab \t\tusing: S → ε"
        );
    }
}
