//! Search limits, revisit policy and statistics shared by the engines.
//!
//! Neither the pushdown search nor the derivation search is guaranteed to
//! terminate. By default both run unbounded, exactly as described. Two
//! opt-in hardenings are available:
//!
//! - a step budget ([`SearchLimits::max_steps`]) that turns a runaway search
//!   into [`SimulationError::BudgetExhausted`]
//! - [`RevisitPolicy::Prune`], a visited cache that skips configurations
//!   (NPDA) or sentential forms (CFG) that were already seen

use crate::error::{Result, SimulationError};

/// Verdict of a membership run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Verdict {
    /// The input belongs to the language
    Accept,
    /// Every reachable branch was tried without acceptance
    Reject,
}

impl Verdict {
    /// Whether this is [`Verdict::Accept`].
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Accept => f.write_str("accepted"),
            Verdict::Reject => f.write_str("rejected"),
        }
    }
}

/// What to do when a search reaches something it has already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(feature = "serialization", serde(rename_all = "kebab-case"))]
pub enum RevisitPolicy {
    /// Explore it again. Baseline behaviour; may not terminate.
    #[default]
    Explore,
    /// Skip it.
    ///
    /// For the pushdown search a configuration is exactly
    /// `(state, stack, position)`, so a repeat can never lead anywhere new.
    /// For the derivation search a repeated sentential form is skipped; under
    /// breadth-first order its first occurrence is already at minimal depth.
    Prune,
}

impl std::str::FromStr for RevisitPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "explore" => Ok(RevisitPolicy::Explore),
            "prune" => Ok(RevisitPolicy::Prune),
            _ => Err(format!(
                "Unknown revisit policy: {}. Valid options: explore, prune",
                s
            )),
        }
    }
}

/// Bounds applied to a single search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SearchLimits {
    /// Maximum configurations (NPDA) or nodes (CFG) to explore. `None` is
    /// unbounded.
    pub max_steps: Option<usize>,
    /// Handling of already-seen configurations.
    pub revisit: RevisitPolicy,
}

impl SearchLimits {
    /// No budget, revisits explored.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Set the step budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Set the revisit policy.
    pub fn with_revisit(mut self, revisit: RevisitPolicy) -> Self {
        self.revisit = revisit;
        self
    }

    /// Whether the visited cache is on.
    #[inline]
    pub fn prunes_revisits(&self) -> bool {
        self.revisit == RevisitPolicy::Prune
    }
}

/// Counters gathered during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SearchStats {
    /// Configurations or nodes taken off the frontier
    pub explored: usize,
    /// Candidates discarded by pruning (length bound or revisit cache)
    pub pruned: usize,
    /// Largest frontier size observed
    pub max_frontier: usize,
}

impl SearchStats {
    /// Count one explored configuration, failing once the budget is spent.
    #[inline]
    pub(crate) fn explore(&mut self, limits: &SearchLimits) -> Result<()> {
        if let Some(max) = limits.max_steps {
            if self.explored >= max {
                return Err(SimulationError::BudgetExhausted {
                    explored: self.explored,
                });
            }
        }
        self.explored += 1;
        Ok(())
    }

    #[inline]
    pub(crate) fn observe_frontier(&mut self, len: usize) {
        self.max_frontier = self.max_frontier.max(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget() {
        let limits = SearchLimits::unbounded().with_max_steps(2);
        let mut stats = SearchStats::default();
        assert!(stats.explore(&limits).is_ok());
        assert!(stats.explore(&limits).is_ok());
        assert_eq!(
            stats.explore(&limits),
            Err(SimulationError::BudgetExhausted { explored: 2 })
        );
    }

    #[test]
    fn test_unbounded_never_fails() {
        let limits = SearchLimits::unbounded();
        let mut stats = SearchStats::default();
        for _ in 0..10_000 {
            stats.explore(&limits).unwrap();
        }
        assert_eq!(stats.explored, 10_000);
    }

    #[test]
    fn test_revisit_policy_from_str() {
        assert_eq!("prune".parse::<RevisitPolicy>(), Ok(RevisitPolicy::Prune));
        assert_eq!("Explore".parse::<RevisitPolicy>(), Ok(RevisitPolicy::Explore));
        assert!("sometimes".parse::<RevisitPolicy>().is_err());
        assert!(!SearchLimits::default().prunes_revisits());
    }
}
