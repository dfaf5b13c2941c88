//! # automata-sim
//!
//! Simulators for nondeterministic machines described in a small textual
//! notation: finite automata, pushdown automata and context-free grammars.
//!
//! Each engine decides membership of one input string and reports a
//! verdict with a witness:
//!
//! - [`nfa::NfaSimulator`]: λ-closure plus subset simulation. Reports the
//!   active state set.
//! - [`npda::NpdaExecutor`]: depth-first backtracking over
//!   `(state, stack, position)` configurations. Reports the halting state
//!   and final stack of the first accepting branch.
//! - [`cfg::DerivationSearch`]: breadth-first search over sentential forms.
//!   Reports a derivation with the fewest production applications.
//!
//! Search order is fixed by declaration order, so every run is
//! reproducible.
//!
//! ## Example
//!
//! ```rust
//! use automata_sim::prelude::*;
//!
//! let npda = PushdownAutomaton::parse(
//!     "Q={q0,q1}\nE={a,b}\nT={Z,A}\nZ=Z\nI=q0\nF={q1}\n\
//!      d(q0,a,Z)={(q0,AZ)}\nd(q0,a,A)={(q0,AA)}\nd(q0,b,A)={(q0,~)}\nd(q0,~,Z)={(q1,Z)}",
//! )
//! .unwrap();
//!
//! let outcome = NpdaExecutor::new(&npda).run("aabb", &mut NoTrace).unwrap();
//! assert_eq!(outcome.verdict, Verdict::Accept);
//! assert_eq!(outcome.witness.unwrap().state, "q1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cfg;
pub mod definition;
pub mod description;
pub mod error;
pub mod nfa;
pub mod npda;
pub mod search;
pub mod symbol;
pub mod trace;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

pub use error::{BranchFailure, DefinitionError, Result, SimulationError};

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::cfg::{CfgOutcome, Derivation, DerivationSearch};
    pub use crate::definition::{FiniteAutomaton, Grammar, PushdownAutomaton};
    pub use crate::description::{Description, LoadError};
    pub use crate::error::{BranchFailure, DefinitionError, SimulationError};
    pub use crate::nfa::{NfaOutcome, NfaSimulator};
    pub use crate::npda::{NpdaExecutor, NpdaOutcome, NpdaWitness};
    pub use crate::search::{RevisitPolicy, SearchLimits, SearchStats, Verdict};
    pub use crate::trace::{LogSink, NoTrace, TraceEvent, TraceSink, VecSink};
}
