//! Immutable, pre-validated automaton and grammar definitions.
//!
//! Definitions are produced by the builders in this module (or by the
//! textual loader in [`crate::description`], which drives the builders) and
//! are read-only for the lifetime of a run.
//!
//! - [`FiniteAutomaton`]: states, input alphabet and a sparse
//!   `state × (symbol ∪ {λ}) → states` table.
//! - [`PushdownAutomaton`]: adds a stack alphabet, a start stack symbol and
//!   an ordered list of moves per `(state, symbol ∪ {λ}, stack top)`.
//! - [`Grammar`]: variables, terminals, a start variable and productions
//!   grouped by their left-hand variable.
//!
//! A cell that holds no rule is represented explicitly as `None` and means
//! "no rule defined". A symbol outside the working alphabet is a distinct
//! fault, reported as [`SimulationError::UndefinedSymbol`].
//!
//! [`SimulationError::UndefinedSymbol`]: crate::SimulationError::UndefinedSymbol

mod finite;
mod grammar;
mod pushdown;

pub use finite::{FiniteAutomaton, NfaBuilder};
pub use grammar::{Grammar, GrammarBuilder, Production};
pub use pushdown::{NpdaBuilder, PdaMove, PushdownAutomaton};

use crate::error::DefinitionError;
use crate::symbol::{is_reserved, Alphabet, EMPTY_SET_GLYPH};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// Interned state handle. Ids are assigned in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) u32);

impl StateId {
    /// Position of the state in declaration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered set of states. Iteration order is the declaration order of the
/// states, which keeps traces reproducible.
pub type StateSet = BTreeSet<StateId>;

/// Bidirectional mapping between state names and [`StateId`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateTable {
    names: Vec<String>,
    ids: FxHashMap<String, StateId>,
}

impl StateTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a state name, returning its id. Re-interning returns the
    /// existing id.
    pub fn intern(&mut self, name: &str) -> StateId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = StateId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Look up a declared state.
    pub fn get(&self, name: &str) -> Option<StateId> {
        self.ids.get(name).copied()
    }

    /// Look up a declared state, failing with [`DefinitionError::UnknownState`].
    pub fn resolve(&self, name: &str) -> Result<StateId, DefinitionError> {
        self.get(name)
            .ok_or_else(|| DefinitionError::UnknownState(name.to_string()))
    }

    /// Name of a state.
    pub fn name(&self, id: StateId) -> &str {
        &self.names[id.index()]
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no state has been declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over all states in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.names.len() as u32).map(StateId)
    }

    /// Names of the states in `set`, in set order.
    pub fn names_of(&self, set: &StateSet) -> Vec<String> {
        set.iter().map(|&id| self.name(id).to_string()).collect()
    }

    /// Render a set as `{ q0, q1 }`, or `Φ` when it is empty.
    pub fn render_set(&self, set: &StateSet) -> String {
        render_names(&self.names_of(set))
    }
}

/// Render a list of state names as `{ q0, q1 }`, or `Φ` when empty.
pub(crate) fn render_names(names: &[String]) -> String {
    if names.is_empty() {
        EMPTY_SET_GLYPH.to_string()
    } else {
        format!("{{ {} }}", names.join(", "))
    }
}

/// Build an alphabet from declared symbols, rejecting reserved characters.
pub(crate) fn checked_alphabet<I>(symbols: I) -> Result<Alphabet, DefinitionError>
where
    I: IntoIterator<Item = char>,
{
    let mut alphabet = Alphabet::new();
    for symbol in symbols {
        if is_reserved(symbol) {
            return Err(DefinitionError::ReservedSymbol(symbol));
        }
        alphabet.insert(symbol);
    }
    Ok(alphabet)
}

/// Intern every declared state name.
pub(crate) fn state_table<'a, I>(names: I) -> StateTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = StateTable::new();
    for name in names {
        table.intern(name);
    }
    table
}
