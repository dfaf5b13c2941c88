//! Finite automaton definition (possibly nondeterministic, with λ-moves).

use super::{checked_alphabet, state_table, StateId, StateSet, StateTable};
use crate::error::DefinitionError;
use crate::symbol::{Alphabet, LAMBDA, WILDCARD};

/// A nondeterministic finite automaton.
///
/// The transition relation is stored as a dense table of optional cells,
/// one row per state and one column per input symbol plus a trailing λ
/// column. `None` means no rule is defined for that cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiniteAutomaton {
    states: StateTable,
    alphabet: Alphabet,
    table: Vec<Option<StateSet>>,
    initial: StateId,
    finals: StateSet,
}

impl FiniteAutomaton {
    /// Start building a new automaton.
    pub fn builder() -> NfaBuilder {
        NfaBuilder::new()
    }

    /// The declared states.
    pub fn states(&self) -> &StateTable {
        &self.states
    }

    /// The input alphabet (without λ).
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// The final states.
    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    /// Whether `state` is final.
    #[inline]
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    /// Column of an input symbol, or `None` if it is not in the alphabet.
    #[inline]
    pub fn column(&self, symbol: char) -> Option<usize> {
        self.alphabet.index_of(symbol)
    }

    /// Targets of `state` on the symbol in `column`.
    ///
    /// `None` means no rule is defined for the cell.
    #[inline]
    pub fn targets(&self, state: StateId, column: usize) -> Option<&StateSet> {
        self.table[self.cell(state, column)].as_ref()
    }

    /// Targets of `state` on a λ-move.
    #[inline]
    pub fn lambda_targets(&self, state: StateId) -> Option<&StateSet> {
        self.targets(state, self.lambda_column())
    }

    /// Whether every (state, input symbol) cell holds a rule.
    ///
    /// λ cells are not required. An incomplete table is legal; missing cells
    /// simply contribute nothing during simulation.
    pub fn is_complete(&self) -> bool {
        self.states.ids().all(|state| {
            (0..self.alphabet.len()).all(|column| self.targets(state, column).is_some())
        })
    }

    #[inline]
    fn lambda_column(&self) -> usize {
        self.alphabet.len()
    }

    #[inline]
    fn cell(&self, state: StateId, column: usize) -> usize {
        state.index() * (self.alphabet.len() + 1) + column
    }
}

/// Builder for [`FiniteAutomaton`].
///
/// Declarations are collected as written and validated in [`build`](Self::build).
///
/// ```rust
/// use automata_sim::definition::FiniteAutomaton;
///
/// let nfa = FiniteAutomaton::builder()
///     .states(["q0", "q1"])
///     .alphabet("ab".chars())
///     .initial("q0")
///     .finals(["q1"])
///     .rule("q0", 'a', ["q0", "q1"])
///     .rule("q0", 'b', ["q0"])
///     .build()
///     .unwrap();
/// assert_eq!(nfa.states().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NfaBuilder {
    states: Vec<String>,
    alphabet: Vec<char>,
    initial: Option<String>,
    finals: Vec<String>,
    rules: Vec<(String, char, Vec<String>)>,
}

impl NfaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the states.
    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Declare the input alphabet.
    pub fn alphabet<I: IntoIterator<Item = char>>(mut self, symbols: I) -> Self {
        self.alphabet.extend(symbols);
        self
    }

    /// Set the initial state.
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Declare the final states.
    pub fn finals<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finals.extend(states.into_iter().map(Into::into));
        self
    }

    /// Add `δ(from, symbol) ⊇ targets`.
    ///
    /// `symbol` may be [`LAMBDA`] or [`WILDCARD`]. Rules for the same cell
    /// accumulate.
    pub fn rule<I, S>(mut self, from: impl Into<String>, symbol: char, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_rule(from, symbol, targets);
        self
    }

    /// Non-consuming form of [`rule`](Self::rule), used by the loader.
    pub fn push_rule<I, S>(&mut self, from: impl Into<String>, symbol: char, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.push((
            from.into(),
            symbol,
            targets.into_iter().map(Into::into).collect(),
        ));
    }

    /// Validate the declarations and build the automaton.
    ///
    /// # Errors
    ///
    /// - [`DefinitionError::MissingSection`] if the states, alphabet or
    ///   initial state were never given
    /// - [`DefinitionError::UnknownState`] / [`DefinitionError::UnknownSymbol`]
    ///   for references to undeclared names
    /// - [`DefinitionError::ReservedSymbol`] for reserved alphabet symbols
    pub fn build(self) -> Result<FiniteAutomaton, DefinitionError> {
        if self.states.is_empty() {
            return Err(DefinitionError::MissingSection("Q - set of internal states"));
        }
        if self.alphabet.is_empty() {
            return Err(DefinitionError::MissingSection("E - input alphabet"));
        }

        let states = state_table(self.states.iter().map(String::as_str));
        let alphabet = checked_alphabet(self.alphabet.iter().copied())?;
        let initial = self
            .initial
            .as_deref()
            .ok_or(DefinitionError::MissingSection("I - initial state"))
            .and_then(|name| states.resolve(name))?;
        let finals = self
            .finals
            .iter()
            .map(|name| states.resolve(name))
            .collect::<Result<StateSet, _>>()?;

        let width = alphabet.len() + 1;
        let mut table: Vec<Option<StateSet>> = vec![None; states.len() * width];

        for (from, symbol, targets) in &self.rules {
            let row = states.resolve(from)?.index() * width;
            let targets = targets
                .iter()
                .map(|name| states.resolve(name))
                .collect::<Result<StateSet, _>>()?;

            let columns: Vec<usize> = match *symbol {
                LAMBDA => vec![alphabet.len()],
                WILDCARD => (0..alphabet.len()).collect(),
                other => vec![alphabet.index_of(other).ok_or(DefinitionError::UnknownSymbol {
                    symbol: other,
                    alphabet: "input alphabet",
                })?],
            };

            for column in columns {
                table[row + column]
                    .get_or_insert_with(StateSet::new)
                    .extend(targets.iter().copied());
            }
        }

        Ok(FiniteAutomaton {
            states,
            alphabet,
            table,
            initial,
            finals,
        })
    }
}
