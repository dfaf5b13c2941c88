//! Pushdown automaton definition.

use super::{checked_alphabet, state_table, StateId, StateSet, StateTable};
use crate::error::DefinitionError;
use crate::symbol::{display_word, Alphabet, LAMBDA, WILDCARD};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One alternative of a pushdown rule: move to `target`, replacing the
/// popped stack top with `push`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdaMove {
    /// State entered by the move
    pub target: StateId,
    /// Replacement string, written top-first (`push[0]` becomes the new
    /// top). Empty means pop only.
    pub push: SmallVec<[char; 4]>,
}

impl PdaMove {
    /// Render the replacement string, printing an empty one as ε.
    pub fn push_display(&self) -> String {
        display_word(&self.push)
    }
}

/// Key of a pushdown transition cell: state, input column (`None` for λ)
/// and stack-top column.
type CellKey = (StateId, Option<usize>, usize);

/// A nondeterministic pushdown automaton accepting by final state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushdownAutomaton {
    states: StateTable,
    input: Alphabet,
    stack: Alphabet,
    start_symbol: char,
    initial: StateId,
    finals: StateSet,
    moves: FxHashMap<CellKey, Vec<PdaMove>>,
}

impl PushdownAutomaton {
    /// Start building a new automaton.
    pub fn builder() -> NpdaBuilder {
        NpdaBuilder::new()
    }

    /// The declared states.
    pub fn states(&self) -> &StateTable {
        &self.states
    }

    /// The input alphabet (without λ).
    pub fn input_alphabet(&self) -> &Alphabet {
        &self.input
    }

    /// The stack alphabet.
    pub fn stack_alphabet(&self) -> &Alphabet {
        &self.stack
    }

    /// Symbol the stack holds when a run starts.
    pub fn start_symbol(&self) -> char {
        self.start_symbol
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
    pub fn input_column(&self, symbol: char) -> Option<usize> {
        self.input.index_of(symbol)
    }

    /// Column of a stack symbol, or `None` if it is not in the stack alphabet.
    #[inline]
    pub fn stack_column(&self, symbol: char) -> Option<usize> {
        self.stack.index_of(symbol)
    }

    /// Alternatives for `(state, input, top)` in declaration order.
    ///
    /// `input` is `None` for λ-moves. `None` is returned when no rule is
    /// defined for the cell.
    #[inline]
    pub fn moves(&self, state: StateId, input: Option<usize>, top: usize) -> Option<&[PdaMove]> {
        self.moves.get(&(state, input, top)).map(Vec::as_slice)
    }

    /// Number of defined transition cells.
    pub fn rule_count(&self) -> usize {
        self.moves.len()
    }

    /// Whether every (state, input symbol, stack symbol) cell holds a rule.
    pub fn is_complete(&self) -> bool {
        self.states.ids().all(|state| {
            (0..self.input.len()).all(|input| {
                (0..self.stack.len()).all(|top| self.moves.contains_key(&(state, Some(input), top)))
            })
        })
    }
}

/// Declared form of a pushdown rule before validation.
#[derive(Debug, Clone)]
struct RawRule {
    from: String,
    input: char,
    top: char,
    moves: Vec<(String, String)>,
}

/// Builder for [`PushdownAutomaton`].
///
/// ```rust
/// use automata_sim::definition::PushdownAutomaton;
///
/// let npda = PushdownAutomaton::builder()
///     .states(["q0", "q1"])
///     .input_alphabet("ab".chars())
///     .stack_alphabet("ZA".chars())
///     .start_symbol('Z')
///     .initial("q0")
///     .finals(["q1"])
///     .rule("q0", 'a', 'Z', [("q0", "AZ")])
///     .rule("q0", '~', 'Z', [("q1", "Z")])
///     .build()
///     .unwrap();
/// assert_eq!(npda.start_symbol(), 'Z');
/// ```
#[derive(Debug, Clone, Default)]
pub struct NpdaBuilder {
    states: Vec<String>,
    input: Vec<char>,
    stack: Vec<char>,
    start_symbol: Option<char>,
    initial: Option<String>,
    finals: Vec<String>,
    rules: Vec<RawRule>,
}

impl NpdaBuilder {
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
    pub fn input_alphabet<I: IntoIterator<Item = char>>(mut self, symbols: I) -> Self {
        self.input.extend(symbols);
        self
    }

    /// Declare the stack alphabet.
    pub fn stack_alphabet<I: IntoIterator<Item = char>>(mut self, symbols: I) -> Self {
        self.stack.extend(symbols);
        self
    }

    /// Set the stack start symbol.
    pub fn start_symbol(mut self, symbol: char) -> Self {
        self.start_symbol = Some(symbol);
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

    /// Add `δ(from, input, top) ∋ (target, push)` for each listed move.
    ///
    /// `input` may be [`LAMBDA`]; both `input` and `top` may be
    /// [`WILDCARD`]. λ characters inside a push string are dropped, so
    /// `"~"` means pop only.
    pub fn rule<I, T, P>(mut self, from: impl Into<String>, input: char, top: char, moves: I) -> Self
    where
        I: IntoIterator<Item = (T, P)>,
        T: Into<String>,
        P: Into<String>,
    {
        self.push_rule(from, input, top, moves);
        self
    }

    /// Non-consuming form of [`rule`](Self::rule), used by the loader.
    pub fn push_rule<I, T, P>(&mut self, from: impl Into<String>, input: char, top: char, moves: I)
    where
        I: IntoIterator<Item = (T, P)>,
        T: Into<String>,
        P: Into<String>,
    {
        self.rules.push(RawRule {
            from: from.into(),
            input,
            top,
            moves: moves
                .into_iter()
                .map(|(target, push)| (target.into(), push.into()))
                .collect(),
        });
    }

    /// Validate the declarations and build the automaton.
    pub fn build(self) -> Result<PushdownAutomaton, DefinitionError> {
        if self.states.is_empty() {
            return Err(DefinitionError::MissingSection("Q - set of internal states"));
        }
        if self.input.is_empty() {
            return Err(DefinitionError::MissingSection("E - input alphabet"));
        }
        if self.stack.is_empty() {
            return Err(DefinitionError::MissingSection("T - stack alphabet"));
        }

        let states = state_table(self.states.iter().map(String::as_str));
        let input = checked_alphabet(self.input.iter().copied())?;
        let stack = checked_alphabet(self.stack.iter().copied())?;

        let start_symbol = self
            .start_symbol
            .ok_or(DefinitionError::MissingSection("Z - stack start symbol"))?;
        if !stack.contains(start_symbol) {
            return Err(DefinitionError::UnknownSymbol {
                symbol: start_symbol,
                alphabet: "stack alphabet",
            });
        }

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

        let mut moves: FxHashMap<CellKey, Vec<PdaMove>> = FxHashMap::default();

        for rule in &self.rules {
            let from = states.resolve(&rule.from)?;

            let inputs: Vec<Option<usize>> = match rule.input {
                LAMBDA => vec![None],
                WILDCARD => (0..input.len()).map(Some).collect(),
                symbol => vec![Some(input.index_of(symbol).ok_or(
                    DefinitionError::UnknownSymbol {
                        symbol,
                        alphabet: "input alphabet",
                    },
                )?)],
            };
            let tops: Vec<usize> = match rule.top {
                WILDCARD => (0..stack.len()).collect(),
                symbol => vec![stack.index_of(symbol).ok_or(DefinitionError::UnknownSymbol {
                    symbol,
                    alphabet: "stack alphabet",
                })?],
            };

            let mut alternatives = Vec::with_capacity(rule.moves.len());
            for (target, push) in &rule.moves {
                let target = states.resolve(target)?;
                let push: SmallVec<[char; 4]> = push.chars().filter(|&c| c != LAMBDA).collect();
                if let Some(&symbol) = push.iter().find(|&&c| !stack.contains(c)) {
                    return Err(DefinitionError::UnknownSymbol {
                        symbol,
                        alphabet: "stack alphabet",
                    });
                }
                alternatives.push(PdaMove { target, push });
            }

            for &input_column in &inputs {
                for &top in &tops {
                    moves
                        .entry((from, input_column, top))
                        .or_default()
                        .extend(alternatives.iter().cloned());
                }
            }
        }

        Ok(PushdownAutomaton {
            states,
            input,
            stack,
            start_symbol,
            initial,
            finals,
            moves,
        })
    }
}
