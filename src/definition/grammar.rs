//! Context-free grammar definition.

use super::checked_alphabet;
use crate::error::DefinitionError;
use crate::symbol::{display_word, Alphabet, ARROW_GLYPH, LAMBDA};

/// A production `lhs → rhs`. An empty `rhs` is a λ-production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Production {
    /// The variable being rewritten
    pub lhs: char,
    /// The replacement, empty for λ
    pub rhs: Vec<char>,
}

impl Production {
    /// Whether this production erases its variable.
    pub fn is_lambda(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, ARROW_GLYPH, display_word(&self.rhs))
    }
}

/// A context-free grammar over single-character symbols.
///
/// Variables and terminals are disjoint. Productions are grouped by their
/// left-hand variable and keep declaration order inside each group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    variables: Alphabet,
    terminals: Alphabet,
    start: char,
    groups: Vec<Vec<Production>>,
}

impl Grammar {
    /// Start building a new grammar.
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// The variables.
    pub fn variables(&self) -> &Alphabet {
        &self.variables
    }

    /// The terminals.
    pub fn terminals(&self) -> &Alphabet {
        &self.terminals
    }

    /// The start variable.
    pub fn start(&self) -> char {
        self.start
    }

    /// Whether `symbol` is a variable.
    #[inline]
    pub fn is_variable(&self, symbol: char) -> bool {
        self.variables.contains(symbol)
    }

    /// Whether `symbol` is a terminal.
    #[inline]
    pub fn is_terminal(&self, symbol: char) -> bool {
        self.terminals.contains(symbol)
    }

    /// Productions for `variable`, in declaration order.
    ///
    /// `None` when the symbol is not a variable or has no productions.
    pub fn productions(&self, variable: char) -> Option<&[Production]> {
        let group = self.groups.get(self.variables.index_of(variable)?)?;
        if group.is_empty() {
            None
        } else {
            Some(group.as_slice())
        }
    }

    /// Every production, grouped by variable in variable declaration order.
    pub fn all_productions(&self) -> impl Iterator<Item = &Production> {
        self.groups.iter().flatten()
    }

    /// Number of terminal symbols in a sentential form.
    pub fn terminal_count(&self, form: &[char]) -> usize {
        form.iter().filter(|&&c| self.is_terminal(c)).count()
    }
}

/// Builder for [`Grammar`].
///
/// ```rust
/// use automata_sim::definition::Grammar;
///
/// let grammar = Grammar::builder()
///     .variables(['S'])
///     .terminals(['a', 'b'])
///     .start('S')
///     .production('S', ["aSb", "~"])
///     .build()
///     .unwrap();
/// assert_eq!(grammar.productions('S').map(|p| p.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    variables: Vec<char>,
    terminals: Vec<char>,
    start: Option<char>,
    productions: Vec<(char, String)>,
}

impl GrammarBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the variables.
    pub fn variables<I: IntoIterator<Item = char>>(mut self, symbols: I) -> Self {
        self.variables.extend(symbols);
        self
    }

    /// Declare the terminals.
    pub fn terminals<I: IntoIterator<Item = char>>(mut self, symbols: I) -> Self {
        self.terminals.extend(symbols);
        self
    }

    /// Set the start variable.
    pub fn start(mut self, variable: char) -> Self {
        self.start = Some(variable);
        self
    }

    /// Add `lhs → alt₁ | alt₂ | …`. An alternative of `"~"` (or `""`) is a
    /// λ-production.
    pub fn production<I, S>(mut self, lhs: char, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_production(lhs, alternatives);
        self
    }

    /// Non-consuming form of [`production`](Self::production), used by the loader.
    pub fn push_production<I, S>(&mut self, lhs: char, alternatives: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.productions
            .extend(alternatives.into_iter().map(|rhs| (lhs, rhs.into())));
    }

    /// Validate the declarations and build the grammar.
    pub fn build(self) -> Result<Grammar, DefinitionError> {
        if self.variables.is_empty() {
            return Err(DefinitionError::MissingSection("V - set of variables"));
        }
        if self.terminals.is_empty() {
            return Err(DefinitionError::MissingSection("T - set of terminals"));
        }

        let variables = checked_alphabet(self.variables.iter().copied())?;
        let terminals = checked_alphabet(self.terminals.iter().copied())?;
        if let Some(overlap) = terminals.iter().find(|&c| variables.contains(c)) {
            return Err(DefinitionError::VariableTerminalOverlap(overlap));
        }

        let start = self
            .start
            .ok_or(DefinitionError::MissingSection("S - start variable"))?;
        if !variables.contains(start) {
            return Err(DefinitionError::NotAVariable(start));
        }

        let mut groups: Vec<Vec<Production>> = vec![Vec::new(); variables.len()];
        for (lhs, rhs) in self.productions {
            let group = variables
                .index_of(lhs)
                .ok_or(DefinitionError::NotAVariable(lhs))?;
            let rhs: Vec<char> = rhs.chars().filter(|&c| c != LAMBDA).collect();
            if let Some(&symbol) = rhs
                .iter()
                .find(|&&c| !variables.contains(c) && !terminals.contains(c))
            {
                return Err(DefinitionError::UnknownSymbol {
                    symbol,
                    alphabet: "variables or terminals",
                });
            }
            groups[group].push(Production { lhs, rhs });
        }

        Ok(Grammar {
            variables,
            terminals,
            start,
            groups,
        })
    }
}
