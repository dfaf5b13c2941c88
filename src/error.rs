//! Error types for building definitions and running simulations.
//!
//! Only structural problems with a description and faults that must abort a
//! run are errors. Failures that are local to one branch of a search
//! ([`BranchFailure`]) are ordinary values the search recovers from.

use thiserror::Error;

/// A malformed or incomplete automaton/grammar description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A section was defined twice.
    #[error("Duplicate definition of '{0}'")]
    DuplicateSection(&'static str),

    /// A required section is missing.
    #[error("Incomplete specification: '{0}' is not defined")]
    MissingSection(&'static str),

    /// A rule appeared before the sections it depends on.
    #[error("{0} must be defined prior to defining the rules")]
    RuleBeforeHeader(&'static str),

    /// A line does not follow the notation.
    #[error("Invalid syntax. Correct syntax: {expected}")]
    Syntax {
        /// Example of the expected form
        expected: &'static str,
    },

    /// A state name that was never declared.
    #[error("State '{0}' not found")]
    UnknownState(String),

    /// A symbol that is not part of the relevant alphabet.
    #[error("Symbol '{symbol}' not found in the {alphabet}")]
    UnknownSymbol {
        /// The offending symbol
        symbol: char,
        /// Which alphabet was consulted
        alphabet: &'static str,
    },

    /// A reserved notation character was used as an alphabet symbol.
    #[error("Symbol '{0}' is reserved and cannot be part of an alphabet")]
    ReservedSymbol(char),

    /// An alphabet entry longer than one character.
    #[error("Symbols must be a single character, got '{0}'")]
    MultiCharSymbol(String),

    /// A symbol declared both as a variable and as a terminal.
    #[error("Symbol '{0}' cannot be both a variable and a terminal")]
    VariableTerminalOverlap(char),

    /// The left-hand side of a production is not a variable.
    #[error("Expected a variable on the left side of the production, got '{0}'")]
    NotAVariable(char),

    /// A structural error located on a specific line of a description.
    #[error("line {line}: {source}")]
    Line {
        /// 1-based line number
        line: usize,
        /// The underlying error
        #[source]
        source: Box<DefinitionError>,
    },
}

impl DefinitionError {
    /// Attach a line number to this error.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            DefinitionError::Line { .. } => self,
            other => DefinitionError::Line {
                line,
                source: Box::new(other),
            },
        }
    }
}

/// A fault that aborts a simulation run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The input contains a symbol outside the working alphabet.
    #[error("undefined symbol '{symbol}' at input position {position}")]
    UndefinedSymbol {
        /// The offending symbol
        symbol: char,
        /// 0-based position in the input
        position: usize,
    },

    /// The configured step budget ran out before the search finished.
    #[error("search budget exhausted after exploring {explored} configurations")]
    BudgetExhausted {
        /// Configurations or nodes explored before giving up
        explored: usize,
    },
}

/// Why a single branch of a search stopped without accepting.
///
/// These never abort a run: the surrounding search moves on to the next
/// alternative, and a search where every branch fails reports Reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum BranchFailure {
    /// The transition cell for a valid symbol is empty.
    NoRuleDefined,
    /// A pushdown branch needed to read the top of an empty stack.
    StackExhausted,
    /// The input was consumed but the branch is not in a final state.
    NotFinal,
    /// The configuration was already explored by another branch.
    Revisited,
}

impl std::fmt::Display for BranchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchFailure::NoRuleDefined => f.write_str("no rule defined"),
            BranchFailure::StackExhausted => f.write_str("stack exhausted"),
            BranchFailure::NotFinal => f.write_str("halted in a non-final state"),
            BranchFailure::Revisited => f.write_str("configuration already explored"),
        }
    }
}

/// A specialized `Result` type for simulation runs.
pub type Result<T> = std::result::Result<T, SimulationError>;
