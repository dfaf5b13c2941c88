//! Pushdown stack and search configurations.

use crate::definition::{PdaMove, StateId};
use smallvec::SmallVec;
use std::fmt;

/// A pushdown stack. The top is the last element of the backing storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Stack {
    symbols: SmallVec<[char; 16]>,
}

impl Stack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack holding exactly `symbol`.
    pub fn with_start(symbol: char) -> Self {
        let mut stack = Self::new();
        stack.symbols.push(symbol);
        stack
    }

    /// The top symbol, if any.
    #[inline]
    pub fn top(&self) -> Option<char> {
        self.symbols.last().copied()
    }

    /// Number of symbols on the stack.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Pop the top and push `replacement`, whose first symbol becomes the
    /// new top. Returns the new stack; `self` is left untouched.
    pub fn replace_top(&self, replacement: &[char]) -> Stack {
        let mut next = self.clone();
        next.symbols.pop();
        next.symbols.extend(replacement.iter().rev().copied());
        next
    }

    /// Symbols from bottom to top.
    pub fn bottom_to_top(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl fmt::Display for Stack {
    /// Renders bottom-first, so the rightmost symbol is the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// A point in the pushdown search: `(state, stack, input position)`.
///
/// Each configuration owns its stack. Successors are built from a copy, so
/// sibling branches never observe each other's stacks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    /// Current state
    pub state: StateId,
    /// Current stack
    pub stack: Stack,
    /// Number of input symbols consumed
    pub position: usize,
}

impl Configuration {
    /// The configuration reached by applying `mv`, consuming `consumed`
    /// input symbols (0 for a λ-move, 1 otherwise).
    pub fn successor(&self, mv: &PdaMove, consumed: usize) -> Configuration {
        Configuration {
            state: mv.target,
            stack: self.stack.replace_top(&mv.push),
            position: self.position + consumed,
        }
    }
}
