//! Symbols, sentinels and alphabets.
//!
//! Every alphabet in a description is a set of single characters. Two
//! characters are reserved as sentinels:
//!
//! - [`LAMBDA`] marks a move that consumes nothing (ε).
//! - [`WILDCARD`] is shorthand for "every alphabet symbol except λ". It is
//!   expanded by the definition builders and never reaches the simulators.

use rustc_hash::FxHashMap;

/// Textual lambda (ε) sentinel.
pub const LAMBDA: char = '~';

/// Textual wildcard sentinel, expanded at definition-build time.
pub const WILDCARD: char = '*';

/// Glyph used when printing the transition function.
pub const DELTA_GLYPH: char = 'δ';

/// Glyph used when printing a lambda move or an empty push string.
pub const LAMBDA_GLYPH: char = 'ε';

/// Glyph used when printing an empty state set.
pub const EMPTY_SET_GLYPH: char = 'Φ';

/// Glyph used when printing a production.
pub const ARROW_GLYPH: char = '→';

/// Characters that carry meaning in the description notation and therefore
/// can never be alphabet symbols.
pub const RESERVED: &[char] = &[
    ',', ' ', '\t', LAMBDA, WILDCARD, '=', '/', '(', ')', '{', '}', '|',
];

/// Check whether `c` is reserved by the description notation.
#[inline]
pub fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c)
}

/// Render a symbol sequence, printing the empty sequence as ε.
pub fn display_word(symbols: &[char]) -> String {
    if symbols.is_empty() {
        LAMBDA_GLYPH.to_string()
    } else {
        symbols.iter().collect()
    }
}

/// An ordered set of concrete symbols with constant-time index lookup.
///
/// Symbols keep their declaration order; the index of a symbol is its
/// position in that order. Lookups for characters outside the alphabet
/// return `None`, which the simulators surface as
/// [`SimulationError::UndefinedSymbol`](crate::SimulationError::UndefinedSymbol).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: FxHashMap<char, usize>,
}

impl Alphabet {
    /// Create an empty alphabet
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol, returning its index. Re-inserting is a no-op.
    pub fn insert(&mut self, symbol: char) -> usize {
        if let Some(&idx) = self.index.get(&symbol) {
            return idx;
        }
        let idx = self.symbols.len();
        self.symbols.push(symbol);
        self.index.insert(symbol, idx);
        idx
    }

    /// Index of `symbol`, or `None` when it is not part of the alphabet.
    #[inline]
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    /// Whether `symbol` belongs to the alphabet.
    #[inline]
    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    /// Symbol stored at `index`.
    #[inline]
    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over the symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut alphabet = Alphabet::new();
        for symbol in iter {
            alphabet.insert(symbol);
        }
        alphabet
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{ ")?;
        for (i, symbol) in self.symbols.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", symbol)?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_keeps_declaration_order() {
        let alphabet: Alphabet = "bca".chars().collect();
        assert_eq!(alphabet.iter().collect::<String>(), "bca");
        assert_eq!(alphabet.index_of('c'), Some(1));
        assert_eq!(alphabet.symbol(2), Some('a'));
    }

    #[test]
    fn test_alphabet_insert_is_idempotent() {
        let mut alphabet = Alphabet::new();
        assert_eq!(alphabet.insert('a'), 0);
        assert_eq!(alphabet.insert('b'), 1);
        assert_eq!(alphabet.insert('a'), 0);
        assert_eq!(alphabet.len(), 2);
    }

    #[test]
    fn test_unknown_symbol_has_no_index() {
        let alphabet: Alphabet = "ab".chars().collect();
        assert_eq!(alphabet.index_of('z'), None);
        assert!(!alphabet.contains(LAMBDA));
    }

    #[test]
    fn test_reserved_characters() {
        assert!(is_reserved(LAMBDA));
        assert!(is_reserved(WILDCARD));
        assert!(is_reserved('|'));
        assert!(!is_reserved('a'));
    }

    #[test]
    fn test_display_word() {
        assert_eq!(display_word(&[]), "ε");
        assert_eq!(display_word(&['a', 'S', 'b']), "aSb");
        let alphabet: Alphabet = "ab".chars().collect();
        assert_eq!(alphabet.to_string(), "{ a, b }");
    }
}
