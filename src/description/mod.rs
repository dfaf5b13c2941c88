//! Textual description loader.
//!
//! Descriptions are line-oriented. Before a line is interpreted, every space
//! and tab is removed and anything after `//` is dropped; lines that end up
//! empty are skipped. Line numbers in errors count every physical line.
//!
//! # Format
//!
//! NFA:
//! ```text
//! Q = { q0, q1 }
//! E = { a, b }
//! I = q0
//! F = { q1 }
//! d(q0, a) = { q0, q1 }
//! d(q0, *) = { q0 }      // every input symbol
//! d(q1, ~) = { q0 }      // λ-move
//! ```
//!
//! NPDA adds a stack alphabet `T` and start symbol `Z`:
//! ```text
//! T = { Z, A }
//! Z = Z
//! d(q0, a, Z) = { (q0, AZ), (q1, ~) }
//! ```
//!
//! CFG:
//! ```text
//! V = { S }
//! T = { a, b }
//! S = S
//! S -> aSb | ~
//! ```
//!
//! ```rust
//! use automata_sim::definition::Grammar;
//! use automata_sim::description::Description;
//!
//! let grammar = Grammar::parse("V={S}\nT={a,b}\nS=S\nS->aSb|~\n").unwrap();
//! assert_eq!(grammar.start(), 'S');
//! ```

mod cfg;
mod nfa;
mod npda;

use crate::error::DefinitionError;
use std::io::Read;
use std::path::Path;

/// Errors that can occur while loading a description or an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file was read but describes an invalid definition
    #[error("invalid description: {0}")]
    Definition(#[from] DefinitionError),
}

/// A definition that can be read from its textual notation.
pub trait Description: Sized {
    /// Parse a complete description.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Line`] for problems tied to a line and a
    /// bare [`DefinitionError`] for missing sections.
    fn parse(text: &str) -> Result<Self, DefinitionError>;

    /// Read and parse a description from `reader`.
    fn from_reader<R: Read>(mut reader: R) -> Result<Self, LoadError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::parse(&text)?)
    }

    /// Read and parse the description stored at `path`.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text)?)
    }
}

/// Strip spaces, tabs and any `//` comment from a raw line.
pub fn clean_line(raw: &str) -> String {
    let compact: String = raw.chars().filter(|&c| c != ' ' && c != '\t').collect();
    match compact.find("//") {
        Some(comment) => compact[..comment].to_string(),
        None => compact,
    }
}

/// Normalise an input string given on the command line.
///
/// Whitespace is removed and a lone `~` stands for the empty string.
pub fn parse_input(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned == crate::symbol::LAMBDA.to_string() {
        String::new()
    } else {
        cleaned
    }
}

/// Read an input string from a data file: every line is cleaned and the
/// results are concatenated.
pub fn read_data_file<P: AsRef<Path>>(path: P) -> Result<String, LoadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_input(
        &text.lines().map(clean_line).collect::<String>(),
    ))
}

/// Non-empty cleaned lines with their 1-based line numbers.
fn lines(text: &str) -> impl Iterator<Item = (usize, String)> + '_ {
    text.lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, clean_line(raw)))
        .filter(|(_, line)| !line.is_empty())
}

/// Store a section value, failing if the section was already given.
fn set_once<T>(slot: &mut Option<T>, value: T, section: &'static str) -> Result<(), DefinitionError> {
    if slot.is_some() {
        return Err(DefinitionError::DuplicateSection(section));
    }
    *slot = Some(value);
    Ok(())
}

/// Split `{a,b,c}` into its items. `{}` yields no items.
fn braced_list<'a>(body: &'a str, expected: &'static str) -> Result<Vec<&'a str>, DefinitionError> {
    let inner = body
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or(DefinitionError::Syntax { expected })?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(',').collect())
}

/// Split `{a,b,c}` into single-character symbols.
fn braced_symbols(body: &str, expected: &'static str) -> Result<Vec<char>, DefinitionError> {
    braced_list(body, expected)?
        .into_iter()
        .map(single_char)
        .collect()
}

/// Split `{q0,q1}` into state names, rejecting empty names.
fn braced_states(body: &str, expected: &'static str) -> Result<Vec<String>, DefinitionError> {
    braced_list(body, expected)?
        .into_iter()
        .map(|name| {
            if name.is_empty() {
                Err(DefinitionError::Syntax { expected })
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}

fn single_char(item: &str) -> Result<char, DefinitionError> {
    let mut chars = item.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(DefinitionError::MultiCharSymbol(item.to_string())),
    }
}

/// Fail with `UnknownState` unless `name` was declared.
fn known_state(states: &[String], name: &str) -> Result<(), DefinitionError> {
    if states.iter().any(|state| state == name) {
        Ok(())
    } else {
        Err(DefinitionError::UnknownState(name.to_string()))
    }
}

/// Split a two-character section key (`Q=`, `d(`) from the rest of a line,
/// upper-casing the key.
fn section_key(line: &str) -> Option<(String, &str)> {
    let split = line.char_indices().nth(2).map_or(line.len(), |(i, _)| i);
    let (key, rest) = line.split_at(split);
    if key.chars().count() < 2 {
        return None;
    }
    Some((key.to_uppercase(), rest))
}
