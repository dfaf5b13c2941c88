//! NFA notation: `Q=`, `E=`, `I=`, `F=` headers followed by `d(q,a)={..}` rules.

use super::{
    braced_states, braced_symbols, known_state, lines, section_key, set_once, single_char,
    Description,
};
use crate::definition::{checked_alphabet, FiniteAutomaton};
use crate::error::DefinitionError;
use crate::symbol::{LAMBDA, WILDCARD};

const STATES: &str = "Q - set of internal states";
const ALPHABET: &str = "E - alphabet / set of symbols";
const INITIAL: &str = "I - initial state";
const FINALS: &str = "F - set of final states";

const STATES_SYNTAX: &str = "Q = { q0, q1, ... }";
const ALPHABET_SYNTAX: &str = "E = { a, b, ... }";
const FINALS_SYNTAX: &str = "F = { q1, q2, ... }";
const RULE_SYNTAX: &str = "d(q0, a) = { q1, q2, ... }";

#[derive(Default)]
struct Sections {
    states: Option<Vec<String>>,
    alphabet: Option<Vec<char>>,
    initial: Option<String>,
    finals: Option<Vec<String>>,
    rules: Vec<(String, char, Vec<String>)>,
}

impl Sections {
    fn apply(&mut self, key: &str, rest: &str) -> Result<(), DefinitionError> {
        match key {
            "Q=" => set_once(&mut self.states, braced_states(rest, STATES_SYNTAX)?, STATES),
            "E=" => {
                let symbols = braced_symbols(rest, ALPHABET_SYNTAX)?;
                checked_alphabet(symbols.iter().copied())?;
                set_once(&mut self.alphabet, symbols, ALPHABET)
            }
            "I=" => {
                if let Some(states) = &self.states {
                    known_state(states, rest)?;
                }
                set_once(&mut self.initial, rest.to_string(), INITIAL)
            }
            "F=" => {
                let finals = braced_states(rest, FINALS_SYNTAX)?;
                if let Some(states) = &self.states {
                    for name in &finals {
                        known_state(states, name)?;
                    }
                }
                set_once(&mut self.finals, finals, FINALS)
            }
            "D(" => self.rule(rest),
            other => {
                log::warn!("ignoring unrecognised NFA section '{}'", other);
                Ok(())
            }
        }
    }

    /// `rest` is everything after `d(`, e.g. `q0,a)={q1,q2}`.
    fn rule(&mut self, rest: &str) -> Result<(), DefinitionError> {
        let (Some(states), Some(alphabet), Some(_), Some(_)) =
            (&self.states, &self.alphabet, &self.initial, &self.finals)
        else {
            return Err(DefinitionError::RuleBeforeHeader("Q, E, I and F"));
        };

        let syntax = DefinitionError::Syntax {
            expected: RULE_SYNTAX,
        };
        let (cell, targets) = rest.split_once(")=").ok_or(syntax.clone())?;
        let (from, symbol) = cell.rsplit_once(',').ok_or(syntax)?;
        let symbol = single_char(symbol)?;
        let targets = braced_states(targets, RULE_SYNTAX)?;

        known_state(states, from)?;
        if symbol != LAMBDA && symbol != WILDCARD && !alphabet.contains(&symbol) {
            return Err(DefinitionError::UnknownSymbol {
                symbol,
                alphabet: "input alphabet",
            });
        }
        for target in &targets {
            known_state(states, target)?;
        }

        self.rules.push((from.to_string(), symbol, targets));
        Ok(())
    }

    fn build(self) -> Result<FiniteAutomaton, DefinitionError> {
        let states = self.states.ok_or(DefinitionError::MissingSection(STATES))?;
        let alphabet = self.alphabet.ok_or(DefinitionError::MissingSection(ALPHABET))?;
        let initial = self.initial.ok_or(DefinitionError::MissingSection(INITIAL))?;
        let finals = self.finals.ok_or(DefinitionError::MissingSection(FINALS))?;

        let mut builder = FiniteAutomaton::builder()
            .states(states)
            .alphabet(alphabet)
            .initial(initial)
            .finals(finals);
        for (from, symbol, targets) in self.rules {
            builder.push_rule(from, symbol, targets);
        }
        builder.build()
    }
}

impl Description for FiniteAutomaton {
    fn parse(text: &str) -> Result<Self, DefinitionError> {
        let mut sections = Sections::default();
        for (number, line) in lines(text) {
            let Some((key, rest)) = section_key(&line) else {
                return Err(DefinitionError::Syntax {
                    expected: RULE_SYNTAX,
                }
                .at_line(number));
            };
            sections
                .apply(&key, rest)
                .map_err(|err| err.at_line(number))?;
        }
        sections.build()
    }
}
