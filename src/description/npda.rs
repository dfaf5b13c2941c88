//! NPDA notation: `Q=`, `E=`, `T=`, `Z=`, `I=`, `F=` headers followed by
//! `d(q,a,Z)={(q',push),..}` rules.

use super::{
    braced_states, braced_symbols, known_state, lines, section_key, set_once, single_char,
    Description,
};
use crate::definition::{checked_alphabet, PushdownAutomaton};
use crate::error::DefinitionError;
use crate::symbol::{LAMBDA, WILDCARD};

const STATES: &str = "Q - set of internal states";
const INPUT: &str = "E - input alphabet";
const STACK: &str = "T - stack alphabet";
const START: &str = "Z - stack start symbol";
const INITIAL: &str = "I - initial state";
const FINALS: &str = "F - set of final states";

const STATES_SYNTAX: &str = "Q = { q0, q1, ... }";
const INPUT_SYNTAX: &str = "E = { a, b, ... }";
const STACK_SYNTAX: &str = "T = { Z, A, ... }";
const FINALS_SYNTAX: &str = "F = { q1, q2, ... }";
const RULE_SYNTAX: &str = "d(q0, a, Z) = { (q1, AZ), (q2, ~) }";

struct RawRule {
    from: String,
    input: char,
    top: char,
    moves: Vec<(String, String)>,
}

#[derive(Default)]
struct Sections {
    states: Option<Vec<String>>,
    input: Option<Vec<char>>,
    stack: Option<Vec<char>>,
    start: Option<char>,
    initial: Option<String>,
    finals: Option<Vec<String>>,
    rules: Vec<RawRule>,
}

impl Sections {
    fn apply(&mut self, key: &str, rest: &str) -> Result<(), DefinitionError> {
        match key {
            "Q=" => set_once(&mut self.states, braced_states(rest, STATES_SYNTAX)?, STATES),
            "E=" => {
                let symbols = braced_symbols(rest, INPUT_SYNTAX)?;
                checked_alphabet(symbols.iter().copied())?;
                set_once(&mut self.input, symbols, INPUT)
            }
            "T=" => {
                let symbols = braced_symbols(rest, STACK_SYNTAX)?;
                checked_alphabet(symbols.iter().copied())?;
                set_once(&mut self.stack, symbols, STACK)
            }
            "Z=" => {
                let symbol = single_char(rest)?;
                if let Some(stack) = &self.stack {
                    if !stack.contains(&symbol) {
                        return Err(DefinitionError::UnknownSymbol {
                            symbol,
                            alphabet: "stack alphabet",
                        });
                    }
                }
                set_once(&mut self.start, symbol, START)
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
                log::warn!("ignoring unrecognised NPDA section '{}'", other);
                Ok(())
            }
        }
    }

    /// `rest` is everything after `d(`, e.g. `q0,a,Z)={(q0,AZ),(q1,~)}`.
    fn rule(&mut self, rest: &str) -> Result<(), DefinitionError> {
        let (Some(states), Some(input), Some(stack), Some(_), Some(_), Some(_)) = (
            &self.states,
            &self.input,
            &self.stack,
            &self.start,
            &self.initial,
            &self.finals,
        ) else {
            return Err(DefinitionError::RuleBeforeHeader("Q, E, T, Z, I and F"));
        };

        let syntax = DefinitionError::Syntax {
            expected: RULE_SYNTAX,
        };
        let (cell, targets) = rest.split_once(")=").ok_or(syntax.clone())?;
        let (head, top) = cell.rsplit_once(',').ok_or(syntax.clone())?;
        let (from, symbol) = head.rsplit_once(',').ok_or(syntax.clone())?;
        let symbol = single_char(symbol)?;
        let top = single_char(top)?;

        known_state(states, from)?;
        if symbol != LAMBDA && symbol != WILDCARD && !input.contains(&symbol) {
            return Err(DefinitionError::UnknownSymbol {
                symbol,
                alphabet: "input alphabet",
            });
        }
        if top != WILDCARD && !stack.contains(&top) {
            return Err(DefinitionError::UnknownSymbol {
                symbol: top,
                alphabet: "stack alphabet",
            });
        }

        let inner = targets
            .strip_prefix("{(")
            .and_then(|s| s.strip_suffix(")}"))
            .ok_or(syntax.clone())?;
        let mut moves = Vec::new();
        for alternative in inner.split("),(") {
            let (target, push) = alternative.split_once(',').ok_or(syntax.clone())?;
            known_state(states, target)?;
            if let Some(bad) = push
                .chars()
                .find(|&c| c != LAMBDA && !stack.contains(&c))
            {
                return Err(DefinitionError::UnknownSymbol {
                    symbol: bad,
                    alphabet: "stack alphabet",
                });
            }
            moves.push((target.to_string(), push.to_string()));
        }

        self.rules.push(RawRule {
            from: from.to_string(),
            input: symbol,
            top,
            moves,
        });
        Ok(())
    }

    fn build(self) -> Result<PushdownAutomaton, DefinitionError> {
        let states = self.states.ok_or(DefinitionError::MissingSection(STATES))?;
        let input = self.input.ok_or(DefinitionError::MissingSection(INPUT))?;
        let stack = self.stack.ok_or(DefinitionError::MissingSection(STACK))?;
        let start = self.start.ok_or(DefinitionError::MissingSection(START))?;
        let initial = self.initial.ok_or(DefinitionError::MissingSection(INITIAL))?;
        let finals = self.finals.ok_or(DefinitionError::MissingSection(FINALS))?;

        let mut builder = PushdownAutomaton::builder()
            .states(states)
            .input_alphabet(input)
            .stack_alphabet(stack)
            .start_symbol(start)
            .initial(initial)
            .finals(finals);
        for rule in self.rules {
            builder.push_rule(rule.from, rule.input, rule.top, rule.moves);
        }
        builder.build()
    }
}

impl Description for PushdownAutomaton {
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
