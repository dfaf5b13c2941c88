//! CFG notation: `V=`, `T=`, `S=` headers and `A->x|y` productions.

use super::{braced_symbols, lines, set_once, single_char, Description};
use crate::definition::{checked_alphabet, Grammar};
use crate::error::DefinitionError;
use crate::symbol::LAMBDA;

const VARIABLES: &str = "V - set of variables";
const TERMINALS: &str = "T - set of terminals";
const START: &str = "S - start variable";

const VARIABLES_SYNTAX: &str = "V = { S, A, B, ... }";
const TERMINALS_SYNTAX: &str = "T = { a, b, ... }";
const START_SYNTAX: &str = "S = S";
const PRODUCTION_SYNTAX: &str = "S -> ... | ...";

#[derive(Default)]
struct Sections {
    variables: Option<Vec<char>>,
    terminals: Option<Vec<char>>,
    start: Option<char>,
    productions: Vec<(char, Vec<String>)>,
}

impl Sections {
    fn apply(&mut self, line: &str) -> Result<(), DefinitionError> {
        if let Some(rest) = line.strip_prefix("V=") {
            let symbols = braced_symbols(rest, VARIABLES_SYNTAX)?;
            checked_alphabet(symbols.iter().copied())?;
            set_once(&mut self.variables, symbols, VARIABLES)
        } else if let Some(rest) = line.strip_prefix("T=") {
            let symbols = braced_symbols(rest, TERMINALS_SYNTAX)?;
            checked_alphabet(symbols.iter().copied())?;
            set_once(&mut self.terminals, symbols, TERMINALS)
        } else if let Some(rest) = line.strip_prefix("S=") {
            let start = single_char(rest).map_err(|_| DefinitionError::Syntax {
                expected: START_SYNTAX,
            })?;
            if let Some(variables) = &self.variables {
                if !variables.contains(&start) {
                    return Err(DefinitionError::NotAVariable(start));
                }
            }
            set_once(&mut self.start, start, START)
        } else {
            self.production(line)
        }
    }

    fn production(&mut self, line: &str) -> Result<(), DefinitionError> {
        let (Some(variables), Some(terminals)) = (&self.variables, &self.terminals) else {
            return Err(DefinitionError::RuleBeforeHeader("V and T"));
        };

        let (lhs, rhs) = line.split_once("->").ok_or(DefinitionError::Syntax {
            expected: PRODUCTION_SYNTAX,
        })?;
        let lhs = single_char(lhs).map_err(|_| DefinitionError::Syntax {
            expected: PRODUCTION_SYNTAX,
        })?;
        if !variables.contains(&lhs) {
            return Err(DefinitionError::NotAVariable(lhs));
        }

        let alternatives: Vec<String> = rhs.split('|').map(str::to_string).collect();
        for alternative in &alternatives {
            if let Some(symbol) = alternative
                .chars()
                .find(|c| *c != LAMBDA && !variables.contains(c) && !terminals.contains(c))
            {
                return Err(DefinitionError::UnknownSymbol {
                    symbol,
                    alphabet: "variables or terminals",
                });
            }
        }

        self.productions.push((lhs, alternatives));
        Ok(())
    }

    fn build(self) -> Result<Grammar, DefinitionError> {
        let variables = self.variables.ok_or(DefinitionError::MissingSection(VARIABLES))?;
        let terminals = self.terminals.ok_or(DefinitionError::MissingSection(TERMINALS))?;
        let start = self.start.ok_or(DefinitionError::MissingSection(START))?;

        let mut builder = Grammar::builder()
            .variables(variables)
            .terminals(terminals)
            .start(start);
        for (lhs, alternatives) in self.productions {
            builder.push_production(lhs, alternatives);
        }
        builder.build()
    }
}

impl Description for Grammar {
    fn parse(text: &str) -> Result<Self, DefinitionError> {
        let mut sections = Sections::default();
        for (number, line) in lines(text) {
            sections.apply(&line).map_err(|err| err.at_line(number))?;
        }
        sections.build()
    }
}
