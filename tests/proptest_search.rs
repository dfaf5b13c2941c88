//! Property-based tests for the three search engines
//!
//! Random small machines are generated from index-based recipes and then
//! built through the public builders.

use automata_sim::nfa::lambda_closure;
use automata_sim::prelude::*;
use automata_sim::definition::StateSet;
use proptest::prelude::*;

const SYMBOLS: [char; 3] = ['a', 'b', '~'];

fn state(i: usize) -> String {
    format!("q{}", i)
}

// Strategy for input words over {a, b}
fn word_strategy(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['a', 'b']), 0..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// (state count, finals mask, rules as (from, symbol index, target mask))
type NfaRecipe = (usize, u8, Vec<(usize, usize, u8)>);

fn nfa_strategy() -> impl Strategy<Value = NfaRecipe> {
    (1usize..=4).prop_flat_map(|n| {
        (
            Just(n),
            any::<u8>(),
            prop::collection::vec((0..n, 0..SYMBOLS.len(), any::<u8>()), 0..=10),
        )
    })
}

fn build_nfa((n, finals, rules): &NfaRecipe) -> FiniteAutomaton {
    let mut builder = FiniteAutomaton::builder()
        .states((0..*n).map(state))
        .alphabet(['a', 'b'])
        .initial(state(0))
        .finals((0..*n).filter(|i| finals & (1 << i) != 0).map(state));
    for &(from, symbol, targets) in rules {
        builder.push_rule(
            state(from),
            SYMBOLS[symbol],
            (0..*n).filter(|i| targets & (1 << i) != 0).map(state),
        );
    }
    builder.build().unwrap()
}

/// (state count, finals mask, rules as (from, input index, top, [(target, push)]))
type NpdaRecipe = (usize, u8, Vec<(usize, usize, usize, Vec<(usize, Vec<usize>)>)>);

const STACK: [char; 2] = ['Z', 'A'];

fn npda_strategy(allow_lambda: bool) -> impl Strategy<Value = NpdaRecipe> {
    let inputs: usize = if allow_lambda { 3 } else { 2 };
    (1usize..=3).prop_flat_map(move |n| {
        let alternative = (0..n, prop::collection::vec(0..STACK.len(), 0..=2));
        (
            Just(n),
            any::<u8>(),
            prop::collection::vec(
                (
                    0..n,
                    0..inputs,
                    0..STACK.len(),
                    prop::collection::vec(alternative, 1..=2),
                ),
                0..=8,
            ),
        )
    })
}

fn build_npda((n, finals, rules): &NpdaRecipe) -> PushdownAutomaton {
    let mut builder = PushdownAutomaton::builder()
        .states((0..*n).map(state))
        .input_alphabet(['a', 'b'])
        .stack_alphabet(STACK)
        .start_symbol('Z')
        .initial(state(0))
        .finals((0..*n).filter(|i| finals & (1 << i) != 0).map(state));
    for (from, input, top, moves) in rules {
        builder.push_rule(
            state(*from),
            SYMBOLS[*input],
            STACK[*top],
            moves.iter().map(|(target, push)| {
                (
                    state(*target),
                    push.iter().map(|&s| STACK[s]).collect::<String>(),
                )
            }),
        );
    }
    builder.build().unwrap()
}

/// Productions as (lhs variable index, rhs symbol indices). Indices below
/// the variable count are variables, the rest are terminals.
type GrammarRecipe = Vec<(usize, Vec<usize>)>;

const VARIABLES: [char; 2] = ['S', 'A'];
const GRAMMAR_SYMBOLS: [char; 4] = ['S', 'A', 'a', 'b'];

fn grammar_strategy() -> impl Strategy<Value = GrammarRecipe> {
    prop::collection::vec(
        (
            0..VARIABLES.len(),
            prop::collection::vec(0..GRAMMAR_SYMBOLS.len(), 0..=3),
        ),
        1..=5,
    )
}

fn build_grammar(recipe: &GrammarRecipe) -> Grammar {
    let mut builder = Grammar::builder()
        .variables(VARIABLES)
        .terminals(['a', 'b'])
        .start('S');
    for (lhs, rhs) in recipe {
        builder.push_production(
            VARIABLES[*lhs],
            [rhs.iter().map(|&s| GRAMMAR_SYMBOLS[s]).collect::<String>()],
        );
    }
    builder.build().unwrap()
}

/// Check that each step of `derivation` rewrites one variable of the
/// previous form with the recorded production.
fn is_valid_derivation(derivation: &Derivation, start: char, target: &str) -> bool {
    let forms: Vec<Vec<char>> = derivation
        .steps
        .iter()
        .map(|step| {
            if step.form == "ε" {
                Vec::new()
            } else {
                step.form.chars().collect()
            }
        })
        .collect();
    if forms.first() != Some(&vec![start]) {
        return false;
    }
    let last: String = forms.last().map(|f| f.iter().collect()).unwrap_or_default();
    if last != target {
        return false;
    }
    derivation.steps.windows(2).zip(forms.windows(2)).all(|(steps, pair)| {
        let Some(production) = &steps[1].production else {
            return false;
        };
        (0..pair[0].len()).any(|i| {
            pair[0][i] == production.lhs && {
                let mut rewritten = pair[0][..i].to_vec();
                rewritten.extend_from_slice(&production.rhs);
                rewritten.extend_from_slice(&pair[0][i + 1..]);
                rewritten == pair[1]
            }
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_closure_is_idempotent_superset(recipe in nfa_strategy(), mask in any::<u8>()) {
        let nfa = build_nfa(&recipe);
        let set: StateSet = nfa
            .states()
            .ids()
            .filter(|id| mask & (1 << id.index()) != 0)
            .collect();

        let once = lambda_closure(&nfa, &set, &mut NoTrace);
        let twice = lambda_closure(&nfa, &once, &mut NoTrace);
        prop_assert!(once.is_superset(&set));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_nfa_empty_input_uses_start_closure(recipe in nfa_strategy()) {
        let nfa = build_nfa(&recipe);
        let start = lambda_closure(&nfa, &StateSet::from([nfa.initial()]), &mut NoTrace);
        let expected = start.iter().any(|&s| nfa.is_final(s));
        prop_assert_eq!(NfaSimulator::new(&nfa).accepts("").unwrap(), expected);
    }

    #[test]
    fn prop_npda_runs_are_reproducible(recipe in npda_strategy(true), input in word_strategy(5)) {
        let npda = build_npda(&recipe);
        let exec = NpdaExecutor::new(&npda)
            .with_limits(SearchLimits::unbounded().with_max_steps(5_000));
        let first = exec.run(&input, &mut NoTrace);
        let second = exec.run(&input, &mut NoTrace);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_npda_prune_keeps_verdict(recipe in npda_strategy(false), input in word_strategy(5)) {
        // Without λ-moves every move consumes input, so both searches end.
        let npda = build_npda(&recipe);
        let explore = NpdaExecutor::new(&npda).run(&input, &mut NoTrace).unwrap();
        let prune = NpdaExecutor::new(&npda)
            .with_limits(SearchLimits::unbounded().with_revisit(RevisitPolicy::Prune))
            .run(&input, &mut NoTrace)
            .unwrap();
        prop_assert_eq!(explore.verdict, prune.verdict);
        prop_assert_eq!(explore.witness, prune.witness);
    }

    #[test]
    fn prop_cfg_derivations_are_valid_and_minimal(recipe in grammar_strategy(), target in word_strategy(3)) {
        let grammar = build_grammar(&recipe);
        let explore = DerivationSearch::new(&grammar)
            .with_limits(SearchLimits::unbounded().with_max_steps(3_000))
            .run(&target, &mut NoTrace);
        let prune = DerivationSearch::new(&grammar)
            .with_limits(
                SearchLimits::unbounded()
                    .with_max_steps(3_000)
                    .with_revisit(RevisitPolicy::Prune),
            )
            .run(&target, &mut NoTrace);

        if let Ok(outcome) = &explore {
            if let Some(derivation) = &outcome.derivation {
                prop_assert!(is_valid_derivation(derivation, 'S', &target));
            }
        }
        if let (Ok(explore), Ok(prune)) = (&explore, &prune) {
            prop_assert_eq!(explore.verdict, prune.verdict);
            let steps = |o: &CfgOutcome| o.derivation.as_ref().map(Derivation::production_count);
            prop_assert_eq!(steps(explore), steps(prune));
        }
    }
}
