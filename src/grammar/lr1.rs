//! Canonical LR(1) item-set construction and table assembly.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::first::FirstSets;
use super::rules::{Grammar, SymbolId};
use super::table::{Action, ParseTable, TableError};

/// A dotted production with a one-terminal lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    production: usize,
    dot: usize,
    lookahead: SymbolId,
}

impl Item {
    fn next_symbol<V>(&self, grammar: &Grammar<V>) -> Option<SymbolId> {
        grammar.production(self.production).rhs.get(self.dot).copied()
    }
}

/// Closure-saturate `items`. The result is sorted and deduplicated so
/// item sets compare as unordered sets.
fn closure<V>(grammar: &Grammar<V>, first: &FirstSets, mut items: Vec<Item>) -> Vec<Item> {
    items.sort_unstable();
    items.dedup();
    let mut seen: FxHashSet<Item> = items.iter().copied().collect();

    let mut index = 0;
    while index < items.len() {
        let item = items[index];
        index += 1;

        let Some(next) = item.next_symbol(grammar) else {
            continue;
        };
        if grammar.is_terminal(next) {
            continue;
        }

        // For A → α · B β, a: add B → · γ, b for every b ∈ FIRST(β a).
        let beta = &grammar.production(item.production).rhs[item.dot + 1..];
        let lookaheads = first.first_of_string(beta, item.lookahead);

        for production in grammar.productions_for(next) {
            for &lookahead in &lookaheads {
                let new_item = Item {
                    production,
                    dot: 0,
                    lookahead,
                };
                if seen.insert(new_item) {
                    items.push(new_item);
                }
            }
        }
    }

    items.sort_unstable();
    items
}

/// Items of `set` advanced across `symbol`, closed.
fn goto<V>(grammar: &Grammar<V>, first: &FirstSets, set: &[Item], symbol: SymbolId) -> Vec<Item> {
    let advanced: Vec<Item> = set
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(symbol))
        .map(|item| Item {
            production: item.production,
            dot: item.dot + 1,
            lookahead: item.lookahead,
        })
        .collect();
    closure(grammar, first, advanced)
}

/// Build the canonical LR(1) parse table for `grammar`.
///
/// Any shift/reduce or reduce/reduce collision is a fatal error
/// reported with both actions and the offending lookahead.
pub fn build_table<V>(grammar: &Grammar<V>) -> Result<ParseTable, TableError> {
    let first = FirstSets::compute(grammar);

    let start_item = Item {
        production: 0,
        dot: 0,
        lookahead: grammar.eof(),
    };
    let mut sets: Vec<Vec<Item>> = vec![closure(grammar, &first, vec![start_item])];
    let mut table = ParseTable::with_shape(grammar.name().clone(), grammar.terminal_names());
    table.push_state();

    let mut state = 0;
    while state < sets.len() {
        // Transition symbols in id order: determinism of the emitted
        // table depends on it.
        let mut symbols: Vec<SymbolId> = sets[state]
            .iter()
            .filter_map(|item| item.next_symbol(grammar))
            .collect();
        symbols.sort_unstable();
        symbols.dedup();

        for symbol in symbols {
            let target_set = goto(grammar, &first, &sets[state], symbol);
            let target = match sets.iter().position(|s| *s == target_set) {
                Some(existing) => existing,
                None => {
                    sets.push(target_set);
                    table.push_state();
                    sets.len() - 1
                }
            };

            if grammar.is_terminal(symbol) {
                table.set_action(
                    grammar,
                    state,
                    symbol,
                    Action::Shift(target),
                    None,
                )?;
            } else {
                table.set_goto(grammar, state, symbol, target);
            }
        }

        for item in &sets[state] {
            if item.next_symbol(grammar).is_some() {
                continue;
            }
            if item.production == 0 {
                // <start> → S ·, $
                table.set_action(grammar, state, grammar.eof(), Action::Accept, None)?;
            } else {
                table.set_action(
                    grammar,
                    state,
                    item.lookahead,
                    Action::Reduce(item.production),
                    Some(item.production),
                )?;
            }
        }

        state += 1;
    }

    debug!(
        grammar = grammar.name().as_str(),
        states = sets.len(),
        "LR(1) construction finished"
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Token;

    fn leaf(_: &Token) -> u32 {
        0
    }

    /// The classic LR(1)-but-not-SLR grammar:
    /// S → C C ; C → c C ; C → d
    fn cc_grammar() -> Grammar<u32> {
        let mut g = Grammar::new("cc", "S", leaf);
        g.terminals(&["c", "d"]);
        g.rule("S", &["C", "C"], |_| 0);
        g.rule("C", &["c", "C"], |_| 0);
        g.rule("C", &["d"], |_| 0);
        g
    }

    #[test]
    fn cc_grammar_builds_without_conflicts() {
        let table = build_table(&cc_grammar()).unwrap();
        // Canonical LR(1) for this grammar has 10 states.
        assert_eq!(table.state_count(), 10);
    }

    #[test]
    fn ambiguous_grammar_reports_a_conflict() {
        // E → E + E is shift/reduce ambiguous.
        let mut g: Grammar<u32> = Grammar::new("amb", "E", leaf);
        g.terminals(&["+", "x"]);
        g.rule("E", &["E", "+", "E"], |_| 0);
        g.rule("E", &["x"], |_| 0);
        let err = build_table(&g).unwrap_err();
        match err {
            TableError::Conflict { lookahead, .. } => assert_eq!(lookahead, "+"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn rebuilding_yields_identical_tables() {
        let a = serde_json::to_string(&build_table(&cc_grammar()).unwrap()).unwrap();
        let b = serde_json::to_string(&build_table(&cc_grammar()).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
