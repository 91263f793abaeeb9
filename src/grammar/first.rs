//! FIRST/FOLLOW fixed points.

use std::collections::BTreeSet;

use super::rules::{Grammar, SymbolId};

/// FIRST sets plus nullability for every grammar symbol.
///
/// `BTreeSet` keeps lookahead iteration in id order, which in turn
/// keeps the generated item sets (and the persisted table) identical
/// across builds.
pub(crate) struct FirstSets {
    first: Vec<BTreeSet<SymbolId>>,
    nullable: Vec<bool>,
}

impl FirstSets {
    pub fn compute<V>(grammar: &Grammar<V>) -> Self {
        let count = grammar.symbol_count();
        let mut first: Vec<BTreeSet<SymbolId>> = vec![BTreeSet::new(); count];
        let mut nullable = vec![false; count];

        for id in 0..count {
            if grammar.is_terminal(id) {
                first[id].insert(id);
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                let lhs = production.lhs;
                let mut all_nullable = true;
                for &symbol in &production.rhs {
                    let add: Vec<SymbolId> = first[symbol].iter().copied().collect();
                    for t in add {
                        changed |= first[lhs].insert(t);
                    }
                    if !nullable[symbol] {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable && !nullable[lhs] {
                    nullable[lhs] = true;
                    changed = true;
                }
            }
        }

        Self { first, nullable }
    }

    pub fn first(&self, symbol: SymbolId) -> &BTreeSet<SymbolId> {
        &self.first[symbol]
    }

    pub fn nullable(&self, symbol: SymbolId) -> bool {
        self.nullable[symbol]
    }

    /// FIRST of the string `symbols · lookahead`.
    pub fn first_of_string(&self, symbols: &[SymbolId], lookahead: SymbolId) -> BTreeSet<SymbolId> {
        let mut out = BTreeSet::new();
        for &symbol in symbols {
            out.extend(self.first[symbol].iter().copied());
            if !self.nullable[symbol] {
                return out;
            }
        }
        out.insert(lookahead);
        out
    }
}

impl<V> Grammar<V> {
    /// FIRST set of every symbol, indexed by symbol id.
    pub fn first_sets(&self) -> Vec<BTreeSet<SymbolId>> {
        FirstSets::compute(self).first
    }

    /// FOLLOW set of every nonterminal, indexed by symbol id
    /// (terminal entries stay empty). The start symbol's FOLLOW is
    /// seeded with the end-of-input terminal.
    pub fn follow_sets(&self) -> Vec<BTreeSet<SymbolId>> {
        let first = FirstSets::compute(self);
        let count = self.symbol_count();
        let mut follow: Vec<BTreeSet<SymbolId>> = vec![BTreeSet::new(); count];
        follow[self.start()].insert(self.eof());

        let mut changed = true;
        while changed {
            changed = false;
            for production in self.productions() {
                for (i, &symbol) in production.rhs.iter().enumerate() {
                    if self.is_terminal(symbol) {
                        continue;
                    }
                    let rest = &production.rhs[i + 1..];
                    let mut tail_nullable = true;
                    for &next in rest {
                        let add: Vec<SymbolId> = first.first(next).iter().copied().collect();
                        for t in add {
                            changed |= follow[symbol].insert(t);
                        }
                        if !first.nullable(next) {
                            tail_nullable = false;
                            break;
                        }
                    }
                    if tail_nullable {
                        let add: Vec<SymbolId> = follow[production.lhs].iter().copied().collect();
                        for t in add {
                            changed |= follow[symbol].insert(t);
                        }
                    }
                }
            }
        }

        follow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Token;

    fn leaf(_: &Token) -> u32 {
        0
    }

    /// S → A b ; A → a ; A → ε
    fn sample() -> Grammar<u32> {
        let mut g = Grammar::new("t", "S", leaf);
        g.terminals(&["a", "b"]);
        g.rule("S", &["A", "b"], |_| 0);
        g.rule("A", &["a"], |_| 0);
        g.rule("A", &[], |_| 0);
        g
    }

    #[test]
    fn first_handles_nullable_prefixes() {
        let g = sample();
        let first = g.first_sets();
        let s = g.symbol_id("S").unwrap();
        let a_t = g.symbol_id("a").unwrap();
        let b_t = g.symbol_id("b").unwrap();
        assert!(first[s].contains(&a_t));
        assert!(first[s].contains(&b_t));
    }

    #[test]
    fn follow_of_nullable_nonterminal_sees_past_it() {
        let g = sample();
        let follow = g.follow_sets();
        let a = g.symbol_id("A").unwrap();
        let b_t = g.symbol_id("b").unwrap();
        assert_eq!(follow[a].iter().copied().collect::<Vec<_>>(), vec![b_t]);
    }

    #[test]
    fn follow_of_start_contains_eof() {
        let g = sample();
        let follow = g.follow_sets();
        assert!(follow[g.start()].contains(&g.eof()));
    }
}
