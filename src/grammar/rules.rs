//! Symbols, productions, and the grammar registry.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::lexer::Token;
use crate::parser::Derivation;

/// Index of a symbol within its grammar.
pub type SymbolId = usize;

/// Spelling of the implicit end-of-input terminal.
pub const EOF_NAME: &str = "$";

/// Name of the augmented start symbol added by [`Grammar::new`].
pub(crate) const AUGMENTED_START: &str = "<start>";

#[derive(Debug, Clone)]
pub(crate) struct SymbolInfo {
    pub name: SmolStr,
    pub terminal: bool,
}

/// A production `lhs → rhs` with its semantic builder.
///
/// The builder is a pure function from the child semantic values to the
/// parent value; an empty `rhs` denotes ε.
pub struct Production<V> {
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
    pub build: fn(Vec<V>) -> V,
}

/// A context-free grammar with per-production semantic builders,
/// generic over the semantic value `V` its parses evaluate to.
///
/// Construction interns symbols by name: terminals must be registered
/// up front with [`Grammar::terminals`]; any other name appearing in a
/// rule becomes a nonterminal. Production 0 is the augmented start
/// `<start> → S`, which the parser accepts on rather than reduces.
pub struct Grammar<V> {
    name: SmolStr,
    symbols: Vec<SymbolInfo>,
    by_name: FxHashMap<SmolStr, SymbolId>,
    productions: Vec<Production<V>>,
    start: SymbolId,
    eof: SymbolId,
    leaf: fn(&Token) -> V,
}

impl<V> Grammar<V> {
    /// Create a grammar named `name` with start symbol `start`.
    /// `leaf` converts a shifted token into a semantic value.
    pub fn new(name: &str, start: &str, leaf: fn(&Token) -> V) -> Self {
        let mut grammar = Self {
            name: SmolStr::new(name),
            symbols: Vec::new(),
            by_name: FxHashMap::default(),
            productions: Vec::new(),
            start: 0,
            eof: 0,
            leaf,
        };
        grammar.eof = grammar.intern(EOF_NAME, true);
        let augmented = grammar.intern(AUGMENTED_START, false);
        grammar.start = grammar.intern(start, false);
        grammar.productions.push(Production {
            lhs: augmented,
            rhs: vec![grammar.start],
            build: |_children| unreachable!("augmented start is never reduced"),
        });
        grammar
    }

    fn intern(&mut self, name: &str, terminal: bool) -> SymbolId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.symbols.len();
        self.symbols.push(SymbolInfo {
            name: SmolStr::new(name),
            terminal,
        });
        self.by_name.insert(SmolStr::new(name), id);
        id
    }

    /// Register terminals by spelling.
    pub fn terminals(&mut self, names: &[&str]) {
        for name in names {
            self.intern(name, true);
        }
    }

    /// Register a production. Unknown right-hand-side names become
    /// nonterminals, so terminals must have been registered first.
    pub fn rule(&mut self, lhs: &str, rhs: &[&str], build: fn(Vec<V>) -> V) {
        let lhs = self.intern(lhs, false);
        let rhs = rhs.iter().map(|name| self.intern(name, false)).collect();
        self.productions.push(Production { lhs, rhs, build });
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    pub fn start(&self) -> SymbolId {
        self.start
    }

    pub fn eof(&self) -> SymbolId {
        self.eof
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbol_name(&self, id: SymbolId) -> &SmolStr {
        &self.symbols[id].name
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        self.symbols[id].terminal
    }

    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    /// All terminal names in id order (used for table validation).
    pub fn terminal_names(&self) -> Vec<SmolStr> {
        self.symbols
            .iter()
            .filter(|s| s.terminal)
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn productions(&self) -> &[Production<V>] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> &Production<V> {
        &self.productions[index]
    }

    /// Indices of all productions whose left-hand side is `lhs`.
    pub fn productions_for(&self, lhs: SymbolId) -> impl Iterator<Item = usize> + '_ {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.lhs == lhs)
            .map(|(i, _)| i)
    }

    /// Human-readable form of a production, for conflict reports.
    pub fn production_text(&self, index: usize) -> String {
        let production = &self.productions[index];
        let rhs = if production.rhs.is_empty() {
            "ε".to_string()
        } else {
            production
                .rhs
                .iter()
                .map(|&s| self.symbols[s].name.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!("{} → {}", self.symbols[production.lhs].name, rhs)
    }

    /// Fold a derivation tree bottom-up through the production
    /// builders, threading `tokens` for the leaves.
    pub fn evaluate(&self, tree: &Derivation, tokens: &[Token]) -> V {
        match tree {
            Derivation::Leaf { token } => (self.leaf)(&tokens[*token]),
            Derivation::Node {
                production,
                children,
            } => {
                let values = children
                    .iter()
                    .map(|child| self.evaluate(child, tokens))
                    .collect();
                (self.productions[*production].build)(values)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(_: &Token) -> u32 {
        0
    }

    #[test]
    fn symbols_are_interned_once() {
        let mut g: Grammar<u32> = Grammar::new("t", "S", leaf);
        g.terminals(&["a"]);
        g.rule("S", &["a", "S"], |_| 0);
        g.rule("S", &[], |_| 0);
        assert_eq!(g.symbol_id("a"), g.symbol_id("a"));
        assert!(g.is_terminal(g.symbol_id("a").unwrap()));
        assert!(!g.is_terminal(g.symbol_id("S").unwrap()));
        // augmented production plus the two rules
        assert_eq!(g.productions().len(), 3);
    }

    #[test]
    fn production_text_spells_epsilon() {
        let mut g: Grammar<u32> = Grammar::new("t", "S", leaf);
        g.rule("S", &[], |_| 0);
        assert_eq!(g.production_text(1), "S → ε");
    }
}
