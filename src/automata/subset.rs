//! Subset-construction determinization.

use std::collections::VecDeque;

use super::machine::{Automaton, StateId};

impl Automaton {
    /// ε-closure of `set`, in place. `set` stays sorted and deduplicated
    /// so subsets can be compared as unordered sets.
    fn epsilon_closure(&self, set: &mut Vec<StateId>) {
        let mut pending: Vec<StateId> = set.clone();
        while let Some(state) = pending.pop() {
            for &eps in &self.state(state).epsilon {
                if let Err(pos) = set.binary_search(&eps) {
                    set.insert(pos, eps);
                    pending.push(eps);
                }
            }
        }
    }

    /// Subset moved across an explicit `symbol` edge, ε-closed.
    fn go_to_symbol(&self, set: &[StateId], symbol: char) -> Vec<StateId> {
        let mut out = Vec::new();
        for &state in set {
            if let Some(target) = self.state(state).go_to(symbol) {
                if let Err(pos) = out.binary_search(&target) {
                    out.insert(pos, target);
                }
            }
        }
        self.epsilon_closure(&mut out);
        out
    }

    /// Subset moved across the complement ("default") edge, ε-closed.
    fn go_to_complement(&self, set: &[StateId]) -> Vec<StateId> {
        let mut out = Vec::new();
        for &state in set {
            if let Some(target) = self.state(state).complement {
                if let Err(pos) = out.binary_search(&target) {
                    out.insert(pos, target);
                }
            }
        }
        self.epsilon_closure(&mut out);
        out
    }

    /// Determinize by subset construction.
    pub fn determinize(&self) -> Automaton {
        self.determinize_with_subsets().0
    }

    /// Determinize, also reporting which source states each DFA state
    /// was built from. The lexer uses the subsets to map accepting DFA
    /// states back to the rule that contributed them.
    pub fn determinize_with_subsets(&self) -> (Automaton, Vec<Vec<StateId>>) {
        let mut dfa = Automaton::new();
        let mut subsets: Vec<Vec<StateId>> = Vec::new();

        let mut initial = vec![self.initial()];
        self.epsilon_closure(&mut initial);
        if initial.iter().any(|&s| self.state(s).finished) {
            dfa.mark_final(dfa.initial());
        }
        subsets.push(initial);

        let mut queue: VecDeque<StateId> = VecDeque::new();
        queue.push_back(dfa.initial());

        while let Some(node) = queue.pop_front() {
            // Symbols are visited in sorted order so repeated builds
            // of the same machine are identical state for state.
            let mut symbols: Vec<char> = subsets[node]
                .iter()
                .flat_map(|&s| self.state(s).transitions.keys().copied())
                .collect();
            symbols.sort_unstable();
            symbols.dedup();

            for symbol in symbols {
                let target = self.go_to_symbol(&subsets[node], symbol);
                self.connect(target, &mut dfa, &mut subsets, &mut queue, node, Some(symbol));
            }

            let target = self.go_to_complement(&subsets[node]);
            self.connect(target, &mut dfa, &mut subsets, &mut queue, node, None);
        }

        (dfa, subsets)
    }

    /// Fuse `target` with an existing subset (linear scan) or mint a new
    /// DFA state for it, then wire the edge from `node`.
    fn connect(
        &self,
        target: Vec<StateId>,
        dfa: &mut Automaton,
        subsets: &mut Vec<Vec<StateId>>,
        queue: &mut VecDeque<StateId>,
        node: StateId,
        symbol: Option<char>,
    ) {
        if target.is_empty() {
            return;
        }

        let existing = subsets.iter().position(|s| *s == target);
        let next = match existing {
            Some(id) => id,
            None => {
                let id = dfa.add_state();
                if target.iter().any(|&s| self.state(s).finished) {
                    dfa.mark_final(id);
                }
                subsets.push(target);
                queue.push_back(id);
                id
            }
        };

        match symbol {
            Some(symbol) => dfa.add_transition(node, symbol, next),
            None => dfa.add_complement(node, next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab_star_c() -> Automaton {
        // (a|b)*c
        let mut inner = Automaton::literal("a");
        inner.union(Automaton::literal("b"));
        inner.closure();
        inner.concat(Automaton::literal("c"));
        inner
    }

    #[test]
    fn determinized_machine_has_no_epsilons() {
        let dfa = ab_star_c().determinize();
        assert!(dfa.states().iter().all(|s| s.epsilon.is_empty()));
    }

    #[test]
    fn determinization_preserves_language() {
        let nfa = ab_star_c();
        let dfa = nfa.determinize();
        for input in ["c", "ac", "bc", "abbac", "", "ab", "ca", "abd"] {
            assert_eq!(
                nfa.matches(input),
                dfa.matches(input),
                "disagreement on {input:?}"
            );
        }
    }

    #[test]
    fn complement_edges_survive_determinization() {
        // '.' then 'x': anything (one char) followed by x
        let mut any = Automaton::new();
        let accept = any.add_state();
        any.add_complement(any.initial(), accept);
        any.mark_final(accept);
        any.concat(Automaton::literal("x"));

        let dfa = any.determinize();
        assert!(dfa.matches("ax"));
        assert!(dfa.matches("zx"));
        assert!(!dfa.matches("x"));
        assert!(!dfa.matches("axx"));
    }
}
