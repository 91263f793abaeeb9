//! Automaton arena and Thompson-style combinators.

use rustc_hash::{FxHashMap, FxHashSet};

/// Index of a state within its automaton's arena.
pub type StateId = usize;

/// A single automaton state.
///
/// Invariants: every successor index refers into the owning automaton's
/// arena, and a state's own index equals its position in that arena.
#[derive(Debug, Clone, Default)]
pub struct State {
    /// Accepting flag.
    pub finished: bool,
    /// Explicit per-symbol successors.
    pub transitions: FxHashMap<char, StateId>,
    /// ε-successors, kept deduplicated.
    pub epsilon: Vec<StateId>,
    /// Successor taken when no explicit symbol edge matches.
    pub complement: Option<StateId>,
}

impl State {
    /// Successor for `symbol`: the explicit edge when present,
    /// otherwise the complement edge.
    pub fn go_to(&self, symbol: char) -> Option<StateId> {
        match self.transitions.get(&symbol) {
            Some(&target) => Some(target),
            None => self.complement,
        }
    }
}

/// A finite automaton over single-character input.
///
/// Fresh machines start with one non-accepting state which is also the
/// initial state. Combinators absorb their argument's states, re-basing
/// indices, so the arena invariant holds at all times.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    initial: StateId,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton {
    pub fn new() -> Self {
        Self {
            states: vec![State::default()],
            initial: 0,
        }
    }

    /// An automaton with no states yet; used when rebuilding from a
    /// serialized record.
    pub(crate) fn empty() -> Self {
        Self {
            states: Vec::new(),
            initial: 0,
        }
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub(crate) fn set_initial(&mut self, state: StateId) {
        debug_assert!(state < self.states.len());
        self.initial = state;
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// Append a fresh state and return its index.
    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    pub fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        self.states[from].transitions.insert(symbol, to);
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        let eps = &mut self.states[from].epsilon;
        if !eps.contains(&to) {
            eps.push(to);
        }
    }

    pub fn add_complement(&mut self, from: StateId, to: StateId) {
        self.states[from].complement = Some(to);
    }

    pub fn mark_final(&mut self, state: StateId) {
        self.states[state].finished = true;
    }

    /// Indices of all accepting states.
    pub fn final_states(&self) -> Vec<StateId> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.finished)
            .map(|(i, _)| i)
            .collect()
    }

    /// Nondeterministic match: true iff some state reachable after
    /// consuming all of `input` is accepting.
    ///
    /// `(state, input index)` pairs are memoized so ε-cycles terminate;
    /// a revisited pair contributes nothing new and reports false.
    pub fn matches(&self, input: &str) -> bool {
        let chars: Vec<char> = input.chars().collect();
        let mut visited = FxHashSet::default();
        self.walk(self.initial, &chars, 0, &mut visited)
    }

    fn walk(
        &self,
        state: StateId,
        input: &[char],
        index: usize,
        visited: &mut FxHashSet<(StateId, usize)>,
    ) -> bool {
        if !visited.insert((state, index)) {
            return false;
        }

        if index == input.len() && self.states[state].finished {
            return true;
        }

        for i in 0..self.states[state].epsilon.len() {
            let eps = self.states[state].epsilon[i];
            if self.walk(eps, input, index, visited) {
                return true;
            }
        }

        if index == input.len() {
            return false;
        }

        match self.states[state].go_to(input[index]) {
            Some(next) => self.walk(next, input, index + 1, visited),
            None => false,
        }
    }

    /// Absorb `other`'s states into this arena, returning the re-based
    /// index of `other`'s initial state.
    fn absorb(&mut self, other: Automaton) -> StateId {
        let offset = self.states.len();
        for mut state in other.states {
            for target in state.transitions.values_mut() {
                *target += offset;
            }
            for eps in &mut state.epsilon {
                *eps += offset;
            }
            if let Some(c) = &mut state.complement {
                *c += offset;
            }
            self.states.push(state);
        }
        other.initial + offset
    }

    /// Language union: ε from this machine's initial to `other`'s.
    pub fn union(&mut self, other: Automaton) -> &mut Self {
        let other_initial = self.absorb(other);
        let initial = self.initial;
        self.add_epsilon(initial, other_initial);
        self
    }

    /// Union that also reports how far `other`'s state indices were
    /// shifted, so callers tracking per-state metadata (the lexer's
    /// rule tags) can re-base it.
    pub(crate) fn union_offset(&mut self, other: Automaton) -> usize {
        let offset = self.states.len();
        let other_initial = self.absorb(other);
        let initial = self.initial;
        self.add_epsilon(initial, other_initial);
        offset
    }

    /// Concatenation: ε-link every final of `self` to `other`'s
    /// initial and clear those finals.
    pub fn concat(&mut self, other: Automaton) -> &mut Self {
        let other_initial = self.absorb(other);
        for id in self.final_states() {
            self.add_epsilon(id, other_initial);
            self.states[id].finished = false;
        }
        self
    }

    /// Kleene closure: ε-link every final back to the initial and make
    /// the initial accepting.
    pub fn closure(&mut self) -> &mut Self {
        let initial = self.initial;
        for id in self.final_states() {
            self.add_epsilon(id, initial);
        }
        self.mark_final(initial);
        self
    }

    /// An automaton accepting exactly `pattern`.
    pub fn literal(pattern: &str) -> Automaton {
        let mut automaton = Automaton::new();
        let mut state = automaton.initial();
        for symbol in pattern.chars() {
            let next = automaton.add_state();
            automaton.add_transition(state, symbol, next);
            state = next;
        }
        automaton.mark_final(state);
        automaton
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_exactly_its_pattern() {
        let a = Automaton::literal("abc");
        assert!(a.matches("abc"));
        assert!(!a.matches("ab"));
        assert!(!a.matches("abcd"));
        assert!(!a.matches(""));
    }

    #[test]
    fn union_accepts_either_language() {
        let mut a = Automaton::literal("cat");
        a.union(Automaton::literal("dog"));
        assert!(a.matches("cat"));
        assert!(a.matches("dog"));
        assert!(!a.matches("cow"));
    }

    #[test]
    fn concat_clears_intermediate_finals() {
        let mut a = Automaton::literal("ab");
        a.concat(Automaton::literal("cd"));
        assert!(a.matches("abcd"));
        assert!(!a.matches("ab"));
        assert!(!a.matches("cd"));
    }

    #[test]
    fn closure_accepts_zero_or_more_repetitions() {
        let mut a = Automaton::literal("ab");
        a.closure();
        assert!(a.matches(""));
        assert!(a.matches("ab"));
        assert!(a.matches("ababab"));
        assert!(!a.matches("aba"));
    }

    #[test]
    fn complement_edge_is_a_fallback_only() {
        // initial --x--> dead, initial --other--> accept
        let mut a = Automaton::new();
        let dead = a.add_state();
        let accept = a.add_state();
        a.add_transition(a.initial(), 'x', dead);
        a.add_complement(a.initial(), accept);
        a.mark_final(accept);
        assert!(a.matches("y"));
        assert!(a.matches("x") == false);
    }

    #[test]
    fn epsilon_cycles_terminate() {
        let mut a = Automaton::new();
        let other = a.add_state();
        a.add_epsilon(a.initial(), other);
        a.add_epsilon(other, a.initial());
        assert!(!a.matches("a"));
        a.mark_final(other);
        assert!(a.matches(""));
    }
}
