//! Automaton data model and the combinators that build it.
//!
//! Automata are built bottom-up from single-symbol and empty-string units by
//! [`Automaton::concatenate`], [`Automaton::alternate`] and
//! [`Automaton::star`].  Every combinator consumes its operands and returns a
//! normalized result: epsilon transitions folded away and unreachable states
//! pruned (see the `epsilon` module).

use std::collections::{HashMap, HashSet};

use crate::epsilon;

/// A unique state identity.  Carries no payload; equality and hashing are by
/// identity alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

/// Hands out distinct [`StateId`]s for one build session.
///
/// Automata merged by a combinator must draw their states from the same
/// allocator so the merged state sets never collide.  Allocators are
/// independent of each other; there is no process-wide counter.
#[derive(Debug, Default)]
pub struct StateAlloc {
    next: u32,
}

impl StateAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a state identity not handed out before.
    pub fn fresh(&mut self) -> StateId {
        let id = StateId(self.next);
        self.next += 1;
        id
    }
}

/// A transition label: a literal symbol, or the epsilon marker for
/// transitions that consume no input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Symbol(char),
    Epsilon,
}

/// Per-state transition table: label to set of target states.
pub(crate) type LabelMap = HashMap<Label, HashSet<StateId>>;

/// A finite-state automaton with one initial state and a set of terminal
/// states.
///
/// Outside of a combinator call the automaton is always normalized: no
/// epsilon-labelled transition remains, every state is reachable from
/// [`Automaton::init`], and `terminals` is a subset of `states`.
#[derive(Debug, Clone, PartialEq)]
pub struct Automaton {
    pub(crate) states: HashSet<StateId>,
    pub(crate) init: StateId,
    pub(crate) terminals: HashSet<StateId>,
    pub(crate) transitions: HashMap<StateId, LabelMap>,
    /// Set when this automaton is the direct result of [`Automaton::star`].
    /// A second star application returns the automaton unchanged.
    pub(crate) star_derived: bool,
    /// Infix reconstruction of the expression this automaton was built from.
    pub(crate) pattern: String,
}

impl Automaton {
    /// The automaton for the language `{""}`: one state, both initial and
    /// terminal, no transitions.
    pub fn epsilon_unit(alloc: &mut StateAlloc) -> Self {
        let init = alloc.fresh();
        Self {
            states: HashSet::from([init]),
            init,
            terminals: HashSet::from([init]),
            transitions: HashMap::new(),
            star_derived: false,
            pattern: String::from("1"),
        }
    }

    /// The automaton for the one-symbol language `{symbol}`: two states and a
    /// single transition between them.
    ///
    /// Alphabet membership is the parser's concern; this constructor accepts
    /// any character.
    pub fn symbol_unit(alloc: &mut StateAlloc, symbol: char) -> Self {
        let init = alloc.fresh();
        let terminal = alloc.fresh();
        let mut transitions = HashMap::new();
        transitions.insert(
            init,
            LabelMap::from([(Label::Symbol(symbol), HashSet::from([terminal]))]),
        );
        Self {
            states: HashSet::from([init, terminal]),
            init,
            terminals: HashSet::from([terminal]),
            transitions,
            star_derived: false,
            pattern: symbol.to_string(),
        }
    }

    /// The automaton for the language `self · other`.  Consumes both
    /// operands.
    pub fn concatenate(mut self, other: Automaton) -> Self {
        let pattern = format!("{}{}", self.pattern, other.pattern);
        let (other_init, other_terminals) = self.absorb(other);
        let old_terminals: Vec<StateId> = self.terminals.drain().collect();
        for terminal in old_terminals {
            self.add_epsilon(terminal, other_init);
        }
        self.terminals = other_terminals;
        self.star_derived = false;
        self.pattern = pattern;
        epsilon::eliminate(&mut self);
        self
    }

    /// The automaton for the language `self ∪ other`.  Consumes both
    /// operands; the fresh initial state comes from `alloc`.
    pub fn alternate(mut self, other: Automaton, alloc: &mut StateAlloc) -> Self {
        let pattern = format!("({}+{})", self.pattern, other.pattern);
        let (other_init, other_terminals) = self.absorb(other);
        let new_init = alloc.fresh();
        let old_init = self.init;
        self.states.insert(new_init);
        self.add_epsilon(new_init, old_init);
        self.add_epsilon(new_init, other_init);
        self.init = new_init;
        self.terminals.extend(other_terminals);
        self.star_derived = false;
        self.pattern = pattern;
        epsilon::eliminate(&mut self);
        self
    }

    /// The automaton for the language `self*`.
    ///
    /// Applying star to an automaton that is itself the direct result of a
    /// star application returns it unchanged: consecutive stars collapse.
    pub fn star(mut self, alloc: &mut StateAlloc) -> Self {
        if self.star_derived {
            return self;
        }
        let new_init = alloc.fresh();
        let old_init = self.init;
        self.states.insert(new_init);
        self.add_epsilon(new_init, old_init);
        let old_terminals: Vec<StateId> = self.terminals.drain().collect();
        for terminal in old_terminals {
            self.add_epsilon(terminal, new_init);
        }
        self.init = new_init;
        self.terminals.insert(new_init);
        self.pattern = format!("({})*", self.pattern);
        epsilon::eliminate(&mut self);
        self.star_derived = true;
        self
    }

    /// All states of the automaton.
    pub fn states(&self) -> &HashSet<StateId> {
        &self.states
    }

    /// The initial state.
    pub fn init(&self) -> StateId {
        self.init
    }

    /// The terminal (accepting) states.
    pub fn terminals(&self) -> &HashSet<StateId> {
        &self.terminals
    }

    /// The states reachable from `state` by consuming `symbol`, or `None` if
    /// `state` has no transition labelled with it.
    pub fn targets(&self, state: StateId, symbol: char) -> Option<&HashSet<StateId>> {
        self.label_targets(state, Label::Symbol(symbol))
    }

    /// Infix reconstruction of the expression this automaton was built from,
    /// with parentheses around alternation and star operands.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn label_targets(&self, state: StateId, label: Label) -> Option<&HashSet<StateId>> {
        self.transitions
            .get(&state)
            .and_then(|by_label| by_label.get(&label))
    }

    /// Merge the other automaton's states and transitions into this one,
    /// handing back its initial state and terminals for rewiring.
    ///
    /// The state sets are disjoint when both operands came from the same
    /// allocator, so a plain extend is a union.
    fn absorb(&mut self, other: Automaton) -> (StateId, HashSet<StateId>) {
        let Automaton {
            states,
            init,
            terminals,
            transitions,
            ..
        } = other;
        self.states.extend(states);
        self.transitions.extend(transitions);
        (init, terminals)
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.transitions
            .entry(from)
            .or_default()
            .entry(Label::Epsilon)
            .or_default()
            .insert(to);
    }
}
