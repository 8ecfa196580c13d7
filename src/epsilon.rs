//! Epsilon-transition elimination and unreachable-state pruning.
//!
//! Runs after every combinator application, because combinators inspect the
//! terminals and transitions of operands that must already be normalized.
//! Both traversals here are iterative with explicit work stacks.

use std::collections::HashSet;

use itertools::Itertools;

use crate::machine::{Automaton, Label, StateId};

/// Fold every epsilon-closure into its origin state, strip the epsilon
/// edges, then drop the states left unreachable from the initial state.
///
/// Idempotent: a normalized automaton passes through unchanged.
pub(crate) fn eliminate(machine: &mut Automaton) {
    let order: Vec<StateId> = machine.states.iter().copied().sorted().collect();
    // Closures are transitive, so checking a snapshot of the terminal set
    // reaches the same fixed point as in-place propagation, in any order.
    let was_terminal = machine.terminals.clone();

    for &state in &order {
        let closure = epsilon_closure(machine, state);
        let mut terminal = false;
        let mut gained: Vec<(Label, Vec<StateId>)> = Vec::new();
        for &member in &closure {
            if was_terminal.contains(&member) {
                terminal = true;
            }
            if member == state {
                continue;
            }
            if let Some(by_label) = machine.transitions.get(&member) {
                for (&label, targets) in by_label {
                    if label != Label::Epsilon {
                        gained.push((label, targets.iter().copied().collect()));
                    }
                }
            }
        }
        if terminal {
            machine.terminals.insert(state);
        }
        if !gained.is_empty() {
            let by_label = machine.transitions.entry(state).or_default();
            for (label, targets) in gained {
                by_label.entry(label).or_default().extend(targets);
            }
        }
    }

    for by_label in machine.transitions.values_mut() {
        by_label.remove(&Label::Epsilon);
    }
    machine.transitions.retain(|_, by_label| !by_label.is_empty());

    let keep = reachable(machine);
    machine.states.retain(|state| keep.contains(state));
    machine.terminals.retain(|state| keep.contains(state));
    machine.transitions.retain(|state, _| keep.contains(state));
}

/// States reachable from `start` using only epsilon edges, including `start`
/// itself.
fn epsilon_closure(machine: &Automaton, start: StateId) -> HashSet<StateId> {
    let mut seen = HashSet::from([start]);
    let mut work = vec![start];
    while let Some(state) = work.pop() {
        if let Some(targets) = machine.label_targets(state, Label::Epsilon) {
            for &target in targets {
                if seen.insert(target) {
                    work.push(target);
                }
            }
        }
    }
    seen
}

/// States reachable from the initial state over any transition.
fn reachable(machine: &Automaton) -> HashSet<StateId> {
    let mut seen = HashSet::from([machine.init]);
    let mut work = vec![machine.init];
    while let Some(state) = work.pop() {
        if let Some(by_label) = machine.transitions.get(&state) {
            for targets in by_label.values() {
                for &target in targets {
                    if seen.insert(target) {
                        work.push(target);
                    }
                }
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::StateAlloc;
    use crate::parser::parse;

    /// Hand-built chain: s0 --eps--> s1 --eps--> s2 --a--> s3, terminal s2.
    fn epsilon_chain() -> Automaton {
        let mut alloc = StateAlloc::new();
        let mut machine = Automaton::symbol_unit(&mut alloc, 'a');
        let s2 = machine.init();
        let s1 = alloc.fresh();
        let s0 = alloc.fresh();
        machine.states.extend([s0, s1]);
        machine.init = s0;
        machine.terminals = HashSet::from([s2]);
        machine
            .transitions
            .entry(s0)
            .or_default()
            .entry(Label::Epsilon)
            .or_default()
            .insert(s1);
        machine
            .transitions
            .entry(s1)
            .or_default()
            .entry(Label::Epsilon)
            .or_default()
            .insert(s2);
        machine
    }

    #[test]
    fn closure_spans_epsilon_chains() {
        let machine = epsilon_chain();
        let closure = epsilon_closure(&machine, machine.init());
        assert_eq!(closure.len(), 3);
    }

    #[test]
    fn folding_copies_transitions_and_terminals() {
        let mut machine = epsilon_chain();
        let init = machine.init();
        eliminate(&mut machine);

        // The initial state inherited both the 'a' transition and the
        // terminal flag from the end of its closure.
        assert!(machine.targets(init, 'a').is_some());
        assert!(machine.terminals().contains(&init));
    }

    #[test]
    fn no_epsilon_labels_survive() {
        let mut machine = epsilon_chain();
        eliminate(&mut machine);
        let has_epsilon = machine
            .transitions
            .values()
            .any(|by_label| by_label.contains_key(&Label::Epsilon));
        assert!(!has_epsilon);
    }

    #[test]
    fn unreachable_states_are_pruned() {
        let mut alloc = StateAlloc::new();
        let mut machine = Automaton::symbol_unit(&mut alloc, 'a');
        let orphan = alloc.fresh();
        machine.states.insert(orphan);
        machine.terminals.insert(orphan);

        eliminate(&mut machine);
        assert!(!machine.states().contains(&orphan));
        assert!(!machine.terminals().contains(&orphan));
        assert_eq!(machine.states().len(), 2);
    }

    #[test]
    fn elimination_is_a_fixed_point() {
        for expr in ["ab.", "ab+", "a*", "ab+*", "aab.*b..*1a+aa.+."] {
            let machine = parse(expr).expect("expression should parse");
            let mut again = machine.clone();
            eliminate(&mut again);
            assert_eq!(machine, again, "second elimination changed {expr:?}");
        }
    }

    #[test]
    fn every_state_reachable_after_parse() {
        for expr in ["ab.", "ab+", "a*", "ba.ab.+***"] {
            let machine = parse(expr).expect("expression should parse");
            let keep = reachable(&machine);
            assert_eq!(&keep, machine.states(), "unreachable states in {expr:?}");
        }
    }
}
