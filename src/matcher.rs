//! Longest-walk search: how far into a text can the automaton's transition
//! graph carry us?
//!
//! A walk may begin at *any* state, not just the initial one, and is not
//! required to end in a terminal state.  The result measures the longest walk
//! in the transition graph, not the longest accepted substring.

use std::collections::HashMap;

use itertools::Itertools;

use crate::machine::{Automaton, StateId};

/// Errors that can occur while matching.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    /// No text was supplied.  An empty text is valid; an absent one is not.
    TextMissing,
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextMissing => write!(f, "No text was supplied to match against"),
        }
    }
}

impl std::error::Error for MatchError {}

/// Length of the longest contiguous substring of `text` that can be walked
/// through the automaton's transition graph, one symbol per edge.
///
/// Equivalent to maximizing, over every state `s` and offset `i`, the
/// recursive definition `walk(s, text[i..])` where a walk extends by one for
/// each transition labelled with the next character.  The table below
/// computes the same quantity bottom-up over the finite `(offset, state)`
/// space, so shared suffixes are never re-walked.
pub fn longest_match(machine: &Automaton, text: Option<&str>) -> Result<usize, MatchError> {
    let text = text.ok_or(MatchError::TextMissing)?;
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(0);
    }

    let order: Vec<StateId> = machine.states().iter().copied().sorted().collect();
    let index: HashMap<StateId, usize> = order
        .iter()
        .enumerate()
        .map(|(slot, &state)| (state, slot))
        .collect();

    // walks[i][slot]: longest walk from order[slot] consuming chars[i..].
    // Row chars.len() stays all zero: the empty suffix walks nowhere.
    let mut walks = vec![vec![0usize; order.len()]; chars.len() + 1];
    for i in (0..chars.len()).rev() {
        for (slot, &state) in order.iter().enumerate() {
            if let Some(targets) = machine.targets(state, chars[i]) {
                let best_follow = targets
                    .iter()
                    .map(|target| walks[i + 1][index[target]])
                    .max()
                    .unwrap_or(0);
                walks[i][slot] = 1 + best_follow;
            }
        }
    }

    Ok(walks.iter().flatten().copied().max().unwrap_or(0))
}
