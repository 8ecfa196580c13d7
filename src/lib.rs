//! Postfix regular expressions compiled to epsilon-free finite automata, and
//! a longest-walk search over the resulting transition graph.
//!
//! The expression is evaluated by a stack machine into an [`Automaton`] whose
//! epsilon transitions have already been eliminated.  [`longest_match`] then
//! finds the longest contiguous substring of a text that can be walked
//! through the transition graph, starting from any state, with no
//! requirement that the walk end in a terminal state.
//!
//! # Example
//!
//! ```rust
//! use strider::{longest_match, parse};
//!
//! // Postfix "ab+*" is (a+b)* in infix form.
//! let machine = parse("ab+*").unwrap();
//! assert_eq!(machine.pattern(), "((a+b))*");
//!
//! assert_eq!(longest_match(&machine, Some("abba")).unwrap(), 4);
//! assert_eq!(longest_match(&machine, Some("")).unwrap(), 0);
//! ```

mod epsilon;
pub mod machine;
pub mod matcher;
pub mod parser;

pub use machine::{Automaton, Label, StateAlloc, StateId};
pub use matcher::{MatchError, longest_match};
pub use parser::{Alphabet, ExprError, parse, parse_with_alphabet};
