/*!
A priority-ordered NFA over Unicode code points.

An [`NFA`] is assembled with a [`Builder`]. Its states are start markers,
match markers and states that consume a single code point from a character
set. Transitions out of a state are ordered, and earlier transitions are
preferred. Transitions may carry the capture group boundaries they cross.

The same NFA can be walked forward, from its start markers to its match
markers, or backward. [`NFA::entries`] returns the transitions a walk in
either direction begins with.
*/

pub use self::{
    builder::Builder,
    error::BuildError,
    nfa::{Entries, GroupBoundaries, State, StateKind, Transition, NFA},
};

mod builder;
mod error;
mod nfa;
