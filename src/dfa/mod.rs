/*!
Construction of DFA state graphs from NFAs.

A [`DFA`] is built from an [`NFA`](crate::nfa::NFA) by subset construction:
every DFA state stands for an ordered set of NFA transitions, and leaving
it on a code point leads to the set of NFA transitions that can be taken
next. The character sets of the NFA are split into pairwise disjoint
classes along the way, so the transitions out of every DFA state are
deterministic and together cover every code point.

The graph produced here is not a matching engine. It is meant to be
consumed by something that emits code or tables for it, which is why it
keeps the provenance of every state and exposes knobs such as node
splitting that only matter to such consumers.

# Example

This builds a backward DFA for `ab|b` where the match marker is reached
after either branch.

```
use regex_dfa_gen::{dfa, nfa, util::charset::CharSet};

let mut b = nfa::Builder::new();
let start = b.add_start(false)?;
let m = b.add_match(false)?;
let a = b.add_char(CharSet::single('a' as u32))?;
let b1 = b.add_char(CharSet::single('b' as u32))?;
let b2 = b.add_char(CharSet::single('b' as u32))?;
b.add_transition(start, a)?;
b.add_transition(a, b1)?;
b.add_transition(start, b2)?;
b.add_transition(b1, m)?;
b.add_transition(b2, m)?;
let nfa = b.build()?;

let dfa = dfa::Builder::new()
    .configure(dfa::Config::new().forward(false))
    .build(&nfa)?;
assert!(!dfa.is_forward());
for state in dfa.states() {
    assert!(state.covers_full_char_space());
}
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub use self::{
    builder::{Builder, Config},
    error::Error,
    graph::DFA,
    state::{update_successors_after_split, ResultKind, StateBuilder},
    transition::{TransitionBuilder, TransitionRef},
    transition_set::TransitionSet,
};

use crate::util::id::StateID;

/// The identifier of the dead state, which every DFA has. It is never final
/// and every code point leads from it back to itself.
pub const DEAD: StateID = StateID::ZERO;

mod builder;
mod canonical;
mod determinize;
mod error;
mod graph;
mod split;
mod state;
mod transition;
mod transition_set;
