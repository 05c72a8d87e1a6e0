/*!
This crate builds DFA state graphs from priority-ordered NFAs over Unicode
code points.

It does not parse regular expressions and it does not search text. An NFA
is assembled state by state with [`nfa::Builder`], and [`dfa::Builder`]
turns it into a graph of DFA states whose transitions are labeled with
pairwise disjoint character sets. That graph is intended as the input of a
code generator or table emitter for a lexer or regex engine, so it keeps
what such consumers need:

* The NFA transitions every DFA state was built from, in priority order.
* Capture group boundaries on transitions, along with the transitions that
  lead into each state.
* Pre-calculated results for final states when building in trace-finder
  mode.
* Optional node splitting, which makes every loop in the graph have a
  single entry state.

# Example

This builds a forward DFA for two patterns, `foo` and `foobar`, and checks
which pattern each final state reports.

```
use regex_dfa_gen::{
    dfa::{self, ResultKind},
    nfa,
    util::id::PatternID,
};

let mut b = nfa::Builder::new();
let start = b.add_start(false)?;
let foo = b.add_match_with_results(false, &[PatternID::must(0)])?;
let foobar = b.add_match_with_results(false, &[PatternID::must(1)])?;
let end = b.add_literal(start, "foo")?;
b.add_transition(end, foo)?;
let end = b.add_literal(start, "foobar")?;
b.add_transition(end, foobar)?;
let nfa = b.build()?;

let dfa = dfa::Builder::new()
    .configure(dfa::Config::new().trace_finder(true))
    .build(&nfa)?;
let mut results: Vec<PatternID> = dfa
    .states()
    .iter()
    .filter_map(|s| s.pre_calculated_result(ResultKind::Unanchored))
    .collect();
results.sort();
assert_eq!(vec![PatternID::must(0), PatternID::must(1)], results);
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **std** - Enabled by default. Provides `std::error::Error` impls and uses
  a hash map while building. Without it, this crate is `no_std` but still
  requires `alloc`.
* **logging** - Emits `debug` and `trace` messages through the `log` crate
  while building.
* **syntax** - Enabled by default. Provides conversions from `regex-syntax`
  character classes into [`util::charset::CharSet`].
* **serde** - Enabled by default. Provides `serde::Serialize` impls for
  [`dfa::DFA`] and its states, which is useful for dumping a state graph as
  JSON while debugging a consumer of it.
*/

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(any(
    target_pointer_width = "16",
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!("regex-dfa-gen currently not supported on non-{16,32,64}");

extern crate alloc;

#[macro_use]
mod macros;

pub mod dfa;
pub mod nfa;
pub mod util;
