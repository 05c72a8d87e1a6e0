use regex_dfa_gen::{
    dfa::{DEAD, DFA},
    nfa::{self, BuildError, GroupBoundaries, NFA},
    util::{
        charset::CharSet,
        id::{PatternID, StateID},
    },
};

/// An NFA with one unanchored branch per literal. Reaching the end of the
/// literal at index `i` reports pattern `i`.
pub fn literals(lits: &[&str]) -> Result<NFA, BuildError> {
    let mut b = nfa::Builder::new();
    let start = b.add_start(false)?;
    for (i, lit) in lits.iter().enumerate() {
        let m = b.add_match_with_results(false, &[PatternID::must(i)])?;
        let end = b.add_literal(start, lit)?;
        b.add_transition(end, m)?;
    }
    b.build()
}

/// An NFA for `a(cd)*c?|b(dc)*d?` with a loop between `c` and `d` that can
/// be entered through either state. When `groups` is true, the transitions
/// into `a` and `c` touch capture slots.
pub fn two_entry_loop(groups: bool) -> Result<NFA, BuildError> {
    let g = |slot: usize| {
        if groups {
            GroupBoundaries::new(vec![slot], vec![])
        } else {
            GroupBoundaries::empty()
        }
    };
    let mut b = nfa::Builder::new();
    let s = b.add_start(false)?;
    let m = b.add_match(false)?;
    let a = b.add_char(CharSet::single('a' as u32))?;
    let bb = b.add_char(CharSet::single('b' as u32))?;
    let c = b.add_char(CharSet::single('c' as u32))?;
    let d = b.add_char(CharSet::single('d' as u32))?;
    b.add_transition_with_groups(s, a, g(0))?;
    b.add_transition(s, bb)?;
    b.add_transition(a, c)?;
    b.add_transition(bb, d)?;
    b.add_transition(c, d)?;
    b.add_transition_with_groups(d, c, g(1))?;
    b.add_transition(c, m)?;
    b.add_transition(d, m)?;
    b.build()
}

/// Follow the transitions of `dfa` on every character of `input`, starting
/// at its unanchored start state.
pub fn walk(dfa: &DFA, input: &str) -> StateID {
    walk_from(dfa, dfa.start_unanchored(), input)
}

pub fn walk_from(dfa: &DFA, start: StateID, input: &str) -> StateID {
    input.chars().fold(start, |sid, ch| {
        dfa.state(sid)
            .transitions()
            .iter()
            .find(|t| t.matcher().contains(ch as u32))
            .map_or(DEAD, |t| t.target())
    })
}
