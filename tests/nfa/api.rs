use std::error::Error;

use regex_dfa_gen::{
    nfa::{self, GroupBoundaries, StateKind},
    util::{
        charset::CharSet,
        id::{PatternID, StateID},
    },
};

use crate::util::literals;

// Tests that entries in each direction lead to the right markers.
#[test]
fn entries() -> Result<(), Box<dyn Error>> {
    let mut b = nfa::Builder::new();
    let anchored = b.add_start(true)?;
    let unanchored = b.add_start(false)?;
    let m = b.add_match(true)?;
    let a = b.add_char(CharSet::chars("a"))?;
    b.add_transition(anchored, a)?;
    b.add_transition(unanchored, a)?;
    b.add_transition(a, m)?;
    let nfa = b.build()?;

    let fwd = nfa.entries(true);
    assert_eq!(2, fwd.anchored().len());
    assert_eq!(1, fwd.unanchored().len());
    let t = nfa.transition(fwd.unanchored()[0]);
    assert_eq!(unanchored, t.target(true));

    let bwd = nfa.entries(false);
    assert_eq!(1, bwd.anchored().len());
    assert!(bwd.unanchored().is_empty());
    assert_eq!(m, nfa.transition(bwd.anchored()[0]).target(false));

    assert!(nfa.state(m).is_anchored_final(true));
    assert!(nfa.state(unanchored).is_unanchored_final(false));
    assert!(!nfa.state(a).is_final(true));
    assert!(nfa.transition_to_anchored_final(a, true).is_some());
    assert!(nfa.transition_to_unanchored_final(a, true).is_none());

    Ok(())
}

#[test]
fn transitions_keep_priority_order() -> Result<(), Box<dyn Error>> {
    let mut b = nfa::Builder::new();
    let start = b.add_start(false)?;
    let m = b.add_match(false)?;
    let x = b.add_char(CharSet::chars("x"))?;
    let y = b.add_char(CharSet::chars("y"))?;
    let groups = GroupBoundaries::new(vec![3, 1, 1], vec![2]);
    let tx = b.add_transition(start, x)?;
    let ty = b.add_transition_with_groups(start, y, groups)?;
    b.add_transition(x, m)?;
    b.add_transition(y, m)?;
    let nfa = b.build()?;

    assert_eq!(&[tx, ty], nfa.state(start).next(true));
    assert_eq!(&[tx], nfa.state(x).next(false));
    assert!(nfa.transition(tx).groups().is_empty());
    assert_eq!(&[1, 3], nfa.transition(ty).groups().updates());
    assert_eq!(&[2], nfa.transition(ty).groups().clears());
    assert_eq!(start, nfa.transition(ty).source(true));
    assert_eq!(y, nfa.transition(ty).source(false));

    Ok(())
}

#[test]
fn results_and_kinds() -> Result<(), Box<dyn Error>> {
    let nfa = literals(&["a", "b", "c"])?;
    assert_eq!(3, nfa.pattern_len());
    assert!(!nfa.has_prefix_states());
    let matches: Vec<&[PatternID]> = nfa
        .states()
        .iter()
        .filter(|s| matches!(*s.kind(), StateKind::Match { .. }))
        .map(|s| s.results())
        .collect();
    assert_eq!(3, matches.len());
    assert_eq!(&[PatternID::must(2)], matches[2]);

    Ok(())
}

// Tests that malformed graphs are rejected.
#[test]
fn invalid() -> Result<(), Box<dyn Error>> {
    let mut b = nfa::Builder::new();
    let start = b.add_start(false)?;
    let m = b.add_match(false)?;
    let a = b.add_char(CharSet::chars("a"))?;
    assert!(b.add_transition(a, start).is_err());
    assert!(b.add_transition(m, a).is_err());
    assert!(b.add_transition(a, StateID::must(99)).is_err());
    assert!(b.add_transition(StateID::ZERO, a).is_err());
    let err = b.add_transition(m, a).unwrap_err();
    assert!(err.to_string().contains("invalid NFA transition"));

    let mut b = nfa::Builder::new();
    b.add_start(false)?;
    let err = b.build().unwrap_err();
    assert!(err.to_string().contains("no match marker"));

    let mut b = nfa::Builder::new();
    b.add_match(false)?;
    let err = b.build().unwrap_err();
    assert!(err.to_string().contains("no start marker"));

    Ok(())
}
