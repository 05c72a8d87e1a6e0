use std::error::Error;

use regex_dfa_gen::{
    dfa::{self, ResultKind, DEAD},
    nfa,
    util::{charset::CharSet, id::PatternID},
};

use crate::util::{literals, two_entry_loop, walk, walk_from};

// Tests that the results of final states are known up front when nothing
// better can follow them.
#[test]
fn trace_finder_results() -> Result<(), Box<dyn Error>> {
    let nfa = literals(&["foo", "foobar"])?;
    let dfa = dfa::Builder::new()
        .configure(dfa::Config::new().trace_finder(true))
        .build(&nfa)?;

    let foo = dfa.state(walk(&dfa, "foo"));
    assert!(foo.is_final_state());
    assert_eq!(
        Some(PatternID::must(0)),
        foo.pre_calculated_result(ResultKind::Unanchored)
    );
    let foobar = dfa.state(walk(&dfa, "foobar"));
    assert!(foobar.is_final_state());
    assert_eq!(
        Some(PatternID::must(1)),
        foobar.pre_calculated_result(ResultKind::Unanchored)
    );
    assert_eq!(None, foobar.pre_calculated_result(ResultKind::Anchored));

    Ok(())
}

// Tests that a result is dropped when a better one can still be reached by
// continuing the search.
#[test]
fn trace_finder_unresolved() -> Result<(), Box<dyn Error>> {
    let nfa = literals(&["foobar", "foo"])?;
    let dfa = dfa::Builder::new()
        .configure(dfa::Config::new().trace_finder(true))
        .build(&nfa)?;

    let foo = dfa.state(walk(&dfa, "foo"));
    assert!(foo.is_final_state());
    assert_eq!(None, foo.pre_calculated_result(ResultKind::Unanchored));
    assert_eq!(None, foo.pre_calculated_result(ResultKind::Anchored));
    let foobar = dfa.state(walk(&dfa, "foobar"));
    assert_eq!(
        Some(PatternID::must(0)),
        foobar.pre_calculated_result(ResultKind::Unanchored)
    );

    Ok(())
}

// Tests that a preferred match cuts off everything of lower priority, unless
// priority sensitivity is disabled.
#[test]
fn leftmost_first_priority() -> Result<(), Box<dyn Error>> {
    let nfa = literals(&["foo", "foobar"])?;
    let dfa = dfa::Builder::new().build(&nfa)?;
    assert!(dfa.state(walk(&dfa, "foo")).is_final_state());
    assert_eq!(DEAD, walk(&dfa, "foob"));

    let dfa = dfa::Builder::new()
        .configure(dfa::Config::new().priority_sensitive(false))
        .build(&nfa)?;
    assert!(dfa.state(walk(&dfa, "foo")).is_final_state());
    assert!(dfa.state(walk(&dfa, "foobar")).is_final_state());

    Ok(())
}

// Tests that the transitions of every state are disjoint and cover every
// code point, even when the NFA's character sets overlap.
#[test]
fn transitions_are_deterministic() -> Result<(), Box<dyn Error>> {
    let mut b = nfa::Builder::new();
    let start = b.add_start(false)?;
    let m = b.add_match(false)?;
    let am = b.add_char(CharSet::range('a' as u32, 'm' as u32))?;
    let hz = b.add_char(CharSet::range('h' as u32, 'z' as u32))?;
    b.add_transition(start, am)?;
    b.add_transition(start, hz)?;
    b.add_transition(am, m)?;
    b.add_transition(hz, m)?;
    let nfa = b.build()?;

    for &forward in [true, false].iter() {
        let dfa = dfa::Builder::new()
            .configure(dfa::Config::new().forward(forward))
            .build(&nfa)?;
        for state in dfa.states() {
            assert!(state.covers_full_char_space(), "{:?}", state);
            let ts = state.transitions();
            for (i, t1) in ts.iter().enumerate() {
                for t2 in ts[i + 1..].iter() {
                    let both = t1.matcher().intersect(t2.matcher());
                    assert!(both.is_empty(), "{:?}", state);
                }
            }
        }
    }

    let dfa = dfa::Builder::new().build(&nfa)?;
    let start = dfa.state(dfa.start_unanchored());
    // [a-g], [h-m], [n-z] and everything else
    assert_eq!(4, start.transitions().len());
    assert_eq!(DEAD, start.transitions()[3].target());
    let (ag, hm, nz) = (walk(&dfa, "a"), walk(&dfa, "h"), walk(&dfa, "n"));
    assert!(ag != hm && hm != nz && ag != nz);
    assert_eq!(2, dfa.state(hm).transition_set().len());

    Ok(())
}

// Tests that building the same NFA twice yields identical state graphs,
// state for state.
#[test]
fn builds_are_reproducible() -> Result<(), Box<dyn Error>> {
    let configs = [
        dfa::Config::new(),
        dfa::Config::new().forward(false),
        dfa::Config::new().trace_finder(true),
        dfa::Config::new().track_captures(true).node_splitting(true),
    ];
    let lits = ["ab", "abc", "bc"];
    for config in configs.iter() {
        let nfas = [
            (two_entry_loop(true)?, two_entry_loop(true)?),
            (literals(&lits)?, literals(&lits)?),
        ];
        for (nfa1, nfa2) in nfas.iter() {
            let mut builder = dfa::Builder::new();
            builder.configure(*config);
            let (dfa1, dfa2) = (builder.build(nfa1)?, builder.build(nfa2)?);
            assert_eq!(dfa1.len(), dfa2.len());
            assert_eq!(dfa1.start_anchored(), dfa2.start_anchored());
            assert_eq!(dfa1.start_unanchored(), dfa2.start_unanchored());
            for (s1, s2) in dfa1.states().iter().zip(dfa2.states()) {
                assert_eq!(s1.transition_set(), s2.transition_set());
                assert_eq!(s1.transitions(), s2.transitions());
                assert_eq!(s1.is_final_state(), s2.is_final_state());
                assert_eq!(
                    s1.preceding_transitions().ok(),
                    s2.preceding_transitions().ok(),
                );
                for &kind in [ResultKind::Anchored, ResultKind::Unanchored]
                    .iter()
                {
                    assert_eq!(
                        s1.pre_calculated_result(kind),
                        s2.pre_calculated_result(kind),
                    );
                }
            }
        }
    }
    Ok(())
}

// Tests that anchored start markers are only entered from the anchored
// start state.
#[test]
fn anchored_and_unanchored_starts() -> Result<(), Box<dyn Error>> {
    let mut b = nfa::Builder::new();
    let anchored = b.add_start(true)?;
    let unanchored = b.add_start(false)?;
    let m = b.add_match(false)?;
    let a = b.add_literal(anchored, "a")?;
    let bb = b.add_literal(unanchored, "b")?;
    b.add_transition(a, m)?;
    b.add_transition(bb, m)?;
    let nfa = b.build()?;

    let dfa = dfa::Builder::new().build(&nfa)?;
    assert_ne!(dfa.start_anchored(), dfa.start_unanchored());
    assert!(dfa.state(dfa.start_anchored()).is_initial_state());
    assert!(dfa.state(dfa.start_unanchored()).is_initial_state());
    let sa = dfa.start_anchored();
    assert!(dfa.state(walk_from(&dfa, sa, "a")).is_final_state());
    assert!(dfa.state(walk_from(&dfa, sa, "b")).is_final_state());
    assert_eq!(DEAD, walk(&dfa, "a"));
    assert!(dfa.state(walk(&dfa, "b")).is_final_state());

    // Without unanchored start markers, there is no unanchored start state.
    let mut b = nfa::Builder::new();
    let start = b.add_start(true)?;
    let m = b.add_match(false)?;
    let end = b.add_literal(start, "a")?;
    b.add_transition(end, m)?;
    let dfa = dfa::Builder::new().build(&b.build()?)?;
    assert_eq!(DEAD, dfa.start_unanchored());
    assert_ne!(DEAD, dfa.start_anchored());

    Ok(())
}

// Tests that states entered from a final state are flagged.
#[test]
fn final_state_successors() -> Result<(), Box<dyn Error>> {
    let nfa = literals(&["foo", "foobar"])?;
    let dfa = dfa::Builder::new()
        .configure(dfa::Config::new().priority_sensitive(false))
        .build(&nfa)?;
    assert!(dfa.state(walk(&dfa, "foob")).is_final_state_successor());
    assert!(dfa.state(DEAD).is_final_state_successor());
    assert!(!dfa.state(walk(&dfa, "fo")).is_final_state_successor());

    Ok(())
}

// Tests that node splitting makes a loop with two entries reducible.
#[test]
fn node_splitting() -> Result<(), Box<dyn Error>> {
    let nfa = two_entry_loop(false)?;
    let dfa = dfa::Builder::new().build(&nfa)?;
    assert!(!dfa.is_reducible());

    let split = dfa::Builder::new()
        .configure(dfa::Config::new().node_splitting(true))
        .build(&nfa)?;
    assert!(split.is_reducible());
    assert_eq!(dfa.len() + 1, split.len());
    // Both ways into the loop still accept the same inputs.
    for input in ["ac", "acd", "acdc", "bd", "bdc", "bdcd"].iter() {
        let sid = walk(&split, input);
        assert!(split.state(sid).is_final_state(), "{}", input);
    }
    assert_eq!(DEAD, walk(&split, "acc"));
    // Without capture tracking, the reverse edges of split states are not
    // recomputed.
    let tainted = split.states().iter().filter(|s| {
        s.preceding_transitions()
            .map_or_else(|e| e.is_tainted_preceding_transitions(), |_| false)
    });
    assert!(tainted.count() > 0);

    Ok(())
}

#[test]
fn node_split_state_limit() -> Result<(), Box<dyn Error>> {
    let nfa = two_entry_loop(false)?;
    let err = dfa::Builder::new()
        .configure(
            dfa::Config::new().node_splitting(true).node_split_state_limit(6),
        )
        .build(&nfa)
        .unwrap_err();
    assert!(err.is_split_state_limit_exceeded());
    assert!(err.to_string().contains("6"));

    Ok(())
}

// Tests that a state with more successors than permitted fails the build.
#[test]
fn max_successors() -> Result<(), Box<dyn Error>> {
    let nfa = literals(&["a", "b", "c"])?;
    // 'a', 'b', 'c' and the dead state
    let dfa = dfa::Builder::new()
        .configure(dfa::Config::new().max_successors(Some(4)))
        .build(&nfa)?;
    assert_eq!(4, dfa.state(dfa.start_unanchored()).number_of_successors());

    let err = dfa::Builder::new()
        .configure(dfa::Config::new().max_successors(Some(3)))
        .build(&nfa)
        .unwrap_err();
    assert!(err.is_too_many_successors());

    // The bound also holds when node splitting is enabled.
    let err = dfa::Builder::new()
        .configure(
            dfa::Config::new().max_successors(Some(2)).node_splitting(true),
        )
        .build(&two_entry_loop(false)?)
        .unwrap_err();
    assert!(err.is_too_many_successors());

    Ok(())
}

// Tests that capture groups end up on transitions, and that reverse edges
// are consistent with forward edges after splitting.
#[test]
fn track_captures() -> Result<(), Box<dyn Error>> {
    let nfa = two_entry_loop(true)?;
    for &splitting in [false, true].iter() {
        let dfa = dfa::Builder::new()
            .configure(
                dfa::Config::new()
                    .track_captures(true)
                    .node_splitting(splitting),
            )
            .build(&nfa)?;

        let start = dfa.state(dfa.start_unanchored());
        let on_a = start
            .transitions()
            .iter()
            .find(|t| t.matcher().contains('a' as u32))
            .unwrap();
        assert_eq!(&[0], on_a.captures().unwrap().updates());
        let on_b = start
            .transitions()
            .iter()
            .find(|t| t.matcher().contains('b' as u32))
            .unwrap();
        assert!(on_b.captures().is_none());

        let mut edges = 0;
        for state in dfa.states() {
            edges += state
                .transitions()
                .iter()
                .filter(|t| t.target() != DEAD)
                .count();
        }
        let mut recorded = 0;
        for state in dfa.states() {
            let preceding = dfa.preceding_transitions(state.id())?;
            for &r in preceding.iter() {
                assert_eq!(state.id(), dfa.transition(r).target());
            }
            recorded += preceding.len();
        }
        assert_eq!(edges, recorded);
    }

    Ok(())
}

// Tests that a backward DFA gets a prefix twin for every state when the NFA
// has prefix states.
#[test]
fn backward_prefix_states() -> Result<(), Box<dyn Error>> {
    let mut b = nfa::Builder::new();
    let start = b.add_start(false)?;
    let m = b.add_match(false)?;
    let x = b.add_prefix_char(CharSet::single('x' as u32))?;
    let a = b.add_char(CharSet::single('a' as u32))?;
    b.add_transition(start, x)?;
    b.add_transition(x, a)?;
    b.add_transition(a, m)?;
    let nfa = b.build()?;
    assert!(nfa.has_prefix_states());

    let dfa = dfa::Builder::new()
        .configure(
            dfa::Config::new().forward(false).backward_prefix_states(true),
        )
        .build(&nfa)?;
    for state in dfa.states().iter().skip(1) {
        let twin = state.backward_prefix_state().unwrap();
        if state.is_backward_prefix_state() {
            assert_eq!(state.id(), twin);
            for t in state.transitions() {
                let next = dfa.state(t.target());
                let ok = t.target() == DEAD || next.is_backward_prefix_state();
                assert!(ok, "{:?}", state);
            }
        } else {
            let twin = dfa.state(twin);
            assert!(twin.is_backward_prefix_state());
            assert_eq!(state.transition_set(), twin.transition_set());
            let len = state.transitions().len();
            assert_eq!(len + 1, state.number_of_successors());
        }
    }
    let init = dfa.state(dfa.start_unanchored());
    assert!(!init.is_backward_prefix_state());
    assert_ne!(Some(init.id()), init.backward_prefix_state());
    // Reading 'a' then 'x' backward reaches the start marker.
    assert!(dfa.state(walk(&dfa, "ax")).is_final_state());

    // Forward DFAs never get prefix twins.
    let dfa = dfa::Builder::new()
        .configure(dfa::Config::new().backward_prefix_states(true))
        .build(&nfa)?;
    for state in dfa.states() {
        assert_eq!(None, state.backward_prefix_state());
    }

    Ok(())
}

// Tests that a DFA dumps every state along with its transition set.
#[cfg(feature = "serde")]
#[test]
fn serialize_dfa() -> Result<(), Box<dyn Error>> {
    let dfa = dfa::Builder::new().build(&literals(&["ab", "b"])?)?;
    let json = serde_json::to_value(&dfa)?;
    assert_eq!(json["forward"], true);
    assert_eq!(json["traceFinder"], false);
    assert_eq!(json["startUnanchored"], dfa.start_unanchored().as_usize());

    let states = json["states"].as_array().unwrap();
    assert_eq!(dfa.len(), states.len());
    for (state, value) in dfa.states().iter().zip(states) {
        assert_eq!(value["id"], state.id().as_usize());
        assert_eq!(value["finalState"], state.is_final_state());
        let targets: Vec<usize> = state
            .transition_set()
            .targets()
            .iter()
            .map(|sid| sid.as_usize())
            .collect();
        assert_eq!(value["stateSet"], serde_json::json!(targets));
        let transitions = value["transitions"].as_array().unwrap();
        assert_eq!(state.transitions().len(), transitions.len());
        for (t, v) in state.transitions().iter().zip(transitions) {
            assert_eq!(v["target"], t.target().as_usize());
        }
    }
    Ok(())
}
