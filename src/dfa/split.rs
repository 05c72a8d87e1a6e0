/*!
Node splitting, which makes the state graph of a DFA reducible.

A graph is reducible if it collapses into a single node by repeatedly
applying two rules: remove a self loop (T1), and merge a node that has
exactly one predecessor into that predecessor (T2). The nodes here are
*regions*: sets of states with a single entry state, the header. Every
region starts out as a single state, plus a virtual root region whose only
edges lead to the start states.

When neither rule applies, the graph contains a loop with more than one
entry. Splitting picks the smallest remaining region and gives each of its
predecessors but the first a private copy of it. Each copy then has a
single predecessor, and so does the original, which lets T2 proceed.

Edges into the dead state are ignored throughout.
*/

use alloc::{vec, vec::Vec};

use crate::{
    dfa::{error::Error, graph::DFA, state, DEAD},
    util::id::StateID,
};

/// The index of the virtual root region.
const ROOT: usize = 0;

/// Returns true if and only if the state graph of the given DFA is
/// reducible.
pub(crate) fn is_reducible(dfa: &DFA) -> bool {
    Regions::new(dfa).reduce(dfa)
}

/// Split states of the given DFA until its state graph is reducible.
///
/// This fails if the DFA would need more than `limit` states.
pub(crate) fn split(dfa: &mut DFA, limit: usize) -> Result<(), Error> {
    let mut regions = Regions::new(dfa);
    while !regions.reduce(dfa) {
        let preds = regions.predecessors(dfa);
        let mut smallest: Option<usize> = None;
        for r in regions.alive() {
            let len = regions.members(r).len();
            if smallest.map_or(true, |s| len < regions.members(s).len()) {
                smallest = Some(r);
            }
        }
        // reduce only fails while a non-root region is left
        let r = match smallest {
            None => break,
            Some(r) => r,
        };
        trace!(
            "splitting region of state {} with predecessors {:?}",
            regions.header(r),
            preds[r],
        );
        for &p in preds[r].iter().skip(1) {
            regions.copy_into(dfa, r, p, limit)?;
        }
    }
    debug!("node splitting finished with {} DFA states", dfa.len());
    Ok(())
}

/// A region: a set of states whose only entry is its header.
#[derive(Clone, Debug)]
struct Region {
    header: StateID,
    members: Vec<StateID>,
}

#[derive(Clone, Debug)]
struct Regions {
    /// The region of every state, or `None` for the dead state.
    region_of: Vec<Option<usize>>,
    /// All regions, with `None` for regions that were merged away. The
    /// root region has no members and its header is meaningless.
    regions: Vec<Option<Region>>,
}

impl Regions {
    fn new(dfa: &DFA) -> Regions {
        let mut region_of = vec![None; dfa.len()];
        let mut regions = vec![None; dfa.len()];
        regions[ROOT] = Some(Region { header: DEAD, members: vec![] });
        for state in dfa.states().iter().skip(1) {
            let sid = state.id();
            region_of[sid] = Some(sid.as_usize());
            regions[sid] = Some(Region { header: sid, members: vec![sid] });
        }
        Regions { region_of, regions }
    }

    fn header(&self, r: usize) -> StateID {
        self.regions[r].as_ref().map_or(DEAD, |region| region.header)
    }

    fn members(&self, r: usize) -> &[StateID] {
        match self.regions[r] {
            None => &[],
            Some(ref region) => &region.members,
        }
    }

    /// All regions that are left, except for the root.
    fn alive(&self) -> impl Iterator<Item = usize> + '_ {
        self.regions
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, region)| region.is_some())
            .map(|(r, _)| r)
    }

    /// Returns the sorted predecessor regions of every region, excluding
    /// the region itself.
    fn predecessors(&self, dfa: &DFA) -> Vec<Vec<usize>> {
        let mut preds = vec![vec![]; self.regions.len()];
        let starts = [dfa.start_anchored(), dfa.start_unanchored()];
        for &start in starts.iter() {
            if let Some(to) = self.region_of[start] {
                preds[to].push(ROOT);
            }
        }
        for state in dfa.states() {
            let from = match self.region_of[state.id()] {
                None => continue,
                Some(from) => from,
            };
            for next in state.successors() {
                match self.region_of[next] {
                    Some(to) if to != from => preds[to].push(from),
                    _ => {}
                }
            }
        }
        for p in preds.iter_mut() {
            p.sort_unstable();
            p.dedup();
        }
        preds
    }

    /// Apply T1 and T2 until neither applies, and return true if only the
    /// root region is left.
    fn reduce(&mut self, dfa: &DFA) -> bool {
        loop {
            let preds = self.predecessors(dfa);
            let single = self.alive().find(|&r| preds[r].len() <= 1);
            match single {
                None => return self.alive().next().is_none(),
                Some(r) => {
                    let into = preds[r].first().copied().unwrap_or(ROOT);
                    self.merge(r, into);
                }
            }
        }
    }

    fn merge(&mut self, from: usize, into: usize) {
        let region = match self.regions[from].take() {
            None => return,
            Some(region) => region,
        };
        for &sid in region.members.iter() {
            self.region_of[sid] = Some(into);
        }
        if let Some(ref mut target) = self.regions[into] {
            target.members.extend(region.members);
        }
    }

    /// Give the predecessor region `pred` its own copy of every state in
    /// region `r`, and make `pred` enter that copy instead of `r`.
    fn copy_into(
        &mut self,
        dfa: &mut DFA,
        r: usize,
        pred: usize,
        limit: usize,
    ) -> Result<(), Error> {
        assert_ne!(ROOT, pred, "the root always keeps the original region");
        let header = self.header(r);
        let members = self.members(r).to_vec();
        if dfa.len() + members.len() > limit {
            return Err(Error::split_state_limit_exceeded(limit));
        }
        let base = dfa.len();
        for (i, &sid) in members.iter().enumerate() {
            let id = StateID::new(base + i)
                .map_err(|_| Error::too_many_states())?;
            let copy = dfa.state(sid).create_split_copy(id);
            dfa.push_state(copy);
            self.region_of.push(Some(pred));
        }
        let copy_of = |sid: StateID| {
            members
                .iter()
                .position(|&m| m == sid)
                .map(|i| StateID::new_unchecked(base + i))
        };

        let mut copies = vec![];
        for i in 0..members.len() {
            let id = StateID::new_unchecked(base + i);
            let next: Vec<StateID> = dfa
                .state(id)
                .successors()
                .map(|s| copy_of(s).unwrap_or(s))
                .collect();
            let states = dfa.states_mut();
            state::update_successors_after_split(states, id, &next);
            copies.push(id);
        }

        let copy_header = StateID::new_unchecked(base);
        debug_assert_eq!(Some(copy_header), copy_of(header));
        for &sid in self.members(pred).to_vec().iter() {
            if !dfa.state(sid).successors().any(|s| s == header) {
                continue;
            }
            let next: Vec<StateID> = dfa
                .state(sid)
                .successors()
                .map(|s| if s == header { copy_header } else { s })
                .collect();
            let states = dfa.states_mut();
            state::update_successors_after_split(states, sid, &next);
        }
        // The original header lost the edges from `pred`, and every target
        // of a copy gained new ones.
        let mut stale = vec![header];
        for &id in copies.iter() {
            stale.extend(dfa.state(id).successors());
        }
        for sid in stale {
            if sid != DEAD {
                dfa.state_mut(sid).taint_preceding_transitions();
            }
        }
        if let Some(ref mut region) = self.regions[pred] {
            region.members.extend(copies);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dfa::{determinize, TransitionRef},
        nfa::{Builder, NFA},
        util::charset::CharSet,
    };

    /// An NFA whose loop between the states after 'c' and after 'd' can be
    /// entered through either state:
    ///
    /// ```text
    /// start -a-> X -c-> C <-> D <-d- Y <-b- start
    /// ```
    ///
    /// With `exit`, C also leaves the loop through 'e'.
    fn loop_nfa(exit: bool) -> NFA {
        let mut b = Builder::new();
        let s = b.add_start(false).unwrap();
        let m = b.add_match(false).unwrap();
        let chars: Vec<StateID> = "abcde"
            .chars()
            .map(|ch| b.add_char(CharSet::single(ch as u32)).unwrap())
            .collect();
        let (a, bb, c, d, e) =
            (chars[0], chars[1], chars[2], chars[3], chars[4]);
        for &(from, to) in
            [(s, a), (s, bb), (a, c), (bb, d), (c, d), (d, c)].iter()
        {
            b.add_transition(from, to).unwrap();
        }
        // Must come before the match, which ends expansion of C.
        if exit {
            b.add_transition(c, e).unwrap();
            b.add_transition(e, m).unwrap();
        }
        b.add_transition(c, m).unwrap();
        b.add_transition(d, m).unwrap();
        b.build().unwrap()
    }

    fn two_entry_loop() -> DFA {
        let mut dfa = DFA::empty(true, false);
        determinize::Config::new().run(&loop_nfa(false), &mut dfa).unwrap();
        dfa
    }

    #[test]
    fn two_entry_loop_is_split() {
        let mut dfa = two_entry_loop();
        assert_eq!(6, dfa.len());
        assert!(!is_reducible(&dfa));

        split(&mut dfa, 10_000).unwrap();
        assert_eq!(7, dfa.len());
        assert!(is_reducible(&dfa));
        // The copy has the same out-degree as the state it was copied from.
        let copy = dfa.state(StateID::must(6));
        let original = dfa
            .states()
            .iter()
            .find(|s| {
                s.id() != copy.id()
                    && s.transition_set() == copy.transition_set()
            })
            .unwrap();
        assert_eq!(
            original.number_of_successors(),
            copy.number_of_successors()
        );
        let err = copy.preceding_transitions().unwrap_err();
        assert!(err.is_tainted_preceding_transitions());
    }

    #[test]
    fn split_leaves_no_stale_reverse_edges() {
        let mut dfa = DFA::empty(true, false);
        determinize::Config::new()
            .track_captures(true)
            .run(&loop_nfa(true), &mut dfa)
            .unwrap();
        assert!(!is_reducible(&dfa));
        split(&mut dfa, 10_000).unwrap();
        assert!(is_reducible(&dfa));

        let mut incoming = vec![vec![]; dfa.len()];
        for state in dfa.states() {
            for (index, t) in state.transitions().iter().enumerate() {
                if t.target() != DEAD {
                    let edge = TransitionRef { state: state.id(), index };
                    incoming[t.target()].push(edge);
                }
            }
        }
        let mut tainted = 0;
        for state in dfa.states() {
            match state.preceding_transitions() {
                Err(err) => {
                    assert!(err.is_tainted_preceding_transitions());
                    tainted += 1;
                }
                Ok(edges) => {
                    let mut got = edges.to_vec();
                    got.sort();
                    let mut want = incoming[state.id()].clone();
                    want.sort();
                    assert_eq!(want, got, "reverse edges of {}", state.id());
                }
            }
        }
        assert!(tainted > 0);

        dfa.recompute_preceding_transitions().unwrap();
        for state in dfa.states() {
            let mut got = state.preceding_transitions().unwrap().to_vec();
            got.sort();
            let mut want = incoming[state.id()].clone();
            want.sort();
            assert_eq!(want, got);
        }
    }

    #[test]
    fn split_respects_state_limit() {
        let mut dfa = two_entry_loop();
        let err = split(&mut dfa, 6).unwrap_err();
        assert!(err.is_split_state_limit_exceeded());
    }

    #[test]
    fn acyclic_graph_is_reducible() {
        let mut b = Builder::new();
        let s = b.add_start(false).unwrap();
        let m = b.add_match(false).unwrap();
        let end = b.add_literal(s, "abc").unwrap();
        b.add_transition(end, m).unwrap();
        let nfa = b.build().unwrap();

        let mut dfa = DFA::empty(true, false);
        determinize::Config::new().run(&nfa, &mut dfa).unwrap();
        assert!(is_reducible(&dfa));
        let len = dfa.len();
        split(&mut dfa, len).unwrap();
        assert_eq!(len, dfa.len());
    }
}
