use alloc::{vec, vec::Vec};

use crate::{
    dfa::{
        canonical::Canonicalizer,
        error::Error,
        graph::DFA,
        state::{ResultKind, StateBuilder},
        transition::{TransitionBuilder, TransitionRef},
        transition_set::{TransitionSet, TransitionSetBuilder},
        DEAD,
    },
    nfa::{GroupBoundaries, NFA},
    util::{
        charset::CharSet,
        id::{PatternID, StateID, TransitionID},
    },
};

/// A builder for configuring and running subset construction.
#[derive(Clone, Debug)]
pub(crate) struct Config {
    forward: bool,
    trace_finder: bool,
    priority_sensitive: bool,
    track_captures: bool,
    backward_prefix_states: bool,
}

impl Config {
    /// Create a new configuration for a forward DFA. The configuration may be
    /// changed before calling `run`.
    pub fn new() -> Config {
        Config {
            forward: true,
            trace_finder: false,
            priority_sensitive: true,
            track_captures: false,
            backward_prefix_states: false,
        }
    }

    /// Run subset construction on the given NFA and write the resulting
    /// states into the DFA given. The DFA given must be empty.
    pub fn run(&self, nfa: &NFA, dfa: &mut DFA) -> Result<(), Error> {
        assert_eq!(0, dfa.len(), "determinization requires an empty DFA");
        Runner {
            config: self.clone(),
            nfa,
            dfa,
            cache: StateMap::default(),
            sets: TransitionSetBuilder::new(
                nfa,
                self.forward,
                self.priority_sensitive,
            ),
            canonical: Canonicalizer::new(),
            uncompiled: vec![],
        }
        .run()
    }

    /// Whether to follow NFA transitions forward or backward.
    pub fn forward(&mut self, yes: bool) -> &mut Config {
        self.forward = yes;
        self
    }

    /// Whether to pre-calculate the results of final states.
    pub fn trace_finder(&mut self, yes: bool) -> &mut Config {
        self.trace_finder = yes;
        self
    }

    /// Whether the order of NFA transitions in a DFA state is part of its
    /// identity, and whether expansion of a state stops at the first
    /// unanchored final state found.
    pub fn priority_sensitive(&mut self, yes: bool) -> &mut Config {
        self.priority_sensitive = yes;
        self
    }

    /// Whether to record capture groups on transitions and the reverse
    /// edges of every state.
    pub fn track_captures(&mut self, yes: bool) -> &mut Config {
        self.track_captures = yes;
        self
    }

    /// Whether to build backward prefix states. This only has an effect
    /// when building backward from an NFA with prefix states.
    pub fn backward_prefix_states(&mut self, yes: bool) -> &mut Config {
        self.backward_prefix_states = yes;
        self
    }
}

/// The actual implementation of subset construction.
///
/// Every DFA state is identified by a set of NFA transitions (in the
/// direction of the build) together with whether it is a backward prefix
/// state. The NFA states those transitions lead to are the NFA states the
/// DFA state stands for. Note that a transition leads to a state that
/// *consumes* a code point, so the code points on which a DFA state is left
/// are the character sets of the NFA states one step further.
#[derive(Debug)]
struct Runner<'a> {
    /// The configuration used to initialize determinization.
    config: Config,
    /// The NFA we're converting into a DFA.
    nfa: &'a NFA,
    /// The DFA we're building.
    dfa: &'a mut DFA,
    /// A map from the identity of every state built so far to its ID.
    cache: StateMap,
    /// Scratch space for assembling transition sets.
    sets: TransitionSetBuilder,
    /// Scratch space for partitioning the matchers of candidate NFA
    /// transitions.
    canonical: Canonicalizer,
    /// States that still need their transitions computed.
    uncompiled: Vec<StateID>,
}

/// A map from the identity of a DFA state to its ID. When using std, we use
/// a standard hashmap.
#[cfg(feature = "std")]
type StateMap = std::collections::HashMap<(TransitionSet, bool), StateID>;
#[cfg(not(feature = "std"))]
type StateMap =
    alloc::collections::BTreeMap<(TransitionSet, bool), StateID>;

impl<'a> Runner<'a> {
    fn run(mut self) -> Result<(), Error> {
        self.add_dead()?;
        let nfa = self.nfa;
        let entries = nfa.entries(self.config.forward);
        let anchored = self.add_start(entries.anchored())?;
        let unanchored = self.add_start(entries.unanchored())?;
        self.dfa.set_starts(anchored, unanchored);
        while let Some(sid) = self.uncompiled.pop() {
            self.expand(sid)?;
        }
        self.mark_final_state_successors();
        debug!(
            "subset construction built {} DFA states from {} NFA states",
            self.dfa.len(),
            self.nfa.states().len(),
        );
        Ok(())
    }

    /// Add the dead state. Its single transition matches everything and
    /// loops back to itself.
    fn add_dead(&mut self) -> Result<(), Error> {
        let set = TransitionSet::empty(self.config.forward);
        let mut dead = StateBuilder::new(DEAD, set.clone(), false);
        dead.set_transitions(vec![TransitionBuilder::new(
            CharSet::full(),
            GroupBoundaries::empty(),
            DEAD,
        )]);
        self.dfa.push_state(dead);
        self.cache.insert((set, false), DEAD);
        Ok(())
    }

    /// Add the initial state for the given entry transitions. If there are
    /// no entries, this is the dead state.
    fn add_start(
        &mut self,
        entries: &[TransitionID],
    ) -> Result<StateID, Error> {
        for &tid in entries {
            self.sets.add(self.nfa, tid);
        }
        let set = self.sets.build();
        let sid = self.cached_state(set, false)?;
        if sid != DEAD {
            self.dfa.state_mut(sid).set_initial_state(true);
        }
        Ok(sid)
    }

    /// Return the ID of the state with the given identity, building it if it
    /// doesn't exist yet. New states are queued for expansion.
    fn cached_state(
        &mut self,
        set: TransitionSet,
        prefix: bool,
    ) -> Result<StateID, Error> {
        let key = (set, prefix);
        if let Some(&cached_id) = self.cache.get(&key) {
            return Ok(cached_id);
        }
        let id = StateID::new(self.dfa.len())
            .map_err(|_| Error::too_many_states())?;
        let mut state = StateBuilder::new(id, key.0.clone(), prefix);
        state.update_final_state_data(self.nfa, self.config.trace_finder);
        trace!("new DFA state {}", state);
        self.dfa.push_state(state);
        self.cache.insert(key, id);
        self.uncompiled.push(id);
        Ok(id)
    }

    /// Compute all transitions out of the given state.
    fn expand(&mut self, sid: StateID) -> Result<(), Error> {
        let forward = self.config.forward;
        let (set, prefix) = {
            let state = self.dfa.state(sid);
            (state.transition_set().clone(), state.is_backward_prefix_state())
        };
        'members: for &t in set.transitions() {
            let x = self.nfa.transition(t).target(forward);
            for &t2 in self.nfa.state(x).next(forward) {
                let y = self.nfa.transition(t2).target(forward);
                let y = self.nfa.state(y);
                if y.is_final(forward) {
                    // Once the highest priority path through this state has
                    // matched, nothing of lower priority can be reported.
                    if self.config.priority_sensitive
                        && y.is_unanchored_final(forward)
                    {
                        break 'members;
                    }
                    continue;
                }
                if prefix && !y.is_prefix() {
                    continue;
                }
                if let Some(chars) = y.char_set() {
                    self.canonical.add(t2, chars);
                }
            }
        }

        let mut classes = self.canonical.take();
        classes.sort_by_key(|class| class.set.lo(0));
        let mut transitions: Vec<TransitionBuilder> = vec![];
        for class in classes {
            for &m in class.members.iter() {
                self.sets.add(self.nfa, m);
            }
            let next_set = self.sets.build();
            let captures = if self.config.track_captures {
                self.captures(&next_set)
            } else {
                GroupBoundaries::empty()
            };
            let next = self.cached_state(next_set, prefix)?;
            let same = transitions.iter_mut().find(|t| {
                t.target() == next
                    && t.captures().map_or(captures.is_empty(), |c| {
                        *c == captures
                    })
            });
            match same {
                Some(t) => t.union_matcher(&class.set),
                None => transitions
                    .push(TransitionBuilder::new(class.set, captures, next)),
            }
        }
        transitions.sort_by_key(|t| t.matcher().lo(0));

        let state = self.dfa.state_mut(sid);
        state.set_transitions(transitions);
        if !state.covers_full_char_space() {
            let covered = state
                .transitions()
                .iter()
                .fold(CharSet::empty(), |acc, t| acc.union(t.matcher()));
            state.push_transition(TransitionBuilder::new(
                covered.complement(),
                GroupBoundaries::empty(),
                DEAD,
            ));
        }

        if self.builds_backward_prefix_states() && !prefix {
            let twin = self.cached_state(set, true)?;
            self.dfa.state_mut(sid).set_backward_prefix_state(Some(twin));
        }

        if self.config.track_captures {
            let len = self.dfa.state(sid).transitions().len();
            for index in 0..len {
                let target = self.dfa.state(sid).transitions()[index].target();
                if target == DEAD {
                    continue;
                }
                let edge = TransitionRef { state: sid, index };
                self.dfa.state_mut(target).add_preceding_transition(edge)?;
            }
        }
        Ok(())
    }

    /// The capture group slots touched by any transition in the given set.
    fn captures(&self, set: &TransitionSet) -> GroupBoundaries {
        set.transitions().iter().fold(GroupBoundaries::empty(), |acc, &t| {
            acc.union(self.nfa.transition(t).groups())
        })
    }

    fn builds_backward_prefix_states(&self) -> bool {
        !self.config.forward
            && self.config.backward_prefix_states
            && self.nfa.has_prefix_states()
    }

    /// Flag every state that is reachable in one step from a final state.
    fn mark_final_state_successors(&mut self) {
        let mut successors = vec![];
        for state in self.dfa.states() {
            if state.is_final_state() {
                let targets = state.transitions().iter().map(|t| t.target());
                successors.extend(targets);
            }
        }
        for sid in successors {
            self.dfa.state_mut(sid).set_final_state_successor(true);
        }
    }
}

/// Clear the pre-calculated results of every state from which a strictly
/// better (lower) result is still reachable.
///
/// A pre-calculated result is only definitive if continuing the search can
/// never report anything with higher priority. The lowest result reachable
/// from each state is computed as a fixed point over the state graph, with
/// the dead state excluded.
pub(crate) fn resolve_pre_calculated_results(dfa: &mut DFA) {
    let own: Vec<Option<PatternID>> = dfa
        .states()
        .iter()
        .map(|s| {
            let a = s.pre_calculated_result(ResultKind::Anchored);
            let u = s.pre_calculated_result(ResultKind::Unanchored);
            min_result(a, u)
        })
        .collect();
    let mut reachable: Vec<Option<PatternID>> = vec![None; dfa.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for state in dfa.states() {
            let mut best = reachable[state.id()];
            for next in state.successors() {
                if next == DEAD {
                    continue;
                }
                let via = min_result(own[next], reachable[next]);
                best = min_result(best, via);
            }
            if best != reachable[state.id()] {
                reachable[state.id()] = best;
                changed = true;
            }
        }
    }
    for state in dfa.states_mut() {
        let better = match reachable[state.id()] {
            None => continue,
            Some(better) => better,
        };
        let worse = |kind| {
            state.pre_calculated_result(kind).map_or(false, |pid| better < pid)
        };
        if worse(ResultKind::Anchored) || worse(ResultKind::Unanchored) {
            trace!("pre-calculated results of {} are not final", state.id());
            state.clear_pre_calculated_results();
        }
    }
}

fn min_result(
    a: Option<PatternID>,
    b: Option<PatternID>,
) -> Option<PatternID> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
