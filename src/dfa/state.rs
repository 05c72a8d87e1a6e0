/*!
The representation of a single DFA state while the DFA is being built.

A [`StateBuilder`] is created once for every distinct, reachable
[`TransitionSet`] found by subset construction. It collects its outgoing
transitions, whether (and how) it is a final state, and, for trace-finder
automata, the result that is already decided when this state is reached.

Node splitting may later clone a state. A clone shares the original's
transition set and flags, but owns its own transitions and reverse edges. The
reverse edges of a clone, and of every state whose set of incoming edges
changes because of a split, are marked as tainted. Reading tainted reverse
edges is an error until they are recomputed.
*/

use core::{fmt, hash};

use alloc::{vec, vec::Vec};

use crate::{
    dfa::{
        error::Error,
        transition::{TransitionBuilder, TransitionRef},
        transition_set::TransitionSet,
    },
    nfa::NFA,
    util::{
        charset::CharSet,
        id::{PatternID, StateID, TransitionID},
    },
};

/// Which of the two pre-calculated results of a trace-finder state is meant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResultKind {
    /// The result reported when the state is reached at the boundary of the
    /// input.
    Anchored,
    /// The result reported when the state is reached anywhere.
    Unanchored,
}

/// The reverse edges of a DFA state.
#[derive(Clone, Debug, Eq, PartialEq)]
enum PrecedingTransitions {
    /// No reverse edge was ever recorded.
    Unset,
    Populated(Vec<TransitionRef>),
    /// Node splitting changed the incoming edges of this state, so whatever
    /// was recorded before no longer applies.
    Tainted,
}

/// A DFA state under construction.
#[derive(Clone)]
pub struct StateBuilder {
    id: StateID,
    /// Bit 0: initial state.
    /// Bit 1: final regardless of final transitions.
    /// Bit 2: successor of a final state.
    /// Bit 3: backward prefix state.
    bools: u8,
    set: TransitionSet,
    /// Always points to the state itself when this is a prefix state.
    backward_prefix_state: Option<StateID>,
    transitions: Vec<TransitionBuilder>,
    preceding_transitions: PrecedingTransitions,
    anchored_final_transition: Option<TransitionID>,
    unanchored_final_transition: Option<TransitionID>,
    pre_calculated_unanchored_result: Option<PatternID>,
    pre_calculated_anchored_result: Option<PatternID>,
}

impl StateBuilder {
    pub(crate) fn new(
        id: StateID,
        set: TransitionSet,
        is_backward_prefix_state: bool,
    ) -> StateBuilder {
        let mut state = StateBuilder {
            id,
            bools: 0,
            set,
            backward_prefix_state: None,
            transitions: vec![],
            preceding_transitions: PrecedingTransitions::Unset,
            anchored_final_transition: None,
            unanchored_final_transition: None,
            pre_calculated_unanchored_result: None,
            pre_calculated_anchored_result: None,
        };
        state.set_backward_prefix_state_flag(is_backward_prefix_state);
        if is_backward_prefix_state {
            state.backward_prefix_state = Some(id);
        }
        state
    }

    /// The identifier of this state.
    #[inline]
    pub fn id(&self) -> StateID {
        self.id
    }

    /// The set of NFA transitions that identifies this state.
    pub fn transition_set(&self) -> &TransitionSet {
        &self.set
    }

    // Whether searches begin in this state.
    define_bool!(0, pub is_initial_state, set_initial_state);

    // Whether this state is final even without a final transition.
    define_bool!(1, pub is_override_final_state, set_override_final_state);

    // Whether this state is reachable in one step from a final state.
    define_bool!(2, pub is_final_state_successor, set_final_state_successor);

    define_bool!(3, prefix_flag, set_backward_prefix_state_flag);

    /// Returns true if this is a backward prefix state, i.e., a state that
    /// may only continue through NFA states that match before the start of
    /// a search.
    pub fn is_backward_prefix_state(&self) -> bool {
        self.prefix_flag()
    }

    /// Returns true if reaching this state means a match anywhere in the
    /// input.
    pub fn is_final_state(&self) -> bool {
        self.unanchored_final_transition.is_some()
            || self.is_override_final_state()
    }

    /// Returns true if reaching this state means a match at the boundary of
    /// the input.
    pub fn is_anchored_final_state(&self) -> bool {
        self.anchored_final_transition.is_some()
    }

    /// The outgoing transitions of this state. Their matchers are pairwise
    /// disjoint.
    pub fn transitions(&self) -> &[TransitionBuilder] {
        &self.transitions
    }

    pub(crate) fn set_transitions(
        &mut self,
        transitions: Vec<TransitionBuilder>,
    ) {
        self.transitions = transitions;
    }

    pub(crate) fn push_transition(&mut self, transition: TransitionBuilder) {
        self.transitions.push(transition);
    }

    /// The backward prefix state linked to this state, if any. For a backward
    /// prefix state, this is the state itself.
    pub fn backward_prefix_state(&self) -> Option<StateID> {
        self.backward_prefix_state
    }

    pub(crate) fn set_backward_prefix_state(&mut self, sid: Option<StateID>) {
        self.backward_prefix_state = sid;
    }

    /// The number of outgoing edges of this state, counting the link to its
    /// backward prefix state.
    pub fn number_of_successors(&self) -> usize {
        self.transitions.len() + self.backward_prefix_state.map_or(0, |_| 1)
    }

    /// Returns the targets of every outgoing edge, in the same order as
    /// `number_of_successors` counts them.
    pub fn successors(&self) -> impl Iterator<Item = StateID> + '_ {
        self.transitions
            .iter()
            .map(|t| t.target())
            .chain(self.backward_prefix_state)
    }

    /// Returns true if and only if the union of the matchers of all
    /// transitions of this state is every code point.
    ///
    /// The matchers must be pairwise disjoint. This walks the ranges of all
    /// matchers in ascending order, one range at a time, and fails as soon
    /// as the next code point after the last range is not the start of any
    /// remaining range.
    pub fn covers_full_char_space(&self) -> bool {
        let mut indices = vec![0; self.transitions.len()];
        let mut next_lo = CharSet::MIN_VALUE;
        loop {
            let i = match self.find_next_lo(&indices, next_lo) {
                None => return false,
                Some(i) => i,
            };
            let hi = self.transitions[i].matcher().hi(indices[i]);
            if hi == CharSet::MAX_VALUE {
                return true;
            }
            next_lo = hi + 1;
            indices[i] += 1;
        }
    }

    fn find_next_lo(&self, indices: &[usize], lo: u32) -> Option<usize> {
        self.transitions.iter().enumerate().position(|(i, t)| {
            indices[i] < t.matcher().len() && t.matcher().lo(indices[i]) == lo
        })
    }

    /// Record a DFA transition that leads into this state.
    ///
    /// This fails if node splitting invalidated the reverse edges of this
    /// state and they have not been recomputed since.
    pub fn add_preceding_transition(
        &mut self,
        edge: TransitionRef,
    ) -> Result<(), Error> {
        match self.preceding_transitions {
            PrecedingTransitions::Tainted => {
                Err(Error::tainted_preceding_transitions(self.id))
            }
            PrecedingTransitions::Unset => {
                self.preceding_transitions =
                    PrecedingTransitions::Populated(vec![edge]);
                Ok(())
            }
            PrecedingTransitions::Populated(ref mut edges) => {
                edges.push(edge);
                Ok(())
            }
        }
    }

    /// Returns the DFA transitions recorded as leading into this state.
    ///
    /// This fails if node splitting invalidated the reverse edges of this
    /// state and they have not been recomputed since.
    pub fn preceding_transitions(&self) -> Result<&[TransitionRef], Error> {
        match self.preceding_transitions {
            PrecedingTransitions::Tainted => {
                Err(Error::tainted_preceding_transitions(self.id))
            }
            PrecedingTransitions::Unset => Ok(&[]),
            PrecedingTransitions::Populated(ref edges) => Ok(edges),
        }
    }

    /// Forget all reverse edges, tainted or not, so they can be recomputed.
    pub(crate) fn reset_preceding_transitions(&mut self) {
        self.preceding_transitions = PrecedingTransitions::Unset;
    }

    /// Mark the reverse edges of this state as stale.
    pub(crate) fn taint_preceding_transitions(&mut self) {
        self.preceding_transitions = PrecedingTransitions::Tainted;
    }

    /// Returns a copy of this state with the given identifier.
    ///
    /// The copy has its own copies of this state's transitions, which still
    /// lead to the same targets as the original. Flags, the backward prefix
    /// link, final transitions and pre-calculated results are copied as is.
    /// The reverse edges of the copy are tainted. The original is not
    /// modified.
    pub fn create_split_copy(&self, new_id: StateID) -> StateBuilder {
        StateBuilder {
            id: new_id,
            bools: self.bools,
            set: self.set.clone(),
            backward_prefix_state: self.backward_prefix_state,
            transitions: self
                .transitions
                .iter()
                .map(|t| t.create_split_copy())
                .collect(),
            preceding_transitions: PrecedingTransitions::Tainted,
            anchored_final_transition: self.anchored_final_transition,
            unanchored_final_transition: self.unanchored_final_transition,
            pre_calculated_unanchored_result: self
                .pre_calculated_unanchored_result,
            pre_calculated_anchored_result: self
                .pre_calculated_anchored_result,
        }
    }

    /// The NFA transition into an anchored final marker that makes this
    /// state an anchored final state.
    pub fn anchored_final_transition(&self) -> Option<TransitionID> {
        self.anchored_final_transition
    }

    /// The NFA transition into an unanchored final marker that makes this
    /// state a final state.
    pub fn unanchored_final_transition(&self) -> Option<TransitionID> {
        self.unanchored_final_transition
    }

    /// The pre-calculated result of the given kind, if one is known.
    pub fn pre_calculated_result(
        &self,
        kind: ResultKind,
    ) -> Option<PatternID> {
        match kind {
            ResultKind::Anchored => self.pre_calculated_anchored_result,
            ResultKind::Unanchored => self.pre_calculated_unanchored_result,
        }
    }

    /// Lower the pre-calculated result of the given kind to `pid`. A result
    /// never increases: if the current result is already lower, nothing
    /// changes.
    pub fn update_pre_calculated_result(
        &mut self,
        kind: ResultKind,
        pid: PatternID,
    ) {
        let slot = match kind {
            ResultKind::Anchored => &mut self.pre_calculated_anchored_result,
            ResultKind::Unanchored => {
                &mut self.pre_calculated_unanchored_result
            }
        };
        *slot = Some(slot.map_or(pid, |cur| cur.min(pid)));
    }

    /// Forget both pre-calculated results.
    pub fn clear_pre_calculated_results(&mut self) {
        self.pre_calculated_unanchored_result = None;
        self.pre_calculated_anchored_result = None;
    }

    /// Compute whether this state is final from the NFA states its
    /// transition set leads to.
    ///
    /// Members are visited in priority order. The first member leading to an
    /// anchored final marker decides the anchored final transition, while
    /// the unanchored final transition is overwritten by every member that
    /// leads to one. In a forward build, the first such member ends the
    /// scan, since lower priority members can never be reported.
    ///
    /// For trace-finder automata, every final marker one step beyond a
    /// member that carries a single result lowers the pre-calculated result
    /// of the matching kind.
    pub fn update_final_state_data(&mut self, nfa: &NFA, trace_finder: bool) {
        let set = self.set.clone();
        let forward = set.is_forward();
        for &tid in set.transitions() {
            let target = nfa.transition(tid).target(forward);
            if self.anchored_final_transition.is_none() {
                self.anchored_final_transition =
                    nfa.transition_to_anchored_final(target, forward);
            }
            if trace_finder {
                self.update_pre_calculated_results_from(nfa, target, forward);
            }
            let unanchored =
                nfa.transition_to_unanchored_final(target, forward);
            if let Some(t) = unanchored {
                self.unanchored_final_transition = Some(t);
                if forward {
                    return;
                }
            }
        }
    }

    fn update_pre_calculated_results_from(
        &mut self,
        nfa: &NFA,
        sid: StateID,
        forward: bool,
    ) {
        for &t2 in nfa.state(sid).next(forward) {
            let next = nfa.state(nfa.transition(t2).target(forward));
            let kind = if next.is_anchored_final(forward) {
                ResultKind::Anchored
            } else if next.is_unanchored_final(forward) {
                ResultKind::Unanchored
            } else {
                continue;
            };
            if let [pid] = *next.results() {
                self.update_pre_calculated_result(kind, pid);
            }
        }
    }
}

/// Re-point the outgoing edges of state `sid` after a split.
///
/// `new_successors` has one entry per transition of the state, followed by
/// one for its backward prefix link if it has one. Every successor that a
/// transition (or the prefix link) newly leads to has its reverse edges
/// tainted. Successors that stay the same are left untouched.
///
/// This panics if `new_successors` does not have exactly
/// `number_of_successors()` entries.
pub fn update_successors_after_split(
    states: &mut [StateBuilder],
    sid: StateID,
    new_successors: &[StateID],
) {
    let state = &mut states[sid];
    assert_eq!(
        state.number_of_successors(),
        new_successors.len(),
        "wrong number of successors for split state {}",
        sid,
    );
    let mut changed = vec![];
    for (t, &next) in state.transitions.iter_mut().zip(new_successors) {
        if t.target() != next {
            t.set_target(next);
            changed.push(next);
        }
    }
    if let Some(prefix) = state.backward_prefix_state {
        let next = new_successors[new_successors.len() - 1];
        if prefix != next {
            state.backward_prefix_state = Some(next);
            changed.push(next);
        }
    }
    for next in changed {
        states[next].taint_preceding_transitions();
    }
}

impl Eq for StateBuilder {}

impl PartialEq for StateBuilder {
    fn eq(&self, other: &StateBuilder) -> bool {
        self.set == other.set
            && self.is_backward_prefix_state()
                == other.is_backward_prefix_state()
    }
}

impl hash::Hash for StateBuilder {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.set.hash(state);
        self.is_backward_prefix_state().hash(state);
    }
}

impl fmt::Display for StateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.id, self.set)?;
        if let Some(pid) = self.pre_calculated_unanchored_result {
            write!(f, "_r{}", pid)?;
        }
        if let Some(pid) = self.pre_calculated_anchored_result {
            write!(f, "_rA{}", pid)?;
        }
        Ok(())
    }
}

impl fmt::Debug for StateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)?;
        if self.is_final_state() {
            write!(f, " (final)")?;
        }
        if self.is_anchored_final_state() {
            write!(f, " (anchored final)")?;
        }
        for t in self.transitions.iter() {
            write!(f, " {:?} => {}", t.matcher(), t.target())?;
        }
        if let Some(prefix) = self.backward_prefix_state {
            write!(f, " prefix => {}", prefix)?;
        }
        Ok(())
    }
}

/// Emits the identifier of the state, the NFA states of its transition set
/// in priority order, whether it is final and anchored final, and its
/// outgoing transitions.
#[cfg(feature = "serde")]
impl serde::Serialize for StateBuilder {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("StateBuilder", 5)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("stateSet", self.set.targets())?;
        s.serialize_field("finalState", &self.is_final_state())?;
        let anchored = self.is_anchored_final_state();
        s.serialize_field("anchoredFinalState", &anchored)?;
        s.serialize_field("transitions", &self.transitions)?;
        s.end()
    }
}
