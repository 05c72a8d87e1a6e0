use core::fmt;

use alloc::{sync::Arc, vec::Vec};

use crate::util::{
    charset::CharSet,
    id::{IteratorIDExt, PatternID, StateID, TransitionID},
};

/// A priority-ordered nondeterministic finite automaton.
///
/// Every state other than the markers consumes exactly one code point from a
/// [`CharSet`]. Transitions carry no input themselves; instead, taking a
/// transition in the forward direction means consuming a code point matched
/// by the transition's target state. Taken in the backward direction, the
/// code point is matched by the transition's source state.
///
/// Match semantics are expressed with markers:
///
/// * A `Start` marker begins a forward search. A transition out of an
/// unanchored start marker may begin anywhere, while a transition out of an
/// anchored start marker may only begin at the start of the input.
/// * A `Match` marker ends a forward search. Reaching a state with a
/// transition to an unanchored match marker means a match ends here.
/// Reaching a state with a transition to an anchored match marker means a
/// match ends here only if this is also the end of the input.
///
/// When building a DFA backward, the roles of the markers are swapped.
///
/// The outgoing transitions of every state are ordered by priority. Earlier
/// transitions are preferred over later ones.
///
/// An `NFA` is cheap to clone. It uses reference counting internally.
#[derive(Clone)]
pub struct NFA(Arc<Inner>);

#[derive(Default)]
pub(crate) struct Inner {
    pub(crate) states: Vec<State>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) forward_entries: Entries,
    pub(crate) backward_entries: Entries,
    pub(crate) pattern_len: usize,
    pub(crate) has_prefix_states: bool,
}

impl NFA {
    pub(crate) fn new(inner: Inner) -> NFA {
        NFA(Arc::new(inner))
    }

    /// Returns the state with the given identifier.
    ///
    /// This panics if the identifier is not valid for this NFA.
    #[inline]
    pub fn state(&self, id: StateID) -> &State {
        &self.0.states[id]
    }

    /// Returns all states in this NFA, indexed by `StateID`.
    pub fn states(&self) -> &[State] {
        &self.0.states
    }

    /// Returns the transition with the given identifier.
    ///
    /// This panics if the identifier is not valid for this NFA.
    #[inline]
    pub fn transition(&self, id: TransitionID) -> &Transition {
        &self.0.transitions[id]
    }

    /// Returns the total number of transitions in this NFA.
    pub fn transition_len(&self) -> usize {
        self.0.transitions.len()
    }

    /// Returns the entry transitions for a search in the given direction.
    ///
    /// Entry transitions lead from a hidden dummy state into the markers a
    /// search begins at: start markers when `forward` is true and match
    /// markers otherwise.
    pub fn entries(&self, forward: bool) -> &Entries {
        if forward {
            &self.0.forward_entries
        } else {
            &self.0.backward_entries
        }
    }

    /// Returns the number of patterns (possible results) in this NFA.
    ///
    /// This is one more than the largest pattern ID attached to any marker,
    /// or `1` if no marker carries a pattern ID.
    pub fn pattern_len(&self) -> usize {
        self.0.pattern_len
    }

    /// Returns true if and only if at least one state in this NFA may match
    /// before the start of a search.
    pub fn has_prefix_states(&self) -> bool {
        self.0.has_prefix_states
    }

    /// Returns the first transition (in the given direction) out of `id`
    /// that leads to an anchored final marker.
    pub fn transition_to_anchored_final(
        &self,
        id: StateID,
        forward: bool,
    ) -> Option<TransitionID> {
        self.state(id).next(forward).iter().copied().find(|&t| {
            self.state(self.transition(t).target(forward))
                .is_anchored_final(forward)
        })
    }

    /// Returns the first transition (in the given direction) out of `id`
    /// that leads to an unanchored final marker.
    pub fn transition_to_unanchored_final(
        &self,
        id: StateID,
        forward: bool,
    ) -> Option<TransitionID> {
        self.state(id).next(forward).iter().copied().find(|&t| {
            self.state(self.transition(t).target(forward))
                .is_unanchored_final(forward)
        })
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nfa::NFA(")?;
        for (sid, state) in self.0.states.iter().with_state_ids() {
            write!(f, "{:06?}: {:?} =>", sid.as_usize(), state.kind())?;
            for &tid in state.next(true) {
                let t = self.transition(tid);
                write!(f, " {}", t.target(true))?;
                if !t.groups().is_empty() {
                    write!(f, "{:?}", t.groups())?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "forward entries: {:?}", self.0.forward_entries)?;
        writeln!(f, "backward entries: {:?}", self.0.backward_entries)?;
        writeln!(f, ")")
    }
}

/// The transitions a search begins with, in one direction.
#[derive(Clone, Debug, Default)]
pub struct Entries {
    pub(crate) anchored: Vec<TransitionID>,
    pub(crate) unanchored: Vec<TransitionID>,
}

impl Entries {
    /// The entry transitions for a search that begins at the boundary of the
    /// input. This includes entries into both anchored and unanchored
    /// markers.
    pub fn anchored(&self) -> &[TransitionID] {
        &self.anchored
    }

    /// The entry transitions for a search that may begin anywhere. This only
    /// includes entries into unanchored markers.
    pub fn unanchored(&self) -> &[TransitionID] {
        &self.unanchored
    }
}

/// A single state in an NFA.
#[derive(Clone, Debug)]
pub struct State {
    pub(crate) kind: StateKind,
    pub(crate) next: Vec<TransitionID>,
    pub(crate) prev: Vec<TransitionID>,
}

/// The kind of an NFA state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StateKind {
    /// The hidden dummy state that entry transitions begin or end at.
    Entry,
    /// A start marker. In a trace-finder NFA built for backward search,
    /// `results` names the pattern that matches when this marker is reached.
    Start { anchored: bool, results: Vec<PatternID> },
    /// A match marker. In a trace-finder NFA built for forward search,
    /// `results` names the pattern that matches when this marker is reached.
    Match { anchored: bool, results: Vec<PatternID> },
    /// A state that consumes one code point in `set`. When `prefix` is true,
    /// this state may match before the start of a search.
    Char { set: CharSet, prefix: bool },
}

impl State {
    /// Returns the kind of this state.
    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    /// Returns the transitions leaving this state in the given direction, in
    /// priority order.
    ///
    /// In the forward direction, these are the outgoing transitions. In the
    /// backward direction, these are the incoming transitions.
    #[inline]
    pub fn next(&self, forward: bool) -> &[TransitionID] {
        if forward {
            &self.next
        } else {
            &self.prev
        }
    }

    /// Returns the code points this state consumes, if it consumes any.
    pub fn char_set(&self) -> Option<&CharSet> {
        match self.kind {
            StateKind::Char { ref set, .. } => Some(set),
            _ => None,
        }
    }

    /// Returns true if and only if this state may match before the start of
    /// a search.
    pub fn is_prefix(&self) -> bool {
        match self.kind {
            StateKind::Char { prefix, .. } => prefix,
            _ => false,
        }
    }

    /// Returns the pattern IDs attached to this state if it is a marker.
    pub fn results(&self) -> &[PatternID] {
        match self.kind {
            StateKind::Start { ref results, .. }
            | StateKind::Match { ref results, .. } => results,
            _ => &[],
        }
    }

    /// Returns true if reaching this state ends a search in the given
    /// direction.
    #[inline]
    pub fn is_final(&self, forward: bool) -> bool {
        self.final_anchored(forward).is_some()
    }

    /// Returns true if this state is a final marker in the given direction
    /// that only matches at the boundary of the input.
    pub fn is_anchored_final(&self, forward: bool) -> bool {
        self.final_anchored(forward) == Some(true)
    }

    /// Returns true if this state is a final marker in the given direction
    /// that matches anywhere.
    pub fn is_unanchored_final(&self, forward: bool) -> bool {
        self.final_anchored(forward) == Some(false)
    }

    fn final_anchored(&self, forward: bool) -> Option<bool> {
        match (&self.kind, forward) {
            (&StateKind::Match { anchored, .. }, true) => Some(anchored),
            (&StateKind::Start { anchored, .. }, false) => Some(anchored),
            _ => None,
        }
    }
}

/// A transition between two NFA states.
#[derive(Clone, Debug)]
pub struct Transition {
    pub(crate) id: TransitionID,
    pub(crate) source: StateID,
    pub(crate) target: StateID,
    pub(crate) groups: GroupBoundaries,
}

impl Transition {
    /// Returns the identifier of this transition.
    pub fn id(&self) -> TransitionID {
        self.id
    }

    /// Returns the state this transition leads to in the given direction.
    ///
    /// Forward, this is the target. Backward, this is the source.
    #[inline]
    pub fn target(&self, forward: bool) -> StateID {
        if forward {
            self.target
        } else {
            self.source
        }
    }

    /// Returns the state this transition comes from in the given direction.
    #[inline]
    pub fn source(&self, forward: bool) -> StateID {
        self.target(!forward)
    }

    /// Returns the capture group slots updated and cleared when this
    /// transition is taken.
    pub fn groups(&self) -> &GroupBoundaries {
        &self.groups
    }
}

/// The capture group slots touched by a transition.
///
/// `updates` are slots that record the current position when the transition
/// is taken, and `clears` are slots that are reset. Both are kept sorted and
/// deduplicated.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupBoundaries {
    updates: Vec<usize>,
    clears: Vec<usize>,
}

impl GroupBoundaries {
    /// Create a new set of group boundaries from the given slot indices.
    pub fn new<U, C>(updates: U, clears: C) -> GroupBoundaries
    where
        U: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        let mut updates: Vec<usize> = updates.into_iter().collect();
        let mut clears: Vec<usize> = clears.into_iter().collect();
        updates.sort_unstable();
        updates.dedup();
        clears.sort_unstable();
        clears.dedup();
        GroupBoundaries { updates, clears }
    }

    /// Create an empty set of group boundaries.
    pub fn empty() -> GroupBoundaries {
        GroupBoundaries::default()
    }

    /// Returns true if this touches no slots.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.clears.is_empty()
    }

    /// The slots updated with the current position.
    pub fn updates(&self) -> &[usize] {
        &self.updates
    }

    /// The slots that are cleared.
    pub fn clears(&self) -> &[usize] {
        &self.clears
    }

    /// Returns the union of the slots touched by `self` and `other`.
    pub fn union(&self, other: &GroupBoundaries) -> GroupBoundaries {
        GroupBoundaries::new(
            self.updates.iter().chain(other.updates.iter()).copied(),
            self.clears.iter().chain(other.clears.iter()).copied(),
        )
    }
}

impl fmt::Debug for GroupBoundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{u{:?} c{:?}}}", self.updates, self.clears)
    }
}
