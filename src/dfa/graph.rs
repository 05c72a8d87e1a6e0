use core::fmt;

use alloc::vec::Vec;

use crate::{
    dfa::{
        error::Error,
        split,
        state::StateBuilder,
        transition::{TransitionBuilder, TransitionRef},
        DEAD,
    },
    util::id::StateID,
};

/// A DFA state graph produced by subset construction.
///
/// States are stored in an arena indexed by [`StateID`]. State `0` is always
/// the dead state: it has a single transition on every code point that leads
/// back to itself, and it is never final.
///
/// This graph is the input to an execution engine. It does not support
/// searching by itself.
#[derive(Clone)]
pub struct DFA {
    states: Vec<StateBuilder>,
    start_anchored: StateID,
    start_unanchored: StateID,
    forward: bool,
    trace_finder: bool,
}

impl DFA {
    pub(crate) fn empty(forward: bool, trace_finder: bool) -> DFA {
        DFA {
            states: Vec::new(),
            start_anchored: DEAD,
            start_unanchored: DEAD,
            forward,
            trace_finder,
        }
    }

    /// Returns all states of this DFA, indexed by `StateID`.
    pub fn states(&self) -> &[StateBuilder] {
        &self.states
    }

    /// Returns the state with the given identifier.
    ///
    /// This panics if the identifier is not valid for this DFA.
    #[inline]
    pub fn state(&self, id: StateID) -> &StateBuilder {
        &self.states[id]
    }

    pub(crate) fn state_mut(&mut self, id: StateID) -> &mut StateBuilder {
        &mut self.states[id]
    }

    pub(crate) fn states_mut(&mut self) -> &mut [StateBuilder] {
        &mut self.states
    }

    pub(crate) fn push_state(&mut self, state: StateBuilder) {
        assert_eq!(self.states.len(), state.id().as_usize());
        self.states.push(state);
    }

    /// Returns the number of states in this DFA, including the dead state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// The state a search begins in when it starts at the boundary of the
    /// input.
    pub fn start_anchored(&self) -> StateID {
        self.start_anchored
    }

    /// The state a search begins in when it may start anywhere. This is the
    /// dead state if no search can start anywhere.
    pub fn start_unanchored(&self) -> StateID {
        self.start_unanchored
    }

    pub(crate) fn set_starts(
        &mut self,
        anchored: StateID,
        unanchored: StateID,
    ) {
        self.start_anchored = anchored;
        self.start_unanchored = unanchored;
    }

    /// Returns true if this DFA was built for a forward search.
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// Returns true if this DFA was built in trace-finder mode.
    pub fn is_trace_finder(&self) -> bool {
        self.trace_finder
    }

    /// Returns the transition referred to by `r`.
    pub fn transition(&self, r: TransitionRef) -> &TransitionBuilder {
        &self.state(r.state).transitions()[r.index]
    }

    /// Returns the transitions recorded as leading into the given state.
    ///
    /// These are only recorded when capture tracking is enabled. This fails
    /// if node splitting invalidated them without recomputing them.
    pub fn preceding_transitions(
        &self,
        id: StateID,
    ) -> Result<&[TransitionRef], Error> {
        self.state(id).preceding_transitions()
    }

    /// Returns true if and only if the state graph of this DFA is reducible,
    /// i.e., every loop has a single entry state.
    ///
    /// Edges into the dead state are ignored.
    pub fn is_reducible(&self) -> bool {
        split::is_reducible(self)
    }

    /// Returns an error if any state has more than `limit` successors.
    pub(crate) fn check_successors(&self, limit: usize) -> Result<(), Error> {
        for state in self.states.iter() {
            let successors = state.number_of_successors();
            if successors > limit {
                return Err(Error::too_many_successors(
                    state.id(),
                    successors,
                    limit,
                ));
            }
        }
        Ok(())
    }

    /// Forget all reverse edges and record them again from the current
    /// transitions. Edges into the dead state are not recorded.
    pub(crate) fn recompute_preceding_transitions(
        &mut self,
    ) -> Result<(), Error> {
        for state in self.states.iter_mut() {
            state.reset_preceding_transitions();
        }
        for i in 0..self.states.len() {
            let sid = StateID::new_unchecked(i);
            for index in 0..self.states[sid].transitions().len() {
                let target = self.states[sid].transitions()[index].target();
                if target == DEAD {
                    continue;
                }
                let edge = TransitionRef { state: sid, index };
                self.states[target].add_preceding_transition(edge)?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DFA {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("DFA", 5)?;
        s.serialize_field("forward", &self.forward)?;
        s.serialize_field("traceFinder", &self.trace_finder)?;
        s.serialize_field("startAnchored", &self.start_anchored)?;
        s.serialize_field("startUnanchored", &self.start_unanchored)?;
        s.serialize_field("states", &self.states)?;
        s.end()
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.forward { "forward" } else { "backward" };
        writeln!(f, "dfa::DFA({}", dir)?;
        for state in self.states.iter() {
            let mark = if state.id() == self.start_anchored
                || state.id() == self.start_unanchored
            {
                '>'
            } else {
                ' '
            };
            writeln!(f, "{}{:?}", mark, state)?;
        }
        writeln!(
            f,
            "anchored start: {}, unanchored start: {}",
            self.start_anchored, self.start_unanchored,
        )?;
        writeln!(f, ")")
    }
}
