use crate::{
    nfa::GroupBoundaries,
    util::{charset::CharSet, id::StateID},
};

/// A single outgoing edge of a DFA state under construction.
///
/// The matcher is fixed once the edge is created. The target may be
/// re-pointed by node splitting, which is the only reason it is mutable.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransitionBuilder {
    matcher: CharSet,
    captures: Option<GroupBoundaries>,
    target: StateID,
}

impl TransitionBuilder {
    pub(crate) fn new(
        matcher: CharSet,
        captures: GroupBoundaries,
        target: StateID,
    ) -> TransitionBuilder {
        let captures = if captures.is_empty() { None } else { Some(captures) };
        TransitionBuilder { matcher, captures, target }
    }

    /// The code points this edge is taken on.
    pub fn matcher(&self) -> &CharSet {
        &self.matcher
    }

    /// The capture group slots touched when taking this edge, if any.
    pub fn captures(&self) -> Option<&GroupBoundaries> {
        self.captures.as_ref()
    }

    /// The DFA state this edge leads to.
    #[inline]
    pub fn target(&self) -> StateID {
        self.target
    }

    pub(crate) fn set_target(&mut self, target: StateID) {
        self.target = target;
    }

    /// Widen the matcher of this edge to include `other`.
    ///
    /// This is only used while the owning state is being expanded, to merge
    /// edges that lead to the same place.
    pub(crate) fn union_matcher(&mut self, other: &CharSet) {
        self.matcher = self.matcher.union(other);
    }

    /// Returns an independent copy of this edge for use by a split copy of
    /// its owning state. The target is overwritten afterwards.
    pub fn create_split_copy(&self) -> TransitionBuilder {
        self.clone()
    }
}

/// A reference to one DFA transition: the state it leaves and its position
/// in that state's transitions.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TransitionRef {
    /// The state the transition leaves.
    pub state: StateID,
    /// The index of the transition in the state's transitions.
    pub index: usize,
}
