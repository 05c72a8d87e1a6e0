use core::{cmp::Ordering, fmt, hash};

use alloc::{boxed::Box, sync::Arc, vec::Vec};

use crate::{
    nfa::NFA,
    util::{
        id::{StateID, TransitionID},
        sparse_set::SparseSet,
    },
};

/// An ordered set of NFA transitions that identifies a single DFA state.
///
/// No two transitions in a set lead to the same NFA state (in the direction
/// the set was built for). Transitions are stored in priority order.
///
/// The identity of a set, which determines equality, hashing and ordering,
/// depends on how it was built. A priority sensitive set is identified by
/// the ordered sequence of NFA states its transitions lead to, so two sets
/// reaching the same states in a different order are distinct. Otherwise, a
/// set is identified by the sorted NFA states alone.
///
/// A `TransitionSet` is cheap to clone.
#[derive(Clone)]
pub struct TransitionSet(Arc<Inner>);

struct Inner {
    forward: bool,
    transitions: Box<[TransitionID]>,
    /// The target of every transition, in priority order.
    targets: Box<[StateID]>,
    identity: Box<[StateID]>,
}

impl TransitionSet {
    /// Create a set with no transitions. This is the set of the dead state.
    pub(crate) fn empty(forward: bool) -> TransitionSet {
        TransitionSet(Arc::new(Inner {
            forward,
            transitions: Box::new([]),
            targets: Box::new([]),
            identity: Box::new([]),
        }))
    }

    /// Returns the transitions in this set, in priority order.
    #[inline]
    pub fn transitions(&self) -> &[TransitionID] {
        &self.0.transitions
    }

    /// Returns the NFA states the transitions in this set lead to, in
    /// priority order.
    pub fn targets(&self) -> &[StateID] {
        &self.0.targets
    }

    /// Returns the number of transitions in this set.
    pub fn len(&self) -> usize {
        self.0.transitions.len()
    }

    /// Returns true if and only if this set has no transitions.
    pub fn is_empty(&self) -> bool {
        self.0.transitions.is_empty()
    }

    /// Returns true if this set was built for a forward search.
    pub fn is_forward(&self) -> bool {
        self.0.forward
    }
}

impl Eq for TransitionSet {}

impl PartialEq for TransitionSet {
    fn eq(&self, other: &TransitionSet) -> bool {
        self.0.forward == other.0.forward
            && self.0.identity == other.0.identity
    }
}

impl hash::Hash for TransitionSet {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.forward.hash(state);
        self.0.identity.hash(state);
    }
}

impl Ord for TransitionSet {
    fn cmp(&self, other: &TransitionSet) -> Ordering {
        (self.0.forward, &*self.0.identity)
            .cmp(&(other.0.forward, &*other.0.identity))
    }
}

impl PartialOrd for TransitionSet {
    fn partial_cmp(&self, other: &TransitionSet) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TransitionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, &tid) in self.transitions().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", tid)?;
        }
        write!(f, "}}")
    }
}

/// A reusable scratch space for assembling transition sets.
///
/// Transitions are added in priority order. A transition is dropped if an
/// earlier transition already leads to the same NFA state.
#[derive(Clone, Debug)]
pub(crate) struct TransitionSetBuilder {
    forward: bool,
    priority_sensitive: bool,
    seen: SparseSet,
    transitions: Vec<TransitionID>,
    targets: Vec<StateID>,
}

impl TransitionSetBuilder {
    pub(crate) fn new(
        nfa: &NFA,
        forward: bool,
        priority_sensitive: bool,
    ) -> TransitionSetBuilder {
        TransitionSetBuilder {
            forward,
            priority_sensitive,
            seen: SparseSet::new(nfa.states().len()),
            transitions: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Adds the given transition and returns true if no previously added
    /// transition leads to the same NFA state.
    pub(crate) fn add(&mut self, nfa: &NFA, tid: TransitionID) -> bool {
        let target = nfa.transition(tid).target(self.forward);
        if !self.seen.insert(target) {
            return false;
        }
        self.transitions.push(tid);
        self.targets.push(target);
        true
    }

    /// Builds a set from the transitions added since the last call and
    /// clears this builder.
    pub(crate) fn build(&mut self) -> TransitionSet {
        let transitions = self.transitions.drain(..).collect();
        let targets: Box<[StateID]> = self.targets.drain(..).collect();
        let mut identity = targets.clone();
        if !self.priority_sensitive {
            identity.sort_unstable();
        }
        self.seen.clear();
        TransitionSet(Arc::new(Inner {
            forward: self.forward,
            transitions,
            targets,
            identity,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::Builder;

    fn two_branches() -> (NFA, TransitionID, TransitionID, TransitionID) {
        let mut b = Builder::new();
        let s = b.add_start(false).unwrap();
        let m = b.add_match(false).unwrap();
        let x = b.add_literal(s, "a").unwrap();
        let y = b.add_literal(s, "b").unwrap();
        let tx = b.add_transition(x, m).unwrap();
        let ty = b.add_transition(y, m).unwrap();
        let txy = b.add_transition(x, y).unwrap();
        (b.build().unwrap(), tx, ty, txy)
    }

    #[test]
    fn duplicate_targets_are_dropped() {
        let (nfa, tx, ty, txy) = two_branches();
        let mut b = TransitionSetBuilder::new(&nfa, true, true);
        assert!(b.add(&nfa, txy));
        assert!(b.add(&nfa, tx));
        assert!(!b.add(&nfa, ty));
        let set = b.build();
        assert_eq!(&[txy, tx], set.transitions());
        assert_eq!(2, set.len());

        // The builder is reusable after building.
        assert!(b.add(&nfa, ty));
        assert_eq!(&[ty], b.build().transitions());
    }

    #[test]
    fn identity_depends_on_priority_sensitivity() {
        let (nfa, tx, _, txy) = two_branches();

        let mut b = TransitionSetBuilder::new(&nfa, true, true);
        b.add(&nfa, tx);
        b.add(&nfa, txy);
        let set1 = b.build();
        b.add(&nfa, txy);
        b.add(&nfa, tx);
        let set2 = b.build();
        assert_ne!(set1, set2);

        let mut b = TransitionSetBuilder::new(&nfa, true, false);
        b.add(&nfa, tx);
        b.add(&nfa, txy);
        let set1 = b.build();
        b.add(&nfa, txy);
        b.add(&nfa, tx);
        let set2 = b.build();
        assert_eq!(set1, set2);
        assert_eq!(Ordering::Equal, set1.cmp(&set2));
        // Targets keep their priority order either way.
        let m = nfa.transition(tx).target(true);
        let y = nfa.transition(txy).target(true);
        assert_eq!(&[m, y], set1.targets());
        assert_eq!(&[y, m], set2.targets());
    }
}
