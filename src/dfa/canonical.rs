use alloc::{vec, vec::Vec};

use crate::util::{charset::CharSet, id::TransitionID};

/// Partitions the possibly overlapping matchers of NFA transitions into
/// pairwise disjoint classes.
///
/// Transitions are added in priority order. Every code point covered by at
/// least one added matcher belongs to exactly one class, and the members of
/// that class are exactly the transitions whose matcher contains the code
/// point, in the order they were added.
#[derive(Clone, Debug, Default)]
pub(crate) struct Canonicalizer {
    classes: Vec<Class>,
}

/// A set of code points on which the same NFA transitions may be taken.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Class {
    pub(crate) set: CharSet,
    pub(crate) members: Vec<TransitionID>,
}

impl Canonicalizer {
    pub(crate) fn new() -> Canonicalizer {
        Canonicalizer::default()
    }

    /// Add a transition taken on the code points in `set`.
    pub(crate) fn add(&mut self, tid: TransitionID, set: &CharSet) {
        if set.is_empty() {
            return;
        }
        let mut rest = set.clone();
        let mut split = vec![];
        for class in self.classes.iter_mut() {
            if rest.is_empty() {
                break;
            }
            let both = class.set.intersect(&rest);
            if both.is_empty() {
                continue;
            }
            rest = rest.difference(&both);
            let only_class = class.set.difference(&both);
            if only_class.is_empty() {
                class.members.push(tid);
            } else {
                class.set = only_class;
                let mut members = class.members.clone();
                members.push(tid);
                split.push(Class { set: both, members });
            }
        }
        self.classes.extend(split);
        if !rest.is_empty() {
            self.classes.push(Class { set: rest, members: vec![tid] });
        }
    }

    /// Take all classes found so far and reset this canonicalizer.
    pub(crate) fn take(&mut self) -> Vec<Class> {
        core::mem::replace(&mut self.classes, vec![])
    }
}
