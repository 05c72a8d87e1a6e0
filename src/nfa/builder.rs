use alloc::vec::Vec;

use crate::{
    nfa::{
        error::BuildError,
        nfa::{
            self, Entries, GroupBoundaries, StateKind, Transition, NFA,
        },
    },
    util::{
        charset::CharSet,
        id::{PatternID, StateID, TransitionID},
    },
};

/// A builder for assembling an [`NFA`] state by state.
///
/// This builder does no parsing. Callers add states and connect them with
/// transitions. The order in which transitions are added out of a state is
/// the priority order of those transitions: earlier transitions are
/// preferred.
///
/// # Example
///
/// This builds an NFA for the pattern `ab|a`, where `ab` is preferred.
///
/// ```
/// use regex_dfa_gen::nfa::Builder;
///
/// let mut b = Builder::new();
/// let start = b.add_start(true)?;
/// let fin = b.add_match(false)?;
/// let a1 = b.add_literal(start, "ab")?;
/// let a2 = b.add_literal(start, "a")?;
/// b.add_transition(a1, fin)?;
/// b.add_transition(a2, fin)?;
/// let nfa = b.build()?;
/// assert_eq!(1, nfa.pattern_len());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    /// A sequence of NFA states. Once a state is added, it is assigned a
    /// state ID equivalent to its index. State `0` is always the hidden
    /// dummy state that entry transitions are attached to.
    states: Vec<nfa::State>,
    /// Every transition added so far, indexed by `TransitionID`.
    transitions: Vec<Transition>,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

impl Builder {
    /// Create a new, empty builder.
    pub fn new() -> Builder {
        let entry = nfa::State {
            kind: StateKind::Entry,
            next: Vec::new(),
            prev: Vec::new(),
        };
        Builder { states: alloc::vec![entry], transitions: Vec::new() }
    }

    /// Add a start marker. Anchored start markers only begin a forward
    /// search at the start of the input.
    pub fn add_start(
        &mut self,
        anchored: bool,
    ) -> Result<StateID, BuildError> {
        self.add_start_with_results(anchored, &[])
    }

    /// Add a start marker that reports the given patterns when a backward
    /// search reaches it.
    pub fn add_start_with_results(
        &mut self,
        anchored: bool,
        results: &[PatternID],
    ) -> Result<StateID, BuildError> {
        self.add(StateKind::Start { anchored, results: results.to_vec() })
    }

    /// Add a match marker. Anchored match markers only end a forward search
    /// at the end of the input.
    pub fn add_match(
        &mut self,
        anchored: bool,
    ) -> Result<StateID, BuildError> {
        self.add_match_with_results(anchored, &[])
    }

    /// Add a match marker that reports the given patterns when a forward
    /// search reaches it.
    pub fn add_match_with_results(
        &mut self,
        anchored: bool,
        results: &[PatternID],
    ) -> Result<StateID, BuildError> {
        self.add(StateKind::Match { anchored, results: results.to_vec() })
    }

    /// Add a state that consumes one code point from `set`.
    pub fn add_char(&mut self, set: CharSet) -> Result<StateID, BuildError> {
        self.add(StateKind::Char { set, prefix: false })
    }

    /// Add a state that consumes one code point from `set` and that may
    /// match before the start of a search.
    pub fn add_prefix_char(
        &mut self,
        set: CharSet,
    ) -> Result<StateID, BuildError> {
        self.add(StateKind::Char { set, prefix: true })
    }

    /// Add a chain of states, one per character of `literal`, starting with a
    /// transition out of `from`. The last state of the chain is returned. If
    /// `literal` is empty, `from` is returned.
    pub fn add_literal(
        &mut self,
        from: StateID,
        literal: &str,
    ) -> Result<StateID, BuildError> {
        let mut prev = from;
        for ch in literal.chars() {
            let next = self.add_char(CharSet::single(ch as u32))?;
            self.add_transition(prev, next)?;
            prev = next;
        }
        Ok(prev)
    }

    /// Add a transition from `from` to `to` that touches no capture groups.
    ///
    /// The new transition has lower priority than every transition already
    /// added out of `from`.
    pub fn add_transition(
        &mut self,
        from: StateID,
        to: StateID,
    ) -> Result<TransitionID, BuildError> {
        self.add_transition_with_groups(from, to, GroupBoundaries::empty())
    }

    /// Add a transition from `from` to `to` that touches the given capture
    /// group slots.
    pub fn add_transition_with_groups(
        &mut self,
        from: StateID,
        to: StateID,
        groups: GroupBoundaries,
    ) -> Result<TransitionID, BuildError> {
        for &id in &[from, to] {
            if id == StateID::ZERO || id.as_usize() >= self.states.len() {
                return Err(BuildError::unknown_state(id));
            }
        }
        let leaves_match =
            matches!(self.states[from].kind, StateKind::Match { .. });
        let enters_start =
            matches!(self.states[to].kind, StateKind::Start { .. });
        if leaves_match || enters_start {
            return Err(BuildError::invalid_transition(from, to));
        }
        self.push_transition(from, to, groups)
    }

    /// Build the NFA.
    ///
    /// This attaches the entry transitions for both search directions: one
    /// out of the dummy state into every start marker, and one out of every
    /// match marker into the dummy state. Anchored entries include every
    /// marker, unanchored entries only the unanchored markers.
    pub fn build(&self) -> Result<NFA, BuildError> {
        let mut b = self.clone();
        let mut forward = Entries::default();
        let mut backward = Entries::default();
        let mut pattern_len = 1;
        let mut has_prefix_states = false;
        for i in 1..b.states.len() {
            let sid = StateID::new_unchecked(i);
            let (anchored, results, is_start) = match b.states[sid].kind {
                StateKind::Start { anchored, ref results } => {
                    (anchored, results, true)
                }
                StateKind::Match { anchored, ref results } => {
                    (anchored, results, false)
                }
                StateKind::Char { prefix, .. } => {
                    has_prefix_states |= prefix;
                    continue;
                }
                StateKind::Entry => continue,
            };
            if let Some(max) = results.iter().max() {
                pattern_len = pattern_len.max(max.as_usize() + 1);
            }
            let none = GroupBoundaries::empty();
            let (tid, entries) = if is_start {
                (b.push_transition(StateID::ZERO, sid, none)?, &mut forward)
            } else {
                (b.push_transition(sid, StateID::ZERO, none)?, &mut backward)
            };
            entries.anchored.push(tid);
            if !anchored {
                entries.unanchored.push(tid);
            }
        }
        if forward.anchored.is_empty() {
            return Err(BuildError::missing_start());
        }
        if backward.anchored.is_empty() {
            return Err(BuildError::missing_match());
        }
        trace!(
            "NFA built: {} states, {} transitions, {} patterns",
            b.states.len(),
            b.transitions.len(),
            pattern_len,
        );
        Ok(NFA::new(nfa::Inner {
            states: b.states,
            transitions: b.transitions,
            forward_entries: forward,
            backward_entries: backward,
            pattern_len,
            has_prefix_states,
        }))
    }

    fn add(&mut self, kind: StateKind) -> Result<StateID, BuildError> {
        let id = StateID::new(self.states.len())
            .map_err(|_| BuildError::too_many_states(self.states.len()))?;
        let (next, prev) = (Vec::new(), Vec::new());
        self.states.push(nfa::State { kind, next, prev });
        Ok(id)
    }

    fn push_transition(
        &mut self,
        from: StateID,
        to: StateID,
        groups: GroupBoundaries,
    ) -> Result<TransitionID, BuildError> {
        let id = TransitionID::new(self.transitions.len()).map_err(|_| {
            BuildError::too_many_transitions(self.transitions.len())
        })?;
        let t = Transition { id, source: from, target: to, groups };
        self.transitions.push(t);
        self.states[from].next.push(id);
        self.states[to].prev.push(id);
        Ok(id)
    }
}
