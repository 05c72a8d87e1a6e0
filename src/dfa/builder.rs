use crate::{
    dfa::{determinize, error::Error, graph::DFA, split},
    nfa::NFA,
};

/// The default maximum number of states node splitting may grow a DFA to.
const DEFAULT_SPLIT_STATE_LIMIT: usize = 10_000;

/// The configuration used for building a DFA state graph.
///
/// A configuration is a simple data object that is typically used with
/// [`Builder::configure`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    // All knobs are options so that "not set" can be told apart from the
    // default. See 'overwrite'.
    forward: Option<bool>,
    trace_finder: Option<bool>,
    priority_sensitive: Option<bool>,
    track_captures: Option<bool>,
    backward_prefix_states: Option<bool>,
    max_successors: Option<Option<usize>>,
    node_splitting: Option<bool>,
    node_split_state_limit: Option<usize>,
}

impl Config {
    /// Return a new default DFA configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Whether to follow NFA transitions in their forward direction.
    ///
    /// A backward DFA starts at the match markers of the NFA and walks its
    /// transitions in reverse, which finds where a match began given where
    /// it ended.
    ///
    /// This is enabled by default.
    pub fn forward(mut self, yes: bool) -> Config {
        self.forward = Some(yes);
        self
    }

    /// Whether to pre-calculate the results of final states.
    ///
    /// In trace-finder mode, every final state records the lowest pattern
    /// it can report, both for anchored and unanchored final markers. Once
    /// the graph is complete, results that a continued search could still
    /// improve upon are cleared again, so the results left on a state are
    /// definitive.
    ///
    /// This is disabled by default.
    pub fn trace_finder(mut self, yes: bool) -> Config {
        self.trace_finder = Some(yes);
        self
    }

    /// Whether the order of NFA transitions is part of the identity of a
    /// DFA state.
    ///
    /// When enabled, two sets containing the same transitions in a
    /// different order produce different DFA states, and expanding a state
    /// stops at the first transition that leads to an unanchored match.
    /// This is what leftmost-first semantics need. When disabled, states
    /// are identified by their sets alone.
    ///
    /// By default this is enabled for forward DFAs that are not built in
    /// trace-finder mode.
    pub fn priority_sensitive(mut self, yes: bool) -> Config {
        self.priority_sensitive = Some(yes);
        self
    }

    /// Whether to record capture group boundaries on transitions, along
    /// with the transitions that lead into every state.
    ///
    /// This is disabled by default.
    pub fn track_captures(mut self, yes: bool) -> Config {
        self.track_captures = Some(yes);
        self
    }

    /// Whether to give every state of a backward DFA a twin that also
    /// follows the prefix states of the NFA.
    ///
    /// This has no effect on forward DFAs, or on NFAs without prefix
    /// states.
    ///
    /// This is disabled by default.
    pub fn backward_prefix_states(mut self, yes: bool) -> Config {
        self.backward_prefix_states = Some(yes);
        self
    }

    /// Set the maximum number of successors of a single state.
    ///
    /// The successors of a state are the targets of its transitions, plus
    /// its prefix twin if it has one. When any state exceeds this limit,
    /// building fails. Node splitting copies states along with all of
    /// their transitions, so it cannot bring a state under this limit.
    ///
    /// There is no limit by default.
    pub fn max_successors(mut self, limit: Option<usize>) -> Config {
        self.max_successors = Some(limit);
        self
    }

    /// Whether to split states until every loop in the state graph has a
    /// single entry state.
    ///
    /// Some consumers of a DFA, such as code generators that emit
    /// structured loops, need a reducible graph. Splitting duplicates the
    /// states of loops that can be entered from more than one place.
    ///
    /// This is disabled by default.
    pub fn node_splitting(mut self, yes: bool) -> Config {
        self.node_splitting = Some(yes);
        self
    }

    /// Set the maximum number of states node splitting may grow a DFA to.
    ///
    /// If splitting needs more states, building fails.
    ///
    /// The default is `10_000`.
    pub fn node_split_state_limit(mut self, limit: usize) -> Config {
        self.node_split_state_limit = Some(limit);
        self
    }

    /// Returns whether this configuration builds a forward DFA.
    pub fn get_forward(&self) -> bool {
        self.forward.unwrap_or(true)
    }

    /// Returns whether this configuration pre-calculates final results.
    pub fn get_trace_finder(&self) -> bool {
        self.trace_finder.unwrap_or(false)
    }

    /// Returns whether transition order is part of a state's identity.
    pub fn get_priority_sensitive(&self) -> bool {
        self.priority_sensitive
            .unwrap_or(self.get_forward() && !self.get_trace_finder())
    }

    pub fn get_track_captures(&self) -> bool {
        self.track_captures.unwrap_or(false)
    }

    pub fn get_backward_prefix_states(&self) -> bool {
        self.backward_prefix_states.unwrap_or(false)
    }

    /// Returns the maximum number of successors of a state, if one was set.
    pub fn get_max_successors(&self) -> Option<usize> {
        self.max_successors.unwrap_or(None)
    }

    pub fn get_node_splitting(&self) -> bool {
        self.node_splitting.unwrap_or(false)
    }

    pub fn get_node_split_state_limit(&self) -> usize {
        self.node_split_state_limit.unwrap_or(DEFAULT_SPLIT_STATE_LIMIT)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used. If it's not set in `self` either, then it
    /// remains not set.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            forward: o.forward.or(self.forward),
            trace_finder: o.trace_finder.or(self.trace_finder),
            priority_sensitive: o
                .priority_sensitive
                .or(self.priority_sensitive),
            track_captures: o.track_captures.or(self.track_captures),
            backward_prefix_states: o
                .backward_prefix_states
                .or(self.backward_prefix_states),
            max_successors: o.max_successors.or(self.max_successors),
            node_splitting: o.node_splitting.or(self.node_splitting),
            node_split_state_limit: o
                .node_split_state_limit
                .or(self.node_split_state_limit),
        }
    }
}

/// A builder for constructing a DFA state graph from an [`NFA`].
///
/// Building runs subset construction, then optionally checks the fan-out
/// of every state, splits states to make the graph reducible and, in
/// trace-finder mode, resolves the pre-calculated results of final states.
///
/// # Example
///
/// ```
/// use regex_dfa_gen::{dfa, nfa};
///
/// let mut b = nfa::Builder::new();
/// let start = b.add_start(false)?;
/// let end = b.add_literal(start, "foo")?;
/// let m = b.add_match(false)?;
/// b.add_transition(end, m)?;
/// let nfa = b.build()?;
///
/// let dfa = dfa::Builder::new()
///     .configure(dfa::Config::new().forward(true))
///     .build(&nfa)?;
/// // The dead state, the start state, and one state per character.
/// assert_eq!(5, dfa.len());
/// assert_eq!(1, dfa.states().iter().filter(|s| s.is_final_state()).count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new DFA builder with the default configuration.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Apply the given configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Build a DFA state graph from the given NFA.
    pub fn build(&self, nfa: &NFA) -> Result<DFA, Error> {
        let c = &self.config;
        let mut dfa = DFA::empty(c.get_forward(), c.get_trace_finder());
        determinize::Config::new()
            .forward(c.get_forward())
            .trace_finder(c.get_trace_finder())
            .priority_sensitive(c.get_priority_sensitive())
            .track_captures(c.get_track_captures())
            .backward_prefix_states(c.get_backward_prefix_states())
            .run(nfa, &mut dfa)?;
        debug!("determinization produced {} DFA states", dfa.len());
        if let Some(limit) = c.get_max_successors() {
            dfa.check_successors(limit)?;
        }
        if c.get_node_splitting() {
            split::split(&mut dfa, c.get_node_split_state_limit())?;
            if c.get_track_captures() {
                dfa.recompute_preceding_transitions()?;
            }
            if let Some(limit) = c.get_max_successors() {
                dfa.check_successors(limit)?;
            }
        }
        if c.get_trace_finder() {
            determinize::resolve_pre_calculated_results(&mut dfa);
        }
        Ok(dfa)
    }
}
