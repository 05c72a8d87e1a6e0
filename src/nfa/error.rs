use crate::util::id::{StateID, TransitionID};

/// An error that can occur while assembling an NFA with
/// [`Builder`](crate::nfa::Builder).
///
/// This error does not provide many introspection capabilities. Its primary
/// purpose is to produce a human readable message via its `std::fmt::Display`
/// impl.
///
/// When the `std` feature is enabled, this implements the `std::error::Error`
/// trait.
#[derive(Clone, Debug)]
pub struct BuildError {
    kind: BuildErrorKind,
}

/// The kind of error that occurred while building an NFA.
#[derive(Clone, Debug)]
enum BuildErrorKind {
    /// An error that occurs if too many states are added to an NFA.
    TooManyStates {
        /// The number of states desired, which exceeds the limit.
        given: usize,
        /// The limit on the number of states.
        limit: usize,
    },
    /// An error that occurs if too many transitions are added to an NFA.
    TooManyTransitions {
        /// The number of transitions desired, which exceeds the limit.
        given: usize,
        /// The limit on the number of transitions.
        limit: usize,
    },
    /// A transition referred to a state that was never added.
    UnknownState { id: StateID },
    /// A transition would leave a match marker or enter a start marker.
    /// Markers are the ends of the graph in their respective direction.
    InvalidTransition { from: StateID, to: StateID },
    /// The NFA has no start marker, so there is nowhere to begin a forward
    /// search.
    MissingStart,
    /// The NFA has no match marker, so there is nowhere to begin a backward
    /// search.
    MissingMatch,
}

impl BuildError {
    fn kind(&self) -> &BuildErrorKind {
        &self.kind
    }

    pub(crate) fn too_many_states(given: usize) -> BuildError {
        let limit = StateID::LIMIT;
        BuildError { kind: BuildErrorKind::TooManyStates { given, limit } }
    }

    pub(crate) fn too_many_transitions(given: usize) -> BuildError {
        let limit = TransitionID::LIMIT;
        BuildError {
            kind: BuildErrorKind::TooManyTransitions { given, limit },
        }
    }

    pub(crate) fn unknown_state(id: StateID) -> BuildError {
        BuildError { kind: BuildErrorKind::UnknownState { id } }
    }

    pub(crate) fn invalid_transition(
        from: StateID,
        to: StateID,
    ) -> BuildError {
        BuildError { kind: BuildErrorKind::InvalidTransition { from, to } }
    }

    pub(crate) fn missing_start() -> BuildError {
        BuildError { kind: BuildErrorKind::MissingStart }
    }

    pub(crate) fn missing_match() -> BuildError {
        BuildError { kind: BuildErrorKind::MissingMatch }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self.kind() {
            BuildErrorKind::TooManyStates { given, limit } => write!(
                f,
                "attempted to add {} NFA states, which exceeds the \
                 limit of {}",
                given, limit,
            ),
            BuildErrorKind::TooManyTransitions { given, limit } => write!(
                f,
                "attempted to add {} NFA transitions, which exceeds the \
                 limit of {}",
                given, limit,
            ),
            BuildErrorKind::UnknownState { id } => {
                write!(f, "NFA state {} does not exist", id)
            }
            BuildErrorKind::InvalidTransition { from, to } => write!(
                f,
                "invalid NFA transition from {} to {}: match markers have \
                 no successors and start markers have no predecessors",
                from, to,
            ),
            BuildErrorKind::MissingStart => {
                write!(f, "NFA has no start marker")
            }
            BuildErrorKind::MissingMatch => {
                write!(f, "NFA has no match marker")
            }
        }
    }
}
