use crate::util::id::StateID;

/// An error that occurred during the construction of a DFA.
///
/// This error does not provide many introspection capabilities. Its primary
/// purpose is to produce a human readable message via its `std::fmt::Display`
/// impl.
///
/// When the `std` feature is enabled, this implements the `std::error::Error`
/// trait.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of error that occurred during the construction of a DFA.
///
/// Note that this error is non-exhaustive. Adding new variants is not
/// considered a breaking change.
#[derive(Clone, Debug)]
enum ErrorKind {
    /// An error that occurs if too many states are produced while building a
    /// DFA.
    TooManyStates,
    /// A state has more successors than the configured maximum.
    TooManySuccessors { state: StateID, successors: usize, limit: usize },
    /// Node splitting would have grown the DFA past its state limit.
    SplitStateLimitExceeded { limit: usize },
    /// The reverse edges of a state were read after a split invalidated them
    /// and before they were recomputed.
    TaintedPrecedingTransitions { state: StateID },
}

impl Error {
    /// Return the kind of this error.
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn too_many_states() -> Error {
        Error { kind: ErrorKind::TooManyStates }
    }

    pub(crate) fn too_many_successors(
        state: StateID,
        successors: usize,
        limit: usize,
    ) -> Error {
        Error {
            kind: ErrorKind::TooManySuccessors { state, successors, limit },
        }
    }

    pub(crate) fn split_state_limit_exceeded(limit: usize) -> Error {
        Error { kind: ErrorKind::SplitStateLimitExceeded { limit } }
    }

    pub(crate) fn tainted_preceding_transitions(state: StateID) -> Error {
        Error { kind: ErrorKind::TaintedPrecedingTransitions { state } }
    }

    /// Returns true if this error was caused by a state exceeding the
    /// configured maximum number of successors.
    pub fn is_too_many_successors(&self) -> bool {
        matches!(*self.kind(), ErrorKind::TooManySuccessors { .. })
    }

    /// Returns true if this error was caused by node splitting exceeding its
    /// state limit.
    pub fn is_split_state_limit_exceeded(&self) -> bool {
        matches!(*self.kind(), ErrorKind::SplitStateLimitExceeded { .. })
    }

    /// Returns true if this error was caused by reading the reverse edges of
    /// a state after node splitting made them stale.
    pub fn is_tainted_preceding_transitions(&self) -> bool {
        matches!(*self.kind(), ErrorKind::TaintedPrecedingTransitions { .. })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self.kind() {
            ErrorKind::TooManyStates => write!(
                f,
                "number of DFA states exceeds limit of {}",
                StateID::LIMIT,
            ),
            ErrorKind::TooManySuccessors { state, successors, limit } => {
                write!(
                    f,
                    "DFA state {} has {} successors, which exceeds the \
                     limit of {}",
                    state, successors, limit,
                )
            }
            ErrorKind::SplitStateLimitExceeded { limit } => write!(
                f,
                "node splitting exceeded the DFA state limit of {}",
                limit,
            ),
            ErrorKind::TaintedPrecedingTransitions { state } => write!(
                f,
                "preceding transitions of DFA state {} were read after a \
                 split invalidated them",
                state,
            ),
        }
    }
}
