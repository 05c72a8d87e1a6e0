/*!
Type definitions for identifier types.

A [`StateID`] identifies a state in either an NFA or a DFA under construction.
A [`TransitionID`] identifies a transition between two NFA states. A
[`PatternID`] identifies one of the original alternatives that were merged
into a single automaton. In a trace-finder automaton, the pattern ID is the
"result" reported for a match.

All identifier types are represented by a `u32` and clamp the range of
permissible values to at most `i32::MAX - 1`, so that every identifier (and
the number of identifiers plus one) fits into a `usize` on all supported
targets.
*/

use core::{convert::TryFrom, mem, ops};

use alloc::vec::Vec;

/// An identifier for one of the patterns merged into an automaton.
///
/// Patterns are numbered in the order in which they were supplied, starting
/// at `0`. When several patterns can match at the same position, the lowest
/// pattern ID wins.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub struct PatternID(u32);

/// An identifier for a state in an NFA or in a DFA under construction.
///
/// # Indexing
///
/// For convenience, callers may use a `StateID` to index slices and vectors.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateID(u32);

/// An identifier for a transition between two NFA states.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransitionID(u32);

/// An error that occurs when an identifier could not be constructed.
///
/// This occurs when given an integer exceeding the maximum identifier value.
///
/// When the `std` feature is enabled, this implements the `Error` trait.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IDError {
    attempted: u64,
}

impl IDError {
    /// Returns the value that failed to constructed an identifier.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IDError {}

impl core::fmt::Display for IDError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "failed to create identifier from {:?}, which exceeds {:?}",
            self.attempted(),
            StateID::MAX.as_usize(),
        )
    }
}

/// A macro for defining exactly identical (modulo names) impls for ID types.
macro_rules! impls {
    ($ty:ident, $tyiter:ident) => {
        impl $ty {
            /// The maximum identifier value.
            pub const MAX: $ty =
                $ty::new_unchecked(core::i32::MAX as usize - 1);

            /// The total number of identifiers that may be allocated.
            pub const LIMIT: usize = $ty::MAX.as_usize() + 1;

            /// The zero identifier value.
            pub const ZERO: $ty = $ty::new_unchecked(0);

            /// Create a new identifier.
            ///
            /// If the given value exceeds `MAX`, then this returns an error.
            #[inline]
            pub fn new(id: usize) -> Result<$ty, IDError> {
                $ty::try_from(id)
            }

            /// Create a new identifier without checking whether the given
            /// value exceeds `MAX`.
            #[inline]
            pub const fn new_unchecked(id: usize) -> $ty {
                $ty(id as u32)
            }

            /// Like `new`, but panics if the given value is not valid.
            #[inline]
            pub fn must(id: usize) -> $ty {
                $ty::new(id).unwrap()
            }

            /// Return this identifier as a `usize`.
            #[inline]
            pub const fn as_usize(&self) -> usize {
                self.0 as usize
            }

            /// Return the internal u32 of this identifier.
            #[inline]
            pub const fn as_u32(&self) -> u32 {
                self.0
            }

            /// Returns an iterator over all identifiers from 0 up to and not
            /// including the given length.
            ///
            /// If the given length exceeds `LIMIT`, then this panics.
            pub fn iter(len: usize) -> $tyiter {
                $tyiter::new(len)
            }
        }

        /// An iterator over a contiguous range of identifiers.
        #[derive(Clone, Debug)]
        pub struct $tyiter {
            rng: ops::Range<usize>,
        }

        impl $tyiter {
            fn new(len: usize) -> $tyiter {
                assert!(
                    len <= $ty::LIMIT,
                    "cannot create iterator with IDs when number of \
                     elements exceed {:?}",
                    $ty::LIMIT,
                );
                $tyiter { rng: 0..len }
            }
        }

        impl Iterator for $tyiter {
            type Item = $ty;

            fn next(&mut self) -> Option<$ty> {
                if self.rng.start >= self.rng.end {
                    return None;
                }
                let next_id = self.rng.start + 1;
                let id = mem::replace(&mut self.rng.start, next_id);
                // new_unchecked is OK since we asserted that the number of
                // elements in this iterator will fit in an ID at construction.
                Some($ty::new_unchecked(id))
            }
        }

        impl<T> core::ops::Index<$ty> for [T] {
            type Output = T;

            #[inline]
            fn index(&self, index: $ty) -> &T {
                &self[index.as_usize()]
            }
        }

        impl<T> core::ops::IndexMut<$ty> for [T] {
            #[inline]
            fn index_mut(&mut self, index: $ty) -> &mut T {
                &mut self[index.as_usize()]
            }
        }

        impl<T> core::ops::Index<$ty> for Vec<T> {
            type Output = T;

            #[inline]
            fn index(&self, index: $ty) -> &T {
                &self[index.as_usize()]
            }
        }

        impl<T> core::ops::IndexMut<$ty> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, index: $ty) -> &mut T {
                &mut self[index.as_usize()]
            }
        }

        impl TryFrom<usize> for $ty {
            type Error = IDError;

            fn try_from(id: usize) -> Result<$ty, IDError> {
                if id > $ty::MAX.as_usize() {
                    return Err(IDError { attempted: id as u64 });
                }
                Ok($ty::new_unchecked(id))
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}", self.as_usize())
            }
        }
    };
}

impls!(PatternID, PatternIDIter);
impls!(StateID, StateIDIter);
impls!(TransitionID, TransitionIDIter);

/// A utility trait that defines a couple of adapters for making it convenient
/// to access indices as ID types. We require ExactSizeIterator so that
/// iterator construction can do a single check to make sure the index of each
/// element is representable by its ID type.
pub(crate) trait IteratorIDExt: Iterator {
    fn with_state_ids(self) -> WithStateIDIter<Self>
    where
        Self: Sized + ExactSizeIterator,
    {
        WithStateIDIter::new(self)
    }
}

impl<I: Iterator> IteratorIDExt for I {}

/// An iterator adapter that is like std::iter::Enumerate, but attaches
/// state IDs. It requires ExactSizeIterator. At construction, it ensures
/// that the index of each element in the iterator is representable as a
/// `StateID`.
#[derive(Clone, Debug)]
pub(crate) struct WithStateIDIter<I> {
    it: I,
    ids: StateIDIter,
}

impl<I: Iterator + ExactSizeIterator> WithStateIDIter<I> {
    fn new(it: I) -> WithStateIDIter<I> {
        let ids = StateID::iter(it.len());
        WithStateIDIter { it, ids }
    }
}

impl<I: Iterator + ExactSizeIterator> Iterator for WithStateIDIter<I> {
    type Item = (StateID, I::Item);

    fn next(&mut self) -> Option<(StateID, I::Item)> {
        let item = self.it.next()?;
        // Number of elements in this iterator must match, according
        // to contract of ExactSizeIterator.
        let id = self.ids.next().unwrap();
        Some((id, item))
    }
}
