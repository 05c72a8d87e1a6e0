/*!
A set of code points represented as a sorted sequence of disjoint,
non-adjacent ranges.

This is the matcher type used on every NFA state and every DFA transition.
The DFA generator only ever asks three things of a set: how many ranges it
has, and the lower and upper bound of the range at a given index. The set
algebra below exists so that subset construction can partition overlapping
matchers into disjoint ones.

Every constructor canonicalizes its input (sorts ranges and merges
overlapping or adjacent ones), so a `CharSet` is always well formed.
*/

use core::fmt;

use alloc::vec::Vec;

/// A single inclusive range of code points.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CharRange {
    start: u32,
    end: u32,
}

impl CharRange {
    /// Create a new range. If `start > end`, the bounds are swapped.
    ///
    /// Bounds greater than [`CharSet::MAX_VALUE`] are clamped to it.
    pub fn new(start: u32, end: u32) -> CharRange {
        let (start, end) =
            if start <= end { (start, end) } else { (end, start) };
        CharRange {
            start: start.min(CharSet::MAX_VALUE),
            end: end.min(CharSet::MAX_VALUE),
        }
    }

    /// The inclusive lower bound of this range.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// The inclusive upper bound of this range.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Returns true if and only if the given code point is in this range.
    pub fn contains(&self, cp: u32) -> bool {
        self.start <= cp && cp <= self.end
    }
}

impl fmt::Debug for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{:X}", self.start)
        } else {
            write!(f, "{:X}-{:X}", self.start, self.end)
        }
    }
}

/// A set of code points.
#[derive(Clone, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CharSet {
    ranges: Vec<CharRange>,
}

impl CharSet {
    /// The smallest code point.
    pub const MIN_VALUE: u32 = 0;

    /// The largest code point.
    pub const MAX_VALUE: u32 = 0x10FFFF;

    /// Create a new set from the given ranges. The ranges may overlap and
    /// may be given in any order.
    pub fn new<I>(ranges: I) -> CharSet
    where
        I: IntoIterator<Item = CharRange>,
    {
        let mut set = CharSet { ranges: ranges.into_iter().collect() };
        set.canonicalize();
        set
    }

    /// Create an empty set.
    pub fn empty() -> CharSet {
        CharSet { ranges: Vec::new() }
    }

    /// Create a set containing every code point.
    pub fn full() -> CharSet {
        CharSet::range(CharSet::MIN_VALUE, CharSet::MAX_VALUE)
    }

    /// Create a set containing the single range `start..=end`.
    pub fn range(start: u32, end: u32) -> CharSet {
        CharSet { ranges: alloc::vec![CharRange::new(start, end)] }
    }

    /// Create a set containing a single code point.
    pub fn single(cp: u32) -> CharSet {
        CharSet::range(cp, cp)
    }

    /// Create a set containing the given characters.
    pub fn chars(chars: &str) -> CharSet {
        CharSet::new(chars.chars().map(|c| CharRange::new(c as u32, c as u32)))
    }

    /// Returns the number of ranges in this set.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true if and only if this set contains no code points.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns true if and only if this set contains every code point.
    pub fn is_full(&self) -> bool {
        self.ranges.len() == 1
            && self.ranges[0].start == CharSet::MIN_VALUE
            && self.ranges[0].end == CharSet::MAX_VALUE
    }

    /// Returns the lower bound of the range at index `i`.
    ///
    /// This panics if `i >= self.len()`.
    pub fn lo(&self, i: usize) -> u32 {
        self.ranges[i].start
    }

    /// Returns the upper bound of the range at index `i`.
    ///
    /// This panics if `i >= self.len()`.
    pub fn hi(&self, i: usize) -> u32 {
        self.ranges[i].end
    }

    /// Returns the ranges in this set, in ascending order.
    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    /// Returns true if and only if the given code point is in this set.
    pub fn contains(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|r| {
                if r.end < cp {
                    core::cmp::Ordering::Less
                } else if r.start > cp {
                    core::cmp::Ordering::Greater
                } else {
                    core::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Returns the union of this set and `other`.
    pub fn union(&self, other: &CharSet) -> CharSet {
        if other.is_empty() {
            return self.clone();
        }
        CharSet::new(self.ranges.iter().chain(other.ranges.iter()).copied())
    }

    /// Returns the intersection of this set and `other`.
    pub fn intersect(&self, other: &CharSet) -> CharSet {
        let mut ranges = Vec::new();
        let (mut a, mut b) = (0, 0);
        while a < self.ranges.len() && b < other.ranges.len() {
            let (ra, rb) = (self.ranges[a], other.ranges[b]);
            let lo = ra.start.max(rb.start);
            let hi = ra.end.min(rb.end);
            if lo <= hi {
                ranges.push(CharRange { start: lo, end: hi });
            }
            if ra.end < rb.end {
                a += 1;
            } else {
                b += 1;
            }
        }
        CharSet { ranges }
    }

    /// Returns every code point in this set that is not in `other`.
    pub fn difference(&self, other: &CharSet) -> CharSet {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        let mut ranges = Vec::new();
        let mut b = 0;
        for &r in self.ranges.iter() {
            let mut start = r.start;
            let mut done = false;
            while b < other.ranges.len() && other.ranges[b].end < start {
                b += 1;
            }
            let mut i = b;
            while i < other.ranges.len() && other.ranges[i].start <= r.end {
                let o = other.ranges[i];
                if o.start > start {
                    ranges.push(CharRange { start, end: o.start - 1 });
                }
                if o.end >= r.end {
                    done = true;
                    break;
                }
                start = o.end + 1;
                i += 1;
            }
            if !done {
                ranges.push(CharRange { start, end: r.end });
            }
        }
        CharSet { ranges }
    }

    /// Returns every code point that is not in this set.
    pub fn complement(&self) -> CharSet {
        CharSet::full().difference(self)
    }

    /// Sort the ranges and merge overlapping or adjacent ones.
    fn canonicalize(&mut self) {
        if self.ranges.is_empty() {
            return;
        }
        self.ranges.sort();
        let mut merged: Vec<CharRange> = Vec::with_capacity(self.ranges.len());
        for &r in self.ranges.iter() {
            if let Some(last) = merged.last_mut() {
                if r.start <= last.end.saturating_add(1) {
                    last.end = last.end.max(r.end);
                    continue;
                }
            }
            merged.push(r);
        }
        self.ranges = merged;
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full() {
            return write!(f, "[ANY]");
        }
        write!(f, "[")?;
        for (i, r) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:?}", r)?;
        }
        write!(f, "]")
    }
}

#[cfg(feature = "syntax")]
impl From<&regex_syntax::hir::ClassUnicode> for CharSet {
    fn from(cls: &regex_syntax::hir::ClassUnicode) -> CharSet {
        CharSet::new(
            cls.iter()
                .map(|r| CharRange::new(r.start() as u32, r.end() as u32)),
        )
    }
}

#[cfg(feature = "syntax")]
impl From<&regex_syntax::hir::ClassBytes> for CharSet {
    fn from(cls: &regex_syntax::hir::ClassBytes) -> CharSet {
        CharSet::new(
            cls.iter()
                .map(|r| CharRange::new(r.start() as u32, r.end() as u32)),
        )
    }
}
