// SPDX-License-Identifier: Apache-2.0
// Copyright 2024 Joe Pearson
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A canonical union of half-open integer intervals, used to represent
//! altitude availability (feet, or derived flight levels).

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::alt_range::ALT_MAX;

/// A single half-open interval `[lo, hi)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    pub lo: i32,
    pub hi: i32,
}

/// A canonical (sorted, non-adjacent, non-overlapping) union of half-open
/// intervals over `i32`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// The universal set `(-inf, +inf)`, represented here as
    /// `[i32::MIN, ALT_MAX]` inclusive of `ALT_MAX` (the half-open upper
    /// bound is one past the representable maximum).
    pub fn full() -> Self {
        Self {
            intervals: vec![Interval {
                lo: i32::MIN,
                hi: ALT_MAX,
            }],
        }
    }

    /// A set containing the single interval `[lo, hi)`.
    pub fn from_bounds(lo: i32, hi: i32) -> Self {
        if lo >= hi {
            Self::empty()
        } else {
            Self {
                intervals: vec![Interval { lo, hi }],
            }
        }
    }

    pub fn set_empty(&mut self) {
        self.intervals.clear();
    }

    pub fn set_full(&mut self) {
        *self = Self::full();
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn is_inside(&self, x: i32) -> bool {
        self.intervals
            .binary_search_by(|iv| {
                if x < iv.lo {
                    std::cmp::Ordering::Greater
                } else if x >= iv.hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn is_overlap(&self, a: i32, b: i32) -> bool {
        self.intervals.iter().any(|iv| iv.lo < b && a < iv.hi)
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Normalizes a raw, possibly-unsorted, possibly-overlapping list of
    /// intervals into canonical form.
    fn canonicalize(mut raw: Vec<Interval>) -> Self {
        raw.retain(|iv| iv.lo < iv.hi);
        raw.sort_by_key(|iv| iv.lo);
        let mut out: Vec<Interval> = Vec::with_capacity(raw.len());
        for iv in raw {
            if let Some(last) = out.last_mut() {
                if iv.lo <= last.hi {
                    last.hi = last.hi.max(iv.hi);
                    continue;
                }
            }
            out.push(iv);
        }
        Self { intervals: out }
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut raw = self.intervals.clone();
        raw.extend_from_slice(&other.intervals);
        Self::canonicalize(raw)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.intervals.len() && j < other.intervals.len() {
            let a = self.intervals[i];
            let b = other.intervals[j];
            let lo = a.lo.max(b.lo);
            let hi = a.hi.min(b.hi);
            if lo < hi {
                out.push(Interval { lo, hi });
            }
            if a.hi < b.hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self { intervals: out }
    }

    pub fn complement(&self) -> Self {
        let mut raw = Vec::new();
        let mut cursor = i32::MIN;
        for iv in &self.intervals {
            if cursor < iv.lo {
                raw.push(Interval {
                    lo: cursor,
                    hi: iv.lo,
                });
            }
            cursor = iv.hi;
        }
        if cursor < ALT_MAX {
            raw.push(Interval { lo: cursor, hi: ALT_MAX });
        }
        Self::canonicalize(raw)
    }

    pub fn difference(&self, other: &Self) -> Self {
        self.intersection(&other.complement())
    }

    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.difference(other).union(&other.difference(self))
    }
}

impl BitOr for &IntervalSet {
    type Output = IntervalSet;
    fn bitor(self, rhs: Self) -> IntervalSet {
        self.union(rhs)
    }
}

impl BitOrAssign<&IntervalSet> for IntervalSet {
    fn bitor_assign(&mut self, rhs: &IntervalSet) {
        *self = self.union(rhs);
    }
}

impl BitAnd for &IntervalSet {
    type Output = IntervalSet;
    fn bitand(self, rhs: Self) -> IntervalSet {
        self.intersection(rhs)
    }
}

impl BitAndAssign<&IntervalSet> for IntervalSet {
    fn bitand_assign(&mut self, rhs: &IntervalSet) {
        *self = self.intersection(rhs);
    }
}

impl BitXor for &IntervalSet {
    type Output = IntervalSet;
    fn bitxor(self, rhs: Self) -> IntervalSet {
        self.symmetric_difference(rhs)
    }
}

impl BitXorAssign<&IntervalSet> for IntervalSet {
    fn bitxor_assign(&mut self, rhs: &IntervalSet) {
        *self = self.symmetric_difference(rhs);
    }
}

impl Not for &IntervalSet {
    type Output = IntervalSet;
    fn not(self) -> IntervalSet {
        self.complement()
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .intervals
            .iter()
            .map(|iv| format!("[{}, {})", iv.lo, iv.hi))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(lo: i32, hi: i32) -> IntervalSet {
        IntervalSet::from_bounds(lo, hi)
    }

    #[test]
    fn union_is_associative() {
        let a = s(0, 10);
        let b = s(20, 30);
        let c = s(5, 25);
        assert_eq!((&(&a | &b)) | &c, &a | &(&b | &c));
    }

    #[test]
    fn complement_is_involution_style_identity() {
        let a = s(10, 20);
        assert_eq!(&a & &(!&a), IntervalSet::empty());
    }

    #[test]
    fn intersection_is_idempotent() {
        let a = s(10, 20);
        assert_eq!(&a & &a, a);
    }

    #[test]
    fn union_with_complement_is_full() {
        let a = s(10, 20);
        assert_eq!(&a | &(!&a), IntervalSet::full());
    }

    #[test]
    fn adjacent_intervals_merge_on_union() {
        let merged = s(0, 10).union(&s(10, 20));
        assert_eq!(merged.intervals().len(), 1);
        assert_eq!(merged.intervals()[0], Interval { lo: 0, hi: 20 });
    }

    #[test]
    fn is_inside_and_is_overlap() {
        let a = s(100, 200).union(&s(300, 400));
        assert!(a.is_inside(150));
        assert!(!a.is_inside(250));
        assert!(a.is_overlap(190, 310));
        assert!(!a.is_overlap(200, 300));
    }

    /// S5. Edge validity under CDR: union of an open band and a conditional
    /// band, then a CDR override narrowing it back down.
    #[test]
    fn s5_cdr_union_then_override() {
        let open = s(18000, 28001);
        let conditional = s(28000, 35001);
        let union = open.union(&conditional);
        assert_eq!(union, s(18000, 35001));

        // AUP override raises the conditional segment's CDR to "excluded":
        // subtract the conditional band back out.
        let after_override = union.difference(&s(28001, 35001));
        assert_eq!(after_override, s(18000, 28001));
    }
}
