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

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::IntervalSet;

/// How an altitude bound is referenced.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum AltMode {
    /// Local-pressure-referenced altitude.
    Qnh,
    /// Standard-datum (1013.25 hPa) flight level.
    Std,
    /// Height above a surface.
    Height,
    /// A floor with no hard lower bound of its own (bounded only by what it
    /// intersects with).
    Floor,
    /// A ceiling with no hard upper bound of its own.
    Ceiling,
    /// The bound carries no usable value.
    Invalid,
}

/// Sentinel altitude meaning "as high as representable".
pub const ALT_MAX: i32 = i32::MAX;
/// Sentinel altitude meaning "ignore this bound entirely".
pub const ALT_IGNORE: i32 = i32::MIN + 1;
/// Sentinel altitude meaning "no value".
pub const ALT_INVALID: i32 = i32::MIN;

/// A half-open altitude band `[lower, upper)` in feet, each bound carrying
/// its own reference datum.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AltRange {
    pub lower_alt: i32,
    pub lower_mode: AltMode,
    pub upper_alt: i32,
    pub upper_mode: AltMode,
}

impl AltRange {
    /// The range `[0, ALT_MAX)` with hard modes on both ends.
    pub fn full() -> Self {
        Self {
            lower_alt: 0,
            lower_mode: AltMode::Std,
            upper_alt: ALT_MAX,
            upper_mode: AltMode::Std,
        }
    }

    /// An empty / invalid range.
    pub fn invalid() -> Self {
        Self {
            lower_alt: ALT_INVALID,
            lower_mode: AltMode::Invalid,
            upper_alt: ALT_INVALID,
            upper_mode: AltMode::Invalid,
        }
    }

    pub fn is_lower_valid(&self) -> bool {
        self.lower_mode != AltMode::Invalid && self.lower_alt != ALT_INVALID
    }

    pub fn is_upper_valid(&self) -> bool {
        self.upper_mode != AltMode::Invalid && self.upper_alt != ALT_INVALID
    }

    pub fn is_valid(&self) -> bool {
        self.is_lower_valid() && self.is_upper_valid()
    }

    /// `true` if the range contains no altitudes.
    pub fn is_empty(&self) -> bool {
        !self.is_valid() || self.lower_alt >= self.upper_alt
    }

    /// `true` if `alt` lies within `[lower, upper)`.
    pub fn is_inside(&self, alt: i32) -> bool {
        if self.is_empty() {
            return false;
        }
        alt >= self.lower_alt && alt < self.upper_alt
    }

    /// `true` if `[a0, a1)` overlaps this range.
    pub fn is_overlap(&self, a0: i32, a1: i32) -> bool {
        if self.is_empty() {
            return false;
        }
        self.lower_alt < a1 && a0 < self.upper_alt
    }

    /// Converts to the equivalent canonical [`IntervalSet`].
    pub fn as_interval_set(&self) -> IntervalSet {
        if self.is_empty() {
            IntervalSet::empty()
        } else {
            IntervalSet::from_bounds(self.lower_alt, self.upper_alt)
        }
    }

    /// The union of two altitude ranges' lower/upper bounds, promoting modes
    /// per the FLOOR/CEILING lattice rules: a FLOOR/CEILING bound only
    /// constrains a half of the band, so merging keeps the hard mode of
    /// whichever side supplies one.
    pub fn merge(&self, other: &Self) -> Self {
        let (lower_alt, lower_mode) =
            merge_bound(self.lower_alt, self.lower_mode, other.lower_alt, other.lower_mode, true);
        let (upper_alt, upper_mode) = merge_bound(
            self.upper_alt,
            self.upper_mode,
            other.upper_alt,
            other.upper_mode,
            false,
        );
        Self {
            lower_alt,
            lower_mode,
            upper_alt,
            upper_mode,
        }
    }

    /// Intersects two altitude ranges. Intersecting a FLOOR lower bound with
    /// a hard-moded lower bound yields the hard mode at the *max* of the two
    /// lower bounds; symmetrically a CEILING upper bound intersected with a
    /// hard upper bound yields the hard mode at the *min* of the two upper
    /// bounds (S1).
    pub fn intersect(&self, other: &Self) -> Self {
        let (lower_alt, lower_mode) = intersect_bound(
            self.lower_alt,
            self.lower_mode,
            other.lower_alt,
            other.lower_mode,
            AltMode::Floor,
            i32::max,
        );
        let (upper_alt, upper_mode) = intersect_bound(
            self.upper_alt,
            self.upper_mode,
            other.upper_alt,
            other.upper_mode,
            AltMode::Ceiling,
            i32::min,
        );
        Self {
            lower_alt,
            lower_mode,
            upper_alt,
            upper_mode,
        }
    }
}

/// Picks which of two bounds wins on merge: the hard (non-FLOOR/CEILING)
/// mode if only one side has one, else the wider extent.
fn merge_bound(
    a_alt: i32,
    a_mode: AltMode,
    b_alt: i32,
    b_mode: AltMode,
    is_lower: bool,
) -> (i32, AltMode) {
    let a_soft = matches!(a_mode, AltMode::Floor | AltMode::Ceiling);
    let b_soft = matches!(b_mode, AltMode::Floor | AltMode::Ceiling);
    match (a_soft, b_soft) {
        (true, false) => (b_alt, b_mode),
        (false, true) => (a_alt, a_mode),
        _ => {
            if is_lower {
                if a_alt <= b_alt {
                    (a_alt, a_mode)
                } else {
                    (b_alt, b_mode)
                }
            } else if a_alt >= b_alt {
                (a_alt, a_mode)
            } else {
                (b_alt, b_mode)
            }
        }
    }
}

/// Picks the bound resulting from intersecting with a FLOOR/CEILING soft
/// bound: the soft mode is replaced by the opposing hard mode at `pick(a,b)`.
fn intersect_bound(
    a_alt: i32,
    a_mode: AltMode,
    b_alt: i32,
    b_mode: AltMode,
    soft: AltMode,
    pick: fn(i32, i32) -> i32,
) -> (i32, AltMode) {
    match (a_mode == soft, b_mode == soft) {
        (true, true) => (pick(a_alt, b_alt), soft),
        (true, false) => (pick(a_alt, b_alt), b_mode),
        (false, true) => (pick(a_alt, b_alt), a_mode),
        (false, false) => (pick(a_alt, b_alt), a_mode),
    }
}

impl fmt::Display for AltRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?} {} .. {:?} {})",
            self.lower_mode, self.lower_alt, self.upper_mode, self.upper_alt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S1. Empty-altitude intersect: FLOOR/CEILING only bound modeless halves.
    #[test]
    fn s1_floor_ceiling_intersect_leaves_hard_range_unchanged() {
        let hard = AltRange {
            lower_alt: 3000,
            lower_mode: AltMode::Qnh,
            upper_alt: 25000,
            upper_mode: AltMode::Std,
        };
        let soft = AltRange {
            lower_alt: 0,
            lower_mode: AltMode::Floor,
            upper_alt: 50000,
            upper_mode: AltMode::Ceiling,
        };
        assert_eq!(hard.intersect(&soft), hard);
    }

    /// S6 / AltRange intersect idempotence.
    #[test]
    fn intersect_is_idempotent() {
        let r = AltRange {
            lower_alt: 1000,
            lower_mode: AltMode::Qnh,
            upper_alt: 20000,
            upper_mode: AltMode::Std,
        };
        assert_eq!(r.intersect(&r), r);
    }

    #[test]
    fn is_inside_respects_half_open_bound() {
        let r = AltRange {
            lower_alt: 1000,
            lower_mode: AltMode::Qnh,
            upper_alt: 2000,
            upper_mode: AltMode::Std,
        };
        assert!(r.is_inside(1000));
        assert!(!r.is_inside(2000));
    }

    #[test]
    fn invalid_range_is_empty_and_not_inside_anything() {
        let r = AltRange::invalid();
        assert!(r.is_empty());
        assert!(!r.is_inside(0));
    }
}
