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

//! Time representation: Unix seconds with an "unlimited" sentinel.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch.
pub type Instant = u64;

/// Sentinel meaning "unlimited" / "no end".
pub const UNLIMITED: Instant = u64::MAX;

/// A half-open time window `[start, end)`.
///
/// `end == UNLIMITED` means the window never ends.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeWindow {
    pub start: Instant,
    pub end: Instant,
}

impl TimeWindow {
    pub const UNBOUNDED: TimeWindow = TimeWindow {
        start: 0,
        end: UNLIMITED,
    };

    pub fn new(start: Instant, end: Instant) -> Self {
        Self { start, end }
    }

    /// `true` if the window is empty (`end <= start`).
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// `true` if `t` lies in `[start, end)`.
    pub fn contains(&self, t: Instant) -> bool {
        t >= self.start && t < self.end
    }

    /// `true` if this window overlaps `[t0, t1)`.
    pub fn overlaps(&self, t0: Instant, t1: Instant) -> bool {
        self.start < t1 && t0 < self.end
    }

    /// The size of the overlap between this window and `[t0, t1)`, in
    /// seconds, or `0` if they don't overlap.
    pub fn overlap_len(&self, t0: Instant, t1: Instant) -> u64 {
        let lo = self.start.max(t0);
        let hi = self.end.min(t1);
        hi.saturating_sub(lo)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end == UNLIMITED {
            write!(f, "[{}, unlimited)", self.start)
        } else {
            write!(f, "[{}, {})", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let w = TimeWindow::new(1000, 2000);
        assert!(w.contains(1000));
        assert!(!w.contains(2000));
        assert!(w.contains(1999));
    }

    #[test]
    fn unlimited_window_contains_everything_after_start() {
        let w = TimeWindow::new(1000, UNLIMITED);
        assert!(w.contains(u64::MAX - 1));
    }

    #[test]
    fn overlap_len_matches_intersection() {
        let w = TimeWindow::new(0, 100);
        assert_eq!(w.overlap_len(50, 150), 50);
        assert_eq!(w.overlap_len(150, 200), 0);
    }
}
