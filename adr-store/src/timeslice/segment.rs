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

//! Segment-like time slice variants: route segments, SID/STAR legs, and the
//! availability records that govern their altitude/time/CDR state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rstar::AABB;

use crate::altitude::AltRange;
use crate::geom::Coordinate;
use crate::link::Link;
use crate::timewindow::TimeWindow;

/// Which way along `start -> end` a segment (or an individual availability)
/// may be traversed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Direction(u8);

impl Direction {
    pub const FORWARD: Direction = Direction(0b01);
    pub const BACKWARD: Direction = Direction(0b10);
    pub const BOTH: Direction = Direction(0b11);

    pub fn is_forward(self) -> bool {
        self.0 & Self::FORWARD.0 != 0
    }

    pub fn is_backward(self) -> bool {
        self.0 & Self::BACKWARD.0 != 0
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Shared fields of every directed/bidirectional edge-producing slice
/// (`spec.md` §3.3's `SegmentTimeSlice`).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentTimeSlice {
    pub bbox: (Coordinate, Coordinate),
    pub route: Link,
    pub start: Link,
    pub end: Link,
    pub altrange: AltRange,
    pub direction: Direction,
    /// Terrain elevation under the segment, feet (`ELEV_UNKNOWN` if none).
    pub terrain_elev: i32,
    /// Elevation within the 5 NM corridor either side of the segment, feet.
    pub corridor5_elev: i32,
}

impl Default for SegmentTimeSlice {
    fn default() -> Self {
        Self {
            bbox: (Coordinate::invalid(), Coordinate::invalid()),
            route: Link::nil(),
            start: Link::nil(),
            end: Link::nil(),
            altrange: AltRange::invalid(),
            direction: Direction::BOTH,
            terrain_elev: super::point::ELEV_UNKNOWN,
            corridor5_elev: super::point::ELEV_UNKNOWN,
        }
    }
}

impl SegmentTimeSlice {
    pub fn is_forward(&self) -> bool {
        self.direction.is_forward()
    }

    pub fn is_backward(&self) -> bool {
        self.direction.is_backward()
    }

    /// The segment's envelope as an R-tree-ready AABB, for `Database`
    /// bbox queries (`spec.md` §4.2 `find_by_bbox`).
    pub fn envelope(&self) -> AABB<geo::Point<f64>> {
        AABB::from_corners(self.bbox.0.into(), self.bbox.1.into())
    }
}

/// A departure-procedure leg: a `SegmentTimeSlice` plus the SID it belongs
/// to.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DepartureLegTimeSlice {
    pub segment: SegmentTimeSlice,
    pub sid: Link,
}

/// An arrival-procedure leg: a `SegmentTimeSlice` plus the STAR it belongs
/// to.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrivalLegTimeSlice {
    pub segment: SegmentTimeSlice,
    pub star: Link,
}

/// Availability status (`spec.md` §3.5).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AvailabilityStatus {
    Closed,
    Open,
    Conditional,
    Invalid,
}

/// One `(levels_link, timetable, altrange, flags)` availability record
/// attached to a `RouteSegmentTimeSlice`.
///
/// `timetable` here is the window during which the record applies; the
/// original's richer day-of-week/special-date table (`StandardLevelTable`,
/// `SpecialDate`) collapses to a single `TimeWindow` since this crate does
/// not implement a calendar engine.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Availability {
    pub levels: Link,
    pub timetable: TimeWindow,
    pub altrange: AltRange,
    pub status: AvailabilityStatus,
    /// Conditional-route category, 0..3. Only meaningful when
    /// `status == Conditional`; `cdr >= 3` means excluded.
    pub cdr: u8,
    pub direction: Direction,
}

impl Availability {
    /// `true` iff this record is open unconditionally at `t` for an edge
    /// travelled in `edge_direction`.
    pub fn is_open_at(&self, t: u64, edge_direction: Direction) -> bool {
        self.status == AvailabilityStatus::Open
            && self.timetable.contains(t)
            && directions_match(self.direction, edge_direction)
    }

    /// `true` iff this record is a live conditional route at `t` (before any
    /// AUP override is considered) for an edge travelled in
    /// `edge_direction`.
    pub fn is_conditional_at(&self, t: u64, edge_direction: Direction) -> bool {
        self.status == AvailabilityStatus::Conditional
            && self.cdr < 3
            && self.timetable.contains(t)
            && directions_match(self.direction, edge_direction)
    }
}

fn directions_match(availability: Direction, edge: Direction) -> bool {
    (availability.is_forward() && edge.is_forward())
        || (availability.is_backward() && edge.is_backward())
}

/// A route segment: a `SegmentTimeSlice` plus its `Availability` list and
/// the flight levels (hundreds of feet) the containing graph build should
/// evaluate metrics at.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSegmentTimeSlice {
    pub segment: SegmentTimeSlice,
    pub availabilities: Vec<Availability>,
    pub levels: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_both_matches_either_way() {
        assert!(Direction::BOTH.is_forward());
        assert!(Direction::BOTH.is_backward());
        assert!(!Direction::FORWARD.is_backward());
    }

    #[test]
    fn availability_open_requires_timetable_and_direction() {
        let a = Availability {
            levels: Link::nil(),
            timetable: TimeWindow::new(1000, 2000),
            altrange: AltRange::full(),
            status: AvailabilityStatus::Open,
            cdr: 0,
            direction: Direction::FORWARD,
        };
        assert!(a.is_open_at(1500, Direction::FORWARD));
        assert!(!a.is_open_at(2500, Direction::FORWARD));
        assert!(!a.is_open_at(1500, Direction::BACKWARD));
    }

    /// S5 setup: conditional availability excluded once CDR reaches 3.
    #[test]
    fn conditional_excluded_at_cdr_three() {
        let mut a = Availability {
            levels: Link::nil(),
            timetable: TimeWindow::UNBOUNDED,
            altrange: AltRange::full(),
            status: AvailabilityStatus::Conditional,
            cdr: 2,
            direction: Direction::BOTH,
        };
        assert!(a.is_conditional_at(0, Direction::FORWARD));
        a.cdr = 3;
        assert!(!a.is_conditional_at(0, Direction::FORWARD));
    }
}
