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

//! Level-indexed edge metric evaluation (`spec.md` §4.6).
//!
//! `get_altrange` folds a route segment's availability list, the query
//! instant, and any active AUP/CDR override into the `IntervalSet` an edge
//! is valid over; `set_metric_seg`/`set_metric_dct` sample that set (or, for
//! DCT edges, a terrain-derived minimum altitude) at each of a
//! [`LevelGrid`]'s flight levels to produce the per-level `f32` metric array
//! `spec.md` §3.8 calls for.

use adr_store::timeslice::{AvailabilityStatus, Direction, RouteSegmentTimeSlice};
use adr_store::{ConditionalAvailability, IntervalSet, Instant, Uuid};

use crate::level::LevelGrid;

/// The sentinel an invalid (not-traversable-at-this-level) metric entry
/// carries. NaN lets the hot path test validity with a single bit check
/// (`spec.md` §9, "Per-level metric storage").
pub fn invalid_metric() -> f32 {
    f32::NAN
}

pub fn is_valid_metric(m: f32) -> bool {
    !m.is_nan()
}

/// `true` iff an availability's direction overlaps the direction the edge
/// is travelled in.
fn directions_match(availability: Direction, edge: Direction) -> bool {
    (availability.is_forward() && edge.is_forward())
        || (availability.is_backward() && edge.is_backward())
}

/// The altitude interval set a route segment is available over at `t` for
/// an edge travelled in `edge_direction`, plus the instant (`tuntil`) beyond
/// which this result may no longer hold — bounded by the slice's own end
/// and, when a CDR override contributed, by the override's effective end
/// (`spec.md` §4.6).
///
/// If the segment declares no conditional availabilities at all, its raw
/// `AltRange` is used directly and `tuntil` is just `segment_window_end`.
/// Otherwise the result is the union, over every open/conditional
/// availability matching direction, timetable, and (for conditional ones) a
/// CDR below 3, of that availability's altitude range — an AUP override, if
/// active, replaces both the CDR category and the altrange used for the
/// window it covers. This follows the "enabled" code path `DESIGN.md`
/// records as authoritative: a CDR at or above 3 excludes the availability
/// outright, anything below contributes its whole band; there is no
/// separate subtractive case.
pub fn get_altrange(
    rs: &RouteSegmentTimeSlice,
    segment_uuid: Uuid,
    edge_direction: Direction,
    t: Instant,
    segment_window_end: Instant,
    conditional: &ConditionalAvailability,
) -> (IntervalSet, Instant) {
    let has_cdr = rs
        .availabilities
        .iter()
        .any(|a| a.status == AvailabilityStatus::Conditional);
    if !has_cdr {
        return (rs.segment.altrange.as_interval_set(), segment_window_end);
    }

    let mut union = IntervalSet::empty();
    let mut tuntil = segment_window_end;

    for a in &rs.availabilities {
        if !directions_match(a.direction, edge_direction) {
            continue;
        }
        match a.status {
            AvailabilityStatus::Closed | AvailabilityStatus::Invalid => continue,
            AvailabilityStatus::Open => {
                if a.timetable.contains(t) {
                    union = union.union(&a.altrange.as_interval_set());
                }
            }
            AvailabilityStatus::Conditional => {
                if !a.timetable.contains(t) {
                    continue;
                }
                let mut cdr = a.cdr;
                let mut band = a.altrange;
                if let Some(ovr) = conditional.active_at(segment_uuid, t) {
                    cdr = ovr.cdr;
                    band = ovr.altrange;
                    tuntil = tuntil.min(ovr.effective.end);
                }
                if cdr < 3 {
                    union = union.union(&band.as_interval_set());
                }
            }
        }
    }

    (IntervalSet::full().intersection(&union), tuntil)
}

/// Samples `altset` at each of `grid`'s flight levels, producing the
/// per-level metric array for a route-segment or procedure-leg edge
/// (`spec.md` §4.6 `set_metric_seg`).
pub fn set_metric_seg(grid: &LevelGrid, dist_nmi: f32, altset: &IntervalSet) -> Vec<f32> {
    grid.levels()
        .iter()
        .map(|&alt| {
            if altset.is_inside(alt) {
                dist_nmi
            } else {
                invalid_metric()
            }
        })
        .collect()
}

/// The synthesized minimum altitude for a DCT edge: the higher of terrain
/// and 5 NM-corridor elevation, plus a 1000 ft buffer (2000 ft above
/// 5000 ft AMSL), per `spec.md` §4.6 `set_metric_dct`.
pub fn dct_min_altitude(grid: &LevelGrid, terrain_elev: i32, corridor5_elev: i32) -> i32 {
    let terrain = terrain_elev.max(0);
    let corridor = corridor5_elev.max(0);
    let top = grid.levels().iter().copied().max().unwrap_or(0);
    let buffer = if top > 5000 { 2000 } else { 1000 };
    terrain.max(corridor) + buffer
}

/// Produces the per-level metric array for a DCT edge: every level at or
/// above the synthesized minimum altitude is valid (`spec.md` §4.6
/// `set_metric_dct`).
pub fn set_metric_dct(grid: &LevelGrid, dist_nmi: f32, terrain_elev: i32, corridor5_elev: i32) -> Vec<f32> {
    let min_elev = dct_min_altitude(grid, terrain_elev, corridor5_elev);
    grid.levels()
        .iter()
        .map(|&alt| if alt >= min_elev { dist_nmi } else { invalid_metric() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adr_store::timeslice::{Availability, SegmentTimeSlice};
    use adr_store::{AltRange, TimeWindow};

    fn segment_with(availabilities: Vec<Availability>) -> RouteSegmentTimeSlice {
        RouteSegmentTimeSlice {
            segment: SegmentTimeSlice::default(),
            availabilities,
            levels: vec![],
        }
    }

    /// S5. Edge validity under CDR.
    #[test]
    fn s5_union_then_aup_override_excludes() {
        let uuid = Uuid::from_name(adr_store::uuid::ADR_NAMESPACE, "UL602/SEG1");
        let open = Availability {
            levels: adr_store::Link::nil(),
            timetable: TimeWindow::UNBOUNDED,
            altrange: AltRange {
                lower_alt: 18000,
                lower_mode: adr_store::AltMode::Std,
                upper_alt: 28001,
                upper_mode: adr_store::AltMode::Std,
            },
            status: AvailabilityStatus::Open,
            cdr: 0,
            direction: Direction::FORWARD,
        };
        let conditional = Availability {
            levels: adr_store::Link::nil(),
            timetable: TimeWindow::UNBOUNDED,
            altrange: AltRange {
                lower_alt: 28000,
                lower_mode: adr_store::AltMode::Std,
                upper_alt: 35001,
                upper_mode: adr_store::AltMode::Std,
            },
            status: AvailabilityStatus::Conditional,
            cdr: 2,
            direction: Direction::FORWARD,
        };
        let rs = segment_with(vec![open, conditional]);

        let mut cdr_store = ConditionalAvailability::new();
        let (set, _) = get_altrange(&rs, uuid, Direction::FORWARD, 0, u64::MAX, &cdr_store);
        assert!(set.is_inside(18000));
        assert!(set.is_inside(30000));
        assert!(!set.is_inside(35001));

        cdr_store.insert(adr_store::AupCdrOverride {
            segment: uuid,
            effective: TimeWindow::new(0, 1000),
            altrange: AltRange {
                lower_alt: 28000,
                lower_mode: adr_store::AltMode::Std,
                upper_alt: 35001,
                upper_mode: adr_store::AltMode::Std,
            },
            direction: Direction::FORWARD,
            cdr: 3,
        });
        let (set, tuntil) = get_altrange(&rs, uuid, Direction::FORWARD, 0, u64::MAX, &cdr_store);
        assert!(set.is_inside(18000));
        assert!(!set.is_inside(30000));
        assert_eq!(tuntil, 1000);
    }

    #[test]
    fn no_cdr_availabilities_uses_raw_altrange() {
        let uuid = Uuid::from_name(adr_store::uuid::ADR_NAMESPACE, "X");
        let mut rs = segment_with(vec![]);
        rs.segment.altrange = AltRange::full();
        let cdr_store = ConditionalAvailability::new();
        let (set, tuntil) = get_altrange(&rs, uuid, Direction::BOTH, 0, 500, &cdr_store);
        assert!(set.is_inside(0));
        assert_eq!(tuntil, 500);
    }

    #[test]
    fn set_metric_seg_samples_grid_against_altset() {
        let grid = LevelGrid::uniform(10000, 1000, 5);
        let altset = IntervalSet::from_bounds(11000, 13000);
        let metric = set_metric_seg(&grid, 42.0, &altset);
        assert!(metric[0].is_nan());
        assert_eq!(metric[1], 42.0);
        assert_eq!(metric[2], 42.0);
        assert!(metric[3].is_nan());
    }

    #[test]
    fn set_metric_dct_requires_min_altitude() {
        let grid = LevelGrid::uniform(0, 1000, 10);
        let metric = set_metric_dct(&grid, 10.0, 4000, 3000);
        // top of grid is 9000 (<=5000? no, 9000>5000) -> buffer 2000, min_elev=6000.
        for (i, &alt) in grid.levels().iter().enumerate() {
            if alt >= 6000 {
                assert_eq!(metric[i], 10.0);
            } else {
                assert!(metric[i].is_nan());
            }
        }
    }
}
