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

//! Directed and bidirectional graph edges (`spec.md` §3.8, §4.5, §4.6).

use geo::{Bearing, Distance, Geodesic};

use adr_store::timeslice::Direction;
use adr_store::{Coordinate, ObjectRef, Uuid};

use crate::level::LevelGrid;
use crate::metric::invalid_metric;

/// One meter in nautical miles.
const METERS_PER_NMI: f64 = 1852.0;

/// What kind of object (if any) an edge was built from.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EdgeKind {
    RouteSegment,
    DepartureLeg,
    ArrivalLeg,
    /// A direct leg synthesized by the graph layer itself, not backed by any
    /// stored segment object (`spec.md` §4.6, §4.8).
    Dct,
}

/// A directed traversal of a segment/leg object, or a synthesized DCT leg,
/// between two [`crate::vertex::GraphVertex`]s (`spec.md` §3.8 `GraphEdge`).
#[derive(Clone, Debug)]
pub struct GraphEdge {
    kind: EdgeKind,
    /// The owning segment/leg object; `None` for a DCT edge.
    object: Option<ObjectRef>,
    slice_index: usize,
    /// Identity used by `Graph::find_edge`: the owning object's UUID for
    /// object-backed edges, or a deterministic derived UUID for DCT edges.
    uuid: Uuid,
    /// Which way along the underlying segment's `start -> end` this
    /// particular directed edge instance travels.
    direction: Direction,
    /// The flight-level grid `metric` is indexed against.
    grid: LevelGrid,
    /// Per-flight-level validity/cost, indexed against `grid`. `NaN` marks
    /// an invalid (untraversable) level.
    metric: Vec<f32>,
    dist_nmi: f32,
    true_track_deg: f32,
    /// Set by path search once this edge is used in the returned solution.
    solution: bool,
    /// Set when the edge was kept only to report `TopologyEmpty`-adjacent
    /// diagnostics; never valid at any level.
    noroute: bool,
}

impl GraphEdge {
    /// Builds an edge from `from` to `to`, initialising its metric array to
    /// `grid_len` invalid entries; `Graph` fills it in with
    /// [`crate::metric::set_metric_seg`] or
    /// [`crate::metric::set_metric_dct`] in a later pass (`spec.md` §4.5).
    pub fn new(
        kind: EdgeKind,
        object: Option<ObjectRef>,
        slice_index: usize,
        uuid: Uuid,
        direction: Direction,
        grid: LevelGrid,
        from: Coordinate,
        to: Coordinate,
    ) -> Self {
        let (dist_nmi, true_track_deg) = if from.is_valid() && to.is_valid() {
            let a: geo::Point<f64> = from.into();
            let b: geo::Point<f64> = to.into();
            let dist_m = Geodesic.distance(a, b);
            let bearing = Geodesic.bearing(a, b);
            ((dist_m / METERS_PER_NMI) as f32, bearing.rem_euclid(360.0) as f32)
        } else {
            (0.0, 0.0)
        };
        let metric = vec![invalid_metric(); grid.len()];
        Self {
            kind,
            object,
            slice_index,
            uuid,
            direction,
            grid,
            metric,
            dist_nmi,
            true_track_deg,
            solution: false,
            noroute: false,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn object(&self) -> Option<&ObjectRef> {
        self.object.as_ref()
    }

    pub fn slice_index(&self) -> usize {
        self.slice_index
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn dist_nmi(&self) -> f32 {
        self.dist_nmi
    }

    pub fn true_track_deg(&self) -> f32 {
        self.true_track_deg
    }

    pub fn grid(&self) -> &LevelGrid {
        &self.grid
    }

    pub fn metric(&self) -> &[f32] {
        &self.metric
    }

    pub fn set_metric(&mut self, metric: Vec<f32>) {
        self.metric = metric;
    }

    pub fn is_valid_at_index(&self, i: usize) -> bool {
        self.metric.get(i).is_some_and(|m| !m.is_nan())
    }

    /// `true` if every level in the metric array is invalid
    /// (`spec.md` §3.8 `kill_empty_edges`'s removal criterion).
    pub fn is_empty(&self) -> bool {
        self.metric.iter().all(|m| m.is_nan())
    }

    pub fn mark_solution(&mut self) {
        self.solution = true;
    }

    pub fn is_solution(&self) -> bool {
        self.solution
    }

    pub fn mark_noroute(&mut self) {
        self.noroute = true;
    }

    pub fn is_noroute(&self) -> bool {
        self.noroute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_computes_distance_and_track_from_coordinates() {
        let frankfurt = Coordinate::new(50.0379, 8.5622);
        let hamburg = Coordinate::new(53.6304, 9.9882);
        let edge = GraphEdge::new(
            EdgeKind::RouteSegment,
            None,
            0,
            Uuid::nil(),
            Direction::BOTH,
            LevelGrid::uniform(18000, 1000, 5),
            frankfurt,
            hamburg,
        );
        assert!(edge.dist_nmi() > 0.0);
        assert!((0.0..360.0).contains(&edge.true_track_deg()));
    }

    #[test]
    fn is_empty_iff_every_level_invalid() {
        let edge = GraphEdge::new(
            EdgeKind::Dct,
            None,
            0,
            Uuid::nil(),
            Direction::BOTH,
            LevelGrid::uniform(0, 1000, 3),
            Coordinate::invalid(),
            Coordinate::invalid(),
        );
        assert!(edge.is_empty());
    }
}
