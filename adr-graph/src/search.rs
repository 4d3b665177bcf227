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

//! Level-continuity-aware shortest-lateral-path search (`spec.md` §4.7,
//! §4.8).
//!
//! Dijkstra over `(vertex, flight level)` states rather than over vertices
//! alone: a transition from `(u, piu)` to `(v, piv)` is only admitted when
//! [`Graph::is_valid_connection`] says so, so a level change is never
//! silently threaded through airspace the edge (or a parallel edge) is not
//! actually valid at.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use petgraph::stable_graph::{EdgeIndex, NodeIndex};

use crate::graph::Graph;

/// One stop along a found path: the vertex, the flight level the aircraft
/// is at on arrival, and the edge that was crossed to get there (`None`
/// for the starting vertex).
#[derive(Clone, Copy, Debug)]
pub struct PathStep {
    pub vertex: NodeIndex,
    pub level: i32,
    pub edge: Option<EdgeIndex>,
}

/// A found shortest lateral path (`spec.md` §4.8).
#[derive(Clone, Debug)]
pub struct Path {
    pub steps: Vec<PathStep>,
    pub dist_nmi: f32,
}

#[derive(Clone, Copy, PartialEq)]
struct HeapItem {
    cost: f32,
    node: NodeIndex,
    level: i32,
}

impl Eq for HeapItem {}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the lowest cost first.
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds the lowest-`dist_nmi` path from `(start, start_level)` to
/// `(goal, goal_level)`, honoring level continuity across every edge
/// crossed (`spec.md` §4.7). Returns `None` if no such path exists.
pub fn shortest_path(
    graph: &Graph,
    start: NodeIndex,
    start_level: i32,
    goal: NodeIndex,
    goal_level: i32,
) -> Option<Path> {
    let mut dist: HashMap<(NodeIndex, i32), f32> = HashMap::new();
    let mut prev: HashMap<(NodeIndex, i32), (NodeIndex, i32, EdgeIndex)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert((start, start_level), 0.0);
    heap.push(HeapItem {
        cost: 0.0,
        node: start,
        level: start_level,
    });

    while let Some(HeapItem { cost, node, level }) = heap.pop() {
        if node == goal && level == goal_level {
            return Some(reconstruct(&prev, (node, level), cost));
        }
        if cost > *dist.get(&(node, level)).unwrap_or(&f32::INFINITY) {
            continue;
        }
        for (v, e) in graph.edges_out(node) {
            let Some(edge) = graph.edge_weight(e) else {
                continue;
            };
            for &piv in edge.grid().levels() {
                if !graph.is_valid_connection(node, level, v, piv, e) {
                    continue;
                }
                let candidate = cost + edge.dist_nmi();
                let key = (v, piv);
                if candidate < *dist.get(&key).unwrap_or(&f32::INFINITY) {
                    dist.insert(key, candidate);
                    prev.insert(key, (node, level, e));
                    heap.push(HeapItem {
                        cost: candidate,
                        node: v,
                        level: piv,
                    });
                }
            }
        }
    }
    None
}

/// Runs [`shortest_path`] and marks every edge on the result as part of the
/// solution (`spec.md` §3.8's `solution` flag).
pub fn shortest_path_marking(
    graph: &mut Graph,
    start: NodeIndex,
    start_level: i32,
    goal: NodeIndex,
    goal_level: i32,
) -> Option<Path> {
    let path = shortest_path(graph, start, start_level, goal, goal_level)?;
    for step in &path.steps {
        if let Some(e) = step.edge {
            graph.mark_solution(e);
        }
    }
    Some(path)
}

fn reconstruct(
    prev: &HashMap<(NodeIndex, i32), (NodeIndex, i32, EdgeIndex)>,
    end: (NodeIndex, i32),
    dist_nmi: f32,
) -> Path {
    let mut steps = vec![PathStep {
        vertex: end.0,
        level: end.1,
        edge: None,
    }];
    let mut cur = end;
    while let Some(&(pn, pl, pe)) = prev.get(&cur) {
        steps.push(PathStep {
            vertex: pn,
            level: pl,
            edge: Some(pe),
        });
        cur = (pn, pl);
    }
    steps.reverse();
    Path { steps, dist_nmi }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adr_store::object::new_object;
    use adr_store::timeslice::*;
    use adr_store::{AltRange, Coordinate, Database, Link, StoreConfig, TimeSlice, TimeWindow, Uuid};
    use std::path::PathBuf;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(label: &str) -> Self {
            let mut dir = std::env::temp_dir();
            dir.push(format!("adr-graph-search-test-{label}-{:x}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn airport(ident: &str, lat: f64, lon: f64) -> adr_store::ObjectRef {
        let uuid = Uuid::from_name(adr_store::uuid::ADR_NAMESPACE, ident);
        let obj = new_object(uuid);
        obj.borrow_mut().add_timeslice(TimeSlice::new(
            TimeWindow::UNBOUNDED,
            TimeSliceData::Airport(AirportTimeSlice {
                ident: ident.into(),
                coordinate: Coordinate::new(lat, lon),
                elevation: 300,
                name: ident.into(),
                iata: String::new(),
                served_cities: vec![],
                flags: AirportFlags::CIV,
            }),
        ));
        obj
    }

    fn segment(name: &str, start: Uuid, end: Uuid) -> adr_store::ObjectRef {
        let uuid = Uuid::from_name(adr_store::uuid::ADR_NAMESPACE, name);
        let obj = new_object(uuid);
        obj.borrow_mut().add_timeslice(TimeSlice::new(
            TimeWindow::UNBOUNDED,
            TimeSliceData::RouteSegment(RouteSegmentTimeSlice {
                segment: SegmentTimeSlice {
                    bbox: (Coordinate::invalid(), Coordinate::invalid()),
                    route: Link::nil(),
                    start: Link::unresolved(start),
                    end: Link::unresolved(end),
                    altrange: AltRange::full(),
                    direction: Direction::BOTH,
                    terrain_elev: ELEV_UNKNOWN,
                    corridor5_elev: ELEV_UNKNOWN,
                },
                availabilities: vec![],
                levels: vec![],
            }),
        ));
        obj
    }

    #[test]
    fn finds_the_two_hop_path_and_sums_distance() {
        let eddf = airport("EDDF", 50.0379, 8.5622);
        let eddh = airport("EDDH", 53.6304, 9.9882);
        let eddk = airport("EDDK", 50.8659, 7.1427);
        let (eddf_u, eddh_u, eddk_u) = (eddf.borrow().uuid(), eddh.borrow().uuid(), eddk.borrow().uuid());
        let seg1 = segment("SEG1", eddf_u, eddh_u);
        let seg2 = segment("SEG2", eddh_u, eddk_u);

        let dir = TempDir::new("two-hop");
        let mut db = Database::open(StoreConfig::new(&dir.0)).unwrap();
        for obj in [eddf, eddh, eddk, seg1.clone(), seg2.clone()] {
            db.save(obj).unwrap();
        }

        let grid = crate::level::LevelGrid::uniform(18000, 1000, 3);
        let mut graph = Graph::new();
        graph.add(&db, 0, &seg1, &grid);
        graph.add(&db, 0, &seg2, &grid);

        let start = graph.node_index(eddf_u).unwrap();
        let goal = graph.node_index(eddk_u).unwrap();

        let path = shortest_path(&graph, start, 18000, goal, 18000).expect("path exists");
        assert_eq!(path.steps.first().unwrap().vertex, start);
        assert_eq!(path.steps.last().unwrap().vertex, goal);
        assert_eq!(path.steps.len(), 3);
        assert!(path.dist_nmi > 0.0);
    }

    #[test]
    fn no_path_when_levels_never_connect() {
        let eddf = airport("EDDF", 50.0379, 8.5622);
        let eddh = airport("EDDH", 53.6304, 9.9882);
        let eddf_u = eddf.borrow().uuid();
        let eddh_u = eddh.borrow().uuid();
        let seg = segment("SEG1", eddf_u, eddh_u);

        let dir = TempDir::new("no-path");
        let mut db = Database::open(StoreConfig::new(&dir.0)).unwrap();
        for obj in [eddf, eddh, seg.clone()] {
            db.save(obj).unwrap();
        }

        let grid = crate::level::LevelGrid::uniform(18000, 1000, 3);
        let mut graph = Graph::new();
        graph.add(&db, 0, &seg, &grid);

        let start = graph.node_index(eddf_u).unwrap();
        let goal = graph.node_index(eddh_u).unwrap();
        // 5000 is outside the grid and outside the segment's (full) range
        // on neither side being in-range for an off-graph check: use a
        // goal level with no edge entry at all.
        assert!(shortest_path(&graph, start, 18000, goal, 999_999).is_none());
    }
}
