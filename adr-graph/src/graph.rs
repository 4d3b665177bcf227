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

//! The level-indexed routing graph (`spec.md` §3.8, §4.5, §4.7).

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction as PetDirection;

use adr_store::timeslice::{Direction, TimeSliceData};
use adr_store::uuid::ADR_NAMESPACE;
use adr_store::{Database, Instant, ObjectRef, Uuid};

use crate::edge::{EdgeKind, GraphEdge};
use crate::level::LevelGrid;
use crate::metric::{get_altrange, set_metric_dct, set_metric_seg};
use crate::vertex::GraphVertex;

/// New vertices/edges added by one `Graph::add` call (`spec.md` §6.4).
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct AddStats {
    pub vertices: usize,
    pub edges: usize,
}

/// The matchall sentinel `find_edge`'s `match` parameter accepts to mean
/// "any edge between these vertices", mirroring `Uuid::nil()`'s existing
/// use as "absent" throughout the object model.
pub fn matchall() -> Uuid {
    Uuid::nil()
}

/// The level-indexed routing graph built from a [`Database`] at a fixed
/// query instant.
///
/// Backed by `petgraph`'s `StableDiGraph` so that `kill_empty_edges` can
/// remove edges without invalidating the indices `find_vertex`/`find_edge`
/// callers are holding on to (`spec.md` §3.8).
pub struct Graph {
    graph: StableDiGraph<GraphVertex, GraphEdge>,
    by_uuid: HashMap<Uuid, NodeIndex>,
    /// ident -> matching objects, populated for point-like vertices and for
    /// the route/SID/STAR idents `add` registers without creating a vertex
    /// (`spec.md` §4.5's "register the ident -> object mapping").
    by_ident: HashMap<String, Vec<ObjectRef>>,
    /// UUIDs of non-vertex objects (routes, SIDs, STARs) already visited by
    /// `add_inner`, so re-adding a segment that shares a route/procedure
    /// doesn't register its ident twice.
    visited: HashSet<Uuid>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            by_uuid: HashMap::new(),
            by_ident: HashMap::new(),
            visited: HashSet::new(),
        }
    }

    pub fn find_vertex(&self, uuid: Uuid) -> Option<&GraphVertex> {
        self.by_uuid.get(&uuid).map(|&idx| &self.graph[idx])
    }

    fn node_of(&self, uuid: Uuid) -> Option<NodeIndex> {
        self.by_uuid.get(&uuid).copied()
    }

    /// The graph-internal index of the vertex for `uuid`, if one was added.
    pub fn node_index(&self, uuid: Uuid) -> Option<NodeIndex> {
        self.node_of(uuid)
    }

    /// Every object (vertex or registered route/procedure) whose ident
    /// equals `ident` (`spec.md` §4.8, `find_ident`).
    pub fn find_ident(&self, ident: &str) -> impl Iterator<Item = &ObjectRef> {
        self.by_ident.get(ident).into_iter().flatten()
    }

    /// The edge from `u` to `v` whose UUID equals `match_uuid`, or — when
    /// `match_uuid` is [`matchall`] — the first edge found between them
    /// (`spec.md` §6.4 `find_edge`).
    pub fn find_edge(&self, u: NodeIndex, v: NodeIndex, match_uuid: Uuid) -> Option<&GraphEdge> {
        self.graph
            .edges_connecting(u, v)
            .find(|e| match_uuid.is_nil() || e.weight().uuid() == match_uuid)
            .map(|e| e.weight())
    }

    pub fn edge_endpoints(&self, e: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(e)
    }

    pub fn edge_weight(&self, e: EdgeIndex) -> Option<&GraphEdge> {
        self.graph.edge_weight(e)
    }

    /// Marks `e` as part of the solution a path search returned.
    pub fn mark_solution(&mut self, e: EdgeIndex) {
        if let Some(edge) = self.graph.edge_weight_mut(e) {
            edge.mark_solution();
        }
    }

    /// Recursively adds `obj` (and whatever it depends on) to the graph at
    /// instant `t`, classifying it per `spec.md` §4.5. `db` resolves the
    /// `Link`s a recursive add needs to follow — `Database::find_all`
    /// leaves links unresolved (`SPEC_FULL.md` §4.2), so this is the one
    /// deliberate deviation from the spec's literal 3-argument
    /// `add(t, obj, levels)` signature; `DESIGN.md` records why.
    pub fn add(&mut self, db: &Database, t: Instant, obj: &ObjectRef, levels: &LevelGrid) -> AddStats {
        let mut stats = AddStats::default();
        self.add_inner(db, t, obj, levels, &mut stats);
        stats
    }

    fn add_inner(
        &mut self,
        db: &Database,
        t: Instant,
        obj: &ObjectRef,
        levels: &LevelGrid,
        stats: &mut AddStats,
    ) -> Option<NodeIndex> {
        let uuid = obj.borrow().uuid();
        if uuid.is_nil() {
            return None;
        }
        if let Some(idx) = self.node_of(uuid) {
            return Some(idx);
        }

        let slice_index = slice_index_at(obj, t)?;
        let data = obj.borrow().slice(slice_index)?.data.clone();

        if data.is_point_like() {
            let vertex = GraphVertex::new(obj.clone(), slice_index);
            if let Some(ident) = vertex.ident() {
                self.by_ident.entry(ident).or_default().push(obj.clone());
            }
            let idx = self.graph.add_node(vertex);
            self.by_uuid.insert(uuid, idx);
            stats.vertices += 1;
            return Some(idx);
        }

        match &data {
            TimeSliceData::RouteSegment(rs) => {
                let kind = EdgeKind::RouteSegment;
                self.add_segment_edges(
                    db,
                    t,
                    obj,
                    slice_index,
                    uuid,
                    &rs.segment.route,
                    &rs.segment.start,
                    &rs.segment.end,
                    rs.segment.direction,
                    levels.resolve(&rs.levels),
                    kind,
                    stats,
                );
            }
            TimeSliceData::DepartureLeg(d) => {
                self.add_segment_edges(
                    db,
                    t,
                    obj,
                    slice_index,
                    uuid,
                    &d.sid,
                    &d.segment.start,
                    &d.segment.end,
                    d.segment.direction,
                    levels.clone(),
                    EdgeKind::DepartureLeg,
                    stats,
                );
            }
            TimeSliceData::ArrivalLeg(a) => {
                self.add_segment_edges(
                    db,
                    t,
                    obj,
                    slice_index,
                    uuid,
                    &a.star,
                    &a.segment.start,
                    &a.segment.end,
                    a.segment.direction,
                    levels.clone(),
                    EdgeKind::ArrivalLeg,
                    stats,
                );
            }
            TimeSliceData::StandardInstrument(s) => {
                if self.visited.insert(uuid) {
                    self.register_ident(&data, obj);
                }
                if let Ok(airport) = db.load(s.airport.uuid()) {
                    self.add_inner(db, t, &airport, levels, stats);
                }
                for conn in s.connection_points.iter() {
                    if let Ok(point) = db.load(conn.uuid()) {
                        self.add_inner(db, t, &point, levels, stats);
                    }
                }
                if let Some(iaf) = &s.iaf {
                    if let Ok(point) = db.load(iaf.uuid()) {
                        self.add_inner(db, t, &point, levels, stats);
                    }
                }
            }
            TimeSliceData::Route(_) => {
                if self.visited.insert(uuid) {
                    self.register_ident(&data, obj);
                }
            }
            _ => {}
        }

        self.node_of(uuid)
    }

    fn register_ident(&mut self, data: &TimeSliceData, obj: &ObjectRef) {
        let ident = match data {
            TimeSliceData::Route(r) => Some(r.ident.clone()),
            TimeSliceData::StandardInstrument(s) => Some(s.ident.clone()),
            _ => None,
        };
        if let Some(ident) = ident {
            self.by_ident.entry(ident).or_default().push(obj.clone());
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_segment_edges(
        &mut self,
        db: &Database,
        t: Instant,
        obj: &ObjectRef,
        slice_index: usize,
        segment_uuid: Uuid,
        route: &adr_store::Link,
        start: &adr_store::Link,
        end: &adr_store::Link,
        direction: Direction,
        grid: LevelGrid,
        kind: EdgeKind,
        stats: &mut AddStats,
    ) {
        if !route.uuid().is_nil() {
            if let Ok(route_obj) = db.load(route.uuid()) {
                self.add_inner(db, t, &route_obj, &grid, stats);
            }
        }
        let (Ok(start_obj), Ok(end_obj)) = (db.load(start.uuid()), db.load(end.uuid())) else {
            return;
        };
        let Some(u) = self.add_inner(db, t, &start_obj, &grid, stats) else {
            return;
        };
        let Some(v) = self.add_inner(db, t, &end_obj, &grid, stats) else {
            return;
        };

        let from = self.graph[u].coordinate().unwrap_or_else(adr_store::Coordinate::invalid);
        let to = self.graph[v].coordinate().unwrap_or_else(adr_store::Coordinate::invalid);

        let obj_ref = obj.borrow();
        let Some(slice) = obj_ref.slice(slice_index) else {
            return;
        };
        let segment_window_end = slice.endtime();
        let data = &slice.data;

        if direction.is_forward() {
            self.add_one_edge(
                db, obj, kind, u, v, segment_uuid, Direction::FORWARD, &grid, from, to, t,
                segment_window_end, data, stats,
            );
        }
        if direction.is_backward() {
            self.add_one_edge(
                db, obj, kind, v, u, segment_uuid, Direction::BACKWARD, &grid, to, from, t,
                segment_window_end, data, stats,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_one_edge(
        &mut self,
        db: &Database,
        obj: &ObjectRef,
        kind: EdgeKind,
        u: NodeIndex,
        v: NodeIndex,
        segment_uuid: Uuid,
        edge_direction: Direction,
        grid: &LevelGrid,
        from: adr_store::Coordinate,
        to: adr_store::Coordinate,
        t: Instant,
        segment_window_end: Instant,
        data: &TimeSliceData,
        stats: &mut AddStats,
    ) {
        if self.find_edge(u, v, segment_uuid).is_some() {
            return;
        }

        let mut edge = GraphEdge::new(
            kind,
            Some(obj.clone()),
            0,
            segment_uuid,
            edge_direction,
            grid.clone(),
            from,
            to,
        );

        let metric = match data.as_routesegment() {
            Some(rs) => {
                let (altset, _tuntil) = get_altrange(
                    rs,
                    segment_uuid,
                    edge_direction,
                    t,
                    segment_window_end,
                    &db.conditional_availability,
                );
                set_metric_seg(grid, edge.dist_nmi(), &altset)
            }
            None => {
                // Departure/arrival legs carry neither availabilities nor
                // a CDR concept; their raw altrange is the whole story.
                let segment = data.as_segment().expect("segment-like time slice");
                set_metric_seg(grid, edge.dist_nmi(), &segment.altrange.as_interval_set())
            }
        };
        edge.set_metric(metric);

        self.graph.add_edge(u, v, edge);
        stats.edges += 1;
    }

    /// Synthesizes a DCT edge between two already-added vertices, not
    /// backed by any stored object (`spec.md` §4.6, §4.8's "DCT edges").
    /// Its UUID is deterministically derived from the endpoint UUIDs so
    /// repeated calls for the same pair are idempotent.
    pub fn add_dct(
        &mut self,
        u: NodeIndex,
        v: NodeIndex,
        grid: &LevelGrid,
        terrain_elev: i32,
        corridor5_elev: i32,
    ) -> Option<EdgeIndex> {
        let (u_uuid, v_uuid) = (self.graph[u].uuid(), self.graph[v].uuid());
        let name = format!("DCT/{}/{}", u_uuid.to_str(false), v_uuid.to_str(false));
        let dct_uuid = Uuid::from_name(ADR_NAMESPACE, &name);

        if self.find_edge(u, v, dct_uuid).is_some() {
            return None;
        }

        let from = self.graph[u].coordinate().unwrap_or_else(adr_store::Coordinate::invalid);
        let to = self.graph[v].coordinate().unwrap_or_else(adr_store::Coordinate::invalid);
        let mut edge = GraphEdge::new(
            EdgeKind::Dct,
            None,
            0,
            dct_uuid,
            Direction::FORWARD,
            grid.clone(),
            from,
            to,
        );
        let metric = set_metric_dct(grid, edge.dist_nmi(), terrain_elev, corridor5_elev);
        edge.set_metric(metric);
        Some(self.graph.add_edge(u, v, edge))
    }

    /// Removes every edge whose metric array is entirely invalid, returning
    /// the count removed (`spec.md` §6.4 `kill_empty_edges`).
    pub fn kill_empty_edges(&mut self) -> usize {
        let dead: Vec<EdgeIndex> = self
            .graph
            .edge_indices()
            .filter(|&e| self.graph[e].is_empty())
            .collect();
        let count = dead.len();
        for e in dead {
            self.graph.remove_edge(e);
        }
        count
    }

    /// Whether flight levels `piu` (leaving `u`) and `piv` (arriving at `v`)
    /// are validly connected across edge `e` (`spec.md` §4.7).
    pub fn is_valid_connection(&self, u: NodeIndex, piu: i32, v: NodeIndex, piv: i32, e: EdgeIndex) -> bool {
        let Some(edge) = self.graph.edge_weight(e) else {
            return false;
        };
        if self.graph.edge_endpoints(e) != Some((u, v)) {
            return false;
        }
        let grid = edge.grid();

        let valid_at = |alt: i32| grid.index_of(alt).is_some_and(|i| edge.is_valid_at_index(i));

        let (iu, iv) = (grid.index_of(piu), grid.index_of(piv));
        if iu.is_none() || iv.is_none() {
            // SID/STAR off-graph levels: at least one side must be in-range
            // and valid.
            return valid_at(piu) || valid_at(piv);
        }
        if !valid_at(piu) {
            return false;
        }
        if piu == piv {
            return true;
        }

        let (lo, hi) = (piu.min(piv), piu.max(piv));
        for &lvl in grid.levels() {
            if lvl < lo || lvl > hi {
                continue;
            }
            if valid_at(lvl) {
                continue;
            }
            let parallel_ok = self
                .graph
                .edges_connecting(u, v)
                .filter(|pe| pe.id() != e)
                .any(|pe| {
                    pe.weight()
                        .grid()
                        .index_of(lvl)
                        .is_some_and(|i| pe.weight().is_valid_at_index(i))
                });
            if !parallel_ok {
                return false;
            }
        }
        true
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neighbors(&self, u: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(u, PetDirection::Outgoing)
    }

    pub fn edges_out(&self, u: NodeIndex) -> impl Iterator<Item = (NodeIndex, EdgeIndex)> + '_ {
        self.graph
            .edges_directed(u, PetDirection::Outgoing)
            .map(|e| (e.target(), e.id()))
    }
}

/// Replicates `Object::at`'s slice-selection logic to additionally recover
/// the selected slice's index, which `Object::at` itself only exposes as a
/// reference.
fn slice_index_at(obj: &ObjectRef, t: Instant) -> Option<usize> {
    let obj = obj.borrow();
    let idx = obj
        .slices()
        .iter()
        .rposition(|s| s.window.start <= t)?;
    obj.slices()[idx].window.contains(t).then_some(idx)
}
