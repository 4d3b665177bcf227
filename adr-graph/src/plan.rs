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

//! `plan_route`: the core's one opinionated end-to-end convenience entry
//! point (`SPEC_FULL.md` §4.10), tying together §4.2 (bbox/window query),
//! §4.5 (graph construction), §4.6 (metric evaluation), and §4.7
//! (level-continuity path search). Consumers who need finer control drive
//! `Database`/`Graph`/`search` directly instead (`spec.md` §4.8).

use rstar::AABB;

use adr_store::{Coordinate, Database, Error, Instant, LoadMode, TypeTag, Uuid};

use crate::graph::Graph;
use crate::level::LevelGrid;
use crate::search::{self, Path};

/// Inputs to [`plan_route`].
#[derive(Clone, Debug)]
pub struct RouteQuery {
    pub t: Instant,
    pub departure: Uuid,
    pub destination: Uuid,
    /// The flight levels (feet) to evaluate edge metrics at.
    pub levels: LevelGrid,
    pub departure_level: i32,
    pub destination_level: i32,
}

/// The outcome of a successful graph build, before path search.
#[derive(Debug)]
pub struct RoutePlan {
    pub graph: Graph,
    pub path: Option<Path>,
}

/// Expands the graph around `query.departure`/`query.destination` at
/// `query.t` and searches it for a level-continuity-valid path between
/// them.
///
/// Builds a bounding box spanning departure and destination, asks the
/// `Database` for every object overlapping `t` and that box, folds them
/// all into a fresh `Graph`, prunes edges left with no valid level via
/// `kill_empty_edges`, then runs [`search::shortest_path_marking`].
///
/// Returns [`Error::NotFound`] if either endpoint is missing from the
/// store, or [`Error::TopologyEmpty`] if the resulting graph has no edges
/// at all (a warning condition per `spec.md` §7, not necessarily a search
/// failure — the caller may retry with a wider query). A graph that is
/// non-empty but has no legal path between the two points is reported as
/// `Ok(RoutePlan { path: None, .. })`, not an error.
pub fn plan_route(db: &Database, query: &RouteQuery) -> Result<RoutePlan, Error> {
    let departure = db.load(query.departure)?;
    let destination = db.load(query.destination)?;

    let dep_coord = departure
        .borrow()
        .at(query.t)
        .and_then(|s| s.data.coordinate())
        .unwrap_or_else(Coordinate::invalid);
    let dest_coord = destination
        .borrow()
        .at(query.t)
        .and_then(|s| s.data.coordinate())
        .unwrap_or_else(Coordinate::invalid);

    let envelope = AABB::from_corners(dep_coord.into(), dest_coord.into());
    let candidates = db.find_by_bbox(&envelope);
    let window_objects = db.find_all(
        LoadMode::LinkNone,
        query.t,
        query.t + 1,
        TypeTag::Airport,
        TypeTag::Airspace,
        0,
    );

    let mut graph = Graph::new();
    graph.add(db, query.t, &departure, &query.levels);
    graph.add(db, query.t, &destination, &query.levels);
    for obj in candidates.into_iter().chain(window_objects) {
        graph.add(db, query.t, &obj, &query.levels);
    }

    let removed = graph.kill_empty_edges();
    if graph.edge_count() == 0 {
        log::warn!(
            "plan_route: graph for {} -> {} at t={} has no edges ({removed} pruned)",
            query.departure,
            query.destination,
            query.t
        );
        return Err(Error::TopologyEmpty);
    }

    let (Some(start), Some(goal)) = (
        graph.node_index(query.departure),
        graph.node_index(query.destination),
    ) else {
        return Err(Error::NotFound(query.departure));
    };

    let path = search::shortest_path_marking(
        &mut graph,
        start,
        query.departure_level,
        goal,
        query.destination_level,
    );

    Ok(RoutePlan { graph, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adr_store::object::new_object;
    use adr_store::timeslice::*;
    use adr_store::{AltRange, Link, StoreConfig, TimeSlice, TimeWindow};
    use std::path::PathBuf;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(label: &str) -> Self {
            let mut dir = std::env::temp_dir();
            dir.push(format!("adr-graph-plan-test-{label}-{:x}", std::process::id()));
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

    fn direct_segment(start: Uuid, end: Uuid) -> adr_store::ObjectRef {
        let uuid = Uuid::from_name(adr_store::uuid::ADR_NAMESPACE, "UL602/SEG1");
        let obj = new_object(uuid);
        obj.borrow_mut().add_timeslice(TimeSlice::new(
            TimeWindow::UNBOUNDED,
            TimeSliceData::RouteSegment(RouteSegmentTimeSlice {
                segment: SegmentTimeSlice {
                    bbox: (Coordinate::new(49.0, 7.0), Coordinate::new(54.0, 10.0)),
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
    fn finds_a_direct_path_between_two_connected_airports() {
        let eddf = airport("EDDF", 50.0379, 8.5622);
        let eddh = airport("EDDH", 53.6304, 9.9882);
        let eddf_u = eddf.borrow().uuid();
        let eddh_u = eddh.borrow().uuid();
        let seg = direct_segment(eddf_u, eddh_u);

        let dir = TempDir::new("direct");
        let mut db = Database::open(StoreConfig::new(&dir.0)).unwrap();
        for obj in [eddf, eddh, seg] {
            db.save(obj).unwrap();
        }

        let query = RouteQuery {
            t: 0,
            departure: eddf_u,
            destination: eddh_u,
            levels: LevelGrid::uniform(18000, 1000, 3),
            departure_level: 18000,
            destination_level: 18000,
        };

        let plan = plan_route(&db, &query).unwrap();
        let path = plan.path.expect("a path should be found");
        assert_eq!(path.steps.len(), 2);
        assert!(path.dist_nmi > 0.0);
    }

    #[test]
    fn missing_departure_is_not_found() {
        let eddh = airport("EDDH", 53.6304, 9.9882);
        let eddh_u = eddh.borrow().uuid();
        let dir = TempDir::new("missing-departure");
        let mut db = Database::open(StoreConfig::new(&dir.0)).unwrap();
        db.save(eddh).unwrap();

        let query = RouteQuery {
            t: 0,
            departure: Uuid::from_name(adr_store::uuid::ADR_NAMESPACE, "NOPE"),
            destination: eddh_u,
            levels: LevelGrid::uniform(18000, 1000, 3),
            departure_level: 18000,
            destination_level: 18000,
        };

        assert!(matches!(plan_route(&db, &query), Err(Error::NotFound(_))));
    }
}
