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

//! The level-indexed routing graph built on top of `adr-store`.
//!
//! This crate implements `spec.md` §3.8 and §4.5–§4.8: turning a time
//! instant's worth of objects into vertices and directed edges
//! (`graph`, `vertex`, `edge`), evaluating each edge's per-flight-level
//! metric (`metric`, `level`), and searching the result for a
//! level-continuity-valid path (`search`). `plan` ties these together
//! into the one opinionated end-to-end entry point `SPEC_FULL.md` §4.10
//! describes; everything else in this crate is usable standalone by a
//! consumer that wants finer control (`spec.md` §4.8).

pub mod edge;
pub mod graph;
pub mod level;
pub mod metric;
pub mod plan;
pub mod search;
pub mod vertex;

pub use edge::{EdgeKind, GraphEdge};
pub use graph::{matchall, AddStats, Graph};
pub use level::LevelGrid;
pub use plan::{plan_route, RoutePlan, RouteQuery};
pub use search::{shortest_path, shortest_path_marking, Path, PathStep};
pub use vertex::GraphVertex;
