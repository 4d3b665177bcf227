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

//! The temporal object model and its persistent, content-addressed store.
//!
//! This crate implements `spec.md` §3's data model and §4.1-§4.4's
//! operations: UUID identity, lazy [`Link`] resolution, the polymorphic
//! [`timeslice::TimeSlice`] hierarchy, the [`altitude`] interval algebra,
//! the refcounted [`object::Object`] container, the on-disk [`archive`]
//! codec, and the [`database::Database`] that ties them together.
//! `adr-graph` builds the routing graph on top of this store.

pub mod altitude;
pub mod archive;
pub mod availability;
pub mod database;
pub mod error;
pub mod geom;
pub mod link;
pub mod object;
pub mod timeslice;
pub mod timewindow;
pub mod uuid;

pub use altitude::{AltMode, AltRange, IntervalSet};
pub use availability::{AupCdrOverride, ConditionalAvailability};
pub use database::{Database, LoadMode, StoreConfig};
pub use error::Error;
pub use geom::Coordinate;
pub use link::{Link, LinkSet};
pub use object::{Object, ObjectRef};
pub use timeslice::{TimeSlice, TimeSliceData, TypeTag};
pub use timewindow::{Instant, TimeWindow, UNLIMITED};
pub use uuid::Uuid;
