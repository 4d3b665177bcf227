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

//! Point-like graph vertices (`spec.md` §3.8, §4.5).

use adr_store::{Coordinate, Instant, ObjectRef, Uuid};

/// A vertex created for a point-like object (airport, navaid, designated
/// point) at the instant a [`crate::graph::Graph`] was built for.
///
/// Wraps the underlying [`ObjectRef`] plus the index of the slice valid at
/// the build instant, rather than copying its fields, so later lookups
/// always see the object's current state.
#[derive(Clone, Debug)]
pub struct GraphVertex {
    object: ObjectRef,
    slice_index: usize,
}

impl GraphVertex {
    pub fn new(object: ObjectRef, slice_index: usize) -> Self {
        Self { object, slice_index }
    }

    pub fn uuid(&self) -> Uuid {
        self.object.borrow().uuid()
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn slice_index(&self) -> usize {
        self.slice_index
    }

    /// The ident of the underlying point, if the slice carries one.
    pub fn ident(&self) -> Option<String> {
        let obj = self.object.borrow();
        let slice = obj.slice(self.slice_index)?;
        match &slice.data {
            adr_store::TimeSliceData::Airport(a) => Some(a.ident.clone()),
            adr_store::TimeSliceData::Navaid(n) => Some(n.ident.clone()),
            adr_store::TimeSliceData::DesignatedPoint(d) => Some(d.ident.clone()),
            _ => None,
        }
    }

    /// The vertex's coordinate, if the slice carries one.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let obj = self.object.borrow();
        let slice = obj.slice(self.slice_index)?;
        slice.data.coordinate()
    }

    /// `true` if the underlying object's slice at this index was still the
    /// one valid at the instant this vertex was built for.
    pub fn is_valid_at(&self, t: Instant) -> bool {
        let obj = self.object.borrow();
        matches!(obj.at(t), Some(s) if std::ptr::eq(s, &obj.slices()[self.slice_index]))
    }
}
