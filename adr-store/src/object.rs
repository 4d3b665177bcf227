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

//! The refcounted, time-sliced object container (`spec.md` §3.6, §4.4).

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::timeslice::{TimeSlice, TimeSliceData};
use crate::uuid::Uuid;

/// A shared handle to an [`Object`]. `Rc`, not `Arc`: the core is
/// single-threaded per query (`spec.md` §5); a multi-threaded consumer
/// owns one [`crate::Database`] per thread.
pub type ObjectRef = Rc<RefCell<Object>>;

/// A content-addressed, time-sliced domain object.
#[derive(Debug)]
pub struct Object {
    uuid: Uuid,
    modified_timestamp: u64,
    dirty: bool,
    /// Sorted by `window.start`, non-overlapping (`spec.md` invariant 1).
    slices: Vec<TimeSlice>,
}

impl Object {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            modified_timestamp: 0,
            dirty: false,
            slices: Vec::new(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn modified_timestamp(&self) -> u64 {
        self.modified_timestamp
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Slice count.
    pub fn size(&self) -> usize {
        self.slices.len()
    }

    /// Indexed access to the `i`-th slice, sorted by start time.
    pub fn slice(&self, i: usize) -> Option<&TimeSlice> {
        self.slices.get(i)
    }

    pub fn slices(&self) -> &[TimeSlice] {
        &self.slices
    }

    /// The unique slice whose window contains `t`, if any
    /// (`spec.md` §3.6 `operator()(t)`).
    pub fn at(&self, t: u64) -> Option<&TimeSlice> {
        let idx = self
            .slices
            .partition_point(|s| s.window.start <= t)
            .checked_sub(1)?;
        let slice = &self.slices[idx];
        slice.window.contains(t).then_some(slice)
    }

    /// The slice with the largest overlap with `[t0, t1)`
    /// (`spec.md` §3.6 `operator()(t0,t1)`).
    pub fn at_range(&self, t0: u64, t1: u64) -> Option<&TimeSlice> {
        self.slices
            .iter()
            .filter(|s| s.window.overlaps(t0, t1))
            .max_by_key(|s| s.window.overlap_len(t0, t1))
    }

    /// Inserts `new`, reconciling it with existing slices per `spec.md`
    /// §4.4:
    /// 1. discard if `new` is empty;
    /// 2. truncate any existing slice whose start falls inside `new`'s
    ///    window to begin at `new.endtime`;
    /// 3. insert in sorted position and drop any slice that degenerated
    ///    to empty as a result.
    pub fn add_timeslice(&mut self, new: TimeSlice) {
        if new.window.is_empty() {
            return;
        }
        for existing in &mut self.slices {
            if new.window.contains(existing.window.start) {
                existing.window.start = new.window.end;
            }
        }
        self.slices.retain(|s| !s.window.is_empty());
        let pos = self
            .slices
            .partition_point(|s| s.window.start < new.window.start);
        self.slices.insert(pos, new);
        self.dirty = true;
    }

    /// Sets `modified_timestamp` and the `dirty` flag, as the final step of
    /// any mutation per `spec.md` §4.4 step 4.
    pub fn touch(&mut self, now: u64) {
        self.modified_timestamp = now;
        self.dirty = true;
    }

    /// The sorted set of instants at which this slice's own window starts
    /// or ends, or any Link-reachable dependent object's slice starts or
    /// ends within this slice's window (`spec.md` §4.4). Dependents are
    /// supplied by the caller (typically the `Database`, which alone knows
    /// how to resolve a `Link`) as `(start, end)` windows, already clipped
    /// to whatever the caller considers relevant.
    pub fn timediscontinuities(
        slice: &TimeSlice,
        dependent_windows: impl IntoIterator<Item = (u64, u64)>,
    ) -> Vec<u64> {
        let mut points = BTreeSet::new();
        points.insert(slice.window.start);
        if slice.window.end != crate::timewindow::UNLIMITED {
            points.insert(slice.window.end);
        }
        for (start, end) in dependent_windows {
            if slice.window.contains(start) {
                points.insert(start);
            }
            if end != crate::timewindow::UNLIMITED && slice.window.contains(end) {
                points.insert(end);
            }
        }
        points.into_iter().collect()
    }
}

impl std::ops::Index<usize> for Object {
    type Output = TimeSlice;
    fn index(&self, i: usize) -> &TimeSlice {
        &self.slices[i]
    }
}

/// Constructs a fresh, empty, shared [`Object`] for `uuid`.
pub fn new_object(uuid: Uuid) -> ObjectRef {
    Rc::new(RefCell::new(Object::new(uuid)))
}
