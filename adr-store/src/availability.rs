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

//! Airspace Use Plan (AUP) conditional-route overrides (`spec.md` §3.5,
//! §4.6; `SPEC_FULL.md` §3.9).
//!
//! An override replaces the CDR category an edge's own `Availability`
//! records would otherwise carry, for one segment over one time window.
//! The store is read-only within a query (`spec.md` §5); updating it is a
//! distinct operation requiring `&mut` access.

use std::collections::HashMap;

use crate::timeslice::Direction;
use crate::timewindow::TimeWindow;
use crate::uuid::Uuid;
use crate::AltRange;

/// One AUP-published override of a segment's conditional-route state.
#[derive(Clone, Debug)]
pub struct AupCdrOverride {
    pub segment: Uuid,
    /// The window during which this override applies; its end is the
    /// `tuntil` bound `get_altrange` reports back to callers.
    pub effective: TimeWindow,
    pub altrange: AltRange,
    pub direction: Direction,
    pub cdr: u8,
}

/// The store of AUP/CDR overrides, keyed by segment UUID.
#[derive(Clone, Debug, Default)]
pub struct ConditionalAvailability {
    overrides: HashMap<Uuid, Vec<AupCdrOverride>>,
}

impl ConditionalAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes an override. Overrides for the same segment may have
    /// disjoint or overlapping windows; `active_at` returns the first
    /// match, so overlapping overrides for the same segment should be
    /// avoided by the publisher.
    pub fn insert(&mut self, o: AupCdrOverride) {
        self.overrides.entry(o.segment).or_default().push(o);
    }

    /// The override active for `segment` at `t`, if any.
    pub fn active_at(&self, segment: Uuid, t: u64) -> Option<&AupCdrOverride> {
        self.overrides
            .get(&segment)
            .and_then(|v| v.iter().find(|o| o.effective.contains(t)))
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::altitude::AltRange;

    #[test]
    fn active_at_finds_the_window_containing_t() {
        let mut store = ConditionalAvailability::new();
        let segment = Uuid::from_name(crate::uuid::ADR_NAMESPACE, "UL602/SEG1");
        store.insert(AupCdrOverride {
            segment,
            effective: TimeWindow::new(1000, 2000),
            altrange: AltRange::full(),
            direction: Direction::BOTH,
            cdr: 3,
        });

        assert!(store.active_at(segment, 1500).is_some());
        assert!(store.active_at(segment, 2500).is_none());
    }
}
