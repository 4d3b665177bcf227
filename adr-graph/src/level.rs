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

//! The per-edge flight-level grid `spec.md` §4.6 evaluates metrics at.
//!
//! `spec.md` leaves `base`/`Δ` as query parameters of `set_metric_seg` and
//! `set_metric_dct`, while `RouteSegmentTimeSlice::levels` (§3.3) independently
//! stores "the flight levels ... the containing graph build should evaluate
//! metrics at". `DESIGN.md` resolves this by grounding the per-edge grid in
//! the segment's own `levels` field when it declares one (a sparse set of
//! support points, as a published segment typically only needs checking at
//! its published levels) and falling back to a uniform `base + i*step` grid
//! sized to the query's `levels` count otherwise — the case that applies to
//! DCT edges, which carry no stored level list at all.

/// An ascending, deduplicated list of flight levels (feet) at which a
/// [`crate::edge::GraphEdge`]'s metric array is indexed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGrid {
    levels: Vec<i32>,
}

impl LevelGrid {
    /// A uniform grid `base, base+step, ..., base+(count-1)*step`.
    pub fn uniform(base: i32, step: i32, count: usize) -> Self {
        Self {
            levels: (0..count as i32).map(|i| base + i * step).collect(),
        }
    }

    /// An explicit, caller-supplied grid, canonicalized by sorting and
    /// deduplicating.
    pub fn explicit(mut levels: Vec<i32>) -> Self {
        levels.sort_unstable();
        levels.dedup();
        Self { levels }
    }

    /// Picks the segment's own declared levels when non-empty, else a
    /// uniform grid sized `count`.
    pub fn for_segment(declared: &[i32], base: i32, step: i32, count: usize) -> Self {
        if declared.is_empty() {
            Self::uniform(base, step, count)
        } else {
            Self::explicit(declared.to_vec())
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn alt(&self, i: usize) -> Option<i32> {
        self.levels.get(i).copied()
    }

    pub fn levels(&self) -> &[i32] {
        &self.levels
    }

    /// The index of `alt` in the grid, if present.
    pub fn index_of(&self, alt: i32) -> Option<usize> {
        self.levels.binary_search(&alt).ok()
    }

    /// Picks `declared` (canonicalized) when non-empty, else clones `self` —
    /// the per-edge variant of [`Self::for_segment`], used by `Graph::add`
    /// (`spec.md` §4.5) against the query's own default grid rather than a
    /// freshly-specified `base`/`step`/`count`.
    pub fn resolve(&self, declared: &[i32]) -> Self {
        if declared.is_empty() {
            self.clone()
        } else {
            Self::explicit(declared.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_grid_steps_from_base() {
        let grid = LevelGrid::uniform(18000, 1000, 5);
        assert_eq!(grid.levels(), &[18000, 19000, 20000, 21000, 22000]);
    }

    #[test]
    fn explicit_grid_sorts_and_dedups() {
        let grid = LevelGrid::explicit(vec![24000, 18000, 18000, 20000]);
        assert_eq!(grid.levels(), &[18000, 20000, 24000]);
    }

    #[test]
    fn for_segment_prefers_declared_levels() {
        let grid = LevelGrid::for_segment(&[18000, 19000], 0, 1000, 10);
        assert_eq!(grid.len(), 2);
        let fallback = LevelGrid::for_segment(&[], 0, 1000, 3);
        assert_eq!(fallback.levels(), &[0, 1000, 2000]);
    }

    #[test]
    fn resolve_falls_back_to_self_when_undeclared() {
        let default_grid = LevelGrid::uniform(18000, 1000, 4);
        assert_eq!(default_grid.resolve(&[]), default_grid);
        assert_eq!(default_grid.resolve(&[20000]), LevelGrid::explicit(vec![20000]));
    }

    #[test]
    fn index_of_finds_members_only() {
        let grid = LevelGrid::uniform(18000, 1000, 3);
        assert_eq!(grid.index_of(19000), Some(1));
        assert_eq!(grid.index_of(19500), None);
    }
}
