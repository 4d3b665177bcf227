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

//! Altitude-interval algebra: [`AltRange`] half-open bands with mode-aware
//! merge/intersect, and [`IntervalSet`], the canonical lattice used to
//! evaluate per-level edge validity.

mod alt_range;
mod interval_set;

pub use alt_range::{AltMode, AltRange, ALT_IGNORE, ALT_INVALID, ALT_MAX};
pub use interval_set::{Interval, IntervalSet};
