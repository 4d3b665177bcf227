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

//! Airspace structure and the flight restrictions attached to it
//! (`spec.md` §3.3, "FlightRestrictionTimeSlice, AirspaceTimeSlice, etc.").

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rstar::AABB;

use crate::altitude::AltRange;
use crate::geom::Coordinate;
use crate::link::LinkSet;

/// ICAO airspace classification.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AirspaceClass {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Airspace type: structural designation or special-use restriction.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AirspaceType {
    /// Control Area.
    Cta,
    /// Control Zone.
    Ctr,
    /// Terminal Control Area.
    Tma,
    /// Restricted area.
    Restricted,
    /// Danger area.
    Danger,
    /// Prohibited area.
    Prohibited,
}

/// A published airspace volume: a 2D polygon boundary plus a vertical
/// extent, used during routing to exclude or constrain segments that pass
/// through it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AirspaceTimeSlice {
    pub ident: String,
    pub class: AirspaceClass,
    pub kind: AirspaceType,
    pub altrange: AltRange,
    pub boundary: Vec<Coordinate>,
}

impl Default for AirspaceTimeSlice {
    fn default() -> Self {
        Self {
            ident: String::new(),
            class: AirspaceClass::G,
            kind: AirspaceType::Cta,
            altrange: AltRange::invalid(),
            boundary: Vec::new(),
        }
    }
}

impl AirspaceTimeSlice {
    pub fn envelope(&self) -> AABB<geo::Point<f64>> {
        let (mut min_lat, mut min_lon) = (f64::MAX, f64::MAX);
        let (mut max_lat, mut max_lon) = (f64::MIN, f64::MIN);
        for c in &self.boundary {
            min_lat = min_lat.min(c.latitude);
            min_lon = min_lon.min(c.longitude);
            max_lat = max_lat.max(c.latitude);
            max_lon = max_lon.max(c.longitude);
        }
        AABB::from_corners(
            Coordinate::new(min_lat, min_lon).into(),
            Coordinate::new(max_lat, max_lon).into(),
        )
    }
}

/// A flight restriction: a named rule that excludes or conditions a set of
/// segments/airspaces within an altitude band, independent of the segments'
/// own CDR availabilities (`spec.md` §1, "airspace restrictions").
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightRestrictionTimeSlice {
    pub ident: String,
    pub altrange: AltRange,
    /// The airspaces and/or segments the restriction applies to.
    pub regulated: LinkSet,
    pub excluding: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airspace_envelope_covers_all_boundary_points() {
        let a = AirspaceTimeSlice {
            boundary: vec![
                Coordinate::new(53.0, 9.0),
                Coordinate::new(54.0, 10.0),
            ],
            ..Default::default()
        };
        let env = a.envelope();
        assert!(env.contains_point(&Coordinate::new(53.5, 9.5).into()));
    }
}
