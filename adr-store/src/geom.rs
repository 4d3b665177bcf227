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

//! Geographic coordinates, stored in memory as `f64` degrees but archived
//! on disk as fixed-point 32-bit integers per `spec.md` §6.1.

use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-point scale: one unit is 1e-7 degrees (~1.1 cm at the equator).
const FIXED_POINT_SCALE: f64 = 1e7;

/// A geographic coordinate.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// Latitude in degrees, -90 (south) to 90 (north).
    pub latitude: f64,
    /// Longitude in degrees, -180 (west) to 180 (east).
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// The `Point::invalid` sentinel: encodes to `(INT32_MIN, INT32_MIN)`.
    pub fn invalid() -> Self {
        Self {
            latitude: f64::NAN,
            longitude: f64::NAN,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.latitude.is_nan() && !self.longitude.is_nan()
    }

    /// Encodes to the fixed-point 32-bit wire representation.
    pub fn to_fixed(self) -> (i32, i32) {
        if !self.is_valid() {
            return (i32::MIN, i32::MIN);
        }
        (
            (self.latitude * FIXED_POINT_SCALE).round() as i32,
            (self.longitude * FIXED_POINT_SCALE).round() as i32,
        )
    }

    /// Decodes from the fixed-point 32-bit wire representation.
    pub fn from_fixed(lat: i32, lon: i32) -> Self {
        if lat == i32::MIN && lon == i32::MIN {
            return Self::invalid();
        }
        Self {
            latitude: lat as f64 / FIXED_POINT_SCALE,
            longitude: lon as f64 / FIXED_POINT_SCALE,
        }
    }
}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "invalid");
        }
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(p: geo::Point<f64>) -> Self {
        Self {
            latitude: p.y(),
            longitude: p.x(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_roundtrip() {
        let c = Coordinate::new(53.63, 9.99);
        let (lat, lon) = c.to_fixed();
        let back = Coordinate::from_fixed(lat, lon);
        assert!((back.latitude - c.latitude).abs() < 1e-6);
        assert!((back.longitude - c.longitude).abs() < 1e-6);
    }

    #[test]
    fn invalid_roundtrips_through_sentinel() {
        let (lat, lon) = Coordinate::invalid().to_fixed();
        assert_eq!((lat, lon), (i32::MIN, i32::MIN));
        assert!(!Coordinate::from_fixed(lat, lon).is_valid());
    }
}
