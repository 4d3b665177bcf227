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

//! Point-like time slice variants: idents, coordinates, navaids, airports.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geom::Coordinate;
use crate::link::Link;

/// A tiny hand-rolled bitflag type: `bitflags!` is overkill for a 4-bit
/// field and the teacher lineage doesn't depend on the `bitflags` crate.
macro_rules! bitflags_like_flags {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $repr:ty {
            $(const $variant:ident = $value:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name($repr);

        impl $name {
            $(pub const $variant: Self = Self($value);)*

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn bits(self) -> $repr {
                self.0
            }

            pub const fn from_bits(bits: $repr) -> Self {
                Self(bits)
            }

            pub fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }
    };
}

/// Unknown elevation sentinel (feet).
pub const ELEV_UNKNOWN: i32 = i32::MIN;

/// Carries only an identifier string.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentTimeSlice {
    pub ident: String,
}

/// Ident plus a geographic coordinate.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointIdentTimeSlice {
    pub ident: String,
    pub coordinate: Coordinate,
}

/// Adds elevation in feet (`ELEV_UNKNOWN` = unknown).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElevPointIdentTimeSlice {
    pub ident: String,
    pub coordinate: Coordinate,
    pub elevation: i32,
}

bitflags_like_flags! {
    /// Airport capability flags.
    pub struct AirportFlags: u8 {
        const CIV = 0b0001;
        const MIL = 0b0010;
        const DEPIFR = 0b0100;
        const ARRIFR = 0b1000;
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AirportTimeSlice {
    pub ident: String,
    pub coordinate: Coordinate,
    pub elevation: i32,
    pub name: String,
    pub iata: String,
    pub served_cities: Vec<String>,
    pub flags: AirportFlags,
}

impl AirportTimeSlice {
    pub fn is_civ(&self) -> bool {
        self.flags.contains(AirportFlags::CIV)
    }
    pub fn is_mil(&self) -> bool {
        self.flags.contains(AirportFlags::MIL)
    }
    pub fn is_depifr(&self) -> bool {
        self.flags.contains(AirportFlags::DEPIFR)
    }
    pub fn is_arrifr(&self) -> bool {
        self.flags.contains(AirportFlags::ARRIFR)
    }
}

/// Navigation aid type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavaidKind {
    Vor,
    VorDme,
    Vortac,
    Tacan,
    Dme,
    Ndb,
    NdbDme,
    Ils,
    Loc,
    Marker,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavaidTimeSlice {
    pub ident: String,
    pub coordinate: Coordinate,
    pub elevation: i32,
    pub kind: NavaidKind,
    pub frequency_khz: u32,
    pub range_nm: f32,
}

impl Default for NavaidTimeSlice {
    fn default() -> Self {
        Self {
            ident: String::new(),
            coordinate: Coordinate::default(),
            elevation: ELEV_UNKNOWN,
            kind: NavaidKind::Vor,
            frequency_khz: 0,
            range_nm: 0.0,
        }
    }
}

/// How a designated point's identity was established.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DesignatedPointKind {
    Icao,
    Terminal,
    CoordDerived,
    AdrBoundary,
    User,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DesignatedPointTimeSlice {
    pub ident: String,
    pub coordinate: Coordinate,
    pub kind: DesignatedPointKind,
    /// The airport this point belongs to, for SID/STAR connection points.
    pub airport: Option<Link>,
}

impl Default for DesignatedPointTimeSlice {
    fn default() -> Self {
        Self {
            ident: String::new(),
            coordinate: Coordinate::default(),
            kind: DesignatedPointKind::User,
            airport: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airport_flags_combine() {
        let flags = AirportFlags::CIV | AirportFlags::DEPIFR;
        assert!(flags.contains(AirportFlags::CIV));
        assert!(flags.contains(AirportFlags::DEPIFR));
        assert!(!flags.contains(AirportFlags::MIL));
    }

    #[test]
    fn elevation_unknown_sentinel() {
        let slice = ElevPointIdentTimeSlice::default();
        assert_eq!(slice.elevation, 0, "default is 0, not unknown, by design");
        let navaid = NavaidTimeSlice::default();
        assert_eq!(navaid.elevation, ELEV_UNKNOWN);
    }
}
