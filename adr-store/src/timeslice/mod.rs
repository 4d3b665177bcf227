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

//! The polymorphic time slice hierarchy (`spec.md` §3.3).
//!
//! A [`TimeSlice`] is a time window plus a [`TimeSliceData`] payload. The
//! payload is a tagged union (`enum`), not a trait object: the original's
//! `as_segment`/`as_sid`/... downcasts, which returned references to a
//! global sentinel "invalid" instance when the variant didn't match,
//! become `Option<&Variant>` accessors here (`spec.md` §9, "Polymorphism
//! without inheritance") — total, but without requiring a `'static`
//! sentinel that would otherwise have to hold a non-`Sync` `Rc` link.

pub mod point;
pub mod restriction;
pub mod route;
pub mod segment;

pub use point::{
    AirportFlags, AirportTimeSlice, DesignatedPointKind, DesignatedPointTimeSlice,
    ElevPointIdentTimeSlice, IdentTimeSlice, NavaidKind, NavaidTimeSlice, PointIdentTimeSlice,
    ELEV_UNKNOWN,
};
pub use restriction::{AirspaceClass, AirspaceTimeSlice, AirspaceType, FlightRestrictionTimeSlice};
pub use route::{ProcedureKind, ProcedureStatus, RouteTimeSlice, StandardInstrumentTimeSlice};
pub use segment::{
    ArrivalLegTimeSlice, Availability, AvailabilityStatus, DepartureLegTimeSlice, Direction,
    RouteSegmentTimeSlice, SegmentTimeSlice,
};

use crate::timewindow::TimeWindow;

/// Object-store type tag (`spec.md` §4.3). Only the variants this crate
/// implements are enumerated; an on-disk tag outside this set — including
/// ones the original's richer AIXM object model defines but that are out
/// of this core's scope (organisation/authority, ATM service, special
/// date, standard level table, unit, angle/distance indication,
/// airport-collocation) — fails to decode with [`crate::Error::BadTypeTag`]
/// rather than silently mapping to an adjacent tag.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum TypeTag {
    Invalid = 0,
    Airport = 1,
    Navaid = 2,
    DesignatedPoint = 3,
    Sid = 4,
    Star = 5,
    Route = 6,
    FlightRestriction = 7,
    DepartureLeg = 8,
    ArrivalLeg = 9,
    RouteSegment = 10,
    Airspace = 11,
}

impl TypeTag {
    pub fn from_u8(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::Invalid,
            1 => Self::Airport,
            2 => Self::Navaid,
            3 => Self::DesignatedPoint,
            4 => Self::Sid,
            5 => Self::Star,
            6 => Self::Route,
            7 => Self::FlightRestriction,
            8 => Self::DepartureLeg,
            9 => Self::ArrivalLeg,
            10 => Self::RouteSegment,
            11 => Self::Airspace,
            _ => return None,
        })
    }
}

/// The variant payload of a [`TimeSlice`].
#[derive(Clone, Debug)]
pub enum TimeSliceData {
    Invalid,
    Ident(IdentTimeSlice),
    PointIdent(PointIdentTimeSlice),
    ElevPointIdent(ElevPointIdentTimeSlice),
    Airport(AirportTimeSlice),
    Navaid(NavaidTimeSlice),
    DesignatedPoint(DesignatedPointTimeSlice),
    DepartureLeg(DepartureLegTimeSlice),
    ArrivalLeg(ArrivalLegTimeSlice),
    RouteSegment(RouteSegmentTimeSlice),
    Route(RouteTimeSlice),
    StandardInstrument(StandardInstrumentTimeSlice),
    FlightRestriction(FlightRestrictionTimeSlice),
    Airspace(AirspaceTimeSlice),
}

impl Default for TimeSliceData {
    fn default() -> Self {
        Self::Invalid
    }
}

impl TimeSliceData {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Invalid | Self::Ident(_) | Self::PointIdent(_) | Self::ElevPointIdent(_) => {
                TypeTag::Invalid
            }
            Self::Airport(_) => TypeTag::Airport,
            Self::Navaid(_) => TypeTag::Navaid,
            Self::DesignatedPoint(_) => TypeTag::DesignatedPoint,
            Self::DepartureLeg(_) => TypeTag::DepartureLeg,
            Self::ArrivalLeg(_) => TypeTag::ArrivalLeg,
            Self::RouteSegment(_) => TypeTag::RouteSegment,
            Self::Route(_) => TypeTag::Route,
            Self::StandardInstrument(s) if s.is_sid() => TypeTag::Sid,
            Self::StandardInstrument(_) => TypeTag::Star,
            Self::FlightRestriction(_) => TypeTag::FlightRestriction,
            Self::Airspace(_) => TypeTag::Airspace,
        }
    }

    /// `true` for the point-like variants that `Graph::add` (`spec.md`
    /// §4.5) turns into a vertex rather than an edge.
    pub fn is_point_like(&self) -> bool {
        matches!(
            self,
            Self::Airport(_) | Self::Navaid(_) | Self::DesignatedPoint(_)
        )
    }

    /// `true` for the segment-like variants `Graph::add` turns into one or
    /// two directed edges.
    pub fn is_segment_like(&self) -> bool {
        matches!(
            self,
            Self::DepartureLeg(_) | Self::ArrivalLeg(_) | Self::RouteSegment(_)
        )
    }

    pub fn as_segment(&self) -> Option<&SegmentTimeSlice> {
        match self {
            Self::DepartureLeg(d) => Some(&d.segment),
            Self::ArrivalLeg(a) => Some(&a.segment),
            Self::RouteSegment(r) => Some(&r.segment),
            _ => None,
        }
    }

    pub fn as_routesegment(&self) -> Option<&RouteSegmentTimeSlice> {
        match self {
            Self::RouteSegment(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_departureleg(&self) -> Option<&DepartureLegTimeSlice> {
        match self {
            Self::DepartureLeg(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_arrivalleg(&self) -> Option<&ArrivalLegTimeSlice> {
        match self {
            Self::ArrivalLeg(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_airport(&self) -> Option<&AirportTimeSlice> {
        match self {
            Self::Airport(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_navaid(&self) -> Option<&NavaidTimeSlice> {
        match self {
            Self::Navaid(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_designatedpoint(&self) -> Option<&DesignatedPointTimeSlice> {
        match self {
            Self::DesignatedPoint(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_route(&self) -> Option<&RouteTimeSlice> {
        match self {
            Self::Route(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sid(&self) -> Option<&StandardInstrumentTimeSlice> {
        match self {
            Self::StandardInstrument(s) if s.is_sid() => Some(s),
            _ => None,
        }
    }

    pub fn as_star(&self) -> Option<&StandardInstrumentTimeSlice> {
        match self {
            Self::StandardInstrument(s) if s.is_star() => Some(s),
            _ => None,
        }
    }

    pub fn as_flightrestriction(&self) -> Option<&FlightRestrictionTimeSlice> {
        match self {
            Self::FlightRestriction(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_airspace(&self) -> Option<&AirspaceTimeSlice> {
        match self {
            Self::Airspace(a) => Some(a),
            _ => None,
        }
    }

    /// The coordinate of any point-like or segment-endpoint-bearing
    /// variant, where one exists directly on the slice (airports, navaids,
    /// designated points). Segment endpoints are reached through their
    /// `start`/`end` links instead, since a segment has two coordinates.
    pub fn coordinate(&self) -> Option<crate::geom::Coordinate> {
        match self {
            Self::PointIdent(p) => Some(p.coordinate),
            Self::ElevPointIdent(p) => Some(p.coordinate),
            Self::Airport(a) => Some(a.coordinate),
            Self::Navaid(n) => Some(n.coordinate),
            Self::DesignatedPoint(d) => Some(d.coordinate),
            _ => None,
        }
    }
}

/// One time-bounded state of an [`Object`](crate::object::Object).
#[derive(Clone, Debug, Default)]
pub struct TimeSlice {
    pub window: TimeWindow,
    pub data: TimeSliceData,
}

impl TimeSlice {
    pub fn new(window: TimeWindow, data: TimeSliceData) -> Self {
        Self { window, data }
    }

    pub fn starttime(&self) -> u64 {
        self.window.start
    }

    pub fn endtime(&self) -> u64 {
        self.window.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tag_roundtrips_through_u8() {
        for tag in [
            TypeTag::Invalid,
            TypeTag::Airport,
            TypeTag::Navaid,
            TypeTag::DesignatedPoint,
            TypeTag::Sid,
            TypeTag::Star,
            TypeTag::Route,
            TypeTag::FlightRestriction,
            TypeTag::DepartureLeg,
            TypeTag::ArrivalLeg,
            TypeTag::RouteSegment,
            TypeTag::Airspace,
        ] {
            assert_eq!(TypeTag::from_u8(tag as u8), Some(tag));
        }
        assert_eq!(TypeTag::from_u8(200), None);
    }

    #[test]
    fn as_segment_is_total_across_the_three_segment_variants() {
        let route_segment = TimeSliceData::RouteSegment(RouteSegmentTimeSlice::default());
        assert!(route_segment.as_segment().is_some());

        let airport = TimeSliceData::Airport(AirportTimeSlice::default());
        assert!(airport.as_segment().is_none());
    }

    #[test]
    fn sid_and_star_share_a_variant_but_downcast_distinctly() {
        let sid = TimeSliceData::StandardInstrument(StandardInstrumentTimeSlice {
            kind: ProcedureKind::Sid,
            ..Default::default()
        });
        assert!(sid.as_sid().is_some());
        assert!(sid.as_star().is_none());
        assert_eq!(sid.type_tag(), TypeTag::Sid);
    }
}
