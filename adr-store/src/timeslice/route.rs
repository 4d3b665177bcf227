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

//! Route and standard-instrument-procedure (SID/STAR) time slices.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::link::{Link, LinkSet};

/// A named airway or DCT route. `spec.md` §4.5: the graph only registers
/// the ident -> object mapping for these; edges come from their segments.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteTimeSlice {
    pub ident: String,
}

/// Whether a SID/STAR is published and usable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProcedureStatus {
    #[default]
    Active,
    Withdrawn,
}

/// Whether a standard instrument procedure is a departure or an arrival.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProcedureKind {
    Sid,
    Star,
}

/// A SID or STAR (`spec.md` §3.3). Distinguished by `kind` rather than by
/// separate slice variants, since the two share every field except `iaf`
/// (only meaningful for a STAR).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StandardInstrumentTimeSlice {
    pub airport: Link,
    pub ident: String,
    pub kind: ProcedureKind,
    /// The points at which this procedure connects to the en-route
    /// structure (`spec.md` §4.5: "recursively add ... every connection
    /// point").
    pub connection_points: LinkSet,
    /// The initial approach fix, present only on a STAR.
    pub iaf: Option<Link>,
    pub status: ProcedureStatus,
}

impl Default for StandardInstrumentTimeSlice {
    fn default() -> Self {
        Self {
            airport: Link::nil(),
            ident: String::new(),
            kind: ProcedureKind::Sid,
            connection_points: LinkSet::new(),
            iaf: None,
            status: ProcedureStatus::Active,
        }
    }
}

impl StandardInstrumentTimeSlice {
    pub fn is_sid(&self) -> bool {
        matches!(self.kind, ProcedureKind::Sid)
    }

    pub fn is_star(&self) -> bool {
        matches!(self.kind, ProcedureKind::Star)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sid_and_star_distinguished_by_kind() {
        let mut sid = StandardInstrumentTimeSlice {
            kind: ProcedureKind::Sid,
            ..Default::default()
        };
        assert!(sid.is_sid());
        assert!(!sid.is_star());

        sid.kind = ProcedureKind::Star;
        assert!(sid.is_star());
    }
}
