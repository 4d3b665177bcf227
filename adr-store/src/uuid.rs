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

//! 128-bit object identity.
//!
//! Every [`Object`](crate::Object) is addressed by a [`Uuid`]. Two fixed
//! namespaces let any unstructured string be turned into a deterministic
//! identifier via RFC 4122 v5 (SHA-1) derivation, mirroring
//! `original_source/cfmu/adr.cc`.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Namespace UUID used to derive ADR object identifiers from arbitrary
/// strings (idents, designators, ...).
pub const ADR_NAMESPACE: Uuid = Uuid(uuid::Uuid::from_u128(0x5b20bd56_738d_47cb_b1ea_300f317e8b32));

/// Namespace UUID used to derive country-border identifiers, kept distinct
/// from [`ADR_NAMESPACE`] so the two id spaces never collide.
pub const COUNTRY_BORDER_NAMESPACE: Uuid =
    Uuid(uuid::Uuid::from_u128(0x00fff6f3_fff5_4374_963b_0b8f113422b9));

/// A 128-bit object identifier.
///
/// Ordering is lexicographic on the 16 underlying bytes. The nil UUID
/// ([`Uuid::nil`]) signals "absent" throughout the object model.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Uuid(uuid::Uuid);

impl Uuid {
    /// The nil UUID, used to signal "absent".
    pub const fn nil() -> Self {
        Self(uuid::Uuid::nil())
    }

    /// Returns `true` if this is the nil UUID.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Returns the 16 raw bytes, in RFC 4122 big-endian field layout.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Builds a UUID from its 16 raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Uuid::from_bytes(bytes))
    }

    /// Derives a UUID from `(namespace, name)` using RFC 4122 v5 (SHA-1)
    /// semantics. Deterministic: depends only on `(namespace, name)` and is
    /// byte-identical across runs and platforms.
    pub fn from_name(namespace: Uuid, name: &str) -> Self {
        Self(uuid::Uuid::new_v5(&namespace.0, name.as_bytes()))
    }

    /// Parses `s` as a canonical-hex UUID (optionally `urn:uuid:`-prefixed);
    /// on failure, derives a deterministic identifier from `s` under
    /// [`ADR_NAMESPACE`]. Every string therefore yields *some* UUID.
    pub fn from_unstructured(s: &str) -> Self {
        let stripped = s.strip_prefix("urn:uuid:").unwrap_or(s);
        match uuid::Uuid::parse_str(stripped) {
            Ok(u) if !u.is_nil() => Self(u),
            _ => Self::from_name(ADR_NAMESPACE, stripped),
        }
    }

    /// Derives a country-border identifier from `s` under
    /// [`COUNTRY_BORDER_NAMESPACE`].
    pub fn from_countryborder(s: &str) -> Self {
        Self::from_name(COUNTRY_BORDER_NAMESPACE, s)
    }

    /// Renders the canonical hex form, optionally `urn:uuid:`-prefixed.
    pub fn to_str(&self, prefix: bool) -> String {
        if prefix {
            format!("urn:uuid:{}", self.0)
        } else {
            self.0.to_string()
        }
    }
}

impl FromStr for Uuid {
    type Err = std::convert::Infallible;

    /// Always succeeds: falls back to name-based derivation on parse failure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_unstructured(s))
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_is_absent() {
        assert!(Uuid::nil().is_nil());
        assert_eq!(Uuid::default(), Uuid::nil());
    }

    #[test]
    fn roundtrip_canonical_hex() {
        let u = Uuid::from_name(ADR_NAMESPACE, "EDDF");
        let s = u.to_str(false);
        assert_eq!(s.parse::<Uuid>().unwrap(), u);
    }

    #[test]
    fn roundtrip_urn_prefixed() {
        let u = Uuid::from_name(ADR_NAMESPACE, "EDDH");
        let s = u.to_str(true);
        assert_eq!(s.parse::<Uuid>().unwrap(), u);
    }

    /// S2. UUID derivation must be byte-identical across platforms.
    #[test]
    fn derivation_is_deterministic_for_known_vector() {
        let u = Uuid::from_name(ADR_NAMESPACE, "EDDF");
        // Precomputed: UUIDv5(ADR_NAMESPACE, "EDDF").
        assert_eq!(u.to_str(false), "3313b4b8-f90a-5ee9-bcdc-c7b813ecfd94");
    }

    #[test]
    fn derivation_depends_only_on_namespace_and_name() {
        let a = Uuid::from_name(ADR_NAMESPACE, "EDDF");
        let b = Uuid::from_name(ADR_NAMESPACE, "EDDF");
        assert_eq!(a, b);
        let c = Uuid::from_name(COUNTRY_BORDER_NAMESPACE, "EDDF");
        assert_ne!(a, c, "different namespace must not collide");
    }

    #[test]
    fn unstructured_prefers_hex_parse_over_derivation() {
        let hex = "5b20bd56-738d-47cb-b1ea-300f317e8b32";
        assert_eq!(Uuid::from_unstructured(hex), ADR_NAMESPACE);
    }

    #[test]
    fn unstructured_falls_back_to_derivation() {
        let u = Uuid::from_unstructured("not-a-uuid");
        assert_eq!(u, Uuid::from_name(ADR_NAMESPACE, "not-a-uuid"));
    }

    #[test]
    fn ordering_is_lexicographic_on_bytes() {
        let a = Uuid::from_bytes([0; 16]);
        let mut b_bytes = [0u8; 16];
        b_bytes[15] = 1;
        let b = Uuid::from_bytes(b_bytes);
        assert!(a < b);
    }
}
