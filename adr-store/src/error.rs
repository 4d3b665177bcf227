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

use std::fmt;
use std::io;

use crate::uuid::Uuid;

/// Errors produced by the object store and archive codec.
#[derive(Debug)]
pub enum Error {
    /// A UUID is not present in the store.
    NotFound(Uuid),
    /// A resolved link points at an object that does not exist.
    DanglingLink(Uuid),
    /// An archive byte stream starts with an unknown object type tag.
    BadTypeTag(u8),
    /// An archive byte stream ended in the middle of an object.
    TruncatedArchive,
    /// A time slice could not be reconciled with the object's existing slices.
    OverlapViolation,
    /// Graph construction at a given instant produced zero edges.
    ///
    /// This is reported back to callers as a warning, not treated as fatal;
    /// see `spec.md` §7.
    TopologyEmpty,
    /// The underlying store directory could not be read or written.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(uuid) => write!(f, "object {uuid} not found"),
            Self::DanglingLink(uuid) => write!(f, "dangling link to {uuid}"),
            Self::BadTypeTag(tag) => write!(f, "unknown object type tag {tag}"),
            Self::TruncatedArchive => write!(f, "archive ended before object was fully read"),
            Self::OverlapViolation => {
                write!(f, "time slice could not be reconciled with existing slices")
            }
            Self::TopologyEmpty => write!(f, "graph construction produced zero edges"),
            Self::Io(msg) => write!(f, "store I/O error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::TruncatedArchive
        } else {
            Self::Io(e.to_string())
        }
    }
}
