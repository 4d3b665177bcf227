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

//! Lazy, resolvable references between objects.

use std::fmt;

use crate::object::ObjectRef;
use crate::uuid::Uuid;

/// A lazily-resolvable reference to another [`Object`](crate::Object).
///
/// A link in state *unresolved* knows only the target's [`Uuid`]; in state
/// *resolved* it additionally owns a shared reference to the target. The
/// two-state encoding is kept explicit (not collapsed to a single pointer)
/// because the dependency visitor must be able to walk the UUIDs of
/// as-yet-unloaded peers.
#[derive(Clone, Default)]
pub struct Link {
    uuid: Uuid,
    target: Option<ObjectRef>,
}

impl Link {
    /// Creates an unresolved link to `uuid`.
    pub fn unresolved(uuid: Uuid) -> Self {
        Self { uuid, target: None }
    }

    /// Creates a resolved link directly to `target`.
    pub fn resolved(target: ObjectRef) -> Self {
        let uuid = target.borrow().uuid();
        Self {
            uuid,
            target: Some(target),
        }
    }

    /// Creates the nil link, which is always trivially "resolved" to nothing.
    pub fn nil() -> Self {
        Self {
            uuid: Uuid::nil(),
            target: None,
        }
    }

    /// The UUID of the link's target, whether or not it is resolved.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// `true` if the link has not yet been resolved to a target object.
    pub fn is_unresolved(&self) -> bool {
        !self.uuid.is_nil() && self.target.is_none()
    }

    /// The resolved target, if any.
    pub fn target(&self) -> Option<&ObjectRef> {
        self.target.as_ref()
    }

    /// Resolves the link to `target`. Idempotent: resolving an
    /// already-resolved link simply replaces the cached reference (the
    /// Database never resolves to a different UUID than the one already
    /// stored).
    pub fn resolve(&mut self, target: ObjectRef) {
        debug_assert_eq!(target.borrow().uuid(), self.uuid);
        self.target = Some(target);
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("uuid", &self.uuid)
            .field("resolved", &self.target.is_some())
            .finish()
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for Link {}

/// A set of [`Link`]s with the invariant that no two members share the same
/// target UUID.
///
/// Inserting a resolved link whose UUID is already present as an unresolved
/// member upgrades the existing element in place — it never replaces a
/// resolved member with an unresolved one.
#[derive(Clone, Debug, Default)]
pub struct LinkSet {
    links: Vec<Link>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `link`, upgrading an existing unresolved member in place if
    /// one shares the same UUID.
    pub fn insert(&mut self, link: Link) {
        if let Some(existing) = self.links.iter_mut().find(|l| l.uuid == link.uuid) {
            if existing.target.is_none() {
                existing.target = link.target;
            }
            return;
        }
        self.links.push(link);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// `true` if any member of the set is still unresolved.
    pub fn has_unlinked(&self) -> bool {
        self.links.iter().any(Link::is_unresolved)
    }
}

impl FromIterator<Link> for LinkSet {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        let mut set = Self::new();
        for link in iter {
            set.insert(link);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn obj(uuid: Uuid) -> ObjectRef {
        Rc::new(RefCell::new(Object::new(uuid)))
    }

    #[test]
    fn unresolved_link_reports_is_unresolved() {
        let uuid = Uuid::from_name(crate::uuid::ADR_NAMESPACE, "EDDF");
        let link = Link::unresolved(uuid);
        assert!(link.is_unresolved());
        assert!(link.target().is_none());
    }

    #[test]
    fn resolve_upgrades_in_place() {
        let uuid = Uuid::from_name(crate::uuid::ADR_NAMESPACE, "EDDF");
        let mut link = Link::unresolved(uuid);
        link.resolve(obj(uuid));
        assert!(!link.is_unresolved());
        assert_eq!(link.target().unwrap().borrow().uuid(), uuid);
    }

    #[test]
    fn linkset_upgrades_instead_of_replacing() {
        let uuid = Uuid::from_name(crate::uuid::ADR_NAMESPACE, "EDDH");
        let mut set = LinkSet::new();
        set.insert(Link::unresolved(uuid));
        assert!(set.has_unlinked());

        set.insert(Link::resolved(obj(uuid)));
        assert_eq!(set.len(), 1, "must upgrade, not duplicate");
        assert!(!set.has_unlinked());
    }

    #[test]
    fn linkset_has_unlinked_reflects_any_member() {
        let a = Uuid::from_name(crate::uuid::ADR_NAMESPACE, "A");
        let b = Uuid::from_name(crate::uuid::ADR_NAMESPACE, "B");
        let mut set = LinkSet::new();
        set.insert(Link::resolved(obj(a)));
        assert!(!set.has_unlinked());
        set.insert(Link::unresolved(b));
        assert!(set.has_unlinked());
    }
}
