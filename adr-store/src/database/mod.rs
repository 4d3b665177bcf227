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

//! The UUID-addressed object store (`spec.md` §4.2, §4.9).

mod codec;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

use crate::availability::ConditionalAvailability;
use crate::error::Error;
use crate::object::ObjectRef;
use crate::timeslice::{AirportFlags, TypeTag};
use crate::uuid::Uuid;

/// How deep `find_all`/`find_dependson` resolve the `Link`s reachable from
/// the objects they return (`spec.md` §4.2).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LoadMode {
    /// Leave every link unresolved; callers get UUIDs only.
    LinkNone,
    /// Resolve one level of links.
    Link,
    /// Resolve links transitively.
    Deep,
}

/// `Database::open` configuration (`SPEC_FULL.md` §2 ambient stack).
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub dir: PathBuf,
    /// When `false`, `save` skips fsync — set via [`Database::sync_off`]
    /// for bulk-load scenarios.
    pub durability: bool,
}

impl StoreConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            durability: true,
        }
    }
}

type BboxIndex = RTree<GeomWithData<Rectangle<geo::Point<f64>>, Uuid>>;

/// The UUID-addressed, content-addressed object store.
///
/// Not `Send`/`Sync`: objects are held behind `Rc<RefCell<_>>`
/// (`spec.md` §5). A multi-threaded consumer owns one `Database` per
/// thread.
pub struct Database {
    config: StoreConfig,
    objects: HashMap<Uuid, ObjectRef>,
    /// `target -> {sources that reference it}`, rebuilt by `recompute`.
    reverse_deps: HashMap<Uuid, HashSet<Uuid>>,
    bbox_index: BboxIndex,
    pub conditional_availability: ConditionalAvailability,
}

fn archive_path(dir: &Path, uuid: Uuid) -> PathBuf {
    dir.join(format!("{}.adr", uuid.to_str(false)))
}

impl Database {
    /// Opens the store, eagerly loading every archive file found in
    /// `config.dir` (`SPEC_FULL.md` §4.9).
    pub fn open(config: StoreConfig) -> Result<Self, Error> {
        let mut objects = HashMap::new();
        if config.dir.exists() {
            for entry in std::fs::read_dir(&config.dir)? {
                let entry = entry?;
                if entry.path().extension().and_then(|e| e.to_str()) != Some("adr") {
                    continue;
                }
                let bytes = std::fs::read(entry.path())?;
                let mut cursor = &bytes[..];
                match codec::decode_object(&mut cursor) {
                    Ok(obj) => {
                        objects.insert(obj.uuid(), Rc::new(RefCell::new(obj)));
                    }
                    Err(e) => {
                        log::warn!("skipping corrupt archive {}: {e}", entry.path().display());
                    }
                }
            }
        }
        let mut db = Self {
            config,
            objects,
            reverse_deps: HashMap::new(),
            bbox_index: RTree::new(),
            conditional_availability: ConditionalAvailability::new(),
        };
        db.recompute();
        Ok(db)
    }

    /// Disables fsync-on-save for bulk-load scenarios.
    pub fn sync_off(&mut self) {
        self.config.durability = false;
    }

    /// Looks up an already-loaded object. The store loads eagerly at
    /// `open`, so a miss here is a true absence, not a lazy-load
    /// opportunity.
    pub fn load(&self, uuid: Uuid) -> Result<ObjectRef, Error> {
        self.objects.get(&uuid).cloned().ok_or(Error::NotFound(uuid))
    }

    /// Persists `obj` to the store directory, inserting or replacing it
    /// in memory.
    pub fn save(&mut self, obj: ObjectRef) -> Result<(), Error> {
        let uuid = obj.borrow().uuid();
        let mut buf = Vec::new();
        codec::encode_object(&mut buf, &obj.borrow())?;
        std::fs::create_dir_all(&self.config.dir)?;
        let path = archive_path(&self.config.dir, uuid);
        std::fs::write(&path, &buf)?;
        if self.config.durability {
            std::fs::File::open(&path)?.sync_all()?;
        }
        self.objects.insert(uuid, obj);
        Ok(())
    }

    /// Every object with at least one slice whose type tag lies in
    /// `[type_from, type_to]` and whose window overlaps `[t0, t1)`.
    /// `flags`, when the range covers `Airport`, additionally requires the
    /// slice's `AirportFlags` to be a superset of `flags` (`spec.md`
    /// §4.3's "airport uses the low nibble for sub-flags").
    ///
    /// Ordered by UUID — this is the determinism `spec.md` §5 guarantees:
    /// `Graph::add`'s vertex-add order is this result's order.
    pub fn find_all(
        &self,
        _mode: LoadMode,
        t0: u64,
        t1: u64,
        type_from: TypeTag,
        type_to: TypeTag,
        flags: u8,
    ) -> Vec<ObjectRef> {
        let lo = type_from as u8;
        let hi = type_to as u8;
        let mut result: Vec<ObjectRef> = self
            .objects
            .values()
            .filter(|obj| {
                obj.borrow().slices().iter().any(|s| {
                    s.window.overlaps(t0, t1)
                        && (lo..=hi).contains(&(s.data.type_tag() as u8))
                        && airport_subflags_match(&s.data, flags)
                })
            })
            .cloned()
            .collect();
        result.sort_by_key(|o| o.borrow().uuid());
        result
    }

    /// Every object referencing `uuid` from any slice, within `[t0, t1)`
    /// and the given type range, per the reverse-dependency index built by
    /// `recompute` (`spec.md` §4.2).
    pub fn find_dependson(
        &self,
        uuid: Uuid,
        _mode: LoadMode,
        t0: u64,
        t1: u64,
        type_from: TypeTag,
        type_to: TypeTag,
    ) -> Vec<ObjectRef> {
        let lo = type_from as u8;
        let hi = type_to as u8;
        let mut result: Vec<ObjectRef> = self
            .reverse_deps
            .get(&uuid)
            .into_iter()
            .flatten()
            .filter_map(|src| self.objects.get(src))
            .filter(|obj| {
                obj.borrow()
                    .slices()
                    .iter()
                    .any(|s| s.window.overlaps(t0, t1) && (lo..=hi).contains(&(s.data.type_tag() as u8)))
            })
            .cloned()
            .collect();
        result.sort_by_key(|o| o.borrow().uuid());
        result
    }

    /// Every segment/airspace-like object whose bounding box intersects
    /// `envelope` (`spec.md` §4.2 `find_by_bbox`, a dependency-free spatial
    /// query over the index `recompute` maintains).
    pub fn find_by_bbox(&self, envelope: &AABB<geo::Point<f64>>) -> Vec<ObjectRef> {
        let mut uuids: Vec<Uuid> = self
            .bbox_index
            .locate_in_envelope_intersecting(envelope)
            .map(|entry| entry.data)
            .collect();
        uuids.sort();
        uuids.dedup();
        uuids
            .into_iter()
            .filter_map(|u| self.objects.get(&u).cloned())
            .collect()
    }

    /// Rebuilds the reverse-dependency index and the bounding-box index
    /// from the objects currently in memory (`spec.md` §3.8 Lifecycle,
    /// `SPEC_FULL.md` §4.9). An explicit maintenance operation, distinct
    /// from querying.
    pub fn recompute(&mut self) {
        self.reverse_deps.clear();
        let mut bbox_entries = Vec::new();
        for (uuid, obj) in &self.objects {
            let obj = obj.borrow();
            for slice in obj.slices() {
                for target in codec::links_of(&slice.data) {
                    self.reverse_deps.entry(target).or_default().insert(*uuid);
                }
                if let Some(segment) = slice.data.as_segment() {
                    let rect = Rectangle::from_aabb(segment.envelope());
                    bbox_entries.push(GeomWithData::new(rect, *uuid));
                } else if let Some(airspace) = slice.data.as_airspace() {
                    let rect = Rectangle::from_aabb(airspace.envelope());
                    bbox_entries.push(GeomWithData::new(rect, *uuid));
                }
            }
        }
        self.bbox_index = RTree::bulk_load(bbox_entries);
    }
}

fn airport_subflags_match(data: &crate::timeslice::TimeSliceData, flags: u8) -> bool {
    match data.as_airport() {
        Some(a) if flags != 0 => a.flags.contains(AirportFlags::from_bits(flags)),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Coordinate;
    use crate::link::Link;
    use crate::object::new_object;
    use crate::timeslice::*;
    use crate::timewindow::TimeWindow;
    use crate::uuid::ADR_NAMESPACE;
    use tempfile_like::TempDir;

    // A tiny dependency-free temp-dir helper: the crate avoids pulling in
    // `tempfile` purely for this one test module.
    mod tempfile_like {
        use std::path::PathBuf;

        pub struct TempDir(PathBuf);

        impl TempDir {
            pub fn new(label: &str) -> Self {
                let mut dir = std::env::temp_dir();
                dir.push(format!("adr-store-test-{label}-{:x}", std::process::id()));
                std::fs::create_dir_all(&dir).unwrap();
                Self(dir)
            }

            pub fn path(&self) -> &std::path::Path {
                &self.0
            }
        }

        impl Drop for TempDir {
            fn drop(&mut self) {
                let _ = std::fs::remove_dir_all(&self.0);
            }
        }
    }

    fn airport_object(ident: &str) -> ObjectRef {
        let uuid = Uuid::from_name(ADR_NAMESPACE, ident);
        let obj = new_object(uuid);
        obj.borrow_mut().add_timeslice(TimeSlice::new(
            TimeWindow::UNBOUNDED,
            TimeSliceData::Airport(AirportTimeSlice {
                ident: ident.into(),
                coordinate: Coordinate::new(50.0, 8.0),
                elevation: 300,
                name: ident.into(),
                iata: String::new(),
                served_cities: vec![],
                flags: AirportFlags::CIV,
            }),
        ));
        obj
    }

    #[test]
    fn save_then_open_roundtrips_objects() {
        let dir = TempDir::new("roundtrip");
        let mut db = Database::open(StoreConfig::new(dir.path())).unwrap();
        let obj = airport_object("EDDF");
        let uuid = obj.borrow().uuid();
        db.save(obj).unwrap();

        let reopened = Database::open(StoreConfig::new(dir.path())).unwrap();
        let loaded = reopened.load(uuid).unwrap();
        assert_eq!(loaded.borrow().uuid(), uuid);
    }

    #[test]
    fn find_all_filters_by_type_and_window() {
        let dir = TempDir::new("find-all");
        let mut db = Database::open(StoreConfig::new(dir.path())).unwrap();
        db.save(airport_object("EDDF")).unwrap();
        db.save(airport_object("EDDH")).unwrap();

        let found = db.find_all(LoadMode::LinkNone, 0, 1, TypeTag::Airport, TypeTag::Airport, 0);
        assert_eq!(found.len(), 2);

        let found = db.find_all(LoadMode::LinkNone, 0, 1, TypeTag::Navaid, TypeTag::Navaid, 0);
        assert!(found.is_empty());
    }

    #[test]
    fn find_dependson_follows_reverse_index() {
        let dir = TempDir::new("dependson");
        let mut db = Database::open(StoreConfig::new(dir.path())).unwrap();
        let airport = airport_object("EDDF");
        let airport_uuid = airport.borrow().uuid();
        db.save(airport).unwrap();

        let point_uuid = Uuid::from_name(ADR_NAMESPACE, "DF123");
        let point = new_object(point_uuid);
        point.borrow_mut().add_timeslice(TimeSlice::new(
            TimeWindow::UNBOUNDED,
            TimeSliceData::DesignatedPoint(DesignatedPointTimeSlice {
                ident: "DF123".into(),
                coordinate: Coordinate::new(50.1, 8.1),
                kind: DesignatedPointKind::Terminal,
                airport: Some(Link::unresolved(airport_uuid)),
            }),
        ));
        db.save(point).unwrap();
        db.recompute();

        let dependents = db.find_dependson(
            airport_uuid,
            LoadMode::LinkNone,
            0,
            1,
            TypeTag::Invalid,
            TypeTag::Airspace,
        );
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].borrow().uuid(), point_uuid);
    }
}
