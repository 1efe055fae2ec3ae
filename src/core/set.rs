// Copyright 2026 GeoQL Contributors
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

//! Working sets and evaluation contexts
//!
//! A [`WorkingSet`] is the payload a query statement leaves behind under a
//! name: eight category slices, each an ordered map from index key to the
//! sequence of object snapshots stored under that key. Iteration order is
//! key order, then sequence order, so a fold over an unchanged set is
//! deterministic.
//!
//! A [`ContextSet`] pairs a working set with the tag stores that were
//! loaded for it; categories without tag support simply carry no store. An
//! [`EvalContext`] is the named-set lookup expression evaluation runs
//! against.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::element::{Area, Attic, Derived, ElementId, Node, Relation, SetElement, Tags, Way};
use super::error::{Error, Result};

/// One category slice: index key -> ordered snapshot sequence
///
/// `BTreeMap` keeps keys sorted, which is what makes the fold order of a
/// fixed working set reproducible.
pub type SliceMap<T> = BTreeMap<ElementId, Vec<T>>;

/// A named collection of geospatial objects
///
/// The eight slices are always iterated in field order: current nodes,
/// attic nodes, current ways, attic ways, current relations, attic
/// relations, areas, derived objects.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    pub nodes: SliceMap<Node>,
    pub attic_nodes: SliceMap<Attic<Node>>,
    pub ways: SliceMap<Way>,
    pub attic_ways: SliceMap<Attic<Way>>,
    pub relations: SliceMap<Relation>,
    pub attic_relations: SliceMap<Attic<Relation>>,
    pub areas: SliceMap<Area>,
    pub deriveds: SliceMap<Derived>,
}

impl WorkingSet {
    /// Total number of object snapshots across all eight slices
    pub fn len(&self) -> usize {
        fn count<T>(slice: &SliceMap<T>) -> usize {
            slice.values().map(Vec::len).sum()
        }

        count(&self.nodes)
            + count(&self.attic_nodes)
            + count(&self.ways)
            + count(&self.attic_ways)
            + count(&self.relations)
            + count(&self.attic_relations)
            + count(&self.areas)
            + count(&self.deriveds)
    }

    /// Whether the set holds no objects at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tag lookup for one category of a working set
///
/// Keyed by (index key, snapshot timestamp) so that a current object and
/// its attic snapshots resolve to different tag mappings.
#[derive(Debug, Clone, Default)]
pub struct TagStore {
    tags: FxHashMap<(ElementId, u64), Tags>,
}

impl TagStore {
    /// Store the tag mapping of one object snapshot
    pub fn insert<E: SetElement>(&mut self, elem: &E, tags: Tags) {
        self.tags.insert((elem.id(), elem.timestamp()), tags);
    }

    /// Look up the tag mapping of one object snapshot
    pub fn get<E: SetElement>(&self, elem: &E) -> Option<&Tags> {
        self.tags.get(&(elem.id(), elem.timestamp()))
    }

    /// Number of snapshots with stored tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no snapshot has stored tags
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// A working set together with its per-category tag stores
///
/// A `None` store means the category has no tag support in this context;
/// sub-expressions then evaluate against those objects with no tag mapping.
#[derive(Debug, Clone, Default)]
pub struct ContextSet {
    pub base: WorkingSet,
    pub node_tags: Option<TagStore>,
    pub attic_node_tags: Option<TagStore>,
    pub way_tags: Option<TagStore>,
    pub attic_way_tags: Option<TagStore>,
    pub relation_tags: Option<TagStore>,
    pub attic_relation_tags: Option<TagStore>,
    pub area_tags: Option<TagStore>,
    pub derived_tags: Option<TagStore>,
}

impl ContextSet {
    /// Wrap a working set with no tag stores loaded
    pub fn new(base: WorkingSet) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

/// Named working-set lookup for one evaluation
///
/// Built by the execution engine before an expression is evaluated; the
/// aggregators resolve their input-set name against it. The default input
/// set is conventionally named `"_"`.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    sets: FxHashMap<String, ContextSet>,
}

impl EvalContext {
    /// Register a named set; names must be unique within a context
    pub fn insert(&mut self, name: impl Into<String>, set: ContextSet) -> Result<()> {
        let name = name.into();
        if self.sets.contains_key(&name) {
            return Err(Error::DuplicateSet(name));
        }
        self.sets.insert(name, set);
        Ok(())
    }

    /// Resolve a set by name
    pub fn get(&self, name: &str) -> Option<&ContextSet> {
        self.sets.get(name)
    }

    /// Whether a set of that name exists
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }
}
