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

//! Geospatial element types
//!
//! A working set holds five kinds of objects - nodes, ways, relations,
//! areas and derived objects - where nodes, ways and relations additionally
//! come in historical ([`Attic`]) flavors. Expression evaluation never
//! needs to know the concrete type of the object it looks at; it receives
//! an [`ElementRef`] view plus an optional tag mapping.

use rustc_hash::FxHashMap;

/// Index key of an object within a working-set slice
pub type ElementId = i64;

/// Tag mapping of a single object snapshot (key -> value)
pub type Tags = FxHashMap<String, String>;

/// A point object with a coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: ElementId,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn new(id: ElementId, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }
}

/// An ordered sequence of node references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    pub id: ElementId,
    pub node_refs: Vec<ElementId>,
}

impl Way {
    pub fn new(id: ElementId, node_refs: Vec<ElementId>) -> Self {
        Self { id, node_refs }
    }
}

/// Kind discriminator for relation members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

/// A single member of a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub kind: ElementKind,
    pub id: ElementId,
    pub role: String,
}

/// A grouping of nodes, ways and other relations with roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub id: ElementId,
    pub members: Vec<Member>,
}

impl Relation {
    pub fn new(id: ElementId, members: Vec<Member>) -> Self {
        Self { id, members }
    }
}

/// A derived polygon object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub id: ElementId,
}

impl Area {
    pub fn new(id: ElementId) -> Self {
        Self { id }
    }
}

/// A synthetic object produced by a statement rather than loaded from
/// storage (e.g. the output of a make/convert step)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derived {
    pub id: ElementId,
    pub type_name: String,
}

impl Derived {
    pub fn new(id: ElementId, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
        }
    }
}

/// A historical snapshot of an object
///
/// `timestamp` is the expiration instant of the snapshot in seconds since
/// the epoch. Current objects use timestamp `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attic<T> {
    pub elem: T,
    pub timestamp: u64,
}

impl<T> Attic<T> {
    pub fn new(elem: T, timestamp: u64) -> Self {
        Self { elem, timestamp }
    }
}

/// Borrowed, category-tagged view of any working-set object
///
/// This is what a per-element evaluation task receives; tasks that only
/// care about tags can ignore it entirely.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Node(&'a Node),
    AtticNode(&'a Attic<Node>),
    Way(&'a Way),
    AtticWay(&'a Attic<Way>),
    Relation(&'a Relation),
    AtticRelation(&'a Attic<Relation>),
    Area(&'a Area),
    Derived(&'a Derived),
}

impl ElementRef<'_> {
    /// Index key of the viewed object
    pub fn id(&self) -> ElementId {
        match self {
            ElementRef::Node(n) => n.id,
            ElementRef::AtticNode(n) => n.elem.id,
            ElementRef::Way(w) => w.id,
            ElementRef::AtticWay(w) => w.elem.id,
            ElementRef::Relation(r) => r.id,
            ElementRef::AtticRelation(r) => r.elem.id,
            ElementRef::Area(a) => a.id,
            ElementRef::Derived(d) => d.id,
        }
    }

    /// Snapshot timestamp; `0` for current objects
    pub fn timestamp(&self) -> u64 {
        match self {
            ElementRef::AtticNode(n) => n.timestamp,
            ElementRef::AtticWay(w) => w.timestamp,
            ElementRef::AtticRelation(r) => r.timestamp,
            _ => 0,
        }
    }
}

/// An object that can live inside a working-set slice
///
/// The fold engine iterates slices generically through this trait; the id
/// and timestamp together form the key used for tag lookup.
pub trait SetElement {
    /// Index key within the slice
    fn id(&self) -> ElementId;

    /// Snapshot timestamp; `0` for current objects
    fn timestamp(&self) -> u64 {
        0
    }

    /// Category-tagged view handed to evaluation tasks
    fn as_element(&self) -> ElementRef<'_>;
}

impl SetElement for Node {
    fn id(&self) -> ElementId {
        self.id
    }

    fn as_element(&self) -> ElementRef<'_> {
        ElementRef::Node(self)
    }
}

impl SetElement for Way {
    fn id(&self) -> ElementId {
        self.id
    }

    fn as_element(&self) -> ElementRef<'_> {
        ElementRef::Way(self)
    }
}

impl SetElement for Relation {
    fn id(&self) -> ElementId {
        self.id
    }

    fn as_element(&self) -> ElementRef<'_> {
        ElementRef::Relation(self)
    }
}

impl SetElement for Area {
    fn id(&self) -> ElementId {
        self.id
    }

    fn as_element(&self) -> ElementRef<'_> {
        ElementRef::Area(self)
    }
}

impl SetElement for Derived {
    fn id(&self) -> ElementId {
        self.id
    }

    fn as_element(&self) -> ElementRef<'_> {
        ElementRef::Derived(self)
    }
}

impl SetElement for Attic<Node> {
    fn id(&self) -> ElementId {
        self.elem.id
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn as_element(&self) -> ElementRef<'_> {
        ElementRef::AtticNode(self)
    }
}

impl SetElement for Attic<Way> {
    fn id(&self) -> ElementId {
        self.elem.id
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn as_element(&self) -> ElementRef<'_> {
        ElementRef::AtticWay(self)
    }
}

impl SetElement for Attic<Relation> {
    fn id(&self) -> ElementId {
        self.elem.id
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn as_element(&self) -> ElementRef<'_> {
        ElementRef::AtticRelation(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ref_id() {
        let node = Node::new(7, 51.5, -0.1);
        assert_eq!(node.as_element().id(), 7);

        let way = Way::new(9, vec![1, 2, 3]);
        assert_eq!(way.as_element().id(), 9);

        let derived = Derived::new(3, "summary");
        assert_eq!(derived.as_element().id(), 3);
    }

    #[test]
    fn test_attic_timestamp() {
        let node = Node::new(7, 51.5, -0.1);
        assert_eq!(node.timestamp(), 0);

        let attic = Attic::new(Node::new(7, 51.4, -0.1), 1_500_000_000);
        assert_eq!(attic.timestamp(), 1_500_000_000);
        assert_eq!(attic.as_element().timestamp(), 1_500_000_000);
        assert_eq!(attic.as_element().id(), 7);
    }
}
