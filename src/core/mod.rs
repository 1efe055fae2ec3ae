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

//! Core types for GeoQL
//!
//! This module provides the data model the evaluator operates on:
//!
//! - [`Node`], [`Way`], [`Relation`], [`Area`], [`Derived`] - the concrete
//!   geospatial object types, plus [`Attic`] for historical snapshots
//! - [`ElementRef`] - a borrowed, category-tagged view of any object
//! - [`WorkingSet`] - the eight category slices a query statement produces
//! - [`TagStore`] - per-category tag lookup for object snapshots
//! - [`ContextSet`] / [`EvalContext`] - named working sets as seen by
//!   expression evaluation
//! - [`Error`] / [`Result`] - crate error type

mod element;
mod error;
mod set;

pub use element::{
    Area, Attic, Derived, ElementId, ElementKind, ElementRef, Member, Node, Relation, SetElement,
    Tags, Way,
};
pub use error::{Error, Result};
pub use set::{ContextSet, EvalContext, SliceMap, TagStore, WorkingSet};
