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

//! # GeoQL - aggregate-value evaluation for a geospatial query language
//!
//! GeoQL implements the aggregate-value evaluator of a geospatial query
//! language: expressions such as `sum(t["population"])` or
//! `max(roads.)(t["lanes"])` that fold a per-element sub-expression across
//! every object of a named in-memory working set - current and historical
//! snapshots alike - into a single scalar.
//!
//! ## Key pieces
//!
//! - **Working sets** - named collections of nodes, ways, relations, areas
//!   and derived objects, each with current and historical (attic) slices
//!   and optional per-category tag stores ([`core::WorkingSet`],
//!   [`core::ContextSet`], [`core::EvalContext`])
//! - **Evaluators** - scalar expressions over single elements
//!   ([`eval::Evaluator`], [`eval::EvalTask`])
//! - **Aggregators** - `union`, `min`, `max`, `sum` and `set-collect`,
//!   sharing one fold engine and differing only in their combine rule
//!   ([`eval::aggregate`])
//! - **Call-syntax parsing** - the `name(expr)` and `name(set.)(expr)` call
//!   shapes over a generic expression tree ([`parser::TokenNode`],
//!   [`eval::aggregate::try_parse_input_set`])
//! - **Dependency reporting** - which named sets an expression reads,
//!   threaded to an external scheduler ([`eval::SetUsage`])
//!
//! ## Quick example
//!
//! ```rust
//! use geoql::core::{ContextSet, EvalContext, Node, WorkingSet};
//! use geoql::eval::aggregate::SumValue;
//! use geoql::eval::{Evaluator, IdValue};
//! use geoql::parser::{ErrorSink, Position};
//! use std::collections::HashMap;
//!
//! let mut set = WorkingSet::default();
//! set.nodes.entry(1).or_default().push(Node::new(1, 51.5, -0.1));
//! set.nodes.entry(2).or_default().push(Node::new(2, 48.9, 2.3));
//!
//! let mut ctx = EvalContext::default();
//! ctx.insert("_", ContextSet::new(set)).unwrap();
//!
//! let mut errors = ErrorSink::default();
//! let mut sum = SumValue::new(
//!     Position::new(1, 1),
//!     &HashMap::new(),
//!     &Default::default(),
//!     &mut errors,
//! );
//! sum.attach(Box::new(IdValue), &mut errors);
//!
//! let task = sum.evaluate(&ctx).unwrap();
//! assert_eq!(task.eval(None, None), "3");
//! ```
//!
//! ## Modules
//!
//! - [`core`] - element data model, working sets, tag stores, errors
//! - [`parser`] - expression-tree nodes, positions, the error sink
//! - [`eval`] - evaluator traits, simple evaluators, aggregators, registry

pub mod core;
pub mod eval;
pub mod parser;

// Re-export main types for convenience
pub use crate::core::{
    ContextSet, Derived, ElementId, ElementRef, Error, EvalContext, Node, Relation, Result,
    TagStore, Tags, Way, WorkingSet,
};
pub use eval::aggregate::{global_registry, AggregateRegistry};
pub use eval::{EvalTask, Evaluator, SetUsage};
pub use parser::{ErrorSink, ParseError, Position, TokenNode};
