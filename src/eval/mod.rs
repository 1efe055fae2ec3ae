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

//! Expression evaluation
//!
//! This module provides the scalar-expression system:
//!
//! - [`Evaluator`] - a statement that can produce a scalar per element
//! - [`EvalTask`] - the single-shot task an evaluator builds for one
//!   evaluation pass
//! - [`SetUsage`] - dependency reporting for the external scheduler
//! - [`StatementFactory`] - the boundary to the general statement system
//! - [`FixedValue`], [`TagValue`], [`IdValue`] - simple per-element
//!   evaluators
//! - [`aggregate`] - the five working-set aggregators and their registry

pub mod aggregate;

mod value;

pub use value::{FixedValue, IdValue, TagValue};

use crate::core::{ElementRef, EvalContext, Tags};
use crate::parser::{ErrorSink, TokenNode};

/// A dependency of an expression on one named working set
///
/// The usage code is an opaque bitmask owned by the external execution
/// scheduler; this crate only merges codes by OR and otherwise passes them
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetUsage {
    pub set_name: String,
    pub usage: u32,
}

impl SetUsage {
    /// Create a new usage record
    pub fn new(set_name: impl Into<String>, usage: u32) -> Self {
        Self {
            set_name: set_name.into(),
            usage,
        }
    }
}

/// Dependency report of an expression: the per-set records, sorted by set
/// name with unique names, plus the aggregate usage code of the whole
/// sub-tree
pub type SetUsageReport = (Vec<SetUsage>, u32);

/// Single-shot evaluation task
///
/// Built fresh by [`Evaluator::evaluate`] for every evaluation pass and
/// exclusively owned by that pass; tasks are never cached or shared.
pub trait EvalTask {
    /// Produce the scalar for one object
    ///
    /// `elem` is absent when the task is evaluated outside any element
    /// (e.g. a constant in statement position); `tags` is absent when the
    /// object's category carries no tag store.
    fn eval(&self, elem: Option<ElementRef<'_>>, tags: Option<&Tags>) -> String;
}

/// A task that yields the same scalar for every object
///
/// Aggregators hand their fold result back to the enclosing expression as
/// one of these.
#[derive(Debug, Clone)]
pub struct ConstEvalTask {
    value: String,
}

impl ConstEvalTask {
    /// Wrap a fixed scalar
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl EvalTask for ConstEvalTask {
    fn eval(&self, _elem: Option<ElementRef<'_>>, _tags: Option<&Tags>) -> String {
        self.value.clone()
    }
}

/// A statement with the scalar-expression capability
///
/// Children of aggregators are held as `Box<dyn Evaluator>`, so the
/// capability is checked at the type level; attaching a non-expression
/// statement is impossible by construction.
pub trait Evaluator: Send + Sync {
    /// Internal statement name (e.g. `eval-sum`)
    fn name(&self) -> &str;

    /// Build this evaluation's task, or yield no result
    ///
    /// Evaluation is single-shot and synchronous; any accumulation state
    /// is reset on entry, so two evaluations of the same instance must not
    /// be interleaved. `None` means the expression produces no result for
    /// this context (missing input set, missing child) and contributes
    /// nothing upstream.
    fn evaluate(&mut self, ctx: &EvalContext) -> Option<Box<dyn EvalTask>>;

    /// Report which named sets this expression (transitively) reads
    fn used_sets(&self) -> SetUsageReport;
}

/// Boundary to the general statement system
///
/// The outer engine owns the full statement factory; aggregator
/// construction only needs it to turn an argument sub-tree into an
/// expression-capable statement. Returning `None` means the sub-tree does
/// not form a scalar expression.
pub trait StatementFactory {
    /// Build an evaluator from an expression sub-tree
    fn make_evaluator(
        &mut self,
        node: &TokenNode,
        errors: &mut ErrorSink,
    ) -> Option<Box<dyn Evaluator>>;
}

/// Parse-time settings threaded through statement constructors
#[derive(Debug, Clone)]
pub struct ParseSettings {
    /// Name of the implicit input set
    pub default_input_set: String,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            default_input_set: "_".to_string(),
        }
    }
}
