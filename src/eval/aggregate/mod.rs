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

//! Working-set aggregators
//!
//! An aggregator folds the scalar its child expression produces for every
//! object of a named working set into one value:
//!
//! - [`UnionValue`] - the single common value, or a sentinel
//! - [`MinValue`] / [`MaxValue`] - numeric-first minimum / maximum
//! - [`SumValue`] - numeric sum, `"NaN"` once any operand is non-numeric
//! - [`SetCollectValue`] - sorted, deduplicated `;`-joined values
//!
//! All five share [`AggregatorCore`] for construction, child attachment,
//! the fold itself and dependency reporting; a variant contributes only
//! its [`Combine`] rule. Call syntax is `name(expr)` for the implicit
//! input set `_` and `name(set.)(expr)` for an explicit one, recognized by
//! [`try_parse_input_set`] and dispatched through the read-only
//! [`AggregateRegistry`].

mod max;
mod min;
mod set_collect;
mod sum;
mod union;

pub use max::MaxValue;
pub use min::MinValue;
pub use set_collect::SetCollectValue;
pub use sum::SumValue;
pub use union::{UnionValue, MULTIPLE_VALUES};

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::core::{ContextSet, Error, EvalContext, Result, SetElement, SliceMap};
use crate::parser::{ErrorSink, Position, TokenNode};

use super::{
    ConstEvalTask, EvalTask, Evaluator, ParseSettings, SetUsage, SetUsageReport, StatementFactory,
};

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Exact whole-token integer parse
pub fn try_i64(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}

/// Exact whole-token real-number parse
///
/// Non-finite results are rejected, so `"NaN"` and `"inf"` stay plain
/// strings. Sum's poisoning depends on this: once a combine step has
/// produced `"NaN"`, no later step may parse it back into a number.
pub fn try_f64(value: &str) -> Option<f64> {
    let parsed = value.parse::<f64>().ok()?;
    parsed.is_finite().then_some(parsed)
}

// ---------------------------------------------------------------------------
// Combine rules
// ---------------------------------------------------------------------------

/// The 2-ary combine rule of one aggregator variant
///
/// `combine` receives the accumulated value and the newest element scalar
/// and returns the new accumulated value. Variants with auxiliary state
/// (set-collect) override `reset`, which runs once per evaluation before
/// the fold starts.
pub trait Combine: Send + Sync {
    /// Fold one more element scalar into the accumulated value
    fn combine(&mut self, agg_value: &str, new_value: &str) -> String;

    /// Clear any auxiliary state before a fresh fold
    fn reset(&mut self) {}
}

// ---------------------------------------------------------------------------
// Aggregator core
// ---------------------------------------------------------------------------

/// State and behavior shared by all aggregator variants
///
/// Owns the input-set name, the source position and the single child. The
/// accumulated value and contributed-flag live only for the duration of
/// one [`evaluate`](AggregatorCore::evaluate) call, so every evaluation
/// starts from a clean state.
pub struct AggregatorCore {
    /// Internal statement name, e.g. `eval-sum`
    name: &'static str,
    /// Source position of the call
    position: Position,
    /// Name of the input working set
    input: String,
    /// The single child expression
    rhs: Option<Box<dyn Evaluator>>,
}

impl AggregatorCore {
    /// Construct from a recognized option map
    ///
    /// The one recognized option is `from`; it defaults to the settings'
    /// implicit input-set name. Unrecognized options are reported to the
    /// sink and ignored.
    pub fn new(
        name: &'static str,
        position: Position,
        options: &HashMap<String, String>,
        settings: &ParseSettings,
        errors: &mut ErrorSink,
    ) -> Self {
        let mut input = None;
        for (key, value) in options {
            if key == "from" {
                input = Some(value.clone());
            } else {
                errors.report(format!("Unknown option \"{key}\" for {name}"), position);
            }
        }

        Self {
            name,
            position,
            input: input.unwrap_or_else(|| settings.default_input_set.clone()),
            rhs: None,
        }
    }

    /// Internal statement name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the input working set
    pub fn input_set(&self) -> &str {
        &self.input
    }

    /// Attach the single child expression
    ///
    /// A second attachment is a static configuration error: it is reported
    /// to the sink and the first child is kept.
    pub fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        if self.rhs.is_some() {
            errors.report(
                format!("{} must have exactly one evaluator substatement", self.name),
                self.position,
            );
        } else {
            self.rhs = Some(rhs);
        }
    }

    /// Run one evaluation: build the child task, resolve the input set,
    /// fold every object of its eight category slices through `combine`,
    /// and wrap the final value as a constant task
    ///
    /// Yields no result when there is no child, the child fails to build
    /// its task, or the input set does not exist.
    pub fn evaluate(
        &mut self,
        ctx: &EvalContext,
        combine: &mut dyn Combine,
    ) -> Option<Box<dyn EvalTask>> {
        let rhs = self.rhs.as_mut()?;
        let task = rhs.evaluate(ctx)?;
        let set = ctx.get(&self.input)?;

        combine.reset();
        let mut fold = Fold::default();
        fold.run(&*task, set, combine);

        Some(Box::new(ConstEvalTask::new(fold.value)))
    }

    /// Report which named sets this aggregator (transitively) reads
    ///
    /// The child's report is extended with this aggregator's input set: a
    /// new record is tagged with the child's aggregate code, an existing
    /// one has that code ORed in. The aggregate code itself passes through
    /// unchanged; without a child, the report is the bare input set with
    /// code `0`.
    pub fn used_sets(&self) -> SetUsageReport {
        let Some(rhs) = &self.rhs else {
            return (vec![SetUsage::new(self.input.clone(), 0)], 0);
        };

        let (mut sets, code) = rhs.used_sets();
        match sets.binary_search_by(|usage| usage.set_name.as_str().cmp(&self.input)) {
            Ok(found) => sets[found].usage |= code,
            Err(insert_at) => sets.insert(insert_at, SetUsage::new(self.input.clone(), code)),
        }
        (sets, code)
    }
}

/// One evaluation's accumulation state
#[derive(Default)]
struct Fold {
    value: String,
    value_set: bool,
}

impl Fold {
    /// Visit all eight category slices in their fixed order
    fn run(&mut self, task: &dyn EvalTask, set: &ContextSet, combine: &mut dyn Combine) {
        self.slice(task, &set.base.nodes, set.node_tags.as_ref(), combine);
        self.slice(
            task,
            &set.base.attic_nodes,
            set.attic_node_tags.as_ref(),
            combine,
        );
        self.slice(task, &set.base.ways, set.way_tags.as_ref(), combine);
        self.slice(
            task,
            &set.base.attic_ways,
            set.attic_way_tags.as_ref(),
            combine,
        );
        self.slice(
            task,
            &set.base.relations,
            set.relation_tags.as_ref(),
            combine,
        );
        self.slice(
            task,
            &set.base.attic_relations,
            set.attic_relation_tags.as_ref(),
            combine,
        );
        self.slice(task, &set.base.areas, set.area_tags.as_ref(), combine);
        self.slice(task, &set.base.deriveds, set.derived_tags.as_ref(), combine);
    }

    /// Visit one slice in key order, then sequence order
    fn slice<T: SetElement>(
        &mut self,
        task: &dyn EvalTask,
        elems: &SliceMap<T>,
        tags: Option<&crate::core::TagStore>,
        combine: &mut dyn Combine,
    ) {
        for snapshots in elems.values() {
            for elem in snapshots {
                let value = task.eval(
                    Some(elem.as_element()),
                    tags.and_then(|store| store.get(elem)),
                );
                if self.value_set {
                    self.value = combine.combine(&self.value, &value);
                } else {
                    self.value = value;
                    self.value_set = true;
                }
            }
        }
    }
}

/// An aggregator statement: an evaluator that accepts exactly one child
pub trait AggregateStatement: Evaluator {
    /// Attach the single child expression
    fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink);
}

// ---------------------------------------------------------------------------
// Call-syntax parsing
// ---------------------------------------------------------------------------

/// Input set recognized from an aggregator call node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSet {
    /// Set name; `_` for the implicit form
    pub name: String,
    /// Whether the set was named explicitly via the dotted form
    pub explicit: bool,
}

/// Recognize the input set of an aggregator call node
///
/// Handles both call shapes:
///
/// - `name(expr)` - node token is `"("`; the implicit set `_` is used
/// - `name(set.)(expr)` - any other token; the set name sits on the left
///   of the node's right child
///
/// A missing left child means the node is not an aggregator call at all
/// and fails quietly. A missing argument sub-tree is reported with the
/// caller's `message`; a dotted form without a set-name token is reported
/// as `Input set required if dot is present`. Both failures yield `None`.
pub fn try_parse_input_set(
    node: &TokenNode,
    errors: &mut ErrorSink,
    message: &str,
) -> Option<InputSet> {
    if node.token == "(" {
        node.lhs.as_ref()?;
        if node.rhs.is_none() {
            errors.report(message, node.position);
            return None;
        }

        Some(InputSet {
            name: "_".to_string(),
            explicit: false,
        })
    } else {
        node.lhs.as_ref()?;
        let Some(rhs) = node.rhs.as_deref() else {
            errors.report(message, node.position);
            return None;
        };
        if rhs.rhs.is_none() {
            errors.report(message, node.position);
            return None;
        }
        let Some(set_name) = rhs.lhs.as_deref() else {
            errors.report("Input set required if dot is present", node.position);
            return None;
        };

        Some(InputSet {
            name: set_name.token.clone(),
            explicit: true,
        })
    }
}

/// Build one aggregator variant from a call node
///
/// Shared by all five registry makers: recognizes the input set, runs the
/// variant constructor, locates the argument sub-tree (the right child's
/// right child when the set was explicit, the right child otherwise) and
/// asks the statement factory for the child expression. A factory that
/// produces nothing is reported with the variant's
/// `<keyword>(...) needs an argument` message; the aggregator is still
/// returned and simply folds without a contribution.
fn build_call<A, F>(
    keyword: &str,
    node: &TokenNode,
    factory: &mut dyn StatementFactory,
    settings: &ParseSettings,
    errors: &mut ErrorSink,
    ctor: F,
) -> Option<Box<dyn Evaluator>>
where
    A: AggregateStatement + 'static,
    F: FnOnce(Position, &HashMap<String, String>, &ParseSettings, &mut ErrorSink) -> A,
{
    let message = format!("{keyword}(...) needs an argument");
    let input = try_parse_input_set(node, errors, &message)?;

    let mut options = HashMap::new();
    if input.explicit {
        options.insert("from".to_string(), input.name.clone());
    }
    let mut aggregator = ctor(node.position, &options, settings, errors);

    let argument = if input.explicit {
        node.rhs.as_deref().and_then(|rhs| rhs.rhs.as_deref())
    } else {
        node.rhs.as_deref()
    };
    match argument.and_then(|sub| factory.make_evaluator(sub, errors)) {
        Some(rhs) => aggregator.attach(rhs, errors),
        None => errors.report(message, node.position),
    }

    Some(Box::new(aggregator))
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Factory signature of one registered aggregator variant
pub type AggregateMaker = fn(
    &TokenNode,
    &mut dyn StatementFactory,
    &ParseSettings,
    &mut ErrorSink,
) -> Option<Box<dyn Evaluator>>;

/// Global aggregator registry instance
static GLOBAL_REGISTRY: OnceLock<AggregateRegistry> = OnceLock::new();

/// Get the global aggregator registry
#[inline]
pub fn global_registry() -> &'static AggregateRegistry {
    GLOBAL_REGISTRY.get_or_init(AggregateRegistry::new)
}

/// Read-only keyword -> constructor table for the aggregator grammar
///
/// Populated once; the table never changes after construction, so lookups
/// need no locking.
pub struct AggregateRegistry {
    makers: HashMap<&'static str, AggregateMaker>,
}

impl Default for AggregateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateRegistry {
    /// Create a registry with all five built-in aggregators registered
    pub fn new() -> Self {
        let mut makers: HashMap<&'static str, AggregateMaker> = HashMap::new();
        makers.insert(union::KEYWORD, union::make);
        makers.insert(min::KEYWORD, min::make);
        makers.insert(max::KEYWORD, max::make);
        makers.insert(sum::KEYWORD, sum::make);
        makers.insert(set_collect::KEYWORD, set_collect::make);
        Self { makers }
    }

    /// Look up the maker for a grammar keyword
    pub fn get(&self, keyword: &str) -> Option<AggregateMaker> {
        self.makers.get(keyword).copied()
    }

    /// Check whether a keyword names an aggregator
    pub fn is_aggregate(&self, keyword: &str) -> bool {
        self.makers.contains_key(keyword)
    }

    /// Build an aggregator statement from a call node
    ///
    /// `Err` only for an unregistered keyword; a recognized keyword whose
    /// call syntax is malformed reports to the sink and yields `Ok(None)`.
    pub fn build(
        &self,
        keyword: &str,
        node: &TokenNode,
        factory: &mut dyn StatementFactory,
        settings: &ParseSettings,
        errors: &mut ErrorSink,
    ) -> Result<Option<Box<dyn Evaluator>>> {
        let maker = self
            .get(keyword)
            .ok_or_else(|| Error::UnknownAggregator(keyword.to_string()))?;
        Ok(maker(node, factory, settings, errors))
    }

    /// List all registered keywords, sorted
    pub fn list(&self) -> Vec<&'static str> {
        let mut keywords: Vec<_> = self.makers.keys().copied().collect();
        keywords.sort_unstable();
        keywords
    }
}
