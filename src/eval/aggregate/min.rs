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

//! min aggregator
//!
//! Prefers numeric comparison: when both sides parse as integers the
//! numerically smaller one wins verbatim, likewise for reals. Only then
//! does it fall back to strings, where empty values lose against anything
//! and the remaining case is the lexicographic minimum.

use std::collections::HashMap;

use crate::core::EvalContext;
use crate::parser::{ErrorSink, Position, TokenNode};

use super::{
    build_call, try_f64, try_i64, AggregateStatement, AggregatorCore, Combine, EvalTask,
    Evaluator, ParseSettings, SetUsageReport, StatementFactory,
};

/// Grammar keyword of this variant
pub(crate) const KEYWORD: &str = "min";

/// Registry maker for `min(expr)` / `min(set.)(expr)`
pub(crate) fn make(
    node: &TokenNode,
    factory: &mut dyn StatementFactory,
    settings: &ParseSettings,
    errors: &mut ErrorSink,
) -> Option<Box<dyn Evaluator>> {
    build_call(KEYWORD, node, factory, settings, errors, MinValue::new)
}

struct MinCombine;

impl Combine for MinCombine {
    fn combine(&mut self, agg_value: &str, new_value: &str) -> String {
        if let (Some(agg), Some(new)) = (try_i64(agg_value), try_i64(new_value)) {
            return if new < agg { new_value } else { agg_value }.to_string();
        }

        if let (Some(agg), Some(new)) = (try_f64(agg_value), try_f64(new_value)) {
            return if new < agg { new_value } else { agg_value }.to_string();
        }

        if new_value.is_empty() {
            return agg_value.to_string();
        }
        if agg_value.is_empty() {
            return new_value.to_string();
        }

        agg_value.min(new_value).to_string()
    }
}

/// The `min` aggregator statement
pub struct MinValue {
    core: AggregatorCore,
    combine: MinCombine,
}

impl MinValue {
    /// Construct from a recognized option map (`from`, default `_`)
    pub fn new(
        position: Position,
        options: &HashMap<String, String>,
        settings: &ParseSettings,
        errors: &mut ErrorSink,
    ) -> Self {
        Self {
            core: AggregatorCore::new("eval-min", position, options, settings, errors),
            combine: MinCombine,
        }
    }

    /// Attach the single child expression
    pub fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}

impl Evaluator for MinValue {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn evaluate(&mut self, ctx: &EvalContext) -> Option<Box<dyn EvalTask>> {
        self.core.evaluate(ctx, &mut self.combine)
    }

    fn used_sets(&self) -> SetUsageReport {
        self.core.used_sets()
    }
}

impl AggregateStatement for MinValue {
    fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}
