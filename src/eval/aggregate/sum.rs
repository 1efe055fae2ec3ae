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

//! sum aggregator
//!
//! Integer addition when both operands are whole-token integers, real
//! addition when both are reals or the integer sum overflows, `"NaN"`
//! otherwise. Since `"NaN"` itself
//! parses as neither, a single non-numeric element poisons the rest of
//! the fold: every subsequent combine step yields `"NaN"` again.

use std::collections::HashMap;

use crate::core::EvalContext;
use crate::parser::{ErrorSink, Position, TokenNode};

use super::{
    build_call, try_f64, try_i64, AggregateStatement, AggregatorCore, Combine, EvalTask,
    Evaluator, ParseSettings, SetUsageReport, StatementFactory,
};

/// Grammar keyword of this variant
pub(crate) const KEYWORD: &str = "sum";

/// Registry maker for `sum(expr)` / `sum(set.)(expr)`
pub(crate) fn make(
    node: &TokenNode,
    factory: &mut dyn StatementFactory,
    settings: &ParseSettings,
    errors: &mut ErrorSink,
) -> Option<Box<dyn Evaluator>> {
    build_call(KEYWORD, node, factory, settings, errors, SumValue::new)
}

struct SumCombine;

impl Combine for SumCombine {
    fn combine(&mut self, agg_value: &str, new_value: &str) -> String {
        if let (Some(agg), Some(new)) = (try_i64(agg_value), try_i64(new_value)) {
            // an overflowing integer sum degrades to the real tier
            if let Some(total) = agg.checked_add(new) {
                return total.to_string();
            }
        }

        if let (Some(agg), Some(new)) = (try_f64(agg_value), try_f64(new_value)) {
            return (agg + new).to_string();
        }

        "NaN".to_string()
    }
}

/// The `sum` aggregator statement
pub struct SumValue {
    core: AggregatorCore,
    combine: SumCombine,
}

impl SumValue {
    /// Construct from a recognized option map (`from`, default `_`)
    pub fn new(
        position: Position,
        options: &HashMap<String, String>,
        settings: &ParseSettings,
        errors: &mut ErrorSink,
    ) -> Self {
        Self {
            core: AggregatorCore::new("eval-sum", position, options, settings, errors),
            combine: SumCombine,
        }
    }

    /// Attach the single child expression
    pub fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}

impl Evaluator for SumValue {
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

impl AggregateStatement for SumValue {
    fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}
