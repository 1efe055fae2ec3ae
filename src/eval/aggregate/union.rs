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

//! union aggregator
//!
//! Yields the one value all elements agree on, ignoring empty
//! contributions; any genuine disagreement collapses the result to the
//! sentinel `< multiple values found >`.

use std::collections::HashMap;

use crate::core::EvalContext;
use crate::parser::{ErrorSink, Position, TokenNode};

use super::{
    build_call, AggregateStatement, AggregatorCore, Combine, EvalTask, Evaluator, ParseSettings,
    SetUsageReport, StatementFactory,
};

/// Grammar keyword of this variant
pub(crate) const KEYWORD: &str = "union";

/// Sentinel emitted when elements disagree
pub const MULTIPLE_VALUES: &str = "< multiple values found >";

/// Registry maker for `union(expr)` / `union(set.)(expr)`
pub(crate) fn make(
    node: &TokenNode,
    factory: &mut dyn StatementFactory,
    settings: &ParseSettings,
    errors: &mut ErrorSink,
) -> Option<Box<dyn Evaluator>> {
    build_call(KEYWORD, node, factory, settings, errors, UnionValue::new)
}

struct UnionCombine;

impl Combine for UnionCombine {
    fn combine(&mut self, agg_value: &str, new_value: &str) -> String {
        if new_value.is_empty() || agg_value == new_value {
            agg_value.to_string()
        } else if agg_value.is_empty() {
            new_value.to_string()
        } else {
            MULTIPLE_VALUES.to_string()
        }
    }
}

/// The `union` aggregator statement
pub struct UnionValue {
    core: AggregatorCore,
    combine: UnionCombine,
}

impl UnionValue {
    /// Construct from a recognized option map (`from`, default `_`)
    pub fn new(
        position: Position,
        options: &HashMap<String, String>,
        settings: &ParseSettings,
        errors: &mut ErrorSink,
    ) -> Self {
        Self {
            core: AggregatorCore::new("eval-union", position, options, settings, errors),
            combine: UnionCombine,
        }
    }

    /// Attach the single child expression
    pub fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}

impl Evaluator for UnionValue {
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

impl AggregateStatement for UnionValue {
    fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(values: &[&str]) -> String {
        let mut combine = UnionCombine;
        let mut acc = values[0].to_string();
        for value in &values[1..] {
            acc = combine.combine(&acc, value);
        }
        acc
    }

    #[test]
    fn test_union_agreeing_values() {
        assert_eq!(fold(&["red", "red", "red"]), "red");
    }

    #[test]
    fn test_union_disagreement_is_sentinel() {
        assert_eq!(fold(&["red", "blue", "red"]), MULTIPLE_VALUES);
    }

    #[test]
    fn test_union_ignores_empty_values() {
        assert_eq!(fold(&["", "red", ""]), "red");
        assert_eq!(fold(&["red", "", "red"]), "red");
    }

    #[test]
    fn test_union_sentinel_is_sticky() {
        // once disagreement is seen, agreement later cannot undo it
        assert_eq!(fold(&["red", "blue", "blue", "blue"]), MULTIPLE_VALUES);
    }

    #[test]
    fn test_union_has_no_numeric_path() {
        // "7" and "7.0" are equal numbers but distinct strings
        assert_eq!(fold(&["7", "7.0"]), MULTIPLE_VALUES);
    }
}
