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

//! max aggregator
//!
//! Numeric mirror of `min`: the numerically larger operand wins verbatim,
//! integers first, reals second. The string fallback is the plain
//! lexicographic maximum with none of `min`'s empty-string handling. The
//! empty string loses to any non-empty one lexicographically anyway, so
//! the asymmetry is only observable on all-empty input. Long-standing
//! observed behavior, kept as-is.

use std::collections::HashMap;

use crate::core::EvalContext;
use crate::parser::{ErrorSink, Position, TokenNode};

use super::{
    build_call, try_f64, try_i64, AggregateStatement, AggregatorCore, Combine, EvalTask,
    Evaluator, ParseSettings, SetUsageReport, StatementFactory,
};

/// Grammar keyword of this variant
pub(crate) const KEYWORD: &str = "max";

/// Registry maker for `max(expr)` / `max(set.)(expr)`
pub(crate) fn make(
    node: &TokenNode,
    factory: &mut dyn StatementFactory,
    settings: &ParseSettings,
    errors: &mut ErrorSink,
) -> Option<Box<dyn Evaluator>> {
    build_call(KEYWORD, node, factory, settings, errors, MaxValue::new)
}

struct MaxCombine;

impl Combine for MaxCombine {
    fn combine(&mut self, agg_value: &str, new_value: &str) -> String {
        if let (Some(agg), Some(new)) = (try_i64(agg_value), try_i64(new_value)) {
            return if new > agg { new_value } else { agg_value }.to_string();
        }

        if let (Some(agg), Some(new)) = (try_f64(agg_value), try_f64(new_value)) {
            return if new > agg { new_value } else { agg_value }.to_string();
        }

        agg_value.max(new_value).to_string()
    }
}

/// The `max` aggregator statement
pub struct MaxValue {
    core: AggregatorCore,
    combine: MaxCombine,
}

impl MaxValue {
    /// Construct from a recognized option map (`from`, default `_`)
    pub fn new(
        position: Position,
        options: &HashMap<String, String>,
        settings: &ParseSettings,
        errors: &mut ErrorSink,
    ) -> Self {
        Self {
            core: AggregatorCore::new("eval-max", position, options, settings, errors),
            combine: MaxCombine,
        }
    }

    /// Attach the single child expression
    pub fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}

impl Evaluator for MaxValue {
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

impl AggregateStatement for MaxValue {
    fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(values: &[&str]) -> String {
        let mut combine = MaxCombine;
        let mut acc = values[0].to_string();
        for value in &values[1..] {
            acc = combine.combine(&acc, value);
        }
        acc
    }

    #[test]
    fn test_max_integers() {
        assert_eq!(fold(&["-5", "3", "-20"]), "3");
    }

    #[test]
    fn test_max_numeric_beats_lexicographic() {
        // "9" > "10" lexicographically, but 10 > 9 numerically
        assert_eq!(fold(&["9", "10"]), "10");
    }

    #[test]
    fn test_max_keeps_verbatim_string() {
        assert_eq!(fold(&["4.20", "3.5"]), "4.20");
    }

    #[test]
    fn test_max_reals() {
        assert_eq!(fold(&["2.5", "3.5", "1.5"]), "3.5");
    }

    #[test]
    fn test_max_lexicographic_fallback() {
        assert_eq!(fold(&["pear", "apple", "quince"]), "quince");
    }

    #[test]
    fn test_max_no_empty_string_special_casing() {
        // documented quirk, not a bug: unlike min, max has no empty-value
        // tier. The lexicographic fallback happens to let non-empty values
        // win anyway, so the observable behavior matches min here.
        assert_eq!(fold(&["b", ""]), "b");
        assert_eq!(fold(&["", "b"]), "b");
        assert_eq!(fold(&["", ""]), "");
    }
}
