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

//! set-collect aggregator
//!
//! Collects every distinct element value and emits them sorted and joined
//! with `;`. An empty element value is swallowed rather than producing a
//! leading separator. Sorting is lexicographic even for numeric-looking
//! values, so `"10"` sorts before `"9"`.

use std::collections::{BTreeSet, HashMap};

use crate::core::EvalContext;
use crate::parser::{ErrorSink, Position, TokenNode};

use super::{
    build_call, AggregateStatement, AggregatorCore, Combine, EvalTask, Evaluator, ParseSettings,
    SetUsageReport, StatementFactory,
};

/// Grammar keyword of this variant
pub(crate) const KEYWORD: &str = "set-collect";

/// Registry maker for `set-collect(expr)` / `set-collect(set.)(expr)`
pub(crate) fn make(
    node: &TokenNode,
    factory: &mut dyn StatementFactory,
    settings: &ParseSettings,
    errors: &mut ErrorSink,
) -> Option<Box<dyn Evaluator>> {
    build_call(KEYWORD, node, factory, settings, errors, SetCollectValue::new)
}

/// Distinct values seen during the current fold
///
/// The first combine call seeds the set with the fold's initial value as
/// well, since that one never went through `combine`.
#[derive(Default)]
struct SetCollectCombine {
    values: BTreeSet<String>,
}

impl Combine for SetCollectCombine {
    fn combine(&mut self, agg_value: &str, new_value: &str) -> String {
        if self.values.is_empty() {
            self.values.insert(agg_value.to_string());
        }
        self.values.insert(new_value.to_string());

        let mut members = self.values.iter();
        let mut result = String::new();
        let mut first = members.next();
        if first.map(String::as_str) == Some("") {
            first = members.next();
        }
        if let Some(member) = first {
            result.push_str(member);
        }
        for member in members {
            result.push(';');
            result.push_str(member);
        }
        result
    }

    fn reset(&mut self) {
        self.values.clear();
    }
}

/// The `set-collect` aggregator statement
pub struct SetCollectValue {
    core: AggregatorCore,
    combine: SetCollectCombine,
}

impl SetCollectValue {
    /// Construct from a recognized option map (`from`, default `_`)
    pub fn new(
        position: Position,
        options: &HashMap<String, String>,
        settings: &ParseSettings,
        errors: &mut ErrorSink,
    ) -> Self {
        Self {
            core: AggregatorCore::new("eval-set-collect", position, options, settings, errors),
            combine: SetCollectCombine::default(),
        }
    }

    /// Attach the single child expression
    pub fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}

impl Evaluator for SetCollectValue {
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

impl AggregateStatement for SetCollectValue {
    fn attach(&mut self, rhs: Box<dyn Evaluator>, errors: &mut ErrorSink) {
        self.core.attach(rhs, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(values: &[&str]) -> String {
        let mut combine = SetCollectCombine::default();
        let mut acc = values[0].to_string();
        for value in &values[1..] {
            acc = combine.combine(&acc, value);
        }
        acc
    }

    #[test]
    fn test_collect_deduplicates_and_sorts() {
        assert_eq!(fold(&["b", "a", "b"]), "a;b");
    }

    #[test]
    fn test_collect_seeds_initial_value() {
        // the fold's very first value never passes through combine on its
        // own; the first combine call picks it up
        assert_eq!(fold(&["z", "a"]), "a;z");
    }

    #[test]
    fn test_collect_skips_empty_member() {
        assert_eq!(fold(&["", "b", "a"]), "a;b");
        assert_eq!(fold(&["b", "", "a"]), "a;b");
    }

    #[test]
    fn test_collect_all_empty() {
        assert_eq!(fold(&["", ""]), "");
    }

    #[test]
    fn test_collect_sorts_lexicographically_not_numerically() {
        assert_eq!(fold(&["9", "10", "2"]), "10;2;9");
    }

    #[test]
    fn test_collect_single_distinct_value() {
        assert_eq!(fold(&["x", "x", "x"]), "x");
    }
}
