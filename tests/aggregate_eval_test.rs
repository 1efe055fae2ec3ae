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

//! End-to-end aggregator tests: expression trees through the registry,
//! a small statement factory, and evaluation against working sets.

use std::collections::HashMap;

use geoql::core::{Attic, ContextSet, EvalContext, Node, TagStore, Tags, Way, WorkingSet};
use geoql::eval::aggregate::{global_registry, MULTIPLE_VALUES};
use geoql::eval::{Evaluator, FixedValue, IdValue, ParseSettings, StatementFactory, TagValue};
use geoql::parser::{ErrorSink, Position, TokenNode};
use geoql::SetUsage;

/// Minimal statement factory covering the expression vocabulary the tests
/// need: nested aggregator calls, quoted string literals, `id`, and
/// `t["key"]` tag lookups.
struct ExprFactory;

impl StatementFactory for ExprFactory {
    fn make_evaluator(
        &mut self,
        node: &TokenNode,
        errors: &mut ErrorSink,
    ) -> Option<Box<dyn Evaluator>> {
        if let Some(lhs) = node.lhs.as_deref() {
            if global_registry().is_aggregate(&lhs.token) {
                let keyword = lhs.token.clone();
                return global_registry()
                    .build(&keyword, node, self, &ParseSettings::default(), errors)
                    .ok()
                    .flatten();
            }
        }

        let token = node.token.as_str();
        if let Some(fixed) = token.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            return Some(Box::new(FixedValue::new(fixed)));
        }
        if token == "id" {
            return Some(Box::new(IdValue));
        }
        if let Some(key) = token.strip_prefix("t[\"").and_then(|t| t.strip_suffix("\"]")) {
            return Some(Box::new(TagValue::new(key)));
        }
        None
    }
}

fn leaf(token: &str) -> TokenNode {
    TokenNode::leaf(token, Position::new(1, 1))
}

/// `keyword(argument)`
fn implicit_call(keyword: &str, argument: TokenNode) -> TokenNode {
    TokenNode::inner("(", Position::new(1, 1), leaf(keyword), argument)
}

/// `keyword(set.)(argument)`
fn explicit_call(keyword: &str, set: &str, argument: TokenNode) -> TokenNode {
    TokenNode::inner(
        ".",
        Position::new(1, 1),
        leaf(keyword),
        TokenNode::inner("(", Position::new(1, 1), leaf(set), argument),
    )
}

/// A context whose set `name` holds one node per value, tagged `v=value`
fn tag_context(name: &str, values: &[&str]) -> EvalContext {
    let mut set = WorkingSet::default();
    let mut tag_store = TagStore::default();
    for (index, value) in values.iter().enumerate() {
        let id = (index + 1) as i64;
        let node = Node::new(id, 0.0, 0.0);
        let mut tags = Tags::default();
        tags.insert("v".to_string(), value.to_string());
        tag_store.insert(&node, tags);
        set.nodes.entry(id).or_default().push(node);
    }

    let mut context_set = ContextSet::new(set);
    context_set.node_tags = Some(tag_store);

    let mut ctx = EvalContext::default();
    ctx.insert(name, context_set).unwrap();
    ctx
}

fn build(node: &TokenNode) -> Box<dyn Evaluator> {
    let mut errors = ErrorSink::default();
    let built = ExprFactory.make_evaluator(node, &mut errors);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors.errors());
    built.expect("evaluator should build")
}

fn eval_call(node: &TokenNode, ctx: &EvalContext) -> String {
    let task = build(node).evaluate(ctx).expect("evaluation should produce a task");
    task.eval(None, None)
}

#[test]
fn test_sum_over_tag_values() {
    let ctx = tag_context("_", &["5", "12", "7"]);
    let node = implicit_call("sum", leaf("t[\"v\"]"));
    assert_eq!(eval_call(&node, &ctx), "24");
}

#[test]
fn test_sum_poisoned_by_non_numeric_value() {
    let ctx = tag_context("_", &["5", "twelve", "7"]);
    let node = implicit_call("sum", leaf("t[\"v\"]"));
    assert_eq!(eval_call(&node, &ctx), "NaN");
}

#[test]
fn test_union_agrees_and_disagrees() {
    let node = implicit_call("union", leaf("t[\"v\"]"));

    let agreeing = tag_context("_", &["red", "red", "red"]);
    assert_eq!(eval_call(&node, &agreeing), "red");

    let disagreeing = tag_context("_", &["red", "blue", "red"]);
    assert_eq!(eval_call(&node, &disagreeing), MULTIPLE_VALUES);
}

#[test]
fn test_min_and_max_numeric() {
    let ctx = tag_context("_", &["10", "9", "-3"]);
    assert_eq!(eval_call(&implicit_call("min", leaf("t[\"v\"]")), &ctx), "-3");
    assert_eq!(eval_call(&implicit_call("max", leaf("t[\"v\"]")), &ctx), "10");
}

#[test]
fn test_set_collect_sorts_and_deduplicates() {
    let ctx = tag_context("_", &["b", "a", "b", "c"]);
    let node = implicit_call("set-collect", leaf("t[\"v\"]"));
    assert_eq!(eval_call(&node, &ctx), "a;b;c");
}

#[test]
fn test_set_collect_skips_untagged_elements() {
    // one node has no "v" tag, contributing "" - the empty member is not
    // emitted as a leading separator
    let ctx = tag_context("_", &["b", "", "a"]);
    let node = implicit_call("set-collect", leaf("t[\"v\"]"));
    assert_eq!(eval_call(&node, &ctx), "a;b");
}

#[test]
fn test_explicit_input_set() {
    let ctx = tag_context("roads", &["2", "4", "1"]);
    let node = explicit_call("max", "roads", leaf("t[\"v\"]"));
    assert_eq!(eval_call(&node, &ctx), "4");
}

#[test]
fn test_explicit_set_missing_from_context() {
    // statically fine, but the named set does not exist at evaluation time
    let ctx = tag_context("_", &["1"]);
    let node = explicit_call("sum", "roads", leaf("t[\"v\"]"));
    assert!(build(&node).evaluate(&ctx).is_none());
}

#[test]
fn test_missing_set_name_reports_and_builds_nothing() {
    // min(.)(expr): the dotted form without a set-name token
    let node = TokenNode::inner(
        ".",
        Position::new(4, 2),
        leaf("min"),
        TokenNode::leaf("(", Position::new(4, 7)).with_rhs(leaf("t[\"v\"]")),
    );
    let mut errors = ErrorSink::default();
    let built = global_registry()
        .build("min", &node, &mut ExprFactory, &ParseSettings::default(), &mut errors)
        .unwrap();
    assert!(built.is_none());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.errors()[0].message,
        "Input set required if dot is present"
    );
    assert_eq!(errors.errors()[0].position, Position::new(4, 2));
}

#[test]
fn test_repeated_evaluation_is_stable() {
    // set-collect carries auxiliary state between combine steps; a second
    // evaluation of the same instance must start fresh
    let ctx = tag_context("_", &["b", "a"]);
    let node = implicit_call("set-collect", leaf("t[\"v\"]"));
    let mut collect = build(&node);

    let first = collect.evaluate(&ctx).unwrap().eval(None, None);
    let second = collect.evaluate(&ctx).unwrap().eval(None, None);
    assert_eq!(first, "a;b");
    assert_eq!(second, first);
}

#[test]
fn test_sum_of_ids() {
    let mut set = WorkingSet::default();
    for id in [3, 10, 29] {
        set.nodes.entry(id).or_default().push(Node::new(id, 0.0, 0.0));
    }
    let mut ctx = EvalContext::default();
    ctx.insert("_", ContextSet::new(set)).unwrap();

    let node = implicit_call("sum", leaf("id"));
    assert_eq!(eval_call(&node, &ctx), "42");
}

#[test]
fn test_attic_snapshots_contribute_with_their_own_tags() {
    let current = Node::new(1, 0.0, 0.0);
    let attic = Attic::new(Node::new(1, 0.0, 0.0), 1000);

    let mut node_tags = TagStore::default();
    let mut tags = Tags::default();
    tags.insert("v".to_string(), "2".to_string());
    node_tags.insert(&current, tags);

    let mut attic_node_tags = TagStore::default();
    let mut tags = Tags::default();
    tags.insert("v".to_string(), "5".to_string());
    attic_node_tags.insert(&attic, tags);

    let mut set = WorkingSet::default();
    set.nodes.entry(1).or_default().push(current);
    set.attic_nodes.entry(1).or_default().push(attic);

    let mut context_set = ContextSet::new(set);
    context_set.node_tags = Some(node_tags);
    context_set.attic_node_tags = Some(attic_node_tags);

    let mut ctx = EvalContext::default();
    ctx.insert("_", context_set).unwrap();

    let node = implicit_call("sum", leaf("t[\"v\"]"));
    assert_eq!(eval_call(&node, &ctx), "7");
}

#[test]
fn test_category_without_tag_store_contributes_empty() {
    // ways carry no tag store, so the way's tag lookup yields "" and
    // poisons the sum
    let mut set = WorkingSet::default();
    let node = Node::new(1, 0.0, 0.0);
    let mut node_tags = TagStore::default();
    let mut tags = Tags::default();
    tags.insert("v".to_string(), "3".to_string());
    node_tags.insert(&node, tags);
    set.nodes.entry(1).or_default().push(node);
    set.ways.entry(2).or_default().push(Way::new(2, Vec::new()));

    let mut context_set = ContextSet::new(set);
    context_set.node_tags = Some(node_tags);

    let mut ctx = EvalContext::default();
    ctx.insert("_", context_set).unwrap();

    let call = implicit_call("sum", leaf("t[\"v\"]"));
    assert_eq!(eval_call(&call, &ctx), "NaN");
}

#[test]
fn test_nested_aggregate_as_argument() {
    // sum(min(t["v"])): the inner aggregate folds to one constant, which
    // the outer sum then adds once per element
    let ctx = tag_context("_", &["7", "4"]);
    let node = implicit_call("sum", implicit_call("min", leaf("t[\"v\"]")));
    assert_eq!(eval_call(&node, &ctx), "8");
}

#[test]
fn test_used_sets_of_nested_aggregates() {
    let node = explicit_call("sum", "ways", implicit_call("min", leaf("t[\"v\"]")));
    let (sets, code) = build(&node).used_sets();
    assert_eq!(sets, vec![SetUsage::new("_", 0), SetUsage::new("ways", 0)]);
    assert_eq!(code, 0);
}

#[test]
fn test_all_aggregators_share_call_shapes() {
    let ctx = tag_context("foo", &["1", "2", "2"]);
    let expected: HashMap<&str, &str> = [
        ("union", MULTIPLE_VALUES),
        ("min", "1"),
        ("max", "2"),
        ("sum", "5"),
        ("set-collect", "1;2"),
    ]
    .into_iter()
    .collect();

    for (keyword, want) in expected {
        let node = explicit_call(keyword, "foo", leaf("t[\"v\"]"));
        assert_eq!(eval_call(&node, &ctx), want, "keyword {keyword}");
    }
}
