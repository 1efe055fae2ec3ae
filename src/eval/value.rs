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

//! Simple per-element evaluators
//!
//! The minimal expression vocabulary the aggregators fold over: a fixed
//! string, a tag lookup, and the element id. None of them read any working
//! set themselves, so their dependency reports are empty with aggregate
//! code `0`.

use crate::core::{ElementRef, EvalContext, Tags};

use super::{ConstEvalTask, EvalTask, Evaluator, SetUsageReport};

/// A fixed string value
#[derive(Debug, Clone)]
pub struct FixedValue {
    value: String,
}

impl FixedValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Evaluator for FixedValue {
    fn name(&self) -> &str {
        "eval-fixed"
    }

    fn evaluate(&mut self, _ctx: &EvalContext) -> Option<Box<dyn EvalTask>> {
        Some(Box::new(ConstEvalTask::new(self.value.clone())))
    }

    fn used_sets(&self) -> SetUsageReport {
        (Vec::new(), 0)
    }
}

/// The value of one tag of the current element, `""` when the tag or the
/// whole tag mapping is absent
#[derive(Debug, Clone)]
pub struct TagValue {
    key: String,
}

impl TagValue {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

struct TagValueTask {
    key: String,
}

impl EvalTask for TagValueTask {
    fn eval(&self, _elem: Option<ElementRef<'_>>, tags: Option<&Tags>) -> String {
        tags.and_then(|t| t.get(&self.key))
            .cloned()
            .unwrap_or_default()
    }
}

impl Evaluator for TagValue {
    fn name(&self) -> &str {
        "eval-tag"
    }

    fn evaluate(&mut self, _ctx: &EvalContext) -> Option<Box<dyn EvalTask>> {
        Some(Box::new(TagValueTask {
            key: self.key.clone(),
        }))
    }

    fn used_sets(&self) -> SetUsageReport {
        (Vec::new(), 0)
    }
}

/// The index key of the current element, `""` when there is none
#[derive(Debug, Clone, Copy)]
pub struct IdValue;

struct IdValueTask;

impl EvalTask for IdValueTask {
    fn eval(&self, elem: Option<ElementRef<'_>>, _tags: Option<&Tags>) -> String {
        elem.map(|e| e.id().to_string()).unwrap_or_default()
    }
}

impl Evaluator for IdValue {
    fn name(&self) -> &str {
        "eval-id"
    }

    fn evaluate(&mut self, _ctx: &EvalContext) -> Option<Box<dyn EvalTask>> {
        Some(Box::new(IdValueTask))
    }

    fn used_sets(&self) -> SetUsageReport {
        (Vec::new(), 0)
    }
}
