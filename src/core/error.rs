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

//! Error types for GeoQL
//!
//! Most failure modes of the evaluator are deliberately not errors: a
//! missing working set or a child that fails to build its evaluation task
//! yields "no result" (`None`), and malformed call syntax is accumulated in
//! the parser's [`ErrorSink`](crate::parser::ErrorSink). The variants here
//! cover the remaining genuinely faulting conditions on the public surface.

use thiserror::Error;

/// Result type alias for GeoQL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for GeoQL operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Requested aggregator keyword is not registered
    #[error("unknown aggregator '{0}'")]
    UnknownAggregator(String),

    /// A named working set was registered twice in an evaluation context
    #[error("working set '{0}' already defined")]
    DuplicateSet(String),
}
