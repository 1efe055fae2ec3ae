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

//! Expression-tree boundary types
//!
//! The general query-language parser lives outside this crate; what lives
//! here is its boundary: the binary [`TokenNode`] tree shape it hands to
//! statement construction, source [`Position`]s, and the accumulating
//! [`ErrorSink`] that lets one malformed statement fail without aborting
//! the enclosing parse.

mod error;
mod tree;

pub use error::{ErrorSink, ParseError};
pub use tree::{Position, TokenNode};
