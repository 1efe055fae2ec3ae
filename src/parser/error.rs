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

//! Parse error accumulation
//!
//! Statement construction never aborts the enclosing parse: malformed call
//! syntax and static configuration mistakes are reported into an
//! [`ErrorSink`], the offending statement yields nothing, and parsing
//! moves on. Callers inspect the sink once the whole query has been
//! processed.

use thiserror::Error;

use super::tree::Position;

/// A single accumulated parse or static configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at {position}")]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Position in source
    pub position: Position,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Accumulating error sink shared across statement construction
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    errors: Vec<ParseError>,
}

impl ErrorSink {
    /// Report an error at a source position
    pub fn report(&mut self, message: impl Into<String>, position: Position) {
        self.errors.push(ParseError::new(message, position));
    }

    /// All errors reported so far, in report order
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Number of errors reported so far
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
