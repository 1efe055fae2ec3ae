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

//! Expression-tree nodes
//!
//! The outer parser turns a query expression into a binary tree of
//! [`TokenNode`]s. A function call `name(expr)` arrives as a node with
//! token `"("`, the function name as its left child and the argument as
//! its right child; the dotted call form `name(set.)(expr)` arrives with
//! the `.` as root token, the name on the left and a right child holding
//! the set name (left) and the argument (right).

use std::fmt;

/// Source position of a token
///
/// Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// One node of a parsed expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNode {
    /// Token text; `"("` is the generic grouping marker
    pub token: String,
    /// Left operand, if any
    pub lhs: Option<Box<TokenNode>>,
    /// Right operand, if any
    pub rhs: Option<Box<TokenNode>>,
    /// Source position of the token
    pub position: Position,
}

impl TokenNode {
    /// Create a leaf node
    pub fn leaf(token: impl Into<String>, position: Position) -> Self {
        Self {
            token: token.into(),
            lhs: None,
            rhs: None,
            position,
        }
    }

    /// Create an inner node with both children
    pub fn inner(
        token: impl Into<String>,
        position: Position,
        lhs: TokenNode,
        rhs: TokenNode,
    ) -> Self {
        Self {
            token: token.into(),
            lhs: Some(Box::new(lhs)),
            rhs: Some(Box::new(rhs)),
            position,
        }
    }

    /// Attach or replace the left child
    pub fn with_lhs(mut self, lhs: TokenNode) -> Self {
        self.lhs = Some(Box::new(lhs));
        self
    }

    /// Attach or replace the right child
    pub fn with_rhs(mut self, rhs: TokenNode) -> Self {
        self.rhs = Some(Box::new(rhs));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        let pos = Position::new(3, 14);
        assert_eq!(pos.to_string(), "line 3, column 14");
    }

    #[test]
    fn test_builders() {
        let call = TokenNode::inner(
            "(",
            Position::new(1, 4),
            TokenNode::leaf("sum", Position::new(1, 1)),
            TokenNode::leaf("\"1\"", Position::new(1, 5)),
        );
        assert_eq!(call.token, "(");
        assert_eq!(call.lhs.as_ref().unwrap().token, "sum");
        assert_eq!(call.rhs.as_ref().unwrap().token, "\"1\"");

        let leaf = TokenNode::leaf("id", Position::default()).with_rhs(TokenNode::leaf(
            "x",
            Position::default(),
        ));
        assert!(leaf.lhs.is_none());
        assert!(leaf.rhs.is_some());
    }
}
