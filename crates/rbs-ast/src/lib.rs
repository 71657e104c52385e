// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree types for RBS signature files.
//!
//! This crate defines the declaration tree shared between the lexer,
//! parser, and formatter: declarations, members, types, method
//! signatures, and the comments and annotations attached to them.

pub mod decl;
pub mod member;
pub mod span;
pub mod token;
pub mod ty;

pub use span::{LineMap, Span};

/// A comment block attached to a declaration or member.
///
/// `text` holds the comment content with the leading `#` (and one space,
/// if present) stripped from each line; multi-line comments are joined
/// with `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// A `%a{...}` annotation attached to a declaration or member.
///
/// `text` is the raw source lexeme including the `%a` prefix and the
/// delimiters, so alternate delimiter forms (`%a<...>`, `%a|...|`, ...)
/// can be reproduced when the content cannot be re-wrapped in braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub text: String,
    pub span: Span,
}

impl Annotation {
    /// The annotation content between the delimiters.
    pub fn content(&self) -> &str {
        &self.text[3..self.text.len() - 1]
    }
}
