//! Lexer for RBS signature files.
//!
//! Tokenizes source text into a stream of tokens for the parser, and
//! collects full-line comments for later attachment to declarations.

mod lexer;

pub use lexer::{is_keyword, LexError, LexOutput, LexedComment, Lexer, KEYWORDS};
