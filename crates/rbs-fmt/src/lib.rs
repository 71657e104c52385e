// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Deterministic formatter for RBS signature files.
//!
//! Parses the source to a full syntax tree, then renders it back through
//! a width-aware document layout. Output is canonical: formatting an
//! already-formatted file reproduces it byte for byte.

mod config;
mod printer;
mod quotes;

pub use config::FormatConfig;
pub use rbs_parser::ParseError;

use rbs_ast::LineMap;

/// Format RBS source with default configuration.
/// Returns the formatted text, or the parse error if the source does not
/// parse; nothing is ever emitted for invalid input.
pub fn format_source(source: &str) -> Result<String, ParseError> {
    format_source_with_config(source, &FormatConfig::default())
}

/// Format RBS source with custom configuration.
pub fn format_source_with_config(
    source: &str,
    config: &FormatConfig,
) -> Result<String, ParseError> {
    let root = rbs_parser::parse(source)?;
    let line_map = LineMap::new(source);
    let mut p = printer::Printer::new(&line_map, config);
    p.format_root(&root);
    Ok(p.finish())
}
