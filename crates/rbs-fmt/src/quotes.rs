// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! String literal requoting.
//!
//! Formatting never reinterprets escape sequences: the raw lexeme is
//! resliced and escape pairs pass through byte for byte. A literal whose
//! body contains no backslash is canonicalized to double quotes; one
//! with escapes keeps its original quote character so the content cannot
//! change meaning. Multi-line bodies are split into lines for the
//! printer to join with flush breaks.

/// Requote a string lexeme (quotes included in `raw`) and split the
/// result into output lines. Single-line literals yield one line.
pub(crate) fn normalize(raw: &str) -> Vec<String> {
    let original_quote = raw.chars().next().unwrap_or('"');
    let body = if raw.len() >= 2 { &raw[1..raw.len() - 1] } else { "" };
    let quote = if body.contains('\\') { original_quote } else { '"' };

    let mut lines = split_literal_lines(&requote(body, quote));
    if let Some(first) = lines.first_mut() {
        first.insert(0, quote);
    }
    if let Some(last) = lines.last_mut() {
        last.push(quote);
    }
    lines
}

/// Same for a quoted symbol lexeme (`:"..."` or `:'...'`).
pub(crate) fn normalize_symbol(raw: &str) -> Vec<String> {
    let mut lines = normalize(&raw[1..]);
    if let Some(first) = lines.first_mut() {
        first.insert(0, ':');
    }
    lines
}

fn requote(body: &str, quote: char) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push('\\');
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else if c == quote {
            out.push('\\');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

fn split_literal_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_single_quotes_become_double() {
        assert_eq!(normalize("'foo'"), vec!["\"foo\""]);
    }

    #[test]
    fn escapes_keep_the_original_quote() {
        assert_eq!(normalize(r"'foo\nbar'"), vec![r"'foo\nbar'"]);
        assert_eq!(normalize(r#""a\"b""#), vec![r#""a\"b""#]);
    }

    #[test]
    fn double_quotes_pass_through() {
        assert_eq!(normalize("\"foo\""), vec!["\"foo\""]);
    }

    #[test]
    fn bare_double_quote_escaped_on_requote() {
        assert_eq!(normalize("'say \"hi\"'"), vec!["\"say \\\"hi\\\"\""]);
    }

    #[test]
    fn multi_line_bodies_split() {
        assert_eq!(normalize("\"a\nb\""), vec!["\"a", "b\""]);
        assert_eq!(normalize("\"a\r\nb\""), vec!["\"a", "b\""]);
    }

    #[test]
    fn empty_body() {
        assert_eq!(normalize("''"), vec!["\"\""]);
    }

    #[test]
    fn quoted_symbols_follow_the_same_rule() {
        assert_eq!(normalize_symbol(":'sym'"), vec![":\"sym\""]);
        assert_eq!(normalize_symbol(":\"quo ted\""), vec![":\"quo ted\""]);
    }
}
