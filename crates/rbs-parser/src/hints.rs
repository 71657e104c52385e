// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use rbs_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Colon hints
        ("':'", TokenKind::Eq) => Some("constants and variables use ':', type aliases use '='"),
        ("':'", _) => Some("syntax: name: Type"),

        // Body hints
        ("'end'", TokenKind::Eof) => {
            Some("every 'class', 'module', and 'interface' needs a closing 'end'")
        }

        // Parentheses and bracket hints
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", _) => None,
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),
        ("']'", _) => Some("close the type parameter list with ']'"),
        ("'}'", TokenKind::Eof) => Some("add '}' to close the brace"),

        // Signature hints
        ("'->'", _) => Some("signatures end with '-> ReturnType'"),
        ("'='", _) => Some("type aliases are written 'type name = Type'"),
        ("'.'", _) => Some("singleton members are written 'self.name'"),

        // Name hints
        ("a constant name", TokenKind::LowerIdent(_)) => {
            Some("constant names start with an uppercase letter")
        }
        ("a constant name", _) => None,
        ("an interface name", _) => Some("interface names look like '_Each'"),
        ("an alias name", _) => Some("type alias names start with a lowercase letter"),
        ("a method name", _) => None,
        ("an instance variable name", _) => Some("instance variable names look like '@foo'"),

        // Type hints
        ("a type", TokenKind::Eof) => Some("the type is missing"),
        ("a type", _) => Some("try a class name, a keyword like 'untyped', or a literal"),

        // Record hints
        ("a record key", _) => {
            Some("record keys are labels like 'name:' or literals followed by '=>'")
        }
        ("'=>'", _) => Some("non-label record keys are written 'key => Type'"),

        // Structure hints
        ("a declaration", _) => {
            Some("start with 'class', 'module', 'interface', 'type', a constant, or a global")
        }
        ("a member", _) => {
            Some("try 'def', an attribute, a mixin, a variable, or a nested declaration")
        }

        _ => None,
    }
}
