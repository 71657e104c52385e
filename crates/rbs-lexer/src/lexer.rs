//! The lexer implementation using logos.

use logos::Logos;
use rbs_ast::token::{Token, TokenKind};
use rbs_ast::Span;
use thiserror::Error;

/// Raw token type for logos - we parse values in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")] // Whitespace including newlines is insignificant
enum RawToken {
    // === Keywords ===
    #[token("class")]
    Class,
    #[token("module")]
    Module,
    #[token("interface")]
    Interface,
    #[token("end")]
    End,
    #[token("def")]
    Def,
    #[token("type")]
    Type,
    #[token("alias")]
    Alias,
    #[token("include")]
    Include,
    #[token("extend")]
    Extend,
    #[token("prepend")]
    Prepend,
    #[token("attr_reader")]
    AttrReader,
    #[token("attr_writer")]
    AttrWriter,
    #[token("attr_accessor")]
    AttrAccessor,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("unchecked")]
    Unchecked,
    #[token("in")]
    In,
    #[token("out")]
    Out,
    #[token("singleton")]
    Singleton,
    #[token("self")]
    SelfKw,
    #[token("instance")]
    Instance,
    #[token("untyped")]
    Untyped,
    #[token("bool")]
    Bool,
    #[token("bot")]
    Bot,
    #[token("top")]
    Top,
    #[token("void")]
    Void,
    #[token("nil")]
    Nil,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // === Operators (order matters - longer first) ===
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("::")]
    ColonColon,
    #[token("**")]
    StarStar,

    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("!")]
    Bang,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("^")]
    Caret,
    #[token("*")]
    Star,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,

    // === Comments (collected, not emitted as tokens) ===
    #[regex(r"#[^\n]*")]
    Comment,

    // === Annotations: %a with five delimiter pairs ===
    #[regex(r"%a\{[^}]*\}")]
    #[regex(r"%a\([^)]*\)")]
    #[regex(r"%a\[[^\]]*\]")]
    #[regex(r"%a<[^>]*>")]
    #[regex(r"%a\|[^|]*\|")]
    Annotation,

    // === Literals ===
    // Decimal integers with optional sign and underscore separators
    #[regex(r"[+-]?[0-9][0-9_]*")]
    Int,

    // Strings; the character classes deliberately admit newlines
    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleString,
    #[regex(r"'([^'\\]|\\.)*'")]
    SingleString,

    // Symbols: plain names (with optional ?/!/= suffix), variable
    // sigils, operator names, and quoted forms
    #[regex(r":[a-zA-Z_][a-zA-Z0-9_]*[?!=]?")]
    #[regex(r":@[a-zA-Z_][a-zA-Z0-9_]*")]
    #[regex(r":@@[a-zA-Z_][a-zA-Z0-9_]*")]
    #[regex(r":\$[a-zA-Z_][a-zA-Z0-9_]*")]
    #[regex(r":(\[\]=|\[\]|<=>|===|==|=~|<<|<=|>>|>=|!=|!~|\*\*|[+\-*/%<>!~^&|])")]
    #[regex(r#":"([^"\\]|\\.)*""#)]
    #[regex(r":'([^'\\]|\\.)*'")]
    Symbol,

    // Backtick-quoted identifier
    #[regex(r"`[^`\r\n]+`")]
    QuotedIdent,

    // === Names (must come after keywords) ===
    #[regex(r"_[A-Z][a-zA-Z0-9_]*", priority = 3)]
    InterfaceIdent,
    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    UpperIdent,
    #[regex(r"[a-z_][a-zA-Z0-9_]*")]
    LowerIdent,
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*")]
    GlobalName,
    #[regex(r"@@[a-zA-Z_][a-zA-Z0-9_]*")]
    CvarName,
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*")]
    IvarName,
}

/// Keywords of the signature grammar. Method and parameter names that
/// collide with one of these are rendered backtick-quoted.
pub const KEYWORDS: &[&str] = &[
    "class",
    "module",
    "interface",
    "end",
    "def",
    "type",
    "alias",
    "include",
    "extend",
    "prepend",
    "attr_reader",
    "attr_writer",
    "attr_accessor",
    "public",
    "private",
    "unchecked",
    "in",
    "out",
    "singleton",
    "self",
    "instance",
    "untyped",
    "bool",
    "bot",
    "top",
    "void",
    "nil",
    "true",
    "false",
];

/// Whether `name` is a reserved keyword of the signature grammar.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// A full-line comment collected during lexing.
///
/// `text` has the leading `#` (and one following space, if present)
/// stripped. Comments that trail other content on their line are not
/// collected; nothing can attach to them.
#[derive(Debug, Clone, PartialEq)]
pub struct LexedComment {
    pub span: Span,
    pub text: String,
}

/// The result of tokenizing: the token stream (ending with `Eof`) plus
/// the collected comments in source order.
#[derive(Debug, Clone)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub comments: Vec<LexedComment>,
}

/// The lexer for RBS signature source.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenize the entire source. Stops at the first error.
    pub fn tokenize(&mut self) -> Result<LexOutput, LexError> {
        let mut tokens = Vec::new();
        let mut comments = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let raw = match result {
                Ok(raw) => raw,
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    return Err(match ch {
                        '"' | '\'' | '`' => LexError::unterminated_string(span.start, self.source.len()),
                        _ => LexError::unexpected_char(ch, span.start),
                    });
                }
            };

            if raw == RawToken::Comment {
                if self.is_line_leading(span.start) {
                    comments.push(LexedComment {
                        span: Span::new(span.start, span.end),
                        text: strip_comment_prefix(slice).to_string(),
                    });
                }
                continue;
            }

            let kind = self.convert_token(raw, slice, span.start, span.end)?;
            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        Ok(LexOutput { tokens, comments })
    }

    /// Whether only blanks precede `offset` on its line.
    fn is_line_leading(&self, offset: usize) -> bool {
        self.source[..offset]
            .bytes()
            .rev()
            .take_while(|&b| b != b'\n')
            .all(|b| b == b' ' || b == b'\t' || b == b'\r')
    }

    /// Convert a raw logos token to our TokenKind, parsing literals.
    fn convert_token(
        &self,
        raw: RawToken,
        slice: &str,
        start: usize,
        end: usize,
    ) -> Result<TokenKind, LexError> {
        Ok(match raw {
            // Keywords
            RawToken::Class => TokenKind::Class,
            RawToken::Module => TokenKind::Module,
            RawToken::Interface => TokenKind::Interface,
            RawToken::End => TokenKind::End,
            RawToken::Def => TokenKind::Def,
            RawToken::Type => TokenKind::Type,
            RawToken::Alias => TokenKind::Alias,
            RawToken::Include => TokenKind::Include,
            RawToken::Extend => TokenKind::Extend,
            RawToken::Prepend => TokenKind::Prepend,
            RawToken::AttrReader => TokenKind::AttrReader,
            RawToken::AttrWriter => TokenKind::AttrWriter,
            RawToken::AttrAccessor => TokenKind::AttrAccessor,
            RawToken::Public => TokenKind::Public,
            RawToken::Private => TokenKind::Private,
            RawToken::Unchecked => TokenKind::Unchecked,
            RawToken::In => TokenKind::In,
            RawToken::Out => TokenKind::Out,
            RawToken::Singleton => TokenKind::Singleton,
            RawToken::SelfKw => TokenKind::SelfKw,
            RawToken::Instance => TokenKind::Instance,
            RawToken::Untyped => TokenKind::Untyped,
            RawToken::Bool => TokenKind::Bool,
            RawToken::Bot => TokenKind::Bot,
            RawToken::Top => TokenKind::Top,
            RawToken::Void => TokenKind::Void,
            RawToken::Nil => TokenKind::Nil,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,

            // Operators and delimiters
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::FatArrow => TokenKind::FatArrow,
            RawToken::ColonColon => TokenKind::ColonColon,
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Question => TokenKind::Question,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Star => TokenKind::Star,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,

            // Literals keep their raw lexeme; the formatter re-renders
            // strings and symbols from source text.
            RawToken::Int => {
                let digits = slice.replace('_', "");
                let value = digits
                    .parse::<i64>()
                    .map_err(|_| LexError::invalid_integer(start, end))?;
                TokenKind::Int(value)
            }
            RawToken::DoubleString | RawToken::SingleString => TokenKind::Str(slice.to_string()),
            RawToken::Symbol => TokenKind::Symbol(slice.to_string()),
            RawToken::Annotation => TokenKind::Annotation(slice.to_string()),
            RawToken::QuotedIdent => {
                TokenKind::QuotedIdent(slice[1..slice.len() - 1].to_string())
            }

            // Names
            RawToken::InterfaceIdent => TokenKind::InterfaceIdent(slice.to_string()),
            RawToken::UpperIdent => TokenKind::UpperIdent(slice.to_string()),
            RawToken::LowerIdent => TokenKind::LowerIdent(slice.to_string()),
            RawToken::GlobalName => TokenKind::GlobalName(slice.to_string()),
            RawToken::CvarName => TokenKind::CvarName(slice.to_string()),
            RawToken::IvarName => TokenKind::IvarName(slice.to_string()),

            RawToken::Comment => unreachable!("comments are filtered before conversion"),
        })
    }
}

/// Strip the `#` marker and at most one following space, plus any
/// carriage return the line-oriented match picked up.
fn strip_comment_prefix(line: &str) -> &str {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let rest = &line[1..];
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint: None,
        }
    }

    fn unterminated_string(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated string literal".to_string(),
            hint: Some("add a closing quote".to_string()),
        }
    }

    fn invalid_integer(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Integer literal out of range".to_string(),
            hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> LexOutput {
        Lexer::new(src).tokenize().expect("lex error")
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_names() {
        assert_eq!(
            kinds("class Foo end"),
            vec![
                TokenKind::Class,
                TokenKind::UpperIdent("Foo".to_string()),
                TokenKind::End,
                TokenKind::Eof,
            ]
        );
        // An identifier that merely starts with a keyword is a name
        assert_eq!(
            kinds("classes"),
            vec![TokenKind::LowerIdent("classes".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn interface_names() {
        assert_eq!(
            kinds("_Each _foo"),
            vec![
                TokenKind::InterfaceIdent("_Each".to_string()),
                TokenKind::LowerIdent("_foo".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn variable_sigils() {
        assert_eq!(
            kinds("@foo @@bar $baz"),
            vec![
                TokenKind::IvarName("@foo".to_string()),
                TokenKind::CvarName("@@bar".to_string()),
                TokenKind::GlobalName("$baz".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn namespaced_name_tokens() {
        assert_eq!(
            kinds("::Foo::Bar"),
            vec![
                TokenKind::ColonColon,
                TokenKind::UpperIdent("Foo".to_string()),
                TokenKind::ColonColon,
                TokenKind::UpperIdent("Bar".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn colon_before_symbol() {
        // `T: :foo` is a colon then a symbol; `:foo?` keeps its suffix
        assert_eq!(
            kinds("T: :foo"),
            vec![
                TokenKind::UpperIdent("T".to_string()),
                TokenKind::Colon,
                TokenKind::Symbol(":foo".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds(":foo? :foo !"),
            vec![
                TokenKind::Symbol(":foo?".to_string()),
                TokenKind::Symbol(":foo".to_string()),
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operator_and_quoted_symbols() {
        assert_eq!(
            kinds(":[]= :<=> :\"foo bar\" :'a'"),
            vec![
                TokenKind::Symbol(":[]=".to_string()),
                TokenKind::Symbol(":<=>".to_string()),
                TokenKind::Symbol(":\"foo bar\"".to_string()),
                TokenKind::Symbol(":'a'".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn strings_keep_raw_lexemes() {
        assert_eq!(
            kinds(r#""foo" 'bar' "a\"b" 'c\nd'"#),
            vec![
                TokenKind::Str(r#""foo""#.to_string()),
                TokenKind::Str("'bar'".to_string()),
                TokenKind::Str(r#""a\"b""#.to_string()),
                TokenKind::Str(r"'c\nd'".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn integers_normalize_value() {
        assert_eq!(
            kinds("1 +1 -2 1_000"),
            vec![
                TokenKind::Int(1),
                TokenKind::Int(1),
                TokenKind::Int(-2),
                TokenKind::Int(1000),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn punctuation_munch() {
        assert_eq!(
            kinds("-> => :: ... ** * ?"),
            vec![
                TokenKind::Arrow,
                TokenKind::FatArrow,
                TokenKind::ColonColon,
                TokenKind::Ellipsis,
                TokenKind::StarStar,
                TokenKind::Star,
                TokenKind::Question,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn self_receiver_sequence() {
        assert_eq!(
            kinds("self?.foo"),
            vec![
                TokenKind::SelfKw,
                TokenKind::Question,
                TokenKind::Dot,
                TokenKind::LowerIdent("foo".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn quoted_idents_strip_backticks() {
        assert_eq!(
            kinds("`type`"),
            vec![TokenKind::QuotedIdent("type".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn annotations_all_delimiters() {
        let src = "%a{pure} %a(x) %a[y] %a<z {inner}> %a|w|";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::Annotation("%a{pure}".to_string()),
                TokenKind::Annotation("%a(x)".to_string()),
                TokenKind::Annotation("%a[y]".to_string()),
                TokenKind::Annotation("%a<z {inner}>".to_string()),
                TokenKind::Annotation("%a|w|".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn full_line_comments_collected() {
        let out = lex("# leading\n  # indented\nT: Integer # trailing\n");
        assert_eq!(out.comments.len(), 2);
        assert_eq!(out.comments[0].text, "leading");
        assert_eq!(out.comments[1].text, "indented");
        // The trailing comment is dropped and never becomes a token
        assert!(out.tokens.iter().all(|t| !matches!(t.kind, TokenKind::Str(_))));
    }

    #[test]
    fn comment_prefix_stripping() {
        let out = lex("#bare\n#  two spaces\n#\n");
        assert_eq!(out.comments[0].text, "bare");
        assert_eq!(out.comments[1].text, " two spaces");
        assert_eq!(out.comments[2].text, "");
    }

    #[test]
    fn spans_cover_lexemes() {
        let out = lex("Foo: Integer");
        assert_eq!(out.tokens[0].span, Span::new(0, 3));
        assert_eq!(out.tokens[1].span, Span::new(3, 4));
        assert_eq!(out.tokens[2].span, Span::new(5, 12));
    }

    #[test]
    fn unexpected_character_errors() {
        let err = Lexer::new("T: ;").tokenize().unwrap_err();
        assert!(err.message.contains("Unexpected character"));
        assert_eq!(err.span.start, 3);
    }

    #[test]
    fn unterminated_string_errors() {
        let err = Lexer::new("T: \"oops").tokenize().unwrap_err();
        assert!(err.message.contains("Unterminated"));
        assert!(err.hint.is_some());
    }

    #[test]
    fn keyword_table() {
        assert!(is_keyword("class"));
        assert!(is_keyword("void"));
        assert!(!is_keyword("foo"));
        assert!(!is_keyword("classes"));
    }
}
