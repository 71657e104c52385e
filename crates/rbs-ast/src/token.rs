//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    /// String literal, raw lexeme including its quotes.
    Str(String),
    /// Symbol literal, raw lexeme including the leading `:`.
    Symbol(String),

    // Names
    /// Uppercase identifier: class names, constants, type variables.
    UpperIdent(String),
    /// Lowercase identifier: method names, alias names, parameter names.
    LowerIdent(String),
    /// Interface identifier: `_Foo`.
    InterfaceIdent(String),
    /// Global variable name including the `$` sigil.
    GlobalName(String),
    /// Instance variable name including the `@` sigil.
    IvarName(String),
    /// Class variable name including the `@@` sigil.
    CvarName(String),
    /// Backtick-quoted identifier, without the backticks.
    QuotedIdent(String),

    /// `%a{...}` annotation, raw lexeme including delimiters.
    Annotation(String),

    // Keywords
    Class,
    Module,
    Interface,
    End,
    Def,
    Type,
    Alias,
    Include,
    Extend,
    Prepend,
    AttrReader,
    AttrWriter,
    AttrAccessor,
    Public,
    Private,
    Unchecked,
    In,
    Out,
    Singleton,
    SelfKw,
    Instance,
    Untyped,
    Bool,
    Bot,
    Top,
    Void,
    Nil,
    True,
    False,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    ColonColon,
    Question,
    Bang,
    Pipe,
    Amp,
    Caret,
    Star,
    StarStar,
    Arrow,
    FatArrow,
    Dot,
    Ellipsis,
    Eq,
    Lt,
    Plus,
    Minus,

    Eof,
}

impl TokenKind {
    /// Human-readable name for error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            // Literals
            TokenKind::Int(_) => "an integer",
            TokenKind::Str(_) => "a string",
            TokenKind::Symbol(_) => "a symbol",

            // Names
            TokenKind::UpperIdent(_) => "a constant name",
            TokenKind::LowerIdent(_) => "a name",
            TokenKind::InterfaceIdent(_) => "an interface name",
            TokenKind::GlobalName(_) => "a global name",
            TokenKind::IvarName(_) => "an instance variable name",
            TokenKind::CvarName(_) => "a class variable name",
            TokenKind::QuotedIdent(_) => "a quoted name",

            TokenKind::Annotation(_) => "an annotation",

            // Keywords
            TokenKind::Class => "'class'",
            TokenKind::Module => "'module'",
            TokenKind::Interface => "'interface'",
            TokenKind::End => "'end'",
            TokenKind::Def => "'def'",
            TokenKind::Type => "'type'",
            TokenKind::Alias => "'alias'",
            TokenKind::Include => "'include'",
            TokenKind::Extend => "'extend'",
            TokenKind::Prepend => "'prepend'",
            TokenKind::AttrReader => "'attr_reader'",
            TokenKind::AttrWriter => "'attr_writer'",
            TokenKind::AttrAccessor => "'attr_accessor'",
            TokenKind::Public => "'public'",
            TokenKind::Private => "'private'",
            TokenKind::Unchecked => "'unchecked'",
            TokenKind::In => "'in'",
            TokenKind::Out => "'out'",
            TokenKind::Singleton => "'singleton'",
            TokenKind::SelfKw => "'self'",
            TokenKind::Instance => "'instance'",
            TokenKind::Untyped => "'untyped'",
            TokenKind::Bool => "'bool'",
            TokenKind::Bot => "'bot'",
            TokenKind::Top => "'top'",
            TokenKind::Void => "'void'",
            TokenKind::Nil => "'nil'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",

            // Punctuation
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::ColonColon => "'::'",
            TokenKind::Question => "'?'",
            TokenKind::Bang => "'!'",
            TokenKind::Pipe => "'|'",
            TokenKind::Amp => "'&'",
            TokenKind::Caret => "'^'",
            TokenKind::Star => "'*'",
            TokenKind::StarStar => "'**'",
            TokenKind::Arrow => "'->'",
            TokenKind::FatArrow => "'=>'",
            TokenKind::Dot => "'.'",
            TokenKind::Ellipsis => "'...'",
            TokenKind::Eq => "'='",
            TokenKind::Lt => "'<'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",

            TokenKind::Eof => "end of file",
        }
    }

    /// The source text of a keyword token, if this is one.
    pub fn keyword_text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Class => "class",
            TokenKind::Module => "module",
            TokenKind::Interface => "interface",
            TokenKind::End => "end",
            TokenKind::Def => "def",
            TokenKind::Type => "type",
            TokenKind::Alias => "alias",
            TokenKind::Include => "include",
            TokenKind::Extend => "extend",
            TokenKind::Prepend => "prepend",
            TokenKind::AttrReader => "attr_reader",
            TokenKind::AttrWriter => "attr_writer",
            TokenKind::AttrAccessor => "attr_accessor",
            TokenKind::Public => "public",
            TokenKind::Private => "private",
            TokenKind::Unchecked => "unchecked",
            TokenKind::In => "in",
            TokenKind::Out => "out",
            TokenKind::Singleton => "singleton",
            TokenKind::SelfKw => "self",
            TokenKind::Instance => "instance",
            TokenKind::Untyped => "untyped",
            TokenKind::Bool => "bool",
            TokenKind::Bot => "bot",
            TokenKind::Top => "top",
            TokenKind::Void => "void",
            TokenKind::Nil => "nil",
            TokenKind::True => "true",
            TokenKind::False => "false",
            _ => return None,
        };
        Some(text)
    }
}
