//! Type expressions and method signatures.

use crate::Span;

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub kind: TypeKind,
    pub span: Span,
}

/// The kind of type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// A keyword base type: `untyped`, `void`, `self`, ...
    Base(BaseType),
    /// A generic type variable bound by an enclosing declaration or
    /// method signature: `T`.
    Variable(String),
    /// A class reference with optional arguments: `Foo`, `Array[T]`.
    ClassInstance(TypeRef),
    /// An interface reference with optional arguments: `_Each[String]`.
    Interface(TypeRef),
    /// A type alias reference with optional arguments: `foo`.
    Alias(TypeRef),
    /// `singleton(Foo)`.
    Singleton(String),
    /// `T?`.
    Optional(Box<Type>),
    /// `A | B | C`.
    Union(Vec<Type>),
    /// `A & B & C`.
    Intersection(Vec<Type>),
    /// `[A, B]`; empty tuples render as `[ ]`.
    Tuple(Vec<Type>),
    /// `{ foo: A, "bar" => B }`.
    Record(Vec<RecordField>),
    /// A literal type: `"foo"`, `:sym`, `1`, `true`.
    Literal(LiteralValue),
    /// `^(A) -> B`.
    Proc(Box<MethodType>),
}

/// Keyword base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Untyped,
    Bool,
    Bot,
    Class,
    Instance,
    Nil,
    SelfType,
    Top,
    Void,
}

impl BaseType {
    /// The keyword this base type renders as.
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Untyped => "untyped",
            BaseType::Bool => "bool",
            BaseType::Bot => "bot",
            BaseType::Class => "class",
            BaseType::Instance => "instance",
            BaseType::Nil => "nil",
            BaseType::SelfType => "self",
            BaseType::Top => "top",
            BaseType::Void => "void",
        }
    }
}

/// A possibly-namespaced name with optional generic arguments, shared by
/// class/interface/alias references, superclasses, mixins, and module
/// self-type constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    /// Full name as written, `::`-joined: `Foo`, `::Foo::Bar`, `_Each`.
    pub name: String,
    pub args: Vec<Type>,
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub key: RecordKey,
    pub value: Type,
}

/// A record field key.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKey {
    /// A symbol-ish key, stored without the `:`. Written either as a
    /// label (`foo: T`) or arrow form (`:foo => T`); rendering picks the
    /// label form when the name is a plain label.
    Name(String),
    /// A quoted symbol key, raw lexeme including the `:` and quotes.
    QuotedSymbol(String),
    /// A string key, raw lexeme including quotes.
    Str(String),
    Int(i64),
    Bool(bool),
}

/// A literal type value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Raw lexeme including quotes.
    Str(String),
    /// Raw lexeme including the leading `:`.
    Symbol(String),
    Int(i64),
    Bool(bool),
}

/// One method signature: type parameters, function type, optional block.
///
/// Also the payload of a proc type, which reuses the same shape with an
/// always-empty type parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodType {
    pub type_params: Vec<TypeParam>,
    pub fn_type: FnType,
    pub block: Option<Block>,
}

/// Ordered parameter groups and the return type of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct FnType {
    pub required_positionals: Vec<Param>,
    pub optional_positionals: Vec<Param>,
    pub rest_positional: Option<Param>,
    pub trailing_positionals: Vec<Param>,
    pub required_keywords: Vec<Keyword>,
    pub optional_keywords: Vec<Keyword>,
    pub rest_keyword: Option<Param>,
    pub return_type: Type,
}

impl FnType {
    /// Whether any parameter group is non-empty.
    pub fn has_params(&self) -> bool {
        !self.required_positionals.is_empty()
            || !self.optional_positionals.is_empty()
            || self.rest_positional.is_some()
            || !self.trailing_positionals.is_empty()
            || !self.required_keywords.is_empty()
            || !self.optional_keywords.is_empty()
            || self.rest_keyword.is_some()
    }
}

/// A positional parameter: type plus optional name.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Type,
    pub name: Option<String>,
}

/// A keyword parameter: `name: Type var`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub param: Param,
}

/// A block clause: `{ (T) -> void }`, optionally prefixed with `?`.
///
/// Blocks carry a plain function type; they cannot declare their own
/// type parameters or nested blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub required: bool,
    pub fn_type: FnType,
}

/// A generic type parameter: `unchecked out T < Bound`.
///
/// Declaration headers accept all modifiers; method signatures only
/// declare a name and optional bound.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub unchecked: bool,
    pub variance: Variance,
    pub upper_bound: Option<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}
