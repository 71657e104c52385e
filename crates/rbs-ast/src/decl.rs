//! Top-level declarations.

use crate::member::Member;
use crate::ty::{Type, TypeParam, TypeRef};
use crate::{Annotation, Comment, Span};

/// A parsed signature file: a sequence of declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub decls: Vec<Decl>,
}

/// A declaration, at the top level or nested inside a body.
///
/// The span covers the declaration proper, excluding any attached
/// comment or annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
    pub comment: Option<Comment>,
    pub annotations: Vec<Annotation>,
}

/// The kind of declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// `class Foo[A] < Bar ... end`
    Class(ClassDecl),
    /// `module Foo : _Each[String] ... end`
    Module(ModuleDecl),
    /// `interface _Foo ... end`
    Interface(InterfaceDecl),
    /// `Foo: Integer`
    Constant(ConstantDecl),
    /// `$foo: Integer`
    Global(GlobalDecl),
    /// `type foo[A] = A?`
    TypeAlias(TypeAliasDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<TypeRef>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub self_types: Vec<TypeRef>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDecl {
    /// Possibly-namespaced constant name: `Foo`, `Foo::BAR`.
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDecl {
    /// Name including the `$` sigil.
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    /// Possibly-namespaced alias name: `foo`, `Foo::bar`.
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub ty: Type,
}
