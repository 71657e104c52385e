//! Members of class, module, and interface bodies.

use crate::decl::DeclKind;
use crate::ty::{MethodType, Type, TypeRef};
use crate::{Annotation, Comment, Span};

/// One member of a declaration body.
///
/// The span covers the member proper, excluding any attached comment or
/// annotations; blank-line preservation compares these spans line-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub kind: MemberKind,
    pub span: Span,
    pub comment: Option<Comment>,
    pub annotations: Vec<Annotation>,
}

/// The kind of member.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    /// `alias foo bar` / `alias self.foo self.bar`
    Alias(AliasMember),
    /// `attr_reader foo: T` and friends
    Attr(AttrMember),
    /// `@foo: T`
    InstanceVariable(VarMember),
    /// `@@foo: T`
    ClassVariable(VarMember),
    /// `self.@foo: T`
    ClassInstanceVariable(VarMember),
    /// `include Foo[T]`
    Include(TypeRef),
    /// `extend Foo[T]`
    Extend(TypeRef),
    /// `prepend Foo[T]`
    Prepend(TypeRef),
    /// Bare `public` marker
    Public,
    /// Bare `private` marker
    Private,
    /// `def foo: () -> void`
    Def(DefMember),
    /// A declaration nested inside the body (constant, class, ...).
    Decl(DeclKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasMember {
    pub new_name: String,
    pub old_name: String,
    pub singleton: bool,
}

/// An attribute member. `kind` selects reader/writer/accessor; `ivar`
/// carries the explicit `(@name)` / suppressed `()` instance variable
/// forms.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrMember {
    pub kind: AttrKind,
    pub name: String,
    pub ivar: AttrIvar,
    pub ty: Type,
    pub singleton: bool,
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Reader,
    Writer,
    Accessor,
}

impl AttrKind {
    pub fn keyword(self) -> &'static str {
        match self {
            AttrKind::Reader => "attr_reader",
            AttrKind::Writer => "attr_writer",
            AttrKind::Accessor => "attr_accessor",
        }
    }
}

/// The instance-variable clause of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrIvar {
    /// No clause written; the attribute uses its default variable.
    Default,
    /// `()` — no backing variable.
    Suppressed,
    /// `(@name)`, stored with the sigil.
    Named(String),
}

/// A variable member; `name` keeps its sigil (`@foo`, `@@foo`).
#[derive(Debug, Clone, PartialEq)]
pub struct VarMember {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// A method definition with one or more overloads.
#[derive(Debug, Clone, PartialEq)]
pub struct DefMember {
    pub name: String,
    pub kind: DefKind,
    pub visibility: Option<Visibility>,
    pub overloads: Vec<MethodType>,
    /// `| ...` marker: the method accepts further, unlisted overloads.
    pub overloading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    /// `def foo`
    Instance,
    /// `def self.foo`
    Singleton,
    /// `def self?.foo`
    SingletonInstance,
}

impl DefKind {
    /// The receiver prefix rendered before the method name.
    pub fn prefix(self) -> &'static str {
        match self {
            DefKind::Instance => "",
            DefKind::Singleton => "self.",
            DefKind::SingletonInstance => "self?.",
        }
    }
}
