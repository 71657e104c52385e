// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for RBS signature files.
//!
//! Transforms a token stream into a declaration tree, attaching leading
//! comments and annotations along the way.

mod hints;
mod parser;

pub use parser::{parse, ParseError, Parser};

#[cfg(test)]
mod tests {
    use super::*;
    use rbs_ast::decl::{DeclKind, Root};
    use rbs_ast::member::{
        AttrIvar, AttrKind, DefKind, Member, MemberKind, Visibility,
    };
    use rbs_ast::ty::{BaseType, LiteralValue, RecordKey, Type, TypeKind, Variance};

    fn parse(src: &str) -> Root {
        match super::parse(src) {
            Ok(root) => root,
            Err(e) => panic!("Parse error: {} (span {:?})", e, e.span),
        }
    }

    fn parse_err(src: &str) -> ParseError {
        match super::parse(src) {
            Ok(_) => panic!("Expected a parse error for {:?}", src),
            Err(e) => e,
        }
    }

    fn class_members(src: &str) -> Vec<Member> {
        let mut root = parse(src);
        match root.decls.remove(0).kind {
            DeclKind::Class(c) => c.members,
            other => panic!("Expected a class declaration, got {:?}", other),
        }
    }

    fn const_type(src: &str) -> Type {
        let mut root = parse(src);
        match root.decls.remove(0).kind {
            DeclKind::Constant(c) => c.ty,
            other => panic!("Expected a constant declaration, got {:?}", other),
        }
    }

    #[test]
    fn parse_class_with_superclass() {
        let root = parse("class Foo < Bar\n  def baz: () -> void\nend\n");
        assert_eq!(root.decls.len(), 1);
        if let DeclKind::Class(ref c) = root.decls[0].kind {
            assert_eq!(c.name, "Foo");
            assert_eq!(c.superclass.as_ref().unwrap().name, "Bar");
            assert_eq!(c.members.len(), 1);
        } else {
            panic!("Expected a class declaration");
        }
    }

    #[test]
    fn parse_generic_class_header() {
        let root = parse("class Box[unchecked out T < Numeric, in U]\nend\n");
        if let DeclKind::Class(ref c) = root.decls[0].kind {
            assert_eq!(c.type_params.len(), 2);
            assert_eq!(c.type_params[0].name, "T");
            assert!(c.type_params[0].unchecked);
            assert_eq!(c.type_params[0].variance, Variance::Covariant);
            assert!(c.type_params[0].upper_bound.is_some());
            assert_eq!(c.type_params[1].name, "U");
            assert!(!c.type_params[1].unchecked);
            assert_eq!(c.type_params[1].variance, Variance::Contravariant);
            assert!(c.type_params[1].upper_bound.is_none());
        } else {
            panic!("Expected a class declaration");
        }
    }

    #[test]
    fn parse_bound_referencing_earlier_param() {
        let root = parse("class Pair[T, U < T]\nend\n");
        if let DeclKind::Class(ref c) = root.decls[0].kind {
            let bound = c.type_params[1].upper_bound.as_ref().unwrap();
            assert_eq!(bound.kind, TypeKind::Variable("T".to_string()));
        } else {
            panic!("Expected a class declaration");
        }
    }

    #[test]
    fn parse_module_with_self_types() {
        let root = parse("module Enumerable[A] : _Each[A], Comparable\nend\n");
        if let DeclKind::Module(ref m) = root.decls[0].kind {
            assert_eq!(m.name, "Enumerable");
            assert_eq!(m.self_types.len(), 2);
            assert_eq!(m.self_types[0].name, "_Each");
            assert_eq!(m.self_types[0].args.len(), 1);
            assert_eq!(m.self_types[1].name, "Comparable");
        } else {
            panic!("Expected a module declaration");
        }
    }

    #[test]
    fn parse_interface_decl() {
        let root = parse("interface _Reader\n  def read: (Integer) -> String\nend\n");
        if let DeclKind::Interface(ref i) = root.decls[0].kind {
            assert_eq!(i.name, "_Reader");
            assert_eq!(i.members.len(), 1);
        } else {
            panic!("Expected an interface declaration");
        }
    }

    #[test]
    fn parse_constants_and_globals() {
        let root = parse("Foo::BAR: Integer\n::VERSION: String\n$stdout: IO\n");
        assert_eq!(root.decls.len(), 3);
        if let DeclKind::Constant(ref c) = root.decls[0].kind {
            assert_eq!(c.name, "Foo::BAR");
        } else {
            panic!("Expected a constant declaration");
        }
        if let DeclKind::Constant(ref c) = root.decls[1].kind {
            assert_eq!(c.name, "::VERSION");
        } else {
            panic!("Expected a constant declaration");
        }
        if let DeclKind::Global(ref g) = root.decls[2].kind {
            assert_eq!(g.name, "$stdout");
        } else {
            panic!("Expected a global declaration");
        }
    }

    #[test]
    fn parse_type_alias_decl() {
        let root = parse("type Foo::result[T] = T | nil\n");
        if let DeclKind::TypeAlias(ref a) = root.decls[0].kind {
            assert_eq!(a.name, "Foo::result");
            assert_eq!(a.type_params.len(), 1);
            if let TypeKind::Union(ref types) = a.ty.kind {
                assert_eq!(types[0].kind, TypeKind::Variable("T".to_string()));
                assert_eq!(types[1].kind, TypeKind::Base(BaseType::Nil));
            } else {
                panic!("Expected a union type");
            }
        } else {
            panic!("Expected a type alias declaration");
        }
    }

    #[test]
    fn parse_def_kinds() {
        let members = class_members(
            "class C\n  def a: () -> void\n  def self.b: () -> void\n  def self?.c: () -> void\nend\n",
        );
        let kinds: Vec<DefKind> = members
            .iter()
            .map(|m| match &m.kind {
                MemberKind::Def(d) => d.kind,
                other => panic!("Expected a method member, got {:?}", other),
            })
            .collect();
        assert_eq!(kinds, vec![DefKind::Instance, DefKind::Singleton, DefKind::SingletonInstance]);
    }

    #[test]
    fn parse_method_names() {
        let members = class_members(
            "class C\n  def foo?: () -> bool\n  def bar!: () -> void\n  def baz=: (Integer) -> Integer\n  def []: (Integer) -> untyped\n  def []=: (Integer, untyped) -> untyped\n  def +: (C) -> C\n  def <: (C) -> bool\n  def `quoted`: () -> void\n  def class: () -> untyped\nend\n",
        );
        let names: Vec<&str> = members
            .iter()
            .map(|m| match &m.kind {
                MemberKind::Def(d) => d.name.as_str(),
                other => panic!("Expected a method member, got {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["foo?", "bar!", "baz=", "[]", "[]=", "+", "<", "quoted", "class"]);
    }

    #[test]
    fn parse_full_parameter_ordering() {
        let members = class_members(
            "class C\n  def f: (A a, ?B b, *C c, D d, e: E, ?f: F, **G g) -> void\nend\n",
        );
        if let MemberKind::Def(ref d) = members[0].kind {
            let fn_type = &d.overloads[0].fn_type;
            assert_eq!(fn_type.required_positionals.len(), 1);
            assert_eq!(fn_type.required_positionals[0].name.as_deref(), Some("a"));
            assert_eq!(fn_type.optional_positionals.len(), 1);
            assert!(fn_type.rest_positional.is_some());
            assert_eq!(fn_type.trailing_positionals.len(), 1);
            assert_eq!(fn_type.trailing_positionals[0].name.as_deref(), Some("d"));
            assert_eq!(fn_type.required_keywords.len(), 1);
            assert_eq!(fn_type.required_keywords[0].name, "e");
            assert_eq!(fn_type.optional_keywords.len(), 1);
            assert_eq!(fn_type.optional_keywords[0].name, "f");
            assert!(fn_type.rest_keyword.is_some());
        } else {
            panic!("Expected a method member");
        }
    }

    #[test]
    fn parse_keyword_named_keywords() {
        // Ruby keywords are fine as keyword argument names.
        let members =
            class_members("class C\n  def f: (class: Integer, ?type: String) -> void\nend\n");
        if let MemberKind::Def(ref d) = members[0].kind {
            let fn_type = &d.overloads[0].fn_type;
            assert_eq!(fn_type.required_keywords[0].name, "class");
            assert_eq!(fn_type.optional_keywords[0].name, "type");
        } else {
            panic!("Expected a method member");
        }
    }

    #[test]
    fn parse_parenless_signature() {
        let members = class_members("class C\n  def f: -> void\nend\n");
        if let MemberKind::Def(ref d) = members[0].kind {
            assert!(!d.overloads[0].fn_type.has_params());
        } else {
            panic!("Expected a method member");
        }
    }

    #[test]
    fn parse_blocks() {
        let members = class_members(
            "class C\n  def each: () { (Integer) -> void } -> self\n  def map: [U] () ?{ () -> U } -> U\nend\n",
        );
        if let MemberKind::Def(ref d) = members[0].kind {
            let block = d.overloads[0].block.as_ref().unwrap();
            assert!(block.required);
            assert_eq!(block.fn_type.required_positionals.len(), 1);
        } else {
            panic!("Expected a method member");
        }
        if let MemberKind::Def(ref d) = members[1].kind {
            assert_eq!(d.overloads[0].type_params[0].name, "U");
            let block = d.overloads[0].block.as_ref().unwrap();
            assert!(!block.required);
            // U is in scope within the whole signature.
            assert_eq!(
                d.overloads[0].fn_type.return_type.kind,
                TypeKind::Variable("U".to_string())
            );
        } else {
            panic!("Expected a method member");
        }
    }

    #[test]
    fn parse_method_type_param_bound() {
        let members = class_members("class C\n  def f: [T < _ToS] (T) -> String\nend\n");
        if let MemberKind::Def(ref d) = members[0].kind {
            let param = &d.overloads[0].type_params[0];
            assert_eq!(param.name, "T");
            assert!(param.upper_bound.is_some());
            assert_eq!(param.variance, Variance::Invariant);
        } else {
            panic!("Expected a method member");
        }
    }

    #[test]
    fn parse_overloads() {
        let members = class_members(
            "class C\n  def f: (Integer) -> String\n       | (String) -> String\n       | ...\nend\n",
        );
        if let MemberKind::Def(ref d) = members[0].kind {
            assert_eq!(d.overloads.len(), 2);
            assert!(d.overloading);
        } else {
            panic!("Expected a method member");
        }
    }

    #[test]
    fn parse_alias_members() {
        let members = class_members("class C\n  alias add +\n  alias self.make self.new\nend\n");
        if let MemberKind::Alias(ref a) = members[0].kind {
            assert_eq!(a.new_name, "add");
            assert_eq!(a.old_name, "+");
            assert!(!a.singleton);
        } else {
            panic!("Expected an alias member");
        }
        if let MemberKind::Alias(ref a) = members[1].kind {
            assert_eq!(a.new_name, "make");
            assert_eq!(a.old_name, "new");
            assert!(a.singleton);
        } else {
            panic!("Expected an alias member");
        }
    }

    #[test]
    fn parse_attr_members() {
        let members = class_members(
            "class C\n  attr_reader name: String\n  attr_writer self.count (@count): Integer\n  attr_accessor size (): Integer\nend\n",
        );
        if let MemberKind::Attr(ref a) = members[0].kind {
            assert_eq!(a.kind, AttrKind::Reader);
            assert_eq!(a.name, "name");
            assert_eq!(a.ivar, AttrIvar::Default);
            assert!(!a.singleton);
            assert!(a.visibility.is_none());
        } else {
            panic!("Expected an attribute member");
        }
        if let MemberKind::Attr(ref a) = members[1].kind {
            assert_eq!(a.kind, AttrKind::Writer);
            assert!(a.singleton);
            assert_eq!(a.ivar, AttrIvar::Named("@count".to_string()));
        } else {
            panic!("Expected an attribute member");
        }
        if let MemberKind::Attr(ref a) = members[2].kind {
            assert_eq!(a.kind, AttrKind::Accessor);
            assert_eq!(a.ivar, AttrIvar::Suppressed);
        } else {
            panic!("Expected an attribute member");
        }
    }

    #[test]
    fn parse_variable_members() {
        let members = class_members("class C\n  @x: Integer\n  @@y: String\n  self.@z: bool\nend\n");
        if let MemberKind::InstanceVariable(ref v) = members[0].kind {
            assert_eq!(v.name, "@x");
        } else {
            panic!("Expected an instance variable member");
        }
        if let MemberKind::ClassVariable(ref v) = members[1].kind {
            assert_eq!(v.name, "@@y");
        } else {
            panic!("Expected a class variable member");
        }
        if let MemberKind::ClassInstanceVariable(ref v) = members[2].kind {
            assert_eq!(v.name, "@z");
        } else {
            panic!("Expected a class instance variable member");
        }
    }

    #[test]
    fn parse_mixin_members() {
        let members = class_members(
            "class C\n  include Enumerable[Integer]\n  extend ClassMethods\n  prepend _Wrapper\nend\n",
        );
        if let MemberKind::Include(ref r) = members[0].kind {
            assert_eq!(r.name, "Enumerable");
            assert_eq!(r.args.len(), 1);
        } else {
            panic!("Expected an include member");
        }
        assert!(matches!(members[1].kind, MemberKind::Extend(_)));
        if let MemberKind::Prepend(ref r) = members[2].kind {
            assert_eq!(r.name, "_Wrapper");
        } else {
            panic!("Expected a prepend member");
        }
    }

    #[test]
    fn parse_visibility_markers_and_modifiers() {
        let members = class_members(
            "class C\n  private\n  def secret: () -> void\n  public def open_access: () -> void\n  private attr_reader token: String\nend\n",
        );
        assert!(matches!(members[0].kind, MemberKind::Private));
        if let MemberKind::Def(ref d) = members[1].kind {
            assert!(d.visibility.is_none());
        } else {
            panic!("Expected a method member");
        }
        if let MemberKind::Def(ref d) = members[2].kind {
            assert_eq!(d.visibility, Some(Visibility::Public));
        } else {
            panic!("Expected a method member");
        }
        if let MemberKind::Attr(ref a) = members[3].kind {
            assert_eq!(a.visibility, Some(Visibility::Private));
        } else {
            panic!("Expected an attribute member");
        }
    }

    #[test]
    fn visibility_modifier_requires_same_line() {
        // A marker on its own line does not modify the next member.
        let members = class_members("class C\n  public\n  def m: () -> void\nend\n");
        assert!(matches!(members[0].kind, MemberKind::Public));
        if let MemberKind::Def(ref d) = members[1].kind {
            assert!(d.visibility.is_none());
        } else {
            panic!("Expected a method member");
        }
    }

    #[test]
    fn parse_nested_declarations() {
        let root = parse("module M\n  class Inner\n  end\n  CONST: Integer\n  type t = Integer\nend\n");
        if let DeclKind::Module(ref m) = root.decls[0].kind {
            assert_eq!(m.members.len(), 3);
            assert!(matches!(m.members[0].kind, MemberKind::Decl(DeclKind::Class(_))));
            assert!(matches!(m.members[1].kind, MemberKind::Decl(DeclKind::Constant(_))));
            assert!(matches!(m.members[2].kind, MemberKind::Decl(DeclKind::TypeAlias(_))));
        } else {
            panic!("Expected a module declaration");
        }
    }

    #[test]
    fn union_binds_looser_than_intersection() {
        let ty = const_type("X: A | B & C\n");
        if let TypeKind::Union(ref types) = ty.kind {
            assert_eq!(types.len(), 2);
            assert!(matches!(types[1].kind, TypeKind::Intersection(_)));
        } else {
            panic!("Expected a union type");
        }

        let ty = const_type("Y: (A | B) & C\n");
        if let TypeKind::Intersection(ref types) = ty.kind {
            assert_eq!(types.len(), 2);
            assert!(matches!(types[0].kind, TypeKind::Union(_)));
        } else {
            panic!("Expected an intersection type");
        }
    }

    #[test]
    fn optional_type_allows_detached_question() {
        let ty = const_type("X: Integer ?\n");
        assert!(matches!(ty.kind, TypeKind::Optional(_)));

        let ty = const_type("Y: Integer??\n");
        if let TypeKind::Optional(ref inner) = ty.kind {
            assert!(matches!(inner.kind, TypeKind::Optional(_)));
        } else {
            panic!("Expected an optional type");
        }
    }

    #[test]
    fn parse_tuple_types() {
        let ty = const_type("X: [Integer, String]\n");
        if let TypeKind::Tuple(ref types) = ty.kind {
            assert_eq!(types.len(), 2);
        } else {
            panic!("Expected a tuple type");
        }

        let ty = const_type("Y: [ ]\n");
        assert_eq!(ty.kind, TypeKind::Tuple(Vec::new()));
    }

    #[test]
    fn parse_record_keys() {
        let ty = const_type(
            "X: { name: String, :foo => Integer, :\"quo ted\" => bool, \"str\" => Integer, 42 => String, true => untyped }\n",
        );
        if let TypeKind::Record(ref fields) = ty.kind {
            assert_eq!(fields.len(), 6);
            assert_eq!(fields[0].key, RecordKey::Name("name".to_string()));
            assert_eq!(fields[1].key, RecordKey::Name("foo".to_string()));
            assert_eq!(fields[2].key, RecordKey::QuotedSymbol(":\"quo ted\"".to_string()));
            assert_eq!(fields[3].key, RecordKey::Str("\"str\"".to_string()));
            assert_eq!(fields[4].key, RecordKey::Int(42));
            assert_eq!(fields[5].key, RecordKey::Bool(true));
        } else {
            panic!("Expected a record type");
        }
    }

    #[test]
    fn record_allows_trailing_comma() {
        let ty = const_type("X: { a: Integer, }\n");
        if let TypeKind::Record(ref fields) = ty.kind {
            assert_eq!(fields.len(), 1);
        } else {
            panic!("Expected a record type");
        }
    }

    #[test]
    fn parse_proc_types() {
        let ty = const_type("X: ^(Integer) -> String\n");
        if let TypeKind::Proc(ref p) = ty.kind {
            assert_eq!(p.fn_type.required_positionals.len(), 1);
            assert!(p.block.is_none());
        } else {
            panic!("Expected a proc type");
        }

        // Zero-parameter procs drop the parentheses entirely.
        let ty = const_type("Y: ^-> void\n");
        if let TypeKind::Proc(ref p) = ty.kind {
            assert!(!p.fn_type.has_params());
        } else {
            panic!("Expected a proc type");
        }

        let ty = const_type("Z: ^(Integer) { (String) -> void } -> bool\n");
        if let TypeKind::Proc(ref p) = ty.kind {
            assert!(p.block.is_some());
        } else {
            panic!("Expected a proc type");
        }
    }

    #[test]
    fn parse_singleton_type() {
        let ty = const_type("X: singleton(::Foo::Bar)\n");
        assert_eq!(ty.kind, TypeKind::Singleton("::Foo::Bar".to_string()));
    }

    #[test]
    fn parse_literal_types() {
        let cases: Vec<(&str, LiteralValue)> = vec![
            ("A: 42\n", LiteralValue::Int(42)),
            ("B: -7\n", LiteralValue::Int(-7)),
            ("C: \"str\"\n", LiteralValue::Str("\"str\"".to_string())),
            ("D: :sym\n", LiteralValue::Symbol(":sym".to_string())),
            ("E: true\n", LiteralValue::Bool(true)),
            ("F: false\n", LiteralValue::Bool(false)),
        ];
        for (src, expected) in cases {
            let ty = const_type(src);
            assert_eq!(ty.kind, TypeKind::Literal(expected), "for {:?}", src);
        }
    }

    #[test]
    fn type_variables_respect_scope() {
        let members = class_members(
            "class Box[T]\n  def get: () -> T\n  def to_s: () -> S\n  @raw: ::T\nend\n",
        );
        if let MemberKind::Def(ref d) = members[0].kind {
            assert_eq!(d.overloads[0].fn_type.return_type.kind, TypeKind::Variable("T".to_string()));
        } else {
            panic!("Expected a method member");
        }
        if let MemberKind::Def(ref d) = members[1].kind {
            // S is not bound anywhere, so it names a class.
            assert!(matches!(d.overloads[0].fn_type.return_type.kind, TypeKind::ClassInstance(_)));
        } else {
            panic!("Expected a method member");
        }
        if let MemberKind::InstanceVariable(ref v) = members[2].kind {
            // An absolute path is never a type variable.
            assert!(matches!(v.ty.kind, TypeKind::ClassInstance(_)));
        } else {
            panic!("Expected an instance variable member");
        }
    }

    #[test]
    fn parse_named_type_kinds() {
        assert!(matches!(const_type("A: _Foo\n").kind, TypeKind::Interface(_)));
        assert!(matches!(const_type("B: string_alias\n").kind, TypeKind::Alias(_)));
        assert!(matches!(const_type("C: Foo::_Bar\n").kind, TypeKind::Interface(_)));
        assert!(matches!(const_type("D: Foo::bar\n").kind, TypeKind::Alias(_)));
        assert!(matches!(const_type("E: ::Foo::Bar[Integer]\n").kind, TypeKind::ClassInstance(_)));
    }

    #[test]
    fn comment_attaches_to_declaration() {
        let root = parse("# first\n# second\nclass Foo\nend\n");
        let comment = root.decls[0].comment.as_ref().unwrap();
        assert_eq!(comment.text, "first\nsecond");
    }

    #[test]
    fn detached_comment_is_dropped() {
        let root = parse("# floating\n\n# attached\nclass Foo\nend\n");
        let comment = root.decls[0].comment.as_ref().unwrap();
        assert_eq!(comment.text, "attached");
    }

    #[test]
    fn comment_attaches_before_annotations() {
        let root = parse("# doc\n%a{pure}\nclass Foo\nend\n");
        assert_eq!(root.decls[0].comment.as_ref().unwrap().text, "doc");
        assert_eq!(root.decls[0].annotations.len(), 1);
        assert_eq!(root.decls[0].annotations[0].text, "%a{pure}");
    }

    #[test]
    fn comment_attaches_to_member() {
        let members = class_members("class C\n  # doc\n  def m: () -> void\nend\n");
        assert_eq!(members[0].comment.as_ref().unwrap().text, "doc");

        let members = class_members("class C\n  # far\n\n  def m: () -> void\nend\n");
        assert!(members[0].comment.is_none());
    }

    #[test]
    fn visibility_marker_takes_no_comment() {
        let members = class_members("class C\n  # note\n  private\nend\n");
        assert!(matches!(members[0].kind, MemberKind::Private));
        assert!(members[0].comment.is_none());
    }

    #[test]
    fn spans_exclude_leading_trivia() {
        let src = "# c\nclass Foo\n  # d\n  %a{a}\n  def m: -> void\nend\n";
        let root = parse(src);
        assert_eq!(root.decls[0].span.start, src.find("class").unwrap());
        if let DeclKind::Class(ref c) = root.decls[0].kind {
            assert_eq!(c.members[0].span.start, src.find("def").unwrap());
        } else {
            panic!("Expected a class declaration");
        }
    }

    #[test]
    fn parse_all_annotation_delimiters() {
        let root = parse("%a{a}\n%a(b)\n%a[c]\n%a|d|\n%a<e>\nclass Foo\nend\n");
        let texts: Vec<&str> =
            root.decls[0].annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["%a{a}", "%a(b)", "%a[c]", "%a|d|", "%a<e>"]);
    }

    #[test]
    fn annotations_rejected_where_meaningless() {
        let err = parse_err("%a{x}\nCONST: Integer\n");
        assert!(err.message.contains("a constant"), "message: {}", err.message);

        let err = parse_err("%a{x}\n$g: Integer\n");
        assert!(err.message.contains("a global"), "message: {}", err.message);

        let err = parse_err("class C\n  %a{x}\n  @i: Integer\nend\n");
        assert!(err.message.contains("an instance variable"), "message: {}", err.message);

        let err = parse_err("class C\n  %a{x}\n  private\nend\n");
        assert!(err.message.contains("a visibility marker"), "message: {}", err.message);
    }

    #[test]
    fn missing_end_reports_eof() {
        let err = parse_err("class Foo\n");
        assert_eq!(err.message, "Missing 'end' to close the body");
        assert!(err.hint.is_some());
    }

    #[test]
    fn parameter_ordering_errors() {
        let err = parse_err("class X\n  def f: (?A a, B b) -> void\nend\n");
        assert!(err.message.contains("optional"), "message: {}", err.message);

        let err = parse_err("class X\n  def f: (**A a, B b) -> void\nend\n");
        assert!(err.message.contains("'**'"), "message: {}", err.message);
    }

    #[test]
    fn overload_marker_needs_leading_signature() {
        let err = parse_err("class C\n  def f: ...\nend\n");
        assert!(err.message.contains("Expected '->'"), "message: {}", err.message);
    }

    #[test]
    fn empty_record_is_an_error() {
        let err = parse_err("X: { }\n");
        assert!(err.message.contains("a record key"), "message: {}", err.message);
    }

    #[test]
    fn unclosed_paren_reports_eof() {
        let err = parse_err("class C\n  def f: (Integer");
        assert_eq!(err.message, "Unclosed '(' - missing ')'");
    }
}
