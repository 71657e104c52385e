// SPDX-License-Identifier: (MIT OR Apache-2.0)

use rbs_ast::decl::*;
use rbs_ast::member::*;
use rbs_ast::ty::*;
use rbs_ast::{Annotation, Comment, LineMap};
use rbs_doc::DocBuilder;

use crate::config::FormatConfig;
use crate::quotes;

/// Parenthesization policy threaded through type rendering.
///
/// `Force` wraps union, intersection, and proc types in parentheses;
/// every other type ignores it. It is set for an optional's inner type,
/// an intersection's children, and function return types, so constructs
/// like `(A | B)?` and `-> (A | B)` stay unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parens {
    Bare,
    Force,
}

pub struct Printer<'a> {
    doc: DocBuilder,
    line_map: &'a LineMap,
    config: &'a FormatConfig,
}

impl<'a> Printer<'a> {
    pub fn new(line_map: &'a LineMap, config: &'a FormatConfig) -> Self {
        Self {
            doc: DocBuilder::with_indent(config.indent_width),
            line_map,
            config,
        }
    }

    pub fn finish(self) -> String {
        rbs_doc::render(&self.doc.finish(), self.config.max_line_width)
    }

    // --- Root ---

    /// Declarations separated by exactly one blank line, with a single
    /// trailing newline.
    pub fn format_root(&mut self, root: &Root) {
        for (i, decl) in root.decls.iter().enumerate() {
            if i > 0 {
                self.doc.force_break();
                self.doc.force_break();
            }
            self.format_decl(decl);
        }
        if !root.decls.is_empty() {
            self.doc.force_break();
        }
    }

    // --- Declarations ---

    fn format_decl(&mut self, decl: &Decl) {
        self.format_leading(&decl.comment, &decl.annotations);
        self.format_decl_kind(&decl.kind);
    }

    /// Shared by top-level declarations and declarations nested in a
    /// class or module body.
    fn format_decl_kind(&mut self, kind: &DeclKind) {
        match kind {
            DeclKind::Class(decl) => self.format_class(decl),
            DeclKind::Module(decl) => self.format_module(decl),
            DeclKind::Interface(decl) => self.format_interface(decl),
            DeclKind::Constant(decl) => {
                self.doc.text(&decl.name);
                self.doc.text(": ");
                self.format_type(&decl.ty, Parens::Bare);
            }
            DeclKind::Global(decl) => {
                self.doc.text(&decl.name);
                self.doc.text(": ");
                self.format_type(&decl.ty, Parens::Bare);
            }
            DeclKind::TypeAlias(decl) => self.format_type_alias(decl),
        }
    }

    fn format_class(&mut self, decl: &ClassDecl) {
        self.doc.text("class ");
        self.doc.text(&decl.name);
        self.format_type_params(&decl.type_params);
        if let Some(superclass) = &decl.superclass {
            self.doc.text(" < ");
            self.format_type_ref(superclass);
        }
        self.format_body(&decl.members);
    }

    fn format_module(&mut self, decl: &ModuleDecl) {
        self.doc.text("module ");
        self.doc.text(&decl.name);
        self.format_type_params(&decl.type_params);
        if !decl.self_types.is_empty() {
            self.doc.text(" : ");
            for (i, self_type) in decl.self_types.iter().enumerate() {
                if i > 0 {
                    self.doc.text(", ");
                }
                self.format_type_ref(self_type);
            }
        }
        self.format_body(&decl.members);
    }

    fn format_interface(&mut self, decl: &InterfaceDecl) {
        self.doc.text("interface ");
        self.doc.text(&decl.name);
        self.format_type_params(&decl.type_params);
        self.format_body(&decl.members);
    }

    fn format_type_alias(&mut self, decl: &TypeAliasDecl) {
        self.doc.open_group();
        self.doc.text("type ");
        self.doc.text(&decl.name);
        self.format_type_params(&decl.type_params);
        self.doc.text(" =");
        self.doc.open_indent();
        self.doc.breakable();
        self.format_type(&decl.ty, Parens::Bare);
        self.doc.close_indent();
        self.doc.close_group();
    }

    /// Generic parameter list shared by declaration headers and method
    /// signatures: `[unchecked out Name < Bound]`.
    fn format_type_params(&mut self, params: &[TypeParam]) {
        if params.is_empty() {
            return;
        }
        self.doc.text("[");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.doc.text(", ");
            }
            if param.unchecked {
                self.doc.text("unchecked ");
            }
            match param.variance {
                Variance::Covariant => self.doc.text("out "),
                Variance::Contravariant => self.doc.text("in "),
                Variance::Invariant => {}
            }
            self.doc.text(&param.name);
            if let Some(bound) = &param.upper_bound {
                self.doc.text(" < ");
                self.format_type(bound, Parens::Bare);
            }
        }
        self.doc.text("]");
    }

    // --- Members ---

    /// Indented member block followed by `end` on its own line.
    fn format_body(&mut self, members: &[Member]) {
        self.doc.open_indent();
        self.format_members(members);
        self.doc.close_indent();
        self.doc.force_break();
        self.doc.text("end");
    }

    /// One hard break before every member; one extra when the source
    /// shows a gap of two or more lines between sibling members, so any
    /// blank run collapses to a single blank line.
    fn format_members(&mut self, members: &[Member]) {
        let mut last_line: Option<u32> = None;
        for member in members {
            self.doc.force_break();
            if let Some(last) = last_line {
                if self.line_map.line_of(member.span.start) >= last + 2 {
                    self.doc.force_break();
                }
            }
            self.format_member(member);
            last_line = Some(self.line_map.line_of(member.span.end));
        }
    }

    fn format_member(&mut self, member: &Member) {
        self.format_leading(&member.comment, &member.annotations);
        match &member.kind {
            MemberKind::Decl(kind) => self.format_decl_kind(kind),
            MemberKind::Alias(alias) => self.format_alias(alias),
            MemberKind::Attr(attr) => self.format_attr(attr),
            MemberKind::InstanceVariable(var) | MemberKind::ClassVariable(var) => {
                self.doc.text(&var.name);
                self.doc.text(": ");
                self.format_type(&var.ty, Parens::Bare);
            }
            MemberKind::ClassInstanceVariable(var) => {
                self.doc.text("self.");
                self.doc.text(&var.name);
                self.doc.text(": ");
                self.format_type(&var.ty, Parens::Bare);
            }
            MemberKind::Include(target) => {
                self.doc.text("include ");
                self.format_type_ref(target);
            }
            MemberKind::Extend(target) => {
                self.doc.text("extend ");
                self.format_type_ref(target);
            }
            MemberKind::Prepend(target) => {
                self.doc.text("prepend ");
                self.format_type_ref(target);
            }
            MemberKind::Public => self.doc.text("public"),
            MemberKind::Private => self.doc.text("private"),
            MemberKind::Def(def) => self.format_def(def),
        }
    }

    fn format_alias(&mut self, alias: &AliasMember) {
        if alias.singleton {
            self.doc.text("alias self.");
            self.doc.text(&alias.new_name);
            self.doc.text(" self.");
            self.doc.text(&alias.old_name);
        } else {
            self.doc.text("alias ");
            self.doc.text(&alias.new_name);
            self.doc.text(" ");
            self.doc.text(&alias.old_name);
        }
    }

    fn format_attr(&mut self, attr: &AttrMember) {
        if let Some(visibility) = attr.visibility {
            self.doc.text(visibility.keyword());
            self.doc.text(" ");
        }
        self.doc.text(attr.kind.keyword());
        self.doc.text(" ");
        if attr.singleton {
            self.doc.text("self.");
        }
        self.doc.text(&attr.name);
        match &attr.ivar {
            AttrIvar::Default => {}
            AttrIvar::Suppressed => self.doc.text("()"),
            AttrIvar::Named(name) => {
                self.doc.text("(");
                self.doc.text(name);
                self.doc.text(")");
            }
        }
        self.doc.text(": ");
        self.format_type(&attr.ty, Parens::Bare);
    }

    /// `def name: ` with either a single inline signature or an overload
    /// list broken one per line, each continuation aligned under the
    /// colon and prefixed `| ` (with `| ...` closing an open-ended set).
    fn format_def(&mut self, def: &DefMember) {
        let mut head = String::new();
        if let Some(visibility) = def.visibility {
            head.push_str(visibility.keyword());
            head.push(' ');
        }
        head.push_str("def ");
        head.push_str(def.kind.prefix());
        head.push_str(&escape_name(&def.name));
        let align = head.chars().count();
        head.push_str(": ");
        self.doc.text(head);

        if def.overloads.len() == 1 && !def.overloading {
            self.format_signature(&def.overloads[0]);
            return;
        }
        self.doc.open_indent_by(align);
        for (i, overload) in def.overloads.iter().enumerate() {
            if i > 0 {
                self.doc.force_break();
                self.doc.text("| ");
            }
            self.format_signature(overload);
        }
        if def.overloading {
            self.doc.force_break();
            self.doc.text("| ...");
        }
        self.doc.close_indent();
    }

    // --- Signatures ---

    /// `[type-params] (params) ?{ block } -> return`, each section
    /// omitted when empty.
    fn format_signature(&mut self, method_type: &MethodType) {
        self.doc.open_group();
        if !method_type.type_params.is_empty() {
            self.format_type_params(&method_type.type_params);
            self.doc.text(" ");
        }
        self.format_fn_type(&method_type.fn_type, method_type.block.as_ref());
        self.doc.close_group();
    }

    fn format_fn_type(&mut self, fn_type: &FnType, block: Option<&Block>) {
        if fn_type.has_params() {
            self.doc.text("(");
            self.doc.open_indent();
            self.doc.breakable_empty();
            self.format_params(fn_type);
            self.doc.close_indent();
            self.doc.breakable_empty();
            self.doc.text(") ");
        }
        if let Some(block) = block {
            if !block.required {
                self.doc.text("?");
            }
            self.doc.text("{");
            self.doc.open_indent();
            self.doc.breakable();
            // Blocks carry no type parameters and no nested block.
            self.doc.open_group();
            self.format_fn_type(&block.fn_type, None);
            self.doc.close_group();
            self.doc.close_indent();
            self.doc.breakable();
            self.doc.text("} ");
        }
        self.doc.text("-> ");
        self.format_type(&fn_type.return_type, Parens::Force);
    }

    fn format_params(&mut self, fn_type: &FnType) {
        let mut first = true;
        for param in &fn_type.required_positionals {
            self.param_separator(&mut first);
            self.format_param(param);
        }
        for param in &fn_type.optional_positionals {
            self.param_separator(&mut first);
            self.doc.text("?");
            self.format_param(param);
        }
        if let Some(param) = &fn_type.rest_positional {
            self.param_separator(&mut first);
            self.doc.text("*");
            self.format_param(param);
        }
        for param in &fn_type.trailing_positionals {
            self.param_separator(&mut first);
            self.format_param(param);
        }
        for keyword in &fn_type.required_keywords {
            self.param_separator(&mut first);
            self.doc.text(&keyword.name);
            self.doc.text(": ");
            self.format_param(&keyword.param);
        }
        for keyword in &fn_type.optional_keywords {
            self.param_separator(&mut first);
            self.doc.text("?");
            self.doc.text(&keyword.name);
            self.doc.text(": ");
            self.format_param(&keyword.param);
        }
        if let Some(param) = &fn_type.rest_keyword {
            self.param_separator(&mut first);
            self.doc.text("**");
            self.format_param(param);
        }
    }

    fn param_separator(&mut self, first: &mut bool) {
        if *first {
            *first = false;
        } else {
            self.doc.text(",");
            self.doc.breakable();
        }
    }

    fn format_param(&mut self, param: &Param) {
        self.format_type(&param.ty, Parens::Bare);
        if let Some(name) = &param.name {
            self.doc.text(" ");
            self.doc.text(escape_name(name));
        }
    }

    // --- Types ---

    fn format_type(&mut self, ty: &Type, parens: Parens) {
        match &ty.kind {
            TypeKind::Base(base) => self.doc.text(base.keyword()),
            TypeKind::Variable(name) => self.doc.text(name),
            TypeKind::ClassInstance(target)
            | TypeKind::Interface(target)
            | TypeKind::Alias(target) => self.format_type_ref(target),
            TypeKind::Singleton(name) => {
                self.doc.text("singleton(");
                self.doc.text(name);
                self.doc.text(")");
            }
            TypeKind::Optional(inner) => {
                self.format_type(inner, Parens::Force);
                self.doc.text("?");
            }
            TypeKind::Union(types) => {
                if parens == Parens::Force {
                    self.doc.text("(");
                }
                self.doc.open_group();
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        self.doc.breakable();
                        self.doc.text("| ");
                    }
                    self.format_type(ty, Parens::Bare);
                }
                self.doc.close_group();
                if parens == Parens::Force {
                    self.doc.text(")");
                }
            }
            TypeKind::Intersection(types) => {
                if parens == Parens::Force {
                    self.doc.text("(");
                }
                self.doc.open_group();
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        self.doc.breakable();
                        self.doc.text("& ");
                    }
                    self.format_type(ty, Parens::Force);
                }
                self.doc.close_group();
                if parens == Parens::Force {
                    self.doc.text(")");
                }
            }
            TypeKind::Tuple(types) => {
                if types.is_empty() {
                    // The space keeps an empty tuple parseable.
                    self.doc.text("[ ]");
                    return;
                }
                self.doc.text("[");
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        self.doc.text(", ");
                    }
                    self.format_type(ty, Parens::Bare);
                }
                self.doc.text("]");
            }
            TypeKind::Record(fields) => self.format_record(fields),
            TypeKind::Literal(value) => self.format_literal(value),
            TypeKind::Proc(method_type) => {
                if parens == Parens::Force {
                    self.doc.text("(");
                }
                self.doc.text("^");
                self.format_signature(method_type);
                if parens == Parens::Force {
                    self.doc.text(")");
                }
            }
        }
    }

    /// `Name` or `Name[Arg, Arg]`; arguments never break.
    fn format_type_ref(&mut self, target: &TypeRef) {
        self.doc.text(&target.name);
        if !target.args.is_empty() {
            self.doc.text("[");
            for (i, arg) in target.args.iter().enumerate() {
                if i > 0 {
                    self.doc.text(", ");
                }
                self.format_type(arg, Parens::Bare);
            }
            self.doc.text("]");
        }
    }

    fn format_record(&mut self, fields: &[RecordField]) {
        self.doc.open_group();
        self.doc.text("{");
        self.doc.open_indent();
        self.doc.breakable();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.doc.text(",");
                self.doc.breakable();
            }
            self.format_record_field(field);
        }
        self.doc.close_indent();
        self.doc.breakable();
        self.doc.text("}");
        self.doc.close_group();
    }

    fn format_record_field(&mut self, field: &RecordField) {
        match &field.key {
            RecordKey::Name(name) if is_plain_label(name) => {
                self.doc.text(name);
                self.doc.text(": ");
            }
            RecordKey::Name(name) => {
                self.doc.text(":");
                self.doc.text(name);
                self.doc.text(" => ");
            }
            RecordKey::QuotedSymbol(raw) => {
                self.emit_lines(quotes::normalize_symbol(raw));
                self.doc.text(" => ");
            }
            RecordKey::Str(raw) => {
                self.emit_lines(quotes::normalize(raw));
                self.doc.text(" => ");
            }
            RecordKey::Int(value) => {
                self.doc.text(value.to_string());
                self.doc.text(" => ");
            }
            RecordKey::Bool(value) => {
                self.doc.text(if *value { "true" } else { "false" });
                self.doc.text(" => ");
            }
        }
        self.format_type(&field.value, Parens::Bare);
    }

    fn format_literal(&mut self, value: &LiteralValue) {
        match value {
            LiteralValue::Str(raw) => self.emit_lines(quotes::normalize(raw)),
            LiteralValue::Symbol(raw) => {
                if raw.starts_with(":\"") || raw.starts_with(":'") {
                    self.emit_lines(quotes::normalize_symbol(raw));
                } else {
                    self.doc.text(raw);
                }
            }
            LiteralValue::Int(value) => self.doc.text(value.to_string()),
            LiteralValue::Bool(value) => {
                self.doc.text(if *value { "true" } else { "false" })
            }
        }
    }

    /// Literal lines joined by flush breaks so continuation lines of a
    /// multi-line string keep their exact content.
    fn emit_lines(&mut self, lines: Vec<String>) {
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                self.doc.force_break_flush();
            }
            self.doc.text(line);
        }
    }

    // --- Comments and Annotations ---

    fn format_leading(&mut self, comment: &Option<Comment>, annotations: &[Annotation]) {
        if let Some(comment) = comment {
            for line in comment.text.split('\n') {
                self.doc.text(format!("# {}", line));
                self.doc.force_break();
            }
        }
        for annotation in annotations {
            let content = annotation.content();
            if content.contains('{') || content.contains('}') {
                // Rewrapping braced content in braces is ambiguous, so
                // keep the source form with its original delimiters.
                self.doc.text(&annotation.text);
            } else {
                self.doc.text(format!("%a{{{}}}", content));
            }
            self.doc.force_break();
        }
    }
}

// --- Name helpers ---

/// Backtick-quote method and parameter names that collide with keywords.
fn escape_name(name: &str) -> String {
    if rbs_lexer::is_keyword(name) {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}

/// Record keys render as labels only for this identifier shape; note the
/// deliberate absence of digits.
fn is_plain_label(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphabetic() || c == '_')
}
