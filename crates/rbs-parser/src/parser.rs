// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation: recursive descent over the token stream.

use rbs_ast::decl::{
    ClassDecl, ConstantDecl, Decl, DeclKind, GlobalDecl, InterfaceDecl, ModuleDecl, Root,
    TypeAliasDecl,
};
use rbs_ast::member::{
    AliasMember, AttrIvar, AttrKind, AttrMember, DefKind, DefMember, Member, MemberKind,
    VarMember, Visibility,
};
use rbs_ast::token::{Token, TokenKind};
use rbs_ast::ty::{
    BaseType, Block, FnType, Keyword, LiteralValue, MethodType, Param, RecordField, RecordKey,
    Type, TypeKind, TypeParam, TypeRef, Variance,
};
use rbs_ast::{Annotation, Comment, LineMap, Span};
use rbs_lexer::{LexError, LexedComment, Lexer};

/// Parse a signature file into a declaration tree.
///
/// Lexes and parses in one call; the first syntax error aborts the whole
/// run. Trailing and otherwise unattached comments are dropped.
pub fn parse(source: &str) -> Result<Root, ParseError> {
    let output = Lexer::new(source).tokenize()?;
    let line_map = LineMap::new(source);
    Parser::new(output.tokens, output.comments, line_map).parse()
}

/// The parser for RBS signature source.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Full-line comments collected by the lexer, in source order.
    comments: Vec<LexedComment>,
    /// Index of the first comment not yet attached or dropped.
    next_comment: usize,
    line_map: LineMap,
    /// Stack of generic parameter scopes; names in scope parse as type
    /// variables instead of class references.
    scopes: Vec<Vec<String>>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, comments: Vec<LexedComment>, line_map: LineMap) -> Self {
        Self {
            tokens,
            pos: 0,
            comments,
            next_comment: 0,
            line_map,
            scopes: Vec::new(),
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_token(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn peek(&self, n: usize) -> &TokenKind {
        &self.peek_token(n).kind
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.pos += 1;
        }
        self.tokens.get(self.pos - 1).unwrap()
    }

    /// End offset of the most recently consumed token.
    fn last_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn expect_upper_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::UpperIdent(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::expected(
                "a constant name",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    fn line_of(&self, offset: usize) -> u32 {
        self.line_map.line_of(offset)
    }

    // =========================================================================
    // Comments and Annotations
    // =========================================================================

    /// Collect the leading comment and annotations of the node whose first
    /// token is the current one. The comment is the contiguous run of
    /// full-line comments ending on the line directly above the node (or
    /// above its first annotation); comments further up are dropped.
    fn parse_leading(&mut self) -> (Option<Comment>, Vec<Annotation>) {
        let anchor = self.current().span.start;
        let comment = self.attach_comment(anchor);
        let annotations = self.parse_annotations();
        (comment, annotations)
    }

    fn attach_comment(&mut self, anchor: usize) -> Option<Comment> {
        let anchor_line = self.line_of(anchor);

        // Everything before the anchor is either attached or dropped.
        let mut run_end = self.next_comment;
        while run_end < self.comments.len()
            && self.line_of(self.comments[run_end].span.start) < anchor_line
        {
            run_end += 1;
        }
        if run_end == self.next_comment {
            return None;
        }

        // Walk back the contiguous run that touches the anchor line.
        let mut run_start = run_end;
        let mut expected_line = anchor_line;
        while run_start > self.next_comment {
            let line = self.line_of(self.comments[run_start - 1].span.start);
            if line + 1 == expected_line {
                expected_line = line;
                run_start -= 1;
            } else {
                break;
            }
        }

        let comment = if run_start < run_end {
            let text = self.comments[run_start..run_end]
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let span = Span::new(
                self.comments[run_start].span.start,
                self.comments[run_end - 1].span.end,
            );
            Some(Comment { text, span })
        } else {
            None
        };
        self.next_comment = run_end;
        comment
    }

    fn parse_annotations(&mut self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        while let TokenKind::Annotation(text) = self.current_kind().clone() {
            let span = self.current().span;
            self.advance();
            annotations.push(Annotation { text, span });
        }
        annotations
    }

    /// Annotations are only legal on declarations and members the grammar
    /// names; constants, globals, variables, and markers reject them.
    fn reject_annotations(
        &self,
        annotations: &[Annotation],
        what: &str,
    ) -> Result<(), ParseError> {
        match annotations.first() {
            Some(annotation) => Err(ParseError {
                span: annotation.span,
                message: format!("Annotations cannot be attached to {}", what),
                hint: Some("move the annotation to a class, module, interface, alias, attribute, mixin, or method".to_string()),
            }),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Top-Level Parsing
    // =========================================================================

    pub fn parse(&mut self) -> Result<Root, ParseError> {
        let mut decls = Vec::new();
        while !self.at_end() {
            decls.push(self.parse_decl()?);
        }
        Ok(Root { decls })
    }

    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        let (comment, annotations) = self.parse_leading();
        let (kind, span) = self.parse_decl_kind(&annotations)?;
        Ok(Decl { kind, span, comment, annotations })
    }

    /// Shared by top-level parsing and nested declarations in bodies.
    fn parse_decl_kind(
        &mut self,
        annotations: &[Annotation],
    ) -> Result<(DeclKind, Span), ParseError> {
        let start = self.current().span.start;
        let kind = match self.current_kind() {
            TokenKind::Class => DeclKind::Class(self.parse_class_decl()?),
            TokenKind::Module => DeclKind::Module(self.parse_module_decl()?),
            TokenKind::Interface => DeclKind::Interface(self.parse_interface_decl()?),
            TokenKind::Type => DeclKind::TypeAlias(self.parse_type_alias_decl()?),
            TokenKind::UpperIdent(_) | TokenKind::ColonColon => {
                self.reject_annotations(annotations, "a constant")?;
                DeclKind::Constant(self.parse_constant_decl()?)
            }
            TokenKind::GlobalName(_) => {
                self.reject_annotations(annotations, "a global")?;
                DeclKind::Global(self.parse_global_decl()?)
            }
            _ => {
                return Err(ParseError::expected(
                    "a declaration",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        Ok((kind, Span::new(start, self.last_end())))
    }

    fn parse_class_decl(&mut self) -> Result<ClassDecl, ParseError> {
        self.expect(&TokenKind::Class)?;
        let name = self.parse_type_name()?;
        let type_params = self.parse_decl_type_params()?;
        let superclass = if self.match_token(&TokenKind::Lt) {
            Some(self.parse_type_ref()?)
        } else {
            None
        };
        let members = self.parse_members();
        self.pop_scope();
        Ok(ClassDecl { name, type_params, superclass, members: members? })
    }

    fn parse_module_decl(&mut self) -> Result<ModuleDecl, ParseError> {
        self.expect(&TokenKind::Module)?;
        let name = self.parse_type_name()?;
        let type_params = self.parse_decl_type_params()?;
        let mut self_types = Vec::new();
        if self.match_token(&TokenKind::Colon) {
            loop {
                self_types.push(self.parse_type_ref()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let members = self.parse_members();
        self.pop_scope();
        Ok(ModuleDecl { name, type_params, self_types, members: members? })
    }

    fn parse_interface_decl(&mut self) -> Result<InterfaceDecl, ParseError> {
        self.expect(&TokenKind::Interface)?;
        let name = match self.current_kind().clone() {
            TokenKind::InterfaceIdent(name) => {
                self.advance();
                name
            }
            _ => {
                return Err(ParseError::expected(
                    "an interface name",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        let type_params = self.parse_decl_type_params()?;
        let members = self.parse_members();
        self.pop_scope();
        Ok(InterfaceDecl { name, type_params, members: members? })
    }

    fn parse_type_alias_decl(&mut self) -> Result<TypeAliasDecl, ParseError> {
        self.expect(&TokenKind::Type)?;
        let name = self.parse_alias_name()?;
        let type_params = self.parse_decl_type_params()?;
        self.expect(&TokenKind::Eq)?;
        let ty = self.parse_type();
        self.pop_scope();
        Ok(TypeAliasDecl { name, type_params, ty: ty? })
    }

    fn parse_constant_decl(&mut self) -> Result<ConstantDecl, ParseError> {
        let name = self.parse_type_name()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(ConstantDecl { name, ty })
    }

    fn parse_global_decl(&mut self) -> Result<GlobalDecl, ParseError> {
        let name = match self.current_kind().clone() {
            TokenKind::GlobalName(name) => {
                self.advance();
                name
            }
            _ => {
                return Err(ParseError::expected(
                    "a global name",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(GlobalDecl { name, ty })
    }

    /// A possibly-namespaced constant path: `Foo`, `::Foo::Bar`.
    fn parse_type_name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        if self.match_token(&TokenKind::ColonColon) {
            name.push_str("::");
        }
        loop {
            match self.current_kind().clone() {
                TokenKind::UpperIdent(part) => {
                    self.advance();
                    name.push_str(&part);
                }
                _ => {
                    return Err(ParseError::expected(
                        "a constant name",
                        self.current_kind(),
                        self.current().span,
                    ))
                }
            }
            if self.check(&TokenKind::ColonColon)
                && matches!(self.peek(1), TokenKind::UpperIdent(_))
            {
                self.advance();
                name.push_str("::");
            } else {
                break;
            }
        }
        Ok(name)
    }

    /// A type alias name: `foo`, `Foo::bar`.
    fn parse_alias_name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        if self.match_token(&TokenKind::ColonColon) {
            name.push_str("::");
        }
        loop {
            match self.current_kind().clone() {
                TokenKind::LowerIdent(part) => {
                    self.advance();
                    name.push_str(&part);
                    return Ok(name);
                }
                TokenKind::UpperIdent(part) => {
                    self.advance();
                    name.push_str(&part);
                    self.expect(&TokenKind::ColonColon)?;
                    name.push_str("::");
                }
                _ => {
                    return Err(ParseError::expected(
                        "an alias name",
                        self.current_kind(),
                        self.current().span,
                    ))
                }
            }
        }
    }

    /// Generic parameters of a declaration header, with `unchecked`,
    /// variance, and upper bounds: `[unchecked out T < Numeric]`.
    ///
    /// Always opens a scope frame (even when no bracket follows) so the
    /// caller can pop unconditionally after the body.
    fn parse_decl_type_params(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        self.scopes.push(Vec::new());
        if !self.match_token(&TokenKind::LBracket) {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        loop {
            let unchecked = self.match_token(&TokenKind::Unchecked);
            let variance = if self.match_token(&TokenKind::In) {
                Variance::Contravariant
            } else if self.match_token(&TokenKind::Out) {
                Variance::Covariant
            } else {
                Variance::Invariant
            };
            let name = self.expect_upper_ident()?;
            self.bind_type_variable(&name);
            let upper_bound = if self.match_token(&TokenKind::Lt) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(TypeParam { name, unchecked, variance, upper_bound });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(params)
    }

    /// Generic parameters of a method signature: names and optional
    /// bounds only, no variance or `unchecked`.
    fn parse_method_type_params(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        self.scopes.push(Vec::new());
        if !self.match_token(&TokenKind::LBracket) {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        loop {
            let name = self.expect_upper_ident()?;
            self.bind_type_variable(&name);
            let upper_bound = if self.match_token(&TokenKind::Lt) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(TypeParam {
                name,
                unchecked: false,
                variance: Variance::Invariant,
                upper_bound,
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(params)
    }

    fn bind_type_variable(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(name.to_string());
        }
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn is_type_variable(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.iter().any(|n| n == name))
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn parse_members(&mut self) -> Result<Vec<Member>, ParseError> {
        let mut members = Vec::new();
        while !self.check(&TokenKind::End) {
            if self.at_end() {
                return Err(ParseError::expected(
                    "'end'",
                    self.current_kind(),
                    self.current().span,
                ));
            }
            members.push(self.parse_member()?);
        }
        self.advance();
        Ok(members)
    }

    fn parse_member(&mut self) -> Result<Member, ParseError> {
        let (mut comment, annotations) = self.parse_leading();
        let start = self.current().span.start;
        let kind = match self.current_kind().clone() {
            TokenKind::Class
            | TokenKind::Module
            | TokenKind::Interface
            | TokenKind::Type
            | TokenKind::UpperIdent(_)
            | TokenKind::ColonColon => {
                let (kind, _) = self.parse_decl_kind(&annotations)?;
                MemberKind::Decl(kind)
            }
            TokenKind::Alias => MemberKind::Alias(self.parse_alias_member()?),
            TokenKind::AttrReader => {
                MemberKind::Attr(self.parse_attr_member(AttrKind::Reader, None)?)
            }
            TokenKind::AttrWriter => {
                MemberKind::Attr(self.parse_attr_member(AttrKind::Writer, None)?)
            }
            TokenKind::AttrAccessor => {
                MemberKind::Attr(self.parse_attr_member(AttrKind::Accessor, None)?)
            }
            TokenKind::Include => {
                self.advance();
                MemberKind::Include(self.parse_type_ref()?)
            }
            TokenKind::Extend => {
                self.advance();
                MemberKind::Extend(self.parse_type_ref()?)
            }
            TokenKind::Prepend => {
                self.advance();
                MemberKind::Prepend(self.parse_type_ref()?)
            }
            TokenKind::IvarName(name) => {
                self.reject_annotations(&annotations, "an instance variable")?;
                self.advance();
                self.expect(&TokenKind::Colon)?;
                let ty = self.parse_type()?;
                MemberKind::InstanceVariable(VarMember { name, ty })
            }
            TokenKind::CvarName(name) => {
                self.reject_annotations(&annotations, "a class variable")?;
                self.advance();
                self.expect(&TokenKind::Colon)?;
                let ty = self.parse_type()?;
                MemberKind::ClassVariable(VarMember { name, ty })
            }
            TokenKind::SelfKw => {
                // self.@foo: T
                self.reject_annotations(&annotations, "an instance variable")?;
                self.advance();
                self.expect(&TokenKind::Dot)?;
                let name = match self.current_kind().clone() {
                    TokenKind::IvarName(name) => {
                        self.advance();
                        name
                    }
                    _ => {
                        return Err(ParseError::expected(
                            "an instance variable name",
                            self.current_kind(),
                            self.current().span,
                        ))
                    }
                };
                self.expect(&TokenKind::Colon)?;
                let ty = self.parse_type()?;
                MemberKind::ClassInstanceVariable(VarMember { name, ty })
            }
            TokenKind::Def => MemberKind::Def(self.parse_def_member(None)?),
            TokenKind::Public | TokenKind::Private => {
                let visibility = if self.check(&TokenKind::Public) {
                    Visibility::Public
                } else {
                    Visibility::Private
                };
                // An inline `private def ...` modifier needs the modified
                // member on the same line; on its own line it is a marker.
                let marker_line = self.line_of(self.current().span.start);
                let next = self.peek_token(1);
                let inline = self.line_of(next.span.start) == marker_line;
                let next_kind = next.kind.clone();
                match next_kind {
                    TokenKind::Def if inline => {
                        self.advance();
                        MemberKind::Def(self.parse_def_member(Some(visibility))?)
                    }
                    TokenKind::AttrReader if inline => {
                        self.advance();
                        MemberKind::Attr(
                            self.parse_attr_member(AttrKind::Reader, Some(visibility))?,
                        )
                    }
                    TokenKind::AttrWriter if inline => {
                        self.advance();
                        MemberKind::Attr(
                            self.parse_attr_member(AttrKind::Writer, Some(visibility))?,
                        )
                    }
                    TokenKind::AttrAccessor if inline => {
                        self.advance();
                        MemberKind::Attr(
                            self.parse_attr_member(AttrKind::Accessor, Some(visibility))?,
                        )
                    }
                    _ => {
                        self.reject_annotations(&annotations, "a visibility marker")?;
                        comment = None;
                        self.advance();
                        match visibility {
                            Visibility::Public => MemberKind::Public,
                            Visibility::Private => MemberKind::Private,
                        }
                    }
                }
            }
            _ => {
                return Err(ParseError::expected(
                    "a member",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        Ok(Member {
            kind,
            span: Span::new(start, self.last_end()),
            comment,
            annotations,
        })
    }

    fn parse_alias_member(&mut self) -> Result<AliasMember, ParseError> {
        self.expect(&TokenKind::Alias)?;
        let singleton = if self.check(&TokenKind::SelfKw) && matches!(self.peek(1), TokenKind::Dot)
        {
            self.advance();
            self.advance();
            true
        } else {
            false
        };
        let new_name = self.parse_method_name()?;
        if singleton {
            self.expect(&TokenKind::SelfKw)?;
            self.expect(&TokenKind::Dot)?;
        }
        let old_name = self.parse_method_name()?;
        Ok(AliasMember { new_name, old_name, singleton })
    }

    fn parse_attr_member(
        &mut self,
        kind: AttrKind,
        visibility: Option<Visibility>,
    ) -> Result<AttrMember, ParseError> {
        self.advance();
        let singleton = if self.check(&TokenKind::SelfKw) && matches!(self.peek(1), TokenKind::Dot)
        {
            self.advance();
            self.advance();
            true
        } else {
            false
        };
        let name = self.parse_method_name()?;
        let ivar = if self.match_token(&TokenKind::LParen) {
            if self.match_token(&TokenKind::RParen) {
                AttrIvar::Suppressed
            } else {
                let ivar_name = match self.current_kind().clone() {
                    TokenKind::IvarName(name) => {
                        self.advance();
                        name
                    }
                    _ => {
                        return Err(ParseError::expected(
                            "an instance variable name",
                            self.current_kind(),
                            self.current().span,
                        ))
                    }
                };
                self.expect(&TokenKind::RParen)?;
                AttrIvar::Named(ivar_name)
            }
        } else {
            AttrIvar::Default
        };
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(AttrMember { kind, name, ivar, ty, singleton, visibility })
    }

    fn parse_def_member(&mut self, visibility: Option<Visibility>) -> Result<DefMember, ParseError> {
        self.expect(&TokenKind::Def)?;
        let kind = if self.check(&TokenKind::SelfKw) && matches!(self.peek(1), TokenKind::Dot) {
            self.advance();
            self.advance();
            DefKind::Singleton
        } else if self.check(&TokenKind::SelfKw)
            && matches!(self.peek(1), TokenKind::Question)
            && matches!(self.peek(2), TokenKind::Dot)
        {
            self.advance();
            self.advance();
            self.advance();
            DefKind::SingletonInstance
        } else {
            DefKind::Instance
        };
        let name = self.parse_method_name()?;
        self.expect(&TokenKind::Colon)?;
        let mut overloads = vec![self.parse_method_type()?];
        let mut overloading = false;
        while self.match_token(&TokenKind::Pipe) {
            if self.match_token(&TokenKind::Ellipsis) {
                overloading = true;
                break;
            }
            overloads.push(self.parse_method_type()?);
        }
        Ok(DefMember { name, kind, visibility, overloads, overloading })
    }

    /// Method, alias, and attribute names: plain idents (with a glued
    /// `?`/`!`/`=` suffix), keywords, backtick-quoted names, and the
    /// operator names the token set can spell.
    fn parse_method_name(&mut self) -> Result<String, ParseError> {
        let tok = self.current().clone();
        let base = match tok.kind {
            TokenKind::LowerIdent(name) | TokenKind::UpperIdent(name) => {
                self.advance();
                name
            }
            TokenKind::QuotedIdent(name) => {
                self.advance();
                return Ok(name);
            }
            TokenKind::LBracket => {
                self.advance();
                let close = self.current().clone();
                if !matches!(close.kind, TokenKind::RBracket) || close.span.start != tok.span.end {
                    return Err(ParseError::expected(
                        "']'",
                        self.current_kind(),
                        self.current().span,
                    ));
                }
                self.advance();
                if self.check(&TokenKind::Eq) && self.current().span.start == close.span.end {
                    self.advance();
                    return Ok("[]=".to_string());
                }
                return Ok("[]".to_string());
            }
            TokenKind::Lt => {
                self.advance();
                return Ok("<".to_string());
            }
            TokenKind::Star => {
                self.advance();
                return Ok("*".to_string());
            }
            TokenKind::StarStar => {
                self.advance();
                return Ok("**".to_string());
            }
            TokenKind::Amp => {
                self.advance();
                return Ok("&".to_string());
            }
            TokenKind::Pipe => {
                self.advance();
                return Ok("|".to_string());
            }
            TokenKind::Caret => {
                self.advance();
                return Ok("^".to_string());
            }
            TokenKind::Plus => {
                self.advance();
                return Ok("+".to_string());
            }
            TokenKind::Minus => {
                self.advance();
                return Ok("-".to_string());
            }
            TokenKind::Bang => {
                self.advance();
                return Ok("!".to_string());
            }
            ref other => match other.keyword_text() {
                Some(text) => {
                    self.advance();
                    text.to_string()
                }
                None => {
                    return Err(ParseError::expected(
                        "a method name",
                        self.current_kind(),
                        self.current().span,
                    ))
                }
            },
        };
        Ok(self.absorb_name_suffix(base, tok.span.end))
    }

    /// Glue an adjacent `?`, `!`, or `=` onto a just-parsed name. The
    /// suffix token must touch the name; `foo ?` is an optional type, not
    /// the method name `foo?`.
    fn absorb_name_suffix(&mut self, mut name: String, prev_end: usize) -> String {
        if self.current().span.start == prev_end {
            let suffix = match self.current_kind() {
                TokenKind::Question => Some('?'),
                TokenKind::Bang => Some('!'),
                TokenKind::Eq => Some('='),
                _ => None,
            };
            if let Some(c) = suffix {
                self.advance();
                name.push(c);
            }
        }
        name
    }

    // =========================================================================
    // Method Signatures
    // =========================================================================

    fn parse_method_type(&mut self) -> Result<MethodType, ParseError> {
        let type_params = self.parse_method_type_params()?;
        let signature = self.parse_fn_signature();
        self.pop_scope();
        let (fn_type, block) = signature?;
        Ok(MethodType { type_params, fn_type, block })
    }

    /// `(params) ?{ block } -> return`, shared by method overloads, proc
    /// types, and (without the block) block signatures.
    fn parse_fn_signature(&mut self) -> Result<(FnType, Option<Block>), ParseError> {
        let groups = self.parse_params_opt()?;
        let block = self.parse_block_opt()?;
        self.expect(&TokenKind::Arrow)?;
        let return_type = self.parse_optional_type()?;
        Ok((groups.into_fn_type(return_type), block))
    }

    fn parse_params_opt(&mut self) -> Result<ParamGroups, ParseError> {
        let mut groups = ParamGroups::default();
        if !self.match_token(&TokenKind::LParen) {
            return Ok(groups);
        }
        if !self.check(&TokenKind::RParen) {
            loop {
                self.parse_param_into(&mut groups)?;
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(groups)
    }

    fn parse_param_into(&mut self, groups: &mut ParamGroups) -> Result<(), ParseError> {
        let span = self.current().span;
        if groups.rest_keyword.is_some() {
            return Err(ParseError {
                span,
                message: "Parameters cannot follow a '**' parameter".to_string(),
                hint: None,
            });
        }
        let has_keywords =
            !groups.required_keywords.is_empty() || !groups.optional_keywords.is_empty();
        match self.current_kind() {
            TokenKind::Question => {
                self.advance();
                if let Some(name) = self.take_keyword_name() {
                    let param = self.parse_param()?;
                    groups.optional_keywords.push(Keyword { name, param });
                } else {
                    if has_keywords || groups.rest_positional.is_some() {
                        return Err(ParseError {
                            span,
                            message: "Optional positional parameters must come before any '*' or keyword parameters".to_string(),
                            hint: None,
                        });
                    }
                    groups.optional_positionals.push(self.parse_param()?);
                }
            }
            TokenKind::Star => {
                self.advance();
                if groups.rest_positional.is_some() {
                    return Err(ParseError {
                        span,
                        message: "Duplicate '*' parameter".to_string(),
                        hint: None,
                    });
                }
                if has_keywords {
                    return Err(ParseError {
                        span,
                        message: "A '*' parameter must come before keyword parameters"
                            .to_string(),
                        hint: None,
                    });
                }
                groups.rest_positional = Some(self.parse_param()?);
            }
            TokenKind::StarStar => {
                self.advance();
                groups.rest_keyword = Some(self.parse_param()?);
            }
            _ => {
                if let Some(name) = self.take_keyword_name() {
                    let param = self.parse_param()?;
                    groups.required_keywords.push(Keyword { name, param });
                } else {
                    if has_keywords {
                        return Err(ParseError {
                            span,
                            message: "Positional parameters cannot follow keyword parameters"
                                .to_string(),
                            hint: None,
                        });
                    }
                    let param = self.parse_param()?;
                    if groups.rest_positional.is_some() {
                        groups.trailing_positionals.push(param);
                    } else if !groups.optional_positionals.is_empty() {
                        return Err(ParseError {
                            span,
                            message: "Required positional parameters cannot follow optional parameters".to_string(),
                            hint: None,
                        });
                    } else {
                        groups.required_positionals.push(param);
                    }
                }
            }
        }
        Ok(())
    }

    /// Consume `name:` (colon glued to the name) and return the name, or
    /// consume nothing. Distinguishes keyword parameters and record
    /// labels from a type followed by other tokens.
    fn take_keyword_name(&mut self) -> Option<String> {
        let (name, name_end) = {
            let tok = self.current();
            let name = match &tok.kind {
                TokenKind::LowerIdent(n) | TokenKind::UpperIdent(n) => n.clone(),
                TokenKind::QuotedIdent(n) => n.clone(),
                other => other.keyword_text()?.to_string(),
            };
            (name, tok.span.end)
        };
        let next = self.peek_token(1);
        if matches!(next.kind, TokenKind::Colon) && next.span.start == name_end {
            self.advance();
            self.advance();
            Some(name)
        } else {
            None
        }
    }

    /// One parameter: a type with an optional variable name.
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let ty = self.parse_type()?;
        let name = match self.current_kind().clone() {
            TokenKind::LowerIdent(name) => {
                self.advance();
                Some(name)
            }
            TokenKind::QuotedIdent(name) => {
                self.advance();
                Some(name)
            }
            other => match other.keyword_text() {
                Some(text) => {
                    self.advance();
                    Some(text.to_string())
                }
                None => None,
            },
        };
        Ok(Param { ty, name })
    }

    fn parse_block_opt(&mut self) -> Result<Option<Block>, ParseError> {
        let required = if self.check(&TokenKind::Question)
            && matches!(self.peek(1), TokenKind::LBrace)
        {
            self.advance();
            false
        } else if self.check(&TokenKind::LBrace) {
            true
        } else {
            return Ok(None);
        };
        self.advance();
        let groups = self.parse_params_opt()?;
        self.expect(&TokenKind::Arrow)?;
        let return_type = self.parse_optional_type()?;
        self.expect(&TokenKind::RBrace)?;
        Ok(Some(Block { required, fn_type: groups.into_fn_type(return_type) }))
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Full type grammar: a union of intersections.
    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let start = self.current().span.start;
        let first = self.parse_intersection_type()?;
        if !self.check(&TokenKind::Pipe) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.match_token(&TokenKind::Pipe) {
            types.push(self.parse_intersection_type()?);
        }
        Ok(Type {
            kind: TypeKind::Union(types),
            span: Span::new(start, self.last_end()),
        })
    }

    fn parse_intersection_type(&mut self) -> Result<Type, ParseError> {
        let start = self.current().span.start;
        let first = self.parse_optional_type()?;
        if !self.check(&TokenKind::Amp) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.match_token(&TokenKind::Amp) {
            types.push(self.parse_optional_type()?);
        }
        Ok(Type {
            kind: TypeKind::Intersection(types),
            span: Span::new(start, self.last_end()),
        })
    }

    /// Optional binds tighter than `&` and `|` and is also the level at
    /// which function return types parse, so a following `|` continues
    /// an overload list instead of widening the return type.
    fn parse_optional_type(&mut self) -> Result<Type, ParseError> {
        let start = self.current().span.start;
        let mut ty = self.parse_primary_type()?;
        while self.match_token(&TokenKind::Question) {
            ty = Type {
                kind: TypeKind::Optional(Box::new(ty)),
                span: Span::new(start, self.last_end()),
            };
        }
        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> Result<Type, ParseError> {
        let tok = self.current().clone();
        let start = tok.span.start;
        let kind = match tok.kind {
            TokenKind::Untyped => {
                self.advance();
                TypeKind::Base(BaseType::Untyped)
            }
            TokenKind::Bool => {
                self.advance();
                TypeKind::Base(BaseType::Bool)
            }
            TokenKind::Bot => {
                self.advance();
                TypeKind::Base(BaseType::Bot)
            }
            TokenKind::Class => {
                self.advance();
                TypeKind::Base(BaseType::Class)
            }
            TokenKind::Instance => {
                self.advance();
                TypeKind::Base(BaseType::Instance)
            }
            TokenKind::Nil => {
                self.advance();
                TypeKind::Base(BaseType::Nil)
            }
            TokenKind::SelfKw => {
                self.advance();
                TypeKind::Base(BaseType::SelfType)
            }
            TokenKind::Top => {
                self.advance();
                TypeKind::Base(BaseType::Top)
            }
            TokenKind::Void => {
                self.advance();
                TypeKind::Base(BaseType::Void)
            }
            TokenKind::True => {
                self.advance();
                TypeKind::Literal(LiteralValue::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                TypeKind::Literal(LiteralValue::Bool(false))
            }
            TokenKind::Int(value) => {
                self.advance();
                TypeKind::Literal(LiteralValue::Int(value))
            }
            TokenKind::Str(raw) => {
                self.advance();
                TypeKind::Literal(LiteralValue::Str(raw))
            }
            TokenKind::Symbol(raw) => {
                self.advance();
                TypeKind::Literal(LiteralValue::Symbol(raw))
            }
            TokenKind::Singleton => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let name = self.parse_type_name()?;
                self.expect(&TokenKind::RParen)?;
                TypeKind::Singleton(name)
            }
            TokenKind::Caret => {
                self.advance();
                let (fn_type, block) = self.parse_fn_signature()?;
                TypeKind::Proc(Box::new(MethodType {
                    type_params: Vec::new(),
                    fn_type,
                    block,
                }))
            }
            TokenKind::LParen => {
                // Parenthesized grouping leaves no node; the formatter
                // re-derives parentheses from context.
                self.advance();
                let ty = self.parse_type()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(ty);
            }
            TokenKind::LBracket => {
                self.advance();
                return self.parse_tuple_type(start);
            }
            TokenKind::LBrace => {
                self.advance();
                return self.parse_record_type(start);
            }
            TokenKind::UpperIdent(_)
            | TokenKind::LowerIdent(_)
            | TokenKind::InterfaceIdent(_)
            | TokenKind::ColonColon => return self.parse_named_type(),
            _ => {
                return Err(ParseError::expected(
                    "a type",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        Ok(Type { kind, span: Span::new(start, self.last_end()) })
    }

    fn parse_tuple_type(&mut self, start: usize) -> Result<Type, ParseError> {
        if self.match_token(&TokenKind::RBracket) {
            return Ok(Type {
                kind: TypeKind::Tuple(Vec::new()),
                span: Span::new(start, self.last_end()),
            });
        }
        let mut types = Vec::new();
        loop {
            types.push(self.parse_type()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Type {
            kind: TypeKind::Tuple(types),
            span: Span::new(start, self.last_end()),
        })
    }

    fn parse_record_type(&mut self, start: usize) -> Result<Type, ParseError> {
        let mut fields = Vec::new();
        loop {
            fields.push(self.parse_record_field()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
            if self.check(&TokenKind::RBrace) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Type {
            kind: TypeKind::Record(fields),
            span: Span::new(start, self.last_end()),
        })
    }

    fn parse_record_field(&mut self) -> Result<RecordField, ParseError> {
        if let Some(name) = self.take_keyword_name() {
            let value = self.parse_type()?;
            return Ok(RecordField { key: RecordKey::Name(name), value });
        }
        let key = match self.current_kind().clone() {
            TokenKind::Symbol(raw) => {
                self.advance();
                if raw.starts_with(":\"") || raw.starts_with(":'") {
                    RecordKey::QuotedSymbol(raw)
                } else {
                    RecordKey::Name(raw[1..].to_string())
                }
            }
            TokenKind::Str(raw) => {
                self.advance();
                RecordKey::Str(raw)
            }
            TokenKind::Int(value) => {
                self.advance();
                RecordKey::Int(value)
            }
            TokenKind::True => {
                self.advance();
                RecordKey::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                RecordKey::Bool(false)
            }
            _ => {
                return Err(ParseError::expected(
                    "a record key",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        self.expect(&TokenKind::FatArrow)?;
        let value = self.parse_type()?;
        Ok(RecordField { key, value })
    }

    /// Class, interface, and alias references, possibly namespaced and
    /// with optional generic arguments. A bare uppercase name bound by an
    /// enclosing declaration or signature is a type variable.
    fn parse_named_type(&mut self) -> Result<Type, ParseError> {
        #[derive(PartialEq)]
        enum Last {
            Upper,
            Interface,
            Lower,
        }

        let start = self.current().span.start;
        let mut name = String::new();
        let absolute = self.match_token(&TokenKind::ColonColon);
        if absolute {
            name.push_str("::");
        }
        let mut last;
        loop {
            match self.current_kind().clone() {
                TokenKind::UpperIdent(part) => {
                    self.advance();
                    name.push_str(&part);
                    last = Last::Upper;
                }
                TokenKind::InterfaceIdent(part) => {
                    self.advance();
                    name.push_str(&part);
                    last = Last::Interface;
                }
                TokenKind::LowerIdent(part) => {
                    self.advance();
                    name.push_str(&part);
                    last = Last::Lower;
                }
                _ => {
                    return Err(ParseError::expected(
                        "a type name",
                        self.current_kind(),
                        self.current().span,
                    ))
                }
            }
            if last == Last::Upper && self.check(&TokenKind::ColonColon) {
                self.advance();
                name.push_str("::");
            } else {
                break;
            }
        }

        let args = if self.check(&TokenKind::LBracket) {
            self.parse_type_args()?
        } else {
            Vec::new()
        };

        let kind = match last {
            Last::Interface => TypeKind::Interface(TypeRef { name, args }),
            Last::Lower => TypeKind::Alias(TypeRef { name, args }),
            Last::Upper => {
                if !absolute
                    && args.is_empty()
                    && !name.contains("::")
                    && self.is_type_variable(&name)
                {
                    TypeKind::Variable(name)
                } else {
                    TypeKind::ClassInstance(TypeRef { name, args })
                }
            }
        };
        Ok(Type { kind, span: Span::new(start, self.last_end()) })
    }

    fn parse_type_args(&mut self) -> Result<Vec<Type>, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(args)
    }

    /// A module-level name with optional arguments: superclasses, mixin
    /// targets, and module self-type constraints.
    fn parse_type_ref(&mut self) -> Result<TypeRef, ParseError> {
        let mut name = String::new();
        if self.match_token(&TokenKind::ColonColon) {
            name.push_str("::");
        }
        loop {
            match self.current_kind().clone() {
                TokenKind::UpperIdent(part) => {
                    self.advance();
                    name.push_str(&part);
                    if self.check(&TokenKind::ColonColon) {
                        self.advance();
                        name.push_str("::");
                        continue;
                    }
                    break;
                }
                TokenKind::InterfaceIdent(part) => {
                    self.advance();
                    name.push_str(&part);
                    break;
                }
                _ => {
                    return Err(ParseError::expected(
                        "a module name",
                        self.current_kind(),
                        self.current().span,
                    ))
                }
            }
        }
        let args = if self.check(&TokenKind::LBracket) {
            self.parse_type_args()?
        } else {
            Vec::new()
        };
        Ok(TypeRef { name, args })
    }
}

/// Parameter groups accumulated while parsing a parenthesized list; the
/// return type arrives later, so this is folded into an `FnType` at the
/// end of the signature.
#[derive(Default)]
struct ParamGroups {
    required_positionals: Vec<Param>,
    optional_positionals: Vec<Param>,
    rest_positional: Option<Param>,
    trailing_positionals: Vec<Param>,
    required_keywords: Vec<Keyword>,
    optional_keywords: Vec<Keyword>,
    rest_keyword: Option<Param>,
}

impl ParamGroups {
    fn into_fn_type(self, return_type: Type) -> FnType {
        FnType {
            required_positionals: self.required_positionals,
            optional_positionals: self.optional_positionals,
            rest_positional: self.rest_positional,
            trailing_positionals: self.trailing_positionals,
            required_keywords: self.required_keywords,
            optional_keywords: self.optional_keywords,
            rest_keyword: self.rest_keyword,
            return_type,
        }
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError { span: err.span, message: err.message, hint: err.hint }
    }
}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "')'" if matches!(found, TokenKind::Eof) => "Unclosed '(' - missing ')'".to_string(),
        "']'" if matches!(found, TokenKind::Eof) => "Unclosed '[' - missing ']'".to_string(),
        "'}'" if matches!(found, TokenKind::Eof) => "Unclosed '{' - missing '}'".to_string(),
        "'end'" if matches!(found, TokenKind::Eof) => {
            "Missing 'end' to close the body".to_string()
        }
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
