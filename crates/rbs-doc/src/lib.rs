// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Width-aware document layout.
//!
//! A small Wadler-style pretty-printing core: the formatter builds a
//! [`Doc`] tree through a streaming [`DocBuilder`], then [`render`]s it
//! against a maximum line width. Break points inside a group resolve
//! together: the whole group renders flat (each break point becoming its
//! fallback text) when it fits on the remaining line, otherwise every
//! break point becomes a newline at the current indentation.
//!
//! A forced break marks every enclosing open group as broken, so a
//! construct that must span lines (a class body, a comment) breaks its
//! ancestors too instead of overflowing a "fitting" flat layout.

/// A layout document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doc {
    Text(String),
    /// A break point: renders as the fallback text when flat, as a
    /// newline when the enclosing group is broken.
    SoftBreak(String),
    /// Always renders as a newline.
    HardBreak,
    /// A newline that suppresses indentation, for multi-line literal
    /// content whose continuation lines must stay flush left.
    HardBreakFlush,
    /// Children render with the line indentation increased by the given
    /// number of columns.
    Indent(usize, Vec<Doc>),
    Group { broken: bool, body: Vec<Doc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

/// Streaming builder for [`Doc`] trees.
///
/// Groups and indents are opened and closed explicitly so that callers
/// holding other borrows can interleave emission freely; `group` and
/// `indent` offer closure sugar over the same frames.
#[derive(Debug)]
pub struct DocBuilder {
    indent_width: usize,
    frames: Vec<Frame>,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    body: Vec<Doc>,
}

#[derive(Debug)]
enum FrameKind {
    Root,
    Group { broken: bool },
    Indent(usize),
}

impl DocBuilder {
    pub fn new() -> Self {
        Self::with_indent(2)
    }

    /// A builder whose `indent` blocks advance by `indent_width` columns.
    pub fn with_indent(indent_width: usize) -> Self {
        DocBuilder {
            indent_width,
            frames: vec![Frame { kind: FrameKind::Root, body: Vec::new() }],
        }
    }

    fn push(&mut self, doc: Doc) {
        self.frames.last_mut().expect("builder has a root frame").body.push(doc);
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.push(Doc::Text(text.into()));
    }

    /// A break point that falls back to a single space.
    pub fn breakable(&mut self) {
        self.push(Doc::SoftBreak(" ".to_string()));
    }

    /// A break point that falls back to nothing.
    pub fn breakable_empty(&mut self) {
        self.push(Doc::SoftBreak(String::new()));
    }

    /// A break point with an explicit flat fallback.
    pub fn breakable_with(&mut self, fallback: impl Into<String>) {
        self.push(Doc::SoftBreak(fallback.into()));
    }

    /// An unconditional newline. Marks every open group as broken.
    pub fn force_break(&mut self) {
        self.break_open_groups();
        self.push(Doc::HardBreak);
    }

    /// An unconditional newline that carries no indentation, so the next
    /// line starts at column zero regardless of enclosing indents. Marks
    /// every open group as broken.
    pub fn force_break_flush(&mut self) {
        self.break_open_groups();
        self.push(Doc::HardBreakFlush);
    }

    fn break_open_groups(&mut self) {
        for frame in &mut self.frames {
            if let FrameKind::Group { broken } = &mut frame.kind {
                *broken = true;
            }
        }
    }

    pub fn open_group(&mut self) {
        self.frames.push(Frame { kind: FrameKind::Group { broken: false }, body: Vec::new() });
    }

    /// Open a group that is already marked broken; its break points will
    /// all render as newlines without affecting enclosing groups.
    pub fn open_group_broken(&mut self) {
        self.frames.push(Frame { kind: FrameKind::Group { broken: true }, body: Vec::new() });
    }

    pub fn close_group(&mut self) {
        let frame = self.frames.pop().expect("unbalanced close_group");
        let FrameKind::Group { broken } = frame.kind else {
            panic!("close_group on a non-group frame");
        };
        self.push(Doc::Group { broken, body: frame.body });
    }

    pub fn group(&mut self, f: impl FnOnce(&mut Self)) {
        self.open_group();
        f(self);
        self.close_group();
    }

    pub fn open_indent(&mut self) {
        let width = self.indent_width;
        self.open_indent_by(width);
    }

    /// Open an indent frame advancing by an explicit column count, for
    /// alignment under a prefix rather than by indentation steps.
    pub fn open_indent_by(&mut self, width: usize) {
        self.frames.push(Frame { kind: FrameKind::Indent(width), body: Vec::new() });
    }

    pub fn close_indent(&mut self) {
        let frame = self.frames.pop().expect("unbalanced close_indent");
        let FrameKind::Indent(width) = frame.kind else {
            panic!("close_indent on a non-indent frame");
        };
        self.push(Doc::Indent(width, frame.body));
    }

    pub fn indent(&mut self, f: impl FnOnce(&mut Self)) {
        self.open_indent();
        f(self);
        self.close_indent();
    }

    /// Finish building. All groups and indents must be closed.
    pub fn finish(mut self) -> Doc {
        let frame = self.frames.pop().expect("builder has a root frame");
        assert!(
            self.frames.is_empty() && matches!(frame.kind, FrameKind::Root),
            "finish with unclosed frames"
        );
        Doc::Indent(0, frame.body)
    }
}

impl Default for DocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a document against a maximum line width.
///
/// Width is measured in characters. Trailing spaces are trimmed from
/// every line, so forced blank lines come out truly empty.
pub fn render(doc: &Doc, max_width: usize) -> String {
    let mut out = String::new();
    let mut col = 0usize;
    let mut stack: Vec<(usize, Mode, &Doc)> = vec![(0, Mode::Break, doc)];

    while let Some((indent, mode, doc)) = stack.pop() {
        match doc {
            Doc::Text(text) => {
                out.push_str(text);
                col += text.chars().count();
            }
            Doc::SoftBreak(fallback) => match mode {
                Mode::Flat => {
                    out.push_str(fallback);
                    col += fallback.chars().count();
                }
                Mode::Break => {
                    emit_newline(&mut out, indent);
                    col = indent;
                }
            },
            Doc::HardBreak => {
                emit_newline(&mut out, indent);
                col = indent;
            }
            Doc::HardBreakFlush => {
                emit_newline(&mut out, 0);
                col = 0;
            }
            Doc::Indent(extra, body) => {
                for child in body.iter().rev() {
                    stack.push((indent + extra, mode, child));
                }
            }
            Doc::Group { broken, body } => {
                let mode = if *broken || !fits(max_width.saturating_sub(col), body) {
                    Mode::Break
                } else {
                    Mode::Flat
                };
                for child in body.iter().rev() {
                    stack.push((indent, mode, child));
                }
            }
        }
    }

    out
}

/// Whether `body` fits flat within `available` columns. The scan stops
/// early at the first break that is certain to end the line.
fn fits(available: usize, body: &[Doc]) -> bool {
    let mut width = available as i64;
    let mut stack: Vec<(Mode, &Doc)> = body.iter().rev().map(|d| (Mode::Flat, d)).collect();

    while let Some((mode, doc)) = stack.pop() {
        if width < 0 {
            return false;
        }
        match doc {
            Doc::Text(text) => width -= text.chars().count() as i64,
            Doc::SoftBreak(fallback) => match mode {
                Mode::Flat => width -= fallback.chars().count() as i64,
                Mode::Break => return true,
            },
            Doc::HardBreak | Doc::HardBreakFlush => return true,
            Doc::Indent(_, body) => {
                for child in body.iter().rev() {
                    stack.push((mode, child));
                }
            }
            Doc::Group { broken, body } => {
                let mode = if *broken { Mode::Break } else { mode };
                for child in body.iter().rev() {
                    stack.push((mode, child));
                }
            }
        }
    }

    width >= 0
}

fn emit_newline(out: &mut String, indent: usize) {
    while out.ends_with(' ') || out.ends_with('\t') {
        out.pop();
    }
    out.push('\n');
    for _ in 0..indent {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(f: impl FnOnce(&mut DocBuilder)) -> Doc {
        let mut q = DocBuilder::new();
        f(&mut q);
        q.finish()
    }

    #[test]
    fn flat_when_it_fits() {
        let doc = build(|q| {
            q.group(|q| {
                q.text("foo");
                q.breakable();
                q.text("bar");
            });
        });
        assert_eq!(render(&doc, 80), "foo bar");
    }

    #[test]
    fn breaks_when_too_wide() {
        let doc = build(|q| {
            q.group(|q| {
                q.text("foo");
                q.breakable();
                q.text("bar");
            });
        });
        assert_eq!(render(&doc, 4), "foo\nbar");
    }

    #[test]
    fn empty_fallback_collapses() {
        let doc = build(|q| {
            q.group(|q| {
                q.text("(");
                q.breakable_empty();
                q.text("x");
                q.breakable_empty();
                q.text(")");
            });
        });
        assert_eq!(render(&doc, 80), "(x)");
        assert_eq!(render(&doc, 2), "(\nx\n)");
    }

    #[test]
    fn indent_applies_on_break() {
        let doc = build(|q| {
            q.group(|q| {
                q.text("[");
                q.indent(|q| {
                    q.breakable_empty();
                    q.text("alpha,");
                    q.breakable();
                    q.text("beta");
                });
                q.breakable_empty();
                q.text("]");
            });
        });
        assert_eq!(render(&doc, 80), "[alpha, beta]");
        assert_eq!(render(&doc, 6), "[\n  alpha,\n  beta\n]");
    }

    #[test]
    fn force_break_marks_enclosing_groups() {
        let doc = build(|q| {
            q.group(|q| {
                q.text("head");
                q.breakable();
                q.group(|q| {
                    q.text("a");
                    q.force_break();
                    q.text("b");
                });
            });
        });
        // Plenty of width, but the forced break must split the outer
        // group's soft break too.
        assert_eq!(render(&doc, 80), "head\na\nb");
    }

    #[test]
    fn force_break_does_not_affect_closed_siblings() {
        let doc = build(|q| {
            q.group(|q| {
                q.text("a");
                q.breakable();
                q.text("b");
            });
            q.force_break();
            q.text("tail");
        });
        assert_eq!(render(&doc, 80), "a b\ntail");
    }

    #[test]
    fn broken_group_always_breaks() {
        let doc = build(|q| {
            q.open_group_broken();
            q.text("a");
            q.breakable();
            q.text("b");
            q.close_group();
        });
        assert_eq!(render(&doc, 80), "a\nb");
    }

    #[test]
    fn indent_by_aligns_under_prefix() {
        let doc = build(|q| {
            q.text("def t: ");
            q.open_indent_by(5);
            q.text("(A) -> B");
            q.force_break();
            q.text("| (C) -> D");
            q.close_indent();
        });
        assert_eq!(render(&doc, 80), "def t: (A) -> B\n     | (C) -> D");
    }

    #[test]
    fn blank_lines_carry_no_indentation() {
        let doc = build(|q| {
            q.text("begin");
            q.indent(|q| {
                q.force_break();
                q.text("a");
                q.force_break();
                q.force_break();
                q.text("b");
            });
            q.force_break();
            q.text("end");
        });
        assert_eq!(render(&doc, 80), "begin\n  a\n\n  b\nend");
    }

    #[test]
    fn flush_break_ignores_indentation() {
        let doc = build(|q| {
            q.text("outer");
            q.indent(|q| {
                q.force_break();
                q.text("\"first");
                q.force_break_flush();
                q.text("second\"");
            });
        });
        assert_eq!(render(&doc, 80), "outer\n  \"first\nsecond\"");
    }

    #[test]
    fn trailing_spaces_trimmed_at_breaks() {
        let doc = build(|q| {
            q.text("left ");
            q.force_break();
            q.text("right");
        });
        assert_eq!(render(&doc, 80), "left\nright");
    }

    #[test]
    fn explicit_fallback_text() {
        let doc = build(|q| {
            q.group(|q| {
                q.text("a");
                q.breakable_with(", ");
                q.text("b");
            });
        });
        assert_eq!(render(&doc, 80), "a, b");
        assert_eq!(render(&doc, 2), "a\nb");
    }

    #[test]
    fn width_counts_characters_not_bytes() {
        // Four emoji are 4 columns here, far under the byte count.
        let doc = build(|q| {
            q.group(|q| {
                q.text("🌼🌼🌼🌼");
                q.breakable();
                q.text("x");
            });
        });
        assert_eq!(render(&doc, 6), "🌼🌼🌼🌼 x");
    }

    #[test]
    fn nested_group_breaks_independently() {
        let doc = build(|q| {
            q.group(|q| {
                q.text("outer(");
                q.group(|q| {
                    q.text("a");
                    q.breakable();
                    q.text("b");
                });
                q.text(")");
            });
        });
        // Outer must break nothing; inner fits on its own.
        assert_eq!(render(&doc, 10), "outer(a b)");
    }
}
