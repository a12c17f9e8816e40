//! The Patitas AST.
//!
//! Every node is constructed once by the parser and never mutated; the
//! whole tree is `Send + Sync` and may be read from any number of threads.
//! Each node records the source span it was parsed from, and fenced code
//! keeps byte offsets into the original buffer so code extraction is a
//! zero-copy slice.

use std::sync::Arc;

use crate::directives::{ContractViolation, DirectiveOptions};

/// Source span of a token or AST node.
///
/// `line`/`column` are 1-indexed; offsets are byte positions into the
/// source buffer. End line/column are only recorded for nodes where they
/// differ from the start and were cheap to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub end_offset: usize,
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize, end_offset: usize) -> Self {
        SourceLocation {
            line,
            column,
            offset,
            end_offset,
            end_line: None,
            end_column: None,
        }
    }

    /// Whether `other`'s byte range falls inside this one.
    pub fn contains(&self, other: &SourceLocation) -> bool {
        self.offset <= other.offset && other.end_offset <= self.end_offset
    }
}

/// A parsed document: the root of the block tree.
///
/// The document holds a shared copy of the source it was parsed from so
/// that [`FencedCode::get_code`] can slice it without the caller threading
/// the buffer around, plus any contract diagnostics collected during the
/// parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub location: SourceLocation,
    pub children: Vec<Block>,
    pub source: Arc<str>,
    pub diagnostics: Vec<ContractViolation>,
}

/// The closed set of block nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    FencedCode(FencedCode),
    IndentedCode(IndentedCode),
    BlockQuote(BlockQuote),
    List(List),
    ThematicBreak(ThematicBreak),
    HtmlBlock(HtmlBlock),
    Table(Table),
    MathBlock(MathBlock),
    FootnoteDef(FootnoteDef),
    Directive(Directive),
}

impl Block {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Block::Heading(n) => &n.location,
            Block::Paragraph(n) => &n.location,
            Block::FencedCode(n) => &n.location,
            Block::IndentedCode(n) => &n.location,
            Block::BlockQuote(n) => &n.location,
            Block::List(n) => &n.location,
            Block::ThematicBreak(n) => &n.location,
            Block::HtmlBlock(n) => &n.location,
            Block::Table(n) => &n.location,
            Block::MathBlock(n) => &n.location,
            Block::FootnoteDef(n) => &n.location,
            Block::Directive(n) => &n.location,
        }
    }
}

/// An ATX (`# …`) or setext (underlined) heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub location: SourceLocation,
    /// 1 through 6; setext headings only produce 1 or 2.
    pub level: u8,
    pub children: Vec<Inline>,
    pub setext: bool,
    /// A user-written `{#slug}` id, which overrides slug generation.
    pub explicit_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub location: SourceLocation,
    pub children: Vec<Inline>,
}

/// A fenced code block. Content is not copied out of the source at parse
/// time; `source_start..source_end` delimit it in the original buffer.
/// Sub-parsed content (a fence inside reconstructed blockquote text, say)
/// is not contiguous in the original source, and then `content_override`
/// shadows the offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct FencedCode {
    pub location: SourceLocation,
    pub source_start: usize,
    pub source_end: usize,
    pub info: Option<String>,
    /// The fence character, `` b'`' `` or `b'~'`.
    pub marker: u8,
    pub fence_indent: usize,
    pub content_override: Option<String>,
}

impl FencedCode {
    /// O(1) extraction of the code content.
    pub fn get_code<'a>(&'a self, source: &'a str) -> &'a str {
        if let Some(ref content) = self.content_override {
            content
        } else {
            source.get(self.source_start..self.source_end).unwrap_or("")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndentedCode {
    pub location: SourceLocation,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockQuote {
    pub location: SourceLocation,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub location: SourceLocation,
    pub items: Vec<ListItem>,
    pub ordered: bool,
    /// For ordered lists, the ordinal of the first item.
    pub start: usize,
    /// False iff a blank line was observed between or inside items.
    pub tight: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub location: SourceLocation,
    pub children: Vec<Block>,
    /// Task-list state: `Some(true)`/`Some(false)` for `[x]`/`[ ]`,
    /// `None` for a plain item.
    pub checked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThematicBreak {
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlBlock {
    pub location: SourceLocation,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub location: SourceLocation,
    pub head: Vec<TableRow>,
    pub body: Vec<TableRow>,
    pub alignments: Vec<TableAlignment>,
}

/// Alignment of a table column or cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAlignment {
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub location: SourceLocation,
    pub cells: Vec<TableCell>,
    pub is_header: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub location: SourceLocation,
    pub children: Vec<Inline>,
    pub is_header: bool,
    pub align: TableAlignment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MathBlock {
    pub location: SourceLocation,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteDef {
    pub location: SourceLocation,
    pub identifier: String,
    pub children: Vec<Block>,
}

/// A MyST-style fenced container block, `:::{name} … :::`.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub location: SourceLocation,
    pub name: String,
    pub title: Option<String>,
    pub options: DirectiveOptions,
    pub children: Vec<Block>,
    /// The unparsed body, kept only for handlers that declare
    /// `preserves_raw_content`.
    pub raw_content: Option<String>,
}

/// The closed set of inline nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(Text),
    Emphasis(Emphasis),
    Strong(Strong),
    Strikethrough(Strikethrough),
    Link(Link),
    Image(Image),
    CodeSpan(CodeSpan),
    LineBreak(LineBreak),
    SoftBreak(SoftBreak),
    HtmlInline(HtmlInline),
    Role(Role),
    Math(Math),
    FootnoteRef(FootnoteRef),
}

impl Inline {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Inline::Text(n) => &n.location,
            Inline::Emphasis(n) => &n.location,
            Inline::Strong(n) => &n.location,
            Inline::Strikethrough(n) => &n.location,
            Inline::Link(n) => &n.location,
            Inline::Image(n) => &n.location,
            Inline::CodeSpan(n) => &n.location,
            Inline::LineBreak(n) => &n.location,
            Inline::SoftBreak(n) => &n.location,
            Inline::HtmlInline(n) => &n.location,
            Inline::Role(n) => &n.location,
            Inline::Math(n) => &n.location,
            Inline::FootnoteRef(n) => &n.location,
        }
    }

    pub fn children(&self) -> Option<&[Inline]> {
        match self {
            Inline::Emphasis(n) => Some(&n.children),
            Inline::Strong(n) => Some(&n.children),
            Inline::Strikethrough(n) => Some(&n.children),
            Inline::Link(n) => Some(&n.children),
            _ => None,
        }
    }

    /// Whether this node is, or anywhere contains, a link. Links may not
    /// nest; the inline parser rejects an outer link whose text produced
    /// one.
    pub fn contains_link(&self) -> bool {
        if let Inline::Link(_) = self {
            return true;
        }
        match self.children() {
            Some(children) => children.iter().any(Inline::contains_link),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub location: SourceLocation,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Emphasis {
    pub location: SourceLocation,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strong {
    pub location: SourceLocation,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strikethrough {
    pub location: SourceLocation,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub location: SourceLocation,
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub location: SourceLocation,
    pub url: String,
    /// Plain text only; formatting in the alt is flattened away.
    pub alt: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeSpan {
    pub location: SourceLocation,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineBreak {
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoftBreak {
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlInline {
    pub location: SourceLocation,
    pub html: String,
}

/// A MyST-style inline role, `` {name}`content` ``.
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub location: SourceLocation,
    pub name: String,
    pub content: String,
    /// Handler-extracted target, e.g. the expansion of an `abbr` role.
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Math {
    pub location: SourceLocation,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteRef {
    pub location: SourceLocation,
    pub identifier: String,
}
