//! Token and [`TokenType`] definitions for the lexer.
//!
//! Tokens carry raw coordinates rather than a prebuilt [`SourceLocation`];
//! the location is derived on demand, which keeps token construction to a
//! handful of integer stores.

use crate::nodes::SourceLocation;

/// Token types produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Document structure
    Eof,
    BlankLine,

    // Headings
    AtxHeading,
    SetextHeadingUnderline,

    // Code
    FencedCodeStart,
    FencedCodeEnd,
    FencedCodeContent,
    IndentedCode,

    // Quotes and lists
    BlockQuoteMarker,
    ListItemMarker,

    // Other blocks
    ThematicBreak,
    HtmlBlock,
    ParagraphLine,
    LinkReferenceDef,

    // Directive system (MyST)
    DirectiveOpen,
    DirectiveClose,
    DirectiveName,
    DirectiveTitle,
    DirectiveOption,

    // Role system (MyST)
    Role,

    // Plugin tokens - tables
    TableRow,
    TableDelimiter,

    // Plugin tokens - strikethrough
    StrikethroughMarker,

    // Plugin tokens - math
    MathInline,
    MathBlockStart,
    MathBlockEnd,
    MathBlockContent,

    // Plugin tokens - footnotes
    FootnoteRef,
    FootnoteDef,
}

/// A token produced by the lexer: the atomic unit handed to the parser.
///
/// `value` is either a source substring or an encoded payload
/// (`FencedCodeStart` carries `"I{indent}:{fence}{info}"`,
/// `LinkReferenceDef` carries `"label|url|title"`, and so on).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub value: String,
    /// 1-indexed start line.
    pub line: usize,
    /// 1-indexed start column.
    pub column: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Effective indent of the line this token starts on, with tabs
    /// expanded to 4-column stops. `-1` when not applicable.
    pub line_indent: i32,
    pub end_line: usize,
    pub end_column: usize,
}

impl Token {
    /// Builds the full location from the stored raw coordinates.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            offset: self.start_offset,
            end_offset: self.end_offset,
            end_line: Some(self.end_line),
            end_column: Some(self.end_column),
        }
    }
}
