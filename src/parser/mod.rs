//! Recursive-descent block parser producing the frozen AST.
//!
//! Parsing is two-pass: a linear scan collects link reference definitions
//! (first definition wins, and a definition cannot interrupt a paragraph),
//! then a recursive descent over the token stream builds blocks, driving
//! the container stack for indent routing and calling the inline parser
//! on leaf text.

pub mod containers;
mod inlines;
mod list;
pub mod options;
mod quote;
mod table;

use std::mem;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::directives::{ContractViolation, DirectiveOptions, ViolationKind};
use crate::lexer::Lexer;
use crate::nodes::{
    Block, Directive, Document, FencedCode, FootnoteDef, Heading, HtmlBlock, IndentedCode,
    MathBlock, Paragraph, SourceLocation, ThematicBreak,
};
use crate::parser::containers::{ContainerFrame, ContainerKind, ContainerStack};
use crate::parser::options::Options;
use crate::strings;
use crate::tokens::{Token, TokenType};

/// Normalized label → (url, title).
pub(crate) type RefMap = FxHashMap<String, (String, String)>;

/// Parses a source buffer into a [`Document`].
pub fn parse_document(source: &str, options: &Options) -> Document {
    let tokens = Lexer::new(source, options).tokenize();
    let mut parser = Parser::new(source, options, tokens);
    let children = parser.run();
    Document {
        location: SourceLocation::new(1, 1, 0, source.len()),
        children,
        source: Arc::from(source),
        diagnostics: parser.diagnostics,
    }
}

/// Single-use parser over one token stream.
pub(crate) struct Parser<'s, 'o> {
    source: &'s str,
    options: &'o Options,
    tokens: Vec<Token>,
    pos: usize,
    pub(crate) link_refs: RefMap,
    containers: ContainerStack,
    directive_stack: Vec<String>,
    pub(crate) diagnostics: Vec<ContractViolation>,
    allow_setext: bool,
}

impl<'s, 'o> Parser<'s, 'o> {
    pub(crate) fn new(source: &'s str, options: &'o Options, tokens: Vec<Token>) -> Self {
        Parser {
            source,
            options,
            tokens,
            pos: 0,
            link_refs: RefMap::default(),
            containers: ContainerStack::new(),
            directive_stack: Vec::new(),
            diagnostics: Vec::new(),
            allow_setext: true,
        }
    }

    pub(crate) fn run(&mut self) -> Vec<Block> {
        self.collect_link_refs();

        let mut blocks = Vec::new();
        while !self.at_end() {
            if let Some(block) = self.parse_block() {
                blocks.push(block);
            }
        }
        blocks
    }

    // =====================================================================
    // Token navigation
    // =====================================================================

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.tokens[self.pos].kind == TokenType::Eof
    }

    pub(crate) fn cur(&self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn peek(&self, ahead: usize) -> Option<&Token> {
        let idx = self.pos + ahead;
        if idx < self.tokens.len() {
            Some(&self.tokens[idx])
        } else {
            None
        }
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    // =====================================================================
    // Pass 1: link reference definitions
    // =====================================================================

    /// Registers `label|url|title` definitions, first-wins. A definition
    /// cannot interrupt a paragraph (CommonMark §4.7), so paragraph-ish
    /// tokens block registration until the paragraph ends.
    fn collect_link_refs(&mut self) {
        let mut in_paragraph = false;

        for token in &self.tokens {
            match token.kind {
                TokenType::LinkReferenceDef => {
                    if !in_paragraph {
                        let mut parts = token.value.splitn(3, '|');
                        let raw_label = parts.next().unwrap_or("");
                        let url = parts.next();
                        let title = parts.next().unwrap_or("");
                        if let Some(url) = url {
                            // Labels with an unescaped bracket never match.
                            if !raw_label.replace("\\[", "").contains('[') {
                                let label = strings::normalize_label(raw_label);
                                self.link_refs.entry(label).or_insert_with(|| {
                                    (
                                        strings::process_escapes(url),
                                        strings::process_escapes(title),
                                    )
                                });
                            }
                        }
                    }
                    in_paragraph = false;
                }
                TokenType::ParagraphLine | TokenType::IndentedCode => in_paragraph = true,
                TokenType::BlankLine => in_paragraph = false,
                TokenType::AtxHeading
                | TokenType::ThematicBreak
                | TokenType::FencedCodeStart
                | TokenType::BlockQuoteMarker
                | TokenType::ListItemMarker
                | TokenType::HtmlBlock
                | TokenType::DirectiveOpen
                | TokenType::FootnoteDef => in_paragraph = false,
                _ => {}
            }
        }
    }

    // =====================================================================
    // Pass 2: block dispatch
    // =====================================================================

    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        if self.at_end() {
            return None;
        }

        match self.cur().kind {
            TokenType::BlankLine => {
                self.advance();
                None
            }
            TokenType::AtxHeading => Some(self.parse_atx_heading()),
            TokenType::FencedCodeStart => Some(self.parse_fenced_code(None)),
            TokenType::ThematicBreak => Some(self.parse_thematic_break()),
            TokenType::BlockQuoteMarker => Some(self.parse_block_quote()),
            TokenType::ListItemMarker => Some(self.parse_list(-1)),
            TokenType::IndentedCode => Some(self.parse_indented_code()),
            TokenType::ParagraphLine => Some(self.parse_paragraph()),
            TokenType::DirectiveOpen => self.parse_directive(),
            TokenType::FootnoteDef => Some(self.parse_footnote_def()),
            TokenType::LinkReferenceDef => {
                // Collected in pass 1; no node.
                self.advance();
                None
            }
            TokenType::HtmlBlock => Some(self.parse_html_block()),
            TokenType::MathBlockStart => Some(self.parse_math_block()),
            TokenType::FencedCodeContent => Some(self.parse_orphaned_fence_content()),
            TokenType::FencedCodeEnd => Some(self.parse_orphaned_fence_end()),
            _ => {
                self.advance();
                None
            }
        }
    }

    // =====================================================================
    // Leaf blocks
    // =====================================================================

    fn parse_atx_heading(&mut self) -> Block {
        let token = self.cur().clone();
        self.advance();

        let value = token.value.as_str();
        let bytes = value.as_bytes();
        let mut level = 0usize;
        while level < bytes.len() && bytes[level] == b'#' && level < 6 {
            level += 1;
        }
        let mut pos = level;
        if pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
            pos += 1;
        }
        let content = value[pos..].trim();

        let (content, explicit_id) = extract_explicit_id(content);
        let children = self.parse_inline(content, token.location());

        Block::Heading(Heading {
            location: token.location(),
            level: level as u8,
            children,
            setext: false,
            explicit_id,
        })
    }

    fn parse_thematic_break(&mut self) -> Block {
        let token = self.cur().clone();
        self.advance();
        Block::ThematicBreak(ThematicBreak { location: token.location() })
    }

    fn parse_html_block(&mut self) -> Block {
        let token = self.cur().clone();
        self.advance();
        Block::HtmlBlock(HtmlBlock {
            location: token.location(),
            html: token.value,
        })
    }

    /// Fenced code with zero-copy content coordinates. When the lexer
    /// stripped fence indent from content lines (or the fence came from a
    /// reconstructed sub-parse), the byte range is not contiguous in the
    /// source and the collected text shadows it via `content_override`.
    pub(crate) fn parse_fenced_code(&mut self, override_fence_indent: Option<i32>) -> Block {
        let start_token = self.cur().clone();
        self.advance();

        let mut value = start_token.value.as_str();
        let mut lexer_indent = 0i32;
        if let Some(rest) = value.strip_prefix('I') {
            if let Some(colon) = rest.find(':') {
                lexer_indent = rest[..colon].parse().unwrap_or(0);
                value = &rest[colon + 1..];
            }
        }

        let mut fence_indent = lexer_indent;
        if let Some(ov) = override_fence_indent {
            fence_indent = ov;
        }

        let marker = *value.as_bytes().first().unwrap_or(&b'`');
        let mut marker_count = 0;
        while value.as_bytes().get(marker_count) == Some(&marker) {
            marker_count += 1;
        }
        let info_str = value[marker_count..].trim();
        let info = if info_str.is_empty() {
            None
        } else {
            Some(strings::process_escapes(info_str))
        };

        let mut content_start: Option<usize> = None;
        let mut content_end: usize = 0;
        let mut collected: Option<String> = if lexer_indent > 0 { Some(String::new()) } else { None };

        while !self.at_end() {
            match self.cur().kind {
                TokenType::FencedCodeEnd => {
                    if content_start.is_none() {
                        content_start = Some(start_token.end_offset);
                        content_end = start_token.end_offset;
                    }
                    self.advance();
                    break;
                }
                TokenType::FencedCodeContent => {
                    let token = self.cur();
                    if content_start.is_none() {
                        content_start = Some(token.start_offset);
                    }
                    content_end = token.end_offset;
                    if let Some(buf) = collected.as_mut() {
                        buf.push_str(&token.value);
                    }
                    self.advance();
                }
                _ => break,
            }
        }

        Block::FencedCode(FencedCode {
            location: start_token.location(),
            source_start: content_start.unwrap_or(0),
            source_end: content_end,
            info,
            marker,
            fence_indent: fence_indent.max(0) as usize,
            content_override: collected,
        })
    }

    /// Orphaned fence content (a fence interrupted by its container
    /// ending) renders as paragraph text; nothing is dropped.
    fn parse_orphaned_fence_content(&mut self) -> Block {
        let start_token = self.cur().clone();

        let mut lines: Vec<String> = Vec::new();
        while !self.at_end() && self.cur().kind == TokenType::FencedCodeContent {
            lines.push(self.cur().value.trim_end_matches('\n').to_string());
            self.advance();
        }

        let content = lines.join("\n");
        let children = self.parse_inline(&content, start_token.location());
        Block::Paragraph(Paragraph {
            location: start_token.location(),
            children,
        })
    }

    /// An orphaned closing fence becomes a fresh unclosed fence.
    fn parse_orphaned_fence_end(&mut self) -> Block {
        let token = self.cur().clone();
        self.advance();

        let fence = token.value.trim();
        let marker = *fence.as_bytes().first().unwrap_or(&b'`');
        Block::FencedCode(FencedCode {
            location: token.location(),
            source_start: 0,
            source_end: 0,
            info: None,
            marker,
            fence_indent: 0,
            content_override: None,
        })
    }

    fn parse_indented_code(&mut self) -> Block {
        let start_token = self.cur().clone();
        let mut parts: Vec<String> = Vec::new();

        while !self.at_end() {
            match self.cur().kind {
                TokenType::IndentedCode => {
                    parts.push(self.cur().value.clone());
                    self.advance();
                }
                TokenType::BlankLine => {
                    // Blank lines continue the block only when more code
                    // follows; interior blanks keep their excess indent.
                    let mut blank_lines: Vec<String> = Vec::new();
                    let mut next_pos = self.pos;
                    loop {
                        match self.tokens.get(next_pos).map(|t| t.kind) {
                            Some(TokenType::BlankLine) => {
                                let offset = self.tokens[next_pos].start_offset;
                                let line_start =
                                    self.source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
                                let line_end = self.source[offset..]
                                    .find('\n')
                                    .map(|i| offset + i)
                                    .unwrap_or(self.source.len());
                                let original_line = &self.source[line_start..line_end];
                                if original_line.len() >= 4 && original_line.starts_with("    ") {
                                    blank_lines.push(format!("{}\n", &original_line[4..]));
                                } else {
                                    blank_lines.push("\n".to_string());
                                }
                                next_pos += 1;
                            }
                            Some(TokenType::IndentedCode) => {
                                for line in &blank_lines {
                                    parts.push(line.clone());
                                }
                                for _ in 0..blank_lines.len() {
                                    self.advance();
                                }
                                break;
                            }
                            _ => {
                                next_pos = usize::MAX;
                                break;
                            }
                        }
                    }
                    if next_pos == usize::MAX
                        || self.tokens.get(next_pos).map(|t| t.kind)
                            != Some(TokenType::IndentedCode)
                    {
                        break;
                    }
                }
                _ => break,
            }
        }

        Block::IndentedCode(IndentedCode {
            location: start_token.location(),
            code: parts.concat(),
        })
    }

    fn parse_math_block(&mut self) -> Block {
        let start_token = self.cur().clone();
        self.advance();

        let mut lines: Vec<String> = Vec::new();
        while !self.at_end() {
            match self.cur().kind {
                TokenType::MathBlockContent => {
                    lines.push(self.cur().value.clone());
                    self.advance();
                }
                TokenType::MathBlockEnd => {
                    self.advance();
                    break;
                }
                _ => break,
            }
        }

        Block::MathBlock(MathBlock {
            location: start_token.location(),
            content: lines.join("\n"),
        })
    }

    // =====================================================================
    // Paragraph / setext / table resolution
    // =====================================================================

    fn parse_paragraph(&mut self) -> Block {
        let start_token = self.cur().clone();

        let mut lines: Vec<String> = Vec::new();
        let mut pending_setext_underline: Option<String> = None;
        let mut last_line_was_indented_code = false;
        let allow_setext = self.allow_setext;

        while !self.at_end() {
            let token = self.cur().clone();
            match token.kind {
                TokenType::ParagraphLine => {
                    let stripped = token.value.trim_start().to_string();
                    if allow_setext
                        && !lines.is_empty()
                        && !last_line_was_indented_code
                        && is_setext_underline(&stripped)
                    {
                        pending_setext_underline = Some(stripped);
                        self.advance();
                        break;
                    }
                    lines.push(stripped);
                    last_line_was_indented_code = false;
                    self.advance();
                }
                TokenType::IndentedCode => {
                    // Indented code cannot interrupt a paragraph; it is
                    // lazy continuation text.
                    lines.push(token.value.trim_end_matches('\n').to_string());
                    last_line_was_indented_code = true;
                    self.advance();
                }
                TokenType::ListItemMarker => {
                    // Only a list item with content interrupts, and an
                    // ordered marker only when its number is 1.
                    let has_content = self
                        .peek(1)
                        .map(|t| t.kind == TokenType::ParagraphLine)
                        .unwrap_or(false);
                    if !has_content {
                        lines.push(token.value.trim_start().to_string());
                        self.advance();
                        continue;
                    }

                    let marker = token.value.trim_start();
                    if marker.as_bytes().first().map(u8::is_ascii_digit).unwrap_or(false) {
                        let digits: String =
                            marker.chars().take_while(char::is_ascii_digit).collect();
                        if digits.parse::<usize>().map(|n| n != 1).unwrap_or(false) {
                            let mut line = marker.to_string();
                            self.advance();
                            if !self.at_end() && self.cur().kind == TokenType::ParagraphLine {
                                line.push_str(&self.cur().value);
                                self.advance();
                            }
                            lines.push(line);
                            continue;
                        }
                    }
                    break;
                }
                TokenType::LinkReferenceDef => {
                    // Mid-paragraph, the definition text stays literal.
                    if lines.is_empty() {
                        break;
                    }
                    let original = self.source[token.start_offset..token.end_offset]
                        .trim_end_matches('\n');
                    lines.push(original.trim_start().to_string());
                    self.advance();
                }
                _ => break,
            }
        }

        // Setext heading: collected lines with an `=`/`-` underline.
        let underline = pending_setext_underline
            .clone()
            .or_else(|| {
                if lines.len() >= 2 {
                    Some(lines.last().expect("nonempty").trim().to_string())
                } else {
                    None
                }
            })
            .unwrap_or_default();
        if allow_setext
            && !lines.is_empty()
            && !underline.is_empty()
            && !last_line_was_indented_code
            && is_setext_underline(&underline)
            && (pending_setext_underline.is_some() || lines.len() >= 2)
        {
            let level = if underline.starts_with('=') { 1 } else { 2 };
            let heading_lines: Vec<&str> = if pending_setext_underline.is_some() {
                lines.iter().map(|l| l.trim_end()).collect()
            } else {
                lines[..lines.len() - 1].iter().map(|l| l.trim_end()).collect()
            };
            let heading_text = heading_lines.join("\n");
            let children = self.parse_inline(&heading_text, start_token.location());
            return Block::Heading(Heading {
                location: start_token.location(),
                level,
                children,
                setext: true,
                explicit_id: None,
            });
        }

        // A `-`-only thematic break right after a paragraph is a setext h2.
        if allow_setext && !lines.is_empty() && !self.at_end() {
            let token = self.cur();
            if token.kind == TokenType::ThematicBreak {
                let break_value = token.value.trim();
                if !break_value.is_empty() && break_value.bytes().all(|b| b == b'-') {
                    self.advance();
                    let heading_text =
                        lines.iter().map(|l| l.trim_end()).collect::<Vec<_>>().join("\n");
                    let children = self.parse_inline(&heading_text, start_token.location());
                    return Block::Heading(Heading {
                        location: start_token.location(),
                        level: 2,
                        children,
                        setext: true,
                        explicit_id: None,
                    });
                }
            }
        }

        if self.options.extension.table && lines.len() >= 2 && lines[0].contains('|') {
            if let Some(table) = self.try_parse_table(&lines, start_token.location()) {
                return Block::Table(table);
            }
        }

        let mut content = lines.join("\n");
        while content.ends_with(' ') {
            content.pop();
        }
        let children = self.parse_inline(&content, start_token.location());
        Block::Paragraph(Paragraph {
            location: start_token.location(),
            children,
        })
    }

    // =====================================================================
    // Footnote definitions
    // =====================================================================

    fn parse_footnote_def(&mut self) -> Block {
        let token = self.cur().clone();
        self.advance();

        let mut parts = token.value.splitn(2, '|');
        let identifier = parts.next().unwrap_or("").to_string();
        let first_line = parts.next().unwrap_or("").to_string();

        if !self.options.extension.footnotes {
            // Extension off: the line is ordinary paragraph text.
            let literal = format!("[^{}]: {}", identifier, first_line);
            let children = self.parse_inline(&literal, token.location());
            return Block::Paragraph(Paragraph {
                location: token.location(),
                children,
            });
        }

        let mut content_lines: Vec<String> = vec![first_line];
        loop {
            if self.at_end() {
                break;
            }
            match self.cur().kind {
                TokenType::IndentedCode => {
                    content_lines.push(self.cur().value.trim_end_matches('\n').to_string());
                    self.advance();
                }
                TokenType::ParagraphLine => {
                    // Lazy continuation of the definition's first paragraph.
                    content_lines.push(self.cur().value.trim_start().to_string());
                    self.advance();
                }
                TokenType::BlankLine => {
                    // Continue only when indented content follows.
                    let mut ahead = 1;
                    while self.peek(ahead).map(|t| t.kind) == Some(TokenType::BlankLine) {
                        ahead += 1;
                    }
                    if self.peek(ahead).map(|t| t.kind) == Some(TokenType::IndentedCode) {
                        content_lines.push(String::new());
                        for _ in 0..ahead {
                            self.advance();
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }

        let content = content_lines.join("\n");
        let children = self.parse_nested_content(&content, true, false);
        Block::FootnoteDef(FootnoteDef {
            location: token.location(),
            identifier,
            children,
        })
    }

    // =====================================================================
    // Directives
    // =====================================================================

    fn parse_directive(&mut self) -> Option<Block> {
        let open_token = self.cur().clone();
        self.advance();

        if self.at_end() || self.cur().kind != TokenType::DirectiveName {
            return None;
        }
        let name = self.cur().value.clone();
        self.advance();

        let title = if !self.at_end() && self.cur().kind == TokenType::DirectiveTitle {
            let t = self.cur().value.clone();
            self.advance();
            Some(t)
        } else {
            None
        };

        self.directive_stack.push(name.clone());

        // Leading :key: value lines become the raw option map.
        let mut raw_options: Vec<(String, String)> = Vec::new();
        while !self.at_end() && self.cur().kind == TokenType::DirectiveOption {
            let value = self.cur().value.clone();
            let mut parts = value.splitn(2, ':');
            let key = parts.next().unwrap_or("").to_string();
            let val = parts.next().unwrap_or("").to_string();
            raw_options.push((key, val));
            self.advance();
        }

        let body_start = self.cur().start_offset;
        let mut body_end = body_start;
        let mut children: Vec<Block> = Vec::new();
        let mut closed = false;

        while !self.at_end() {
            match self.cur().kind {
                TokenType::DirectiveClose => {
                    self.advance();
                    closed = true;
                    break;
                }
                TokenType::DirectiveOption => {
                    // An option line after body content is plain text.
                    let token = self.cur().clone();
                    self.advance();
                    let mut parts = token.value.splitn(2, ':');
                    let key = parts.next().unwrap_or("");
                    let val = parts.next().unwrap_or("");
                    let literal = format!(":{}: {}", key, val);
                    let inline = self.parse_inline(&literal, token.location());
                    children.push(Block::Paragraph(Paragraph {
                        location: token.location(),
                        children: inline,
                    }));
                    body_end = token.end_offset;
                }
                _ => {
                    body_end = self.cur().end_offset;
                    if let Some(block) = self.parse_block() {
                        children.push(block);
                    }
                }
            }
        }

        self.directive_stack.pop();

        if !closed {
            let violation = ContractViolation {
                directive: name.clone(),
                kind: ViolationKind::UnclosedDirective,
                message: format!("directive '{}' is not closed before end of input", name),
                expected: Vec::new(),
            };
            log::warn!("{}", violation.message);
            self.diagnostics.push(violation);
        }

        let location = open_token.location();
        let parent_name = self.directive_stack.last().map(String::as_str);

        let handler = self
            .options
            .parse
            .directives
            .as_ref()
            .and_then(|registry| registry.get(&name).cloned());

        let node = match handler {
            Some(handler) => {
                let typed = DirectiveOptions::from_raw(&raw_options, handler.option_kinds());

                if let Some(contract) = handler.contract() {
                    if let Some(violation) = contract.validate_parent(&name, parent_name) {
                        log::warn!("{}", violation.message);
                        self.diagnostics.push(violation);
                    }
                    for violation in contract.validate_children(&name, &children) {
                        log::warn!("{}", violation.message);
                        self.diagnostics.push(violation);
                    }
                }

                let raw_content = if handler.preserves_raw_content() {
                    let end = body_end.min(self.source.len()).max(body_start);
                    Some(self.source[body_start..end].to_string())
                } else {
                    None
                };

                handler.parse(&name, title.as_deref(), typed, raw_content, children, location)
            }
            None => Directive {
                location,
                name,
                title,
                options: DirectiveOptions::from_raw(&raw_options, &[]),
                children,
                raw_content: None,
            },
        };

        Some(Block::Directive(node))
    }

    // =====================================================================
    // Sub-parsing
    // =====================================================================

    /// Parses reconstructed container content as a fresh sub-document.
    /// The reference map is handed off so definitions stay document-wide,
    /// and top-level fenced code picks up `content_override` since its
    /// offsets point into `content`, not the original source.
    pub(crate) fn parse_nested_content(
        &mut self,
        content: &str,
        allow_setext: bool,
        in_block_quote: bool,
    ) -> Vec<Block> {
        if content.trim().is_empty() {
            return Vec::new();
        }

        let tokens = Lexer::new(content, self.options).tokenize();
        let mut sub = Parser::new(content, self.options, tokens);
        sub.link_refs = mem::take(&mut self.link_refs);
        sub.allow_setext = allow_setext;
        if in_block_quote {
            sub.containers.push(ContainerFrame::new(ContainerKind::BlockQuote, 0, 0));
        }

        let blocks = sub.run();

        self.link_refs = mem::take(&mut sub.link_refs);
        self.diagnostics.append(&mut sub.diagnostics);

        blocks
            .into_iter()
            .map(|block| match block {
                Block::FencedCode(mut fc) if fc.content_override.is_none() => {
                    fc.content_override = Some(
                        content
                            .get(fc.source_start..fc.source_end)
                            .unwrap_or("")
                            .to_string(),
                    );
                    Block::FencedCode(fc)
                }
                other => other,
            })
            .collect()
    }
}

/// Extracts a trailing `{#slug}` explicit anchor from heading content.
/// The id must start with a letter and contain only alphanumerics, `-`,
/// `_`; it must be preceded by whitespace (or start the content).
fn extract_explicit_id(content: &str) -> (&str, Option<String>) {
    if !content.ends_with('}') {
        return (content, None);
    }
    let brace_pos = match content.rfind("{#") {
        Some(i) => i,
        None => return (content, None),
    };
    if brace_pos > 0 {
        let before = content.as_bytes()[brace_pos - 1];
        if before != b' ' && before != b'\t' {
            return (content, None);
        }
    }

    let id = &content[brace_pos + 2..content.len() - 1];
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() => {}
        _ => return (content, None),
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return (content, None);
    }

    (content[..brace_pos].trim_end(), Some(id.to_string()))
}

/// A setext underline: only `=` or `-` with at most 3 leading spaces.
fn is_setext_underline(line: &str) -> bool {
    let stripped = line.trim_start();
    if line.len() - stripped.len() > 3 || stripped.is_empty() {
        return false;
    }
    let ch = stripped.as_bytes()[0];
    if ch != b'=' && ch != b'-' {
        return false;
    }
    stripped.trim_end().bytes().all(|b| b == ch)
}
