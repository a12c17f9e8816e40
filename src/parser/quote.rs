//! Block quote parsing.
//!
//! The general path reconstructs the quoted content (nested `>` markers
//! stay literal), tracks lazy continuation, and sub-parses the result as
//! a Markdown sub-document. Two fast paths skip the sub-parse for the
//! common shapes: a single-paragraph quote, and a multi-paragraph quote
//! whose every line is a plain `>`-prefixed paragraph line.

use crate::nodes::{Block, BlockQuote, Paragraph};
use crate::parser::Parser;
use crate::tokens::{Token, TokenType};

impl<'s, 'o> Parser<'s, 'o> {
    pub(crate) fn parse_block_quote(&mut self) -> Block {
        let start_token = self.cur().clone();
        debug_assert_eq!(start_token.kind, TokenType::BlockQuoteMarker);

        if let Some(end) = self.simple_quote_end(false) {
            return self.parse_simple_block_quote(end, false);
        }
        if let Some(end) = self.simple_quote_end(true) {
            return self.parse_simple_block_quote(end, true);
        }

        self.advance();

        let mut content_lines: Vec<String> = Vec::new();
        let mut current_line_parts: Vec<String> = Vec::new();

        let mut last_marker_line = start_token.line;
        let mut has_paragraph_content = false;
        let mut has_lazy_continuation = false;
        let mut in_fenced_code = false;
        let mut current_line_has_content = false;
        let mut last_was_list_marker = false;

        macro_rules! flush_current_line {
            () => {
                if !current_line_parts.is_empty() {
                    content_lines.push(current_line_parts.concat());
                    current_line_parts.clear();
                } else if !current_line_has_content {
                    // The line held only a `>` marker.
                    content_lines.push(String::new());
                }
                current_line_has_content = false;
                last_was_list_marker = false;
            };
        }

        while !self.at_end() {
            let token = self.cur().clone();

            if token.line != last_marker_line {
                if !current_line_has_content && current_line_parts.is_empty() {
                    content_lines.push(String::new());
                    has_paragraph_content = false;
                }
                flush_current_line!();

                match token.kind {
                    TokenType::ParagraphLine => {
                        // Lazy continuation: paragraph content only, and
                        // never inside a fence.
                        if !has_paragraph_content || in_fenced_code {
                            break;
                        }
                        has_lazy_continuation = true;
                        content_lines.push(token.value.trim_start().to_string());
                        current_line_has_content = true;
                        last_marker_line = token.line;
                        self.advance();
                        continue;
                    }
                    TokenType::IndentedCode => {
                        if !has_paragraph_content || in_fenced_code {
                            break;
                        }
                        has_lazy_continuation = true;
                        content_lines
                            .push(format!("    {}", token.value.trim_end_matches('\n')));
                        current_line_has_content = true;
                        last_marker_line = token.line;
                        self.advance();
                        continue;
                    }
                    TokenType::BlockQuoteMarker => {
                        last_marker_line = token.line;
                        current_line_has_content = false;
                        self.advance();
                        continue;
                    }
                    _ => break,
                }
            }

            match token.kind {
                TokenType::BlockQuoteMarker => {
                    // Nested marker: stays literal for the sub-parse.
                    current_line_parts.push("> ".to_string());
                    current_line_has_content = true;
                    last_marker_line = token.line;
                    self.advance();
                }
                TokenType::FencedCodeStart => {
                    let value = token.value.as_str();
                    let fence_part = match value.strip_prefix('I').and_then(|rest| {
                        rest.find(':').map(|colon| &rest[colon + 1..])
                    }) {
                        Some(part) => part,
                        None => value,
                    };
                    current_line_parts.push(fence_part.to_string());
                    in_fenced_code = true;
                    has_paragraph_content = false;
                    current_line_has_content = true;
                    last_marker_line = token.line;
                    self.advance();
                }
                TokenType::FencedCodeEnd => {
                    current_line_parts.push(token.value.trim_end_matches('\n').to_string());
                    in_fenced_code = false;
                    current_line_has_content = true;
                    last_marker_line = token.line;
                    self.advance();
                }
                TokenType::FencedCodeContent => {
                    current_line_parts.push(token.value.trim_end_matches('\n').to_string());
                    current_line_has_content = true;
                    last_marker_line = token.line;
                    self.advance();
                }
                TokenType::LinkReferenceDef => {
                    // Document-wide metadata, already collected in pass 1;
                    // it contributes no quoted content.
                    current_line_parts.clear();
                    has_paragraph_content = false;
                    current_line_has_content = false;
                    last_marker_line = token.end_line;
                    self.advance();
                }
                TokenType::AtxHeading
                | TokenType::ParagraphLine
                | TokenType::ThematicBreak
                | TokenType::ListItemMarker => {
                    let mut line_value = token.value.trim_end_matches('\n').to_string();
                    if token.kind == TokenType::ListItemMarker {
                        // Normalize indent so nested lists in quotes are
                        // not mistaken for indented code.
                        line_value = line_value.trim_start().to_string();
                        last_was_list_marker = true;
                    } else if token.kind == TokenType::ParagraphLine && last_was_list_marker {
                        line_value = line_value.trim_start().to_string();
                    }
                    current_line_parts.push(line_value);
                    current_line_has_content = true;

                    if token.kind == TokenType::ParagraphLine
                        || token.kind == TokenType::ListItemMarker
                    {
                        let content = token.value.trim_end_matches('\n');
                        let leading = content.len() - content.trim_start().len();
                        has_paragraph_content = leading < 4;
                    } else {
                        has_paragraph_content = false;
                    }

                    last_marker_line = token.line;
                    self.advance();
                }
                TokenType::BlankLine => {
                    flush_current_line!();
                    content_lines.push(String::new());
                    has_paragraph_content = false;
                    current_line_has_content = false;
                    last_marker_line = token.line;
                    self.advance();
                }
                _ => {
                    current_line_parts.push(token.value.trim_end_matches('\n').to_string());
                    has_paragraph_content = false;
                    current_line_has_content = true;
                    last_marker_line = token.line;
                    self.advance();
                }
            }
        }

        flush_current_line!();

        let mut content = content_lines.join("\n");
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }

        if !content.trim().is_empty() || content_lines.iter().any(String::is_empty) {
            // Setext underlines cannot span a container boundary, so they
            // are suppressed when lazy lines were absorbed.
            let children = self.parse_nested_content(&content, !has_lazy_continuation, true);
            return Block::BlockQuote(BlockQuote {
                location: start_token.location(),
                children,
            });
        }

        Block::BlockQuote(BlockQuote {
            location: start_token.location(),
            children: Vec::new(),
        })
    }

    /// Qualifies the fast paths: every line is exactly one `>` marker
    /// followed by one plain paragraph line, no lazy continuation, no
    /// 4+-space lines, no setext-underline lookalikes. Returns the token
    /// index just past the quote. With `allow_blank_lines`, interior `>`
    /// marker-only lines separate paragraphs (the token-reuse path).
    fn simple_quote_end(&self, allow_blank_lines: bool) -> Option<usize> {
        let tokens = &self.tokens;
        let mut i = self.pos;
        let mut saw_paragraph = false;
        let mut paragraph_count = 0usize;
        let mut last_line = 0usize;

        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenType::BlockQuoteMarker => {
                    if token.line == last_line {
                        // Nested quote.
                        return None;
                    }
                    last_line = token.line;
                    // Marker-only line (no same-line paragraph token).
                    let next = tokens.get(i + 1);
                    let content_on_line = next
                        .map(|t| t.kind == TokenType::ParagraphLine && t.line == token.line)
                        .unwrap_or(false);
                    if content_on_line {
                        let value = &next.expect("checked").value;
                        let stripped = value.trim_start();
                        let leading = value.len() - stripped.len();
                        if leading >= 4 || super::is_setext_underline(stripped) {
                            return None;
                        }
                        if !saw_paragraph {
                            paragraph_count = 1;
                        }
                        saw_paragraph = true;
                        i += 2;
                    } else if allow_blank_lines {
                        paragraph_count += 1;
                        i += 1;
                    } else {
                        return None;
                    }
                }
                TokenType::BlankLine | TokenType::Eof => {
                    break;
                }
                _ => return None,
            }
        }

        if saw_paragraph && (allow_blank_lines || paragraph_count <= 1) {
            Some(i)
        } else {
            None
        }
    }

    /// Builds the quote directly from paragraph-line tokens, skipping the
    /// sub-lex entirely.
    fn parse_simple_block_quote(&mut self, end: usize, multi_paragraph: bool) -> Block {
        let start_token = self.cur().clone();

        let mut paragraphs: Vec<Vec<String>> = vec![Vec::new()];
        let mut first_para_token: Vec<Option<Token>> = vec![None];

        while self.pos < end {
            let token = self.cur().clone();
            match token.kind {
                TokenType::BlockQuoteMarker => {
                    let content_on_line = self
                        .peek(1)
                        .map(|t| t.kind == TokenType::ParagraphLine && t.line == token.line)
                        .unwrap_or(false);
                    if !content_on_line && multi_paragraph {
                        // Marker-only line: paragraph separator.
                        if !paragraphs.last().expect("nonempty").is_empty() {
                            paragraphs.push(Vec::new());
                            first_para_token.push(None);
                        }
                    }
                    self.advance();
                }
                TokenType::ParagraphLine => {
                    let bucket = paragraphs.last_mut().expect("nonempty");
                    bucket.push(token.value.trim_start().to_string());
                    let slot = first_para_token.last_mut().expect("nonempty");
                    if slot.is_none() {
                        *slot = Some(token);
                    }
                    self.advance();
                }
                _ => break,
            }
        }

        let mut children = Vec::new();
        for (lines, first) in paragraphs.into_iter().zip(first_para_token) {
            if lines.is_empty() {
                continue;
            }
            let location = first
                .map(|t| t.location())
                .unwrap_or_else(|| start_token.location());
            let content = lines.join("\n");
            let inlines = self.parse_inline(&content, location);
            children.push(Block::Paragraph(Paragraph { location, children: inlines }));
        }

        Block::BlockQuote(BlockQuote {
            location: start_token.location(),
            children,
        })
    }
}
