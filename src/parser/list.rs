//! List and list-item parsing.
//!
//! Lists drive the container stack: the list frame claims the marker
//! column range, each item frame claims the content indent, and blank
//! lines route through a single decision function that looks at the next
//! non-blank token's kind and indent. Looseness is marked on frames and
//! propagates when frames pop.

use crate::lexer::{calc_indent, chars_for_indent};
use crate::nodes::{Block, Heading, HtmlBlock, IndentedCode, List, ListItem, Paragraph};
use crate::parser::containers::{ContainerFrame, ContainerKind, ContainerStack};
use crate::parser::Parser;
use crate::tokens::{Token, TokenType};

/// Metadata decoded from a `ListItemMarker` token value (indent-prefixed
/// marker text, e.g. `"  - "` or `"12. "`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkerInfo {
    pub indent: i32,
    pub ordered: bool,
    pub bullet_char: u8,
    pub ordered_marker_char: u8,
    pub marker_length: i32,
    pub start: usize,
}

pub(crate) fn extract_marker_info(value: &str) -> MarkerInfo {
    let (indent, _) = calc_indent(value);
    let marker = value.trim();

    if let Some(&first) = marker.as_bytes().first() {
        if first.is_ascii_digit() {
            let digits: String = marker.chars().take_while(char::is_ascii_digit).collect();
            let start = digits.parse().unwrap_or(1);
            let marker_char = marker.as_bytes().get(digits.len()).copied().unwrap_or(b'.');
            return MarkerInfo {
                indent,
                ordered: true,
                bullet_char: 0,
                ordered_marker_char: marker_char,
                marker_length: digits.len() as i32 + 1,
                start,
            };
        }
        return MarkerInfo {
            indent,
            ordered: false,
            bullet_char: first,
            ordered_marker_char: 0,
            marker_length: 1,
            start: 1,
        };
    }

    MarkerInfo {
        indent,
        ordered: false,
        bullet_char: b'-',
        ordered_marker_char: 0,
        marker_length: 1,
        start: 1,
    }
}

pub(crate) fn get_marker_indent(value: &str) -> i32 {
    calc_indent(value).0
}

/// Whether `text` begins with a list marker (`- x`, `-`, `3. x`, …).
pub(crate) fn is_list_marker(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b'-') | Some(b'*') | Some(b'+') => {
            bytes.len() == 1 || bytes[1] == b' ' || bytes[1] == b'\t'
        }
        Some(b) if b.is_ascii_digit() => {
            let mut pos = 0;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            pos <= 9
                && pos < bytes.len()
                && (bytes[pos] == b'.' || bytes[pos] == b')')
                && (pos + 1 == bytes.len() || bytes[pos + 1] == b' ' || bytes[pos + 1] == b'\t')
        }
        _ => false,
    }
}

fn is_same_list_type(value: &str, ordered: bool, bullet_char: u8, ordered_marker_char: u8) -> bool {
    let info = extract_marker_info(value);
    if info.ordered != ordered {
        return false;
    }
    if ordered {
        info.ordered_marker_char == ordered_marker_char
    } else {
        info.bullet_char == bullet_char
    }
}

/// Strips a leading task checkbox from the first content line, if any.
/// `[x]` and `[X]` both check.
fn extract_task_marker(line: &str) -> (Option<bool>, String) {
    let bytes = line.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'[' && bytes[2] == b']' {
        let state = match bytes[1] {
            b' ' => Some(false),
            b'x' | b'X' => Some(true),
            _ => None,
        };
        if let Some(checked) = state {
            let rest = line[3..].trim_start();
            if rest.len() < line.len() - 3 || rest.is_empty() || bytes.get(3) == Some(&b' ') {
                return (Some(checked), rest.to_string());
            }
        }
    }
    (None, line.to_string())
}

/// Decision after blank lines inside a list item, keyed on the next
/// non-blank token.
enum BlankLineAction {
    EndList,
    EndItem,
    ContinueList { is_loose: bool },
    ParseBlock,
    ParseContinuation,
}

fn handle_blank_line(next_token: Option<&Token>, containers: &ContainerStack) -> BlankLineAction {
    let token = match next_token {
        Some(t) if t.kind != TokenType::Eof => t,
        _ => return BlankLineAction::EndList,
    };

    let current = containers.current();
    let start_indent = current.start_indent;
    let check_indent = current.content_indent;

    match token.kind {
        TokenType::LinkReferenceDef => BlankLineAction::ContinueList { is_loose: true },

        TokenType::ListItemMarker => {
            let next_indent = get_marker_indent(&token.value);
            if next_indent < start_indent {
                BlankLineAction::EndList
            } else if next_indent < check_indent {
                BlankLineAction::EndItem
            } else {
                BlankLineAction::ContinueList { is_loose: true }
            }
        }

        TokenType::ParagraphLine => {
            if token.line_indent < check_indent {
                BlankLineAction::EndList
            } else {
                BlankLineAction::ParseContinuation
            }
        }

        TokenType::FencedCodeStart
        | TokenType::BlockQuoteMarker
        | TokenType::AtxHeading
        | TokenType::ThematicBreak => {
            let block_indent = token.line_indent.max(0);
            if block_indent < check_indent {
                BlankLineAction::EndList
            } else {
                BlankLineAction::ParseBlock
            }
        }

        TokenType::IndentedCode => {
            let original_indent = token.line_indent;
            let code_content = token.value.trim();

            if original_indent == start_indent && is_list_marker(code_content) {
                return BlankLineAction::EndItem;
            }

            if original_indent >= check_indent {
                if code_content.starts_with('>')
                    || code_content.starts_with("```")
                    || code_content.starts_with("~~~")
                    || is_list_marker(code_content)
                    || original_indent - check_indent >= 4
                {
                    BlankLineAction::ParseBlock
                } else {
                    BlankLineAction::ParseContinuation
                }
            } else {
                BlankLineAction::EndList
            }
        }

        _ => BlankLineAction::EndList,
    }
}

impl<'s, 'o> Parser<'s, 'o> {
    pub(crate) fn parse_list(&mut self, parent_indent: i32) -> Block {
        let start_token = self.cur().clone();
        debug_assert_eq!(start_token.kind, TokenType::ListItemMarker);

        if parent_indent == -1 && self.containers.depth() == 0 {
            if let Some(end) = self.simple_list_end() {
                return self.parse_simple_list(end);
            }
        }

        let marker_info = extract_marker_info(&start_token.value);
        let start_indent = marker_info.indent;
        let ordered = marker_info.ordered;
        let bullet_char = marker_info.bullet_char;
        let ordered_marker_char = marker_info.ordered_marker_char;
        let start = marker_info.start;
        let mut content_indent = start_indent + marker_info.marker_length + 1;

        let inside_block_quote = self.containers.inside_block_quote();

        let mut list_frame =
            ContainerFrame::new(ContainerKind::List, start_indent, content_indent);
        list_frame.marker_width = marker_info.marker_length;
        list_frame.max_sibling_indent = start_indent + 3;
        list_frame.ordered = ordered;
        list_frame.bullet_char = bullet_char;
        list_frame.start_number = start;
        self.containers.push(list_frame);

        let mut items: Vec<ListItem> = Vec::new();

        while !self.at_end() {
            let mut token = self.cur().clone();

            if token.kind == TokenType::BlankLine {
                // Blank lines between items make the list loose.
                self.containers.mark_loose();
                while !self.at_end() && self.cur().kind == TokenType::BlankLine {
                    self.advance();
                }
                if self.at_end() {
                    break;
                }
                token = self.cur().clone();
                if token.kind != TokenType::ListItemMarker {
                    break;
                }
            }

            if token.kind != TokenType::ListItemMarker {
                break;
            }

            let current_indent = get_marker_indent(&token.value);

            if current_indent < start_indent {
                break;
            }
            if current_indent >= content_indent {
                // Belongs to a nested list inside the previous item.
                break;
            }
            if !is_same_list_type(&token.value, ordered, bullet_char, ordered_marker_char) {
                break;
            }

            self.advance();

            let current_marker = token.value.trim_start().to_string();
            let current_marker_len = current_marker
                .split_whitespace()
                .next()
                .map(str::len)
                .unwrap_or(1) as i32;
            content_indent = current_indent + current_marker_len + 1;

            let item = self.parse_list_item(&token, start_indent, content_indent, ordered, bullet_char, ordered_marker_char, &current_marker);
            items.push(item);
        }

        let tight = !self.containers.current().is_loose;
        self.containers.pop();

        // Inside block quotes, reconstructed indentation can misclassify
        // item text as indented code; fold it back into paragraphs.
        let final_items = if !inside_block_quote {
            items
        } else {
            items
                .into_iter()
                .map(|item| {
                    let children = item
                        .children
                        .into_iter()
                        .map(|child| match child {
                            Block::IndentedCode(code)
                                if code.location.column as i32 <= content_indent =>
                            {
                                let text = code.code.trim_end_matches('\n').to_string();
                                let inlines = self.parse_inline(&text, code.location);
                                Block::Paragraph(Paragraph {
                                    location: code.location,
                                    children: inlines,
                                })
                            }
                            other => other,
                        })
                        .collect();
                    ListItem {
                        location: item.location,
                        children,
                        checked: item.checked,
                    }
                })
                .collect()
        };

        Block::List(List {
            location: start_token.location(),
            items: final_items,
            ordered,
            start,
            tight,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_list_item(
        &mut self,
        marker_token: &Token,
        start_indent: i32,
        content_indent: i32,
        ordered: bool,
        bullet_char: u8,
        ordered_marker_char: u8,
        marker_stripped: &str,
    ) -> ListItem {
        self.containers.push(ContainerFrame::new(
            ContainerKind::ListItem,
            start_indent,
            content_indent,
        ));

        let mut item_children: Vec<Block> = Vec::new();
        let mut content_lines: Vec<String> = Vec::new();
        let mut checked: Option<bool> = None;
        let mut actual_content_indent: Option<i32> = None;
        let mut saw_paragraph_content = false;

        macro_rules! flush_paragraph {
            () => {
                if !content_lines.is_empty() {
                    let content = content_lines.join("\n");
                    let inlines = self.parse_inline(&content, marker_token.location());
                    item_children.push(Block::Paragraph(Paragraph {
                        location: marker_token.location(),
                        children: inlines,
                    }));
                    content_lines.clear();
                }
            };
        }

        while !self.at_end() {
            let tok = self.cur().clone();

            match tok.kind {
                // Indented code at content indent inside a block quote is
                // paragraph continuation, not code.
                TokenType::IndentedCode if self.containers.inside_block_quote() => {
                    content_lines.push(tok.value.trim_start().to_string());
                    saw_paragraph_content = true;
                    self.advance();
                }

                TokenType::ThematicBreak => {
                    // A dash-only line after item text is a setext h2
                    // inside the item.
                    if saw_paragraph_content
                        && !content_lines.is_empty()
                        && tok.line_indent >= content_indent
                        && !tok.value.trim().is_empty()
                        && tok.value.trim().bytes().all(|b| b == b'-')
                    {
                        let heading_text = content_lines.join("\n").trim_end().to_string();
                        let children = self.parse_inline(&heading_text, marker_token.location());
                        item_children.push(Block::Heading(Heading {
                            location: marker_token.location(),
                            level: 2,
                            children,
                            setext: true,
                            explicit_id: None,
                        }));
                        content_lines.clear();
                        saw_paragraph_content = false;
                        self.advance();
                        continue;
                    }
                    // Immediately after the marker, the break belongs to
                    // the item; after content it terminates it.
                    if !saw_paragraph_content && content_lines.is_empty() {
                        if let Some(block) = self.parse_block() {
                            item_children.push(block);
                        }
                        continue;
                    }
                    break;
                }

                TokenType::FencedCodeStart
                    if !saw_paragraph_content && content_lines.is_empty() =>
                {
                    let block = self.parse_fenced_code(Some(content_indent));
                    item_children.push(block);
                }

                TokenType::ParagraphLine => {
                    let stripped_line = tok.value.trim_start().to_string();

                    // Single-line HTML tags become HTML blocks in items.
                    if stripped_line.starts_with('<') {
                        if let Some(tag) = bare_tag_name(&stripped_line) {
                            if crate::lexer::is_html_block_tag(&tag) {
                                let mut html = tok.value.clone();
                                if !html.ends_with('\n') {
                                    html.push('\n');
                                }
                                item_children.push(Block::HtmlBlock(HtmlBlock {
                                    location: tok.location(),
                                    html,
                                }));
                                saw_paragraph_content = false;
                                self.advance();
                                continue;
                            }
                        }
                    }

                    // More than 4 spaces between marker and first content
                    // makes the rest indented code within the item.
                    if actual_content_indent.is_none() && content_lines.is_empty() {
                        let spaces_after = self.spaces_after_marker(&tok, marker_stripped);
                        if spaces_after > 4 && !self.containers.inside_block_quote() {
                            let code = self.first_line_indented_code(&tok, marker_stripped);
                            item_children.push(Block::IndentedCode(IndentedCode {
                                location: tok.location(),
                                code,
                            }));
                            actual_content_indent = Some(content_indent);
                            self.containers.update_content_indent(content_indent);
                            self.advance();
                            continue;
                        }
                    }

                    let line = stripped_line;

                    // Whitespace-only remainder of the marker line.
                    if line.is_empty() && content_lines.is_empty() && !saw_paragraph_content {
                        self.advance();
                        continue;
                    }

                    // Continuation line that itself opens a nested block.
                    if content_lines.is_empty() && !saw_paragraph_content && !line.is_empty() {
                        let check_indent = actual_content_indent.unwrap_or(content_indent);
                        if (is_list_marker(&line) || line.starts_with('>'))
                            && tok.line_indent >= check_indent
                        {
                            let mini = format!("{}\n", line);
                            let blocks = self.parse_nested_content(&mini, true, false);
                            item_children.extend(blocks);
                            self.advance();
                            continue;
                        }
                    }

                    if actual_content_indent.is_none() {
                        let actual = self.calculate_actual_content_indent(&tok, marker_stripped);
                        actual_content_indent = Some(actual);
                        self.containers.update_content_indent(actual);
                    }

                    let mut line = line;
                    if content_lines.is_empty() && checked.is_none() && self.options.extension.tasklist
                    {
                        let (state, rest) = extract_task_marker(&line);
                        checked = state;
                        line = rest;
                    }

                    content_lines.push(line);
                    saw_paragraph_content = true;
                    self.advance();
                }

                TokenType::IndentedCode => {
                    let original_indent = tok.line_indent;
                    let stripped_content = tok.value.trim_start().to_string();
                    let check_indent = self.containers.current().content_indent;

                    if original_indent >= check_indent {
                        let trimmed = stripped_content.trim_end();
                        if is_list_marker(trimmed)
                            || trimmed.starts_with('>')
                            || trimmed.starts_with("```")
                            || trimmed.starts_with("~~~")
                        {
                            flush_paragraph!();
                            let blocks = self.parse_reindented_blocks(check_indent);
                            item_children.extend(blocks);
                            continue;
                        }

                        if original_indent == check_indent && !content_lines.is_empty() {
                            content_lines.push(tok.value.trim_end().to_string());
                            self.advance();
                            continue;
                        }

                        if original_indent - check_indent >= 4 {
                            flush_paragraph!();
                            let code = format!("{}\n", tok.value.trim());
                            item_children.push(Block::IndentedCode(IndentedCode {
                                location: tok.location(),
                                code,
                            }));
                            self.advance();
                            continue;
                        }

                        break;
                    }

                    // Between marker and content column: literal text.
                    let marker_indent = get_marker_indent(&marker_token.value);
                    if original_indent > marker_indent {
                        content_lines.push(tok.value.trim_end().to_string());
                        self.advance();
                        continue;
                    }

                    break;
                }

                TokenType::BlankLine => {
                    // A blank right after an empty marker ends the item.
                    if content_lines.is_empty() && item_children.is_empty() && !saw_paragraph_content
                    {
                        break;
                    }

                    self.advance();
                    while !self.at_end() && self.cur().kind == TokenType::BlankLine {
                        self.advance();
                    }
                    if self.at_end() {
                        break;
                    }

                    let action = {
                        let next = if self.at_end() { None } else { Some(self.cur()) };
                        handle_blank_line(next, &self.containers)
                    };

                    match action {
                        BlankLineAction::EndList => break,
                        BlankLineAction::EndItem => {
                            self.containers.mark_parent_list_loose();
                            break;
                        }
                        BlankLineAction::ContinueList { is_loose } => {
                            if is_loose {
                                self.containers.mark_loose();
                            }
                            // A reference definition does not interrupt the
                            // list; a nested marker is handled by the item
                            // loop's marker arm.
                            if self.cur().kind == TokenType::LinkReferenceDef {
                                self.advance();
                            }
                            continue;
                        }
                        BlankLineAction::ParseBlock => {
                            self.containers.mark_loose();
                            flush_paragraph!();

                            let next = self.cur().clone();
                            if next.kind == TokenType::IndentedCode {
                                let check_indent = actual_content_indent.unwrap_or(content_indent);
                                let stripped = next.value.trim().to_string();
                                let indent_beyond = next.line_indent - check_indent;

                                if is_list_marker(&stripped)
                                    || stripped.starts_with('>')
                                    || stripped.starts_with("```")
                                    || stripped.starts_with("~~~")
                                {
                                    let blocks = self.parse_reindented_blocks(check_indent);
                                    item_children.extend(blocks);
                                    continue;
                                }
                                if indent_beyond >= 4 {
                                    let block = self.parse_indented_code_in_item(check_indent);
                                    item_children.push(block);
                                    continue;
                                }
                            }

                            if let Some(block) = self.parse_block() {
                                item_children.push(block);
                            }
                            continue;
                        }
                        BlankLineAction::ParseContinuation => {
                            self.containers.mark_loose();
                            flush_paragraph!();

                            let next = self.cur().clone();
                            if next.kind == TokenType::IndentedCode {
                                let check_indent = actual_content_indent.unwrap_or(content_indent);
                                let indent_beyond = next.line_indent - check_indent;
                                if next.line_indent >= check_indent && indent_beyond < 4 {
                                    content_lines.push(next.value.trim().to_string());
                                    self.advance();
                                    continue;
                                }
                            } else if next.kind == TokenType::ParagraphLine {
                                content_lines.push(next.value.trim_start().to_string());
                                self.advance();
                                continue;
                            }
                            continue;
                        }
                    }
                }

                TokenType::ListItemMarker => {
                    let nested_indent = get_marker_indent(&tok.value);
                    let check_content_indent = actual_content_indent.unwrap_or(content_indent);

                    if nested_indent == start_indent
                        && !is_same_list_type(&tok.value, ordered, bullet_char, ordered_marker_char)
                    {
                        break;
                    }

                    if nested_indent >= check_content_indent {
                        flush_paragraph!();

                        let nested = self.parse_list(start_indent);
                        item_children.push(nested);

                        if !self.at_end() {
                            let next_tok = self.cur().clone();
                            // Blank line before the token that ended the
                            // nested list makes this list loose.
                            if next_tok.start_offset > 0 && self.blank_line_before(next_tok.start_offset) {
                                self.containers.mark_loose();
                            }

                            if next_tok.kind == TokenType::ParagraphLine {
                                let next_indent = next_tok.line_indent;
                                if next_indent >= start_indent && next_indent <= content_indent {
                                    self.containers.mark_loose();
                                    content_lines.push(next_tok.value.trim_start().to_string());
                                    self.advance();
                                    continue;
                                }
                            }
                        }
                    } else if nested_indent >= 4 && nested_indent < check_content_indent {
                        // Marker at 4+ columns that is not nested: literal.
                        let mut marker_content = tok.value.trim_start().to_string();
                        self.advance();
                        if !self.at_end() && self.cur().kind == TokenType::ParagraphLine {
                            marker_content.push(' ');
                            marker_content.push_str(self.cur().value.trim_start());
                            self.advance();
                        }
                        content_lines.push(marker_content);
                    } else {
                        // Sibling item.
                        break;
                    }
                }

                TokenType::BlockQuoteMarker
                | TokenType::FencedCodeStart
                | TokenType::AtxHeading => {
                    let block_indent = tok.line_indent;
                    let check_content_indent = actual_content_indent.unwrap_or(content_indent);
                    if block_indent >= check_content_indent {
                        flush_paragraph!();
                        if let Some(block) = self.parse_block() {
                            item_children.push(block);
                        }
                        continue;
                    }
                    break;
                }

                _ => break,
            }
        }

        flush_paragraph!();

        self.containers.pop();

        ListItem {
            location: marker_token.location(),
            children: item_children,
            checked,
        }
    }

    /// Effective space count between the marker and the first content
    /// character on the marker's line, with tabs expanded.
    fn spaces_after_marker(&self, tok: &Token, marker_stripped: &str) -> i32 {
        let line = self.line_containing(tok.start_offset);
        let marker_char = marker_stripped.trim_end();
        let marker_pos = match line.find(marker_char) {
            Some(p) => p,
            None => return 0,
        };

        let after_marker = &line[marker_pos + marker_char.len()..];
        let mut spaces = 0i32;
        let mut col = (marker_pos + marker_char.len()) as i32;
        for b in after_marker.bytes() {
            match b {
                b' ' => {
                    spaces += 1;
                    col += 1;
                }
                b'\t' => {
                    let width = 4 - (col % 4);
                    spaces += width;
                    col += width;
                }
                _ => break,
            }
        }
        spaces
    }

    /// Extracts the first content line as indented code, stripping the
    /// marker plus five columns (one separator + four of code indent).
    fn first_line_indented_code(&self, tok: &Token, marker_stripped: &str) -> String {
        let line = self.line_containing(tok.start_offset);
        let marker_char = marker_stripped.trim_end();
        let marker_pos = line.find(marker_char).unwrap_or(0);
        let after_marker = &line[marker_pos + marker_char.len()..];

        let skip = chars_for_indent(after_marker, 5);
        format!("{}\n", after_marker[skip..].trim_end())
    }

    fn line_containing(&self, offset: usize) -> &str {
        let start = self.source[..offset.min(self.source.len())]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let end = self.source[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.source.len());
        &self.source[start..end]
    }

    /// The column where item content actually starts: marker end plus the
    /// separator spaces (capped: more than 4 collapses to 1).
    fn calculate_actual_content_indent(&self, tok: &Token, marker_stripped: &str) -> i32 {
        let line = self.line_containing(tok.start_offset);

        let marker_part = marker_stripped
            .split_whitespace()
            .next()
            .unwrap_or(marker_stripped);
        let marker_pos = match line.find(marker_part) {
            Some(p) => p,
            None => return get_marker_indent(&tok.value) + marker_part.len() as i32 + 1,
        };

        let marker_start_indent = get_marker_indent(&line[..marker_pos]);
        let marker_end_col = marker_start_indent + marker_part.len() as i32;

        let rest = &line[marker_pos + marker_part.len()..];
        if rest.trim().is_empty() {
            return marker_end_col + 1;
        }

        let spaces_after = (rest.len() - rest.trim_start_matches(' ').len()) as i32;
        if spaces_after > 4 {
            marker_end_col + 1
        } else {
            marker_end_col + spaces_after
        }
    }

    /// Whether a blank line immediately precedes the line at `offset`.
    fn blank_line_before(&self, offset: usize) -> bool {
        let line_start = self.source[..offset.min(self.source.len())]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        line_start >= 2 && self.source.as_bytes()[line_start - 1] == b'\n'
            && self.source.as_bytes()[line_start - 2] == b'\n'
    }

    /// Re-parses a run of `IndentedCode` tokens as blocks positioned
    /// relative to the item's content column. This is how nested lists,
    /// quotes, and fences that the lexer flagged as indented code (4+
    /// spaces in list context) come back as real blocks.
    fn parse_reindented_blocks(&mut self, check_indent: i32) -> Vec<Block> {
        let mut mini = String::new();

        while !self.at_end() {
            match self.cur().kind {
                TokenType::IndentedCode => {
                    let tok = self.cur().clone();
                    let rel = (tok.line_indent - check_indent).max(0) as usize;
                    for _ in 0..rel {
                        mini.push(' ');
                    }
                    mini.push_str(tok.value.trim_start().trim_end_matches('\n'));
                    mini.push('\n');
                    self.advance();
                }
                TokenType::BlankLine => {
                    // Include interior blanks only when more indented
                    // content follows.
                    let mut ahead = 1;
                    while self.peek(ahead).map(|t| t.kind) == Some(TokenType::BlankLine) {
                        ahead += 1;
                    }
                    if self.peek(ahead).map(|t| t.kind) == Some(TokenType::IndentedCode) {
                        for _ in 0..ahead {
                            mini.push('\n');
                            self.advance();
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }

        self.parse_nested_content(&mini, true, false)
    }

    /// Indented code 4+ columns beyond the item's content indent.
    fn parse_indented_code_in_item(&mut self, check_indent: i32) -> Block {
        let start_token = self.cur().clone();
        let mut parts: Vec<String> = Vec::new();

        while !self.at_end() {
            match self.cur().kind {
                TokenType::IndentedCode if self.cur().line_indent - check_indent >= 4 => {
                    let tok = self.cur().clone();
                    let extra = (tok.line_indent - check_indent - 4).max(0) as usize;
                    let mut line = " ".repeat(extra);
                    line.push_str(tok.value.trim_start().trim_end_matches('\n'));
                    line.push('\n');
                    parts.push(line);
                    self.advance();
                }
                TokenType::BlankLine => {
                    let next_is_code = self
                        .peek(1)
                        .map(|t| {
                            t.kind == TokenType::IndentedCode && t.line_indent - check_indent >= 4
                        })
                        .unwrap_or(false);
                    if next_is_code {
                        parts.push("\n".to_string());
                        self.advance();
                    } else {
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

    // =====================================================================
    // Simple-list fast path
    // =====================================================================

    /// Qualifies the fast path: a flat, tight list at indent 0 whose
    /// tokens are only same-type markers and plain paragraph lines, ending
    /// at a blank line or end of input. Returns the end token index.
    fn simple_list_end(&self) -> Option<usize> {
        let tokens = &self.tokens;
        let first = tokens.get(self.pos)?;
        if get_marker_indent(&first.value) != 0 {
            return None;
        }
        let info = extract_marker_info(&first.value);

        let mut i = self.pos;
        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenType::ListItemMarker => {
                    if get_marker_indent(&token.value) != 0 {
                        return None;
                    }
                    if !is_same_list_type(
                        &token.value,
                        info.ordered,
                        info.bullet_char,
                        info.ordered_marker_char,
                    ) {
                        return None;
                    }
                    i += 1;
                }
                TokenType::ParagraphLine => {
                    let stripped = token.value.trim_start();
                    if token.line_indent >= 4 || super::is_setext_underline(stripped) {
                        return None;
                    }
                    i += 1;
                }
                TokenType::Eof => return Some(i),
                TokenType::BlankLine => return None,
                _ => return None,
            }
        }
        Some(i)
    }

    /// Builds the list straight from marker/paragraph tokens.
    fn parse_simple_list(&mut self, end: usize) -> Block {
        let start_token = self.cur().clone();
        let info = extract_marker_info(&start_token.value);

        let mut items: Vec<ListItem> = Vec::new();
        let mut current_marker: Option<Token> = None;
        let mut current_content: Vec<String> = Vec::new();

        macro_rules! flush_item {
            () => {
                if let Some(marker) = current_marker.take() {
                    let mut checked = None;
                    let children = if current_content.is_empty() {
                        Vec::new()
                    } else {
                        let mut line = current_content.join("\n");
                        if self.options.extension.tasklist {
                            let (state, rest) = extract_task_marker(&line);
                            checked = state;
                            line = rest;
                        }
                        let inlines = self.parse_inline(&line, marker.location());
                        current_content.clear();
                        vec![Block::Paragraph(Paragraph {
                            location: marker.location(),
                            children: inlines,
                        })]
                    };
                    items.push(ListItem {
                        location: marker.location(),
                        children,
                        checked,
                    });
                }
            };
        }

        while self.pos < end {
            let token = self.cur().clone();
            match token.kind {
                TokenType::ListItemMarker => {
                    flush_item!();
                    current_marker = Some(token);
                    self.advance();
                }
                TokenType::ParagraphLine => {
                    current_content.push(token.value.trim_start().to_string());
                    self.advance();
                }
                _ => break,
            }
        }
        flush_item!();

        Block::List(List {
            location: start_token.location(),
            items,
            ordered: info.ordered,
            start: info.start,
            tight: true,
        })
    }
}

/// Extracts a bare tag name from a line beginning with `<`.
fn bare_tag_name(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    let mut idx = 1;
    if bytes.get(idx) == Some(&b'/') {
        idx += 1;
    }
    let start = idx;
    while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'-') {
        idx += 1;
    }
    if idx > start {
        Some(line[start..idx].to_lowercase())
    } else {
        None
    }
}
