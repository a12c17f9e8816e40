//! State-machine lexer with O(n) guaranteed performance.
//!
//! The lexer scans whole lines: find the window, classify its contents
//! without moving, then commit past it. Position only ever advances, so
//! forward progress is structural, and there is no regex anywhere in the
//! hot path.
//!
//! A small mode machine selects the scanner for each line: block mode by
//! default, with dedicated modes while inside a fenced code block, a
//! `:::` directive, an HTML block, or a `$$` math block.

mod directive;
mod html;
mod link_ref;

use smallvec::SmallVec;

use crate::character_set::character_set;
use crate::parser::options::Options;
use crate::strings;
use crate::tokens::{Token, TokenType};

const FENCE_CHARS: [bool; 256] = character_set!(b"`~");
const THEMATIC_BREAK_CHARS: [bool; 256] = character_set!(b"-_*");
const UNORDERED_LIST_MARKERS: [bool; 256] = character_set!(b"-*+");

/// Effective indent (spaces count 1, tabs advance to the next multiple of
/// 4) plus the byte index of the first non-whitespace character.
pub(crate) fn calc_indent(line: &str) -> (i32, usize) {
    let mut indent = 0i32;
    let mut pos = 0;
    for b in line.bytes() {
        match b {
            b' ' => indent += 1,
            b'\t' => indent += 4 - (indent % 4),
            _ => break,
        }
        pos += 1;
    }
    (indent, pos)
}

/// Bytes to skip so that `target_indent` columns are consumed.
pub(crate) fn chars_for_indent(line: &str, target_indent: i32) -> usize {
    let mut col = 0i32;
    let mut pos = 0;
    for b in line.bytes() {
        if col >= target_indent {
            break;
        }
        match b {
            b' ' => col += 1,
            b'\t' => col += 4 - (col % 4),
            _ => break,
        }
        pos += 1;
    }
    pos
}

pub(crate) use html::is_html_block_tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Block,
    FencedCode,
    Directive,
    HtmlBlock,
    MathBlock,
}

/// Single-use lexer over one source buffer.
pub struct Lexer<'s, 'o> {
    source: &'s str,
    options: &'o Options,
    pos: usize,
    line: usize,
    col: usize,
    mode: Mode,

    // Fenced code state
    fence_char: u8,
    fence_count: usize,
    fence_indent: i32,

    // HTML block state
    pub(crate) html_block_type: u8,
    pub(crate) html_block_content: String,
    pub(crate) html_block_start: usize,
    pub(crate) html_block_indent: i32,
    pub(crate) previous_line_blank: bool,

    // Directive state: (colon count, name) per open frame
    pub(crate) directive_stack: SmallVec<[(usize, String); 4]>,

    consumed_newline: bool,
    saved_line: usize,
    saved_col: usize,

    out: Vec<Token>,
}

impl<'s, 'o> Lexer<'s, 'o> {
    pub fn new(source: &'s str, options: &'o Options) -> Self {
        Lexer {
            source,
            options,
            pos: 0,
            line: 1,
            col: 1,
            mode: Mode::Block,
            fence_char: 0,
            fence_count: 0,
            fence_indent: 0,
            html_block_type: 0,
            html_block_content: String::new(),
            html_block_start: 0,
            html_block_indent: 0,
            previous_line_blank: true,
            directive_stack: SmallVec::new(),
            consumed_newline: false,
            saved_line: 1,
            saved_col: 1,
            out: Vec::new(),
        }
    }

    /// Tokenizes the whole source. The returned stream always ends with a
    /// single `Eof` token, and every input byte is represented by some
    /// token: unterminated fences, HTML blocks, and directives flush their
    /// accumulated content at end of input.
    pub fn tokenize(mut self) -> Vec<Token> {
        while self.pos < self.source.len() {
            match self.mode {
                Mode::Block => self.scan_block(),
                Mode::FencedCode => self.scan_fence_content(),
                Mode::Directive => self.scan_directive_content(),
                Mode::HtmlBlock => self.scan_html_block_content(),
                Mode::MathBlock => self.scan_math_content(),
            }
        }

        if self.mode == Mode::HtmlBlock && !self.html_block_content.is_empty() {
            self.emit_html_block();
        }

        let eof = Token {
            kind: TokenType::Eof,
            value: String::new(),
            line: self.line,
            column: self.col,
            start_offset: self.pos,
            end_offset: self.pos,
            line_indent: 0,
            end_line: self.line,
            end_column: self.col,
        };
        self.out.push(eof);
        self.out
    }

    // =====================================================================
    // Window navigation
    // =====================================================================

    pub(crate) fn find_line_end(&self) -> usize {
        match self.source[self.pos..].find('\n') {
            Some(idx) => self.pos + idx,
            None => self.source.len(),
        }
    }

    pub(crate) fn find_line_end_from(&self, from: usize) -> usize {
        match self.source[from..].find('\n') {
            Some(idx) => from + idx,
            None => self.source.len(),
        }
    }

    /// Commits the position to `line_end`, consuming the newline if there
    /// is one. Multi-line commits (link reference definitions) update the
    /// line counter for every newline crossed.
    pub(crate) fn commit_to(&mut self, line_end: usize) {
        if line_end != self.pos {
            let segment = &self.source[self.pos..line_end];
            let newline_count = segment.matches('\n').count();
            if newline_count > 0 {
                let last_nl = segment.rfind('\n').unwrap_or(0);
                self.line += newline_count;
                self.col = segment.len() - last_nl;
            } else {
                self.col += segment.chars().count();
            }
            self.pos = line_end;
        }

        self.consumed_newline = false;
        if self.pos < self.source.len() && self.source.as_bytes()[self.pos] == b'\n' {
            self.pos += 1;
            self.line += 1;
            self.col = 1;
            self.consumed_newline = true;
        }
    }

    pub(crate) fn save_location(&mut self) {
        self.saved_line = self.line;
        self.saved_col = self.col;
    }

    pub(crate) fn make_token(
        &self,
        kind: TokenType,
        value: String,
        start_pos: usize,
        start_col: Option<usize>,
        end_pos: Option<usize>,
        line_indent: i32,
    ) -> Token {
        Token {
            kind,
            value,
            line: self.saved_line,
            column: start_col.unwrap_or(self.saved_col),
            start_offset: start_pos,
            end_offset: end_pos.unwrap_or(self.pos),
            line_indent,
            end_line: self.line,
            end_column: self.col,
        }
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.out.push(token);
    }

    // =====================================================================
    // Block mode
    // =====================================================================

    fn scan_block(&mut self) {
        self.save_location();
        let source = self.source;
        let line_start = self.pos;
        let line_end = self.find_line_end();
        let line = &source[line_start..line_end];

        let (indent, content_start) = calc_indent(line);
        let raw_content = &line[content_start..];

        let transformed;
        let content: &str = match &self.options.parse.text_transformer {
            Some(t) => {
                transformed = t(raw_content);
                &transformed
            }
            None => raw_content,
        };

        self.commit_to(line_end);

        if content.is_empty() || strings::is_blank(content) {
            self.previous_line_blank = true;
            let token = self.make_token(TokenType::BlankLine, String::new(), line_start, None, None, 0);
            self.push(token);
            return;
        }

        if indent >= 4 {
            let skip = chars_for_indent(line, 4);
            let mut code = line[skip..].to_string();
            if self.consumed_newline {
                code.push('\n');
            }
            self.previous_line_blank = false;
            let token = self.make_token(TokenType::IndentedCode, code, line_start, None, None, indent);
            self.push(token);
            return;
        }

        let first = content.as_bytes()[0];

        if FENCE_CHARS[first as usize] {
            if let Some(token) = self.try_classify_fence_start(content, line_start, indent, true) {
                self.previous_line_blank = false;
                self.push(token);
                return;
            }
        }

        if first == b'<' && self.try_classify_html_block_start(content, line_start, line, indent) {
            self.previous_line_blank = false;
            return;
        }

        if first == b'#' {
            if let Some(token) = self.try_classify_atx_heading(content, line_start, indent) {
                self.previous_line_blank = false;
                self.push(token);
                return;
            }
        }

        if first == b'>' {
            self.classify_block_quote(content, line_start, indent);
            return;
        }

        if THEMATIC_BREAK_CHARS[first as usize] {
            if let Some(token) = self.try_classify_thematic_break(content, line_start, indent) {
                self.push(token);
                return;
            }
        }

        if self.try_classify_list_marker(content, line_start, indent) {
            self.previous_line_blank = false;
            return;
        }

        if self.options.extension.math && content.starts_with("$$") && self.classify_math_block_start(content, line_start, indent) {
            self.previous_line_blank = false;
            return;
        }

        if content.starts_with("[^") {
            if let Some(token) = self.try_classify_footnote_def(content, line_start, indent) {
                self.previous_line_blank = false;
                self.push(token);
                return;
            }
        }

        if first == b'[' && !content.starts_with("[^") {
            if let Some(token) = self.try_classify_link_reference_def(line_start, indent) {
                self.previous_line_blank = false;
                self.push(token);
                return;
            }
        }

        if content.starts_with(":::") && self.try_classify_directive_start(content, line_start, indent) {
            self.previous_line_blank = false;
            return;
        }

        let mut indented_content = String::with_capacity(indent as usize + content.len());
        for _ in 0..indent {
            indented_content.push(' ');
        }
        indented_content.push_str(content.trim_end_matches('\n'));
        self.previous_line_blank = false;
        let token = self.make_token(
            TokenType::ParagraphLine,
            indented_content,
            line_start,
            None,
            None,
            indent,
        );
        self.push(token);
    }

    // =====================================================================
    // Classifiers: heading, fence, thematic break, footnote
    // =====================================================================

    pub(crate) fn try_classify_atx_heading(
        &mut self,
        content: &str,
        line_start: usize,
        indent: i32,
    ) -> Option<Token> {
        let bytes = content.as_bytes();
        let mut level = 0;
        while level < bytes.len() && bytes[level] == b'#' {
            level += 1;
        }
        if level == 0 || level > 6 {
            return None;
        }
        if level < bytes.len() && bytes[level] != b' ' && bytes[level] != b'\t' && bytes[level] != b'\n' {
            return None;
        }

        let value = Self::strip_atx_closing(content.trim_end_matches('\n'), level).to_string();
        Some(self.make_token(
            TokenType::AtxHeading,
            value,
            line_start,
            Some(indent as usize + 1),
            None,
            indent,
        ))
    }

    /// Removes an optional closing sequence of `#`s (preceded by a space or
    /// tab) along with surrounding trailing whitespace.
    fn strip_atx_closing(text: &str, level: usize) -> &str {
        let trimmed = text.trim_end_matches(|c| c == ' ' || c == '\t');
        let bytes = trimmed.as_bytes();
        let mut i = bytes.len();
        while i > 0 && bytes[i - 1] == b'#' {
            i -= 1;
        }
        if i == bytes.len() || i < level {
            return trimmed;
        }
        if bytes[i - 1] == b' ' || bytes[i - 1] == b'\t' {
            trimmed[..i].trim_end_matches(|c| c == ' ' || c == '\t')
        } else {
            trimmed
        }
    }

    pub(crate) fn try_classify_fence_start(
        &mut self,
        content: &str,
        line_start: usize,
        indent: i32,
        change_mode: bool,
    ) -> Option<Token> {
        let bytes = content.as_bytes();
        let ch = bytes[0];
        let mut count = 0;
        while count < bytes.len() && bytes[count] == ch {
            count += 1;
        }
        if count < 3 {
            return None;
        }

        let info = content[count..].trim_end_matches('\n').trim();
        if ch == b'`' && info.contains('`') {
            return None;
        }

        if change_mode {
            self.mode = Mode::FencedCode;
            self.fence_char = ch;
            self.fence_count = count;
            self.fence_indent = indent;
        }

        let value = format!("I{}:{}{}", indent, &content[..count], info);
        Some(self.make_token(
            TokenType::FencedCodeStart,
            value,
            line_start,
            Some(indent as usize + 1),
            None,
            indent,
        ))
    }

    pub(crate) fn try_classify_thematic_break(
        &mut self,
        content: &str,
        line_start: usize,
        indent: i32,
    ) -> Option<Token> {
        let trimmed = content.trim_end_matches('\n');
        let ch = trimmed.as_bytes()[0];
        let mut count = 0;
        for b in trimmed.bytes() {
            if b == ch {
                count += 1;
            } else if b != b' ' && b != b'\t' {
                return None;
            }
        }
        if count < 3 {
            return None;
        }
        Some(self.make_token(
            TokenType::ThematicBreak,
            trimmed.to_string(),
            line_start,
            Some(indent as usize + 1),
            None,
            indent,
        ))
    }

    pub(crate) fn try_classify_footnote_def(
        &mut self,
        content: &str,
        line_start: usize,
        indent: i32,
    ) -> Option<Token> {
        if !content.starts_with("[^") {
            return None;
        }
        let close = content.find(']')?;
        let identifier = &content[2..close];
        if identifier.is_empty()
            || !identifier.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        if content.as_bytes().get(close + 1) != Some(&b':') {
            return None;
        }
        let rest = content[close + 2..].trim_end_matches('\n');
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        let value = format!("{}|{}", identifier, rest);
        Some(self.make_token(
            TokenType::FootnoteDef,
            value,
            line_start,
            Some(indent as usize + 1),
            None,
            indent,
        ))
    }

    // =====================================================================
    // Block quote classifier
    // =====================================================================

    /// Emits the `>` marker and re-classifies the remainder of the line at
    /// the shifted column: a quote can carry a heading, list, fence,
    /// nested quote, or link reference definition on the same line.
    pub(crate) fn classify_block_quote(&mut self, content: &str, line_start: usize, indent: i32) {
        let marker_offset = line_start + indent as usize;

        let token = self.make_token(
            TokenType::BlockQuoteMarker,
            ">".to_string(),
            marker_offset,
            Some(indent as usize + 1),
            Some(marker_offset + 1),
            indent,
        );
        self.push(token);

        if content.len() <= 1 {
            return;
        }

        let expanded = strings::expand_tabs(&content[1..], indent as usize + 2);
        let expanded_rest: &str = &expanded;

        let (remaining, sub_indent) = if let Some(stripped) = expanded_rest.strip_prefix(' ') {
            (stripped, indent + 2)
        } else {
            (expanded_rest, indent + 1)
        };

        if remaining.is_empty() {
            return;
        }
        let stripped = remaining.trim_start_matches(|c| c == ' ' || c == '\t');
        if stripped.is_empty() {
            return;
        }

        let leading = (remaining.len() - stripped.len()) as i32;
        let content_col = sub_indent + leading;
        let stripped = stripped.to_string();
        let remaining = remaining.to_string();

        if stripped.starts_with('#') {
            if let Some(token) = self.try_classify_atx_heading(&stripped, line_start, content_col) {
                self.push(token);
                return;
            }
        }

        if stripped.starts_with('[') && !stripped.starts_with("[^") {
            if let Some(token) = self.try_classify_link_reference_def(line_start, content_col) {
                self.push(token);
                return;
            }
        }

        if stripped.starts_with('>') {
            self.classify_block_quote(&stripped, line_start, content_col);
            return;
        }

        let first = stripped.as_bytes()[0];

        if THEMATIC_BREAK_CHARS[first as usize] {
            if let Some(token) = self.try_classify_thematic_break(&stripped, line_start, content_col) {
                self.push(token);
                return;
            }
        }

        if FENCE_CHARS[first as usize] {
            // Mode stays put: the blockquote parser re-parses fence content.
            if let Some(token) = self.try_classify_fence_start(&stripped, line_start, content_col, false)
            {
                self.push(token);
                return;
            }
        }

        if self.try_classify_list_marker(&stripped, line_start, content_col) {
            return;
        }

        let content_offset = line_start + sub_indent as usize;
        let token = self.make_token(
            TokenType::ParagraphLine,
            remaining,
            content_offset,
            Some(sub_indent as usize + 1),
            None,
            leading,
        );
        self.push(token);
    }

    // =====================================================================
    // List marker classifier
    // =====================================================================

    /// Classifies `-`/`*`/`+` and `1.`/`1)` markers, emitting the marker
    /// token and re-classifying whatever follows it on the same line.
    /// Returns false when `content` does not start with a list marker.
    pub(crate) fn try_classify_list_marker(
        &mut self,
        content: &str,
        line_start: usize,
        indent: i32,
    ) -> bool {
        if content.is_empty() {
            return false;
        }
        let bytes = content.as_bytes();

        if UNORDERED_LIST_MARKERS[bytes[0] as usize] {
            if content.len() == 1 || bytes[1] == b'\n' {
                self.emit_list_marker_and_content(&content[..1], "", line_start, indent);
                return true;
            }
            if bytes[1] == b' ' {
                let marker = &content[..2];
                let rest = &content[2..];
                self.emit_list_marker_and_content(marker, rest, line_start, indent);
                return true;
            }
            if bytes[1] == b'\t' {
                let col = indent + 2;
                let expansion = 4 - ((col - 1) % 4);
                let mut rest = " ".repeat(expansion as usize - 1);
                rest.push_str(&content[2..]);
                let marker = &content[..2];
                self.emit_list_marker_and_content(marker, &rest, line_start, indent);
                return true;
            }
            return false;
        }

        if bytes[0].is_ascii_digit() {
            let mut pos = 0;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos > 9 {
                return false;
            }
            if pos < bytes.len() && (bytes[pos] == b'.' || bytes[pos] == b')') {
                let marker_end = pos + 1;
                if marker_end == bytes.len() || bytes[marker_end] == b'\n' {
                    let marker = content[..marker_end].to_string();
                    self.emit_list_marker_and_content(&marker, "", line_start, indent);
                    return true;
                }
                if bytes[marker_end] == b' ' {
                    let marker = content[..marker_end + 1].to_string();
                    let rest = content[marker_end + 1..].to_string();
                    self.emit_list_marker_and_content(&marker, &rest, line_start, indent);
                    return true;
                }
                if bytes[marker_end] == b'\t' {
                    let col = indent + marker_end as i32 + 1;
                    let expansion = 4 - ((col - 1) % 4);
                    let mut rest = " ".repeat(expansion as usize - 1);
                    rest.push_str(&content[marker_end + 1..]);
                    let marker = content[..marker_end + 1].to_string();
                    self.emit_list_marker_and_content(&marker, &rest, line_start, indent);
                    return true;
                }
            }
        }

        false
    }

    fn emit_list_marker_and_content(
        &mut self,
        marker: &str,
        remaining: &str,
        line_start: usize,
        indent: i32,
    ) {
        let marker_offset = line_start + indent as usize;

        let mut indented_marker = " ".repeat(indent as usize);
        indented_marker.push_str(marker);
        let token = self.make_token(
            TokenType::ListItemMarker,
            indented_marker,
            marker_offset,
            Some(indent as usize + 1),
            Some(marker_offset + marker.len()),
            indent,
        );
        self.push(token);

        let remaining = remaining.trim_end_matches('\n');
        if remaining.is_empty() {
            return;
        }
        let stripped = remaining.trim_start_matches(|c| c == ' ' || c == '\t');
        if stripped.is_empty() {
            return;
        }

        let leading = (remaining.len() - stripped.len()) as i32;
        let content_col = indent + marker.len() as i32 + leading;
        let stripped = stripped.to_string();

        if stripped.starts_with('#') {
            if let Some(token) = self.try_classify_atx_heading(&stripped, line_start, content_col) {
                self.push(token);
                return;
            }
        }

        if stripped.starts_with('>') {
            self.classify_block_quote(&stripped, line_start, content_col);
            return;
        }

        let first = stripped.as_bytes()[0];

        if THEMATIC_BREAK_CHARS[first as usize] {
            if let Some(token) = self.try_classify_thematic_break(&stripped, line_start, content_col) {
                self.push(token);
                return;
            }
        }

        if FENCE_CHARS[first as usize] {
            if let Some(token) = self.try_classify_fence_start(&stripped, line_start, content_col, true)
            {
                self.push(token);
                return;
            }
        }

        if self.try_classify_list_marker(&stripped, line_start, content_col) {
            return;
        }

        let mut indented_content = " ".repeat(indent as usize);
        indented_content.push_str(remaining);
        let (actual_indent, _) = calc_indent(&indented_content);

        let content_offset = line_start + indent as usize + marker.len();
        let token = self.make_token(
            TokenType::ParagraphLine,
            indented_content,
            content_offset,
            Some(indent as usize + marker.len() + 1),
            None,
            actual_indent,
        );
        self.push(token);
    }

    // =====================================================================
    // Fenced code mode
    // =====================================================================

    fn scan_fence_content(&mut self) {
        self.save_location();
        let source = self.source;
        let line_start = self.pos;
        let line_end = self.find_line_end();
        let line = &source[line_start..line_end];

        let (indent, content_start) = calc_indent(line);
        let stripped = &line[content_start..];

        self.commit_to(line_end);

        // Closing fence: same char, at least the opener's count, nothing
        // but whitespace after, and at most 3 columns of indent.
        if indent <= 3 && !stripped.is_empty() && stripped.as_bytes()[0] == self.fence_char {
            let bytes = stripped.as_bytes();
            let mut count = 0;
            while count < bytes.len() && bytes[count] == self.fence_char {
                count += 1;
            }
            if count >= self.fence_count && strings::is_blank(&stripped[count..]) {
                // A fence opened inside a directive body returns there.
                self.mode = if self.directive_stack.is_empty() {
                    Mode::Block
                } else {
                    Mode::Directive
                };
                let token = self.make_token(
                    TokenType::FencedCodeEnd,
                    stripped[..count].to_string(),
                    line_start,
                    None,
                    None,
                    indent,
                );
                self.push(token);
                return;
            }
        }

        let skip = chars_for_indent(line, self.fence_indent);
        let mut value = line[skip..].to_string();
        if self.consumed_newline {
            value.push('\n');
        }
        let token = self.make_token(
            TokenType::FencedCodeContent,
            value,
            line_start + skip,
            None,
            None,
            indent,
        );
        self.push(token);
    }

    // =====================================================================
    // Math block mode
    // =====================================================================

    fn classify_math_block_start(&mut self, content: &str, line_start: usize, indent: i32) -> bool {
        if !content.starts_with("$$") {
            return false;
        }
        let rest = content[2..].trim_end_matches('\n').trim_end();

        let start = self.make_token(
            TokenType::MathBlockStart,
            "$$".to_string(),
            line_start,
            Some(indent as usize + 1),
            None,
            indent,
        );

        if let Some(inner) = rest.strip_suffix("$$") {
            // Single-line $$…$$ block.
            self.push(start);
            let inner = inner.trim();
            if !inner.is_empty() {
                let content_token = self.make_token(
                    TokenType::MathBlockContent,
                    inner.to_string(),
                    line_start,
                    None,
                    None,
                    indent,
                );
                self.push(content_token);
            }
            let end =
                self.make_token(TokenType::MathBlockEnd, "$$".to_string(), line_start, None, None, indent);
            self.push(end);
            return true;
        }

        self.push(start);
        if !rest.is_empty() {
            let content_token =
                self.make_token(TokenType::MathBlockContent, rest.to_string(), line_start, None, None, indent);
            self.push(content_token);
        }
        self.mode = Mode::MathBlock;
        true
    }

    fn scan_math_content(&mut self) {
        self.save_location();
        let source = self.source;
        let line_start = self.pos;
        let line_end = self.find_line_end();
        let line = &source[line_start..line_end];
        self.commit_to(line_end);

        if line.trim() == "$$" {
            self.mode = Mode::Block;
            let token = self.make_token(TokenType::MathBlockEnd, "$$".to_string(), line_start, None, None, 0);
            self.push(token);
            return;
        }

        let token = self.make_token(
            TokenType::MathBlockContent,
            line.trim_end_matches('\n').to_string(),
            line_start,
            None,
            None,
            0,
        );
        self.push(token);
    }
}
