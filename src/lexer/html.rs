//! The seven-variant HTML block classifier (CommonMark §4.6) and the
//! html-block mode scanner that accumulates raw lines until the
//! type-specific terminator.

use crate::lexer::{Lexer, Mode};
use crate::tokens::TokenType;

pub(crate) const HTML_BLOCK_TYPE1_TAGS: [&str; 4] = ["pre", "script", "style", "textarea"];

pub(crate) const HTML_BLOCK_TYPE6_TAGS: [&str; 62] = [
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

/// Inline-level tags that should not open a type-7 block mid-paragraph.
const INLINE_TAGS: [&str; 27] = [
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "del", "dfn", "em", "i", "ins", "kbd",
    "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var", "wbr",
];

impl<'s, 'o> Lexer<'s, 'o> {
    /// Tries to open an HTML block at the current line. On success the
    /// block content starts accumulating (or is emitted immediately when
    /// the terminator sits on the same line) and `true` is returned.
    pub(crate) fn try_classify_html_block_start(
        &mut self,
        content: &str,
        line_start: usize,
        full_line: &str,
        indent: i32,
    ) -> bool {
        if !content.starts_with('<') {
            return false;
        }

        let content_lower = content.to_lowercase();
        let mut full_line_nl = full_line.to_string();
        if self.consumed_newline {
            full_line_nl.push('\n');
        }

        // Type 1: <pre, <script, <style, <textarea; ends with the matching
        // close tag.
        for tag in HTML_BLOCK_TYPE1_TAGS.iter() {
            if content_lower.starts_with(&format!("<{}", tag)) {
                let after = content.as_bytes().get(tag.len() + 1);
                let delimited = match after {
                    None => true,
                    Some(&b) => b == b' ' || b == b'\t' || b == b'\n' || b == b'>',
                };
                if delimited {
                    self.begin_html_block(1, full_line_nl, line_start, indent);
                    if content_lower.contains(&format!("</{}>", tag)) {
                        self.emit_html_block();
                    }
                    return true;
                }
            }
        }

        // Type 2: comment, ends with -->.
        if content.starts_with("<!--") {
            self.begin_html_block(2, full_line_nl, line_start, indent);
            if content[4..].contains("-->") {
                self.emit_html_block();
            }
            return true;
        }

        // Type 3: processing instruction, ends with ?>.
        if content.starts_with("<?") {
            self.begin_html_block(3, full_line_nl, line_start, indent);
            if content[2..].contains("?>") {
                self.emit_html_block();
            }
            return true;
        }

        // Type 5: CDATA, ends with ]]>. Checked before type 4 since
        // <![CDATA[ also matches "<!" + letter-ish prefixes in spirit.
        if content.starts_with("<![CDATA[") {
            self.begin_html_block(5, full_line_nl, line_start, indent);
            if content[9..].contains("]]>") {
                self.emit_html_block();
            }
            return true;
        }

        // Type 4: declaration <!LETTER, ends with >.
        let bytes = content.as_bytes();
        if bytes.len() >= 3 && bytes[1] == b'!' && bytes[2].is_ascii_uppercase() {
            self.begin_html_block(4, full_line_nl, line_start, indent);
            if content[2..].contains('>') {
                self.emit_html_block();
            }
            return true;
        }

        // Type 6: block-level tag name from the fixed set; ends on a blank
        // line.
        if let Some(tag) = extract_html_tag_name(content) {
            if HTML_BLOCK_TYPE6_TAGS.contains(&tag.to_lowercase().as_str()) {
                self.begin_html_block(6, full_line_nl, line_start, indent);
                if self.pos >= self.source.len() {
                    self.emit_html_block();
                }
                return true;
            }
        }

        // Type 7: a single complete open/close tag alone on its line; ends
        // on a blank line.
        if self.is_complete_html_tag(content) {
            self.begin_html_block(7, full_line_nl, line_start, indent);
            if self.pos >= self.source.len() {
                self.emit_html_block();
            }
            return true;
        }

        false
    }

    fn begin_html_block(&mut self, block_type: u8, first_line: String, line_start: usize, indent: i32) {
        self.html_block_type = block_type;
        self.html_block_content = first_line;
        self.html_block_start = line_start;
        self.html_block_indent = indent;
        self.mode = Mode::HtmlBlock;
    }

    /// Whether `content` is one complete open or close tag, alone on the
    /// line, with CommonMark-strict attribute grammar, whose tag name is
    /// in neither the type-1 nor the type-6 set.
    fn is_complete_html_tag(&self, content: &str) -> bool {
        let content = content.trim_end();
        let bytes = content.as_bytes();
        if bytes.is_empty() || bytes[0] != b'<' || !content.ends_with('>') || content.len() < 3 {
            return false;
        }

        // Autolinks (<scheme:…>, <user@host>) are inline business.
        let inner = &content[1..content.len() - 1];
        if inner.contains("://") || inner.contains('@') {
            return false;
        }

        if bytes[1] == b'/' {
            if content.len() < 4 || !bytes[2].is_ascii_alphabetic() {
                return false;
            }
            let mut pos = 2;
            while pos < content.len() - 1 && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-')
            {
                pos += 1;
            }
            let tag_name = content[2..pos].to_lowercase();
            if HTML_BLOCK_TYPE1_TAGS.contains(&tag_name.as_str()) {
                return false;
            }
            if !content[pos..content.len() - 1].trim().is_empty() {
                return false;
            }
            return !HTML_BLOCK_TYPE6_TAGS.contains(&tag_name.as_str());
        }

        if !bytes[1].is_ascii_alphabetic() {
            return false;
        }

        let mut pos = 1;
        while pos < content.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
            pos += 1;
        }
        let tag_name = content[1..pos].to_lowercase();

        if HTML_BLOCK_TYPE1_TAGS.contains(&tag_name.as_str()) {
            return false;
        }
        if INLINE_TAGS.contains(&tag_name.as_str()) && !self.previous_line_blank {
            return false;
        }
        if pos < content.len() - 1 {
            let next = bytes[pos];
            if next != b' ' && next != b'\t' && next != b'/' && next != b'>' {
                return false;
            }
        }
        if HTML_BLOCK_TYPE6_TAGS.contains(&tag_name.as_str()) {
            return false;
        }

        let mut rest = &content[pos..content.len() - 1];
        if let Some(r) = rest.strip_suffix('/') {
            rest = r;
        }
        if rest.contains('<') {
            return false;
        }

        validate_html_attributes(rest)
    }

    /// Emits the accumulated HTML block as one token and resets state.
    pub(crate) fn emit_html_block(&mut self) {
        let mut html = std::mem::take(&mut self.html_block_content);
        if !html.is_empty() && !html.ends_with('\n') {
            html.push('\n');
        }

        let start = self.html_block_start;
        let indent = self.html_block_indent;
        let token = self.make_token(TokenType::HtmlBlock, html, start, None, None, indent);
        self.push(token);

        self.html_block_type = 0;
        self.html_block_start = 0;
        self.html_block_indent = 0;
        self.mode = Mode::Block;
    }

    /// Html-block mode: accumulate raw lines until the type's terminator.
    pub(crate) fn scan_html_block_content(&mut self) {
        self.save_location();
        let source = self.source;
        let line_start = self.pos;
        let line_end = self.find_line_end();
        let line = &source[line_start..line_end];

        self.commit_to(line_end);

        // Types 6/7 terminate on a blank line, which is not part of the
        // block.
        if self.html_block_type >= 6 && crate::strings::is_blank(line) {
            self.emit_html_block();
            self.previous_line_blank = true;
            let token = self.make_token(TokenType::BlankLine, String::new(), line_start, None, None, 0);
            self.push(token);
            return;
        }

        self.html_block_content.push_str(line);
        if self.consumed_newline {
            self.html_block_content.push('\n');
        }

        let line_lower = line.to_lowercase();
        let done = match self.html_block_type {
            1 => HTML_BLOCK_TYPE1_TAGS
                .iter()
                .any(|tag| line_lower.contains(&format!("</{}>", tag))),
            2 => line.contains("-->"),
            3 => line.contains("?>"),
            4 => line.contains('>'),
            5 => line.contains("]]>"),
            _ => false,
        };
        if done {
            self.emit_html_block();
        }
    }
}

/// Whether `tag` (lowercase) opens a type-1 or type-6 HTML block.
pub(crate) fn is_html_block_tag(tag: &str) -> bool {
    HTML_BLOCK_TYPE1_TAGS.contains(&tag) || HTML_BLOCK_TYPE6_TAGS.contains(&tag)
}

/// Extracts a tag name from `<tag …` / `</tag …`, if one is present.
fn extract_html_tag_name(content: &str) -> Option<&str> {
    let bytes = content.as_bytes();
    if bytes.is_empty() || bytes[0] != b'<' {
        return None;
    }
    let mut pos = 1;
    if pos < bytes.len() && bytes[pos] == b'/' {
        pos += 1;
    }
    if pos >= bytes.len() || !bytes[pos].is_ascii_alphabetic() {
        return None;
    }
    let start = pos;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
        pos += 1;
    }
    if pos > start {
        Some(&content[start..pos])
    } else {
        None
    }
}

/// Validates the attribute section between the tag name and the final `>`
/// per CommonMark §6.8: name `[A-Za-z_:][A-Za-z0-9_.:-]*`, value bare,
/// single-quoted, or double-quoted, with whitespace between attributes.
fn validate_html_attributes(attrs: &str) -> bool {
    let bytes = attrs.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b == b' ' || b == b'\t' || b == b'\n' {
            i += 1;
            continue;
        }

        if !(b.is_ascii_alphabetic() || b == b'_' || b == b':') {
            return false;
        }

        i += 1;
        while i < len {
            let c = bytes[i];
            if c.is_ascii_alphanumeric() || c == b'_' || c == b'.' || c == b':' || c == b'-' {
                i += 1;
            } else {
                break;
            }
        }

        while i < len && (bytes[i] == b' ' || bytes[i] == b'\t' || bytes[i] == b'\n') {
            i += 1;
        }

        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && (bytes[i] == b' ' || bytes[i] == b'\t' || bytes[i] == b'\n') {
                i += 1;
            }
            if i >= len {
                return false;
            }

            match bytes[i] {
                b'"' => {
                    i += 1;
                    while i < len && bytes[i] != b'"' {
                        i += 1;
                    }
                    if i >= len {
                        return false;
                    }
                    i += 1;
                }
                b'\'' => {
                    i += 1;
                    while i < len && bytes[i] != b'\'' {
                        i += 1;
                    }
                    if i >= len {
                        return false;
                    }
                    i += 1;
                }
                b'=' | b'<' | b'>' | b'`' => return false,
                _ => {
                    while i < len && !matches!(bytes[i], b'"' | b'\'' | b'=' | b'<' | b'>' | b'`' | b' ' | b'\t' | b'\n') {
                        i += 1;
                    }
                }
            }
        }

        // Next attribute needs whitespace separation.
        if i < len && bytes[i] != b' ' && bytes[i] != b'\t' && bytes[i] != b'\n' {
            return false;
        }
    }

    true
}
