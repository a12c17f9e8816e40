//! MyST-style directive classification and the directive-mode scanner.
//!
//! `:::{name} title` opens a frame; nesting uses more colons
//! (`::::` outside `:::`); `:::{/name}` closes any matching opener on the
//! stack together with everything nested inside it.

use crate::lexer::{calc_indent, Lexer, Mode, FENCE_CHARS, THEMATIC_BREAK_CHARS};
use crate::strings;
use crate::tokens::TokenType;

impl<'s, 'o> Lexer<'s, 'o> {
    /// Classifies a `:::{name}` opener (or `:::{/name}` closer met in
    /// block mode). Emits tokens and switches mode on success.
    pub(crate) fn try_classify_directive_start(
        &mut self,
        content: &str,
        line_start: usize,
        indent: i32,
    ) -> bool {
        if !content.starts_with(":::") {
            return false;
        }

        let bytes = content.as_bytes();
        let mut colon_count = 0;
        while colon_count < bytes.len() && bytes[colon_count] == b':' {
            colon_count += 1;
        }

        if colon_count >= bytes.len() || bytes[colon_count] != b'{' {
            return false;
        }

        let brace_start = colon_count + 1;
        let brace_end = match content[brace_start..].find('}') {
            Some(i) => brace_start + i,
            None => return false,
        };

        let mut name = content[brace_start..brace_end].trim();
        let is_closer = name.starts_with('/');
        if is_closer {
            name = name[1..].trim();
        }

        let title = content[brace_end + 1..].trim_end_matches('\n').trim();
        let name = name.to_string();
        let title = title.to_string();

        if is_closer {
            let token = self.make_token(
                TokenType::DirectiveClose,
                format!(":::{{{}}}", name),
                line_start,
                None,
                None,
                indent,
            );
            self.push(token);

            if let Some((stack_count, stack_name)) = self.directive_stack.last() {
                if *stack_name == name && colon_count >= *stack_count {
                    self.directive_stack.pop();
                    if self.directive_stack.is_empty() {
                        self.mode = Mode::Block;
                    }
                }
            }
        } else {
            let open = self.make_token(
                TokenType::DirectiveOpen,
                ":".repeat(colon_count),
                line_start,
                None,
                None,
                indent,
            );
            self.push(open);
            let name_token =
                self.make_token(TokenType::DirectiveName, name.clone(), line_start, None, None, indent);
            self.push(name_token);
            if !title.is_empty() {
                let title_token =
                    self.make_token(TokenType::DirectiveTitle, title, line_start, None, None, indent);
                self.push(title_token);
            }

            self.directive_stack.push((colon_count, name));
            self.mode = Mode::Directive;
        }

        true
    }

    /// Classifies a closing fence inside directive mode: bare `:::` (same
    /// or greater colon count) or a named `:::{/name}`. Returns false when
    /// the line is not a close at all (it may still be a nested opener).
    fn try_classify_directive_close(&mut self, content: &str, line_start: usize, indent: i32) -> bool {
        if !content.starts_with(":::") {
            return false;
        }

        let bytes = content.as_bytes();
        let mut colon_count = 0;
        while colon_count < bytes.len() && bytes[colon_count] == b':' {
            colon_count += 1;
        }

        let rest = content[colon_count..].trim_end_matches('\n').trim();

        if let Some(after) = rest.strip_prefix("{/") {
            if let Some(brace_end) = after.find('}') {
                let name = after[..brace_end].trim().to_string();
                if after[brace_end + 1..].trim().is_empty() {
                    self.emit_directive_close(colon_count, Some(name), line_start, indent);
                    return true;
                }
            }
            return false;
        }

        if rest.is_empty() {
            self.emit_directive_close(colon_count, None, line_start, indent);
            return true;
        }

        false
    }

    /// Emits one `DirectiveClose` per popped frame so the recursive parser
    /// can unwind every nested body.
    fn emit_directive_close(
        &mut self,
        colon_count: usize,
        name: Option<String>,
        line_start: usize,
        indent: i32,
    ) {
        if self.directive_stack.is_empty() {
            let token = self.make_token(
                TokenType::ParagraphLine,
                ":".repeat(colon_count),
                line_start,
                None,
                None,
                indent,
            );
            self.push(token);
            return;
        }

        if let Some(name) = name {
            let mut match_index = None;
            for (i, (s_count, s_name)) in self.directive_stack.iter().enumerate().rev() {
                if *s_name == name && colon_count >= *s_count {
                    match_index = Some(i);
                    break;
                }
            }

            if let Some(match_index) = match_index {
                let mut first = true;
                while self.directive_stack.len() > match_index {
                    let (s_count, _) = self.directive_stack.pop().expect("stack nonempty");
                    let value = if first {
                        format!(":::{{{}}}", name)
                    } else {
                        ":".repeat(s_count)
                    };
                    first = false;
                    let token =
                        self.make_token(TokenType::DirectiveClose, value, line_start, None, None, indent);
                    self.push(token);
                }
                if self.directive_stack.is_empty() {
                    self.mode = Mode::Block;
                }
                return;
            }
        } else {
            let stack_count = self.directive_stack.last().map(|f| f.0).unwrap_or(3);
            if colon_count >= stack_count {
                self.directive_stack.pop();
                let token = self.make_token(
                    TokenType::DirectiveClose,
                    ":".repeat(colon_count),
                    line_start,
                    None,
                    None,
                    indent,
                );
                self.push(token);
                if self.directive_stack.is_empty() {
                    self.mode = Mode::Block;
                }
                return;
            }
        }

        // Not a valid close for the current frame: plain content.
        let token = self.make_token(
            TokenType::ParagraphLine,
            ":".repeat(colon_count),
            line_start,
            None,
            None,
            indent,
        );
        self.push(token);
    }

    /// `:key: value` option lines at the head of a directive body.
    fn try_classify_directive_option(&mut self, content: &str, line_start: usize, indent: i32) -> bool {
        if !content.starts_with(':') {
            return false;
        }

        let colon_pos = match content[1..].find(':') {
            Some(i) => 1 + i,
            None => return false,
        };

        let key = content[1..colon_pos].trim();
        let value = content[colon_pos + 1..].trim_end_matches('\n').trim();

        if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return false;
        }

        let token = self.make_token(
            TokenType::DirectiveOption,
            format!("{}:{}", key, value),
            line_start,
            None,
            None,
            indent,
        );
        self.push(token);
        true
    }

    /// Directive mode line scanner. Options, closes, and nested opens are
    /// recognized first; every other line routes through the block-mode
    /// classifiers, since directives hold arbitrary Markdown.
    pub(crate) fn scan_directive_content(&mut self) {
        self.save_location();
        let source = self.source;
        let line_start = self.pos;
        let line_end = self.find_line_end();
        let line = &source[line_start..line_end];

        let (indent, content_start) = calc_indent(line);
        let content = &line[content_start..];

        self.commit_to(line_end);

        if content.is_empty() || strings::is_blank(content) {
            let token = self.make_token(TokenType::BlankLine, String::new(), line_start, None, None, 0);
            self.push(token);
            return;
        }

        if content.starts_with(":::") {
            if self.try_classify_directive_close(content, line_start, indent) {
                return;
            }
            if self.try_classify_directive_start(content, line_start, indent) {
                return;
            }
        }

        if content.starts_with(':') && !content.starts_with(":::") {
            if self.try_classify_directive_option(content, line_start, indent) {
                return;
            }
        }

        let first = content.as_bytes()[0];

        if FENCE_CHARS[first as usize] {
            if let Some(token) = self.try_classify_fence_start(content, line_start, indent, true) {
                self.push(token);
                return;
            }
        }

        if first == b'#' {
            if let Some(token) = self.try_classify_atx_heading(content, line_start, indent) {
                self.push(token);
                return;
            }
        }

        if THEMATIC_BREAK_CHARS[first as usize] {
            if let Some(token) = self.try_classify_thematic_break(content, line_start, indent) {
                self.push(token);
                return;
            }
        }

        if first == b'>' {
            self.classify_block_quote(content, line_start, indent);
            return;
        }

        if self.try_classify_list_marker(content, line_start, indent) {
            return;
        }

        let token = self.make_token(
            TokenType::ParagraphLine,
            content.trim_end_matches('\n').to_string(),
            line_start,
            None,
            None,
            indent,
        );
        self.push(token);
    }
}
