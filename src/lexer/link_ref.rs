//! Link reference definition classifier.
//!
//! Handles multi-line definitions, escaped characters, and the strict
//! CommonMark §4.7 grammar: a label of balanced non-bracket characters,
//! `:`, optional whitespace crossing at most one newline, a destination
//! (angle-bracketed or bare), and an optional quoted title. On success the
//! lexer commits past the whole span; otherwise nothing is consumed.

use crate::lexer::Lexer;
use crate::tokens::{Token, TokenType};

impl<'s, 'o> Lexer<'s, 'o> {
    /// Tries to classify a definition beginning on the current line.
    /// Emits a token whose value is `label|url|title`.
    pub(crate) fn try_classify_link_reference_def(
        &mut self,
        line_start: usize,
        indent: i32,
    ) -> Option<Token> {
        let (label, after_colon) = self.parse_label_multiline(line_start)?;
        if label.is_empty() {
            return None;
        }

        let (url, after_dest) = self.parse_destination_multiline(after_colon)?;

        let (mut title, mut next_pos) = match self.parse_title_multiline(after_dest) {
            Some((t, p)) => (t, p),
            None => (String::new(), after_dest),
        };

        // Nothing else may follow on the final line. If the title line has
        // trailing junk, drop the title and re-check the destination line.
        let mut line_end = self.find_line_end_from(next_pos);
        if !self.source[next_pos..line_end].trim().is_empty() {
            title = String::new();
            next_pos = after_dest;
            line_end = self.find_line_end_from(next_pos);
            if !self.source[next_pos..line_end].trim().is_empty() {
                return None;
            }
        }

        self.commit_to(line_end);

        let value = format!("{}|{}|{}", label, url, title);
        Some(self.make_token(TokenType::LinkReferenceDef, value, line_start, None, None, indent))
    }

    /// Parses the `[label]:` part. Returns the raw label text and the
    /// position just after the colon.
    fn parse_label_multiline(&self, line_start: usize) -> Option<(String, usize)> {
        let source = self.source;
        let bytes = source.as_bytes();

        let bracket = source[line_start..].find('[')?;
        if bracket > 3 {
            return None;
        }

        let mut label = String::new();
        let mut curr = line_start + bracket + 1;

        while curr < source.len() {
            match bytes[curr] {
                b'\\' => {
                    let end = (curr + 2).min(source.len());
                    label.push_str(&source[curr..end]);
                    curr = end;
                }
                b'[' => return None,
                b']' => {
                    if bytes.get(curr + 1) != Some(&b':') {
                        return None;
                    }
                    let trimmed = label.trim().to_string();
                    if trimmed.len() > 999 {
                        return None;
                    }
                    return Some((trimmed, curr + 2));
                }
                b'\n' => {
                    if bytes.get(curr + 1) == Some(&b'\n') {
                        return None;
                    }
                    label.push('\n');
                    curr += 1;
                }
                _ => {
                    let ch_len = source[curr..].chars().next().map(char::len_utf8).unwrap_or(1);
                    label.push_str(&source[curr..curr + ch_len]);
                    curr += ch_len;
                }
            }
        }

        None
    }

    /// Parses the destination after the colon, optionally crossing one
    /// newline of whitespace first.
    fn parse_destination_multiline(&self, start_pos: usize) -> Option<(String, usize)> {
        let source = self.source;
        let bytes = source.as_bytes();
        let mut curr = start_pos;
        let mut newline_found = false;

        while curr < source.len() {
            match bytes[curr] {
                b' ' | b'\t' => curr += 1,
                b'\n' => {
                    if newline_found {
                        break;
                    }
                    newline_found = true;
                    curr += 1;
                    if bytes.get(curr) == Some(&b'\n') {
                        return None;
                    }
                    while curr < source.len() && (bytes[curr] == b' ' || bytes[curr] == b'\t') {
                        curr += 1;
                    }
                }
                _ => break,
            }
        }

        if curr >= source.len() {
            return None;
        }

        if bytes[curr] == b'<' {
            curr += 1;
            let mut dest = String::new();
            while curr < source.len() {
                match bytes[curr] {
                    b'\\' => {
                        let end = (curr + 2).min(source.len());
                        dest.push_str(&source[curr..end]);
                        curr = end;
                    }
                    b'\n' | b'<' => return None,
                    b'>' => return Some((dest, curr + 1)),
                    _ => {
                        let ch_len = source[curr..].chars().next().map(char::len_utf8).unwrap_or(1);
                        dest.push_str(&source[curr..curr + ch_len]);
                        curr += ch_len;
                    }
                }
            }
            return None;
        }

        let start = curr;
        let mut dest = String::new();
        while curr < source.len() {
            let b = bytes[curr];
            if b == b'\\' && curr + 1 < source.len() {
                dest.push_str(&source[curr..curr + 2]);
                curr += 2;
                continue;
            }
            if b == b' ' || b == b'\t' || b == b'\n' || b < 0x20 {
                break;
            }
            let ch_len = source[curr..].chars().next().map(char::len_utf8).unwrap_or(1);
            dest.push_str(&source[curr..curr + ch_len]);
            curr += ch_len;
        }

        if curr == start {
            return None;
        }
        Some((dest, curr))
    }

    /// Parses an optional title. `None` means a malformed title that
    /// invalidates itself (the caller falls back to no-title); a
    /// `Some(("", start_pos))` result means no title present.
    fn parse_title_multiline(&self, start_pos: usize) -> Option<(String, usize)> {
        let source = self.source;
        let bytes = source.as_bytes();
        let mut curr = start_pos;
        let mut newline_found = false;
        let mut whitespace_count = 0usize;

        while curr < source.len() {
            match bytes[curr] {
                b' ' | b'\t' => {
                    curr += 1;
                    whitespace_count += 1;
                }
                b'\n' => {
                    if newline_found {
                        break;
                    }
                    newline_found = true;
                    curr += 1;
                    whitespace_count += 1;
                    if bytes.get(curr) == Some(&b'\n') {
                        return Some((String::new(), start_pos));
                    }
                    while curr < source.len() && (bytes[curr] == b' ' || bytes[curr] == b'\t') {
                        curr += 1;
                    }
                }
                _ => break,
            }
        }

        if curr >= source.len() || whitespace_count == 0 {
            return Some((String::new(), start_pos));
        }

        let opener = bytes[curr];
        let closer = match opener {
            b'"' => b'"',
            b'\'' => b'\'',
            b'(' => b')',
            _ => return Some((String::new(), start_pos)),
        };

        curr += 1;
        let mut title = String::new();

        while curr < source.len() {
            let b = bytes[curr];
            if b == b'\\' {
                let end = (curr + 2).min(source.len());
                title.push_str(&source[curr..end]);
                curr = end;
                continue;
            }
            if b == closer {
                return Some((title, curr + 1));
            }
            if b == b'\n' {
                if bytes.get(curr + 1) == Some(&b'\n') {
                    return None;
                }
                title.push('\n');
                curr += 1;
                continue;
            }
            let ch_len = source[curr..].chars().next().map(char::len_utf8).unwrap_or(1);
            title.push_str(&source[curr..curr + ch_len]);
            curr += ch_len;
        }

        None
    }
}
