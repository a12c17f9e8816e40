//! Inline parsing.
//!
//! Three phases over a leaf block's text: (1) a single left-to-right
//! tokenization into typed inline tokens, (2) the CommonMark delimiter
//! stack algorithm, writing matches into an external [`MatchRegistry`] so
//! tokens stay immutable, and (3) an index-bounded walk that builds the
//! inline AST.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use unicode_categories::UnicodeCategories;

use crate::character_set::character_set;
use crate::ctype::ispunct;
use crate::entity;
use crate::nodes::{
    CodeSpan, Emphasis, FootnoteRef, HtmlInline, Image, Inline, LineBreak, Link, Math, Role,
    SoftBreak, SourceLocation, Strikethrough, Strong, Text,
};
use crate::parser::Parser;
use crate::strings;

/// Bytes that interrupt a plain text run.
const INLINE_SPECIAL: [bool; 256] = character_set!(b"`*_[]!\\\n<{~$&");

const MAX_LINK_LABEL_LENGTH: usize = 999;

// =========================================================================
// Inline tokens and the match registry
// =========================================================================

#[derive(Debug, Clone)]
pub(crate) enum InlineToken {
    Text(String),
    Delimiter {
        ch: u8,
        run_length: usize,
        can_open: bool,
        can_close: bool,
    },
    CodeSpan(String),
    Node(Inline),
    HardBreak,
    SoftBreak,
}

#[derive(Debug, Clone, Copy)]
struct MatchRecord {
    opener: usize,
    closer: usize,
    count: usize,
}

/// External record of delimiter matches over the token array: which
/// opener matched which closer and how many delimiter characters each
/// match used, plus per-index consumption and deactivation. This replaces
/// in-place token mutation.
#[derive(Debug, Default)]
pub(crate) struct MatchRegistry {
    matches: Vec<MatchRecord>,
    consumed: FxHashMap<usize, usize>,
    deactivated: FxHashSet<usize>,
}

impl MatchRegistry {
    fn record_match(&mut self, opener: usize, closer: usize, count: usize) {
        self.matches.push(MatchRecord { opener, closer, count });
        *self.consumed.entry(opener).or_insert(0) += count;
        *self.consumed.entry(closer).or_insert(0) += count;
    }

    fn remaining(&self, idx: usize, run_length: usize) -> usize {
        run_length.saturating_sub(self.consumed.get(&idx).copied().unwrap_or(0))
    }

    fn is_active(&self, idx: usize) -> bool {
        !self.deactivated.contains(&idx)
    }

    fn deactivate(&mut self, idx: usize) {
        self.deactivated.insert(idx);
    }

    fn matches_for_opener(&self, idx: usize) -> SmallVec<[MatchRecord; 2]> {
        self.matches.iter().filter(|m| m.opener == idx).copied().collect()
    }
}

// =========================================================================
// Flanking classification
// =========================================================================

fn is_uni_whitespace(c: char) -> bool {
    c.is_whitespace()
}

fn is_uni_punctuation(c: char) -> bool {
    (c.is_ascii() && ispunct(c as u8)) || c.is_punctuation() || c.is_symbol()
}

fn is_left_flanking(before: char, after: char) -> bool {
    if is_uni_whitespace(after) {
        return false;
    }
    if !is_uni_punctuation(after) {
        return true;
    }
    is_uni_whitespace(before) || is_uni_punctuation(before)
}

fn is_right_flanking(before: char, after: char) -> bool {
    if is_uni_whitespace(before) {
        return false;
    }
    if !is_uni_punctuation(before) {
        return true;
    }
    is_uni_whitespace(after) || is_uni_punctuation(after)
}

impl<'s, 'o> Parser<'s, 'o> {
    /// Parses leaf text into inline nodes via the delimiter-stack
    /// algorithm.
    pub(crate) fn parse_inline(&mut self, text: &str, location: SourceLocation) -> Vec<Inline> {
        if text.is_empty() {
            return Vec::new();
        }

        let tokens = self.tokenize_inline(text, location);
        let registry = process_emphasis(&tokens);
        build_inline_ast(&tokens, &registry, location, 0, tokens.len())
    }

    // =====================================================================
    // Phase 1: tokenize
    // =====================================================================

    fn tokenize_inline(&mut self, text: &str, location: SourceLocation) -> Vec<InlineToken> {
        let mut tokens: Vec<InlineToken> = Vec::new();
        let bytes = text.as_bytes();
        let len = bytes.len();
        let mut pos = 0;

        let autolink = self.options.extension.autolink;

        while pos < len {
            let b = bytes[pos];

            match b {
                b'`' => {
                    let mut count = 0;
                    while pos < len && bytes[pos] == b'`' {
                        count += 1;
                        pos += 1;
                    }
                    match find_code_span_close(text, pos, count) {
                        Some(close) => {
                            let mut code = text[pos..close].replace('\n', " ");
                            let code_bytes = code.as_bytes();
                            if code_bytes.len() >= 2
                                && code_bytes[0] == b' '
                                && code_bytes[code_bytes.len() - 1] == b' '
                                && !code.trim().is_empty()
                            {
                                code = code[1..code.len() - 1].to_string();
                            }
                            tokens.push(InlineToken::CodeSpan(code));
                            pos = close + count;
                        }
                        None => tokens.push(InlineToken::Text("`".repeat(count))),
                    }
                }

                b'*' | b'_' => {
                    let delim_start = pos;
                    let mut count = 0;
                    while pos < len && bytes[pos] == b {
                        count += 1;
                        pos += 1;
                    }

                    let before = text[..delim_start].chars().next_back().unwrap_or(' ');
                    let after = text[pos..].chars().next().unwrap_or(' ');

                    let left = is_left_flanking(before, after);
                    let right = is_right_flanking(before, after);

                    let (can_open, can_close) = if b == b'_' {
                        (
                            left && (!right || is_uni_punctuation(before)),
                            right && (!left || is_uni_punctuation(after)),
                        )
                    } else {
                        (left, right)
                    };

                    tokens.push(InlineToken::Delimiter {
                        ch: b,
                        run_length: count,
                        can_open,
                        can_close,
                    });
                }

                b'[' => {
                    if self.options.extension.footnotes && bytes.get(pos + 1) == Some(&b'^') {
                        if let Some((node, new_pos)) = self.try_parse_footnote_ref(text, pos, location)
                        {
                            tokens.push(InlineToken::Node(node));
                            pos = new_pos;
                            continue;
                        }
                    }
                    match self.try_parse_link(text, pos, location) {
                        Some((node, new_pos)) => {
                            tokens.push(InlineToken::Node(node));
                            pos = new_pos;
                        }
                        None => {
                            tokens.push(InlineToken::Text("[".to_string()));
                            pos += 1;
                        }
                    }
                }

                b'!' => {
                    if bytes.get(pos + 1) == Some(&b'[') {
                        if let Some((node, new_pos)) = self.try_parse_image(text, pos, location) {
                            tokens.push(InlineToken::Node(node));
                            pos = new_pos;
                            continue;
                        }
                    }
                    tokens.push(InlineToken::Text("!".to_string()));
                    pos += 1;
                }

                b'\\' if bytes.get(pos + 1) == Some(&b'\n') => {
                    tokens.push(InlineToken::HardBreak);
                    pos += 2;
                    while pos < len && bytes[pos] == b' ' {
                        pos += 1;
                    }
                }

                b'\n' => {
                    let mut space_count = 0;
                    let mut check = pos;
                    while check > 0 && bytes[check - 1] == b' ' {
                        space_count += 1;
                        check -= 1;
                    }

                    if space_count >= 2 {
                        strip_trailing_spaces(&mut tokens);
                        tokens.push(InlineToken::HardBreak);
                    } else {
                        if space_count == 1 {
                            strip_trailing_spaces(&mut tokens);
                        }
                        tokens.push(InlineToken::SoftBreak);
                    }
                    pos += 1;
                    while pos < len && bytes[pos] == b' ' {
                        pos += 1;
                    }
                }

                b'\\' => {
                    match bytes.get(pos + 1) {
                        Some(&next) if ispunct(next) => {
                            tokens.push(InlineToken::Text((next as char).to_string()));
                            pos += 2;
                        }
                        _ => {
                            tokens.push(InlineToken::Text("\\".to_string()));
                            pos += 1;
                        }
                    }
                }

                b'<' => {
                    if let Some((node, new_pos)) = self.try_parse_autolink(text, pos, location) {
                        tokens.push(InlineToken::Node(node));
                        pos = new_pos;
                        continue;
                    }
                    match try_parse_html_inline(text, pos, location) {
                        Some((node, new_pos)) => {
                            tokens.push(InlineToken::Node(node));
                            pos = new_pos;
                        }
                        None => {
                            tokens.push(InlineToken::Text("<".to_string()));
                            pos += 1;
                        }
                    }
                }

                b'{' => {
                    match self.try_parse_role(text, pos, location) {
                        Some((node, new_pos)) => {
                            tokens.push(InlineToken::Node(node));
                            pos = new_pos;
                        }
                        None => {
                            tokens.push(InlineToken::Text("{".to_string()));
                            pos += 1;
                        }
                    }
                }

                b'~' => {
                    if self.options.extension.strikethrough && bytes.get(pos + 1) == Some(&b'~') {
                        pos += 2;
                        let before = if pos >= 3 {
                            text[..pos - 2].chars().next_back().unwrap_or(' ')
                        } else {
                            ' '
                        };
                        let after = text[pos..].chars().next().unwrap_or(' ');
                        tokens.push(InlineToken::Delimiter {
                            ch: b'~',
                            run_length: 2,
                            can_open: is_left_flanking(before, after),
                            can_close: is_right_flanking(before, after),
                        });
                    } else {
                        tokens.push(InlineToken::Text("~".to_string()));
                        pos += 1;
                    }
                }

                b'$' => {
                    if self.options.extension.math {
                        if let Some((node, new_pos)) = try_parse_math(text, pos, location) {
                            tokens.push(InlineToken::Node(node));
                            pos = new_pos;
                            continue;
                        }
                    }
                    tokens.push(InlineToken::Text("$".to_string()));
                    pos += 1;
                }

                b'&' => {
                    match entity::unescape(&text[pos + 1..]) {
                        Some((decoded, consumed)) => {
                            tokens.push(InlineToken::Text(decoded));
                            pos += 1 + consumed;
                        }
                        None => {
                            tokens.push(InlineToken::Text("&".to_string()));
                            pos += 1;
                        }
                    }
                }

                b':' if autolink => {
                    if let Some(consumed) = self.try_bare_url(text, pos, &mut tokens, location) {
                        pos = consumed;
                    } else {
                        tokens.push(InlineToken::Text(":".to_string()));
                        pos += 1;
                    }
                }

                b'w' if autolink => {
                    if let Some(consumed) = self.try_bare_www(text, pos, &mut tokens, location) {
                        pos = consumed;
                    } else {
                        tokens.push(InlineToken::Text("w".to_string()));
                        pos += 1;
                    }
                }

                b'@' if autolink => {
                    if let Some(consumed) = self.try_bare_email(text, pos, &mut tokens, location) {
                        pos = consumed;
                    } else {
                        tokens.push(InlineToken::Text("@".to_string()));
                        pos += 1;
                    }
                }

                _ => {
                    let start = pos;
                    while pos < len {
                        let c = bytes[pos];
                        if INLINE_SPECIAL[c as usize] {
                            break;
                        }
                        if autolink && (c == b':' || c == b'w' || c == b'@') {
                            break;
                        }
                        pos += 1;
                    }
                    if pos > start {
                        tokens.push(InlineToken::Text(text[start..pos].to_string()));
                    } else {
                        // Defensive forward progress.
                        tokens.push(InlineToken::Text((bytes[pos] as char).to_string()));
                        pos += 1;
                    }
                }
            }
        }

        tokens
    }

    // =====================================================================
    // Links, images, footnote references
    // =====================================================================

    fn try_parse_footnote_ref(
        &self,
        text: &str,
        pos: usize,
        location: SourceLocation,
    ) -> Option<(Inline, usize)> {
        let bytes = text.as_bytes();
        if pos + 2 >= bytes.len() || &text[pos..pos + 2] != "[^" {
            return None;
        }

        let bracket = text[pos + 2..].find(']').map(|i| pos + 2 + i)?;
        let identifier = &text[pos + 2..bracket];

        if identifier.is_empty()
            || !identifier.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }

        // Followed by ':' would be a definition, not a reference.
        if bytes.get(bracket + 1) == Some(&b':') {
            return None;
        }

        Some((
            Inline::FootnoteRef(FootnoteRef {
                location,
                identifier: identifier.to_string(),
            }),
            bracket + 1,
        ))
    }

    fn try_parse_link(
        &mut self,
        text: &str,
        pos: usize,
        location: SourceLocation,
    ) -> Option<(Inline, usize)> {
        if text.as_bytes()[pos] != b'[' {
            return None;
        }

        let bracket_pos = find_closing_bracket(text, pos + 1)?;
        let link_text = &text[pos + 1..bracket_pos];
        if link_text.len() > MAX_LINK_LABEL_LENGTH {
            return None;
        }
        let bytes = text.as_bytes();

        if let Some(&next) = bytes.get(bracket_pos + 1) {
            if next == b'(' {
                if let Some((url, title, end_pos)) = parse_inline_link(text, bracket_pos + 1) {
                    let link_text = link_text.to_string();
                    let children = self.parse_inline(&link_text, location);
                    if children.iter().any(Inline::contains_link) {
                        return None;
                    }
                    return Some((
                        Inline::Link(Link { location, url, title, children }),
                        end_pos,
                    ));
                }
            } else if next == b'[' {
                if let Some(ref_end) = text[bracket_pos + 2..].find(']').map(|i| bracket_pos + 2 + i)
                {
                    let mut ref_label = &text[bracket_pos + 2..ref_end];
                    if ref_label.is_empty() {
                        ref_label = link_text;
                    }
                    if let Some((url, title)) =
                        self.link_refs.get(&strings::normalize_label(ref_label)).cloned()
                    {
                        let link_text = link_text.to_string();
                        let children = self.parse_inline(&link_text, location);
                        if children.iter().any(Inline::contains_link) {
                            return None;
                        }
                        let title = if title.is_empty() { None } else { Some(title) };
                        return Some((
                            Inline::Link(Link { location, url, title, children }),
                            ref_end + 1,
                        ));
                    }
                }
            }
        }

        // Shortcut reference: [label] not followed by another label.
        if bytes.get(bracket_pos + 1) == Some(&b'[') {
            return None;
        }
        if let Some((url, title)) = self.link_refs.get(&strings::normalize_label(link_text)).cloned()
        {
            let link_text = link_text.to_string();
            let children = self.parse_inline(&link_text, location);
            if children.iter().any(Inline::contains_link) {
                return None;
            }
            let title = if title.is_empty() { None } else { Some(title) };
            return Some((
                Inline::Link(Link { location, url, title, children }),
                bracket_pos + 1,
            ));
        }

        None
    }

    fn try_parse_image(
        &mut self,
        text: &str,
        pos: usize,
        location: SourceLocation,
    ) -> Option<(Inline, usize)> {
        let bytes = text.as_bytes();
        if bytes[pos] != b'!' || bytes.get(pos + 1) != Some(&b'[') {
            return None;
        }

        let bracket_pos = find_closing_bracket(text, pos + 2)?;
        let alt_raw = text[pos + 2..bracket_pos].to_string();

        if let Some(&next) = bytes.get(bracket_pos + 1) {
            if next == b'(' {
                if let Some((url, title, end_pos)) = parse_inline_link(text, bracket_pos + 1) {
                    let alt = self.plain_text_of(&alt_raw, location);
                    return Some((
                        Inline::Image(Image { location, url, alt, title }),
                        end_pos,
                    ));
                }
            } else if next == b'[' {
                if let Some(ref_end) = text[bracket_pos + 2..].find(']').map(|i| bracket_pos + 2 + i)
                {
                    let mut ref_label = text[bracket_pos + 2..ref_end].to_string();
                    if ref_label.is_empty() {
                        ref_label = alt_raw.clone();
                    }
                    if let Some((url, title)) =
                        self.link_refs.get(&strings::normalize_label(&ref_label)).cloned()
                    {
                        let alt = self.plain_text_of(&alt_raw, location);
                        let title = if title.is_empty() { None } else { Some(title) };
                        return Some((
                            Inline::Image(Image { location, url, alt, title }),
                            ref_end + 1,
                        ));
                    }
                }
            }
        }

        if let Some((url, title)) = self.link_refs.get(&strings::normalize_label(&alt_raw)).cloned()
        {
            let alt = self.plain_text_of(&alt_raw, location);
            let title = if title.is_empty() { None } else { Some(title) };
            return Some((
                Inline::Image(Image { location, url, alt, title }),
                bracket_pos + 1,
            ));
        }

        None
    }

    /// Image alt text is plain text: formatting is parsed, then flattened.
    fn plain_text_of(&mut self, raw: &str, location: SourceLocation) -> String {
        let inlines = self.parse_inline(raw, location);
        let mut out = String::new();
        flatten_plain_text(&inlines, &mut out);
        out
    }

    // =====================================================================
    // Angle-bracket autolinks
    // =====================================================================

    fn try_parse_autolink(
        &self,
        text: &str,
        pos: usize,
        location: SourceLocation,
    ) -> Option<(Inline, usize)> {
        if text.as_bytes()[pos] != b'<' {
            return None;
        }

        let close = text[pos + 1..].find('>').map(|i| pos + 1 + i)?;
        let inner = &text[pos + 1..close];

        if inner.is_empty() || inner.contains(' ') || inner.contains('\n') || inner.contains('\t') {
            return None;
        }

        if let Some(url) = uri_autolink(inner) {
            let children = vec![Inline::Text(Text {
                location,
                content: entity::unescape_html(inner).into_owned(),
            })];
            return Some((
                Inline::Link(Link { location, url, title: None, children }),
                close + 1,
            ));
        }

        if !inner.contains('\\') && is_email_address(inner) {
            let children = vec![Inline::Text(Text {
                location,
                content: inner.to_string(),
            })];
            return Some((
                Inline::Link(Link {
                    location,
                    url: format!("mailto:{}", inner),
                    title: None,
                    children,
                }),
                close + 1,
            ));
        }

        None
    }

    // =====================================================================
    // Bare (GFM-style) autolinks
    // =====================================================================

    /// `scheme://…` triggered at the colon. The scheme characters are
    /// already inside the previous text token and get peeled off it.
    fn try_bare_url(
        &self,
        text: &str,
        pos: usize,
        tokens: &mut Vec<InlineToken>,
        location: SourceLocation,
    ) -> Option<usize> {
        if !text[pos..].starts_with("://") {
            return None;
        }

        // Scan back over the scheme letters.
        let mut scheme_start = pos;
        let bytes = text.as_bytes();
        while scheme_start > 0 && bytes[scheme_start - 1].is_ascii_alphabetic() {
            scheme_start -= 1;
        }
        let scheme = &text[scheme_start..pos];
        if !matches!(scheme.to_lowercase().as_str(), "http" | "https" | "ftp") {
            return None;
        }

        let rest_start = pos + 3;
        let end = bare_link_end(text, rest_start);
        if end == rest_start {
            return None;
        }

        // The scheme must be the tail of the preceding text token.
        if !peel_text_suffix(tokens, scheme) {
            return None;
        }

        let url = text[scheme_start..end].to_string();
        tokens.push(InlineToken::Node(Inline::Link(Link {
            location,
            url: url.clone(),
            title: None,
            children: vec![Inline::Text(Text { location, content: url })],
        })));
        Some(end)
    }

    /// `www.…` triggered at the `w`; only at the start of a word.
    fn try_bare_www(
        &self,
        text: &str,
        pos: usize,
        tokens: &mut Vec<InlineToken>,
        location: SourceLocation,
    ) -> Option<usize> {
        if !text[pos..].starts_with("www.") {
            return None;
        }

        let before = text[..pos].chars().next_back();
        if let Some(c) = before {
            if !(is_uni_whitespace(c) || matches!(c, '*' | '_' | '~' | '(')) {
                return None;
            }
        }

        let end = bare_link_end(text, pos + 4);
        if end == pos + 4 {
            return None;
        }

        let display = text[pos..end].to_string();
        tokens.push(InlineToken::Node(Inline::Link(Link {
            location,
            url: format!("http://{}", display),
            title: None,
            children: vec![Inline::Text(Text { location, content: display })],
        })));
        Some(end)
    }

    /// `user@host` triggered at the `@`; the local part is peeled off the
    /// preceding text token.
    fn try_bare_email(
        &self,
        text: &str,
        pos: usize,
        tokens: &mut Vec<InlineToken>,
        location: SourceLocation,
    ) -> Option<usize> {
        let bytes = text.as_bytes();

        let mut local_start = pos;
        while local_start > 0 {
            let b = bytes[local_start - 1];
            if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'+' | b'-') {
                local_start -= 1;
            } else {
                break;
            }
        }
        if local_start == pos {
            return None;
        }

        let mut end = pos + 1;
        let mut last_dot = None;
        while end < bytes.len() {
            let b = bytes[end];
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
                end += 1;
            } else if b == b'.' {
                last_dot = Some(end);
                end += 1;
            } else {
                break;
            }
        }
        // Domain needs a dot, and cannot end with punctuation.
        last_dot?;
        while end > pos + 1 && matches!(bytes[end - 1], b'.' | b'-' | b'_') {
            end -= 1;
        }
        if end <= pos + 1 || !text[pos + 1..end].contains('.') {
            return None;
        }

        let local = text[local_start..pos].to_string();
        if !peel_text_suffix(tokens, &local) {
            return None;
        }

        let address = format!("{}{}", local, &text[pos..end]);
        tokens.push(InlineToken::Node(Inline::Link(Link {
            location,
            url: format!("mailto:{}", address),
            title: None,
            children: vec![Inline::Text(Text { location, content: address })],
        })));
        Some(end)
    }

    // =====================================================================
    // Roles and math
    // =====================================================================

    fn try_parse_role(
        &self,
        text: &str,
        pos: usize,
        location: SourceLocation,
    ) -> Option<(Inline, usize)> {
        if text.as_bytes()[pos] != b'{' {
            return None;
        }

        let brace_close = text[pos + 1..].find('}').map(|i| pos + 1 + i)?;
        let role_name = text[pos + 1..brace_close].trim();

        if role_name.is_empty()
            || !role_name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }

        if text.as_bytes().get(brace_close + 1) != Some(&b'`') {
            return None;
        }

        let content_start = brace_close + 2;
        let backtick_close = text[content_start..].find('`').map(|i| content_start + i)?;
        let content = &text[content_start..backtick_close];

        // Role content is a single-line raw string.
        if content.contains('\n') {
            return None;
        }

        let node = match self
            .options
            .parse
            .roles
            .as_ref()
            .and_then(|registry| registry.get(role_name))
        {
            Some(handler) => handler.parse(role_name, content, location),
            None => Role {
                location,
                name: role_name.to_string(),
                content: content.to_string(),
                target: None,
            },
        };

        Some((Inline::Role(node), backtick_close + 1))
    }
}

/// `$…$` inline math; `$$` belongs to block math, and content may not be
/// empty or space-padded on both ends.
fn try_parse_math(text: &str, pos: usize, location: SourceLocation) -> Option<(Inline, usize)> {
    let bytes = text.as_bytes();
    if bytes[pos] != b'$' || bytes.get(pos + 1) == Some(&b'$') {
        return None;
    }

    let content_start = pos + 1;
    let close = text[content_start..].find('$').map(|i| content_start + i)?;
    let content = &text[content_start..close];

    if content.is_empty() {
        return None;
    }
    if content.len() > 1 && content.starts_with(' ') && content.ends_with(' ') {
        return None;
    }

    Some((
        Inline::Math(Math {
            location,
            content: content.to_string(),
        }),
        close + 1,
    ))
}

// =========================================================================
// Tokenizer helpers
// =========================================================================

/// Finds a run of exactly `backtick_count` backticks at or after `start`.
fn find_code_span_close(text: &str, start: usize, backtick_count: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = start;
    loop {
        let idx = text[pos..].find('`').map(|i| pos + i)?;
        let mut count = 0;
        let mut check = idx;
        while check < bytes.len() && bytes[check] == b'`' {
            count += 1;
            check += 1;
        }
        if count == backtick_count {
            return Some(idx);
        }
        pos = check;
    }
}

/// Strips trailing spaces from the last text token (before a line break),
/// dropping the token entirely if only spaces remain.
fn strip_trailing_spaces(tokens: &mut Vec<InlineToken>) {
    if let Some(InlineToken::Text(content)) = tokens.last_mut() {
        let stripped = content.trim_end_matches(' ');
        if stripped.is_empty() {
            tokens.pop();
        } else {
            let new_len = stripped.len();
            content.truncate(new_len);
        }
    }
}

/// Removes `suffix` from the end of a trailing text token, for autolink
/// triggers whose prefix was already consumed as text. Returns false when
/// the layout does not allow it.
fn peel_text_suffix(tokens: &mut Vec<InlineToken>, suffix: &str) -> bool {
    if suffix.is_empty() {
        return true;
    }
    match tokens.last_mut() {
        Some(InlineToken::Text(content)) if content.ends_with(suffix) => {
            let new_len = content.len() - suffix.len();
            content.truncate(new_len);
            if content.is_empty() {
                tokens.pop();
            }
            true
        }
        _ => false,
    }
}

/// Where a bare autolink ends: up to whitespace or `<`, with trailing
/// punctuation and unbalanced closing parens trimmed (GFM rules).
fn bare_link_end(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut end = start;
    while end < bytes.len() {
        let b = bytes[end];
        if b == b'<' || b.is_ascii_whitespace() {
            break;
        }
        end += 1;
    }

    loop {
        if end <= start {
            break;
        }
        let b = bytes[end - 1];
        match b {
            b'?' | b'!' | b'.' | b',' | b':' | b'*' | b'_' | b'~' | b'\'' | b'"' | b';' => {
                end -= 1;
            }
            b')' => {
                let opens = text[start..end].matches('(').count();
                let closes = text[start..end].matches(')').count();
                if closes > opens {
                    end -= 1;
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    end
}

fn flatten_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(&t.content),
            Inline::CodeSpan(c) => out.push_str(&c.code),
            Inline::Math(m) => out.push_str(&m.content),
            Inline::Role(r) => out.push_str(&r.content),
            Inline::Image(i) => out.push_str(&i.alt),
            Inline::LineBreak(_) | Inline::SoftBreak(_) => out.push(' '),
            Inline::Emphasis(n) => flatten_plain_text(&n.children, out),
            Inline::Strong(n) => flatten_plain_text(&n.children, out),
            Inline::Strikethrough(n) => flatten_plain_text(&n.children, out),
            Inline::Link(n) => flatten_plain_text(&n.children, out),
            Inline::HtmlInline(_) | Inline::FootnoteRef(_) => {}
        }
    }
}

// =========================================================================
// Link grammar helpers
// =========================================================================

/// Finds the closing `]` while respecting code spans, HTML tags (so a `]`
/// inside an attribute does not count), escapes, and nested brackets.
fn find_closing_bracket(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut pos = start;
    let mut bracket_depth = 0usize;

    while pos < len {
        match bytes[pos] {
            b'`' => {
                let mut count = 0;
                while pos < len && bytes[pos] == b'`' {
                    count += 1;
                    pos += 1;
                }
                match find_code_span_close(text, pos, count) {
                    Some(idx) => {
                        let mut check = idx;
                        while check < len && bytes[check] == b'`' {
                            check += 1;
                        }
                        pos = check;
                    }
                    None => {}
                }
            }
            b'<' => {
                let new_pos = skip_html_tag(text, pos);
                if new_pos > pos {
                    pos = new_pos;
                } else {
                    pos += 1;
                }
            }
            b'[' => {
                bracket_depth += 1;
                pos += 1;
            }
            b']' => {
                if bracket_depth > 0 {
                    bracket_depth -= 1;
                    pos += 1;
                } else {
                    return Some(pos);
                }
            }
            b'\\' => {
                pos += 2;
            }
            _ => pos += 1,
        }
    }

    None
}

/// Skips over one HTML tag, honoring quoted attribute values. Returns the
/// original position if the bytes do not form a tag.
fn skip_html_tag(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let len = bytes.len();
    if pos >= len || bytes[pos] != b'<' {
        return pos;
    }

    let mut p = pos + 1;
    if p < len && bytes[p] == b'/' {
        p += 1;
    }
    if p >= len || !bytes[p].is_ascii_alphabetic() {
        return pos;
    }
    while p < len && (bytes[p].is_ascii_alphanumeric() || matches!(bytes[p], b'-' | b'_' | b':')) {
        p += 1;
    }

    while p < len {
        match bytes[p] {
            b'>' => return p + 1,
            b'"' => {
                p += 1;
                while p < len && bytes[p] != b'"' {
                    p += 1;
                }
                if p < len {
                    p += 1;
                }
            }
            b'\'' => {
                p += 1;
                while p < len && bytes[p] != b'\'' {
                    p += 1;
                }
                if p < len {
                    p += 1;
                }
            }
            _ => p += 1,
        }
    }

    pos
}

/// Parses `(url "title")` starting at the opening paren.
fn parse_inline_link(text: &str, pos: usize) -> Option<(String, Option<String>, usize)> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    if pos >= len || bytes[pos] != b'(' {
        return None;
    }

    let mut p = pos + 1;
    while p < len && matches!(bytes[p], b' ' | b'\t' | b'\n' | b'\r') {
        p += 1;
    }

    if p < len && bytes[p] == b')' {
        return Some((String::new(), None, p + 1));
    }

    let (url, mut p) = parse_link_destination(text, p)?;

    while p < len && matches!(bytes[p], b' ' | b'\t' | b'\n' | b'\r') {
        p += 1;
    }
    if p >= len {
        return None;
    }

    if bytes[p] == b')' {
        return Some((url, None, p + 1));
    }

    let (title, mut p) = parse_link_title(text, p);

    while p < len && matches!(bytes[p], b' ' | b'\t' | b'\n' | b'\r') {
        p += 1;
    }
    if p >= len || bytes[p] != b')' {
        return None;
    }

    Some((url, title, p + 1))
}

/// Angle-bracketed (`<…>`) or bare destination with balanced parens.
fn parse_link_destination(text: &str, pos: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut p = pos;

    while p < len && matches!(bytes[p], b' ' | b'\t') {
        p += 1;
    }
    if p >= len {
        return None;
    }

    if bytes[p] == b'<' {
        p += 1;
        let start = p;
        while p < len {
            match bytes[p] {
                b'>' => return Some((strings::process_escapes(&text[start..p]), p + 1)),
                b'\n' | b'\r' | b'<' => return None,
                b'\\' if p + 1 < len => p += 2,
                _ => p += 1,
            }
        }
        return None;
    }

    let start = p;
    let mut paren_depth = 0i32;
    while p < len {
        let b = bytes[p];
        if matches!(b, b' ' | b'\t' | b'\n' | b'\r') || b < 0x20 {
            break;
        }
        match b {
            b'(' => {
                paren_depth += 1;
                p += 1;
            }
            b')' => {
                if paren_depth > 0 {
                    paren_depth -= 1;
                    p += 1;
                } else {
                    break;
                }
            }
            b'\\' if p + 1 < len && ispunct(bytes[p + 1]) => p += 2,
            _ => p += 1,
        }
    }

    // An empty destination is a valid (empty) URL.
    Some((strings::process_escapes(&text[start..p]), p))
}

/// Optional quoted title; `(None, original_pos)` when absent.
fn parse_link_title(text: &str, pos: usize) -> (Option<String>, usize) {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut p = pos;

    while p < len && matches!(bytes[p], b' ' | b'\t' | b'\n' | b'\r') {
        p += 1;
    }
    if p >= len {
        return (None, pos);
    }

    let closer = match bytes[p] {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return (None, pos),
    };

    p += 1;
    let start = p;
    while p < len {
        let b = bytes[p];
        if b == closer {
            return (Some(strings::process_escapes(&text[start..p])), p + 1);
        }
        if b == b'\\' && p + 1 < len {
            p += 2;
            continue;
        }
        p += 1;
    }

    (None, start.saturating_sub(1))
}

// =========================================================================
// Inline HTML
// =========================================================================

fn try_parse_html_inline(
    text: &str,
    pos: usize,
    location: SourceLocation,
) -> Option<(Inline, usize)> {
    if text.as_bytes()[pos] != b'<' {
        return None;
    }

    if let Some((html, end_pos)) = parse_html_open_tag(text, pos) {
        return Some((Inline::HtmlInline(HtmlInline { location, html }), end_pos));
    }

    // CDATA may contain '>', so it gets its own terminator search.
    if text[pos..].starts_with("<![CDATA[") {
        let cdata_end = text[pos..].find("]]>").map(|i| pos + i)?;
        let html = text[pos..cdata_end + 3].to_string();
        return Some((Inline::HtmlInline(HtmlInline { location, html }), cdata_end + 3));
    }

    if text[pos..].starts_with("<!--") {
        let comment_end = text[pos + 4..].find("-->").map(|i| pos + 4 + i)?;
        let html = text[pos..comment_end + 3].to_string();
        return Some((Inline::HtmlInline(HtmlInline { location, html }), comment_end + 3));
    }

    let close = text[pos + 1..].find('>').map(|i| pos + 1 + i)?;
    let html = &text[pos..close + 1];
    if html.len() < 3 {
        return None;
    }

    let inner = &html[1..html.len() - 1];
    if inner.is_empty() {
        return None;
    }

    // Processing instruction.
    if inner.starts_with('?') && inner.ends_with('?') {
        return Some((
            Inline::HtmlInline(HtmlInline { location, html: html.to_string() }),
            close + 1,
        ));
    }

    // Declaration.
    if inner.starts_with('!')
        && inner.len() > 1
        && inner.as_bytes()[1].is_ascii_alphabetic()
    {
        return Some((
            Inline::HtmlInline(HtmlInline { location, html: html.to_string() }),
            close + 1,
        ));
    }

    // Closing tag.
    if let Some(tag_name) = inner.strip_prefix('/') {
        let tag_name = tag_name.trim_end();
        let mut chars = tag_name.chars();
        let valid = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
            }
            _ => false,
        };
        if valid {
            return Some((
                Inline::HtmlInline(HtmlInline { location, html: html.to_string() }),
                close + 1,
            ));
        }
    }

    None
}

/// Parses an open tag with the strict CommonMark attribute grammar.
fn parse_html_open_tag(text: &str, pos: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    if pos >= len || bytes[pos] != b'<' {
        return None;
    }

    let mut i = pos + 1;
    if i >= len || !bytes[i].is_ascii_alphabetic() {
        return None;
    }

    while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }

    // Tag name must be followed by whitespace, '/', or '>'.
    if i < len && !matches!(bytes[i], b' ' | b'\t' | b'\n' | b'/' | b'>') {
        return None;
    }

    while i < len {
        match bytes[i] {
            b'>' => return Some((text[pos..i + 1].to_string(), i + 1)),
            b'/' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    return Some((text[pos..i + 2].to_string(), i + 2));
                }
                return None;
            }
            b' ' | b'\t' | b'\n' => {
                i += 1;
            }
            c if c.is_ascii_alphabetic() || c == b'_' || c == b':' => {
                // Attribute name.
                i += 1;
                while i < len
                    && (bytes[i].is_ascii_alphanumeric()
                        || matches!(bytes[i], b'_' | b'.' | b':' | b'-'))
                {
                    i += 1;
                }

                let ws_start = i;
                while i < len && matches!(bytes[i], b' ' | b'\t' | b'\n') {
                    i += 1;
                }
                if i >= len {
                    return None;
                }

                if bytes[i] == b'=' {
                    i += 1;
                    while i < len && matches!(bytes[i], b' ' | b'\t' | b'\n') {
                        i += 1;
                    }
                    if i >= len {
                        return None;
                    }

                    match bytes[i] {
                        b'"' => {
                            i += 1;
                            while i < len && bytes[i] != b'"' {
                                i += 1;
                            }
                            if i >= len {
                                return None;
                            }
                            i += 1;
                        }
                        b'\'' => {
                            i += 1;
                            while i < len && bytes[i] != b'\'' {
                                i += 1;
                            }
                            if i >= len {
                                return None;
                            }
                            i += 1;
                        }
                        b'=' | b'<' | b'>' | b'`' => return None,
                        _ => {
                            let value_start = i;
                            while i < len
                                && !matches!(
                                    bytes[i],
                                    b'"' | b'\'' | b'=' | b'<' | b'>' | b'`' | b' ' | b'\t' | b'\n'
                                )
                            {
                                i += 1;
                            }
                            if i == value_start {
                                return None;
                            }
                        }
                    }

                    // Next attribute needs separation.
                    if i < len && !matches!(bytes[i], b' ' | b'\t' | b'\n' | b'/' | b'>') {
                        return None;
                    }
                } else if ws_start == i && !matches!(bytes[i], b'/' | b'>') {
                    // Boolean attribute without separating whitespace.
                    return None;
                }
            }
            _ => return None,
        }
    }

    None
}

fn uri_autolink(inner: &str) -> Option<String> {
    let bytes = inner.as_bytes();
    let colon = inner.find(':')?;
    if colon < 2 || colon > 32 {
        return None;
    }
    if !bytes[0].is_ascii_alphabetic() {
        return None;
    }
    if !bytes[1..colon]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'-'))
    {
        return None;
    }
    if inner[colon + 1..].bytes().any(|b| matches!(b, b'<' | b'>')) {
        return None;
    }

    // Only backslash, and square brackets get percent-encoded here; the
    // renderer finishes the job.
    let mut url = String::with_capacity(inner.len());
    for c in inner.chars() {
        match c {
            '\\' => url.push_str("%5C"),
            '[' => url.push_str("%5B"),
            ']' => url.push_str("%5D"),
            _ => url.push(c),
        }
    }
    Some(url)
}

fn is_email_address(inner: &str) -> bool {
    let at = match inner.find('@') {
        Some(i) => i,
        None => return false,
    };
    let (local, domain) = (&inner[..at], &inner[at + 1..]);

    if local.is_empty()
        || !local.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'.' | b'!'
                        | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'/'
                        | b'='
                        | b'?'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'{'
                        | b'|'
                        | b'}'
                        | b'~'
                        | b'-'
                )
        })
    {
        return false;
    }

    if domain.is_empty() {
        return false;
    }
    for label in domain.split('.') {
        let bytes = label.as_bytes();
        if bytes.is_empty() || bytes.len() > 63 {
            return false;
        }
        if !bytes[0].is_ascii_alphanumeric()
            || !bytes[bytes.len() - 1].is_ascii_alphanumeric()
            || !bytes.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return false;
        }
    }
    true
}

// =========================================================================
// Phase 2: delimiter matching
// =========================================================================

/// Runs the delimiter-stack algorithm, recording matches externally.
/// Implements the flanking-derived open/close flags computed in phase 1
/// and the sum-mod-3 constraint.
pub(crate) fn process_emphasis(tokens: &[InlineToken]) -> MatchRegistry {
    let mut registry = MatchRegistry::default();

    // Per-char stacks of active opener indices.
    let mut star_stack: SmallVec<[usize; 8]> = SmallVec::new();
    let mut under_stack: SmallVec<[usize; 8]> = SmallVec::new();
    let mut tilde_stack: SmallVec<[usize; 8]> = SmallVec::new();

    fn stack_for<'a>(
        ch: u8,
        star: &'a mut SmallVec<[usize; 8]>,
        under: &'a mut SmallVec<[usize; 8]>,
        tilde: &'a mut SmallVec<[usize; 8]>,
    ) -> &'a mut SmallVec<[usize; 8]> {
        match ch {
            b'*' => star,
            b'_' => under,
            _ => tilde,
        }
    }

    let mut closer_idx = 0;
    while closer_idx < tokens.len() {
        let (ch, run_length, can_open, can_close) = match tokens[closer_idx] {
            InlineToken::Delimiter { ch, run_length, can_open, can_close } => {
                (ch, run_length, can_open, can_close)
            }
            _ => {
                closer_idx += 1;
                continue;
            }
        };

        if can_close && registry.is_active(closer_idx) {
            let mut found_opener = false;

            let stack_snapshot: Vec<usize> = {
                let stack = stack_for(ch, &mut star_stack, &mut under_stack, &mut tilde_stack);
                stack.iter().copied().collect()
            };

            for &opener_idx in stack_snapshot.iter().rev() {
                let (op_run, op_open, op_close) = match tokens[opener_idx] {
                    InlineToken::Delimiter { run_length, can_open, can_close, .. } => {
                        (run_length, can_open, can_close)
                    }
                    _ => continue,
                };

                if !registry.is_active(opener_idx) {
                    continue;
                }

                let opener_remaining = registry.remaining(opener_idx, op_run);
                let closer_remaining = registry.remaining(closer_idx, run_length);

                // Rule of 3: when either side can both open and close,
                // the remaining counts must not sum to a multiple of 3
                // unless one side individually is.
                let both_roles = (op_open && op_close) || (can_open && can_close);
                if both_roles
                    && (opener_remaining + closer_remaining) % 3 == 0
                    && (opener_remaining % 3 != 0 || closer_remaining % 3 != 0)
                {
                    continue;
                }

                found_opener = true;
                let use_count = if opener_remaining >= 2 && closer_remaining >= 2 { 2 } else { 1 };
                registry.record_match(opener_idx, closer_idx, use_count);

                // Everything strictly between opener and closer drops out.
                for mid_idx in opener_idx + 1..closer_idx {
                    if matches!(tokens[mid_idx], InlineToken::Delimiter { .. }) {
                        registry.deactivate(mid_idx);
                    }
                }
                for stack in [&mut star_stack, &mut under_stack, &mut tilde_stack] {
                    while stack.last().map(|&i| i > opener_idx).unwrap_or(false) {
                        stack.pop();
                    }
                }

                if registry.remaining(opener_idx, op_run) == 0 {
                    registry.deactivate(opener_idx);
                    let stack = stack_for(ch, &mut star_stack, &mut under_stack, &mut tilde_stack);
                    if stack.last() == Some(&opener_idx) {
                        stack.pop();
                    }
                }

                if registry.remaining(closer_idx, run_length) == 0 {
                    registry.deactivate(closer_idx);
                }

                break;
            }

            if !found_opener {
                if can_open {
                    let stack = stack_for(ch, &mut star_stack, &mut under_stack, &mut tilde_stack);
                    stack.push(closer_idx);
                } else {
                    registry.deactivate(closer_idx);
                }
                closer_idx += 1;
            } else if registry.remaining(closer_idx, run_length) > 0 {
                // The closer still has unmatched delimiters: keep looking
                // from the same position.
            } else {
                closer_idx += 1;
            }
        } else if can_open {
            let stack = stack_for(ch, &mut star_stack, &mut under_stack, &mut tilde_stack);
            stack.push(closer_idx);
            closer_idx += 1;
        } else {
            closer_idx += 1;
        }
    }

    registry
}

// =========================================================================
// Phase 3: AST construction
// =========================================================================

/// Builds the inline AST over `tokens[start..end]` using the registry.
/// Delimiters with matches wrap their inner span recursively; unmatched
/// delimiter characters fall out as literal text.
pub(crate) fn build_inline_ast(
    tokens: &[InlineToken],
    registry: &MatchRegistry,
    location: SourceLocation,
    start: usize,
    end: usize,
) -> Vec<Inline> {
    let mut result: Vec<Inline> = Vec::new();
    let mut idx = start;

    while idx < end {
        match &tokens[idx] {
            InlineToken::Text(content) => {
                result.push(Inline::Text(Text { location, content: content.clone() }));
                idx += 1;
            }
            InlineToken::CodeSpan(code) => {
                result.push(Inline::CodeSpan(CodeSpan { location, code: code.clone() }));
                idx += 1;
            }
            InlineToken::Node(node) => {
                result.push(node.clone());
                idx += 1;
            }
            InlineToken::HardBreak => {
                result.push(Inline::LineBreak(LineBreak { location }));
                idx += 1;
            }
            InlineToken::SoftBreak => {
                result.push(Inline::SoftBreak(SoftBreak { location }));
                idx += 1;
            }
            InlineToken::Delimiter { ch, run_length, .. } => {
                let delim_char = *ch as char;
                let original_count = *run_length;

                let mut matches = registry.matches_for_opener(idx);
                matches.sort_by_key(|m| m.closer);

                if !matches.is_empty() && matches[0].closer > idx {
                    let consumed: usize = matches.iter().map(|m| m.count).sum();
                    let opener_remaining = original_count.saturating_sub(consumed);

                    if opener_remaining > 0 {
                        result.push(Inline::Text(Text {
                            location,
                            content: delim_char.to_string().repeat(opener_remaining),
                        }));
                    }

                    let unique_closers: FxHashSet<usize> =
                        matches.iter().map(|m| m.closer).collect();

                    if unique_closers.len() == 1 {
                        // All matches share one closer (e.g. ***text***):
                        // wrap innermost-out.
                        let closer_idx = matches[0].closer;

                        let closer_remaining = match tokens.get(closer_idx) {
                            Some(InlineToken::Delimiter { run_length, .. }) => {
                                registry.remaining(closer_idx, *run_length)
                            }
                            _ => 0,
                        };

                        let mut children =
                            build_inline_ast(tokens, registry, location, idx + 1, closer_idx);

                        for m in &matches {
                            let node = wrap_emphasis(*ch, m.count, location, children);
                            children = vec![node];
                        }
                        result.extend(children);

                        if closer_remaining > 0 {
                            result.push(Inline::Text(Text {
                                location,
                                content: delim_char.to_string().repeat(closer_remaining),
                            }));
                        }

                        idx = closer_idx + 1;
                    } else {
                        // One opener, several closers (e.g. __foo_ bar_):
                        // each closer wraps the accumulated content plus
                        // its own segment.
                        let outermost_closer = matches.last().expect("nonempty").closer;

                        let outermost_remaining = match tokens.get(outermost_closer) {
                            Some(InlineToken::Delimiter { run_length, .. }) => run_length
                                .saturating_sub(matches.last().expect("nonempty").count),
                            _ => 0,
                        };

                        let mut accumulated: Vec<Inline> = Vec::new();
                        let mut prev_boundary = idx + 1;

                        for m in &matches {
                            let mut combined = accumulated;
                            if prev_boundary < m.closer {
                                combined.extend(build_inline_ast(
                                    tokens,
                                    registry,
                                    location,
                                    prev_boundary,
                                    m.closer,
                                ));
                            }
                            let node = wrap_emphasis(*ch, m.count, location, combined);
                            accumulated = vec![node];
                            prev_boundary = m.closer + 1;
                        }

                        result.extend(accumulated);

                        if outermost_remaining > 0 {
                            result.push(Inline::Text(Text {
                                location,
                                content: delim_char.to_string().repeat(outermost_remaining),
                            }));
                        }

                        idx = outermost_closer + 1;
                    }
                } else {
                    let remaining = registry.remaining(idx, original_count);
                    if remaining > 0 {
                        result.push(Inline::Text(Text {
                            location,
                            content: delim_char.to_string().repeat(remaining),
                        }));
                    }
                    idx += 1;
                }
            }
        }
    }

    result
}

fn wrap_emphasis(ch: u8, match_count: usize, location: SourceLocation, children: Vec<Inline>) -> Inline {
    if ch == b'~' {
        Inline::Strikethrough(Strikethrough { location, children })
    } else if match_count == 2 {
        Inline::Strong(Strong { location, children })
    } else {
        Inline::Emphasis(Emphasis { location, children })
    }
}
