//! String utilities shared by the lexer, parser, and renderers.

use std::borrow::Cow;

use crate::character_set::character_set;
use crate::ctype::ispunct;
use crate::entity;

/// Removes the backslash from `\` + ASCII-punctuation pairs, leaving other
/// backslashes alone. Used for fence info strings, link destinations, and
/// titles.
pub fn process_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii() && ispunct(next as u8) {
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Unescapes only the bracket and backslash escapes inside a link label.
/// Other escapes stay literal so `[foo\!]` does not match `[foo!]`.
fn unescape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if next == '\\' || next == '[' || next == ']' => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Normalizes a link reference label for matching: strip, collapse runs of
/// spaces/tabs/newlines to a single space, Unicode case fold.
pub fn normalize_label(label: &str) -> String {
    let unescaped = unescape_label(label);
    let mut collapsed = String::with_capacity(unescaped.len());
    let mut last_was_ws = false;
    for c in unescaped.trim().chars() {
        if c == ' ' || c == '\t' || c == '\n' {
            if !last_was_ws {
                collapsed.push(' ');
            }
            last_was_ws = true;
        } else {
            collapsed.push(c);
            last_was_ws = false;
        }
    }
    caseless::default_case_fold_str(&collapsed)
}

/// Escapes `&`, `<`, `>`, and `"`. Single quotes are left alone, as
/// CommonMark output does not require escaping them.
pub fn escape_html(output: &mut String, s: &str) {
    const NEEDS_ESCAPE: [bool; 256] = character_set!(b"&<>\"");

    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let org = i;
        while i < bytes.len() && !NEEDS_ESCAPE[bytes[i] as usize] {
            i += 1;
        }
        if i > org {
            output.push_str(&s[org..i]);
        }
        if i >= bytes.len() {
            break;
        }
        match bytes[i] {
            b'&' => output.push_str("&amp;"),
            b'<' => output.push_str("&lt;"),
            b'>' => output.push_str("&gt;"),
            _ => output.push_str("&quot;"),
        }
        i += 1;
    }
}

pub fn escape_html_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_html(&mut out, s);
    out
}

/// Prepares a link destination for the `href`/`src` attribute: decode
/// entity references, then percent-encode every byte outside the safe set.
/// The result still needs [`escape_html`] when written into an attribute.
pub fn encode_url(url: &str) -> String {
    const HREF_SAFE: [bool; 256] = character_set!(
        b"/:?#[]@!$&'()*+,;=-_.~%",
        b"abcdefghijklmnopqrstuvwxyz",
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
    );

    let decoded = entity::unescape_html(url);
    let bytes = decoded.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if HREF_SAFE[b as usize] {
            out.push(b as char);
        } else {
            out.push('%');
            out.push_str(&format!("{:02X}", b));
        }
    }
    out
}

/// Expands tabs to the next 4-column stop. `start_col` is 1-indexed.
pub fn expand_tabs(text: &str, start_col: usize) -> Cow<'_, str> {
    if !text.contains('\t') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 3);
    let mut col = start_col;
    for c in text.chars() {
        if c == '\t' {
            let expansion = 4 - ((col - 1) % 4);
            for _ in 0..expansion {
                out.push(' ');
            }
            col += expansion;
        } else {
            out.push(c);
            col += 1;
        }
    }
    Cow::Owned(out)
}

pub fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t' || c == '\n' || c == '\r')
}
