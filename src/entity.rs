//! Entity and numeric character reference decoding (CommonMark §2.5).
//!
//! Named entities are resolved against a sorted table generated at build
//! time from the `entities` crate; lookup is a binary search.

use std::borrow::Cow;
use std::char;
use std::cmp::min;

use crate::ctype::isdigit;

include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));

pub const ENTITY_MIN_LENGTH: usize = 2;
pub const ENTITY_MAX_LENGTH: usize = 31;

fn isxdigit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

/// Decodes one reference at the start of `text`, which begins just past a
/// `&`. Returns the decoded characters and the byte count consumed,
/// including the terminating `;`.
pub fn unescape(text: &str) -> Option<(String, usize)> {
    let bytes = text.as_bytes();

    if bytes.len() >= 3 && bytes[0] == b'#' {
        let mut codepoint: u32 = 0;
        let mut i = 0;

        let num_digits = if isdigit(bytes[1]) {
            i = 1;
            while i < bytes.len() && isdigit(bytes[i]) {
                codepoint = (codepoint * 10) + (bytes[i] as u32 - '0' as u32);
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 1
        } else if bytes[1] == b'x' || bytes[1] == b'X' {
            i = 2;
            while i < bytes.len() && isxdigit(bytes[i]) {
                codepoint = (codepoint * 16) + ((bytes[i] as u32 | 32) % 39 - 9);
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 2
        } else {
            0
        };

        // Decimal refs take 1-7 digits, hex refs 1-6.
        let max_digits = if isdigit(bytes[1]) { 7 } else { 6 };
        if num_digits >= 1 && num_digits <= max_digits && i < bytes.len() && bytes[i] == b';' {
            if codepoint == 0 || codepoint > 0x10_FFFF {
                codepoint = 0xFFFD;
            }
            return Some((
                char::from_u32(codepoint).unwrap_or('\u{FFFD}').to_string(),
                i + 1,
            ));
        }
        return None;
    }

    let size = min(bytes.len(), ENTITY_MAX_LENGTH);
    for i in ENTITY_MIN_LENGTH..size {
        if bytes[i] == b' ' {
            return None;
        }

        if bytes[i] == b';' {
            return lookup(&text[..i]).map(|e| (e.to_string(), i + 1));
        }
    }

    None
}

fn lookup(name: &str) -> Option<&'static str> {
    entitydata::NAMED_ENTITIES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|idx| entitydata::NAMED_ENTITIES[idx].1)
}

/// Replaces every valid entity reference in `src` with its expansion.
pub fn unescape_html(src: &str) -> Cow<'_, str> {
    let first = match src.find('&') {
        Some(i) => i,
        None => return Cow::Borrowed(src),
    };

    let mut out = String::with_capacity(src.len());
    out.push_str(&src[..first]);
    let mut i = first;

    while i < src.len() {
        debug_assert_eq!(src.as_bytes()[i], b'&');
        i += 1;
        match unescape(&src[i..]) {
            Some((expansion, consumed)) => {
                out.push_str(&expansion);
                i += consumed;
            }
            None => out.push('&'),
        }
        match src[i..].find('&') {
            Some(next) => {
                out.push_str(&src[i..i + next]);
                i += next;
            }
            None => {
                out.push_str(&src[i..]);
                break;
            }
        }
    }

    Cow::Owned(out)
}
