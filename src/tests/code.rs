use super::*;
use crate::nodes::Block;
use crate::parse;

#[test]
fn codefence() {
    html(
        concat!("``` rust yum\n", "fn main<'a>();\n", "```\n"),
        concat!(
            "<pre><code class=\"language-rust\">fn main&lt;'a&gt;();\n",
            "</code></pre>\n"
        ),
    );
}

#[test]
fn codefence_tilde() {
    html(
        concat!("~~~\n", "<div>\n", "~~~\n"),
        concat!("<pre><code>&lt;div&gt;\n", "</code></pre>\n"),
    );
}

#[test]
fn codefence_zero_copy() {
    let source = "```python\nx = 1\n```\n";
    let doc = parse(source, &Options::default());
    match &doc.children[0] {
        Block::FencedCode(code) => {
            assert_eq!(code.info.as_deref(), Some("python"));
            assert_eq!(code.marker, b'`');
            assert!(code.content_override.is_none());
            assert_eq!(code.get_code(source), "x = 1\n");
            assert!(code.source_start <= code.source_end);
            assert!(code.source_end <= source.len());
        }
        other => panic!("expected fenced code, got {:?}", other),
    }

    html(
        source,
        "<pre><code class=\"language-python\">x = 1\n</code></pre>\n",
    );
}

#[test]
fn codefence_unterminated() {
    let source = "```\ncontent\n";
    let doc = parse(source, &Options::default());
    match &doc.children[0] {
        Block::FencedCode(code) => {
            assert_eq!(code.get_code(source), "content\n");
            assert_eq!(code.source_end, source.len());
        }
        other => panic!("expected fenced code, got {:?}", other),
    }
    html(source, "<pre><code>content\n</code></pre>\n");
}

#[test]
fn codefence_backtick_info_rejected() {
    // A backtick fence may not have a backtick in its info string.
    html("``` a`b\n", "<p>``` a`b</p>\n");
}

#[test]
fn codefence_closing_needs_enough_ticks() {
    html(
        concat!("````\n", "```\n", "````\n"),
        concat!("<pre><code>```\n", "</code></pre>\n"),
    );
}

#[test]
fn indented_code() {
    html("    code\n", "<pre><code>code\n</code></pre>\n");
}

#[test]
fn indented_code_interior_blank() {
    html(
        concat!("    a\n", "\n", "    b\n"),
        concat!("<pre><code>a\n", "\n", "b\n", "</code></pre>\n"),
    );
}

#[test]
fn indented_code_preserves_extra_indent() {
    html(
        "        deep\n",
        "<pre><code>    deep\n</code></pre>\n",
    );
}

#[test]
fn fenced_code_in_list_item() {
    html(
        concat!("- ```\n", "  x\n", "  ```\n"),
        concat!(
            "<ul>\n",
            "<li>\n",
            "<pre><code>x\n",
            "</code></pre>\n",
            "</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn tab_expands_to_code_indent() {
    html("\tfoo\n", "<pre><code>foo\n</code></pre>\n");
}
