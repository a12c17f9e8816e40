use super::*;

#[test]
fn simple_quote() {
    html(
        concat!("> line one\n", "> line two\n", "\n", "para\n"),
        concat!(
            "<blockquote>\n",
            "<p>line one\nline two</p>\n",
            "</blockquote>\n",
            "<p>para</p>\n"
        ),
    );
}

#[test]
fn multi_paragraph_quote() {
    html(
        concat!("> foo\n", ">\n", "> bar\n"),
        concat!(
            "<blockquote>\n",
            "<p>foo</p>\n",
            "<p>bar</p>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn lazy_continuation() {
    html(
        concat!("> foo\n", "bar\n"),
        concat!("<blockquote>\n", "<p>foo\nbar</p>\n", "</blockquote>\n"),
    );
}

#[test]
fn lazy_continuation_not_for_code() {
    // A blank line without `>` ends the quote; following indented content
    // is its own block.
    html(
        concat!("> foo\n", "\n", "    code\n"),
        concat!(
            "<blockquote>\n",
            "<p>foo</p>\n",
            "</blockquote>\n",
            "<pre><code>code\n</code></pre>\n"
        ),
    );
}

#[test]
fn nested_quote() {
    html(
        "> > nested\n",
        concat!(
            "<blockquote>\n",
            "<blockquote>\n",
            "<p>nested</p>\n",
            "</blockquote>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn heading_in_quote() {
    html(
        "> # Heading\n",
        concat!(
            "<blockquote>\n",
            "<h1 id=\"heading\">Heading</h1>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn fence_in_quote() {
    html(
        concat!("> ```\n", "> code\n", "> ```\n"),
        concat!(
            "<blockquote>\n",
            "<pre><code>code\n",
            "</code></pre>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn list_in_quote() {
    html(
        concat!("> - a\n", "> - b\n"),
        concat!(
            "<blockquote>\n",
            "<ul>\n",
            "<li>a</li>\n",
            "<li>b</li>\n",
            "</ul>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn empty_quote() {
    html(">\n", "<blockquote>\n</blockquote>\n");
}

#[test]
fn setext_suppressed_across_lazy_continuation() {
    // The underline arrives via lazy continuation, so no heading forms.
    html(
        concat!("> foo\n", "===\n"),
        concat!("<blockquote>\n", "<p>foo\n===</p>\n", "</blockquote>\n"),
    );
}

#[test]
fn blank_line_ends_quote() {
    html(
        concat!("> a\n", "\n", "> b\n"),
        concat!(
            "<blockquote>\n",
            "<p>a</p>\n",
            "</blockquote>\n",
            "<blockquote>\n",
            "<p>b</p>\n",
            "</blockquote>\n"
        ),
    );
}
