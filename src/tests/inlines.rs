use super::*;

#[test]
fn emphasis() {
    html("*foo bar*\n", "<p><em>foo bar</em></p>\n");
    html("_foo bar_\n", "<p><em>foo bar</em></p>\n");
}

#[test]
fn strong() {
    html("**foo bar**\n", "<p><strong>foo bar</strong></p>\n");
    html("__foo bar__\n", "<p><strong>foo bar</strong></p>\n");
}

#[test]
fn em_strong_nesting() {
    html("***both***\n", "<p><em><strong>both</strong></em></p>\n");
    html(
        "*foo**bar**baz*\n",
        "<p><em>foo<strong>bar</strong>baz</em></p>\n",
    );
}

#[test]
fn partial_delimiter_runs() {
    html("**foo*\n", "<p>*<em>foo</em></p>\n");
    html("*foo**\n", "<p><em>foo</em>*</p>\n");
}

#[test]
fn multiple_closers() {
    html("__foo_ bar_\n", "<p><em><em>foo</em> bar</em></p>\n");
}

#[test]
fn underscore_intraword_is_literal() {
    html("foo_bar_baz\n", "<p>foo_bar_baz</p>\n");
}

#[test]
fn star_intraword_works() {
    html("5*6*78\n", "<p>5<em>6</em>78</p>\n");
}

#[test]
fn emphasis_needs_flanking() {
    html("* not emphasis*\n", "<ul>\n<li>not emphasis*</li>\n</ul>\n");
    html("a * b * c\n", "<p>a * b * c</p>\n");
}

#[test]
fn unmatched_delimiters_are_literal() {
    html("*unmatched\n", "<p>*unmatched</p>\n");
    html("foo_\n", "<p>foo_</p>\n");
}

#[test]
fn code_span() {
    html("`code`\n", "<p><code>code</code></p>\n");
}

#[test]
fn code_span_backtick_runs() {
    html("`` foo ` bar ``\n", "<p><code>foo ` bar</code></p>\n");
    html("` `` `\n", "<p><code>``</code></p>\n");
}

#[test]
fn code_span_newline_becomes_space() {
    html("`a\nb`\n", "<p><code>a b</code></p>\n");
}

#[test]
fn code_span_protects_delimiters() {
    html("`*not em*`\n", "<p><code>*not em*</code></p>\n");
}

#[test]
fn unmatched_backticks_are_literal() {
    html("`a\n", "<p>`a</p>\n");
}

#[test]
fn inline_html() {
    html(
        "<a href=\"x\">y</a>\n",
        "<p><a href=\"x\">y</a></p>\n",
    );
    html("<br/>\n", "<p><br/></p>\n");
    html("<!-- comment -->ok\n", "<p><!-- comment -->ok</p>\n");
}

#[test]
fn invalid_inline_html_is_text() {
    // Missing whitespace between attributes.
    html(
        "<a href='bar'title=title>x\n",
        "<p>&lt;a href='bar'title=title&gt;x</p>\n",
    );
}

#[test]
fn html_escaping_of_text() {
    html(
        "5 < 6 & 7 > 4 \"quoted\" 'single'\n",
        "<p>5 &lt; 6 &amp; 7 &gt; 4 &quot;quoted&quot; 'single'</p>\n",
    );
}
