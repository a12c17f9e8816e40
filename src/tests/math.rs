use super::*;
use crate::tests::html_opts;

#[test]
fn inline_math() {
    html_opts!(
        [extension.math],
        "Euler: $e^{i\\pi} + 1 = 0$.\n",
        "<p>Euler: <span class=\"math\">e^{i\\pi} + 1 = 0</span>.</p>\n",
    );
}

#[test]
fn math_block() {
    html_opts!(
        [extension.math],
        concat!("$$\n", "E = mc^2\n", "$$\n"),
        concat!("<div class=\"math-block\">\n", "E = mc^2\n", "</div>\n"),
    );
}

#[test]
fn math_block_single_line() {
    html_opts!(
        [extension.math],
        "$$a + b$$\n",
        concat!("<div class=\"math-block\">\n", "a + b\n", "</div>\n"),
    );
}

#[test]
fn disabled_by_default() {
    html("$x$\n", "<p>$x$</p>\n");
}

#[test]
fn math_block_unterminated_keeps_content() {
    html_opts!(
        [extension.math],
        concat!("$$\n", "x\n"),
        concat!("<div class=\"math-block\">\n", "x\n", "</div>\n"),
    );
}

#[test]
fn unclosed_dollar_is_literal() {
    html_opts!([extension.math], "price: $5\n", "<p>price: $5</p>\n");
}

#[test]
fn escaped_content_in_math() {
    html_opts!(
        [extension.math],
        "$a < b$\n",
        "<p><span class=\"math\">a &lt; b</span></p>\n",
    );
}
