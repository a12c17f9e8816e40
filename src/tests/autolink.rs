use super::*;
use crate::tests::html_opts;

#[test]
fn bare_url() {
    html_opts!(
        [extension.autolink],
        "Visit https://example.com now.\n",
        "<p>Visit <a href=\"https://example.com\">https://example.com</a> now.</p>\n",
    );
}

#[test]
fn bare_url_trims_trailing_punctuation() {
    html_opts!(
        [extension.autolink],
        "See https://example.com/a.\n",
        "<p>See <a href=\"https://example.com/a\">https://example.com/a</a>.</p>\n",
    );
}

#[test]
fn bare_url_balances_parens() {
    html_opts!(
        [extension.autolink],
        "(see https://example.com/x)\n",
        "<p>(see <a href=\"https://example.com/x\">https://example.com/x</a>)</p>\n",
    );
}

#[test]
fn www_autolink() {
    html_opts!(
        [extension.autolink],
        "go to www.example.com today\n",
        "<p>go to <a href=\"http://www.example.com\">www.example.com</a> today</p>\n",
    );
}

#[test]
fn email_autolink() {
    html_opts!(
        [extension.autolink],
        "mail foo.bar@example.com please\n",
        "<p>mail <a href=\"mailto:foo.bar@example.com\">foo.bar@example.com</a> please</p>\n",
    );
}

#[test]
fn email_needs_dotted_domain() {
    html_opts!(
        [extension.autolink],
        "not user@localhost here\n",
        "<p>not user@localhost here</p>\n",
    );
}

#[test]
fn unknown_scheme_is_literal() {
    html_opts!(
        [extension.autolink],
        "gopher://old.example\n",
        "<p>gopher://old.example</p>\n",
    );
}

#[test]
fn disabled_by_default() {
    html(
        "see https://example.com\n",
        "<p>see https://example.com</p>\n",
    );
}

#[test]
fn www_requires_word_boundary() {
    html_opts!(
        [extension.autolink],
        "nowww.example.com\n",
        "<p>nowww.example.com</p>\n",
    );
}
