use super::*;
use crate::tests::html_opts;

#[test]
fn footnote() {
    html_opts!(
        [extension.footnotes],
        concat!("Hi[^note].\n", "\n", "[^note]: Some detail.\n"),
        concat!(
            "<p>Hi<sup><a href=\"#fn-note\" id=\"fnref-note\">1</a></sup>.</p>\n",
            "<section class=\"footnotes\">\n",
            "<ol>\n",
            "<li id=\"fn-note\">\n",
            "<p>Some detail.</p>\n",
            "<a href=\"#fnref-note\">\u{21a9}</a>\n",
            "</li>\n",
            "</ol>\n",
            "</section>\n"
        ),
    );
}

#[test]
fn missing_definition_renders_dangling_anchor() {
    html_opts!(
        [extension.footnotes],
        "Hi[^ghost].\n",
        "<p>Hi<sup><a href=\"#fn-ghost\" id=\"fnref-ghost\">1</a></sup>.</p>\n",
    );
}

#[test]
fn duplicate_references_get_suffixed_backref_ids() {
    html_opts!(
        [extension.footnotes],
        concat!("A[^x] B[^x]\n", "\n", "[^x]: once\n"),
        concat!(
            "<p>A<sup><a href=\"#fn-x\" id=\"fnref-x\">1</a></sup> ",
            "B<sup><a href=\"#fn-x\" id=\"fnref-x-1\">2</a></sup></p>\n",
            "<section class=\"footnotes\">\n",
            "<ol>\n",
            "<li id=\"fn-x\">\n",
            "<p>once</p>\n",
            "<a href=\"#fnref-x\">\u{21a9}</a>\n",
            "</li>\n",
            "</ol>\n",
            "</section>\n"
        ),
    );
}

#[test]
fn definition_order_follows_first_reference() {
    html_opts!(
        [extension.footnotes],
        concat!(
            "B[^b] then A[^a]\n",
            "\n",
            "[^a]: alpha\n",
            "\n",
            "[^b]: beta\n"
        ),
        concat!(
            "<p>B<sup><a href=\"#fn-b\" id=\"fnref-b\">1</a></sup> ",
            "then A<sup><a href=\"#fn-a\" id=\"fnref-a\">2</a></sup></p>\n",
            "<section class=\"footnotes\">\n",
            "<ol>\n",
            "<li id=\"fn-b\">\n",
            "<p>beta</p>\n",
            "<a href=\"#fnref-b\">\u{21a9}</a>\n",
            "</li>\n",
            "<li id=\"fn-a\">\n",
            "<p>alpha</p>\n",
            "<a href=\"#fnref-a\">\u{21a9}</a>\n",
            "</li>\n",
            "</ol>\n",
            "</section>\n"
        ),
    );
}

#[test]
fn disabled_by_default() {
    html(
        concat!("Hi[^1].\n", "\n", "[^1]: detail\n"),
        concat!("<p>Hi[^1].</p>\n", "<p>[^1]: detail</p>\n"),
    );
}

#[test]
fn reference_not_followed_by_colon() {
    // `[^id]:` inline is a definition shape, not a reference.
    html_opts!(
        [extension.footnotes],
        "see [^x]: no\n",
        "<p>see [^x]: no</p>\n",
    );
}
