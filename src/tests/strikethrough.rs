use super::*;
use crate::tests::html_opts;

#[test]
fn strikethrough() {
    html_opts!(
        [extension.strikethrough],
        "Hello ~~world~~ there.\n",
        "<p>Hello <del>world</del> there.</p>\n",
    );
}

#[test]
fn disabled_by_default() {
    html("~~literal~~\n", "<p>~~literal~~</p>\n");
}

#[test]
fn single_tilde_is_literal() {
    html_opts!(
        [extension.strikethrough],
        "a ~ b\n",
        "<p>a ~ b</p>\n",
    );
}

#[test]
fn unmatched_tildes_are_literal() {
    html_opts!(
        [extension.strikethrough],
        "~~open only\n",
        "<p>~~open only</p>\n",
    );
}

#[test]
fn nests_with_emphasis() {
    html_opts!(
        [extension.strikethrough],
        "**bold ~~struck~~**\n",
        "<p><strong>bold <del>struck</del></strong></p>\n",
    );
}
