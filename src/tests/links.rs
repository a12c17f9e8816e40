use super::*;
use crate::nodes::{Block, Inline};
use crate::parse;

#[test]
fn inline_link() {
    html(
        "[text](https://example.com)\n",
        "<p><a href=\"https://example.com\">text</a></p>\n",
    );
}

#[test]
fn inline_link_with_title() {
    html(
        "[t](/url \"ti\")\n",
        "<p><a href=\"/url\" title=\"ti\">t</a></p>\n",
    );
}

#[test]
fn inline_link_empty_destination() {
    html("[a]()\n", "<p><a href=\"\">a</a></p>\n");
}

#[test]
fn inline_link_angle_destination() {
    html("[a](<b c>)\n", "<p><a href=\"b%20c\">a</a></p>\n");
}

#[test]
fn reference_link() {
    html(
        concat!("See [docs][d].\n", "\n", "[d]: https://example.com \"Docs\"\n"),
        "<p>See <a href=\"https://example.com\" title=\"Docs\">docs</a>.</p>\n",
    );
}

#[test]
fn reference_link_structure() {
    let doc = parse(
        "See [docs][d].\n\n[d]: https://example.com \"Docs\"\n",
        &Options::default(),
    );
    assert_eq!(doc.children.len(), 1);
    match &doc.children[0] {
        Block::Paragraph(para) => {
            assert_eq!(para.children.len(), 3);
            match &para.children[1] {
                Inline::Link(link) => {
                    assert_eq!(link.url, "https://example.com");
                    assert_eq!(link.title.as_deref(), Some("Docs"));
                }
                other => panic!("expected link, got {:?}", other),
            }
        }
        other => panic!("expected paragraph, got {:?}", other),
    }
}

#[test]
fn collapsed_and_shortcut_reference() {
    html(
        concat!("[docs][] and [docs]\n", "\n", "[docs]: /here\n"),
        "<p><a href=\"/here\">docs</a> and <a href=\"/here\">docs</a></p>\n",
    );
}

#[test]
fn reference_label_case_insensitive() {
    html(
        concat!("[ДОКС]\n", "\n", "[докс]: /там\n"),
        "<p><a href=\"/%D1%82%D0%B0%D0%BC\">ДОКС</a></p>\n",
    );
}

#[test]
fn first_definition_wins() {
    html(
        concat!("[d]\n", "\n", "[d]: /first\n", "[d]: /second\n"),
        "<p><a href=\"/first\">d</a></p>\n",
    );
}

#[test]
fn definition_cannot_interrupt_paragraph() {
    html(
        concat!("para\n", "[d]: /url\n", "\n", "[d]\n"),
        concat!("<p>para\n", "[d]: /url</p>\n", "<p>[d]</p>\n"),
    );
}

#[test]
fn unknown_reference_stays_literal() {
    html("[nope][missing]\n", "<p>[nope][missing]</p>\n");
}

#[test]
fn image() {
    html(
        "![alt text](/img.png)\n",
        "<p><img src=\"/img.png\" alt=\"alt text\" /></p>\n",
    );
}

#[test]
fn image_alt_is_plain_text() {
    html(
        "![*em* alt](/i.png)\n",
        "<p><img src=\"/i.png\" alt=\"em alt\" /></p>\n",
    );
}

#[test]
fn image_with_title() {
    html(
        "![a](/i.png \"t\")\n",
        "<p><img src=\"/i.png\" alt=\"a\" title=\"t\" /></p>\n",
    );
}

#[test]
fn links_do_not_nest() {
    html(
        "[a [b](c)](d)\n",
        "<p>[a <a href=\"c\">b</a>](d)</p>\n",
    );
}

#[test]
fn unmatched_brackets_are_literal() {
    html("[ not a link\n", "<p>[ not a link</p>\n");
    html("] stray\n", "<p>] stray</p>\n");
}

#[test]
fn code_span_protects_bracket() {
    html(
        "[`]`](/x)\n",
        "<p><a href=\"/x\"><code>]</code></a></p>\n",
    );
}

#[test]
fn uri_autolink() {
    html(
        "<https://example.com>\n",
        "<p><a href=\"https://example.com\">https://example.com</a></p>\n",
    );
}

#[test]
fn email_autolink() {
    html(
        "<foo@example.com>\n",
        "<p><a href=\"mailto:foo@example.com\">foo@example.com</a></p>\n",
    );
}

#[test]
fn not_an_autolink() {
    // Tag names cannot start with a digit, so this is neither an autolink
    // nor inline HTML.
    html("<3 items>\n", "<p>&lt;3 items&gt;</p>\n");
}

#[test]
fn href_escaping() {
    html(
        "[a](/url?q=a&b=c)\n",
        "<p><a href=\"/url?q=a&amp;b=c\">a</a></p>\n",
    );
}
