use super::*;
use crate::nodes::{Block, Inline};
use crate::parse;

#[test]
fn basic() {
    html(
        concat!(
            "My **document**.\n",
            "\n",
            "It's mine.\n",
            "\n",
            "> Yes.\n",
            "\n",
            "## Hi!\n",
            "\n",
            "Okay.\n"
        ),
        concat!(
            "<p>My <strong>document</strong>.</p>\n",
            "<p>It's mine.</p>\n",
            "<blockquote>\n",
            "<p>Yes.</p>\n",
            "</blockquote>\n",
            "<h2 id=\"hi\">Hi!</h2>\n",
            "<p>Okay.</p>\n"
        ),
    );
}

#[test]
fn empty_input() {
    html("", "");
    let doc = parse("", &Options::default());
    assert!(doc.children.is_empty());
}

#[test]
fn single_special_characters() {
    html("*\n", "<p>*</p>\n");
    html("_\n", "<p>_</p>\n");
    html("[\n", "<p>[</p>\n");
    html("`\n", "<p>`</p>\n");
}

#[test]
fn atx_heading() {
    html(
        concat!("# h1\n", "foo\n", "## h2\n"),
        concat!(
            "<h1 id=\"h1\">h1</h1>\n",
            "<p>foo</p>\n",
            "<h2 id=\"h2\">h2</h2>\n"
        ),
    );
}

#[test]
fn atx_heading_closing_sequence() {
    html("## foo ##\n", "<h2 id=\"foo\">foo</h2>\n");
    html("# foo#\n", "<h1 id=\"foo\">foo#</h1>\n");
    html("####\n", "<h4 id=\"\"></h4>\n");
}

#[test]
fn atx_heading_requires_space() {
    html("#nope\n", "<p>#nope</p>\n");
    html("####### seven\n", "<p>####### seven</p>\n");
}

#[test]
fn heading_structure() {
    let doc = parse("# Hello **World**", &Options::default());
    assert_eq!(doc.children.len(), 1);
    match &doc.children[0] {
        Block::Heading(heading) => {
            assert_eq!(heading.level, 1);
            assert!(!heading.setext);
            assert_eq!(heading.children.len(), 2);
            match &heading.children[0] {
                Inline::Text(t) => assert_eq!(t.content, "Hello "),
                other => panic!("expected text, got {:?}", other),
            }
            match &heading.children[1] {
                Inline::Strong(strong) => match &strong.children[0] {
                    Inline::Text(t) => assert_eq!(t.content, "World"),
                    other => panic!("expected text, got {:?}", other),
                },
                other => panic!("expected strong, got {:?}", other),
            }
        }
        other => panic!("expected heading, got {:?}", other),
    }
}

#[test]
fn heading_slug_generation() {
    html(
        "# Hello **World**\n",
        "<h1 id=\"hello-world\">Hello <strong>World</strong></h1>\n",
    );
}

#[test]
fn heading_slug_deduplication() {
    html(
        concat!("# Stuff\n", "# Stuff\n", "# Stuff\n"),
        concat!(
            "<h1 id=\"stuff\">Stuff</h1>\n",
            "<h1 id=\"stuff-1\">Stuff</h1>\n",
            "<h1 id=\"stuff-2\">Stuff</h1>\n"
        ),
    );
}

#[test]
fn heading_explicit_id() {
    html(
        "## Title {#custom-id}\n",
        "<h2 id=\"custom-id\">Title</h2>\n",
    );
}

#[test]
fn heading_explicit_id_invalid() {
    // Ids must start with a letter.
    html(
        "## Title {#9lives}\n",
        "<h2 id=\"title-9lives\">Title {#9lives}</h2>\n",
    );
}

#[test]
fn setext_heading() {
    html(
        concat!("Hi\n", "==\n", "\n", "Ok\n", "-----\n"),
        concat!("<h1 id=\"hi\">Hi</h1>\n", "<h2 id=\"ok\">Ok</h2>\n"),
    );
}

#[test]
fn setext_heading_structure() {
    let doc = parse("Header\n===\n", &Options::default());
    match &doc.children[0] {
        Block::Heading(heading) => {
            assert_eq!(heading.level, 1);
            assert!(heading.setext);
        }
        other => panic!("expected heading, got {:?}", other),
    }
}

#[test]
fn thematic_breaks() {
    html(
        concat!("---\n", "\n", "- - -\n", "\n", "\n", "_        _   _\n"),
        concat!("<hr />\n", "<hr />\n", "<hr />\n"),
    );
}

#[test]
fn paragraph_joining() {
    html(
        concat!("line one\n", "line two\n"),
        "<p>line one\nline two</p>\n",
    );
}

#[test]
fn hard_break_trailing_spaces() {
    html("foo  \nbar\n", "<p>foo<br />\nbar</p>\n");
}

#[test]
fn hard_break_backslash() {
    html("foo\\\nbar\n", "<p>foo<br />\nbar</p>\n");
}

#[test]
fn soft_break() {
    html("foo\nbar\n", "<p>foo\nbar</p>\n");
}

#[test]
fn backslash_escapes() {
    html("\\*not emphasized\\*\n", "<p>*not emphasized*</p>\n");
    html("\\\\\n", "<p>\\</p>\n");
    html("foo\\bar\n", "<p>foo\\bar</p>\n");
}

#[test]
fn entity_references() {
    html("&amp; &lt; &gt;\n", "<p>&amp; &lt; &gt;</p>\n");
    html("&copy;\n", "<p>©</p>\n");
    html("&#65;\n", "<p>A</p>\n");
    html("&#x41;\n", "<p>A</p>\n");
    html("&#0;\n", "<p>\u{fffd}</p>\n");
    html("&notanentity\n", "<p>&amp;notanentity</p>\n");
}

#[test]
fn indented_code_cannot_interrupt_paragraph() {
    html(
        concat!("foo\n", "    bar\n"),
        "<p>foo\nbar</p>\n",
    );
}

#[test]
fn parse_is_deterministic() {
    let source = "# A\n\n- one\n- two\n\n> quoted\n";
    let a = parse(source, &Options::default());
    let b = parse(source, &Options::default());
    assert_eq!(a.children, b.children);
}
