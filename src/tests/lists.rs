use super::*;
use crate::nodes::Block;
use crate::parse;

#[test]
fn tight_lists() {
    html(
        concat!("- Hello.\n", "- Hi.\n"),
        concat!("<ul>\n", "<li>Hello.</li>\n", "<li>Hi.</li>\n", "</ul>\n"),
    );

    html(
        concat!("2. Hello.\n", "3. Hi.\n"),
        concat!(
            "<ol start=\"2\">\n",
            "<li>Hello.</li>\n",
            "<li>Hi.</li>\n",
            "</ol>\n"
        ),
    );
}

#[test]
fn loose_list_blank_between_items() {
    html(
        concat!("- a\n", "\n", "- b\n"),
        concat!(
            "<ul>\n",
            "<li>\n",
            "<p>a</p>\n",
            "</li>\n",
            "<li>\n",
            "<p>b</p>\n",
            "</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn loose_list_structure() {
    let doc = parse("- a\n\n- b\n", &Options::default());
    match &doc.children[0] {
        Block::List(list) => {
            assert!(!list.tight);
            assert_eq!(list.items.len(), 2);
        }
        other => panic!("expected list, got {:?}", other),
    }

    let doc = parse("- a\n- b\n", &Options::default());
    match &doc.children[0] {
        Block::List(list) => assert!(list.tight),
        other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn loose_list_continuation_paragraph() {
    html(
        concat!("- a\n", "\n", "  b\n"),
        concat!(
            "<ul>\n",
            "<li>\n",
            "<p>a</p>\n",
            "<p>b</p>\n",
            "</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn nested_list() {
    html(
        concat!("- a\n", "  - b\n"),
        concat!(
            "<ul>\n",
            "<li>a\n",
            "<ul>\n",
            "<li>b</li>\n",
            "</ul>\n",
            "</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn ordered_list_paren_marker() {
    html(
        concat!("1) one\n", "2) two\n"),
        concat!("<ol>\n", "<li>one</li>\n", "<li>two</li>\n", "</ol>\n"),
    );
}

#[test]
fn marker_change_starts_new_list() {
    html(
        concat!("- a\n", "+ b\n"),
        concat!(
            "<ul>\n",
            "<li>a</li>\n",
            "</ul>\n",
            "<ul>\n",
            "<li>b</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn list_interrupts_paragraph_only_when_starting_at_one() {
    html(
        concat!("text\n", "14. later\n"),
        "<p>text\n14. later</p>\n",
    );

    html(
        concat!("text\n", "1. now\n"),
        concat!("<p>text</p>\n", "<ol>\n", "<li>now</li>\n", "</ol>\n"),
    );
}

#[test]
fn paragraph_continuation_line() {
    html(
        concat!("- a\n", "  continued\n"),
        concat!("<ul>\n", "<li>a\ncontinued</li>\n", "</ul>\n"),
    );
}

#[test]
fn list_ends_at_dedent() {
    html(
        concat!("- a\n", "\n", "outside\n"),
        concat!("<ul>\n", "<li>a</li>\n", "</ul>\n", "<p>outside</p>\n"),
    );
}

#[test]
fn block_quote_in_list_item() {
    html(
        concat!("- a\n", "\n", "  > quoted\n"),
        concat!(
            "<ul>\n",
            "<li>\n",
            "<p>a</p>\n",
            "<blockquote>\n",
            "<p>quoted</p>\n",
            "</blockquote>\n",
            "</li>\n",
            "</ul>\n"
        ),
    );
}
