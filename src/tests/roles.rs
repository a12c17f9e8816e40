use std::sync::Arc;

use super::*;
use crate::nodes::{Block, Inline};
use crate::parse;
use crate::roles::RoleRegistry;

fn with_builtin_roles() -> Options {
    let mut options = Options::default();
    options.parse.roles = Some(Arc::new(RoleRegistry::with_defaults()));
    options
}

#[test]
fn generic_role() {
    html(
        "{custom}`stuff`\n",
        "<p><span class=\"role role-custom\">stuff</span></p>\n",
    );
}

#[test]
fn role_structure() {
    let doc = parse("{myst}`content here`\n", &Options::default());
    match &doc.children[0] {
        Block::Paragraph(para) => match &para.children[0] {
            Inline::Role(role) => {
                assert_eq!(role.name, "myst");
                assert_eq!(role.content, "content here");
                assert!(role.target.is_none());
            }
            other => panic!("expected role, got {:?}", other),
        },
        other => panic!("expected paragraph, got {:?}", other),
    }
}

#[test]
fn role_without_backtick_is_text() {
    html("{brace} only\n", "<p>{brace} only</p>\n");
}

#[test]
fn invalid_role_name_is_text() {
    html("{no spaces}`x`\n", "<p>{no spaces}<code>x</code></p>\n");
}

#[test]
fn kbd_role() {
    html_opts_i(
        "Press {kbd}`Ctrl+C` to copy.\n",
        "<p>Press <kbd>Ctrl</kbd>+<kbd>C</kbd> to copy.</p>\n",
        &with_builtin_roles(),
    );
}

#[test]
fn kbd_role_single_key() {
    html_opts_i(
        "{kbd}`Enter`\n",
        "<p><kbd>Enter</kbd></p>\n",
        &with_builtin_roles(),
    );
}

#[test]
fn abbr_role_extracts_expansion() {
    html_opts_i(
        "The {abbr}`HTML (HyperText Markup Language)` standard.\n",
        "<p>The <abbr title=\"HyperText Markup Language\">HTML</abbr> standard.</p>\n",
        &with_builtin_roles(),
    );
}

#[test]
fn sub_and_sup_roles() {
    html_opts_i(
        "H{sub}`2`O and mc{sup}`2`\n",
        "<p>H<sub>2</sub>O and mc<sup>2</sup></p>\n",
        &with_builtin_roles(),
    );
}

#[test]
fn role_content_is_not_inline_parsed() {
    html(
        "{custom}`**raw**`\n",
        "<p><span class=\"role role-custom\">**raw**</span></p>\n",
    );
}
