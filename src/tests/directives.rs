use std::sync::Arc;

use super::*;
use crate::directives::DirectiveRegistry;
use crate::nodes::Block;
use crate::{parse, parse_strict};

fn with_builtin_directives() -> Options {
    let mut options = Options::default();
    options.parse.directives = Some(Arc::new(DirectiveRegistry::with_defaults()));
    options
}

#[test]
fn generic_directive() {
    html(
        concat!(":::{note} Title\n", "body **bold**\n", ":::\n"),
        concat!(
            "<div class=\"directive directive-note\">\n",
            "<p class=\"directive-title\">Title</p>\n",
            "<p>body <strong>bold</strong></p>\n",
            "</div>\n"
        ),
    );
}

#[test]
fn generic_directive_structure() {
    let doc = parse(":::{note} Title\nbody\n:::\n", &Options::default());
    match &doc.children[0] {
        Block::Directive(directive) => {
            assert_eq!(directive.name, "note");
            assert_eq!(directive.title.as_deref(), Some("Title"));
            assert_eq!(directive.children.len(), 1);
            assert!(directive.options.is_empty());
        }
        other => panic!("expected directive, got {:?}", other),
    }
    assert!(doc.diagnostics.is_empty());
}

#[test]
fn directive_options() {
    let doc = parse(
        ":::{note}\n:class: wide\n:open: true\nbody\n:::\n",
        &Options::default(),
    );
    match &doc.children[0] {
        Block::Directive(directive) => {
            // `class` is aliased to `class_`; unknown options stay strings.
            assert_eq!(directive.options.get_str("class_"), Some("wide"));
            assert_eq!(directive.options.get_str("open"), Some("true"));
            assert_eq!(directive.options.len(), 2);
        }
        other => panic!("expected directive, got {:?}", other),
    }
}

#[test]
fn nested_directives() {
    html(
        concat!(
            ":::{note}\n",
            "::::{tip}\n",
            "inner\n",
            "::::\n",
            ":::\n"
        ),
        concat!(
            "<div class=\"directive directive-note\">\n",
            "<div class=\"directive directive-tip\">\n",
            "<p>inner</p>\n",
            "</div>\n",
            "</div>\n"
        ),
    );
}

#[test]
fn named_close_pops_nested_frames() {
    let doc = parse(
        concat!(
            ":::{note}\n",
            "::::{tip}\n",
            "inner\n",
            ":::{/note}\n",
            "after\n"
        ),
        &Options::default(),
    );
    match &doc.children[0] {
        Block::Directive(outer) => {
            assert_eq!(outer.name, "note");
            match &outer.children[0] {
                Block::Directive(inner) => assert_eq!(inner.name, "tip"),
                other => panic!("expected nested directive, got {:?}", other),
            }
        }
        other => panic!("expected directive, got {:?}", other),
    }
    match &doc.children[1] {
        Block::Paragraph(_) => {}
        other => panic!("expected paragraph after close, got {:?}", other),
    }
}

#[test]
fn unclosed_directive_closes_at_eof_with_diagnostic() {
    let doc = parse(":::{note}\nbody\n", &Options::default());
    match &doc.children[0] {
        Block::Directive(directive) => {
            assert_eq!(directive.name, "note");
            assert_eq!(directive.children.len(), 1);
        }
        other => panic!("expected directive, got {:?}", other),
    }
    assert_eq!(doc.diagnostics.len(), 1);
    assert_eq!(doc.diagnostics[0].directive, "note");
}

#[test]
fn admonition_handler() {
    html_opts_i(
        concat!(":::{note} Watch out\n", "Body.\n", ":::\n"),
        concat!(
            "<div class=\"admonition note\">\n",
            "<p class=\"admonition-title\">Watch out</p>\n",
            "<p>Body.</p>\n",
            "</div>\n"
        ),
        &with_builtin_directives(),
    );
}

#[test]
fn admonition_default_title_is_capitalized_name() {
    html_opts_i(
        concat!(":::{warning}\n", "Body.\n", ":::\n"),
        concat!(
            "<div class=\"admonition warning\">\n",
            "<p class=\"admonition-title\">Warning</p>\n",
            "<p>Body.</p>\n",
            "</div>\n"
        ),
        &with_builtin_directives(),
    );
}

#[test]
fn dropdown_handler() {
    html_opts_i(
        concat!(":::{dropdown} More\n", ":open: true\n", "Hidden.\n", ":::\n"),
        concat!(
            "<details class=\"dropdown\" open>\n",
            "<summary>More</summary>\n",
            "<p>Hidden.</p>\n",
            "</details>\n"
        ),
        &with_builtin_directives(),
    );
}

#[test]
fn tabs_render_and_validate() {
    html_opts_i(
        concat!(
            ":::{tab-set}\n",
            "::::{tab-item} One\n",
            "first\n",
            "::::\n",
            ":::\n"
        ),
        concat!(
            "<div class=\"tab-set\">\n",
            "<div class=\"tab-item\" data-title=\"One\">\n",
            "<p>first</p>\n",
            "</div>\n",
            "</div>\n"
        ),
        &with_builtin_directives(),
    );
}

#[test]
fn contract_violation_is_a_diagnostic() {
    let options = with_builtin_directives();
    let doc = parse(":::{tab-item} Lost\nbody\n:::\n", &options);
    assert_eq!(doc.diagnostics.len(), 1);
    let violation = &doc.diagnostics[0];
    assert_eq!(violation.directive, "tab-item");
    assert!(violation.suggestion().expect("has suggestion").contains("tab-set"));
}

#[test]
fn strict_mode_turns_violations_into_errors() {
    let options = with_builtin_directives();
    assert!(parse_strict(":::{tab-item} Lost\nbody\n:::\n", &options).is_err());
    assert!(parse_strict(":::{note}\nfine\n:::\n", &options).is_ok());
}

#[test]
fn directive_close_without_open_is_text() {
    html(":::\n", "<p>:::</p>\n");
}
