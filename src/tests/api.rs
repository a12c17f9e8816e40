use std::sync::Arc;

use super::*;
use crate::html::{format_document_with_headings, Anchorizer};
use crate::{markdown_to_html, parse, render_llm, Error, Markdown};

#[test]
fn markdown_processor() {
    let md = Markdown::with_plugins(&["table", "strikethrough"]).expect("known plugins");
    assert!(md.options().extension.table);
    assert!(md.options().extension.strikethrough);
    assert!(!md.options().extension.math);
    assert_eq!(md.convert("~~gone~~"), "<p><del>gone</del></p>\n");
}

#[test]
fn markdown_processor_all_plugins() {
    let md = Markdown::with_plugins(&["all"]).expect("known plugin");
    assert!(md.options().extension.table);
    assert!(md.options().extension.footnotes);
    assert!(md.options().extension.autolink);
}

#[test]
fn unknown_plugin_is_a_usage_error() {
    match Markdown::with_plugins(&["tables", "nope"]) {
        Err(Error::UnknownPlugin(name)) => assert_eq!(name, "tables"),
        other => panic!("expected UnknownPlugin, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn llm_renderer() {
    let doc = parse("# Hello **World**\n\n- item\n", &Options::default());
    assert_eq!(render_llm(&doc), "# Hello World\n\n- item\n\n");
}

#[test]
fn llm_renderer_labels_code_and_images() {
    let doc = parse(
        "```rust\nfn f() {}\n```\n\n![a cat](/cat.png)\n",
        &Options::default(),
    );
    let out = render_llm(&doc);
    assert!(out.starts_with("[code:rust]\nfn f() {}\n\n[/code]\n"));
    assert!(out.contains("[image: a cat]"));
}

#[test]
fn anchorizer_deduplicates() {
    let mut anchorizer = Anchorizer::new();
    assert_eq!(anchorizer.anchorize("stuff".into()), "stuff");
    assert_eq!(anchorizer.anchorize("stuff".into()), "stuff-1");
    assert_eq!(anchorizer.anchorize("stuff".into()), "stuff-2");
}

#[test]
fn headings_are_collected_during_render() {
    let doc = parse("# One\n\n## Two\n", &Options::default());
    let rendered = format_document_with_headings(&doc, &Options::default());
    assert_eq!(rendered.headings.len(), 2);
    assert_eq!(rendered.headings[0].level, 1);
    assert_eq!(rendered.headings[0].text, "One");
    assert_eq!(rendered.headings[0].slug, "one");
    assert_eq!(rendered.headings[1].slug, "two");
}

#[test]
fn custom_slugify() {
    let mut options = Options::default();
    options.render.slugify = Some(Arc::new(|text: &str| {
        format!("x-{}", text.to_lowercase().replace(' ', "_"))
    }));
    html_opts_i(
        "# Big Title\n",
        "<h1 id=\"x-big_title\">Big Title</h1>\n",
        &options,
    );
}

#[test]
fn custom_text_transformer() {
    let mut options = Options::default();
    options.parse.text_transformer = Some(Arc::new(|text: &str| text.replace("TODO", "DONE")));
    html_opts_i("status: TODO\n", "<p>status: DONE</p>\n", &options);
}

#[test]
fn ast_is_shareable_across_threads() {
    let doc = Arc::new(parse("# t\n\npara\n", &Options::default()));
    let mut handles = Vec::new();
    for _ in 0..4 {
        let doc = Arc::clone(&doc);
        handles.push(std::thread::spawn(move || {
            crate::render(&doc, &Options::default())
        }));
    }
    let outputs: Vec<String> = handles.into_iter().map(|h| h.join().expect("no panic")).collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn every_character_survives_somewhere() {
    // Every input byte is either in the output or was part of a
    // delimiter.
    let source = "plain *em* `code` [x](y)\n";
    let output = markdown_to_html(source, &Options::default());
    for word in ["plain", "em", "code", "x"] {
        assert!(output.contains(word), "{} missing from {}", word, output);
    }
}

#[test]
fn options_are_debuggable() {
    let options = Options::default();
    let repr = format!("{:?}", options);
    assert!(repr.contains("ExtensionOptions"));
}
