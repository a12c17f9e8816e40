//! Structured plain-text rendering for model consumption.
//!
//! No HTML. Hierarchy survives through markdown-like markers, and
//! non-text content is labelled explicitly: `[code:lang]…[/code]`,
//! `[math]…[/math]`, `[image: alt]`.

use crate::nodes::{Block, Document, Inline, ListItem, Table};

/// Renders a document to labelled plain text.
pub fn format_document(doc: &Document) -> String {
    let mut out = String::with_capacity(doc.source.len());
    for child in &doc.children {
        render_block(child, &doc.source, &mut out);
    }
    out
}

fn render_block(block: &Block, source: &str, out: &mut String) {
    match block {
        Block::Heading(heading) => {
            for _ in 0..heading.level {
                out.push('#');
            }
            out.push(' ');
            render_inlines(&heading.children, out);
            out.push_str("\n\n");
        }
        Block::Paragraph(para) => {
            render_inlines(&para.children, out);
            out.push_str("\n\n");
        }
        Block::FencedCode(code) => {
            match code.info.as_deref().and_then(|i| i.split_whitespace().next()) {
                Some(lang) => {
                    out.push_str("[code:");
                    out.push_str(lang);
                    out.push_str("]\n");
                }
                None => out.push_str("[code]\n"),
            }
            out.push_str(code.get_code(source));
            out.push_str("\n[/code]\n\n");
        }
        Block::IndentedCode(code) => {
            out.push_str("[code]\n");
            out.push_str(&code.code);
            out.push_str("\n[/code]\n\n");
        }
        Block::BlockQuote(quote) => {
            out.push_str("> ");
            for child in &quote.children {
                render_block(child, source, out);
            }
            out.push('\n');
        }
        Block::List(list) => {
            for (i, item) in list.items.iter().enumerate() {
                if list.ordered {
                    out.push_str(&(list.start + i).to_string());
                    out.push_str(". ");
                } else {
                    out.push_str("- ");
                }
                render_list_item(item, source, out);
            }
            out.push('\n');
        }
        Block::ThematicBreak(_) => out.push_str("---\n\n"),
        Block::HtmlBlock(html) => {
            out.push_str(&html.html);
            out.push_str("\n\n");
        }
        Block::Table(table) => render_table(table, out),
        Block::MathBlock(math) => {
            out.push_str("[math] ");
            out.push_str(&math.content);
            out.push_str(" [/math]\n\n");
        }
        Block::Directive(directive) => {
            for child in &directive.children {
                render_block(child, source, out);
            }
        }
        Block::FootnoteDef(def) => {
            for child in &def.children {
                render_block(child, source, out);
            }
        }
    }
}

fn render_list_item(item: &ListItem, source: &str, out: &mut String) {
    let mut children = item.children.iter();
    match children.next() {
        None => {
            out.push('\n');
            return;
        }
        Some(Block::Paragraph(para)) => render_inlines(&para.children, out),
        Some(other) => render_block(other, source, out),
    }
    for child in children {
        render_block(child, source, out);
    }
    out.push('\n');
}

fn render_table(table: &Table, out: &mut String) {
    for row in table.head.iter().chain(table.body.iter()) {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                let mut text = String::new();
                inline_text(&cell.children, &mut text);
                text
            })
            .collect();
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
    }
    out.push('\n');
}

fn render_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(&t.content),
            Inline::Emphasis(n) => render_inlines(&n.children, out),
            Inline::Strong(n) => render_inlines(&n.children, out),
            Inline::Strikethrough(n) => render_inlines(&n.children, out),
            Inline::Link(link) => {
                render_inlines(&link.children, out);
                out.push_str(" (");
                out.push_str(&link.url);
                out.push(')');
            }
            Inline::Image(image) => {
                out.push_str("[image: ");
                out.push_str(&image.alt);
                out.push(']');
            }
            Inline::CodeSpan(code) => out.push_str(&code.code),
            Inline::LineBreak(_) | Inline::SoftBreak(_) => out.push(' '),
            Inline::HtmlInline(_) => {}
            Inline::Math(math) => {
                out.push_str("[math] ");
                out.push_str(&math.content);
                out.push_str(" [/math]");
            }
            Inline::FootnoteRef(footnote) => {
                out.push_str("[^");
                out.push_str(&footnote.identifier);
                out.push(']');
            }
            Inline::Role(role) => out.push_str(&role.content),
        }
    }
}

fn inline_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(&t.content),
            Inline::CodeSpan(c) => out.push_str(&c.code),
            Inline::Image(i) => out.push_str(&i.alt),
            Inline::Math(m) => out.push_str(&m.content),
            Inline::Role(r) => out.push_str(&r.content),
            Inline::Link(n) => inline_text(&n.children, out),
            Inline::Emphasis(n) => inline_text(&n.children, out),
            Inline::Strong(n) => inline_text(&n.children, out),
            Inline::Strikethrough(n) => inline_text(&n.children, out),
            Inline::LineBreak(_) | Inline::SoftBreak(_) => out.push(' '),
            _ => {}
        }
    }
}
