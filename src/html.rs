//! HTML rendering.
//!
//! A single pass over the AST appends into a `String`. All state lives in
//! the renderer instance created per render call: the anchor set for slug
//! deduplication, the headings collected for TOC building, and footnote
//! bookkeeping. Rendering never fails; unknown or out-of-place nodes fall
//! through to empty output.

use rustc_hash::{FxHashMap, FxHashSet};
use unicode_categories::UnicodeCategories;

use crate::entity;
use crate::nodes::{
    Block, Directive, Document, FencedCode, FootnoteDef, Heading, Inline, List, ListItem, Role,
    Table, TableAlignment, TableRow,
};
use crate::parser::options::Options;
use crate::strings;

/// Renders a document to an HTML string.
pub fn format_document(doc: &Document, options: &Options) -> String {
    HtmlRenderer::new(doc, options).render(doc).html
}

/// Renders a document and also returns the headings collected during the
/// walk, for TOC construction.
pub fn format_document_with_headings(doc: &Document, options: &Options) -> RenderedHtml {
    HtmlRenderer::new(doc, options).render(doc)
}

/// Output of a render: the HTML plus per-render heading metadata.
#[derive(Debug, Clone)]
pub struct RenderedHtml {
    pub html: String,
    pub headings: Vec<HeadingInfo>,
}

/// Heading metadata collected during rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingInfo {
    pub level: u8,
    pub text: String,
    pub slug: String,
}

/// Converts heading text to canonical, unique anchors. Uniqueness is per
/// renderer instance: a repeated slug gets `-1`, `-2`, … appended.
#[derive(Debug, Default)]
pub struct Anchorizer {
    seen: FxHashSet<String>,
}

impl Anchorizer {
    pub fn new() -> Self {
        Anchorizer::default()
    }

    /// Deduplicates `base` against everything this instance has handed
    /// out.
    pub fn anchorize(&mut self, base: String) -> String {
        let mut uniq = 0usize;
        let id = loop {
            let candidate = if uniq == 0 {
                base.clone()
            } else {
                format!("{}-{}", base, uniq)
            };
            if !self.seen.contains(&candidate) {
                break candidate;
            }
            uniq += 1;
        };
        self.seen.insert(id.clone());
        id
    }
}

/// The default heading slug: lowercase, whitespace to `-`, everything
/// outside `[a-z0-9_-]` dropped (Unicode letters and digits survive).
pub fn default_slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    lowered
        .chars()
        .filter(|&c| c == ' ' || c == '-' || c == '_' || c.is_letter() || c.is_number())
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

struct HtmlRenderer<'d, 'o> {
    source: &'d str,
    options: &'o Options,
    anchorizer: Anchorizer,
    headings: Vec<HeadingInfo>,
    footnote_defs: FxHashMap<&'d str, &'d FootnoteDef>,
    footnote_refs: Vec<String>,
}

impl<'d, 'o> HtmlRenderer<'d, 'o> {
    fn new(doc: &'d Document, options: &'o Options) -> Self {
        HtmlRenderer {
            source: &doc.source,
            options,
            anchorizer: Anchorizer::new(),
            headings: Vec::new(),
            footnote_defs: FxHashMap::default(),
            footnote_refs: Vec::new(),
        }
    }

    fn render(mut self, doc: &'d Document) -> RenderedHtml {
        self.collect_footnotes(doc);

        let mut out = String::with_capacity(self.source.len() + self.source.len() / 2);
        for child in &doc.children {
            self.render_block(child, &mut out);
        }

        let any_defined = self
            .footnote_refs
            .iter()
            .any(|id| self.footnote_defs.contains_key(id.as_str()));
        if any_defined {
            self.render_footnotes_section(&mut out);
        }

        RenderedHtml {
            html: out,
            headings: self.headings,
        }
    }

    fn collect_footnotes(&mut self, doc: &'d Document) {
        for block in &doc.children {
            if let Block::FootnoteDef(def) = block {
                self.footnote_defs.entry(def.identifier.as_str()).or_insert(def);
            }
        }
    }

    // =====================================================================
    // Blocks
    // =====================================================================

    fn render_block(&mut self, block: &'d Block, out: &mut String) {
        match block {
            Block::Heading(heading) => self.render_heading(heading, out),
            Block::Paragraph(para) => {
                out.push_str("<p>");
                self.render_inlines(&para.children, out);
                out.push_str("</p>\n");
            }
            Block::FencedCode(code) => self.render_fenced_code(code, out),
            Block::IndentedCode(code) => {
                out.push_str("<pre><code>");
                strings::escape_html(out, &code.code);
                out.push_str("</code></pre>\n");
            }
            Block::BlockQuote(quote) => {
                out.push_str("<blockquote>\n");
                for child in &quote.children {
                    self.render_block(child, out);
                }
                out.push_str("</blockquote>\n");
            }
            Block::List(list) => self.render_list(list, out),
            Block::ThematicBreak(_) => out.push_str("<hr />\n"),
            Block::HtmlBlock(html) => {
                // HTML blocks end with exactly one newline.
                out.push_str(html.html.trim_end_matches('\n'));
                out.push('\n');
            }
            Block::Table(table) => self.render_table(table, out),
            Block::MathBlock(math) => {
                out.push_str("<div class=\"math-block\">\n");
                strings::escape_html(out, &math.content);
                out.push_str("\n</div>\n");
            }
            Block::Directive(directive) => self.render_directive(directive, out),
            Block::FootnoteDef(_) => {
                // Rendered in the footnotes section.
            }
        }
    }

    fn render_heading(&mut self, heading: &'d Heading, out: &mut String) {
        let text = extract_text(&heading.children);

        let base = match &heading.explicit_id {
            Some(id) => id.clone(),
            None => match &self.options.render.slugify {
                Some(slugify) => slugify(&text),
                None => default_slugify(&text),
            },
        };
        let slug = self.anchorizer.anchorize(base);

        self.headings.push(HeadingInfo {
            level: heading.level,
            text,
            slug: slug.clone(),
        });

        out.push_str("<h");
        out.push((b'0' + heading.level) as char);
        out.push_str(" id=\"");
        strings::escape_html(out, &slug);
        out.push_str("\">");
        self.render_inlines(&heading.children, out);
        out.push_str("</h");
        out.push((b'0' + heading.level) as char);
        out.push_str(">\n");
    }

    fn render_fenced_code(&mut self, code: &'d FencedCode, out: &mut String) {
        let content = code.get_code(self.source);

        // The info string is entity-decoded; its first word is the
        // language.
        let info = code.info.as_deref().map(entity::unescape_html);
        let lang = info
            .as_deref()
            .and_then(|i| i.split_whitespace().next())
            .map(str::to_string);

        if let (Some(lang), Some(highlighter)) = (&lang, &self.options.render.highlighter) {
            if let Some(highlighted) = highlighter.highlight(content, lang) {
                out.push_str(&highlighted);
                out.push('\n');
                return;
            }
        }

        out.push_str("<pre><code");
        if let Some(lang) = &lang {
            out.push_str(" class=\"language-");
            strings::escape_html(out, lang);
            out.push('"');
        }
        out.push('>');
        strings::escape_html(out, content);
        out.push_str("</code></pre>\n");
    }

    fn render_list(&mut self, list: &'d List, out: &mut String) {
        if list.ordered {
            if list.start != 1 {
                out.push_str("<ol start=\"");
                out.push_str(&list.start.to_string());
                out.push_str("\">\n");
            } else {
                out.push_str("<ol>\n");
            }
        } else {
            out.push_str("<ul>\n");
        }

        for item in &list.items {
            self.render_list_item(item, list.tight, out);
        }

        out.push_str(if list.ordered { "</ol>\n" } else { "</ul>\n" });
    }

    /// Tight lists render single-paragraph items without `<p>` wrappers;
    /// in mixed tight items other blocks render normally while paragraphs
    /// stay unwrapped. Loose lists wrap every paragraph.
    fn render_list_item(&mut self, item: &'d ListItem, tight: bool, out: &mut String) {
        out.push_str("<li>");

        if let Some(checked) = item.checked {
            out.push_str("<input type=\"checkbox\" disabled");
            if checked {
                out.push_str(" checked");
            }
            out.push_str(" /> ");
        }

        match item.children.as_slice() {
            [] => {}
            [Block::Paragraph(para)] if tight => {
                self.render_inlines(&para.children, out);
            }
            children if tight => {
                if let Block::Paragraph(first) = &children[0] {
                    self.render_inlines(&first.children, out);
                    out.push('\n');
                    for child in &children[1..] {
                        self.render_block(child, out);
                    }
                } else {
                    out.push('\n');
                    for child in children {
                        if let Block::Paragraph(para) = child {
                            self.render_inlines(&para.children, out);
                        } else {
                            self.render_block(child, out);
                        }
                    }
                }
            }
            children => {
                out.push('\n');
                for child in children {
                    self.render_block(child, out);
                }
            }
        }

        out.push_str("</li>\n");
    }

    fn render_table(&mut self, table: &'d Table, out: &mut String) {
        out.push_str("<table>\n");

        if !table.head.is_empty() {
            out.push_str("<thead>\n");
            for row in &table.head {
                self.render_table_row(row, true, out);
            }
            out.push_str("</thead>\n");
        }

        if !table.body.is_empty() {
            out.push_str("<tbody>\n");
            for row in &table.body {
                self.render_table_row(row, false, out);
            }
            out.push_str("</tbody>\n");
        }

        out.push_str("</table>\n");
    }

    fn render_table_row(&mut self, row: &'d TableRow, is_header: bool, out: &mut String) {
        out.push_str("<tr>\n");
        let tag = if is_header { "th" } else { "td" };

        for cell in &row.cells {
            out.push('<');
            out.push_str(tag);
            match cell.align {
                TableAlignment::Left => out.push_str(" style=\"text-align: left\""),
                TableAlignment::Center => out.push_str(" style=\"text-align: center\""),
                TableAlignment::Right => out.push_str(" style=\"text-align: right\""),
                TableAlignment::None => {}
            }
            out.push('>');
            self.render_inlines(&cell.children, out);
            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
        }

        out.push_str("</tr>\n");
    }

    fn render_directive(&mut self, directive: &'d Directive, out: &mut String) {
        let mut rendered_children = String::new();
        for child in &directive.children {
            self.render_block(child, &mut rendered_children);
        }

        if let Some(registry) = &self.options.parse.directives {
            if let Some(handler) = registry.get(&directive.name) {
                handler.render(directive, &rendered_children, out);
                return;
            }
        }

        // No handler: a generic container div.
        out.push_str("<div class=\"directive directive-");
        strings::escape_html(out, &directive.name);
        out.push_str("\">\n");
        if let Some(title) = &directive.title {
            out.push_str("<p class=\"directive-title\">");
            strings::escape_html(out, title);
            out.push_str("</p>\n");
        }
        out.push_str(&rendered_children);
        out.push_str("</div>\n");
    }

    // =====================================================================
    // Inlines
    // =====================================================================

    fn render_inlines(&mut self, inlines: &'d [Inline], out: &mut String) {
        for inline in inlines {
            self.render_inline(inline, out);
        }
    }

    fn render_inline(&mut self, inline: &'d Inline, out: &mut String) {
        match inline {
            Inline::Text(text) => strings::escape_html(out, &text.content),
            Inline::Emphasis(em) => {
                out.push_str("<em>");
                self.render_inlines(&em.children, out);
                out.push_str("</em>");
            }
            Inline::Strong(strong) => {
                out.push_str("<strong>");
                self.render_inlines(&strong.children, out);
                out.push_str("</strong>");
            }
            Inline::Strikethrough(strike) => {
                out.push_str("<del>");
                self.render_inlines(&strike.children, out);
                out.push_str("</del>");
            }
            Inline::Link(link) => {
                out.push_str("<a href=\"");
                strings::escape_html(out, &strings::encode_url(&link.url));
                out.push('"');
                if let Some(title) = &link.title {
                    out.push_str(" title=\"");
                    strings::escape_html(out, &entity::unescape_html(title));
                    out.push('"');
                }
                out.push('>');
                self.render_inlines(&link.children, out);
                out.push_str("</a>");
            }
            Inline::Image(image) => {
                out.push_str("<img src=\"");
                strings::escape_html(out, &strings::encode_url(&image.url));
                out.push_str("\" alt=\"");
                strings::escape_html(out, &image.alt);
                out.push('"');
                if let Some(title) = &image.title {
                    out.push_str(" title=\"");
                    strings::escape_html(out, &entity::unescape_html(title));
                    out.push('"');
                }
                out.push_str(" />");
            }
            Inline::CodeSpan(code) => {
                out.push_str("<code>");
                strings::escape_html(out, &code.code);
                out.push_str("</code>");
            }
            Inline::LineBreak(_) => out.push_str("<br />\n"),
            Inline::SoftBreak(_) => out.push('\n'),
            Inline::HtmlInline(html) => out.push_str(&html.html),
            Inline::Math(math) => {
                out.push_str("<span class=\"math\">");
                strings::escape_html(out, &math.content);
                out.push_str("</span>");
            }
            Inline::FootnoteRef(footnote) => {
                let occurrence = self
                    .footnote_refs
                    .iter()
                    .filter(|id| **id == footnote.identifier)
                    .count();
                self.footnote_refs.push(footnote.identifier.clone());
                let ref_num = self.footnote_refs.len();

                let backref_id = if occurrence == 0 {
                    format!("fnref-{}", footnote.identifier)
                } else {
                    format!("fnref-{}-{}", footnote.identifier, occurrence)
                };

                out.push_str("<sup><a href=\"#fn-");
                strings::escape_html(out, &footnote.identifier);
                out.push_str("\" id=\"");
                strings::escape_html(out, &backref_id);
                out.push_str("\">");
                out.push_str(&ref_num.to_string());
                out.push_str("</a></sup>");
            }
            Inline::Role(role) => self.render_role(role, out),
        }
    }

    fn render_role(&mut self, role: &'d Role, out: &mut String) {
        if let Some(registry) = &self.options.parse.roles {
            if let Some(handler) = registry.get(&role.name) {
                handler.render(role, out);
                return;
            }
        }

        out.push_str("<span class=\"role role-");
        strings::escape_html(out, &role.name);
        out.push_str("\">");
        strings::escape_html(out, &role.content);
        out.push_str("</span>");
    }

    // =====================================================================
    // Footnotes
    // =====================================================================

    /// One entry per first-referenced definition, in reference order,
    /// each followed by a back-reference link.
    fn render_footnotes_section(&mut self, out: &mut String) {
        out.push_str("<section class=\"footnotes\">\n<ol>\n");

        let refs = std::mem::take(&mut self.footnote_refs);
        let mut rendered: FxHashSet<&str> = FxHashSet::default();

        for identifier in &refs {
            if rendered.contains(identifier.as_str()) {
                continue;
            }
            rendered.insert(identifier.as_str());

            if let Some(def) = self.footnote_defs.get(identifier.as_str()).copied() {
                out.push_str("<li id=\"fn-");
                strings::escape_html(out, identifier);
                out.push_str("\">\n");
                for child in &def.children {
                    self.render_block(child, out);
                }
                out.push_str("<a href=\"#fnref-");
                strings::escape_html(out, identifier);
                out.push_str("\">\u{21a9}</a>\n</li>\n");
            }
        }

        out.push_str("</ol>\n</section>\n");
    }
}

/// Plain text of inline content, used for slugs and TOC entries.
fn extract_text(inlines: &[Inline]) -> String {
    fn walk(inlines: &[Inline], out: &mut String) {
        for inline in inlines {
            match inline {
                Inline::Text(t) => out.push_str(&t.content),
                Inline::CodeSpan(c) => out.push_str(&c.code),
                Inline::Math(m) => out.push_str(&m.content),
                Inline::Role(r) => out.push_str(&r.content),
                Inline::Image(i) => out.push_str(&i.alt),
                Inline::Emphasis(n) => walk(&n.children, out),
                Inline::Strong(n) => walk(&n.children, out),
                Inline::Strikethrough(n) => walk(&n.children, out),
                Inline::Link(n) => walk(&n.children, out),
                _ => {}
            }
        }
    }

    let mut out = String::new();
    walk(inlines, &mut out);
    out
}
