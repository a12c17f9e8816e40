//! A CommonMark 0.31.2 Markdown processor with first-class MyST-style
//! directives (`:::{name}` fenced containers) and roles
//! (`` {name}`content` `` inline spans).
//!
//! Patitas runs a three-stage pipeline — a line-window lexer, a
//! container-stack block parser with a delimiter-stack inline parser, and
//! a renderer — producing a typed, immutable AST with byte-exact source
//! provenance on every node. There is no regex anywhere in the hot path
//! and the lexer never rewinds, so worst-case behavior stays O(n).
//!
//! ```
//! use patitas::{markdown_to_html, Options};
//!
//! assert_eq!(
//!     markdown_to_html("Hello, **世界**!", &Options::default()),
//!     "<p>Hello, <strong>世界</strong>!</p>\n"
//! );
//! ```
//!
//! Extensions are flags on [`ExtensionOptions`]:
//!
//! ```
//! use patitas::{markdown_to_html, Options};
//!
//! let mut options = Options::default();
//! options.extension.strikethrough = true;
//! assert_eq!(
//!     markdown_to_html("Hello ~~world~~ there.\n", &options),
//!     "<p>Hello <del>world</del> there.</p>\n"
//! );
//! ```

mod character_set;
mod ctype;
pub mod directives;
mod entity;
pub mod html;
pub mod lexer;
pub mod llm;
pub mod nodes;
mod parser;
pub mod roles;
mod strings;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use crate::directives::{
    ContractViolation, DirectiveContract, DirectiveHandler, DirectiveOptions, DirectiveRegistry,
    DirectiveRegistryBuilder, OptionKind, OptionValue, ViolationKind,
};
pub use crate::html::{Anchorizer, HeadingInfo};
pub use crate::nodes::{Block, Document, Inline, SourceLocation};
pub use crate::parser::options::{
    ExtensionOptions, Options, ParseOptions, RenderOptions, SyntaxHighlighter,
};
pub use crate::roles::{RoleHandler, RoleRegistry, RoleRegistryBuilder};

use thiserror::Error as ThisError;

/// Errors surfaced by the crate's fallible entry points. Malformed
/// Markdown is never an error; parsing is total.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A directive nesting contract was violated and strict mode is on.
    #[error("contract violation: {0}")]
    Contract(ContractViolation),

    /// An unknown plugin name was passed to [`Markdown::with_plugins`].
    #[error("unknown plugin: {0:?}")]
    UnknownPlugin(String),
}

/// Parses a Markdown document to an AST.
///
/// Never fails: malformed input produces a best-effort AST, and contract
/// violations accumulate as diagnostics on the returned [`Document`].
pub fn parse(source: &str, options: &Options) -> Document {
    parser::parse_document(source, options)
}

/// Parses like [`parse`], but converts the first accumulated diagnostic
/// into an error — the strict-contracts mode.
pub fn parse_strict(source: &str, options: &Options) -> Result<Document, Error> {
    let doc = parser::parse_document(source, options);
    match doc.diagnostics.first() {
        Some(violation) => Err(Error::Contract(violation.clone())),
        None => Ok(doc),
    }
}

/// Renders a parsed document to HTML.
pub fn render(doc: &Document, options: &Options) -> String {
    html::format_document(doc, options)
}

/// Renders a parsed document to labelled plain text for LLM consumption.
pub fn render_llm(doc: &Document) -> String {
    llm::format_document(doc)
}

/// Parses and renders in one call.
pub fn markdown_to_html(source: &str, options: &Options) -> String {
    let doc = parse(source, options);
    render(&doc, options)
}

/// A configured processor bundling options, for callers that convert many
/// documents with one configuration.
///
/// ```
/// use patitas::Markdown;
///
/// let md = Markdown::with_plugins(&["table", "strikethrough"]).unwrap();
/// let html = md.convert("~~gone~~");
/// assert_eq!(html, "<p><del>gone</del></p>\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Markdown {
    options: Options,
}

impl Markdown {
    pub fn new(options: Options) -> Self {
        Markdown { options }
    }

    /// Builds a processor with the named plugins enabled. `"all"` enables
    /// everything; an unknown name is a usage error.
    pub fn with_plugins(plugins: &[&str]) -> Result<Self, Error> {
        let mut options = Options::default();
        for name in plugins {
            if !options.extension.enable(name) {
                return Err(Error::UnknownPlugin((*name).to_string()));
            }
        }
        Ok(Markdown { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Parses and renders `source` with this processor's options. In
    /// strict-contracts mode, diagnostics become errors via
    /// [`Markdown::try_convert`]; this method renders regardless.
    pub fn convert(&self, source: &str) -> String {
        markdown_to_html(source, &self.options)
    }

    /// Like [`Markdown::convert`], but honors
    /// [`ParseOptions::strict_contracts`]: any contract diagnostic fails
    /// the conversion.
    pub fn try_convert(&self, source: &str) -> Result<String, Error> {
        let doc = parse(source, &self.options);
        if self.options.parse.strict_contracts {
            if let Some(violation) = doc.diagnostics.first() {
                return Err(Error::Contract(violation.clone()));
            }
        }
        Ok(render(&doc, &self.options))
    }
}
