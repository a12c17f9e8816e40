//! Options for parsing and rendering.

use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::directives::DirectiveRegistry;
use crate::roles::RoleRegistry;

/// Callback applied to plain text lines during lexing and to text nodes
/// during rendering.
pub type TextTransformer = dyn Fn(&str) -> String + Send + Sync;

/// Callback overriding the default heading-slug generator.
pub type SlugifyFn = dyn Fn(&str) -> String + Send + Sync;

/// Collaborator the renderer dispatches fenced code through when
/// highlighting is requested. Returning `None` falls back to the plain
/// `<pre><code>` rendering.
pub trait SyntaxHighlighter: Send + Sync {
    fn highlight(&self, code: &str, lang: &str) -> Option<String>;
}

/// Umbrella options struct: extensions, parsing, and rendering.
#[derive(Default, Debug, Clone)]
pub struct Options {
    pub extension: ExtensionOptions,
    pub parse: ParseOptions,
    pub render: RenderOptions,
}

/// Flags for syntax extensions on top of CommonMark 0.31.2.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ExtensionOptions {
    /// GFM pipe tables in paragraph context.
    pub table: bool,

    /// `~~text~~` strikethrough.
    pub strikethrough: bool,

    /// `- [ ]` / `- [x]` checkboxes on list items.
    pub tasklist: bool,

    /// `[^id]` references and `[^id]:` definitions.
    pub footnotes: bool,

    /// `$…$` inline and `$$…$$` block math.
    pub math: bool,

    /// Bare URL, `www.`, and e-mail autolinking.
    pub autolink: bool,
}

impl ExtensionOptions {
    /// Enables the extension with the given plugin name. `"all"` enables
    /// everything. Returns false for unknown names.
    pub fn enable(&mut self, name: &str) -> bool {
        match name {
            "table" => self.table = true,
            "strikethrough" => self.strikethrough = true,
            "task_lists" | "tasklist" => self.tasklist = true,
            "footnotes" => self.footnotes = true,
            "math" => self.math = true,
            "autolinks" | "autolink" => self.autolink = true,
            "all" => {
                self.table = true;
                self.strikethrough = true;
                self.tasklist = true;
                self.footnotes = true;
                self.math = true;
                self.autolink = true;
            }
            _ => return false,
        }
        true
    }
}

/// Options affecting parsing.
#[derive(Default, Clone)]
pub struct ParseOptions {
    /// Upgrade directive contract violations from diagnostics to errors.
    pub strict_contracts: bool,

    /// Directive name → handler lookup. `None` parses every directive into
    /// a generic node.
    pub directives: Option<Arc<DirectiveRegistry>>,

    /// Role name → handler lookup.
    pub roles: Option<Arc<RoleRegistry>>,

    /// Transformer applied to plain text during lexing.
    pub text_transformer: Option<Arc<TextTransformer>>,

    /// Source file tag carried on diagnostics.
    pub source_file: Option<String>,
}

impl Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("strict_contracts", &self.strict_contracts)
            .field("directives", &self.directives.as_ref().map(|r| r.names()))
            .field("roles", &self.roles.as_ref().map(|r| r.names()))
            .field(
                "text_transformer",
                &self.text_transformer.as_ref().map(|_| "<fn>"),
            )
            .field("source_file", &self.source_file)
            .finish()
    }
}

/// Options affecting HTML rendering.
#[derive(Default, Clone)]
pub struct RenderOptions {
    /// Override for the heading-slug generator.
    pub slugify: Option<Arc<SlugifyFn>>,

    /// When set, fenced code with a language is dispatched through this
    /// collaborator.
    pub highlighter: Option<Arc<dyn SyntaxHighlighter>>,
}

impl Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("slugify", &self.slugify.as_ref().map(|_| "<fn>"))
            .field("highlighter", &self.highlighter.as_ref().map(|_| "<dyn>"))
            .finish()
    }
}
