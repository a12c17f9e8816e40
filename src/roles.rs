//! Inline role support: the handler trait and the name → handler registry.
//!
//! Roles are `` {name}`content` `` spans. The content is a single raw
//! string; a handler may carve a target out of it at parse time (the
//! `abbr` role does) but no inline parsing happens unless a handler does
//! it itself.

use std::fmt::{self, Debug};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::nodes::{Role, SourceLocation};
use crate::strings;

/// An inline role implementation. Handlers are stateless and may be
/// called concurrently.
pub trait RoleHandler: Send + Sync {
    fn names(&self) -> &[&str];

    /// Builds the AST node; the default stores the trimmed content.
    fn parse(&self, name: &str, content: &str, location: SourceLocation) -> Role {
        Role {
            location,
            name: name.to_string(),
            content: content.trim().to_string(),
            target: None,
        }
    }

    /// Appends HTML for the node.
    fn render(&self, node: &Role, output: &mut String) {
        output.push_str("<span class=\"role role-");
        strings::escape_html(output, &node.name);
        output.push_str("\">");
        strings::escape_html(output, &node.content);
        output.push_str("</span>");
    }
}

/// Immutable role registry. Build with [`RoleRegistryBuilder`].
pub struct RoleRegistry {
    by_name: FxHashMap<String, Arc<dyn RoleHandler>>,
}

impl RoleRegistry {
    pub fn get(&self, name: &str) -> Option<&Arc<dyn RoleHandler>> {
        self.by_name.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The registry of built-in formatting roles: `kbd`, `abbr`, `sub`,
    /// `sup`.
    pub fn with_defaults() -> RoleRegistry {
        let mut builder = RoleRegistryBuilder::new();
        builder
            .register(Arc::new(KbdRole))
            .register(Arc::new(AbbrRole))
            .register(Arc::new(SubRole))
            .register(Arc::new(SupRole));
        builder.build()
    }
}

impl Debug for RoleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleRegistry").field("names", &self.names()).finish()
    }
}

/// Mutable registration phase for [`RoleRegistry`].
#[derive(Default)]
pub struct RoleRegistryBuilder {
    by_name: FxHashMap<String, Arc<dyn RoleHandler>>,
}

impl RoleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under all its names; a taken name keeps its
    /// first registration and logs a warning.
    pub fn register(&mut self, handler: Arc<dyn RoleHandler>) -> &mut Self {
        for name in handler.names() {
            if self.by_name.contains_key(*name) {
                log::warn!("role {:?} already registered; keeping the first handler", name);
                continue;
            }
            self.by_name.insert((*name).to_string(), Arc::clone(&handler));
        }
        self
    }

    pub fn build(self) -> RoleRegistry {
        RoleRegistry { by_name: self.by_name }
    }
}

// =========================================================================
// Built-in handlers
// =========================================================================

/// `` {kbd}`Ctrl+C` `` — keyboard shortcuts; each key in its own `<kbd>`.
pub struct KbdRole;

impl RoleHandler for KbdRole {
    fn names(&self) -> &[&str] {
        &["kbd"]
    }

    fn render(&self, node: &Role, output: &mut String) {
        let content = node.content.as_str();

        if content == "+" || !content.contains('+') {
            output.push_str("<kbd>");
            strings::escape_html(output, content);
            output.push_str("</kbd>");
            return;
        }

        let keys: Vec<&str> = content.split('+').collect();
        let mut parts: Vec<String> = Vec::with_capacity(keys.len());
        let mut i = 0;
        while i < keys.len() {
            let key = keys[i].trim();
            if !key.is_empty() {
                parts.push(format!("<kbd>{}</kbd>", strings::escape_html_string(key)));
            } else if i + 1 < keys.len() && keys[i + 1].trim().is_empty() {
                // Two consecutive empty parts come from "++": a literal +.
                parts.push("<kbd>+</kbd>".to_string());
                i += 1;
            }
            i += 1;
        }

        output.push_str(&parts.join("+"));
    }
}

/// `` {abbr}`HTML (HyperText Markup Language)` `` — abbreviation with the
/// expansion pulled into the node's target.
pub struct AbbrRole;

impl RoleHandler for AbbrRole {
    fn names(&self) -> &[&str] {
        &["abbr"]
    }

    fn parse(&self, name: &str, content: &str, location: SourceLocation) -> Role {
        let content = content.trim();
        let mut abbr = content;
        let mut expansion = None;

        if content.ends_with(')') {
            if let Some(paren) = content.rfind('(') {
                abbr = content[..paren].trim_end();
                expansion = Some(content[paren + 1..content.len() - 1].trim().to_string());
            }
        }

        Role {
            location,
            name: name.to_string(),
            content: abbr.to_string(),
            target: expansion,
        }
    }

    fn render(&self, node: &Role, output: &mut String) {
        match &node.target {
            Some(expansion) => {
                output.push_str("<abbr title=\"");
                strings::escape_html(output, expansion);
                output.push_str("\">");
                strings::escape_html(output, &node.content);
                output.push_str("</abbr>");
            }
            None => {
                output.push_str("<abbr>");
                strings::escape_html(output, &node.content);
                output.push_str("</abbr>");
            }
        }
    }
}

/// `` H{sub}`2`O `` — subscript.
pub struct SubRole;

impl RoleHandler for SubRole {
    fn names(&self) -> &[&str] {
        &["sub"]
    }

    fn render(&self, node: &Role, output: &mut String) {
        output.push_str("<sub>");
        strings::escape_html(output, &node.content);
        output.push_str("</sub>");
    }
}

/// `` E = mc{sup}`2` `` — superscript.
pub struct SupRole;

impl RoleHandler for SupRole {
    fn names(&self) -> &[&str] {
        &["sup"]
    }

    fn render(&self, node: &Role, output: &mut String) {
        output.push_str("<sup>");
        strings::escape_html(output, &node.content);
        output.push_str("</sup>");
    }
}
