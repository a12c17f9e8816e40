//! Block-level directive support: the handler trait, nesting contracts,
//! typed option coercion, and the name → handler registry.
//!
//! Registries follow a two-phase build: a mutable
//! [`DirectiveRegistryBuilder`] accepts registrations, and `build()`
//! produces an immutable [`DirectiveRegistry`] that is freely shared
//! across threads.

use std::fmt::{self, Debug};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::nodes::{Block, Directive, SourceLocation};
use crate::strings;

/// A directive option value, coerced from its raw `:key: value` string by
/// the kind the handler declared for the key. Undeclared keys stay `Str`.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Kinds a handler may declare for its option keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Str,
    Bool,
    Int,
    Float,
}

/// The option record attached to a [`Directive`] node. Preserves source
/// order; `class` is aliased to `class_` at insertion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectiveOptions {
    entries: Vec<(String, OptionValue)>,
}

impl DirectiveOptions {
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(OptionValue::as_bool).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Coerces raw key/value pairs using the handler's declared kinds.
    /// A value that fails coercion stays a string and logs a warning.
    pub fn from_raw(raw: &[(String, String)], declared: &[(&str, OptionKind)]) -> Self {
        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let key = if key == "class" { "class_" } else { key.as_str() };
            let kind = declared
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, kind)| *kind)
                .unwrap_or(OptionKind::Str);
            let coerced = match kind {
                OptionKind::Str => OptionValue::Str(value.clone()),
                OptionKind::Bool => OptionValue::Bool(matches!(
                    value.to_lowercase().as_str(),
                    "true" | "yes" | "1" | ""
                )),
                OptionKind::Int => match value.parse::<i64>() {
                    Ok(i) => OptionValue::Int(i),
                    Err(_) => {
                        log::warn!("invalid integer for directive option {:?}: {:?}", key, value);
                        OptionValue::Str(value.clone())
                    }
                },
                OptionKind::Float => match value.parse::<f64>() {
                    Ok(f) => OptionValue::Float(f),
                    Err(_) => {
                        log::warn!("invalid float for directive option {:?}: {:?}", key, value);
                        OptionValue::Str(value.clone())
                    }
                },
            };
            entries.push((key.to_string(), coerced));
        }
        DirectiveOptions { entries }
    }
}

/// Validation rules for directive nesting, declared per handler.
/// Violations are diagnostics by default and errors in strict mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveContract {
    /// This directive must sit inside one of these parents.
    pub requires_parent: Option<Vec<String>>,

    /// Intended parents; violations are always just warnings.
    pub allows_parent: Option<Vec<String>>,

    /// The directive must contain at least one of these children.
    pub requires_children: Option<Vec<String>>,

    /// Only these child directives are allowed (`None` = any).
    pub allows_children: Option<Vec<String>>,

    /// Maximum number of children allowed.
    pub max_children: Option<usize>,

    /// These child directives are forbidden.
    pub forbids_children: Option<Vec<String>>,
}

impl DirectiveContract {
    pub fn validate_parent(
        &self,
        directive_name: &str,
        parent_name: Option<&str>,
    ) -> Option<ContractViolation> {
        if let Some(required) = &self.requires_parent {
            match parent_name {
                None => {
                    return Some(ContractViolation {
                        directive: directive_name.to_string(),
                        kind: ViolationKind::MissingParent,
                        message: format!(
                            "'{}' must be inside: {}",
                            directive_name,
                            required.join(", ")
                        ),
                        expected: required.clone(),
                    });
                }
                Some(parent) if !required.iter().any(|r| r == parent) => {
                    return Some(ContractViolation {
                        directive: directive_name.to_string(),
                        kind: ViolationKind::WrongParent,
                        message: format!(
                            "'{}' must be inside {}, not '{}'",
                            directive_name,
                            required.join(", "),
                            parent
                        ),
                        expected: required.clone(),
                    });
                }
                _ => {}
            }
        }

        if let Some(allowed) = &self.allows_parent {
            let ok = matches!(parent_name, Some(p) if allowed.iter().any(|a| a == p));
            if !ok {
                return Some(ContractViolation {
                    directive: directive_name.to_string(),
                    kind: ViolationKind::SuggestedParent,
                    message: format!(
                        "'{}' is intended to be inside: {}",
                        directive_name,
                        allowed.join(", ")
                    ),
                    expected: allowed.clone(),
                });
            }
        }

        None
    }

    pub fn validate_children(
        &self,
        directive_name: &str,
        children: &[Block],
    ) -> Vec<ContractViolation> {
        let mut violations = Vec::new();
        let child_names: Vec<&str> = children
            .iter()
            .filter_map(|c| match c {
                Block::Directive(d) => Some(d.name.as_str()),
                _ => None,
            })
            .collect();

        if let Some(required) = &self.requires_children {
            let has_required = child_names.iter().any(|n| required.iter().any(|r| r == n));
            if !has_required && !children.is_empty() {
                violations.push(ContractViolation {
                    directive: directive_name.to_string(),
                    kind: ViolationKind::MissingRequiredChild,
                    message: format!(
                        "'{}' requires at least one of: {}",
                        directive_name,
                        required.join(", ")
                    ),
                    expected: required.clone(),
                });
            }
        }

        if let Some(allowed) = &self.allows_children {
            for name in &child_names {
                if !allowed.iter().any(|a| a == name) {
                    violations.push(ContractViolation {
                        directive: directive_name.to_string(),
                        kind: ViolationKind::ForbiddenChild,
                        message: format!("'{}' is not allowed inside '{}'", name, directive_name),
                        expected: allowed.clone(),
                    });
                }
            }
        }

        if let Some(forbidden) = &self.forbids_children {
            for name in &child_names {
                if forbidden.iter().any(|f| f == name) {
                    violations.push(ContractViolation {
                        directive: directive_name.to_string(),
                        kind: ViolationKind::ForbiddenChild,
                        message: format!("'{}' is forbidden inside '{}'", name, directive_name),
                        expected: Vec::new(),
                    });
                }
            }
        }

        if let Some(max) = self.max_children {
            if children.len() > max {
                violations.push(ContractViolation {
                    directive: directive_name.to_string(),
                    kind: ViolationKind::TooManyChildren,
                    message: format!(
                        "'{}' allows max {} children, got {}",
                        directive_name,
                        max,
                        children.len()
                    ),
                    expected: Vec::new(),
                });
            }
        }

        violations
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    MissingParent,
    WrongParent,
    SuggestedParent,
    MissingRequiredChild,
    ForbiddenChild,
    TooManyChildren,
    UnclosedDirective,
}

/// Record of one contract violation, with enough structure for a caller
/// to build a fix suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractViolation {
    pub directive: String,
    pub kind: ViolationKind,
    pub message: String,
    pub expected: Vec<String>,
}

impl ContractViolation {
    pub fn suggestion(&self) -> Option<String> {
        match self.kind {
            ViolationKind::MissingParent => self.expected.first().map(|parent| {
                format!("Wrap '{}' inside a ':::{{{}}}' block", self.directive, parent)
            }),
            ViolationKind::MissingRequiredChild => self.expected.first().map(|child| {
                format!("Add at least one ':::{{{}}}' inside '{}'", child, self.directive)
            }),
            _ => None,
        }
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A block-level directive implementation. Handlers are stateless; the
/// same instance may be called concurrently from several threads.
pub trait DirectiveHandler: Send + Sync {
    /// Directive names this handler responds to.
    fn names(&self) -> &[&str];

    /// Identifier for grouping related names, e.g. `"admonition"`.
    fn token_type(&self) -> &str;

    fn contract(&self) -> Option<&DirectiveContract> {
        None
    }

    /// Declared option keys and their kinds, used for raw-option coercion.
    fn option_kinds(&self) -> &[(&'static str, OptionKind)] {
        &[]
    }

    /// When true, the parser stores the unparsed body on
    /// `Directive::raw_content`.
    fn preserves_raw_content(&self) -> bool {
        false
    }

    /// Builds the AST node. The default keeps everything as parsed.
    fn parse(
        &self,
        name: &str,
        title: Option<&str>,
        options: DirectiveOptions,
        raw_content: Option<String>,
        children: Vec<Block>,
        location: SourceLocation,
    ) -> Directive {
        Directive {
            location,
            name: name.to_string(),
            title: title.map(str::to_string),
            options,
            children,
            raw_content,
        }
    }

    /// Appends HTML for the node. `rendered_children` is the pre-rendered
    /// HTML of the body.
    fn render(&self, node: &Directive, rendered_children: &str, output: &mut String) {
        output.push_str("<div class=\"directive directive-");
        strings::escape_html(output, &node.name);
        output.push_str("\">\n");
        if let Some(title) = &node.title {
            output.push_str("<p class=\"directive-title\">");
            strings::escape_html(output, title);
            output.push_str("</p>\n");
        }
        output.push_str(rendered_children);
        output.push_str("</div>\n");
    }
}

/// Immutable directive registry. Build with [`DirectiveRegistryBuilder`].
pub struct DirectiveRegistry {
    handlers: Vec<Arc<dyn DirectiveHandler>>,
    by_name: FxHashMap<String, Arc<dyn DirectiveHandler>>,
}

impl DirectiveRegistry {
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DirectiveHandler>> {
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

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// The registry of built-in handlers: admonitions, `dropdown`, and
    /// `tab-set`/`tab-item`.
    pub fn with_defaults() -> DirectiveRegistry {
        let mut builder = DirectiveRegistryBuilder::new();
        builder
            .register(Arc::new(AdmonitionDirective))
            .register(Arc::new(DropdownDirective))
            .register(Arc::new(TabSetDirective))
            .register(Arc::new(TabItemDirective));
        builder.build()
    }
}

impl Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveRegistry").field("names", &self.names()).finish()
    }
}

/// Mutable registration phase for [`DirectiveRegistry`].
#[derive(Default)]
pub struct DirectiveRegistryBuilder {
    handlers: Vec<Arc<dyn DirectiveHandler>>,
    by_name: FxHashMap<String, Arc<dyn DirectiveHandler>>,
}

impl DirectiveRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under all its names. A name that is already
    /// taken keeps its first registration and logs a warning.
    pub fn register(&mut self, handler: Arc<dyn DirectiveHandler>) -> &mut Self {
        for name in handler.names() {
            if self.by_name.contains_key(*name) {
                log::warn!("directive {:?} already registered; keeping the first handler", name);
                continue;
            }
            self.by_name.insert((*name).to_string(), Arc::clone(&handler));
        }
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> DirectiveRegistry {
        DirectiveRegistry {
            handlers: self.handlers,
            by_name: self.by_name,
        }
    }
}

// =========================================================================
// Built-in handlers
// =========================================================================

/// Admonition boxes: note, warning, tip, and friends.
pub struct AdmonitionDirective;

impl DirectiveHandler for AdmonitionDirective {
    fn names(&self) -> &[&str] {
        &[
            "note",
            "warning",
            "tip",
            "danger",
            "important",
            "caution",
            "attention",
            "hint",
            "error",
            "admonition",
        ]
    }

    fn token_type(&self) -> &str {
        "admonition"
    }

    fn option_kinds(&self) -> &[(&'static str, OptionKind)] {
        &[
            ("class_", OptionKind::Str),
            ("name", OptionKind::Str),
            ("collapsible", OptionKind::Bool),
            ("open", OptionKind::Bool),
        ]
    }

    fn render(&self, node: &Directive, rendered_children: &str, output: &mut String) {
        output.push_str("<div class=\"admonition ");
        strings::escape_html(output, &node.name);
        if let Some(extra) = node.options.get_str("class_") {
            output.push(' ');
            strings::escape_html(output, extra);
        }
        output.push_str("\">\n<p class=\"admonition-title\">");
        match &node.title {
            Some(title) => strings::escape_html(output, title),
            None => {
                let mut chars = node.name.chars();
                if let Some(first) = chars.next() {
                    output.extend(first.to_uppercase());
                    output.push_str(chars.as_str());
                }
            }
        }
        output.push_str("</p>\n");
        output.push_str(rendered_children);
        output.push_str("</div>\n");
    }
}

/// Collapsible content rendered as `<details>`.
pub struct DropdownDirective;

impl DirectiveHandler for DropdownDirective {
    fn names(&self) -> &[&str] {
        &["dropdown"]
    }

    fn token_type(&self) -> &str {
        "dropdown"
    }

    fn option_kinds(&self) -> &[(&'static str, OptionKind)] {
        &[("class_", OptionKind::Str), ("open", OptionKind::Bool)]
    }

    fn render(&self, node: &Directive, rendered_children: &str, output: &mut String) {
        output.push_str("<details class=\"dropdown\"");
        if node.options.get_bool("open", false) {
            output.push_str(" open");
        }
        output.push_str(">\n<summary>");
        strings::escape_html(output, node.title.as_deref().unwrap_or("Details"));
        output.push_str("</summary>\n");
        output.push_str(rendered_children);
        output.push_str("</details>\n");
    }
}

/// Container of tabbed panes; only `tab-item` children make sense.
pub struct TabSetDirective;

impl DirectiveHandler for TabSetDirective {
    fn names(&self) -> &[&str] {
        &["tab-set"]
    }

    fn token_type(&self) -> &str {
        "tabs"
    }

    fn contract(&self) -> Option<&DirectiveContract> {
        static CONTRACT: std::sync::OnceLock<DirectiveContract> = std::sync::OnceLock::new();
        Some(CONTRACT.get_or_init(|| DirectiveContract {
            requires_children: Some(vec!["tab-item".to_string()]),
            allows_children: Some(vec!["tab-item".to_string()]),
            ..DirectiveContract::default()
        }))
    }

    fn option_kinds(&self) -> &[(&'static str, OptionKind)] {
        &[("class_", OptionKind::Str), ("sync-group", OptionKind::Str)]
    }

    fn render(&self, _node: &Directive, rendered_children: &str, output: &mut String) {
        output.push_str("<div class=\"tab-set\">\n");
        output.push_str(rendered_children);
        output.push_str("</div>\n");
    }
}

/// One tab pane; must live inside a `tab-set`.
pub struct TabItemDirective;

impl DirectiveHandler for TabItemDirective {
    fn names(&self) -> &[&str] {
        &["tab-item"]
    }

    fn token_type(&self) -> &str {
        "tabs"
    }

    fn contract(&self) -> Option<&DirectiveContract> {
        static CONTRACT: std::sync::OnceLock<DirectiveContract> = std::sync::OnceLock::new();
        Some(CONTRACT.get_or_init(|| DirectiveContract {
            requires_parent: Some(vec!["tab-set".to_string()]),
            ..DirectiveContract::default()
        }))
    }

    fn option_kinds(&self) -> &[(&'static str, OptionKind)] {
        &[("selected", OptionKind::Bool), ("sync", OptionKind::Str)]
    }

    fn render(&self, node: &Directive, rendered_children: &str, output: &mut String) {
        output.push_str("<div class=\"tab-item\" data-title=\"");
        strings::escape_html(output, node.title.as_deref().unwrap_or(""));
        output.push_str("\">\n");
        output.push_str(rendered_children);
        output.push_str("</div>\n");
    }
}
