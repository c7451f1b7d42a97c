//! Highlighting capability and the grammar registry behind it.
//!
//! # Registry
//!
//! [`GrammarRegistry`] decides which declared languages get highlighted at all, and
//! which arborium grammar each one is rendered with. It is built once at startup and
//! lent to the highlighter, so the set of highlighted languages is visible in one
//! place instead of depending on which grammars happen to be compiled in.
//!
//! The default set covers the fence names documents commonly use for web content
//! (`js`, `html`, `css`, `markup`, ...) plus `markdown`, `bash`, `jsx`, `json` and
//! `java`.

use std::collections::BTreeMap;

use owo_colors::OwoColorize;

use crate::error::FilterError;

/// Declared fence names and the arborium grammar each resolves to.
const DEFAULT_GRAMMARS: &[(&str, &str)] = &[
    ("javascript", "javascript"),
    ("js", "javascript"),
    ("css", "css"),
    ("html", "html"),
    ("markup", "html"),
    ("xml", "xml"),
    ("svg", "xml"),
    ("mathml", "xml"),
    ("clike", "c"),
    ("markdown", "markdown"),
    ("bash", "bash"),
    ("jsx", "javascript"),
    ("json", "json"),
    ("java", "java"),
];

/// Result of asking a highlighter for markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlighted {
    /// HTML markup for the source, already escaped where needed.
    Markup(String),
    /// No grammar is available for the language.
    Unsupported,
}

/// Turns source text in a named language into HTML markup.
pub trait Highlight {
    fn highlight(&mut self, language: &str, source: &str) -> Highlighted;
}

impl<H: Highlight + ?Sized> Highlight for &mut H {
    fn highlight(&mut self, language: &str, source: &str) -> Highlighted {
        (**self).highlight(language, source)
    }
}

/// Mapping from declared language ids to arborium grammar names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRegistry {
    grammars: BTreeMap<String, String>,
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        for (id, grammar) in DEFAULT_GRAMMARS {
            registry.register(*id, *grammar);
        }
        registry
    }
}

impl GrammarRegistry {
    /// Create an empty registry. Nothing is highlighted until ids are registered.
    pub fn new() -> Self {
        Self {
            grammars: BTreeMap::new(),
        }
    }

    /// Register `id`, replacing any previous mapping.
    pub fn register(&mut self, id: impl Into<String>, grammar: impl Into<String>) {
        self.grammars.insert(id.into(), grammar.into());
    }

    /// Register from a `--grammar` argument: `id` (grammar of the same name) or `id=grammar`.
    pub fn register_spec(&mut self, spec: &str) -> Result<(), FilterError> {
        let (id, grammar) = spec.split_once('=').unwrap_or((spec, spec));
        let (id, grammar) = (id.trim(), grammar.trim());

        if id.is_empty() || grammar.is_empty() {
            return Err(FilterError::Config(format!(
                "grammar registration {spec:?} must look like ID or ID=GRAMMAR"
            )));
        }

        self.register(id, grammar);
        Ok(())
    }

    /// Grammar registered for `id`. Lookup is exact and case-sensitive.
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.grammars.get(id).map(String::as_str)
    }

    /// Registered ids and their grammars, sorted by id.
    pub fn languages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.grammars
            .iter()
            .map(|(id, grammar)| (id.as_str(), grammar.as_str()))
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}

/// [`Highlight`] backed by arborium's tree-sitter grammars.
///
/// Only ids present in the registry are highlighted, even when arborium could
/// handle others.
pub struct ArboriumHighlighter<'r> {
    registry: &'r GrammarRegistry,
    inner: arborium::Highlighter,
}

impl<'r> ArboriumHighlighter<'r> {
    pub fn new(registry: &'r GrammarRegistry) -> Self {
        Self {
            registry,
            inner: arborium::Highlighter::new(),
        }
    }
}

impl Highlight for ArboriumHighlighter<'_> {
    fn highlight(&mut self, language: &str, source: &str) -> Highlighted {
        let Some(grammar) = self.registry.resolve(language) else {
            return Highlighted::Unsupported;
        };

        match self.inner.highlight(grammar, source) {
            Ok(markup) => Highlighted::Markup(markup),
            // Registered, but the grammar was not compiled in.
            Err(arborium::Error::UnsupportedLanguage { .. }) => Highlighted::Unsupported,
            Err(e) => {
                eprintln!(
                    "{} Failed to highlight {} block with grammar {}: {}",
                    "Warning:".yellow(),
                    language,
                    grammar,
                    e
                );
                Highlighted::Unsupported
            }
        }
    }
}
