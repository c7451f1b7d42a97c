//! Code block highlighting transform.

use crate::ast::{Block, Format};
use crate::highlight::{Highlight, Highlighted};
use crate::walk::{Action, FilterContext, Transform};

/// Output formats that render raw `html` blocks.
const HTML_FORMATS: &[&str] = &[
    "html", "html4", "html5", "chunkedhtml", "epub", "epub2", "epub3", "revealjs", "s5",
    "slideous", "slidy", "dzslides",
];

/// Whether `format` renders raw HTML. Pandoc format names may carry extensions (`html5+smart`).
pub fn is_html_format(format: &str) -> bool {
    let base = format
        .split(|c| c == '+' || c == '-')
        .next()
        .unwrap_or(format);
    HTML_FORMATS.contains(&base)
}

/// Wrap highlighted markup the way Prism-style stylesheets expect it.
///
/// `markup` is inserted as-is; `language` is interpolated verbatim.
pub fn wrap_markup(language: &str, markup: &str) -> String {
    format!("<pre class=\"language-{language}\"><code>{markup}</code></pre>")
}

/// What happened to one code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Replaced by highlighted raw HTML.
    Highlighted { language: String },
    /// Left alone: no language class.
    NoLanguage,
    /// Left alone: no grammar for the declared language.
    Unsupported { language: String },
}

/// Per-run record of code block decisions, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub outcomes: Vec<Outcome>,
}

impl TransformReport {
    pub fn blocks_highlighted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Outcome::Highlighted { .. }))
            .count()
    }

    pub fn blocks_skipped(&self) -> usize {
        self.outcomes.len() - self.blocks_highlighted()
    }

    /// Distinct unsupported languages, in the order they were first seen.
    pub fn unsupported_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = Vec::new();
        for outcome in &self.outcomes {
            if let Outcome::Unsupported { language } = outcome
                && !languages.contains(&language.as_str())
            {
                languages.push(language);
            }
        }
        languages
    }
}

/// Replaces code blocks in a registered language with highlighted `html` raw blocks.
pub struct CodeBlockTransformer<H> {
    highlighter: H,
    html_only: bool,
    report: TransformReport,
}

impl<H: Highlight> CodeBlockTransformer<H> {
    pub fn new(highlighter: H) -> Self {
        Self {
            highlighter,
            html_only: false,
            report: TransformReport::default(),
        }
    }

    /// Leave every block alone when the output format cannot render raw HTML.
    pub fn html_only(mut self, html_only: bool) -> Self {
        self.html_only = html_only;
        self
    }

    pub fn report(&self) -> &TransformReport {
        &self.report
    }

    pub fn into_report(self) -> TransformReport {
        self.report
    }
}

impl<H: Highlight> Transform for CodeBlockTransformer<H> {
    fn block(&mut self, block: &Block, ctx: &FilterContext<'_>) -> Action<Block> {
        let Block::CodeBlock(attr, code) = block else {
            return Action::Decline;
        };

        if self.html_only && !is_html_format(ctx.format) {
            return Action::Decline;
        }

        let Some(language) = attr.language() else {
            self.report.outcomes.push(Outcome::NoLanguage);
            return Action::Decline;
        };

        match self.highlighter.highlight(language, code) {
            Highlighted::Markup(markup) => {
                self.report.outcomes.push(Outcome::Highlighted {
                    language: language.to_string(),
                });
                Action::Replace(Block::RawBlock(
                    Format::html(),
                    wrap_markup(language, &markup),
                ))
            }
            Highlighted::Unsupported => {
                self.report.outcomes.push(Outcome::Unsupported {
                    language: language.to_string(),
                });
                Action::Decline
            }
        }
    }
}
