//! Filter driver: decode, walk, encode.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use crate::ast::{Pandoc, dotted_version};
use crate::codec;
use crate::error::FilterError;
use crate::highlight::Highlight;
use crate::transform::{CodeBlockTransformer, TransformReport};
use crate::walk::walk_document;

/// Options for the filter.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Output format pandoc is converting to (its first argument to filters).
    pub format: String,
    /// Only highlight when `format` renders raw HTML.
    pub html_only: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            format: "html".to_string(),
            html_only: false,
        }
    }
}

/// Statistics from one filter run.
#[derive(Debug, Default)]
pub struct FilterStats {
    /// Code block decisions.
    pub report: TransformReport,
    /// `pandoc-api-version` of the input document.
    pub api_version: Vec<u32>,
    /// Whether that version matches the node shapes this crate knows.
    pub api_version_supported: bool,
    /// Bytes read from the input.
    pub bytes_input: u64,
    /// Bytes written to the output.
    pub bytes_output: u64,
    /// Time spent decoding, walking and encoding.
    pub process_duration: Duration,
}

impl FilterStats {
    /// Dotted form of the input api version.
    pub fn api_version_string(&self) -> String {
        dotted_version(&self.api_version)
    }
}

/// Pandoc filter that highlights code blocks.
pub struct Filter<H> {
    options: FilterOptions,
    highlighter: H,
}

impl<H: Highlight> Filter<H> {
    /// Create a new filter with the given options and highlighter.
    pub fn new(options: FilterOptions, highlighter: H) -> Self {
        Self {
            options,
            highlighter,
        }
    }

    /// Transform an already decoded document.
    pub fn transform(&mut self, doc: Pandoc) -> (Pandoc, TransformReport) {
        let mut transformer =
            CodeBlockTransformer::new(&mut self.highlighter).html_only(self.options.html_only);
        let doc = walk_document(doc, &self.options.format, &mut transformer);
        (doc, transformer.into_report())
    }

    /// Filter a whole document from `reader` to `writer`.
    ///
    /// Nothing is written unless the input decoded and the output encoded.
    pub fn process<R: Read, W: Write>(
        &mut self,
        reader: R,
        writer: W,
    ) -> Result<FilterStats, FilterError> {
        let start = Instant::now();

        let (doc, bytes_input) = codec::read_from(reader)?;
        let api_version = doc.api_version.clone();
        let api_version_supported = doc.api_version_supported();

        let (doc, report) = self.transform(doc);
        let output = codec::encode(&doc)?;
        let process_duration = start.elapsed();

        codec::write_to(writer, &output)?;

        Ok(FilterStats {
            report,
            api_version,
            api_version_supported,
            bytes_input: bytes_input as u64,
            bytes_output: output.len() as u64,
            process_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::tests::WordHighlighter;
    use indoc::indoc;

    fn envelope(blocks: &str) -> String {
        format!(r#"{{"pandoc-api-version":[1,23,1],"meta":{{}},"blocks":[{blocks}]}}"#)
    }

    fn filter_str(input: &str) -> Result<(String, FilterStats), FilterError> {
        let mut filter = Filter::new(FilterOptions::default(), WordHighlighter);
        let mut out = Vec::new();
        let stats = filter.process(input.as_bytes(), &mut out)?;
        Ok((String::from_utf8(out).unwrap(), stats))
    }

    #[test]
    fn test_end_to_end_js_block() {
        let input = envelope(r#"{"t":"CodeBlock","c":[["",["js"],[]],"let x = 1;"]}"#);
        let (output, stats) = filter_str(&input).unwrap();

        assert_eq!(
            output,
            envelope(
                r#"{"t":"RawBlock","c":["html","<pre class=\"language-js\"><code><w>let</w> <w>x</w> <w>=</w> <w>1;</w></code></pre>"]}"#
            )
        );
        assert_eq!(stats.report.blocks_highlighted(), 1);
        assert_eq!(stats.bytes_input, input.len() as u64);
        assert_eq!(stats.bytes_output, output.len() as u64);
    }

    #[test]
    fn test_passthrough_is_byte_identical() {
        let input = envelope(concat!(
            r#"{"t":"CodeBlock","c":[["",[],[]],"no language"]},"#,
            r#"{"t":"CodeBlock","c":[["x",["cobol85"],[["k","v"]]],"DISPLAY 'HI'."]},"#,
            r#"{"t":"Div","c":[["d",["note"],[]],[{"t":"Para","c":[{"t":"Str","c":"text"}]}]]}"#
        ));
        let (output, stats) = filter_str(&input).unwrap();

        assert_eq!(output, input);
        assert_eq!(stats.report.blocks_highlighted(), 0);
        assert_eq!(stats.report.unsupported_languages(), vec!["cobol85"]);
    }

    #[test]
    fn test_malformed_input_writes_nothing() {
        let input = indoc! {r#"
            {"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"CodeBlock","c":[["",["js"],[]]
        "#};

        let mut filter = Filter::new(FilterOptions::default(), WordHighlighter);
        let mut out = Vec::new();
        let result = filter.process(input.as_bytes(), &mut out);

        assert!(matches!(result, Err(FilterError::MalformedInput(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_api_version_is_reported_and_kept() {
        let input = r#"{"pandoc-api-version":[1,22,2,1],"meta":{},"blocks":[]}"#;
        let (output, stats) = filter_str(input).unwrap();

        assert_eq!(output, input);
        assert!(!stats.api_version_supported);
        assert_eq!(stats.api_version_string(), "1.22.2.1");
    }

    #[test]
    #[cfg(feature = "lang-javascript")]
    fn test_end_to_end_with_arborium() {
        use crate::highlight::{ArboriumHighlighter, GrammarRegistry};

        let registry = GrammarRegistry::default();
        let mut filter = Filter::new(FilterOptions::default(), ArboriumHighlighter::new(&registry));

        let input = envelope(r#"{"t":"CodeBlock","c":[["",["js"],[]],"let x = 1;"]}"#);
        let mut out = Vec::new();
        filter.process(input.as_bytes(), &mut out).unwrap();

        let doc = codec::decode(&out).unwrap();
        let [crate::ast::Block::RawBlock(format, html)] = doc.blocks.as_slice() else {
            panic!("expected a single raw block, got {:?}", doc.blocks);
        };
        assert_eq!(format.0, "html");
        assert_eq!(
            html,
            "<pre class=\"language-js\"><code><a-k>let</a-k> <a-v>x</a-v> <a-o>=</a-o> <a-n>1</a-n><a-p>;</a-p></code></pre>"
        );
    }
}
