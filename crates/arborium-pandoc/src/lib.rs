//! Pandoc filter that syntax-highlights fenced code blocks with arborium.
//!
//! Pandoc hands filters its document AST as JSON on stdin and reads the result back
//! from stdout. This crate decodes that AST, replaces every code block whose
//! language is registered with a raw HTML block holding arborium's highlighted
//! markup, and leaves every other node exactly as it came in.
//!
//! # Usage
//!
//! ```bash
//! pandoc input.md --filter arborium-pandoc -o output.html
//! ```
//!
//! # How it works
//!
//! 1. **Decoding**: the whole input is read and decoded into the typed AST in [`ast`].
//!
//! 2. **Walking**: [`walk`] offers every block and inline to a [`Transform`]; nodes the
//!    transform declines are rebuilt from their walked children.
//!
//! 3. **Highlighting**: [`CodeBlockTransformer`] looks up the first class of each code
//!    block in a [`GrammarRegistry`] and, on success, emits
//!    `<pre class="language-LANG"><code>…</code></pre>` as a raw `html` block.
//!    Blocks without a language, or in an unregistered one, pass through untouched.
//!
//! 4. **Encoding**: the document is re-encoded and written only once it is complete.
//!
//! Styling the highlighted markup is left to the page's stylesheet.

pub mod ast;
pub mod codec;
mod error;
mod filter;
mod highlight;
mod transform;
pub mod walk;

pub use error::FilterError;
pub use filter::{Filter, FilterOptions, FilterStats};
pub use highlight::{ArboriumHighlighter, GrammarRegistry, Highlight, Highlighted};
pub use transform::{CodeBlockTransformer, Outcome, TransformReport, is_html_format, wrap_markup};
pub use walk::{Action, FilterContext, Transform};
