//! Typed pandoc document AST.
//!
//! Mirrors pandoc's JSON representation: every node is an object with a `t` tag
//! and, when the node carries data, a `c` payload. Positional payloads such as
//! attributes or table rows are decoded into named records here, once, so the
//! rest of the crate never indexes into untyped arrays.
//!
//! Metadata is kept as raw JSON. Nothing in the filter looks at it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// `pandoc-api-version` prefix whose node shapes match this module.
pub const SUPPORTED_API_VERSION: [u32; 2] = [1, 23];

/// Generates tuple-shaped serde impls for a record with named fields.
///
/// Serialization borrows the fields, so writing a record never clones its subtree.
macro_rules! tuple_record {
    ($name:ident { $($field:ident: $ty:ty),+ $(,)? }) => {
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                ($(&self.$field,)+).serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let ($($field,)+) = <($($ty,)+)>::deserialize(deserializer)?;
                Ok(Self { $($field),+ })
            }
        }
    };
}

/// The document envelope pandoc hands to filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pandoc {
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Vec<u32>,
    pub meta: Map<String, Value>,
    pub blocks: Vec<Block>,
}

impl Pandoc {
    /// Whether the envelope was produced by a pandoc-types release this crate understands.
    pub fn api_version_supported(&self) -> bool {
        self.api_version.starts_with(&SUPPORTED_API_VERSION)
    }

    /// Dotted form of the api version, for diagnostics.
    pub fn api_version_string(&self) -> String {
        dotted_version(&self.api_version)
    }
}

/// `[1, 23, 1]` as `1.23.1`.
pub fn dotted_version(version: &[u32]) -> String {
    version
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Identifier, classes and key/value pairs attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attr {
    pub id: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

tuple_record!(Attr {
    id: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
});

impl Attr {
    /// The declared language of a code node: its first class, if non-empty.
    pub fn language(&self) -> Option<&str> {
        self.classes
            .first()
            .map(String::as_str)
            .filter(|class| !class.is_empty())
    }
}

/// Name of a raw output format, e.g. `html` or `latex`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format(pub String);

impl Format {
    pub fn html() -> Self {
        Format("html".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    Plain(Vec<Inline>),
    Para(Vec<Inline>),
    LineBlock(Vec<Vec<Inline>>),
    CodeBlock(Attr, String),
    RawBlock(Format, String),
    BlockQuote(Vec<Block>),
    OrderedList(ListAttributes, Vec<Vec<Block>>),
    BulletList(Vec<Vec<Block>>),
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    Header(i64, Attr, Vec<Inline>),
    HorizontalRule,
    Table(Attr, Caption, Vec<ColSpec>, TableHead, Vec<TableBody>, TableFoot),
    Figure(Attr, Caption, Vec<Block>),
    Div(Attr, Vec<Block>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    Str(String),
    Emph(Vec<Inline>),
    Underline(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    Quoted(QuoteType, Vec<Inline>),
    Cite(Vec<Citation>, Vec<Inline>),
    Code(Attr, String),
    Space,
    SoftBreak,
    LineBreak,
    Math(MathType, String),
    RawInline(Format, String),
    Link(Attr, Vec<Inline>, Target),
    Image(Attr, Vec<Inline>, Target),
    Note(Vec<Block>),
    Span(Attr, Vec<Inline>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAttributes {
    pub start: i64,
    pub style: ListNumberStyle,
    pub delim: ListNumberDelim,
}

tuple_record!(ListAttributes {
    start: i64,
    style: ListNumberStyle,
    delim: ListNumberDelim,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberStyle {
    DefaultStyle,
    Example,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum ListNumberDelim {
    DefaultDelim,
    Period,
    OneParen,
    TwoParens,
}

/// Table or figure caption: an optional short form plus the full caption blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Caption {
    pub short: Option<Vec<Inline>>,
    pub long: Vec<Block>,
}

tuple_record!(Caption {
    short: Option<Vec<Inline>>,
    long: Vec<Block>,
});

#[derive(Debug, Clone, PartialEq)]
pub struct ColSpec {
    pub alignment: Alignment,
    pub width: ColWidth,
}

tuple_record!(ColSpec {
    alignment: Alignment,
    width: ColWidth,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Alignment {
    AlignLeft,
    AlignRight,
    AlignCenter,
    AlignDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum ColWidth {
    ColWidth(f64),
    ColWidthDefault,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableHead {
    pub attr: Attr,
    pub rows: Vec<Row>,
}

tuple_record!(TableHead {
    attr: Attr,
    rows: Vec<Row>,
});

#[derive(Debug, Clone, PartialEq)]
pub struct TableBody {
    pub attr: Attr,
    pub row_head_columns: i64,
    pub head: Vec<Row>,
    pub body: Vec<Row>,
}

tuple_record!(TableBody {
    attr: Attr,
    row_head_columns: i64,
    head: Vec<Row>,
    body: Vec<Row>,
});

#[derive(Debug, Clone, PartialEq)]
pub struct TableFoot {
    pub attr: Attr,
    pub rows: Vec<Row>,
}

tuple_record!(TableFoot {
    attr: Attr,
    rows: Vec<Row>,
});

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub attr: Attr,
    pub cells: Vec<Cell>,
}

tuple_record!(Row {
    attr: Attr,
    cells: Vec<Cell>,
});

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub attr: Attr,
    pub alignment: Alignment,
    pub row_span: i64,
    pub col_span: i64,
    pub blocks: Vec<Block>,
}

tuple_record!(Cell {
    attr: Attr,
    alignment: Alignment,
    row_span: i64,
    col_span: i64,
    blocks: Vec<Block>,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum MathType {
    DisplayMath,
    InlineMath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename = "citationId")]
    pub id: String,
    #[serde(rename = "citationPrefix")]
    pub prefix: Vec<Inline>,
    #[serde(rename = "citationSuffix")]
    pub suffix: Vec<Inline>,
    #[serde(rename = "citationMode")]
    pub mode: CitationMode,
    #[serde(rename = "citationNoteNum")]
    pub note_num: i64,
    #[serde(rename = "citationHash")]
    pub hash: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum CitationMode {
    AuthorInText,
    SuppressAuthor,
    NormalCitation,
}

/// Link or image destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub title: String,
}

tuple_record!(Target {
    url: String,
    title: String,
});
