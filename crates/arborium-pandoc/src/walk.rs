//! Structure-preserving tree walk.
//!
//! Every block and inline is offered to a [`Transform`] before its children are
//! visited. A replacement is taken as final and is not walked; a declined node is
//! rebuilt from its walked children with everything else left exactly as it was.

use serde_json::{Map, Value};

use crate::ast::{
    Block, Caption, Cell, Citation, Inline, Pandoc, Row, TableBody, TableFoot, TableHead,
};

/// Outcome of offering a node to a [`Transform`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action<T> {
    /// Use this node instead. Its subtree is not walked.
    Replace(T),
    /// Keep the node and walk into its children.
    Decline,
}

/// Read-only data available to transforms during a walk.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// Output format pandoc is converting to, e.g. `html5`.
    pub format: &'a str,
    /// Document metadata.
    pub meta: &'a Map<String, Value>,
}

/// Per-node rewrite hooks.
pub trait Transform {
    fn block(&mut self, block: &Block, ctx: &FilterContext<'_>) -> Action<Block>;

    fn inline(&mut self, _inline: &Inline, _ctx: &FilterContext<'_>) -> Action<Inline> {
        Action::Decline
    }
}

/// Walk every block of a document. Metadata and api version are moved through untouched.
pub fn walk_document<T: Transform + ?Sized>(doc: Pandoc, format: &str, transform: &mut T) -> Pandoc {
    let Pandoc {
        api_version,
        meta,
        blocks,
    } = doc;

    let blocks = {
        let ctx = FilterContext {
            format,
            meta: &meta,
        };
        walk_blocks(blocks, transform, &ctx)
    };

    Pandoc {
        api_version,
        meta,
        blocks,
    }
}

pub fn walk_blocks<T: Transform + ?Sized>(
    blocks: Vec<Block>,
    transform: &mut T,
    ctx: &FilterContext<'_>,
) -> Vec<Block> {
    blocks
        .into_iter()
        .map(|block| walk_block(block, transform, ctx))
        .collect()
}

pub fn walk_inlines<T: Transform + ?Sized>(
    inlines: Vec<Inline>,
    transform: &mut T,
    ctx: &FilterContext<'_>,
) -> Vec<Inline> {
    inlines
        .into_iter()
        .map(|inline| walk_inline(inline, transform, ctx))
        .collect()
}

pub fn walk_block<T: Transform + ?Sized>(
    block: Block,
    transform: &mut T,
    ctx: &FilterContext<'_>,
) -> Block {
    if let Action::Replace(replacement) = transform.block(&block, ctx) {
        return replacement;
    }

    match block {
        Block::Plain(inlines) => Block::Plain(walk_inlines(inlines, transform, ctx)),
        Block::Para(inlines) => Block::Para(walk_inlines(inlines, transform, ctx)),
        Block::LineBlock(lines) => Block::LineBlock(
            lines
                .into_iter()
                .map(|line| walk_inlines(line, transform, ctx))
                .collect(),
        ),
        Block::BlockQuote(blocks) => Block::BlockQuote(walk_blocks(blocks, transform, ctx)),
        Block::OrderedList(attrs, items) => {
            Block::OrderedList(attrs, walk_list_items(items, transform, ctx))
        }
        Block::BulletList(items) => Block::BulletList(walk_list_items(items, transform, ctx)),
        Block::DefinitionList(entries) => Block::DefinitionList(
            entries
                .into_iter()
                .map(|(term, definitions)| {
                    let term = walk_inlines(term, transform, ctx);
                    (term, walk_list_items(definitions, transform, ctx))
                })
                .collect(),
        ),
        Block::Header(level, attr, inlines) => {
            Block::Header(level, attr, walk_inlines(inlines, transform, ctx))
        }
        Block::Table(attr, caption, specs, head, bodies, foot) => {
            let caption = walk_caption(caption, transform, ctx);
            let head = TableHead {
                attr: head.attr,
                rows: walk_rows(head.rows, transform, ctx),
            };
            let bodies = bodies
                .into_iter()
                .map(|body| TableBody {
                    attr: body.attr,
                    row_head_columns: body.row_head_columns,
                    head: walk_rows(body.head, transform, ctx),
                    body: walk_rows(body.body, transform, ctx),
                })
                .collect();
            let foot = TableFoot {
                attr: foot.attr,
                rows: walk_rows(foot.rows, transform, ctx),
            };
            Block::Table(attr, caption, specs, head, bodies, foot)
        }
        Block::Figure(attr, caption, blocks) => {
            let caption = walk_caption(caption, transform, ctx);
            Block::Figure(attr, caption, walk_blocks(blocks, transform, ctx))
        }
        Block::Div(attr, blocks) => Block::Div(attr, walk_blocks(blocks, transform, ctx)),
        leaf @ (Block::CodeBlock(..) | Block::RawBlock(..) | Block::HorizontalRule) => leaf,
    }
}

pub fn walk_inline<T: Transform + ?Sized>(
    inline: Inline,
    transform: &mut T,
    ctx: &FilterContext<'_>,
) -> Inline {
    if let Action::Replace(replacement) = transform.inline(&inline, ctx) {
        return replacement;
    }

    match inline {
        Inline::Emph(inlines) => Inline::Emph(walk_inlines(inlines, transform, ctx)),
        Inline::Underline(inlines) => Inline::Underline(walk_inlines(inlines, transform, ctx)),
        Inline::Strong(inlines) => Inline::Strong(walk_inlines(inlines, transform, ctx)),
        Inline::Strikeout(inlines) => Inline::Strikeout(walk_inlines(inlines, transform, ctx)),
        Inline::Superscript(inlines) => {
            Inline::Superscript(walk_inlines(inlines, transform, ctx))
        }
        Inline::Subscript(inlines) => Inline::Subscript(walk_inlines(inlines, transform, ctx)),
        Inline::SmallCaps(inlines) => Inline::SmallCaps(walk_inlines(inlines, transform, ctx)),
        Inline::Quoted(quote, inlines) => {
            Inline::Quoted(quote, walk_inlines(inlines, transform, ctx))
        }
        Inline::Cite(citations, inlines) => {
            let citations = citations
                .into_iter()
                .map(|citation| walk_citation(citation, transform, ctx))
                .collect();
            Inline::Cite(citations, walk_inlines(inlines, transform, ctx))
        }
        Inline::Link(attr, inlines, target) => {
            Inline::Link(attr, walk_inlines(inlines, transform, ctx), target)
        }
        Inline::Image(attr, inlines, target) => {
            Inline::Image(attr, walk_inlines(inlines, transform, ctx), target)
        }
        Inline::Note(blocks) => Inline::Note(walk_blocks(blocks, transform, ctx)),
        Inline::Span(attr, inlines) => Inline::Span(attr, walk_inlines(inlines, transform, ctx)),
        leaf @ (Inline::Str(_)
        | Inline::Code(..)
        | Inline::Space
        | Inline::SoftBreak
        | Inline::LineBreak
        | Inline::Math(..)
        | Inline::RawInline(..)) => leaf,
    }
}

fn walk_list_items<T: Transform + ?Sized>(
    items: Vec<Vec<Block>>,
    transform: &mut T,
    ctx: &FilterContext<'_>,
) -> Vec<Vec<Block>> {
    items
        .into_iter()
        .map(|item| walk_blocks(item, transform, ctx))
        .collect()
}

fn walk_caption<T: Transform + ?Sized>(
    caption: Caption,
    transform: &mut T,
    ctx: &FilterContext<'_>,
) -> Caption {
    Caption {
        short: caption
            .short
            .map(|short| walk_inlines(short, transform, ctx)),
        long: walk_blocks(caption.long, transform, ctx),
    }
}

fn walk_rows<T: Transform + ?Sized>(
    rows: Vec<Row>,
    transform: &mut T,
    ctx: &FilterContext<'_>,
) -> Vec<Row> {
    rows.into_iter()
        .map(|row| Row {
            attr: row.attr,
            cells: row
                .cells
                .into_iter()
                .map(|cell| Cell {
                    blocks: walk_blocks(cell.blocks, transform, ctx),
                    ..cell
                })
                .collect(),
        })
        .collect()
}

fn walk_citation<T: Transform + ?Sized>(
    citation: Citation,
    transform: &mut T,
    ctx: &FilterContext<'_>,
) -> Citation {
    Citation {
        prefix: walk_inlines(citation.prefix, transform, ctx),
        suffix: walk_inlines(citation.suffix, transform, ctx),
        ..citation
    }
}
