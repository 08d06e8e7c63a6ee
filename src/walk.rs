//! Post-order tree walker.
//!
//! Children are rewritten before their parent, and siblings left to right,
//! so floats are met in document order. A visitor may replace a node with
//! any number of siblings; the walk continues after the inserted nodes and
//! does not revisit them.

use paperfix_ast::{
    Block, Caption, Citation, Document, Inline, Row, TableBody, TableFoot, TableHead,
};

use crate::pipeline::{Action, BlockScope, Pass};
use crate::session::Session;
use crate::utils::ConversionResult;

pub fn walk_document(
    doc: &mut Document,
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    walk_blocks(&mut doc.blocks, None, pass, session)
}

pub fn walk_blocks(
    blocks: &mut Vec<Block>,
    parent_id: Option<&str>,
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    let mut idx = 0;
    while idx < blocks.len() {
        walk_block_children(&mut blocks[idx], pass, session)?;
        let (before, rest) = blocks.split_at_mut(idx);
        let scope = BlockScope {
            parent_id,
            previous: before.last(),
        };
        match pass.block(&mut rest[0], scope, session)? {
            Action::Keep => idx += 1,
            Action::Replace(nodes) => {
                let n = nodes.len();
                blocks.splice(idx..idx + 1, nodes);
                idx += n;
            }
            Action::InsertBefore(nodes) => {
                let n = nodes.len();
                blocks.splice(idx..idx, nodes);
                idx += n + 1;
            }
        }
    }
    Ok(())
}

pub fn walk_inlines(
    inlines: &mut Vec<Inline>,
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    let mut idx = 0;
    while idx < inlines.len() {
        walk_inline_children(&mut inlines[idx], pass, session)?;
        match pass.inline(&mut inlines[idx], session)? {
            Action::Keep => idx += 1,
            Action::Replace(nodes) => {
                let n = nodes.len();
                inlines.splice(idx..idx + 1, nodes);
                idx += n;
            }
            Action::InsertBefore(nodes) => {
                let n = nodes.len();
                inlines.splice(idx..idx, nodes);
                idx += n + 1;
            }
        }
    }
    Ok(())
}

fn walk_block_children(
    block: &mut Block,
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    match block {
        Block::Plain(inlines) | Block::Para(inlines) | Block::Header(_, _, inlines) => {
            walk_inlines(inlines, pass, session)
        }
        Block::LineBlock(lines) => {
            for line in lines {
                walk_inlines(line, pass, session)?;
            }
            Ok(())
        }
        Block::BlockQuote(blocks) => walk_blocks(blocks, None, pass, session),
        Block::OrderedList(_, items) | Block::BulletList(items) => {
            for item in items {
                walk_blocks(item, None, pass, session)?;
            }
            Ok(())
        }
        Block::DefinitionList(items) => {
            for (term, definitions) in items {
                walk_inlines(term, pass, session)?;
                for definition in definitions {
                    walk_blocks(definition, None, pass, session)?;
                }
            }
            Ok(())
        }
        Block::Table(attr, caption, _, head, bodies, foot) => {
            walk_caption(caption, pass, session)?;
            walk_table_parts(head, bodies, foot, attr.id(), pass, session)
        }
        Block::Figure(attr, caption, blocks) => {
            walk_caption(caption, pass, session)?;
            walk_blocks(blocks, attr.id(), pass, session)
        }
        Block::Div(attr, blocks) => walk_blocks(blocks, attr.id(), pass, session),
        Block::CodeBlock(..) | Block::RawBlock(..) | Block::HorizontalRule => Ok(()),
    }
}

fn walk_caption(
    caption: &mut Caption,
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    if let Some(short) = &mut caption.0 {
        walk_inlines(short, pass, session)?;
    }
    walk_blocks(&mut caption.1, None, pass, session)
}

fn walk_table_parts(
    head: &mut TableHead,
    bodies: &mut [TableBody],
    foot: &mut TableFoot,
    table_id: Option<&str>,
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    walk_rows(&mut head.1, table_id, pass, session)?;
    for body in bodies {
        walk_rows(&mut body.2, table_id, pass, session)?;
        walk_rows(&mut body.3, table_id, pass, session)?;
    }
    walk_rows(&mut foot.1, table_id, pass, session)
}

fn walk_rows(
    rows: &mut [Row],
    table_id: Option<&str>,
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    for row in rows {
        for cell in &mut row.1 {
            let parent_id = cell.0.id().or(table_id);
            walk_blocks(&mut cell.4, parent_id, pass, session)?;
        }
    }
    Ok(())
}

fn walk_inline_children(
    inline: &mut Inline,
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    match inline {
        Inline::Emph(content)
        | Inline::Underline(content)
        | Inline::Strong(content)
        | Inline::Strikeout(content)
        | Inline::Superscript(content)
        | Inline::Subscript(content)
        | Inline::SmallCaps(content)
        | Inline::Quoted(_, content)
        | Inline::Link(_, content, _)
        | Inline::Image(_, content, _)
        | Inline::Span(_, content) => walk_inlines(content, pass, session),
        Inline::Cite(citations, content) => {
            walk_citations(citations, pass, session)?;
            walk_inlines(content, pass, session)
        }
        Inline::Note(blocks) => walk_blocks(blocks, None, pass, session),
        Inline::Str(_)
        | Inline::Code(..)
        | Inline::Space
        | Inline::SoftBreak
        | Inline::LineBreak
        | Inline::Math(..)
        | Inline::RawInline(..) => Ok(()),
    }
}

fn walk_citations(
    citations: &mut [Citation],
    pass: &dyn Pass,
    session: &mut Session,
) -> ConversionResult<()> {
    for citation in citations {
        walk_inlines(&mut citation.prefix, pass, session)?;
        walk_inlines(&mut citation.suffix, pass, session)?;
    }
    Ok(())
}
