use paperfix_ast::{stringify, Attr, Block, Inline};

use crate::pipeline::{Action, BlockScope, Pass, PassKind};
use crate::session::{ReferencesHeading, Session};
use crate::utils::ConversionResult;

/// Puts a top-level "References" heading in front of the bibliography
/// container, unless one is already there.
pub struct ReferencesHeadingInjection;

impl Pass for ReferencesHeadingInjection {
    fn kind(&self) -> PassKind {
        PassKind::ReferencesHeading
    }

    fn block(
        &self,
        block: &mut Block,
        scope: BlockScope<'_>,
        session: &mut Session,
    ) -> ConversionResult<Action<Block>> {
        let references = &session.references;
        let Block::Div(attr, _) = block else {
            return Ok(Action::Keep);
        };
        if attr.identifier != references.container_id {
            return Ok(Action::Keep);
        }
        if scope.previous.is_some_and(|prev| is_heading(prev, references)) {
            return Ok(Action::Keep);
        }
        Ok(Action::InsertBefore(vec![heading(references)]))
    }
}

fn heading(references: &ReferencesHeading) -> Block {
    Block::Header(
        1,
        Attr::with_id(references.heading_id.as_str()),
        vec![Inline::str(references.title.as_str())],
    )
}

fn is_heading(block: &Block, references: &ReferencesHeading) -> bool {
    matches!(block, Block::Header(1, _, inlines) if stringify(inlines) == references.title)
}
