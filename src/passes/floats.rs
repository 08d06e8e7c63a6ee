use paperfix_ast::{Block, Caption};

use crate::pipeline::{Action, BlockScope, Pass, PassKind};
use crate::registry::FloatKind;
use crate::session::Session;
use crate::utils::{ConversionResult, MissKind};

/// Numbers figures and tables in document order and writes the number into
/// the caption, recording identifiers for later cross-references.
///
/// A table's addressable identifier is usually on the block wrapping it,
/// so the parent identifier takes precedence over the table's own.
pub struct FloatNumbering;

impl Pass for FloatNumbering {
    fn kind(&self) -> PassKind {
        PassKind::FloatNumbering
    }

    fn block(
        &self,
        block: &mut Block,
        scope: BlockScope<'_>,
        session: &mut Session,
    ) -> ConversionResult<Action<Block>> {
        match block {
            Block::Figure(attr, caption, _) => {
                number(FloatKind::Figure, attr.id(), caption, session);
            }
            Block::Table(attr, caption, ..) => {
                let identifier = scope.parent_id.or(attr.id());
                if identifier.is_none() {
                    session.report.miss(
                        MissKind::UnaddressableTable,
                        None,
                        "table without identifier cannot be referenced",
                    );
                }
                number(FloatKind::Table, identifier, caption, session);
            }
            _ => {}
        }
        Ok(Action::Keep)
    }
}

fn number(kind: FloatKind, identifier: Option<&str>, caption: &mut Caption, session: &mut Session) {
    let numbered = session.floats.number(kind, identifier);
    if numbered.replaced {
        session.report.miss(
            MissKind::DuplicateFloatId,
            identifier,
            format!("identifier reused, now {}", numbered.ordinal),
        );
    }
    match caption.first_str_mut() {
        Some(text) => *text = format!("{}: {}", numbered.ordinal, text),
        None => session.report.miss(
            MissKind::MissingCaptionText,
            identifier,
            format!("{} has no caption text to number", numbered.ordinal),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{run, session};
    use paperfix_ast::{Attr, Document, Inline, TableFoot, TableHead};
    use pretty_assertions::assert_eq;

    fn figure(id: &str, caption: &str) -> Block {
        Block::Figure(
            Attr::with_id(id),
            Caption::new(vec![Block::Plain(vec![Inline::str(caption)])]),
            vec![],
        )
    }

    fn table(id: &str, caption: &str) -> Block {
        Block::Table(
            Attr::with_id(id),
            Caption::new(vec![Block::Plain(vec![Inline::str(caption)])]),
            vec![],
            TableHead::default(),
            vec![],
            TableFoot::default(),
        )
    }

    fn caption_text(block: &Block) -> String {
        match block {
            Block::Figure(_, Caption(_, blocks), _) | Block::Table(_, Caption(_, blocks), ..) => {
                match &blocks[0] {
                    Block::Plain(inlines) => paperfix_ast::stringify(inlines),
                    other => panic!("unexpected caption block {:?}", other),
                }
            }
            other => panic!("not a float: {:?}", other),
        }
    }

    #[test]
    fn test_figures_numbered_densely_in_order() {
        let mut doc = Document::new(vec![
            figure("fig:a", "First."),
            Block::Div(Attr::default(), vec![figure("fig:b", "Second.")]),
            figure("", "Third."),
            figure("fig:d", "Fourth."),
        ]);
        let mut session = session();
        run(&FloatNumbering, &mut doc, &mut session);

        assert_eq!(caption_text(&doc.blocks[0]), "Figure 1: First.");
        let Block::Div(_, inner) = &doc.blocks[1] else { unreachable!() };
        assert_eq!(caption_text(&inner[0]), "Figure 2: Second.");
        assert_eq!(caption_text(&doc.blocks[2]), "Figure 3: Third.");
        assert_eq!(caption_text(&doc.blocks[3]), "Figure 4: Fourth.");
        assert_eq!(session.floats.lookup(FloatKind::Figure, "fig:d"), Some("Figure 4"));
        assert_eq!(session.floats.count(FloatKind::Figure), 4);
    }

    #[test]
    fn test_tables_keyed_by_parent_identifier() {
        let mut doc = Document::new(vec![
            figure("fig:a", "A figure."),
            Block::Div(Attr::with_id("tab:results"), vec![table("", "Results.")]),
            Block::Div(Attr::with_id("tab:wrapper"), vec![table("tab:inner", "More.")]),
        ]);
        let mut session = session();
        run(&FloatNumbering, &mut doc, &mut session);

        let Block::Div(_, first) = &doc.blocks[1] else { unreachable!() };
        assert_eq!(caption_text(&first[0]), "Table 1: Results.");
        assert_eq!(session.floats.lookup(FloatKind::Table, "tab:results"), Some("Table 1"));
        assert_eq!(session.floats.lookup(FloatKind::Table, "tab:wrapper"), Some("Table 2"));
        assert_eq!(session.floats.lookup(FloatKind::Table, "tab:inner"), None);
    }

    #[test]
    fn test_top_level_table_falls_back_to_own_identifier() {
        let mut doc = Document::new(vec![table("tab:own", "Own."), table("", "Anonymous.")]);
        let mut session = session();
        run(&FloatNumbering, &mut doc, &mut session);

        assert_eq!(session.floats.lookup(FloatKind::Table, "tab:own"), Some("Table 1"));
        assert_eq!(caption_text(&doc.blocks[1]), "Table 2: Anonymous.");
        assert_eq!(session.report.count(MissKind::UnaddressableTable), 1);
    }

    #[test]
    fn test_empty_caption_is_left_empty() {
        let mut doc = Document::new(vec![
            Block::Figure(Attr::with_id("fig:blank"), Caption::default(), vec![]),
            figure("fig:next", "Next."),
        ]);
        let mut session = session();
        run(&FloatNumbering, &mut doc, &mut session);

        assert_eq!(
            doc.blocks[0],
            Block::Figure(Attr::with_id("fig:blank"), Caption::default(), vec![])
        );
        assert_eq!(session.floats.lookup(FloatKind::Figure, "fig:blank"), Some("Figure 1"));
        assert_eq!(caption_text(&doc.blocks[1]), "Figure 2: Next.");
        assert_eq!(session.report.count(MissKind::MissingCaptionText), 1);
    }

    #[test]
    fn test_duplicate_identifier_reported() {
        let mut doc = Document::new(vec![figure("fig:x", "One."), figure("fig:x", "Two.")]);
        let mut session = session();
        run(&FloatNumbering, &mut doc, &mut session);

        assert_eq!(caption_text(&doc.blocks[1]), "Figure 2: Two.");
        assert_eq!(session.floats.lookup(FloatKind::Figure, "fig:x"), Some("Figure 2"));
        assert_eq!(session.report.count(MissKind::DuplicateFloatId), 1);
    }
}
