use paperfix_ast::{first_str_mut, Inline, NBSP};

use crate::pipeline::{Action, Pass, PassKind};
use crate::session::Session;
use crate::utils::ConversionResult;

/// `\cite` is written straight after the preceding word in the sources;
/// give parenthesised citations the space they need.
pub struct CitationSpacing;

impl Pass for CitationSpacing {
    fn kind(&self) -> PassKind {
        PassKind::CitationSpacing
    }

    fn inline(
        &self,
        inline: &mut Inline,
        _session: &mut Session,
    ) -> ConversionResult<Action<Inline>> {
        if let Inline::Cite(_, content) = inline {
            if let Some(text) = first_str_mut(content) {
                if text.starts_with('(') {
                    text.insert(0, NBSP);
                }
            }
        }
        Ok(Action::Keep)
    }
}
