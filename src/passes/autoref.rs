use lazy_static::lazy_static;
use paperfix_ast::Inline;
use regex::Regex;

use crate::pipeline::{Action, Pass, PassKind};
use crate::registry::FloatKind;
use crate::session::Session;
use crate::utils::{ConversionResult, MissKind};

lazy_static! {
    static ref AUTOREF: Regex =
        Regex::new(r"^\\autoref\{(...):(.*)\}").expect("autoref pattern is valid");
}

/// Resolves raw `\autoref{fig:..}` / `\autoref{tab:..}` fragments to the
/// ordinal assigned by float numbering. Unknown targets stay raw so they
/// show up in the output.
pub struct AutorefResolution;

impl Pass for AutorefResolution {
    fn kind(&self) -> PassKind {
        PassKind::AutorefResolution
    }

    fn inline(
        &self,
        inline: &mut Inline,
        session: &mut Session,
    ) -> ConversionResult<Action<Inline>> {
        let Inline::RawInline(_, text) = inline else {
            return Ok(Action::Keep);
        };
        let Some(caps) = AUTOREF.captures(text) else {
            return Ok(Action::Keep);
        };
        let Some(kind) = FloatKind::from_ref_prefix(&caps[1]) else {
            return Ok(Action::Keep);
        };
        let identifier = format!("{}:{}", &caps[1], &caps[2]);
        match session.floats.lookup(kind, &identifier) {
            Some(ordinal) => Ok(Action::Replace(vec![Inline::str(ordinal)])),
            None => {
                session.report.miss(
                    MissKind::UnresolvedAutoref,
                    Some(&identifier),
                    format!("no {} with this identifier", kind.label().to_lowercase()),
                );
                Ok(Action::Keep)
            }
        }
    }
}
