use paperfix_ast::{Attr, Inline};

use crate::acronyms::{expand, AcronymForm};
use crate::pipeline::{Action, Pass, PassKind};
use crate::session::Session;
use crate::utils::{ConversionResult, MissKind};

/// Attributes pandoc puts on the span it makes of `\gls{...}` and friends.
const LABEL_ATTR: &str = "acronym-label";
const FORM_ATTR: &str = "acronym-form";

/// Replaces acronym spans with plain spans holding the expanded text.
pub struct AcronymResolution;

impl Pass for AcronymResolution {
    fn kind(&self) -> PassKind {
        PassKind::AcronymResolution
    }

    fn inline(
        &self,
        inline: &mut Inline,
        session: &mut Session,
    ) -> ConversionResult<Action<Inline>> {
        let Inline::Span(attr, _) = inline else {
            return Ok(Action::Keep);
        };
        let Some(label) = attr.get(LABEL_ATTR) else {
            return Ok(Action::Keep);
        };
        let Some(expansion) = session.acronyms.get(label) else {
            session
                .report
                .miss(MissKind::UnknownAcronym, Some(label), "no definition");
            return Ok(Action::Keep);
        };
        let form = attr.get(FORM_ATTR).unwrap_or_default();
        let Some(form) = AcronymForm::parse(form) else {
            session.report.miss(
                MissKind::InvalidAcronymForm,
                Some(label),
                format!("unrecognised form {:?}", form),
            );
            return Ok(Action::Keep);
        };
        let text = expand(label, expansion, form, &mut session.usage);
        Ok(Action::Replace(vec![Inline::Span(
            Attr::default(),
            vec![Inline::Str(text)],
        )]))
    }
}
