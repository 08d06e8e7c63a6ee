use lazy_static::lazy_static;
use paperfix_ast::{Inline, EN_DASH};
use regex::Regex;

use crate::pipeline::{Action, Pass, PassKind};
use crate::session::Session;
use crate::utils::ConversionResult;

lazy_static! {
    /// `<value>\u{a0}<unit>\u{2013}<value and unit>`, as pandoc renders `\SIrange`.
    static ref UNIT_RANGE: Regex =
        Regex::new("^(.+)\u{a0}(.+)\u{2013}(.+)").expect("range pattern is valid");
}

/// Rewrites `1 ms–2 ms` to `1–2 ms`.
pub struct RangeFormatting;

impl Pass for RangeFormatting {
    fn kind(&self) -> PassKind {
        PassKind::RangeFormatting
    }

    fn inline(
        &self,
        inline: &mut Inline,
        _session: &mut Session,
    ) -> ConversionResult<Action<Inline>> {
        if let Inline::Str(text) = inline {
            if let Some(rewritten) = format_range(text) {
                *text = rewritten;
            }
        }
        Ok(Action::Keep)
    }
}

fn format_range(text: &str) -> Option<String> {
    let caps = UNIT_RANGE.captures(text)?;
    Some(format!("{}{}{}", &caps[1], EN_DASH, &caps[3]))
}
