use paperfix_ast::Inline;

use crate::pipeline::{Action, Pass, PassKind};
use crate::session::Session;
use crate::utils::ConversionResult;

/// Points vector images at raster copies under the resource root,
/// rasterizing them on a cache miss, and drops width annotations so the
/// image spans the page.
///
/// A failing rasterizer aborts the conversion.
pub struct ImageRasterization;

impl Pass for ImageRasterization {
    fn kind(&self) -> PassKind {
        PassKind::ImageRasterization
    }

    fn inline(
        &self,
        inline: &mut Inline,
        session: &mut Session,
    ) -> ConversionResult<Action<Inline>> {
        let Inline::Image(attr, _, (url, _)) = inline else {
            return Ok(Action::Keep);
        };
        log::debug!("image {}", url);
        if let Some(target) = session.images.target(url) {
            if session.images.ensure(&target)? {
                session.report.rasterized.push(url.clone());
            }
            *url = target.derived.to_string_lossy().into_owned();
        }
        attr.remove("width");
        Ok(Action::Keep)
    }
}
