//! The rewrite passes, one module each.
//!
//! Every pass is a stateless unit struct; whatever must outlive a single
//! node lives in the [`Session`](crate::session::Session).

mod acronyms;
mod autoref;
mod citations;
mod floats;
mod images;
mod ranges;
mod references;

pub use acronyms::AcronymResolution;
pub use autoref::AutorefResolution;
pub use citations::CitationSpacing;
pub use floats::FloatNumbering;
pub use images::ImageRasterization;
pub use ranges::RangeFormatting;
pub use references::ReferencesHeadingInjection;

#[cfg(test)]
pub(crate) mod test_support {
    use paperfix_ast::Document;

    use crate::acronyms::AcronymTable;
    use crate::pipeline::Pass;
    use crate::raster::testing::RecordingRasterizer;
    use crate::raster::ImageCache;
    use crate::session::Session;
    use crate::walk::walk_document;

    pub fn session() -> Session {
        session_with(AcronymTable::default())
    }

    pub fn session_with(acronyms: AcronymTable) -> Session {
        let images = ImageCache::new(
            "paper",
            "png",
            vec!["pdf".to_string()],
            Box::new(RecordingRasterizer::new()),
        );
        Session::new(acronyms, images)
    }

    pub fn run(pass: &dyn Pass, doc: &mut Document, session: &mut Session) {
        walk_document(doc, pass, session).expect("pass succeeds");
    }
}
