//! Per-conversion state handed to every pass.

use crate::acronyms::{AcronymTable, UsageTracker};
use crate::config::FilterOptions;
use crate::raster::{CommandRasterizer, ImageCache};
use crate::registry::{FloatKind, FloatRegistry};
use crate::utils::{ConversionResult, FilterReport, NumberedFloat};

/// Everything one conversion reads and writes besides the tree itself.
///
/// A session belongs to exactly one document: usage and numbering start
/// empty and are dropped with it.
#[derive(Debug)]
pub struct Session {
    pub acronyms: AcronymTable,
    pub usage: UsageTracker,
    pub floats: FloatRegistry,
    pub images: ImageCache,
    pub report: FilterReport,
    pub references: ReferencesHeading,
}

/// Where the bibliography lives and what heading it gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencesHeading {
    pub container_id: String,
    pub title: String,
    pub heading_id: String,
}

impl Default for ReferencesHeading {
    fn default() -> Self {
        Self {
            container_id: "refs".to_string(),
            title: "References".to_string(),
            heading_id: "references".to_string(),
        }
    }
}

impl Session {
    pub fn new(acronyms: AcronymTable, images: ImageCache) -> Self {
        Self {
            acronyms,
            usage: UsageTracker::default(),
            floats: FloatRegistry::default(),
            images,
            report: FilterReport::default(),
            references: ReferencesHeading::default(),
        }
    }

    /// Session wired the way `options` describe: acronym file loaded,
    /// command-line rasterizer under the resource root.
    pub fn from_options(options: &FilterOptions) -> ConversionResult<Self> {
        let acronyms = options.load_acronyms()?;
        let rasterizer = CommandRasterizer {
            program: options.rasterizer.clone(),
            scale_to: options.raster_scale,
            format: options.raster_format.clone(),
        };
        let images = ImageCache::new(
            &options.resource_root,
            &options.raster_format,
            options.vector_extensions.clone(),
            Box::new(rasterizer),
        );
        let mut session = Self::new(acronyms, images);
        session.references = options.references_heading();
        Ok(session)
    }

    /// Close the session, listing every registered float in the report.
    pub fn into_report(self) -> FilterReport {
        let Session {
            mut report, floats, ..
        } = self;
        for kind in [FloatKind::Figure, FloatKind::Table] {
            report
                .numbered
                .extend(floats.entries(kind).map(|(identifier, ordinal)| NumberedFloat {
                    identifier: identifier.to_string(),
                    ordinal: ordinal.to_string(),
                }));
        }
        report
    }
}
