//! Ordered rewrite pipeline.
//!
//! ## Pipeline Order
//!
//! 1. **Acronym Resolution** - expand `\gls`-style spans on first use
//! 2. **Citation Spacing** - non-breaking space before parenthesised citations
//! 3. **Float Numbering** - number figures and tables, prefix their captions
//! 4. **Autoref Resolution** - replace `\autoref{fig:..}` with the ordinal
//! 5. **Image Rasterization** - swap vector images for cached raster copies
//! 6. **Range Formatting** - `1 ms–2 ms` becomes `1–2 ms`
//! 7. **References Heading** - put a heading above the bibliography
//!
//! Each pass is a full traversal of the tree, so a pass sees every change
//! made by the passes before it. Autoref Resolution declares Float
//! Numbering as a prerequisite; [`Pipeline::new`] refuses any order that
//! would let it run first.

use paperfix_ast::{Block, Document, Inline};
use serde::Deserialize;

use crate::passes::{
    AcronymResolution, AutorefResolution, CitationSpacing, FloatNumbering, ImageRasterization,
    RangeFormatting, ReferencesHeadingInjection,
};
use crate::session::Session;
use crate::utils::{ConversionError, ConversionResult};
use crate::walk::walk_document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    AcronymResolution,
    CitationSpacing,
    FloatNumbering,
    AutorefResolution,
    ImageRasterization,
    RangeFormatting,
    ReferencesHeading,
}

impl PassKind {
    pub const STANDARD: [PassKind; 7] = [
        PassKind::AcronymResolution,
        PassKind::CitationSpacing,
        PassKind::FloatNumbering,
        PassKind::AutorefResolution,
        PassKind::ImageRasterization,
        PassKind::RangeFormatting,
        PassKind::ReferencesHeading,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassKind::AcronymResolution => "acronym-resolution",
            PassKind::CitationSpacing => "citation-spacing",
            PassKind::FloatNumbering => "float-numbering",
            PassKind::AutorefResolution => "autoref-resolution",
            PassKind::ImageRasterization => "image-rasterization",
            PassKind::RangeFormatting => "range-formatting",
            PassKind::ReferencesHeading => "references-heading",
        }
    }

    /// Passes that must have completed over the whole tree before this one starts.
    pub fn prerequisites(self) -> &'static [PassKind] {
        match self {
            PassKind::AutorefResolution => &[PassKind::FloatNumbering],
            PassKind::AcronymResolution
            | PassKind::CitationSpacing
            | PassKind::FloatNumbering
            | PassKind::ImageRasterization
            | PassKind::RangeFormatting
            | PassKind::ReferencesHeading => &[],
        }
    }

    pub fn pass(self) -> &'static dyn Pass {
        match self {
            PassKind::AcronymResolution => &AcronymResolution,
            PassKind::CitationSpacing => &CitationSpacing,
            PassKind::FloatNumbering => &FloatNumbering,
            PassKind::AutorefResolution => &AutorefResolution,
            PassKind::ImageRasterization => &ImageRasterization,
            PassKind::RangeFormatting => &RangeFormatting,
            PassKind::ReferencesHeading => &ReferencesHeadingInjection,
        }
    }
}

/// What to do with the node a pass just visited.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<T> {
    /// Keep the node, including any in-place edits.
    Keep,
    /// Replace the node with zero or more nodes.
    Replace(Vec<T>),
    /// Keep the node and insert these siblings in front of it.
    InsertBefore(Vec<T>),
}

/// Where a block sits in the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockScope<'a> {
    /// Identifier of the enclosing block, if it has one.
    pub parent_id: Option<&'a str>,
    /// The sibling right before this block, after earlier rewrites.
    pub previous: Option<&'a Block>,
}

/// One tree rewrite. Nodes are visited after their children.
pub trait Pass {
    fn kind(&self) -> PassKind;

    fn block(
        &self,
        _block: &mut Block,
        _scope: BlockScope<'_>,
        _session: &mut Session,
    ) -> ConversionResult<Action<Block>> {
        Ok(Action::Keep)
    }

    fn inline(
        &self,
        _inline: &mut Inline,
        _session: &mut Session,
    ) -> ConversionResult<Action<Inline>> {
        Ok(Action::Keep)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    passes: Vec<PassKind>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            passes: PassKind::STANDARD.to_vec(),
        }
    }
}

impl Pipeline {
    /// Build a pipeline, checking that every pass appears once and after
    /// its prerequisites.
    pub fn new(passes: impl IntoIterator<Item = PassKind>) -> ConversionResult<Self> {
        let passes: Vec<PassKind> = passes.into_iter().collect();
        for (idx, kind) in passes.iter().enumerate() {
            let earlier = &passes[..idx];
            if earlier.contains(kind) {
                return Err(ConversionError::pipeline(format!(
                    "{} appears more than once",
                    kind.name()
                )));
            }
            for required in kind.prerequisites() {
                if !earlier.contains(required) {
                    return Err(ConversionError::pipeline(format!(
                        "{} must run after {}",
                        kind.name(),
                        required.name()
                    )));
                }
            }
        }
        Ok(Self { passes })
    }

    /// The standard order without the `disabled` passes.
    pub fn without(disabled: &[PassKind]) -> ConversionResult<Self> {
        Self::new(
            PassKind::STANDARD
                .into_iter()
                .filter(|kind| !disabled.contains(kind)),
        )
    }

    pub fn passes(&self) -> &[PassKind] {
        &self.passes
    }

    pub fn run(&self, doc: &mut Document, session: &mut Session) -> ConversionResult<()> {
        for kind in &self.passes {
            log::debug!("running {}", kind.name());
            walk_document(doc, kind.pass(), session)?;
        }
        Ok(())
    }
}
