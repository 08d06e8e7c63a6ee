//! # Paperfix
//!
//! A pandoc JSON filter that finishes the conversion of a LaTeX paper to a
//! word-processor document: acronyms are expanded on first use, figures and
//! tables are numbered and `\autoref`s resolved, citations get their
//! leading space, vector figures are rasterized, unit ranges are tidied and
//! the bibliography gets a heading.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paperfix::{filter_json, FilterOptions};
//!
//! let input = std::fs::read_to_string("paper.json").unwrap();
//! let output = filter_json(&input, &FilterOptions::default()).unwrap();
//! for miss in &output.report.misses {
//!     eprintln!("{}", miss.message);
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`pipeline`] - pass ordering and the [`Pass`] trait
//! - [`passes`] - the individual rewrites
//! - [`walk`] - post-order traversal with sibling splicing
//! - [`session`] - per-document state (acronym usage, float numbers, image cache)
//! - [`config`] - options from TOML and the command line

pub mod acronyms;
pub mod config;
pub mod passes;
pub mod pipeline;
pub mod raster;
pub mod registry;
pub mod session;
pub mod utils;
pub mod walk;

pub use paperfix_ast as ast;
pub use paperfix_ast::Document;

pub use config::FilterOptions;
pub use pipeline::{Action, BlockScope, Pass, PassKind, Pipeline};
pub use session::Session;
pub use utils::{
    ConversionError, ConversionOutput, ConversionResult, FilterReport, MissKind, MissRecord,
    NumberedFloat,
};

/// Run the configured pipeline over `doc` with a fresh session.
pub fn filter_document(
    doc: &mut Document,
    options: &FilterOptions,
) -> ConversionResult<FilterReport> {
    options.validate()?;
    let pipeline = Pipeline::without(&options.disable)?;
    let mut session = Session::from_options(options)?;
    pipeline.run(doc, &mut session)?;
    Ok(session.into_report())
}

/// Decode pandoc JSON, filter it and encode the result.
pub fn filter_json(input: &str, options: &FilterOptions) -> ConversionResult<ConversionOutput> {
    let mut doc = Document::from_json(input)?;
    let report = filter_document(&mut doc, options)?;
    Ok(ConversionOutput::new(doc.to_json()?, report))
}
