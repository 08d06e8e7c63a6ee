//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - Soft-miss reporting

pub mod error;
pub mod report;

// Re-export commonly used items
pub use error::{ConversionError, ConversionResult};
pub use report::{ConversionOutput, FilterReport, MissKind, MissRecord, NumberedFloat};
