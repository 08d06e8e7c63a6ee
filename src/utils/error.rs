//! Error handling for paperfix runs
//!
//! Only failures that abort a whole conversion are errors. Per-node misses
//! (unknown acronyms, dangling references) are collected in a
//! [`FilterReport`](super::report::FilterReport) instead.

use std::fmt;
use std::path::{Path, PathBuf};

/// Conversion error type
#[derive(Debug, Clone)]
pub enum ConversionError {
    /// The document tree could not be decoded
    ParseError {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// The external rasterizer failed or produced no output
    RasterizeError {
        program: String,
        source: PathBuf,
        message: String,
    },
    /// A pass sequence that violates a declared ordering
    InvalidPipeline { message: String },
    /// Unusable configuration file or value
    ConfigError { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::ParseError {
                message,
                line,
                column,
            } => {
                if let (Some(l), Some(c)) = (line, column) {
                    write!(f, "Parse error at line {}, column {}: {}", l, c, message)
                } else if let Some(l) = line {
                    write!(f, "Parse error at line {}: {}", l, message)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            ConversionError::RasterizeError {
                program,
                source,
                message,
            } => {
                write!(
                    f,
                    "Rasterizing {} with {} failed: {}",
                    source.display(),
                    program,
                    message
                )
            }
            ConversionError::InvalidPipeline { message } => {
                write!(f, "Invalid pipeline: {}", message)
            }
            ConversionError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return ConversionError::IoError {
                message: err.to_string(),
            };
        }
        // serde_json reports line 0 for errors without a position
        let line = Some(err.line()).filter(|&l| l > 0);
        ConversionError::ParseError {
            message: err.to_string(),
            line,
            column: line.map(|_| err.column()),
        }
    }
}

impl From<toml::de::Error> for ConversionError {
    fn from(err: toml::de::Error) -> Self {
        ConversionError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

// Convenience constructors for errors
impl ConversionError {
    pub fn parse(message: impl Into<String>) -> Self {
        ConversionError::ParseError {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn rasterize(
        program: impl Into<String>,
        source: &Path,
        message: impl Into<String>,
    ) -> Self {
        ConversionError::RasterizeError {
            program: program.into(),
            source: source.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn pipeline(message: impl Into<String>) -> Self {
        ConversionError::InvalidPipeline {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ConversionError::ConfigError {
            message: message.into(),
        }
    }

    /// IO error annotated with the path that caused it.
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: format!("{}: {}", path.display(), err),
        }
    }
}
