//! Reporting of soft misses: nodes a pass had to leave untouched.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissKind {
    UnknownAcronym,
    InvalidAcronymForm,
    UnresolvedAutoref,
    MissingCaptionText,
    UnaddressableTable,
    DuplicateFloatId,
}

impl MissKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MissKind::UnknownAcronym => "unknown-acronym",
            MissKind::InvalidAcronymForm => "invalid-acronym-form",
            MissKind::UnresolvedAutoref => "unresolved-autoref",
            MissKind::MissingCaptionText => "missing-caption-text",
            MissKind::UnaddressableTable => "unaddressable-table",
            MissKind::DuplicateFloatId => "duplicate-float-id",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MissRecord {
    pub kind: MissKind,
    pub name: Option<String>,
    pub message: String,
}

impl MissRecord {
    pub fn new(kind: MissKind, name: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            name,
            message: message.into(),
        }
    }
}

/// A float that can be cross-referenced, with the number it got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedFloat {
    pub identifier: String,
    pub ordinal: String,
}

/// Everything a run left for the author to look at.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterReport {
    pub misses: Vec<MissRecord>,
    pub rasterized: Vec<String>,
    /// Figures first, then tables, each in numbering order.
    pub numbered: Vec<NumberedFloat>,
}

impl FilterReport {
    /// Record a miss and surface it in the log.
    pub fn miss(&mut self, kind: MissKind, name: Option<&str>, message: impl Into<String>) {
        let record = MissRecord::new(kind, name.map(str::to_string), message);
        match &record.name {
            Some(name) => log::warn!("[{}] {}: {}", kind.as_str(), name, record.message),
            None => log::warn!("[{}] {}", kind.as_str(), record.message),
        }
        self.misses.push(record);
    }

    pub fn count(&self, kind: MissKind) -> usize {
        self.misses.iter().filter(|m| m.kind == kind).count()
    }

    /// Nothing was missed and nothing was rasterized.
    pub fn is_empty(&self) -> bool {
        self.misses.is_empty() && self.rasterized.is_empty()
    }
}

/// Filtered document with its report
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The rewritten document, as pandoc JSON
    pub content: String,
    pub report: FilterReport,
}

impl ConversionOutput {
    pub fn new(content: String, report: FilterReport) -> Self {
        Self { content, report }
    }

    pub fn has_misses(&self) -> bool {
        !self.report.misses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_kebab_case() {
        let mut report = FilterReport::default();
        report.miss(MissKind::UnresolvedAutoref, Some("fig:missing"), "no such float");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"unresolved-autoref\""));
        assert!(json.contains("\"fig:missing\""));
        assert_eq!(report.count(MissKind::UnresolvedAutoref), 1);
        assert_eq!(report.count(MissKind::UnknownAcronym), 0);
        assert!(!report.is_empty());
    }
}
