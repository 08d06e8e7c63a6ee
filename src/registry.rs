//! Float numbering state shared between the numbering and autoref passes.

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    Figure,
    Table,
}

impl FloatKind {
    /// Word used in ordinals and caption prefixes.
    pub fn label(self) -> &'static str {
        match self {
            FloatKind::Figure => "Figure",
            FloatKind::Table => "Table",
        }
    }

    /// Kind for a cross-reference prefix such as `fig` in `fig:setup`.
    pub fn from_ref_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "fig" => Some(FloatKind::Figure),
            "tab" => Some(FloatKind::Table),
            _ => None,
        }
    }
}

/// Outcome of numbering one float.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbered {
    pub ordinal: String,
    /// Identifier previously registered for an earlier float of this kind.
    pub replaced: bool,
}

#[derive(Debug, Default)]
struct Series {
    count: usize,
    ordinals: IndexMap<String, String>,
}

/// Identifier to ordinal, one independent series per float kind.
///
/// Ordinals are handed out from a counter, so every float gets the next
/// number even when it has no identifier or repeats one.
#[derive(Debug, Default)]
pub struct FloatRegistry {
    figures: Series,
    tables: Series,
}

impl FloatRegistry {
    fn series(&self, kind: FloatKind) -> &Series {
        match kind {
            FloatKind::Figure => &self.figures,
            FloatKind::Table => &self.tables,
        }
    }

    fn series_mut(&mut self, kind: FloatKind) -> &mut Series {
        match kind {
            FloatKind::Figure => &mut self.figures,
            FloatKind::Table => &mut self.tables,
        }
    }

    /// Assign the next ordinal of `kind`, registering it under `identifier`.
    pub fn number(&mut self, kind: FloatKind, identifier: Option<&str>) -> Numbered {
        let series = self.series_mut(kind);
        series.count += 1;
        let ordinal = format!("{} {}", kind.label(), series.count);
        let replaced = match identifier {
            Some(id) => series
                .ordinals
                .insert(id.to_string(), ordinal.clone())
                .is_some(),
            None => false,
        };
        Numbered { ordinal, replaced }
    }

    pub fn lookup(&self, kind: FloatKind, identifier: &str) -> Option<&str> {
        self.series(kind).ordinals.get(identifier).map(String::as_str)
    }

    pub fn count(&self, kind: FloatKind) -> usize {
        self.series(kind).count
    }

    /// Registered identifiers and ordinals in numbering order.
    pub fn entries(&self, kind: FloatKind) -> impl Iterator<Item = (&str, &str)> {
        self.series(kind)
            .ordinals
            .iter()
            .map(|(id, ordinal)| (id.as_str(), ordinal.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_are_independent() {
        let mut registry = FloatRegistry::default();
        assert_eq!(registry.number(FloatKind::Figure, Some("fig:a")).ordinal, "Figure 1");
        assert_eq!(registry.number(FloatKind::Table, Some("tab:a")).ordinal, "Table 1");
        assert_eq!(registry.number(FloatKind::Figure, Some("fig:b")).ordinal, "Figure 2");
        assert_eq!(registry.lookup(FloatKind::Figure, "fig:b"), Some("Figure 2"));
        assert_eq!(registry.lookup(FloatKind::Table, "tab:a"), Some("Table 1"));
        assert_eq!(registry.lookup(FloatKind::Table, "fig:a"), None);
    }

    #[test]
    fn test_anonymous_floats_still_count() {
        let mut registry = FloatRegistry::default();
        registry.number(FloatKind::Figure, None);
        registry.number(FloatKind::Figure, None);
        assert_eq!(registry.number(FloatKind::Figure, Some("fig:c")).ordinal, "Figure 3");
        assert_eq!(registry.count(FloatKind::Figure), 3);
        assert_eq!(registry.entries(FloatKind::Figure).count(), 1);
    }

    #[test]
    fn test_duplicate_identifier_last_write_wins() {
        let mut registry = FloatRegistry::default();
        assert!(!registry.number(FloatKind::Figure, Some("fig:x")).replaced);
        let second = registry.number(FloatKind::Figure, Some("fig:x"));
        assert!(second.replaced);
        assert_eq!(second.ordinal, "Figure 2");
        assert_eq!(registry.lookup(FloatKind::Figure, "fig:x"), Some("Figure 2"));
        assert_eq!(registry.number(FloatKind::Figure, None).ordinal, "Figure 3");
    }

    #[test]
    fn test_reference_prefixes() {
        assert_eq!(FloatKind::from_ref_prefix("fig"), Some(FloatKind::Figure));
        assert_eq!(FloatKind::from_ref_prefix("tab"), Some(FloatKind::Table));
        assert_eq!(FloatKind::from_ref_prefix("sec"), None);
    }
}
