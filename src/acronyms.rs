//! Acronym definitions and first-use expansion.
//!
//! Definitions are read from the `\newacronym` lines of a glossaries
//! source file. Expansion follows the glossaries convention: the first
//! short use spells the acronym out, later short uses abbreviate it.

use std::fs;
use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};
use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::{ConversionError, ConversionResult};

lazy_static! {
    /// `\newacronym[options]{label}{short}{long}`; the long form is limited
    /// to words, digits and hyphens, anything else is not a definition we use.
    static ref NEWACRONYM: Regex = Regex::new(
        r"^\\newacronym(\[.*\])?\{(?P<label>[A-Za-z]+)\}\{.+\}\{(?P<value>[A-Za-z 0-9\-]+)\}"
    )
    .expect("acronym pattern is valid");
}

/// Label to expansion, read-only after loading.
#[derive(Debug, Clone, Default)]
pub struct AcronymTable {
    entries: FxHashMap<String, String>,
}

impl AcronymTable {
    /// Parse definitions, skipping every line that is not one.
    pub fn parse(source: &str) -> Self {
        let mut entries = FxHashMap::default();
        for line in source.lines() {
            if let Some(caps) = NEWACRONYM.captures(line) {
                entries.insert(caps["label"].to_string(), caps["value"].to_string());
            }
        }
        Self { entries }
    }

    pub fn load(path: &Path) -> ConversionResult<Self> {
        let source = fs::read_to_string(path).map_err(|e| ConversionError::io_at(path, e))?;
        let table = Self::parse(&source);
        log::debug!("loaded {} acronyms from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn insert(&mut self, label: impl Into<String>, expansion: impl Into<String>) {
        self.entries.insert(label.into(), expansion.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Labels already spelled out in this document.
#[derive(Debug, Default)]
pub struct UsageTracker {
    used: FxHashSet<String>,
}

impl UsageTracker {
    pub fn is_used(&self, label: &str) -> bool {
        self.used.contains(label)
    }

    /// Returns `true` if this is the first use.
    pub fn mark_used(&mut self, label: &str) -> bool {
        self.used.insert(label.to_string())
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStyle {
    /// Expanded on first use, abbreviated afterwards.
    Short,
    /// Always expanded with the label in parentheses.
    Full,
    /// Always the bare label.
    Abbrv,
    /// Always the bare expansion, singular even for plural forms.
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number {
    Singular,
    Plural,
}

/// Parsed `acronym-form` attribute, e.g. `singular+short`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcronymForm {
    pub style: FormStyle,
    pub number: Number,
}

impl AcronymForm {
    pub fn parse(form: &str) -> Option<Self> {
        let style = if form.contains("short") {
            FormStyle::Short
        } else if form.contains("full") {
            FormStyle::Full
        } else if form.contains("abbrv") {
            FormStyle::Abbrv
        } else if form.contains("long") {
            FormStyle::Long
        } else {
            return None;
        };
        let number = if form.contains("singular") {
            Number::Singular
        } else {
            Number::Plural
        };
        Some(Self { style, number })
    }
}

/// Text for one acronym occurrence, updating `usage` for short and full forms.
pub fn expand(
    label: &str,
    expansion: &str,
    form: AcronymForm,
    usage: &mut UsageTracker,
) -> String {
    let s = match form.number {
        Number::Singular => "",
        Number::Plural => "s",
    };
    match form.style {
        FormStyle::Short if usage.is_used(label) => format!("{label}{s}"),
        FormStyle::Short | FormStyle::Full => {
            usage.mark_used(label);
            format!("{expansion}{s} ({label}{s})")
        }
        FormStyle::Abbrv => format!("{label}{s}"),
        FormStyle::Long => expansion.to_string(),
    }
}
