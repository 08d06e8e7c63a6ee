//! Filter configuration.
//!
//! Options come from an optional TOML file; the CLI overrides individual
//! fields. Every field has a default matching the usual paper layout
//! (`paper/` holding the LaTeX sources, figures and `acronyms.tex`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::acronyms::AcronymTable;
use crate::pipeline::PassKind;
use crate::session::ReferencesHeading;
use crate::utils::{ConversionError, ConversionResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilterOptions {
    /// Directory holding source images, their raster copies and the acronym file.
    pub resource_root: PathBuf,
    /// Acronym definitions; `<resource-root>/acronyms.tex` when unset.
    pub acronyms: Option<PathBuf>,
    pub rasterizer: String,
    /// Longest side of rasterized images, in pixels.
    pub raster_scale: u32,
    pub raster_format: String,
    /// Image extensions that get rasterized.
    pub vector_extensions: Vec<String>,
    pub references_id: String,
    pub references_title: String,
    pub references_heading_id: String,
    /// Passes left out of the standard pipeline.
    pub disable: Vec<PassKind>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        let references = ReferencesHeading::default();
        Self {
            resource_root: PathBuf::from("paper"),
            acronyms: None,
            rasterizer: "pdftoppm".to_string(),
            raster_scale: 1024,
            raster_format: "png".to_string(),
            vector_extensions: vec!["pdf".to_string()],
            references_id: references.container_id,
            references_title: references.title,
            references_heading_id: references.heading_id,
            disable: Vec::new(),
        }
    }
}

impl FilterOptions {
    pub fn from_toml_str(source: &str) -> ConversionResult<Self> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: &Path) -> ConversionResult<Self> {
        let source = fs::read_to_string(path).map_err(|e| ConversionError::io_at(path, e))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> ConversionResult<()> {
        if self.raster_scale == 0 {
            return Err(ConversionError::config("raster-scale must be positive"));
        }
        if self.raster_format.is_empty() {
            return Err(ConversionError::config("raster-format must not be empty"));
        }
        if self.references_id.is_empty() {
            return Err(ConversionError::config("references-id must not be empty"));
        }
        Ok(())
    }

    /// The acronym file in effect.
    pub fn acronyms_path(&self) -> PathBuf {
        self.acronyms
            .clone()
            .unwrap_or_else(|| self.resource_root.join("acronyms.tex"))
    }

    /// Load acronym definitions. An explicitly configured file must exist;
    /// a missing default file just means no acronyms.
    pub fn load_acronyms(&self) -> ConversionResult<AcronymTable> {
        let path = self.acronyms_path();
        if self.acronyms.is_none() && !path.exists() {
            log::warn!(
                "no acronym file at {}, acronyms stay unexpanded",
                path.display()
            );
            return Ok(AcronymTable::default());
        }
        AcronymTable::load(&path)
    }

    pub fn references_heading(&self) -> ReferencesHeading {
        ReferencesHeading {
            container_id: self.references_id.clone(),
            title: self.references_title.clone(),
            heading_id: self.references_heading_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let options = FilterOptions::from_toml_str("").unwrap();
        assert_eq!(options, FilterOptions::default());
        assert_eq!(options.acronyms_path(), Path::new("paper/acronyms.tex"));
    }

    #[test]
    fn test_partial_file_overrides() {
        let options = FilterOptions::from_toml_str(
            r#"
resource-root = "manuscript"
raster-scale = 2048
vector-extensions = ["pdf", "eps"]
disable = ["image-rasterization"]
"#,
        )
        .unwrap();
        assert_eq!(options.resource_root, Path::new("manuscript"));
        assert_eq!(options.raster_scale, 2048);
        assert_eq!(options.vector_extensions, vec!["pdf", "eps"]);
        assert_eq!(options.disable, vec![PassKind::ImageRasterization]);
        assert_eq!(options.rasterizer, "pdftoppm");
        assert_eq!(options.acronyms_path(), Path::new("manuscript/acronyms.tex"));
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = FilterOptions::from_toml_str("raster-dpi = 300").unwrap_err();
        assert!(matches!(err, ConversionError::ConfigError { .. }));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let err = FilterOptions::from_toml_str("raster-scale = 0").unwrap_err();
        assert!(err.to_string().contains("raster-scale"));
    }

    #[test]
    fn test_missing_default_acronym_file_is_empty_table() {
        let options = FilterOptions {
            resource_root: PathBuf::from("/nonexistent/paper"),
            ..FilterOptions::default()
        };
        assert!(options.load_acronyms().unwrap().is_empty());
    }

    #[test]
    fn test_missing_explicit_acronym_file_is_fatal() {
        let options = FilterOptions {
            acronyms: Some(PathBuf::from("/nonexistent/acronyms.tex")),
            ..FilterOptions::default()
        };
        assert!(options.load_acronyms().is_err());
    }
}
