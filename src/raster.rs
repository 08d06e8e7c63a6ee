//! Raster copies of vector images, cached on disk next to their sources.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::utils::{ConversionError, ConversionResult};

/// Turns one vector image into `<stem>.<format>`.
pub trait Rasterizer {
    /// Program name, for logs and errors.
    fn name(&self) -> &str;

    fn rasterize(&self, source: &Path, stem: &Path) -> ConversionResult<()>;
}

/// Runs a pdftoppm-compatible executable:
/// `<program> -scale-to <N> -<format> -singlefile <source> <stem>`.
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    pub program: String,
    pub scale_to: u32,
    pub format: String,
}

impl Default for CommandRasterizer {
    fn default() -> Self {
        Self {
            program: "pdftoppm".to_string(),
            scale_to: 1024,
            format: "png".to_string(),
        }
    }
}

impl Rasterizer for CommandRasterizer {
    fn name(&self) -> &str {
        &self.program
    }

    fn rasterize(&self, source: &Path, stem: &Path) -> ConversionResult<()> {
        let status = Command::new(&self.program)
            .arg("-scale-to")
            .arg(self.scale_to.to_string())
            .arg(format!("-{}", self.format))
            .arg("-singlefile")
            .arg(source)
            .arg(stem)
            .stdout(Stdio::null())
            .status()
            .map_err(|e| ConversionError::rasterize(&self.program, source, e.to_string()))?;
        if !status.success() {
            return Err(ConversionError::rasterize(
                &self.program,
                source,
                status.to_string(),
            ));
        }
        Ok(())
    }
}

/// Where a vector image's raster copy lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTarget {
    pub source: PathBuf,
    pub derived: PathBuf,
}

impl RasterTarget {
    /// Output path without extension, as the rasterizer expects it.
    pub fn stem(&self) -> PathBuf {
        self.derived.with_extension("")
    }
}

/// Derived-file cache under a fixed resource root.
///
/// A derived file is valid whenever it exists; staleness against the
/// source is not checked.
pub struct ImageCache {
    root: PathBuf,
    format: String,
    vector_extensions: Vec<String>,
    rasterizer: Box<dyn Rasterizer>,
}

impl ImageCache {
    pub fn new(
        root: impl Into<PathBuf>,
        format: impl Into<String>,
        vector_extensions: Vec<String>,
        rasterizer: Box<dyn Rasterizer>,
    ) -> Self {
        Self {
            root: root.into(),
            format: format.into(),
            vector_extensions,
            rasterizer,
        }
    }

    /// Source and derived paths for `url`, or `None` if it is not a vector image.
    pub fn target(&self, url: &str) -> Option<RasterTarget> {
        let relative = Path::new(url);
        let ext = relative.extension()?.to_str()?;
        if !self
            .vector_extensions
            .iter()
            .any(|v| v.eq_ignore_ascii_case(ext))
        {
            return None;
        }
        Some(RasterTarget {
            source: self.root.join(relative),
            derived: self.root.join(relative.with_extension(&self.format)),
        })
    }

    /// Make sure the raster copy exists. Returns `true` if the rasterizer ran.
    pub fn ensure(&self, target: &RasterTarget) -> ConversionResult<bool> {
        if target.derived.exists() {
            log::debug!("cached raster {}", target.derived.display());
            return Ok(false);
        }
        log::info!(
            "Rasterizing {} -> {}",
            target.source.display(),
            target.derived.display()
        );
        if let Err(err) = self.rasterizer.rasterize(&target.source, &target.stem()) {
            discard_partial(&target.derived);
            return Err(err);
        }
        if !target.derived.exists() {
            return Err(ConversionError::rasterize(
                self.rasterizer.name(),
                &target.source,
                format!("no output at {}", target.derived.display()),
            ));
        }
        Ok(true)
    }
}

/// Remove whatever a failed run wrote at `derived`.
fn discard_partial(derived: &Path) {
    match fs::remove_file(derived) {
        Ok(()) => log::debug!("removed partial raster {}", derived.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("cannot remove {}: {}", derived.display(), err),
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("root", &self.root)
            .field("format", &self.format)
            .field("vector_extensions", &self.vector_extensions)
            .field("rasterizer", &self.rasterizer.name())
            .finish()
    }
}
