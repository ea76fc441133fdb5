//! Configuration for a bulk PDF-to-images run.
//!
//! Every knob lives in one immutable [`RunConfig`], built once at startup via
//! [`RunConfigBuilder`] and passed by reference to each pipeline stage. There
//! is no process-wide state to initialise, so nothing can read the
//! configuration before it exists.

use crate::error::Pdf2ImgError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default executable used for both conversion and the availability probe.
pub const DEFAULT_CONVERTER: &str = "magick";

/// PDFs with fewer pages than this always take the per-page light path.
pub const LIGHT_PATH_MAX_PAGES: usize = 15;

/// Configuration for a bulk conversion.
///
/// # Example
/// ```rust
/// use bulk_pdf2img::RunConfig;
///
/// let config = RunConfig::builder("/data/inbox")
///     .dpi(150)
///     .image_ext("png")
///     .limit(Some(10))
///     .build()
///     .unwrap();
/// assert_eq!(config.image_ext(), ".png");
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Directory whose top-level `.pdf` files are converted.
    pub source_dir: PathBuf,

    /// Log every operation without touching the filesystem or running the
    /// converter. Default: false.
    pub dry_run: bool,

    /// Delete previously rendered pages instead of skipping the PDF. Default: false.
    pub overwrite: bool,

    /// Rendering density passed to the converter. Default: 300.
    ///
    /// 150 is low quality, 600 is high quality.
    pub dpi: u32,

    /// Pass `-antialias` to the converter. Default: false.
    pub antialias: bool,

    /// Base name for page images. `None` uses the PDF's file stem.
    pub custom_name: Option<String>,

    /// Output image extension as supplied, with or without the leading dot.
    /// Read it through [`RunConfig::image_ext`]. Default: `webp`.
    pub image_ext: String,

    /// Maximum number of PDFs to process. `None` means unlimited.
    pub limit: Option<usize>,

    /// Forward `-verbose` to the converter and log commands. Default: false.
    pub verbose: bool,

    /// Value for `-limit memory`. Default: `2G`.
    pub memory_limit: String,

    /// Value for `-limit map`. Default: `1G`.
    pub vm_limit: String,

    /// Value for `-limit disk`. Default: `5G`.
    pub disk_limit: String,

    /// Always use the per-page light path. Default: true.
    ///
    /// When false, PDFs with at least [`RunConfig::light_path_max_pages`]
    /// pages are handed to the converter in a single invocation.
    pub optimize: bool,

    /// Converter executable. Default: [`DEFAULT_CONVERTER`].
    pub converter: String,

    /// Page-count threshold for the robust path. Default: [`LIGHT_PATH_MAX_PAGES`].
    pub light_path_max_pages: usize,

    /// Optional per-PDF progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("source_dir", &self.source_dir)
            .field("dry_run", &self.dry_run)
            .field("overwrite", &self.overwrite)
            .field("dpi", &self.dpi)
            .field("antialias", &self.antialias)
            .field("custom_name", &self.custom_name)
            .field("image_ext", &self.image_ext)
            .field("limit", &self.limit)
            .field("verbose", &self.verbose)
            .field("memory_limit", &self.memory_limit)
            .field("vm_limit", &self.vm_limit)
            .field("disk_limit", &self.disk_limit)
            .field("optimize", &self.optimize)
            .field("converter", &self.converter)
            .field("light_path_max_pages", &self.light_path_max_pages)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BulkProgressCallback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a builder with defaults for every field except the source directory.
    pub fn builder(source_dir: impl Into<PathBuf>) -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self {
                source_dir: source_dir.into(),
                dry_run: false,
                overwrite: false,
                dpi: 300,
                antialias: false,
                custom_name: None,
                image_ext: "webp".to_string(),
                limit: None,
                verbose: false,
                memory_limit: "2G".to_string(),
                vm_limit: "1G".to_string(),
                disk_limit: "5G".to_string(),
                optimize: true,
                converter: DEFAULT_CONVERTER.to_string(),
                light_path_max_pages: LIGHT_PATH_MAX_PAGES,
                progress_callback: None,
            },
        }
    }

    /// The output extension with exactly one leading dot, e.g. `.webp`.
    ///
    /// Accepts `webp`, `.webp` and a quoted `".webp"` alike.
    pub fn image_ext(&self) -> String {
        normalize_ext(&self.image_ext)
    }

    /// Base name for the page images of `pdf_path`: the custom name if set,
    /// otherwise the PDF file name without its extension.
    pub fn images_base_name(&self, pdf_path: &Path) -> String {
        match &self.custom_name {
            Some(name) => name.clone(),
            None => crate::paths::pdf_directory_name(pdf_path).unwrap_or_default(),
        }
    }
}

fn normalize_ext(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    format!(".{}", trimmed.trim_start_matches('.'))
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn dry_run(mut self, v: bool) -> Self {
        self.config.dry_run = v;
        self
    }

    pub fn overwrite(mut self, v: bool) -> Self {
        self.config.overwrite = v;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn antialias(mut self, v: bool) -> Self {
        self.config.antialias = v;
        self
    }

    /// An empty name falls back to the PDF file stem.
    pub fn custom_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.config.custom_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    pub fn image_ext(mut self, ext: impl Into<String>) -> Self {
        self.config.image_ext = ext.into();
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.config.limit = limit;
        self
    }

    /// Signed limit as accepted on the command line; negative means unlimited.
    pub fn signed_limit(self, limit: i64) -> Self {
        let limit = usize::try_from(limit).ok();
        self.limit(limit)
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.config.verbose = v;
        self
    }

    pub fn memory_limit(mut self, v: impl Into<String>) -> Self {
        self.config.memory_limit = v.into();
        self
    }

    pub fn vm_limit(mut self, v: impl Into<String>) -> Self {
        self.config.vm_limit = v.into();
        self
    }

    pub fn disk_limit(mut self, v: impl Into<String>) -> Self {
        self.config.disk_limit = v.into();
        self
    }

    pub fn optimize(mut self, v: bool) -> Self {
        self.config.optimize = v;
        self
    }

    pub fn converter(mut self, program: impl Into<String>) -> Self {
        self.config.converter = program.into();
        self
    }

    pub fn light_path_max_pages(mut self, n: usize) -> Self {
        self.config.light_path_max_pages = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, Pdf2ImgError> {
        let c = &self.config;
        if c.source_dir.as_os_str().is_empty() {
            return Err(Pdf2ImgError::MissingSource);
        }
        if c.dpi == 0 {
            return Err(Pdf2ImgError::InvalidConfig(
                "DPI must be a positive integer".into(),
            ));
        }
        if normalize_ext(&c.image_ext) == "." {
            return Err(Pdf2ImgError::InvalidConfig(
                "Image extension must not be empty".into(),
            ));
        }
        for (name, value) in [
            ("memory", &c.memory_limit),
            ("map", &c.vm_limit),
            ("disk", &c.disk_limit),
        ] {
            if value.trim().is_empty() {
                return Err(Pdf2ImgError::InvalidConfig(format!(
                    "Resource limit '{name}' must not be empty"
                )));
            }
        }
        if c.converter.trim().is_empty() {
            return Err(Pdf2ImgError::InvalidConfig(
                "Converter program must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
