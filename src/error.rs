//! Error types for the bulk-pdf2img library.
//!
//! A single [`Pdf2ImgError`] enum covers every fatal failure. A PDF whose
//! output directory is already populated is *not* an error: relocation
//! reports it as [`crate::pipeline::relocate::Relocation::Skipped`] and the
//! orchestrator records a [`crate::output::PdfOutcome::Skipped`] before moving
//! on to the next file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the bulk-pdf2img library.
#[derive(Debug, Error)]
pub enum Pdf2ImgError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No source directory was supplied and help mode was not requested.
    #[error("No PDF source provided")]
    MissingSource,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Environment errors ────────────────────────────────────────────────
    /// The configured source path is missing or is not a directory.
    #[error("PDF source must be an existing directory: '{path}'")]
    SourceNotDirectory { path: PathBuf },

    /// The image-conversion executable could not be run.
    #[error(
        "Image converter '{program}' was not found or failed its version check.\n\
ImageMagick is required to run this program.\n\
Install it, or point -magick at an existing binary."
    )]
    ConverterNotFound { program: String },

    // ── Per-PDF errors ────────────────────────────────────────────────────
    /// Filesystem operation failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF could not be opened to read its page count.
    #[error("Failed to read page count of '{path}': {detail}")]
    PageCountFailed { path: PathBuf, detail: String },

    /// Moving the PDF into its output directory failed.
    #[error("Failed to move '{from}' to '{to}': {source}")]
    RelocationFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter process could not be started.
    #[error("Failed to start '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter process ran but exited unsuccessfully.
    #[error("'{program}' exited with {status}")]
    ConverterFailed { program: String, status: String },

    /// A single page of a light-path conversion failed.
    #[error("Error while converting page {page} of '{pdf}': {source}")]
    PageConversionFailed {
        pdf: PathBuf,
        page: usize,
        #[source]
        source: Box<Pdf2ImgError>,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2ImgError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
