//! # bulk-pdf2img
//!
//! Bulk-convert a directory of PDF files into per-page images.
//!
//! Rasterisation is delegated to ImageMagick (`magick convert`); this crate
//! handles the bookkeeping around it: finding the PDFs, giving each one its
//! own output directory, choosing how to drive the converter, and skipping
//! work that is already done.
//!
//! ## Pipeline Overview
//!
//! ```text
//! <parent>/<source>/*.pdf
//!  │
//!  ├─ 1. Discover  top-level *.pdf, sorted, capped by the limit
//!  ├─ 2. Count     page count via lopdf (spawn_blocking)
//!  ├─ 3. Relocate  move to <parent>/<stem>/<stem>.pdf, or skip if populated
//!  ├─ 4. Render    light: one `magick` per page │ robust: one per document
//!  └─ 5. Summary   converted / skipped PDFs
//! ```
//!
//! The run is strictly sequential: one PDF at a time, one converter process
//! at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bulk_pdf2img::{run, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::builder("/data/inbox")
//!         .dpi(200)
//!         .image_ext("png")
//!         .build()?;
//!     let summary = run(&config).await?;
//!     eprintln!("{} converted, {} skipped", summary.converted.len(), summary.skipped.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RunConfig, RunConfigBuilder, DEFAULT_CONVERTER, LIGHT_PATH_MAX_PAGES};
pub use convert::{
    convert_directory, discover_pdfs, effective_limit, ensure_converter, process_pdf, run,
    storage_root,
};
pub use error::Pdf2ImgError;
pub use output::{
    BulkSummary, ConversionStrategy, ConvertedPdf, PdfOutcome, SkipReason, SkippedPdf,
};
pub use pipeline::invoke::{CommandRunner, Invocation, ProcessRunner};
pub use progress::{BulkProgressCallback, NoopProgressCallback, ProgressCallback};
