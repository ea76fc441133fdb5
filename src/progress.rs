//! Progress-callback trait for per-PDF and per-page events.
//!
//! Inject an [`Arc<dyn BulkProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events
//! as the orchestrator walks the source directory. The `pdf2img` binary uses
//! this to drive its terminal progress bar; library callers can forward the
//! events anywhere.
//!
//! # Example
//!
//! ```rust
//! use bulk_pdf2img::{BulkProgressCallback, RunConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     started: AtomicUsize,
//! }
//!
//! impl BulkProgressCallback for CountingCallback {
//!     fn on_pdf_start(&self, index: usize, total: usize, pdf: &Path) {
//!         self.started.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("PDF {index} of {total}: {}", pdf.display());
//!     }
//! }
//!
//! let config = RunConfig::builder("/data/inbox")
//!     .progress_callback(Arc::new(CountingCallback { started: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{BulkSummary, ConversionStrategy, SkipReason};
use std::path::Path;
use std::sync::Arc;

/// Called by the orchestrator as it processes each PDF.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Indices are 1-based.
pub trait BulkProgressCallback: Send + Sync {
    /// Called once after enumeration, before the first PDF.
    fn on_run_start(&self, total_pdfs: usize) {
        let _ = total_pdfs;
    }

    /// Called before a PDF's page count is read.
    fn on_pdf_start(&self, index: usize, total_pdfs: usize, pdf: &Path) {
        let _ = (index, total_pdfs, pdf);
    }

    /// Called once the conversion strategy has been chosen.
    fn on_strategy(&self, pdf: &Path, page_count: usize, strategy: ConversionStrategy) {
        let _ = (pdf, page_count, strategy);
    }

    /// Called before each light-path page invocation.
    fn on_page_start(&self, page: usize, page_count: usize) {
        let _ = (page, page_count);
    }

    /// Called when a PDF is skipped without error.
    fn on_pdf_skipped(&self, index: usize, total_pdfs: usize, pdf: &Path, reason: &SkipReason) {
        let _ = (index, total_pdfs, pdf, reason);
    }

    /// Called when every page of a PDF has been produced.
    fn on_pdf_complete(&self, index: usize, total_pdfs: usize, pdf: &Path, page_count: usize) {
        let _ = (index, total_pdfs, pdf, page_count);
    }

    /// Called when a PDF fails; the run aborts right after.
    fn on_pdf_error(&self, index: usize, total_pdfs: usize, pdf: &Path, error: &str) {
        let _ = (index, total_pdfs, pdf, error);
    }

    /// Called once after the last PDF when the run succeeded.
    fn on_run_complete(&self, summary: &BulkSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BulkProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn BulkProgressCallback>;
