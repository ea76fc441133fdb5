//! Page counting with `lopdf`.
//!
//! Parsing is synchronous and can be slow on large files, so it runs on the
//! blocking thread pool like any other CPU-bound step.

use crate::error::Pdf2ImgError;
use std::path::Path;
use tracing::debug;

/// Number of pages in the PDF at `pdf_path`.
pub async fn page_count(pdf_path: &Path) -> Result<usize, Pdf2ImgError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || page_count_blocking(&path))
        .await
        .map_err(|e| Pdf2ImgError::Internal(format!("Page-count task panicked: {}", e)))?
}

/// Blocking implementation of [`page_count`].
pub fn page_count_blocking(pdf_path: &Path) -> Result<usize, Pdf2ImgError> {
    let document =
        lopdf::Document::load(pdf_path).map_err(|e| Pdf2ImgError::PageCountFailed {
            path: pdf_path.to_path_buf(),
            detail: e.to_string(),
        })?;

    let pages = document.get_pages().len();
    debug!("PDF<{}> has {} pages", pdf_path.display(), pages);
    Ok(pages)
}
