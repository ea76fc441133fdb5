//! Result types produced by a bulk run.

use crate::error::Pdf2ImgError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How a PDF's pages are handed to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStrategy {
    /// One converter invocation per page; pages already on disk are skipped.
    Light,
    /// A single invocation for the whole PDF using a `%d` page template.
    Robust,
}

impl ConversionStrategy {
    /// Light whenever optimisation is on or the PDF is small.
    pub fn select(page_count: usize, optimize: bool, light_path_max_pages: usize) -> Self {
        if optimize || page_count < light_path_max_pages {
            ConversionStrategy::Light
        } else {
            ConversionStrategy::Robust
        }
    }
}

impl fmt::Display for ConversionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionStrategy::Light => f.write_str("light"),
            ConversionStrategy::Robust => f.write_str("robust"),
        }
    }
}

/// Why a PDF was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    /// The output directory already holds page images and overwrite is off.
    OutputExists { existing: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OutputExists { existing } => write!(
                f,
                "output directory already contains {existing} image(s); pass -overwrite to redo it"
            ),
        }
    }
}

/// A PDF whose pages were rendered (or, in dry-run mode, planned).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedPdf {
    /// Where the PDF was found.
    pub source: PathBuf,
    /// Where the PDF lives now.
    pub relocated: PathBuf,
    pub output_dir: PathBuf,
    pub page_count: usize,
    pub strategy: ConversionStrategy,
    /// Converter invocations issued (or planned, in dry-run mode).
    pub invocations: usize,
    /// Light-path pages whose image already existed.
    pub pages_already_present: usize,
}

/// A PDF skipped without error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedPdf {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of processing one PDF. The orchestrator continues past
/// `Skipped` and aborts the run on `Failed`.
#[derive(Debug)]
pub enum PdfOutcome {
    Converted(ConvertedPdf),
    Skipped(SkippedPdf),
    Failed { pdf: PathBuf, error: Pdf2ImgError },
}

/// Summary of a completed bulk run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkSummary {
    pub source_dir: PathBuf,
    pub storage_root: PathBuf,
    /// PDFs found in the source directory.
    pub candidates: usize,
    /// How many of them the run was allowed to process.
    pub effective_limit: usize,
    pub dry_run: bool,
    pub converted: Vec<ConvertedPdf>,
    pub skipped: Vec<SkippedPdf>,
}

impl BulkSummary {
    /// Total converter invocations across all converted PDFs.
    pub fn total_invocations(&self) -> usize {
        self.converted.iter().map(|c| c.invocations).sum()
    }
}
