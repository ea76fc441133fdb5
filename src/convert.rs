//! Bulk conversion entry points.
//!
//! [`convert_directory`] walks the top level of the source directory and, for
//! each PDF in file-name order: reads its page count, moves it into
//! `<storage root>/<stem>/`, and renders its pages there. A PDF whose output
//! directory is already populated is skipped and the run moves on; any
//! other failure aborts the whole run. Already-moved PDFs and already-rendered
//! pages are the only record of progress, which is enough for a re-run to
//! pick up where a failed one stopped.

use crate::config::RunConfig;
use crate::error::Pdf2ImgError;
use crate::output::{BulkSummary, ConvertedPdf, PdfOutcome, SkippedPdf};
use crate::paths;
use crate::pipeline::invoke::{detect_converter, CommandRunner, ProcessRunner};
use crate::pipeline::relocate::{self, Relocation};
use crate::pipeline::{pages, render};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const PDF_SUFFIX: &str = ".pdf";

/// Top-level `.pdf` files in `source_dir`, sorted by file name.
pub fn discover_pdfs(source_dir: &Path) -> Result<Vec<PathBuf>, Pdf2ImgError> {
    let candidates = paths::list_files_with_extension(source_dir, PDF_SUFFIX)
        .map_err(|e| Pdf2ImgError::io(source_dir, e))?;
    Ok(candidates.into_iter().filter(|p| paths::is_pdf(p)).collect())
}

/// The directory that receives one output directory per PDF: the parent of
/// the source directory. A source of `.` or `..` is resolved against the
/// filesystem first.
pub fn storage_root(source_dir: &Path) -> Result<PathBuf, Pdf2ImgError> {
    paths::containing_directory(source_dir).map_err(|e| Pdf2ImgError::io(source_dir, e))
}

/// How many of `candidates` PDFs to process under `limit`.
pub fn effective_limit(limit: Option<usize>, candidates: usize) -> usize {
    match limit {
        Some(n) if n <= candidates => n,
        _ => candidates,
    }
}

/// Fail with [`Pdf2ImgError::ConverterNotFound`] unless the configured
/// converter answers its version query.
pub async fn ensure_converter<R: CommandRunner>(
    runner: &R,
    config: &RunConfig,
) -> Result<(), Pdf2ImgError> {
    if detect_converter(runner, &config.converter).await {
        debug!("{} is detected", config.converter);
        Ok(())
    } else {
        Err(Pdf2ImgError::ConverterNotFound {
            program: config.converter.clone(),
        })
    }
}

/// Detect the converter, then convert every PDF using real subprocesses.
pub async fn run(config: &RunConfig) -> Result<BulkSummary, Pdf2ImgError> {
    if !paths::is_directory(&config.source_dir) {
        return Err(Pdf2ImgError::SourceNotDirectory {
            path: config.source_dir.clone(),
        });
    }
    let runner = ProcessRunner;
    ensure_converter(&runner, config).await?;
    convert_directory(&runner, config).await
}

/// Convert every PDF in `config.source_dir`, up to `config.limit`.
///
/// # Errors
/// Returns the first fatal per-PDF error. PDFs processed before it keep
/// their output; later ones are left untouched.
pub async fn convert_directory<R: CommandRunner>(
    runner: &R,
    config: &RunConfig,
) -> Result<BulkSummary, Pdf2ImgError> {
    let source_dir = &config.source_dir;
    if !paths::is_directory(source_dir) {
        return Err(Pdf2ImgError::SourceNotDirectory {
            path: source_dir.clone(),
        });
    }

    let pdfs = discover_pdfs(source_dir)?;
    let root = storage_root(source_dir)?;

    if config.dry_run {
        info!("Dry run, no operations will be executed");
    }
    info!("PDF Source: {}", source_dir.display());
    info!("PDF Storage Root: {}", root.display());
    info!("PDFs found: {}", pdfs.len());

    let limit = effective_limit(config.limit, pdfs.len());
    if limit < pdfs.len() {
        info!("Stopping at limit: {}", limit);
    }

    if let Some(cb) = &config.progress_callback {
        cb.on_run_start(limit);
    }

    let mut summary = BulkSummary {
        source_dir: source_dir.clone(),
        storage_root: root.clone(),
        candidates: pdfs.len(),
        effective_limit: limit,
        dry_run: config.dry_run,
        ..Default::default()
    };

    for (i, pdf) in pdfs.iter().take(limit).enumerate() {
        let index = i + 1;
        match process_pdf(runner, config, pdf, &root, index, limit).await {
            PdfOutcome::Converted(converted) => summary.converted.push(converted),
            PdfOutcome::Skipped(skipped) => summary.skipped.push(skipped),
            PdfOutcome::Failed { pdf, error } => {
                error!("Error while processing PDF<{}>: {}", pdf.display(), error);
                if let Some(cb) = &config.progress_callback {
                    cb.on_pdf_error(index, limit, &pdf, &error.to_string());
                }
                return Err(error);
            }
        }
    }

    info!(
        "Done: {} converted, {} skipped",
        summary.converted.len(),
        summary.skipped.len()
    );
    if let Some(cb) = &config.progress_callback {
        cb.on_run_complete(&summary);
    }

    Ok(summary)
}

/// Count, relocate and render a single PDF.
///
/// `index` is 1-based within `total`.
pub async fn process_pdf<R: CommandRunner>(
    runner: &R,
    config: &RunConfig,
    pdf: &Path,
    storage_root: &Path,
    index: usize,
    total: usize,
) -> PdfOutcome {
    info!("PDF {} of {}", index, total);
    debug!("Processing PDF<{}>", pdf.display());
    if let Some(cb) = &config.progress_callback {
        cb.on_pdf_start(index, total, pdf);
    }

    let failed = |error: Pdf2ImgError| PdfOutcome::Failed {
        pdf: pdf.to_path_buf(),
        error,
    };

    let page_count = match pages::page_count(pdf).await {
        Ok(n) => n,
        Err(e) => return failed(e),
    };

    let relocated = match relocate::relocate_pdf(pdf, storage_root, config).await {
        Ok(Relocation::Moved(path)) | Ok(Relocation::Planned(path)) => path,
        Ok(Relocation::Skipped(reason)) => {
            let output_dir = match relocate::relocation_target(pdf, storage_root) {
                Ok(target) => target.dir,
                Err(e) => return failed(e),
            };
            warn!("Skipping directory {}: {}", output_dir.display(), reason);
            if let Some(cb) = &config.progress_callback {
                cb.on_pdf_skipped(index, total, pdf, &reason);
            }
            return PdfOutcome::Skipped(SkippedPdf {
                source: pdf.to_path_buf(),
                output_dir,
                reason,
            });
        }
        Err(e) => return failed(e),
    };

    let output_dir = paths::parent_directory(&relocated);
    debug!("Pages Storage Path: {}", output_dir.display());

    let (strategy, report) =
        match render::convert_pdf(runner, config, &relocated, &output_dir, page_count).await {
            Ok(done) => done,
            Err(e) => return failed(e),
        };

    if let Some(cb) = &config.progress_callback {
        cb.on_pdf_complete(index, total, pdf, page_count);
    }

    PdfOutcome::Converted(ConvertedPdf {
        source: pdf.to_path_buf(),
        relocated,
        output_dir,
        page_count,
        strategy,
        invocations: report.invocations,
        pages_already_present: report.pages_already_present,
    })
}
