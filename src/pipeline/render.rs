//! Page rasterisation by delegating to the external converter.
//!
//! ## Two strategies
//!
//! * **Light**: one invocation per page using the `file.pdf[N]` selector.
//!   Each page is a short-lived process with bounded memory, and pages
//!   already on disk are skipped, so an interrupted run resumes where it
//!   stopped.
//! * **Robust**: one invocation for the whole document with a
//!   `<base>-%d<ext>` output template. Far fewer process spawns, but the
//!   converter holds the whole document at once. Only used for PDFs with
//!   many pages when optimisation is turned off.
//!
//! Either way, dry-run mode builds and logs the commands without running them.

use crate::config::RunConfig;
use crate::error::Pdf2ImgError;
use crate::output::ConversionStrategy;
use crate::paths;
use crate::pipeline::invoke::{converter_base, CommandRunner, Invocation};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a strategy did for one PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Converter invocations issued, or planned in dry-run mode.
    pub invocations: usize,
    /// Pages skipped because their image already existed.
    pub pages_already_present: usize,
}

/// `<output_dir>/<base>-<page><ext>`, zero-indexed.
pub fn page_output_path(output_dir: &Path, base: &str, page: usize, ext: &str) -> PathBuf {
    output_dir.join(format!("{base}-{page}{ext}"))
}

/// `<output_dir>/<base>-%d<ext>`; the converter substitutes the page index.
pub fn page_template(output_dir: &Path, base: &str, ext: &str) -> PathBuf {
    output_dir.join(format!("{base}-%d{ext}"))
}

/// `file.pdf[N]`: the converter's single-page input syntax.
pub fn page_selector(pdf_path: &Path, page: usize) -> OsString {
    let mut selector = pdf_path.as_os_str().to_os_string();
    selector.push(format!("[{page}]"));
    selector
}

/// Pick a strategy for `page_count` and run it.
pub async fn convert_pdf<R: CommandRunner>(
    runner: &R,
    config: &RunConfig,
    pdf_path: &Path,
    output_dir: &Path,
    page_count: usize,
) -> Result<(ConversionStrategy, RenderReport), Pdf2ImgError> {
    let strategy =
        ConversionStrategy::select(page_count, config.optimize, config.light_path_max_pages);
    debug!("PDF<{}>: {} pages, {} path", pdf_path.display(), page_count, strategy);
    if let Some(cb) = &config.progress_callback {
        cb.on_strategy(pdf_path, page_count, strategy);
    }

    let report = match strategy {
        ConversionStrategy::Light => {
            convert_light(runner, config, pdf_path, output_dir, page_count).await?
        }
        ConversionStrategy::Robust => convert_robust(runner, config, pdf_path, output_dir).await?,
    };
    Ok((strategy, report))
}

/// Convert each page with its own invocation, skipping pages already on disk.
///
/// The first failing page aborts the PDF with
/// [`Pdf2ImgError::PageConversionFailed`].
pub async fn convert_light<R: CommandRunner>(
    runner: &R,
    config: &RunConfig,
    pdf_path: &Path,
    output_dir: &Path,
    page_count: usize,
) -> Result<RenderReport, Pdf2ImgError> {
    let base = config.images_base_name(pdf_path);
    let ext = config.image_ext();
    let template = converter_base(config);
    let mut report = RenderReport::default();

    debug!("Converting {} pages", page_count);

    for page in 0..page_count {
        let output = page_output_path(output_dir, &base, page, &ext);

        if paths::path_exists(&output).map_err(|e| Pdf2ImgError::io(&output, e))? {
            debug!("Skipping page {}", page);
            report.pages_already_present += 1;
            continue;
        }

        if let Some(cb) = &config.progress_callback {
            cb.on_page_start(page, page_count);
        }

        let invocation = template
            .clone()
            .arg(page_selector(pdf_path, page))
            .arg(&output);
        run_or_plan(runner, config, &invocation)
            .await
            .map_err(|e| Pdf2ImgError::PageConversionFailed {
                pdf: pdf_path.to_path_buf(),
                page,
                source: Box::new(e),
            })?;
        report.invocations += 1;

        debug!("Page {} converted", page);
    }

    Ok(report)
}

/// Convert the whole PDF in a single invocation using a page template.
pub async fn convert_robust<R: CommandRunner>(
    runner: &R,
    config: &RunConfig,
    pdf_path: &Path,
    output_dir: &Path,
) -> Result<RenderReport, Pdf2ImgError> {
    let base = config.images_base_name(pdf_path);
    let output = page_template(output_dir, &base, &config.image_ext());

    debug!("Converting PDF<{}> to images", pdf_path.display());
    debug!("Output path: {}", output.display());

    let invocation = converter_base(config).arg(pdf_path).arg(&output);
    run_or_plan(runner, config, &invocation).await?;

    debug!("Conversion finished");
    Ok(RenderReport {
        invocations: 1,
        pages_already_present: 0,
    })
}

async fn run_or_plan<R: CommandRunner>(
    runner: &R,
    config: &RunConfig,
    invocation: &Invocation,
) -> Result<(), Pdf2ImgError> {
    if config.dry_run {
        debug!("Would run: {}", invocation);
        return Ok(());
    }
    debug!("Command: {}", invocation);
    runner.run(invocation).await
}
