//! Move each PDF into its own output directory before conversion.
//!
//! `<root>/<stem>/<file name>` becomes the PDF's new home and the directory
//! its pages are rendered into. The move is a plain rename, so the storage
//! root must be on the same filesystem as the source directory.

use crate::config::RunConfig;
use crate::error::Pdf2ImgError;
use crate::output::SkipReason;
use crate::paths;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where a PDF will live after relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationTarget {
    /// `<root>/<stem>`
    pub dir: PathBuf,
    /// `<root>/<stem>/<file name>`
    pub path: PathBuf,
}

/// Result of [`relocate_pdf`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relocation {
    /// The PDF was renamed to this path.
    Moved(PathBuf),
    /// Dry run: the PDF would have been renamed to this path.
    Planned(PathBuf),
    /// The output directory is already populated and overwrite is off.
    Skipped(SkipReason),
}

/// Compute the destination for `pdf_path` under `storage_root`.
pub fn relocation_target(pdf_path: &Path, storage_root: &Path) -> Result<RelocationTarget, Pdf2ImgError> {
    let stem = paths::pdf_directory_name(pdf_path).ok_or_else(|| {
        Pdf2ImgError::Internal(format!(
            "Cannot derive a directory name from '{}'",
            pdf_path.display()
        ))
    })?;
    let file_name = pdf_path.file_name().ok_or_else(|| {
        Pdf2ImgError::Internal(format!("'{}' has no file name", pdf_path.display()))
    })?;

    let dir = storage_root.join(stem);
    let path = dir.join(file_name);
    Ok(RelocationTarget { dir, path })
}

/// Move `pdf_path` into `<storage_root>/<stem>/`.
///
/// Existing images with the configured extension cause a skip, or are
/// deleted first when `overwrite` is set. In dry-run mode nothing is
/// touched and the planned destination is returned.
pub async fn relocate_pdf(
    pdf_path: &Path,
    storage_root: &Path,
    config: &RunConfig,
) -> Result<Relocation, Pdf2ImgError> {
    let target = relocation_target(pdf_path, storage_root)?;
    debug!("PDF Directory: {}", target.dir.display());
    debug!("New PDF Path: {}", target.path.display());

    if config.dry_run {
        info!(
            "Would move PDF<{}> to <{}>",
            pdf_path.display(),
            target.path.display()
        );
        return Ok(Relocation::Planned(target.path));
    }

    paths::create_dir_if_missing(&target.dir).map_err(|e| Pdf2ImgError::io(&target.dir, e))?;

    let ext = config.image_ext();
    let existing = paths::list_files_with_extension(&target.dir, &ext)
        .map_err(|e| Pdf2ImgError::io(&target.dir, e))?;

    if !existing.is_empty() {
        if !config.overwrite {
            return Ok(Relocation::Skipped(SkipReason::OutputExists {
                existing: existing.len(),
            }));
        }
        let removed = paths::remove_files_with_extension(&target.dir, &ext)
            .map_err(|e| Pdf2ImgError::io(&target.dir, e))?;
        info!(
            "Removed {} previous {} page(s) from {}",
            removed,
            ext,
            target.dir.display()
        );
    }

    tokio::fs::rename(pdf_path, &target.path)
        .await
        .map_err(|source| Pdf2ImgError::RelocationFailed {
            from: pdf_path.to_path_buf(),
            to: target.path.clone(),
            source,
        })?;

    debug!("PDF<{}> moved", target.path.display());
    Ok(Relocation::Moved(target.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        root: PathBuf,
        pdf: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        let source = root.join("inbox");
        fs::create_dir(&source).unwrap();
        let pdf = source.join("report.pdf");
        fs::write(&pdf, b"%PDF-1.5").unwrap();
        Fixture { _tmp: tmp, root, pdf }
    }

    #[test]
    fn target_layout() {
        let t = relocation_target(Path::new("/data/inbox/a.b.pdf"), Path::new("/data")).unwrap();
        assert_eq!(t.dir, PathBuf::from("/data/a.b"));
        assert_eq!(t.path, PathBuf::from("/data/a.b/a.b.pdf"));
    }

    #[tokio::test]
    async fn moves_into_fresh_directory() {
        let f = fixture();
        let config = RunConfig::builder(f.root.join("inbox")).build().unwrap();

        let result = relocate_pdf(&f.pdf, &f.root, &config).await.unwrap();
        let expected = f.root.join("report").join("report.pdf");
        assert_eq!(result, Relocation::Moved(expected.clone()));
        assert!(!f.pdf.exists());
        assert!(expected.exists());
    }

    #[tokio::test]
    async fn dry_run_touches_nothing() {
        let f = fixture();
        let config = RunConfig::builder(f.root.join("inbox"))
            .dry_run(true)
            .build()
            .unwrap();

        let result = relocate_pdf(&f.pdf, &f.root, &config).await.unwrap();
        assert_eq!(
            result,
            Relocation::Planned(f.root.join("report").join("report.pdf"))
        );
        assert!(f.pdf.exists());
        assert!(!f.root.join("report").exists());
    }

    #[tokio::test]
    async fn populated_directory_is_skipped_without_overwrite() {
        let f = fixture();
        let out = f.root.join("report");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("report-0.webp"), b"img").unwrap();
        fs::write(out.join("report-1.webp"), b"img").unwrap();
        let config = RunConfig::builder(f.root.join("inbox")).build().unwrap();

        let result = relocate_pdf(&f.pdf, &f.root, &config).await.unwrap();
        assert_eq!(
            result,
            Relocation::Skipped(SkipReason::OutputExists { existing: 2 })
        );
        assert!(f.pdf.exists());
        assert!(out.join("report-0.webp").exists());
    }

    #[tokio::test]
    async fn overwrite_cleans_previous_pages() {
        let f = fixture();
        let out = f.root.join("report");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("report-0.webp"), b"img").unwrap();
        fs::write(out.join("keep.png"), b"img").unwrap();
        let config = RunConfig::builder(f.root.join("inbox"))
            .overwrite(true)
            .build()
            .unwrap();

        let result = relocate_pdf(&f.pdf, &f.root, &config).await.unwrap();
        assert!(matches!(result, Relocation::Moved(_)));
        assert!(!out.join("report-0.webp").exists());
        assert!(out.join("keep.png").exists());
        assert!(out.join("report.pdf").exists());
    }

    #[tokio::test]
    async fn other_extensions_do_not_trigger_skip() {
        let f = fixture();
        let out = f.root.join("report");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("report-0.png"), b"img").unwrap();
        let config = RunConfig::builder(f.root.join("inbox")).build().unwrap();

        let result = relocate_pdf(&f.pdf, &f.root, &config).await.unwrap();
        assert!(matches!(result, Relocation::Moved(_)));
    }

    #[tokio::test]
    async fn missing_source_is_relocation_error() {
        let f = fixture();
        fs::remove_file(&f.pdf).unwrap();
        let config = RunConfig::builder(f.root.join("inbox")).build().unwrap();

        let err = relocate_pdf(&f.pdf, &f.root, &config).await.unwrap_err();
        assert!(matches!(err, Pdf2ImgError::RelocationFailed { .. }), "got: {err}");
    }
}
