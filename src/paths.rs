//! Filesystem predicates and naming helpers.
//!
//! Everything here is stateless and non-recursive. PDFs are recognised by
//! their `.pdf` extension only; file contents are never inspected.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Permission bits for newly created output directories.
#[cfg(unix)]
const DIR_MODE: u32 = 0o755;

/// `Ok(false)` only when the path is definitely absent; other stat failures
/// (permission denied, I/O error) are returned as errors.
pub fn path_exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// True when `path` is a directory; false on any stat error.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// True when `path` exists and ends in `.pdf`.
pub fn is_pdf(path: &Path) -> bool {
    matches!(path_exists(path), Ok(true))
        && path.extension().is_some_and(|ext| ext == "pdf")
}

/// The file name of `pdf_path` without its extension, used as the output
/// directory name.
pub fn pdf_directory_name(pdf_path: &Path) -> Option<String> {
    pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}

/// The parent of `path`, ignoring a trailing separator. A bare relative name
/// resolves to `.`.
pub fn parent_directory(path: &Path) -> PathBuf {
    // `Path::parent` already ignores a trailing separator.
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ if path.has_root() && path.parent().is_none() => path.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// The directory containing `dir`, resolving a trailing `.` or `..`.
///
/// `Path::parent` is lexical, so `.` and `..` would otherwise resolve to the
/// current directory, which lies inside (or below) `dir` itself. Those are
/// canonicalised first; anything else goes through [`parent_directory`].
pub fn containing_directory(dir: &Path) -> io::Result<PathBuf> {
    match dir.components().next_back() {
        Some(Component::CurDir | Component::ParentDir) => {
            let resolved = fs::canonicalize(dir)?;
            Ok(parent_directory(&resolved))
        }
        _ => Ok(parent_directory(dir)),
    }
}

/// Regular files directly inside `dir` whose name ends with `suffix`,
/// sorted by file name.
pub fn list_files_with_extension(dir: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Remove every file directly inside `dir` whose name ends with `suffix`.
/// Returns how many were removed.
pub fn remove_files_with_extension(dir: &Path, suffix: &str) -> io::Result<usize> {
    let files = list_files_with_extension(dir, suffix)?;
    for file in &files {
        fs::remove_file(file)?;
    }
    Ok(files.len())
}

/// Create `dir` (one level) unless it already exists.
pub fn create_dir_if_missing(dir: &Path) -> io::Result<()> {
    if path_exists(dir)? {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)
}
