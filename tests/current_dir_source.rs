//! A source directory of `.` must put output beside the working directory,
//! not inside it.
//!
//! This changes the process working directory, so it lives in its own test
//! binary with a single test.

mod common;

use bulk_pdf2img::{convert_directory, RunConfig};
use common::{write_pdf, RecordingRunner};
use std::env;
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn dot_source_uses_parent_of_working_directory() {
    let tmp = TempDir::new().unwrap();
    let docs = tmp.path().join("docs");
    fs::create_dir(&docs).unwrap();
    write_pdf(&docs.join("a.pdf"), 2);

    let previous = env::current_dir().unwrap();
    env::set_current_dir(&docs).unwrap();
    let config = RunConfig::builder(".").build().unwrap();
    let runner = RecordingRunner::default();
    let result = convert_directory(&runner, &config).await;
    env::set_current_dir(previous).unwrap();

    let summary = result.unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    assert_eq!(summary.storage_root, root);
    assert!(root.join("a").join("a.pdf").exists());
    assert!(root.join("a").join("a-1.webp").exists());
    assert!(!docs.join("a").exists());
}
