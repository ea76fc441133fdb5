//! Shared helpers for integration tests: PDF fixtures and a recording
//! `CommandRunner` that stands in for ImageMagick.

#![allow(dead_code)]

use bulk_pdf2img::{CommandRunner, Invocation, Pdf2ImgError};
use lopdf::{dictionary, Document, Object};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Write a minimal, valid PDF with `pages` blank A4 pages.
pub fn write_pdf(path: &Path, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("write fixture PDF");
}

/// Every file and directory under `root`, relative, with file sizes.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<u64>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Option<u64>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            let meta = entry.metadata().unwrap();
            if meta.is_dir() {
                out.insert(rel, None);
                walk(root, &path, out);
            } else {
                out.insert(rel, Some(meta.len()));
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

/// Records each invocation and writes the output file(s) it names, the way
/// the converter would. A `%d` template expands to `template_pages` files.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<Invocation>>,
    pub template_pages: usize,
    /// 1-based call number that should fail.
    pub fail_on: Option<usize>,
}

impl RecordingRunner {
    pub fn with_template_pages(template_pages: usize) -> Self {
        Self {
            template_pages,
            ..Default::default()
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn outputs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|inv| inv.get_args().last())
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), Pdf2ImgError> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(invocation.clone());
            calls.len()
        };

        if self.fail_on == Some(call_number) {
            return Err(Pdf2ImgError::ConverterFailed {
                program: invocation.program_name(),
                status: "exit status: 1".into(),
            });
        }

        let Some(output) = invocation.get_args().last() else {
            return Ok(());
        };
        let output = output.to_string_lossy();
        if invocation.get_args().first().is_some_and(|a| a == "convert") {
            if output.contains("%d") {
                for page in 0..self.template_pages {
                    std::fs::write(output.replace("%d", &page.to_string()), b"img").unwrap();
                }
            } else {
                std::fs::write(&*output, b"img").unwrap();
            }
        }
        Ok(())
    }
}
