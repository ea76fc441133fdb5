//! Per-PDF pipeline stages.
//!
//! ## Data Flow
//!
//! ```text
//! pages ──▶ relocate ──▶ render ──▶ invoke
//! (count)   (move PDF)   (strategy)  (subprocess)
//! ```
//!
//! 1. [`pages`]: read the page count with lopdf on the blocking pool
//! 2. [`relocate`]: move the PDF into `<root>/<stem>/`, or report a skip
//!    when that directory already holds rendered pages
//! 3. [`render`]: choose the light (per-page) or robust (whole-document)
//!    strategy and build the converter commands
//! 4. [`invoke`]: argument-list builder, the `CommandRunner` seam, and
//!    converter detection

pub mod invoke;
pub mod pages;
pub mod relocate;
pub mod render;
