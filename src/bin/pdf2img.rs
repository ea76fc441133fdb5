//! CLI binary for bulk-pdf2img.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`,
//! checks the environment, and reports progress.

use anyhow::{Context, Result};
use bulk_pdf2img::{
    convert_directory, ensure_converter, paths, BulkProgressCallback, BulkSummary,
    ConversionStrategy, Pdf2ImgError, ProcessRunner, ProgressCallback, RunConfig, SkipReason,
    DEFAULT_CONVERTER,
};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const THIN_DIVIDER: &str = "----------------------------------------";

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the PDFs, with a log line per
/// finished or skipped PDF printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} PDFs  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl BulkProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_pdfs: usize) {
        self.bar.set_length(total_pdfs as u64);
        self.bar.reset_eta();
    }

    fn on_pdf_start(&self, index: usize, total_pdfs: usize, pdf: &Path) {
        self.bar.set_prefix(format!("PDF {index}/{total_pdfs}"));
        self.bar.set_message(file_name(pdf));
    }

    fn on_strategy(&self, pdf: &Path, page_count: usize, strategy: ConversionStrategy) {
        self.bar
            .set_message(format!("{}  {page_count} pages, {strategy}", file_name(pdf)));
    }

    fn on_page_start(&self, page: usize, page_count: usize) {
        self.bar
            .set_message(format!("page {}/{page_count}", page + 1));
    }

    fn on_pdf_skipped(&self, index: usize, total_pdfs: usize, pdf: &Path, reason: &SkipReason) {
        self.bar.println(format!(
            "  {} PDF {:>3}/{:<3}  {}  {}",
            yellow("⏭"),
            index,
            total_pdfs,
            file_name(pdf),
            dim(&reason.to_string()),
        ));
        self.bar.inc(1);
    }

    fn on_pdf_complete(&self, index: usize, total_pdfs: usize, pdf: &Path, page_count: usize) {
        self.bar.println(format!(
            "  {} PDF {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total_pdfs,
            file_name(pdf),
            dim(&format!("{page_count} pages")),
        ));
        self.bar.inc(1);
    }

    fn on_pdf_error(&self, index: usize, total_pdfs: usize, pdf: &Path, error: &str) {
        self.bar.println(format!(
            "  {} PDF {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total_pdfs,
            file_name(pdf),
            red(error),
        ));
        self.bar.abandon();
    }

    fn on_run_complete(&self, summary: &BulkSummary) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} converted, {} skipped",
            green("✔"),
            bold(&summary.converted.len().to_string()),
            summary.skipped.len(),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every PDF in ./inbox to WebP pages under ./<pdf name>/
  pdf2img inbox

  # See what would happen without touching anything
  pdf2img -d -v inbox

  # PNG at 150 DPI, only the first 5 PDFs
  pdf2img -ext png -dpi 150 -limit 5 inbox

  # Redo PDFs whose output directory already has pages
  pdf2img -overwrite inbox

  # Hand large PDFs (15+ pages) to ImageMagick in one go
  pdf2img -not-optimize -memory-limit 4G -disk-limit 20G inbox

LAYOUT:
  A/B/report.pdf  →  A/report/report.pdf
                     A/report/report-0.webp, A/report/report-1.webp, …

  Only the top level of the source directory is scanned. A PDF whose output
  directory already holds images with the chosen extension is skipped unless
  -overwrite is given.

FLAGS:
  Long flags accept one or two dashes: -dpi 150, --dpi 150, -dpi=150.

ENVIRONMENT VARIABLES:
  PDF2IMG_MAGICK   ImageMagick executable (default: magick)
  RUST_LOG         Override the log filter (e.g. debug)

SETUP:
  ImageMagick 7 (`magick`) with Ghostscript must be on PATH.
"#;

/// Bulk-convert PDFs in a directory to page images using ImageMagick.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Bulk Convert PDFs to Images",
    long_about = "Reads all PDFs in a directory 'A/B', moves each one to a new directory \
'A/<PDF_name>' and converts every page of the PDF to an image stored in 'A/<PDF_name>/'.",
    disable_help_flag = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the PDFs (top level only).
    source: Option<PathBuf>,

    /// Log operations without executing them.
    #[arg(short = 'd', long = "dry-run", env = "PDF2IMG_DRY_RUN")]
    dry_run: bool,

    /// Delete existing page images in a PDF's directory and reprocess it.
    #[arg(long, env = "PDF2IMG_OVERWRITE")]
    overwrite: bool,

    /// Image DPI. 150 is low quality, 300 default, 600 high quality.
    #[arg(long, env = "PDF2IMG_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Enable anti-aliasing.
    #[arg(long = "aa", env = "PDF2IMG_ANTIALIAS")]
    antialias: bool,

    /// Base name for the images. Defaults to the PDF name.
    #[arg(long = "custom-name", env = "PDF2IMG_CUSTOM_NAME", default_value = "")]
    custom_name: String,

    /// Image extension.
    #[arg(long, env = "PDF2IMG_EXT", default_value = "webp")]
    ext: String,

    /// Print this help message.
    #[arg(short = 'h', long)]
    help: bool,

    /// Verbose output; also passes -verbose to ImageMagick.
    #[arg(short = 'v', long, env = "PDF2IMG_VERBOSE")]
    verbose: bool,

    /// Max number of PDFs to process (-1 = all).
    #[arg(long, env = "PDF2IMG_LIMIT", default_value_t = -1, allow_negative_numbers = true)]
    limit: i64,

    /// ImageMagick memory limit.
    #[arg(long = "memory-limit", env = "PDF2IMG_MEMORY_LIMIT", default_value = "2G")]
    memory_limit: String,

    /// ImageMagick virtual memory (map) limit.
    #[arg(long = "vm-limit", env = "PDF2IMG_VM_LIMIT", default_value = "1G")]
    vm_limit: String,

    /// ImageMagick disk limit.
    #[arg(long = "disk-limit", env = "PDF2IMG_DISK_LIMIT", default_value = "5G")]
    disk_limit: String,

    /// Convert PDFs with 15+ pages in a single ImageMagick call. Faster, but
    /// memory usage can be enormous.
    #[arg(long = "not-optimize", env = "PDF2IMG_NOT_OPTIMIZE")]
    not_optimize: bool,

    /// ImageMagick executable.
    #[arg(long = "magick", env = "PDF2IMG_MAGICK", default_value = DEFAULT_CONVERTER)]
    magick: String,

    /// Disable the progress bar.
    #[arg(long = "no-progress", env = "PDF2IMG_NO_PROGRESS")]
    no_progress: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

/// Long flags that may be written with a single dash.
const LONG_FLAGS: &[&str] = &[
    "dry-run",
    "overwrite",
    "dpi",
    "aa",
    "custom-name",
    "ext",
    "help",
    "verbose",
    "limit",
    "memory-limit",
    "vm-limit",
    "disk-limit",
    "not-optimize",
    "magick",
    "no-progress",
    "json",
    "version",
];

/// Long flags whose value may be the next argument.
const VALUE_FLAGS: &[&str] = &[
    "dpi",
    "custom-name",
    "ext",
    "limit",
    "memory-limit",
    "vm-limit",
    "disk-limit",
    "magick",
];

/// Rewrite `-flag` / `-flag=value` to `--flag` / `--flag=value` for known long
/// flags, leaving values and positionals alone.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut expecting_value = false;
    let mut after_separator = false;

    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 || after_separator || expecting_value {
            expecting_value = false;
            out.push(arg);
            continue;
        }

        let Some(s) = arg.to_str() else {
            out.push(arg);
            continue;
        };

        if s == "--" {
            after_separator = true;
            out.push(arg);
            continue;
        }

        let (dashes, body) = if let Some(rest) = s.strip_prefix("--") {
            ("--", rest)
        } else if let Some(rest) = s.strip_prefix('-') {
            ("-", rest)
        } else {
            out.push(arg);
            continue;
        };

        let (name, has_inline_value) = match body.split_once('=') {
            Some((name, _)) => (name, true),
            None => (body, false),
        };

        if !LONG_FLAGS.contains(&name) {
            out.push(arg);
            continue;
        }

        expecting_value = !has_inline_value && VALUE_FLAGS.contains(&name);
        if dashes == "-" {
            out.push(OsString::from(format!("-{s}")));
        } else {
            out.push(arg);
        }
    }

    out
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.print().context("Failed to print help")?;
                return Ok(());
            }
            // Configuration errors exit with 1, not clap's default 2.
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if cli.help {
        Cli::command()
            .print_long_help()
            .context("Failed to print help")?;
        return Ok(());
    }

    // ── Logging setup ────────────────────────────────────────────────────
    // The bar already reports per-PDF progress; keep INFO logs out of its way.
    // Without the bar, the INFO logs are the progress report.
    let filter = if cli.verbose {
        "debug"
    } else if shows_progress_bar(&cli) {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error on boot: {e}");
            eprintln!("{}", Cli::command().render_usage());
            std::process::exit(1);
        }
    };

    if !paths::is_directory(&config.source_dir) {
        anyhow::bail!(Pdf2ImgError::SourceNotDirectory {
            path: config.source_dir.clone(),
        });
    }

    // ── Environment check ────────────────────────────────────────────────
    let runner = ProcessRunner;
    ensure_converter(&runner, &config).await?;

    // ── Run conversion ───────────────────────────────────────────────────
    let summary = convert_directory(&runner, &config)
        .await
        .context("Error while running bulk conversion")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    } else {
        println!("{THIN_DIVIDER}\nDone");
    }

    Ok(())
}

/// The indicatif bar is only drawn for plain runs; `-no-progress`, `-json`,
/// dry runs and verbose runs report through the log instead.
fn shows_progress_bar(cli: &Cli) -> bool {
    !cli.no_progress && !cli.json && !cli.dry_run && !cli.verbose
}

/// Map CLI args to `RunConfig`.
fn build_config(cli: &Cli) -> Result<RunConfig, Pdf2ImgError> {
    let source = cli.source.clone().ok_or(Pdf2ImgError::MissingSource)?;

    let builder = RunConfig::builder(source)
        .dry_run(cli.dry_run)
        .overwrite(cli.overwrite)
        .dpi(cli.dpi)
        .antialias(cli.antialias)
        .custom_name(cli.custom_name.clone())
        .image_ext(cli.ext.clone())
        .verbose(cli.verbose)
        .signed_limit(cli.limit)
        .memory_limit(cli.memory_limit.clone())
        .vm_limit(cli.vm_limit.clone())
        .disk_limit(cli.disk_limit.clone())
        .optimize(!cli.not_optimize)
        .converter(cli.magick.clone());

    if shows_progress_bar(cli) {
        builder
            .progress_callback(CliProgressCallback::new() as ProgressCallback)
            .build()
    } else {
        builder.build()
    }
}
