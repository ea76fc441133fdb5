//! Subprocess plumbing for the external image converter.
//!
//! Commands are built as argument lists ([`Invocation`]), never as shell
//! strings, so paths containing spaces or brackets reach the converter
//! intact. Execution goes through the [`CommandRunner`] trait: the binary
//! uses [`ProcessRunner`], tests substitute a recorder.

use crate::config::RunConfig;
use crate::error::Pdf2ImgError;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::future::Future;
use std::process::Stdio;
use tracing::debug;

/// One external-process invocation: program, arguments, stdio policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    inherit_stdio: bool,
}

impl Invocation {
    /// A new invocation whose stdout/stderr pass through to ours.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            inherit_stdio: true,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Discard the child's output instead of inheriting it.
    pub fn quiet(mut self) -> Self {
        self.inherit_stdio = false;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn inherits_stdio(&self) -> bool {
        self.inherit_stdio
    }

    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Build the tokio command. Stdin is always closed.
    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        if self.inherit_stdio {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        cmd
    }
}

/// Shell-style rendering for logs only; single-quotes words that need it.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &OsStr) -> String {
    let s = word.to_string_lossy();
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=%+,@".contains(c));
    if plain {
        s.into_owned()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Runs an [`Invocation`] to completion.
pub trait CommandRunner {
    /// Resolves to `Ok(())` only when the process started and exited
    /// successfully. Blocks the caller (by awaiting) until the child exits;
    /// there is no timeout.
    fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<(), Pdf2ImgError>> + Send;
}

/// Spawns real processes with [`tokio::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), Pdf2ImgError> {
        let program = invocation.program_name();
        let status = invocation
            .to_command()
            .status()
            .await
            .map_err(|source| Pdf2ImgError::SpawnFailed {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Pdf2ImgError::ConverterFailed {
                program,
                status: status.to_string(),
            })
        }
    }
}

/// `<program> convert -density <dpi> -limit memory <m> -limit map <v>
/// -limit disk <d> [-verbose] [-antialias]`, without input and output.
pub fn converter_base(config: &RunConfig) -> Invocation {
    let mut inv = Invocation::new(&config.converter)
        .arg("convert")
        .arg("-density")
        .arg(config.dpi.to_string())
        .args(["-limit", "memory"])
        .arg(&config.memory_limit)
        .args(["-limit", "map"])
        .arg(&config.vm_limit)
        .args(["-limit", "disk"])
        .arg(&config.disk_limit);

    if config.verbose {
        inv = inv.arg("-verbose");
    }
    if config.antialias {
        inv = inv.arg("-antialias");
    }
    inv
}

/// The version-query probe used to detect the converter.
pub fn version_query(program: &str) -> Invocation {
    Invocation::new(program).arg("--version").quiet()
}

/// True iff `<program> --version` starts and exits successfully.
pub async fn detect_converter<R: CommandRunner>(runner: &R, program: &str) -> bool {
    let probe = version_query(program);
    match runner.run(&probe).await {
        Ok(()) => true,
        Err(e) => {
            debug!("Converter probe failed: {}", e);
            false
        }
    }
}
