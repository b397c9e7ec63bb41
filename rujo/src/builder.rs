use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to write the generated C code: {0}")]
    Io(#[from] io::Error),
    #[error("C compiler `{0}` not found (set RUJO_CC or CC)")]
    ToolchainNotFound(String),
    #[error("native build failed ({status})")]
    Failed { status: ExitStatus },
}

/// Turns generated C code into an executable.
pub trait NativeBuilder {
    /// Builds `c_source` into `output`. `stem` names the intermediate artifacts.
    fn build(&self, c_source: &str, stem: &str, output: &Path) -> Result<(), BuildError>;
}

/// Builds with an external C compiler.
///
/// The C code is written to a uniquely named `<stem>*.c` file which is removed once the compiler
/// exits, whether the build succeeded or not.
#[derive(Debug, Clone)]
pub struct CcBuilder {
    config: Config,
    temp_dir: PathBuf,
}

impl CcBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            temp_dir: env::temp_dir(),
        }
    }

    /// Places intermediate files in `temp_dir` instead of the system temporary directory.
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }
}

impl NativeBuilder for CcBuilder {
    fn build(&self, c_source: &str, stem: &str, output: &Path) -> Result<(), BuildError> {
        let mut file = tempfile::Builder::new()
            .prefix(stem)
            .suffix(".c")
            .tempfile_in(&self.temp_dir)?;
        file.write_all(c_source.as_bytes())?;
        file.flush()?;
        log::debug!("wrote C code to `{}`", file.path().display());

        let status = Command::new(&self.config.cc)
            .args(&self.config.cflags)
            .arg(file.path())
            .arg("-o")
            .arg(output)
            .status()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => BuildError::ToolchainNotFound(self.config.cc.clone()),
                _ => BuildError::Io(err),
            });
        // `file` is dropped, and deleted, on every path out of here.
        let status = status?;
        if !status.success() {
            return Err(BuildError::Failed { status });
        }

        file.close()?;
        log::debug!("built `{}`", output.display());
        Ok(())
    }
}
