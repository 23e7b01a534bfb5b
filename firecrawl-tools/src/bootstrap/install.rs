//! Dependency installation.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::errors::InstallError;

/// Installs the client library.
#[cfg_attr(test, mockall::automock)]
pub trait Installer: Send + Sync {
    /// A human readable form of the install command.
    fn describe(&self) -> String;

    /// Runs the install.
    fn install(&self) -> Result<(), InstallError>;
}

/// Runs an external command to install the client library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
}

impl Default for CommandInstaller {
    fn default() -> Self {
        Self::new(
            "cargo",
            ["add", "firecrawl-tools", "--features", "http-client"],
        )
    }
}

impl CommandInstaller {
    /// Creates an installer running `program` with `args`.
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Installer for CommandInstaller {
    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn install(&self) -> Result<(), InstallError> {
        debug!(command = %self.describe(), "Running install command");

        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| InstallError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::ExitStatus {
                status: status.to_string(),
            })
        }
    }
}
