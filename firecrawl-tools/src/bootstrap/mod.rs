//! Client bootstrap.
//!
//! Obtains a ready client for a tool. When the client library is unavailable
//! the user is asked whether to install it; declining never runs the
//! installer.

mod confirm;
mod install;
mod loader;

pub use confirm::{AlwaysConfirm, Confirm, ConsolePrompt, NeverConfirm};
pub use install::{CommandInstaller, Installer};
pub use loader::{ClientLoader, HttpClientLoader};

#[cfg(test)]
pub(crate) use confirm::MockConfirm;
#[cfg(test)]
pub(crate) use install::MockInstaller;
#[cfg(test)]
pub(crate) use loader::MockClientLoader;

use tracing::{debug, info, warn};

use crate::client::{ClientHandle, Credentials};
use crate::errors::BootstrapError;

/// Name of the client package offered for installation.
pub const CLIENT_PACKAGE: &str = "firecrawl-tools";

/// Produces a ready client, offering to install the library when missing.
pub struct Bootstrapper {
    package: String,
    loader: Box<dyn ClientLoader>,
    confirm: Box<dyn Confirm>,
    installer: Box<dyn Installer>,
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new(HttpClientLoader::from_env())
    }
}

impl Bootstrapper {
    /// Creates a bootstrapper that asks on the console and installs with cargo.
    #[must_use]
    pub fn new(loader: impl ClientLoader + 'static) -> Self {
        Self {
            package: CLIENT_PACKAGE.to_string(),
            loader: Box::new(loader),
            confirm: Box::new(ConsolePrompt),
            installer: Box::new(CommandInstaller::default()),
        }
    }

    /// Replaces the confirmation prompt.
    #[must_use]
    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    /// Replaces the installer.
    #[must_use]
    pub fn with_installer(mut self, installer: impl Installer + 'static) -> Self {
        self.installer = Box::new(installer);
        self
    }

    /// Sets the package name used in prompts and errors.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// The package name used in prompts and errors.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Returns a ready client.
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::MissingDependency`] when the library is missing and
    ///   the user declines.
    /// - [`BootstrapError::DependencyInstall`] when the install command fails.
    /// - [`BootstrapError::RebuildRequired`] when the install succeeded but the
    ///   running build still has no client.
    /// - [`BootstrapError::Client`] when the client cannot be constructed.
    pub fn ensure_client(&self, credentials: &Credentials) -> Result<ClientHandle, BootstrapError> {
        if self.loader.is_available() {
            debug!(package = %self.package, "Client library available");
            return Ok(self.loader.load(credentials)?);
        }

        let command = self.installer.describe();
        info!(package = %self.package, "Client library not found");

        let question = format!(
            "You are missing the '{}' package. Would you like to install it?",
            self.package
        );
        if !self.confirm.confirm(&question) {
            return Err(BootstrapError::missing_dependency(&self.package, command));
        }

        info!(package = %self.package, command = %command, "Installing client library");
        self.installer
            .install()
            .map_err(|source| BootstrapError::dependency_install(&self.package, &command, source))?;

        // Compiled-in clients only appear after a rebuild.
        if !self.loader.is_available() {
            warn!(package = %self.package, "Client library still unavailable after install");
            return Err(BootstrapError::rebuild_required(&self.package, command));
        }

        Ok(self.loader.load(credentials)?)
    }
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("package", &self.package)
            .field("installer", &self.installer.describe())
            .finish_non_exhaustive()
    }
}
