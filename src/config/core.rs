//! Core Configuration struct and implementations.

use super::{
    Backend, BundlerSettings, LinuxPackageSettings, NativeSettings, TargetPlatform,
};
use crate::error::ConfigurationError;
use std::path::{Path, PathBuf};

/// Every decision made during one generator run.
///
/// Built once through [`ConfigurationBuilder`](super::ConfigurationBuilder) and
/// read-only afterwards. Every field carries an explicit default, so nothing
/// downstream has to guess whether a value was provided.
///
/// # Examples
///
/// ```no_run
/// use pyforge::config::{Backend, ConfigurationBuilder};
///
/// let config = ConfigurationBuilder::new()
///     .project_dir("/work/app")
///     .entry_file("/work/app/main.py")
///     .backend(Backend::PyInstaller)
///     .build();
/// assert_eq!(config.backend(), Backend::PyInstaller);
/// ```
#[derive(Clone, Debug)]
pub struct Configuration {
    project_dir: PathBuf,
    /// Absolute path once validated.
    entry_file: Option<PathBuf>,
    /// Relative to `project_dir` when possible.
    icon_file: Option<PathBuf>,
    backend: Backend,
    native: NativeSettings,
    bundler: BundlerSettings,
    output_dir: String,
    app_name: String,
    show_console: bool,
    company_name: String,
    version: String,
    quiet: bool,
    uac_admin: bool,
    copy_dirs: Vec<String>,
    exclude_packages: Vec<String>,
    script_filename: String,
    platform: TargetPlatform,
    linux: LinuxPackageSettings,
}

impl Configuration {
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn entry_file(&self) -> Option<&Path> {
        self.entry_file.as_deref()
    }

    /// Entry file relative to the project root, as emitted into arguments.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::MissingEntryFile`] when no entry file was set, and
    /// [`ConfigurationError::EntryOutsideProject`] when an absolute entry path
    /// does not live under the project root.
    pub fn entry_relative(&self) -> Result<PathBuf, ConfigurationError> {
        let entry = self
            .entry_file
            .as_deref()
            .ok_or(ConfigurationError::MissingEntryFile)?;

        if entry.is_relative() {
            return Ok(entry.to_path_buf());
        }

        entry
            .strip_prefix(&self.project_dir)
            .map(Path::to_path_buf)
            .map_err(|_| ConfigurationError::EntryOutsideProject {
                entry: entry.to_path_buf(),
                project: self.project_dir.clone(),
            })
    }

    /// File name of the entry script, e.g. `main.py`.
    pub fn entry_name(&self) -> String {
        self.entry_file
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn icon_file(&self) -> Option<&Path> {
        self.icon_file.as_deref()
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn native(&self) -> &NativeSettings {
        &self.native
    }

    pub fn bundler(&self) -> &BundlerSettings {
        &self.bundler
    }

    /// Build output directory, relative to where the script runs.
    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    /// Executable name, never carrying the `.py` suffix.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn show_console(&self) -> bool {
        self.show_console
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Always false on platforms without a UAC manifest.
    pub fn uac_admin(&self) -> bool {
        self.uac_admin
    }

    pub fn copy_dirs(&self) -> &[String] {
        &self.copy_dirs
    }

    pub fn exclude_packages(&self) -> &[String] {
        &self.exclude_packages
    }

    /// Name of the generated script, always ending in `.py`.
    pub fn script_filename(&self) -> &str {
        &self.script_filename
    }

    pub fn platform(&self) -> TargetPlatform {
        self.platform
    }

    pub fn linux(&self) -> &LinuxPackageSettings {
        &self.linux
    }

    /// Whether Linux package generation is part of this run.
    pub fn packaging_enabled(&self) -> bool {
        self.linux.enabled
    }

    /// Copy of this configuration with package generation switched off.
    ///
    /// Compile-only mode renders the script from this copy so the collected
    /// packaging answers stay untouched.
    pub fn without_packaging(&self) -> Configuration {
        let mut copy = self.clone();
        copy.linux.enabled = false;
        copy
    }

    /// Application name to fall back on when the user gives none.
    pub fn default_app_name(entry: &Path) -> String {
        entry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Maintainer string for packages.
    pub fn maintainer(&self) -> String {
        if !self.linux.maintainer.trim().is_empty() {
            return self.linux.maintainer.trim().to_string();
        }
        let who = if self.company_name.trim().is_empty() {
            "Unknown"
        } else {
            self.company_name.trim()
        };
        format!("{who} <unknown@example.com>")
    }

    /// Package description, defaulting to `<app> application`.
    pub fn package_description(&self) -> String {
        if self.linux.description.trim().is_empty() {
            format!("{} application", self.app_name)
        } else {
            self.linux.description.trim().to_string()
        }
    }

    /// Work directory PyInstaller uses for intermediate files.
    pub fn work_dir(&self) -> String {
        format!("{}_temp", self.output_dir)
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        project_dir: PathBuf,
        entry_file: Option<PathBuf>,
        icon_file: Option<PathBuf>,
        backend: Backend,
        native: NativeSettings,
        bundler: BundlerSettings,
        output_dir: String,
        app_name: String,
        show_console: bool,
        company_name: String,
        version: String,
        quiet: bool,
        uac_admin: bool,
        copy_dirs: Vec<String>,
        exclude_packages: Vec<String>,
        script_filename: String,
        platform: TargetPlatform,
        linux: LinuxPackageSettings,
    ) -> Self {
        Self {
            project_dir,
            entry_file,
            icon_file,
            backend,
            native,
            bundler,
            output_dir,
            app_name,
            show_console,
            company_name,
            version,
            quiet,
            uac_admin,
            copy_dirs,
            exclude_packages,
            script_filename,
            platform,
            linux,
        }
    }
}
