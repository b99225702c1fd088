//! Builder for constructing Configuration.

use super::{
    Backend, BundlerSettings, Configuration, LinuxPackageSettings, NativeSettings,
    PackageFormat, TargetPlatform, DEFAULT_JOBS,
};
use crate::validate;
use std::path::{Path, PathBuf};

/// Default generated script name.
pub const DEFAULT_SCRIPT_NAME: &str = "build.py";

/// Default script name in package-only mode.
pub const DEFAULT_PACKAGE_SCRIPT_NAME: &str = "create_packages.py";

/// Builder for constructing [`Configuration`].
///
/// Setters take already-validated values (see [`crate::validate`]). `build`
/// applies the model invariants: the format list is never empty, the
/// application name never ends in `.py`, the script name always does, the job
/// count is positive, and the admin request is dropped on platforms that have
/// no such concept.
///
/// # Examples
///
/// ```no_run
/// use pyforge::config::{ConfigurationBuilder, NativeSettings, TargetPlatform};
///
/// let config = ConfigurationBuilder::new()
///     .project_dir("/work/app")
///     .entry_file("/work/app/main.py")
///     .native(NativeSettings { onefile: true, jobs: 8, ..Default::default() })
///     .platform(TargetPlatform::Linux)
///     .build();
/// assert_eq!(config.native().jobs, 8);
/// ```
pub struct ConfigurationBuilder {
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
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            entry_file: None,
            icon_file: None,
            backend: Backend::default(),
            native: NativeSettings::default(),
            bundler: BundlerSettings::default(),
            output_dir: "build".to_string(),
            app_name: String::new(),
            show_console: false,
            company_name: String::new(),
            version: "1.0.0".to_string(),
            quiet: false,
            uac_admin: false,
            copy_dirs: Vec::new(),
            exclude_packages: Vec::new(),
            script_filename: DEFAULT_SCRIPT_NAME.to_string(),
            platform: TargetPlatform::host(),
            linux: LinuxPackageSettings::default(),
        }
    }
}

impl ConfigurationBuilder {
    /// Creates a new builder with every default in place.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root.
    ///
    /// Default: `.`
    pub fn project_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_dir = path.as_ref().to_path_buf();
        self
    }

    /// Sets the entry file (absolute, or relative to the project root).
    pub fn entry_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.entry_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the icon, stored as given (normally relative to the project root).
    pub fn icon_file<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        self.icon_file = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn native(mut self, settings: NativeSettings) -> Self {
        self.native = settings;
        self
    }

    pub fn bundler(mut self, settings: BundlerSettings) -> Self {
        self.bundler = settings;
        self
    }

    /// Default: `build`
    pub fn output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    pub fn show_console(mut self, show: bool) -> Self {
        self.show_console = show;
        self
    }

    pub fn company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = name.into();
        self
    }

    /// Default: `1.0.0`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn uac_admin(mut self, admin: bool) -> Self {
        self.uac_admin = admin;
        self
    }

    pub fn copy_dirs(mut self, dirs: Vec<String>) -> Self {
        self.copy_dirs = dirs;
        self
    }

    pub fn exclude_packages(mut self, packages: Vec<String>) -> Self {
        self.exclude_packages = packages;
        self
    }

    /// Default: `build.py`
    pub fn script_filename(mut self, name: impl Into<String>) -> Self {
        self.script_filename = name.into();
        self
    }

    /// Default: the host platform
    pub fn platform(mut self, platform: TargetPlatform) -> Self {
        self.platform = platform;
        self
    }

    pub fn linux(mut self, settings: LinuxPackageSettings) -> Self {
        self.linux = settings;
        self
    }

    /// Builds the configuration, applying the model invariants.
    pub fn build(self) -> Configuration {
        let mut native = self.native;
        if native.jobs == 0 {
            native.jobs = DEFAULT_JOBS;
        }
        if !native.standalone {
            native.onefile = false;
        }

        let app_name = strip_source_suffix(self.app_name.trim());

        let mut linux = self.linux;
        if linux.formats.is_empty() {
            linux.formats.push(PackageFormat::Deb);
        }
        let mut formats = Vec::with_capacity(linux.formats.len());
        for format in linux.formats.drain(..) {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        linux.formats = formats;

        let uac_admin = self.uac_admin && self.platform.supports_admin_request();

        Configuration::new(
            self.project_dir,
            self.entry_file,
            self.icon_file,
            self.backend,
            native,
            self.bundler,
            self.output_dir.trim().to_string(),
            app_name,
            self.show_console,
            self.company_name.trim().to_string(),
            self.version.trim().to_string(),
            self.quiet,
            uac_admin,
            self.copy_dirs,
            self.exclude_packages,
            validate::script_filename(&self.script_filename),
            self.platform,
            linux,
        )
    }
}

fn strip_source_suffix(name: &str) -> String {
    name.strip_suffix(validate::SOURCE_EXTENSION)
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_formats_are_kept_once_in_order() {
        let config = ConfigurationBuilder::new()
            .linux(LinuxPackageSettings {
                formats: vec![PackageFormat::Rpm, PackageFormat::Deb, PackageFormat::Rpm],
                ..Default::default()
            })
            .build();
        assert_eq!(
            config.linux().formats,
            vec![PackageFormat::Rpm, PackageFormat::Deb]
        );
    }

    #[test]
    fn build_enforces_model_invariants() {
        let config = ConfigurationBuilder::new()
            .app_name("tool.py")
            .script_filename("make")
            .native(NativeSettings {
                standalone: false,
                onefile: true,
                jobs: 0,
                ..Default::default()
            })
            .linux(LinuxPackageSettings {
                formats: Vec::new(),
                ..Default::default()
            })
            .platform(TargetPlatform::Linux)
            .uac_admin(true)
            .build();

        assert_eq!(config.app_name(), "tool");
        assert_eq!(config.script_filename(), "make.py");
        assert!(!config.native().onefile);
        assert_eq!(config.native().jobs, DEFAULT_JOBS);
        assert_eq!(config.linux().formats, vec![PackageFormat::Deb]);
        assert!(!config.uac_admin());
    }

    #[test]
    fn admin_request_survives_on_windows() {
        let config = ConfigurationBuilder::new()
            .platform(TargetPlatform::Windows)
            .uac_admin(true)
            .build();
        assert!(config.uac_admin());
    }

    #[test]
    fn entry_is_made_relative_to_project() {
        let config = ConfigurationBuilder::new()
            .project_dir("/work/app")
            .entry_file("/work/app/src/main.py")
            .build();
        assert_eq!(
            config.entry_relative().unwrap(),
            PathBuf::from("src").join("main.py")
        );
        assert_eq!(config.entry_name(), "main.py");
    }

    #[test]
    fn missing_entry_is_a_configuration_error() {
        let config = ConfigurationBuilder::new().build();
        assert_eq!(
            config.entry_relative(),
            Err(crate::error::ConfigurationError::MissingEntryFile)
        );
    }

    #[test]
    fn without_packaging_leaves_original_untouched() {
        let config = ConfigurationBuilder::new()
            .linux(LinuxPackageSettings {
                enabled: true,
                ..Default::default()
            })
            .build();
        assert!(!config.without_packaging().packaging_enabled());
        assert!(config.packaging_enabled());
    }
}
