//! Packaging values resolved from a configuration.

use super::invocation::{PackageCommand, fpm_command, nfpm_command};
use super::manifest::{ContentEntry, Manifest, desktop_entry, service_unit};
use super::naming::normalize_package_name;
use crate::config::{Arch, Configuration, DefaultDependencies, PackageFormat, PackagingTool};
use crate::error::{ConfigurationError, Result};
use std::path::{Path, PathBuf};

/// Homepage written into manifests when none is configured.
pub const DEFAULT_HOMEPAGE: &str = "https://example.com";

const EXECUTABLE_MODE: &str = "0755";
const CONFIG_MODE: &str = "0644";

/// Everything needed to describe and build the packages for one application.
///
/// Derived once from a [`Configuration`]; the name is already normalized and
/// every fallback (maintainer, description, dependencies) already applied.
#[derive(Clone, Debug)]
pub struct PackagePlan {
    pub name: String,
    pub version: String,
    pub arch: Arch,
    pub description: String,
    pub maintainer: String,
    /// User-supplied project URL, if any.
    pub homepage: Option<String>,
    pub license: String,
    pub install_path: String,
    pub output_dir: PathBuf,
    pub tool: PackagingTool,
    pub formats: Vec<PackageFormat>,
    pub depends: Vec<String>,
    pub default_depends: DefaultDependencies,
    /// Display name for the desktop entry; `None` means no entry.
    pub desktop_name: Option<String>,
    /// systemd unit name; `None` means no unit.
    pub service_name: Option<String>,
}

impl PackagePlan {
    /// Resolves the plan from the packaging half of `config`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::MissingAppName`] when the application name is empty.
    pub fn from_config(config: &Configuration) -> Result<Self> {
        if config.app_name().trim().is_empty() {
            return Err(ConfigurationError::MissingAppName.into());
        }

        let linux = config.linux();
        let name = normalize_package_name(config.app_name());
        let install_path = {
            let trimmed = linux.install_path.trim().trim_end_matches('/');
            if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() }
        };
        let service_name = linux.create_service.then(|| {
            let svc = linux.service_name.trim();
            if svc.is_empty() { name.clone() } else { svc.to_string() }
        });
        let desktop_name = Some(linux.desktop_name.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let homepage = Some(linux.homepage.trim())
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        let mut formats = linux.formats.clone();
        if formats.is_empty() {
            formats.push(PackageFormat::Deb);
        }

        Ok(Self {
            version: config.version().to_string(),
            arch: linux.arch,
            description: config.package_description(),
            maintainer: config.maintainer(),
            homepage,
            license: linux.license.trim().to_string(),
            install_path,
            output_dir: linux.output_dir.clone(),
            tool: linux.tool,
            formats,
            depends: linux.depends.clone(),
            default_depends: linux.default_depends.clone(),
            desktop_name,
            service_name,
            name,
        })
    }

    /// Maintainer without the `<email>` part.
    pub fn vendor(&self) -> String {
        match self.maintainer.split_once('<') {
            Some((who, _)) => who.trim().to_string(),
            None => self.maintainer.trim().to_string(),
        }
    }

    /// Where the executable lands on the target system.
    pub fn installed_executable(&self) -> String {
        if self.install_path == "/" {
            format!("/{}", self.name)
        } else {
            format!("{}/{}", self.install_path, self.name)
        }
    }

    /// Dependencies for one format, falling back to the configured defaults.
    pub fn depends_for(&self, format: PackageFormat) -> Vec<String> {
        if self.depends.is_empty() {
            self.default_depends.for_format(format).to_vec()
        } else {
            self.depends.clone()
        }
    }

    /// Deterministic artifact file name for `format`.
    pub fn artifact_name(&self, format: PackageFormat) -> String {
        format.file_name(&self.name, &self.version, self.arch)
    }

    pub fn artifact_path(&self, format: PackageFormat) -> PathBuf {
        self.output_dir.join(self.artifact_name(format))
    }

    /// Temporary nfpm configuration written next to the packages.
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(format!(".{}-nfpm.yaml", self.name))
    }

    /// Builds the package manifest for an executable at `executable`.
    ///
    /// `executable` is taken verbatim (backslashes turned into slashes) so a
    /// placeholder can stand in for a path only known later.
    pub fn manifest(&self, executable: &str) -> Manifest {
        let mut contents = vec![ContentEntry {
            src: Some(executable.replace('\\', "/")),
            dst: self.installed_executable(),
            config: false,
            mode: EXECUTABLE_MODE,
            content: None,
        }];

        if let Some(display) = &self.desktop_name {
            contents.push(ContentEntry {
                src: None,
                dst: format!("/usr/share/applications/{}.desktop", self.name),
                config: true,
                mode: CONFIG_MODE,
                content: Some(desktop_entry(display, &self.installed_executable(), &self.name)),
            });
        }

        if let Some(service) = &self.service_name {
            contents.push(ContentEntry {
                src: None,
                dst: format!("/etc/systemd/system/{service}.service"),
                config: true,
                mode: CONFIG_MODE,
                content: Some(service_unit(&self.description, &self.installed_executable())),
            });
        }

        Manifest {
            name: self.name.clone(),
            arch: self.arch,
            version: self.version.clone(),
            maintainer: self.maintainer.clone(),
            vendor: self.vendor(),
            description: self.description.clone(),
            homepage: self
                .homepage
                .clone()
                .unwrap_or_else(|| DEFAULT_HOMEPAGE.to_string()),
            license: self.license.clone(),
            contents,
            overrides: PackageFormat::ALL
                .into_iter()
                .map(|f| (f, self.depends_for(f)))
                .collect(),
        }
    }

    /// Packaging command for `format`.
    ///
    /// `program` is the packaging tool to run (a bare name or a located path);
    /// `manifest_file` is only used by nfpm.
    pub fn command(
        &self,
        program: &str,
        format: PackageFormat,
        executable: &str,
        manifest_file: &str,
    ) -> PackageCommand {
        let target = path_string(&self.artifact_path(format));
        match self.tool {
            PackagingTool::Nfpm => nfpm_command(program, format, manifest_file, &target),
            PackagingTool::Fpm => fpm_command(self, program, format, executable, &target),
        }
    }
}

/// Path rendered with forward slashes, as packaging tools expect.
pub(crate) fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
