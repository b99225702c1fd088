//! Linux package generation settings.

use super::Arch;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Tool that turns a built executable into .deb/.rpm packages.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum PackagingTool {
    /// nfpm (Go, single binary, config-file driven)
    #[default]
    Nfpm,
    /// fpm (Ruby, command-line driven)
    Fpm,
}

impl PackagingTool {
    pub fn command(self) -> &'static str {
        match self {
            PackagingTool::Nfpm => "nfpm",
            PackagingTool::Fpm => "fpm",
        }
    }

    /// Argument used to probe whether the tool works.
    pub fn version_arg(self) -> &'static str {
        match self {
            PackagingTool::Nfpm => "version",
            PackagingTool::Fpm => "--version",
        }
    }
}

impl fmt::Display for PackagingTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Distribution package format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum PackageFormat {
    /// Debian/Ubuntu
    Deb,
    /// Fedora/RHEL/openSUSE
    Rpm,
}

impl PackageFormat {
    pub const ALL: [PackageFormat; 2] = [PackageFormat::Deb, PackageFormat::Rpm];

    /// File extension without the dot, also the packager name for nfpm and fpm.
    pub fn extension(self) -> &'static str {
        match self {
            PackageFormat::Deb => "deb",
            PackageFormat::Rpm => "rpm",
        }
    }

    /// Native tool the packager shells out to for this format.
    pub fn build_tool(self) -> &'static str {
        match self {
            PackageFormat::Deb => "dpkg-deb",
            PackageFormat::Rpm => "rpmbuild",
        }
    }

    /// Deterministic artifact file name.
    ///
    /// Debian convention: `{name}_{version}_{arch}.deb`.
    /// RPM convention: `{name}-{version}-1.{arch}.rpm`.
    pub fn file_name(self, name: &str, version: &str, arch: Arch) -> String {
        match self {
            PackageFormat::Deb => format!("{name}_{version}_{arch}.deb"),
            PackageFormat::Rpm => format!("{name}-{version}-1.{arch}.rpm"),
        }
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for PackageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deb" => Ok(PackageFormat::Deb),
            "rpm" => Ok(PackageFormat::Rpm),
            other => Err(format!("unsupported package format: {other}")),
        }
    }
}

/// Runtime dependencies used when the user lists none.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DefaultDependencies {
    pub deb: Vec<String>,
    pub rpm: Vec<String>,
}

impl Default for DefaultDependencies {
    fn default() -> Self {
        Self {
            deb: vec!["libc6".to_string()],
            rpm: vec!["glibc".to_string()],
        }
    }
}

impl DefaultDependencies {
    pub fn for_format(&self, format: PackageFormat) -> &[String] {
        match format {
            PackageFormat::Deb => &self.deb,
            PackageFormat::Rpm => &self.rpm,
        }
    }
}

/// Linux package generation, orthogonal to the backend choice.
///
/// # Examples
///
/// ```
/// use pyforge::config::{LinuxPackageSettings, PackageFormat};
///
/// let settings = LinuxPackageSettings::default();
/// assert!(!settings.enabled);
/// assert_eq!(settings.formats, vec![PackageFormat::Deb]);
/// ```
#[derive(Clone, Debug)]
pub struct LinuxPackageSettings {
    /// Whether packages are produced at all.
    pub enabled: bool,

    /// nfpm or fpm.
    pub tool: PackagingTool,

    /// Requested formats, never empty after building a configuration.
    pub formats: Vec<PackageFormat>,

    /// Package architecture.
    pub arch: Arch,

    /// Directory the executable is installed into.
    ///
    /// Default: `/usr/local/bin`
    pub install_path: String,

    /// Explicit runtime dependencies. Empty means [`DefaultDependencies`].
    pub depends: Vec<String>,

    /// Fallback dependencies per format.
    pub default_depends: DefaultDependencies,

    /// Menu entry name. Empty means no `.desktop` file.
    pub desktop_name: String,

    /// Install a systemd unit.
    pub create_service: bool,

    /// Unit name, without `.service`.
    pub service_name: String,

    /// Where package files are written.
    ///
    /// Default: `output_pkg`
    pub output_dir: PathBuf,

    /// Package description. Empty falls back to `<app> application`.
    pub description: String,

    /// `Name <email>` of the maintainer. Empty falls back to the company name.
    pub maintainer: String,

    /// Project homepage. Empty falls back to `https://example.com`.
    pub homepage: String,

    /// License identifier.
    pub license: String,
}

impl Default for LinuxPackageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            tool: PackagingTool::default(),
            formats: vec![PackageFormat::Deb],
            arch: Arch::default(),
            install_path: "/usr/local/bin".to_string(),
            depends: Vec::new(),
            default_depends: DefaultDependencies::default(),
            desktop_name: String::new(),
            create_service: false,
            service_name: String::new(),
            output_dir: PathBuf::from("output_pkg"),
            description: String::new(),
            maintainer: String::new(),
            homepage: String::new(),
            license: "MIT".to_string(),
        }
    }
}

impl LinuxPackageSettings {
    /// Dependencies to declare for a format.
    pub fn depends_for(&self, format: PackageFormat) -> Vec<String> {
        if self.depends.is_empty() {
            self.default_depends.for_format(format).to_vec()
        } else {
            self.depends.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_each_convention() {
        assert_eq!(
            PackageFormat::Deb.file_name("app", "1.2.3", Arch::Arm64),
            "app_1.2.3_arm64.deb"
        );
        assert_eq!(
            PackageFormat::Rpm.file_name("app", "1.2.3", Arch::Arm64),
            "app-1.2.3-1.arm64.rpm"
        );
    }

    #[test]
    fn explicit_depends_override_defaults() {
        let mut settings = LinuxPackageSettings::default();
        assert_eq!(settings.depends_for(PackageFormat::Deb), vec!["libc6"]);
        assert_eq!(settings.depends_for(PackageFormat::Rpm), vec!["glibc"]);

        settings.depends = vec!["python3".into()];
        assert_eq!(settings.depends_for(PackageFormat::Rpm), vec!["python3"]);
    }
}
