//! Environment and tool checker.
//!
//! Best-effort presence detection for the external tools a pipeline needs.
//! Results only feed user-facing reports and warnings; nothing here blocks
//! script generation.

mod hints;
mod probe;
mod system;
mod types;

pub use hints::install_hint;
pub use probe::{PROBE_TIMEOUT, probe, which};
pub use system::{DistroFamily, SystemInfo};
pub use types::{CheckReport, CheckResult, CheckSection, CheckStatus};

use crate::config::{PackagingTool, TargetPlatform};
use crate::requirements::{Category, Requirements};
use std::path::PathBuf;

/// Oldest Python release the backends support.
pub const MIN_PYTHON: (u32, u32) = (3, 8);

/// Python package managers preferred over plain pip, in lookup order.
pub const PYTHON_MANAGERS: &[&str] = &["uv", "poetry", "pdm", "pipenv"];

/// Argument that makes `tool` print its version and exit.
pub fn version_arg(tool: &str) -> &'static str {
    match tool {
        "nfpm" => PackagingTool::Nfpm.version_arg(),
        _ => "--version",
    }
}

/// Finds a working packaging tool binary.
///
/// Looks on `PATH` first; nfpm is additionally searched in the usual Go
/// install locations since `go install` does not touch `PATH`.
pub fn locate_packaging_tool(tool: PackagingTool) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = which(tool.command()).into_iter().collect();
    if tool == PackagingTool::Nfpm {
        candidates.extend(
            go_bin_dirs()
                .into_iter()
                .map(|dir| dir.join(tool.command()))
                .filter(|p| p.is_file()),
        );
    }

    candidates
        .into_iter()
        .find(|path| probe(path, tool.version_arg()).is_some())
}

fn go_bin_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(gopath) = std::env::var_os("GOPATH").filter(|v| !v.is_empty()) {
        dirs.extend(std::env::split_paths(&gopath).map(|p| p.join("bin")));
    } else if let Some(gopath) = probe::probe_args("go", &["env", "GOPATH"]) {
        dirs.push(PathBuf::from(gopath).join("bin"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join("go").join("bin"));
    }
    dirs.push(PathBuf::from("/usr/local/go/bin"));
    dirs
}

/// Runs environment checks and assembles a [`CheckReport`].
#[derive(Debug, Clone)]
pub struct EnvironmentChecker {
    system: SystemInfo,
}

impl Default for EnvironmentChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentChecker {
    pub fn new() -> Self {
        Self {
            system: SystemInfo::detect(),
        }
    }

    pub fn system(&self) -> &SystemInfo {
        &self.system
    }

    /// Checks every tool either backend or packaging tool could need.
    pub fn full_check(&self) -> CheckReport {
        let mut report = self.base_report();
        report.push(
            "Build tools",
            self.check_tools(&["nuitka", "pyinstaller"], CheckStatus::Warn),
        );
        report.push(
            "Packaging tools",
            self.check_tools(&["nfpm", "fpm"], CheckStatus::Warn),
        );
        report.push(
            "System tools",
            self.check_tools(&["clang", "gcc"], CheckStatus::Warn),
        );
        if self.system.platform == TargetPlatform::Linux {
            report.push(
                "Package formats",
                self.check_tools(&["dpkg-deb", "rpmbuild"], CheckStatus::Warn),
            );
        }
        report
    }

    /// Checks exactly the tools in `requirements`.
    ///
    /// Missing tools are reported as failures, since the generated script
    /// will need them, but the report is still informational.
    pub fn check_requirements(&self, requirements: &Requirements) -> CheckReport {
        let mut report = self.base_report();
        for category in Category::ALL {
            let tools = requirements.tools(category);
            report.push(category.label(), self.check_tools(&tools, CheckStatus::Fail));
        }
        report
    }

    fn base_report(&self) -> CheckReport {
        let mut report = CheckReport::default();
        report.push(
            "System",
            vec![CheckResult::pass_with("platform", &self.system.describe())],
        );
        report.push("Python", python_checks());
        report
    }

    fn check_tools(&self, tools: &[&str], missing: CheckStatus) -> Vec<CheckResult> {
        tools
            .iter()
            .map(|&tool| self.check_tool(tool, missing))
            .collect()
    }

    fn check_tool(&self, tool: &str, missing: CheckStatus) -> CheckResult {
        let found = if tool == PackagingTool::Nfpm.command() {
            locate_packaging_tool(PackagingTool::Nfpm).and_then(|p| probe(p, version_arg(tool)))
        } else {
            probe(tool, version_arg(tool))
        };

        match found {
            Some(version) => CheckResult::pass_with(tool, &version),
            None => {
                let hint = install_hint(tool, self.system.platform, self.system.distro);
                match missing {
                    CheckStatus::Fail => CheckResult::fail(tool, &hint),
                    _ => CheckResult::warn(tool, &hint),
                }
            }
        }
    }
}

fn python_checks() -> Vec<CheckResult> {
    let mut checks = Vec::new();

    let version = ["python3", "python"]
        .iter()
        .find_map(|cmd| probe(cmd, "--version"));
    checks.push(match version {
        Some(line) => match parse_python_version(&line) {
            Some(v) if v >= MIN_PYTHON => CheckResult::pass_with("python", &line),
            Some(_) => CheckResult::warn(
                "python",
                &format!("{line}; Python {}.{}+ is recommended", MIN_PYTHON.0, MIN_PYTHON.1),
            ),
            None => CheckResult::pass_with("python", &line),
        },
        None => CheckResult::warn("python", "no python3 or python interpreter on PATH"),
    });

    let managers: Vec<&str> = PYTHON_MANAGERS
        .iter()
        .copied()
        .filter(|m| which(m).is_some())
        .collect();
    checks.push(if !managers.is_empty() {
        CheckResult::pass_with("package manager", &managers.join(", "))
    } else if which("pip").is_some() || which("pip3").is_some() {
        CheckResult::pass_with("package manager", "pip")
    } else {
        CheckResult::warn("package manager", "none of pip, uv, poetry, pdm, pipenv found")
    });

    checks
}

/// Extracts `(major, minor)` from output like `Python 3.11.4`.
fn parse_python_version(line: &str) -> Option<(u32, u32)> {
    let version = line.split_whitespace().find(|w| w.starts_with(|c: char| c.is_ascii_digit()))?;
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts
        .next()
        .and_then(|m| m.trim_end_matches(|c: char| !c.is_ascii_digit()).parse().ok())
        .unwrap_or(0);
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Backend, ConfigurationBuilder};
    use crate::requirements::analyze;

    #[test]
    fn python_version_parsing() {
        assert_eq!(parse_python_version("Python 3.11.4"), Some((3, 11)));
        assert_eq!(parse_python_version("Python 3.13.0rc1"), Some((3, 13)));
        assert_eq!(parse_python_version("Python 2.7"), Some((2, 7)));
        assert_eq!(parse_python_version("garbage"), None);
    }

    #[test]
    fn nfpm_uses_subcommand_for_version() {
        assert_eq!(version_arg("nfpm"), "version");
        assert_eq!(version_arg("fpm"), "--version");
    }

    #[test]
    fn targeted_check_covers_requirement_set() {
        let config = ConfigurationBuilder::new().backend(Backend::PyInstaller).build();
        let report = EnvironmentChecker::new().check_requirements(&analyze(&config));

        let titles: Vec<_> = report.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["System", "Python", "Build tools"]);
        assert_eq!(report.sections[2].checks[0].name, "pyinstaller");
    }
}
