//! Package descriptor builder and Linux packager.
//!
//! [`PackagePlan`] resolves packaging values from a configuration and derives
//! the manifest and per-format commands from them. [`LinuxPackager`] runs
//! those commands in-process, one format at a time; the same plan also feeds
//! the packaging section embedded in generated scripts.

mod discover;
mod invocation;
mod manifest;
mod naming;
mod plan;

pub use discover::{EXCLUDED_EXTENSIONS, SEARCH_DIRS, SUPPORT_ARCHIVE, find_executable, is_candidate};
pub use invocation::{PackageCommand, fpm_command, nfpm_command, remove_stale, run};
pub use manifest::{ContentEntry, Manifest, desktop_entry, service_unit};
pub use naming::{FALLBACK_PACKAGE_NAME, normalize_package_name};
pub use plan::{DEFAULT_HOMEPAGE, PackagePlan};
pub(crate) use plan::path_string;

use crate::config::{PackageFormat, PackagingTool};
use crate::env;
use crate::error::{Error, ErrorExt, Result};
use crate::report::Reporter;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// A package file produced by the packaging tool.
#[derive(Debug, Clone)]
pub struct PackageArtifact {
    pub format: PackageFormat,
    pub path: PathBuf,
    pub size: u64,
    pub sha256: String,
}

/// What happened to one requested format.
#[derive(Debug)]
pub enum FormatOutcome {
    /// The tool succeeded and the expected file exists.
    Built(PackageArtifact),
    /// The tool succeeded but the expected file is not there.
    Missing { format: PackageFormat, expected: PathBuf },
    /// The tool failed; other formats were still attempted.
    Failed { format: PackageFormat, error: Error },
}

impl FormatOutcome {
    pub fn format(&self) -> PackageFormat {
        match self {
            FormatOutcome::Built(artifact) => artifact.format,
            FormatOutcome::Missing { format, .. } | FormatOutcome::Failed { format, .. } => *format,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, FormatOutcome::Failed { .. })
    }
}

/// Builds Linux packages for an already compiled executable.
///
/// # Examples
///
/// ```no_run
/// use pyforge::package::{LinuxPackager, PackagePlan};
/// use pyforge::report::LogReporter;
/// # async fn example(config: pyforge::config::Configuration) -> pyforge::error::Result<()> {
/// let plan = PackagePlan::from_config(&config)?;
/// let outcomes = LinuxPackager::new(plan, &LogReporter)
///     .package(std::path::Path::new("dist/app"))
///     .await?;
/// println!("{} formats attempted", outcomes.len());
/// # Ok(())
/// # }
/// ```
pub struct LinuxPackager<'a> {
    plan: PackagePlan,
    reporter: &'a dyn Reporter,
    tool_path: Option<PathBuf>,
}

impl<'a> LinuxPackager<'a> {
    pub fn new(plan: PackagePlan, reporter: &'a dyn Reporter) -> Self {
        Self {
            plan,
            reporter,
            tool_path: None,
        }
    }

    /// Uses `path` as the packaging tool instead of searching for it.
    pub fn with_tool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tool_path = Some(path.into());
        self
    }

    pub fn plan(&self) -> &PackagePlan {
        &self.plan
    }

    /// Packages `executable` in every planned format.
    ///
    /// # Errors
    ///
    /// Fails before any format is attempted when the packaging tool is absent
    /// ([`Error::ToolAbsent`]), when the executable is missing or empty, or
    /// when the output directory or manifest cannot be written. Per-format
    /// failures are returned as [`FormatOutcome::Failed`] instead.
    pub async fn package(&self, executable: &Path) -> Result<Vec<FormatOutcome>> {
        let program = self.resolve_tool()?;
        self.validate_executable(executable).await?;

        let output_dir = &self.plan.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .fs_context("creating package output directory", output_dir)?;

        let exe = plan::path_string(&absolute(executable));
        let manifest_path = self.plan.manifest_path();
        if self.plan.tool == PackagingTool::Nfpm {
            let yaml = self.plan.manifest(&exe).to_yaml()?;
            tokio::fs::write(&manifest_path, yaml)
                .await
                .fs_context("writing nfpm configuration", &manifest_path)?;
        }

        let mut outcomes = Vec::with_capacity(self.plan.formats.len());
        for &format in &self.plan.formats {
            outcomes.push(self.package_format(&program, format, &exe, &manifest_path).await);
        }

        if manifest_path.exists() {
            if let Err(e) = tokio::fs::remove_file(&manifest_path).await {
                self.reporter
                    .warn(&format!("cannot remove {}: {e}", manifest_path.display()));
            }
        }

        Ok(outcomes)
    }

    async fn package_format(
        &self,
        program: &str,
        format: PackageFormat,
        executable: &str,
        manifest_path: &Path,
    ) -> FormatOutcome {
        remove_stale(&self.plan.output_dir, format, self.reporter);

        if env::which(format.build_tool()).is_none() {
            self.reporter.warn(&format!(
                "{} not found; building {} packages may fail",
                format.build_tool(),
                format.extension().to_uppercase()
            ));
        }

        let command = self.plan.command(
            program,
            format,
            executable,
            &plan::path_string(manifest_path),
        );
        self.reporter.info(&format!(
            "building {} package: {}",
            format.extension().to_uppercase(),
            command.display()
        ));

        if let Err(error) = run(&command).await {
            self.reporter.error(&format!(
                "{} package failed: {error}",
                format.extension().to_uppercase()
            ));
            return FormatOutcome::Failed { format, error };
        }

        let expected = self.plan.artifact_path(format);
        match artifact(format, &expected).await {
            Ok(artifact) => {
                self.reporter.success(&format!(
                    "created {} ({} bytes)",
                    artifact.path.display(),
                    artifact.size
                ));
                FormatOutcome::Built(artifact)
            }
            Err(_) => {
                self.reporter.warn(&format!(
                    "{} reported success but {} was not found",
                    command.program,
                    expected.display()
                ));
                FormatOutcome::Missing { format, expected }
            }
        }
    }

    fn resolve_tool(&self) -> Result<String> {
        if let Some(path) = &self.tool_path {
            return Ok(path.to_string_lossy().into_owned());
        }
        let tool = self.plan.tool;
        env::locate_packaging_tool(tool)
            .map(|p| p.to_string_lossy().into_owned())
            .ok_or_else(|| Error::ToolAbsent {
                tool: tool.command().to_string(),
                hint: env::install_hint(
                    tool.command(),
                    crate::config::TargetPlatform::host(),
                    env::DistroFamily::detect(),
                ),
            })
    }

    async fn validate_executable(&self, executable: &Path) -> Result<()> {
        let metadata = tokio::fs::metadata(executable)
            .await
            .fs_context("reading executable", executable)?;
        if metadata.len() == 0 {
            crate::bail!("executable is empty: {}", executable.display());
        }
        if executable
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("exe"))
        {
            self.reporter.warn(&format!(
                "{} is a Windows executable and needs Wine to run on Linux",
                executable.display()
            ));
        }
        self.reporter.info(&format!(
            "executable: {} ({} bytes)",
            executable.display(),
            metadata.len()
        ));
        Ok(())
    }
}

async fn artifact(format: PackageFormat, path: &Path) -> Result<PackageArtifact> {
    let size = tokio::fs::metadata(path)
        .await
        .fs_context("reading package", path)?
        .len();
    Ok(PackageArtifact {
        format,
        path: path.to_path_buf(),
        size,
        sha256: calculate_sha256(path).await?,
    })
}

/// Hex-encoded SHA-256 of a file, read in 8 KiB chunks.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for checksum", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for checksum", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

fn absolute(path: &Path) -> PathBuf {
    use path_absolutize::Absolutize;
    path.absolutize()
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{ConfigurationBuilder, LinuxPackageSettings};
    use crate::report::{Level, RecordingReporter};
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-nfpm");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn plan(out: &Path, formats: Vec<PackageFormat>) -> PackagePlan {
        let config = ConfigurationBuilder::new()
            .app_name("demo")
            .version("1.0.0")
            .linux(LinuxPackageSettings {
                enabled: true,
                formats,
                output_dir: out.to_path_buf(),
                ..Default::default()
            })
            .build();
        PackagePlan::from_config(&config).unwrap()
    }

    fn executable(dir: &Path) -> PathBuf {
        let exe = dir.join("demo");
        std::fs::write(&exe, "binary").unwrap();
        exe
    }

    #[tokio::test]
    async fn stale_artifacts_removed_even_when_tool_fails() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("stale_0.9_amd64.deb"), "old").unwrap();
        let tool = fake_tool(tmp.path(), "echo broken >&2; exit 2");
        let reporter = RecordingReporter::new();

        let outcomes = LinuxPackager::new(plan(&out, vec![PackageFormat::Deb]), &reporter)
            .with_tool_path(&tool)
            .package(&executable(tmp.path()))
            .await
            .unwrap();

        assert!(!out.join("stale_0.9_amd64.deb").exists());
        assert!(matches!(
            &outcomes[0],
            FormatOutcome::Failed { error: Error::Subprocess { code: Some(2), .. }, .. }
        ));
        assert!(!out.join(".demo-nfpm.yaml").exists());
    }

    #[tokio::test]
    async fn one_format_failing_does_not_stop_the_next() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        // Fails for deb, writes the --target file for rpm.
        let tool = fake_tool(
            tmp.path(),
            r#"[ "$3" = deb ] && exit 1
while [ $# -gt 0 ]; do [ "$1" = --target ] && echo pkg > "$2"; shift; done"#,
        );
        let reporter = RecordingReporter::new();

        let outcomes = LinuxPackager::new(
            plan(&out, vec![PackageFormat::Deb, PackageFormat::Rpm]),
            &reporter,
        )
        .with_tool_path(&tool)
        .package(&executable(tmp.path()))
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_success());
        match &outcomes[1] {
            FormatOutcome::Built(artifact) => {
                assert_eq!(artifact.path, out.join("demo-1.0.0-1.amd64.rpm"));
                assert_eq!(artifact.size, 4);
                assert_eq!(artifact.sha256.len(), 64);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_without_file_is_a_warning() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let tool = fake_tool(tmp.path(), "exit 0");
        let reporter = RecordingReporter::new();

        let outcomes = LinuxPackager::new(plan(&out, vec![PackageFormat::Deb]), &reporter)
            .with_tool_path(&tool)
            .package(&executable(tmp.path()))
            .await
            .unwrap();

        assert!(matches!(outcomes[0], FormatOutcome::Missing { .. }));
        assert!(outcomes[0].is_success());
        assert!(reporter
            .at(Level::Warn)
            .iter()
            .any(|m| m.contains("was not found")));
    }

    #[tokio::test]
    async fn empty_executable_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("empty");
        std::fs::write(&exe, "").unwrap();
        let tool = fake_tool(tmp.path(), "exit 0");
        let reporter = RecordingReporter::new();

        let result = LinuxPackager::new(plan(&tmp.path().join("out"), vec![PackageFormat::Deb]), &reporter)
            .with_tool_path(&tool)
            .package(&exe)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn checksum_of_known_content() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("abc");
        std::fs::write(&file, "abc").unwrap();
        assert_eq!(
            calculate_sha256(&file).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
