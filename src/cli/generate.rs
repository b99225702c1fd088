//! Generation modes: collect answers, render, write, optionally package.

use super::collector::Collector;
use super::prompt::{Prompter, StdinPrompter};
use super::{EXIT_CANCELLED, Mode, OutputManager, RuntimeConfig, check};
use crate::args::{compile_args, display_line};
use crate::config::{Backend, Configuration, DEFAULT_PACKAGE_SCRIPT_NAME};
use crate::env::CheckStatus;
use crate::error::{CliError, Error, Result};
use crate::package::{FormatOutcome, LinuxPackager, PackagePlan, SEARCH_DIRS, find_executable};
use crate::requirements::analyze;
use crate::script;
use std::path::{Path, PathBuf};

/// Interactive run. Returns the process exit code.
pub async fn run(runtime: &RuntimeConfig) -> Result<i32> {
    let output = *runtime.output();
    output.section("pyforge: Python build script generator")?;
    output.info("Type ? at any prompt for help, Ctrl+C to cancel.")?;

    let mode = runtime.mode();
    let project_default = runtime.project_dir().to_string();
    let collected = interactive(move || {
        let mut prompter = StdinPrompter::stdio();
        let mut collector = Collector::new(&mut prompter, &output);
        let mode = match mode {
            Some(mode) => mode,
            None => collector.mode()?,
        };
        let config = collector.collect(mode, &project_default)?;
        Ok((mode, config))
    })
    .await;

    let (mode, config) = match collected {
        Ok(answers) => answers,
        Err(Error::Cancelled) => {
            output.warn("Cancelled, nothing was written.")?;
            return Ok(EXIT_CANCELLED);
        }
        Err(e) => return Err(e),
    };

    print_summary(&output, mode, &config)?;
    let requirements = analyze(&effective(mode, &config));
    output.info(&requirements.summary())?;
    if !requirements.is_empty() {
        let report = check::check_requirements(requirements).await?;
        for check in report.checks().filter(|c| c.status != CheckStatus::Pass) {
            match (check.status, &check.details) {
                (CheckStatus::Fail, _) => output.warn(&format!(
                    "{} is not installed here; the generated script will need it",
                    check.name
                ))?,
                (_, Some(details)) => output.warn(&format!("{}: {details}", check.name))?,
                (_, None) => output.warn(&check.name)?,
            }
        }
    }

    let written = write_scripts(mode, &config, &output)?;
    output.section("Done")?;
    for path in &written {
        output.println(&format!("Wrote {}", path.display()))?;
    }
    if let Some(main) = written.first() {
        output.println(&format!("Run it with: python {}", main.display()))?;
    }

    if mode == Mode::Package {
        offer_packaging(&config, &output).await?;
    }
    Ok(0)
}

/// Runs blocking prompts off the async runtime, racing them against Ctrl+C.
async fn interactive<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);
    tokio::select! {
        joined = task => joined
            .map_err(|e| Error::GenericError(format!("prompt task failed: {e}")))?,
        _ = tokio::signal::ctrl_c() => Err(Error::Cancelled),
    }
}

/// Configuration the build script is rendered from in `mode`.
fn effective(mode: Mode, config: &Configuration) -> Configuration {
    match mode {
        Mode::Compile => config.without_packaging(),
        Mode::Full | Mode::Package => config.clone(),
    }
}

/// Renders and writes every script `mode` produces, main script first.
///
/// Full mode with packaging enabled also writes the standalone packaging
/// script next to the build script.
pub fn write_scripts(mode: Mode, config: &Configuration, output: &OutputManager) -> Result<Vec<PathBuf>> {
    let dir = config.project_dir();
    let mut written = Vec::new();

    if mode == Mode::Package {
        let source = script::render_package_script(config)?;
        written.push(write_script(&dir.join(config.script_filename()), &source)?);
        return Ok(written);
    }

    let config = effective(mode, config);
    let args = compile_args(&config)?;
    output.progress("Backend command")?;
    output.indent(&display_line(&args))?;

    let requirements = analyze(&config);
    let source = script::render(config.backend(), &args, &requirements, &config)?;
    written.push(write_script(&dir.join(config.script_filename()), &source)?);

    if config.packaging_enabled() {
        let name = if config.script_filename() == DEFAULT_PACKAGE_SCRIPT_NAME {
            format!("package_{DEFAULT_PACKAGE_SCRIPT_NAME}")
        } else {
            DEFAULT_PACKAGE_SCRIPT_NAME.to_string()
        };
        let source = script::render_package_script(&config)?;
        written.push(write_script(&dir.join(name), &source)?);
    }
    Ok(written)
}

fn write_script(path: &Path, source: &str) -> Result<PathBuf> {
    let failed = |e: std::io::Error| CliError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    std::fs::write(path, source).map_err(failed)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(failed)?;
    }

    Ok(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
}

fn print_summary(output: &OutputManager, mode: Mode, config: &Configuration) -> std::io::Result<()> {
    output.section("Configuration")?;
    output.indent(&format!("Mode: {mode}"))?;
    output.indent(&format!("Project: {}", config.project_dir().display()))?;
    output.indent(&format!("Application: {}", config.app_name()))?;
    if mode != Mode::Package {
        output.indent(&format!("Entry file: {}", config.entry_name()))?;
        output.indent(&format!("Backend: {}", config.backend().display_name()))?;
        match config.backend() {
            Backend::Nuitka => {
                let native = config.native();
                output.indent(&format!("Compiler: {}", native.toolchain.describe()))?;
                output.indent(&format!(
                    "Standalone: {}, onefile: {}, jobs: {}",
                    native.standalone,
                    native.effective_onefile(),
                    native.jobs
                ))?;
                if !native.plugins.is_empty() {
                    output.indent(&format!("Plugins: {}", native.plugins.join(", ")))?;
                }
            }
            Backend::PyInstaller => {
                let bundler = config.bundler();
                output.indent(&format!(
                    "Layout: {}",
                    if bundler.onefile { "onefile" } else { "onedir" }
                ))?;
            }
        }
        output.indent(&format!("Console window: {}", config.show_console()))?;
        output.indent(&format!("Output directory: {}", config.output_dir()))?;
    }
    output.indent(&format!("Version: {}", config.version()))?;

    if config.packaging_enabled() && mode != Mode::Compile {
        let linux = config.linux();
        let formats: Vec<_> = linux.formats.iter().map(|f| f.extension()).collect();
        output.indent(&format!(
            "Linux packages: {} via {} for {}, into {}",
            formats.join(", "),
            linux.tool,
            linux.arch,
            linux.output_dir.display()
        ))?;
    }
    Ok(())
}

/// Package mode: offer to package an executable found in `build/` or `dist/` right away.
async fn offer_packaging(config: &Configuration, output: &OutputManager) -> Result<()> {
    let project = config.project_dir().to_path_buf();
    let Some(executable) = find_executable(&project, SEARCH_DIRS) else {
        output.info("No executable found in build/ or dist/; run the script after building.")?;
        return Ok(());
    };

    let question = format!("Package {} now", executable.display());
    let answer = interactive(move || {
        StdinPrompter::stdio().confirm(&question, true, "Runs the packaging tool in-process.")
    })
    .await;
    match answer {
        Ok(true) => {}
        Ok(false) | Err(Error::Cancelled) => return Ok(()),
        Err(e) => return Err(e),
    }

    let mut plan = PackagePlan::from_config(config)?;
    if plan.output_dir.is_relative() {
        plan.output_dir = project.join(&plan.output_dir);
    }
    let packager = LinuxPackager::new(plan, output);

    let outcomes = tokio::select! {
        result = packager.package(&executable) => result,
        _ = tokio::signal::ctrl_c() => Err(Error::Cancelled),
    };
    let outcomes = match outcomes {
        Ok(outcomes) => outcomes,
        Err(Error::Cancelled) => {
            output.warn("Packaging cancelled.")?;
            return Ok(());
        }
        Err(e) => {
            output.error(&e.to_string())?;
            return Ok(());
        }
    };

    for outcome in &outcomes {
        match outcome {
            FormatOutcome::Built(artifact) => {
                output.indent(&format!("{}  sha256:{}", artifact.path.display(), artifact.sha256))?;
            }
            FormatOutcome::Missing { .. } | FormatOutcome::Failed { .. } => {}
        }
    }
    let built = outcomes.iter().filter(|o| matches!(o, FormatOutcome::Built(_))).count();
    output.info(&format!("{built} of {} package formats built", outcomes.len()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigurationBuilder, LinuxPackageSettings, TargetPlatform};
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &Path, packaging: bool) -> Configuration {
        ConfigurationBuilder::new()
            .project_dir(dir)
            .entry_file(dir.join("main.py"))
            .app_name("demo")
            .platform(TargetPlatform::Linux)
            .linux(LinuxPackageSettings {
                enabled: packaging,
                ..Default::default()
            })
            .build()
    }

    fn quiet() -> OutputManager {
        OutputManager::new(false, true)
    }

    #[test]
    fn compile_mode_writes_only_the_build_script() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "").unwrap();
        let written = write_scripts(Mode::Compile, &config(tmp.path(), true), &quiet()).unwrap();

        assert_eq!(written.len(), 1);
        let source = fs::read_to_string(&written[0]).unwrap();
        assert!(source.contains("Linux package generation is disabled"));
    }

    #[test]
    fn full_mode_with_packaging_writes_both_scripts() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "").unwrap();
        let written = write_scripts(Mode::Full, &config(tmp.path(), true), &quiet()).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("build.py"));
        assert!(written[1].ends_with(DEFAULT_PACKAGE_SCRIPT_NAME));
        let build = fs::read_to_string(&written[0]).unwrap();
        assert!(build.contains("def create_linux_packages"));
    }

    #[test]
    fn package_mode_writes_packaging_script() {
        let tmp = TempDir::new().unwrap();
        let config = ConfigurationBuilder::new()
            .project_dir(tmp.path())
            .app_name("demo")
            .script_filename(DEFAULT_PACKAGE_SCRIPT_NAME)
            .linux(LinuxPackageSettings {
                enabled: true,
                ..Default::default()
            })
            .build();
        let written = write_scripts(Mode::Package, &config, &quiet()).unwrap();

        assert_eq!(written.len(), 1);
        let source = fs::read_to_string(&written[0]).unwrap();
        assert!(source.contains("def create_linux_packages"));
        assert!(!source.contains("os.system"));
    }

    #[cfg(unix)]
    #[test]
    fn scripts_are_executable() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "").unwrap();
        let written = write_scripts(Mode::Compile, &config(tmp.path(), false), &quiet()).unwrap();
        let mode = fs::metadata(&written[0]).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn unwritable_target_is_a_cli_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "").unwrap();
        let config = ConfigurationBuilder::new()
            .project_dir(tmp.path())
            .entry_file(tmp.path().join("main.py"))
            .script_filename("missing/dir/build.py")
            .build();
        let err = write_scripts(Mode::Compile, &config, &quiet()).unwrap_err();
        assert!(matches!(err, Error::Cli(CliError::WriteFailed { .. })));
    }
}
