//! Interactive collection of a [`Configuration`].
//!
//! Questions are asked in a fixed order per [`Mode`]; every answer is run
//! through the matching validator and re-asked until accepted. Defaults come
//! from `pyproject.toml` when the project has one.

use super::Mode;
use super::plugins;
use super::prompt::Prompter;
use crate::config::{
    Arch, Backend, BundlerSettings, CompilerToolchain, Configuration, ConfigurationBuilder,
    DEFAULT_JOBS, DEFAULT_PACKAGE_SCRIPT_NAME, DEFAULT_SCRIPT_NAME, LinuxPackageSettings,
    NativeSettings, PackageFormat, PackagingTool, TargetPlatform, UpxDir,
};
use crate::error::Result;
use crate::metadata::{ProjectMetadata, discover_icon, load_project_metadata};
use crate::report::Reporter;
use crate::validate::{self, Validation};
use std::path::{Path, PathBuf};

/// Entry files offered as the default, in order of preference.
const ENTRY_CANDIDATES: &[&str] = &["main.py", "app.py", "__main__.py"];

/// Application name used in package mode when nothing better is known.
const DEFAULT_PACKAGE_APP_NAME: &str = "app";

const DEFAULT_VERSION: &str = "1.0.0";

/// Asks the questions for one run.
pub struct Collector<'a> {
    prompter: &'a mut dyn Prompter,
    reporter: &'a dyn Reporter,
    platform: TargetPlatform,
}

impl<'a> Collector<'a> {
    pub fn new(prompter: &'a mut dyn Prompter, reporter: &'a dyn Reporter) -> Self {
        Self {
            prompter,
            reporter,
            platform: TargetPlatform::host(),
        }
    }

    /// Collect for another platform than the host.
    pub fn with_platform(mut self, platform: TargetPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Asks which mode to run in.
    pub fn mode(&mut self) -> Result<Mode> {
        let options: Vec<&str> = Mode::ALL.iter().map(|m| m.describe()).collect();
        let index = self.prompter.choice(
            "What do you want to generate?",
            &options,
            0,
            "Full writes a build script that can also package the result. Compile only skips \
             packaging. Package only writes a script that packages an executable built earlier.",
        )?;
        Ok(Mode::ALL[index])
    }

    /// Runs the questions for `mode`.
    ///
    /// `project_default` is offered as the project directory.
    pub fn collect(&mut self, mode: Mode, project_default: &str) -> Result<Configuration> {
        match mode {
            Mode::Package => self.collect_package(project_default),
            Mode::Full | Mode::Compile => self.collect_build(mode, project_default),
        }
    }

    fn collect_build(&mut self, mode: Mode, project_default: &str) -> Result<Configuration> {
        let project = self.validated(
            "Project directory",
            Some(project_default),
            "Root of the Python project. Paths in the script are relative to it.",
            true,
            validate::project_dir,
        )?;
        let metadata = self.metadata(&project);

        let entry_default = ENTRY_CANDIDATES
            .iter()
            .find(|name| project.join(name).is_file())
            .copied();
        let entry = self.validated(
            "Entry file",
            entry_default,
            "The .py file that starts the application, relative to the project directory.",
            true,
            |raw| validate::entry_file(raw, &project),
        )?;

        let name_default = metadata
            .name
            .clone()
            .unwrap_or_else(|| Configuration::default_app_name(&entry));
        let app_name = self.prompter.text(
            "Application name",
            Some(&name_default),
            "Name of the produced executable, without extension.",
            false,
        )?;

        let icon_default = discover_icon(&project)
            .map(|p| p.strip_prefix(&project).map(Path::to_path_buf).unwrap_or(p))
            .map(|p| p.to_string_lossy().into_owned());
        let icon = self.validated(
            "Icon file (.ico)",
            Some(icon_default.as_deref().unwrap_or("")),
            "Windows .ico file. Leave empty for no icon. PNG/JPG must be converted first.",
            false,
            |raw| validate::icon_file(raw, &project),
        )?;

        let backend_index = self.prompter.choice(
            "Build backend",
            &[
                "Nuitka (compiles to C; faster startup, slower builds)",
                "PyInstaller (bundles the interpreter; faster builds)",
            ],
            0,
            "Nuitka needs a C compiler. PyInstaller only needs Python.",
        )?;
        let backend = [Backend::Nuitka, Backend::PyInstaller][backend_index];

        let mut native = NativeSettings::default();
        if backend == Backend::Nuitka {
            native.toolchain = self.toolchain()?;
        }

        let show_console = self.prompter.confirm(
            "Show a console window",
            true,
            "Disable for GUI applications so no terminal opens next to the window.",
        )?;
        let output_dir = self.prompter.text(
            "Output directory",
            Some("build"),
            "Where the backend writes the executable, relative to the project.",
            false,
        )?;

        let mut builder = ConfigurationBuilder::new()
            .platform(self.platform)
            .project_dir(&project)
            .entry_file(&entry)
            .icon_file(icon)
            .backend(backend)
            .app_name(app_name)
            .show_console(show_console)
            .output_dir(output_dir);

        builder = match backend {
            Backend::Nuitka => builder.native(self.native_options(native)?),
            Backend::PyInstaller => builder.bundler(self.bundler_options(&project)?),
        };
        builder = self.common_options(builder, &metadata)?;

        let script = self.prompter.text(
            "Script file name",
            Some(DEFAULT_SCRIPT_NAME),
            "File the build script is written to, inside the project directory.",
            false,
        )?;
        builder = builder.script_filename(validate::script_filename_or(&script, DEFAULT_SCRIPT_NAME));

        if mode == Mode::Full
            && self.prompter.confirm(
                "Generate Linux packages (.deb/.rpm) after building",
                false,
                "Adds nfpm/fpm packaging to the script. Packages are built on Linux only.",
            )?
        {
            builder = builder.linux(self.packaging_options(&metadata)?);
        }

        Ok(builder.build())
    }

    fn collect_package(&mut self, project_default: &str) -> Result<Configuration> {
        let project = match validate::project_dir(project_default) {
            Validation::Accepted(dir) => dir,
            Validation::Rejected(reason) => {
                self.reporter.warn(&format!("{reason}; using the current directory"));
                PathBuf::from(".")
            }
        };
        let metadata = self.metadata(&project);

        let name_default = metadata
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_PACKAGE_APP_NAME.to_string());
        let app_name = self.prompter.text(
            "Application name",
            Some(&name_default),
            "Package name; normalized to lowercase letters, digits, '-' and '.'.",
            true,
        )?;
        let script = self.prompter.text(
            "Script file name",
            Some(DEFAULT_PACKAGE_SCRIPT_NAME),
            "File the packaging script is written to.",
            false,
        )?;
        let version = self.version(&metadata)?;

        let builder = ConfigurationBuilder::new()
            .platform(self.platform)
            .project_dir(&project)
            .app_name(app_name)
            .version(version)
            .script_filename(validate::script_filename_or(&script, DEFAULT_PACKAGE_SCRIPT_NAME))
            .linux(self.packaging_options(&metadata)?);
        Ok(builder.build())
    }

    fn toolchain(&mut self) -> Result<CompilerToolchain> {
        let options: Vec<&str> = CompilerToolchain::ALL.iter().map(|t| t.describe()).collect();
        let default = CompilerToolchain::ALL
            .iter()
            .position(|t| *t == CompilerToolchain::default())
            .unwrap_or(0);
        let index = self.prompter.choice(
            "C compiler",
            &options,
            default,
            "MinGW64 and MSVC only apply on Windows; elsewhere Nuitka uses the system compiler \
             unless Clang is chosen.",
        )?;
        Ok(CompilerToolchain::ALL[index])
    }

    fn native_options(&mut self, mut native: NativeSettings) -> Result<NativeSettings> {
        native.standalone = self.prompter.confirm(
            "Standalone build",
            true,
            "Bundle Python and all dependencies so the target needs no Python install.",
        )?;
        native.onefile = native.standalone
            && self.prompter.confirm(
                "Single executable file (onefile)",
                false,
                "Pack the standalone folder into one self-extracting executable.",
            )?;
        native.jobs = self.prompter.integer(
            "Parallel compile jobs",
            DEFAULT_JOBS,
            1,
            &format!("This machine has {} logical CPUs.", num_cpus::get()),
        )?;
        native.show_progressbar =
            self.prompter
                .confirm("Show progress bar", true, "Nuitka's progress display while compiling.")?;
        native.remove_output = self.prompter.confirm(
            "Remove intermediate build files",
            false,
            "Delete Nuitka's .build directory when compilation finishes.",
        )?;

        for line in plugins::catalog_lines() {
            self.prompter.note(&line)?;
        }
        let raw = self.prompter.text(
            "Plugins",
            Some(""),
            "Numbers or names from the list, comma-separated. Other plugin names are accepted too.",
            false,
        )?;
        native.plugins = plugins::select(&raw, self.reporter);
        Ok(native)
    }

    fn bundler_options(&mut self, project: &Path) -> Result<BundlerSettings> {
        let mut bundler = BundlerSettings {
            onefile: self.prompter.confirm(
                "Single executable file (onefile)",
                false,
                "One self-extracting file instead of a folder with the executable and libraries.",
            )?,
            ..Default::default()
        };

        let hidden = self.prompter.text(
            "Hidden imports",
            Some(""),
            "Modules PyInstaller cannot detect, e.g. imported via importlib. Comma-separated.",
            false,
        )?;
        bundler.hidden_imports = validate::name_tokens(&hidden, self.reporter);

        let collect = self.prompter.text(
            "Packages to collect completely",
            Some(""),
            "Packages whose submodules, data files and binaries are all included.",
            false,
        )?;
        bundler.collect_all = validate::name_tokens(&collect, self.reporter);

        let data = self.prompter.text(
            "Additional data",
            Some(""),
            "source;destination pairs, comma-separated, e.g. assets;assets,config.ini;.",
            false,
        )?;
        bundler.add_data = validate::data_mappings(&data, self.reporter);

        bundler.upx = match self.prompter.choice(
            "UPX compression",
            &["Do not use UPX", "Use UPX from PATH", "Use UPX from a directory"],
            0,
            "UPX shrinks the executable but can trigger antivirus false positives.",
        )? {
            0 => None,
            1 => Some(UpxDir::Auto),
            _ => Some(UpxDir::Path(self.validated(
                "UPX directory",
                None,
                "Directory containing the upx executable.",
                true,
                |raw| existing_dir(raw, project),
            )?)),
        };

        bundler.debug = self.prompter.confirm(
            "Debug logging",
            false,
            "Verbose PyInstaller build logs instead of warnings only.",
        )?;
        bundler.clean = self.prompter.confirm(
            "Clean PyInstaller cache before building",
            true,
            "Avoids stale results at the cost of a slower build.",
        )?;
        Ok(bundler)
    }

    fn common_options(
        &mut self,
        builder: ConfigurationBuilder,
        metadata: &ProjectMetadata,
    ) -> Result<ConfigurationBuilder> {
        let company = self.prompter.text(
            "Company name",
            Some(""),
            "Written into Windows file properties and used as the package vendor.",
            false,
        )?;
        let version = self.version(metadata)?;
        let quiet = self.prompter.confirm(
            "Quiet build output",
            false,
            "Suppress the backend's progress output.",
        )?;
        let uac_admin = self.platform.supports_admin_request()
            && self.prompter.confirm(
                "Request administrator rights (UAC)",
                false,
                "The executable asks for elevation when started.",
            )?;

        let exclude = self.prompter.text(
            "Packages to exclude",
            Some(""),
            "Packages never followed into the build, e.g. tests or heavy optional dependencies.",
            false,
        )?;
        let exclude = validate::name_tokens(&exclude, self.reporter);
        let copy_dirs = self.prompter.list(
            "Directories to copy next to the executable",
            "Copied into the output directory after a successful build.",
        )?;

        Ok(builder
            .company_name(company)
            .version(version)
            .quiet(quiet)
            .uac_admin(uac_admin)
            .exclude_packages(exclude)
            .copy_dirs(copy_dirs))
    }

    fn packaging_options(&mut self, metadata: &ProjectMetadata) -> Result<LinuxPackageSettings> {
        let mut linux = LinuxPackageSettings {
            enabled: true,
            ..Default::default()
        };

        linux.tool = [PackagingTool::Nfpm, PackagingTool::Fpm][self.prompter.choice(
            "Packaging tool",
            &["nfpm (single binary, recommended)", "fpm (Ruby gem)"],
            0,
            "nfpm installs with `go install`; fpm needs Ruby.",
        )?];
        linux.formats = match self.prompter.choice(
            "Package formats",
            &["deb (Debian, Ubuntu)", "rpm (Fedora, RHEL, openSUSE)", "deb and rpm"],
            0,
            "Building rpm packages needs rpmbuild; deb packages need dpkg-deb with fpm.",
        )? {
            0 => vec![PackageFormat::Deb],
            1 => vec![PackageFormat::Rpm],
            _ => vec![PackageFormat::Deb, PackageFormat::Rpm],
        };
        let arches: Vec<&str> = Arch::ALL.iter().map(|a| a.describe()).collect();
        linux.arch = Arch::ALL[self.prompter.choice(
            "Architecture",
            &arches,
            0,
            "Must match the machine the executable was built for.",
        )?];

        linux.install_path = self.prompter.text(
            "Install directory",
            Some(&linux.install_path),
            "Where the executable is installed on the target system.",
            false,
        )?;
        linux.description = self.prompter.text(
            "Package description",
            Some(metadata.description.as_deref().unwrap_or("")),
            "Empty uses '<application> application'.",
            false,
        )?;
        linux.maintainer = self.prompter.text(
            "Maintainer",
            Some(metadata.author.as_deref().unwrap_or("")),
            "Name <email>. Empty uses the company name.",
            false,
        )?;
        linux.homepage = self.prompter.text(
            "Homepage",
            Some(metadata.homepage.as_deref().unwrap_or("")),
            "Project URL written into the package.",
            false,
        )?;
        let license_default = metadata.license.clone().unwrap_or(linux.license.clone());
        linux.license =
            self.prompter
                .text("License", Some(&license_default), "SPDX identifier, e.g. MIT.", false)?;
        linux.depends = self.prompter.list(
            "Runtime dependencies",
            "Package names required at run time. Empty uses libc6 (deb) / glibc (rpm).",
        )?;

        if self.prompter.confirm(
            "Add an application menu entry",
            false,
            "Installs a .desktop file under /usr/share/applications.",
        )? {
            linux.desktop_name = self.prompter.text(
                "Menu entry name",
                None,
                "Display name shown in the application menu.",
                true,
            )?;
        }
        linux.create_service = self.prompter.confirm(
            "Install a systemd service",
            false,
            "Installs a unit that runs the executable as a long-lived service.",
        )?;
        if linux.create_service {
            linux.service_name = self.prompter.text(
                "Service name",
                Some(""),
                "Unit name without .service. Empty uses the package name.",
                false,
            )?;
        }

        let output = self.prompter.text(
            "Package output directory",
            Some(&linux.output_dir.to_string_lossy()),
            "Where .deb/.rpm files are written.",
            false,
        )?;
        linux.output_dir = PathBuf::from(output);
        Ok(linux)
    }

    fn version(&mut self, metadata: &ProjectMetadata) -> Result<String> {
        let default = metadata
            .version
            .as_deref()
            .filter(|v| validate::version(v, DEFAULT_VERSION).is_accepted())
            .unwrap_or(DEFAULT_VERSION)
            .to_string();
        self.validated(
            "Version",
            Some(&default),
            "Semantic version x.y.z.",
            false,
            |raw| validate::version(raw, &default),
        )
    }

    fn metadata(&mut self, project: &Path) -> ProjectMetadata {
        match load_project_metadata(project) {
            Ok(Some(metadata)) => {
                self.reporter.info("Using defaults from pyproject.toml");
                metadata
            }
            Ok(None) => ProjectMetadata::default(),
            Err(e) => {
                self.reporter
                    .warn(&format!("Ignoring unreadable pyproject.toml: {e}"));
                ProjectMetadata::default()
            }
        }
    }

    /// Asks until `check` accepts the answer.
    fn validated<T>(
        &mut self,
        question: &str,
        default: Option<&str>,
        help: &str,
        required: bool,
        check: impl Fn(&str) -> Validation<T>,
    ) -> Result<T> {
        loop {
            let answer = self.prompter.text(question, default, help, required)?;
            match check(&answer) {
                Validation::Accepted(value) => return Ok(value),
                Validation::Rejected(reason) => self.prompter.note(&reason)?,
            }
        }
    }
}

fn existing_dir(raw: &str, project: &Path) -> Validation<PathBuf> {
    let path = Path::new(raw.trim());
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        project.join(path)
    };
    if resolved.is_dir() {
        Validation::Accepted(resolved)
    } else {
        Validation::Rejected(format!("directory not found: {}", resolved.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::StdinPrompter;
    use crate::report::{Level, RecordingReporter};
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn collect(mode: Mode, project: &Path, answers: &[&str]) -> Result<Configuration> {
        let input = answers.iter().map(|a| format!("{a}\n")).collect::<String>();
        let mut prompter = StdinPrompter::new(Cursor::new(input.into_bytes()), Vec::new());
        let reporter = RecordingReporter::new();
        Collector::new(&mut prompter, &reporter)
            .with_platform(TargetPlatform::Linux)
            .collect(mode, &project.to_string_lossy())
    }

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "print('hi')\n").unwrap();
        tmp
    }

    #[test]
    fn compile_mode_with_defaults() {
        let tmp = project();
        // project, entry, name, icon, backend, compiler, console, output,
        // standalone, onefile, jobs, progress, remove output, plugins,
        // company, version, quiet, exclude, copy dirs, script name
        let answers = [""; 20];
        let config = collect(Mode::Compile, tmp.path(), &answers).unwrap();

        assert_eq!(config.backend(), Backend::Nuitka);
        assert_eq!(config.app_name(), "main");
        assert_eq!(config.output_dir(), "build");
        assert!(config.show_console());
        assert_eq!(config.native().jobs, DEFAULT_JOBS);
        assert_eq!(config.script_filename(), DEFAULT_SCRIPT_NAME);
        assert!(!config.packaging_enabled());
        assert_eq!(config.entry_name(), "main.py");
    }

    #[test]
    fn pyinstaller_answers_are_validated() {
        let tmp = project();
        let answers = [
            "",                        // project
            "",                        // entry
            "viewer",                  // name
            "",                        // icon
            "2",                       // backend
            "n",                       // console
            "dist",                    // output
            "y",                       // onefile
            "requests, bad name",      // hidden imports
            "",                        // collect all
            "assets;assets, broken",   // add data
            "2",                       // upx from PATH
            "",                        // debug
            "",                        // clean
            "ACME",                    // company
            "1.2",                     // version, rejected
            "1.2.0",                   // version
            "",                        // quiet
            "",                        // exclude
            "data",                    // copy dirs
            "make",                    // script name
        ];
        let config = collect(Mode::Compile, tmp.path(), &answers).unwrap();

        assert_eq!(config.backend(), Backend::PyInstaller);
        assert_eq!(config.app_name(), "viewer");
        assert!(!config.show_console());
        assert!(config.bundler().onefile);
        assert_eq!(config.bundler().hidden_imports, vec!["requests"]);
        assert_eq!(config.bundler().add_data.len(), 1);
        assert_eq!(config.bundler().upx, Some(UpxDir::Auto));
        assert_eq!(config.version(), "1.2.0");
        assert_eq!(config.copy_dirs(), ["data"]);
        assert_eq!(config.script_filename(), "make.py");
    }

    #[test]
    fn package_mode_forces_packaging_on() {
        let tmp = TempDir::new().unwrap();
        // name, script, version, tool, formats, arch, install path,
        // description, maintainer, homepage, license, depends, menu entry,
        // service, output dir
        let answers = [
            "", "", "", "", "3", "", "", "", "", "", "", "", "", "", "",
        ];
        let config = collect(Mode::Package, tmp.path(), &answers).unwrap();

        assert_eq!(config.app_name(), DEFAULT_PACKAGE_APP_NAME);
        assert_eq!(config.script_filename(), DEFAULT_PACKAGE_SCRIPT_NAME);
        assert!(config.packaging_enabled());
        assert_eq!(
            config.linux().formats,
            vec![PackageFormat::Deb, PackageFormat::Rpm]
        );
        assert_eq!(config.linux().license, "MIT");
    }

    #[test]
    fn pyproject_seeds_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("pyproject.toml"),
            "[project]\nname = \"tool\"\nversion = \"0.4.0\"\nlicense = \"Apache-2.0\"\n",
        )
        .unwrap();
        let answers = [""; 15];
        let config = collect(Mode::Package, tmp.path(), &answers).unwrap();

        assert_eq!(config.app_name(), "tool");
        assert_eq!(config.version(), "0.4.0");
        assert_eq!(config.linux().license, "Apache-2.0");
    }

    #[test]
    fn running_out_of_answers_cancels() {
        let tmp = project();
        let err = collect(Mode::Full, tmp.path(), &["", ""]).unwrap_err();
        assert!(matches!(err, crate::error::Error::Cancelled));
    }

    #[test]
    fn invalid_plugins_warn_through_reporter() {
        let tmp = project();
        let mut answers = vec![""; 20];
        answers[13] = "1, not valid!";
        let input = answers.iter().map(|a| format!("{a}\n")).collect::<String>();
        let mut prompter = StdinPrompter::new(Cursor::new(input.into_bytes()), Vec::new());
        let reporter = RecordingReporter::new();
        let config = Collector::new(&mut prompter, &reporter)
            .with_platform(TargetPlatform::Linux)
            .collect(Mode::Compile, &tmp.path().to_string_lossy())
            .unwrap();

        assert_eq!(config.native().plugins, vec!["pyqt5"]);
        assert_eq!(reporter.at(Level::Warn).len(), 1);
    }
}
