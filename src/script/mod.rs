//! Script synthesizer.
//!
//! Turns a [`Configuration`] and its compiled argument list into a standalone
//! Python build script. A script is an ordered list of named [`Section`]s,
//! each rendered from a handlebars template with escaping disabled; every
//! configuration value is inlined as a Python literal, so the output has no
//! runtime dependency on this crate.
//!
//! ```text
//! header, logging, tool_probe, discovery, environment   shared prelude
//! backend_check, dependency_check                      per backend
//! copy_helper, exit_status, cleanup, [packaging]
//! main_prologue, parameters, epilogue                  fn main()
//! footer
//! ```

mod literal;
mod packaging;
mod templates;
mod version_file;

pub use literal::{py_bool, py_dict, py_list, py_list_block, py_opt_str, py_str};
pub use packaging::EXECUTABLE_PLACEHOLDER;
pub use version_file::{VERSION_FILE_NAME, pad_version, render_version_file};

use crate::config::{Backend, Configuration};
use crate::env::{MIN_PYTHON, PROBE_TIMEOUT, PYTHON_MANAGERS};
use crate::error::Result;
use crate::package::{EXCLUDED_EXTENSIONS, PackagePlan, SEARCH_DIRS, SUPPORT_ARCHIVE};
use crate::requirements::{Category, Requirements};
use handlebars::Handlebars;
use serde_json::{Value, json};

/// One named, rendered piece of a generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: &'static str,
    pub body: String,
    /// Continues the previous section's function body instead of starting a
    /// new top-level block.
    pub continuation: bool,
}

/// A generated script as an ordered list of sections.
#[derive(Debug, Clone, Default)]
pub struct Script {
    sections: Vec<Section>,
}

impl Script {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_names(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.name).collect()
    }

    /// Section body by name.
    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.body.as_str())
    }

    /// Full script text.
    pub fn source(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push_str(if section.continuation { "\n\n" } else { "\n\n\n" });
            }
            out.push_str(section.body.trim_end());
        }
        out.push('\n');
        out
    }
}

/// Template registry plus the section list being assembled.
struct Composer {
    handlebars: Handlebars<'static>,
    script: Script,
}

impl Composer {
    fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        for (name, template) in [
            ("header", templates::HEADER),
            ("logging", templates::LOGGING),
            ("tool_probe", templates::TOOL_PROBE),
            ("discovery", templates::DISCOVERY),
            ("environment", templates::ENVIRONMENT),
            ("native_check", templates::NATIVE_CHECK),
            ("bundler_check", templates::BUNDLER_CHECK),
            ("dependency_check", templates::DEPENDENCY_CHECK),
            ("copy_helper", templates::COPY_HELPER),
            ("exit_status", templates::EXIT_STATUS),
            ("native_cleanup", templates::NATIVE_CLEANUP),
            ("bundler_cleanup", templates::BUNDLER_CLEANUP),
            ("packaging", templates::PACKAGING),
            ("main_prologue", templates::MAIN_PROLOGUE),
            ("native_parameters", templates::NATIVE_PARAMETERS),
            ("bundler_parameters", templates::BUNDLER_PARAMETERS),
            ("epilogue", templates::EPILOGUE),
            ("package_main", templates::PACKAGE_MAIN),
            ("footer", templates::FOOTER),
        ] {
            handlebars.register_template_string(name, template)?;
        }
        Ok(Self {
            handlebars,
            script: Script::default(),
        })
    }

    fn push(&mut self, name: &'static str, template: &str, data: &Value) -> Result<()> {
        self.push_section(name, template, data, false)
    }

    fn continue_with(&mut self, name: &'static str, template: &str, data: &Value) -> Result<()> {
        self.push_section(name, template, data, true)
    }

    fn push_section(
        &mut self,
        name: &'static str,
        template: &str,
        data: &Value,
        continuation: bool,
    ) -> Result<()> {
        let body = self.handlebars.render(template, data)?;
        self.script.sections.push(Section {
            name,
            body,
            continuation,
        });
        Ok(())
    }

    /// Header, logging, tool probe and executable discovery.
    fn prelude(&mut self, description: &str, entry_name: &str) -> Result<()> {
        let header = json!({
            "description": description,
            "generator": py_str(&format!("pyforge {}", env!("CARGO_PKG_VERSION"))),
            "generated_at": py_str(&chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            "entry_name": py_str(entry_name),
        });
        self.push("header", "header", &header)?;
        self.push("logging", "logging", &Value::Null)?;
        self.push(
            "tool_probe",
            "tool_probe",
            &json!({ "probe_timeout": PROBE_TIMEOUT.as_secs() }),
        )?;
        self.push(
            "discovery",
            "discovery",
            &json!({
                "search_dirs": py_list(SEARCH_DIRS),
                "excluded_extensions": py_list(EXCLUDED_EXTENSIONS),
                "support_archive": py_str(SUPPORT_ARCHIVE),
            }),
        )
    }

    fn finish(self) -> Script {
        self.script
    }
}

/// Renders the build script for `backend`.
///
/// `args` is the compiled argument vector (see [`crate::args::compile_args`])
/// and is embedded verbatim. When packaging is enabled in `config`, the Linux
/// packaging section is embedded and run after a successful build.
///
/// # Errors
///
/// [`crate::error::ConfigurationError::MissingAppName`] if packaging is
/// enabled without an application name, or a template error.
pub fn render(
    backend: Backend,
    args: &[String],
    requirements: &Requirements,
    config: &Configuration,
) -> Result<String> {
    Ok(compose(backend, args, requirements, config)?.source())
}

/// Like [`render`], but keeps the section structure.
pub fn compose(
    backend: Backend,
    args: &[String],
    requirements: &Requirements,
    config: &Configuration,
) -> Result<Script> {
    let plan = if config.packaging_enabled() {
        Some(PackagePlan::from_config(config)?)
    } else {
        None
    };
    let packaging = plan.is_some();

    let mut composer = Composer::new()?;
    composer.prelude(
        &format!("{} build script generated by pyforge.", backend.display_name()),
        &config.entry_name(),
    )?;
    composer.push(
        "environment",
        "environment",
        &json!({
            "python_managers": py_list(PYTHON_MANAGERS),
            "min_python_major": MIN_PYTHON.0,
            "min_python_minor": MIN_PYTHON.1,
        }),
    )?;

    let check = match backend {
        Backend::Nuitka => "native_check",
        Backend::PyInstaller => "bundler_check",
    };
    composer.push("backend_check", check, &Value::Null)?;

    let required_tools = py_dict(
        Category::ALL
            .iter()
            .map(|c| (c.key(), py_list(requirements.tools(*c)))),
    );
    composer.push(
        "dependency_check",
        "dependency_check",
        &json!({ "required_tools": required_tools, "packaging": packaging }),
    )?;

    composer.push(
        "copy_helper",
        "copy_helper",
        &json!({
            "output_dir": py_str(config.output_dir()),
            "copy_dirs": py_list(config.copy_dirs()),
        }),
    )?;
    composer.push("exit_status", "exit_status", &Value::Null)?;

    match backend {
        Backend::Nuitka => composer.push("cleanup", "native_cleanup", &Value::Null)?,
        Backend::PyInstaller => composer.push(
            "cleanup",
            "bundler_cleanup",
            &json!({
                "work_dir": py_str(&bundler_work_dir(config)),
                "spec_file": py_str(&format!("{}.spec", spec_stem(config))),
            }),
        )?,
    }

    if let Some(plan) = &plan {
        composer.push("packaging", "packaging", &packaging::packaging_data(plan)?)?;
    }

    composer.push(
        "main_prologue",
        "main_prologue",
        &json!({ "backend_name": py_str(backend.display_name()) }),
    )?;
    match backend {
        Backend::Nuitka => {
            composer.continue_with("parameters", "native_parameters", &native_parameters(args, config))?
        }
        Backend::PyInstaller => composer.continue_with(
            "parameters",
            "bundler_parameters",
            &bundler_parameters(args, config)?,
        )?,
    }
    composer.continue_with("epilogue", "epilogue", &json!({ "packaging": packaging }))?;
    composer.push("footer", "footer", &Value::Null)?;

    Ok(composer.finish())
}

/// Renders the standalone packaging-only script.
///
/// The script locates an executable in `build/` or `dist/` (or takes one as
/// its first argument) and builds every configured package format.
pub fn render_package_script(config: &Configuration) -> Result<String> {
    Ok(compose_package_script(config)?.source())
}

pub fn compose_package_script(config: &Configuration) -> Result<Script> {
    let plan = PackagePlan::from_config(config)?;

    let mut composer = Composer::new()?;
    composer.prelude(
        "Linux packaging script generated by pyforge.",
        &config.entry_name(),
    )?;
    composer.push("packaging", "packaging", &packaging::packaging_data(&plan)?)?;
    composer.push("package_main", "package_main", &Value::Null)?;
    composer.push("footer", "footer", &Value::Null)?;
    Ok(composer.finish())
}

fn native_parameters(args: &[String], config: &Configuration) -> Value {
    let native = config.native();
    let layout = if native.effective_onefile() {
        "standalone, single file"
    } else if native.standalone {
        "standalone"
    } else {
        "module (requires Python on the target)"
    };
    json!({
        "app_name": py_str(config.app_name()),
        "toolchain": py_str(native.toolchain.as_str()),
        "layout": py_str(layout),
        "jobs": py_str(&native.jobs.to_string()),
        "console": py_str(console_label(config)),
        "args": py_list_block(args, 4),
    })
}

fn bundler_parameters(args: &[String], config: &Configuration) -> Result<Value> {
    let layout = if config.bundler().onefile { "onefile" } else { "onedir" };
    let version_info = if config.platform().supports_resource_metadata() {
        Some(py_str(&render_version_file(config)?))
    } else {
        None
    };
    Ok(json!({
        "app_name": py_str(config.app_name()),
        "layout": py_str(layout),
        "console": py_str(console_label(config)),
        "version_file": py_str(VERSION_FILE_NAME),
        "version_info": version_info,
        "args": py_list_block(args, 4),
    }))
}

fn console_label(config: &Configuration) -> &'static str {
    if config.show_console() { "shown" } else { "hidden" }
}

/// Work directory passed as `--workpath`, or PyInstaller's own default.
fn bundler_work_dir(config: &Configuration) -> String {
    if config.output_dir().is_empty() {
        "build".to_string()
    } else {
        config.work_dir()
    }
}

/// PyInstaller names its `.spec` after `--name`, else after the entry file.
fn spec_stem(config: &Configuration) -> String {
    if !config.app_name().is_empty() {
        return config.app_name().to_string();
    }
    config
        .entry_file()
        .map(Configuration::default_app_name)
        .unwrap_or_default()
}
