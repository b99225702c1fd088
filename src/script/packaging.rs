//! Template data for the Linux packaging section embedded in generated scripts.
//!
//! Everything comes from the same [`PackagePlan`] the in-process packager
//! uses, so a generated script builds exactly what `pyforge` itself would.
//! The executable path is only known when the script runs, so manifests and
//! commands carry [`EXECUTABLE_PLACEHOLDER`] in its place.

use super::literal::{py_dict, py_list, py_opt_str, py_str};
use crate::config::{PackagingTool, TargetPlatform};
use crate::env::install_hint;
use crate::error::Result;
use crate::package::{PackagePlan, path_string};
use serde_json::{Value, json};

/// Stand-in for the executable path, substituted by the script at run time.
pub const EXECUTABLE_PLACEHOLDER: &str = "@@EXECUTABLE@@";

/// Where `go install` puts binaries besides `$GOPATH/bin`.
const GO_BIN_DIRS: &[&str] = &["~/go/bin", "/usr/local/go/bin"];

pub(super) fn packaging_data(plan: &PackagePlan) -> Result<Value> {
    let tool = plan.tool;
    let manifest_file = path_string(&plan.manifest_path());

    let manifest = match tool {
        PackagingTool::Nfpm => Some(plan.manifest(EXECUTABLE_PLACEHOLDER).to_yaml()?),
        PackagingTool::Fpm => None,
    };

    let files = py_dict(
        plan.formats
            .iter()
            .map(|f| (f.extension(), py_str(&plan.artifact_name(*f)))),
    );
    let build_tools = py_dict(
        plan.formats
            .iter()
            .map(|f| (f.extension(), py_str(f.build_tool()))),
    );
    let commands = plan
        .formats
        .iter()
        .map(|f| {
            let command = plan.command(tool.command(), *f, EXECUTABLE_PLACEHOLDER, &manifest_file);
            let mut argv = vec![command.program];
            argv.extend(command.args);
            format!("    {}: {},", py_str(f.extension()), py_list(argv))
        })
        .collect::<Vec<_>>();

    Ok(json!({
        "name": py_str(&plan.name),
        "version": py_str(&plan.version),
        "tool": py_str(tool.command()),
        "tool_version_arg": py_str(tool.version_arg()),
        "tool_hint": py_str(&install_hint(tool.command(), TargetPlatform::Linux, None)),
        "output_dir": py_str(&path_string(&plan.output_dir)),
        "formats": py_list(plan.formats.iter().map(|f| f.extension())),
        "files": files,
        "build_tools": build_tools,
        "commands": format!("{{\n{}\n}}", commands.join("\n")),
        "go_bin_dirs": py_list(GO_BIN_DIRS),
        "manifest_file": match tool {
            PackagingTool::Nfpm => py_str(&manifest_file),
            PackagingTool::Fpm => "None".to_string(),
        },
        "manifest": py_opt_str(manifest.as_deref()),
        "placeholder": py_str(EXECUTABLE_PLACEHOLDER),
    }))
}
