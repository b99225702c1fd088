//! Package manifest in nfpm's YAML format.

use crate::config::{Arch, PackageFormat};
use crate::error::Result;
use handlebars::Handlebars;
use serde_json::json;

const MANIFEST_TEMPLATE: &str = r#"name: {{name}}
arch: {{arch}}
platform: linux
version: {{version}}
section: utils
priority: optional
maintainer: {{maintainer}}
description: {{description}}
vendor: {{vendor}}
homepage: {{homepage}}
license: {{license}}

contents:
{{#each contents}}
  - dst: {{dst}}
{{#if src}}
    src: {{src}}
{{/if}}
{{#if config}}
    type: config
{{/if}}
    file_info:
      mode: {{mode}}
{{#if content}}
    content: |
{{content}}
{{/if}}
{{/each}}

overrides:
{{#each overrides}}
  {{format}}:
    depends:
{{#each depends}}
      - {{this}}
{{/each}}
{{/each}}
"#;

/// Indentation of embedded file content inside a `content: |` block.
const CONTENT_INDENT: &str = "      ";

/// One file placed into the package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentEntry {
    /// Source file on the build machine; `None` for inline content.
    pub src: Option<String>,
    /// Absolute destination on the target system.
    pub dst: String,
    /// Marked as a configuration file (preserved on upgrade).
    pub config: bool,
    /// Octal permission mode.
    pub mode: &'static str,
    /// Inline file content.
    pub content: Option<String>,
}

/// Declarative package description consumed by the packaging tool.
#[derive(Clone, Debug)]
pub struct Manifest {
    pub name: String,
    pub arch: Arch,
    pub version: String,
    pub maintainer: String,
    pub vendor: String,
    pub description: String,
    pub homepage: String,
    pub license: String,
    pub contents: Vec<ContentEntry>,
    /// Runtime dependencies per format.
    pub overrides: Vec<(PackageFormat, Vec<String>)>,
}

impl Manifest {
    /// Renders the manifest as nfpm YAML.
    ///
    /// Free-text values are emitted as double-quoted scalars; names, versions
    /// and architectures are already restricted to plain-scalar characters.
    pub fn to_yaml(&self) -> Result<String> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_template_string("nfpm.yaml", MANIFEST_TEMPLATE)?;

        let contents: Vec<_> = self
            .contents
            .iter()
            .map(|entry| {
                json!({
                    "dst": quote(&entry.dst),
                    "src": entry.src.as_deref().map(quote),
                    "config": entry.config,
                    "mode": entry.mode,
                    "content": entry.content.as_deref().map(indent_block),
                })
            })
            .collect();

        let overrides: Vec<_> = self
            .overrides
            .iter()
            .map(|(format, depends)| {
                json!({
                    "format": format.extension(),
                    "depends": depends.iter().map(|d| quote(d)).collect::<Vec<_>>(),
                })
            })
            .collect();

        let data = json!({
            "name": self.name,
            "arch": self.arch.as_str(),
            "version": self.version,
            "maintainer": quote(&self.maintainer),
            "description": quote(&self.description),
            "vendor": quote(&self.vendor),
            "homepage": quote(&self.homepage),
            "license": quote(&self.license),
            "contents": contents,
            "overrides": overrides,
        });

        Ok(handlebars.render("nfpm.yaml", &data)?)
    }
}

/// `.desktop` entry for the application menu.
pub fn desktop_entry(display_name: &str, exec: &str, icon: &str) -> String {
    format!(
        "[Desktop Entry]\n\
         Version=1.0\n\
         Type=Application\n\
         Name={display_name}\n\
         Exec={exec}\n\
         Icon={icon}\n\
         Terminal=false\n\
         Categories=Utility;\n"
    )
}

/// systemd unit running the installed executable.
pub fn service_unit(description: &str, exec: &str) -> String {
    format!(
        "[Unit]\n\
         Description={description}\n\
         After=network.target\n\
         \n\
         [Service]\n\
         Type=simple\n\
         ExecStart={exec}\n\
         Restart=always\n\
         User=nobody\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n"
    )
}

/// YAML double-quoted scalar. JSON string syntax is a subset of it.
fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{CONTENT_INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
