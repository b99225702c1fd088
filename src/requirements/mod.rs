//! Requirement analyzer.
//!
//! Derives, from a [`Configuration`], which external tools the generated
//! script needs at run time. Pure derivation: nothing is probed here, see
//! [`crate::env`] for presence checks.

use crate::config::{Backend, Configuration, PackageFormat};
use std::fmt;

/// Requirement category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// The compilation backend itself.
    BuildTools,
    /// Cross-platform system compiler used by the native backend.
    SystemTools,
    /// Linux packaging tool.
    PackageTools,
    /// Per-format package build tools.
    PackageFormats,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::BuildTools,
        Category::SystemTools,
        Category::PackageTools,
        Category::PackageFormats,
    ];

    /// Identifier used in generated scripts.
    pub fn key(self) -> &'static str {
        match self {
            Category::BuildTools => "build_tools",
            Category::SystemTools => "system_tools",
            Category::PackageTools => "package_tools",
            Category::PackageFormats => "package_formats",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::BuildTools => "Build tools",
            Category::SystemTools => "System tools",
            Category::PackageTools => "Packaging tools",
            Category::PackageFormats => "Package formats",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// External tools a configuration needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requirements {
    build_tools: Vec<&'static str>,
    system_tools: Vec<&'static str>,
    package_tools: Vec<&'static str>,
    formats: Vec<PackageFormat>,
}

/// Derives the requirement set for `config`.
///
/// # Examples
///
/// ```
/// use pyforge::config::{Backend, ConfigurationBuilder};
/// use pyforge::requirements::{analyze, Category};
///
/// let config = ConfigurationBuilder::new().backend(Backend::PyInstaller).build();
/// let reqs = analyze(&config);
/// assert_eq!(reqs.tools(Category::BuildTools), vec!["pyinstaller"]);
/// assert!(reqs.tools(Category::PackageTools).is_empty());
/// ```
pub fn analyze(config: &Configuration) -> Requirements {
    let mut reqs = Requirements {
        build_tools: vec![config.backend().command()],
        ..Default::default()
    };

    if config.backend() == Backend::Nuitka && config.native().toolchain.is_cross_platform() {
        reqs.system_tools.push(config.native().toolchain.as_str());
    }

    if config.packaging_enabled() {
        let linux = config.linux();
        reqs.package_tools.push(linux.tool.command());
        for format in &linux.formats {
            if !reqs.formats.contains(format) {
                reqs.formats.push(*format);
            }
        }
    }

    reqs
}

impl Requirements {
    /// Tool identifiers in one category, in derivation order.
    pub fn tools(&self, category: Category) -> Vec<&'static str> {
        match category {
            Category::BuildTools => self.build_tools.clone(),
            Category::SystemTools => self.system_tools.clone(),
            Category::PackageTools => self.package_tools.clone(),
            Category::PackageFormats => self.formats.iter().map(|f| f.build_tool()).collect(),
        }
    }

    /// Requested package formats.
    pub fn formats(&self) -> &[PackageFormat] {
        &self.formats
    }

    /// Every (category, tool) pair, categories in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &'static str)> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.tools(c).into_iter().map(move |t| (c, t)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// One-line summary for the user.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        for (category, values) in [
            (Category::BuildTools, self.build_tools.join(", ")),
            (Category::SystemTools, self.system_tools.join(", ")),
            (Category::PackageTools, self.package_tools.join(", ")),
            (
                Category::PackageFormats,
                self.formats
                    .iter()
                    .map(|f| f.extension().to_uppercase())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        ] {
            if !values.is_empty() {
                parts.push(format!("{category}: {values}"));
            }
        }

        if parts.is_empty() {
            "No additional tools required".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CompilerToolchain, ConfigurationBuilder, LinuxPackageSettings, NativeSettings,
        PackagingTool,
    };

    #[test]
    fn native_with_clang_needs_clang() {
        let config = ConfigurationBuilder::new().build();
        let reqs = analyze(&config);
        assert_eq!(reqs.tools(Category::BuildTools), vec!["nuitka"]);
        assert_eq!(reqs.tools(Category::SystemTools), vec!["clang"]);
        assert!(reqs.tools(Category::PackageFormats).is_empty());
    }

    #[test]
    fn platform_toolchains_are_not_flagged() {
        for toolchain in [CompilerToolchain::MinGw64, CompilerToolchain::Msvc] {
            let config = ConfigurationBuilder::new()
                .native(NativeSettings {
                    toolchain,
                    ..Default::default()
                })
                .build();
            assert!(analyze(&config).tools(Category::SystemTools).is_empty());
        }
    }

    #[test]
    fn packaging_adds_tool_and_format_builders() {
        let config = ConfigurationBuilder::new()
            .backend(Backend::PyInstaller)
            .linux(LinuxPackageSettings {
                enabled: true,
                tool: PackagingTool::Fpm,
                formats: vec![PackageFormat::Deb, PackageFormat::Rpm],
                ..Default::default()
            })
            .build();
        let reqs = analyze(&config);

        assert_eq!(reqs.tools(Category::PackageTools), vec!["fpm"]);
        assert_eq!(
            reqs.tools(Category::PackageFormats),
            vec!["dpkg-deb", "rpmbuild"]
        );
        assert_eq!(
            reqs.summary(),
            "Build tools: pyinstaller | Packaging tools: fpm | Package formats: DEB, RPM"
        );
        assert_eq!(reqs.iter().count(), 4);
    }

    #[test]
    fn disabled_packaging_ignores_formats() {
        let config = ConfigurationBuilder::new()
            .linux(LinuxPackageSettings {
                enabled: false,
                formats: vec![PackageFormat::Rpm],
                ..Default::default()
            })
            .build();
        let reqs = analyze(&config);
        assert!(reqs.tools(Category::PackageTools).is_empty());
        assert!(reqs.formats().is_empty());
    }

    #[test]
    fn empty_requirements_summary() {
        assert_eq!(Requirements::default().summary(), "No additional tools required");
        assert!(Requirements::default().is_empty());
    }
}
