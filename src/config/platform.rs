//! Target operating system for generated arguments.

use std::fmt;

/// Operating system the generated script is meant to run on.
///
/// Several native-compiler flags (toolchain selection, resource metadata,
/// administrator manifest) only exist on Windows, so argument compilation is
/// parameterised on this value instead of reading `cfg!` directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TargetPlatform {
    Windows,
    Linux,
    MacOs,
}

impl TargetPlatform {
    /// Platform of the machine running the generator.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            TargetPlatform::Windows
        } else if cfg!(target_os = "macos") {
            TargetPlatform::MacOs
        } else {
            TargetPlatform::Linux
        }
    }

    /// Whether executables carry embedded resource metadata (company, version, UAC).
    pub fn supports_resource_metadata(self) -> bool {
        matches!(self, TargetPlatform::Windows)
    }

    /// Whether the administrator-privilege request is meaningful.
    pub fn supports_admin_request(self) -> bool {
        matches!(self, TargetPlatform::Windows)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetPlatform::Windows => "Windows",
            TargetPlatform::Linux => "Linux",
            TargetPlatform::MacOs => "macOS",
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
