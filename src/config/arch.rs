//! Package architecture types.

use std::fmt;
use std::str::FromStr;

/// Architecture recorded in generated Linux packages.
///
/// Values use Debian naming, which is also what nfpm expects in its
/// configuration file.
///
/// # Examples
///
/// ```
/// use pyforge::config::Arch;
///
/// let arch: Arch = "arm64".parse().unwrap();
/// assert_eq!(arch.as_str(), "arm64");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit Intel/AMD
    #[default]
    Amd64,
    /// 64-bit ARM
    Arm64,
    /// Architecture independent
    All,
}

impl Arch {
    pub const ALL: [Arch; 3] = [Arch::Amd64, Arch::Arm64, Arch::All];

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
            Arch::All => "all",
        }
    }

    /// Human readable label for menus.
    pub fn describe(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64 (64-bit Intel/AMD)",
            Arch::Arm64 => "arm64 (64-bit ARM)",
            Arch::All => "all (architecture independent)",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amd64" | "x86_64" => Ok(Arch::Amd64),
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            "all" | "noarch" => Ok(Arch::All),
            other => Err(format!("unsupported architecture: {other}")),
        }
    }
}
