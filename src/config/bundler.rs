//! PyInstaller-specific settings.

use std::fmt;
use std::path::PathBuf;

/// Where PyInstaller should look for UPX.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UpxDir {
    /// Let PyInstaller discover UPX on `PATH`.
    Auto,
    /// Explicit directory containing the `upx` binary.
    Path(PathBuf),
}

/// One `--add-data` mapping: a source path and the destination folder inside the bundle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataMapping {
    pub source: String,
    pub destination: String,
}

impl DataMapping {
    /// Parses `source;destination`. Both halves must be non-empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let (source, destination) = raw.trim().split_once(';')?;
        let (source, destination) = (source.trim(), destination.trim());
        if source.is_empty() || destination.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            destination: destination.to_string(),
        })
    }
}

impl fmt::Display for DataMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.source, self.destination)
    }
}

/// Options consulted only when the backend is [`Backend::PyInstaller`](super::Backend::PyInstaller).
#[derive(Clone, Debug)]
pub struct BundlerSettings {
    /// Single-file bundle when true, one-directory bundle otherwise.
    pub onefile: bool,

    /// Modules PyInstaller's analysis cannot see.
    pub hidden_imports: Vec<String>,

    /// Packages whose submodules, data and binaries are all collected.
    pub collect_all: Vec<String>,

    /// Extra data files.
    pub add_data: Vec<DataMapping>,

    /// UPX compression. `None` leaves PyInstaller's default behaviour.
    pub upx: Option<UpxDir>,

    /// Verbose bootloader/build logging.
    pub debug: bool,

    /// Clear PyInstaller's cache before building.
    ///
    /// Default: true
    pub clean: bool,
}

impl Default for BundlerSettings {
    fn default() -> Self {
        Self {
            onefile: false,
            hidden_imports: Vec::new(),
            collect_all: Vec::new(),
            add_data: Vec::new(),
            upx: None,
            debug: false,
            clean: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_mapping_requires_both_halves() {
        assert_eq!(
            DataMapping::parse("data/config.ini;data"),
            Some(DataMapping {
                source: "data/config.ini".into(),
                destination: "data".into()
            })
        );
        assert_eq!(DataMapping::parse("data/config.ini"), None);
        assert_eq!(DataMapping::parse(";data"), None);
        assert_eq!(DataMapping::parse("src;"), None);
    }

    #[test]
    fn data_mapping_displays_as_pair() {
        let m = DataMapping::parse(" assets/logo.png ; assets ").unwrap();
        assert_eq!(m.to_string(), "assets/logo.png;assets");
    }
}
