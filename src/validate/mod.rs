//! Input validators.
//!
//! Every validator takes a raw candidate (and the validated project root where
//! a path is involved) and returns a [`Validation`]. Rejection is an ordinary
//! value so the prompt layer can ask again; nothing here returns `Err`.
//!
//! Batch validators (comma-separated names, add-data mappings) drop bad items
//! individually and report them through the injected [`Reporter`].

use crate::config::DataMapping;
use crate::report::Reporter;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Source-code extension of entry files and generated scripts.
pub const SOURCE_EXTENSION: &str = ".py";

/// Icon format accepted by both backends.
pub const ICON_EXTENSION: &str = "ico";

/// Raster formats rejected with a conversion hint.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Outcome of validating one candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T> {
    /// The value passed, normalized.
    Accepted(T),
    /// The value failed; the reason is meant for the user.
    Rejected(String),
}

impl<T> Validation<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted(_))
    }

    /// Reason for rejection, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Validation::Accepted(_) => None,
            Validation::Rejected(reason) => Some(reason),
        }
    }

    /// Converts into a `Result` with the rejection reason as the error.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Validation::Accepted(value) => Ok(value),
            Validation::Rejected(reason) => Err(reason),
        }
    }

    fn reject(reason: impl Into<String>) -> Self {
        Validation::Rejected(reason.into())
    }
}

/// Project directory: must exist and be a directory. Returns the canonical path.
pub fn project_dir(raw: &str) -> Validation<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Validation::reject("project directory must not be empty");
    }

    let path = Path::new(raw);
    if !path.exists() {
        return Validation::reject(format!("directory does not exist: {raw}"));
    }
    if !path.is_dir() {
        return Validation::reject(format!("not a directory: {raw}"));
    }

    match path.canonicalize() {
        Ok(resolved) => Validation::Accepted(resolved),
        Err(e) => Validation::reject(format!("cannot resolve {raw}: {e}")),
    }
}

/// Entry file: absolute, or relative to `project`. Must exist, be a `.py`
/// file and live under `project`. Returns the canonical path.
pub fn entry_file(raw: &str, project: &Path) -> Validation<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Validation::reject("entry file must not be empty");
    }

    let path = match resolve_against(raw, project) {
        Ok(path) => path,
        Err(reason) => return Validation::Rejected(reason),
    };

    if !path.exists() {
        return Validation::reject(format!("file not found: {}", path.display()));
    }
    if !has_extension(&path, SOURCE_EXTENSION.trim_start_matches('.')) {
        return Validation::reject(format!(
            "entry file must be a Python source file ({SOURCE_EXTENSION})"
        ));
    }

    let resolved = match path.canonicalize() {
        Ok(resolved) => resolved,
        Err(e) => return Validation::reject(format!("cannot resolve {raw}: {e}")),
    };
    let root = project.canonicalize().unwrap_or_else(|_| project.to_path_buf());
    if !resolved.starts_with(&root) {
        return Validation::reject(format!(
            "entry file must be inside the project directory {}",
            root.display()
        ));
    }

    Validation::Accepted(resolved)
}

/// Icon file. Empty input is accepted as "no icon".
///
/// The accepted path is relative to `project` when the icon lives under it,
/// absolute otherwise.
pub fn icon_file(raw: &str, project: &Path) -> Validation<Option<PathBuf>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Validation::Accepted(None);
    }

    let path = match resolve_against(raw, project) {
        Ok(path) => path,
        Err(reason) => return Validation::Rejected(reason),
    };

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if RASTER_EXTENSIONS.contains(&extension.as_str()) {
        return Validation::reject(format!(
            "only .{ICON_EXTENSION} icons are supported; convert {raw} to .{ICON_EXTENSION} first"
        ));
    }
    if !path.exists() {
        return Validation::reject(format!("icon file not found: {}", path.display()));
    }
    if extension != ICON_EXTENSION {
        return Validation::reject(format!("only .{ICON_EXTENSION} icons are supported"));
    }

    let stored = match path.strip_prefix(project) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path,
    };
    Validation::Accepted(Some(stored))
}

/// Positive integer. Empty input yields `default`.
pub fn positive_integer(raw: &str, default: u32) -> Validation<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Validation::Accepted(default);
    }

    match raw.parse::<i64>() {
        Ok(n) if n > 0 => match u32::try_from(n) {
            Ok(n) => Validation::Accepted(n),
            Err(_) => Validation::reject(format!("{raw} is too large")),
        },
        Ok(_) => Validation::reject("value must be greater than zero"),
        Err(_) => Validation::reject(format!("{raw} is not a number")),
    }
}

/// Version string of the form `x.y.z` with numeric parts. Empty yields `default`.
///
/// Leading zeros are accepted and dropped: `01.2.3` becomes `1.2.3`.
pub fn version(raw: &str, default: &str) -> Validation<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Validation::Accepted(default.to_string());
    }

    let parts: Option<Vec<u64>> = raw
        .split('.')
        .map(|part| {
            if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse().ok()
            } else {
                None
            }
        })
        .collect();
    match parts.as_deref() {
        Some(&[major, minor, patch]) => {
            Validation::Accepted(semver::Version::new(major, minor, patch).to_string())
        }
        _ => Validation::reject(format!("{raw} is not a version of the form x.y.z")),
    }
}

/// Script file name. Never rejects: empty becomes `build.py`, and `.py` is
/// appended when missing.
pub fn script_filename(raw: &str) -> String {
    script_filename_or(raw, crate::config::DEFAULT_SCRIPT_NAME)
}

/// Like [`script_filename`] with a caller-chosen default.
pub fn script_filename_or(raw: &str, default: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return default.to_string();
    }
    if raw.ends_with(SOURCE_EXTENSION) {
        raw.to_string()
    } else {
        format!("{raw}{SOURCE_EXTENSION}")
    }
}

/// Whether `token` is alphanumeric once hyphens, underscores and dots are removed.
pub fn is_name_token(token: &str) -> bool {
    let stripped: String = token
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '.'))
        .collect();
    !stripped.is_empty() && stripped.chars().all(char::is_alphanumeric)
}

/// Splits a comma-separated list, keeping name-like tokens in order.
///
/// Invalid tokens are dropped with a warning; the rest of the batch proceeds.
pub fn name_tokens(raw: &str, reporter: &dyn Reporter) -> Vec<String> {
    split_list(raw)
        .filter(|token| {
            let ok = is_name_token(token);
            if !ok {
                reporter.warn(&format!("skipping invalid name: {token}"));
            }
            ok
        })
        .map(str::to_string)
        .collect()
}

/// Splits a comma-separated list of `source;destination` mappings.
///
/// Malformed entries are dropped with a warning.
pub fn data_mappings(raw: &str, reporter: &dyn Reporter) -> Vec<DataMapping> {
    split_list(raw)
        .filter_map(|entry| {
            let mapping = DataMapping::parse(entry);
            if mapping.is_none() {
                reporter.warn(&format!(
                    "skipping malformed data entry (expected source;destination): {entry}"
                ));
            }
            mapping
        })
        .collect()
}

/// Comma-separated list with blank items removed.
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn resolve_against(raw: &str, project: &Path) -> std::result::Result<PathBuf, String> {
    let candidate = Path::new(raw);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        project.join(candidate)
    };
    joined
        .absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| format!("invalid path {raw}: {e}"))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy() == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Level, RecordingReporter};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn project_dir_requires_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(!project_dir("").is_accepted());
        assert!(!project_dir(file.to_str().unwrap()).is_accepted());
        assert!(
            !project_dir(tmp.path().join("missing").to_str().unwrap()).is_accepted()
        );
        assert_eq!(
            project_dir(tmp.path().to_str().unwrap()),
            Validation::Accepted(tmp.path().canonicalize().unwrap())
        );
    }

    #[test]
    fn entry_file_resolves_relative_to_project() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "print('hi')").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();

        match entry_file("main.py", tmp.path()) {
            Validation::Accepted(path) => {
                assert!(path.is_absolute());
                assert!(path.ends_with("main.py"));
            }
            other => panic!("unexpected {other:?}"),
        }

        let rejected = entry_file("notes.txt", tmp.path());
        assert!(rejected.reason().unwrap().contains(".py"));
        assert!(entry_file("absent.py", tmp.path())
            .reason()
            .unwrap()
            .contains("not found"));
    }

    #[test]
    fn entry_file_outside_project_is_asked_again() {
        let project = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let outside = elsewhere.path().join("run.py");
        fs::write(&outside, "").unwrap();

        let rejected = entry_file(outside.to_str().unwrap(), project.path());
        assert!(rejected.reason().unwrap().contains("inside the project"));

        let sub = project.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(project.path().join("run.py"), "").unwrap();
        let escaped = entry_file("../run.py", &sub);
        assert!(escaped.reason().unwrap().contains("inside the project"));
    }

    #[cfg(unix)]
    #[test]
    fn entry_file_through_symlinked_project_is_canonical() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("main.py"), "").unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let project = match project_dir(link.to_str().unwrap()) {
            Validation::Accepted(dir) => dir,
            other => panic!("unexpected {other:?}"),
        };
        let raw = link.join("main.py");
        match entry_file(raw.to_str().unwrap(), &project) {
            Validation::Accepted(path) => {
                assert_eq!(path.strip_prefix(&project).unwrap(), Path::new("main.py"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn icon_rules() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("assets")).unwrap();
        fs::write(tmp.path().join("assets/app.ico"), [0u8; 4]).unwrap();

        assert_eq!(icon_file("", tmp.path()), Validation::Accepted(None));

        let png = icon_file("logo.png", tmp.path());
        assert!(png.reason().unwrap().contains("convert"));

        let missing = icon_file("logo.ico", tmp.path());
        assert!(missing.reason().unwrap().contains("not found"));

        assert_eq!(
            icon_file("assets/app.ico", tmp.path()),
            Validation::Accepted(Some(PathBuf::from("assets").join("app.ico")))
        );
    }

    #[test]
    fn integer_rules() {
        assert_eq!(positive_integer("", 4), Validation::Accepted(4));
        assert_eq!(positive_integer(" 8 ", 4), Validation::Accepted(8));
        assert!(!positive_integer("0", 4).is_accepted());
        assert!(!positive_integer("-3", 4).is_accepted());
        assert!(!positive_integer("eight", 4).is_accepted());
    }

    #[test]
    fn version_requires_three_numeric_parts() {
        assert_eq!(version("", "1.0.0"), Validation::Accepted("1.0.0".into()));
        assert_eq!(version("2.10.3", "1.0.0"), Validation::Accepted("2.10.3".into()));
        assert!(!version("1.0", "1.0.0").is_accepted());
        assert!(!version("1.0.0-beta", "1.0.0").is_accepted());
        assert!(!version("a.b.c", "1.0.0").is_accepted());
        assert!(!version("1..2", "1.0.0").is_accepted());
        assert!(!version("1.2.3.4", "1.0.0").is_accepted());
    }

    #[test]
    fn version_leading_zeros_are_normalized() {
        assert_eq!(version("01.2.3", "1.0.0"), Validation::Accepted("1.2.3".into()));
        assert_eq!(version("1.02.003", "1.0.0"), Validation::Accepted("1.2.3".into()));
    }

    #[test]
    fn script_filename_gets_extension() {
        assert_eq!(script_filename(""), "build.py");
        assert_eq!(script_filename("release"), "release.py");
        assert_eq!(script_filename("release.py"), "release.py");
        assert_eq!(
            script_filename_or("", "create_packages.py"),
            "create_packages.py"
        );
    }

    #[test]
    fn name_batch_drops_only_bad_tokens() {
        let reporter = RecordingReporter::new();
        let names = name_tokens("numpy, bad name!, py-qt5 ,,zope.interface", &reporter);

        assert_eq!(names, vec!["numpy", "py-qt5", "zope.interface"]);
        let warnings = reporter.at(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("bad name!"));
    }

    #[test]
    fn separators_alone_are_not_a_name() {
        assert!(!is_name_token("--"));
        assert!(is_name_token("tk-inter"));
    }

    #[test]
    fn data_batch_keeps_valid_mappings() {
        let reporter = RecordingReporter::new();
        let mappings = data_mappings("assets;assets, broken, cfg/a.ini;.", &reporter);

        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[1].to_string(), "cfg/a.ini;.");
        assert_eq!(reporter.at(Level::Warn).len(), 1);
    }
}
