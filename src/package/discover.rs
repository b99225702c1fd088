//! Locating a built executable in the backends' output directories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories searched, relative to the project root.
pub const SEARCH_DIRS: &[&str] = &["build", "dist"];

/// Extensions that never denote the application executable.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    "spec", "txt", "log", "exe", "toc", "pyz", "pkg", "so", "dll", "dylib",
];

/// Bundler support archive that is never the executable.
pub const SUPPORT_ARCHIVE: &str = "base_library.zip";

/// Finds the first plausible executable under `base/<dir>` for each search dir.
///
/// Direct children are preferred over files one directory down (PyInstaller's
/// one-dir layout). Entries are visited in file-name order.
pub fn find_executable(base: &Path, dirs: &[&str]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| base.join(dir))
        .filter(|dir| dir.is_dir())
        .find_map(|dir| scan_depth(&dir, 1).or_else(|| scan_depth(&dir, 2)))
}

fn scan_depth(dir: &Path, depth: usize) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| is_candidate(path))
}

/// Whether `path` looks like an application executable.
pub fn is_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    if name.starts_with('_') || name == SUPPORT_ARCHIVE {
        return false;
    }

    match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
        Some(ext) if EXCLUDED_EXTENSIONS.contains(&ext.as_str()) => false,
        Some(_) => is_executable(path),
        None => true,
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn skips_support_files_and_prefers_direct_children() {
        let tmp = TempDir::new().unwrap();
        let build = tmp.path().join("build");
        fs::create_dir_all(build.join("app")).unwrap();
        fs::write(build.join("app.spec"), "").unwrap();
        fs::write(build.join("warn.txt"), "").unwrap();
        fs::write(build.join("_internal"), "").unwrap();
        fs::write(build.join("base_library.zip"), "").unwrap();
        fs::write(build.join("app").join("nested"), "bin").unwrap();
        fs::write(build.join("tool"), "bin").unwrap();

        assert_eq!(
            find_executable(tmp.path(), SEARCH_DIRS),
            Some(build.join("tool"))
        );
    }

    #[test]
    fn falls_back_to_one_level_down_and_next_dir() {
        let tmp = TempDir::new().unwrap();
        let dist = tmp.path().join("dist");
        fs::create_dir_all(dist.join("viewer")).unwrap();
        fs::write(dist.join("viewer").join("viewer"), "bin").unwrap();
        fs::write(dist.join("viewer").join("lib.so"), "").unwrap();

        assert_eq!(
            find_executable(tmp.path(), SEARCH_DIRS),
            Some(dist.join("viewer").join("viewer"))
        );
    }

    #[test]
    fn nothing_found() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("build")).unwrap();
        fs::write(tmp.path().join("build").join("app.exe"), "").unwrap();
        assert_eq!(find_executable(tmp.path(), SEARCH_DIRS), None);
    }

    #[cfg(unix)]
    #[test]
    fn extension_allowed_with_exec_bit() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("app.bin");
        fs::write(&bin, "x").unwrap();
        assert!(!is_candidate(&bin));
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_candidate(&bin));
    }
}
