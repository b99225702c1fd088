//! Prompt defaults read from the project's `pyproject.toml`.
//!
//! Both the standard `[project]` table and Poetry's `[tool.poetry]` table are
//! understood; `[project]` wins when both are present.

use crate::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};

/// File looked up in the project directory.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Package metadata extracted from pyproject.toml
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    /// SPDX identifier or free-form license text.
    pub license: Option<String>,
    /// First author as `Name <email>`, or whichever half is present.
    pub author: Option<String>,
    pub homepage: Option<String>,
}

/// Reads `pyproject.toml` from `project_dir`.
///
/// Returns `Ok(None)` when the file does not exist or has neither table.
///
/// # Errors
///
/// Read failures and TOML syntax errors.
pub fn load_project_metadata(project_dir: &Path) -> Result<Option<ProjectMetadata>> {
    let path = project_dir.join(PYPROJECT_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(&path).fs_context("reading pyproject.toml", &path)?;
    let value: toml::Value = toml::from_str(&text)?;
    Ok(parse_project_metadata(&value))
}

/// Extracts metadata from an already parsed document.
pub fn parse_project_metadata(value: &toml::Value) -> Option<ProjectMetadata> {
    let pep621 = value.get("project");
    let poetry = value.get("tool").and_then(|t| t.get("poetry"));
    if pep621.is_none() && poetry.is_none() {
        return None;
    }

    let field = |key: &str| {
        pep621
            .and_then(|t| string(t, key))
            .or_else(|| poetry.and_then(|t| string(t, key)))
    };

    let license = pep621
        .and_then(|t| t.get("license"))
        .and_then(license_text)
        .or_else(|| poetry.and_then(|t| string(t, "license")));

    let author = pep621
        .and_then(|t| t.get("authors"))
        .and_then(|a| a.as_array())
        .and_then(|a| a.first())
        .and_then(author_text)
        .or_else(|| {
            poetry
                .and_then(|t| t.get("authors"))
                .and_then(|a| a.as_array())
                .and_then(|a| a.first())
                .and_then(|a| a.as_str())
                .map(str::to_string)
        });

    let homepage = pep621
        .and_then(|t| t.get("urls"))
        .and_then(|urls| string(urls, "Homepage").or_else(|| string(urls, "homepage")))
        .or_else(|| poetry.and_then(|t| string(t, "homepage")));

    Some(ProjectMetadata {
        name: field("name"),
        version: field("version"),
        description: field("description"),
        license,
        author,
        homepage,
    })
}

fn string(table: &toml::Value, key: &str) -> Option<String> {
    table
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `license = "MIT"` or `license = { text = "MIT" }`.
fn license_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        other => string(other, "text"),
    }
}

/// `{ name = "..", email = ".." }` rendered as a maintainer string.
fn author_text(value: &toml::Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.trim().to_string()).filter(|s| !s.is_empty());
    }
    match (string(value, "name"), string(value, "email")) {
        (Some(name), Some(email)) => Some(format!("{name} <{email}>")),
        (Some(name), None) => Some(name),
        (None, Some(email)) => Some(email),
        (None, None) => None,
    }
}

/// Conventional icon locations, checked in order.
const ICON_CANDIDATES: &[&str] = &[
    "icon.ico",
    "app.ico",
    "assets/icon.ico",
    "assets/img/icon.ico",
    "resources/icon.ico",
];

/// Finds an `.ico` file at a conventional location under `project_dir`.
pub fn discover_icon(project_dir: &Path) -> Option<PathBuf> {
    let found = ICON_CANDIDATES
        .iter()
        .map(|candidate| project_dir.join(candidate))
        .find(|path| path.is_file());
    match &found {
        Some(path) => log::debug!("Found icon: {}", path.display()),
        None => log::debug!("No icon found under {}", project_dir.display()),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(text: &str) -> Option<ProjectMetadata> {
        parse_project_metadata(&toml::from_str(text).unwrap())
    }

    #[test]
    fn reads_pep621_table() {
        let meta = parse(
            r#"
            [project]
            name = "viewer"
            version = "0.3.1"
            description = "Image viewer"
            license = { text = "GPL-3.0" }
            authors = [{ name = "Ada", email = "ada@example.org" }, { name = "Bob" }]

            [project.urls]
            Homepage = "https://viewer.dev"
            "#,
        )
        .unwrap();
        assert_eq!(meta.name.as_deref(), Some("viewer"));
        assert_eq!(meta.version.as_deref(), Some("0.3.1"));
        assert_eq!(meta.license.as_deref(), Some("GPL-3.0"));
        assert_eq!(meta.author.as_deref(), Some("Ada <ada@example.org>"));
        assert_eq!(meta.homepage.as_deref(), Some("https://viewer.dev"));
    }

    #[test]
    fn reads_poetry_table() {
        let meta = parse(
            r#"
            [tool.poetry]
            name = "tool"
            version = "2.0.0"
            license = "MIT"
            authors = ["Eve <eve@example.org>"]
            homepage = "https://tool.dev"
            "#,
        )
        .unwrap();
        assert_eq!(meta.name.as_deref(), Some("tool"));
        assert_eq!(meta.license.as_deref(), Some("MIT"));
        assert_eq!(meta.author.as_deref(), Some("Eve <eve@example.org>"));
        assert_eq!(meta.homepage.as_deref(), Some("https://tool.dev"));
    }

    #[test]
    fn project_table_wins_over_poetry() {
        let meta = parse(
            r#"
            [project]
            name = "primary"

            [tool.poetry]
            name = "secondary"
            version = "9.9.9"
            "#,
        )
        .unwrap();
        assert_eq!(meta.name.as_deref(), Some("primary"));
        assert_eq!(meta.version.as_deref(), Some("9.9.9"));
    }

    #[test]
    fn unrelated_documents_yield_nothing() {
        assert!(parse("[tool.black]\nline-length = 100\n").is_none());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_project_metadata(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn syntax_errors_are_reported() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(PYPROJECT_FILE), "[project\nname=").unwrap();
        assert!(load_project_metadata(tmp.path()).is_err());
    }

    #[test]
    fn icon_is_discovered_in_assets() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_icon(tmp.path()).is_none());
        fs::create_dir_all(tmp.path().join("assets")).unwrap();
        fs::write(tmp.path().join("assets/icon.ico"), b"ico").unwrap();
        assert_eq!(
            discover_icon(tmp.path()),
            Some(tmp.path().join("assets/icon.ico"))
        );
    }
}
