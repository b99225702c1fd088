//! Catalog of Nuitka plugins offered during collection.

use crate::report::Reporter;
use crate::validate::{is_name_token, split_list};

/// A known plugin and what it is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plugin {
    pub name: &'static str,
    pub description: &'static str,
}

const fn plugin(name: &'static str, description: &'static str) -> Plugin {
    Plugin { name, description }
}

pub const PLUGINS: &[Plugin] = &[
    plugin("pyqt5", "PyQt5 GUI applications"),
    plugin("pyqt6", "PyQt6 GUI applications"),
    plugin("pyside2", "PySide2 GUI applications"),
    plugin("pyside6", "PySide6 GUI applications"),
    plugin("tk-inter", "Tkinter GUI applications"),
    plugin("kivy", "Kivy applications"),
    plugin("matplotlib", "matplotlib backends and data files"),
    plugin("multiprocessing", "multiprocessing on Windows"),
    plugin("eventlet", "eventlet green threads"),
    plugin("gevent", "gevent coroutines"),
    plugin("pywebview", "pywebview windows"),
    plugin("playwright", "Playwright browser automation"),
    plugin("spacy", "spaCy models"),
    plugin("transformers", "Hugging Face transformers"),
    plugin("glfw", "GLFW/OpenGL applications"),
    plugin("upx", "compress binaries with UPX"),
    plugin("delvewheel", "wheels repaired by delvewheel"),
    plugin("dill-compat", "dill pickling compatibility"),
    plugin("enum-compat", "enum34 compatibility"),
    plugin("pbr-compat", "pbr metadata compatibility"),
    plugin("pkg-resources", "pkg_resources workarounds"),
    plugin("pmw-freezer", "Pmw megawidgets"),
    plugin("pylint-warnings", "honour pylint disable comments"),
];

pub fn find(name: &str) -> Option<&'static Plugin> {
    PLUGINS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Numbered catalog lines for display.
pub fn catalog_lines() -> Vec<String> {
    PLUGINS
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>2}. {:<16} {}", i + 1, p.name, p.description))
        .collect()
}

/// Resolves a comma-separated selection of catalog numbers, catalog names and
/// custom plugin names.
///
/// Out-of-range numbers and tokens that are not name-like are skipped with a
/// warning. Duplicates are dropped; order of first appearance is kept.
pub fn select(raw: &str, reporter: &dyn Reporter) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for token in split_list(raw) {
        let name = if let Ok(n) = token.parse::<usize>() {
            match n.checked_sub(1).and_then(|i| PLUGINS.get(i)) {
                Some(p) => p.name.to_string(),
                None => {
                    reporter.warn(&format!("no plugin numbered {n}, skipped"));
                    continue;
                }
            }
        } else if let Some(p) = find(token) {
            p.name.to_string()
        } else if is_name_token(token) {
            token.to_string()
        } else {
            reporter.warn(&format!("skipping invalid plugin name: {token}"));
            continue;
        };

        if !selected.contains(&name) {
            selected.push(name);
        }
    }
    selected
}
