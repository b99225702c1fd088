//! Windows version resource consumed by PyInstaller's `--version-file`.

use super::literal::py_str;
use super::templates::VERSION_INFO;
use crate::config::Configuration;
use crate::error::Result;
use chrono::Datelike;
use handlebars::Handlebars;
use serde_json::json;

/// File name the generated script writes and passes to PyInstaller.
pub const VERSION_FILE_NAME: &str = "version_info.txt";

/// Pads or truncates a dotted version to exactly four numeric parts.
///
/// Non-numeric parts count as `0`, so `1.2` becomes `[1, 2, 0, 0]` and
/// `1.2.3.4.5` becomes `[1, 2, 3, 4]`.
pub fn pad_version(version: &str) -> [u16; 4] {
    let mut parts = [0u16; 4];
    for (slot, part) in parts.iter_mut().zip(version.trim().split('.')) {
        *slot = part.trim().parse().unwrap_or(0);
    }
    parts
}

/// Renders the `VSVersionInfo` structure for `config`.
pub fn render_version_file(config: &Configuration) -> Result<String> {
    let [a, b, c, d] = pad_version(config.version());
    let dotted = format!("{a}.{b}.{c}.{d}");
    let company = config.company_name().trim();
    let name = config.app_name();
    let year = chrono::Local::now().year();
    let copyright = if company.is_empty() {
        format!("Copyright (C) {year}")
    } else {
        format!("Copyright (C) {year} {company}")
    };

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string("version_info", VERSION_INFO)?;

    let data = json!({
        "version_tuple": format!("({a}, {b}, {c}, {d})"),
        "version": py_str(&dotted),
        "company": py_str(company),
        "description": py_str(&config.package_description()),
        "name": py_str(name),
        "original_filename": py_str(&format!("{name}.exe")),
        "copyright": py_str(&copyright),
    });
    Ok(handlebars.render("version_info", &data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationBuilder;

    #[test]
    fn versions_are_padded_to_four_parts() {
        assert_eq!(pad_version("1"), [1, 0, 0, 0]);
        assert_eq!(pad_version("1.2"), [1, 2, 0, 0]);
        assert_eq!(pad_version("1.2.3"), [1, 2, 3, 0]);
        assert_eq!(pad_version("1.2.3.4.5"), [1, 2, 3, 4]);
        assert_eq!(pad_version("1.x.3"), [1, 0, 3, 0]);
    }

    #[test]
    fn resource_carries_company_and_version() {
        let config = ConfigurationBuilder::new()
            .app_name("viewer")
            .company_name("ACME \"Labs\"")
            .version("2.1.0")
            .build();
        let text = render_version_file(&config).unwrap();
        assert!(text.contains("filevers=(2, 1, 0, 0)"));
        assert!(text.contains(r#"StringStruct('FileVersion', "2.1.0.0")"#));
        assert!(text.contains(r#"StringStruct('CompanyName', "ACME \"Labs\"")"#));
        assert!(text.contains(r#"StringStruct('OriginalFilename', "viewer.exe")"#));
    }
}
