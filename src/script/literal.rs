//! Python literal encoding for values inlined into generated scripts.
//!
//! Templates never see raw configuration text: every value goes through one of
//! these functions first, so the rendered source stays valid whatever the user
//! typed.

use std::fmt::Write;

/// Double-quoted Python string literal.
pub fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Single-line Python list of strings.
pub fn py_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = items.into_iter().map(|s| py_str(s.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

/// Python list of strings with one item per line, for long argument lists.
///
/// `indent` is the indentation of the line holding the opening bracket.
pub fn py_list_block<I, S>(items: I, indent: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pad = " ".repeat(indent);
    let mut out = String::from("[\n");
    for item in items {
        let _ = writeln!(out, "{pad}    {},", py_str(item.as_ref()));
    }
    out.push_str(&pad);
    out.push(']');
    out
}

/// Python dict literal from already-encoded values, keys encoded here.
pub fn py_dict<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let entries: Vec<String> = entries
        .into_iter()
        .map(|(key, value)| format!("{}: {value}", py_str(key)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

pub fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// `None` or the encoded string.
pub fn py_opt_str(value: Option<&str>) -> String {
    value.map(py_str).unwrap_or_else(|| "None".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_escape_quotes_and_backslashes() {
        assert_eq!(py_str(r#"C:\app "x""#), r#""C:\\app \"x\"""#);
    }

    #[test]
    fn strings_escape_newlines_and_control_chars() {
        assert_eq!(py_str("a\nb\tc\r"), r#""a\nb\tc\r""#);
        assert_eq!(py_str("bell\u{7}"), r#""bell\x07""#);
    }

    #[test]
    fn non_ascii_text_is_kept() {
        assert_eq!(py_str("Café 应用"), "\"Café 应用\"");
    }

    #[test]
    fn lists_and_dicts() {
        assert_eq!(py_list(["a", "b"]), r#"["a", "b"]"#);
        assert_eq!(py_list(Vec::<String>::new()), "[]");
        assert_eq!(
            py_dict([("deb", py_str("dpkg-deb")), ("rpm", "None".to_string())]),
            r#"{"deb": "dpkg-deb", "rpm": None}"#
        );
    }

    #[test]
    fn block_list_is_indented() {
        let block = py_list_block(["nuitka", "main.py"], 4);
        assert_eq!(block, "[\n        \"nuitka\",\n        \"main.py\",\n    ]");
    }

    #[test]
    fn optional_strings() {
        assert_eq!(py_opt_str(None), "None");
        assert_eq!(py_opt_str(Some("x")), "\"x\"");
        assert_eq!(py_bool(true), "True");
    }
}
