// Text helpers shared by every serializer in the crate

use std::fmt::Display;

/// Token written to data files in place of non-finite numbers.
pub const MISSING_VALUE: &str = "\"?\"";

/// Canonical, locale-independent rendering of a number.
///
/// Uses Rust's shortest round-trip formatting, so `2.0` becomes `"2"` and
/// `0.25` becomes `"0.25"`. Identical inputs always produce identical text.
pub fn num(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Wrap a value in single quotes, the quoting used for strings in scripts.
/// An embedded `'` is doubled, which is how the renderer escapes it.
pub fn quoted(value: impl Display) -> String {
    format!("'{}'", value.to_string().replace('\'', "''"))
}

/// Double-quoted string cell for a data file. Data file strings have no
/// escape for `"`, so embedded ones become `'`.
pub fn data_string(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "'"))
}

/// `keyword value` when the value is present, otherwise nothing.
pub fn keyword_value(keyword: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!("{} {}", keyword, v),
        _ => String::new(),
    }
}

/// Join fragments with single spaces, dropping empty ones.
pub fn join_fragments<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for part in parts {
        let part = part.as_ref().trim();
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

/// Collapse runs of whitespace into one space and trim both ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Section banner used to make generated scripts and data files readable.
pub fn banner(title: &str) -> String {
    let rule = "#".to_string() + &"=".repeat(78);
    format!("{rule}\n# {title}\n{rule}\n")
}

/// Remove characters that the renderer cannot accept in an output path.
pub fn sanitize_path(path: &str) -> String {
    const INVALID: &[char] = &[':', '*', '?', '!', '"', '<', '>', '|'];
    path.chars().filter(|c| !INVALID.contains(c)).collect()
}
