//! Field-level helpers for the catalog CSV dialect.
//!
//! The dialect is deliberately small: one record per line, `,` separates
//! fields, and `"` toggles a quoted section so commas inside it survive.
//! Doubled quotes (`""`) are not an escape; each quote just toggles the flag
//! again and nothing is emitted for it. Multi-value cells use `|` as a
//! secondary delimiter.

const FIELD_DELIMITER: char = ',';
const QUOTE: char = '"';
const MULTI_VALUE_DELIMITER: char = '|';
const UTF8_BOM: char = '\u{feff}';

/// Split one CSV line into trimmed fields.
///
/// Quote characters are consumed, never emitted. An unterminated quote simply
/// swallows the rest of the line into the current field.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            QUOTE => in_quotes = !in_quotes,
            FIELD_DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            other => current.push(other),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Parse the header row into column names, dropping a leading BOM.
pub fn parse_header(line: &str) -> Vec<String> {
    parse_line(line.strip_prefix(UTF8_BOM).unwrap_or(line))
}

/// Split a `|`-delimited cell into its non-empty, trimmed entries.
pub fn split_multi_value(value: &str) -> Vec<String> {
    value
        .split(MULTI_VALUE_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Only a case-insensitive `true` is truthy; empty and anything else is false.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Ensure a link carries a scheme, prepending `https://` when it has none.
///
/// Blank input stays blank. Already-normalized links are returned unchanged,
/// so applying this twice is the same as applying it once.
pub fn normalize_link(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if has_http_scheme(trimmed) {
        return trimmed.to_string();
    }
    let without_slashes = trimmed.trim_start_matches('/');
    format!("https://{without_slashes}")
}

fn has_http_scheme(link: &str) -> bool {
    let lower = link
        .get(..8)
        .unwrap_or(link)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `None` for blank cells so optional fields read naturally downstream.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_commas_stay_in_one_field() {
        let fields = parse_line(r#"1,"Tools, credits, and domains",Dev"#);
        assert_eq!(fields, vec!["1", "Tools, credits, and domains", "Dev"]);
    }

    #[test]
    fn doubled_quotes_are_not_an_escape() {
        // Each quote toggles; nothing is emitted for either of them.
        let fields = parse_line(r#"a,"say ""hi""",b"#);
        assert_eq!(fields, vec!["a", "say hi", "b"]);
    }

    #[test]
    fn trailing_delimiter_yields_empty_final_field() {
        assert_eq!(parse_line("a,b,"), vec!["a", "b", ""]);
        assert_eq!(parse_line(""), vec![""]);
    }

    #[test]
    fn header_strips_bom_and_whitespace() {
        let header = parse_header("\u{feff}id, name ,link");
        assert_eq!(header, vec!["id", "name", "link"]);
    }

    #[test]
    fn multi_value_drops_blank_entries() {
        assert_eq!(split_multi_value(" X | |Y|"), vec!["X", "Y"]);
        assert!(split_multi_value("").is_empty());
    }

    #[test]
    fn flags_accept_only_true() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn links_gain_scheme_and_stay_idempotent() {
        for raw in [
            "foo.com",
            "https://foo.com",
            "http://foo.com/path",
            "HTTPS://Foo.com",
            "//cdn.example.org/x",
        ] {
            let once = normalize_link(raw);
            assert!(
                once.to_ascii_lowercase().starts_with("http://")
                    || once.to_ascii_lowercase().starts_with("https://"),
                "{raw} normalized to {once}"
            );
            assert_eq!(normalize_link(&once), once);
        }
        assert_eq!(normalize_link("foo.com"), "https://foo.com");
        assert_eq!(normalize_link("  "), "");
    }
}
