//! Flat JSON output.
//!
//! ```json
//!
//! {
//!   "title" : "Home",
//!   "apples_one" : "%@ apple"
//! }
//! ```
//!
//! Plural variants use i18next-style `key_category` suffixes. The whole file is
//! regenerated on every write.

use crate::line::Line;

use super::{LINE_SEPARATOR, Transformer, expand_newline_token, to_object_placeholders};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTransformer;

fn escape_key(key: &str) -> String {
    key.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\t', "\\t")
}

/// Backslashes are escaped before `%newline%` expands, so the expansion stays
/// a single `\n` escape.
fn normalize_value(value: &str) -> String {
    let value = escape_key(&value.replace(['\r', '\n'], ""));
    to_object_placeholders(&expand_newline_token(&value))
}

impl Transformer for JsonTransformer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn supports_split(&self) -> bool {
        true
    }

    fn transform_comment(&self, _comment: &str) -> String {
        String::new()
    }

    fn transform_key_value(&self, key: &str, value: &str) -> String {
        format!("  \"{}\" : \"{}\",", escape_key(key), normalize_value(value))
    }

    fn transform_plurals_values(&self, key: &str, lines: &[Line]) -> Option<String> {
        let entries = lines
            .iter()
            .filter_map(|line| {
                line.plural_category().map(|category| {
                    self.transform_key_value(&format!("{}_{}", key, category), line.value())
                })
            })
            .collect::<Vec<_>>();
        Some(entries.join(LINE_SEPARATOR))
    }

    fn insert(&self, _existing: &str, rendered: &str) -> String {
        let body = rendered.trim_end();
        let body = body.strip_suffix(',').unwrap_or(body);
        format!("\n{{\n{}\n}}", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_escaping() {
        let t = JsonTransformer;
        assert_eq!(
            t.transform_key_value("greet", "Say \"hi\" to %s%newline%now\nplease"),
            r#"  "greet" : "Say \"hi\" to %@\nnowplease","#
        );
    }

    #[test]
    fn test_backslashes_and_tabs_stay_valid_json() {
        let t = JsonTransformer;
        let rendered = [
            t.transform_key_value("path", r"C:\dir\tmp"),
            t.transform_key_value(r"odd\key", "tab\there%newline%next"),
        ]
        .join(LINE_SEPARATOR);
        let output = t.insert("", &rendered);

        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["path"], r"C:\dir\tmp");
        assert_eq!(parsed[r"odd\key"], "tab\there\nnext");
    }

    #[test]
    fn test_comments_render_nothing() {
        assert_eq!(JsonTransformer.transform_comment("Section"), "");
    }

    #[test]
    fn test_insert_wraps_and_strips_trailing_comma() {
        let t = JsonTransformer;
        let rendered = [
            t.transform_key_value("key", "value"),
            t.transform_key_value("key2", "value2"),
        ]
        .join("\n");
        assert_eq!(
            t.insert("", &rendered),
            "\n{\n  \"key\" : \"value\",\n  \"key2\" : \"value2\"\n}"
        );
    }

    #[test]
    fn test_insert_replaces_existing_content() {
        let t = JsonTransformer;
        let output = t.insert("{ \"stale\": \"value\" }", "  \"fresh\" : \"yes\",");
        assert_eq!(output, "\n{\n  \"fresh\" : \"yes\"\n}");
    }

    #[test]
    fn test_plurals_use_category_suffix() {
        let lines = vec![
            Line::from(("apples##{one}", "%s apple")),
            Line::from(("apples##{other}", "%s apples")),
        ];
        let rendered = JsonTransformer.transform_plurals_values("apples", &lines).unwrap();
        assert_eq!(
            rendered,
            format!(
                "  \"apples_one\" : \"%@ apple\",{}  \"apples_other\" : \"%@ apples\",",
                LINE_SEPARATOR
            )
        );
    }
}
