//! Android `strings.xml` output.
//!
//! Generated entries live between two marker comments inside `<resources>`,
//! so hand-written resources outside the markers survive a rewrite.

use indoc::formatdoc;
use quick_xml::escape::{escape, partial_escape};

use crate::line::Line;

use super::{
    LINE_SEPARATOR, Transformer, expand_newline_token, replace_managed_block,
    to_string_placeholders,
};

pub const START_MARKER: &str = "<!-- AUTO-GENERATED CONTENT START -->";
pub const END_MARKER: &str = "<!-- AUTO-GENERATED CONTENT END -->";

const INDENT: &str = "    ";

#[derive(Debug, Default, Clone, Copy)]
pub struct AndroidTransformer;

fn normalize_value(value: &str) -> String {
    let value = partial_escape(value)
        .replace('\'', "\\'")
        .replace('"', "\\\"");
    to_string_placeholders(&expand_newline_token(&value))
}

/// Breaks up every run of dashes, since `--` is not allowed inside XML
/// comments. The space before `-->` keeps a trailing `-` apart from it.
fn xml_comment_text(comment: &str) -> String {
    let mut text = String::with_capacity(comment.len());
    for c in comment.trim().chars() {
        if c == '-' && text.ends_with('-') {
            text.push(' ');
        }
        text.push(c);
    }
    text
}

impl Transformer for AndroidTransformer {
    fn extension(&self) -> &'static str {
        "xml"
    }

    fn transform_comment(&self, comment: &str) -> String {
        format!("{}<!-- {} -->", INDENT, xml_comment_text(comment))
    }

    fn transform_key_value(&self, key: &str, value: &str) -> String {
        format!(
            "{}<string name=\"{}\">{}</string>",
            INDENT,
            escape(key),
            normalize_value(value)
        )
    }

    fn transform_plurals_values(&self, key: &str, lines: &[Line]) -> Option<String> {
        let mut parts = vec![format!("{}<plurals name=\"{}\">", INDENT, escape(key))];
        parts.extend(lines.iter().filter_map(|line| {
            line.plural_category().map(|category| {
                format!(
                    "{}{}<item quantity=\"{}\">{}</item>",
                    INDENT,
                    INDENT,
                    category,
                    normalize_value(line.value())
                )
            })
        }));
        parts.push(format!("{}</plurals>", INDENT));
        Some(parts.join(LINE_SEPARATOR))
    }

    fn insert(&self, existing: &str, rendered: &str) -> String {
        if let Some(output) =
            replace_managed_block(existing, START_MARKER, END_MARKER, INDENT, rendered)
        {
            return output;
        }

        let block = format!(
            "{INDENT}{START_MARKER}\n{rendered}\n{INDENT}{END_MARKER}\n"
        );
        match existing.rfind("</resources>") {
            Some(close_at) => format!(
                "{}{}{}",
                &existing[..close_at],
                block,
                &existing[close_at..]
            ),
            None => formatdoc! {r#"
                <?xml version="1.0" encoding="utf-8"?>
                <resources>
                {block}</resources>
            "#},
        }
    }
}
