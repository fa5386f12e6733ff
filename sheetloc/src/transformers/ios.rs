//! Apple `.strings` output.
//!
//! Plural variants are not representable in `.strings` files and are skipped.

use super::{Transformer, expand_newline_token, replace_managed_block, to_object_placeholders};

pub const START_MARKER: &str = "// AUTO-GENERATED CONTENT START";
pub const END_MARKER: &str = "// AUTO-GENERATED CONTENT END";

#[derive(Debug, Default, Clone, Copy)]
pub struct IosTransformer;

fn escape(text: &str) -> String {
    text.replace('"', "\\\"")
}

impl Transformer for IosTransformer {
    fn extension(&self) -> &'static str {
        "strings"
    }

    fn transform_comment(&self, comment: &str) -> String {
        format!("// {}", comment)
    }

    fn transform_key_value(&self, key: &str, value: &str) -> String {
        let value = to_object_placeholders(&expand_newline_token(&escape(value)));
        format!("\"{}\" = \"{}\";", escape(key), value)
    }

    fn insert(&self, existing: &str, rendered: &str) -> String {
        if let Some(output) =
            replace_managed_block(existing, START_MARKER, END_MARKER, "", rendered)
        {
            return output;
        }

        let block = format!("{}\n{}\n{}\n", START_MARKER, rendered, END_MARKER);
        if existing.trim().is_empty() {
            block
        } else if existing.ends_with('\n') {
            format!("{}\n{}", existing, block)
        } else {
            format!("{}\n\n{}", existing, block)
        }
    }
}
