//! Output formats.
//!
//! Each format is a stateless [`Transformer`]: it renders single lines into
//! text fragments, merges the joined fragments into the existing file content,
//! and names the output file. The [`Format`] enum selects one by name.

pub mod android;
pub mod ios;
pub mod json;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, line::Line};

pub use android::AndroidTransformer;
pub use ios::IosTransformer;
pub use json::JsonTransformer;

/// Separator placed between rendered fragments.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

lazy_static! {
    static ref NEWLINE_TOKEN_REGEX: Regex = Regex::new(r"(?i)%newline%").unwrap();
    static ref STRING_PLACEHOLDER_REGEX: Regex = Regex::new(r"%(\d+\$)?s").unwrap();
    static ref OBJECT_PLACEHOLDER_REGEX: Regex = Regex::new(r"%(\d+\$)?@").unwrap();
}

/// `%newline%` (any case) becomes a literal `\n` escape.
pub(crate) fn expand_newline_token(value: &str) -> String {
    NEWLINE_TOKEN_REGEX.replace_all(value, r"\n").into_owned()
}

/// `%s` / `%1$s` become `%@` / `%1$@`.
pub(crate) fn to_object_placeholders(value: &str) -> String {
    STRING_PLACEHOLDER_REGEX
        .replace_all(value, "%${1}@")
        .into_owned()
}

/// `%@` / `%1$@` become `%s` / `%1$s`.
pub(crate) fn to_string_placeholders(value: &str) -> String {
    OBJECT_PLACEHOLDER_REGEX
        .replace_all(value, "%${1}s")
        .into_owned()
}

/// Replaces whatever sits between `start` and `end` markers in `existing`.
///
/// Content before the start marker and from the end marker on is kept.
/// `None` when the markers are missing or out of order.
pub(crate) fn replace_managed_block(
    existing: &str,
    start: &str,
    end: &str,
    end_indent: &str,
    rendered: &str,
) -> Option<String> {
    let start_at = existing.find(start)? + start.len();
    let end_at = start_at + existing[start_at..].find(end)?;
    Some(format!(
        "{}\n{}\n{}{}",
        &existing[..start_at],
        rendered,
        end_indent,
        &existing[end_at..]
    ))
}

/// Format-specific rendering of translation lines.
pub trait Transformer: Send + Sync {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Whether each namespace may get its own file.
    fn supports_split(&self) -> bool {
        false
    }

    fn transform_comment(&self, comment: &str) -> String;

    fn transform_key_value(&self, key: &str, value: &str) -> String;

    /// Renders every variant of one plural key. `None` when the format has no plurals.
    fn transform_plurals_values(&self, _key: &str, _lines: &[Line]) -> Option<String> {
        None
    }

    /// Merges freshly rendered content into the current file content.
    fn insert(&self, existing: &str, rendered: &str) -> String;

    /// `[namespace.]language.extension`, lowercased. The namespace is dropped
    /// for formats that do not support split output.
    fn file_name(&self, language: &str, namespace: Option<&str>) -> String {
        let namespace = namespace.filter(|_| self.supports_split());
        [namespace, Some(language), Some(self.extension())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(".")
            .to_lowercase()
    }
}

/// All supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Flat JSON object, one file per namespace.
    Json,
    /// Android `strings.xml` resources.
    Android,
    /// Apple `.strings`.
    Ios,
}

impl Format {
    pub fn transformer(&self) -> Box<dyn Transformer> {
        match self {
            Format::Json => Box::new(JsonTransformer),
            Format::Android => Box::new(AndroidTransformer),
            Format::Ios => Box::new(IosTransformer),
        }
    }
}

/// Implements [`std::fmt::Display`] for [`Format`].
///
/// # Example
/// ```rust
/// use sheetloc::transformers::Format;
/// assert_eq!(Format::Android.to_string(), "android");
/// assert_eq!(Format::Ios.to_string(), "ios");
/// ```
impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Android => write!(f, "android"),
            Format::Ios => write!(f, "ios"),
        }
    }
}

/// Accepts, case-insensitively:
/// - `"json"` → [`Format::Json`]
/// - `"android"`, `"xml"` → [`Format::Android`]
/// - `"ios"`, `"strings"` → [`Format::Ios`]
///
/// ```rust
/// use sheetloc::transformers::Format;
/// use std::str::FromStr;
/// assert_eq!(Format::from_str("XML").unwrap(), Format::Android);
/// assert!(Format::from_str("po").is_err());
/// ```
impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "json" => Ok(Format::Json),
            "android" | "xml" => Ok(Format::Android),
            "ios" | "strings" => Ok(Format::Ios),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}
