//! The translation line model.
//!
//! A [`Line`] is one spreadsheet row reduced to a `(key, value)` pair plus a
//! classification decided from the raw key:
//!
//! - keys starting with `//` or `#` are comments,
//! - keys shaped like `base##{category}` with a CLDR category are plural variants,
//! - everything else is plain text.

use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PLURAL_KEY_REGEX: Regex =
        Regex::new(r"(?s)^(.*)##\{(zero|one|two|few|many|other)\}$").unwrap();
}

const COMMENT_MARKERS: [&str; 2] = ["//", "#"];

/// What a line represents, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Comment,
    Plural,
    Text,
}

/// Standard CLDR plural categories.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl Display for PluralCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(PluralCategory::Zero),
            "one" => Ok(PluralCategory::One),
            "two" => Ok(PluralCategory::Two),
            "few" => Ok(PluralCategory::Few),
            "many" => Ok(PluralCategory::Many),
            "other" => Ok(PluralCategory::Other),
            _ => Err(format!("Unknown plural category: {}", s)),
        }
    }
}

/// A single translation entry read from a spreadsheet row.
///
/// `key` and `value` can be changed through [`Line::replace_key`],
/// [`Line::transform_key`], [`Line::replace_value`] and
/// [`Line::transform_value`]; the kind and plural category cannot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    key: String,
    value: String,
    kind: LineKind,
    plural_category: Option<PluralCategory>,
}

impl Line {
    /// Classifies a raw spreadsheet cell pair. Missing cells count as empty strings.
    pub fn new(raw_key: Option<&str>, raw_value: Option<&str>) -> Self {
        let raw_key = raw_key.unwrap_or_default();
        let value = raw_value.unwrap_or_default().to_string();

        if let Some(comment) = COMMENT_MARKERS
            .iter()
            .find_map(|marker| raw_key.strip_prefix(marker))
        {
            return Line {
                key: comment.trim().to_string(),
                value,
                kind: LineKind::Comment,
                plural_category: None,
            };
        }

        if let Some(captures) = PLURAL_KEY_REGEX.captures(raw_key) {
            let category = captures[2].parse::<PluralCategory>().ok();
            if category.is_some() {
                return Line {
                    key: captures[1].to_string(),
                    value,
                    kind: LineKind::Plural,
                    plural_category: category,
                };
            }
        }

        Line {
            key: raw_key.to_string(),
            value,
            kind: LineKind::Text,
            plural_category: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// The plural category, present only for plural lines.
    pub fn plural_category(&self) -> Option<PluralCategory> {
        self.plural_category
    }

    pub fn is_comment(&self) -> bool {
        self.kind == LineKind::Comment
    }

    pub fn is_plural(&self) -> bool {
        self.kind == LineKind::Plural
    }

    /// The comment text without its marker. Only meaningful for comment lines.
    pub fn comment(&self) -> &str {
        &self.key
    }

    /// Comments are never empty; other lines are empty when either side is missing.
    pub fn is_empty(&self) -> bool {
        !self.is_comment() && (self.key.is_empty() || self.value.is_empty())
    }

    pub fn replace_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    pub fn transform_key(&mut self, f: impl FnOnce(&str) -> String) {
        self.key = f(&self.key);
    }

    pub fn replace_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn transform_value(&mut self, f: impl FnOnce(&str) -> String) {
        self.value = f(&self.value);
    }
}

impl From<(&str, &str)> for Line {
    fn from((key, value): (&str, &str)) -> Self {
        Line::new(Some(key), Some(value))
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, self.plural_category) {
            (LineKind::Comment, _) => write!(f, "# {}", self.key),
            (LineKind::Plural, Some(category)) => {
                write!(f, "{}##{{{}}} = {}", self.key, category, self.value)
            }
            _ => write!(f, "{} = {}", self.key, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_comment_is_trimmed() {
        let line = Line::new(Some("# un commentaire   "), None);
        assert!(line.is_comment());
        assert_eq!(line.comment(), "un commentaire");
    }

    #[test]
    fn test_slash_comment() {
        let line = Line::new(Some("//Section: Home"), Some("ignored"));
        assert!(line.is_comment());
        assert_eq!(line.comment(), "Section: Home");
        assert_eq!(line.plural_category(), None);
    }

    #[test]
    fn test_plural_key_is_split() {
        let line = Line::new(Some("greeting##{one}"), Some("Hi"));
        assert!(line.is_plural());
        assert_eq!(line.key(), "greeting");
        assert_eq!(line.value(), "Hi");
        assert_eq!(line.plural_category(), Some(PluralCategory::One));
    }

    #[test]
    fn test_invalid_plural_category_is_text() {
        let line = Line::new(Some("greeting##{invalid}"), Some("Hi"));
        assert!(!line.is_plural());
        assert_eq!(line.kind(), LineKind::Text);
        assert_eq!(line.key(), "greeting##{invalid}");
    }

    #[test]
    fn test_emptiness() {
        assert!(Line::new(None, Some("value")).is_empty());
        assert!(Line::new(Some("key"), None).is_empty());
        assert!(!Line::new(Some("# x"), None).is_empty());
        assert!(!Line::from(("key", "value")).is_empty());
    }

    #[test]
    fn test_mutation_keeps_kind() {
        let mut line = Line::new(Some("apples##{few}"), Some("%d apples"));
        line.replace_key("pears");
        line.transform_value(|v| v.replace("apples", "pears"));
        assert_eq!(line.key(), "pears");
        assert_eq!(line.value(), "%d pears");
        assert!(line.is_plural());
        assert_eq!(line.plural_category(), Some(PluralCategory::Few));
    }

    #[test]
    fn test_transform_key() {
        let mut line = Line::from(("common.title", "Title"));
        line.transform_key(|k| k.trim_start_matches("common.").to_string());
        assert_eq!(line.key(), "title");
        assert_eq!(line.kind(), LineKind::Text);
    }

    #[test]
    fn test_plural_category_from_str() {
        assert_eq!("many".parse::<PluralCategory>(), Ok(PluralCategory::Many));
        assert!("MANY".parse::<PluralCategory>().is_err());
        assert_eq!(PluralCategory::Two.to_string(), "two");
    }
}
