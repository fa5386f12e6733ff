//! French typography: non-breaking spaces before `? ! : ; »` and after `«`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use unic_langid::LanguageIdentifier;

use crate::{
    error::PluginError,
    line::Line,
    plugin::{LineMeta, Plugin, PluginOptions},
};

pub const NAME: &str = "non-breaking-space";

const NBSP: &str = "\u{a0}";

lazy_static! {
    static ref BEFORE_PUNCTUATION: Regex = Regex::new(r" +([?!:;»])").unwrap();
    static ref AFTER_GUILLEMET: Regex = Regex::new(r"« +").unwrap();
}

fn default_languages() -> Vec<String> {
    vec!["fr".to_string()]
}

#[derive(Debug, Deserialize)]
struct NonBreakingSpaceOptions {
    #[serde(default = "default_languages")]
    languages: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NonBreakingSpacePlugin {
    /// Base language subtags (`fr` matches `fr`, `fr-CA`, `fr_BE`).
    languages: Vec<String>,
}

impl NonBreakingSpacePlugin {
    pub fn from_options(options: &PluginOptions) -> Result<Self, PluginError> {
        let parsed: NonBreakingSpaceOptions = options.parse(NAME)?;
        let languages = parsed
            .languages
            .iter()
            .map(|language| {
                base_language(language).ok_or_else(|| {
                    PluginError::config(NAME, format!("invalid language `{}`", language))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { languages })
    }

    fn applies_to(&self, language: &str) -> bool {
        base_language(language).is_some_and(|base| self.languages.contains(&base))
    }
}

fn base_language(language: &str) -> Option<String> {
    language
        .replace('_', "-")
        .parse::<LanguageIdentifier>()
        .ok()
        .map(|id| id.language.as_str().to_string())
}

fn insert_non_breaking_spaces(value: &str) -> String {
    let value = BEFORE_PUNCTUATION.replace_all(value, format!("{}$1", NBSP).as_str());
    AFTER_GUILLEMET
        .replace_all(&value, format!("«{}", NBSP).as_str())
        .into_owned()
}

impl Plugin for NonBreakingSpacePlugin {
    fn transform_line(&self, mut line: Line, meta: &LineMeta<'_>) -> Result<Line, PluginError> {
        if !line.is_comment() && self.applies_to(meta.language) {
            line.transform_value(insert_non_breaking_spaces);
        }
        Ok(line)
    }
}
