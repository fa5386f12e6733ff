//! Fills missing translations from another language column of the same row.
//!
//! ```toml
//! [[plugins]]
//! name = "fallback"
//! options = { default = "en", languages = { "fr-ca" = "fr" } }
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    error::PluginError,
    line::Line,
    logger::SharedLogger,
    plugin::{Plugin, PluginMeta, PluginOptions, ReadTranslationMeta},
};

pub const NAME: &str = "fallback";

#[derive(Debug, Deserialize)]
struct FallbackOptions {
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    languages: HashMap<String, String>,
}

pub struct FallbackPlugin {
    default: Option<String>,
    /// Per-language fallback, keyed by lowercased language.
    languages: HashMap<String, String>,
    logger: SharedLogger,
}

impl FallbackPlugin {
    pub fn from_options(options: &PluginOptions, meta: &PluginMeta) -> Result<Self, PluginError> {
        let parsed: FallbackOptions = options.parse(NAME)?;
        if parsed.default.is_none() && parsed.languages.is_empty() {
            return Err(PluginError::config(
                NAME,
                "either `default` or `languages` must be set",
            ));
        }

        for language in parsed.languages.keys() {
            if !meta
                .languages
                .iter()
                .any(|l| l.eq_ignore_ascii_case(language))
            {
                options.logger.warn(&format!(
                    "Plugin `{}`: `{}` is not one of the configured languages",
                    NAME, language
                ));
            }
        }

        Ok(Self {
            default: parsed.default,
            languages: parsed
                .languages
                .into_iter()
                .map(|(language, fallback)| (language.to_lowercase(), fallback))
                .collect(),
            logger: options.logger.clone(),
        })
    }

    fn fallback_for(&self, language: &str) -> Option<&str> {
        self.languages
            .get(&language.to_lowercase())
            .or(self.default.as_ref())
            .map(String::as_str)
            .filter(|fallback| !fallback.eq_ignore_ascii_case(language))
    }
}

impl Plugin for FallbackPlugin {
    fn read_translation(
        &self,
        mut line: Line,
        meta: &ReadTranslationMeta<'_>,
    ) -> Result<Line, PluginError> {
        if line.is_comment() || line.key().is_empty() || !line.value().is_empty() {
            return Ok(line);
        }

        let Some(fallback) = self.fallback_for(meta.language) else {
            return Ok(line);
        };

        if let Some(value) = meta.row.get(fallback).filter(|v| !v.is_empty()) {
            self.logger.log(&format!(
                "`{}` has no `{}` translation, using `{}`",
                meta.key, meta.language, fallback
            ));
            line.replace_value(value);
        }

        Ok(line)
    }
}
