//! Splits lines into namespaces, either by key prefix or by worksheet.
//!
//! Prefix mode claims `common.title` into the `common` namespace (as `title`
//! unless `strip_prefix = false`). Worksheet mode turns each worksheet into a
//! namespace named after its title, optionally limited to `worksheets`.

use serde::Deserialize;

use crate::{
    error::PluginError,
    line::Line,
    plugin::{Plugin, PluginOptions, SortMeta},
    sorter::LinesWithNamespace,
    worksheet::WorksheetLinesByTitle,
};

pub const NAME: &str = "split";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    #[default]
    Prefix,
    Worksheet,
}

fn default_separator() -> String {
    ".".to_string()
}

fn default_strip_prefix() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SplitOptions {
    #[serde(default)]
    mode: SplitMode,
    #[serde(default)]
    namespaces: Vec<String>,
    #[serde(default)]
    worksheets: Vec<String>,
    #[serde(default = "default_separator")]
    separator: String,
    #[serde(default = "default_strip_prefix")]
    strip_prefix: bool,
}

#[derive(Debug, Clone)]
pub struct SplitPlugin {
    mode: SplitMode,
    namespaces: Vec<String>,
    worksheets: Vec<String>,
    separator: String,
    strip_prefix: bool,
}

impl SplitPlugin {
    pub fn from_options(options: &PluginOptions) -> Result<Self, PluginError> {
        let parsed: SplitOptions = options.parse(NAME)?;
        if parsed.mode == SplitMode::Prefix && parsed.namespaces.is_empty() {
            return Err(PluginError::config(
                NAME,
                "`namespaces` must list at least one namespace in prefix mode",
            ));
        }
        if parsed.separator.is_empty() {
            return Err(PluginError::config(NAME, "`separator` must not be empty"));
        }
        if let Some(bad) = parsed.namespaces.iter().find(|ns| ns.trim().is_empty()) {
            return Err(PluginError::config(
                NAME,
                format!("invalid namespace `{}`", bad),
            ));
        }

        Ok(Self {
            mode: parsed.mode,
            namespaces: parsed.namespaces,
            worksheets: parsed.worksheets,
            separator: parsed.separator,
            strip_prefix: parsed.strip_prefix,
        })
    }

    /// Namespace owning `key`, with the key left once the prefix is removed.
    fn claim<'a>(&'a self, key: &'a str) -> Option<(&'a str, &'a str)> {
        self.namespaces.iter().find_map(|namespace| {
            key.strip_prefix(namespace.as_str())
                .and_then(|rest| rest.strip_prefix(self.separator.as_str()))
                .filter(|rest| !rest.is_empty())
                .map(|rest| (namespace.as_str(), rest))
        })
    }

    fn sort_by_prefix(
        &self,
        lines_by_title: WorksheetLinesByTitle,
        namespaces: &mut Vec<LinesWithNamespace>,
    ) -> WorksheetLinesByTitle {
        let mut remaining = WorksheetLinesByTitle::new();
        for (title, lines) in lines_by_title {
            let mut unclaimed = Vec::new();
            for mut line in lines {
                let claimed = if line.is_comment() {
                    None
                } else {
                    self.claim(line.key())
                        .map(|(namespace, rest)| (namespace.to_string(), rest.to_string()))
                };
                match claimed {
                    Some((namespace, rest)) => {
                        if self.strip_prefix {
                            line.replace_key(rest);
                        }
                        push_line(namespaces, &namespace, line);
                    }
                    None => unclaimed.push(line),
                }
            }
            remaining.insert(title, unclaimed);
        }
        remaining
    }

    fn sort_by_worksheet(
        &self,
        lines_by_title: WorksheetLinesByTitle,
        namespaces: &mut Vec<LinesWithNamespace>,
    ) -> WorksheetLinesByTitle {
        let mut remaining = WorksheetLinesByTitle::new();
        for (title, lines) in lines_by_title {
            if self.worksheets.is_empty() || self.worksheets.contains(&title) {
                for line in lines {
                    push_line(namespaces, &title, line);
                }
                // Register empty worksheets too so every listed namespace exists.
                if find_bucket(namespaces, &title).is_none() {
                    namespaces.push(LinesWithNamespace::new(title));
                }
            } else {
                remaining.insert(title, lines);
            }
        }
        remaining
    }
}

fn find_bucket<'a>(
    namespaces: &'a mut [LinesWithNamespace],
    namespace: &str,
) -> Option<&'a mut LinesWithNamespace> {
    namespaces.iter_mut().find(|b| b.namespace == namespace)
}

fn push_line(namespaces: &mut Vec<LinesWithNamespace>, namespace: &str, line: Line) {
    match find_bucket(namespaces, namespace) {
        Some(bucket) => bucket.lines.push(line),
        None => namespaces.push(LinesWithNamespace::with_lines(namespace, vec![line])),
    }
}

impl Plugin for SplitPlugin {
    fn sort_lines(
        &self,
        lines_by_title: WorksheetLinesByTitle,
        namespaces: &mut Vec<LinesWithNamespace>,
        _meta: &SortMeta<'_>,
    ) -> Result<WorksheetLinesByTitle, PluginError> {
        Ok(match self.mode {
            SplitMode::Prefix => self.sort_by_prefix(lines_by_title, namespaces),
            SplitMode::Worksheet => self.sort_by_worksheet(lines_by_title, namespaces),
        })
    }

    fn supports_sort(&self) -> bool {
        true
    }
}
