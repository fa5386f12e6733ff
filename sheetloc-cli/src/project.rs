//! A loaded configuration: worksheets read, plugins loaded, format chosen.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use sheetloc::{
    Format, Line, PluginLoader, PluginMeta, PluginRegistry, PluginRunner, SharedLogger,
    Transformer, Worksheet, WriteTarget, extract_lines, read_worksheet, sort_lines,
};
use tracing::debug;

use crate::{config::Config, path_glob::expand_source_globs};

/// The lines of one output file.
#[derive(Debug, Clone)]
pub struct Unit {
    pub language: String,
    pub namespace: Option<String>,
    pub lines: Vec<Line>,
}

pub struct Project {
    pub config: Config,
    pub format: Format,
    pub transformer: Box<dyn Transformer>,
    pub worksheets: Vec<Worksheet>,
    pub runner: PluginRunner,
}

impl Project {
    /// Validates `config`, reads every worksheet and loads the plugins.
    pub fn open(config: Config, logger: SharedLogger) -> Result<Project, String> {
        config.validate()?;
        let format = config.output_format()?;

        let paths: Vec<PathBuf> = expand_source_globs(&config.sources)?;
        if paths.is_empty() {
            return Err(format!(
                "No worksheet matched: {}",
                config.sources.join(", ")
            ));
        }
        let mut worksheets = paths
            .iter()
            .map(|path| {
                debug!("Reading worksheet {}", path.display());
                read_worksheet(path)
                    .map_err(|e| format!("Failed to read worksheet '{}': {}", path.display(), e))
            })
            .collect::<Result<Vec<_>, String>>()?;
        qualify_shared_titles(&mut worksheets, &paths);

        let registry = PluginRegistry::with_builtins();
        let meta = PluginMeta {
            languages: config.languages.clone(),
        };
        let plugins = PluginLoader::new(&registry, logger.clone()).load(
            &config.plugins,
            &config.plugin_options,
            &meta,
        );

        Ok(Project {
            transformer: format.transformer(),
            format,
            worksheets,
            runner: PluginRunner::new(plugins, logger),
            config,
        })
    }

    /// Where the file for `language` and `namespace` goes.
    pub fn target<'a>(
        &'a self,
        language: &'a str,
        namespace: Option<&'a str>,
    ) -> WriteTarget<'a> {
        WriteTarget {
            language,
            namespace,
            output_dir: &self.config.output_dir,
        }
    }

    /// Output units for one language, in write order.
    ///
    /// Formats without split output get a single unit holding every
    /// namespace's lines, so no file is written twice.
    pub fn units(&self, language: &str) -> Vec<Unit> {
        let by_title = extract_lines(
            &self.worksheets,
            &self.config.key_column,
            language,
            &self.runner,
            self.runner.logger().as_ref(),
        );
        let buckets = sort_lines(by_title, language, &self.runner);

        if self.transformer.supports_split() {
            buckets
                .into_iter()
                .map(|bucket| Unit {
                    language: language.to_string(),
                    namespace: bucket.file_namespace().map(str::to_string),
                    lines: bucket.lines,
                })
                .collect()
        } else if buckets.is_empty() {
            Vec::new()
        } else {
            vec![Unit {
                language: language.to_string(),
                namespace: None,
                lines: buckets.into_iter().flat_map(|bucket| bucket.lines).collect(),
            }]
        }
    }
}

/// Files sharing a stem, like `app/strings.csv` and `web/strings.csv`, are
/// titled `app-strings` and `web-strings` so neither shadows the other.
fn qualify_shared_titles(worksheets: &mut [Worksheet], paths: &[PathBuf]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for worksheet in worksheets.iter() {
        *counts.entry(worksheet.title.clone()).or_default() += 1;
    }

    for (worksheet, path) in worksheets.iter_mut().zip(paths) {
        if counts.get(&worksheet.title).copied().unwrap_or_default() < 2 {
            continue;
        }
        if let Some(parent) = path.parent().and_then(Path::file_name) {
            let title = format!("{}-{}", parent.to_string_lossy(), worksheet.title);
            debug!("Reading {} as worksheet `{}`", path.display(), title);
            worksheet.title = title;
        }
    }
}
