use std::sync::Arc;

use crate::{
    error::PluginError,
    line::Line,
    logger::{SharedLogger, TracingLogger},
    sorter::LinesWithNamespace,
    worksheet::WorksheetLinesByTitle,
};

use super::{Hook, LineMeta, LoadedPlugin, OutputMeta, Plugin, ReadTranslationMeta, SortMeta};

/// Runs hooks across an ordered list of plugins.
///
/// Each hook is folded: the output of one plugin is the input of the next.
/// A failing plugin is reported once and its input is handed on unchanged.
pub struct PluginRunner {
    plugins: Vec<LoadedPlugin>,
    logger: SharedLogger,
}

impl PluginRunner {
    pub fn new(plugins: Vec<LoadedPlugin>, logger: SharedLogger) -> Self {
        Self { plugins, logger }
    }

    /// A runner without plugins; every hook is the identity.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Arc::new(TracingLogger))
    }

    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }

    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }

    /// Whether any loaded plugin takes part in namespace sorting.
    pub fn has_sort_plugin(&self) -> bool {
        self.plugins.iter().any(|p| p.plugin.supports_sort())
    }

    pub fn read_translation(&self, line: Line, meta: &ReadTranslationMeta<'_>) -> Line {
        self.fold(Hook::ReadTranslation, line, |plugin, line| {
            plugin.read_translation(line, meta)
        })
    }

    pub fn transform_line(&self, line: Line, meta: &LineMeta<'_>) -> Line {
        self.fold(Hook::TransformLine, line, |plugin, line| {
            plugin.transform_line(line, meta)
        })
    }

    pub fn transform_full_output(&self, output: String, meta: &OutputMeta<'_>) -> String {
        self.fold(Hook::TransformFullOutput, output, |plugin, output| {
            plugin.transform_full_output(output, meta)
        })
    }

    /// Runs `sort_lines` on every sort-capable plugin in order.
    ///
    /// When a plugin fails, both the remaining lines and the namespace list
    /// are rolled back to what they were before that plugin ran.
    pub fn sort_lines(
        &self,
        lines_by_title: WorksheetLinesByTitle,
        namespaces: &mut Vec<LinesWithNamespace>,
        meta: &SortMeta<'_>,
    ) -> WorksheetLinesByTitle {
        let mut remaining = lines_by_title;
        for loaded in self.plugins.iter().filter(|p| p.plugin.supports_sort()) {
            let lines_before = remaining.clone();
            let namespaces_before = namespaces.clone();
            match loaded.plugin.sort_lines(remaining, namespaces, meta) {
                Ok(unclaimed) => remaining = unclaimed,
                Err(e) => {
                    self.report_failure(loaded, Hook::SortLines, &e);
                    *namespaces = namespaces_before;
                    remaining = lines_before;
                }
            }
        }
        remaining
    }

    fn fold<T: Clone>(
        &self,
        hook: Hook,
        initial: T,
        mut call: impl FnMut(&dyn Plugin, T) -> Result<T, PluginError>,
    ) -> T {
        self.plugins.iter().fold(initial, |value, loaded| {
            let before = value.clone();
            match call(loaded.plugin.as_ref(), value) {
                Ok(next) => next,
                Err(e) => {
                    self.report_failure(loaded, hook, &e);
                    before
                }
            }
        })
    }

    fn report_failure(&self, loaded: &LoadedPlugin, hook: Hook, error: &PluginError) {
        self.logger.warn(&format!(
            "Plugin `{}` failed in `{}` hook, ignoring its result: {}",
            loaded.name, hook, error
        ));
    }
}

impl std::fmt::Debug for PluginRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRunner")
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}
