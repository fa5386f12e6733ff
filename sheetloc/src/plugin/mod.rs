//! Plugin protocol.
//!
//! A plugin implements any subset of four hooks. Every hook has an identity
//! default, so skipping a hook (or a whole plugin) never changes the data:
//!
//! | hook | input | runs |
//! |---|---|---|
//! | [`Plugin::read_translation`] | one [`Line`] and its spreadsheet row | once per row, during extraction |
//! | [`Plugin::sort_lines`] | all lines of a language, by worksheet | once per language, in the sorter |
//! | [`Plugin::transform_line`] | one non-empty [`Line`] | once per line, in the writer |
//! | [`Plugin::transform_full_output`] | the final file body | once per written file |
//!
//! Plugins are built by factories looked up by name in a [`PluginRegistry`]
//! (see [`loader`]) and executed in order by a [`PluginRunner`].

pub mod builtin;
pub mod loader;
pub mod runner;

use std::fmt::Display;

pub use loader::{
    PluginFactory, PluginLoader, PluginMeta, PluginOptions, PluginRef, PluginRegistry,
    PluginResolver,
};
pub use runner::PluginRunner;

use crate::{
    error::PluginError, line::Line, sorter::LinesWithNamespace, worksheet::Row,
    worksheet::WorksheetLinesByTitle,
};

/// Metadata passed to [`Plugin::read_translation`].
#[derive(Debug, Clone, Copy)]
pub struct ReadTranslationMeta<'a> {
    /// The raw key cell, before comment/plural classification.
    pub key: &'a str,
    pub language: &'a str,
    pub row: &'a Row,
}

/// Metadata passed to [`Plugin::transform_line`].
#[derive(Debug, Clone, Copy)]
pub struct LineMeta<'a> {
    pub language: &'a str,
    pub namespace: Option<&'a str>,
}

/// Metadata passed to [`Plugin::transform_full_output`].
#[derive(Debug, Clone, Copy)]
pub struct OutputMeta<'a> {
    pub language: &'a str,
    pub namespace: Option<&'a str>,
    pub file_name: &'a str,
}

/// Metadata passed to [`Plugin::sort_lines`].
#[derive(Debug, Clone, Copy)]
pub struct SortMeta<'a> {
    pub language: &'a str,
}

/// Extension points of the pipeline.
///
/// Hooks take `&self`; plugins that keep counters or caches need interior
/// mutability. An `Err` from any hook is logged by the runner and the value
/// from before the hook is passed on.
pub trait Plugin: Send + Sync {
    fn read_translation(
        &self,
        line: Line,
        _meta: &ReadTranslationMeta<'_>,
    ) -> Result<Line, PluginError> {
        Ok(line)
    }

    fn transform_line(&self, line: Line, _meta: &LineMeta<'_>) -> Result<Line, PluginError> {
        Ok(line)
    }

    fn transform_full_output(
        &self,
        output: String,
        _meta: &OutputMeta<'_>,
    ) -> Result<String, PluginError> {
        Ok(output)
    }

    /// Claims lines into namespace buckets and returns the lines left unclaimed.
    ///
    /// New buckets are pushed onto `namespaces`. Only called when
    /// [`Plugin::supports_sort`] returns `true`.
    fn sort_lines(
        &self,
        lines_by_title: WorksheetLinesByTitle,
        _namespaces: &mut Vec<LinesWithNamespace>,
        _meta: &SortMeta<'_>,
    ) -> Result<WorksheetLinesByTitle, PluginError> {
        Ok(lines_by_title)
    }

    fn supports_sort(&self) -> bool {
        false
    }
}

/// A plugin tagged with the name it was loaded under.
pub struct LoadedPlugin {
    pub name: String,
    pub plugin: Box<dyn Plugin>,
}

impl LoadedPlugin {
    pub fn new(name: impl Into<String>, plugin: Box<dyn Plugin>) -> Self {
        Self {
            name: name.into(),
            plugin,
        }
    }
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("name", &self.name)
            .field("supports_sort", &self.plugin.supports_sort())
            .finish()
    }
}

/// Names of the hooks, used in warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    ReadTranslation,
    TransformLine,
    TransformFullOutput,
    SortLines,
}

impl Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hook::ReadTranslation => write!(f, "read_translation"),
            Hook::TransformLine => write!(f, "transform_line"),
            Hook::TransformFullOutput => write!(f, "transform_full_output"),
            Hook::SortLines => write!(f, "sort_lines"),
        }
    }
}
