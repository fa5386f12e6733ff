//! Grouping worksheet lines into namespaces.

use crate::{
    line::Line,
    plugin::{PluginRunner, SortMeta},
    worksheet::WorksheetLinesByTitle,
};

/// Reserved namespace holding every line no plugin claimed.
pub const OTHER_NAMESPACE: &str = "__other__";

/// Lines that end up in the same namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinesWithNamespace {
    pub namespace: String,
    pub lines: Vec<Line>,
}

impl LinesWithNamespace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self::with_lines(namespace, Vec::new())
    }

    pub fn with_lines(namespace: impl Into<String>, lines: Vec<Line>) -> Self {
        Self {
            namespace: namespace.into(),
            lines,
        }
    }

    pub fn is_other(&self) -> bool {
        self.namespace == OTHER_NAMESPACE
    }

    /// The namespace to put in file names; `None` for the reserved one.
    pub fn file_namespace(&self) -> Option<&str> {
        (!self.is_other()).then_some(self.namespace.as_str())
    }
}

/// Groups one language's lines into namespaces.
///
/// Sort-capable plugins claim lines first; whatever they leave goes to
/// [`OTHER_NAMESPACE`], in worksheet order then row order. The reserved
/// bucket is dropped when empty and is always last otherwise. The relative
/// order of the other namespaces is the order plugins created them in.
pub fn sort_lines(
    lines_by_title: WorksheetLinesByTitle,
    language: &str,
    runner: &PluginRunner,
) -> Vec<LinesWithNamespace> {
    let mut namespaces = vec![LinesWithNamespace::new(OTHER_NAMESPACE)];

    let remaining = if runner.has_sort_plugin() {
        runner.sort_lines(lines_by_title, &mut namespaces, &SortMeta { language })
    } else {
        lines_by_title
    };

    let other_index = match namespaces.iter().position(LinesWithNamespace::is_other) {
        Some(index) => index,
        None => {
            namespaces.push(LinesWithNamespace::new(OTHER_NAMESPACE));
            namespaces.len() - 1
        }
    };
    namespaces[other_index].lines.extend(remaining.into_lines());

    namespaces.retain(|bucket| !(bucket.is_other() && bucket.lines.is_empty()));
    // Stable: only moves the reserved bucket.
    namespaces.sort_by_key(LinesWithNamespace::is_other);
    namespaces
}
