//! All error types for the sheetloc crate.
//!
//! [`Error`] is returned from fallible I/O, parsing and extraction
//! operations. [`PluginError`] is what plugin factories and hooks report; the
//! plugin runner and loader log it and carry on, so it never turns into an
//! [`Error`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column `{column}` not found in worksheet `{worksheet}`")]
    ColumnNotFound { worksheet: String, column: String },
}

impl Error {
    /// Creates a column-not-found error for the given worksheet.
    pub fn column_not_found(worksheet: impl Into<String>, column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            worksheet: worksheet.into(),
            column: column.into(),
        }
    }
}

/// Failures raised by plugin factories and plugin hooks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// The plugin rejected its options. Loaders log it and skip the plugin.
    #[error("invalid configuration for plugin `{plugin}`: {message}")]
    Config { plugin: String, message: String },

    /// No factory is registered under the requested name.
    #[error("plugin `{0}` is not installed")]
    NotInstalled(String),

    /// A hook or factory failed for any other reason.
    #[error("{0}")]
    Hook(String),
}

impl PluginError {
    pub fn config(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        PluginError::Config {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    pub fn hook(message: impl Into<String>) -> Self {
        PluginError::Hook(message.into())
    }
}
