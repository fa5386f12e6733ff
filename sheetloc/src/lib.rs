#![forbid(unsafe_code)]
//! Spreadsheet-driven localization file generator.
//!
//! Worksheets (one per CSV/TSV export) hold a key column and one column per
//! language. For each language, rows become [`Line`]s, are grouped into
//! namespaces by the [`sorter`], and are written as JSON, Android
//! `strings.xml` or Apple `.strings` files by the [`Writer`]. Plugins hook
//! into reading, sorting, line rendering and the final file output.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sheetloc::{
//!     Format, PluginRunner, WriteTarget, Writer, extract_lines, read_worksheet, sort_lines,
//! };
//!
//! let sheets = vec![read_worksheet(Path::new("sheets/home.csv"))?];
//! let runner = PluginRunner::empty();
//! let transformer = Format::Json.transformer();
//!
//! let by_title = extract_lines(&sheets, "key", "en", &runner, runner.logger().as_ref());
//! for bucket in sort_lines(by_title, "en", &runner) {
//!     let namespace = bucket.file_namespace().map(str::to_string);
//!     let target = WriteTarget {
//!         language: "en",
//!         namespace: namespace.as_deref(),
//!         output_dir: Path::new("locales"),
//!     };
//!     Writer::new(&runner).write(&target, bucket.lines, transformer.as_ref())?;
//! }
//! # Ok::<(), sheetloc::Error>(())
//! ```
//!
//! # Supported Formats
//!
//! - **JSON**: flat key/value object, one file per namespace
//! - **Android `strings.xml`**: strings and plurals inside a managed block
//! - **Apple `.strings`**: key/value pairs inside a managed block
//!
//! # Built-in Plugins
//!
//! - `fallback`: fills empty cells from another language column
//! - `split`: routes lines into namespaces by key prefix or worksheet
//! - `non-breaking-space`: French-style spacing before `?!:;»` and after `«`

pub mod error;
pub mod line;
pub mod logger;
pub mod plugin;
pub mod sorter;
pub mod source;
pub mod transformers;
pub mod worksheet;
pub mod writer;

pub use crate::{
    error::{Error, PluginError},
    line::{Line, LineKind, PluralCategory},
    logger::{Logger, MemoryLogger, SharedLogger, TracingLogger},
    plugin::{
        LineMeta, LoadedPlugin, OutputMeta, Plugin, PluginLoader, PluginMeta, PluginOptions,
        PluginRef, PluginRegistry, PluginRunner, ReadTranslationMeta, SortMeta,
    },
    sorter::{LinesWithNamespace, OTHER_NAMESPACE, sort_lines},
    source::{read_worksheet, read_worksheet_from_reader},
    transformers::{Format, Transformer},
    worksheet::{Row, Worksheet, WorksheetLinesByTitle, extract_lines},
    writer::{WriteTarget, Writer},
};
