//! Writing one output file per (language, namespace) unit.

use std::{
    fs::{self, File},
    io::{ErrorKind, Read},
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    line::Line,
    plugin::{LineMeta, OutputMeta, PluginRunner},
    transformers::{LINE_SEPARATOR, Transformer},
};

/// Where a unit of lines is written.
#[derive(Debug, Clone, Copy)]
pub struct WriteTarget<'a> {
    pub language: &'a str,
    /// `None` for the reserved namespace or formats without split output.
    pub namespace: Option<&'a str>,
    pub output_dir: &'a Path,
}

impl WriteTarget<'_> {
    pub fn path(&self, transformer: &dyn Transformer) -> PathBuf {
        self.output_dir
            .join(transformer.file_name(self.language, self.namespace))
    }
}

/// Renders lines through a transformer and the plugin hooks, then writes the file.
pub struct Writer<'a> {
    runner: &'a PluginRunner,
}

impl<'a> Writer<'a> {
    pub fn new(runner: &'a PluginRunner) -> Self {
        Self { runner }
    }

    /// Writes `lines` for `target`, replacing the managed part of any existing
    /// file, and returns the written path.
    ///
    /// The file content is fully built before anything is written. I/O errors
    /// are returned to the caller.
    pub fn write(
        &self,
        target: &WriteTarget<'_>,
        lines: Vec<Line>,
        transformer: &dyn Transformer,
    ) -> Result<PathBuf, Error> {
        let path = target.path(transformer);
        let existing = read_existing(&path)?;
        let output = self.render(target, &existing, lines, transformer);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, output)?;

        self.runner
            .logger()
            .log(&format!("Wrote {}", path.display()));
        Ok(path)
    }

    /// Builds the final file body without touching the filesystem.
    pub fn render(
        &self,
        target: &WriteTarget<'_>,
        existing: &str,
        lines: Vec<Line>,
        transformer: &dyn Transformer,
    ) -> String {
        let line_meta = LineMeta {
            language: target.language,
            namespace: target.namespace,
        };

        let mut fragments = Vec::new();
        let mut plurals: Vec<(String, Vec<Line>)> = Vec::new();
        for line in lines.into_iter().filter(|line| !line.is_empty()) {
            let line = self.runner.transform_line(line, &line_meta);
            if line.is_comment() {
                fragments.push(transformer.transform_comment(line.comment()));
            } else if line.is_plural() {
                match plurals.iter_mut().find(|(key, _)| key == line.key()) {
                    Some((_, variants)) => variants.push(line),
                    None => plurals.push((line.key().to_string(), vec![line])),
                }
            } else {
                fragments.push(transformer.transform_key_value(line.key(), line.value()));
            }
        }

        for (key, variants) in &plurals {
            match transformer.transform_plurals_values(key, variants) {
                Some(fragment) => fragments.push(fragment),
                None => self.runner.logger().warn(&format!(
                    "`{}` files have no plural support, skipping `{}`",
                    transformer.extension(),
                    key
                )),
            }
        }

        let rendered = fragments
            .into_iter()
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR);

        let file_name = transformer.file_name(target.language, target.namespace);
        let output = transformer.insert(existing, &rendered);
        self.runner.transform_full_output(
            output,
            &OutputMeta {
                language: target.language,
                namespace: target.namespace,
                file_name: &file_name,
            },
        )
    }
}

/// Current content of `path`; a missing file reads as empty.
///
/// A byte-order mark selects the decoding (UTF-8 or UTF-16), as Xcode may
/// save `.strings` files in UTF-16.
pub fn read_existing(path: &Path) -> Result<String, Error> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
        Err(e) => return Err(Error::Io(e)),
    };

    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);
    let mut content = String::new();
    decoder.read_to_string(&mut content)?;
    Ok(content)
}
