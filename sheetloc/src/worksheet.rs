//! Worksheets and the per-worksheet line collections built from them.

use std::collections::HashMap;

use crate::{
    error::Error,
    line::Line,
    logger::Logger,
    plugin::{PluginRunner, ReadTranslationMeta},
};

/// Raw rows of one worksheet: a header row and the data rows below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Worksheet {
    pub fn new(title: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            title: title.into(),
            headers,
            rows,
        }
    }

    /// Index of a column, matched case-insensitively on the trimmed header.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        let wanted = column.trim().to_lowercase();
        self.headers
            .iter()
            .position(|header| header.trim().to_lowercase() == wanted)
    }

    /// Builds the row view handed to `read_translation` hooks.
    pub fn row(&self, index: usize) -> Option<Row> {
        self.rows.get(index).map(|cells| Row::new(&self.headers, cells))
    }
}

/// One data row keyed by lowercased column header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new(headers: &[String], cells: &[String]) -> Self {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                (
                    header.trim().to_lowercase(),
                    cells.get(i).cloned().unwrap_or_default(),
                )
            })
            .collect();
        Row { cells }
    }

    /// Cell for a column, matched case-insensitively.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(&column.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into().trim().to_lowercase(), v.into()))
                .collect(),
        }
    }
}

/// Lines grouped by worksheet title, in worksheet order.
///
/// Titles are unique: inserting an existing title replaces its lines in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorksheetLinesByTitle {
    sheets: Vec<(String, Vec<Line>)>,
}

impl WorksheetLinesByTitle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: impl Into<String>, lines: Vec<Line>) {
        let title = title.into();
        match self.sheets.iter_mut().find(|(t, _)| *t == title) {
            Some((_, existing)) => *existing = lines,
            None => self.sheets.push((title, lines)),
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.sheets.iter().any(|(t, _)| t == title)
    }

    pub fn get(&self, title: &str) -> Option<&Vec<Line>> {
        self.sheets
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, lines)| lines)
    }

    pub fn remove(&mut self, title: &str) -> Option<Vec<Line>> {
        let index = self.sheets.iter().position(|(t, _)| t == title)?;
        Some(self.sheets.remove(index).1)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(title, _)| title.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vec<Line>)> {
        self.sheets.iter().map(|(title, lines)| (title.as_str(), lines))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Every line of every worksheet, worksheet order first, then row order.
    pub fn into_lines(self) -> Vec<Line> {
        self.sheets.into_iter().flat_map(|(_, lines)| lines).collect()
    }
}

impl IntoIterator for WorksheetLinesByTitle {
    type Item = (String, Vec<Line>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Line>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}

impl<T: Into<String>> FromIterator<(T, Vec<Line>)> for WorksheetLinesByTitle {
    fn from_iter<I: IntoIterator<Item = (T, Vec<Line>)>>(iter: I) -> Self {
        let mut by_title = WorksheetLinesByTitle::new();
        for (title, lines) in iter {
            by_title.insert(title, lines);
        }
        by_title
    }
}

/// Builds the lines of one worksheet for a `(key column, language)` pair.
///
/// Every line goes through the `read_translation` hook with the full row.
pub fn extract_worksheet_lines(
    worksheet: &Worksheet,
    key_column: &str,
    language: &str,
    runner: &PluginRunner,
) -> Result<Vec<Line>, Error> {
    let key_index = worksheet
        .column_index(key_column)
        .ok_or_else(|| Error::column_not_found(&worksheet.title, key_column))?;
    let value_index = worksheet
        .column_index(language)
        .ok_or_else(|| Error::column_not_found(&worksheet.title, language))?;

    let lines = worksheet
        .rows
        .iter()
        .map(|cells| {
            let key = cells.get(key_index).map(String::as_str);
            let value = cells.get(value_index).map(String::as_str);
            let line = Line::new(key, value);
            let row = Row::new(&worksheet.headers, cells);
            let meta = ReadTranslationMeta {
                key: key.unwrap_or_default(),
                language,
                row: &row,
            };
            runner.read_translation(line, &meta)
        })
        .collect();

    Ok(lines)
}

/// Extracts every worksheet for one language.
///
/// A worksheet missing the key or language column is reported through the
/// logger and left out; it never aborts the whole read. A worksheet whose title
/// was already read is kept under a numbered title, with a warning.
pub fn extract_lines(
    worksheets: &[Worksheet],
    key_column: &str,
    language: &str,
    runner: &PluginRunner,
    logger: &dyn Logger,
) -> WorksheetLinesByTitle {
    let mut by_title = WorksheetLinesByTitle::new();
    for worksheet in worksheets {
        match extract_worksheet_lines(worksheet, key_column, language, runner) {
            Ok(lines) => {
                let title = unique_title(&by_title, &worksheet.title);
                if title != worksheet.title {
                    logger.warn(&format!(
                        "Duplicate worksheet title `{}`, reading it as `{}`",
                        worksheet.title, title
                    ));
                }
                by_title.insert(title, lines);
            }
            Err(e) => logger.warn(&format!("Skipping worksheet `{}`: {}", worksheet.title, e)),
        }
    }
    by_title
}

fn unique_title(by_title: &WorksheetLinesByTitle, title: &str) -> String {
    if !by_title.contains(title) {
        return title.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", title, n);
        if !by_title.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::PluginError,
        logger::MemoryLogger,
        plugin::{LoadedPlugin, Plugin},
    };
    use std::sync::Arc;

    fn sheet(title: &str) -> Worksheet {
        Worksheet::new(
            title,
            vec!["Key".to_string(), "EN".to_string(), "Fr".to_string()],
            vec![
                vec!["// Home".to_string(), String::new(), String::new()],
                vec!["home.title".to_string(), "Home".to_string(), "Accueil".to_string()],
                vec!["home.short".to_string(), "Hi".to_string()],
            ],
        )
    }

    #[test]
    fn test_columns_match_case_insensitively() {
        let ws = sheet("Home");
        assert_eq!(ws.column_index("key"), Some(0));
        assert_eq!(ws.column_index("en"), Some(1));
        assert_eq!(ws.column_index("FR"), Some(2));
        assert_eq!(ws.column_index("de"), None);
    }

    #[test]
    fn test_extract_worksheet_lines_keeps_row_order() {
        let runner = PluginRunner::empty();
        let lines = extract_worksheet_lines(&sheet("Home"), "key", "fr", &runner).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].is_comment());
        assert_eq!(lines[1].value(), "Accueil");
        // Short rows read as empty cells.
        assert_eq!(lines[2].value(), "");
        assert!(lines[2].is_empty());
    }

    #[test]
    fn test_missing_language_column_skips_worksheet() {
        let runner = PluginRunner::empty();
        let logger = MemoryLogger::new();
        let other = Worksheet::new(
            "Settings",
            vec!["key".to_string(), "en".to_string()],
            vec![vec!["settings.title".to_string(), "Settings".to_string()]],
        );
        let by_title = extract_lines(&[sheet("Home"), other], "key", "fr", &runner, &logger);

        assert_eq!(by_title.titles().collect::<Vec<_>>(), vec!["Home"]);
        assert_eq!(logger.warnings().len(), 1);
        assert!(logger.warnings()[0].contains("Settings"));
    }

    #[test]
    fn test_duplicate_titles_are_kept_and_reported() {
        let runner = PluginRunner::empty();
        let logger = MemoryLogger::new();
        let app = Worksheet::new(
            "strings",
            vec!["key".to_string(), "en".to_string()],
            vec![vec!["app.title".to_string(), "App".to_string()]],
        );
        let web = Worksheet::new(
            "strings",
            vec!["key".to_string(), "en".to_string()],
            vec![vec!["web.title".to_string(), "Web".to_string()]],
        );
        let by_title = extract_lines(&[app, web], "key", "en", &runner, &logger);

        assert_eq!(by_title.titles().collect::<Vec<_>>(), vec!["strings", "strings-2"]);
        let keys: Vec<_> = by_title
            .into_lines()
            .iter()
            .map(|l| l.key().to_string())
            .collect();
        assert_eq!(keys, vec!["app.title", "web.title"]);
        assert_eq!(logger.warnings().len(), 1);
        assert!(logger.warnings()[0].contains("strings-2"));
    }

    struct MutateThenFail;

    impl Plugin for MutateThenFail {
        fn read_translation(
            &self,
            mut line: Line,
            _meta: &ReadTranslationMeta<'_>,
        ) -> Result<Line, PluginError> {
            line.replace_value("corrupted");
            Err(PluginError::hook("cannot read"))
        }
    }

    #[test]
    fn test_failing_read_hook_keeps_line_and_warns_once_per_row() {
        let logger = Arc::new(MemoryLogger::new());
        let runner = PluginRunner::new(
            vec![LoadedPlugin::new("mutate", Box::new(MutateThenFail))],
            logger.clone(),
        );
        let ws = Worksheet::new(
            "Home",
            vec!["key".to_string(), "fr".to_string()],
            vec![vec!["home.title".to_string(), "Accueil".to_string()]],
        );
        let lines = extract_worksheet_lines(&ws, "key", "fr", &runner).unwrap();

        assert_eq!(lines, vec![Line::from(("home.title", "Accueil"))]);
        assert_eq!(logger.warnings().len(), 1);
        assert!(logger.warnings()[0].contains("mutate"));
        assert!(logger.warnings()[0].contains("cannot read"));
    }

    #[test]
    fn test_row_lookup() {
        let ws = sheet("Home");
        let row = ws.row(1).unwrap();
        assert_eq!(row.get("EN"), Some("Home"));
        assert_eq!(row.get("fr"), Some("Accueil"));
        assert_eq!(row.get("de"), None);
    }

    #[test]
    fn test_lines_by_title_insert_replaces_existing_title() {
        let mut by_title = WorksheetLinesByTitle::new();
        by_title.insert("a", vec![Line::from(("k1", "v1"))]);
        by_title.insert("b", vec![Line::from(("k2", "v2"))]);
        by_title.insert("a", vec![Line::from(("k3", "v3"))]);

        assert_eq!(by_title.titles().collect::<Vec<_>>(), vec!["a", "b"]);
        let keys: Vec<_> = by_title
            .into_lines()
            .iter()
            .map(|l| l.key().to_string())
            .collect();
        assert_eq!(keys, vec!["k3", "k2"]);
    }
}
