use std::path::Path;

use sheetloc::Format;
use unic_langid::LanguageIdentifier;

/// Everything a command checks before touching any worksheet.
#[derive(Debug, Default)]
pub struct ValidationContext {
    pub output_dir: Option<String>,
    pub key_column: Option<String>,
    pub languages: Vec<String>,
    pub format: Option<String>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, dir: String) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub fn with_key_column(mut self, column: String) -> Self {
        self.key_column = Some(column);
        self
    }

    pub fn with_language_code(mut self, lang: String) -> Self {
        self.languages.push(lang);
        self
    }

    pub fn with_format(mut self, format: String) -> Self {
        self.format = Some(format);
        self
    }
}

/// Validate file path exists and is a regular file
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// The output directory must be a directory when it already exists.
pub fn validate_output_dir(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);
    if path_obj.exists() && !path_obj.is_dir() {
        return Err(format!("Output path is not a directory: {}", path));
    }
    Ok(())
}

/// Validate language code format using unic-langid
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.trim().is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(lang_id) if !lang_id.to_string().starts_with('-') && !lang.ends_with('-') => Ok(()),
        _ => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Validate output format string
pub fn validate_format(format: &str) -> Result<(), String> {
    if format.trim().is_empty() {
        return Err("Format cannot be empty".to_string());
    }

    format.parse::<Format>().map(|_| ()).map_err(|_| {
        format!(
            "Unsupported format: {}. Supported formats: json, android, ios",
            format
        )
    })
}

/// Validate a complete validation context
pub fn validate_context(context: &ValidationContext) -> Result<(), String> {
    if let Some(ref dir) = context.output_dir {
        validate_output_dir(dir).map_err(|e| format!("Output validation failed: {}", e))?;
    }

    if let Some(ref column) = context.key_column {
        if column.trim().is_empty() {
            return Err("Key column cannot be empty".to_string());
        }
    }

    for lang in &context.languages {
        validate_language_code(lang)
            .map_err(|e| format!("Language code validation failed: {}", e))?;
    }

    if let Some(ref format) = context.format {
        validate_format(format).map_err(|e| format!("Format validation failed: {}", e))?;
    }

    Ok(())
}
