//! Project configuration file.
//!
//! ```toml
//! key_column = "key"
//! languages = ["en", "fr"]
//! format = "json"
//! output_dir = "locales"
//! sources = ["sheets/*.csv"]
//!
//! [plugin_options]
//!
//! [[plugins]]
//! name = "split"
//! options = { namespaces = ["common"] }
//! ```
//!
//! The same structure can be written as YAML or JSON; the file extension
//! selects the parser. Relative `sources` and `output_dir` are resolved
//! against the directory holding the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use sheetloc::{Format, PluginRef};

use crate::validation::{ValidationContext, validate_context, validate_file_path};

/// File names probed, in order, when no `--config` is given.
pub const DEFAULT_CONFIG_FILES: [&str; 4] = [
    "sheetloc.toml",
    "sheetloc.yaml",
    "sheetloc.yml",
    "sheetloc.json",
];

fn default_key_column() -> String {
    "key".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("locales")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_key_column")]
    pub key_column: String,
    pub languages: Vec<String>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Worksheet files or glob patterns.
    pub sources: Vec<String>,
    /// Options merged into every plugin's own options.
    #[serde(default)]
    pub plugin_options: Map<String, Value>,
    #[serde(default)]
    pub plugins: Vec<PluginRef>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub format: Option<String>,
    pub output_dir: Option<PathBuf>,
    /// Replaces the configured languages when not empty.
    pub languages: Vec<String>,
}

impl Config {
    /// Parses `content` with the parser matching `path`'s extension.
    pub fn parse(path: &Path, content: &str) -> Result<Config, String> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "toml" => toml::from_str::<Config>(content).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str::<Config>(content).map_err(|e| e.to_string()),
            "json" => serde_json::from_str::<Config>(content).map_err(|e| e.to_string()),
            _ => Err(format!(
                "Unsupported config extension: {}. Expected: toml, yaml, yml, json",
                ext
            )),
        }
        .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))
    }

    /// Reads, parses and path-resolves a config file.
    pub fn load(path: &Path) -> Result<Config, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        let mut config = Config::parse(path, &content)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// The explicit path, which must be an existing file, or the first
    /// default config file found in `dir`.
    pub fn locate(explicit: Option<&Path>, dir: &Path) -> Result<PathBuf, String> {
        if let Some(path) = explicit {
            validate_file_path(path).map_err(|e| format!("Config validation failed: {}", e))?;
            return Ok(path.to_path_buf());
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                format!(
                    "No config file found in '{}'. Expected one of: {}",
                    dir.display(),
                    DEFAULT_CONFIG_FILES.join(", ")
                )
            })
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if base.as_os_str().is_empty() {
            return;
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
        for source in &mut self.sources {
            if Path::new(source.as_str()).is_relative() {
                *source = base.join(source.as_str()).to_string_lossy().into_owned();
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if !overrides.languages.is_empty() {
            self.languages = overrides.languages;
        }
    }

    /// Checks every field that can be checked without reading worksheets.
    pub fn validate(&self) -> Result<(), String> {
        if self.languages.is_empty() {
            return Err("Config must list at least one language".to_string());
        }
        if self.sources.is_empty() {
            return Err("Config must list at least one worksheet source".to_string());
        }

        let context = self.languages.iter().fold(
            ValidationContext::new()
                .with_output_dir(self.output_dir.to_string_lossy().into_owned())
                .with_key_column(self.key_column.clone())
                .with_format(self.format.clone()),
            |context, lang| context.with_language_code(lang.clone()),
        );
        validate_context(&context)
    }

    /// The parsed output format. Call after [`Config::validate`].
    pub fn output_format(&self) -> Result<Format, String> {
        self.format.parse::<Format>().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TOML: &str = r#"
languages = ["en", "fr"]
sources = ["sheets/*.csv"]

[plugin_options]
default = "en"

[[plugins]]
name = "split"
options = { namespaces = ["common"] }

[[plugins]]
name = "fallback"
"#;

    #[test]
    fn test_parse_toml_with_defaults() {
        let config = Config::parse(Path::new("sheetloc.toml"), TOML).unwrap();
        assert_eq!(config.key_column, "key");
        assert_eq!(config.format, "json");
        assert_eq!(config.output_dir, PathBuf::from("locales"));
        assert_eq!(config.languages, vec!["en", "fr"]);
        assert_eq!(config.plugins.len(), 2);
        assert_eq!(config.plugins[0].name(), "split");
        assert_eq!(config.plugin_options.get("default"), Some(&Value::from("en")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = "languages: [de]\nsources: [a.csv]\nformat: android\nplugins:\n  - non-breaking-space\n";
        let config = Config::parse(Path::new("sheetloc.yml"), yaml).unwrap();
        assert_eq!(config.output_format().unwrap(), Format::Android);
        assert_eq!(config.plugins[0], PluginRef::from("non-breaking-space"));

        let json = r#"{"languages": ["de"], "sources": ["a.csv"], "format": "ios"}"#;
        let config = Config::parse(Path::new("sheetloc.json"), json).unwrap();
        assert_eq!(config.output_format().unwrap(), Format::Ios);
    }

    #[test]
    fn test_unknown_fields_and_extensions_are_rejected() {
        let content = "languages=[\"en\"]\nsources=[]\ncolour=1";
        let err = Config::parse(Path::new("c.toml"), content).unwrap_err();
        assert!(err.contains("colour"));
        assert!(Config::parse(Path::new("c.ini"), "").is_err());
    }

    #[test]
    fn test_load_resolves_paths_and_overrides_apply() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sheetloc.toml");
        fs::write(&path, TOML).unwrap();

        assert_eq!(Config::locate(None, dir.path()).unwrap(), path);
        let mut config = Config::load(&path).unwrap();
        assert_eq!(config.output_dir, dir.path().join("locales"));
        assert_eq!(
            config.sources,
            vec![dir.path().join("sheets/*.csv").to_string_lossy().into_owned()]
        );

        config.apply_overrides(ConfigOverrides {
            format: Some("ios".to_string()),
            output_dir: Some(PathBuf::from("out")),
            languages: vec!["fr".to_string()],
        });
        assert_eq!(config.format, "ios");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.languages, vec!["fr"]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::parse(Path::new("c.toml"), TOML).unwrap();
        config.format = "po".to_string();
        assert!(config.validate().unwrap_err().contains("Format validation failed"));

        let mut config = Config::parse(Path::new("c.toml"), TOML).unwrap();
        config.languages.clear();
        assert!(config.validate().is_err());

        assert!(Config::locate(None, Path::new("/definitely/missing")).is_err());
    }

    #[test]
    fn test_locate_checks_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "languages: [en]\nsources: [a.csv]\n").unwrap();
        assert_eq!(Config::locate(Some(&path), Path::new("/unused")).unwrap(), path);

        let missing = dir.path().join("missing.toml");
        let err = Config::locate(Some(&missing), dir.path()).unwrap_err();
        assert!(err.contains("File does not exist"));

        let err = Config::locate(Some(dir.path()), dir.path()).unwrap_err();
        assert!(err.contains("Path is not a file"));
    }
}
