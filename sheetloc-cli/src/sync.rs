use std::{path::PathBuf, sync::Arc};

use sheetloc::{TracingLogger, Writer};
use tracing::{error, info};

use crate::{
    config::{Config, ConfigOverrides},
    project::{Project, Unit},
};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub config: Option<PathBuf>,
    pub format: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub langs: Vec<String>,
}

/// Outcome of a sync run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

/// Loads `config`, or the default config file of the working directory, and
/// applies the command-line overrides.
pub fn load_config(
    config: Option<&PathBuf>,
    overrides: ConfigOverrides,
) -> Result<Config, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine working directory: {}", e))?;
    let path = Config::locate(config.map(PathBuf::as_path), &cwd)?;
    let mut config = Config::load(&path)?;
    config.apply_overrides(overrides);
    Ok(config)
}

/// Writes every (language, namespace) unit of `project`.
///
/// A unit that fails to write is logged and counted; the others still run.
pub fn sync_project(project: &Project) -> SyncReport {
    let writer = Writer::new(&project.runner);
    let mut report = SyncReport::default();

    for language in &project.config.languages {
        for Unit { namespace, lines, .. } in project.units(language) {
            let target = project.target(language, namespace.as_deref());
            match writer.write(&target, lines, project.transformer.as_ref()) {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    error!(
                        "Failed to write {} for {}: {}",
                        target.path(project.transformer.as_ref()).display(),
                        language,
                        e
                    );
                    report.failed += 1;
                }
            }
        }
    }
    report
}

pub fn run_sync_command(opts: SyncOptions) -> Result<(), String> {
    let overrides = ConfigOverrides {
        format: opts.format,
        output_dir: opts.output_dir,
        languages: opts.langs,
    };
    let config = load_config(opts.config.as_ref(), overrides)?;
    let project = Project::open(config, Arc::new(TracingLogger))?;

    let report = sync_project(&project);
    info!(
        "Synced {} file(s) in {} format",
        report.written.len(),
        project.format
    );

    if report.written.is_empty() && report.failed > 0 {
        return Err(format!("All {} file(s) failed to write", report.failed));
    }
    if report.failed > 0 {
        eprintln!("⚠️  {} file(s) failed to write", report.failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(dir: &TempDir, config: &str) -> Project {
        let sheets = dir.path().join("sheets");
        fs::create_dir_all(&sheets).unwrap();
        fs::write(
            sheets.join("app.csv"),
            "key,en,fr\ncommon.ok,OK,D'accord\ntitle,Title,Titre\n",
        )
        .unwrap();
        let path = dir.path().join("sheetloc.toml");
        fs::write(&path, config).unwrap();
        Project::open(Config::load(&path).unwrap(), Arc::new(TracingLogger)).unwrap()
    }

    #[test]
    fn test_sync_writes_every_language_and_namespace() {
        let dir = TempDir::new().unwrap();
        let project = project(
            &dir,
            r#"
languages = ["en", "fr"]
sources = ["sheets/*.csv"]

[[plugins]]
name = "split"
options = { namespaces = ["common"] }
"#,
        );

        let report = sync_project(&project);
        let out = dir.path().join("locales");
        assert_eq!(report.failed, 0);
        assert_eq!(
            report.written,
            vec![
                out.join("common.en.json"),
                out.join("en.json"),
                out.join("common.fr.json"),
                out.join("fr.json"),
            ]
        );
    }

    #[test]
    fn test_sync_merges_namespaces_for_formats_without_split() {
        let dir = TempDir::new().unwrap();
        let project = project(
            &dir,
            r#"
languages = ["fr"]
sources = ["sheets/*.csv"]
format = "ios"
output_dir = "ios"
plugins = [{ name = "split", options = { namespaces = ["common"] } }]
"#,
        );

        let report = sync_project(&project);
        assert_eq!(report.written, vec![dir.path().join("ios").join("fr.strings")]);
        let content = fs::read_to_string(&report.written[0]).unwrap();
        assert!(content.contains("\"ok\" = \"D'accord\";"));
        assert!(content.contains("\"title\" = \"Titre\";"));
    }

    #[test]
    fn test_same_file_stem_in_two_directories_keeps_both() {
        let dir = TempDir::new().unwrap();
        for (folder, key) in [("app", "app.title"), ("web", "web.title")] {
            fs::create_dir_all(dir.path().join(folder)).unwrap();
            fs::write(
                dir.path().join(folder).join("strings.csv"),
                format!("key,en\n{},Title\n", key),
            )
            .unwrap();
        }
        let path = dir.path().join("sheetloc.toml");
        fs::write(
            &path,
            "languages = [\"en\"]\nsources = [\"app/*.csv\", \"web/*.csv\"]\n",
        )
        .unwrap();
        let project = Project::open(Config::load(&path).unwrap(), Arc::new(TracingLogger)).unwrap();

        let titles: Vec<_> = project.worksheets.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["app-strings", "web-strings"]);

        let report = sync_project(&project);
        let content = fs::read_to_string(&report.written[0]).unwrap();
        assert!(content.contains("\"app.title\" : \"Title\""));
        assert!(content.contains("\"web.title\" : \"Title\""));
    }

    #[test]
    fn test_write_failure_is_counted_not_fatal() {
        let dir = TempDir::new().unwrap();
        let project = project(
            &dir,
            "languages = [\"en\"]\nsources = [\"sheets/*.csv\"]\noutput_dir = \"blocked\"\n",
        );
        // A file where the output directory should be.
        fs::write(dir.path().join("blocked"), "").unwrap();

        let report = sync_project(&project);
        assert!(report.written.is_empty());
        assert_eq!(report.failed, 1);
    }
}
