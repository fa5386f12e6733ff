use std::{io::Write, path::PathBuf, sync::Arc};

use sheetloc::{MemoryLogger, Writer, writer::read_existing};

use crate::{
    config::ConfigOverrides, project::Project, sync::load_config,
    validation::validate_language_code,
};

#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub config: Option<PathBuf>,
    pub format: Option<String>,
    pub lang: String,
}

/// Renders every unit of `lang` as it would be written, without writing.
pub fn render_preview(
    project: &Project,
    lang: &str,
    out: &mut impl Write,
) -> Result<usize, String> {
    let writer = Writer::new(&project.runner);
    let units = project.units(lang);
    let count = units.len();

    for unit in units {
        let target = project.target(&unit.language, unit.namespace.as_deref());
        let path = target.path(project.transformer.as_ref());
        let existing = read_existing(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        let rendered = writer.render(
            &target,
            &existing,
            unit.lines,
            project.transformer.as_ref(),
        );
        writeln!(out, "==> {} <==\n{}\n", path.display(), rendered)
            .map_err(|e| e.to_string())?;
    }
    Ok(count)
}

pub fn run_preview_command(opts: PreviewOptions) -> Result<(), String> {
    validate_language_code(&opts.lang)?;
    let overrides = ConfigOverrides {
        format: opts.format,
        output_dir: None,
        languages: vec![opts.lang.clone()],
    };
    let config = load_config(opts.config.as_ref(), overrides)?;

    let logger = Arc::new(MemoryLogger::new());
    let project = Project::open(config, logger.clone())?;

    let stdout = std::io::stdout();
    let count = render_preview(&project, &opts.lang, &mut stdout.lock())?;
    for warning in logger.warnings() {
        eprintln!("⚠️  {}", warning);
    }
    if count == 0 {
        eprintln!("No translations found for language: {}", opts.lang);
    }
    Ok(())
}
