use std::{fs, path::Path, sync::Arc};

use serde_json::{Map, json};
use sheetloc::{
    Format, Line, MemoryLogger, PluginLoader, PluginMeta, PluginRef, PluginRegistry,
    PluginRunner, WorksheetLinesByTitle, WriteTarget, Writer, extract_lines, read_worksheet,
    sort_lines,
};
use tempfile::TempDir;

fn write_all(
    runner: &PluginRunner,
    by_title: WorksheetLinesByTitle,
    language: &str,
    format: Format,
    output_dir: &Path,
) -> Vec<String> {
    let transformer = format.transformer();
    let writer = Writer::new(runner);
    let mut written = Vec::new();
    for bucket in sort_lines(by_title, language, runner) {
        let namespace = bucket.file_namespace().map(str::to_string);
        let target = WriteTarget {
            language,
            namespace: namespace.as_deref(),
            output_dir,
        };
        let path = writer
            .write(&target, bucket.lines, transformer.as_ref())
            .unwrap();
        written.push(path.file_name().unwrap().to_string_lossy().into_owned());
    }
    written
}

#[test]
fn two_worksheets_without_plugins_share_one_file() {
    let dir = TempDir::new().unwrap();
    let runner = PluginRunner::empty();
    let by_title: WorksheetLinesByTitle = [
        ("sheet1", vec![Line::from(("a.b", "X"))]),
        ("sheet2", vec![Line::from(("c.d", "Y"))]),
    ]
    .into_iter()
    .collect();

    let written = write_all(&runner, by_title, "en", Format::Json, dir.path());

    assert_eq!(written, vec!["en.json"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("en.json")).unwrap(),
        "\n{\n  \"a.b\" : \"X\",\n  \"c.d\" : \"Y\"\n}"
    );
}

#[test]
fn csv_worksheets_with_builtin_plugins() {
    let dir = TempDir::new().unwrap();
    let sheets_dir = dir.path().join("sheets");
    fs::create_dir_all(&sheets_dir).unwrap();
    fs::write(
        sheets_dir.join("home.csv"),
        "key,en,fr\n# Home screen,,\ncommon.ok,OK,D'accord\ncommon.cancel,Cancel,\nhome.title,Welcome!,Bienvenue !\n",
    )
    .unwrap();
    fs::write(
        sheets_dir.join("broken.csv"),
        "id,en\nsomething,Something\n",
    )
    .unwrap();

    let sheets = vec![
        read_worksheet(&sheets_dir.join("home.csv")).unwrap(),
        read_worksheet(&sheets_dir.join("broken.csv")).unwrap(),
    ];

    let logger = Arc::new(MemoryLogger::new());
    let registry = PluginRegistry::with_builtins();
    let refs: Vec<PluginRef> = serde_json::from_value(json!([
        { "name": "fallback", "options": { "default": "en" } },
        { "name": "split", "options": { "namespaces": ["common"] } },
        "non-breaking-space",
        "does-not-exist"
    ]))
    .unwrap();
    let meta = PluginMeta {
        languages: vec!["en".to_string(), "fr".to_string()],
    };
    let plugins = PluginLoader::new(&registry, logger.clone()).load(&refs, &Map::new(), &meta);
    assert_eq!(plugins.len(), 3);
    let runner = PluginRunner::new(plugins, logger.clone());

    let by_title = extract_lines(&sheets, "key", "fr", &runner, logger.as_ref());
    assert_eq!(by_title.titles().collect::<Vec<_>>(), vec!["home"]);

    let out = dir.path().join("locales");
    let written = write_all(&runner, by_title, "fr", Format::Json, &out);
    assert_eq!(written, vec!["common.fr.json", "fr.json"]);

    let common = fs::read_to_string(out.join("common.fr.json")).unwrap();
    assert_eq!(
        common,
        "\n{\n  \"ok\" : \"D'accord\",\n  \"cancel\" : \"Cancel\"\n}"
    );
    let other = fs::read_to_string(out.join("fr.json")).unwrap();
    assert_eq!(other, "\n{\n  \"home.title\" : \"Bienvenue\u{a0}!\"\n}");

    let warnings = logger.warnings();
    assert!(warnings.iter().any(|w| w.contains("does-not-exist")));
    assert!(warnings.iter().any(|w| w.contains("broken")));
}

#[test]
fn android_rewrite_keeps_manual_resources() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("en.xml");
    fs::write(
        &path,
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n    <string name=\"app_name\">Demo</string>\n</resources>\n",
    )
    .unwrap();

    let runner = PluginRunner::empty();
    let first: WorksheetLinesByTitle = [(
        "main",
        vec![
            Line::from(("songs##{one}", "%d song")),
            Line::from(("songs##{other}", "%d songs")),
            Line::from(("title", "Songs")),
        ],
    )]
    .into_iter()
    .collect();
    write_all(&runner, first, "en", Format::Android, dir.path());
    let once = fs::read_to_string(&path).unwrap();

    let second: WorksheetLinesByTitle = [("main", vec![Line::from(("title", "Tracks"))])]
        .into_iter()
        .collect();
    write_all(&runner, second, "en", Format::Android, dir.path());
    let twice = fs::read_to_string(&path).unwrap();

    assert!(once.contains("<plurals name=\"songs\">"));
    assert!(twice.contains("<string name=\"app_name\">Demo</string>"));
    assert!(twice.contains("<string name=\"title\">Tracks</string>"));
    assert!(!twice.contains("songs"));
    assert_eq!(twice.matches("AUTO-GENERATED CONTENT START").count(), 1);
}
