use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use rayon::prelude::*;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

/// Directory part of a pattern before its first glob meta-character.
fn static_prefix_dir(pattern: &str) -> PathBuf {
    let idx = pattern
        .bytes()
        .position(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
        .unwrap_or(pattern.len());
    let prefix = Path::new(&pattern[..idx]);
    if prefix.is_dir() {
        prefix.to_path_buf()
    } else {
        prefix
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn matching_files(root: &Path, matcher: &GlobMatcher) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .git_ignore(true)
        .git_exclude(true)
        .hidden(false)
        .parents(true)
        .build();

    let mut files = walker
        .filter_map(Result::ok)
        .filter(|dent| dent.file_type().is_some_and(|t| t.is_file()))
        .map(|dent| dent.into_path())
        .filter(|path| {
            let relative = path.strip_prefix("./").unwrap_or(path);
            matcher.is_match(path) || matcher.is_match(relative)
        })
        .collect::<Vec<_>>();
    files.sort();
    files
}

/// Expands worksheet source patterns into concrete file paths.
///
/// Patterns keep their configured order; files matched by one glob are sorted
/// by path. Literal paths pass through untouched so a missing file surfaces as
/// a read error later. A file matched twice is kept at its first position.
pub fn expand_source_globs(patterns: &[String]) -> Result<Vec<PathBuf>, String> {
    let matchers = patterns
        .iter()
        .map(|pattern| {
            if !has_glob_meta(pattern) {
                return Ok(None);
            }
            GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map(|glob| Some(glob.compile_matcher()))
                .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))
        })
        .collect::<Result<Vec<_>, String>>()?;

    let expanded: Vec<Vec<PathBuf>> = patterns
        .par_iter()
        .zip(matchers.par_iter())
        .map(|(pattern, matcher)| match matcher {
            Some(matcher) => matching_files(&static_prefix_dir(pattern), matcher),
            None => vec![PathBuf::from(pattern)],
        })
        .collect();

    let mut seen = HashSet::new();
    Ok(expanded
        .into_iter()
        .flatten()
        .filter(|path| seen.insert(path.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_glob_matches_are_sorted_and_literals_kept() {
        let dir = TempDir::new().unwrap();
        let sheets = dir.path().join("sheets");
        fs::create_dir_all(&sheets).unwrap();
        for name in ["b.csv", "a.csv", "notes.txt"] {
            fs::write(sheets.join(name), "key,en\n").unwrap();
        }

        let pattern = format!("{}/*.csv", sheets.display());
        let literal = dir.path().join("extra.tsv").display().to_string();
        let paths = expand_source_globs(&[pattern.clone(), literal.clone(), pattern]).unwrap();

        assert_eq!(
            paths,
            vec![sheets.join("a.csv"), sheets.join("b.csv"), PathBuf::from(literal)]
        );
    }

    #[test]
    fn test_invalid_glob_is_reported() {
        let err = expand_source_globs(&["sheets/[.csv".to_string()]).unwrap_err();
        assert!(err.contains("Invalid glob pattern"));
    }
}
