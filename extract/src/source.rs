//! Locating Rust source files to scan.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};
use crate::extractor::SourceUnit;

/// Resolves input paths into a sorted, de-duplicated list of `.rs` files.
///
/// A directory contributes the `.rs` files directly inside it, or every
/// `.rs` file below it when `recursive` is set (skipping `target` and hidden
/// directories). A file must end in `.rs`.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidInput`] for an empty input list, a
/// non-`.rs` file, or a path that does not exist.
pub fn collect_source_paths(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    if inputs.is_empty() {
        return Err(ExtractError::InvalidInput(
            "No source paths were provided".to_string(),
        ));
    }

    let mut paths = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            collect_dir(input, recursive, &mut paths)?;
            continue;
        }

        if input.is_file() {
            if input.extension() != Some(OsStr::new("rs")) {
                return Err(ExtractError::InvalidInput(format!(
                    "Source file '{}' must end in .rs",
                    input.display()
                )));
            }
            paths.insert(input.clone());
            continue;
        }

        return Err(ExtractError::InvalidInput(format!(
            "Source path '{}' does not exist",
            input.display()
        )));
    }

    Ok(paths.into_iter().collect())
}

/// Reads every path into a [`SourceUnit`], preserving order.
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceUnit>> {
    paths.iter().map(SourceUnit::read).collect()
}

fn collect_dir(dir: &Path, recursive: bool, paths: &mut BTreeSet<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| ExtractError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ExtractError::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            let skip = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.') || name == "target");
            if recursive && !skip {
                collect_dir(&path, recursive, paths)?;
            }
            continue;
        }

        if path.extension() == Some(OsStr::new("rs")) {
            paths.insert(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.rs"), "").unwrap();
        fs::write(dir.path().join("a.rs"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.rs"), "").unwrap();

        let flat = collect_source_paths(&[dir.path().to_path_buf()], false).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.rs", "b.rs"]);

        let deep = collect_source_paths(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_collect_deduplicates_file_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.rs");
        fs::write(&file, "").unwrap();

        let paths = collect_source_paths(&[dir.path().to_path_buf(), file], false).unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_collect_rejects_non_rust_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("schema.json");
        fs::write(&file, "{}").unwrap();

        let err = collect_source_paths(&[file], false).unwrap_err();
        assert!(err.to_string().contains("must end in .rs"));
    }

    #[test]
    fn test_collect_rejects_missing_path() {
        let err = collect_source_paths(&[PathBuf::from("/no/such/dir")], false).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
        assert!(collect_source_paths(&[], false).is_err());
    }
}
