use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, RunError};

const SOURCE_EXTENSION: &str = ".java";

/// Enumerate analyzable source files under the given roots.
///
/// Roots that are not existing directories are skipped silently. Results are
/// absolute paths in sorted order, so two runs over the same tree produce the
/// same argfile.
pub fn discover_sources(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for root in roots {
        if !root.is_dir() {
            debug!(root = %root.display(), "source root is not a directory, skipping");
            continue;
        }
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| RunError::SourceWalk {
                root: root.clone(),
                source,
            })?;
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                sources.push(std::path::absolute(entry.path())?);
            }
        }
    }

    sources.sort();
    Ok(sources)
}

fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(SOURCE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_nested_sources_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/deep")).unwrap();
        fs::write(dir.path().join("b/deep/Z.java"), "class Z {}").unwrap();
        fs::write(dir.path().join("A.java"), "class A {}").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a source").unwrap();

        let sources = discover_sources(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].ends_with("A.java"));
        assert!(sources[1].ends_with("b/deep/Z.java"));
        assert!(sources.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn missing_root_is_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.java"), "class A {}").unwrap();

        let roots = vec![
            dir.path().join("does-not-exist"),
            dir.path().to_path_buf(),
        ];
        let sources = discover_sources(&roots).unwrap();
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn empty_union_is_ok_and_empty() {
        let sources = discover_sources(&[PathBuf::from("/definitely/not/here")]).unwrap();
        assert!(sources.is_empty());
    }
}
