use std::path::{Path, PathBuf};

use crate::error::{Result, RunError};

const ARGFILE_NAME: &str = "infer-sources.args";

/// Marker prefixed to the argfile path on the downstream command line.
pub const ARGFILE_MARKER: char = '@';

/// Materialize the discovered file list as an argument-indirection file, one
/// path per line, to stay clear of operating-system command-line limits.
///
/// The file is rewritten from scratch on every run.
pub async fn write_argfile(build_dir: &Path, sources: &[PathBuf]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(build_dir).await?;
    let path = build_dir.join(ARGFILE_NAME);

    let mut contents = String::new();
    for source in sources {
        contents.push_str(&source.display().to_string());
        contents.push('\n');
    }

    tokio::fs::write(&path, contents)
        .await
        .map_err(|source| RunError::Argfile {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
