use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Discovery found nothing to analyze. An explicit skip signal, not an
    /// error in the subprocess sense; the caller decides whether it aborts
    /// the pipeline.
    #[error("no source files found under the configured source roots")]
    NoSources,

    #[error("failed to walk source root '{root}': {source}")]
    SourceWalk {
        root: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to write argfile '{path}': {source}")]
    Argfile { path: PathBuf, source: io::Error },

    #[error("failed to launch: {command}: {source}")]
    Spawn { command: String, source: io::Error },

    #[error("timeout running: {command}")]
    Timeout { command: String },

    #[error("process killed by signal: {command}")]
    Terminated { command: String },

    #[error("command exited with code {code}: {command}")]
    UnexpectedExit { code: i32, command: String },

    /// Exit code 2 with fail-on-findings enabled. The analyzer ran to
    /// completion and produced results; distinguished from a crash so the
    /// caller can render different messaging.
    #[error("analysis reported findings, see: {results_dir}")]
    FindingsPresent { results_dir: PathBuf },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RunError {
    /// True when the failure represents a successful analyzer execution that
    /// found issues, rather than a defect in the run itself.
    pub fn is_findings(&self) -> bool {
        matches!(self, Self::FindingsPresent { .. })
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
