use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::argfile;
use crate::config::RunConfig;
use crate::discover;
use crate::error::{Result, RunError};
use crate::invocation::{Invocation, build_invocation};
use crate::outcome::ProcessOutcome;

/// Run the analyzer over the configured source roots.
///
/// Discovers sources, materializes the argfile, launches the analyzer with a
/// hard wall-clock ceiling, and classifies its exit code. Returns
/// [`RunError::NoSources`] when there is nothing to analyze.
pub async fn run(executable: &Path, config: &RunConfig) -> Result<ProcessOutcome> {
    tokio::fs::create_dir_all(&config.results_dir).await?;
    tokio::fs::create_dir_all(&config.classes_dir).await?;

    let sources = discover::discover_sources(&config.source_roots)?;
    if sources.is_empty() {
        return Err(RunError::NoSources);
    }
    info!(count = sources.len(), "discovered source files to analyze");

    let argfile = argfile::write_argfile(&config.build_dir, &sources).await?;
    let invocation = build_invocation(executable, config, &argfile);
    execute(&invocation, config).await
}

async fn execute(invocation: &Invocation, config: &RunConfig) -> Result<ProcessOutcome> {
    info!("running: {}", invocation.command_line());

    let mut child = Command::new(invocation.program())
        .args(&invocation.command[1..])
        .current_dir(&invocation.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| RunError::Spawn {
            command: invocation.command_line(),
            source,
        })?;

    // Drain both pipes while waiting for exit; a full pipe buffer would
    // otherwise deadlock the child against our wait.
    let stdout = child.stdout.take().map(forward_lines);
    let stderr = child.stderr.take().map(forward_lines);

    let status = match timeout(invocation.timeout, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(source)) => {
            return Err(RunError::Spawn {
                command: invocation.command_line(),
                source,
            });
        }
        Err(_elapsed) => {
            if let Err(error) = child.kill().await {
                warn!(%error, "failed to kill timed-out process");
            }
            return Err(RunError::Timeout {
                command: invocation.command_line(),
            });
        }
    };

    if let Some(task) = stdout {
        let _ = task.await;
    }
    if let Some(task) = stderr {
        let _ = task.await;
    }

    let Some(code) = status.code() else {
        return Err(RunError::Terminated {
            command: invocation.command_line(),
        });
    };

    match ProcessOutcome::classify(code) {
        Some(outcome) if outcome.has_findings() && config.fail_on_findings => {
            Err(RunError::FindingsPresent {
                results_dir: config.results_dir.clone(),
            })
        }
        Some(outcome) => {
            if outcome.has_findings() {
                warn!(results = %config.results_dir.display(), "analyzer reported findings");
            }
            Ok(outcome)
        }
        None => Err(RunError::UnexpectedExit {
            code,
            command: invocation.command_line(),
        }),
    }
}

/// Forward subprocess output to the log as it arrives, dropping blank lines.
fn forward_lines<R>(stream: R) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(line) = render_line(&line) {
                info!(target: "analyzer", "{line}");
            }
        }
    })
}

/// Strip trailing whitespace; blank and whitespace-only lines are suppressed.
fn render_line(raw: &str) -> Option<&str> {
    let line = raw.trim_end();
    if line.is_empty() { None } else { Some(line) }
}

#[cfg(test)]
mod tests {
    use super::render_line;

    #[test]
    fn trailing_whitespace_stripped() {
        assert_eq!(render_line("capture done   \t"), Some("capture done"));
    }

    #[test]
    fn blank_lines_suppressed() {
        assert_eq!(render_line(""), None);
        assert_eq!(render_line("   \t  "), None);
    }

    #[test]
    fn leading_whitespace_preserved() {
        assert_eq!(render_line("  indented"), Some("  indented"));
    }
}
