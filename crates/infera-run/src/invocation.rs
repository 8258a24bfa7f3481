use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::argfile::ARGFILE_MARKER;
use crate::config::RunConfig;

/// One subprocess launch: command vector, working directory, wall-clock
/// ceiling. Never reused across runs.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub command: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

impl Invocation {
    pub fn program(&self) -> &str {
        &self.command[0]
    }

    /// Full command line for diagnostics.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// Assemble the analyzer command line.
///
/// Layout: analyzer flags, `--` terminator, then the compiler invocation the
/// analyzer observes. Sources go through the argfile rather than the command
/// line itself.
pub fn build_invocation(executable: &Path, config: &RunConfig, argfile: &Path) -> Invocation {
    let mut command = vec![
        executable.display().to_string(),
        "--results-dir".to_string(),
        config.results_dir.display().to_string(),
    ];
    if config.fail_on_findings {
        command.push("--fail-on-issue".to_string());
    }
    command.push("--".to_string());

    command.push("javac".to_string());
    if let Some(classpath) = config.classpath.as_deref()
        && !classpath.is_empty()
    {
        command.push("-classpath".to_string());
        command.push(classpath.to_string());
    }
    if config.verbose {
        command.push("-g".to_string());
    }
    command.push("-d".to_string());
    command.push(config.classes_dir.display().to_string());
    command.push(format!("{ARGFILE_MARKER}{}", argfile.display()));

    Invocation {
        command,
        working_dir: config.base_dir.clone(),
        timeout: config.timeout,
    }
}
