use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use reqwest::Url;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use infera_install::{InstallRequest, Installer};
use infera_run::{ProcessOutcome, RunConfig, RunError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Install the Infer static analyzer and run it over a Java source tree.
#[derive(Debug, Parser)]
#[command(name = "infera", version, about)]
struct Cli {
    /// Source root directory; repeat for multiple roots.
    #[arg(long = "source-root", value_name = "DIR", required = true)]
    source_roots: Vec<PathBuf>,

    /// Resolved compile classpath handed to the observed compiler invocation.
    #[arg(long, value_name = "CLASSPATH")]
    classpath: Option<String>,

    /// Working directory for the analyzer process.
    #[arg(long, value_name = "DIR", default_value = ".")]
    base_dir: PathBuf,

    /// Where the analyzer release is unpacked. Defaults to ~/.infera.
    #[arg(long, value_name = "DIR")]
    install_root: Option<PathBuf>,

    /// Analyzer results directory. Defaults to <base-dir>/target/infer-out.
    #[arg(long, value_name = "DIR")]
    results_dir: Option<PathBuf>,

    /// Compiler class output directory. Defaults to <base-dir>/target/classes.
    #[arg(long, value_name = "DIR")]
    classes_dir: Option<PathBuf>,

    /// Build scratch directory for the argfile. Defaults to <base-dir>/target.
    #[arg(long, value_name = "DIR")]
    build_dir: Option<PathBuf>,

    /// Override the analyzer release archive URI.
    #[arg(long, value_name = "URI")]
    download_uri: Option<Url>,

    /// Wall-clock ceiling on analyzer completion, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Fail the pipeline when the analyzer reports findings.
    #[arg(long)]
    fail_on_findings: bool,

    /// Verbose logging; also passes the compiler its debug flag.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(outcome) => {
            info!(exit_code = outcome.exit_code, "analysis completed");
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<RunError>() {
            Some(RunError::NoSources) => {
                warn!("no source files found, skipping analysis");
                ExitCode::SUCCESS
            }
            Some(inner) if inner.is_findings() => {
                error!("{inner}");
                ExitCode::from(2)
            }
            _ => {
                error!("{err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<ProcessOutcome> {
    let install_root = match cli.install_root {
        Some(root) => root,
        None => home::home_dir()
            .context("cannot determine home directory for the default install root")?
            .join(".infera"),
    };

    let request = match cli.download_uri {
        Some(uri) => InstallRequest::from_release_uri(uri, install_root),
        None => InstallRequest::infer_v1_2_0(install_root),
    };

    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let installer = Installer::new(client);
    let executable = installer
        .ensure_installed(&request)
        .await
        .context("analyzer installation failed")?;
    info!(path = %executable.display(), "analyzer ready");

    let mut config = RunConfig::new(cli.base_dir)
        .source_roots(cli.source_roots)
        .fail_on_findings(cli.fail_on_findings)
        .verbose(cli.verbose)
        .timeout(Duration::from_secs(cli.timeout_secs));
    if let Some(classpath) = cli.classpath {
        config = config.classpath(classpath);
    }
    if let Some(dir) = cli.results_dir {
        config = config.results_dir(dir);
    }
    if let Some(dir) = cli.classes_dir {
        config = config.classes_dir(dir);
    }
    if let Some(dir) = cli.build_dir {
        config = config.build_dir(dir);
    }

    let outcome = infera_run::run(&executable, &config).await?;
    Ok(outcome)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
