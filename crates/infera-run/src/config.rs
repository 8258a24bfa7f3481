use std::path::PathBuf;
use std::time::Duration;

/// Wall-clock ceiling on analyzer completion. A single absolute bound, not a
/// per-attempt budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything one run needs, fixed at construction.
///
/// Built once per invocation and never mutated afterwards, so there is no
/// window where a partially-configured runner could execute.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub source_roots: Vec<PathBuf>,
    /// Already-resolved compile classpath, possibly empty.
    pub classpath: Option<String>,
    pub results_dir: PathBuf,
    pub classes_dir: PathBuf,
    /// Where the argfile is materialized.
    pub build_dir: PathBuf,
    /// Working directory for the subprocess.
    pub base_dir: PathBuf,
    pub fail_on_findings: bool,
    pub verbose: bool,
    pub timeout: Duration,
}

impl RunConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            source_roots: Vec::new(),
            classpath: None,
            results_dir: base_dir.join("target").join("infer-out"),
            classes_dir: base_dir.join("target").join("classes"),
            build_dir: base_dir.join("target"),
            base_dir,
            fail_on_findings: false,
            verbose: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_roots.push(root.into());
        self
    }

    pub fn source_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.source_roots = roots;
        self
    }

    pub fn classpath(mut self, classpath: impl Into<String>) -> Self {
        self.classpath = Some(classpath.into());
        self
    }

    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    pub fn classes_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.classes_dir = dir.into();
        self
    }

    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    pub fn fail_on_findings(mut self, on: bool) -> Self {
        self.fail_on_findings = on;
        self
    }

    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
