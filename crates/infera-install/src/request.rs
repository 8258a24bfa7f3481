use std::path::PathBuf;

use reqwest::Url;

/// Release archive the installer fetches when no override is given.
pub const DEFAULT_DOWNLOAD_URI: &str =
    "https://github.com/facebook/infer/releases/download/v1.2.0/infer-linux-x86_64-v1.2.0.tar.xz";

const DEFAULT_ARCHIVE_NAME: &str = "analyzer.tar.xz";
const EXECUTABLE_NAME: &str = "infer";

/// Immutable description of one install attempt.
///
/// Carries everything the installer needs up front; nothing is mutated after
/// construction.
#[derive(Clone, Debug)]
pub struct InstallRequest {
    pub download_uri: Url,
    pub install_root: PathBuf,
    /// Top-level directory the archive unpacks into.
    pub archive_root: String,
    /// Executable name under `<archive_root>/bin/`.
    pub executable: String,
}

impl InstallRequest {
    pub fn new(
        download_uri: Url,
        install_root: impl Into<PathBuf>,
        archive_root: impl Into<String>,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            download_uri,
            install_root: install_root.into(),
            archive_root: archive_root.into(),
            executable: executable.into(),
        }
    }

    /// Build a request from a release URI, deriving the archive root from the
    /// download file name (release tarballs unpack into a directory named
    /// after themselves).
    pub fn from_release_uri(download_uri: Url, install_root: impl Into<PathBuf>) -> Self {
        let file_name = download_file_name(&download_uri);
        let archive_root = file_name
            .strip_suffix(".tar.xz")
            .unwrap_or(&file_name)
            .to_string();
        Self::new(download_uri, install_root, archive_root, EXECUTABLE_NAME)
    }

    /// The pinned Infer v1.2.0 Linux release.
    pub fn infer_v1_2_0(install_root: impl Into<PathBuf>) -> Self {
        let uri = Url::parse(DEFAULT_DOWNLOAD_URI).expect("default download URI is valid");
        Self::from_release_uri(uri, install_root)
    }

    /// Where the executable lives once the archive is unpacked.
    pub fn executable_path(&self) -> PathBuf {
        self.install_root
            .join(&self.archive_root)
            .join("bin")
            .join(&self.executable)
    }

    /// File name the archive is stored under while downloading.
    pub fn download_file_name(&self) -> String {
        download_file_name(&self.download_uri)
    }
}

fn download_file_name(uri: &Url) -> String {
    uri.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_ARCHIVE_NAME)
        .to_string()
}
