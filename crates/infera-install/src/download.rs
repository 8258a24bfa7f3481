use std::path::Path;
use std::time::Duration;

use reqwest::{Client, Url};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{InstallError, Result};

/// Single attempt, no retry; the caller owns any retry policy.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Stream the response body for `uri` into `dest`.
///
/// Any non-2xx status is fatal and names the URI and status code.
pub(crate) async fn fetch_to_file(client: &Client, uri: &Url, dest: &Path) -> Result<()> {
    debug!(%uri, "downloading");

    let mut response = client
        .get(uri.clone())
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|source| InstallError::DownloadFailed {
            uri: uri.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(InstallError::DownloadRejected {
            uri: uri.clone(),
            status,
        });
    }

    let mut file = File::create(dest).await?;
    while let Some(chunk) =
        response
            .chunk()
            .await
            .map_err(|source| InstallError::DownloadFailed {
                uri: uri.clone(),
                source,
            })?
    {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    debug!(path = %dest.display(), "download complete");
    Ok(())
}
