//! Stage one: make sure the dataset archive exists locally.

use std::{ffi::OsString, fs, path::Path, time::Duration};

use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// Downloads `url` to `path` unless the file is already there.
///
/// Returns whether a download happened. When the archive is already cached this touches neither
/// the network nor the file: no client is even constructed. There is no retry and no checksum; a
/// present file is trusted.
pub fn ensure_archive(url: &str, path: &Path, timeout: Duration) -> Result<bool> {
    if path.exists() {
        debug!(path = %path.display(), "archive already cached, skipping download");
        return Ok(false);
    }

    info!(%url, path = %path.display(), "downloading dataset archive");

    let fetch_err = |source: reqwest::Error| PipelineError::Fetch {
        url: url.to_owned(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(fetch_err)?;

    let mut response = client.get(url).send().map_err(fetch_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::HttpStatus {
            url: url.to_owned(),
            status,
        });
    }

    // Write to a sibling and rename into place, so an interrupted transfer can't be mistaken for
    // a cached archive on the next run.
    let partial = partial_path(path);
    let mut file = fs::File::create(&partial)?;

    if let Err(source) = response.copy_to(&mut file) {
        let _ = fs::remove_file(&partial);
        return Err(fetch_err(source));
    }

    fs::rename(&partial, path)?;

    info!(path = %path.display(), "archive downloaded");

    Ok(true)
}

/// The in-progress download path for an archive path.
fn partial_path(path: &Path) -> OsString {
    let mut partial = path.as_os_str().to_os_string();
    partial.push(".part");
    partial
}
