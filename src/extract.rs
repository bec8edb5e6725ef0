//! Stage two: make sure the archive contents are unpacked.

use std::{fs, io, path::Path};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// Unpacks the gzip-compressed tar `archive` into `extract_root`, unless `dataset_dir` already
/// exists.
///
/// Returns whether an extraction happened. The dataset folder is whatever the archive members
/// carry as their leading path component; it is only probed, never created here.
pub fn ensure_extracted(archive: &Path, dataset_dir: &Path, extract_root: &Path) -> Result<bool> {
    if dataset_dir.exists() {
        debug!(dir = %dataset_dir.display(), "dataset already extracted, skipping unpack");
        return Ok(false);
    }

    info!(archive = %archive.display(), root = %extract_root.display(), "unpacking dataset archive");

    let archive_err = |source: io::Error| PipelineError::Archive {
        path: archive.to_owned(),
        source,
    };

    let file = fs::File::open(archive).map_err(archive_err)?;
    let tarball = GzDecoder::new(file);
    Archive::new(tarball).unpack(extract_root).map_err(archive_err)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::{write::GzEncoder, Compression};

    use super::*;

    /// Builds a tiny `twitter/<name>` tarball on disk and returns its path.
    fn write_archive(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let archive_path = dir.join("twitter.tar.gz");
        let file = fs::File::create(&archive_path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("twitter/{name}"), contents)
            .unwrap();

        builder.into_inner().unwrap().finish().unwrap().flush().unwrap();
        archive_path
    }

    #[test]
    fn unpacks_into_the_extract_root() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(dir.path(), "12831.edges", b"1 2\n2 3\n");
        let dataset_dir = dir.path().join("twitter");

        let extracted = ensure_extracted(&archive, &dataset_dir, dir.path()).unwrap();

        assert!(extracted);
        assert_eq!(
            fs::read(dataset_dir.join("12831.edges")).unwrap(),
            b"1 2\n2 3\n"
        );
    }

    #[test]
    fn existing_dataset_skips_the_unpack() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_dir = dir.path().join("twitter");
        fs::create_dir(&dataset_dir).unwrap();

        // The archive path doesn't even exist; a skip is the only way this succeeds.
        let extracted =
            ensure_extracted(&dir.path().join("missing.tar.gz"), &dataset_dir, dir.path()).unwrap();

        assert!(!extracted);
    }

    #[test]
    fn missing_archive_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = ensure_extracted(
            &dir.path().join("missing.tar.gz"),
            &dir.path().join("twitter"),
            dir.path(),
        )
        .expect_err("archive is absent");

        assert!(matches!(err, PipelineError::Archive { .. }));
    }

    #[test]
    fn garbage_archive_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("twitter.tar.gz");
        fs::write(&archive, b"not a tarball").unwrap();

        let err = ensure_extracted(&archive, &dir.path().join("twitter"), dir.path())
            .expect_err("gzip header is invalid");

        assert!(matches!(err, PipelineError::Archive { .. }));
    }
}
