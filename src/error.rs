//! Error types for the analysis pipeline.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The failure modes of the pipeline stages. There is no recovery layer on top: the first error
/// terminates the run with its diagnostic chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The archive download failed before a response body could be written.
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with the archive.
    #[error("fetch of {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Opening or unpacking the archive failed.
    #[error("failed to unpack archive {path}")]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The extracted dataset folder holds no edge-list files.
    #[error("no .edges files found in {dir}")]
    NoEdgeLists { dir: PathBuf },

    /// An edge-list line without two parsable vertex labels.
    #[error("malformed edge on line {line} of {path}")]
    MalformedEdge { path: PathBuf, line: usize },

    /// Plain filesystem failures: directory listings, file reads.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The plotting backend refused a chart.
    #[error("failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
