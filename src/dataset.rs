//! Stage three: select an ego network from the extracted dataset and load its edge list.

use std::{
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    edge::Edge,
    error::{PipelineError, Result},
    graph::Graph,
};

/// Suffix of the per-ego edge-list files in the SNAP layout.
const EDGE_LIST_SUFFIX: &str = ".edges";

/// Lists the edge-list files in `dir`, sorted lexicographically by file name.
///
/// The sort pins down which ego network "the first file" refers to; raw directory order is
/// filesystem-dependent. An empty selection is an error rather than an empty graph.
pub fn edge_list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(EDGE_LIST_SUFFIX))
        })
        .collect();

    if files.is_empty() {
        return Err(PipelineError::NoEdgeLists {
            dir: dir.to_owned(),
        });
    }

    files.sort();

    debug!(dir = %dir.display(), count = files.len(), "listed edge-list files");

    Ok(files)
}

/// Parses a whitespace-delimited edge list into an undirected graph.
///
/// Vertex labels are the integers SNAP uses. Blank lines and `#` comments are skipped; tokens
/// past the first two are ignored. A line without two parsable labels is a
/// [`PipelineError::MalformedEdge`].
pub fn read_edge_list(path: &Path) -> Result<Graph<u64>> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut graph = Graph::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || PipelineError::MalformedEdge {
            path: path.to_owned(),
            line: index + 1,
        };

        let mut labels = line.split_whitespace();
        let source = labels.next().ok_or_else(malformed)?;
        let target = labels.next().ok_or_else(malformed)?;

        let source: u64 = source.parse().map_err(|_| malformed())?;
        let target: u64 = target.parse().map_err(|_| malformed())?;

        graph.insert(Edge::new(source, target));
    }

    Ok(graph)
}
