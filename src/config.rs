//! Pipeline configuration.

use std::{path::PathBuf, time::Duration};

/// The knobs of the analysis pipeline, all fixed at construction. The defaults reproduce the
/// published ego-Twitter analysis: they are constants, not a user-facing configuration surface.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Where the dataset archive is downloaded from.
    pub source_url: String,
    /// Local path the archive is cached at.
    pub archive_path: PathBuf,
    /// Directory the archive is unpacked into.
    pub extract_root: PathBuf,
    /// The dataset folder the archive yields, relative to the working directory.
    pub dataset_dir: PathBuf,
    /// Vertices with a degree strictly greater than this survive the filter.
    pub degree_threshold: u32,
    /// Seed for the force-directed layout.
    pub layout_seed: u64,
    /// Number of pivots for the betweenness approximation.
    pub centrality_samples: usize,
    /// Seed for the pivot selection.
    pub centrality_seed: u64,
    /// Ranking length for the centrality bar chart.
    pub top_n: usize,
    /// Hard cap on the archive download, connection and transfer included.
    pub fetch_timeout: Duration,
    /// Bin count for the degree histogram.
    pub histogram_bins: usize,
    /// Output path of the filtered network plot.
    pub network_plot: PathBuf,
    /// Output path of the degree distribution plot.
    pub histogram_plot: PathBuf,
    /// Output path of the centrality ranking plot.
    pub centrality_plot: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: "https://snap.stanford.edu/data/twitter.tar.gz".into(),
            archive_path: "twitter.tar.gz".into(),
            extract_root: ".".into(),
            dataset_dir: "twitter".into(),
            degree_threshold: 5,
            layout_seed: 42,
            centrality_samples: 100,
            centrality_seed: 42,
            top_n: 15,
            fetch_timeout: Duration::from_secs(60),
            histogram_bins: 20,
            network_plot: "filtered_ego_network.png".into(),
            histogram_plot: "degree_distribution.png".into(),
            centrality_plot: "top15_centrality.png".into(),
        }
    }
}
