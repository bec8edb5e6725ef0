//! The end-to-end analysis pipeline.

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};

use tracing::{info, warn};

use crate::{
    config::PipelineConfig,
    dataset,
    error::Result,
    extract, fetch, layout, render,
};

/// What a pipeline run produced.
#[derive(Debug)]
pub struct Summary {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub filtered_count: usize,
    pub plots: Vec<PathBuf>,
}

/// Runs the four pipeline stages: fetch, extract, load, analyse-and-render.
///
/// The fetch and extract stages are skipped when their artifacts already exist, so repeated runs
/// work offline. When the degree filter leaves no vertices the network and centrality plots are
/// skipped with a warning instead of rendering empty charts; the degree histogram covers the full
/// graph and is always written.
pub fn run(config: &PipelineConfig) -> Result<Summary> {
    fetch::ensure_archive(&config.source_url, &config.archive_path, config.fetch_timeout)?;
    extract::ensure_extracted(&config.archive_path, &config.dataset_dir, &config.extract_root)?;

    let files = dataset::edge_list_files(&config.dataset_dir)?;
    let ego_network = &files[0];
    info!(file = %ego_network.display(), candidates = files.len(), "loading ego network");

    let mut graph = dataset::read_edge_list(ego_network)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        density = graph.density(),
        "graph loaded"
    );

    let degrees = graph.degree_centrality();
    let filtered: HashSet<u64> = degrees
        .iter()
        .filter(|&(_, &degree)| degree > config.degree_threshold)
        .map(|(&vertex, _)| vertex)
        .collect();
    let filtered_graph = graph.subgraph(&filtered);
    info!(
        vertices = filtered.len(),
        edges = filtered_graph.edge_count(),
        threshold = config.degree_threshold,
        "filtered graph"
    );

    let mut plots = Vec::new();

    if filtered.is_empty() {
        warn!("degree threshold filtered out every vertex, skipping network and centrality plots");
    } else {
        let (vertices, neighbours) = graph.induced_adjacency(&filtered);
        let positions = layout::spring_layout(&neighbours, config.layout_seed);
        render::network_plot(
            &config.network_plot,
            config.degree_threshold,
            &vertices,
            &positions,
            &degrees,
            &neighbours,
        )?;
        plots.push(config.network_plot.clone());
    }

    let all_degrees: Vec<u32> = degrees.values().copied().collect();
    render::degree_histogram(&config.histogram_plot, &all_degrees, config.histogram_bins)?;
    plots.push(config.histogram_plot.clone());

    if !filtered.is_empty() {
        // Centrality is approximated over the full graph, then ranked within the filtered set.
        let centrality =
            graph.betweenness_centrality(config.centrality_samples, config.centrality_seed);
        let ranking = top_ranked(&centrality, &filtered, config.top_n);
        render::centrality_bars(&config.centrality_plot, &ranking, config.top_n)?;
        plots.push(config.centrality_plot.clone());
    }

    Ok(Summary {
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        filtered_count: filtered.len(),
        plots,
    })
}

/// Restricts the scores to the given vertex set and returns the `n` best, sorted by descending
/// score. Ties are broken by ascending vertex label to keep the ranking reproducible.
fn top_ranked(scores: &HashMap<u64, f64>, vertices: &HashSet<u64>, n: usize) -> Vec<(u64, f64)> {
    let mut ranking: Vec<(u64, f64)> = scores
        .iter()
        .filter(|&(vertex, _)| vertices.contains(vertex))
        .map(|(&vertex, &score)| (vertex, score))
        .collect();

    ranking.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranking.truncate(n);

    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{edge::Edge, graph::Graph};

    #[test]
    fn top_ranked_sorts_descending_and_truncates() {
        let scores = HashMap::from([(1, 0.2), (2, 0.9), (3, 0.4), (4, 0.4), (5, 0.0)]);
        let vertices = HashSet::from([1, 2, 3, 4, 5]);

        let ranking = top_ranked(&scores, &vertices, 3);

        assert_eq!(ranking.len(), 3);
        for pair in ranking.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        // Equal scores fall back to the label order.
        assert_eq!(ranking, vec![(2, 0.9), (3, 0.4), (4, 0.4)]);
    }

    #[test]
    fn top_ranked_is_restricted_to_the_vertex_set() {
        let scores = HashMap::from([(1, 0.9), (2, 0.5)]);
        let vertices = HashSet::from([2]);

        let ranking = top_ranked(&scores, &vertices, 15);

        assert_eq!(ranking, vec![(2, 0.5)]);
    }

    #[test]
    fn ranking_length_is_bounded_by_the_filtered_set() {
        // Two hubs above the degree threshold, twelve leaves below it.
        let mut graph = Graph::new();
        graph.insert(Edge::new(1u64, 2));
        for leaf in 0..6 {
            graph.insert(Edge::new(1, 10 + leaf));
            graph.insert(Edge::new(2, 20 + leaf));
        }

        let degrees = graph.degree_centrality();
        let filtered: HashSet<u64> = degrees
            .iter()
            .filter(|&(_, &degree)| degree > 5)
            .map(|(&vertex, _)| vertex)
            .collect();
        assert_eq!(filtered, HashSet::from([1, 2]));

        let centrality = graph.betweenness_centrality(100, 42);
        let ranking = top_ranked(&centrality, &filtered, 15);

        assert_eq!(ranking.len(), 2);
        assert!(ranking[0].1 >= ranking[1].1);
    }
}
