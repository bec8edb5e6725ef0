use anyhow::Context;
use egonet::{config::PipelineConfig, pipeline};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PipelineConfig::default();
    let summary = pipeline::run(&config).context("ego network analysis failed")?;

    tracing::info!(
        vertices = summary.vertex_count,
        edges = summary.edge_count,
        filtered = summary.filtered_count,
        plots = summary.plots.len(),
        "analysis complete"
    );

    Ok(())
}
