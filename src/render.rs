//! Stage four: render the analysis results as raster images.

use std::{collections::HashMap, path::Path};

use nalgebra::Point2;
use plotters::prelude::*;
use tracing::info;

use crate::error::{PipelineError, Result};

/// Output resolution; figure sizes below mirror the reference 10x6 and 8x5 inch canvases.
const DPI: f64 = 300.0;

/// Fill for the network plot's vertex discs.
const NODE_FILL: RGBColor = RGBColor(173, 216, 230);
/// Fill for the degree histogram bars.
const HIST_FILL: RGBColor = RGBColor(135, 206, 235);
/// Stroke for the density estimate overlaid on the histogram.
const KDE_STROKE: RGBColor = RGBColor(70, 130, 180);
/// Fill for the centrality ranking bars.
const BAR_FILL: RGBColor = RGBColor(224, 123, 57);

/// Draws the filtered subgraph at the given layout positions: translucent edges, vertex discs
/// area-scaled by full-graph degree and vertex labels. Axes are hidden.
///
/// An empty vertex list is a no-op.
pub fn network_plot(
    path: &Path,
    threshold: u32,
    vertices: &[u64],
    positions: &[Point2<f64>],
    degrees: &HashMap<u64, u32>,
    neighbours: &[Vec<usize>],
) -> Result<()> {
    if vertices.is_empty() {
        return Ok(());
    }

    let root = BitMapBackend::new(path, (3000, 1800)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;

    let (x_range, y_range) = padded_bounds(positions);
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Filtered Ego-Twitter Network (Degree > {threshold})"),
            ("sans-serif", 56).into_font(),
        )
        .margin(40)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| render_err(path, e))?;

    // No mesh configuration: the layout is abstract, so the axes stay hidden.

    let edge_style = ShapeStyle {
        color: BLACK.mix(0.5),
        filled: false,
        stroke_width: 2,
    };
    chart
        .draw_series(neighbours.iter().enumerate().flat_map(|(i, adjacent)| {
            adjacent.iter().filter(move |&&j| j > i).map(move |&j| {
                PathElement::new(
                    vec![
                        (positions[i].x, positions[i].y),
                        (positions[j].x, positions[j].y),
                    ],
                    edge_style,
                )
            })
        }))
        .map_err(|e| render_err(path, e))?;

    chart
        .draw_series(vertices.iter().zip(positions).map(|(vertex, position)| {
            let degree = degrees.get(vertex).copied().unwrap_or(0);
            Circle::new(
                (position.x, position.y),
                node_radius(degree),
                NODE_FILL.filled(),
            )
        }))
        .map_err(|e| render_err(path, e))?;

    chart
        .draw_series(vertices.iter().zip(positions).map(|(vertex, position)| {
            Text::new(
                vertex.to_string(),
                (position.x, position.y),
                ("sans-serif", 28).into_font(),
            )
        }))
        .map_err(|e| render_err(path, e))?;

    root.present().map_err(|e| render_err(path, e))?;
    info!(path = %path.display(), "wrote network plot");

    Ok(())
}

/// Draws a frequency histogram of the full graph's degrees with an overlaid Gaussian density
/// estimate, scaled to the count axis.
pub fn degree_histogram(path: &Path, degrees: &[u32], bins: usize) -> Result<()> {
    if degrees.is_empty() {
        return Ok(());
    }

    let values: Vec<f64> = degrees.iter().map(|&d| f64::from(d)).collect();
    let (lo, width, counts) = bin_counts(&values, bins);
    let hi = lo + width * bins as f64;
    let y_max = counts.iter().max().copied().unwrap_or(0) as f64 * 1.1;

    let root = BitMapBackend::new(path, (2400, 1500)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Node Degree Distribution", ("sans-serif", 56).into_font())
        .margin(40)
        .x_label_area_size(110)
        .y_label_area_size(130)
        .build_cartesian_2d(lo..hi, 0.0..y_max.max(1.0))
        .map_err(|e| render_err(path, e))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Degree")
        .y_desc("Frequency")
        .axis_desc_style(("sans-serif", 44).into_font())
        .label_style(("sans-serif", 34).into_font())
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()
        .map_err(|e| render_err(path, e))?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = lo + width * i as f64;
            Rectangle::new(
                [(x0, 0.0), (x0 + width, count as f64)],
                HIST_FILL.mix(0.8).filled(),
            )
        }))
        .map_err(|e| render_err(path, e))?;

    // The kernel density estimate seaborn overlays, rescaled from a density to the count axis.
    let bandwidth = scott_bandwidth(&values);
    let scale = values.len() as f64 * width;
    let kde_style = ShapeStyle {
        color: KDE_STROKE.to_rgba(),
        filled: false,
        stroke_width: 4,
    };
    chart
        .draw_series(LineSeries::new(
            (0..=200).map(|step| {
                let x = lo + (hi - lo) * step as f64 / 200.0;
                (x, gaussian_kde(&values, bandwidth, x) * scale)
            }),
            kde_style,
        ))
        .map_err(|e| render_err(path, e))?;

    root.present().map_err(|e| render_err(path, e))?;
    info!(path = %path.display(), "wrote degree distribution");

    Ok(())
}

/// Draws the centrality ranking as a bar chart with rotated vertex labels.
///
/// An empty ranking is a no-op.
pub fn centrality_bars(path: &Path, ranking: &[(u64, f64)], top_n: usize) -> Result<()> {
    if ranking.is_empty() {
        return Ok(());
    }

    let labels: Vec<String> = ranking.iter().map(|(vertex, _)| vertex.to_string()).collect();
    let top_score = ranking.first().map(|&(_, score)| score).unwrap_or(0.0);
    let y_max = if top_score > 0.0 { top_score * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, (2400, 1500)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Top {top_n} Nodes by Betweenness Centrality (Filtered Graph)"),
            ("sans-serif", 56).into_font(),
        )
        .margin(40)
        .x_label_area_size(170)
        .y_label_area_size(150)
        .build_cartesian_2d((0u32..ranking.len() as u32).into_segmented(), 0.0..y_max)
        .map_err(|e| render_err(path, e))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Node")
        .y_desc("Centrality")
        .axis_desc_style(("sans-serif", 44).into_font())
        .label_style(("sans-serif", 34).into_font())
        .x_labels(ranking.len())
        .x_label_style(
            ("sans-serif", 34)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_label_formatter(&|segment| match segment {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .cloned()
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(|e| render_err(path, e))?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BAR_FILL.filled())
                .margin(10)
                .data(
                    ranking
                        .iter()
                        .enumerate()
                        .map(|(i, &(_, score))| (i as u32, score)),
                ),
        )
        .map_err(|e| render_err(path, e))?;

    root.present().map_err(|e| render_err(path, e))?;
    info!(path = %path.display(), "wrote centrality ranking");

    Ok(())
}

//
// Helpers
//

fn render_err(path: &Path, err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Render {
        path: path.to_owned(),
        message: err.to_string(),
    }
}

/// Layout bounds with a margin, so discs at the extremes aren't clipped.
fn padded_bounds(positions: &[Point2<f64>]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for position in positions {
        x_min = x_min.min(position.x);
        x_max = x_max.max(position.x);
        y_min = y_min.min(position.y);
        y_max = y_max.max(position.y);
    }

    let x_pad = ((x_max - x_min) * 0.1).max(0.1);
    let y_pad = ((y_max - y_min) * 0.1).max(0.1);

    (
        (x_min - x_pad)..(x_max + x_pad),
        (y_min - y_pad)..(y_max + y_pad),
    )
}

/// Disc radius in pixels. The area tracks the reference sizing of `degree * 20` points².
fn node_radius(degree: u32) -> i32 {
    let area = f64::from(degree) * 20.0;
    let radius = (area / std::f64::consts::PI).sqrt() * (DPI / 72.0);

    radius.round().max(3.0) as i32
}

/// Equal-width bin counts over the value range. Returns the lower bound, the bin width and the
/// per-bin counts.
fn bin_counts(values: &[f64], bins: usize) -> (f64, f64, Vec<usize>) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // A single distinct value still needs a non-degenerate bin.
    let hi = if hi > lo { hi } else { lo + 1.0 };

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];

    for &value in values {
        let index = (((value - lo) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    (lo, width, counts)
}

/// Scott's rule bandwidth, with a fallback for constant samples.
fn scott_bandwidth(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let deviation = variance.sqrt();

    if deviation > 0.0 {
        deviation * n.powf(-0.2)
    } else {
        1.0
    }
}

/// Gaussian kernel density estimate of the samples, evaluated at `x`.
fn gaussian_kde(samples: &[f64], bandwidth: f64, x: f64) -> f64 {
    let n = samples.len() as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    samples
        .iter()
        .map(|sample| (-0.5 * ((x - sample) / bandwidth).powi(2)).exp())
        .sum::<f64>()
        * norm
}
