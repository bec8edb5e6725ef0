//! Egonet is a small toolkit for fetching and analysing social ego networks, though its graph
//! types apply more generally to undirected graphs.
//!
//! The crate ships a four-stage pipeline around the [SNAP ego-Twitter
//! dataset](https://snap.stanford.edu/data/ego-Twitter.html): fetch the archive, unpack it, load
//! one ego network's edge list and render degree and betweenness-centrality plots. Each stage is
//! also usable on its own.
//!
//! # Basic usage
//!
//! The library is centered around the [`Graph`](graph::Graph) structure which can be constructed
//! from one or more [`Edge`](edge::Edge) instances. Once constructed, various measurements of the
//! graph can be computed.
//!
//! ```rust
//! use egonet::edge::Edge;
//! use egonet::graph::Graph;
//!
//! // Construct the graph instance.
//! let mut graph = Graph::new();
//!
//! // Insert some edges, note the IDs can be any type that is `Copy + Eq + Hash + Ord`.
//! graph.insert(Edge::new(1u64, 2));
//! graph.insert(Edge::new(1, 3));
//!
//! // Compute some metrics on that state of the graph.
//! let degrees = graph.degree_centrality();
//! assert_eq!(degrees[&1], 2);
//!
//! // Approximate betweenness centrality with 100 seeded pivots.
//! let centrality = graph.betweenness_centrality(100, 42);
//! assert_eq!(centrality.len(), 3);
//! ```
//!
//! The full pipeline is driven by [`pipeline::run`] with a [`config::PipelineConfig`].

mod betweenness;
pub mod config;
pub mod dataset;
pub mod edge;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod render;
