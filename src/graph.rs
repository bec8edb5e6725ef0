//! A module for working with graphs.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use nalgebra::DMatrix;

use crate::{betweenness, edge::Edge};

/// An undirected graph, made up of edges.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// The edges in the graph.
    edges: HashSet<Edge<T>>,
    /// A mapping of vertices to their indices to be used when constructing the matrix and
    /// adjacency-list representations of the graph.
    ///
    /// The use of a `BTreeMap` means we need the `Ord` bound on `T`. The sorted collection keeps
    /// the index stable between computations, which pins down every derived measurement.
    index: Option<BTreeMap<T, usize>>,
    /// Cache the adjacency matrix when possible.
    adjacency_matrix: Option<DMatrix<f64>>,
}

impl<T> Default for Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use egonet::graph::Graph;
    ///
    /// let graph: Graph<&str> = Graph::new();
    /// ```
    pub fn new() -> Self {
        Self {
            edges: Default::default(),
            index: None,
            adjacency_matrix: None,
        }
    }

    /// Inserts an edge into the graph, returning whether it was newly added.
    ///
    /// # Examples
    ///
    /// ```
    /// use egonet::edge::Edge;
    /// use egonet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// assert_eq!(graph.insert(Edge::new("a", "b")), true);
    /// // The reversed pair is the same edge.
    /// assert_eq!(graph.insert(Edge::new("b", "a")), false);
    /// ```
    pub fn insert(&mut self, edge: Edge<T>) -> bool {
        let is_inserted = self.edges.insert(edge);

        // Delete the cached objects if the edge was successfully inserted because we can't
        // reliably update them from the new connection alone.
        if is_inserted && self.index.is_some() {
            self.clear_cache()
        }

        is_inserted
    }

    /// Checks if the graph contains an edge.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.edges.contains(edge)
    }

    /// Returns an iterator over the edges in the graph.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<T>> {
        self.edges.iter()
    }

    /// Returns the vertex count of the graph.
    ///
    /// This call constructs the collection of vertices from the collection of edges. This is
    /// because the vertex set can't accurately be updated on the basis of the addition of an edge
    /// alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use egonet::edge::Edge;
    /// use egonet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    ///
    /// assert_eq!(graph.vertex_count(), 2);
    /// ```
    pub fn vertex_count(&self) -> usize {
        self.vertices_from_edges().len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use egonet::edge::Edge;
    /// use egonet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// graph.insert(Edge::new("a", "b"));
    /// assert_eq!(graph.density(), 1.0);
    ///
    /// graph.insert(Edge::new("a", "c"));
    /// assert_eq!(graph.density(), 2.0 / 3.0);
    /// ```
    pub fn density(&self) -> f64 {
        let vc = self.vertex_count() as f64;
        let ec = self.edge_count() as f64;

        // Calculate the total number of possible edges given a vertex count.
        let pec = vc * (vc - 1.0) / 2.0;
        // Actual edges divided by the possible edges gives the density.
        ec / pec
    }

    /// Constructs the adjacency matrix for this graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use egonet::edge::Edge;
    /// use egonet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// assert_eq!(
    ///     graph.adjacency_matrix(),
    ///     dmatrix![0.0, 1.0;
    ///              1.0, 0.0]
    /// );
    /// ```
    pub fn adjacency_matrix(&mut self) -> DMatrix<f64> {
        // Check the cache.
        if let Some(matrix) = self.adjacency_matrix.clone() {
            return matrix;
        }

        if self.index.is_none() {
            self.generate_index();
        }

        // Safety: the previous call guarantees the index has been generated and stored.
        let index = self.index.as_ref().unwrap();
        let n = index.len();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        // As the graph is undirected the adjacency matrix is symmetric, so both the upper and
        // lower triangles must be written for each edge.
        for edge in &self.edges {
            let (a, b) = edge.endpoints();

            // Safety: the index was generated from this set of edges.
            let i = *index.get(a).unwrap();
            let j = *index.get(b).unwrap();

            matrix[(i, j)] = 1.0;
            matrix[(j, i)] = 1.0;
        }

        // Cache the matrix.
        self.adjacency_matrix = Some(matrix.clone());

        matrix
    }

    /// Returns a mapping of vertices to their degree centrality (number of connections) in the
    /// graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use egonet::edge::Edge;
    /// use egonet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("a", "c"));
    ///
    /// assert_eq!(graph.degree_centrality()[&"a"], 2);
    /// ```
    pub fn degree_centrality(&mut self) -> HashMap<T, u32> {
        let matrix = self.adjacency_matrix();

        // Safety: the previous call guarantees the index has been generated and stored. The rows
        // are visited in order and the adjacency matrix is ordered after the index, so the row sum
        // is the degree of the corresponding vertex.
        self.index
            .as_ref()
            .unwrap()
            .keys()
            .zip(matrix.row_iter())
            .map(|(vertex, row)| (*vertex, row.sum() as u32))
            .collect()
    }

    /// Returns the subgraph induced by the given vertex set: all edges of this graph with both
    /// endpoints in the set.
    ///
    /// Vertices without a surviving edge don't appear in the returned graph, since a graph is
    /// made up of its edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashSet;
    ///
    /// use egonet::edge::Edge;
    /// use egonet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("b", "c"));
    ///
    /// let sub = graph.subgraph(&HashSet::from(["a", "b"]));
    ///
    /// assert_eq!(sub.edge_count(), 1);
    /// assert!(sub.contains(&Edge::new("a", "b")));
    /// ```
    pub fn subgraph(&self, vertices: &HashSet<T>) -> Graph<T> {
        let mut sub = Graph::new();

        for edge in &self.edges {
            let (a, b) = edge.endpoints();
            if vertices.contains(a) && vertices.contains(b) {
                sub.insert(*edge);
            }
        }

        sub
    }

    /// Returns the graph as index-ordered neighbour lists, alongside the vertices in index order.
    ///
    /// The neighbour lists are sorted, so repeated calls on the same graph produce identical
    /// output regardless of edge insertion order.
    pub fn adjacency_list(&mut self) -> (Vec<T>, Vec<Vec<usize>>) {
        if self.index.is_none() {
            self.generate_index();
        }

        // Safety: the previous call guarantees the index has been generated and stored.
        let index = self.index.as_ref().unwrap();
        let vertices: Vec<T> = index.keys().copied().collect();
        let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); vertices.len()];

        for edge in &self.edges {
            let (a, b) = edge.endpoints();

            // Safety: the index was generated from this set of edges.
            let i = *index.get(a).unwrap();
            let j = *index.get(b).unwrap();

            neighbours[i].push(j);
            neighbours[j].push(i);
        }

        for list in &mut neighbours {
            list.sort_unstable();
        }

        (vertices, neighbours)
    }

    /// Returns the induced subgraph over the given vertex set as sorted neighbour lists.
    ///
    /// Unlike [`Graph::subgraph`] the returned vertex list covers the whole set, so members left
    /// without neighbours are retained (with an empty list) rather than dropped.
    pub fn induced_adjacency(&self, vertices: &HashSet<T>) -> (Vec<T>, Vec<Vec<usize>>) {
        let mut members: Vec<T> = vertices.iter().copied().collect();
        members.sort_unstable();

        let index: BTreeMap<T, usize> = members
            .iter()
            .enumerate()
            .map(|(i, &vertex)| (vertex, i))
            .collect();

        let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); members.len()];

        for edge in &self.edges {
            let (a, b) = edge.endpoints();
            if let (Some(&i), Some(&j)) = (index.get(a), index.get(b)) {
                neighbours[i].push(j);
                neighbours[j].push(i);
            }
        }

        for list in &mut neighbours {
            list.sort_unstable();
        }

        (members, neighbours)
    }

    /// Returns a mapping of vertices to their approximate betweenness centrality, computed from
    /// `samples` seeded pivots.
    ///
    /// Sampling `samples >= vertex_count` pivots degrades to the exact computation. Scores are
    /// normalised to the `[0, 1]` range.
    pub fn betweenness_centrality(&mut self, samples: usize, seed: u64) -> HashMap<T, f64> {
        let (vertices, neighbours) = self.adjacency_list();
        let scores = betweenness::sampled(&neighbours, samples, seed);

        vertices.into_iter().zip(scores).collect()
    }

    //
    // Private
    //

    /// Clears the computed state.
    ///
    /// This should be called every time the set of edges is mutated since the cached state won't
    /// correspond to the new graph.
    fn clear_cache(&mut self) {
        self.index = None;
        self.adjacency_matrix = None;
    }

    /// Returns the set of unique vertices contained within the set of edges.
    fn vertices_from_edges(&self) -> HashSet<T> {
        let mut vertices: HashSet<T> = HashSet::new();
        for edge in self.edges.iter() {
            let (a, b) = edge.endpoints();

            // Using a hashset guarantees uniqueness.
            vertices.insert(*a);
            vertices.insert(*b);
        }

        vertices
    }

    /// Constructs and stores an index of vertices for this set of edges.
    ///
    /// The index will be sorted by `T`'s implementation of `Ord`.
    fn generate_index(&mut self) {
        // It should be impossible to call this function if the cache is not empty.
        debug_assert!(self.index.is_none());

        let mut vertices: Vec<T> = self.vertices_from_edges().into_iter().collect();
        vertices.sort();

        let index: BTreeMap<T, usize> = vertices
            .iter()
            .enumerate()
            .map(|(i, &vertex)| (vertex, i))
            .collect();

        self.index = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dmatrix;

    use super::*;

    macro_rules! graph {
          ($($path:expr),*) => {{
              let mut graph = Graph::new();

              $(
                  let mut iter = $path.into_iter().peekable();
                  while let (Some(a), Some(b)) = (iter.next(), iter.peek()) {
                      graph.insert(Edge::new(a, *b));
                  }

              )*

              graph
          }}
      }

    #[test]
    fn new() {
        let _: Graph<()> = Graph::new();
    }

    #[test]
    fn insert() {
        let mut graph = Graph::new();
        let edge = Edge::new("a", "b");

        assert!(graph.insert(edge));
        assert!(!graph.insert(edge));
    }

    #[test]
    fn contains() {
        let mut graph = Graph::new();
        let edge = Edge::new("a", "b");

        graph.insert(edge);

        assert!(graph.contains(&edge));
        assert!(graph.contains(&Edge::new("b", "a")));
        assert!(!graph.contains(&Edge::new("b", "c")));
    }

    #[test]
    fn vertex_count() {
        let mut graph = Graph::new();
        assert_eq!(graph.vertex_count(), 0);

        // Verify two new vertices get added when they don't yet exist in the graph.
        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.vertex_count(), 2);

        // Verify only one new vertex is added when one of them already exists in the graph.
        graph.insert(Edge::new("a", "c"));
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn edge_count() {
        let mut graph = Graph::new();
        assert_eq!(graph.edge_count(), 0);

        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn density() {
        let mut graph = Graph::new();
        assert!(graph.density().is_nan());

        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.density(), 1.0);

        graph.insert(Edge::new("a", "c"));
        assert_eq!(graph.density(), 2.0 / 3.0);
    }

    #[test]
    fn adjacency_matrix() {
        let mut graph = Graph::new();
        assert_eq!(graph.adjacency_matrix(), dmatrix![]);

        graph.insert(Edge::new("a", "b"));
        assert_eq!(
            graph.adjacency_matrix(),
            dmatrix![0.0, 1.0;
                     1.0, 0.0]
        );

        graph.insert(Edge::new("a", "c"));
        assert_eq!(
            graph.adjacency_matrix(),
            dmatrix![0.0, 1.0, 1.0;
                     1.0, 0.0, 0.0;
                     1.0, 0.0, 0.0]
        );

        // Sanity check the index gets stored.
        assert!(graph.index.is_some());
    }

    #[test]
    fn degree_centrality() {
        let mut graph = Graph::new();
        assert!(graph.degree_centrality().is_empty());

        // One connection, centrality measures for each vertex should be 1.
        let (a, b, c) = ("a", "b", "c");
        graph.insert(Edge::new(a, b));
        let degree_centrality = graph.degree_centrality();

        assert_eq!(degree_centrality.get_key_value(a), Some((&a, &1)));
        assert_eq!(degree_centrality.get_key_value(b), Some((&b, &1)));

        // Sanity check the length.
        assert_eq!(degree_centrality.len(), 2);

        // Two connections, degree centrality for A should increase.
        graph.insert(Edge::new(a, c));
        let degree_centrality = graph.degree_centrality();

        assert_eq!(degree_centrality.get_key_value(a), Some((&a, &2)));
        assert_eq!(degree_centrality.get_key_value(b), Some((&b, &1)));
        assert_eq!(degree_centrality.get_key_value(c), Some((&c, &1)));

        // Sanity check the length.
        assert_eq!(degree_centrality.len(), 3);
    }

    #[test]
    fn degree_equals_incident_edge_count() {
        // A small fixed topology: a hub with three spokes and one spoke-to-spoke edge.
        let mut graph = graph!(["hub", "a", "b"]);
        graph.insert(Edge::new("hub", "b"));
        graph.insert(Edge::new("hub", "c"));

        let degrees = graph.degree_centrality();

        for (vertex, degree) in degrees {
            let incident = graph.edges().filter(|edge| edge.contains(&vertex)).count();
            assert_eq!(degree as usize, incident);
        }
    }

    #[test]
    fn subgraph_keeps_only_internal_edges() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let graph = graph!([a, b, c, d]);

        let sub = graph.subgraph(&HashSet::from([a, b, c]));

        assert_eq!(sub.edge_count(), 2);
        assert!(sub.contains(&Edge::new(a, b)));
        assert!(sub.contains(&Edge::new(b, c)));
        assert!(!sub.contains(&Edge::new(c, d)));
    }

    #[test]
    fn subgraph_edges_exist_in_original() {
        let (a, b, c, d, e) = ("a", "b", "c", "d", "e");
        let graph = graph!([a, b, c], [a, d, c], [a, e]);

        let sub = graph.subgraph(&HashSet::from([a, b, c, d]));

        for edge in sub.edges() {
            assert!(graph.contains(edge));
        }
        assert_eq!(sub.vertex_count(), 4);
    }

    #[test]
    fn adjacency_list_is_sorted() {
        let (a, b, c) = ("a", "b", "c");
        let mut graph = graph!([c, a, b]);

        let (vertices, neighbours) = graph.adjacency_list();

        assert_eq!(vertices, vec![a, b, c]);
        // a-c and a-b from the path c-a-b.
        assert_eq!(neighbours[0], vec![1, 2]);
        assert_eq!(neighbours[1], vec![0]);
        assert_eq!(neighbours[2], vec![0]);
    }

    #[test]
    fn induced_adjacency_retains_isolated_members() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let graph = graph!([a, b, c, d]);

        // c's only neighbours inside the set are missing, it must still be listed.
        let (vertices, neighbours) = graph.induced_adjacency(&HashSet::from([a, b, d]));

        assert_eq!(vertices, vec![a, b, d]);
        assert_eq!(neighbours[0], vec![1]);
        assert_eq!(neighbours[1], vec![0]);
        assert!(neighbours[2].is_empty());
    }

    #[test]
    fn betweenness_centrality_cycle_is_symmetric() {
        let (a, b, c, d) = ("a", "b", "c", "d");
        let mut graph = graph!([a, b, c, d, a]);

        // Every vertex of a cycle has two connections.
        for degree in graph.degree_centrality().values() {
            assert_eq!(*degree, 2);
        }

        let centrality = graph.betweenness_centrality(100, 42);

        let score = centrality[&a];
        assert!(score.is_finite());
        for vertex in [b, c, d] {
            assert!((centrality[&vertex] - score).abs() < 1e-9);
        }
    }

    //
    // Private
    //

    #[test]
    fn clear_cache_on_insert() {
        let mut graph = Graph::new();
        graph.insert(Edge::new("a", "b"));

        // The degree centrality requires the computation of the index and the adjacency matrix.
        graph.degree_centrality();

        // Check the objects have been cached.
        assert!(graph.index.is_some());
        assert!(graph.adjacency_matrix.is_some());

        // Update the graph with an insert.
        graph.insert(Edge::new("a", "c"));

        // Check the cache has been cleared.
        assert!(graph.index.is_none());
        assert!(graph.adjacency_matrix.is_none());
    }

    #[test]
    fn vertices_from_edges() {
        let mut graph = Graph::new();
        assert!(graph.vertices_from_edges().is_empty());

        let (a, b) = ("a", "b");
        graph.insert(Edge::new(a, b));

        let vertices = graph.vertices_from_edges();
        assert!(vertices.contains(a));
        assert!(vertices.contains(b));

        // Sanity check the length.
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn generate_index() {
        let mut graph: Graph<&str> = Graph::new();

        // Check for an empty graph.
        graph.generate_index();
        assert!(graph.index.is_some());
        assert!(graph.index.as_ref().unwrap().is_empty());

        let mut graph = Graph::new();
        let (a, b) = ("a", "b");
        graph.insert(Edge::new(a, b));
        graph.generate_index();

        assert!(graph.index.is_some());

        assert_eq!(
            graph.index.as_ref().unwrap().get_key_value(a),
            Some((&a, &0))
        );

        assert_eq!(
            graph.index.as_ref().unwrap().get_key_value(b),
            Some((&b, &1))
        );

        assert_eq!(graph.index.as_ref().unwrap().len(), 2);
    }
}
