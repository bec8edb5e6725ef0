//! A module for the sampled approximation of betweenness centrality.

use std::collections::VecDeque;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Single-source shortest-path dependency accumulation, from Ulrik Brandes's
/// A Faster Algorithm for Betweenness Centrality
/// http://snap.stanford.edu/class/cs224w-readings/brandes01centrality.pdf
/// page 10, "Algorithm 1: Betweenness centrality in unweighted graphs"
fn accumulate_from(pivot: usize, neighbours: &[Vec<usize>], scores: &mut [f64]) {
    let num_nodes = neighbours.len();

    let mut sigma: Vec<f64> = vec![0.0; num_nodes];
    let mut distance: Vec<usize> = vec![usize::MAX; num_nodes];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    let mut delta: Vec<f64> = vec![0.0; num_nodes];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut stack: Vec<usize> = Vec::new();

    sigma[pivot] = 1.0;
    distance[pivot] = 0;
    queue.push_back(pivot);

    while let Some(v) = queue.pop_front() {
        stack.push(v);

        for &w in &neighbours[v] {
            if distance[w] == usize::MAX {
                distance[w] = distance[v] + 1;
                queue.push_back(w);
            }
            if distance[w] == distance[v] + 1 {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    // Walk back down the BFS tree, farthest vertices first.
    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != pivot {
            scores[w] += delta[w];
        }
    }
}

/// Approximates betweenness centrality by accumulating Brandes dependencies from `samples`
/// randomly chosen pivot vertices instead of from every vertex.
///
/// The pivot sequence is pinned: vertices are taken in index order, shuffled with an RNG seeded
/// from `seed`, and the first `min(samples, n)` become pivots. Scores are normalised to the
/// reference scale of `1 / ((n - 1)(n - 2))` and rescaled by `n / samples` to compensate for
/// sampling, so `samples >= n` matches the exact computation.
pub(crate) fn sampled(neighbours: &[Vec<usize>], samples: usize, seed: u64) -> Vec<f64> {
    let num_nodes = neighbours.len();

    // With fewer than three vertices no vertex can sit between two others.
    if num_nodes <= 2 || samples == 0 {
        return vec![0.0; num_nodes];
    }

    let mut pivots: Vec<usize> = (0..num_nodes).collect();
    pivots.shuffle(&mut StdRng::seed_from_u64(seed));
    pivots.truncate(samples.min(num_nodes));

    let mut scores = vec![0.0; num_nodes];
    for &pivot in &pivots {
        accumulate_from(pivot, neighbours, &mut scores);
    }

    // The accumulation visits each unordered pair from both endpoints when every vertex is a
    // pivot, which cancels the factor of two in the undirected normalisation.
    let scale = (num_nodes as f64 / pivots.len() as f64)
        / ((num_nodes - 1) as f64 * (num_nodes - 2) as f64);
    for score in &mut scores {
        *score *= scale;
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Neighbour lists for a path graph over `n` vertices.
    fn path(n: usize) -> Vec<Vec<usize>> {
        (0..n)
            .map(|i| {
                let mut adjacent = Vec::new();
                if i > 0 {
                    adjacent.push(i - 1);
                }
                if i + 1 < n {
                    adjacent.push(i + 1);
                }
                adjacent
            })
            .collect()
    }

    #[test]
    fn interior_vertices_outscore_endpoints() {
        let scores = sampled(&path(4), 100, 42);

        assert!(scores[1] > scores[0]);
        assert!(scores[2] > scores[3]);
        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[3], 0.0);
    }

    #[test]
    fn cycle_is_symmetric() {
        // 4-cycle: every vertex lies on half the shortest paths of the opposite pair.
        let cycle = vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![0, 2]];

        let scores = sampled(&cycle, 100, 42);

        for score in &scores {
            assert!((score - scores[0]).abs() < 1e-9);
        }
        assert!(scores[0] > 0.0);
    }

    #[test]
    fn exact_when_samples_cover_all_vertices() {
        // On the path a-b-c, b sits on the only a-c path: unnormalised score 2, scale 1/2.
        let scores = sampled(&path(3), 3, 42);

        assert_eq!(scores, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn oversampling_matches_exact_computation() {
        let exact = sampled(&path(5), 5, 42);
        let oversampled = sampled(&path(5), 100, 7);

        for (a, b) in exact.iter().zip(&oversampled) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn sampling_is_deterministic_for_a_seed() {
        let first = sampled(&path(10), 4, 42);
        let second = sampled(&path(10), 4, 42);

        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_graphs_score_zero() {
        assert!(sampled(&[], 100, 42).is_empty());
        assert_eq!(sampled(&path(2), 100, 42), vec![0.0, 0.0]);
        assert_eq!(sampled(&path(3), 0, 42), vec![0.0; 3]);
    }
}
