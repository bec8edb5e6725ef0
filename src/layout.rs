//! A module for computing 2D force-directed graph layouts.

use itertools::Itertools;
use nalgebra::{Point2, Vector2};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Rounds of force simulation; enough for a few hundred vertices to settle.
const ITERATIONS: usize = 50;

/// Initial temperature, a tenth of the unit frame the layout starts in.
const TEMPERATURE: f64 = 0.1;

/// Computes a Fruchterman-Reingold spring layout for the graph given as neighbour lists.
///
/// Initial positions are drawn from an RNG seeded with `seed`, so the same graph and seed always
/// produce the same layout. Positions land roughly within the unit square; callers are expected
/// to rescale to their drawing surface.
pub fn spring_layout(neighbours: &[Vec<usize>], seed: u64) -> Vec<Point2<f64>> {
    let n = neighbours.len();
    if n == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions: Vec<Point2<f64>> = (0..n)
        .map(|_| Point2::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    // The ideal pairwise distance for a unit area spread over n vertices.
    let k = (1.0 / n as f64).sqrt();

    let mut temperature = TEMPERATURE;
    let cooling = temperature / (ITERATIONS as f64 + 1.0);

    for _ in 0..ITERATIONS {
        let mut displacement: Vec<Vector2<f64>> = vec![Vector2::zeros(); n];

        // Every pair repels.
        for (i, j) in (0..n).tuple_combinations() {
            let delta: Vector2<f64> = positions[i] - positions[j];
            let dist = delta.norm().max(1e-9);
            let push = (delta / dist) * (k * k / dist);

            displacement[i] += push;
            displacement[j] -= push;
        }

        // Edge endpoints attract. Neighbour lists hold both directions, so only act on the
        // ordered half.
        for (i, adjacent) in neighbours.iter().enumerate() {
            for &j in adjacent {
                if j <= i {
                    continue;
                }

                let delta: Vector2<f64> = positions[i] - positions[j];
                let dist = delta.norm().max(1e-9);
                let pull = (delta / dist) * (dist * dist / k);

                displacement[i] -= pull;
                displacement[j] += pull;
            }
        }

        // Move each vertex along its net force, capped by the current temperature.
        for (position, shift) in positions.iter_mut().zip(&displacement) {
            let length = shift.norm();
            if length > 0.0 {
                *position += shift / length * length.min(temperature);
            }
        }

        temperature -= cooling;
    }

    positions
}
