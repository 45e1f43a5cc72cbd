// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::f64::consts::TAU;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use super::config::LayoutConfig;
use crate::common::Result;
use crate::graph::{CoordinateMap, NodeId, Position, ReactionGraph};
use crate::layout_err;

/// Distances below this are treated as coincident nodes.
const MIN_DISTANCE: f64 = 1e-3;

/// Receives per-iteration progress and is polled for cancellation at every
/// iteration boundary.
pub trait ProgressListener {
    fn set_progress(&self, done: usize, total: usize);

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Listener for callers that neither report progress nor cancel.
pub struct NoProgress;

impl ProgressListener for NoProgress {
    fn set_progress(&self, _done: usize, _total: usize) {}
}

/// How a layout run ended. Both variants carry a coordinate for every node.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutOutcome {
    Finished(CoordinateMap),
    Cancelled {
        partial: CoordinateMap,
        completed_iterations: usize,
    },
}

impl LayoutOutcome {
    pub fn coordinates(&self) -> &CoordinateMap {
        match self {
            LayoutOutcome::Finished(coords) => coords,
            LayoutOutcome::Cancelled { partial, .. } => partial,
        }
    }

    pub fn into_coordinates(self) -> CoordinateMap {
        match self {
            LayoutOutcome::Finished(coords) => coords,
            LayoutOutcome::Cancelled { partial, .. } => partial,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, LayoutOutcome::Cancelled { .. })
    }
}

/// Spring-electrical layout state. Positions are kept in a dense vector
/// indexed by node ordinal.
struct FruchtermanReingold<'a> {
    config: &'a LayoutConfig,
    node_count: usize,
    /// Edge endpoints as node indices, self-loops removed.
    springs: Vec<(usize, usize)>,
    /// Optimal pairwise distance.
    k: f64,
    half_frame: f64,
}

impl<'a> FruchtermanReingold<'a> {
    fn new(graph: &ReactionGraph, config: &'a LayoutConfig) -> Self {
        let node_count = graph.node_count();
        let springs = graph
            .edges()
            .filter(|e| e.source != e.target)
            .map(|e| (e.source.0, e.target.0))
            .collect();
        let area = config.frame_size * config.frame_size;
        let k = (area / node_count.max(1) as f64).sqrt();

        Self {
            config,
            node_count,
            springs,
            k,
            half_frame: config.frame_size / 2.0,
        }
    }

    fn random_layout(&self) -> Vec<Position> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        (0..self.node_count)
            .map(|_| {
                Position::new(
                    (rng.random::<f64>() - 0.5) * self.config.frame_size,
                    (rng.random::<f64>() - 0.5) * self.config.frame_size,
                )
            })
            .collect()
    }

    /// Net repulsive displacement per node. Each node's sum is accumulated
    /// independently in node order, so the result does not depend on how the
    /// work is split across threads.
    fn repulsion(&self, positions: &[Position]) -> Vec<Position> {
        let k_sq = self.k * self.k;
        (0..positions.len())
            .into_par_iter()
            .map(|i| {
                let pos = positions[i];
                let mut disp = Position::ORIGIN;
                for (j, other) in positions.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let mut delta = pos - *other;
                    let mut dist = delta.length();
                    if dist < MIN_DISTANCE {
                        delta = coincident_direction(i, j) * MIN_DISTANCE;
                        dist = MIN_DISTANCE;
                    }
                    let force = k_sq / dist;
                    disp = disp + delta * (force / dist);
                }
                disp
            })
            .collect()
    }

    /// Spring forces along edges, reduced sequentially in edge order.
    fn attraction(&self, positions: &[Position], disp: &mut [Position]) {
        for &(s, t) in &self.springs {
            let delta = positions[s] - positions[t];
            let dist = delta.length();
            if dist < MIN_DISTANCE {
                continue;
            }
            let force = dist * dist / self.k;
            let pull = delta * (force / dist);
            disp[s] = disp[s] - pull;
            disp[t] = disp[t] + pull;
        }
    }

    /// Move every node along its displacement, capped by `temperature`, and
    /// keep it inside the working frame.
    fn apply(&self, positions: &mut [Position], disp: &[Position], temperature: f64) {
        for (pos, d) in positions.iter_mut().zip(disp) {
            let len = d.length();
            if len > 0.0 && len.is_finite() {
                let step = len.min(temperature);
                *pos = *pos + *d * (step / len);
            }
            pos.x = pos.x.clamp(-self.half_frame, self.half_frame);
            pos.y = pos.y.clamp(-self.half_frame, self.half_frame);
        }
    }

    fn run(&self, pool: &rayon::ThreadPool, listener: &dyn ProgressListener) -> LayoutOutcome {
        let iterations = self.config.iterations;
        let initial_temperature = self.config.initial_temperature();
        let mut positions = self.random_layout();

        for iteration in 0..iterations {
            if listener.is_cancelled() {
                log::debug!("layout cancelled after {iteration} of {iterations} iterations");
                return LayoutOutcome::Cancelled {
                    partial: snapshot(&positions),
                    completed_iterations: iteration,
                };
            }

            // linear cooling
            let temperature =
                initial_temperature * (1.0 - iteration as f64 / iterations as f64);

            let mut disp = pool.install(|| self.repulsion(&positions));
            self.attraction(&positions, &mut disp);
            self.apply(&mut positions, &disp, temperature);

            if self.config.debug && iteration % 100 == 0 {
                log::debug!("iteration {iteration}: temperature {temperature:.3}");
            }
            listener.set_progress(iteration + 1, iterations);
        }

        LayoutOutcome::Finished(snapshot(&positions))
    }
}

/// Deterministic unit direction used to separate two nodes sitting on the
/// same spot. Opposite for (i, j) and (j, i).
fn coincident_direction(i: usize, j: usize) -> Position {
    let (lo, hi) = (i.min(j), i.max(j));
    let angle = (lo as f64 + hi as f64 * 0.618_033_988_75) * TAU;
    let dir = Position::new(angle.cos(), angle.sin());
    if i < j { dir } else { dir * -1.0 }
}

fn snapshot(positions: &[Position]) -> CoordinateMap {
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| (NodeId(i), *p))
        .collect()
}

fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("catlynet-fr-{i}"))
        .build()
    {
        Ok(pool) => Ok(pool),
        Err(err) => layout_err!(ThreadPool, err.to_string()),
    }
}

/// Compute a Fruchterman–Reingold layout for every node of `graph`.
///
/// Cancellation is reported through `LayoutOutcome::Cancelled` and is not an
/// error; errors are limited to worker pool construction.
pub fn compute_layout(
    graph: &ReactionGraph,
    config: &LayoutConfig,
    listener: &dyn ProgressListener,
) -> Result<LayoutOutcome> {
    if graph.is_empty() {
        return Ok(LayoutOutcome::Finished(CoordinateMap::new()));
    }

    let mut config = config.clone();
    config.validate();

    let pool = build_pool(config.effective_threads())?;
    let engine = FruchtermanReingold::new(graph, &config);
    Ok(engine.run(&pool, listener))
}
