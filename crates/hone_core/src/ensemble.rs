//! Ensemble orchestration: independent realizations on a fixed-size worker pool.
//!
//! The adjacency is the only shared data and is borrowed read-only by every task.
//! Each task owns its generator, states and histories. Outcomes come back over a
//! channel in completion order and are re-indexed by seed after the join.
//!
//! If any realization turns numerically degenerate the whole ensemble fails with
//! the error of the lowest failing seed; all dispatched realizations still finish.

use std::sync::mpsc;

use nalgebra::{DMatrix, DVector};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use tracing::info;

use crate::adjacency::AdjacencyMatrix;
use crate::config::EnsembleConfig;
use crate::error::Result;
use crate::realization::{run_realization, RealizationHistory, Termination};

/// Seed-ordered histories of every realization; slot `i` belongs to seed `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleResult {
    pub positions: Vec<Vec<DMatrix<f64>>>,
    pub phases: Vec<Vec<DVector<f64>>>,
    pub potential_energies: Vec<Vec<f64>>,
    pub kinetic_energies: Vec<Vec<f64>>,
    pub total_energies: Vec<Vec<f64>>,
    pub terminations: Vec<Termination>,
}

/// Borrowed view of one seed's histories.
#[derive(Debug, Clone, Copy)]
pub struct RealizationView<'a> {
    pub seed: u64,
    pub positions: &'a [DMatrix<f64>],
    pub phases: &'a [DVector<f64>],
    pub potential_energy: &'a [f64],
    pub kinetic_energy: &'a [f64],
    pub total_energy: &'a [f64],
    pub termination: Termination,
}

impl EnsembleResult {
    /// Assembles the result from histories already sorted by seed.
    fn from_histories(histories: Vec<RealizationHistory>) -> Self {
        let n = histories.len();
        let mut result = Self {
            positions: Vec::with_capacity(n),
            phases: Vec::with_capacity(n),
            potential_energies: Vec::with_capacity(n),
            kinetic_energies: Vec::with_capacity(n),
            total_energies: Vec::with_capacity(n),
            terminations: Vec::with_capacity(n),
        };
        for history in histories {
            result.positions.push(history.positions);
            result.phases.push(history.phases);
            result.potential_energies.push(history.potential_energy);
            result.kinetic_energies.push(history.kinetic_energy);
            result.total_energies.push(history.total_energy);
            result.terminations.push(history.termination);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.terminations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminations.is_empty()
    }

    pub fn realization(&self, seed: u64) -> Option<RealizationView<'_>> {
        let i = usize::try_from(seed).ok()?;
        Some(RealizationView {
            seed,
            positions: self.positions.get(i)?,
            phases: self.phases.get(i)?,
            potential_energy: self.potential_energies.get(i)?,
            kinetic_energy: self.kinetic_energies.get(i)?,
            total_energy: self.total_energies.get(i)?,
            termination: *self.terminations.get(i)?,
        })
    }
}

/// Runs seeds `0..ensemble_size` concurrently and gathers their histories by seed.
pub fn run_ensemble(adjacency: &AdjacencyMatrix, config: &EnsembleConfig) -> Result<EnsembleResult> {
    config.validate()?;
    let pool = build_pool(config.workers)?;
    info!(
        ensemble_size = config.ensemble_size,
        nodes = adjacency.node_count(),
        edges = adjacency.edge_count(),
        workers = pool.current_num_threads(),
        "starting ensemble"
    );

    let outcomes = dispatch_by_seed(&pool, config.ensemble_size, |seed| {
        run_realization(adjacency, config, seed)
    });
    let histories = outcomes.into_iter().collect::<Result<Vec<_>>>()?;

    let result = EnsembleResult::from_histories(histories);
    let converged = result
        .terminations
        .iter()
        .filter(|t| matches!(t, Termination::Converged { .. }))
        .count();
    info!(ensemble_size = result.len(), converged, "ensemble complete");
    Ok(result)
}

fn build_pool(workers: Option<usize>) -> Result<ThreadPool> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("hone-worker-{i}"));
    if let Some(n) = workers {
        builder = builder.num_threads(n);
    }
    Ok(builder.build()?)
}

/// Executes `task(seed)` for every seed in `0..count` on `pool` and returns the outputs
/// indexed by seed, independent of completion order.
pub(crate) fn dispatch_by_seed<T, F>(pool: &ThreadPool, count: usize, task: F) -> Vec<T>
where
    T: Send,
    F: Fn(u64) -> T + Sync,
{
    let (tx, rx) = mpsc::channel();
    let task = &task;
    pool.scope(|scope| {
        for seed in 0..count {
            let tx = tx.clone();
            scope.spawn(move |_| {
                // The receiver outlives the scope, so sending cannot fail.
                let _ = tx.send((seed, task(seed as u64)));
            });
        }
    });
    drop(tx);

    let mut tagged: Vec<(usize, T)> = rx.into_iter().collect();
    tagged.sort_unstable_by_key(|(seed, _)| *seed);
    tagged.into_iter().map(|(_, value)| value).collect()
}
