//! Mutable per-realization state and its seeded initialization.

use std::f64::consts::TAU;

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;

/// Spatial state: one row per node in a `dim`-dimensional embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorState {
    pub positions: DMatrix<f64>,
    pub velocities: DMatrix<f64>,
}

impl OscillatorState {
    /// Starts from `positions` at rest.
    pub fn at_rest(positions: DMatrix<f64>) -> Self {
        let velocities = DMatrix::zeros(positions.nrows(), positions.ncols());
        Self {
            positions,
            velocities,
        }
    }

    pub fn node_count(&self) -> usize {
        self.positions.nrows()
    }

    pub fn dim(&self) -> usize {
        self.positions.ncols()
    }
}

/// Phase state: angle, angular velocity and a fixed intrinsic frequency per node.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    pub phases: DVector<f64>,
    pub phase_velocities: DVector<f64>,
    pub intrinsic_frequencies: DVector<f64>,
}

impl PhaseState {
    /// Starts from `phases` with zero phase velocity.
    pub fn at_rest(phases: DVector<f64>, intrinsic_frequencies: DVector<f64>) -> Self {
        let phase_velocities = DVector::zeros(phases.len());
        Self {
            phases,
            phase_velocities,
            intrinsic_frequencies,
        }
    }

    pub fn node_count(&self) -> usize {
        self.phases.len()
    }
}

/// Draws the initial state of one realization.
///
/// Draw order is fixed: positions row by row, uniform in `[0, 1)`; phases uniform in
/// `[0, 2π)`; intrinsic frequencies from the standard normal distribution.
pub fn initial_state<R: Rng>(
    rng: &mut R,
    node_count: usize,
    dim: usize,
) -> (OscillatorState, PhaseState) {
    let mut positions = DMatrix::zeros(node_count, dim);
    for i in 0..node_count {
        for k in 0..dim {
            positions[(i, k)] = rng.gen::<f64>();
        }
    }

    let phases =
        DVector::from_iterator(node_count, (0..node_count).map(|_| rng.gen::<f64>() * TAU));
    let frequencies = DVector::from_iterator(
        node_count,
        (0..node_count).map(|_| rng.sample::<f64, _>(StandardNormal)),
    );

    (
        OscillatorState::at_rest(positions),
        PhaseState::at_rest(phases, frequencies),
    )
}
