use nalgebra::{DMatrix, DVector};

use crate::state::{OscillatorState, PhaseState};
use crate::traits::{InteractionField, Steppable};

/// Damped semi-implicit Euler for the spatial oscillators.
///
/// ```text
/// v <- v + F(x) dt - gamma v
/// x <- x + v dt
/// ```
///
/// The damping term uses the pre-update velocity and is not scaled by `dt`.
pub struct SpatialStepper {
    gamma: f64,
    forces: DMatrix<f64>,
}

impl SpatialStepper {
    pub fn new(gamma: f64, node_count: usize, dim: usize) -> Self {
        Self {
            gamma,
            forces: DMatrix::zeros(node_count, dim),
        }
    }

    /// Forces evaluated during the most recent step.
    pub fn last_forces(&self) -> &DMatrix<f64> {
        &self.forces
    }
}

impl<F> Steppable<F> for SpatialStepper
where
    F: InteractionField<State = DMatrix<f64>>,
{
    type State = OscillatorState;

    fn step(&mut self, field: &F, state: &mut OscillatorState, dt: f64) {
        debug_assert_eq!(field.node_count(), state.positions.nrows());
        if self.forces.shape() != state.positions.shape() {
            self.forces = DMatrix::zeros(state.positions.nrows(), state.positions.ncols());
        }
        field.apply(&state.positions, &mut self.forces);

        for (v, f) in state.velocities.iter_mut().zip(self.forces.iter()) {
            *v = *v + f * dt - self.gamma * *v;
        }
        for (x, v) in state.positions.iter_mut().zip(state.velocities.iter()) {
            *x += v * dt;
        }
    }
}

/// Damped, driven Kuramoto update for the phases.
///
/// ```text
/// a     = omega + K c(theta) - gamma_theta theta'
/// theta' <- theta' + a dt
/// theta  <- theta + theta' dt
/// ```
pub struct PhaseStepper {
    gamma_theta: f64,
    coupling_strength: f64,
    coupling: DVector<f64>,
}

impl PhaseStepper {
    pub fn new(gamma_theta: f64, coupling_strength: f64, node_count: usize) -> Self {
        Self {
            gamma_theta,
            coupling_strength,
            coupling: DVector::zeros(node_count),
        }
    }
}

impl<F> Steppable<F> for PhaseStepper
where
    F: InteractionField<State = DVector<f64>>,
{
    type State = PhaseState;

    fn step(&mut self, field: &F, state: &mut PhaseState, dt: f64) {
        debug_assert_eq!(field.node_count(), state.phases.len());
        if self.coupling.len() != state.phases.len() {
            self.coupling = DVector::zeros(state.phases.len());
        }
        field.apply(&state.phases, &mut self.coupling);

        for i in 0..state.phases.len() {
            let acceleration = state.intrinsic_frequencies[i]
                + self.coupling_strength * self.coupling[i]
                - self.gamma_theta * state.phase_velocities[i];
            state.phase_velocities[i] += acceleration * dt;
            state.phases[i] += state.phase_velocities[i] * dt;
        }
    }
}
