//! One seeded simulation run from random initial conditions to convergence or
//! step-budget exhaustion.
//!
//! Each step evaluates the spatial forces and integrates positions, evaluates the
//! Kuramoto coupling and integrates phases, samples the energies, and finally
//! compares old and new positions. The step that meets the tolerance is recorded
//! before the runner stops.

use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adjacency::AdjacencyMatrix;
use crate::config::EnsembleConfig;
use crate::convergence::ConvergenceMonitor;
use crate::energy::EnergySample;
use crate::error::{HoneError, Result};
use crate::force::ForceEngine;
use crate::integrator::{PhaseStepper, SpatialStepper};
use crate::phase::PhaseCoupling;
use crate::state::{initial_state, OscillatorState, PhaseState};
use crate::traits::Steppable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Initialized,
    Running { next_step: usize },
    Converged { step: usize },
    Exhausted { steps: usize },
    Failed { step: usize },
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Converged { .. } | RunStatus::Exhausted { .. } | RunStatus::Failed { .. }
        )
    }
}

/// How a completed realization ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// Movement fell below the tolerance at this (zero-based) step.
    Converged { step: usize },
    /// The full step budget ran without converging.
    Exhausted { steps: usize },
}

impl Termination {
    /// Number of steps executed.
    pub fn steps(&self) -> usize {
        match *self {
            Termination::Converged { step } => step + 1,
            Termination::Exhausted { steps } => steps,
        }
    }
}

/// Step-indexed record of one realization.
///
/// `positions` and `phases` start with the initial state, so they hold one more
/// entry than the three energy sequences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealizationHistory {
    pub seed: u64,
    pub positions: Vec<DMatrix<f64>>,
    pub phases: Vec<DVector<f64>>,
    pub potential_energy: Vec<f64>,
    pub kinetic_energy: Vec<f64>,
    pub total_energy: Vec<f64>,
    pub termination: Termination,
}

pub struct RealizationRunner<'a> {
    seed: u64,
    adjacency: &'a AdjacencyMatrix,
    iterations: usize,
    dt: f64,
    forces: ForceEngine<'a>,
    coupling: PhaseCoupling<'a>,
    spatial: SpatialStepper,
    phase: PhaseStepper,
    monitor: ConvergenceMonitor,
    oscillators: OscillatorState,
    phases: PhaseState,
    positions: Vec<DMatrix<f64>>,
    phase_history: Vec<DVector<f64>>,
    energies: Vec<EnergySample>,
    status: RunStatus,
}

impl<'a> RealizationRunner<'a> {
    /// Seeds a private generator with `seed` and draws the initial state from it.
    pub fn new(adjacency: &'a AdjacencyMatrix, config: &EnsembleConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (oscillators, phases) = initial_state(&mut rng, adjacency.node_count(), config.dim);
        Self::build(adjacency, config, seed, oscillators, phases)
    }

    /// Starts from caller-supplied states instead of random draws.
    pub fn with_state(
        adjacency: &'a AdjacencyMatrix,
        config: &EnsembleConfig,
        seed: u64,
        oscillators: OscillatorState,
        phases: PhaseState,
    ) -> Result<Self> {
        config.validate()?;
        let n = adjacency.node_count();
        if oscillators.node_count() != n
            || oscillators.dim() != config.dim
            || oscillators.velocities.shape() != oscillators.positions.shape()
        {
            return Err(HoneError::InvalidConfiguration(format!(
                "Spatial state must be {}x{} for positions and velocities.",
                n, config.dim
            )));
        }
        if phases.node_count() != n
            || phases.phase_velocities.len() != n
            || phases.intrinsic_frequencies.len() != n
        {
            return Err(HoneError::InvalidConfiguration(format!(
                "Phase state must have {} entries per vector.",
                n
            )));
        }
        Ok(Self::build(adjacency, config, seed, oscillators, phases))
    }

    fn build(
        adjacency: &'a AdjacencyMatrix,
        config: &EnsembleConfig,
        seed: u64,
        oscillators: OscillatorState,
        phases: PhaseState,
    ) -> Self {
        let n = oscillators.node_count();
        let dim = oscillators.dim();
        // `iterations` is only a ceiling, so histories grow as steps are taken.
        let positions = vec![oscillators.positions.clone()];
        let phase_history = vec![phases.phases.clone()];

        Self {
            seed,
            adjacency,
            iterations: config.iterations,
            dt: config.dt,
            forces: ForceEngine::new(adjacency),
            coupling: PhaseCoupling::new(adjacency),
            spatial: SpatialStepper::new(config.gamma, n, dim),
            phase: PhaseStepper::new(config.gamma_theta, config.coupling_strength, n),
            monitor: ConvergenceMonitor::new(config.tol),
            oscillators,
            phases,
            positions,
            phase_history,
            energies: Vec::new(),
            status: RunStatus::Initialized,
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn oscillators(&self) -> &OscillatorState {
        &self.oscillators
    }

    pub fn phases(&self) -> &PhaseState {
        &self.phases
    }

    /// Advances by one step. Terminal runners are left untouched.
    pub fn step(&mut self) -> Result<RunStatus> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        let step = match self.status {
            RunStatus::Running { next_step } => next_step,
            _ => 0,
        };
        if step >= self.iterations {
            self.status = RunStatus::Exhausted { steps: step };
            return Ok(self.status);
        }

        let previous = self.oscillators.positions.clone();
        self.spatial.step(&self.forces, &mut self.oscillators, self.dt);
        self.phase.step(&self.coupling, &mut self.phases, self.dt);
        let energy = EnergySample::measure(self.adjacency, &self.oscillators);

        if let Some(quantity) = self.first_non_finite(&energy) {
            warn!(seed = self.seed, step, quantity, "realization became numerically degenerate");
            self.status = RunStatus::Failed { step };
            return Err(HoneError::NumericDegenerate {
                seed: self.seed,
                step,
                quantity,
            });
        }

        self.positions.push(self.oscillators.positions.clone());
        self.phase_history.push(self.phases.phases.clone());
        self.energies.push(energy);

        let check = self.monitor.check(&previous, &self.oscillators.positions);
        debug!(
            seed = self.seed,
            step,
            movement = check.movement,
            total_energy = energy.total,
            "step complete"
        );

        self.status = if check.converged {
            info!(seed = self.seed, step, movement = check.movement, "convergence achieved");
            RunStatus::Converged { step }
        } else if step + 1 >= self.iterations {
            info!(seed = self.seed, steps = step + 1, "step budget exhausted");
            RunStatus::Exhausted { steps: step + 1 }
        } else {
            RunStatus::Running {
                next_step: step + 1,
            }
        };
        Ok(self.status)
    }

    fn first_non_finite(&self, energy: &EnergySample) -> Option<&'static str> {
        let all_finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
        if !all_finite(self.oscillators.positions.as_slice()) {
            Some("position")
        } else if !all_finite(self.oscillators.velocities.as_slice()) {
            Some("velocity")
        } else if !all_finite(self.phases.phases.as_slice()) {
            Some("phase")
        } else if !all_finite(self.phases.phase_velocities.as_slice()) {
            Some("phase velocity")
        } else if !energy.is_finite() {
            Some("energy")
        } else {
            None
        }
    }

    /// Steps until a terminal state and hands over the recorded history.
    pub fn run(mut self) -> Result<RealizationHistory> {
        loop {
            match self.step()? {
                RunStatus::Converged { step } => {
                    return Ok(self.finish(Termination::Converged { step }))
                }
                RunStatus::Exhausted { steps } => {
                    return Ok(self.finish(Termination::Exhausted { steps }))
                }
                _ => {}
            }
        }
    }

    fn finish(self, termination: Termination) -> RealizationHistory {
        let mut potential_energy = Vec::with_capacity(self.energies.len());
        let mut kinetic_energy = Vec::with_capacity(self.energies.len());
        let mut total_energy = Vec::with_capacity(self.energies.len());
        for sample in &self.energies {
            potential_energy.push(sample.potential);
            kinetic_energy.push(sample.kinetic);
            total_energy.push(sample.total);
        }

        RealizationHistory {
            seed: self.seed,
            positions: self.positions,
            phases: self.phase_history,
            potential_energy,
            kinetic_energy,
            total_energy,
            termination,
        }
    }
}

/// Runs the realization for `seed` to completion.
pub fn run_realization(
    adjacency: &AdjacencyMatrix,
    config: &EnsembleConfig,
    seed: u64,
) -> Result<RealizationHistory> {
    config.validate()?;
    RealizationRunner::new(adjacency, config, seed).run()
}
