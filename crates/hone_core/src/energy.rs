//! Energy bookkeeping for a spatial snapshot.
//!
//! The potential is the quadratic `½ Σ_{i<j} w_ij max(‖x_i - x_j‖, 1e-6)²`, while
//! [`ForceEngine`](crate::force::ForceEngine) applies a distance-independent pull.
//! The two are not gradient-consistent, so total energy is a diagnostic and is not
//! expected to be conserved or to decrease monotonically.

use nalgebra::DMatrix;
use serde::Serialize;

use crate::adjacency::AdjacencyMatrix;
use crate::force::MIN_DISTANCE;
use crate::state::OscillatorState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergySample {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl EnergySample {
    pub fn measure(adjacency: &AdjacencyMatrix, state: &OscillatorState) -> Self {
        let kinetic = kinetic_energy(&state.velocities);
        let potential = potential_energy(adjacency, &state.positions);
        Self {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.kinetic.is_finite() && self.potential.is_finite() && self.total.is_finite()
    }
}

/// `½ Σ_i ‖v_i‖²`
pub fn kinetic_energy(velocities: &DMatrix<f64>) -> f64 {
    let mut sum = 0.0;
    for i in 0..velocities.nrows() {
        sum += velocities.row(i).norm_squared();
    }
    0.5 * sum
}

pub fn potential_energy(adjacency: &AdjacencyMatrix, positions: &DMatrix<f64>) -> f64 {
    let mut sum = 0.0;
    for i in 0..positions.nrows() {
        for (j, w) in adjacency.neighbors(i) {
            if j >= i {
                break;
            }
            let distance = (positions.row(i) - positions.row(j)).norm().max(MIN_DISTANCE);
            sum += w * distance * distance;
        }
    }
    0.5 * sum
}

#[cfg(test)]
mod tests {
    use super::{kinetic_energy, potential_energy, EnergySample};
    use crate::adjacency::AdjacencyMatrix;
    use crate::state::OscillatorState;
    use nalgebra::DMatrix;

    #[test]
    fn potential_is_half_weighted_squared_distance() {
        let adjacency =
            AdjacencyMatrix::from_weighted_edges(2, &[(0, 1, 2.0)]).expect("valid graph");
        let positions = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 3.0, 4.0]);

        assert!((potential_energy(&adjacency, &positions) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn potential_counts_each_pair_once() {
        let adjacency = AdjacencyMatrix::from_edges(3, &[(0, 1), (1, 2), (0, 2)])
            .expect("valid graph");
        let positions = DMatrix::from_row_slice(3, 1, &[0.0, 1.0, 3.0]);

        // ½ (1² + 2² + 3²)
        assert!((potential_energy(&adjacency, &positions) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_pair_uses_distance_floor() {
        let adjacency =
            AdjacencyMatrix::from_weighted_edges(2, &[(0, 1, 4.0)]).expect("valid graph");
        let positions = DMatrix::from_row_slice(2, 2, &[0.5, 0.5, 0.5, 0.5]);

        let potential = potential_energy(&adjacency, &positions);
        assert!((potential - 0.5 * 4.0 * 1e-12).abs() < 1e-24);
    }

    #[test]
    fn total_is_kinetic_plus_potential() {
        let adjacency =
            AdjacencyMatrix::from_weighted_edges(2, &[(0, 1, 1.5)]).expect("valid graph");
        let mut state =
            OscillatorState::at_rest(DMatrix::from_row_slice(2, 2, &[0.1, 0.2, 0.7, 0.3]));
        state.velocities = DMatrix::from_row_slice(2, 2, &[1.0, -2.0, 0.5, 0.0]);

        let sample = EnergySample::measure(&adjacency, &state);

        assert!((sample.kinetic - 0.5 * (1.0 + 4.0 + 0.25)).abs() < 1e-12);
        assert_eq!(sample.kinetic, kinetic_energy(&state.velocities));
        assert_eq!(sample.total, sample.kinetic + sample.potential);
        assert!(sample.is_finite());
    }
}
