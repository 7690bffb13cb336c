use nalgebra::DVector;

use crate::adjacency::AdjacencyMatrix;
use crate::traits::InteractionField;

/// Kuramoto coupling: `c_i = Σ_j w_ij sin(θ_j - θ_i)`.
///
/// Phases are never wrapped; only sines of differences enter the sum.
#[derive(Debug, Clone, Copy)]
pub struct PhaseCoupling<'a> {
    adjacency: &'a AdjacencyMatrix,
}

impl<'a> PhaseCoupling<'a> {
    pub fn new(adjacency: &'a AdjacencyMatrix) -> Self {
        Self { adjacency }
    }

    pub fn coupling(&self, phases: &DVector<f64>) -> DVector<f64> {
        let mut out = DVector::zeros(phases.len());
        self.apply(phases, &mut out);
        out
    }
}

impl InteractionField for PhaseCoupling<'_> {
    type State = DVector<f64>;

    fn node_count(&self) -> usize {
        self.adjacency.node_count()
    }

    fn apply(&self, phases: &DVector<f64>, out: &mut DVector<f64>) {
        for i in 0..phases.len() {
            let mut sum = 0.0_f64;
            for (j, w) in self.adjacency.neighbors(i) {
                sum += w * (phases[j] - phases[i]).sin();
            }
            out[i] = sum;
        }
    }
}
