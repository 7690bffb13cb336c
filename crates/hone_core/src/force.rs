use nalgebra::DMatrix;

use crate::adjacency::AdjacencyMatrix;
use crate::traits::InteractionField;

/// Distances at or below this are treated as coincident nodes.
pub const MIN_DISTANCE: f64 = 1e-6;

/// Constant-magnitude attraction toward every neighbour, scaled by edge weight.
///
/// For node `i` the force is `Σ_j w_ij (x_j - x_i) / ‖x_j - x_i‖`. Neighbours within
/// [`MIN_DISTANCE`] contribute nothing, so coincident nodes never yield NaN or infinity.
#[derive(Debug, Clone, Copy)]
pub struct ForceEngine<'a> {
    adjacency: &'a AdjacencyMatrix,
}

impl<'a> ForceEngine<'a> {
    pub fn new(adjacency: &'a AdjacencyMatrix) -> Self {
        Self { adjacency }
    }

    /// Convenience wrapper around [`InteractionField::apply`] that allocates the output.
    pub fn forces(&self, positions: &DMatrix<f64>) -> DMatrix<f64> {
        let mut out = DMatrix::zeros(positions.nrows(), positions.ncols());
        self.apply(positions, &mut out);
        out
    }
}

impl InteractionField for ForceEngine<'_> {
    type State = DMatrix<f64>;

    fn node_count(&self) -> usize {
        self.adjacency.node_count()
    }

    fn apply(&self, positions: &DMatrix<f64>, out: &mut DMatrix<f64>) {
        let dim = positions.ncols();
        out.fill(0.0);

        for i in 0..positions.nrows() {
            for (j, w) in self.adjacency.neighbors(i) {
                let mut distance_sq = 0.0_f64;
                for k in 0..dim {
                    let delta = positions[(j, k)] - positions[(i, k)];
                    distance_sq += delta * delta;
                }
                let distance = distance_sq.sqrt();
                if distance <= MIN_DISTANCE {
                    continue;
                }

                for k in 0..dim {
                    let delta = positions[(j, k)] - positions[(i, k)];
                    out[(i, k)] += w * (delta / distance);
                }
            }
        }
    }
}
