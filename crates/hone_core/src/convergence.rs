use nalgebra::DMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceCheck {
    /// `Σ_i ‖x_i(new) - x_i(old)‖`
    pub movement: f64,
    pub converged: bool,
}

/// Early-stopping rule on aggregate per-step node displacement.
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceMonitor {
    tol: f64,
}

impl ConvergenceMonitor {
    pub fn new(tol: f64) -> Self {
        Self { tol }
    }

    pub fn check(&self, old: &DMatrix<f64>, new: &DMatrix<f64>) -> ConvergenceCheck {
        let mut movement = 0.0;
        for i in 0..new.nrows() {
            movement += (new.row(i) - old.row(i)).norm();
        }
        ConvergenceCheck {
            movement,
            converged: movement < self.tol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConvergenceMonitor;
    use nalgebra::DMatrix;

    #[test]
    fn movement_sums_per_node_distances() {
        let old = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 1.0, 1.0]);
        let new = DMatrix::from_row_slice(2, 2, &[3.0, 4.0, 1.0, 2.0]);

        let check = ConvergenceMonitor::new(1.0).check(&old, &new);

        assert!((check.movement - 6.0).abs() < 1e-12);
        assert!(!check.converged);
    }

    #[test]
    fn threshold_is_strict() {
        let old = DMatrix::from_row_slice(1, 1, &[0.0]);
        let new = DMatrix::from_row_slice(1, 1, &[0.5]);

        assert!(!ConvergenceMonitor::new(0.5).check(&old, &new).converged);
        assert!(ConvergenceMonitor::new(0.5000001).check(&old, &new).converged);
        assert!(!ConvergenceMonitor::new(0.0).check(&old, &old).converged);
    }
}
