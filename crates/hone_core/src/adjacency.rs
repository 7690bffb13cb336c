//! Weighted network adjacency shared read-only by every realization.
//!
//! The dense matrix is the canonical form. A compressed sparse row view of the
//! positive weights is built once at construction so that interaction sums only
//! visit actual neighbours; dropping zero-weight terms leaves every sum unchanged.

use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::error::{invalid, Result};

#[derive(Debug, Clone)]
pub struct AdjacencyMatrix {
    dense: DMatrix<f64>,
    neighbors: CsrMatrix<f64>,
}

impl AdjacencyMatrix {
    /// Validates a dense N×N weight matrix and wraps it.
    ///
    /// The matrix must be square, non-empty, finite, non-negative, symmetric
    /// and have a zero diagonal.
    pub fn from_dense(dense: DMatrix<f64>) -> Result<Self> {
        let (rows, cols) = dense.shape();
        if rows != cols {
            invalid!(InvalidAdjacency, "Matrix must be square, got {}x{}.", rows, cols);
        }
        if rows == 0 {
            invalid!(InvalidAdjacency, "Matrix must describe at least one node.");
        }

        for i in 0..rows {
            for j in 0..cols {
                let w = dense[(i, j)];
                if !w.is_finite() {
                    invalid!(InvalidAdjacency, "Entry ({}, {}) is not finite.", i, j);
                }
                if w < 0.0 {
                    invalid!(InvalidAdjacency, "Entry ({}, {}) is negative ({}).", i, j, w);
                }
                if i == j && w != 0.0 {
                    invalid!(InvalidAdjacency, "Diagonal entry ({}, {}) must be zero.", i, j);
                }
                if j > i && w != dense[(j, i)] {
                    invalid!(
                        InvalidAdjacency,
                        "Matrix must be symmetric, but ({}, {}) = {} and ({}, {}) = {}.",
                        i,
                        j,
                        w,
                        j,
                        i,
                        dense[(j, i)]
                    );
                }
            }
        }

        let neighbors = positive_entries(&dense);
        Ok(Self { dense, neighbors })
    }

    /// Builds the adjacency of an undirected weighted graph on `node_count` nodes.
    /// A repeated edge keeps the weight it was given last.
    pub fn from_weighted_edges(node_count: usize, edges: &[(usize, usize, f64)]) -> Result<Self> {
        let mut dense = DMatrix::zeros(node_count, node_count);
        for &(i, j, w) in edges {
            if i >= node_count || j >= node_count {
                invalid!(
                    InvalidAdjacency,
                    "Edge ({}, {}) references a node outside 0..{}.",
                    i,
                    j,
                    node_count
                );
            }
            if i == j {
                invalid!(InvalidAdjacency, "Self-loop on node {} is not allowed.", i);
            }
            dense[(i, j)] = w;
            dense[(j, i)] = w;
        }
        Self::from_dense(dense)
    }

    /// Builds the adjacency of an unweighted graph: every edge has weight 1.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let weighted: Vec<(usize, usize, f64)> = edges.iter().map(|&(i, j)| (i, j, 1.0)).collect();
        Self::from_weighted_edges(node_count, &weighted)
    }

    /// Copy of this adjacency with every positive weight coerced to 1.
    pub fn binarized(&self) -> Self {
        let dense = self.dense.map(|w| if w > 0.0 { 1.0 } else { 0.0 });
        let neighbors = positive_entries(&dense);
        Self { dense, neighbors }
    }

    pub fn node_count(&self) -> usize {
        self.dense.nrows()
    }

    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.dense[(i, j)]
    }

    /// Positive-weight neighbours of node `i` as `(column, weight)` in ascending column order.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let offsets = self.neighbors.row_offsets();
        let range = offsets[i]..offsets[i + 1];
        self.neighbors.col_indices()[range.clone()]
            .iter()
            .copied()
            .zip(self.neighbors.values()[range].iter().copied())
    }

    /// Number of undirected edges with positive weight.
    pub fn edge_count(&self) -> usize {
        self.neighbors.nnz() / 2
    }

    pub fn as_dense(&self) -> &DMatrix<f64> {
        &self.dense
    }
}

fn positive_entries(dense: &DMatrix<f64>) -> CsrMatrix<f64> {
    let (rows, cols) = dense.shape();
    let mut coo = CooMatrix::new(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            let w = dense[(i, j)];
            if w > 0.0 {
                coo.push(i, j, w);
            }
        }
    }
    CsrMatrix::from(&coo)
}
