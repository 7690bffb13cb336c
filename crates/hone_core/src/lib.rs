pub mod adjacency;
pub mod config;
pub mod convergence;
pub mod energy;
pub mod ensemble;
pub mod error;
pub mod force;
pub mod integrator;
pub mod phase;
pub mod realization;
pub mod state;
/// The `hone_core` crate embeds a weighted network in a low-dimensional space by
/// simulating damped harmonic oscillators coupled through the adjacency, with a damped
/// Kuramoto phase attached to every node. Many independently seeded realizations run
/// concurrently and their histories are gathered per seed.
///
/// Key components:
/// - **Traits**: `InteractionField` (pairwise laws over all nodes), `Steppable` (fixed-step schemes).
/// - **Engines**: `ForceEngine` (spatial pull) and `PhaseCoupling` (Kuramoto sine coupling).
/// - **Integrator**: damped semi-implicit Euler steppers for positions and phases.
/// - **Realization**: seeded runner with energy bookkeeping and early stopping.
/// - **Ensemble**: worker-pool fan-out with seed-ordered results.
pub mod traits;

pub use adjacency::AdjacencyMatrix;
pub use config::EnsembleConfig;
pub use ensemble::{run_ensemble, EnsembleResult, RealizationView};
pub use error::{HoneError, Result};
pub use realization::{run_realization, RealizationHistory, RealizationRunner, Termination};
