use thiserror::Error;

/// Errors surfaced by adjacency construction, configuration checks and simulation.
#[derive(Debug, Error)]
pub enum HoneError {
    #[error("Invalid adjacency matrix: {0}")]
    InvalidAdjacency(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A realization produced a non-finite value and was abandoned.
    #[error("Realization {seed} produced a non-finite {quantity} at step {step}.")]
    NumericDegenerate {
        seed: u64,
        step: usize,
        quantity: &'static str,
    },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, HoneError>;

/// Returns early with `HoneError::$variant` carrying a formatted message.
macro_rules! invalid {
    ($variant:ident, $($arg:tt)*) => {
        return Err($crate::error::HoneError::$variant(format!($($arg)*)))
    };
}

pub(crate) use invalid;
