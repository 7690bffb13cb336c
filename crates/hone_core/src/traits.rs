/// A pairwise interaction law evaluated for every node of a network.
pub trait InteractionField {
    /// Node-indexed quantity the law acts on (positions or phases).
    type State;

    /// Returns the number of nodes the field couples.
    fn node_count(&self) -> usize;

    /// Evaluates the interaction term of every node.
    /// state: current node state
    /// out: buffer to write the per-node term, same shape as `state`
    fn apply(&self, state: &Self::State, out: &mut Self::State);
}

/// A fixed-step scheme that advances some state under an interaction field.
pub trait Steppable<F: InteractionField> {
    type State;

    /// Performs one step of size dt.
    /// field: interaction law evaluated on the pre-step state
    /// state: current state (updated after step)
    /// dt: step size
    fn step(&mut self, field: &F, state: &mut Self::State, dt: f64);
}
