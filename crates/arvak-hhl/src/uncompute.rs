//! Uncompute and postselect.

use tracing::debug;

use arvak_statevector::{Circuit, StateVector};

use crate::error::SolveResult;

/// Inverse phase estimation followed by postselection of the ancilla on 1.
#[derive(Debug, Clone)]
pub struct UncomputeStage {
    circuit: Circuit,
    ancilla: usize,
}

impl UncomputeStage {
    /// Stage undoing `estimator` and measuring `ancilla`.
    pub fn new(estimator: &Circuit, ancilla: usize) -> Self {
        Self {
            circuit: estimator.inverse(),
            ancilla,
        }
    }

    /// The inverse estimation circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Run the inverse circuit.
    pub fn uncompute(&self, state: &mut StateVector) -> SolveResult<()> {
        state.run(&self.circuit)?;
        Ok(())
    }

    /// Project the ancilla onto 1; returns the success probability.
    ///
    /// A zero-mass outcome leaves the state untouched and returns 0.
    pub fn postselect(&self, state: &mut StateVector) -> SolveResult<f64> {
        let probability = state.measure(self.ancilla, true)?;
        debug!(ancilla = self.ancilla, probability, "postselected ancilla");
        Ok(probability)
    }
}
