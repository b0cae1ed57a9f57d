//! Trotter-Suzuki product formulas.
//!
//! Approximates `exp(-i H t)` by splitting the evolution into `n_steps`
//! slices, each evolved exactly under each term in sequence.
//!
//! # First-order Trotter (Lie-Trotter)
//!
//!   exp(-i H t) ≈ [∏_k exp(-i c_k P_k t/n)]^n
//!
//! Error: O(t² / n).
//!
//! # Suzuki recursion
//!
//!   S₁(τ) = [∏_k exp(-i c_k P_k τ/2)] · [∏_{k reversed} exp(-i c_k P_k τ/2)]
//!   S_m(τ) = S_{m-1}(p_m τ)² · S_{m-1}((1 − 4p_m) τ) · S_{m-1}(p_m τ)²
//!   p_m = 1 / (4 − 4^{1/(2m−1)})
//!
//! Order 1 is the symmetric second-order formula (error O(t³/n²)); order m
//! has error O(t^{2m+1}/n^{2m}).

use tracing::debug;

use arvak_statevector::Unitary;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::Hamiltonian;
use crate::synthesis::{Evolution, exp_pauli, pauli_rotation_cost};

/// Trotter product-formula time-evolution builder.
pub struct TrotterEvolution {
    hamiltonian: Hamiltonian,
    /// Total evolution time t.
    t: f64,
    /// Number of Trotter steps (repetitions).
    n_steps: usize,
}

impl TrotterEvolution {
    /// Construct a new product-formula builder.
    ///
    /// # Arguments
    /// * `hamiltonian`: the Hamiltonian H = Σ c_k P_k
    /// * `t`: total evolution time
    /// * `n_steps`: number of Trotter slices (higher → more accurate)
    pub fn new(hamiltonian: Hamiltonian, t: f64, n_steps: usize) -> Self {
        Self {
            hamiltonian,
            t,
            n_steps,
        }
    }

    /// Override the register width (e.g. when H acts on a subset of qubits).
    #[must_use]
    pub fn with_n_qubits(mut self, n: u32) -> Self {
        self.hamiltonian = self.hamiltonian.with_n_qubits(n);
        self
    }

    /// Build the first-order (Lie-Trotter) operator.
    ///
    /// Each Trotter slice applies every term once with time step `t / n_steps`.
    pub fn first_order(&self) -> SimResult<Evolution> {
        self.validate()?;
        let step_t = self.t / self.n_steps as f64;
        debug!(
            n_terms = self.hamiltonian.n_terms(),
            n_steps = self.n_steps,
            n_qubits = self.hamiltonian.n_qubits(),
            "building first-order Trotter operator"
        );

        let (slice, cost) = self.sweep(step_t, false, None)?;
        Ok(self.repeat(slice, cost))
    }

    /// Build the symmetric second-order operator (Suzuki order 1).
    pub fn second_order(&self) -> SimResult<Evolution> {
        self.suzuki(1)
    }

    /// Build the Suzuki product formula of the given recursion order.
    pub fn suzuki(&self, order: u32) -> SimResult<Evolution> {
        self.validate()?;
        if order == 0 {
            return Err(SimError::InvalidOrder(order));
        }
        let step_t = self.t / self.n_steps as f64;
        debug!(
            n_terms = self.hamiltonian.n_terms(),
            n_steps = self.n_steps,
            order,
            n_qubits = self.hamiltonian.n_qubits(),
            "building Suzuki product-formula operator"
        );

        let (slice, cost) = self.suzuki_slice(step_t, order)?;
        Ok(self.repeat(slice, cost))
    }

    /// Elementary operations in one Suzuki slice of the given order.
    pub fn suzuki_slice_cost(&self, order: u32) -> u64 {
        let sweep = self
            .hamiltonian
            .terms()
            .iter()
            .map(pauli_rotation_cost)
            .fold(0u64, u64::saturating_add);
        // S₁ is two sweeps; each recursion level repeats the lower slice 5×.
        sweep
            .saturating_mul(2)
            .saturating_mul(5u64.saturating_pow(order.saturating_sub(1)))
    }

    fn suzuki_slice(&self, tau: f64, order: u32) -> SimResult<(Unitary, u64)> {
        if order == 1 {
            let (forward, c1) = self.sweep(tau / 2.0, false, None)?;
            return self.sweep(tau / 2.0, true, Some((forward, c1)));
        }
        let p = 1.0 / (4.0 - 4f64.powf(1.0 / (2.0 * f64::from(order) - 1.0)));
        let (outer, outer_cost) = self.suzuki_slice(p * tau, order - 1)?;
        let (middle, middle_cost) = self.suzuki_slice((1.0 - 4.0 * p) * tau, order - 1)?;
        let outer_twice = outer.squared();
        let slice = outer_twice.then(&middle)?.then(&outer_twice)?;
        Ok((
            slice,
            outer_cost.saturating_mul(4).saturating_add(middle_cost),
        ))
    }

    /// Apply every term once for time `tau`, forward or reversed, after an
    /// optional prefix operator.
    fn sweep(
        &self,
        tau: f64,
        reversed: bool,
        prefix: Option<(Unitary, u64)>,
    ) -> SimResult<(Unitary, u64)> {
        let n_qubits = self.hamiltonian.n_qubits();
        let (mut acc, mut cost) =
            prefix.unwrap_or_else(|| (Unitary::identity(n_qubits as usize), 0));
        let terms = self.hamiltonian.terms();
        let ordered: Box<dyn Iterator<Item = _>> = if reversed {
            Box::new(terms.iter().rev())
        } else {
            Box::new(terms.iter())
        };
        for term in ordered {
            acc = acc.then(&exp_pauli(term, tau, n_qubits)?)?;
            cost = cost.saturating_add(pauli_rotation_cost(term));
        }
        Ok((acc, cost))
    }

    fn repeat(&self, slice: Unitary, cost: u64) -> Evolution {
        Evolution {
            unitary: slice.pow(self.n_steps as u64),
            cost: cost.saturating_mul(self.n_steps as u64),
        }
    }

    fn validate(&self) -> SimResult<()> {
        if self.hamiltonian.n_terms() == 0 {
            return Err(SimError::EmptyHamiltonian);
        }
        if self.n_steps == 0 {
            return Err(SimError::InvalidSteps(0));
        }
        Ok(())
    }
}
