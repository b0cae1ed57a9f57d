//! Quantum Fourier transform over a sub-register.

use std::f64::consts::PI;

use arvak_statevector::{Circuit, EngineResult};

/// Forward QFT on `qubits` (least significant first) inside a
/// `total_qubits`-wide circuit.
///
/// Maps `|x⟩ → 2^{-k/2} Σ_y e^{2πi·xy/2^k} |y⟩`: Hadamard plus controlled
/// phases from the most significant qubit down, then a bit-reversal swap
/// network.
pub fn qft(qubits: &[usize], total_qubits: usize) -> EngineResult<Circuit> {
    let k = qubits.len();
    let mut circuit = Circuit::new("qft", total_qubits);
    for j in (0..k).rev() {
        circuit.h(qubits[j])?;
        for i in (0..j).rev() {
            let angle = PI / f64::from(1u32 << (j - i));
            circuit.cp(angle, qubits[i], qubits[j])?;
        }
    }
    for i in 0..k / 2 {
        circuit.swap(qubits[i], qubits[k - 1 - i])?;
    }
    Ok(circuit)
}
