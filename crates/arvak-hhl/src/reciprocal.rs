//! Reciprocal rotation.
//!
//! For every eigenvalue bin `λ̃` the ancilla is rotated by `Ry(2θ)` with
//! `θ = asin(C / λ̃)`, so that the `|1⟩` branch carries amplitude `C / λ̃`.
//! The zero bin is never rotated.
//!
//! A [`ReciprocalStrategy`] decides which bins get a rotation of their own:
//!
//! - [`ExactReciprocal`]: every nonzero bin, each controlled on the whole
//!   register.
//! - [`LookupReciprocal`]: magnitudes are quantized to a number of
//!   significant bits; every table entry is controlled only on the bits of its
//!   key. With a fixed key width the rotation count is bounded independently
//!   of the register width; the default key spans the whole register and is
//!   exact.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use arvak_statevector::{Circuit, Control, Operation, StandardGate};

use crate::error::SolveResult;
use crate::register::EigenvalueRegister;

/// One conditional rotation: the register pattern it fires on and the
/// register fraction it inverts.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationRule {
    /// Required values of register qubits.
    pub controls: Vec<Control>,
    /// Signed register fraction `λ̃` the rotation is computed for.
    pub value: f64,
}

impl RotationRule {
    /// Half rotation angle `θ = asin(clamp(C / λ̃))`.
    pub fn angle(&self, scale: f64) -> f64 {
        (scale / self.value).clamp(-1.0, 1.0).asin()
    }
}

/// Chooses the set of rotations implementing `λ̃ ↦ C / λ̃`.
///
/// The register is in sign-magnitude form when it is signed: a set sign with
/// stored magnitude 0 stands for the most negative bin.
pub trait ReciprocalStrategy: Send + Sync + fmt::Debug {
    /// Short name for logs and results.
    fn name(&self) -> &'static str;

    /// Rotation rules for `register`, in application order. The patterns of
    /// distinct rules never match the same basis state.
    fn rules(&self, register: &EigenvalueRegister) -> Vec<RotationRule>;
}

/// Controls selecting exactly `magnitude` on the magnitude bits.
fn full_pattern(register: &EigenvalueRegister, magnitude: usize) -> Vec<Control> {
    register
        .magnitude_qubits()
        .iter()
        .enumerate()
        .map(|(bit, &qubit)| Control {
            qubit,
            value: magnitude >> bit & 1 == 1,
        })
        .collect()
}

/// Append the sign control, if any, to `pattern`.
fn with_sign(register: &EigenvalueRegister, mut pattern: Vec<Control>, negative: bool) -> Vec<Control> {
    if let Some(sign) = register.sign_qubit() {
        pattern.push(Control {
            qubit: sign,
            value: negative,
        });
    }
    pattern
}

/// One rotation per nonzero bin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactReciprocal;

impl ReciprocalStrategy for ExactReciprocal {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn rules(&self, register: &EigenvalueRegister) -> Vec<RotationRule> {
        let magnitudes = 1usize << register.magnitude_qubits().len();
        let signs: &[bool] = if register.is_signed() {
            &[false, true]
        } else {
            &[false]
        };
        let mut rules = Vec::new();
        for &negative in signs {
            for magnitude in 0..magnitudes {
                if magnitude == 0 && !negative {
                    continue;
                }
                rules.push(RotationRule {
                    controls: with_sign(register, full_pattern(register, magnitude), negative),
                    value: register.decode_sign_magnitude(negative, magnitude),
                });
            }
        }
        rules
    }
}

/// Quantized magnitude key: leading-one position and the retained prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LookupKey {
    leading: u32,
    prefix: usize,
}

/// A magnitude table entry: which magnitude bits it reads and the magnitude
/// it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
    /// `(bit position, value)` pairs on the magnitude bits.
    pub pattern: Vec<(usize, bool)>,
    /// Represented magnitude, in bins.
    pub magnitude: f64,
}

/// Magnitude table for a fixed register width.
#[derive(Debug, Clone)]
pub struct LookupTable {
    entries: Vec<LookupEntry>,
    index: FxHashMap<LookupKey, usize>,
    pattern_bits: u32,
}

impl LookupTable {
    /// Build the table for magnitudes `1..2^magnitude_bits`, in ascending
    /// magnitude order.
    pub fn build(magnitude_bits: usize, pattern_bits: u32) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
            pattern_bits,
        };
        for magnitude in 1..1usize << magnitude_bits {
            let key = table.key(magnitude);
            if table.index.contains_key(&key) {
                continue;
            }
            let shift = key.leading.saturating_sub(pattern_bits) as usize;
            let leading = key.leading as usize;
            // Bits above the leading one are zero; the key bits are read as-is.
            let pattern = (shift..magnitude_bits)
                .map(|bit| {
                    let value = bit <= leading && magnitude >> bit & 1 == 1;
                    (bit, value)
                })
                .collect();
            let represented = if shift == 0 {
                magnitude as f64
            } else {
                (key.prefix as f64 + 0.5) * (shift as f64).exp2()
            };
            table.index.insert(key, table.entries.len());
            table.entries.push(LookupEntry {
                pattern,
                magnitude: represented,
            });
        }
        table
    }

    fn key(&self, magnitude: usize) -> LookupKey {
        let leading = magnitude.ilog2();
        let shift = leading.saturating_sub(self.pattern_bits);
        LookupKey {
            leading,
            prefix: magnitude >> shift,
        }
    }

    /// Entries in ascending magnitude order.
    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the register has no nonzero magnitude.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry a nonzero magnitude falls into.
    pub fn lookup(&self, magnitude: usize) -> Option<&LookupEntry> {
        if magnitude == 0 {
            return None;
        }
        self.index
            .get(&self.key(magnitude))
            .map(|&i| &self.entries[i])
    }
}

/// Quantized lookup over the magnitude bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupReciprocal {
    pattern_bits: Option<u32>,
}

impl LookupReciprocal {
    /// Keep `pattern_bits` bits after the leading one.
    pub fn new(pattern_bits: u32) -> Self {
        Self {
            pattern_bits: Some(pattern_bits),
        }
    }

    /// Key as wide as the magnitude register: every magnitude is stored
    /// exactly, so precision grows with the register.
    pub fn full_width() -> Self {
        Self { pattern_bits: None }
    }

    /// Configured bits after the leading one; `None` for a full-width key.
    pub fn pattern_bits(&self) -> Option<u32> {
        self.pattern_bits
    }

    /// Bits after the leading one used for a `magnitude_bits`-wide register.
    pub fn effective_pattern_bits(&self, magnitude_bits: usize) -> u32 {
        let full = magnitude_bits.saturating_sub(1) as u32;
        self.pattern_bits.map_or(full, |bits| bits.min(full))
    }
}

impl ReciprocalStrategy for LookupReciprocal {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn rules(&self, register: &EigenvalueRegister) -> Vec<RotationRule> {
        let magnitude_qubits = register.magnitude_qubits();
        let pattern_bits = self.effective_pattern_bits(magnitude_qubits.len());
        let table = LookupTable::build(magnitude_qubits.len(), pattern_bits);
        let resolution = register.resolution();
        let signs: &[bool] = if register.is_signed() {
            &[false, true]
        } else {
            &[false]
        };

        let mut rules = Vec::with_capacity(table.len() * signs.len() + 1);
        for &negative in signs {
            let sign = if negative { -1.0 } else { 1.0 };
            for entry in table.entries() {
                let controls = entry
                    .pattern
                    .iter()
                    .map(|&(bit, value)| Control {
                        qubit: magnitude_qubits[bit],
                        value,
                    })
                    .collect();
                rules.push(RotationRule {
                    controls: with_sign(register, controls, negative),
                    value: sign * entry.magnitude / resolution,
                });
            }
        }
        if register.is_signed() {
            // Stored magnitude 0 under a set sign is the most negative bin.
            rules.push(RotationRule {
                controls: with_sign(register, full_pattern(register, 0), true),
                value: register.decode_sign_magnitude(true, 0),
            });
        }
        debug!(
            entries = table.len(),
            rules = rules.len(),
            pattern_bits,
            "built reciprocal lookup table"
        );
        rules
    }
}

/// The rotation stage: sign-magnitude conversion, conditional rotations,
/// conversion undone.
#[derive(Debug, Clone)]
pub struct ReciprocalRotation {
    circuit: Circuit,
    num_rules: usize,
}

impl ReciprocalRotation {
    /// Build the stage for `register` rotating `ancilla` with scale `C`.
    pub fn build(
        strategy: &dyn ReciprocalStrategy,
        register: &EigenvalueRegister,
        ancilla: usize,
        scale: f64,
        total_qubits: usize,
    ) -> SolveResult<Self> {
        let mut circuit = Circuit::new("reciprocal", total_qubits);
        let conversion = register.sign_magnitude_circuit(total_qubits)?;
        if let Some(conversion) = &conversion {
            circuit.append(conversion)?;
        }

        let rules = strategy.rules(register);
        for rule in &rules {
            let theta = rule.angle(scale);
            circuit.push(
                Operation::gate(StandardGate::Ry(2.0 * theta), [ancilla])
                    .controlled_by(rule.controls.iter().copied())
                    .with_label(format!("1/{:.4}", rule.value)),
            )?;
        }

        if let Some(conversion) = &conversion {
            circuit.append(&conversion.inverse())?;
        }
        debug!(
            strategy = strategy.name(),
            rules = rules.len(),
            scale,
            "built reciprocal rotation"
        );
        Ok(Self {
            circuit,
            num_rules: rules.len(),
        })
    }

    /// The stage circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Number of conditional rotations.
    pub fn num_rules(&self) -> usize {
        self.num_rules
    }
}
