//! Solver configuration.
//!
//! [`SolverConfig`] is the serde-facing bundle: every field has a default, so
//! a YAML or JSON document only needs the options it changes.
//! [`SolverConfig::validate`] checks ranges and resolves the string-valued
//! options into a [`ResolvedConfig`] once, before any solve starts.
//!
//! ```yaml
//! expansion_mode: suzuki
//! expansion_order: 2
//! num_time_slices: 50
//! num_ancillae: 3
//! negative_evals: false
//! scale: auto
//! reciprocal_strategy: lookup
//! ```

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{HhlError, SolveResult};
use crate::reciprocal::{ExactReciprocal, LookupReciprocal, ReciprocalStrategy};

/// How `exp(-iAt)` is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionMode {
    /// Diagonalise A.
    Exact,
    /// First-order Lie-Trotter product formula.
    Trotter,
    /// Suzuki recursive product formula of `expansion_order`.
    #[default]
    Suzuki,
}

impl fmt::Display for ExpansionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Trotter => write!(f, "trotter"),
            Self::Suzuki => write!(f, "suzuki"),
        }
    }
}

/// Which reciprocal-rotation strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReciprocalKind {
    /// One rotation per eigenvalue bin.
    Exact,
    /// Quantized lookup table.
    #[default]
    Lookup,
}

impl fmt::Display for ReciprocalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Lookup => write!(f, "lookup"),
        }
    }
}

/// Scale constant C of the reciprocal rotation, in register-fraction units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Scale {
    /// `2^-k`: the smallest nonzero magnitude the register can hold.
    ///
    /// This is not the smallest decoded eigenvalue magnitude. It is known
    /// before A's spectrum is, and `C/λ̃ ≤ 1` holds on every nonzero bin,
    /// including bins populated only by phase-estimation leakage, so no
    /// rotation angle is clamped. A spectrum whose smallest eigenvalue sits
    /// well above the first bin gets a lower success probability than the
    /// decoded minimum would give; pass [`Scale::Fixed`] to raise it.
    #[default]
    Auto,
    /// A fixed value in (0, 1].
    Fixed(f64),
}

impl Scale {
    /// The concrete constant for a `num_ancillae`-bit register.
    pub fn value(self, num_ancillae: usize) -> f64 {
        match self {
            Self::Auto => (-(num_ancillae as f64)).exp2(),
            Self::Fixed(c) => c,
        }
    }
}

impl Serialize for Scale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Fixed(c) => serializer.serialize_f64(*c),
        }
    }
}

impl<'de> Deserialize<'de> for Scale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Value(f64),
            Name(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Value(c) => Ok(Self::Fixed(c)),
            Raw::Name(name) if name.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            Raw::Name(name) => Err(de::Error::custom(format!(
                "scale must be \"auto\" or a number, got \"{name}\""
            ))),
        }
    }
}

/// Solver options as read from a file or built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Construction of the evolution operator.
    #[serde(default)]
    pub expansion_mode: ExpansionMode,

    /// Suzuki recursion order (ignored by `exact` and `trotter`).
    #[serde(default = "default_expansion_order")]
    pub expansion_order: u32,

    /// Product-formula slices.
    #[serde(default = "default_num_time_slices")]
    pub num_time_slices: usize,

    /// Eigenvalue register width k.
    #[serde(default = "default_num_ancillae")]
    pub num_ancillae: usize,

    /// Treat the top eigenvalue bit as a sign bit.
    #[serde(default)]
    pub negative_evals: bool,

    /// Reciprocal scale constant.
    #[serde(default)]
    pub scale: Scale,

    /// Reciprocal rotation strategy.
    #[serde(default)]
    pub reciprocal_strategy: ReciprocalKind,

    /// Significant bits kept after the leading one by the lookup strategy.
    /// Absent means the key spans the whole magnitude register.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_pattern_bits: Option<u32>,

    /// Fixed evolution time; derived from the spectrum when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evo_time: Option<f64>,

    /// Register ceiling checked before allocation.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,

    /// Entry-wise tolerance of the Hermitian test.
    #[serde(default = "default_hermitian_tolerance")]
    pub hermitian_tolerance: f64,

    /// Postselection mass below which the run aborts.
    #[serde(default = "default_min_success_probability")]
    pub min_success_probability: f64,
}

fn default_expansion_order() -> u32 {
    2
}

fn default_num_time_slices() -> usize {
    50
}

fn default_num_ancillae() -> usize {
    3
}

fn default_max_qubits() -> usize {
    24
}

fn default_hermitian_tolerance() -> f64 {
    1e-9
}

fn default_min_success_probability() -> f64 {
    1e-12
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            expansion_mode: ExpansionMode::default(),
            expansion_order: default_expansion_order(),
            num_time_slices: default_num_time_slices(),
            num_ancillae: default_num_ancillae(),
            negative_evals: false,
            scale: Scale::default(),
            reciprocal_strategy: ReciprocalKind::default(),
            lookup_pattern_bits: None,
            evo_time: None,
            max_qubits: default_max_qubits(),
            hermitian_tolerance: default_hermitian_tolerance(),
            min_success_probability: default_min_success_probability(),
        }
    }
}

impl SolverConfig {
    /// Parse a YAML document.
    pub fn from_yaml(contents: &str) -> SolveResult<Self> {
        serde_yaml_ng::from_str(contents)
            .map_err(|e| HhlError::InvalidConfig(format!("YAML: {e}")))
    }

    /// Parse a JSON document.
    pub fn from_json(contents: &str) -> SolveResult<Self> {
        serde_json::from_str(contents).map_err(|e| HhlError::InvalidConfig(format!("JSON: {e}")))
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SolveResult<Self> {
        let path = path.as_ref();
        let io_err = |message: String| HhlError::ConfigIo {
            path: path.to_path_buf(),
            message,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(e.to_string()))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&contents).map_err(|e| io_err(e.to_string()))?,
            Some("yaml" | "yml") => {
                serde_yaml_ng::from_str(&contents).map_err(|e| io_err(e.to_string()))?
            }
            other => {
                return Err(io_err(format!(
                    "unsupported extension {other:?}; expected json, yaml or yml"
                )));
            }
        };
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> SolveResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| HhlError::InvalidConfig(e.to_string()))
    }

    /// Check ranges and resolve the named options.
    pub fn validate(&self) -> SolveResult<ResolvedConfig> {
        if self.num_ancillae == 0 {
            return Err(HhlError::InvalidConfig(
                "num_ancillae must be at least 1".to_string(),
            ));
        }
        if self.negative_evals && self.num_ancillae < 2 {
            return Err(HhlError::InvalidConfig(
                "negative_evals needs num_ancillae >= 2 (one sign bit plus magnitude)".to_string(),
            ));
        }
        if self.num_time_slices == 0 {
            return Err(HhlError::InvalidConfig(
                "num_time_slices must be at least 1".to_string(),
            ));
        }
        if self.expansion_order == 0 {
            return Err(HhlError::InvalidConfig(
                "expansion_order must be at least 1".to_string(),
            ));
        }
        if self.lookup_pattern_bits == Some(0) {
            return Err(HhlError::InvalidConfig(
                "lookup_pattern_bits must be at least 1".to_string(),
            ));
        }
        if let Scale::Fixed(c) = self.scale {
            if !(c > 0.0 && c <= 1.0) {
                return Err(HhlError::InvalidConfig(format!(
                    "scale must be in (0, 1], got {c}"
                )));
            }
        }
        if let Some(t) = self.evo_time {
            if !(t.is_finite() && t > 0.0) {
                return Err(HhlError::InvalidConfig(format!(
                    "evo_time must be positive and finite, got {t}"
                )));
            }
        }
        if !(self.hermitian_tolerance >= 0.0) {
            return Err(HhlError::InvalidConfig(format!(
                "hermitian_tolerance must be non-negative, got {}",
                self.hermitian_tolerance
            )));
        }
        if !(0.0..1.0).contains(&self.min_success_probability) {
            return Err(HhlError::InvalidConfig(format!(
                "min_success_probability must be in [0, 1), got {}",
                self.min_success_probability
            )));
        }

        let expansion = match self.expansion_mode {
            ExpansionMode::Exact => Expansion::Exact,
            ExpansionMode::Trotter => Expansion::Trotter {
                slices: self.num_time_slices,
            },
            ExpansionMode::Suzuki => Expansion::Suzuki {
                order: self.expansion_order,
                slices: self.num_time_slices,
            },
        };
        let reciprocal: Box<dyn ReciprocalStrategy> = match self.reciprocal_strategy {
            ReciprocalKind::Exact => Box::new(ExactReciprocal),
            ReciprocalKind::Lookup => Box::new(
                self.lookup_pattern_bits
                    .map_or_else(LookupReciprocal::full_width, LookupReciprocal::new),
            ),
        };

        Ok(ResolvedConfig {
            expansion,
            num_ancillae: self.num_ancillae,
            negative_evals: self.negative_evals,
            scale: self.scale,
            reciprocal,
            evo_time: self.evo_time,
            max_qubits: self.max_qubits,
            hermitian_tolerance: self.hermitian_tolerance,
            min_success_probability: self.min_success_probability,
        })
    }
}

/// Evolution construction with its parameters attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Diagonalisation.
    Exact,
    /// First-order product formula.
    Trotter {
        /// Product-formula slices.
        slices: usize,
    },
    /// Suzuki recursion.
    Suzuki {
        /// Recursion order (1 = symmetric second order).
        order: u32,
        /// Product-formula slices.
        slices: usize,
    },
}

/// A validated configuration with every named option resolved.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Evolution construction.
    pub expansion: Expansion,
    /// Eigenvalue register width k.
    pub num_ancillae: usize,
    /// Two's-complement eigenvalue register.
    pub negative_evals: bool,
    /// Reciprocal scale constant.
    pub scale: Scale,
    /// Reciprocal rotation strategy.
    pub reciprocal: Box<dyn ReciprocalStrategy>,
    /// Fixed evolution time, if configured.
    pub evo_time: Option<f64>,
    /// Register ceiling.
    pub max_qubits: usize,
    /// Hermitian test tolerance.
    pub hermitian_tolerance: f64,
    /// Abort threshold on the postselection mass.
    pub min_success_probability: f64,
}
