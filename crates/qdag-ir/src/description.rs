//! Serializable circuit descriptions.
//!
//! A [`CircuitDescription`] is the flat, human-editable form of a circuit:
//! wire counts, global phase and an ordered list of operations. It reads and
//! writes JSON and YAML.
//!
//! ```yaml
//! num_qubits: 2
//! num_clbits: 2
//! ops:
//!   - { gate: h, wires: [0] }
//!   - { gate: cx, wires: [0, 1] }
//!   - { gate: rz, wires: [1], params: [theta] }
//!   - { gate: measure, wires: [1], clbits: [1] }
//! ```
//!
//! Classical operands are given as classical bit indices (`0..num_clbits`),
//! not absolute wire ids.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::circuit::Circuit;
use crate::element::{Element, ParamElement};
use crate::error::IrError;
use crate::node::WireId;
use crate::parameter::Param;

/// Errors raised while reading or converting a description.
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A gate name that names no element.
    #[error("Unknown gate '{name}' in operation {index}")]
    UnknownGate {
        /// The unrecognized name.
        name: String,
        /// Position of the operation in the list.
        index: usize,
    },

    /// A classical bit index beyond `num_clbits`.
    #[error("Classical bit {clbit} out of range (num_clbits = {num_clbits}) in operation {index}")]
    ClbitOutOfRange {
        /// The offending index.
        clbit: usize,
        /// Number of classical bits declared.
        num_clbits: usize,
        /// Position of the operation in the list.
        index: usize,
    },

    /// The circuit rejected an operation.
    #[error("Operation {index}: {source}")]
    Circuit {
        /// Position of the operation in the list.
        index: usize,
        /// The underlying error.
        #[source]
        source: IrError,
    },
}

/// On-disk format of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl Format {
    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

/// A parameter as written in a description: a number, a symbol name, or a
/// full expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A numeric value.
    Number(f64),
    /// A bare symbol.
    Symbol(String),
    /// Any other expression.
    Expr(Param),
}

impl From<ParamValue> for Param {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Number(v) => Param::Value(v),
            ParamValue::Symbol(s) => Param::Symbol(s),
            ParamValue::Expr(p) => p,
        }
    }
}

impl From<&Param> for ParamValue {
    fn from(param: &Param) -> Self {
        match param {
            Param::Value(v) => ParamValue::Number(*v),
            Param::Symbol(s) => ParamValue::Symbol(s.clone()),
            other => ParamValue::Expr(other.clone()),
        }
    }
}

/// One operation in a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpDescription {
    /// Element name, e.g. `"cx"`.
    pub gate: String,
    /// Quantum wires.
    #[serde(default)]
    pub wires: Vec<WireId>,
    /// Classical bit indices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clbits: Vec<usize>,
    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamValue>,
}

/// A whole circuit in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDescription {
    /// Number of quantum wires.
    pub num_qubits: usize,
    /// Number of classical wires.
    #[serde(default)]
    pub num_clbits: usize,
    /// Global phase.
    #[serde(default)]
    pub global_phase: f64,
    /// Operations in application order.
    #[serde(default)]
    pub ops: Vec<OpDescription>,
}

impl CircuitDescription {
    /// Parse a description.
    pub fn parse(contents: &str, format: Format) -> Result<Self, DescriptionError> {
        Ok(match format {
            Format::Json => serde_json::from_str(contents)?,
            Format::Yaml => serde_yaml_ng::from_str(contents)?,
        })
    }

    /// Render the description.
    pub fn render(&self, format: Format) -> Result<String, DescriptionError> {
        Ok(match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Yaml => serde_yaml_ng::to_string(self)?,
        })
    }

    /// Build the circuit this description denotes.
    pub fn to_circuit(&self) -> Result<Circuit, DescriptionError> {
        let mut circuit =
            Circuit::with_global_phase(self.num_qubits, self.num_clbits, self.global_phase);
        for (index, op) in self.ops.iter().enumerate() {
            let element =
                Element::from_name(&op.gate).ok_or_else(|| DescriptionError::UnknownGate {
                    name: op.gate.clone(),
                    index,
                })?;
            let op_element = if op.params.is_empty() {
                ParamElement::from(element)
            } else {
                ParamElement::new(element, op.params.iter().cloned().map(Param::from))
            };
            let clwires = op
                .clbits
                .iter()
                .map(|&clbit| {
                    if clbit < self.num_clbits {
                        Ok(self.num_qubits + clbit)
                    } else {
                        Err(DescriptionError::ClbitOutOfRange {
                            clbit,
                            num_clbits: self.num_clbits,
                            index,
                        })
                    }
                })
                .collect::<Result<Vec<WireId>, _>>()?;
            circuit
                .add_node(op_element, &op.wires, &clwires)
                .map_err(|source| DescriptionError::Circuit { index, source })?;
        }
        Ok(circuit)
    }

    /// Describe `circuit`, listing operations in topological order.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let nq = circuit.num_qubits();
        let ops = circuit
            .topological_nodes()
            .filter(|node| !node.is_io())
            .map(|node| OpDescription {
                gate: node.element().name().to_string(),
                wires: node.quantum_wires().to_vec(),
                clbits: node.classical_wires().iter().map(|w| w - nq).collect(),
                params: node.params().iter().map(ParamValue::from).collect(),
            })
            .collect();
        Self {
            num_qubits: nq,
            num_clbits: circuit.num_clbits(),
            global_phase: circuit.global_phase(),
            ops,
        }
    }
}
