//! Circuit elements.
//!
//! An [`Element`] is a lightweight tag: a closed set of integer-like values
//! naming what sits on a vertex. Parameters are attached separately through
//! [`ParamElement`]; extending the set of elements means adding a variant,
//! never subclassing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parameter::Param;

/// Coarse classification of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// The anchor at the start of a wire.
    Input,
    /// The anchor at the end of a wire.
    Output,
    /// Anything that is not a wire anchor.
    Operation,
}

/// A circuit element tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Element {
    // Wire anchors
    /// Input node of a wire.
    Input,
    /// Output node of a wire.
    Output,

    // One-qubit gates without parameters
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate.
    S,
    /// S-dagger gate.
    SDg,
    /// T gate.
    T,
    /// T-dagger gate.
    TDg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXDg,

    // One-qubit parametric gates
    /// Rotation about X.
    RX,
    /// Rotation about Y.
    RY,
    /// Rotation about Z.
    RZ,
    /// Phase gate.
    P,
    /// Universal one-qubit gate U(θ, φ, λ).
    U,

    // Two-qubit gates
    /// Controlled-X.
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// SWAP.
    Swap,
    /// iSWAP.
    ISwap,
    /// Controlled RX.
    CRX,
    /// Controlled RY.
    CRY,
    /// Controlled RZ.
    CRZ,
    /// Controlled phase.
    CP,
    /// XX rotation.
    RXX,
    /// YY rotation.
    RYY,
    /// ZZ rotation.
    RZZ,

    // Three-qubit gates
    /// Toffoli.
    CCX,
    /// Fredkin.
    CSwap,

    // Non-unitary instructions
    /// Measure one qubit into one classical bit.
    Measure,
    /// Reset a qubit.
    Reset,
    /// Barrier across any number of qubits.
    Barrier,

    /// A user-defined gate of any arity.
    CustomGate,
}

impl Element {
    /// Lower-case name of the element.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Element::Input => "input",
            Element::Output => "output",
            Element::I => "id",
            Element::X => "x",
            Element::Y => "y",
            Element::Z => "z",
            Element::H => "h",
            Element::S => "s",
            Element::SDg => "sdg",
            Element::T => "t",
            Element::TDg => "tdg",
            Element::SX => "sx",
            Element::SXDg => "sxdg",
            Element::RX => "rx",
            Element::RY => "ry",
            Element::RZ => "rz",
            Element::P => "p",
            Element::U => "u",
            Element::CX => "cx",
            Element::CY => "cy",
            Element::CZ => "cz",
            Element::CH => "ch",
            Element::Swap => "swap",
            Element::ISwap => "iswap",
            Element::CRX => "crx",
            Element::CRY => "cry",
            Element::CRZ => "crz",
            Element::CP => "cp",
            Element::RXX => "rxx",
            Element::RYY => "ryy",
            Element::RZZ => "rzz",
            Element::CCX => "ccx",
            Element::CSwap => "cswap",
            Element::Measure => "measure",
            Element::Reset => "reset",
            Element::Barrier => "barrier",
            Element::CustomGate => "custom",
        }
    }

    /// Look an element up by its lower-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_ELEMENTS.iter().copied().find(|e| e.name() == name)
    }

    /// The IO / operation discriminator.
    #[inline]
    pub fn kind(self) -> ElementKind {
        match self {
            Element::Input => ElementKind::Input,
            Element::Output => ElementKind::Output,
            _ => ElementKind::Operation,
        }
    }

    /// Whether this is an Input or Output anchor.
    #[inline]
    pub fn is_io(self) -> bool {
        matches!(self, Element::Input | Element::Output)
    }

    /// Whether this is the user-defined gate tag.
    #[inline]
    pub fn is_custom(self) -> bool {
        self == Element::CustomGate
    }

    /// Number of quantum wires, or `None` if the element takes any number.
    pub fn num_qubits(self) -> Option<usize> {
        match self {
            Element::Input | Element::Output => Some(0),
            Element::I
            | Element::X
            | Element::Y
            | Element::Z
            | Element::H
            | Element::S
            | Element::SDg
            | Element::T
            | Element::TDg
            | Element::SX
            | Element::SXDg
            | Element::RX
            | Element::RY
            | Element::RZ
            | Element::P
            | Element::U
            | Element::Measure
            | Element::Reset => Some(1),
            Element::CX
            | Element::CY
            | Element::CZ
            | Element::CH
            | Element::Swap
            | Element::ISwap
            | Element::CRX
            | Element::CRY
            | Element::CRZ
            | Element::CP
            | Element::RXX
            | Element::RYY
            | Element::RZZ => Some(2),
            Element::CCX | Element::CSwap => Some(3),
            Element::Barrier | Element::CustomGate => None,
        }
    }

    /// Number of classical wires, or `None` if the element takes any number.
    pub fn num_clbits(self) -> Option<usize> {
        match self {
            Element::Measure => Some(1),
            Element::CustomGate => None,
            _ => Some(0),
        }
    }

    /// Number of parameters, or `None` if the element takes any number.
    pub fn num_params(self) -> Option<usize> {
        match self {
            Element::RX
            | Element::RY
            | Element::RZ
            | Element::P
            | Element::CRX
            | Element::CRY
            | Element::CRZ
            | Element::CP
            | Element::RXX
            | Element::RYY
            | Element::RZZ => Some(1),
            Element::U => Some(3),
            Element::CustomGate => None,
            _ => Some(0),
        }
    }

    /// Whether applying the element twice in a row is the identity.
    pub fn is_involution(self) -> bool {
        matches!(
            self,
            Element::I
                | Element::X
                | Element::Y
                | Element::Z
                | Element::H
                | Element::CX
                | Element::CY
                | Element::CZ
                | Element::CH
                | Element::Swap
                | Element::CCX
                | Element::CSwap
        )
    }
}

const ALL_ELEMENTS: &[Element] = &[
    Element::Input,
    Element::Output,
    Element::I,
    Element::X,
    Element::Y,
    Element::Z,
    Element::H,
    Element::S,
    Element::SDg,
    Element::T,
    Element::TDg,
    Element::SX,
    Element::SXDg,
    Element::RX,
    Element::RY,
    Element::RZ,
    Element::P,
    Element::U,
    Element::CX,
    Element::CY,
    Element::CZ,
    Element::CH,
    Element::Swap,
    Element::ISwap,
    Element::CRX,
    Element::CRY,
    Element::CRZ,
    Element::CP,
    Element::RXX,
    Element::RYY,
    Element::RZZ,
    Element::CCX,
    Element::CSwap,
    Element::Measure,
    Element::Reset,
    Element::Barrier,
    Element::CustomGate,
];

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An element together with its (optional) parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamElement {
    /// The element tag.
    pub element: Element,
    /// Parameters, if the element carries any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Param>>,
}

impl ParamElement {
    /// Create a parametrized element.
    pub fn new(element: Element, params: impl IntoIterator<Item = impl Into<Param>>) -> Self {
        Self {
            element,
            params: Some(params.into_iter().map(Into::into).collect()),
        }
    }

    /// The parameters, empty if there are none.
    pub fn params(&self) -> &[Param] {
        self.params.as_deref().unwrap_or(&[])
    }

    /// Approximate equality: equal tags, and parameters pairwise equal up to
    /// whole turns within `tol`.
    pub fn approx_eq_turn(&self, other: &ParamElement, tol: f64) -> bool {
        self.element == other.element
            && self.params().len() == other.params().len()
            && self
                .params()
                .iter()
                .zip(other.params())
                .all(|(a, b)| a.approx_eq_turn(b, tol))
    }
}

impl From<Element> for ParamElement {
    fn from(element: Element) -> Self {
        Self {
            element,
            params: None,
        }
    }
}

impl From<(Element, Param)> for ParamElement {
    fn from((element, param): (Element, Param)) -> Self {
        Self::new(element, [param])
    }
}

impl From<(Element, f64)> for ParamElement {
    fn from((element, value): (Element, f64)) -> Self {
        Self::new(element, [value])
    }
}

impl From<(Element, Vec<Param>)> for ParamElement {
    fn from((element, params): (Element, Vec<Param>)) -> Self {
        Self {
            element,
            params: Some(params),
        }
    }
}

impl fmt::Display for ParamElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element)?;
        if let Some(params) = &self.params {
            f.write_str("(")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{p}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
