//! Error types for the IR crate.

use std::fmt;

use thiserror::Error;

use crate::node::{VertexId, WireId};

/// Errors that can occur in IR operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A mutation was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The target vertex cannot be used for this operation.
    #[error("Invalid vertex {vertex}: {reason}")]
    InvalidVertex {
        /// The offending vertex.
        vertex: VertexId,
        /// Why the vertex was rejected.
        reason: &'static str,
    },

    /// A wire lookup on a vertex that does not carry the wire.
    #[error("Wire {wire} is not incident to vertex {vertex}")]
    NotFound {
        /// The queried vertex.
        vertex: VertexId,
        /// The queried wire.
        wire: WireId,
    },

    /// A structural invariant does not hold.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// Precondition failures of mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Wire id outside the range allowed for its position.
    #[error("Wire {wire} out of range (expected {}..{}){}", .valid.start, .valid.end, format_element_context(.element))]
    WireOutOfRange {
        /// The rejected wire.
        wire: WireId,
        /// Range of wire ids accepted in this position.
        valid: std::ops::Range<WireId>,
        /// Optional element name for context.
        element: Option<String>,
    },

    /// The same wire appears twice in one operand list.
    #[error("Duplicate wire {wire} in operation{}", format_element_context(.element))]
    DuplicateWire {
        /// The repeated wire.
        wire: WireId,
        /// Optional element name for context.
        element: Option<String>,
    },

    /// Operand or parameter count does not match what is required.
    #[error("'{element}' requires {expected} {what}, got {got}")]
    ArityMismatch {
        /// Name of the element (or operation) that was being applied.
        element: String,
        /// What was being counted.
        what: &'static str,
        /// Expected count.
        expected: usize,
        /// Count actually provided.
        got: usize,
    },

    /// Input and Output elements are reserved for wire anchors.
    #[error("Element '{0}' is reserved for wire anchors")]
    IoElement(String),

    /// An insertion point does not lie on the wire it was paired with.
    #[error("Vertex {vertex} does not lie on wire {wire}")]
    NotOnWire {
        /// The insertion point.
        vertex: VertexId,
        /// The wire it was paired with.
        wire: WireId,
    },

    /// Splicing a vertex at the requested points would close a cycle.
    #[error("Inserting before vertices {out_vertices:?} would create a cycle")]
    WouldCreateCycle {
        /// The requested insertion points.
        out_vertices: Vec<VertexId>,
    },

    /// A quantum wire was mapped onto a classical wire or vice versa.
    #[error("Wire {from} cannot be mapped to wire {to}: quantum/classical kind differs")]
    WireKindMismatch {
        /// Wire in the source circuit.
        from: WireId,
        /// Wire in the destination circuit.
        to: WireId,
    },

    /// Quantum wires precede classical ones, so no quantum wire can be added
    /// once classical wires exist.
    #[error("Cannot add a qubit to a circuit with {0} classical wires")]
    ClassicalWiresPresent(usize),

    /// A block is entered more than once on a wire.
    #[error("Block is not contiguous on wire {wire}")]
    NotContiguous {
        /// The wire on which the block has a gap.
        wire: WireId,
    },

    /// The first or last vertex of a block is not on the block boundary.
    #[error("Vertex {vertex} is listed {position} but has no {direction} neighbor outside the block")]
    BlockBoundary {
        /// The vertex in question.
        vertex: VertexId,
        /// `"first"` or `"last"`.
        position: &'static str,
        /// `"incoming"` or `"outgoing"`.
        direction: &'static str,
    },
}

/// A violated structural invariant, located as precisely as possible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Integrity violation: {message}{}", format_location(.vertex, .wire))]
pub struct IntegrityError {
    /// Description of the violated invariant, including expected vs found.
    pub message: String,
    /// Vertex at which the violation was detected.
    pub vertex: Option<VertexId>,
    /// Wire on which the violation was detected.
    pub wire: Option<WireId>,
}

impl IntegrityError {
    /// Create an integrity error with no location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            vertex: None,
            wire: None,
        }
    }

    /// Create an integrity error with an expected / found pair.
    pub fn mismatch(what: &str, expected: impl fmt::Debug, found: impl fmt::Debug) -> Self {
        Self::new(format!("{what}: expected {expected:?}, found {found:?}"))
    }

    /// Attach the vertex at which the violation occurred.
    #[must_use]
    pub fn at_vertex(mut self, vertex: VertexId) -> Self {
        self.vertex = Some(vertex);
        self
    }

    /// Attach the wire on which the violation occurred.
    #[must_use]
    pub fn on_wire(mut self, wire: WireId) -> Self {
        self.wire = Some(wire);
        self
    }
}

#[allow(clippy::ref_option)]
fn format_element_context(element: &Option<String>) -> String {
    match element {
        Some(name) => format!(" (element: {name})"),
        None => String::new(),
    }
}

#[allow(clippy::ref_option)]
fn format_location(vertex: &Option<VertexId>, wire: &Option<WireId>) -> String {
    match (vertex, wire) {
        (Some(v), Some(w)) => format!(" (vertex {v}, wire {w})"),
        (Some(v), None) => format!(" (vertex {v})"),
        (None, Some(w)) => format!(" (wire {w})"),
        (None, None) => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
