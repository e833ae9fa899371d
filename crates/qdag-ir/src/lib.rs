//! qdag circuit intermediate representation
//!
//! This crate provides the graph engine for representing quantum circuits as
//! directed acyclic graphs. It is the foundation the pass framework and the
//! command-line tool build on.
//!
//! # Overview
//!
//! A [`Circuit`] has one wire per qubit and per classical bit. Each wire runs
//! from a reserved Input vertex to a reserved Output vertex; operations sit on
//! the wires in between. Three structures are kept in agreement:
//!
//! - **Node storage**: [`NodeArray`], one column per attribute (element,
//!   parameters, wires, per-wire in- and out-neighbor ports)
//! - **Graph backing**: [`DagBacking`], petgraph adjacency with one edge per
//!   wire segment
//! - **Parameter table**: [`ParamTable`], symbolic parameter to the slots
//!   that hold it
//!
//! # Core Components
//!
//! - **Elements**: [`Element`], a closed set of gate tags, and
//!   [`ParamElement`] pairing a tag with its parameters
//! - **Parameters**: [`Param`] for numeric and symbolic gate parameters
//! - **Circuit**: [`Circuit`] with insertion, removal, composition and
//!   analyses (topological order, longest path, depth)
//! - **Builder**: [`CircuitBuilder`] fluent construction
//! - **Descriptions**: [`CircuitDescription`] JSON/YAML form
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qdag_ir::{Circuit, Element};
//!
//! // 2 qubits (wires 0, 1) and 2 classical bits (wires 2, 3)
//! let mut qc = Circuit::new(2, 2);
//! assert_eq!(qc.to_string(), "circuit {nq=2, ncl=2, nv=8, ne=4}");
//!
//! qc.add_node(Element::H, &[0], &[]).unwrap();
//! qc.add_node(Element::CX, &[0, 1], &[]).unwrap();
//!
//! assert_eq!(qc.count_op_elements(), 2);
//! assert_eq!(qc.depth(), 2);
//! qc.check().unwrap();
//! ```
//!
//! # Example: Graph Surgery
//!
//! ```rust
//! use qdag_ir::{CircuitBuilder, Element};
//!
//! let mut b = CircuitBuilder::new(2, 0);
//! b.cx(0, 1).unwrap().cx(0, 1).unwrap().h(0).unwrap();
//! let mut qc = b.build();
//!
//! // The two CX gates are contiguous on both wires: drop them together.
//! let cxs: Vec<_> = qc.nodes().named_nodes(&[Element::CX]).map(|n| n.id()).collect();
//! qc.remove_block(&cxs, None).unwrap();
//!
//! assert_eq!(qc.count_op_elements(), 1);
//! qc.check().unwrap();
//! ```

pub mod builder;
pub mod circuit;
pub mod dag;
pub mod description;
pub mod element;
pub mod error;
pub mod node;
pub mod param_table;
pub mod parameter;

pub use builder::{CircuitBuilder, GateCall};
pub use circuit::{Circuit, VertexMap};
pub use dag::{DagBacking, NodeIndex, WireEdge};
pub use description::{CircuitDescription, DescriptionError, Format, OpDescription, ParamValue};
pub use element::{Element, ElementKind, ParamElement};
pub use error::{IntegrityError, IrError, IrResult, ValidationError};
pub use node::{NodeArray, NodeRef, Port, VertexId, WireId, WireVertices, unpack_wires};
pub use param_table::{ParamId, ParamSlot, ParamTable};
pub use parameter::Param;
