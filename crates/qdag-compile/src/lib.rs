//! qdag Pass Framework
//!
//! This crate provides a pass-based pipeline over [`qdag_ir::Circuit`].
//! Passes rewrite the circuit graph in place through the engine's own
//! mutators (`remove_block`, `compact`, ...) and share results through a
//! [`PropertySet`].
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       |
//!       v
//! +-------------+
//! | PassManager | <-- PropertySet (metrics, vertex map, custom data)
//! +-------------+
//!       |
//!       +-- CancelCX / CancelInvolutions
//!       +-- CompactVertices
//!       +-- CircuitAnalysis
//!       +-- IntegrityVerification
//!       |
//!       v
//! Output Circuit
//! ```
//!
//! # Example: Cancelling CNOTs
//!
//! ```rust
//! use qdag_compile::PassManagerBuilder;
//! use qdag_ir::CircuitBuilder;
//!
//! let mut b = CircuitBuilder::new(2, 0);
//! for _ in 0..4 {
//!     b.cx(0, 1).unwrap();
//! }
//! for _ in 0..5 {
//!     b.cx(1, 0).unwrap();
//! }
//! for _ in 0..3 {
//!     b.cx(0, 1).unwrap();
//! }
//! let mut circuit = b.build();
//!
//! let (pm, mut props) = PassManagerBuilder::new().build();
//! pm.run(&mut circuit, &mut props).unwrap();
//!
//! assert_eq!(circuit.count_op_elements(), 2);
//! assert_eq!(props.metrics.unwrap().depth, 2);
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | Analysis only |
//! | 1 | CX cancellation, compaction, analysis, verification |
//! | 2 | + involution cancellation |
//! | 3 | Same as 2 |
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use qdag_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use qdag_ir::{Circuit, Element};
//!
//! struct StripBarriers;
//!
//! impl Pass for StripBarriers {
//!     fn name(&self) -> &str { "strip_barriers" }
//!     fn kind(&self) -> PassKind { PassKind::Transformation }
//!
//!     fn run(&self, circuit: &mut Circuit, _props: &mut PropertySet) -> CompileResult<()> {
//!         let barriers: Vec<_> = circuit
//!             .nodes()
//!             .named_nodes(&[Element::Barrier])
//!             .map(|n| n.id())
//!             .collect();
//!         for v in barriers {
//!             circuit.remove_node(v)?;
//!         }
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use property::{CircuitMetrics, PropertySet};
