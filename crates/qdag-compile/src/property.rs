//! `PropertySet` and related types for pass communication.
//!
//! Passes share results through a [`PropertySet`]: analysis passes record
//! [`CircuitMetrics`], compaction records the [`VertexMap`] it produced, and
//! the manager notes the last transformation that ran. Arbitrary typed
//! values can be stored alongside.
//!
//! # Custom properties for pass communication
//!
//! ```
//! use qdag_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct RewriteBudget(usize);
//!
//! let mut props = PropertySet::new();
//! props.insert(RewriteBudget(15));
//!
//! assert_eq!(props.get::<RewriteBudget>(), Some(&RewriteBudget(15)));
//! ```

use std::any::{Any, TypeId};
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use qdag_ir::{Circuit, Element, VertexMap};

/// Summary statistics of a circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitMetrics {
    /// Number of quantum wires.
    pub num_qubits: usize,
    /// Number of classical wires.
    pub num_clbits: usize,
    /// Live vertices, IO anchors included.
    pub num_vertices: usize,
    /// Wire segments.
    pub num_edges: usize,
    /// Operation vertices.
    pub num_ops: usize,
    /// Operations on the longest path.
    pub depth: usize,
    /// Connected groups of wires.
    pub num_tensor_factors: usize,
    /// Distinct symbolic parameters.
    pub num_parameters: usize,
    /// Operation count per element.
    pub count_ops: BTreeMap<Element, usize>,
    /// Operation count per element along the longest path.
    pub count_ops_longest_path: BTreeMap<Element, usize>,
}

impl CircuitMetrics {
    /// Measure `circuit`.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            num_vertices: circuit.num_vertices(),
            num_edges: circuit.num_edges(),
            num_ops: circuit.count_op_elements(),
            depth: circuit.depth(),
            num_tensor_factors: circuit.num_tensor_factors(),
            num_parameters: circuit.num_parameters(),
            count_ops: circuit.count_ops(),
            count_ops_longest_path: circuit.count_ops_longest_path(),
        }
    }
}

/// Shared state passed through all compilation passes.
///
/// # Standard Properties
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `metrics` | [`CircuitMetrics`] | Latest circuit statistics |
/// | `vertex_map` | [`VertexMap`] | Id translation from the latest compaction |
/// | `last_transformation` | `String` | Name of the last transformation pass run |
///
/// Passes can store arbitrary data using the type-safe [`insert`](Self::insert)
/// and [`get`](Self::get) methods. Each type can have at most one value stored.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Statistics recorded by the analysis pass.
    pub metrics: Option<CircuitMetrics>,

    /// Old-to-new ids from the most recent compaction.
    ///
    /// Vertex ids recorded before that compaction must be translated
    /// through this map.
    pub vertex_map: Option<VertexMap>,

    /// Set by the pass manager after each transformation pass.
    pub last_transformation: Option<String>,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}
