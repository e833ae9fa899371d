//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qdag_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::{
    CancelCX, CancelInvolutions, CircuitAnalysis, CompactVertices, IntegrityVerification,
};
use crate::property::PropertySet;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> impl Iterator<Item = &str> {
        self.passes.iter().map(|p| p.name())
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                if pass.kind() == PassKind::Transformation {
                    properties.last_transformation = Some(pass.name().to_string());
                }
                debug!(
                    "Pass {} completed, ops: {}",
                    pass.name(),
                    circuit.count_op_elements()
                );
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            circuit.depth(),
            circuit.count_op_elements()
        );

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    /// Optimization level (0-3).
    optimization_level: u8,
    /// Initial properties.
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            optimization_level: 1,
            properties: PropertySet::new(),
        }
    }

    /// Set the optimization level.
    ///
    /// - Level 0: Analysis only
    /// - Level 1: CX cancellation, compaction, verification (default)
    /// - Level 2: + cancellation of every involution
    /// - Level 3: Same as level 2
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    /// Set the initial properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        if self.optimization_level >= 1 {
            pm.add_pass(CancelCX::new());
        }
        if self.optimization_level >= 2 {
            pm.add_pass(CancelInvolutions::new());
        }
        if self.optimization_level >= 1 {
            pm.add_pass(CompactVertices);
        }

        pm.add_pass(CircuitAnalysis);

        // Verification last, to catch inconsistencies left by any rewrite.
        if self.optimization_level >= 1 {
            pm.add_pass(IntegrityVerification);
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdag_ir::{CircuitBuilder, Element};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_run() {
        let pm = PassManager::new();
        let mut props = PropertySet::new();

        let mut circuit = Circuit::new(2, 0);
        circuit.add_node(Element::H, &[0], &[]).unwrap();
        circuit.add_node(Element::CX, &[0, 1], &[]).unwrap();

        pm.run(&mut circuit, &mut props).unwrap();

        assert_eq!(circuit.count_op_elements(), 2);
        assert!(props.last_transformation.is_none());
    }

    #[test]
    fn test_pass_manager_builder_levels() {
        let (pm, _) = PassManagerBuilder::new().with_optimization_level(0).build();
        assert_eq!(pm.pass_names().collect::<Vec<_>>(), ["CircuitAnalysis"]);

        let (pm, _) = PassManagerBuilder::new().build();
        assert_eq!(
            pm.pass_names().collect::<Vec<_>>(),
            [
                "CancelCX",
                "CompactVertices",
                "CircuitAnalysis",
                "IntegrityVerification"
            ]
        );

        let (pm, _) = PassManagerBuilder::new().with_optimization_level(9).build();
        assert_eq!(pm.len(), 5);
    }

    #[test]
    fn test_pipeline_records_metrics() {
        let mut b = CircuitBuilder::new(2, 0);
        b.h(0).unwrap().cx(0, 1).unwrap().cx(0, 1).unwrap().h(1).unwrap();
        let mut circuit = b.build();

        let (pm, mut props) = PassManagerBuilder::new().build();
        pm.run(&mut circuit, &mut props).unwrap();

        let metrics = props.metrics.as_ref().unwrap();
        assert_eq!(metrics.num_ops, 2);
        assert_eq!(metrics.depth, 1);
        assert_eq!(metrics.num_tensor_factors, 2);
        assert_eq!(props.last_transformation.as_deref(), Some("CompactVertices"));
        assert!(props.vertex_map.is_some());
        assert_eq!(circuit.nodes().len(), circuit.num_vertices());
    }
}
