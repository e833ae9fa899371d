//! Circuit statistics.

use tracing::debug;

use qdag_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::{CircuitMetrics, PropertySet};

/// Analysis pass recording [`CircuitMetrics`] in [`PropertySet::metrics`].
pub struct CircuitAnalysis;

impl Pass for CircuitAnalysis {
    fn name(&self) -> &'static str {
        "CircuitAnalysis"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    #[allow(clippy::unnecessary_wraps)]
    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let metrics = CircuitMetrics::from_circuit(circuit);
        debug!(
            "depth {}, {} ops, {} tensor factors",
            metrics.depth, metrics.num_ops, metrics.num_tensor_factors
        );
        properties.metrics = Some(metrics);
        Ok(())
    }
}
