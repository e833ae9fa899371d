//! Verification passes for ensuring compilation correctness.
//!
//! Graph surgery must leave node storage, graph backing and parameter table
//! in agreement. [`IntegrityVerification`] runs the full consistency check
//! and names the transformation that broke it.

use tracing::debug;

use qdag_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of integrity verification, stored as a custom property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the verification passed.
    pub passed: bool,
    /// Live vertices checked.
    pub vertices_checked: usize,
    /// Edges checked.
    pub edges_checked: usize,
}

/// Analysis pass that runs [`Circuit::check`].
///
/// Add it after transformation passes; a failure is reported as
/// [`CompileError::Verification`] naming the last transformation that ran.
pub struct IntegrityVerification;

impl Pass for IntegrityVerification {
    fn name(&self) -> &'static str {
        "IntegrityVerification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let outcome = circuit.check();
        properties.insert(VerificationResult {
            passed: outcome.is_ok(),
            vertices_checked: circuit.num_vertices(),
            edges_checked: circuit.num_edges(),
        });
        outcome.map_err(|source| CompileError::Verification {
            after: properties
                .last_transformation
                .clone()
                .unwrap_or_else(|| "<input>".to_string()),
            source,
        })?;
        debug!("Integrity verified on {} vertices", circuit.num_vertices());
        Ok(())
    }
}
