//! Tombstone compaction.

use tracing::debug;

use qdag_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Renumber vertices densely after removals.
///
/// The old-to-new map is stored in [`PropertySet::vertex_map`]. Runs only
/// when the circuit holds tombstones.
pub struct CompactVertices;

impl Pass for CompactVertices {
    fn name(&self) -> &'static str {
        "CompactVertices"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let map = circuit.compact();
        debug!("Compaction kept {} of {} ids", map.iter().count(), map.len());
        properties.vertex_map = Some(map);
        Ok(())
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit.nodes().len() > circuit.num_vertices()
    }
}
