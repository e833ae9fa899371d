//! Cancellation passes.
//!
//! Two copies of a self-inverse element on identical wires, with nothing
//! between them on any of those wires, multiply to the identity. Each pair
//! is removed with [`Circuit::remove_block`], leaving tombstones that
//! [`CompactVertices`](super::CompactVertices) can later drop.

use rustc_hash::FxHashSet;
use tracing::debug;

use qdag_ir::{Circuit, Element, NodeRef, VertexId};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Upper bound on sweeps per run.
const MAX_ITERATIONS: usize = 100;

/// Running totals across cancellation passes, stored as a custom property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancellationStats {
    /// Pairs removed.
    pub pairs: usize,
    /// Sweeps over the circuit, including the final empty one.
    pub sweeps: usize,
}

/// The vertex that cancels `node`, if any.
///
/// It must be the out-neighbor of `node` on every wire, carry the same
/// element and parameters, and list the same wires in the same order.
fn cancelling_partner(circuit: &Circuit, node: NodeRef<'_>) -> Option<VertexId> {
    let (&first, rest) = node.wires().split_first()?;
    let next = circuit.out_neighbor(node.id(), first).ok()?;
    if rest
        .iter()
        .any(|&w| circuit.out_neighbor(node.id(), w).ok() != Some(next))
    {
        return None;
    }
    let succ = circuit.node(next)?;
    (succ.element() == node.element()
        && succ.params() == node.params()
        && succ.wires() == node.wires())
    .then_some(next)
}

/// Find disjoint cancellable pairs of elements accepted by `accept`.
fn find_cancellable_pairs(
    circuit: &Circuit,
    accept: impl Fn(Element) -> bool,
) -> Vec<(VertexId, VertexId)> {
    let mut pairs = Vec::new();
    let mut processed: FxHashSet<VertexId> = FxHashSet::default();

    for node in circuit.topological_nodes() {
        let v = node.id();
        if node.is_io() || processed.contains(&v) || !accept(node.element()) {
            continue;
        }
        let Some(partner) = cancelling_partner(circuit, node) else {
            continue;
        };
        if processed.insert(partner) {
            processed.insert(v);
            pairs.push((v, partner));
        }
    }

    pairs
}

/// Sweep until no pair is left and record the totals.
fn cancel_until_fixed_point(
    name: &str,
    circuit: &mut Circuit,
    properties: &mut PropertySet,
    accept: impl Fn(Element) -> bool,
) -> CompileResult<()> {
    let mut stats = CancellationStats::default();
    for _ in 0..MAX_ITERATIONS {
        stats.sweeps += 1;
        let pairs = find_cancellable_pairs(circuit, &accept);
        if pairs.is_empty() {
            break;
        }
        for (first, second) in pairs {
            circuit.remove_block(&[first, second], None)?;
            stats.pairs += 1;
        }
    }
    debug!(
        "{name}: cancelled {} pairs in {} sweeps",
        stats.pairs, stats.sweeps
    );

    if let Some(total) = properties.get_mut::<CancellationStats>() {
        total.pairs += stats.pairs;
        total.sweeps += stats.sweeps;
    } else {
        properties.insert(stats);
    }
    Ok(())
}

/// CX cancellation pass.
///
/// Cancels pairs of adjacent CX gates on the same control and target.
/// CX · CX = I (identity)
pub struct CancelCX;

impl CancelCX {
    /// Create a new CX cancellation pass.
    pub fn new() -> Self {
        Self
    }
}

impl Default for CancelCX {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for CancelCX {
    fn name(&self) -> &'static str {
        "CancelCX"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        cancel_until_fixed_point(self.name(), circuit, properties, |e| e == Element::CX)
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit.count_ops().get(&Element::CX).copied().unwrap_or(0) >= 2
    }
}

/// Involution cancellation pass.
///
/// Generalizes [`CancelCX`] to every element for which
/// [`Element::is_involution`] holds (Paulis, H, CX, CZ, SWAP, CCX, ...).
/// Removing one pair can expose another, as in `CX H H CX`.
pub struct CancelInvolutions;

impl CancelInvolutions {
    /// Create a new involution cancellation pass.
    pub fn new() -> Self {
        Self
    }
}

impl Default for CancelInvolutions {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for CancelInvolutions {
    fn name(&self) -> &'static str {
        "CancelInvolutions"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        cancel_until_fixed_point(self.name(), circuit, properties, Element::is_involution)
    }
}
