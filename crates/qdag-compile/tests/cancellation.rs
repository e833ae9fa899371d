//! Integration tests for the cancellation pipeline.
//!
//! Cancellation must only ever shrink a circuit, never reorder anything on
//! a wire, and leave the three internal structures consistent.

use proptest::prelude::*;

use qdag_compile::passes::{CancelCX, CancelInvolutions, CancellationStats};
use qdag_compile::{Pass, PassManagerBuilder, PropertySet};
use qdag_ir::{Circuit, CircuitBuilder, Element};

/// Element sequence on a wire, anchors excluded.
fn ops_on_wire(circuit: &Circuit, wire: usize) -> Vec<Element> {
    circuit
        .wire_elements(wire)
        .filter(|e| !e.is_io())
        .collect()
}

// ============================================================================
// The canonical CNOT cancellation workflow
// ============================================================================

#[test]
fn test_cancel_cnots_workflow() {
    let mut b = CircuitBuilder::new(2, 0);
    for _ in 0..4 {
        b.cx(0, 1).unwrap();
    }
    for _ in 0..5 {
        b.cx(1, 0).unwrap();
    }
    for _ in 0..3 {
        b.cx(0, 1).unwrap();
    }
    let mut circuit = b.build();
    assert_eq!(circuit.depth(), 12);

    let mut props = PropertySet::new();
    CancelCX::new().run(&mut circuit, &mut props).unwrap();

    assert_eq!(circuit.count_op_elements(), 2);
    assert_eq!(circuit.depth(), 2);
    let remaining: Vec<_> = circuit
        .topological_nodes()
        .filter(|n| !n.is_io())
        .map(|n| n.wires().to_vec())
        .collect();
    assert_eq!(remaining, [vec![1, 0], vec![0, 1]]);
    assert_eq!(
        props.get::<CancellationStats>(),
        Some(&CancellationStats { pairs: 5, sweeps: 2 })
    );
    circuit.check().unwrap();
}

#[test]
fn test_pipeline_on_bell_is_noop() {
    let mut circuit = CircuitBuilder::bell().unwrap();
    let before: Vec<_> = (0..circuit.num_wires())
        .map(|w| ops_on_wire(&circuit, w))
        .collect();

    let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(3).build();
    pm.run(&mut circuit, &mut props).unwrap();

    let after: Vec<_> = (0..circuit.num_wires())
        .map(|w| ops_on_wire(&circuit, w))
        .collect();
    assert_eq!(before, after);
    assert_eq!(props.metrics.unwrap().depth, 3);
    assert!(props.vertex_map.is_none());
}

#[test]
fn test_measurement_separates_hadamards() {
    let mut b = CircuitBuilder::new(1, 1);
    b.h(0).unwrap().measure(0, 1).unwrap().h(0).unwrap();
    let mut circuit = b.build();

    let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(2).build();
    pm.run(&mut circuit, &mut props).unwrap();

    assert_eq!(
        ops_on_wire(&circuit, 0),
        [Element::H, Element::Measure, Element::H]
    );
}

// ============================================================================
// Properties over random circuits
// ============================================================================

#[derive(Debug, Clone)]
enum GateOp {
    H(usize),
    X(usize),
    T(usize),
    CX(usize, usize),
    Measure(usize),
}

fn arb_gate_op() -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0_usize..3).prop_map(GateOp::H),
        (0_usize..3).prop_map(GateOp::X),
        (0_usize..3).prop_map(GateOp::T),
        (0_usize..3, 0_usize..3)
            .prop_filter("Control and target must differ", |(c, t)| c != t)
            .prop_map(|(c, t)| GateOp::CX(c, t)),
        (0_usize..3).prop_map(GateOp::Measure),
    ]
}

fn build(ops: &[GateOp]) -> Circuit {
    let mut b = CircuitBuilder::new(3, 3);
    for op in ops {
        let applied = match *op {
            GateOp::H(q) => b.h(q),
            GateOp::X(q) => b.x(q),
            GateOp::T(q) => b.t(q),
            GateOp::CX(c, t) => b.cx(c, t),
            GateOp::Measure(q) => b.measure(q, 3 + q),
        };
        applied.unwrap();
    }
    b.build()
}

proptest! {
    /// Cancellation removes operations in pairs and keeps the circuit valid.
    #[test]
    fn test_cancellation_shrinks_by_pairs(ops in prop::collection::vec(arb_gate_op(), 0..30)) {
        let mut circuit = build(&ops);
        let before = circuit.count_op_elements();
        let depth = circuit.depth();

        let mut props = PropertySet::new();
        CancelInvolutions::new().run(&mut circuit, &mut props).unwrap();

        let pairs = props.get::<CancellationStats>().unwrap().pairs;
        prop_assert_eq!(circuit.count_op_elements(), before - 2 * pairs);
        prop_assert!(circuit.depth() <= depth);
        let t_count = |c: &Circuit| c.count_ops().get(&Element::T).copied();
        prop_assert_eq!(t_count(&circuit), t_count(&build(&ops)));
        circuit.check().unwrap();
    }

    /// A second run finds nothing left to cancel.
    #[test]
    fn test_cancellation_reaches_fixed_point(ops in prop::collection::vec(arb_gate_op(), 0..30)) {
        let mut circuit = build(&ops);
        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(2).build();
        pm.run(&mut circuit, &mut props).unwrap();
        let once = circuit.count_op_elements();

        let mut again = PropertySet::new();
        CancelInvolutions::new().run(&mut circuit, &mut again).unwrap();
        prop_assert_eq!(again.get::<CancellationStats>().unwrap().pairs, 0);
        prop_assert_eq!(circuit.count_op_elements(), once);
    }

    /// Measurements are never removed.
    #[test]
    fn test_measurements_survive(ops in prop::collection::vec(arb_gate_op(), 0..30)) {
        let mut circuit = build(&ops);
        let measures = circuit.count_ops().get(&Element::Measure).copied();

        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(3).build();
        pm.run(&mut circuit, &mut props).unwrap();

        prop_assert_eq!(circuit.count_ops().get(&Element::Measure).copied(), measures);
    }
}
