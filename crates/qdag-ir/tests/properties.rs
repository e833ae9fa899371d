//! Property-based tests for circuit graph surgery.
//!
//! Random circuits are built through the public mutators only; every
//! property below must then hold regardless of the operation sequence.

use qdag_ir::{Circuit, Element, IrError, Param, ValidationError, VertexId, WireId};
use proptest::prelude::*;

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(usize),
    X(usize),
    Rz(usize, u8),
    CX(usize, usize),
    Measure(usize, usize),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) -> Option<VertexId> {
        let nq = circuit.num_qubits();
        match self {
            GateOp::H(q) => circuit.add_node(Element::H, &[q], &[]).ok(),
            GateOp::X(q) => circuit.add_node(Element::X, &[q], &[]).ok(),
            GateOp::Rz(q, s) => {
                let theta = Param::symbol(format!("t{s}"));
                circuit.add_node((Element::RZ, theta), &[q], &[]).ok()
            }
            GateOp::CX(c, t) => circuit.add_node(Element::CX, &[c, t], &[]).ok(),
            GateOp::Measure(q, c) => circuit.add_node(Element::Measure, &[q], &[nq + c]).ok(),
        }
    }
}

/// Generate a random gate operation for a circuit of the given shape.
fn arb_gate_op(num_qubits: usize, num_clbits: usize) -> impl Strategy<Value = GateOp> {
    let single = prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (0..num_qubits, 0_u8..3).prop_map(|(q, s)| GateOp::Rz(q, s)),
    ];
    let mut ops = vec![single.boxed()];
    if num_qubits >= 2 {
        ops.push(
            (0..num_qubits, 0..num_qubits)
                .prop_filter("Control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| GateOp::CX(c, t))
                .boxed(),
        );
    }
    if num_clbits >= 1 {
        ops.push(
            (0..num_qubits, 0..num_clbits)
                .prop_map(|(q, c)| GateOp::Measure(q, c))
                .boxed(),
        );
    }
    proptest::strategy::Union::new(ops)
}

/// Generate a random circuit with 1-5 qubits, 0-3 clbits and 0-15 ops.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_usize..=5, 0_usize..=3).prop_flat_map(|(nq, nc)| {
        prop::collection::vec(arb_gate_op(nq, nc), 0..=15).prop_map(move |ops| {
            let mut circuit = Circuit::new(nq, nc);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

/// Mutations applied after construction.
#[derive(Debug, Clone)]
enum Mutation {
    Remove(usize),
    InsertX { before: usize, wire: usize },
    InsertCx { before: (usize, usize), control: usize, target: usize },
    InsertMeasure { before: (usize, usize), qubit: usize, clbit: usize },
    Compact,
}

fn arb_mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        any::<usize>().prop_map(Mutation::Remove),
        (any::<usize>(), any::<usize>()).prop_map(|(before, wire)| Mutation::InsertX { before, wire }),
        (any::<(usize, usize)>(), any::<usize>(), 1_usize..5).prop_map(
            |(before, control, offset)| Mutation::InsertCx {
                before,
                control,
                target: control.wrapping_add(offset),
            }
        ),
        (any::<(usize, usize)>(), any::<usize>(), any::<usize>()).prop_map(
            |(before, qubit, clbit)| Mutation::InsertMeasure { before, qubit, clbit }
        ),
        Just(Mutation::Compact),
    ]
}

fn op_vertices(circuit: &Circuit) -> Vec<VertexId> {
    circuit
        .nodes()
        .find_nodes(|n| !n.is_io())
        .map(|n| n.id())
        .collect()
}

/// Element sequence of every wire; independent of vertex numbering.
fn wire_signature(circuit: &Circuit) -> Vec<Vec<Element>> {
    (0..circuit.num_wires())
        .map(|w| circuit.wire_elements(w).collect())
        .collect()
}

fn apply_mutation(circuit: &mut Circuit, mutation: Mutation) {
    match mutation {
        Mutation::Remove(pick) => {
            let ops = op_vertices(circuit);
            if !ops.is_empty() {
                circuit.remove_node(ops[pick % ops.len()]).unwrap();
            }
        }
        Mutation::InsertX { before, wire } => {
            let wire = wire % circuit.num_qubits();
            let on_wire: Vec<VertexId> = circuit.wire_vertices(wire).skip(1).collect();
            let target = on_wire[before % on_wire.len()];
            circuit
                .insert_node(Element::X, &[target], &[wire], &[])
                .unwrap();
        }
        Mutation::InsertCx { before, control, target } => {
            let nq = circuit.num_qubits();
            if nq < 2 {
                return;
            }
            let control = control % nq;
            let target = target % nq;
            if control == target {
                return;
            }
            let points = [
                insertion_point(circuit, control, before.0),
                insertion_point(circuit, target, before.1),
            ];
            insert_or_reject(circuit, Element::CX, &points, &[control, target], &[]);
        }
        Mutation::InsertMeasure { before, qubit, clbit } => {
            let nq = circuit.num_qubits();
            if circuit.num_clbits() == 0 {
                return;
            }
            let qubit = qubit % nq;
            let clwire = nq + clbit % circuit.num_clbits();
            let points = [
                insertion_point(circuit, qubit, before.0),
                insertion_point(circuit, clwire, before.1),
            ];
            insert_or_reject(circuit, Element::Measure, &points, &[qubit], &[clwire]);
        }
        Mutation::Compact => {
            circuit.compact();
        }
    }
}

/// A vertex after the Input on `wire`, chosen by `pick`.
fn insertion_point(circuit: &Circuit, wire: WireId, pick: usize) -> VertexId {
    let on_wire: Vec<VertexId> = circuit.wire_vertices(wire).skip(1).collect();
    on_wire[pick % on_wire.len()]
}

/// Insert a multi-wire operation; a cycle rejection must leave the circuit
/// untouched, a success must splice the vertex between the old neighbors.
fn insert_or_reject(
    circuit: &mut Circuit,
    element: Element,
    points: &[VertexId],
    wires: &[WireId],
    clwires: &[WireId],
) {
    let all: Vec<WireId> = wires.iter().chain(clwires).copied().collect();
    let preds: Vec<VertexId> = points
        .iter()
        .zip(&all)
        .map(|(&p, &w)| circuit.in_neighbor(p, w).unwrap())
        .collect();
    let before = wire_signature(circuit);
    let edges = circuit.num_edges();

    match circuit.insert_node(element, points, wires, clwires) {
        Ok(v) => {
            for ((&p, &w), &pred) in points.iter().zip(&all).zip(&preds) {
                assert_eq!(circuit.in_neighbor(v, w).unwrap(), pred);
                assert_eq!(circuit.out_neighbor(v, w).unwrap(), p);
            }
            assert_eq!(circuit.nodes().wires(v), all.as_slice());
            assert_eq!(circuit.num_edges(), edges + all.len());
        }
        Err(IrError::Validation(ValidationError::WouldCreateCycle { .. })) => {
            assert_eq!(wire_signature(circuit), before);
            assert_eq!(circuit.num_edges(), edges);
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
}

proptest! {
    /// Following a wire from its Input visits every vertex carrying it and
    /// stops at its Output.
    #[test]
    fn test_wire_walk_covers_wire(circuit in arb_circuit()) {
        for w in 0..circuit.num_wires() {
            let walk: Vec<VertexId> = circuit.wire_vertices(w).collect();
            let carrying = circuit.count_elements(|n| n.wires().contains(&w));
            prop_assert_eq!(walk.len(), carrying);
            prop_assert_eq!(walk.first().copied(), circuit.input_vertex(w));
            prop_assert_eq!(walk.last().copied(), circuit.output_vertex(w));
        }
    }

    /// Adding a node then removing it restores every wire.
    #[test]
    fn test_add_then_remove_restores(circuit in arb_circuit(), q in 0_usize..5) {
        let mut circuit = circuit;
        let q = q % circuit.num_qubits();
        let before = wire_signature(&circuit);
        let edges = circuit.num_edges();
        let depth = circuit.depth();

        let v = circuit.add_node(Element::H, &[q], &[]).unwrap();
        circuit.remove_node(v).unwrap();

        prop_assert_eq!(wire_signature(&circuit), before);
        prop_assert_eq!(circuit.num_edges(), edges);
        prop_assert_eq!(circuit.depth(), depth);
        circuit.check().unwrap();
    }

    /// Input precedes and Output follows every vertex on its wire.
    #[test]
    fn test_topological_order_respects_wires(circuit in arb_circuit()) {
        let order = circuit.topological_vertices();
        prop_assert_eq!(order.len(), circuit.num_vertices());
        let mut pos = vec![usize::MAX; circuit.nodes().len()];
        for (i, &v) in order.iter().enumerate() {
            pos[v] = i;
        }
        for w in 0..circuit.num_wires() {
            let walk: Vec<VertexId> = circuit.wire_vertices(w).collect();
            for pair in walk.windows(2) {
                prop_assert!(pos[pair[0]] < pos[pair[1]]);
            }
        }
    }

    /// An operation-free circuit has depth 0.
    #[test]
    fn test_empty_depth(nq in 0_usize..8, nc in 0_usize..8) {
        let circuit = Circuit::new(nq, nc);
        prop_assert_eq!(circuit.depth(), 0);
        prop_assert_eq!(circuit.num_vertices(), 2 * (nq + nc));
        prop_assert_eq!(circuit.num_edges(), nq + nc);
        prop_assert_eq!(circuit.num_tensor_factors(), nq + nc);
    }

    /// Composition adds operation counts and bounds depth by the sum.
    #[test]
    fn test_compose_identity_order(a in arb_circuit(), ops in prop::collection::vec(arb_gate_op(5, 3), 0..10)) {
        let mut b = Circuit::new(a.num_qubits(), a.num_clbits());
        for op in ops {
            op.apply(&mut b);
        }
        let c = a.compose(&b, None).unwrap();
        prop_assert_eq!(c.count_op_elements(), a.count_op_elements() + b.count_op_elements());
        prop_assert!(c.depth() <= a.depth() + b.depth());
        prop_assert!(c.depth() >= a.depth().max(b.depth()));
        c.check().unwrap();
    }

    /// Removing a block at once matches removing its vertices one by one;
    /// a rejected block leaves the circuit untouched.
    #[test]
    fn test_remove_block_matches_remove_node(
        circuit in arb_circuit(),
        wire in 0_usize..5,
        start in 0_usize..16,
        len in 1_usize..4,
    ) {
        let wire = wire % circuit.num_qubits();
        let ops: Vec<VertexId> = circuit
            .wire_vertices(wire)
            .filter(|&v| !circuit.nodes().element(v).is_io())
            .collect();
        prop_assume!(!ops.is_empty());
        let start = start % ops.len();
        let block: Vec<VertexId> = ops[start..(start + len).min(ops.len())].to_vec();

        let mut at_once = circuit.clone();
        match at_once.remove_block(&block, None) {
            Ok(()) => {
                let mut one_by_one = circuit.clone();
                for &v in &block {
                    one_by_one.remove_node(v).unwrap();
                }
                prop_assert_eq!(wire_signature(&at_once), wire_signature(&one_by_one));
                prop_assert_eq!(at_once.num_edges(), one_by_one.num_edges());
                at_once.check().unwrap();
            }
            Err(IrError::Validation(ValidationError::NotContiguous { .. })) => {
                prop_assert_eq!(wire_signature(&at_once), wire_signature(&circuit));
                at_once.check().unwrap();
            }
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }

    /// The integrity check holds after any sequence of public mutations.
    #[test]
    fn test_check_holds_after_mutations(
        circuit in arb_circuit(),
        mutations in prop::collection::vec(arb_mutation(), 0..10),
    ) {
        let mut circuit = circuit;
        for m in mutations {
            apply_mutation(&mut circuit, m);
            circuit.check().unwrap();
        }
    }
}

#[test]
fn test_two_by_two_scenario() {
    let mut qc = Circuit::new(2, 2);
    assert_eq!(qc.num_vertices(), 8);
    assert_eq!(qc.num_edges(), 4);
    assert_eq!(qc.to_string(), "circuit {nq=2, ncl=2, nv=8, ne=4}");

    qc.add_node(Element::H, &[0], &[]).unwrap();
    qc.add_node(Element::CX, &[0, 1], &[]).unwrap();
    assert_eq!(qc.count_op_elements(), 2);
    assert_eq!(qc.depth(), 2);
    assert_eq!(qc.num_tensor_factors(), 3);
    qc.check().unwrap();
}

#[test]
fn test_num_parameters_counts_expressions() {
    let t1 = Param::symbol("t1");
    let t2 = Param::symbol("t2");
    let mut qc = Circuit::new(2, 0);
    let wire: WireId = 0;
    qc.add_node((Element::RX, t1.clone()), &[wire], &[]).unwrap();
    qc.add_node((Element::RX, t2.clone()), &[wire], &[]).unwrap();
    qc.add_node((Element::RZZ, t1 - t2), &[0, 1], &[]).unwrap();
    qc.add_node((Element::RX, 1.5), &[1], &[]).unwrap();
    assert_eq!(qc.num_parameters(), 3);
    qc.check_param_table().unwrap();
}
