//! Fluent circuit construction.
//!
//! [`CircuitBuilder`] wraps a [`Circuit`] and appends one operation per call.
//! Every call goes through [`Circuit::add_node`], so the same validation
//! applies. A [`GateCall`] packages an operation with its wires for later
//! application.

use crate::circuit::Circuit;
use crate::element::{Element, ParamElement};
use crate::error::IrResult;
use crate::node::{VertexId, WireId};
use crate::parameter::Param;

/// An operation together with the wires it acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct GateCall {
    /// The element and its parameters.
    pub op: ParamElement,
    /// Quantum wires.
    pub wires: Vec<WireId>,
    /// Classical wires (absolute ids).
    pub clwires: Vec<WireId>,
}

impl GateCall {
    /// A call on quantum wires only.
    pub fn new(op: impl Into<ParamElement>, wires: impl IntoIterator<Item = WireId>) -> Self {
        Self {
            op: op.into(),
            wires: wires.into_iter().collect(),
            clwires: Vec::new(),
        }
    }

    /// Attach classical wires.
    #[must_use]
    pub fn with_clwires(mut self, clwires: impl IntoIterator<Item = WireId>) -> Self {
        self.clwires = clwires.into_iter().collect();
        self
    }
}

/// Builder for [`Circuit`].
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    circuit: Circuit,
    last: Option<VertexId>,
}

impl CircuitBuilder {
    /// Start from an empty circuit with the given wire counts.
    pub fn new(nqubits: usize, nclbits: usize) -> Self {
        Self::from_circuit(Circuit::new(nqubits, nclbits))
    }

    /// Continue building on an existing circuit.
    pub fn from_circuit(circuit: Circuit) -> Self {
        Self {
            circuit,
            last: None,
        }
    }

    /// Vertex of the most recently added operation.
    pub fn last_vertex(&self) -> Option<VertexId> {
        self.last
    }

    /// The circuit built so far.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Finish and return the circuit.
    pub fn build(self) -> Circuit {
        self.circuit
    }

    /// Apply a packaged call.
    pub fn apply(&mut self, call: GateCall) -> IrResult<&mut Self> {
        let v = self.circuit.add_node(call.op, &call.wires, &call.clwires)?;
        self.last = Some(v);
        Ok(self)
    }

    /// Apply several packaged calls in order.
    pub fn apply_all(&mut self, calls: impl IntoIterator<Item = GateCall>) -> IrResult<&mut Self> {
        for call in calls {
            self.apply(call)?;
        }
        Ok(self)
    }

    /// Apply any element on quantum and classical wires.
    pub fn gate(
        &mut self,
        op: impl Into<ParamElement>,
        wires: &[WireId],
        clwires: &[WireId],
    ) -> IrResult<&mut Self> {
        let v = self.circuit.add_node(op, wires, clwires)?;
        self.last = Some(v);
        Ok(self)
    }

    fn one(&mut self, element: Element, qubit: WireId) -> IrResult<&mut Self> {
        self.gate(element, &[qubit], &[])
    }

    fn one_param(&mut self, element: Element, theta: Param, qubit: WireId) -> IrResult<&mut Self> {
        self.gate((element, theta), &[qubit], &[])
    }

    fn two(&mut self, element: Element, q0: WireId, q1: WireId) -> IrResult<&mut Self> {
        self.gate(element, &[q0, q1], &[])
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: WireId) -> IrResult<&mut Self> {
        self.one(Element::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: WireId) -> IrResult<&mut Self> {
        self.one(Element::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: WireId) -> IrResult<&mut Self> {
        self.one(Element::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: WireId) -> IrResult<&mut Self> {
        self.one(Element::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: WireId) -> IrResult<&mut Self> {
        self.one(Element::S, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: WireId) -> IrResult<&mut Self> {
        self.one(Element::T, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: impl Into<Param>, qubit: WireId) -> IrResult<&mut Self> {
        self.one_param(Element::RX, theta.into(), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: impl Into<Param>, qubit: WireId) -> IrResult<&mut Self> {
        self.one_param(Element::RY, theta.into(), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: impl Into<Param>, qubit: WireId) -> IrResult<&mut Self> {
        self.one_param(Element::RZ, theta.into(), qubit)
    }

    /// Apply U(θ, φ, λ) gate.
    pub fn u(
        &mut self,
        theta: impl Into<Param>,
        phi: impl Into<Param>,
        lambda: impl Into<Param>,
        qubit: WireId,
    ) -> IrResult<&mut Self> {
        let params = vec![theta.into(), phi.into(), lambda.into()];
        self.gate((Element::U, params), &[qubit], &[])
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: WireId, target: WireId) -> IrResult<&mut Self> {
        self.two(Element::CX, control, target)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: WireId, target: WireId) -> IrResult<&mut Self> {
        self.two(Element::CZ, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: WireId, q2: WireId) -> IrResult<&mut Self> {
        self.two(Element::Swap, q1, q2)
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<Param>,
        control: WireId,
        target: WireId,
    ) -> IrResult<&mut Self> {
        self.gate((Element::CP, theta.into()), &[control, target], &[])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: WireId, c2: WireId, target: WireId) -> IrResult<&mut Self> {
        self.gate(Element::CCX, &[c1, c2, target], &[])
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit into a classical wire (absolute id).
    pub fn measure(&mut self, qubit: WireId, clwire: WireId) -> IrResult<&mut Self> {
        self.gate(Element::Measure, &[qubit], &[clwire])
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: WireId) -> IrResult<&mut Self> {
        self.one(Element::Reset, qubit)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<WireId> = (0..self.circuit.num_qubits()).collect();
        self.gate(Element::Barrier, &qubits, &[])
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Bell state on two qubits, measured into two classical wires.
    pub fn bell() -> IrResult<Circuit> {
        let mut b = Self::new(2, 2);
        b.h(0)?.cx(0, 1)?.measure(0, 2)?.measure(1, 3)?;
        Ok(b.build())
    }

    /// GHZ state on `n` qubits, measured.
    pub fn ghz(n: usize) -> IrResult<Circuit> {
        let mut b = Self::new(n, n);
        if n == 0 {
            return Ok(b.build());
        }
        b.h(0)?;
        for i in 0..n - 1 {
            b.cx(i, i + 1)?;
        }
        for i in 0..n {
            b.measure(i, n + i)?;
        }
        Ok(b.build())
    }

    /// Quantum Fourier transform on `n` qubits, without measurements.
    pub fn qft(n: usize) -> IrResult<Circuit> {
        use std::f64::consts::PI;

        let mut b = Self::new(n, 0);
        for i in 0..n {
            b.h(i)?;
            // π / 2^(j - i), halved exactly per step
            let mut angle = PI;
            for j in (i + 1)..n {
                angle /= 2.0;
                b.cp(angle, j, i)?;
            }
        }
        for i in 0..n / 2 {
            b.swap(i, n - 1 - i)?;
        }
        Ok(b.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fluent_api() {
        let mut b = CircuitBuilder::new(2, 2);
        b.h(0).unwrap().cx(0, 1).unwrap().measure(0, 2).unwrap();
        assert_eq!(b.last_vertex(), Some(10));

        let qc = b.build();
        assert_eq!(qc.count_op_elements(), 3);
        assert_eq!(qc.depth(), 3);
        qc.check().unwrap();
    }

    #[test]
    fn test_bell_state() {
        let qc = CircuitBuilder::bell().unwrap();
        assert_eq!(qc.num_qubits(), 2);
        assert_eq!(qc.num_clbits(), 2);
        assert_eq!(qc.depth(), 3); // H, CX, parallel measures
    }

    #[test]
    fn test_ghz_state() {
        let qc = CircuitBuilder::ghz(5).unwrap();
        assert_eq!(qc.num_qubits(), 5);
        assert_eq!(qc.count_op_elements(), 1 + 4 + 5);
        assert_eq!(qc.num_tensor_factors(), 1);
        assert_eq!(CircuitBuilder::ghz(0).unwrap().num_wires(), 0);
    }

    #[test]
    fn test_qft() {
        let qc = CircuitBuilder::qft(3).unwrap();
        assert_eq!(qc.count_ops()[&Element::H], 3);
        assert_eq!(qc.count_ops()[&Element::CP], 3);
        assert_eq!(qc.count_ops()[&Element::Swap], 1);
        qc.check().unwrap();
    }

    #[test]
    fn test_qft_wide() {
        let n = 70;
        let qc = CircuitBuilder::qft(n).unwrap();
        assert_eq!(qc.count_ops()[&Element::CP], n * (n - 1) / 2);
        assert_eq!(qc.count_ops()[&Element::Swap], n / 2);

        let angles: Vec<f64> = qc
            .topological_nodes()
            .filter(|node| node.element() == Element::CP && node.wires() == [n - 1, 0])
            .filter_map(|node| node.params()[0].as_f64())
            .collect();
        assert_eq!(angles, [PI / 2f64.powi(69)]);
        qc.check().unwrap();
    }

    #[test]
    fn test_gate_calls() {
        let calls = [
            GateCall::new(Element::H, [0]),
            GateCall::new((Element::RZ, PI / 4.0), [1]),
            GateCall::new(Element::Measure, [1]).with_clwires([2]),
        ];
        let mut b = CircuitBuilder::new(2, 1);
        b.apply_all(calls).unwrap();
        assert_eq!(b.circuit().count_op_elements(), 3);

        assert!(b.apply(GateCall::new(Element::CX, [0])).is_err());
        assert_eq!(b.circuit().count_op_elements(), 3);
    }

    #[test]
    fn test_parameterized_gate() {
        let mut b = CircuitBuilder::new(1, 0);
        b.rx(PI / 2.0, 0).unwrap().ry(Param::symbol("theta"), 0).unwrap();
        b.u(0.1, 0.2, "lambda", 0).unwrap();
        let qc = b.build();
        assert_eq!(qc.depth(), 3);
        assert_eq!(qc.num_parameters(), 2);
    }
}
