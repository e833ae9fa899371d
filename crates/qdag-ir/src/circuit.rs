//! The circuit DAG.
//!
//! [`Circuit`] owns the graph backing, the node storage and the parameter
//! table and keeps them in agreement through every mutation. Wires
//! `0..nqubits` are quantum, `nqubits..num_wires` classical; each wire runs
//! from its own Input vertex to its own Output vertex.
//!
//! ## Removal
//!
//! Removed vertices are tombstoned: the id stays allocated, the record is
//! cleared and the graph vertex is left isolated. Ids held by the caller stay
//! valid until [`Circuit::compact`] renumbers, which returns a [`VertexMap`]
//! from old to new ids.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::dag::DagBacking;
use crate::element::{Element, ElementKind, ParamElement};
use crate::error::{IntegrityError, IrError, IrResult, ValidationError};
use crate::node::{NodeArray, NodeRef, Port, VertexId, WireId, WireVertices};
use crate::param_table::{ParamSlot, ParamTable};
use crate::parameter::Param;

/// Old-to-new vertex ids produced by [`Circuit::compact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexMap {
    map: Vec<Option<VertexId>>,
}

impl VertexMap {
    /// New id of `old`, or `None` if `old` was a tombstone or out of range.
    pub fn get(&self, old: VertexId) -> Option<VertexId> {
        self.map.get(old).copied().flatten()
    }

    /// Number of ids that existed before compaction.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// `(old, new)` pairs for every surviving vertex.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.map
            .iter()
            .enumerate()
            .filter_map(|(old, new)| new.map(|n| (old, n)))
    }
}

/// A quantum circuit as a DAG with per-wire neighbor maps.
#[derive(Debug, Clone)]
pub struct Circuit {
    dag: DagBacking,
    nodes: NodeArray,
    param_table: ParamTable,
    input_vertices: Vec<VertexId>,
    output_vertices: Vec<VertexId>,
    nqubits: usize,
    nclbits: usize,
    num_removed: usize,
    global_phase: f64,
}

impl Circuit {
    /// Create a circuit with `nqubits` quantum and `nclbits` classical wires.
    ///
    /// Every wire gets an Input and an Output vertex joined by one edge.
    /// Input vertices take ids `0..num_wires`, Output vertices the next
    /// `num_wires` ids.
    pub fn new(nqubits: usize, nclbits: usize) -> Self {
        Self::with_global_phase(nqubits, nclbits, 0.0)
    }

    /// Like [`Circuit::new`] with an initial global phase.
    pub fn with_global_phase(nqubits: usize, nclbits: usize, global_phase: f64) -> Self {
        let num_wires = nqubits + nclbits;
        let mut circuit = Self {
            dag: DagBacking::new(),
            nodes: NodeArray::new(),
            param_table: ParamTable::new(),
            input_vertices: Vec::with_capacity(num_wires),
            output_vertices: Vec::with_capacity(num_wires),
            nqubits,
            nclbits,
            num_removed: 0,
            global_phase,
        };
        for wire in 0..num_wires {
            let v = circuit.push_anchor(Element::Input, wire);
            circuit.input_vertices.push(v);
        }
        for wire in 0..num_wires {
            let v = circuit.push_anchor(Element::Output, wire);
            circuit.output_vertices.push(v);
        }
        for wire in 0..num_wires {
            let (i, o) = (circuit.input_vertices[wire], circuit.output_vertices[wire]);
            circuit.connect(Port::new(i, 0), Port::new(o, 0), wire);
        }
        circuit
    }

    /// A copy with the same wires and global phase but no operations.
    pub fn empty_like(&self) -> Self {
        Self::with_global_phase(self.nqubits, self.nclbits, self.global_phase)
    }

    /// Append a quantum wire and return its id.
    ///
    /// Quantum wires precede classical wires, so this fails once the circuit
    /// has any classical wire.
    pub fn add_qubit(&mut self) -> IrResult<WireId> {
        if self.nclbits > 0 {
            return Err(ValidationError::ClassicalWiresPresent(self.nclbits).into());
        }
        let wire = self.nqubits;
        self.nqubits += 1;
        self.push_wire(wire);
        Ok(wire)
    }

    /// Append a classical wire and return its id.
    pub fn add_clbit(&mut self) -> WireId {
        let wire = self.num_wires();
        self.nclbits += 1;
        self.push_wire(wire);
        wire
    }

    fn push_wire(&mut self, wire: WireId) {
        let i = self.push_anchor(Element::Input, wire);
        let o = self.push_anchor(Element::Output, wire);
        self.input_vertices.push(i);
        self.output_vertices.push(o);
        self.connect(Port::new(i, 0), Port::new(o, 0), wire);
    }

    fn push_anchor(&mut self, element: Element, wire: WireId) -> VertexId {
        if wire < self.nqubits {
            self.push_vertex(element, None, &[wire], &[])
        } else {
            self.push_vertex(element, None, &[], &[wire])
        }
    }

    fn push_vertex(
        &mut self,
        element: Element,
        params: Option<Vec<Param>>,
        wires: &[WireId],
        clwires: &[WireId],
    ) -> VertexId {
        let v = self.nodes.append(element, params, wires, clwires);
        let g = self.dag.add_vertex();
        debug_assert_eq!(v, g, "node storage and graph out of step");
        v
    }

    /// Write both endpoint maps and the graph edge for one wire segment.
    fn connect(&mut self, src: Port, dst: Port, wire: WireId) {
        self.nodes.set_out_port(src, Some(dst));
        self.nodes.set_in_port(dst, Some(src));
        self.dag.add_edge(src.vertex, dst.vertex, wire);
    }

    /// Splice port `at` between `succ` and its current in-neighbor.
    fn splice_before(&mut self, at: Port, wire: WireId, succ: Port) {
        if let Some(pred) = self.nodes.in_port(succ.vertex, succ.index) {
            self.dag.remove_edge(pred.vertex, succ.vertex, wire);
            self.connect(pred, at, wire);
        }
        self.connect(at, succ, wire);
    }

    fn register_params(&mut self, v: VertexId) {
        for pos in 0..self.nodes.params(v).len() {
            if let Some(param) = self.nodes.getparam(v, pos) {
                self.param_table.register(v, pos, param);
            }
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Check an operation and its wires without writing anything.
    fn validate_operation(
        &self,
        op: &ParamElement,
        wires: &[WireId],
        clwires: &[WireId],
    ) -> Result<(), ValidationError> {
        let element = op.element;
        if element.is_io() {
            return Err(ValidationError::IoElement(element.name().to_string()));
        }
        let arity = |what: &'static str, expected: Option<usize>, got: usize| match expected {
            Some(expected) if expected != got => Err(ValidationError::ArityMismatch {
                element: element.name().to_string(),
                what,
                expected,
                got,
            }),
            _ => Ok(()),
        };
        if wires.is_empty() && clwires.is_empty() {
            arity("wires", Some(1), 0)?;
        }
        arity("qubits", element.num_qubits(), wires.len())?;
        arity("clbits", element.num_clbits(), clwires.len())?;
        arity("parameters", element.num_params(), op.params().len())?;

        let quantum = 0..self.nqubits;
        let classical = self.nqubits..self.num_wires();
        let mut seen = FxHashSet::default();
        for (&wire, valid) in wires
            .iter()
            .map(|w| (w, &quantum))
            .chain(clwires.iter().map(|w| (w, &classical)))
        {
            if !valid.contains(&wire) {
                return Err(ValidationError::WireOutOfRange {
                    wire,
                    valid: valid.clone(),
                    element: Some(element.name().to_string()),
                });
            }
            if !seen.insert(wire) {
                return Err(ValidationError::DuplicateWire {
                    wire,
                    element: Some(element.name().to_string()),
                });
            }
        }
        Ok(())
    }

    /// Append `op` to the back of the circuit on `wires` and `clwires`.
    ///
    /// The new vertex is spliced in front of each wire's Output vertex.
    /// Absolute wire ids are used for classical wires.
    pub fn add_node(
        &mut self,
        op: impl Into<ParamElement>,
        wires: &[WireId],
        clwires: &[WireId],
    ) -> IrResult<VertexId> {
        let op = op.into();
        self.validate_operation(&op, wires, clwires)?;

        let v = self.push_vertex(op.element, op.params, wires, clwires);
        for (i, &wire) in wires.iter().chain(clwires).enumerate() {
            let out = Port::new(self.output_vertices[wire], 0);
            self.splice_before(Port::new(v, i), wire, out);
        }
        self.register_params(v);
        Ok(v)
    }

    /// Insert `op` immediately before `out_vertices[i]` on the `i`-th wire of
    /// `wires` followed by `clwires`.
    ///
    /// Fails without writing if the counts differ, if an insertion point does
    /// not carry its wire or is an Input vertex, or if the insertion would
    /// close a cycle.
    pub fn insert_node(
        &mut self,
        op: impl Into<ParamElement>,
        out_vertices: &[VertexId],
        wires: &[WireId],
        clwires: &[WireId],
    ) -> IrResult<VertexId> {
        let op = op.into();
        self.validate_operation(&op, wires, clwires)?;

        let all: Vec<WireId> = wires.iter().chain(clwires).copied().collect();
        if out_vertices.len() != all.len() {
            return Err(ValidationError::ArityMismatch {
                element: op.element.name().to_string(),
                what: "insertion points",
                expected: all.len(),
                got: out_vertices.len(),
            }
            .into());
        }

        let mut succs = Vec::with_capacity(all.len());
        let mut preds = Vec::with_capacity(all.len());
        for (&ov, &wire) in out_vertices.iter().zip(&all) {
            if !self.nodes.is_live(ov) {
                return Err(IrError::InvalidVertex {
                    vertex: ov,
                    reason: "vertex is out of range or removed",
                });
            }
            if self.nodes.element(ov) == Element::Input {
                return Err(IrError::InvalidVertex {
                    vertex: ov,
                    reason: "cannot insert before an input vertex",
                });
            }
            let index = self
                .nodes
                .wireind(ov, wire)
                .map_err(|_| ValidationError::NotOnWire { vertex: ov, wire })?;
            let pred = self.nodes.inneighborind(ov, wire)?;
            succs.push(Port::new(ov, index));
            preds.push(pred.vertex);
        }

        // The new vertex sits after every pred and before every succ.
        let closes_cycle = succs
            .iter()
            .any(|s| preds.iter().any(|&p| self.dag.has_path(s.vertex, p)));
        if closes_cycle {
            return Err(ValidationError::WouldCreateCycle {
                out_vertices: out_vertices.to_vec(),
            }
            .into());
        }

        let v = self.push_vertex(op.element, op.params, wires, clwires);
        for (i, (&wire, &succ)) in all.iter().zip(&succs).enumerate() {
            self.splice_before(Port::new(v, i), wire, succ);
        }
        self.register_params(v);
        Ok(v)
    }

    fn check_removable(&self, v: VertexId) -> IrResult<()> {
        if !self.nodes.is_live(v) {
            return Err(IrError::InvalidVertex {
                vertex: v,
                reason: "vertex is out of range or removed",
            });
        }
        if self.nodes.element(v).is_io() {
            return Err(IrError::InvalidVertex {
                vertex: v,
                reason: "wire anchors cannot be removed",
            });
        }
        Ok(())
    }

    /// Remove the operation at `v`, joining its neighbors on every wire.
    ///
    /// Returns the removed element and parameters.
    pub fn remove_node(&mut self, v: VertexId) -> IrResult<ParamElement> {
        self.check_removable(v)?;
        let removed = self.nodes.node(v).param_element();

        self.nodes.rewire_across(v)?;
        self.dag.clear_vertex(v);
        for (i, &wire) in self.nodes.wires(v).iter().enumerate() {
            if let (Some(src), Some(dst)) = (self.nodes.in_port(v, i), self.nodes.out_port(v, i)) {
                self.dag.add_edge(src.vertex, dst.vertex, wire);
            }
        }
        self.retire(v);
        Ok(removed)
    }

    fn retire(&mut self, v: VertexId) {
        self.param_table.purge(v);
        self.nodes.tombstone(v);
        self.num_removed += 1;
    }

    /// Remove a wire-contiguous block of operations as a unit.
    ///
    /// On every wire the block touches, the vertex entering the block is
    /// joined to the vertex leaving it. The first listed vertex must have an
    /// in-neighbor outside the block and the last an out-neighbor outside it.
    /// Pass the map returned by [`Circuit::compact`] to use ids issued before
    /// the compaction.
    pub fn remove_block(
        &mut self,
        vertices: &[VertexId],
        vertex_map: Option<&VertexMap>,
    ) -> IrResult<()> {
        let mut block = Vec::with_capacity(vertices.len());
        for &v in vertices {
            let v = match vertex_map {
                Some(map) => map.get(v).ok_or(IrError::InvalidVertex {
                    vertex: v,
                    reason: "vertex did not survive compaction",
                })?,
                None => v,
            };
            self.check_removable(v)?;
            block.push(v);
        }
        let (Some(&first), Some(&last)) = (block.first(), block.last()) else {
            return Ok(());
        };

        let members: FxHashSet<VertexId> = block.iter().copied().collect();
        if members.len() != block.len() {
            return Err(IrError::InvalidVertex {
                vertex: first,
                reason: "block lists a vertex more than once",
            });
        }

        // Per wire: the port entering the block and the port leaving it.
        let mut entries: BTreeMap<WireId, Port> = BTreeMap::new();
        let mut exits: BTreeMap<WireId, Port> = BTreeMap::new();
        for &v in &block {
            for (i, &wire) in self.nodes.wires(v).iter().enumerate() {
                let ports = [
                    (self.nodes.in_port(v, i), &mut entries),
                    (self.nodes.out_port(v, i), &mut exits),
                ];
                for (port, side) in ports {
                    let Some(port) = port else { continue };
                    if members.contains(&port.vertex) {
                        continue;
                    }
                    if side.insert(wire, port).is_some() {
                        return Err(ValidationError::NotContiguous { wire }.into());
                    }
                }
            }
        }

        let external = |ports: &[Option<Port>]| {
            ports
                .iter()
                .flatten()
                .any(|p| !members.contains(&p.vertex))
        };
        if !external(self.nodes.in_ports(first)) {
            return Err(ValidationError::BlockBoundary {
                vertex: first,
                position: "first",
                direction: "incoming",
            }
            .into());
        }
        if !external(self.nodes.out_ports(last)) {
            return Err(ValidationError::BlockBoundary {
                vertex: last,
                position: "last",
                direction: "outgoing",
            }
            .into());
        }

        for &v in &block {
            self.dag.clear_vertex(v);
        }
        for (wire, entry) in entries {
            if let Some(&exit) = exits.get(&wire) {
                self.connect(entry, exit, wire);
            }
        }
        for &v in &block {
            self.retire(v);
        }
        debug!("Removed block of {} vertices", block.len());
        Ok(())
    }

    /// Drop tombstones and renumber vertices densely.
    ///
    /// Relative order of surviving ids is preserved.
    pub fn compact(&mut self) -> VertexMap {
        let mut next = 0;
        let map: Vec<Option<VertexId>> = (0..self.nodes.len())
            .map(|v| {
                (!self.nodes.is_removed(v)).then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect();

        let remapped = |v: VertexId| map[v].unwrap_or(v);
        self.nodes = self.nodes.compacted(&map);
        self.dag = self.dag.compacted(&map);
        self.param_table.remap(&map);
        self.input_vertices.iter_mut().for_each(|v| *v = remapped(*v));
        self.output_vertices.iter_mut().for_each(|v| *v = remapped(*v));
        debug!(
            "Compacted circuit: {} -> {} vertices",
            map.len(),
            self.nodes.len()
        );
        self.num_removed = 0;
        VertexMap { map }
    }

    /// Append `other` to `self`, mapping wire `i` of `other` to
    /// `wire_order[i]`.
    ///
    /// Without an explicit order, quantum wire `i` maps to quantum wire `i`
    /// and classical wire `j` of `other` to classical wire `j` of `self`.
    /// The global phases add.
    pub fn compose_into(&mut self, other: &Circuit, wire_order: Option<&[WireId]>) -> IrResult<()> {
        let order: Vec<WireId> = match wire_order {
            Some(order) => order.to_vec(),
            None => (0..other.nqubits)
                .chain((0..other.nclbits).map(|j| self.nqubits + j))
                .collect(),
        };
        self.validate_wire_order(other, &order)?;

        let before = self.num_vertices();
        for v in other.topological_vertices() {
            let node = other.nodes.node(v);
            if node.is_io() {
                continue;
            }
            let wires: Vec<WireId> = node.quantum_wires().iter().map(|&w| order[w]).collect();
            let clwires: Vec<WireId> = node.classical_wires().iter().map(|&w| order[w]).collect();
            self.add_node(node.param_element(), &wires, &clwires)?;
        }
        self.global_phase += other.global_phase;
        debug!(
            "Composed {} operations onto circuit",
            self.num_vertices() - before
        );
        Ok(())
    }

    /// A copy of `self` with `other` appended. See [`Circuit::compose_into`].
    pub fn compose(&self, other: &Circuit, wire_order: Option<&[WireId]>) -> IrResult<Circuit> {
        let mut out = self.clone();
        out.compose_into(other, wire_order)?;
        Ok(out)
    }

    fn validate_wire_order(&self, other: &Circuit, order: &[WireId]) -> Result<(), ValidationError> {
        if order.len() != other.num_wires() {
            return Err(ValidationError::ArityMismatch {
                element: "compose".to_string(),
                what: "wire mappings",
                expected: other.num_wires(),
                got: order.len(),
            });
        }
        let mut seen = FxHashSet::default();
        for (from, &to) in order.iter().enumerate() {
            if to >= self.num_wires() {
                return Err(ValidationError::WireOutOfRange {
                    wire: to,
                    valid: 0..self.num_wires(),
                    element: None,
                });
            }
            if !seen.insert(to) {
                return Err(ValidationError::DuplicateWire {
                    wire: to,
                    element: None,
                });
            }
            if other.is_quantum(from) != self.is_quantum(to) {
                return Err(ValidationError::WireKindMismatch { from, to });
            }
        }
        Ok(())
    }

    /// Replace the `pos`-th parameter at `v`, keeping the parameter table in
    /// step. Returns the old value.
    pub fn set_param(&mut self, v: VertexId, pos: usize, param: Param) -> IrResult<Param> {
        let old = self
            .nodes
            .getparam(v, pos)
            .filter(|_| self.nodes.is_live(v))
            .cloned()
            .ok_or(IrError::InvalidVertex {
                vertex: v,
                reason: "no parameter at this position",
            })?;
        self.param_table.unregister(v, pos, &old);
        self.param_table.register(v, pos, &param);
        self.nodes.set_param(v, pos, param);
        Ok(old)
    }

    /// Substitute `value` for the symbol `name` in every parameter.
    ///
    /// Returns the number of parameter slots that changed.
    pub fn bind_parameter(&mut self, name: &str, value: f64) -> usize {
        let slots: Vec<(Param, ParamSlot)> = self
            .param_table
            .iter()
            .filter(|(param, _)| param.symbols().contains(name))
            .flat_map(|(param, slots)| slots.iter().map(move |&s| (param.clone(), s)))
            .collect();

        for (param, (v, pos)) in &slots {
            let bound = param.bind(name, value);
            self.param_table.unregister(*v, *pos, param);
            self.param_table.register(*v, *pos, &bound);
            self.nodes.set_param(*v, *pos, bound);
        }
        slots.len()
    }

    /// Set the global phase.
    pub fn set_global_phase(&mut self, phase: f64) {
        self.global_phase = phase;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of quantum wires.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.nqubits
    }

    /// Number of classical wires.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.nclbits
    }

    /// Number of wires.
    #[inline]
    pub fn num_wires(&self) -> usize {
        self.nqubits + self.nclbits
    }

    /// Whether `wire` is a quantum wire.
    #[inline]
    pub fn is_quantum(&self, wire: WireId) -> bool {
        wire < self.nqubits
    }

    /// Number of live vertices, IO included.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.nodes.len() - self.num_removed
    }

    /// Number of wire segments.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.dag.num_edges()
    }

    /// The global phase.
    #[inline]
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Node storage, for column reads and filtered views.
    #[inline]
    pub fn nodes(&self) -> &NodeArray {
        &self.nodes
    }

    /// Borrowed view of the record at `v`.
    #[inline]
    pub fn node(&self, v: VertexId) -> Option<NodeRef<'_>> {
        self.nodes.get(v)
    }

    /// The graph backing.
    #[inline]
    pub fn dag(&self) -> &DagBacking {
        &self.dag
    }

    /// Input vertex of `wire`.
    #[inline]
    pub fn input_vertex(&self, wire: WireId) -> Option<VertexId> {
        self.input_vertices.get(wire).copied()
    }

    /// Output vertex of `wire`.
    #[inline]
    pub fn output_vertex(&self, wire: WireId) -> Option<VertexId> {
        self.output_vertices.get(wire).copied()
    }

    /// The `pos`-th parameter at `v`.
    pub fn getparam(&self, v: VertexId, pos: usize) -> Option<&Param> {
        self.nodes.getparam(v, pos)
    }

    /// In-neighbors of `v` in wire order; repeated when joined by several
    /// wires. Empty for unknown vertices.
    pub fn predecessors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        let ports = self.nodes.get(v).map_or(&[][..], |n| n.in_ports());
        ports.iter().flatten().map(|p| p.vertex)
    }

    /// Out-neighbors of `v` in wire order; repeated when joined by several
    /// wires. Empty for unknown vertices.
    pub fn successors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        let ports = self.nodes.get(v).map_or(&[][..], |n| n.out_ports());
        ports.iter().flatten().map(|p| p.vertex)
    }

    /// Out-neighbors of `v` reached over a quantum wire.
    pub fn quantum_successors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        let ports = self
            .nodes
            .get(v)
            .map_or(&[][..], |n| &n.out_ports()[..n.num_qubits()]);
        ports.iter().flatten().map(|p| p.vertex)
    }

    /// In-neighbor of `v` on `wire`.
    pub fn in_neighbor(&self, v: VertexId, wire: WireId) -> IrResult<VertexId> {
        self.nodes.inneighborind(v, wire).map(|p| p.vertex)
    }

    /// Out-neighbor of `v` on `wire`.
    pub fn out_neighbor(&self, v: VertexId, wire: WireId) -> IrResult<VertexId> {
        self.nodes.outneighborind(v, wire).map(|p| p.vertex)
    }

    /// Vertices on `wire` from its Input to its Output vertex.
    ///
    /// Empty for a wire that does not exist.
    pub fn wire_vertices(&self, wire: WireId) -> WireVertices<'_> {
        match self.input_vertex(wire) {
            Some(init) => self.nodes.wire_vertices(wire, init),
            None => self.nodes.empty_wire(wire),
        }
    }

    /// Vertices on `wire` from `init` to the wire's Output vertex.
    pub fn wire_vertices_from(&self, wire: WireId, init: VertexId) -> WireVertices<'_> {
        self.nodes.wire_vertices(wire, init)
    }

    /// Elements on `wire` from Input to Output.
    pub fn wire_elements(&self, wire: WireId) -> impl Iterator<Item = Element> + '_ {
        self.wire_vertices(wire).map(|v| self.nodes.element(v))
    }

    /// Live vertices in a topological order.
    ///
    /// Sources are taken in id order; ties are otherwise unspecified.
    pub fn topological_vertices(&self) -> Vec<VertexId> {
        self.dag.topological_order(|v| !self.nodes.is_removed(v))
    }

    /// Node views in a topological order.
    pub fn topological_nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.nodes.nodes(self.topological_vertices())
    }

    /// A longest path, Input to Output, counting operation vertices.
    ///
    /// Empty when the circuit has no wires.
    pub fn longest_path(&self) -> Vec<VertexId> {
        let n = self.nodes.len();
        let mut dist = vec![0usize; n];
        let mut prev: Vec<Option<VertexId>> = vec![None; n];

        for v in self.topological_vertices() {
            let best = self.predecessors(v).max_by_key(|&p| dist[p]);
            let weight = usize::from(!self.nodes.element(v).is_io());
            dist[v] = best.map_or(0, |p| dist[p]) + weight;
            prev[v] = best;
        }

        let Some(end) = self.output_vertices.iter().copied().max_by_key(|&v| dist[v]) else {
            return Vec::new();
        };
        let mut path = vec![end];
        let mut current = end;
        while let Some(p) = prev[current] {
            path.push(p);
            current = p;
        }
        path.reverse();
        path
    }

    /// Element counts along [`Circuit::longest_path`], IO excluded.
    pub fn count_ops_longest_path(&self) -> BTreeMap<Element, usize> {
        self.count_ops_vertices(self.longest_path())
    }

    /// Number of operations on a longest path.
    pub fn depth(&self) -> usize {
        self.longest_path()
            .into_iter()
            .filter(|&v| !self.nodes.element(v).is_io())
            .count()
    }

    /// Element counts over `vertices`, IO excluded.
    pub fn count_ops_vertices(
        &self,
        vertices: impl IntoIterator<Item = VertexId>,
    ) -> BTreeMap<Element, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes.nodes(vertices) {
            if !node.is_io() && !node.is_removed() {
                *counts.entry(node.element()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Element counts over all operations.
    pub fn count_ops(&self) -> BTreeMap<Element, usize> {
        self.count_ops_vertices(0..self.nodes.len())
    }

    /// Number of operation vertices.
    pub fn count_op_elements(&self) -> usize {
        self.nodes
            .count_elements(|n| n.element().kind() == ElementKind::Operation)
    }

    /// Number of live vertices for which `pred` holds.
    pub fn count_elements<F>(&self, pred: F) -> usize
    where
        F: Fn(&NodeRef<'_>) -> bool,
    {
        self.nodes.count_elements(pred)
    }

    /// Number of groups of wires not joined by any multi-wire operation.
    ///
    /// Classical wires are counted like quantum wires.
    pub fn num_tensor_factors(&self) -> usize {
        let mut parent: Vec<WireId> = (0..self.num_wires()).collect();
        fn find(parent: &mut [WireId], mut w: WireId) -> WireId {
            while parent[w] != w {
                parent[w] = parent[parent[w]];
                w = parent[w];
            }
            w
        }
        for node in self.nodes.iter().filter(|n| !n.is_io()) {
            let wires = node.wires();
            for pair in wires.windows(2) {
                let (a, b) = (find(&mut parent, pair[0]), find(&mut parent, pair[1]));
                if a != b {
                    parent[a] = b;
                }
            }
        }
        (0..parent.len())
            .filter(|&w| find(&mut parent, w) == w)
            .count()
    }

    /// The parameter table.
    #[inline]
    pub fn param_table(&self) -> &ParamTable {
        &self.param_table
    }

    /// Symbolic parameters in use with their slots.
    pub fn param_map(&self) -> impl Iterator<Item = (&Param, &FxHashSet<ParamSlot>)> {
        self.param_table.iter()
    }

    /// Number of distinct symbolic parameter expressions in use.
    pub fn num_parameters(&self) -> usize {
        self.param_table.num_parameters()
    }

    // =========================================================================
    // Integrity
    // =========================================================================

    /// Verify that the parameter table matches the stored parameters.
    pub fn check_param_table(&self) -> IrResult<()> {
        self.param_table.check(&self.nodes)?;
        Ok(())
    }

    /// Verify every structural invariant of the circuit.
    ///
    /// Checks, in order:
    /// - one Input and one Output anchor per wire, carrying only that wire
    /// - per-vertex wire lists: quantum-first, in range, no repeats, non-empty
    /// - neighbor maps agree at both endpoints and with the graph edges
    /// - the graph is acyclic
    /// - each wire is a single path from its Input to its Output covering
    ///   every vertex that carries it
    /// - the parameter table
    #[allow(clippy::too_many_lines)]
    pub fn check(&self) -> IrResult<()> {
        let num_wires = self.num_wires();
        if self.input_vertices.len() != num_wires || self.output_vertices.len() != num_wires {
            return Err(IntegrityError::mismatch(
                "anchor count",
                num_wires,
                (self.input_vertices.len(), self.output_vertices.len()),
            )
            .into());
        }
        for wire in 0..num_wires {
            for (v, expected) in [
                (self.input_vertices[wire], Element::Input),
                (self.output_vertices[wire], Element::Output),
            ] {
                if !self.nodes.is_live(v) || self.nodes.element(v) != expected {
                    return Err(IntegrityError::new(format!("missing {expected} anchor"))
                        .at_vertex(v)
                        .on_wire(wire)
                        .into());
                }
                if self.nodes.wires(v) != [wire] {
                    return Err(IntegrityError::mismatch(
                        "anchor wires",
                        [wire],
                        self.nodes.wires(v),
                    )
                    .at_vertex(v)
                    .into());
                }
            }
        }

        let mut carried = vec![0usize; num_wires];
        let mut expected_edges = 0;
        for v in 0..self.nodes.len() {
            let node = self.nodes.node(v);
            if node.is_removed() {
                if !node.wires().is_empty()
                    || self.dag.in_degree(v) + self.dag.out_degree(v) != 0
                {
                    return Err(IntegrityError::new("removed vertex still wired")
                        .at_vertex(v)
                        .into());
                }
                continue;
            }
            if node.wires().is_empty() {
                return Err(IntegrityError::new("vertex carries no wires")
                    .at_vertex(v)
                    .into());
            }
            let mut seen = FxHashSet::default();
            for (i, &wire) in node.wires().iter().enumerate() {
                let quantum_slot = i < node.num_qubits();
                if wire >= num_wires || quantum_slot != self.is_quantum(wire) {
                    return Err(IntegrityError::new("wire list not quantum-first or out of range")
                        .at_vertex(v)
                        .on_wire(wire)
                        .into());
                }
                if !seen.insert(wire) {
                    return Err(IntegrityError::new("wire repeated on vertex")
                        .at_vertex(v)
                        .on_wire(wire)
                        .into());
                }
                carried[wire] += 1;
                self.check_ports(v, i, wire)?;
                if let Some(src) = node.in_ports()[i] {
                    expected_edges += 1;
                    if !self.dag.has_edge(src.vertex, v, wire) {
                        return Err(IntegrityError::mismatch(
                            "graph edge",
                            (src.vertex, v),
                            "none",
                        )
                        .at_vertex(v)
                        .on_wire(wire)
                        .into());
                    }
                }
            }
        }
        if self.dag.num_edges() != expected_edges {
            return Err(
                IntegrityError::mismatch("edge count", expected_edges, self.dag.num_edges()).into(),
            );
        }
        if self.dag.is_cyclic() {
            return Err(IntegrityError::new("graph contains a cycle").into());
        }

        for wire in 0..num_wires {
            let output = self.output_vertices[wire];
            let mut visited = 0;
            let mut last = None;
            for v in self.wire_vertices(wire) {
                visited += 1;
                last = Some(v);
                if visited > carried[wire] {
                    break;
                }
            }
            if last != Some(output) || visited != carried[wire] {
                return Err(IntegrityError::mismatch(
                    "path covering",
                    (carried[wire], output),
                    (visited, last),
                )
                .on_wire(wire)
                .into());
            }
        }

        self.check_param_table()
    }

    /// Neighbor maps at `(v, i)` must point back at `(v, i)` on the same wire.
    fn check_ports(&self, v: VertexId, i: usize, wire: WireId) -> IrResult<()> {
        let element = self.nodes.element(v);
        let here = Some(Port::new(v, i));
        let sides = [
            (self.nodes.in_port(v, i), element == Element::Input, "in-neighbor"),
            (self.nodes.out_port(v, i), element == Element::Output, "out-neighbor"),
        ];
        for (side, (port, is_end, what)) in sides.into_iter().enumerate() {
            let port = match (port, is_end) {
                (None, true) => continue,
                (Some(port), false) => port,
                (found, _) => {
                    return Err(IntegrityError::new(format!("{what} presence: found {found:?}"))
                        .at_vertex(v)
                        .on_wire(wire)
                        .into());
                }
            };
            if !self.nodes.is_live(port.vertex)
                || self.nodes.wires(port.vertex).get(port.index) != Some(&wire)
            {
                return Err(IntegrityError::mismatch(what, wire, port)
                    .at_vertex(v)
                    .on_wire(wire)
                    .into());
            }
            let back = if side == 0 {
                self.nodes.out_port(port.vertex, port.index)
            } else {
                self.nodes.in_port(port.vertex, port.index)
            };
            if back != here {
                return Err(IntegrityError::mismatch(what, here, back)
                    .at_vertex(port.vertex)
                    .on_wire(wire)
                    .into());
            }
        }
        Ok(())
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "circuit {{nq={}, ncl={}, nv={}, ne={}}}",
            self.nqubits,
            self.nclbits,
            self.num_vertices(),
            self.num_edges()
        )
    }
}
