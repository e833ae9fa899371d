//! Columnar storage of per-vertex data.
//!
//! [`NodeArray`] keeps one column per attribute, all indexed by the dense
//! vertex id: the element tag, the parameters, the incident wires (quantum
//! wires first), and for every incident wire the port of the in-neighbor and
//! of the out-neighbor on that wire. Bulk scans touch only the columns they
//! read.
//!
//! A removed vertex is tombstoned: its record stays in place with the wire
//! list and neighbor maps cleared, so vertex ids never move unless the owner
//! explicitly compacts.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ParamElement};
use crate::error::{IrError, IrResult};
use crate::parameter::Param;

/// Dense vertex index.
pub type VertexId = usize;

/// Wire index. Quantum wires precede classical wires.
pub type WireId = usize;

/// One end of a wire segment: a vertex and the position of the wire in that
/// vertex's wire list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Port {
    /// The vertex.
    pub vertex: VertexId,
    /// Position of the wire in the vertex's wire list.
    pub index: usize,
}

impl Port {
    /// Create a port.
    #[inline]
    pub fn new(vertex: VertexId, index: usize) -> Self {
        Self { vertex, index }
    }
}

/// Struct-of-arrays storage for circuit nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeArray {
    elements: Vec<Element>,
    params: Vec<Option<Vec<Param>>>,
    wires: Vec<Vec<WireId>>,
    num_qu_wires: Vec<usize>,
    in_ports: Vec<Vec<Option<Port>>>,
    out_ports: Vec<Vec<Option<Port>>>,
    removed: Vec<bool>,
}

impl NodeArray {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records, tombstones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether there are no records at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a record and return its vertex id.
    ///
    /// The wire list is `wires` followed by `clwires`. Neighbor maps start
    /// unset; the caller splices the vertex into its wires.
    pub fn append(
        &mut self,
        element: Element,
        params: Option<Vec<Param>>,
        wires: &[WireId],
        clwires: &[WireId],
    ) -> VertexId {
        let id = self.elements.len();
        let mut all = Vec::with_capacity(wires.len() + clwires.len());
        all.extend_from_slice(wires);
        all.extend_from_slice(clwires);
        let n = all.len();

        self.elements.push(element);
        self.params.push(params);
        self.wires.push(all);
        self.num_qu_wires.push(wires.len());
        self.in_ports.push(vec![None; n]);
        self.out_ports.push(vec![None; n]);
        self.removed.push(false);
        id
    }

    /// Whether `id` names a record that has not been removed.
    #[inline]
    pub fn is_live(&self, id: VertexId) -> bool {
        id < self.len() && !self.removed[id]
    }

    /// Whether `id` names a tombstoned record.
    #[inline]
    pub fn is_removed(&self, id: VertexId) -> bool {
        self.removed.get(id).copied().unwrap_or(false)
    }

    /// Borrowed view of a single record, or `None` if out of range.
    #[inline]
    pub fn get(&self, id: VertexId) -> Option<NodeRef<'_>> {
        (id < self.len()).then_some(NodeRef { nodes: self, id })
    }

    /// Borrowed view of a single record.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn node(&self, id: VertexId) -> NodeRef<'_> {
        assert!(id < self.len(), "vertex {id} out of range");
        NodeRef { nodes: self, id }
    }

    /// Borrowed views of several records, in the order given.
    pub fn nodes<'a>(
        &'a self,
        ids: impl IntoIterator<Item = VertexId> + 'a,
    ) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        ids.into_iter().filter_map(move |id| self.get(id))
    }

    /// All live records in vertex order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.len())
            .filter(move |&id| !self.removed[id])
            .map(move |id| NodeRef { nodes: self, id })
    }

    /// Element tag of a record.
    #[inline]
    pub fn element(&self, id: VertexId) -> Element {
        self.elements[id]
    }

    /// Wires of a record, quantum wires first.
    #[inline]
    pub fn wires(&self, id: VertexId) -> &[WireId] {
        &self.wires[id]
    }

    /// Number of quantum wires of a record.
    #[inline]
    pub fn num_qu_wires(&self, id: VertexId) -> usize {
        self.num_qu_wires[id]
    }

    /// Parameters of a record, empty if it has none.
    #[inline]
    pub fn params(&self, id: VertexId) -> &[Param] {
        self.params[id].as_deref().unwrap_or(&[])
    }

    /// The `pos`-th parameter of a record.
    pub fn getparam(&self, id: VertexId, pos: usize) -> Option<&Param> {
        self.params.get(id)?.as_ref()?.get(pos)
    }

    /// Replace the `pos`-th parameter of a record, returning the old value.
    pub fn set_param(&mut self, id: VertexId, pos: usize, param: Param) -> Option<Param> {
        let slot = self.params.get_mut(id)?.as_mut()?.get_mut(pos)?;
        Some(std::mem::replace(slot, param))
    }

    /// Position of `wire` in the wire list of `id`.
    pub fn wireind(&self, id: VertexId, wire: WireId) -> IrResult<usize> {
        self.wires
            .get(id)
            .and_then(|ws| ws.iter().position(|&w| w == wire))
            .ok_or(IrError::NotFound { vertex: id, wire })
    }

    /// Port of the in-neighbor of `id` on `wire`.
    pub fn inneighborind(&self, id: VertexId, wire: WireId) -> IrResult<Port> {
        let i = self.wireind(id, wire)?;
        self.in_ports[id][i].ok_or(IrError::InvalidVertex {
            vertex: id,
            reason: "input vertex has no in-neighbor",
        })
    }

    /// Port of the out-neighbor of `id` on `wire`.
    pub fn outneighborind(&self, id: VertexId, wire: WireId) -> IrResult<Port> {
        let i = self.wireind(id, wire)?;
        self.out_ports[id][i].ok_or(IrError::InvalidVertex {
            vertex: id,
            reason: "output vertex has no out-neighbor",
        })
    }

    /// In-neighbor port at wire position `index` of `id`.
    #[inline]
    pub fn in_port(&self, id: VertexId, index: usize) -> Option<Port> {
        self.in_ports[id][index]
    }

    /// Out-neighbor port at wire position `index` of `id`.
    #[inline]
    pub fn out_port(&self, id: VertexId, index: usize) -> Option<Port> {
        self.out_ports[id][index]
    }

    /// All in-neighbor ports of `id`, in wire order.
    #[inline]
    pub fn in_ports(&self, id: VertexId) -> &[Option<Port>] {
        &self.in_ports[id]
    }

    /// All out-neighbor ports of `id`, in wire order.
    #[inline]
    pub fn out_ports(&self, id: VertexId) -> &[Option<Port>] {
        &self.out_ports[id]
    }

    /// Set the in-neighbor of `id` on `wire`.
    ///
    /// Only this endpoint is written; keeping the opposite endpoint in
    /// agreement is the caller's job.
    pub fn setinwireind(&mut self, id: VertexId, wire: WireId, neighbor: Port) -> IrResult<()> {
        let i = self.wireind(id, wire)?;
        self.in_ports[id][i] = Some(neighbor);
        Ok(())
    }

    /// Set the out-neighbor of `id` on `wire`.
    ///
    /// Only this endpoint is written; keeping the opposite endpoint in
    /// agreement is the caller's job.
    pub fn setoutwireind(&mut self, id: VertexId, wire: WireId, neighbor: Port) -> IrResult<()> {
        let i = self.wireind(id, wire)?;
        self.out_ports[id][i] = Some(neighbor);
        Ok(())
    }

    #[inline]
    pub(crate) fn set_in_port(&mut self, at: Port, neighbor: Option<Port>) {
        self.in_ports[at.vertex][at.index] = neighbor;
    }

    #[inline]
    pub(crate) fn set_out_port(&mut self, at: Port, neighbor: Option<Port>) {
        self.out_ports[at.vertex][at.index] = neighbor;
    }

    /// Connect every in-neighbor of `id` directly to the out-neighbor on the
    /// same wire, keeping the neighbors' port indices.
    ///
    /// The maps of `id` itself are left untouched.
    pub fn rewire_across(&mut self, id: VertexId) -> IrResult<()> {
        if !self.is_live(id) {
            return Err(IrError::InvalidVertex {
                vertex: id,
                reason: "vertex is out of range or removed",
            });
        }
        if self.elements[id].is_io() {
            return Err(IrError::InvalidVertex {
                vertex: id,
                reason: "cannot rewire across a wire anchor",
            });
        }
        for i in 0..self.wires[id].len() {
            let (Some(src), Some(dst)) = (self.in_ports[id][i], self.out_ports[id][i]) else {
                return Err(IrError::InvalidVertex {
                    vertex: id,
                    reason: "vertex is not spliced into all of its wires",
                });
            };
            self.out_ports[src.vertex][src.index] = Some(dst);
            self.in_ports[dst.vertex][dst.index] = Some(src);
        }
        Ok(())
    }

    /// Clear a record in place. Its id stays allocated.
    pub fn tombstone(&mut self, id: VertexId) {
        self.params[id] = None;
        self.wires[id].clear();
        self.num_qu_wires[id] = 0;
        self.in_ports[id].clear();
        self.out_ports[id].clear();
        self.removed[id] = true;
    }

    /// Ordered vertices on `wire` starting at `init`, up to and including
    /// the wire's Output vertex.
    ///
    /// Empty when `init` does not carry `wire`.
    pub fn wire_vertices(&self, wire: WireId, init: VertexId) -> WireVertices<'_> {
        WireVertices {
            nodes: self,
            wire,
            next: self.wireind(init, wire).is_ok().then_some(init),
        }
    }

    pub(crate) fn empty_wire(&self, wire: WireId) -> WireVertices<'_> {
        WireVertices {
            nodes: self,
            wire,
            next: None,
        }
    }

    /// Lazy view of the live records for which `pred` holds.
    ///
    /// The predicate receives a [`NodeRef`]; only the columns it reads are
    /// touched.
    pub fn find_nodes<F>(&self, pred: F) -> impl Iterator<Item = NodeRef<'_>>
    where
        F: Fn(&NodeRef<'_>) -> bool,
    {
        self.iter().filter(move |n| pred(n))
    }

    /// Operations acting on exactly `n` qubits.
    pub fn n_qubit_ops(&self, n: usize) -> impl Iterator<Item = NodeRef<'_>> {
        self.find_nodes(move |node| node.num_qubits() == n && !node.is_io())
    }

    /// Operations acting on exactly one qubit.
    pub fn one_qubit_ops(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.n_qubit_ops(1)
    }

    /// Operations acting on exactly two qubits.
    pub fn two_qubit_ops(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.n_qubit_ops(2)
    }

    /// Operations acting on two or more qubits.
    pub fn multi_qubit_ops(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.find_nodes(|node| node.num_qubits() >= 2 && !node.is_io())
    }

    /// Records whose element is one of `names`.
    pub fn named_nodes<'a>(&'a self, names: &'a [Element]) -> impl Iterator<Item = NodeRef<'a>> {
        self.find_nodes(move |node| names.contains(&node.element()))
    }

    /// Count live records for which `pred` holds.
    pub fn count_elements<F>(&self, pred: F) -> usize
    where
        F: Fn(&NodeRef<'_>) -> bool,
    {
        self.find_nodes(pred).count()
    }

    /// Copy of the storage with tombstones dropped.
    ///
    /// `remap[old]` holds the new id of every live record. Ports are
    /// rewritten through the same map.
    pub(crate) fn compacted(&self, remap: &[Option<VertexId>]) -> NodeArray {
        let mut out = NodeArray::new();
        let map_port = |p: &Option<Port>| {
            p.and_then(|p| remap[p.vertex].map(|vertex| Port::new(vertex, p.index)))
        };
        for old in self.iter().map(|n| n.id()) {
            out.elements.push(self.elements[old]);
            out.params.push(self.params[old].clone());
            out.wires.push(self.wires[old].clone());
            out.num_qu_wires.push(self.num_qu_wires[old]);
            out.in_ports
                .push(self.in_ports[old].iter().map(map_port).collect());
            out.out_ports
                .push(self.out_ports[old].iter().map(map_port).collect());
            out.removed.push(false);
        }
        out
    }
}

/// Borrowed view of one record in a [`NodeArray`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    nodes: &'a NodeArray,
    id: VertexId,
}

impl<'a> NodeRef<'a> {
    /// Vertex id of the record.
    #[inline]
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Element tag.
    #[inline]
    pub fn element(&self) -> Element {
        self.nodes.elements[self.id]
    }

    /// Parameters, empty if there are none.
    #[inline]
    pub fn params(&self) -> &'a [Param] {
        self.nodes.params(self.id)
    }

    /// Element and parameters, cloned.
    pub fn param_element(&self) -> ParamElement {
        ParamElement {
            element: self.element(),
            params: self.nodes.params[self.id].clone(),
        }
    }

    /// All wires, quantum first.
    #[inline]
    pub fn wires(&self) -> &'a [WireId] {
        self.nodes.wires(self.id)
    }

    /// Quantum wires.
    #[inline]
    pub fn quantum_wires(&self) -> &'a [WireId] {
        &self.wires()[..self.num_qubits()]
    }

    /// Classical wires.
    #[inline]
    pub fn classical_wires(&self) -> &'a [WireId] {
        &self.wires()[self.num_qubits()..]
    }

    /// Number of quantum wires.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.nodes.num_qu_wires[self.id]
    }

    /// Number of classical wires.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.wires().len() - self.num_qubits()
    }

    /// Quantum and classical wire counts.
    #[inline]
    pub fn num_qu_cl_bits(&self) -> (usize, usize) {
        (self.num_qubits(), self.num_clbits())
    }

    /// In-neighbor ports, in wire order.
    #[inline]
    pub fn in_ports(&self) -> &'a [Option<Port>] {
        self.nodes.in_ports(self.id)
    }

    /// Out-neighbor ports, in wire order.
    #[inline]
    pub fn out_ports(&self) -> &'a [Option<Port>] {
        self.nodes.out_ports(self.id)
    }

    /// Whether the record is an Input or Output anchor.
    #[inline]
    pub fn is_io(&self) -> bool {
        self.element().is_io()
    }

    /// Whether the record has been removed.
    #[inline]
    pub fn is_removed(&self) -> bool {
        self.nodes.removed[self.id]
    }
}

/// Iterator over the vertices of one wire. See [`NodeArray::wire_vertices`].
#[derive(Debug, Clone)]
pub struct WireVertices<'a> {
    nodes: &'a NodeArray,
    wire: WireId,
    next: Option<VertexId>,
}

impl Iterator for WireVertices<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        let current = self.next?;
        self.next = self
            .nodes
            .wireind(current, self.wire)
            .ok()
            .and_then(|i| self.nodes.out_port(current, i))
            .map(|p| p.vertex);
        Some(current)
    }
}

/// Split a quantum-first wire list into its quantum and classical parts.
pub fn unpack_wires(wires: &[WireId], nqubits: usize) -> (&[WireId], &[WireId]) {
    let split = wires.iter().position(|&w| w >= nqubits).unwrap_or(wires.len());
    wires.split_at(split)
}
