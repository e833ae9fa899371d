//! Index from symbolic parameters to where they occur.
//!
//! Every distinct symbolic [`Param`] is interned to a dense id on first
//! sight; each id owns the set of `(vertex, position)` slots that currently
//! hold it. A reverse index from vertex to its `(position, id)` pairs keeps
//! [`ParamTable::purge`] proportional to the vertex's own parameters.
//! Numeric parameters are never registered.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::IntegrityError;
use crate::node::{NodeArray, VertexId};
use crate::parameter::Param;

/// Dense id of an interned parameter.
pub type ParamId = usize;

/// A parameter slot: vertex and position in its parameter list.
pub type ParamSlot = (VertexId, usize);

/// Symbolic parameter to occurrence index.
#[derive(Debug, Clone, Default)]
pub struct ParamTable {
    ids: FxHashMap<Param, ParamId>,
    params: Vec<Param>,
    occurrences: Vec<FxHashSet<ParamSlot>>,
    by_vertex: FxHashMap<VertexId, Vec<(usize, ParamId)>>,
}

impl ParamTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from all symbolic parameters in `nodes`.
    pub fn from_nodes(nodes: &NodeArray) -> Self {
        let mut table = Self::new();
        for node in nodes.iter() {
            for (pos, param) in node.params().iter().enumerate() {
                table.register(node.id(), pos, param);
            }
        }
        table
    }

    /// Record that `param` sits at `(vertex, position)`.
    ///
    /// Returns `false` and records nothing if `param` is numeric.
    pub fn register(&mut self, vertex: VertexId, position: usize, param: &Param) -> bool {
        if !param.is_symbolic() {
            return false;
        }
        let id = match self.ids.get(param) {
            Some(&id) => id,
            None => {
                let id = self.params.len();
                self.ids.insert(param.clone(), id);
                self.params.push(param.clone());
                self.occurrences.push(FxHashSet::default());
                id
            }
        };
        if self.occurrences[id].insert((vertex, position)) {
            self.by_vertex.entry(vertex).or_default().push((position, id));
        }
        true
    }

    /// Drop the occurrence of `param` at `(vertex, position)`.
    pub fn unregister(&mut self, vertex: VertexId, position: usize, param: &Param) -> bool {
        let Some(&id) = self.ids.get(param) else {
            return false;
        };
        if !self.occurrences[id].remove(&(vertex, position)) {
            return false;
        }
        if let Some(entries) = self.by_vertex.get_mut(&vertex) {
            entries.retain(|&entry| entry != (position, id));
            if entries.is_empty() {
                self.by_vertex.remove(&vertex);
            }
        }
        true
    }

    /// Drop every occurrence located on `vertex`.
    pub fn purge(&mut self, vertex: VertexId) {
        for (position, id) in self.by_vertex.remove(&vertex).unwrap_or_default() {
            self.occurrences[id].remove(&(vertex, position));
        }
    }

    /// `(position, parameter)` pairs indexed on `vertex`.
    pub fn on_vertex(&self, vertex: VertexId) -> impl Iterator<Item = (usize, &Param)> + '_ {
        self.by_vertex
            .get(&vertex)
            .into_iter()
            .flatten()
            .map(move |&(position, id)| (position, &self.params[id]))
    }

    /// Occurrences of `param`, if it was ever registered.
    pub fn occurrences(&self, param: &Param) -> Option<&FxHashSet<ParamSlot>> {
        self.ids.get(param).map(|&id| &self.occurrences[id])
    }

    /// Interned id of `param`.
    pub fn id(&self, param: &Param) -> Option<ParamId> {
        self.ids.get(param).copied()
    }

    /// Parameters that currently occur somewhere, with their slots.
    pub fn iter(&self) -> impl Iterator<Item = (&Param, &FxHashSet<ParamSlot>)> {
        self.params
            .iter()
            .zip(&self.occurrences)
            .filter(|(_, slots)| !slots.is_empty())
    }

    /// Number of distinct symbolic parameters that currently occur.
    pub fn num_parameters(&self) -> usize {
        self.occurrences.iter().filter(|s| !s.is_empty()).count()
    }

    /// Verify that the table and the stored parameters agree in both
    /// directions.
    pub fn check(&self, nodes: &NodeArray) -> Result<(), IntegrityError> {
        for (param, slots) in self.iter() {
            for &(v, pos) in slots {
                if !nodes.is_live(v) {
                    return Err(IntegrityError::new(format!(
                        "parameter {param} indexed on a missing vertex"
                    ))
                    .at_vertex(v));
                }
                match nodes.getparam(v, pos) {
                    Some(found) if found == param => {}
                    found => {
                        return Err(IntegrityError::mismatch(
                            &format!("parameter at position {pos}"),
                            Some(param),
                            found,
                        )
                        .at_vertex(v));
                    }
                }
            }
        }

        let slots: usize = self.occurrences.iter().map(FxHashSet::len).sum();
        let reverse: usize = self.by_vertex.values().map(Vec::len).sum();
        if slots != reverse {
            return Err(IntegrityError::mismatch("reverse parameter index size", slots, reverse));
        }
        for (&v, entries) in &self.by_vertex {
            if let Some(&(pos, id)) = entries
                .iter()
                .find(|&&(pos, id)| !self.occurrences[id].contains(&(v, pos)))
            {
                return Err(IntegrityError::new(format!(
                    "parameter {} at position {pos} stale in reverse index",
                    self.params[id]
                ))
                .at_vertex(v));
            }
        }

        for node in nodes.iter() {
            for (pos, param) in node.params().iter().enumerate() {
                if !param.is_symbolic() {
                    continue;
                }
                let indexed = self
                    .occurrences(param)
                    .is_some_and(|slots| slots.contains(&(node.id(), pos)));
                if !indexed {
                    return Err(IntegrityError::new(format!(
                        "parameter {param} at position {pos} missing from table"
                    ))
                    .at_vertex(node.id()));
                }
            }
        }
        Ok(())
    }

    /// Rewrite vertex ids through `remap`, dropping unmapped slots.
    pub(crate) fn remap(&mut self, remap: &[Option<VertexId>]) {
        for slots in &mut self.occurrences {
            *slots = slots
                .iter()
                .filter_map(|&(v, pos)| remap.get(v).copied().flatten().map(|nv| (nv, pos)))
                .collect();
        }
        self.by_vertex = std::mem::take(&mut self.by_vertex)
            .into_iter()
            .filter_map(|(v, entries)| remap.get(v).copied().flatten().map(|nv| (nv, entries)))
            .collect();
    }
}
