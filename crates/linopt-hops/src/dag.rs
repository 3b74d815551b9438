//! Arena-backed hop DAG with consistent edge editing.
//!
//! ## Edges
//!
//! Every input edge `parent.inputs[slot] == child` is mirrored by one entry of
//! `parent` in `child.parents`. A parent holding the same child in two slots
//! is listed twice. All edits go through this module and keep the two sides
//! in sync; an edit that finds them out of sync fails with a structural
//! [`HopsError`] before touching anything.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::errors::HopsError;
use crate::hop::{Dims, Hop, HopId, HopKind, VisitStatus};
use crate::literal::LiteralValue;
use crate::types::{DataOpType, DataType, OpOp1, OpOp2, ValueType};

/// Owner of all hops of one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct HopDag {
    hops: Vec<Hop>,
}

impl HopDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hops ever allocated, including detached ones.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Look up a hop.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this DAG. Use [`HopDag::get`] for a
    /// checked lookup.
    pub fn hop(&self, id: HopId) -> &Hop {
        &self.hops[id.index()]
    }

    pub fn get(&self, id: HopId) -> Result<&Hop, HopsError> {
        self.hops.get(id.index()).ok_or(HopsError::InvalidHop(id))
    }

    fn get_mut(&mut self, id: HopId) -> Result<&mut Hop, HopsError> {
        self.hops.get_mut(id.index()).ok_or(HopsError::InvalidHop(id))
    }

    /// Unchecked edge access for corrupting DAGs in tests.
    #[cfg(test)]
    pub(crate) fn hop_mut(&mut self, id: HopId) -> &mut Hop {
        &mut self.hops[id.index()]
    }

    pub fn hops(&self) -> impl Iterator<Item = &Hop> {
        self.hops.iter()
    }

    pub fn literal_value(&self, id: HopId) -> Result<&LiteralValue, HopsError> {
        self.get(id)?
            .literal_value()
            .ok_or(HopsError::NotALiteral(id))
    }

    pub fn is_literal(&self, id: HopId) -> bool {
        self.get(id).map(Hop::is_literal).unwrap_or(false)
    }

    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    fn push(
        &mut self,
        kind: HopKind,
        value_type: ValueType,
        data_type: DataType,
        inputs: &[HopId],
    ) -> HopId {
        let id = HopId::from_index(self.hops.len());
        for input in inputs {
            self.hops[input.index()].parents.push(id);
        }
        self.hops.push(Hop {
            id,
            name: Hop::default_name(&kind),
            kind,
            value_type,
            data_type,
            dims: Dims::for_data_type(data_type),
            inputs: SmallVec::from_slice(inputs),
            parents: SmallVec::new(),
            visit: VisitStatus::NotVisited,
        });
        id
    }

    /// Add a scalar literal hop.
    pub fn literal(&mut self, value: impl Into<LiteralValue>) -> HopId {
        let value = value.into();
        let value_type = value.value_type();
        self.push(HopKind::Literal(value), value_type, DataType::Scalar, &[])
    }

    /// Add a unary operator hop.
    ///
    /// # Panics
    ///
    /// Panics if `input` was not allocated by this DAG.
    pub fn unary(
        &mut self,
        op: OpOp1,
        value_type: ValueType,
        data_type: DataType,
        input: HopId,
    ) -> HopId {
        self.push(HopKind::Unary(op), value_type, data_type, &[input])
    }

    /// Add a binary operator hop.
    ///
    /// # Panics
    ///
    /// Panics if an operand was not allocated by this DAG.
    pub fn binary(
        &mut self,
        op: OpOp2,
        value_type: ValueType,
        data_type: DataType,
        left: HopId,
        right: HopId,
    ) -> HopId {
        self.push(HopKind::Binary(op), value_type, data_type, &[left, right])
    }

    /// Add a read of a live variable.
    pub fn transient_read(
        &mut self,
        var: &str,
        value_type: ValueType,
        data_type: DataType,
    ) -> HopId {
        let kind = HopKind::Data {
            op: DataOpType::TransientRead,
            var: var.to_string(),
        };
        self.push(kind, value_type, data_type, &[])
    }

    /// Add a write of `input` into a live variable; types follow the input.
    pub fn transient_write(&mut self, var: &str, input: HopId) -> HopId {
        let (value_type, data_type) = {
            let hop = self.hop(input);
            (hop.value_type, hop.data_type)
        };
        let kind = HopKind::Data {
            op: DataOpType::TransientWrite,
            var: var.to_string(),
        };
        self.push(kind, value_type, data_type, &[input])
    }

    // ---------------------------------------------------------------------
    // Edge edits
    // ---------------------------------------------------------------------

    fn input_at(&self, parent: HopId, slot: usize) -> Result<HopId, HopsError> {
        let hop = self.get(parent)?;
        hop.inputs
            .get(slot)
            .copied()
            .ok_or(HopsError::SlotOutOfRange {
                hop: parent,
                slot,
                len: hop.inputs.len(),
            })
    }

    fn back_reference_position(&self, child: HopId, parent: HopId) -> Result<usize, HopsError> {
        self.get(child)?
            .parents
            .iter()
            .position(|&p| p == parent)
            .ok_or(HopsError::MissingBackReference { child, parent })
    }

    /// Insert `child` at `parent.inputs[slot]`, shifting later inputs right.
    pub fn add_child_reference(
        &mut self,
        parent: HopId,
        child: HopId,
        slot: usize,
    ) -> Result<(), HopsError> {
        self.get(child)?;
        let hop = self.get_mut(parent)?;
        if slot > hop.inputs.len() {
            return Err(HopsError::SlotOutOfRange {
                hop: parent,
                slot,
                len: hop.inputs.len(),
            });
        }
        hop.inputs.insert(slot, child);
        self.hops[child.index()].parents.push(parent);
        Ok(())
    }

    /// Remove the input at `slot` and its back-reference; returns the former child.
    pub fn remove_child_reference(&mut self, parent: HopId, slot: usize) -> Result<HopId, HopsError> {
        let child = self.input_at(parent, slot)?;
        let pos = self.back_reference_position(child, parent)?;
        self.hops[parent.index()].inputs.remove(slot);
        self.hops[child.index()].parents.remove(pos);
        Ok(child)
    }

    /// Substitute the input at `slot` with `new_child`; returns the former child.
    ///
    /// All checks run before the edit, so a failure leaves the DAG untouched.
    pub fn replace_child_reference(
        &mut self,
        parent: HopId,
        slot: usize,
        new_child: HopId,
    ) -> Result<HopId, HopsError> {
        self.get(new_child)?;
        let old = self.input_at(parent, slot)?;
        let pos = self.back_reference_position(old, parent)?;
        if old == new_child {
            return Ok(old);
        }
        self.hops[old.index()].parents.remove(pos);
        self.hops[parent.index()].inputs[slot] = new_child;
        self.hops[new_child.index()].parents.push(parent);
        Ok(old)
    }

    /// Point every parent slot that references `old` at `new` instead.
    ///
    /// Returns the number of rewritten slots. On return `old` has no parents.
    pub fn replace_in_parents(&mut self, old: HopId, new: HopId) -> Result<usize, HopsError> {
        self.get(new)?;
        let hop = self.get(old)?;

        let mut distinct: SmallVec<[HopId; 4]> = SmallVec::new();
        for &parent in &hop.parents {
            if !distinct.contains(&parent) {
                distinct.push(parent);
            }
        }

        let mut edits: SmallVec<[(HopId, usize); 4]> = SmallVec::new();
        for &parent in &distinct {
            let back_refs = hop.parents.iter().filter(|&&p| p == parent).count();
            let before = edits.len();
            for (slot, &input) in self.get(parent)?.inputs.iter().enumerate() {
                if input == old {
                    edits.push((parent, slot));
                }
            }
            let inputs = edits.len() - before;
            if inputs == 0 {
                return Err(HopsError::DanglingParent { hop: old, parent });
            }
            if inputs != back_refs {
                return Err(HopsError::BackReferenceMismatch {
                    hop: old,
                    parent,
                    inputs,
                    back_refs,
                });
            }
        }

        if old == new {
            return Ok(0);
        }
        for &(parent, slot) in &edits {
            self.replace_child_reference(parent, slot, new)?;
        }
        Ok(edits.len())
    }

    /// Remove all inputs of `id`, returning them in slot order.
    pub fn detach_inputs(&mut self, id: HopId) -> Result<SmallVec<[HopId; 2]>, HopsError> {
        let len = self.get(id)?.inputs.len();
        let mut removed = SmallVec::with_capacity(len);
        for slot in (0..len).rev() {
            removed.push(self.remove_child_reference(id, slot)?);
        }
        removed.reverse();
        Ok(removed)
    }

    // ---------------------------------------------------------------------
    // Traversal support
    // ---------------------------------------------------------------------

    pub fn set_visit_status(&mut self, id: HopId, status: VisitStatus) -> Result<(), HopsError> {
        self.get_mut(id)?.visit = status;
        Ok(())
    }

    /// Mark every hop reachable from `roots` as not visited.
    pub fn reset_visit_status(&mut self, roots: &[HopId]) -> Result<(), HopsError> {
        for id in self.reachable(roots)? {
            self.hops[id.index()].visit = VisitStatus::NotVisited;
        }
        Ok(())
    }

    /// Hops reachable from `roots`, each listed once in post-order.
    ///
    /// Fails on foreign handles and on cycles.
    pub fn reachable(&self, roots: &[HopId]) -> Result<Vec<HopId>, HopsError> {
        let mut order = Vec::new();
        let mut seen: FxHashSet<HopId> = FxHashSet::default();
        let mut on_stack: FxHashSet<HopId> = FxHashSet::default();
        let mut stack: Vec<(HopId, usize)> = Vec::new();

        for &root in roots {
            self.get(root)?;
            if !seen.insert(root) {
                continue;
            }
            on_stack.insert(root);
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (id, next) = *frame;
                let hop = &self.hops[id.index()];
                if next < hop.inputs.len() {
                    frame.1 += 1;
                    let child = hop.inputs[next];
                    self.get(child)?;
                    if on_stack.contains(&child) {
                        return Err(HopsError::Cycle(child));
                    }
                    if seen.insert(child) {
                        on_stack.insert(child);
                        stack.push((child, 0));
                    }
                } else {
                    on_stack.remove(&id);
                    order.push(id);
                    stack.pop();
                }
            }
        }
        Ok(order)
    }
}
