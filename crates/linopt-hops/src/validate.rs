//! Structural validation of hop DAGs.

use crate::dag::HopDag;
use crate::errors::HopsError;
use crate::hop::HopId;

impl HopDag {
    /// Check the DAG invariants on everything reachable from `roots`.
    ///
    /// - every handle belongs to this DAG and there is no cycle
    /// - each input edge has exactly as many back-references as slots
    /// - each back-reference points at a parent that still holds the hop
    ///
    /// Returns the first violation found, naming the offending hop.
    pub fn validate(&self, roots: &[HopId]) -> Result<(), HopsError> {
        for id in self.reachable(roots)? {
            let hop = self.hop(id);

            for &child in hop.inputs() {
                let inputs = hop.inputs().iter().filter(|&&c| c == child).count();
                let back_refs = self
                    .get(child)?
                    .parents()
                    .iter()
                    .filter(|&&p| p == id)
                    .count();
                if back_refs == 0 {
                    return Err(HopsError::MissingBackReference { child, parent: id });
                }
                if inputs != back_refs {
                    return Err(HopsError::BackReferenceMismatch {
                        hop: child,
                        parent: id,
                        inputs,
                        back_refs,
                    });
                }
            }

            for &parent in hop.parents() {
                let holds = self
                    .get(parent)
                    .map_err(|_| HopsError::DanglingParent { hop: id, parent })?
                    .inputs()
                    .contains(&id);
                if !holds {
                    return Err(HopsError::DanglingParent { hop: id, parent });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::dag::HopDag;
    use crate::errors::HopsError;
    use crate::hop::HopId;
    use crate::types::{DataType, OpOp2, ValueType};

    #[test]
    fn well_formed_dag_passes() {
        let mut dag = HopDag::new();
        let a = dag.literal(2i64);
        let b = dag.literal(3i64);
        let s = dag.binary(OpOp2::Plus, ValueType::Int, DataType::Scalar, a, a);
        let p = dag.binary(OpOp2::Mult, ValueType::Int, DataType::Scalar, s, b);
        dag.validate(&[p]).unwrap();
    }

    #[test]
    fn dangling_parent_is_reported() {
        let mut dag = HopDag::new();
        let a = dag.literal(2i64);
        let b = dag.literal(3i64);
        let p = dag.binary(OpOp2::Plus, ValueType::Int, DataType::Scalar, a, b);
        let q = dag.literal(7i64);
        dag.hop_mut(b).parents.push(q);

        assert_eq!(
            dag.validate(&[p]),
            Err(HopsError::DanglingParent { hop: b, parent: q })
        );
    }

    #[test]
    fn missing_back_reference_is_reported() {
        let mut dag = HopDag::new();
        let a = dag.literal(2i64);
        let b = dag.literal(3i64);
        let p = dag.binary(OpOp2::Plus, ValueType::Int, DataType::Scalar, a, b);
        dag.hop_mut(a).parents.clear();

        assert_eq!(
            dag.validate(&[p]),
            Err(HopsError::MissingBackReference { child: a, parent: p })
        );
    }

    #[test]
    fn slot_multiplicity_must_match() {
        let mut dag = HopDag::new();
        let a = dag.literal(2i64);
        let p = dag.binary(OpOp2::Plus, ValueType::Int, DataType::Scalar, a, a);
        dag.hop_mut(a).parents.pop();

        assert_eq!(
            dag.validate(&[p]),
            Err(HopsError::BackReferenceMismatch {
                hop: a,
                parent: p,
                inputs: 2,
                back_refs: 1,
            })
        );
    }

    #[test]
    fn cycles_and_foreign_roots_are_rejected() {
        let mut dag = HopDag::new();
        let a = dag.literal(2i64);
        let b = dag.literal(3i64);
        let p = dag.binary(OpOp2::Plus, ValueType::Int, DataType::Scalar, a, b);
        dag.add_child_reference(a, p, 0).unwrap();

        assert!(matches!(dag.validate(&[p]), Err(HopsError::Cycle(_))));
        assert!(matches!(
            dag.validate(&[HopId(99)]),
            Err(HopsError::InvalidHop(_))
        ));
    }
}
