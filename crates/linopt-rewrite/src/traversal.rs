//! Post-order rewriting of hop DAGs.
//!
//! A [`PostOrderTraversal`] walks the DAG below one or more roots and hands
//! every hop to a [`NodeRewrite`] after all of its inputs were handled. When
//! the rewrite returns a substitute, the traversal moves every parent edge of
//! the hop onto the substitute, detaches the hop from its inputs and records
//! the substitution for root slots that still name the old hop.
//!
//! Each hop is processed at most once per pass, no matter how many parents
//! share it. The per-hop [`VisitStatus`] is the marker; it is reset over the
//! reachable hops when a pass starts.

use rustc_hash::FxHashMap;

use linopt_hops::{HopDag, HopId, HopsError, VisitStatus};

use crate::rule::ProgramRewriteStatus;

/// A rewrite of a single hop whose inputs are already in their final form.
pub trait NodeRewrite {
    /// Return `Some(substitute)` to replace `hop` in the DAG.
    ///
    /// The substitute must already exist in `dag`. Edge rewiring is done by
    /// the traversal; implementations only create hops.
    fn rewrite_node(
        &mut self,
        dag: &mut HopDag,
        hop: HopId,
        status: &mut ProgramRewriteStatus,
    ) -> Result<Option<HopId>, HopsError>;
}

/// One rewrite pass over a hop DAG.
pub struct PostOrderTraversal<'r, R: ?Sized> {
    rule: &'r mut R,
    substitutes: FxHashMap<HopId, HopId>,
}

impl<'r, R: NodeRewrite + ?Sized> PostOrderTraversal<'r, R> {
    pub fn new(rule: &'r mut R) -> Self {
        Self {
            rule,
            substitutes: FxHashMap::default(),
        }
    }

    /// Rewrite the DAG below `root`, returning the root's substitute or
    /// `root` itself.
    pub fn rewrite_root(
        mut self,
        dag: &mut HopDag,
        root: HopId,
        status: &mut ProgramRewriteStatus,
    ) -> Result<HopId, HopsError> {
        dag.reset_visit_status(&[root])?;
        self.visit(dag, root, status)
    }

    /// Rewrite the DAG below all `roots` in one pass.
    ///
    /// Hops shared between roots are processed once. The returned sequence
    /// keeps the order of `roots`.
    pub fn rewrite_roots(
        mut self,
        dag: &mut HopDag,
        roots: Vec<HopId>,
        status: &mut ProgramRewriteStatus,
    ) -> Result<Vec<HopId>, HopsError> {
        if roots.is_empty() {
            return Ok(roots);
        }
        dag.reset_visit_status(&roots)?;
        roots
            .into_iter()
            .map(|root| self.visit(dag, root, status))
            .collect()
    }

    /// Process `root` and everything below it with an explicit frame stack,
    /// so the depth of the DAG is not limited by the thread's stack.
    fn visit(
        &mut self,
        dag: &mut HopDag,
        root: HopId,
        status: &mut ProgramRewriteStatus,
    ) -> Result<HopId, HopsError> {
        if dag.get(root)?.visit_status() == VisitStatus::Done {
            return Ok(self.substitutes.get(&root).copied().unwrap_or(root));
        }

        let mut result = root;
        let mut stack: Vec<(HopId, usize)> = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let (hop, slot) = *frame;
            // The slot is read again on every resume: a finished child may
            // have been replaced in it by its substitute.
            if let Some(&child) = dag.get(hop)?.inputs().get(slot) {
                frame.1 += 1;
                if dag.get(child)?.visit_status() != VisitStatus::Done {
                    stack.push((child, 0));
                }
                continue;
            }
            stack.pop();
            result = self.finish(dag, hop, status)?;
        }
        Ok(result)
    }

    /// Apply the rule to a hop whose inputs are all done.
    fn finish(
        &mut self,
        dag: &mut HopDag,
        hop: HopId,
        status: &mut ProgramRewriteStatus,
    ) -> Result<HopId, HopsError> {
        status.hops_visited += 1;
        let mut result = hop;
        if let Some(substitute) = self.rule.rewrite_node(dag, hop, status)? {
            if substitute != hop {
                dag.replace_in_parents(hop, substitute)?;
                dag.detach_inputs(hop)?;
                dag.set_visit_status(substitute, VisitStatus::Done)?;
                self.substitutes.insert(hop, substitute);
                result = substitute;
            }
        }
        dag.set_visit_status(hop, VisitStatus::Done)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linopt_hops::{DataType, HopKind, LiteralValue, OpOp2, ValueType};

    /// Replaces every `Plus` hop with a literal `0`.
    #[derive(Default)]
    struct ZeroPlus {
        seen: Vec<HopId>,
    }

    impl NodeRewrite for ZeroPlus {
        fn rewrite_node(
            &mut self,
            dag: &mut HopDag,
            hop: HopId,
            _status: &mut ProgramRewriteStatus,
        ) -> Result<Option<HopId>, HopsError> {
            self.seen.push(hop);
            if matches!(dag.get(hop)?.kind(), HopKind::Binary(OpOp2::Plus)) {
                return Ok(Some(dag.literal(0i64)));
            }
            Ok(None)
        }
    }

    fn binary(dag: &mut HopDag, op: OpOp2, l: HopId, r: HopId) -> HopId {
        dag.binary(op, ValueType::Int, DataType::Scalar, l, r)
    }

    #[test]
    fn children_are_processed_before_parents() {
        let mut dag = HopDag::new();
        let a = dag.literal(1i64);
        let b = dag.literal(2i64);
        let m = binary(&mut dag, OpOp2::Mult, a, b);
        let c = dag.literal(3i64);
        let root = binary(&mut dag, OpOp2::Minus, m, c);

        let mut rule = ZeroPlus::default();
        let mut status = ProgramRewriteStatus::default();
        let out = PostOrderTraversal::new(&mut rule)
            .rewrite_root(&mut dag, root, &mut status)
            .unwrap();

        assert_eq!(out, root);
        assert_eq!(rule.seen, vec![a, b, m, c, root]);
        assert_eq!(status.hops_visited, 5);
    }

    #[test]
    fn shared_hop_is_rewritten_once_and_rewired_everywhere() {
        let mut dag = HopDag::new();
        let a = dag.literal(1i64);
        let b = dag.literal(2i64);
        let s = binary(&mut dag, OpOp2::Plus, a, b);
        let p1 = binary(&mut dag, OpOp2::Mult, s, a);
        let p2 = binary(&mut dag, OpOp2::Minus, b, s);

        let mut rule = ZeroPlus::default();
        let mut status = ProgramRewriteStatus::default();
        let roots = PostOrderTraversal::new(&mut rule)
            .rewrite_roots(&mut dag, vec![p1, p2], &mut status)
            .unwrap();

        assert_eq!(roots, vec![p1, p2]);
        assert_eq!(rule.seen.iter().filter(|&&h| h == s).count(), 1);
        let zero = dag.hop(p1).inputs()[0];
        assert_eq!(dag.hop(p2).inputs()[1], zero);
        assert_eq!(dag.literal_value(zero).unwrap(), &LiteralValue::Int(0));
        assert_eq!(dag.hop(zero).parents().len(), 2);
        assert!(dag.hop(s).inputs().is_empty());
        assert!(dag.hop(s).parents().is_empty());
        dag.validate(&roots).unwrap();
    }

    #[test]
    fn replaced_root_is_substituted_in_its_slot() {
        let mut dag = HopDag::new();
        let a = dag.literal(1i64);
        let b = dag.literal(2i64);
        let s = binary(&mut dag, OpOp2::Plus, a, b);
        let other = binary(&mut dag, OpOp2::Mult, a, b);

        let mut rule = ZeroPlus::default();
        let mut status = ProgramRewriteStatus::default();
        let roots = PostOrderTraversal::new(&mut rule)
            .rewrite_roots(&mut dag, vec![s, other], &mut status)
            .unwrap();

        assert_ne!(roots[0], s);
        assert!(dag.is_literal(roots[0]));
        assert_eq!(roots[1], other);
    }

    #[test]
    fn root_reached_earlier_through_a_parent_still_gets_its_substitute() {
        let mut dag = HopDag::new();
        let a = dag.literal(1i64);
        let b = dag.literal(2i64);
        let s = binary(&mut dag, OpOp2::Plus, a, b);
        let p = binary(&mut dag, OpOp2::Mult, s, b);

        let mut rule = ZeroPlus::default();
        let mut status = ProgramRewriteStatus::default();
        let roots = PostOrderTraversal::new(&mut rule)
            .rewrite_roots(&mut dag, vec![p, s], &mut status)
            .unwrap();

        assert_eq!(roots[0], p);
        assert_eq!(roots[1], dag.hop(p).inputs()[0]);
        assert!(dag.is_literal(roots[1]));
    }

    #[test]
    fn deep_chain_is_walked_without_recursion() {
        let mut dag = HopDag::new();
        let mut acc = dag.literal(1i64);
        for _ in 0..50_000 {
            let one = dag.literal(1i64);
            acc = binary(&mut dag, OpOp2::Minus, acc, one);
        }

        let mut rule = ZeroPlus::default();
        let mut status = ProgramRewriteStatus::default();
        let out = PostOrderTraversal::new(&mut rule)
            .rewrite_root(&mut dag, acc, &mut status)
            .unwrap();

        assert_eq!(out, acc);
        assert_eq!(status.hops_visited, 100_001);
        assert_eq!(rule.seen.first(), Some(&HopId(0)));
        assert_eq!(rule.seen.last(), Some(&acc));
    }

    #[test]
    fn empty_roots_are_returned_unchanged() {
        let mut dag = HopDag::new();
        let mut rule = ZeroPlus::default();
        let mut status = ProgramRewriteStatus::default();
        let roots = PostOrderTraversal::new(&mut rule)
            .rewrite_roots(&mut dag, Vec::new(), &mut status)
            .unwrap();
        assert!(roots.is_empty());
        assert_eq!(status, ProgramRewriteStatus::default());
    }

    #[test]
    fn cycles_are_reported() {
        let mut dag = HopDag::new();
        let a = dag.literal(1i64);
        let b = dag.literal(2i64);
        let p = binary(&mut dag, OpOp2::Minus, a, b);
        let q = binary(&mut dag, OpOp2::Minus, p, b);
        dag.replace_child_reference(p, 0, q).unwrap();

        let mut rule = ZeroPlus::default();
        let mut status = ProgramRewriteStatus::default();
        let err = PostOrderTraversal::new(&mut rule)
            .rewrite_root(&mut dag, q, &mut status)
            .unwrap_err();
        assert!(matches!(err, HopsError::Cycle(_)));
        assert!(rule.seen.is_empty());
    }
}
