//! Plain-text rendering of hop DAGs.
//!
//! One line per reachable hop in post-order:
//!
//! ```text
//! (0) 2 [] SCALAR INT
//! (1) 3 [] SCALAR INT
//! (2) b(+) [0,1] SCALAR INT
//! ```

use std::fmt::Write;

use crate::dag::HopDag;
use crate::errors::HopsError;
use crate::hop::HopId;

impl HopDag {
    /// Render every hop reachable from `roots` once, children first.
    pub fn explain(&self, roots: &[HopId]) -> Result<String, HopsError> {
        let mut out = String::new();
        for id in self.reachable(roots)? {
            let hop = self.hop(id);
            let inputs = hop
                .inputs()
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(",");
            // Writing into a String cannot fail.
            let _ = writeln!(
                out,
                "({}) {} [{}] {} {}",
                id,
                hop.name(),
                inputs,
                hop.data_type(),
                hop.value_type()
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::dag::HopDag;
    use crate::types::{DataType, OpOp1, OpOp2, ValueType};

    #[test]
    fn explain_lists_shared_hops_once() {
        let mut dag = HopDag::new();
        let a = dag.literal(2i64);
        let x = dag.transient_read("X", ValueType::Double, DataType::Scalar);
        let s = dag.binary(OpOp2::Plus, ValueType::Double, DataType::Scalar, a, x);
        let c = dag.unary(OpOp1::CastAsInt, ValueType::Int, DataType::Scalar, s);
        let p = dag.binary(OpOp2::Mult, ValueType::Double, DataType::Scalar, s, c);

        let text = dag.explain(&[p]).unwrap();
        assert_eq!(
            text,
            "(0) 2 [] SCALAR INT\n\
             (1) TRead X [] SCALAR DOUBLE\n\
             (2) b(+) [0,1] SCALAR DOUBLE\n\
             (3) u(as.integer) [2] SCALAR INT\n\
             (4) b(*) [2,3] SCALAR DOUBLE\n"
        );
    }

    #[test]
    fn string_literal_is_quoted_next_to_variable_of_same_name() {
        let mut dag = HopDag::new();
        let text = dag.literal("X");
        let x = dag.transient_read("X", ValueType::String, DataType::Scalar);
        let concat = dag.binary(OpOp2::Plus, ValueType::String, DataType::Scalar, text, x);

        assert_eq!(
            dag.explain(&[concat]).unwrap(),
            "(0) \"X\" [] SCALAR STRING\n\
             (1) TRead X [] SCALAR STRING\n\
             (2) b(+) [0,1] SCALAR STRING\n"
        );
    }
}
