//! Operation registry: forward rules and local derivative rules.
//!
//! # Differentiable Operation Table
//!
//! Every node on the tape carries an [`Op`] tag that records which operation
//! produced it and which parent nodes it was built from. The tag is selected
//! once, at construction time, and bundles both directions of the chain rule:
//!
//! - **Forward rule** — how the node's value is computed from its parents.
//! - **Backward rule** — the local derivative of the node with respect to
//!   each parent, used by the backward engine to scale upstream gradients.
//!
//! ## Implemented Ops
//!
//! - `Leaf`: an independent input; no parents, no derivative rule.
//! - `Add`: `c = a + b` with `∂c/∂a = 1`, `∂c/∂b = 1`.
//! - `Mul`: `c = a * b` with `∂c/∂a = b`, `∂c/∂b = a`.
//! - `Pow`: `c = a^k` for a constant `k`, with `∂c/∂a = k * a^(k-1)`.
//!
//! Subtraction, negation, and division are not separate table entries; the
//! graph layer derives them as compositions (`-a = a * -1`, `a - b = a + (-b)`,
//! `a / b = a * b^-1`), so the backward engine only ever sees these four tags.

use crate::graph::{Node, NodeId};

/// Tag identifying the operation that produced a node, along with the ids of
/// the parent nodes it consumed.
///
/// Parent ids always point at nodes recorded earlier on the same tape, which
/// makes the graph acyclic by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    /// An input node created directly from a numeric literal.
    Leaf,
    /// Sum of two parent nodes.
    Add(NodeId, NodeId),
    /// Product of two parent nodes.
    Mul(NodeId, NodeId),
    /// Parent node raised to a constant exponent.
    Pow(NodeId, f64),
}

impl Op {
    /// Short tag name, used in trace events and debug output.
    pub fn tag(&self) -> &'static str {
        match self {
            Op::Leaf => "leaf",
            Op::Add(..) => "add",
            Op::Mul(..) => "mul",
            Op::Pow(..) => "pow",
        }
    }

    /// Iterates over the parent ids of this operation (empty for leaves).
    pub(crate) fn parents(&self) -> impl Iterator<Item = NodeId> {
        let pair = match *self {
            Op::Leaf => [None, None],
            Op::Add(a, b) | Op::Mul(a, b) => [Some(a), Some(b)],
            Op::Pow(a, _) => [Some(a), None],
        };
        pair.into_iter().flatten()
    }

    /// Applies the forward rule to the parents' stored values.
    ///
    /// Leaves never reach this path; their value is supplied at creation.
    pub(crate) fn forward(&self, nodes: &[Node]) -> f64 {
        match *self {
            Op::Leaf => unreachable!("leaf values are supplied at creation"),
            Op::Add(a, b) => nodes[a].data + nodes[b].data,
            Op::Mul(a, b) => nodes[a].data * nodes[b].data,
            Op::Pow(a, k) => nodes[a].data.powf(k),
        }
    }

    /// Local derivatives of this node with respect to each parent, paired
    /// with the parent id they belong to.
    ///
    /// The backward engine multiplies each entry by the node's accumulated
    /// upstream gradient and adds the product into the parent's adjoint.
    pub(crate) fn local_grads(&self, nodes: &[Node]) -> [Option<(NodeId, f64)>; 2] {
        match *self {
            Op::Leaf => [None, None],
            Op::Add(a, b) => [Some((a, 1.0)), Some((b, 1.0))],
            Op::Mul(a, b) => [
                Some((a, nodes[b].data)),
                Some((b, nodes[a].data)),
            ],
            Op::Pow(a, k) => [Some((a, k * nodes[a].data.powf(k - 1.0))), None],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Tape;

    #[test]
    fn test_op_tags() {
        assert_eq!(Op::Leaf.tag(), "leaf");
        assert_eq!(Op::Add(0, 1).tag(), "add");
        assert_eq!(Op::Mul(0, 1).tag(), "mul");
        assert_eq!(Op::Pow(0, 2.0).tag(), "pow");
    }

    #[test]
    fn test_parent_arity() {
        assert_eq!(Op::Leaf.parents().count(), 0);
        assert_eq!(Op::Add(0, 1).parents().count(), 2);
        assert_eq!(Op::Pow(0, 3.0).parents().count(), 1);
    }

    #[test]
    fn test_pow_local_grad() {
        let tape = Tape::new();
        let x = tape.value(2.0);
        let y = x.powf(3.0);
        // d(x^3)/dx at x=2 is 3 * 2^2 = 12
        y.backward();
        assert_eq!(x.grad(), 12.0);
    }
}
