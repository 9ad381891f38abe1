//! Backward engine and gradient utilities.
//!
//! # Reverse-Mode Gradient Propagation
//!
//! Given an output node, this module computes `∂output/∂v` for every node
//! `v` reachable through parent edges and accumulates the result into each
//! node's gradient field.
//!
//! ## Algorithm
//!
//! 1. Depth-first traversal from the output over parent edges, with a
//!    visited set so shared ancestors are processed once, producing a
//!    topological order (leaves first).
//! 2. A scratch adjoint buffer is seeded with `∂output/∂output = 1` at the
//!    output node.
//! 3. The order is walked in reverse (output first). Each node distributes
//!    `adjoint * local_derivative` into the adjoints of its parents, which
//!    sums contributions over every path (chain rule + sum rule).
//! 4. Each reachable node's adjoint is added into its stored gradient.
//!
//! Keeping the working adjoints separate from the stored gradients until the
//! final step gives two laws their exact form: repeating `backward()` without
//! a reset doubles every gradient, and `zero_grad()` followed by `backward()`
//! always reproduces the single-pass result.
//!
//! ## Usage Guidelines
//!
//! - Gradients accumulate with `+=` and are never overwritten; call
//!   [`Value::zero_grad`] before a backward pass when a fresh gradient is
//!   needed.
//! - Running backward on a bare leaf is valid: its own gradient gains 1 and
//!   nothing propagates.
//! - Nodes not reachable from the output keep their gradient untouched.

use tracing::trace;

use crate::graph::{Node, NodeId, Value};

/// Topological order of all nodes reachable from `root` via parent edges,
/// leaves first, `root` last.
fn topo_order(nodes: &[Node], root: NodeId) -> Vec<NodeId> {
    let mut visited = vec![false; nodes.len()];
    let mut order = Vec::new();
    visit(nodes, root, &mut visited, &mut order);
    order
}

fn visit(nodes: &[Node], id: NodeId, visited: &mut [bool], order: &mut Vec<NodeId>) {
    if visited[id] {
        return;
    }
    visited[id] = true;
    for parent in nodes[id].op.parents() {
        visit(nodes, parent, visited, order);
    }
    order.push(id);
}

impl<'t> Value<'t> {
    /// Runs a backward pass with this node as the output.
    ///
    /// Accumulates `∂self/∂v` into the gradient of every ancestor `v`
    /// (including `self`, which gains the seed value 1).
    ///
    /// # Example
    /// ```rust
    /// use tapegrad::graph::Tape;
    /// let tape = Tape::new();
    /// let x = tape.value(2.0);
    /// let y = x * x + 3.0 * x + 5.0;
    /// y.backward();
    /// assert_eq!(y.data(), 15.0);
    /// assert_eq!(x.grad(), 7.0); // 2x + 3 at x = 2
    /// ```
    pub fn backward(&self) {
        let mut nodes = self.tape.nodes.borrow_mut();
        let order = topo_order(&nodes, self.id);

        let mut adjoint = vec![0.0; nodes.len()];
        adjoint[self.id] = 1.0;

        for &id in order.iter().rev() {
            let upstream = adjoint[id];
            for (parent, local) in nodes[id].op.local_grads(&nodes).into_iter().flatten() {
                adjoint[parent] += upstream * local;
            }
        }

        for &id in &order {
            nodes[id].grad += adjoint[id];
        }

        trace!(root = self.id, visited = order.len(), "backward pass complete");
    }

    /// Resets the gradient of every node reachable from this one to zero.
    ///
    /// Idempotent; typically called between backward passes.
    ///
    /// # Example
    /// ```rust
    /// use tapegrad::graph::Tape;
    /// let tape = Tape::new();
    /// let x = tape.value(2.0);
    /// let y = x * x;
    /// y.backward();
    /// y.zero_grad();
    /// assert_eq!(x.grad(), 0.0);
    /// ```
    pub fn zero_grad(&self) {
        let mut nodes = self.tape.nodes.borrow_mut();
        let order = topo_order(&nodes, self.id);
        for &id in &order {
            nodes[id].grad = 0.0;
        }
        trace!(root = self.id, visited = order.len(), "gradients reset");
    }
}
