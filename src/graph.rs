//! Core tape data structures and arithmetic recording.
//!
//! # Tape and Value Handles
//!
//! This module defines the core logic for recording scalar computations as a
//! directed acyclic graph and reading values and gradients back out of it.
//!
//! It supports:
//! - Construction of leaf nodes from numeric literals
//! - Arithmetic on [`Value`] handles via the standard operator traits
//! - Implicit promotion of `f64` literals to leaf nodes
//! - Derived operations (negation, subtraction, division) built from the
//!   core add/mul/pow registry
//!
//! ## Design Highlights
//! - All nodes live in one arena (`Vec<Node>`) owned by the [`Tape`];
//!   nodes refer to their parents by dense integer [`NodeId`]s, never by
//!   pointer, so the graph is cycle-free by construction
//! - [`Value`] is a `Copy` handle (tape borrow + id + cached forward value);
//!   cloning it never clones graph state
//! - Nodes are immutable after creation except for gradient accumulation
//! - The tape uses `RefCell` interior mutability and is deliberately
//!   single-threaded (`!Sync`)
//!
//! ## Limitations
//! - Scalars only; no tensors or broadcasting
//! - Exponents must be constants (`powf`); raising a value to another value
//!   has no backward rule and fails with `UnsupportedOperation`
//!
//! ## Example
//!
//! ```rust
//! use tapegrad::graph::Tape;
//! let tape = Tape::new();
//! let x = tape.value(2.0);
//! let y = x * x + 3.0 * x + 5.0;
//! assert_eq!(y.data(), 15.0);
//! ```

use core::cell::RefCell;
use std::ops::{Add, Div, Mul, Neg, Sub};

use tracing::trace;

use crate::error::{AdError, AdResult};
use crate::ops::Op;

/// Dense index of a node in its tape's arena.
pub type NodeId = usize;

/// One recorded scalar quantity: forward value, accumulated gradient, and
/// provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Forward value, fixed at creation.
    pub(crate) data: f64,
    /// Derivative of the last backward root with respect to this node.
    /// Accumulates across backward passes until reset.
    pub(crate) grad: f64,
    /// Operation that produced this node, including parent ids.
    pub(crate) op: Op,
}

/// Arena owning every node of one computation graph.
///
/// All arithmetic performed on [`Value`] handles borrowed from a tape is
/// recorded here. Dropping the tape drops the whole graph; there is no
/// explicit teardown.
#[derive(Debug, Default)]
pub struct Tape {
    pub(crate) nodes: RefCell<Vec<Node>>,
}

impl Tape {
    /// Creates an empty tape.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(Vec::new()),
        }
    }

    /// Records a leaf node for `data` and returns a handle to it.
    ///
    /// # Panics
    /// Panics if `data` is NaN or infinite. Use [`Tape::checked_value`] for
    /// a non-panicking variant.
    ///
    /// # Example
    /// ```rust
    /// use tapegrad::graph::Tape;
    /// let tape = Tape::new();
    /// let x = tape.value(3.0);
    /// assert_eq!(x.data(), 3.0);
    /// assert_eq!(x.grad(), 0.0); // no backward pass has run
    /// ```
    pub fn value(&self, data: f64) -> Value<'_> {
        assert!(data.is_finite(), "leaf value must be finite, got {data}");
        self.record_leaf(data)
    }

    /// Records a leaf node for `data`, rejecting non-finite input.
    ///
    /// # Errors
    /// Returns [`AdError::InvalidOperand`] if `data` is NaN or infinite.
    pub fn checked_value(&self, data: f64) -> AdResult<Value<'_>> {
        if !data.is_finite() {
            return Err(AdError::InvalidOperand(format!(
                "leaf value must be finite, got {data}"
            )));
        }
        Ok(self.record_leaf(data))
    }

    /// Number of nodes recorded so far.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Whether the tape holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    fn record_leaf(&self, data: f64) -> Value<'_> {
        let mut nodes = self.nodes.borrow_mut();
        let id = nodes.len();
        nodes.push(Node {
            data,
            grad: 0.0,
            op: Op::Leaf,
        });
        trace!(id, data, op = "leaf", "recorded node");
        Value { tape: self, id, data }
    }

    /// Computes the forward rule of `op` over already-recorded parents and
    /// appends the result as a new node.
    pub(crate) fn record(&self, op: Op) -> Value<'_> {
        let mut nodes = self.nodes.borrow_mut();
        let data = op.forward(&nodes);
        let id = nodes.len();
        nodes.push(Node { data, grad: 0.0, op });
        trace!(id, data, op = op.tag(), "recorded node");
        Value { tape: self, id, data }
    }
}

/// Handle to one scalar on a [`Tape`].
///
/// Handles are `Copy`: passing them around, or using one operand on both
/// sides of an expression, shares the underlying node rather than cloning
/// it, which is what makes fan-out gradients sum correctly.
#[derive(Debug, Clone, Copy)]
pub struct Value<'t> {
    pub(crate) tape: &'t Tape,
    pub(crate) id: NodeId,
    data: f64,
}

impl<'t> Value<'t> {
    /// The forward value of this node.
    pub fn data(&self) -> f64 {
        self.data
    }

    /// The gradient accumulated into this node by backward passes.
    ///
    /// Returns `0.0` if no backward pass has touched the node yet.
    pub fn grad(&self) -> f64 {
        self.tape.nodes.borrow()[self.id].grad
    }

    /// Raises this value to a constant exponent: `self^k`.
    ///
    /// # Panics
    /// Panics if `k` is NaN or infinite.
    ///
    /// # Example
    /// ```rust
    /// use tapegrad::graph::Tape;
    /// let tape = Tape::new();
    /// let x = tape.value(3.0);
    /// let y = x.powf(2.0);
    /// assert_eq!(y.data(), 9.0);
    /// ```
    pub fn powf(self, k: f64) -> Value<'t> {
        assert!(k.is_finite(), "exponent must be finite, got {k}");
        self.tape.record(Op::Pow(self.id, k))
    }

    /// Raising one tape value to another tape value.
    ///
    /// # Errors
    /// Always fails with [`AdError::UnsupportedOperation`]: with both base
    /// and exponent dynamic there is no local derivative rule in the
    /// registry. Use [`Value::powf`] with a constant exponent instead.
    pub fn pow(self, exp: Value<'t>) -> AdResult<Value<'t>> {
        Err(AdError::UnsupportedOperation(format!(
            "no backward rule for value^value ({} ^ {}); use powf with a constant exponent",
            self.data, exp.data
        )))
    }

    /// Divides by another value, rejecting division by zero.
    ///
    /// Division is derived from the core registry as `self * rhs^-1`.
    ///
    /// # Errors
    /// Returns [`AdError::InvalidOperand`] if `rhs` holds the value zero.
    pub fn try_div(self, rhs: Value<'t>) -> AdResult<Value<'t>> {
        if rhs.data == 0.0 {
            return Err(AdError::InvalidOperand(
                "division by a zero-valued node".to_string(),
            ));
        }
        Ok(self * rhs.powf(-1.0))
    }

    fn assert_same_tape(&self, other: &Value<'t>) {
        assert!(
            core::ptr::eq(self.tape, other.tape),
            "operands belong to different tapes"
        );
    }
}

impl<'t> Add for Value<'t> {
    type Output = Value<'t>;

    fn add(self, rhs: Value<'t>) -> Value<'t> {
        self.assert_same_tape(&rhs);
        self.tape.record(Op::Add(self.id, rhs.id))
    }
}

impl<'t> Mul for Value<'t> {
    type Output = Value<'t>;

    fn mul(self, rhs: Value<'t>) -> Value<'t> {
        self.assert_same_tape(&rhs);
        self.tape.record(Op::Mul(self.id, rhs.id))
    }
}

impl<'t> Neg for Value<'t> {
    type Output = Value<'t>;

    fn neg(self) -> Value<'t> {
        self * self.tape.value(-1.0)
    }
}

impl<'t> Sub for Value<'t> {
    type Output = Value<'t>;

    fn sub(self, rhs: Value<'t>) -> Value<'t> {
        self.assert_same_tape(&rhs);
        self + (-rhs)
    }
}

impl<'t> Div for Value<'t> {
    type Output = Value<'t>;

    /// # Panics
    /// Panics if `rhs` holds the value zero; use [`Value::try_div`] to
    /// handle that case as an error.
    fn div(self, rhs: Value<'t>) -> Value<'t> {
        self.assert_same_tape(&rhs);
        match self.try_div(rhs) {
            Ok(out) => out,
            Err(e) => panic!("{e}"),
        }
    }
}

// f64 literals on either side are promoted to leaf nodes on the same tape.

impl<'t> Add<f64> for Value<'t> {
    type Output = Value<'t>;

    fn add(self, rhs: f64) -> Value<'t> {
        self + self.tape.value(rhs)
    }
}

impl<'t> Add<Value<'t>> for f64 {
    type Output = Value<'t>;

    fn add(self, rhs: Value<'t>) -> Value<'t> {
        rhs.tape.value(self) + rhs
    }
}

impl<'t> Mul<f64> for Value<'t> {
    type Output = Value<'t>;

    fn mul(self, rhs: f64) -> Value<'t> {
        self * self.tape.value(rhs)
    }
}

impl<'t> Mul<Value<'t>> for f64 {
    type Output = Value<'t>;

    fn mul(self, rhs: Value<'t>) -> Value<'t> {
        rhs.tape.value(self) * rhs
    }
}

impl<'t> Sub<f64> for Value<'t> {
    type Output = Value<'t>;

    fn sub(self, rhs: f64) -> Value<'t> {
        self - self.tape.value(rhs)
    }
}

impl<'t> Sub<Value<'t>> for f64 {
    type Output = Value<'t>;

    fn sub(self, rhs: Value<'t>) -> Value<'t> {
        rhs.tape.value(self) - rhs
    }
}

impl<'t> Div<f64> for Value<'t> {
    type Output = Value<'t>;

    fn div(self, rhs: f64) -> Value<'t> {
        self / self.tape.value(rhs)
    }
}

impl<'t> Div<Value<'t>> for f64 {
    type Output = Value<'t>;

    fn div(self, rhs: Value<'t>) -> Value<'t> {
        rhs.tape.value(self) / rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_creation() {
        let tape = Tape::new();
        let x = tape.value(4.5);
        assert_eq!(x.data(), 4.5);
        assert_eq!(x.grad(), 0.0);
        assert_eq!(tape.len(), 1);
    }

    #[test]
    fn test_checked_value_rejects_nan() {
        let tape = Tape::new();
        let err = tape.checked_value(f64::NAN).unwrap_err();
        assert!(matches!(err, AdError::InvalidOperand(_)));
        // a failed operation must not grow the tape
        assert!(tape.is_empty());
    }

    #[test]
    fn test_literal_promotion_records_leaf() {
        let tape = Tape::new();
        let x = tape.value(2.0);
        let y = x + 1.0;
        assert_eq!(y.data(), 3.0);
        // x, the promoted 1.0, and the sum
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_derived_ops() {
        let tape = Tape::new();
        let a = tape.value(6.0);
        let b = tape.value(2.0);
        assert_eq!((-a).data(), -6.0);
        assert_eq!((a - b).data(), 4.0);
        assert_eq!((a / b).data(), 3.0);
        assert_eq!((1.0 - b).data(), -1.0);
        assert_eq!((12.0 / b).data(), 6.0);
    }

    #[test]
    fn test_try_div_by_zero() {
        let tape = Tape::new();
        let a = tape.value(1.0);
        let b = tape.value(0.0);
        let before = tape.len();
        let err = a.try_div(b).unwrap_err();
        assert!(matches!(err, AdError::InvalidOperand(_)));
        assert_eq!(tape.len(), before);
    }

    #[test]
    fn test_dynamic_exponent_unsupported() {
        let tape = Tape::new();
        let a = tape.value(2.0);
        let b = tape.value(3.0);
        let err = a.pow(b).unwrap_err();
        assert!(matches!(err, AdError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_forward_leaves_operands_untouched() {
        let tape = Tape::new();
        let a = tape.value(2.0);
        let b = tape.value(3.0);
        let _ = a * b;
        assert_eq!(a.data(), 2.0);
        assert_eq!(b.data(), 3.0);
        assert_eq!(a.grad(), 0.0);
        assert_eq!(b.grad(), 0.0);
    }
}
