//! tapegrad: a minimal reverse-mode autodiff engine in Rust.
//!
//! Scalar expressions built with ordinary arithmetic operators are recorded
//! as a computation graph on a tape; a single backward traversal then
//! applies the chain rule and accumulates the exact derivative of the
//! output with respect to every node in the graph.
//!
//! # Features
//!
//! - Tape arena holding the whole graph by index, cycle-free by construction.
//! - Operator overloading (`+`, `-`, `*`, `/`, `powf`) with implicit
//!   promotion of `f64` literals to leaf nodes.
//! - Gradient accumulation with explicit reset, so fan-out and repeated
//!   backward passes follow the multivariable chain rule exactly.
//! - Finite-difference estimators for validating gradients from the outside.
//!
//! # Goals
//!
//! - Keep the engine small enough to read in one sitting.
//! - Prioritize correctness and explicitness over black-box abstraction.
//! - Make every derivative rule visible in one table ([`ops::Op`]).
//!
//! # Modules
//!
//! - [`graph`] — Tape arena, [`graph::Value`] handles, and arithmetic recording.
//! - [`ops`] — Operation registry with forward and local-derivative rules.
//! - [`backprop`] — Topological ordering and the backward engine.
//! - [`fdiff`] — Finite-difference comparison baseline.
//! - [`approx`] — Graded tolerances for derivative agreement.
//! - [`error`] — Error enum and result alias.
//!
//! # Non-goals
//!
//! Tensors, broadcasting, GPU backends, neural-network layers, optimizers,
//! and any I/O surface. Finite differences are shipped only as a baseline to
//! check against, never as the differentiation mechanism.
//!
//! # Example
//!
//! ```rust
//! use tapegrad::graph::Tape;
//!
//! let tape = Tape::new();
//! let x = tape.value(2.0);
//!
//! // f(x) = x^2 + 3x + 5
//! let y = x.powf(2.0) + 3.0 * x + 5.0;
//! assert_eq!(y.data(), 15.0);
//!
//! y.backward();
//! assert_eq!(x.grad(), 7.0); // f'(x) = 2x + 3
//! ```

pub mod approx;
pub mod backprop;
pub mod error;
pub mod fdiff;
pub mod graph;
pub mod ops;
