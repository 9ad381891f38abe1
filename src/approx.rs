//! Utilities to grade agreement between computed and expected derivatives.
//!
//! Gradient checks face two very different tolerance regimes: reverse-mode
//! results should match closed-form derivatives to floating-point rounding,
//! while finite-difference estimates carry their own truncation error and
//! must not be held to a tighter bound than they can meet.

/// Relative error under which two derivatives are considered bitwise-close.
pub const GRAD_EXACT_ERROR: f64 = 1e-12;

/// Relative error expected between reverse-mode output and a closed-form
/// analytic derivative.
pub const GRAD_ANALYTIC_ERROR: f64 = 1e-9;

/// Relative error expected against a central-difference estimate with step
/// `h = 1e-5`.
pub const GRAD_NUMERIC_ERROR: f64 = 1e-4;

/// The graded agreement between two derivative values.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Agreement {
    /// Within rounding noise.
    Exact = 0,

    /// Good enough to pass for a closed-form derivative.
    Analytic = 1,

    /// Only as close as a finite-difference estimate can be.
    Numeric = 2,

    /// Not meaningfully equal.
    Disagree = 3,
}

/// Grades the relative distance between two derivative values.
///
/// The difference is scaled by the larger magnitude of the two operands
/// (floored at 1.0 so values near zero are compared absolutely).
pub fn grade(a: f64, b: f64) -> Agreement {
    let scale = a.abs().max(b.abs()).max(1.0);
    let dif = (a - b).abs() / scale;

    if dif < GRAD_EXACT_ERROR {
        Agreement::Exact
    } else if dif < GRAD_ANALYTIC_ERROR {
        Agreement::Analytic
    } else if dif < GRAD_NUMERIC_ERROR {
        Agreement::Numeric
    } else {
        Agreement::Disagree
    }
}

/// Whether two derivative values agree at least to the given grade.
pub fn agrees(a: f64, b: f64, at_least: Agreement) -> bool {
    grade(a, b) <= at_least
}
