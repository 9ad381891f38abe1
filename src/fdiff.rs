//! Finite-difference derivative estimates.
//!
//! These estimators are a validation baseline for the backward engine, not
//! part of it. They work on plain `Fn(f64) -> f64` closures and never look
//! at tape internals; a graph-built function is exposed to them through its
//! forward values only.
//!
//! Truncation error is `O(h)` for the forward form and `O(h²)` for the
//! central form, so tests should compare against these estimates with a
//! tolerance no tighter than what the chosen step can deliver (see
//! [`crate::approx::GRAD_NUMERIC_ERROR`]).

/// One-sided difference quotient: `(f(x + h) - f(x)) / h`.
///
/// # Example
/// ```rust
/// use tapegrad::fdiff::forward_diff;
/// let df = forward_diff(|x| x * x, 3.0, 1e-7);
/// assert!((df - 6.0).abs() < 1e-5);
/// ```
pub fn forward_diff(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
    (f(x + h) - f(x)) / h
}

/// Central difference quotient: `(f(x + h) - f(x - h)) / (2h)`.
///
/// Preferred over [`forward_diff`] for validation; its truncation error
/// shrinks quadratically in `h`.
///
/// # Example
/// ```rust
/// use tapegrad::fdiff::central_diff;
/// let df = central_diff(|x| x * x * x, 2.0, 1e-5);
/// assert!((df - 12.0).abs() < 1e-4);
/// ```
pub fn central_diff(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
    (f(x + h) - f(x - h)) / (2.0 * h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_diff_linear_is_exact() {
        // a linear function has no truncation error
        let df = forward_diff(|x| 3.0 * x + 1.0, 10.0, 1e-3);
        assert!((df - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_central_beats_forward_on_quadratic() {
        let f = |x: f64| x * x;
        let h = 1e-3;
        let forward_err = (forward_diff(f, 1.0, h) - 2.0).abs();
        let central_err = (central_diff(f, 1.0, h) - 2.0).abs();
        assert!(central_err < forward_err);
    }
}
