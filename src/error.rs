//! Error types for tape construction and arithmetic.
//!
//! Every fallible operation in the crate surfaces one of these variants
//! synchronously to its caller; nothing is recovered internally. A failed
//! operation never touches nodes that were already recorded on the tape.

use thiserror::Error;

/// Main error type for the tapegrad engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdError {
    /// A non-numeric (NaN/infinite) operand, or a division by a zero-valued
    /// node.
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    /// The requested operator combination has no backward rule, e.g. raising
    /// one tape value to another tape value.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Result type for tapegrad operations.
pub type AdResult<T> = Result<T, AdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdError::InvalidOperand("literal is NaN".to_string());
        assert_eq!(err.to_string(), "invalid operand: literal is NaN");

        let err = AdError::UnsupportedOperation("dynamic exponent".to_string());
        assert!(err.to_string().starts_with("unsupported operation"));
    }
}
