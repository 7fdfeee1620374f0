use nb_array::{ArrayError, DType};
use thiserror::Error;

use crate::fallback::RejectReason;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("array error: {0}")]
    Array(#[from] ArrayError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{op} on {dtype} rejected its output buffer ({reason}) but no promotion was expected")]
    UnanticipatedRejection {
        op: &'static str,
        dtype: DType,
        reason: RejectReason,
    },
    #[error("no dispatch entry for {op} on {dtype}")]
    UnsupportedCombination { op: &'static str, dtype: DType },
    #[error("invalid configuration for '{field}': {message}")]
    InvalidConfig { field: &'static str, message: String },
    #[error("invalid benchmark case: {0}")]
    InvalidCase(String),
}

pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_error_converts() {
        let err: BenchError = ArrayError::InvalidAxis { axis: 3, ndim: 2 }.into();
        assert!(matches!(err, BenchError::Array(_)));
        assert_eq!(
            err.to_string(),
            "array error: invalid axis 3 for array with 2 dimensions"
        );
    }

    #[test]
    fn test_unanticipated_rejection_message() {
        let err = BenchError::UnanticipatedRejection {
            op: "add",
            dtype: DType::F32,
            reason: RejectReason::ResultTypeMismatch,
        };
        assert_eq!(
            err.to_string(),
            "add on float32 rejected its output buffer (result type mismatch) but no promotion was expected"
        );
    }
}
