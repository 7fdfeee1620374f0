use thiserror::Error;

use crate::dtype::DType;

#[derive(Error, Debug)]
pub enum ArrayError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },
    #[error("invalid axis {axis} for array with {ndim} dimensions")]
    InvalidAxis { axis: usize, ndim: usize },
    #[error("cannot broadcast shapes {a:?} and {b:?}")]
    BroadcastError { a: Vec<usize>, b: Vec<usize> },
    #[error("matmul dimension mismatch: [{m}x{k}] @ [{k2}x{n}]")]
    MatmulMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
    #[error("result dtype {result} does not match output buffer dtype {out}")]
    ResultTypeMismatch { result: DType, out: DType },
    #[error("cannot cast {from} result into {to} output buffer without loss")]
    UnsafeOutputCast { from: DType, to: DType },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ArrayError>;

/// Checks that an output buffer of dtype `out` can receive a `result`
/// computed by an operation, without any implicit cast.
pub(crate) fn check_output_dtype(result: DType, out: DType) -> Result<()> {
    if result == out {
        Ok(())
    } else if result.can_cast_safely(out) {
        Err(ArrayError::ResultTypeMismatch { result, out })
    } else {
        Err(ArrayError::UnsafeOutputCast { from: result, to: out })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_output() {
        assert!(check_output_dtype(DType::I32, DType::I32).is_ok());
    }

    #[test]
    fn test_widening_output_is_type_mismatch() {
        let err = check_output_dtype(DType::F32, DType::F64).unwrap_err();
        assert!(matches!(err, ArrayError::ResultTypeMismatch { .. }));
    }

    #[test]
    fn test_narrowing_output_is_unsafe_cast() {
        let err = check_output_dtype(DType::F64, DType::I64).unwrap_err();
        assert!(matches!(
            err,
            ArrayError::UnsafeOutputCast {
                from: DType::F64,
                to: DType::I64
            }
        ));
    }

    #[test]
    fn test_display() {
        let err = ArrayError::UnsafeOutputCast {
            from: DType::F64,
            to: DType::I8,
        };
        assert_eq!(
            err.to_string(),
            "cannot cast float64 result into int8 output buffer without loss"
        );
    }
}
