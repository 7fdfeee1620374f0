use std::fmt::Debug;

use crate::array::NdArray;
use crate::error::Result;
use crate::ops::{BinaryOp, UnaryOp};
use crate::scalar::Scalar;

/// Trait for pluggable compute backends.
///
/// Every elementwise operation and matmul comes in up to three call forms:
///
/// - allocating (`binary`, `unary`, ...): the backend allocates and returns
///   the result array, whose dtype follows the operation's promotion rules.
/// - buffered (`*_into`): the result is written into a caller-supplied `out`.
///   If `out` has a different dtype than the result the call fails with
///   [`ArrayError::ResultTypeMismatch`] or [`ArrayError::UnsafeOutputCast`]
///   before any element is written.
/// - in place (`*_inplace`): the first operand doubles as the output, with the
///   same dtype rules as the buffered form.
///
/// Reductions only have an allocating form.
///
/// [`ArrayError::ResultTypeMismatch`]: crate::ArrayError::ResultTypeMismatch
/// [`ArrayError::UnsafeOutputCast`]: crate::ArrayError::UnsafeOutputCast
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu").
    fn name(&self) -> &str;

    /// Elementwise `op(a, b)` with broadcasting.
    fn binary(&self, op: BinaryOp, a: &NdArray, b: &NdArray) -> Result<NdArray>;

    fn binary_into(&self, op: BinaryOp, a: &NdArray, b: &NdArray, out: &mut NdArray)
        -> Result<()>;

    /// `a = op(a, b)`. `b` must broadcast to `a`'s shape.
    fn binary_inplace(&self, op: BinaryOp, a: &mut NdArray, b: &NdArray) -> Result<()>;

    /// Elementwise `op(a, s)`; `s` is converted to `a`'s dtype first.
    fn scalar(&self, op: BinaryOp, a: &NdArray, s: Scalar) -> Result<NdArray>;

    fn scalar_into(&self, op: BinaryOp, a: &NdArray, s: Scalar, out: &mut NdArray) -> Result<()>;

    fn scalar_inplace(&self, op: BinaryOp, a: &mut NdArray, s: Scalar) -> Result<()>;

    fn unary(&self, op: UnaryOp, a: &NdArray) -> Result<NdArray>;

    fn unary_into(&self, op: UnaryOp, a: &NdArray, out: &mut NdArray) -> Result<()>;

    fn unary_inplace(&self, op: UnaryOp, a: &mut NdArray) -> Result<()>;

    /// Sum of every element, accumulated in [`DType::sum_dtype`].
    ///
    /// [`DType::sum_dtype`]: crate::DType::sum_dtype
    fn sum(&self, a: &NdArray) -> Result<Scalar>;

    /// Sum along `axis`, removing it from the shape.
    fn sum_axis(&self, a: &NdArray, axis: usize) -> Result<NdArray>;

    /// Matrix multiplication of 2-D arrays: [m, k] @ [k, n] -> [m, n].
    fn matmul(&self, a: &NdArray, b: &NdArray) -> Result<NdArray>;

    fn matmul_into(&self, a: &NdArray, b: &NdArray, out: &mut NdArray) -> Result<()>;
}
