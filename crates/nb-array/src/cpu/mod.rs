mod binary;
mod matmul;
mod reduce;
mod unary;

use crate::array::NdArray;
use crate::backend::ComputeBackend;
use crate::dtype::DType;
use crate::element::Element;
use crate::error::{ArrayError, Result};
use crate::ops::{BinaryOp, UnaryOp};
use crate::scalar::Scalar;
use crate::shape::Shape;
use crate::storage::Storage;

/// Pure-Rust CPU compute backend.
///
/// Implements all operations with straightforward strided loops optimized
/// for correctness rather than peak performance. Contiguous operands take a
/// flat fast path.
#[derive(Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn binary(&self, op: BinaryOp, a: &NdArray, b: &NdArray) -> Result<NdArray> {
        binary::binary(op, a, b)
    }

    fn binary_into(
        &self,
        op: BinaryOp,
        a: &NdArray,
        b: &NdArray,
        out: &mut NdArray,
    ) -> Result<()> {
        binary::binary_into(op, a, b, out)
    }

    fn binary_inplace(&self, op: BinaryOp, a: &mut NdArray, b: &NdArray) -> Result<()> {
        binary::binary_inplace(op, a, b)
    }

    fn scalar(&self, op: BinaryOp, a: &NdArray, s: Scalar) -> Result<NdArray> {
        binary::scalar(op, a, s)
    }

    fn scalar_into(&self, op: BinaryOp, a: &NdArray, s: Scalar, out: &mut NdArray) -> Result<()> {
        binary::scalar_into(op, a, s, out)
    }

    fn scalar_inplace(&self, op: BinaryOp, a: &mut NdArray, s: Scalar) -> Result<()> {
        binary::scalar_inplace(op, a, s)
    }

    fn unary(&self, op: UnaryOp, a: &NdArray) -> Result<NdArray> {
        unary::unary(op, a)
    }

    fn unary_into(&self, op: UnaryOp, a: &NdArray, out: &mut NdArray) -> Result<()> {
        unary::unary_into(op, a, out)
    }

    fn unary_inplace(&self, op: UnaryOp, a: &mut NdArray) -> Result<()> {
        unary::unary_inplace(op, a)
    }

    fn sum(&self, a: &NdArray) -> Result<Scalar> {
        reduce::sum(a)
    }

    fn sum_axis(&self, a: &NdArray, axis: usize) -> Result<NdArray> {
        reduce::sum_axis(a, axis)
    }

    fn matmul(&self, a: &NdArray, b: &NdArray) -> Result<NdArray> {
        matmul::matmul(a, b)
    }

    fn matmul_into(&self, a: &NdArray, b: &NdArray, out: &mut NdArray) -> Result<()> {
        matmul::matmul_into(a, b, out)
    }
}

/// Operands of a binary kernel must share a dtype; returns it.
pub(crate) fn same_dtype(a: &NdArray, b: &NdArray) -> Result<DType> {
    if a.dtype() != b.dtype() {
        return Err(ArrayError::DTypeMismatch {
            expected: a.dtype(),
            got: b.dtype(),
        });
    }
    Ok(a.dtype())
}

pub(crate) fn check_out_shape(expected: &Shape, out: &NdArray) -> Result<()> {
    if out.shape() != expected {
        return Err(ArrayError::ShapeMismatch {
            expected: expected.dims().to_vec(),
            got: out.shape().dims().to_vec(),
        });
    }
    Ok(())
}

pub(crate) fn out_slice<T: Element>(storage: &mut Storage) -> Result<&mut [T]> {
    let got = storage.dtype();
    storage
        .as_slice_mut::<T>()
        .ok_or(ArrayError::DTypeMismatch {
            expected: T::DTYPE,
            got,
        })
}
