// Matrix multiplication.
//
// Uses the i-p-j loop order so the innermost loop walks rows of `b` and `out`.
// Operands may be strided (for example transposed views).

use super::{check_out_shape, out_slice, same_dtype};
use crate::array::NdArray;
use crate::element::Element;
use crate::error::{check_output_dtype, ArrayError, Result};
use crate::layout::Layout;
use crate::shape::Shape;
use crate::storage::dispatch_pair;

fn dims(a: &NdArray, b: &NdArray) -> Result<(usize, usize, usize)> {
    if a.ndim() != 2 || b.ndim() != 2 {
        return Err(ArrayError::Other(format!(
            "matmul: expected 2-D operands, got {} and {}",
            a.shape(),
            b.shape()
        )));
    }
    let (m, k) = (a.shape().dim(0), a.shape().dim(1));
    let (k2, n) = (b.shape().dim(0), b.shape().dim(1));
    if k != k2 {
        return Err(ArrayError::MatmulMismatch { m, k, k2, n });
    }
    Ok((m, k, n))
}

pub(crate) fn matmul_into(a: &NdArray, b: &NdArray, out: &mut NdArray) -> Result<()> {
    let dtype = same_dtype(a, b)?;
    let (m, k, n) = dims(a, b)?;
    check_output_dtype(dtype, out.dtype())?;
    check_out_shape(&Shape::new(vec![m, n]), out)?;

    let (storage, lo) = out.parts_mut();
    dispatch_pair!(a.storage(), b.storage(), (x, y) => {
        let o = out_slice(storage)?;
        matmul_typed(x, a.layout(), y, b.layout(), o, lo, (m, k, n));
        Ok(())
    }, _ => Err(ArrayError::DTypeMismatch {
        expected: a.dtype(),
        got: b.dtype(),
    }))
}

pub(crate) fn matmul(a: &NdArray, b: &NdArray) -> Result<NdArray> {
    let dtype = same_dtype(a, b)?;
    let (m, _, n) = dims(a, b)?;
    let mut out = NdArray::empty(&[m, n], dtype);
    matmul_into(a, b, &mut out)?;
    Ok(out)
}

fn matmul_typed<T: Element>(
    x: &[T],
    lx: &Layout,
    y: &[T],
    ly: &Layout,
    out: &mut [T],
    lo: &Layout,
    (m, k, n): (usize, usize, usize),
) {
    for i in 0..m {
        for j in 0..n {
            out[lo.offset2(i, j)] = T::zero();
        }
        for p in 0..k {
            let av = x[lx.offset2(i, p)];
            for j in 0..n {
                let o = lo.offset2(i, j);
                out[o] = out[o].add(av.mul(y[ly.offset2(p, j)]));
            }
        }
    }
}
