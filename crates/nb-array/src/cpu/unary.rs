// Unary elementwise kernels.

use super::binary::{map, update};
use super::{check_out_shape, out_slice};
use crate::array::NdArray;
use crate::element::Element;
use crate::error::{check_output_dtype, Result};
use crate::layout::Layout;
use crate::ops::UnaryOp;
use crate::storage::{dispatch, Storage};

pub(crate) fn unary_into(op: UnaryOp, a: &NdArray, out: &mut NdArray) -> Result<()> {
    check_output_dtype(op.result_dtype(a.dtype()), out.dtype())?;
    check_out_shape(a.shape(), out)?;

    let (storage, lo) = out.parts_mut();
    dispatch!(a.storage(), x => unary_typed(op, x, a.layout(), storage, lo))
}

pub(crate) fn unary(op: UnaryOp, a: &NdArray) -> Result<NdArray> {
    let mut out = NdArray::empty(a.shape().dims(), op.result_dtype(a.dtype()));
    unary_into(op, a, &mut out)?;
    Ok(out)
}

pub(crate) fn unary_inplace(op: UnaryOp, a: &mut NdArray) -> Result<()> {
    check_output_dtype(op.result_dtype(a.dtype()), a.dtype())?;

    let (storage, la) = a.parts_mut();
    dispatch!(storage, x => update(x, la, |p| Element::unary(op, p)));
    Ok(())
}

fn unary_typed<T: Element>(
    op: UnaryOp,
    x: &[T],
    lx: &Layout,
    out: &mut Storage,
    lo: &Layout,
) -> Result<()> {
    if op.result_dtype(T::DTYPE) == T::DTYPE {
        map(x, lx, out_slice::<T>(out)?, lo, |p| T::unary(op, p));
    } else {
        map(x, lx, out_slice::<f64>(out)?, lo, |p| op.apply_f64(p.to_f64()));
    }
    Ok(())
}
