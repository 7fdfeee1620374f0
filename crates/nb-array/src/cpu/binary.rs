// Binary and scalar elementwise kernels.

use super::{check_out_shape, out_slice, same_dtype};
use crate::array::NdArray;
use crate::element::Element;
use crate::error::{check_output_dtype, ArrayError, Result};
use crate::layout::Layout;
use crate::ops::BinaryOp;
use crate::scalar::Scalar;
use crate::shape::Shape;
use crate::storage::{dispatch, dispatch_pair, Storage};

pub(crate) fn binary_into(op: BinaryOp, a: &NdArray, b: &NdArray, out: &mut NdArray) -> Result<()> {
    let dtype = same_dtype(a, b)?;
    check_output_dtype(op.result_dtype(dtype), out.dtype())?;
    let shape = Shape::broadcast_shape(a.shape(), b.shape())?;
    check_out_shape(&shape, out)?;

    let la = a.layout().broadcast_to(&shape)?;
    let lb = b.layout().broadcast_to(&shape)?;
    let (storage, lo) = out.parts_mut();
    dispatch_pair!(a.storage(), b.storage(), (x, y) => binary_typed(op, x, &la, y, &lb, storage, lo), _ => Err(ArrayError::DTypeMismatch {
        expected: a.dtype(),
        got: b.dtype(),
    }))
}

pub(crate) fn binary(op: BinaryOp, a: &NdArray, b: &NdArray) -> Result<NdArray> {
    let dtype = same_dtype(a, b)?;
    let shape = Shape::broadcast_shape(a.shape(), b.shape())?;
    let mut out = NdArray::empty(shape.dims(), op.result_dtype(dtype));
    binary_into(op, a, b, &mut out)?;
    Ok(out)
}

pub(crate) fn binary_inplace(op: BinaryOp, a: &mut NdArray, b: &NdArray) -> Result<()> {
    let dtype = same_dtype(a, b)?;
    check_output_dtype(op.result_dtype(dtype), dtype)?;
    let shape = Shape::broadcast_shape(a.shape(), b.shape())?;
    check_out_shape(&shape, a)?;

    let lb = b.layout().broadcast_to(&shape)?;
    let (storage, la) = a.parts_mut();
    dispatch_pair!(storage, b.storage(), (x, y) => {
        zip_update(x, la, y, &lb, |p, q| Element::binary(op, p, q));
        Ok(())
    }, _ => Err(ArrayError::DTypeMismatch {
        expected: dtype,
        got: b.dtype(),
    }))
}

pub(crate) fn scalar_into(op: BinaryOp, a: &NdArray, s: Scalar, out: &mut NdArray) -> Result<()> {
    check_output_dtype(op.result_dtype(a.dtype()), out.dtype())?;
    check_out_shape(a.shape(), out)?;

    let (storage, lo) = out.parts_mut();
    dispatch!(a.storage(), x => scalar_typed(op, x, a.layout(), s, storage, lo))
}

pub(crate) fn scalar(op: BinaryOp, a: &NdArray, s: Scalar) -> Result<NdArray> {
    let mut out = NdArray::empty(a.shape().dims(), op.result_dtype(a.dtype()));
    scalar_into(op, a, s, &mut out)?;
    Ok(out)
}

pub(crate) fn scalar_inplace(op: BinaryOp, a: &mut NdArray, s: Scalar) -> Result<()> {
    check_output_dtype(op.result_dtype(a.dtype()), a.dtype())?;

    let (storage, la) = a.parts_mut();
    dispatch!(storage, x => scalar_inplace_typed(op, x, la, s));
    Ok(())
}

fn binary_typed<T: Element>(
    op: BinaryOp,
    x: &[T],
    lx: &Layout,
    y: &[T],
    ly: &Layout,
    out: &mut Storage,
    lo: &Layout,
) -> Result<()> {
    if op.result_dtype(T::DTYPE) == T::DTYPE {
        let o = out_slice::<T>(out)?;
        zip_map(x, lx, y, ly, o, lo, |p, q| T::binary(op, p, q));
    } else {
        let o = out_slice::<f64>(out)?;
        zip_map(x, lx, y, ly, o, lo, |p, q| op.apply_f64(p.to_f64(), q.to_f64()));
    }
    Ok(())
}

fn scalar_typed<T: Element>(
    op: BinaryOp,
    x: &[T],
    lx: &Layout,
    s: Scalar,
    out: &mut Storage,
    lo: &Layout,
) -> Result<()> {
    let s = T::from_scalar(s);
    if op.result_dtype(T::DTYPE) == T::DTYPE {
        let o = out_slice::<T>(out)?;
        map(x, lx, o, lo, |p| T::binary(op, p, s));
    } else {
        let o = out_slice::<f64>(out)?;
        let sf = s.to_f64();
        map(x, lx, o, lo, |p| op.apply_f64(p.to_f64(), sf));
    }
    Ok(())
}

fn scalar_inplace_typed<T: Element>(op: BinaryOp, x: &mut [T], lx: &Layout, s: Scalar) {
    let s = T::from_scalar(s);
    update(x, lx, |p| T::binary(op, p, s));
}

/// `x[i] = f(x[i])` over the logical elements of `lx`.
pub(super) fn update<T: Copy>(x: &mut [T], lx: &Layout, f: impl Fn(T) -> T) {
    if lx.is_contiguous() {
        for v in x[..lx.shape().numel()].iter_mut() {
            *v = f(*v);
        }
    } else {
        for o in lx.offsets() {
            x[o] = f(x[o]);
        }
    }
}

/// `x[i] = f(x[i], y[i])`; `ly` is already broadcast to `lx`'s shape.
fn zip_update<T: Copy>(x: &mut [T], lx: &Layout, y: &[T], ly: &Layout, f: impl Fn(T, T) -> T) {
    if lx.is_contiguous() && ly.is_contiguous() {
        let n = lx.shape().numel();
        for (v, &q) in x[..n].iter_mut().zip(&y[..n]) {
            *v = f(*v, q);
        }
    } else {
        for (ox, oy) in lx.offsets().zip(ly.offsets()) {
            x[ox] = f(x[ox], y[oy]);
        }
    }
}

/// `out[i] = f(x[i], y[i])` over the logical elements of `lo`.
fn zip_map<A: Copy, B: Copy, O>(
    x: &[A],
    lx: &Layout,
    y: &[B],
    ly: &Layout,
    out: &mut [O],
    lo: &Layout,
    f: impl Fn(A, B) -> O,
) {
    if lx.is_contiguous() && ly.is_contiguous() && lo.is_contiguous() {
        let n = lo.shape().numel();
        for ((o, &p), &q) in out[..n].iter_mut().zip(&x[..n]).zip(&y[..n]) {
            *o = f(p, q);
        }
    } else {
        for ((oo, ox), oy) in lo.offsets().zip(lx.offsets()).zip(ly.offsets()) {
            out[oo] = f(x[ox], y[oy]);
        }
    }
}

/// `out[i] = f(x[i])` over the logical elements of `lo`.
pub(super) fn map<A: Copy, O>(x: &[A], lx: &Layout, out: &mut [O], lo: &Layout, f: impl Fn(A) -> O) {
    if lx.is_contiguous() && lo.is_contiguous() {
        let n = lo.shape().numel();
        for (o, &p) in out[..n].iter_mut().zip(&x[..n]) {
            *o = f(p);
        }
    } else {
        for (oo, ox) in lo.offsets().zip(lx.offsets()) {
            out[oo] = f(x[ox]);
        }
    }
}
