// Sum reductions.

use crate::array::NdArray;
use crate::element::Element;
use crate::error::Result;
use crate::layout::Layout;
use crate::scalar::Scalar;
use crate::storage::dispatch;

/// Sums every element in the accumulator type of the input.
pub(crate) fn sum(a: &NdArray) -> Result<Scalar> {
    Ok(dispatch!(a.storage(), x => sum_typed(x, a.layout()).into_scalar()))
}

/// Sums along `axis`. The result is contiguous with `axis` removed.
pub(crate) fn sum_axis(a: &NdArray, axis: usize) -> Result<NdArray> {
    let (outer, len, stride) = a.layout().split_axis(axis)?;
    let dims = outer.shape().dims().to_vec();
    dispatch!(a.storage(), x => {
        let values = sum_axis_typed(x, &outer, len, stride);
        NdArray::from_vec(values, &dims)
    })
}

fn sum_typed<T: Element>(x: &[T], layout: &Layout) -> T::Acc {
    let mut acc = <T::Acc as Element>::zero();
    if layout.is_contiguous() {
        for &v in &x[..layout.shape().numel()] {
            acc = acc.add(v.widen());
        }
    } else {
        for o in layout.offsets() {
            acc = acc.add(x[o].widen());
        }
    }
    acc
}

fn sum_axis_typed<T: Element>(x: &[T], outer: &Layout, len: usize, stride: usize) -> Vec<T::Acc> {
    outer
        .offsets()
        .map(|base| {
            let mut acc = <T::Acc as Element>::zero();
            for i in 0..len {
                acc = acc.add(x[base + i * stride].widen());
            }
            acc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::error::ArrayError;

    #[test]
    fn test_sum_widens_integers() {
        let a = NdArray::ones(&[300], DType::I8);
        assert_eq!(sum(&a).unwrap(), Scalar::I64(300));

        let a = NdArray::ones(&[1000], DType::U16);
        assert_eq!(sum(&a).unwrap(), Scalar::U64(1000));
    }

    #[test]
    fn test_sum_float_keeps_dtype() {
        let a = NdArray::ones(&[8], DType::F32);
        assert_eq!(sum(&a).unwrap(), Scalar::F32(8.0));
    }

    #[test]
    fn test_sum_axis() {
        let a = NdArray::from_vec(vec![1i32, 2, 3, 4, 5, 6], &[2, 3]).unwrap();

        let rows = sum_axis(&a, 0).unwrap();
        assert_eq!(rows.dtype(), DType::I64);
        assert_eq!(rows.shape().dims(), &[3]);
        assert_eq!(rows.to_vec::<i64>().unwrap(), vec![5, 7, 9]);

        let cols = sum_axis(&a, 1).unwrap();
        assert_eq!(cols.to_vec::<i64>().unwrap(), vec![6, 15]);
    }

    #[test]
    fn test_sum_axis_transposed() {
        let a = NdArray::from_vec(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let t = a.transposed();
        let r = sum_axis(&t, 1).unwrap();
        assert_eq!(r.to_vec::<f64>().unwrap(), vec![5.0, 7.0, 9.0]);
        assert_eq!(sum(&t).unwrap(), Scalar::F64(21.0));
    }

    #[test]
    fn test_sum_axis_out_of_range() {
        let a = NdArray::ones(&[2, 2], DType::F32);
        assert!(matches!(
            sum_axis(&a, 2),
            Err(ArrayError::InvalidAxis { axis: 2, ndim: 2 })
        ));
    }
}
