use std::sync::Arc;

use crate::dtype::DType;
use crate::element::Element;
use crate::error::{ArrayError, Result};
use crate::layout::Layout;
use crate::scalar::Scalar;
use crate::shape::Shape;
use crate::storage::{dispatch, Storage};

/// An n-dimensional array.
///
/// Storage is reference counted so views (such as [`NdArray::transposed`])
/// share data with the array they came from. Writes go through
/// [`NdArray::storage_mut`], which copies the buffer first if it is shared.
#[derive(Debug, Clone)]
pub struct NdArray {
    storage: Arc<Storage>,
    layout: Layout,
}

impl NdArray {
    /// Create a contiguous array from typed values and a shape.
    pub fn from_vec<T: Element>(values: Vec<T>, dims: &[usize]) -> Result<Self> {
        let shape = Shape::from_slice(dims);
        if values.len() != shape.numel() {
            return Err(ArrayError::ShapeMismatch {
                expected: dims.to_vec(),
                got: vec![values.len()],
            });
        }
        Ok(NdArray {
            storage: Arc::new(Storage::from(values)),
            layout: Layout::contiguous(shape),
        })
    }

    /// Wrap existing storage with `layout`.
    pub fn from_storage(storage: Storage, layout: Layout) -> Result<Self> {
        layout.check_fits(storage.len())?;
        Ok(NdArray {
            storage: Arc::new(storage),
            layout,
        })
    }

    /// Create a contiguous array with every element set to `value`
    /// (converted to `dtype`).
    pub fn full(dims: &[usize], dtype: DType, value: Scalar) -> Self {
        let shape = Shape::from_slice(dims);
        NdArray {
            storage: Arc::new(Storage::filled(dtype, shape.numel(), value)),
            layout: Layout::contiguous(shape),
        }
    }

    /// Create a contiguous array of ones.
    pub fn ones(dims: &[usize], dtype: DType) -> Self {
        Self::full(dims, dtype, Scalar::new(dtype, 1.0))
    }

    /// Allocate a contiguous array whose contents are not meaningful.
    ///
    /// Intended as an output buffer; the memory is zeroed.
    pub fn empty(dims: &[usize], dtype: DType) -> Self {
        let shape = Shape::from_slice(dims);
        NdArray {
            storage: Arc::new(Storage::zeros(dtype, shape.numel())),
            layout: Layout::contiguous(shape),
        }
    }

    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn ndim(&self) -> usize {
        self.shape().ndim()
    }

    pub fn numel(&self) -> usize {
        self.shape().numel()
    }

    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Mutable access to the underlying storage, unsharing it if needed.
    pub fn storage_mut(&mut self) -> &mut Storage {
        Arc::make_mut(&mut self.storage)
    }

    /// Storage and layout borrowed together, for kernels that write in place.
    pub(crate) fn parts_mut(&mut self) -> (&mut Storage, &Layout) {
        (Arc::make_mut(&mut self.storage), &self.layout)
    }

    /// A view with all axes reversed. Shares storage with `self`.
    pub fn transposed(&self) -> NdArray {
        NdArray {
            storage: Arc::clone(&self.storage),
            layout: self.layout.transposed(),
        }
    }

    /// Set every element to `value` (converted to this array's dtype).
    pub fn fill(&mut self, value: Scalar) {
        let (storage, layout) = self.parts_mut();
        dispatch!(storage, data => fill_strided(data, layout, value))
    }

    /// Elements in logical row-major order, widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        dispatch!(self.storage.as_ref(), data => self
            .layout
            .offsets()
            .map(|o| data[o].to_f64())
            .collect())
    }

    /// Elements in logical row-major order, as `T`.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        let data = self.storage.as_slice::<T>().ok_or(ArrayError::DTypeMismatch {
            expected: T::DTYPE,
            got: self.dtype(),
        })?;
        Ok(self.layout.offsets().map(|o| data[o]).collect())
    }
}

fn fill_strided<T: Element>(data: &mut [T], layout: &Layout, value: Scalar) {
    let v = T::from_scalar(value);
    if layout.is_contiguous() {
        data[..layout.shape().numel()].fill(v);
    } else {
        for o in layout.offsets() {
            data[o] = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let a = NdArray::from_vec(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(a.shape().dims(), &[2, 3]);
        assert_eq!(a.dtype(), DType::F32);
        assert!(a.is_contiguous());
        assert_eq!(a.to_vec::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_vec_shape_mismatch() {
        assert!(NdArray::from_vec(vec![1i32, 2], &[3]).is_err());
    }

    #[test]
    fn test_full_and_empty() {
        let a = NdArray::full(&[4], DType::I16, Scalar::F64(7.0));
        assert_eq!(a.to_vec::<i16>().unwrap(), vec![7; 4]);

        let e = NdArray::empty(&[2, 2], DType::U64);
        assert_eq!(e.dtype(), DType::U64);
        assert_eq!(e.numel(), 4);
    }

    #[test]
    fn test_transposed_is_view() {
        let a = NdArray::from_vec(vec![1i32, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        let t = a.transposed();
        assert_eq!(t.shape().dims(), &[3, 2]);
        assert!(!t.is_contiguous());
        assert!(Arc::ptr_eq(&a.storage, &t.storage));
        assert_eq!(t.to_vec::<i32>().unwrap(), vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_fill_unshares_view() {
        let a = NdArray::ones(&[2, 2], DType::F64);
        let mut t = a.transposed();
        t.fill(Scalar::F64(3.0));
        assert_eq!(t.to_f64_vec(), vec![3.0; 4]);
        assert_eq!(a.to_f64_vec(), vec![1.0; 4]);
    }

    #[test]
    fn test_to_vec_wrong_type() {
        let a = NdArray::ones(&[2], DType::U8);
        assert!(matches!(
            a.to_vec::<f32>(),
            Err(ArrayError::DTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_storage_checks_length() {
        let layout = Layout::contiguous(Shape::new(vec![3, 3]));
        assert!(NdArray::from_storage(Storage::zeros(DType::I8, 4), layout).is_err());
    }
}
