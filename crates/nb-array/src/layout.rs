use crate::error::{ArrayError, Result};
use crate::shape::Shape;

/// How an array's logical elements map onto its flat storage.
///
/// Strides are in elements. A stride of 0 repeats the same element along an
/// axis (broadcasting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Vec<usize>,
    offset: usize,
}

impl Layout {
    /// Row-major contiguous layout for `shape`, starting at offset 0.
    pub fn contiguous(shape: Shape) -> Self {
        let strides = shape.strides();
        Layout {
            shape,
            strides,
            offset: 0,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// True if elements are stored in row-major order without gaps.
    pub fn is_contiguous(&self) -> bool {
        self.offset == 0 && self.strides == self.shape.strides()
    }

    /// Layout with all axes reversed, addressing the same storage.
    pub fn transposed(&self) -> Layout {
        Layout {
            shape: self.shape.reversed(),
            strides: self.strides.iter().rev().copied().collect(),
            offset: self.offset,
        }
    }

    /// Layout reading this array as if it had shape `target`.
    pub fn broadcast_to(&self, target: &Shape) -> Result<Layout> {
        if &self.shape == target {
            return Ok(self.clone());
        }
        Ok(Layout {
            shape: target.clone(),
            strides: self.shape.broadcast_strides(&self.strides, target)?,
            offset: self.offset,
        })
    }

    /// Splits off `axis`: returns the layout of the remaining axes together
    /// with the length and stride of the removed one.
    pub fn split_axis(&self, axis: usize) -> Result<(Layout, usize, usize)> {
        let outer_shape = self.shape.without_axis(axis)?;
        let mut strides = self.strides.clone();
        let stride = strides.remove(axis);
        let outer = Layout {
            shape: outer_shape,
            strides,
            offset: self.offset,
        };
        Ok((outer, self.shape.dim(axis), stride))
    }

    /// Storage offsets of every element, in logical row-major order.
    pub fn offsets(&self) -> Offsets<'_> {
        Offsets {
            layout: self,
            index: vec![0; self.shape.ndim()],
            current: self.offset,
            remaining: self.shape.numel(),
        }
    }

    /// Storage offset of a 2-D element.
    pub(crate) fn offset2(&self, row: usize, col: usize) -> usize {
        self.offset + row * self.strides[0] + col * self.strides[1]
    }

    /// Smallest storage length this layout can address.
    pub(crate) fn required_len(&self) -> usize {
        if self.shape.numel() == 0 {
            return 0;
        }
        let last: usize = self
            .shape
            .dims()
            .iter()
            .zip(&self.strides)
            .map(|(d, s)| (d - 1) * s)
            .sum();
        self.offset + last + 1
    }

    pub(crate) fn check_fits(&self, storage_len: usize) -> Result<()> {
        if self.required_len() > storage_len {
            return Err(ArrayError::Other(format!(
                "layout {} needs {} elements but storage has {}",
                self.shape,
                self.required_len(),
                storage_len
            )));
        }
        Ok(())
    }
}

/// Iterator over storage offsets of a [`Layout`].
pub struct Offsets<'a> {
    layout: &'a Layout,
    index: Vec<usize>,
    current: usize,
    remaining: usize,
}

impl Iterator for Offsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.current;
        self.remaining -= 1;
        if self.remaining > 0 {
            let dims = self.layout.shape.dims();
            for axis in (0..dims.len()).rev() {
                self.index[axis] += 1;
                self.current += self.layout.strides[axis];
                if self.index[axis] < dims[axis] {
                    break;
                }
                self.current -= self.layout.strides[axis] * dims[axis];
                self.index[axis] = 0;
            }
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_offsets() {
        let l = Layout::contiguous(Shape::new(vec![2, 3]));
        assert!(l.is_contiguous());
        assert_eq!(l.offsets().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_transposed_offsets() {
        let l = Layout::contiguous(Shape::new(vec![2, 3])).transposed();
        assert_eq!(l.shape().dims(), &[3, 2]);
        assert!(!l.is_contiguous());
        assert_eq!(l.offsets().collect::<Vec<_>>(), vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_broadcast_offsets() {
        let row = Layout::contiguous(Shape::new(vec![1, 3]));
        let b = row.broadcast_to(&Shape::new(vec![2, 3])).unwrap();
        assert_eq!(b.offsets().collect::<Vec<_>>(), vec![0, 1, 2, 0, 1, 2]);

        let col = Layout::contiguous(Shape::new(vec![2, 1]));
        let b = col.broadcast_to(&Shape::new(vec![2, 3])).unwrap();
        assert_eq!(b.offsets().collect::<Vec<_>>(), vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_scalar_layout_yields_once() {
        let l = Layout::contiguous(Shape::new(vec![]));
        assert_eq!(l.offsets().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_split_axis() {
        let l = Layout::contiguous(Shape::new(vec![2, 3]));
        let (outer, len, stride) = l.split_axis(0).unwrap();
        assert_eq!(outer.shape().dims(), &[3]);
        assert_eq!((len, stride), (2, 3));
        assert_eq!(outer.offsets().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_required_len() {
        let l = Layout::contiguous(Shape::new(vec![2, 3]));
        assert_eq!(l.required_len(), 6);
        assert_eq!(l.transposed().required_len(), 6);
        assert!(l.check_fits(5).is_err());
    }
}
