use crate::error::{ArrayError, Result};
use std::fmt;

/// Dimension sizes of an array, outermost first. An empty shape is a 0-d
/// array holding one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    pub fn from_slice(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Panics when `axis` is out of range.
    pub fn dim(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// C-order element strides: `[4, 5, 6]` gives `[30, 6, 1]`.
    pub fn strides(&self) -> Vec<usize> {
        let mut acc = 1;
        let mut out: Vec<usize> = self
            .dims
            .iter()
            .rev()
            .map(|&d| {
                let s = acc;
                acc *= d;
                s
            })
            .collect();
        out.reverse();
        out
    }

    /// The shape with its axes in reverse order.
    pub fn reversed(&self) -> Shape {
        Shape::new(self.dims.iter().rev().copied().collect())
    }

    /// The shape with dimension `axis` removed.
    pub fn without_axis(&self, axis: usize) -> Result<Shape> {
        if axis >= self.ndim() {
            return Err(ArrayError::InvalidAxis {
                axis,
                ndim: self.ndim(),
            });
        }
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Ok(Shape::new(dims))
    }

    /// Result shape of a broadcasting op on `a` and `b`: dims are matched
    /// from the right, missing leading dims count as 1, and each pair must be
    /// equal or contain a 1.
    pub fn broadcast_shape(a: &Shape, b: &Shape) -> Result<Shape> {
        let rank = a.ndim().max(b.ndim());
        let dims = (0..rank)
            .rev()
            .map(|i| match (a.dim_from_right(i), b.dim_from_right(i)) {
                (x, y) if x == y || y == 1 => Ok(x),
                (1, y) => Ok(y),
                _ => Err(ArrayError::BroadcastError {
                    a: a.dims.clone(),
                    b: b.dims.clone(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Shape::new(dims))
    }

    /// Strides that read an array of this shape (laid out with `strides`) as if
    /// it had shape `target`. Broadcast axes get stride 0.
    pub fn broadcast_strides(&self, strides: &[usize], target: &Shape) -> Result<Vec<usize>> {
        if self.ndim() > target.ndim() {
            return Err(ArrayError::BroadcastError {
                a: self.dims.clone(),
                b: target.dims.clone(),
            });
        }
        let pad = target.ndim() - self.ndim();
        let mut out = vec![0usize; target.ndim()];
        for (i, (&d, &s)) in self.dims.iter().zip(strides).enumerate() {
            let t = target.dims[pad + i];
            if d == t {
                out[pad + i] = s;
            } else if d != 1 {
                return Err(ArrayError::BroadcastError {
                    a: self.dims.clone(),
                    b: target.dims.clone(),
                });
            }
        }
        Ok(out)
    }

    fn dim_from_right(&self, i: usize) -> usize {
        if i < self.ndim() {
            self.dims[self.ndim() - 1 - i]
        } else {
            1
        }
    }
}

/// NumPy tuple notation: `(1000,)`, `(1000,1)`.
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner: Vec<String> = self.dims.iter().map(ToString::to_string).collect();
        match inner.as_slice() {
            [only] => write!(f, "({only},)"),
            _ => write!(f, "({})", inner.join(",")),
        }
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let s = Shape::new(vec![4, 5, 6]);
        assert_eq!((s.ndim(), s.numel(), s.dim(2)), (3, 120, 6));
        assert_eq!(s.strides(), vec![30, 6, 1]);
    }

    #[test]
    fn test_zero_dim() {
        let s = Shape::new(vec![]);
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.numel(), 1);
        assert!(s.strides().is_empty());
    }

    #[test]
    fn test_without_axis() {
        let s = Shape::new(vec![4, 5]);
        assert_eq!(s.without_axis(0).unwrap().dims(), &[5]);
        assert_eq!(s.without_axis(1).unwrap().dims(), &[4]);
        assert!(matches!(
            s.without_axis(2),
            Err(ArrayError::InvalidAxis { axis: 2, ndim: 2 })
        ));
    }

    #[test]
    fn test_broadcast_row() {
        let c = Shape::broadcast_shape(&Shape::new(vec![1, 7]), &Shape::new(vec![5, 7])).unwrap();
        assert_eq!(c.dims(), &[5, 7]);
    }

    #[test]
    fn test_broadcast_outer() {
        let c = Shape::broadcast_shape(&Shape::new(vec![5, 1]), &Shape::new(vec![1, 7])).unwrap();
        assert_eq!(c.dims(), &[5, 7]);
    }

    #[test]
    fn test_broadcast_rank() {
        let c = Shape::broadcast_shape(&Shape::new(vec![7]), &Shape::new(vec![5, 7])).unwrap();
        assert_eq!(c.to_string(), "(5,7)");
    }

    #[test]
    fn test_incompatible_dims() {
        let err = Shape::broadcast_shape(&Shape::new(vec![1000, 3]), &Shape::new(vec![4])).unwrap_err();
        assert!(matches!(err, ArrayError::BroadcastError { .. }));
    }

    #[test]
    fn test_broadcast_strides() {
        let target = Shape::new(vec![4, 3]);
        let row = Shape::new(vec![1, 3]);
        assert_eq!(row.broadcast_strides(&[3, 1], &target).unwrap(), vec![0, 1]);
        let col = Shape::new(vec![4, 1]);
        assert_eq!(col.broadcast_strides(&[1, 1], &target).unwrap(), vec![1, 0]);
        let vec = Shape::new(vec![3]);
        assert_eq!(vec.broadcast_strides(&[1], &target).unwrap(), vec![0, 1]);
        assert!(Shape::new(vec![2]).broadcast_strides(&[1], &target).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::new(vec![1000, 1]).to_string(), "(1000,1)");
        assert_eq!(Shape::new(vec![1000]).to_string(), "(1000,)");
    }
}
