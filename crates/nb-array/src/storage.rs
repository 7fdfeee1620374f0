use crate::dtype::DType;
use crate::element::Element;
use crate::scalar::Scalar;

/// Typed, flat array storage. One variant per supported dtype.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Runs `$body` with `$v` bound to the typed vector inside a [`Storage`].
///
/// Works on `Storage`, `&Storage` and `&mut Storage`; the binding follows
/// the usual match ergonomics.
macro_rules! dispatch {
    ($storage:expr, $v:ident => $body:expr) => {
        match $storage {
            $crate::storage::Storage::I8($v) => $body,
            $crate::storage::Storage::U8($v) => $body,
            $crate::storage::Storage::I16($v) => $body,
            $crate::storage::Storage::U16($v) => $body,
            $crate::storage::Storage::I32($v) => $body,
            $crate::storage::Storage::U32($v) => $body,
            $crate::storage::Storage::I64($v) => $body,
            $crate::storage::Storage::U64($v) => $body,
            $crate::storage::Storage::F32($v) => $body,
            $crate::storage::Storage::F64($v) => $body,
        }
    };
}

/// Like [`dispatch!`] but for two storages that must share a dtype.
/// Falls through to `$mismatch` when they do not.
macro_rules! dispatch_pair {
    ($a:expr, $b:expr, ($x:ident, $y:ident) => $body:expr, _ => $mismatch:expr) => {
        match ($a, $b) {
            ($crate::storage::Storage::I8($x), $crate::storage::Storage::I8($y)) => $body,
            ($crate::storage::Storage::U8($x), $crate::storage::Storage::U8($y)) => $body,
            ($crate::storage::Storage::I16($x), $crate::storage::Storage::I16($y)) => $body,
            ($crate::storage::Storage::U16($x), $crate::storage::Storage::U16($y)) => $body,
            ($crate::storage::Storage::I32($x), $crate::storage::Storage::I32($y)) => $body,
            ($crate::storage::Storage::U32($x), $crate::storage::Storage::U32($y)) => $body,
            ($crate::storage::Storage::I64($x), $crate::storage::Storage::I64($y)) => $body,
            ($crate::storage::Storage::U64($x), $crate::storage::Storage::U64($y)) => $body,
            ($crate::storage::Storage::F32($x), $crate::storage::Storage::F32($y)) => $body,
            ($crate::storage::Storage::F64($x), $crate::storage::Storage::F64($y)) => $body,
            _ => $mismatch,
        }
    };
}

pub(crate) use dispatch;
pub(crate) use dispatch_pair;

fn filled_vec<T: Element>(value: Scalar, n: usize) -> Vec<T> {
    vec![T::from_scalar(value); n]
}

impl Storage {
    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        dispatch!(self, v => v.len())
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage.
    pub fn dtype(&self) -> DType {
        match self {
            Storage::I8(_) => DType::I8,
            Storage::U8(_) => DType::U8,
            Storage::I16(_) => DType::I16,
            Storage::U16(_) => DType::U16,
            Storage::I32(_) => DType::I32,
            Storage::U32(_) => DType::U32,
            Storage::I64(_) => DType::I64,
            Storage::U64(_) => DType::U64,
            Storage::F32(_) => DType::F32,
            Storage::F64(_) => DType::F64,
        }
    }

    /// Create storage of `n` elements of `dtype`, all equal to `value`
    /// converted to `dtype`.
    pub fn filled(dtype: DType, n: usize, value: Scalar) -> Self {
        match dtype {
            DType::I8 => Storage::I8(filled_vec(value, n)),
            DType::U8 => Storage::U8(filled_vec(value, n)),
            DType::I16 => Storage::I16(filled_vec(value, n)),
            DType::U16 => Storage::U16(filled_vec(value, n)),
            DType::I32 => Storage::I32(filled_vec(value, n)),
            DType::U32 => Storage::U32(filled_vec(value, n)),
            DType::I64 => Storage::I64(filled_vec(value, n)),
            DType::U64 => Storage::U64(filled_vec(value, n)),
            DType::F32 => Storage::F32(filled_vec(value, n)),
            DType::F64 => Storage::F64(filled_vec(value, n)),
        }
    }

    /// Create zero-filled storage for the given dtype and element count.
    pub fn zeros(dtype: DType, n: usize) -> Self {
        Self::filled(dtype, n, Scalar::new(dtype, 0.0))
    }

    /// Returns the data as a typed slice, or `None` if `T` is not this
    /// storage's element type.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    /// Mutable counterpart of [`Storage::as_slice`].
    pub fn as_slice_mut<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(self)
    }

    /// Value at flat index `i`, widened to `f64`.
    pub fn get_f64(&self, i: usize) -> Option<f64> {
        dispatch!(self, v => v.get(i).map(|x| x.to_f64()))
    }
}

impl<T: Element> From<Vec<T>> for Storage {
    fn from(values: Vec<T>) -> Self {
        T::into_storage(values)
    }
}
