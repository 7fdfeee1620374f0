use std::fmt::Debug;

use crate::dtype::DType;
use crate::ops::{BinaryOp, UnaryOp};
use crate::scalar::Scalar;
use crate::storage::Storage;

/// A primitive type that can live in a [`Storage`] buffer.
///
/// Integer arithmetic wraps on overflow. Integer division and floor division
/// by zero yield 0, and integer powers with a negative exponent yield 0.
pub trait Element: Copy + PartialOrd + Debug + Send + Sync + 'static {
    const DTYPE: DType;

    /// Accumulator used by sum reductions.
    type Acc: Element;

    fn zero() -> Self;
    fn from_scalar(s: Scalar) -> Self;
    fn into_scalar(self) -> Scalar;
    fn to_f64(self) -> f64;
    fn widen(self) -> Self::Acc;

    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn mul(self, other: Self) -> Self;
    fn div(self, other: Self) -> Self;
    fn floor_div(self, other: Self) -> Self;
    fn pow(self, other: Self) -> Self;

    /// Applies `op` without changing type.
    fn unary(op: UnaryOp, x: Self) -> Self;

    fn binary(op: BinaryOp, a: Self, b: Self) -> Self {
        match op {
            BinaryOp::Add => a.add(b),
            BinaryOp::Sub => a.sub(b),
            BinaryOp::Mul => a.mul(b),
            BinaryOp::Div => a.div(b),
            BinaryOp::FloorDiv => a.floor_div(b),
            BinaryOp::Pow => a.pow(b),
        }
    }

    fn slice(storage: &Storage) -> Option<&[Self]>;
    fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]>;
    fn into_storage(values: Vec<Self>) -> Storage;
}

macro_rules! scalar_as {
    ($s:expr, $t:ty) => {
        match $s {
            Scalar::I8(v) => v as $t,
            Scalar::U8(v) => v as $t,
            Scalar::I16(v) => v as $t,
            Scalar::U16(v) => v as $t,
            Scalar::I32(v) => v as $t,
            Scalar::U32(v) => v as $t,
            Scalar::I64(v) => v as $t,
            Scalar::U64(v) => v as $t,
            Scalar::F32(v) => v as $t,
            Scalar::F64(v) => v as $t,
        }
    };
}

macro_rules! storage_access {
    ($variant:ident, $t:ty) => {
        fn slice(storage: &Storage) -> Option<&[$t]> {
            match storage {
                Storage::$variant(v) => Some(v.as_slice()),
                _ => None,
            }
        }

        fn slice_mut(storage: &mut Storage) -> Option<&mut [$t]> {
            match storage {
                Storage::$variant(v) => Some(v.as_mut_slice()),
                _ => None,
            }
        }

        fn into_storage(values: Vec<$t>) -> Storage {
            Storage::$variant(values)
        }
    };
}

macro_rules! impl_signed {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;
            type Acc = i64;

            fn zero() -> Self {
                0
            }

            fn from_scalar(s: Scalar) -> Self {
                scalar_as!(s, $t)
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn widen(self) -> i64 {
                self as i64
            }

            fn add(self, other: Self) -> Self {
                self.wrapping_add(other)
            }

            fn sub(self, other: Self) -> Self {
                self.wrapping_sub(other)
            }

            fn mul(self, other: Self) -> Self {
                self.wrapping_mul(other)
            }

            fn div(self, other: Self) -> Self {
                if other == 0 {
                    0
                } else {
                    self.wrapping_div(other)
                }
            }

            fn floor_div(self, other: Self) -> Self {
                if other == 0 {
                    return 0;
                }
                let q = self.wrapping_div(other);
                if self.wrapping_rem(other) != 0 && ((self < 0) != (other < 0)) {
                    q.wrapping_sub(1)
                } else {
                    q
                }
            }

            fn pow(self, other: Self) -> Self {
                match u32::try_from(other) {
                    Ok(e) => self.wrapping_pow(e),
                    Err(_) => 0,
                }
            }

            fn unary(op: UnaryOp, x: Self) -> Self {
                match op {
                    UnaryOp::Abs => x.wrapping_abs(),
                    _ => op.apply_f64(x as f64) as $t,
                }
            }

            storage_access!($variant, $t);
        }
    };
}

macro_rules! impl_unsigned {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;
            type Acc = u64;

            fn zero() -> Self {
                0
            }

            fn from_scalar(s: Scalar) -> Self {
                scalar_as!(s, $t)
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn widen(self) -> u64 {
                self as u64
            }

            fn add(self, other: Self) -> Self {
                self.wrapping_add(other)
            }

            fn sub(self, other: Self) -> Self {
                self.wrapping_sub(other)
            }

            fn mul(self, other: Self) -> Self {
                self.wrapping_mul(other)
            }

            fn div(self, other: Self) -> Self {
                if other == 0 {
                    0
                } else {
                    self / other
                }
            }

            fn floor_div(self, other: Self) -> Self {
                Element::div(self, other)
            }

            fn pow(self, other: Self) -> Self {
                match u32::try_from(other) {
                    Ok(e) => self.wrapping_pow(e),
                    Err(_) => 0,
                }
            }

            fn unary(op: UnaryOp, x: Self) -> Self {
                match op {
                    UnaryOp::Abs => x,
                    _ => op.apply_f64(x as f64) as $t,
                }
            }

            storage_access!($variant, $t);
        }
    };
}

macro_rules! impl_float {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;
            type Acc = $t;

            fn zero() -> Self {
                0.0
            }

            fn from_scalar(s: Scalar) -> Self {
                scalar_as!(s, $t)
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn widen(self) -> $t {
                self
            }

            fn add(self, other: Self) -> Self {
                self + other
            }

            fn sub(self, other: Self) -> Self {
                self - other
            }

            fn mul(self, other: Self) -> Self {
                self * other
            }

            fn div(self, other: Self) -> Self {
                self / other
            }

            fn floor_div(self, other: Self) -> Self {
                (self / other).floor()
            }

            fn pow(self, other: Self) -> Self {
                self.powf(other)
            }

            fn unary(op: UnaryOp, x: Self) -> Self {
                match op {
                    UnaryOp::Log => x.ln(),
                    UnaryOp::Exp => x.exp(),
                    UnaryOp::Abs => x.abs(),
                    UnaryOp::Sqrt => x.sqrt(),
                }
            }

            storage_access!($variant, $t);
        }
    };
}

impl_signed!(i8, I8);
impl_signed!(i16, I16);
impl_signed!(i32, I32);
impl_signed!(i64, I64);
impl_unsigned!(u8, U8);
impl_unsigned!(u16, U16);
impl_unsigned!(u32, U32);
impl_unsigned!(u64, U64);
impl_float!(f32, F32);
impl_float!(f64, F64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_wrapping() {
        assert_eq!(Element::add(i8::MAX, 1i8), i8::MIN);
        assert_eq!(Element::sub(0u8, 1u8), u8::MAX);
    }

    #[test]
    fn test_floor_div() {
        assert_eq!(Element::floor_div(-7i32, 2), -4);
        assert_eq!(Element::floor_div(7i32, 2), 3);
        assert_eq!(Element::floor_div(7i32, -2), -4);
        assert_eq!(Element::floor_div(7u16, 2), 3);
        assert_eq!(Element::floor_div(-7.0f64, 2.0), -4.0);
    }

    #[test]
    fn test_division_by_zero_integers() {
        assert_eq!(Element::div(5i64, 0), 0);
        assert_eq!(Element::floor_div(5u8, 0), 0);
    }

    #[test]
    fn test_pow() {
        assert_eq!(Element::pow(3i8, 3), 27);
        assert_eq!(Element::pow(3u64, 3), 27);
        assert_eq!(Element::pow(2i32, -1), 0);
        assert_eq!(Element::pow(2.0f32, 3.0), 8.0);
    }

    #[test]
    fn test_unary() {
        assert_eq!(<i16 as Element>::unary(UnaryOp::Abs, -4), 4);
        assert_eq!(<u16 as Element>::unary(UnaryOp::Abs, 4), 4);
        assert_eq!(<f64 as Element>::unary(UnaryOp::Sqrt, 16.0), 4.0);
    }

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(<u8 as Element>::from_scalar(Scalar::F64(3.0)), 3);
        assert_eq!(42i32.into_scalar(), Scalar::I32(42));
        assert_eq!(7u16.widen(), 7u64);
        assert_eq!((-3i8).widen(), -3i64);
    }
}
