//! Per-dtype fill values used to populate benchmark operands.
//!
//! Values are small enough that none of the benchmarked operations overflows
//! the narrowest type of its family on a single application.

use nb_array::{DType, Scalar};

/// Seed values for one dtype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DtypeInfo {
    pub dtype: DType,
    /// Default operand value for arithmetic and most unary ops.
    pub fill: f64,
    /// Operand for `exp`; exp(2) still fits `int8`.
    pub exp_fill: f64,
    /// Base operand for `pow`.
    pub pow_base: f64,
    /// Exponent operand for `pow`.
    pub pow_exponent: f64,
}

impl DtypeInfo {
    pub fn fill_scalar(&self) -> Scalar {
        Scalar::new(self.dtype, self.fill)
    }
}

/// Scalar operand of the scalar-arithmetic ops.
pub const SCALAR_OPERAND: f64 = 2.0;

/// Scalar operand of the in-place scalar-arithmetic ops.
pub const INPLACE_SCALAR_OPERAND: f64 = 1.0;

/// Array operands of the float32 binary size sweep.
pub const SWEEP_BINARY_OPERANDS: [f64; 2] = [1.5, 2.5];

/// Dtypes exercised by the strided and broadcast tables.
pub const LAYOUT_DTYPES: [DType; 3] = [DType::I32, DType::F32, DType::F64];

const fn int(dtype: DType, fill: f64) -> DtypeInfo {
    DtypeInfo {
        dtype,
        fill,
        exp_fill: 2.0,
        pow_base: 3.0,
        pow_exponent: 3.0,
    }
}

const fn float(dtype: DType) -> DtypeInfo {
    DtypeInfo {
        dtype,
        fill: 1.5,
        exp_fill: 1.5,
        pow_base: 2.0,
        pow_exponent: 3.0,
    }
}

static CATALOG: [DtypeInfo; 10] = [
    int(DType::I8, 3.0),
    int(DType::U8, 3.0),
    int(DType::I16, 7.0),
    int(DType::U16, 7.0),
    int(DType::I32, 42.0),
    int(DType::U32, 42.0),
    int(DType::I64, 42.0),
    int(DType::U64, 42.0),
    float(DType::F32),
    float(DType::F64),
];

/// All ten dtypes, in table order.
pub fn catalog() -> &'static [DtypeInfo] {
    &CATALOG
}

pub fn lookup(dtype: DType) -> &'static DtypeInfo {
    match dtype {
        DType::I8 => &CATALOG[0],
        DType::U8 => &CATALOG[1],
        DType::I16 => &CATALOG[2],
        DType::U16 => &CATALOG[3],
        DType::I32 => &CATALOG[4],
        DType::U32 => &CATALOG[5],
        DType::I64 => &CATALOG[6],
        DType::U64 => &CATALOG[7],
        DType::F32 => &CATALOG[8],
        DType::F64 => &CATALOG[9],
    }
}
