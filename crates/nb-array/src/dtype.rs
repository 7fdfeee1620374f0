use std::fmt;

/// Supported element types for array storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 8-bit signed integer.
    I8,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit signed integer.
    I16,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit signed integer.
    I32,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit signed integer.
    I64,
    /// 64-bit unsigned integer.
    U64,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl DType {
    /// Every dtype, in the order benchmark tables list them.
    pub const ALL: [DType; 10] = [
        DType::I8,
        DType::U8,
        DType::I16,
        DType::U16,
        DType::I32,
        DType::U32,
        DType::I64,
        DType::U64,
        DType::F32,
        DType::F64,
    ];

    /// Returns the size in bytes of a single element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::I8 | DType::U8 => 1,
            DType::I16 | DType::U16 => 2,
            DType::I32 | DType::U32 | DType::F32 => 4,
            DType::I64 | DType::U64 | DType::F64 => 8,
        }
    }

    /// Width of one element in bits.
    pub fn bits(&self) -> usize {
        self.size_in_bytes() * 8
    }

    /// Returns true for `F32` and `F64`.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// Returns true for the eight integer types.
    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Returns true if the type can represent negative values.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            DType::I8 | DType::I16 | DType::I32 | DType::I64 | DType::F32 | DType::F64
        )
    }

    /// Canonical lowercase name (`int8`, `uint16`, `float32`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            DType::I8 => "int8",
            DType::U8 => "uint8",
            DType::I16 => "int16",
            DType::U16 => "uint16",
            DType::I32 => "int32",
            DType::U32 => "uint32",
            DType::I64 => "int64",
            DType::U64 => "uint64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }

    /// Accumulator type used by sum reductions.
    ///
    /// - signed integers accumulate in `I64`
    /// - unsigned integers accumulate in `U64`
    /// - floats accumulate in their own type
    pub fn sum_dtype(&self) -> DType {
        match self {
            DType::I8 | DType::I16 | DType::I32 | DType::I64 => DType::I64,
            DType::U8 | DType::U16 | DType::U32 | DType::U64 => DType::U64,
            DType::F32 => DType::F32,
            DType::F64 => DType::F64,
        }
    }

    /// Returns true if every value of `self` is representable in `to`.
    ///
    /// Follows the usual "safe" casting table: widening within a kind,
    /// unsigned into a strictly wider signed type, any integer into `F64`,
    /// 8/16-bit integers into `F32`. Floats never cast safely to integers and
    /// signed integers never cast safely to unsigned ones.
    pub fn can_cast_safely(&self, to: DType) -> bool {
        if *self == to {
            return true;
        }
        match (self.is_float(), to.is_float()) {
            (true, true) => to.bits() >= self.bits(),
            (true, false) => false,
            (false, true) => to == DType::F64 || self.bits() <= 16,
            (false, false) => match (self.is_signed(), to.is_signed()) {
                (true, true) | (false, false) => to.bits() >= self.bits(),
                (false, true) => to.bits() > self.bits(),
                (true, false) => false,
            },
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
