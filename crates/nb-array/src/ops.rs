use std::fmt;

use crate::dtype::DType;

/// Elementwise operations taking two operands (array/array or array/scalar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// True division. Integer inputs produce `F64`.
    Div,
    /// Division rounded toward negative infinity. Keeps the input dtype.
    FloorDiv,
    Pow,
}

impl BinaryOp {
    /// Dtype produced when both operands have dtype `input`.
    pub fn result_dtype(&self, input: DType) -> DType {
        match self {
            BinaryOp::Div if input.is_integer() => DType::F64,
            _ => input,
        }
    }

    /// Applies the operation in `f64`. Used for promoted integer results.
    pub fn apply_f64(&self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::FloorDiv => (a / b).floor(),
            BinaryOp::Pow => a.powf(b),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::FloorDiv => "floor_div",
            BinaryOp::Pow => "pow",
        }
    }
}

/// Elementwise operations taking one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Log,
    Exp,
    Abs,
    Sqrt,
}

impl UnaryOp {
    /// Dtype produced for an input of dtype `input`.
    ///
    /// Transcendental functions and square root promote integers to `F64`;
    /// absolute value keeps the input dtype.
    pub fn result_dtype(&self, input: DType) -> DType {
        match self {
            UnaryOp::Abs => input,
            UnaryOp::Log | UnaryOp::Exp | UnaryOp::Sqrt if input.is_integer() => DType::F64,
            _ => input,
        }
    }

    pub fn apply_f64(&self, x: f64) -> f64 {
        match self {
            UnaryOp::Log => x.ln(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Abs => x.abs(),
            UnaryOp::Sqrt => x.sqrt(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Log => "log",
            UnaryOp::Exp => "exp",
            UnaryOp::Abs => "abs",
            UnaryOp::Sqrt => "sqrt",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_division_promotes() {
        assert_eq!(BinaryOp::Div.result_dtype(DType::I64), DType::F64);
        assert_eq!(BinaryOp::Div.result_dtype(DType::F32), DType::F32);
        assert_eq!(BinaryOp::FloorDiv.result_dtype(DType::I64), DType::I64);
        assert_eq!(BinaryOp::Add.result_dtype(DType::U8), DType::U8);
        assert_eq!(BinaryOp::Pow.result_dtype(DType::I16), DType::I16);
    }

    #[test]
    fn test_unary_promotion() {
        assert_eq!(UnaryOp::Log.result_dtype(DType::I8), DType::F64);
        assert_eq!(UnaryOp::Exp.result_dtype(DType::U32), DType::F64);
        assert_eq!(UnaryOp::Sqrt.result_dtype(DType::I64), DType::F64);
        assert_eq!(UnaryOp::Abs.result_dtype(DType::I8), DType::I8);
        assert_eq!(UnaryOp::Log.result_dtype(DType::F32), DType::F32);
    }

    #[test]
    fn test_apply_f64() {
        assert_eq!(BinaryOp::FloorDiv.apply_f64(-7.0, 2.0), -4.0);
        assert_eq!(BinaryOp::Pow.apply_f64(2.0, 3.0), 8.0);
        assert_eq!(UnaryOp::Sqrt.apply_f64(9.0), 3.0);
    }
}
