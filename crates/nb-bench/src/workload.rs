//! Operand setup and the two call forms of each benchmarked operation.

use std::hint::black_box;

use nb_array::{
    ArrayError, BinaryOp, ComputeBackend, DType, NdArray, Result as ArrayResult, Scalar, UnaryOp,
};

use crate::case::BenchmarkCase;
use crate::catalog::{Category, Dispatch, Kernel};
use crate::dtypes::{
    self, DtypeInfo, INPLACE_SCALAR_OPERAND, SCALAR_OPERAND, SWEEP_BINARY_OPERANDS,
};
use crate::error::{BenchError, Result};
use crate::shapes::{Operand, ShapeTag};

/// A prepared case: operands allocated, ready to be called repeatedly.
pub trait Workload {
    /// Writes into the pre-allocated output (or, for in-place ops, into the
    /// first operand). Ops without a buffered form keep the default, which
    /// the fallback policy never calls for them.
    fn apply_with_buffer(&mut self) -> ArrayResult<()> {
        Err(ArrayError::Other(
            "operation has no output-buffer call form".to_string(),
        ))
    }

    /// Lets the library allocate a fresh result on every call.
    fn apply_allocating(&mut self) -> ArrayResult<()>;

    /// Restores operands to their canonical fill.
    fn reset(&mut self) -> ArrayResult<()> {
        Ok(())
    }
}

struct Binary<'a> {
    backend: &'a dyn ComputeBackend,
    op: BinaryOp,
    a: NdArray,
    b: NdArray,
    out: NdArray,
}

impl Workload for Binary<'_> {
    fn apply_with_buffer(&mut self) -> ArrayResult<()> {
        self.backend.binary_into(self.op, &self.a, &self.b, &mut self.out)?;
        black_box(&self.out);
        Ok(())
    }

    fn apply_allocating(&mut self) -> ArrayResult<()> {
        black_box(self.backend.binary(self.op, &self.a, &self.b)?);
        Ok(())
    }
}

struct ScalarOp<'a> {
    backend: &'a dyn ComputeBackend,
    op: BinaryOp,
    a: NdArray,
    s: Scalar,
    out: NdArray,
}

impl Workload for ScalarOp<'_> {
    fn apply_with_buffer(&mut self) -> ArrayResult<()> {
        self.backend.scalar_into(self.op, &self.a, self.s, &mut self.out)?;
        black_box(&self.out);
        Ok(())
    }

    fn apply_allocating(&mut self) -> ArrayResult<()> {
        black_box(self.backend.scalar(self.op, &self.a, self.s)?);
        Ok(())
    }
}

struct Unary<'a> {
    backend: &'a dyn ComputeBackend,
    op: UnaryOp,
    a: NdArray,
    out: NdArray,
}

impl Workload for Unary<'_> {
    fn apply_with_buffer(&mut self) -> ArrayResult<()> {
        self.backend.unary_into(self.op, &self.a, &mut self.out)?;
        black_box(&self.out);
        Ok(())
    }

    fn apply_allocating(&mut self) -> ArrayResult<()> {
        black_box(self.backend.unary(self.op, &self.a)?);
        Ok(())
    }
}

/// What an in-place call applies to its target.
enum Update {
    Scalar(BinaryOp, Scalar),
    Unary(UnaryOp),
    Binary(BinaryOp, NdArray),
}

struct InPlace<'a> {
    backend: &'a dyn ComputeBackend,
    update: Update,
    target: NdArray,
    fill: Scalar,
}

impl Workload for InPlace<'_> {
    fn apply_with_buffer(&mut self) -> ArrayResult<()> {
        match &self.update {
            Update::Scalar(op, s) => self.backend.scalar_inplace(*op, &mut self.target, *s)?,
            Update::Unary(op) => self.backend.unary_inplace(*op, &mut self.target)?,
            Update::Binary(op, b) => self.backend.binary_inplace(*op, &mut self.target, b)?,
        }
        black_box(&self.target);
        Ok(())
    }

    fn apply_allocating(&mut self) -> ArrayResult<()> {
        let r = match &self.update {
            Update::Scalar(op, s) => self.backend.scalar(*op, &self.target, *s)?,
            Update::Unary(op) => self.backend.unary(*op, &self.target)?,
            Update::Binary(op, b) => self.backend.binary(*op, &self.target, b)?,
        };
        black_box(r);
        Ok(())
    }

    fn reset(&mut self) -> ArrayResult<()> {
        self.target.fill(self.fill);
        Ok(())
    }
}

struct Reduction<'a> {
    backend: &'a dyn ComputeBackend,
    axis: Option<usize>,
    a: NdArray,
}

impl Workload for Reduction<'_> {
    fn apply_allocating(&mut self) -> ArrayResult<()> {
        match self.axis {
            None => {
                black_box(self.backend.sum(&self.a)?);
            }
            Some(axis) => {
                black_box(self.backend.sum_axis(&self.a, axis)?);
            }
        }
        Ok(())
    }
}

struct Matmul<'a> {
    backend: &'a dyn ComputeBackend,
    a: NdArray,
    b: NdArray,
    out: NdArray,
}

impl Workload for Matmul<'_> {
    fn apply_with_buffer(&mut self) -> ArrayResult<()> {
        self.backend.matmul_into(&self.a, &self.b, &mut self.out)?;
        black_box(&self.out);
        Ok(())
    }

    fn apply_allocating(&mut self) -> ArrayResult<()> {
        black_box(self.backend.matmul(&self.a, &self.b)?);
        Ok(())
    }
}

fn operand(op: &Operand, dtype: DType, value: f64) -> NdArray {
    let a = NdArray::full(&op.dims, dtype, Scalar::new(dtype, value));
    if op.transposed {
        a.transposed()
    } else {
        a
    }
}

/// Fill value of each array operand.
fn operand_values(category: Category, kernel: Kernel, tag: ShapeTag, info: &DtypeInfo) -> [f64; 2] {
    match (category, kernel) {
        (Category::Binary, _) if tag == ShapeTag::SizeSweepPoint => SWEEP_BINARY_OPERANDS,
        (Category::Power, _) => [info.pow_base, info.pow_exponent],
        (_, Kernel::Unary(UnaryOp::Exp)) => [info.exp_fill, info.exp_fill],
        (Category::Reduction | Category::Matmul, _) => [1.0, 1.0],
        _ => [info.fill, info.fill],
    }
}

/// Allocates operands and output for `case`, using the kernel resolved in
/// `dispatch`.
pub fn build<'a>(
    backend: &'a dyn ComputeBackend,
    case: &BenchmarkCase,
    dispatch: &Dispatch,
) -> Result<Box<dyn Workload + 'a>> {
    let spec = case.op();
    let dtype = case.dtype();
    let shape = case.shape();
    let info = dtypes::lookup(dtype);
    let values = operand_values(spec.category, dispatch.kernel, shape.tag, info);

    let mut arrays = shape
        .operands
        .iter()
        .zip(values)
        .map(|(op, v)| operand(op, dtype, v));
    let mut next = || {
        arrays
            .next()
            .ok_or_else(|| BenchError::InvalidCase(format!("{} is missing an operand", spec.name)))
    };
    let out = || NdArray::empty(&shape.output, dtype);

    let workload: Box<dyn Workload + 'a> = match (dispatch.kernel, spec.in_place) {
        (Kernel::Binary(op), false) => Box::new(Binary {
            backend,
            op,
            a: next()?,
            b: next()?,
            out: out(),
        }),
        (Kernel::Binary(op), true) => {
            let target = next()?;
            let b = next()?;
            Box::new(InPlace {
                backend,
                update: Update::Binary(op, b),
                target,
                fill: Scalar::new(dtype, values[0]),
            })
        }
        (Kernel::Scalar(op), false) => Box::new(ScalarOp {
            backend,
            op,
            a: next()?,
            s: Scalar::new(dtype, SCALAR_OPERAND),
            out: out(),
        }),
        (Kernel::Scalar(op), true) => Box::new(InPlace {
            backend,
            update: Update::Scalar(op, Scalar::new(dtype, INPLACE_SCALAR_OPERAND)),
            target: next()?,
            fill: Scalar::new(dtype, values[0]),
        }),
        (Kernel::Unary(op), false) => Box::new(Unary {
            backend,
            op,
            a: next()?,
            out: out(),
        }),
        (Kernel::Unary(op), true) => Box::new(InPlace {
            backend,
            update: Update::Unary(op),
            target: next()?,
            fill: Scalar::new(dtype, values[0]),
        }),
        (Kernel::SumAll, _) => Box::new(Reduction {
            backend,
            axis: None,
            a: next()?,
        }),
        (Kernel::SumAxis(axis), _) => Box::new(Reduction {
            backend,
            axis: Some(axis),
            a: next()?,
        }),
        (Kernel::Matmul, _) => Box::new(Matmul {
            backend,
            a: next()?,
            b: next()?,
            out: out(),
        }),
    };
    Ok(workload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OperationCatalog;
    use crate::shapes;
    use crate::timer::Schedule;
    use nb_array::CpuBackend;

    fn prepare<'a>(
        backend: &'a CpuBackend,
        catalog: &OperationCatalog,
        category: Category,
        in_place: bool,
        name: &str,
        dtype: DType,
        shape: shapes::ShapeSpec,
    ) -> Box<dyn Workload + 'a> {
        let spec = catalog.find(category, in_place, name).unwrap();
        let case = BenchmarkCase::new(spec, dtype, shape, Schedule::new(1, 1)).unwrap();
        let dispatch = catalog.dispatch(&spec, dtype).unwrap();
        build(backend, &case, dispatch).unwrap()
    }

    #[test]
    fn test_binary_both_forms() {
        let backend = CpuBackend::new();
        let catalog = OperationCatalog::new();
        let mut w = prepare(
            &backend,
            &catalog,
            Category::Binary,
            false,
            "mul",
            DType::U8,
            shapes::contiguous(16, 2),
        );
        w.apply_with_buffer().unwrap();
        w.apply_allocating().unwrap();
    }

    #[test]
    fn test_integer_division_buffer_rejected() {
        let backend = CpuBackend::new();
        let catalog = OperationCatalog::new();
        let mut w = prepare(
            &backend,
            &catalog,
            Category::Scalar,
            false,
            "div",
            DType::I16,
            shapes::contiguous(16, 1),
        );
        assert!(matches!(
            w.apply_with_buffer(),
            Err(ArrayError::UnsafeOutputCast { .. })
        ));
        w.apply_allocating().unwrap();
    }

    #[test]
    fn test_inplace_reset_restores_fill() {
        let backend = CpuBackend::new();
        let catalog = OperationCatalog::new();
        let spec = catalog.find(Category::Scalar, true, "add").unwrap();
        let case = BenchmarkCase::new(spec, DType::I8, shapes::contiguous(4, 1), Schedule::new(1, 1))
            .unwrap();
        let dispatch = catalog.dispatch(&spec, DType::I8).unwrap();

        let mut w = InPlace {
            backend: &backend,
            update: Update::Scalar(BinaryOp::Add, Scalar::I8(1)),
            target: NdArray::full(&[4], DType::I8, Scalar::I8(3)),
            fill: Scalar::I8(3),
        };
        for _ in 0..200 {
            w.apply_with_buffer().unwrap();
        }
        // 3 + 200 wraps in int8
        assert_ne!(w.target.to_vec::<i8>().unwrap(), vec![4; 4]);
        w.reset().unwrap();
        w.apply_with_buffer().unwrap();
        assert_eq!(w.target.to_vec::<i8>().unwrap(), vec![4; 4]);

        // the built workload behaves the same way
        let mut built = build(&backend, &case, dispatch).unwrap();
        built.reset().unwrap();
        built.apply_with_buffer().unwrap();
    }

    #[test]
    fn test_inplace_unary_integer_log_rejected() {
        let backend = CpuBackend::new();
        let catalog = OperationCatalog::new();
        let mut w = prepare(
            &backend,
            &catalog,
            Category::Unary,
            true,
            "log",
            DType::U32,
            shapes::contiguous(8, 1),
        );
        assert!(w.apply_with_buffer().is_err());
        w.apply_allocating().unwrap();
    }

    #[test]
    fn test_reduction_has_no_buffer_form() {
        let backend = CpuBackend::new();
        let catalog = OperationCatalog::new();
        let mut w = prepare(
            &backend,
            &catalog,
            Category::Reduction,
            false,
            "sum axis=1",
            DType::F32,
            shapes::reduction_trailing(4, 5),
        );
        assert!(matches!(w.apply_with_buffer(), Err(ArrayError::Other(_))));
        w.apply_allocating().unwrap();
    }

    #[test]
    fn test_strided_and_broadcast_operands() {
        let backend = CpuBackend::new();
        let catalog = OperationCatalog::new();
        for shape in [
            shapes::strided(6, 4, 2),
            shapes::broadcast_row(5, 3),
            shapes::broadcast_outer(5, 3),
            shapes::broadcast_rank(5, 3),
        ] {
            let mut w = prepare(&backend, &catalog, Category::Binary, false, "sub", DType::F64, shape);
            w.apply_with_buffer().unwrap();
        }
    }

    #[test]
    fn test_operand_values() {
        let info = dtypes::lookup(DType::I8);
        let tag = ShapeTag::Contiguous;
        assert_eq!(
            operand_values(Category::Power, Kernel::Binary(BinaryOp::Pow), tag, info),
            [3.0, 3.0]
        );
        assert_eq!(
            operand_values(Category::Unary, Kernel::Unary(UnaryOp::Exp), tag, info),
            [2.0, 2.0]
        );
        assert_eq!(
            operand_values(Category::Matmul, Kernel::Matmul, ShapeTag::MatmulSquare, info),
            [1.0, 1.0]
        );
        assert_eq!(
            operand_values(Category::Binary, Kernel::Binary(BinaryOp::Add), tag, info),
            [3.0, 3.0]
        );
    }

    #[test]
    fn test_binary_sweep_uses_distinct_operands() {
        let info = dtypes::lookup(DType::F32);
        let add = Kernel::Binary(BinaryOp::Add);
        assert_eq!(
            operand_values(Category::Binary, add, ShapeTag::SizeSweepPoint, info),
            [1.5, 2.5]
        );
        // other sweeps keep the per-dtype fill
        assert_eq!(
            operand_values(Category::Scalar, Kernel::Scalar(BinaryOp::Add), ShapeTag::SizeSweepPoint, info),
            [info.fill, info.fill]
        );

        let backend = CpuBackend::new();
        let catalog = OperationCatalog::new();
        let shape = shapes::size_sweep(&[4], 2).next().unwrap();
        let mut w = prepare(&backend, &catalog, Category::Binary, false, "add", DType::F32, shape);
        w.apply_with_buffer().unwrap();
    }
}
