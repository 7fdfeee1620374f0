//! One module per benchmark entry point. Each `run` prints its tables, in a
//! fixed order, to `out`.

pub mod elemwise;
pub mod matmul;
pub mod pow;
pub mod reduction;
pub mod scalar;
pub mod unary;

use std::io::Write;

use nb_array::DType;

use crate::case::{BenchmarkCase, Measurement};
use crate::catalog::OperationSpec;
use crate::error::Result;
use crate::runner::Harness;
use crate::shapes::{self, ShapeSpec};
use crate::timer::Schedule;

/// Opening lines naming the section, the library version and the backend.
pub fn print_banner(out: &mut impl Write, what: &str, harness: &Harness<'_>) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "  nb-array {what} benchmark")?;
    writeln!(
        out,
        "  nb-array {}  |  backend: {}",
        nb_array::VERSION,
        harness.backend().name()
    )?;
    Ok(())
}

/// Runs every op in `ops` for each dtype, on the shape `shape(arity)`.
/// Rows come back in `dtypes` order, measurements in `ops` order.
pub(crate) fn grid(
    harness: &Harness<'_>,
    ops: &[OperationSpec],
    dtypes: &[DType],
    schedule: Schedule,
    shape: impl Fn(usize) -> ShapeSpec,
) -> Result<Vec<(DType, Vec<Measurement>)>> {
    dtypes
        .iter()
        .map(|&dtype| {
            let row = ops
                .iter()
                .map(|op| {
                    let case = BenchmarkCase::new(*op, dtype, shape(op.arity()), schedule)?;
                    harness.run(&case)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((dtype, row))
        })
        .collect()
}

/// One op on contiguous vectors of every size in `sizes`.
pub(crate) fn sweep(
    harness: &Harness<'_>,
    op: OperationSpec,
    dtype: DType,
    sizes: &[usize],
    schedule: Schedule,
) -> Result<Vec<Measurement>> {
    shapes::size_sweep(sizes, op.arity())
        .map(|shape| harness.run(&BenchmarkCase::new(op, dtype, shape, schedule)?))
        .collect()
}

/// One op on the same shape for each dtype.
pub(crate) fn per_dtype(
    harness: &Harness<'_>,
    op: OperationSpec,
    dtypes: &[DType],
    shape: &ShapeSpec,
    schedule: Schedule,
) -> Result<Vec<Measurement>> {
    dtypes
        .iter()
        .map(|&dtype| harness.run(&BenchmarkCase::new(op, dtype, shape.clone(), schedule)?))
        .collect()
}
