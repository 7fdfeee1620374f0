use std::io::Write;

use log::info;
use nb_array::DType;

use super::per_dtype;
use crate::case::BenchmarkCase;
use crate::catalog::Category;
use crate::config::BenchConfig;
use crate::error::Result;
use crate::report;
use crate::runner::Harness;
use crate::shapes::{self, MATMUL_DTYPE_N, MATMUL_FIXED_SCHEDULE};

/// Square size sweep, dtype comparison and rectangular shape variants.
///
/// Matmul carries its own schedules; `config` is accepted for a uniform
/// section signature.
pub fn run(harness: &Harness<'_>, _config: &BenchConfig, out: &mut impl Write) -> Result<()> {
    let mm = harness.catalog().find(Category::Matmul, false, "matmul")?;

    info!("matmul: square sweep");
    let cases = shapes::matmul_square_sweep()
        .map(|(shape, schedule)| BenchmarkCase::new(mm, DType::F32, shape, schedule))
        .collect::<Result<Vec<_>>>()?;
    let measured = harness.run_all(&cases)?;
    report::matmul_square("SQUARE SIZE SCALING  (float32, NxN @ NxN -> NxN)", &measured)?
        .render(out)?;

    info!("matmul: dtype comparison");
    let (shape, schedule) = shapes::matmul_dtype_sweep();
    let measured = per_dtype(harness, mm, &DType::ALL, &shape, schedule)?;
    let n = MATMUL_DTYPE_N;
    report::matmul_dtypes(
        format!(
            "DTYPE COMPARISON  ({n}x{n} @ {n}x{n}, {} iters)",
            schedule.iterations
        ),
        &measured,
    )?
    .render(out)?;

    info!("matmul: shape variants");
    let cases = shapes::matmul_shape_variants()
        .map(|(shape, schedule)| BenchmarkCase::new(mm, DType::F32, shape, schedule))
        .collect::<Result<Vec<_>>>()?;
    let measured = harness.run_all(&cases)?;
    report::shape_variants(
        format!(
            "SHAPE VARIANTS  (float32, {} iters)",
            MATMUL_FIXED_SCHEDULE.iterations
        ),
        &measured,
    )?
    .render(out)?;
    Ok(())
}
