use std::io::Write;

use log::info;
use nb_array::DType;

use super::{grid, sweep};
use crate::catalog::Category;
use crate::config::BenchConfig;
use crate::error::Result;
use crate::report;
use crate::runner::Harness;
use crate::shapes;

/// Array-scalar arithmetic, its in-place form, and a float32 size sweep.
pub fn run(harness: &Harness<'_>, config: &BenchConfig, out: &mut impl Write) -> Result<()> {
    let n = config.vector_len;
    let iters = config.schedule.iterations;

    for (in_place, title) in [(false, "SCALAR OPS"), (true, "SCALAR INPLACE")] {
        info!("scalar: {}", title.to_lowercase());
        let ops = harness.catalog().select(Category::Scalar, in_place);
        let names: Vec<&str> = ops.iter().map(|o| o.name).collect();
        let measured = grid(harness, &ops, &DType::ALL, config.schedule, |arity| {
            shapes::contiguous(n, arity)
        })?;
        report::dtype_grid(
            format!("{title}  ({n} elements, {iters} iters)"),
            &names,
            8,
            &measured,
        )?
        .render(out)?;
    }

    info!("scalar: size sweep");
    let add = harness.catalog().find(Category::Scalar, false, "add")?;
    let points = sweep(harness, add, DType::F32, &config.sweep_sizes, config.schedule)?;
    report::size_sweep(
        format!("SIZE SCALING  (float32 add_scalar, {iters} iters)"),
        &points,
    )?
    .render(out)?;
    Ok(())
}
