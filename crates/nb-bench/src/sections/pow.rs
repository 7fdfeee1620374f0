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

/// `pow` and in-place `pow` side by side, then a float32 size sweep.
pub fn run(harness: &Harness<'_>, config: &BenchConfig, out: &mut impl Write) -> Result<()> {
    let n = config.vector_len;
    let iters = config.schedule.iterations;

    info!("pow: contiguous");
    let catalog = harness.catalog();
    let ops = [
        catalog.find(Category::Power, false, "pow")?,
        catalog.find(Category::Power, true, "pow")?,
    ];
    // both ops are named "pow"; the table labels the in-place column
    let measured = grid(harness, &ops, &DType::ALL, config.schedule, |arity| {
        shapes::contiguous(n, arity)
    })?;
    report::dtype_grid(
        format!("POW CONTIGUOUS  ({n} elements, {iters} iters)"),
        &["pow", "inplace"],
        10,
        &measured,
    )?
    .render(out)?;

    info!("pow: size sweep");
    let points = sweep(harness, ops[0], DType::F32, &config.sweep_sizes, config.schedule)?;
    report::size_sweep(format!("SIZE SCALING  (float32 pow, {iters} iters)"), &points)?
        .render(out)?;
    Ok(())
}
