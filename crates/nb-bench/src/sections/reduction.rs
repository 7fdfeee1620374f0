use std::io::Write;

use log::info;
use nb_array::DType;

use super::{per_dtype, sweep};
use crate::catalog::Category;
use crate::config::BenchConfig;
use crate::error::Result;
use crate::report;
use crate::runner::Harness;
use crate::shapes;

/// Full sum, sum over each axis of a matrix, and a float32 size sweep.
pub fn run(harness: &Harness<'_>, config: &BenchConfig, out: &mut impl Write) -> Result<()> {
    let catalog = harness.catalog();
    let (n, rows, cols) = (config.vector_len, config.rows, config.cols);
    let iters = config.schedule.iterations;
    let total = rows * cols;

    info!("reduction: full");
    let sum = catalog.find(Category::Reduction, false, "sum")?;
    let measured = per_dtype(harness, sum, &DType::ALL, &shapes::reduction_full(n), config.schedule)?;
    report::dtype_list(
        format!("SUM (full reduction)  ({n} elements, {iters} iters)"),
        &measured,
    )?
    .render(out)?;

    let axes = [
        ("sum axis=0", shapes::reduction_leading(rows, cols)),
        ("sum axis=1", shapes::reduction_trailing(rows, cols)),
    ];
    for (name, shape) in axes {
        info!("reduction: {name}");
        let op = catalog.find(Category::Reduction, false, name)?;
        let measured = per_dtype(harness, op, &DType::ALL, &shape, config.schedule)?;
        report::dtype_list(
            format!(
                "{}  ({rows}x{cols} = {total} elements, {iters} iters)",
                name.to_uppercase()
            ),
            &measured,
        )?
        .render(out)?;
    }

    info!("reduction: size sweep");
    let points = sweep(harness, sum, DType::F32, &config.sweep_sizes, config.schedule)?;
    report::size_sweep(format!("SIZE SCALING  (float32 sum, {iters} iters)"), &points)?
        .render(out)?;
    Ok(())
}
