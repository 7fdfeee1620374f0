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

/// log/exp/abs/sqrt, their in-place forms, and a float32 sqrt size sweep.
pub fn run(harness: &Harness<'_>, config: &BenchConfig, out: &mut impl Write) -> Result<()> {
    let n = config.vector_len;
    let iters = config.schedule.iterations;

    for (in_place, title) in [(false, "UNARY OPS"), (true, "UNARY INPLACE")] {
        info!("unary: {}", title.to_lowercase());
        let ops = harness.catalog().select(Category::Unary, in_place);
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

    info!("unary: size sweep");
    let sqrt = harness.catalog().find(Category::Unary, false, "sqrt")?;
    let points = sweep(harness, sqrt, DType::F32, &config.sweep_sizes, config.schedule)?;
    report::size_sweep(format!("SIZE SCALING  (float32 sqrt, {iters} iters)"), &points)?
        .render(out)?;
    Ok(())
}
