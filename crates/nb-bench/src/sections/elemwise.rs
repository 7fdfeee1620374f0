use std::io::Write;

use log::info;
use nb_array::DType;

use super::{grid, sweep};
use crate::catalog::Category;
use crate::config::BenchConfig;
use crate::dtypes::LAYOUT_DTYPES;
use crate::error::Result;
use crate::report;
use crate::runner::Harness;
use crate::shapes::{self, dims_label, ShapeSpec};

/// Contiguous, strided, broadcast and size-sweep tables for add/sub/mul/div.
pub fn run(harness: &Harness<'_>, config: &BenchConfig, out: &mut impl Write) -> Result<()> {
    let ops = harness.catalog().select(Category::Binary, false);
    let names: Vec<&str> = ops.iter().map(|o| o.name).collect();
    let iters = config.schedule.iterations;
    let (n, rows, cols) = (config.vector_len, config.rows, config.cols);

    info!("binary: contiguous");
    let measured = grid(harness, &ops, &DType::ALL, config.schedule, |arity| {
        shapes::contiguous(n, arity)
    })?;
    report::dtype_grid(
        format!("CONTIGUOUS BINARY  ({n} elements, {iters} iters)"),
        &names,
        8,
        &measured,
    )?
    .render(out)?;

    info!("binary: strided");
    let measured = grid(harness, &ops, &LAYOUT_DTYPES, config.schedule, |arity| {
        shapes::strided(rows, cols, arity)
    })?;
    report::dtype_grid(
        format!(
            "STRIDED  ({rows}x{cols} transposed, {} elements, {iters} iters)",
            rows * cols
        ),
        &names,
        8,
        &measured,
    )?
    .render(out)?;

    let broadcasts: [(&str, fn(usize, usize) -> ShapeSpec); 3] = [
        ("BROADCAST ROW", shapes::broadcast_row),
        ("BROADCAST OUTER", shapes::broadcast_outer),
        ("BROADCAST RANK", shapes::broadcast_rank),
    ];
    for (title, make) in broadcasts {
        info!("binary: {}", title.to_lowercase());
        let shape = make(rows, cols);
        let operands: Vec<String> = shape
            .operands
            .iter()
            .map(|o| dims_label(&o.logical_dims()))
            .collect();
        let measured = grid(harness, &ops, &LAYOUT_DTYPES, config.schedule, |_| shape.clone())?;
        report::dtype_grid(
            format!(
                "{title}  {} -> {}, {iters} iters",
                operands.join(" + "),
                dims_label(&shape.output)
            ),
            &names,
            8,
            &measured,
        )?
        .render(out)?;
    }

    info!("binary: size sweep");
    let add = harness.catalog().find(Category::Binary, false, "add")?;
    let points = sweep(harness, add, DType::F32, &config.sweep_sizes, config.schedule)?;
    report::size_sweep(format!("SIZE SCALING  (float32 add, {iters} iters)"), &points)?.render(out)?;
    Ok(())
}
