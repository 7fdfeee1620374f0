//! Fixed-width text tables.

use std::io::{self, Write};

use nb_array::DType;

use crate::case::Measurement;
use crate::error::{BenchError, Result};
use crate::metrics::matmul_flops;

/// Width of the heavy line that opens an elementwise section.
pub const SECTION_BANNER: usize = 82;

/// Width of the heavy line that opens a matmul section.
pub const MATMUL_BANNER: usize = 60;

const INDENT: &str = "  ";
const FALLBACK_LEGEND: &str = "* output buffer rejected; allocating call form timed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// The leftmost column, holding the row label.
#[derive(Debug, Clone)]
pub struct LabelColumn {
    header: String,
    width: usize,
    align: Align,
}

impl LabelColumn {
    pub fn left(header: &str, width: usize) -> Self {
        LabelColumn {
            header: header.to_string(),
            width,
            align: Align::Left,
        }
    }

    pub fn right(header: &str, width: usize) -> Self {
        LabelColumn {
            header: header.to_string(),
            width,
            align: Align::Right,
        }
    }

    fn pad(&self, text: &str) -> String {
        match self.align {
            Align::Left => format!("{text:<w$}", w = self.width),
            Align::Right => format!("{text:>w$}", w = self.width),
        }
    }
}

/// A right-aligned numeric column.
#[derive(Debug, Clone)]
pub struct Column {
    header: String,
    unit: Option<String>,
    width: usize,
    precision: usize,
    gap: usize,
    suffix: &'static str,
}

impl Column {
    pub fn new(header: &str, width: usize, precision: usize) -> Self {
        Column {
            header: header.to_string(),
            unit: None,
            width,
            precision,
            gap: 1,
            suffix: "",
        }
    }

    /// Second header line, e.g. `(us)`.
    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// Spaces before the column.
    pub fn gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    /// Text appended after every value.
    pub fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }

    fn span(&self) -> usize {
        self.gap + self.width + self.suffix.len()
    }

    fn render(&self, cell: &Cell) -> String {
        let (w, p) = (self.width, self.precision);
        let body = match *cell {
            Cell::Float(v) => format!("{v:>w$.p$}"),
            Cell::Int(v) => format!("{v:>w$}"),
            Cell::Marked(v) => format!("{v:>w$.p$}*", w = w.saturating_sub(1)),
        };
        format!("{}{body}{}", " ".repeat(self.gap), self.suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Float(f64),
    Int(usize),
    /// A value measured through the allocating fallback.
    Marked(f64),
}

impl Cell {
    fn timed(value: f64, m: &Measurement) -> Cell {
        if m.used_fallback {
            Cell::Marked(value)
        } else {
            Cell::Float(value)
        }
    }
}

#[derive(Debug, Clone)]
struct Row {
    label: String,
    cells: Vec<Cell>,
}

/// Rows and named columns for one benchmark section.
#[derive(Debug, Clone)]
pub struct ResultTable {
    title: String,
    banner: usize,
    label: LabelColumn,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl ResultTable {
    pub fn new(title: impl Into<String>, banner: usize, label: LabelColumn) -> Self {
        ResultTable {
            title: title.into(),
            banner,
            label,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<Cell>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(BenchError::InvalidCase(format!(
                "table '{}' has {} columns, row has {} cells",
                self.title,
                self.columns.len(),
                cells.len()
            )));
        }
        self.rows.push(Row {
            label: label.into(),
            cells,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Characters from the label column to the end of the last column.
    pub fn width(&self) -> usize {
        self.label.width + self.columns.iter().map(Column::span).sum::<usize>()
    }

    fn has_marks(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.cells.iter().any(|c| matches!(c, Cell::Marked(_))))
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", "━".repeat(self.banner))?;
        writeln!(out, "{INDENT}{}", self.title)?;
        writeln!(out)?;

        let mut header = format!("{INDENT}{}", self.label.pad(&self.label.header));
        for c in &self.columns {
            let w = c.width + c.suffix.len();
            header.push_str(&format!("{}{:>w$}", " ".repeat(c.gap), c.header));
        }
        writeln!(out, "{}", header.trim_end())?;

        if self.columns.iter().any(|c| c.unit.is_some()) {
            let mut units = format!("{INDENT}{}", " ".repeat(self.label.width));
            for c in &self.columns {
                let w = c.width + c.suffix.len();
                let unit = c.unit.as_deref().unwrap_or("");
                units.push_str(&format!("{}{unit:>w$}", " ".repeat(c.gap)));
            }
            writeln!(out, "{}", units.trim_end())?;
        }

        writeln!(out, "{INDENT}{}", "─".repeat(self.width()))?;

        for row in &self.rows {
            let mut line = format!("{INDENT}{}", self.label.pad(&row.label));
            for (c, cell) in self.columns.iter().zip(&row.cells) {
                line.push_str(&c.render(cell));
            }
            writeln!(out, "{line}")?;
        }

        if self.has_marks() {
            writeln!(out)?;
            writeln!(out, "{INDENT}{FALLBACK_LEGEND}")?;
        }
        Ok(())
    }
}

/// Per-dtype grid: one time column and one Mop/s column per operation.
/// Each row's measurements must follow `op_names`.
pub fn dtype_grid(
    title: impl Into<String>,
    op_names: &[&str],
    width: usize,
    rows: &[(DType, Vec<Measurement>)],
) -> Result<ResultTable> {
    let mut table = ResultTable::new(title, SECTION_BANNER, LabelColumn::left("dtype", 8));
    for name in op_names {
        table = table.column(Column::new(name, width, 2).unit("(us)"));
    }
    for (i, name) in op_names.iter().enumerate() {
        let gap = if i == 0 { 3 } else { 1 };
        table = table.column(Column::new(name, width, 1).unit("(Mop/s)").gap(gap));
    }
    for (dtype, ms) in rows {
        let times = ms.iter().map(|m| Cell::timed(m.micros_per_call, m));
        let mops = ms.iter().map(|m| Cell::timed(m.metrics.mops, m));
        table.push_row(dtype.name(), times.chain(mops).collect())?;
    }
    Ok(table)
}

/// Size sweep: elements, time, Mop/s and GB/s per point.
pub fn size_sweep(title: impl Into<String>, points: &[Measurement]) -> Result<ResultTable> {
    let mut table = ResultTable::new(title, SECTION_BANNER, LabelColumn::right("elements", 10))
        .column(Column::new("time (us)", 10, 2))
        .column(Column::new("Mops/s", 10, 1))
        .column(Column::new("GB/s", 10, 2));
    for m in points {
        let gbs = m.metrics.gb_per_s.unwrap_or(0.0);
        table.push_row(
            m.case.element_count().to_string(),
            vec![
                Cell::timed(m.micros_per_call, m),
                Cell::timed(m.metrics.mops, m),
                Cell::timed(gbs, m),
            ],
        )?;
    }
    Ok(table)
}

/// One row per dtype: time and Mop/s.
pub fn dtype_list(title: impl Into<String>, rows: &[Measurement]) -> Result<ResultTable> {
    let mut table = ResultTable::new(title, SECTION_BANNER, LabelColumn::left("dtype", 8))
        .column(Column::new("time (us)", 10, 2))
        .column(Column::new("Mop/s", 10, 1));
    for m in rows {
        table.push_row(
            m.case.dtype().name(),
            vec![
                Cell::timed(m.micros_per_call, m),
                Cell::timed(m.metrics.mops, m),
            ],
        )?;
    }
    Ok(table)
}

fn gflops_cell(m: &Measurement) -> Cell {
    Cell::timed(m.metrics.gflops.unwrap_or(0.0), m)
}

/// Square matmul sweep: N, iterations, time and GFLOP/s.
pub fn matmul_square(title: impl Into<String>, points: &[Measurement]) -> Result<ResultTable> {
    let mut table = ResultTable::new(title, MATMUL_BANNER, LabelColumn::right("N", 6))
        .column(Column::new("iters", 6, 0).gap(2))
        .column(Column::new("time(us)", 8, 2).gap(2))
        .column(Column::new("time(ms)", 8, 3).gap(2))
        .column(Column::new("GFLOP/s", 8, 3).gap(2));
    for m in points {
        let n = m.case.shape().matmul_dims().map(|(n, _, _)| n).unwrap_or(0);
        table.push_row(
            n.to_string(),
            vec![
                Cell::Int(m.case.schedule().iterations),
                Cell::timed(m.micros_per_call, m),
                Cell::timed(m.micros_per_call / 1e3, m),
                gflops_cell(m),
            ],
        )?;
    }
    Ok(table)
}

/// Matmul across dtypes: time and GFLOP/s.
pub fn matmul_dtypes(title: impl Into<String>, rows: &[Measurement]) -> Result<ResultTable> {
    let mut table = ResultTable::new(title, MATMUL_BANNER, LabelColumn::left("dtype", 8))
        .column(Column::new("time(us)", 8, 2).gap(2))
        .column(Column::new("GFLOP/s", 8, 3).gap(2));
    for m in rows {
        table.push_row(
            m.case.dtype().name(),
            vec![Cell::timed(m.micros_per_call, m), gflops_cell(m)],
        )?;
    }
    Ok(table)
}

/// Matmul shape variants: time, GFLOP/s and total FLOPs in thousands.
pub fn shape_variants(title: impl Into<String>, rows: &[Measurement]) -> Result<ResultTable> {
    let mut table = ResultTable::new(
        title,
        MATMUL_BANNER,
        LabelColumn::left("shape (M,K)@(K,N)", 24),
    )
    .column(Column::new("time(us)", 8, 2).gap(2))
    .column(Column::new("GFLOP/s", 8, 3).gap(2))
    .column(Column::new("flops", 8, 0).gap(2).suffix(" K"));
    for m in rows {
        let flops = m
            .case
            .shape()
            .matmul_dims()
            .map(|(a, b, c)| matmul_flops(a, b, c))
            .unwrap_or(0.0);
        table.push_row(
            m.case.shape().label.clone(),
            vec![
                Cell::timed(m.micros_per_call, m),
                gflops_cell(m),
                Cell::Float(flops / 1e3),
            ],
        )?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::BenchmarkCase;
    use crate::catalog::{Category, OperationCatalog};
    use crate::metrics::Metrics;
    use crate::shapes;
    use crate::timer::Schedule;

    fn measurement(
        category: Category,
        name: &str,
        dtype: DType,
        shape: shapes::ShapeSpec,
        micros: f64,
        used_fallback: bool,
    ) -> Measurement {
        let spec = OperationCatalog::new().find(category, false, name).unwrap();
        let case = BenchmarkCase::new(spec, dtype, shape, Schedule::default()).unwrap();
        let metrics = Metrics::derive(&case, micros);
        Measurement {
            case,
            micros_per_call: micros,
            used_fallback,
            metrics,
        }
    }

    fn render(table: &ResultTable) -> String {
        let mut buf = Vec::new();
        table.render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_row_width_matches_rule() {
        let m = measurement(
            Category::Binary,
            "add",
            DType::I32,
            shapes::contiguous(1000, 2),
            10.0,
            false,
        );
        let rows = vec![(DType::I32, vec![m.clone(), m.clone(), m.clone(), m])];
        let table = dtype_grid("CONTIGUOUS", &["add", "sub", "mul", "div"], 8, &rows).unwrap();
        let text = render(&table);
        let lines: Vec<&str> = text.lines().collect();
        let rule = lines.iter().find(|l| l.contains('─')).unwrap();
        let row = lines.iter().find(|l| l.starts_with("  int32")).unwrap();
        assert_eq!(rule.chars().count(), row.chars().count());
        assert_eq!(table.width(), 8 + 4 * 9 + 3 + 8 + 3 * 9);
        assert!(row.contains("   10.00"));
        assert!(row.contains("  100.0"));
        assert!(!text.contains(FALLBACK_LEGEND));
    }

    #[test]
    fn test_fallback_cells_marked() {
        let m = measurement(
            Category::Binary,
            "div",
            DType::I64,
            shapes::contiguous(1000, 2),
            4.0,
            true,
        );
        let table = dtype_grid("X", &["div"], 8, &[(DType::I64, vec![m])]).unwrap();
        let text = render(&table);
        assert!(text.contains("   4.00*"));
        assert!(text.contains(FALLBACK_LEGEND));
    }

    #[test]
    fn test_size_sweep_rows() {
        let points: Vec<_> = shapes::size_sweep(&shapes::SIZE_SWEEP, 2)
            .map(|s| measurement(Category::Binary, "add", DType::F32, s, 1.0, false))
            .collect();
        let table = size_sweep("SIZE SCALING", &points).unwrap();
        assert_eq!(table.len(), 5);
        let text = render(&table);
        assert!(text.contains("         100"));
        assert!(text.contains("     1000000"));
    }

    #[test]
    fn test_cell_count_checked() {
        let mut table = ResultTable::new("T", SECTION_BANNER, LabelColumn::left("dtype", 8))
            .column(Column::new("a", 8, 2));
        assert!(table.push_row("x", vec![]).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_shape_variant_flops_column() {
        let (shape, _) = shapes::matmul_shape_variants().next().unwrap();
        let m = measurement(Category::Matmul, "matmul", DType::F32, shape, 100.0, false);
        let text = render(&shape_variants("SHAPE VARIANTS", &[m]).unwrap());
        // 2*512*32*512 = 16777216 flops
        assert!(text.contains("16777 K"));
        assert!(text.contains("wide K  (512x32@32x512)"));
    }

    #[test]
    fn test_banner() {
        let table = ResultTable::new("T", MATMUL_BANNER, LabelColumn::left("dtype", 8));
        let text = render(&table);
        assert!(text.lines().any(|l| l == "━".repeat(60)));
    }
}
