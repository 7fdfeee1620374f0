//! Operand and output shapes under test.

use std::fmt;

use crate::timer::Schedule;

/// Geometric size sweep, in elements.
pub const SIZE_SWEEP: [usize; 5] = [100, 1_000, 10_000, 100_000, 1_000_000];

/// (N, warmup, iterations) for the square matmul sweep. Larger matrices get
/// fewer iterations so each size takes roughly bounded wall time.
pub const MATMUL_SQUARE_SCHEDULE: [(usize, usize, usize); 5] = [
    (32, 50, 500),
    (64, 20, 200),
    (128, 10, 50),
    (256, 5, 20),
    (512, 2, 5),
];

/// Schedule of the matmul dtype comparison and shape variants.
pub const MATMUL_FIXED_SCHEDULE: Schedule = Schedule::new(5, 20);

/// Side of the matmul dtype comparison.
pub const MATMUL_DTYPE_N: usize = 256;

/// (M, K, N, description) for the matmul shape variants.
pub const MATMUL_VARIANTS: [(usize, usize, usize, &str); 6] = [
    (512, 32, 512, "wide K"),
    (512, 512, 512, "square"),
    (32, 512, 32, "tall K"),
    (256, 128, 512, "rect"),
    (1, 256, 256, "vec-mat"),
    (256, 256, 1, "mat-vec"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTag {
    Contiguous,
    Strided,
    BroadcastRow,
    BroadcastOuter,
    BroadcastRank,
    SizeSweepPoint,
    ReductionFull,
    ReductionLeading,
    ReductionTrailing,
    MatmulSquare,
    MatmulDtypeSweep,
    MatmulShapeVariant,
}

/// One array operand: the dimensions it is allocated with, and whether the
/// benchmark uses its transposed view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub dims: Vec<usize>,
    pub transposed: bool,
}

impl Operand {
    pub fn new(dims: &[usize]) -> Self {
        Operand {
            dims: dims.to_vec(),
            transposed: false,
        }
    }

    pub fn transposed(dims: &[usize]) -> Self {
        Operand {
            dims: dims.to_vec(),
            transposed: true,
        }
    }

    /// Dimensions as seen by the operation.
    pub fn logical_dims(&self) -> Vec<usize> {
        if self.transposed {
            self.dims.iter().rev().copied().collect()
        } else {
            self.dims.clone()
        }
    }

    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSpec {
    pub tag: ShapeTag,
    pub operands: Vec<Operand>,
    pub output: Vec<usize>,
    /// Row label used by shape-variant tables.
    pub label: String,
}

impl ShapeSpec {
    fn new(tag: ShapeTag, operands: Vec<Operand>, output: &[usize]) -> Self {
        let label = dims_label(output);
        ShapeSpec {
            tag,
            operands,
            output: output.to_vec(),
            label,
        }
    }

    /// Logical elements processed per call: the largest of the operands and
    /// the output.
    pub fn element_count(&self) -> usize {
        self.operands
            .iter()
            .map(Operand::numel)
            .chain(std::iter::once(self.output.iter().product()))
            .max()
            .unwrap_or(0)
    }

    /// `(M, K, N)` for a two-operand matmul shape.
    pub fn matmul_dims(&self) -> Option<(usize, usize, usize)> {
        match self.operands.as_slice() {
            [a, b] => {
                let (a, b) = (a.logical_dims(), b.logical_dims());
                match (a.as_slice(), b.as_slice()) {
                    ([m, k], [k2, n]) if k == k2 => Some((*m, *k, *n)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, " & ")?;
            }
            write!(f, "{}", dims_label(&op.logical_dims()))?;
        }
        write!(f, " -> {}", dims_label(&self.output))
    }
}

/// `(1000,)`, `(1000,1)` style.
pub fn dims_label(dims: &[usize]) -> String {
    let inner: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
    if dims.len() == 1 {
        format!("({},)", inner[0])
    } else {
        format!("({})", inner.join(","))
    }
}

/// `n`-element vectors, one per operand.
pub fn contiguous(n: usize, arity: usize) -> ShapeSpec {
    ShapeSpec::new(ShapeTag::Contiguous, vec![Operand::new(&[n]); arity], &[n])
}

/// Transposed views of `rows x cols` arrays; the output is `cols x rows`.
pub fn strided(rows: usize, cols: usize, arity: usize) -> ShapeSpec {
    ShapeSpec::new(
        ShapeTag::Strided,
        vec![Operand::transposed(&[rows, cols]); arity],
        &[cols, rows],
    )
}

/// `(1,n)` with `(m,n)`.
pub fn broadcast_row(m: usize, n: usize) -> ShapeSpec {
    ShapeSpec::new(
        ShapeTag::BroadcastRow,
        vec![Operand::new(&[1, n]), Operand::new(&[m, n])],
        &[m, n],
    )
}

/// `(m,1)` with `(1,n)`.
pub fn broadcast_outer(m: usize, n: usize) -> ShapeSpec {
    ShapeSpec::new(
        ShapeTag::BroadcastOuter,
        vec![Operand::new(&[m, 1]), Operand::new(&[1, n])],
        &[m, n],
    )
}

/// `(n,)` with `(m,n)`: rank extension rather than a size-1 axis.
pub fn broadcast_rank(m: usize, n: usize) -> ShapeSpec {
    ShapeSpec::new(
        ShapeTag::BroadcastRank,
        vec![Operand::new(&[n]), Operand::new(&[m, n])],
        &[m, n],
    )
}

/// The sweep points as contiguous vectors, smallest first.
pub fn size_sweep(sizes: &[usize], arity: usize) -> impl Iterator<Item = ShapeSpec> + '_ {
    sizes.iter().map(move |&n| ShapeSpec {
        tag: ShapeTag::SizeSweepPoint,
        ..contiguous(n, arity)
    })
}

/// An `n`-element vector summed to a scalar.
pub fn reduction_full(n: usize) -> ShapeSpec {
    ShapeSpec::new(ShapeTag::ReductionFull, vec![Operand::new(&[n])], &[])
}

/// `rows x cols` summed over axis 0.
pub fn reduction_leading(rows: usize, cols: usize) -> ShapeSpec {
    ShapeSpec::new(
        ShapeTag::ReductionLeading,
        vec![Operand::new(&[rows, cols])],
        &[cols],
    )
}

/// `rows x cols` summed over the last axis.
pub fn reduction_trailing(rows: usize, cols: usize) -> ShapeSpec {
    ShapeSpec::new(
        ShapeTag::ReductionTrailing,
        vec![Operand::new(&[rows, cols])],
        &[rows],
    )
}

/// `(m,k) @ (k,n)`.
pub fn matmul(tag: ShapeTag, m: usize, k: usize, n: usize) -> ShapeSpec {
    ShapeSpec::new(tag, vec![Operand::new(&[m, k]), Operand::new(&[k, n])], &[m, n])
}

/// Square matrices with their per-size schedule.
pub fn matmul_square_sweep() -> impl Iterator<Item = (ShapeSpec, Schedule)> {
    MATMUL_SQUARE_SCHEDULE.into_iter().map(|(n, warmup, iterations)| {
        (
            matmul(ShapeTag::MatmulSquare, n, n, n),
            Schedule::new(warmup, iterations),
        )
    })
}

pub fn matmul_dtype_sweep() -> (ShapeSpec, Schedule) {
    let n = MATMUL_DTYPE_N;
    (
        matmul(ShapeTag::MatmulDtypeSweep, n, n, n),
        MATMUL_FIXED_SCHEDULE,
    )
}

pub fn matmul_shape_variants() -> impl Iterator<Item = (ShapeSpec, Schedule)> {
    MATMUL_VARIANTS.into_iter().map(|(m, k, n, what)| {
        let mut shape = matmul(ShapeTag::MatmulShapeVariant, m, k, n);
        shape.label = format!("{what:<7} ({m}x{k}@{k}x{n})");
        (shape, MATMUL_FIXED_SCHEDULE)
    })
}
