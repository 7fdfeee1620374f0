//! The benchmarked operations, their capability flags, and the
//! per-(operation, dtype) dispatch table.

use std::collections::HashMap;
use std::fmt;

use nb_array::{BinaryOp, DType, UnaryOp};

use crate::error::{BenchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Binary,
    Unary,
    Scalar,
    Power,
    Reduction,
    Matmul,
}

impl Category {
    /// Number of full arrays read and written per element by one call,
    /// used for GB/s. `None` where bandwidth is not reported.
    pub fn arrays_moved(&self) -> Option<usize> {
        match self {
            Category::Binary | Category::Power => Some(3),
            Category::Unary | Category::Scalar => Some(2),
            Category::Reduction => Some(1),
            Category::Matmul => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Binary => "binary",
            Category::Unary => "unary",
            Category::Scalar => "scalar",
            Category::Power => "power",
            Category::Reduction => "reduction",
            Category::Matmul => "matmul",
        };
        f.write_str(name)
    }
}

/// The library call an operation makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Array-array elementwise op.
    Binary(BinaryOp),
    /// Array-scalar elementwise op.
    Scalar(BinaryOp),
    Unary(UnaryOp),
    SumAll,
    SumAxis(usize),
    Matmul,
}

impl Kernel {
    /// Dtype of the result for inputs of `dtype`.
    pub fn result_dtype(&self, dtype: DType) -> DType {
        match self {
            Kernel::Binary(op) | Kernel::Scalar(op) => op.result_dtype(dtype),
            Kernel::Unary(op) => op.result_dtype(dtype),
            Kernel::SumAll | Kernel::SumAxis(_) => dtype.sum_dtype(),
            Kernel::Matmul => dtype,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationSpec {
    pub name: &'static str,
    pub category: Category,
    pub kernel: Kernel,
    /// The first operand doubles as the output.
    pub in_place: bool,
    pub accepts_output_buffer: bool,
    /// Integer inputs produce a different result dtype.
    pub promotes_integers: bool,
    /// Repeated application changes the operand values cumulatively.
    pub state_drifts: bool,
}

impl OperationSpec {
    /// Number of array operands (scalars not counted).
    pub fn arity(&self) -> usize {
        match self.kernel {
            Kernel::Binary(_) | Kernel::Matmul => 2,
            Kernel::Scalar(_) | Kernel::Unary(_) | Kernel::SumAll | Kernel::SumAxis(_) => 1,
        }
    }

    /// True if the output-buffer call form may be rejected for `dtype`.
    pub fn result_dtype_may_differ(&self, dtype: DType) -> bool {
        self.accepts_output_buffer && self.promotes_integers && dtype.is_integer()
    }
}

/// Whether operands are restored to their fill value between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPolicy {
    Never,
    BeforeEachCall,
}

/// Resolved behavior of one operation on one dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub kernel: Kernel,
    pub reset: ResetPolicy,
    pub may_differ: bool,
}

const ARITH: [(&str, BinaryOp); 4] = [
    ("add", BinaryOp::Add),
    ("sub", BinaryOp::Sub),
    ("mul", BinaryOp::Mul),
    ("div", BinaryOp::Div),
];

const MATH: [(&str, UnaryOp); 4] = [
    ("log", UnaryOp::Log),
    ("exp", UnaryOp::Exp),
    ("abs", UnaryOp::Abs),
    ("sqrt", UnaryOp::Sqrt),
];

fn op(name: &'static str, category: Category, kernel: Kernel, in_place: bool) -> OperationSpec {
    let promotes_integers = !in_place && kernel.result_dtype(DType::I32) != DType::I32;
    OperationSpec {
        name,
        category,
        kernel,
        in_place,
        accepts_output_buffer: !matches!(category, Category::Reduction),
        promotes_integers: promotes_integers && !matches!(category, Category::Reduction),
        state_drifts: in_place,
    }
}

fn unary_op(name: &'static str, unary: UnaryOp, in_place: bool) -> OperationSpec {
    OperationSpec {
        promotes_integers: unary.result_dtype(DType::I32) != DType::I32,
        ..op(name, Category::Unary, Kernel::Unary(unary), in_place)
    }
}

/// Every benchmarked operation, in report order.
fn all_ops() -> Vec<OperationSpec> {
    let mut ops = Vec::new();
    for (name, bin) in ARITH {
        ops.push(op(name, Category::Binary, Kernel::Binary(bin), false));
    }
    for (name, bin) in ARITH {
        ops.push(op(name, Category::Scalar, Kernel::Scalar(bin), false));
    }
    for (name, bin) in ARITH {
        ops.push(op(name, Category::Scalar, Kernel::Scalar(bin), true));
    }
    for (name, un) in MATH {
        ops.push(unary_op(name, un, false));
    }
    for (name, un) in MATH {
        ops.push(unary_op(name, un, true));
    }
    ops.push(op("pow", Category::Power, Kernel::Binary(BinaryOp::Pow), false));
    ops.push(op("pow", Category::Power, Kernel::Binary(BinaryOp::Pow), true));
    ops.push(op("sum", Category::Reduction, Kernel::SumAll, false));
    ops.push(op("sum axis=0", Category::Reduction, Kernel::SumAxis(0), false));
    ops.push(op("sum axis=1", Category::Reduction, Kernel::SumAxis(1), false));
    ops.push(op("matmul", Category::Matmul, Kernel::Matmul, false));
    ops
}

fn resolve(spec: &OperationSpec, dtype: DType) -> Dispatch {
    let kernel = match spec.kernel {
        // An in-place buffer cannot hold a promoted quotient; integers use
        // floor division instead.
        Kernel::Scalar(BinaryOp::Div) if spec.in_place && dtype.is_integer() => {
            Kernel::Scalar(BinaryOp::FloorDiv)
        }
        k => k,
    };
    let reset = if spec.state_drifts {
        ResetPolicy::BeforeEachCall
    } else {
        ResetPolicy::Never
    };
    Dispatch {
        kernel,
        reset,
        may_differ: spec.result_dtype_may_differ(dtype),
    }
}

/// Operation list plus the dispatch table, built once.
#[derive(Debug, Clone)]
pub struct OperationCatalog {
    ops: Vec<OperationSpec>,
    table: HashMap<(OperationSpec, DType), Dispatch>,
}

impl OperationCatalog {
    pub fn new() -> Self {
        let ops = all_ops();
        let table = ops
            .iter()
            .flat_map(|spec| DType::ALL.map(|dtype| ((*spec, dtype), resolve(spec, dtype))))
            .collect();
        OperationCatalog { ops, table }
    }

    pub fn ops(&self) -> &[OperationSpec] {
        &self.ops
    }

    /// Operations of `category` with the given in-place flag, in report order.
    pub fn select(&self, category: Category, in_place: bool) -> Vec<OperationSpec> {
        self.ops
            .iter()
            .filter(|o| o.category == category && o.in_place == in_place)
            .copied()
            .collect()
    }

    pub fn find(&self, category: Category, in_place: bool, name: &str) -> Result<OperationSpec> {
        self.ops
            .iter()
            .find(|o| o.category == category && o.in_place == in_place && o.name == name)
            .copied()
            .ok_or_else(|| BenchError::InvalidCase(format!("unknown {category} operation '{name}'")))
    }

    pub fn dispatch(&self, spec: &OperationSpec, dtype: DType) -> Result<&Dispatch> {
        self.table
            .get(&(*spec, dtype))
            .ok_or(BenchError::UnsupportedCombination {
                op: spec.name,
                dtype,
            })
    }
}

impl Default for OperationCatalog {
    fn default() -> Self {
        Self::new()
    }
}
