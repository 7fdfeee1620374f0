use nb_array::DType;

use crate::catalog::OperationSpec;
use crate::error::{BenchError, Result};
use crate::metrics::Metrics;
use crate::shapes::ShapeSpec;
use crate::timer::Schedule;

/// One measurable unit of work. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkCase {
    op: OperationSpec,
    dtype: DType,
    shape: ShapeSpec,
    schedule: Schedule,
}

impl BenchmarkCase {
    /// Validates the schedule and that the shape has one operand per array
    /// argument of the operation.
    pub fn new(op: OperationSpec, dtype: DType, shape: ShapeSpec, schedule: Schedule) -> Result<Self> {
        schedule.validate()?;
        if shape.operands.len() != op.arity() {
            return Err(BenchError::InvalidCase(format!(
                "{} takes {} array operand(s), shape {} has {}",
                op.name,
                op.arity(),
                shape,
                shape.operands.len()
            )));
        }
        Ok(BenchmarkCase {
            op,
            dtype,
            shape,
            schedule,
        })
    }

    pub fn op(&self) -> &OperationSpec {
        &self.op
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &ShapeSpec {
        &self.shape
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn element_count(&self) -> usize {
        self.shape.element_count()
    }
}

/// Result of running one case.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub case: BenchmarkCase,
    /// Mean over exactly `schedule.iterations` timed calls.
    pub micros_per_call: f64,
    /// The output buffer was rejected and the allocating form was timed.
    pub used_fallback: bool,
    pub metrics: Metrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, OperationCatalog};
    use crate::shapes;

    #[test]
    fn test_new_case() {
        let catalog = OperationCatalog::new();
        let add = catalog.find(Category::Binary, false, "add").unwrap();
        let case = BenchmarkCase::new(add, DType::I32, shapes::contiguous(10, 2), Schedule::default())
            .unwrap();
        assert_eq!(case.element_count(), 10);
        assert_eq!(case.schedule(), Schedule::new(20, 200));
    }

    #[test]
    fn test_arity_mismatch() {
        let catalog = OperationCatalog::new();
        let log = catalog.find(Category::Unary, false, "log").unwrap();
        let err = BenchmarkCase::new(log, DType::F64, shapes::contiguous(10, 2), Schedule::default())
            .unwrap_err();
        assert!(matches!(err, BenchError::InvalidCase(_)));
    }

    #[test]
    fn test_invalid_schedule() {
        let catalog = OperationCatalog::new();
        let sum = catalog.find(Category::Reduction, false, "sum").unwrap();
        assert!(
            BenchmarkCase::new(sum, DType::U8, shapes::reduction_full(8), Schedule::new(1, 0)).is_err()
        );
    }
}
