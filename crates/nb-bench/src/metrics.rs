//! Derived throughput metrics. Pure functions of the mean time per call and
//! the case shape and dtype.

use crate::case::BenchmarkCase;

/// Millions of elements per second.
pub fn ops_per_second(elements: usize, micros_per_call: f64) -> f64 {
    elements as f64 / micros_per_call
}

/// `2*M*K*N` floating-point operations, in GFLOP/s.
pub fn gflops(m: usize, k: usize, n: usize, micros_per_call: f64) -> f64 {
    matmul_flops(m, k, n) / (micros_per_call * 1e3)
}

pub fn matmul_flops(m: usize, k: usize, n: usize) -> f64 {
    2.0 * m as f64 * k as f64 * n as f64
}

pub fn gb_per_second(bytes_moved: f64, micros_per_call: f64) -> f64 {
    bytes_moved / (micros_per_call * 1e3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Mop/s over the case's element count.
    pub mops: f64,
    /// Set for matmul cases.
    pub gflops: Option<f64>,
    /// Set for categories that declare a bytes-moved figure.
    pub gb_per_s: Option<f64>,
}

impl Metrics {
    pub fn derive(case: &BenchmarkCase, micros_per_call: f64) -> Metrics {
        let elements = case.element_count();
        let gflops = case
            .shape()
            .matmul_dims()
            .map(|(m, k, n)| gflops(m, k, n, micros_per_call));
        let gb_per_s = case.op().category.arrays_moved().map(|arrays| {
            let bytes = arrays * elements * case.dtype().size_in_bytes();
            gb_per_second(bytes as f64, micros_per_call)
        });
        Metrics {
            mops: ops_per_second(elements, micros_per_call),
            gflops,
            gb_per_s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, OperationCatalog};
    use crate::shapes;
    use crate::timer::Schedule;
    use approx::assert_relative_eq;
    use nb_array::DType;

    #[test]
    fn test_gflops_formula() {
        assert_relative_eq!(gflops(256, 256, 256, 1000.0), 33.554432);
    }

    #[test]
    fn test_ops_per_second_inverse() {
        let slow = ops_per_second(1_000_000, 500.0);
        let fast = ops_per_second(1_000_000, 250.0);
        assert_eq!(fast, 2.0 * slow);
        assert_eq!(slow, 2000.0);
    }

    #[test]
    fn test_binary_bandwidth() {
        let catalog = OperationCatalog::new();
        let add = catalog.find(Category::Binary, false, "add").unwrap();
        let case = crate::case::BenchmarkCase::new(
            add,
            DType::F32,
            shapes::contiguous(1_000_000, 2),
            Schedule::default(),
        )
        .unwrap();
        let m = Metrics::derive(&case, 1000.0);
        // 3 arrays * 1M * 4 bytes / 1ms = 12 GB/s
        assert_relative_eq!(m.gb_per_s.unwrap(), 12.0);
        assert_relative_eq!(m.mops, 1000.0);
        assert!(m.gflops.is_none());
    }

    fn f32_bandwidth(category: Category, in_place: bool, name: &str) -> f64 {
        let catalog = OperationCatalog::new();
        let op = catalog.find(category, in_place, name).unwrap();
        let case = crate::case::BenchmarkCase::new(
            op,
            DType::F32,
            shapes::contiguous(1_000_000, op.arity()),
            Schedule::default(),
        )
        .unwrap();
        Metrics::derive(&case, 1000.0).gb_per_s.unwrap()
    }

    #[test]
    fn test_unary_and_scalar_move_two_arrays() {
        for (category, in_place, name) in [
            (Category::Unary, false, "sqrt"),
            (Category::Unary, true, "sqrt"),
            (Category::Scalar, false, "add"),
            (Category::Scalar, true, "add"),
        ] {
            // 2 arrays * 1M * 4 bytes / 1ms
            assert_relative_eq!(f32_bandwidth(category, in_place, name), 8.0);
        }
    }

    #[test]
    fn test_power_moves_three_arrays() {
        assert_relative_eq!(f32_bandwidth(Category::Power, false, "pow"), 12.0);
        assert_relative_eq!(f32_bandwidth(Category::Power, true, "pow"), 12.0);
    }

    #[test]
    fn test_reduction_reads_one_array() {
        let catalog = OperationCatalog::new();
        let sum = catalog.find(Category::Reduction, false, "sum").unwrap();
        let case = crate::case::BenchmarkCase::new(
            sum,
            DType::F64,
            shapes::reduction_full(1000),
            Schedule::default(),
        )
        .unwrap();
        let m = Metrics::derive(&case, 1.0);
        assert_relative_eq!(m.gb_per_s.unwrap(), 8.0);
    }

    #[test]
    fn test_matmul_metrics() {
        let catalog = OperationCatalog::new();
        let mm = catalog.find(Category::Matmul, false, "matmul").unwrap();
        let (shape, schedule) = shapes::matmul_dtype_sweep();
        let case = crate::case::BenchmarkCase::new(mm, DType::F32, shape, schedule).unwrap();
        let m = Metrics::derive(&case, 1000.0);
        assert_relative_eq!(m.gflops.unwrap(), 33.554432);
        assert!(m.gb_per_s.is_none());
    }
}
