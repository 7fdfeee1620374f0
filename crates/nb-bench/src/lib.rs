//! `nb-bench` - micro-benchmark harness for `nb-array` kernels.
//!
//! Cases are built from an operation catalog, a dtype table and a shape
//! family, timed with a warmup-then-measure schedule, and printed as
//! fixed-width tables. When a backend rejects a caller-supplied output
//! buffer for an operation whose result dtype may differ from its input,
//! the allocating call form is timed instead and the cell is marked.

pub mod case;
pub mod catalog;
pub mod config;
pub mod dtypes;
pub mod error;
pub mod fallback;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod sections;
pub mod shapes;
pub mod timer;
pub mod workload;

pub use case::{BenchmarkCase, Measurement};
pub use catalog::{Category, Dispatch, Kernel, OperationCatalog, OperationSpec, ResetPolicy};
pub use config::BenchConfig;
pub use error::{BenchError, Result};
pub use fallback::{FallbackPolicy, RejectReason};
pub use metrics::Metrics;
pub use report::ResultTable;
pub use runner::Harness;
pub use shapes::{ShapeSpec, ShapeTag};
pub use timer::{Schedule, Timer};
