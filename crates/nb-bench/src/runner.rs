use log::debug;
use nb_array::ComputeBackend;

use crate::case::{BenchmarkCase, Measurement};
use crate::catalog::OperationCatalog;
use crate::error::Result;
use crate::fallback::FallbackPolicy;
use crate::metrics::Metrics;
use crate::timer::Timer;
use crate::workload;

/// Runs benchmark cases against one backend, strictly one after another.
#[derive(Debug)]
pub struct Harness<'a> {
    backend: &'a dyn ComputeBackend,
    catalog: OperationCatalog,
}

impl<'a> Harness<'a> {
    pub fn new(backend: &'a dyn ComputeBackend) -> Self {
        Harness {
            backend,
            catalog: OperationCatalog::new(),
        }
    }

    pub fn backend(&self) -> &'a dyn ComputeBackend {
        self.backend
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Allocates the case's operands, times it (falling back to the
    /// allocating call form if needed) and derives its metrics.
    pub fn run(&self, case: &BenchmarkCase) -> Result<Measurement> {
        let dispatch = self.catalog.dispatch(case.op(), case.dtype())?;
        let mut work = workload::build(self.backend, case, dispatch)?;

        let policy = FallbackPolicy::new(Timer::new(case.schedule()));
        let timing = policy.measure(case.op(), case.dtype(), dispatch, work.as_mut())?;
        let metrics = Metrics::derive(case, timing.micros_per_call);

        debug!(
            "{} {} {} {}: {:.2} us/call, {:.1} Mop/s{}",
            case.op().category,
            case.op().name,
            case.dtype(),
            case.shape(),
            timing.micros_per_call,
            metrics.mops,
            if timing.used_fallback { " (fallback)" } else { "" }
        );

        Ok(Measurement {
            case: case.clone(),
            micros_per_call: timing.micros_per_call,
            used_fallback: timing.used_fallback,
            metrics,
        })
    }

    pub fn run_all<'c>(&self, cases: impl IntoIterator<Item = &'c BenchmarkCase>) -> Result<Vec<Measurement>> {
        cases.into_iter().map(|c| self.run(c)).collect()
    }
}
