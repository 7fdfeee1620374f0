use crate::error::{BenchError, Result};
use crate::shapes::SIZE_SWEEP;
use crate::timer::Schedule;

/// Compiled-in benchmark parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Warmup and iteration counts for every elementwise and reduction case.
    pub schedule: Schedule,
    /// Length of the contiguous vectors.
    pub vector_len: usize,
    /// Rows of the strided, broadcast and axis-reduction arrays.
    pub rows: usize,
    /// Columns of the strided, broadcast and axis-reduction arrays.
    pub cols: usize,
    /// Element counts of the size sweep, ascending.
    pub sweep_sizes: Vec<usize>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            schedule: Schedule::default(),
            vector_len: 1_000_000,
            rows: 1000,
            cols: 1000,
            sweep_sizes: SIZE_SWEEP.to_vec(),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        self.schedule.validate()?;

        for (field, value) in [
            ("vector_len", self.vector_len),
            ("rows", self.rows),
            ("cols", self.cols),
        ] {
            if value == 0 {
                return Err(BenchError::InvalidConfig {
                    field,
                    message: "must be greater than 0".to_string(),
                });
            }
        }

        if self.sweep_sizes.is_empty() {
            return Err(BenchError::InvalidConfig {
                field: "sweep_sizes",
                message: "at least one sweep point is required".to_string(),
            });
        }
        if self.sweep_sizes.contains(&0) {
            return Err(BenchError::InvalidConfig {
                field: "sweep_sizes",
                message: "sweep points must be greater than 0".to_string(),
            });
        }
        if !self.sweep_sizes.windows(2).all(|w| w[0] < w[1]) {
            return Err(BenchError::InvalidConfig {
                field: "sweep_sizes",
                message: "sweep points must be strictly ascending".to_string(),
            });
        }
        Ok(())
    }
}
