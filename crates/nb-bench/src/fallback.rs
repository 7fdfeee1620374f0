//! Recovery for operations whose result dtype cannot go into the supplied
//! output buffer.
//!
//! The buffered call form is tried first. If the library rejects the buffer
//! with one of the two recognized reasons, and the catalog says a different
//! result dtype is possible for this operation and dtype, the whole
//! warmup+measure loop is rerun with the allocating call form. Everything
//! else propagates.

use std::fmt;

use log::debug;
use nb_array::{ArrayError, DType, Result as ArrayResult};

use crate::catalog::{Dispatch, OperationSpec, ResetPolicy};
use crate::error::{BenchError, Result};
use crate::timer::Timer;
use crate::workload::Workload;

/// Why the library refused an output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    ResultTypeMismatch,
    UnsafeOutputCast,
}

impl RejectReason {
    /// `None` for errors that are not buffer rejections.
    pub fn classify(err: &ArrayError) -> Option<RejectReason> {
        match err {
            ArrayError::ResultTypeMismatch { .. } => Some(RejectReason::ResultTypeMismatch),
            ArrayError::UnsafeOutputCast { .. } => Some(RejectReason::UnsafeOutputCast),
            _ => None,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ResultTypeMismatch => f.write_str("result type mismatch"),
            RejectReason::UnsafeOutputCast => f.write_str("unsafe output cast"),
        }
    }
}

/// Outcome of timing the buffered call form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BufferedOutcome {
    Completed(f64),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub micros_per_call: f64,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallForm {
    Buffered,
    Allocating,
}

fn time_form<W>(timer: &Timer, reset: ResetPolicy, workload: &mut W, form: CallForm) -> ArrayResult<f64>
where
    W: Workload + ?Sized,
{
    let call = |w: &mut W| match form {
        CallForm::Buffered => w.apply_with_buffer(),
        CallForm::Allocating => w.apply_allocating(),
    };
    match reset {
        ResetPolicy::Never => timer.measure(|| call(workload)),
        ResetPolicy::BeforeEachCall => timer.measure_with_reset(workload, |w| w.reset(), call),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FallbackPolicy {
    timer: Timer,
}

impl FallbackPolicy {
    pub fn new(timer: Timer) -> Self {
        FallbackPolicy { timer }
    }

    /// Times the buffered form. Buffer rejections become
    /// [`BufferedOutcome::Rejected`]; other library errors are returned.
    pub fn attempt_buffered<W>(&self, dispatch: &Dispatch, workload: &mut W) -> Result<BufferedOutcome>
    where
        W: Workload + ?Sized,
    {
        match time_form(&self.timer, dispatch.reset, workload, CallForm::Buffered) {
            Ok(micros) => Ok(BufferedOutcome::Completed(micros)),
            Err(e) => match RejectReason::classify(&e) {
                Some(reason) => Ok(BufferedOutcome::Rejected(reason)),
                None => Err(e.into()),
            },
        }
    }

    pub fn measure<W>(
        &self,
        spec: &OperationSpec,
        dtype: DType,
        dispatch: &Dispatch,
        workload: &mut W,
    ) -> Result<Timing>
    where
        W: Workload + ?Sized,
    {
        if !spec.accepts_output_buffer {
            let micros = time_form(&self.timer, dispatch.reset, workload, CallForm::Allocating)?;
            return Ok(Timing {
                micros_per_call: micros,
                used_fallback: false,
            });
        }

        match self.attempt_buffered(dispatch, workload)? {
            BufferedOutcome::Completed(micros) => Ok(Timing {
                micros_per_call: micros,
                used_fallback: false,
            }),
            BufferedOutcome::Rejected(reason) if dispatch.may_differ => {
                debug!(
                    "{} {} on {}: output buffer rejected ({}), timing the allocating form",
                    spec.category, spec.name, dtype, reason
                );
                let micros =
                    time_form(&self.timer, dispatch.reset, workload, CallForm::Allocating)?;
                Ok(Timing {
                    micros_per_call: micros,
                    used_fallback: true,
                })
            }
            BufferedOutcome::Rejected(reason) => Err(BenchError::UnanticipatedRejection {
                op: spec.name,
                dtype,
                reason,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Kernel, OperationCatalog};
    use crate::timer::Schedule;
    use nb_array::BinaryOp;

    /// Records calls; the buffered form fails with `reject` once `fail_after`
    /// buffered calls have succeeded.
    struct Scripted {
        reject: Option<fn() -> ArrayError>,
        fail_after: usize,
        buffered: usize,
        allocating: usize,
        resets: usize,
    }

    impl Scripted {
        fn new(reject: Option<fn() -> ArrayError>) -> Self {
            Scripted {
                reject,
                fail_after: 0,
                buffered: 0,
                allocating: 0,
                resets: 0,
            }
        }
    }

    impl Workload for Scripted {
        fn apply_with_buffer(&mut self) -> ArrayResult<()> {
            if let Some(err) = self.reject {
                if self.buffered >= self.fail_after {
                    return Err(err());
                }
            }
            self.buffered += 1;
            Ok(())
        }

        fn apply_allocating(&mut self) -> ArrayResult<()> {
            self.allocating += 1;
            Ok(())
        }

        fn reset(&mut self) -> ArrayResult<()> {
            self.resets += 1;
            Ok(())
        }
    }

    fn unsafe_cast() -> ArrayError {
        ArrayError::UnsafeOutputCast {
            from: DType::F64,
            to: DType::I64,
        }
    }

    fn shape_mismatch() -> ArrayError {
        ArrayError::ShapeMismatch {
            expected: vec![2],
            got: vec![3],
        }
    }

    fn policy() -> FallbackPolicy {
        FallbackPolicy::new(Timer::new(Schedule::new(20, 200)))
    }

    fn dispatch(may_differ: bool, reset: ResetPolicy) -> Dispatch {
        Dispatch {
            kernel: Kernel::Binary(BinaryOp::Div),
            reset,
            may_differ,
        }
    }

    fn spec(category: Category, in_place: bool, name: &str) -> OperationSpec {
        OperationCatalog::new().find(category, in_place, name).unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            RejectReason::classify(&unsafe_cast()),
            Some(RejectReason::UnsafeOutputCast)
        );
        assert_eq!(
            RejectReason::classify(&ArrayError::ResultTypeMismatch {
                result: DType::F32,
                out: DType::F64
            }),
            Some(RejectReason::ResultTypeMismatch)
        );
        assert_eq!(RejectReason::classify(&shape_mismatch()), None);
    }

    #[test]
    fn test_buffered_success_no_fallback() {
        let mut w = Scripted::new(None);
        let t = policy()
            .measure(
                &spec(Category::Binary, false, "add"),
                DType::I32,
                &dispatch(false, ResetPolicy::Never),
                &mut w,
            )
            .unwrap();
        assert!(!t.used_fallback);
        assert!(t.micros_per_call > 0.0);
        assert_eq!((w.buffered, w.allocating, w.resets), (220, 0, 0));
    }

    #[test]
    fn test_rejection_reruns_full_loop_allocating() {
        let mut w = Scripted::new(Some(unsafe_cast));
        w.fail_after = 5;
        let t = policy()
            .measure(
                &spec(Category::Binary, false, "div"),
                DType::I64,
                &dispatch(true, ResetPolicy::Never),
                &mut w,
            )
            .unwrap();
        assert!(t.used_fallback);
        assert_eq!(w.buffered, 5);
        assert_eq!(w.allocating, 220);
    }

    #[test]
    fn test_unanticipated_rejection_is_fatal() {
        let mut w = Scripted::new(Some(unsafe_cast));
        let err = policy()
            .measure(
                &spec(Category::Binary, false, "add"),
                DType::F32,
                &dispatch(false, ResetPolicy::Never),
                &mut w,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            BenchError::UnanticipatedRejection {
                op: "add",
                reason: RejectReason::UnsafeOutputCast,
                ..
            }
        ));
        assert_eq!(w.allocating, 0);
    }

    #[test]
    fn test_other_errors_propagate() {
        let mut w = Scripted::new(Some(shape_mismatch));
        let err = policy()
            .measure(
                &spec(Category::Binary, false, "div"),
                DType::I64,
                &dispatch(true, ResetPolicy::Never),
                &mut w,
            )
            .unwrap_err();
        assert!(matches!(err, BenchError::Array(ArrayError::ShapeMismatch { .. })));
        assert_eq!(w.allocating, 0);
    }

    #[test]
    fn test_no_buffer_form_goes_straight_to_allocating() {
        let mut w = Scripted::new(None);
        let t = policy()
            .measure(
                &spec(Category::Reduction, false, "sum"),
                DType::U8,
                &dispatch(false, ResetPolicy::Never),
                &mut w,
            )
            .unwrap();
        assert!(!t.used_fallback);
        assert_eq!((w.buffered, w.allocating), (0, 220));
    }

    #[test]
    fn test_drifting_op_resets_every_call() {
        let mut w = Scripted::new(None);
        policy()
            .measure(
                &spec(Category::Scalar, true, "add"),
                DType::I8,
                &dispatch(false, ResetPolicy::BeforeEachCall),
                &mut w,
            )
            .unwrap();
        assert_eq!(w.resets, 220);
        assert_eq!(w.buffered, 220);
    }
}
