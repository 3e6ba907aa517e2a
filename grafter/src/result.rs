//! Three-outcome asynchronous results.
//!
//! An operation reports zero or more [`AsyncResult::Progress`] values
//! followed by exactly one terminal [`AsyncResult::Success`] or
//! [`AsyncResult::Failure`]. A crate-internal gate enforces that
//! ordering no matter what the producer does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use tracing::trace;

use crate::error::ServiceError;
use crate::store::lock;

/// The outcome of an asynchronous operation.
///
/// The hooks are chainable and each fires only for its own variant:
///
/// ```
/// use grafter::AsyncResult;
///
/// let mut seen = Vec::new();
/// let result: AsyncResult<u32> = AsyncResult::Success(7);
/// result
///     .on_progress(|p| seen.push(format!("progress {p}")))
///     .on_success(|v| seen.push(format!("success {v}")))
///     .on_failure(|e| seen.push(format!("failure {e}")));
///
/// assert_eq!(seen, vec!["success 7"]);
/// assert!(result.is_terminal());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncResult<V, E = ServiceError> {
    Success(V),
    /// Completion fraction in `0.0..=1.0`.
    Progress(f32),
    Failure(E),
}

impl<V, E> AsyncResult<V, E> {
    /// Calls `handler` with the value if this is a success.
    pub fn on_success(&self, handler: impl FnOnce(&V)) -> &Self {
        if let Self::Success(value) = self {
            handler(value);
        }
        self
    }

    /// Calls `handler` with the fraction if this is a progress update.
    pub fn on_progress(&self, handler: impl FnOnce(f32)) -> &Self {
        if let Self::Progress(fraction) = self {
            handler(*fraction);
        }
        self
    }

    /// Calls `handler` with the error if this is a failure.
    pub fn on_failure(&self, handler: impl FnOnce(&E)) -> &Self {
        if let Self::Failure(error) = self {
            handler(error);
        }
        self
    }

    /// Returns `true` for [`Success`](Self::Success) and
    /// [`Failure`](Self::Failure).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Maps the success value, leaving progress and failures untouched.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> AsyncResult<U, E> {
        match self {
            Self::Success(value) => AsyncResult::Success(f(value)),
            Self::Progress(fraction) => AsyncResult::Progress(fraction),
            Self::Failure(error) => AsyncResult::Failure(error),
        }
    }

    /// Maps the failure value.
    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> AsyncResult<V, F> {
        match self {
            Self::Success(value) => AsyncResult::Success(value),
            Self::Progress(fraction) => AsyncResult::Progress(fraction),
            Self::Failure(error) => AsyncResult::Failure(f(error)),
        }
    }

    /// Converts a terminal result into a `Result`; `None` for progress.
    pub fn into_result(self) -> Option<Result<V, E>> {
        match self {
            Self::Success(value) => Some(Ok(value)),
            Self::Failure(error) => Some(Err(error)),
            Self::Progress(_) => None,
        }
    }
}

impl<V, E> From<Result<V, E>> for AsyncResult<V, E> {
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

// ---------------------------------------------------------------------------
// Delivery gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateStatus {
    Open,
    Finished,
    Cancelled,
}

/// State shared between a [`ResultGate`] and its operation handle.
#[derive(Debug)]
pub(crate) struct GateControl {
    status: Mutex<GateStatus>,
    /// Thread currently running the callback, if any.
    delivering: Mutex<Option<ThreadId>>,
    cancel_requested: AtomicBool,
    /// Mirrors `status != Open` without taking the status lock.
    closed: AtomicBool,
}

impl GateControl {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(GateStatus::Open),
            delivering: Mutex::new(None),
            cancel_requested: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    /// Closes the gate. Once this returns no callback is running and none
    /// will run again. Returns `false` if the gate was already closed.
    pub(crate) fn cancel(&self) -> bool {
        self.cancel_requested.store(true, Ordering::SeqCst);
        // Called from inside the callback: the delivering thread holds the
        // status lock and closes the gate when the callback returns.
        if *lock(&self.delivering) == Some(thread::current().id()) {
            return true;
        }
        let mut status = lock(&self.status);
        if *status == GateStatus::Open {
            *status = GateStatus::Cancelled;
            self.closed.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Returns `true` once a terminal result was delivered or the gate was
    /// cancelled.
    pub(crate) fn is_closed(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst) || self.closed.load(Ordering::SeqCst)
    }
}

/// Wraps a result callback so that it observes a well-formed sequence:
/// progress values clamped to `0.0..=1.0`, at most one terminal, nothing
/// after the terminal or after cancellation.
pub(crate) struct ResultGate<V, E = ServiceError> {
    control: Arc<GateControl>,
    sink: Box<dyn FnMut(AsyncResult<V, E>) + Send>,
}

impl<V, E> ResultGate<V, E> {
    pub(crate) fn new(control: Arc<GateControl>, sink: impl FnMut(AsyncResult<V, E>) + Send + 'static) -> Self {
        Self {
            control,
            sink: Box::new(sink),
        }
    }

    /// Delivers `result` unless the gate is closed. Returns whether the
    /// callback ran.
    pub(crate) fn deliver(&mut self, result: AsyncResult<V, E>) -> bool {
        let mut status = lock(&self.control.status);
        if *status != GateStatus::Open || self.control.cancel_requested.load(Ordering::SeqCst) {
            trace!("dropping result delivered to a closed gate");
            return false;
        }

        let result = match result {
            AsyncResult::Progress(fraction) if fraction.is_nan() => AsyncResult::Progress(0.0),
            AsyncResult::Progress(fraction) => AsyncResult::Progress(fraction.clamp(0.0, 1.0)),
            terminal => terminal,
        };
        if result.is_terminal() {
            *status = GateStatus::Finished;
            self.control.closed.store(true, Ordering::SeqCst);
        }

        *lock(&self.control.delivering) = Some(thread::current().id());
        (self.sink)(result);
        *lock(&self.control.delivering) = None;

        if self.control.cancel_requested.load(Ordering::SeqCst) && *status == GateStatus::Open {
            *status = GateStatus::Cancelled;
            self.control.closed.store(true, Ordering::SeqCst);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Arc<Mutex<Vec<AsyncResult<u32, String>>>>;

    fn gate() -> (ResultGate<u32, String>, Arc<GateControl>, Log) {
        let control = GateControl::new();
        let log: Log = Arc::default();
        let sink = Arc::clone(&log);
        let gate = ResultGate::new(Arc::clone(&control), move |r| sink.lock().unwrap().push(r));
        (gate, control, log)
    }

    #[test]
    fn test_hooks_fire_only_for_their_variant() {
        let mut fired = Vec::new();
        let failure: AsyncResult<u32, &str> = AsyncResult::Failure("boom");
        failure
            .on_success(|_| fired.push("success"))
            .on_progress(|_| fired.push("progress"))
            .on_failure(|_| fired.push("failure"));
        assert_eq!(fired, vec!["failure"]);

        let mut fraction = None;
        AsyncResult::<u32, &str>::Progress(0.5).on_progress(|p| fraction = Some(p));
        assert_eq!(fraction, Some(0.5));
    }

    #[test]
    fn test_map_and_into_result() {
        let doubled = AsyncResult::<u32, String>::Success(2).map(|v| v * 2);
        assert_eq!(doubled, AsyncResult::Success(4));
        assert_eq!(doubled.into_result(), Some(Ok(4)));

        let progress = AsyncResult::<u32, String>::Progress(0.1).map(|v| v + 1);
        assert_eq!(progress.into_result(), None);

        let failed = AsyncResult::<u32, u8>::Failure(3).map_err(|e| e.to_string());
        assert_eq!(failed, AsyncResult::Failure("3".to_string()));
    }

    #[test]
    fn test_from_result() {
        let ok: AsyncResult<u32, String> = Ok(1).into();
        assert!(ok.is_success());
        let err: AsyncResult<u32, String> = Err("x".to_string()).into();
        assert!(err.is_failure());
    }

    #[test]
    fn test_gate_drops_everything_after_terminal() {
        let (mut gate, control, log) = gate();
        assert!(gate.deliver(AsyncResult::Progress(0.0)));
        assert!(gate.deliver(AsyncResult::Success(1)));
        assert!(!gate.deliver(AsyncResult::Progress(1.0)));
        assert!(!gate.deliver(AsyncResult::Failure("late".to_string())));
        assert!(!gate.deliver(AsyncResult::Success(2)));

        assert!(control.is_closed());
        assert_eq!(
            *log.lock().unwrap(),
            vec![AsyncResult::Progress(0.0), AsyncResult::Success(1)]
        );
    }

    #[test]
    fn test_gate_terminality_under_any_sequence() {
        let sequences: Vec<Vec<AsyncResult<u32, String>>> = vec![
            vec![AsyncResult::Failure("a".into()), AsyncResult::Success(1)],
            vec![AsyncResult::Success(1), AsyncResult::Success(2)],
            vec![
                AsyncResult::Progress(0.2),
                AsyncResult::Failure("a".into()),
                AsyncResult::Progress(0.9),
                AsyncResult::Failure("b".into()),
            ],
        ];
        for sequence in sequences {
            let (mut gate, _, log) = gate();
            for result in sequence {
                gate.deliver(result);
            }
            let log = log.lock().unwrap();
            let terminals = log.iter().filter(|r| r.is_terminal()).count();
            assert_eq!(terminals, 1);
            assert!(log.last().unwrap().is_terminal());
        }
    }

    #[test]
    fn test_gate_clamps_progress() {
        let (mut gate, _, log) = gate();
        gate.deliver(AsyncResult::Progress(-1.0));
        gate.deliver(AsyncResult::Progress(7.0));
        gate.deliver(AsyncResult::Progress(f32::NAN));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                AsyncResult::Progress(0.0),
                AsyncResult::Progress(1.0),
                AsyncResult::Progress(0.0)
            ]
        );
    }

    #[test]
    fn test_cancelled_gate_is_silent() {
        let (mut gate, control, log) = gate();
        assert!(control.cancel());
        assert!(!control.cancel());
        assert!(!gate.deliver(AsyncResult::Success(1)));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_from_inside_callback() {
        let control = GateControl::new();
        let inner = Arc::clone(&control);
        let count = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&count);
        let mut gate: ResultGate<u32, String> = ResultGate::new(Arc::clone(&control), move |_| {
            *seen.lock().unwrap() += 1;
            inner.cancel();
        });

        assert!(gate.deliver(AsyncResult::Progress(0.5)));
        assert!(!gate.deliver(AsyncResult::Success(1)));
        assert_eq!(*count.lock().unwrap(), 1);
        assert!(control.is_closed());
    }
}
