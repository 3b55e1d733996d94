use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::errors::Fault;

/// The completed result of a test body or a `throws` closure.
///
/// `()` never raises; `Result<T, E>` raises when it is `Err`.
pub trait Outcome {
    fn into_fault(self) -> Option<Fault>;
}

impl Outcome for () {
    fn into_fault(self) -> Option<Fault> {
        None
    }
}

impl<T, E: fmt::Display> Outcome for Result<T, E> {
    fn into_fault(self) -> Option<Fault> {
        self.err().map(|e| Fault::from_error(&e))
    }
}

/// Runs `f`, reporting both an `Err` outcome and a panic as a fault.
pub(crate) fn invoke<F, R>(f: F) -> Option<Fault>
where
    F: FnOnce() -> R,
    R: Outcome,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome.into_fault(),
        Err(payload) => Some(Fault::from_panic(payload)),
    }
}
