//! Runs named test blocks against the shared [`Tap`].
//!
//! A block writes its description as a comment, resets the per-block counter,
//! runs the body, and converts anything the body raised (an `Err` or a panic)
//! into exactly one failing test point. Both entry points return only after
//! the body has fully settled, so awaiting each block in turn keeps test point
//! numbering strictly sequential.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use tracing::{debug, warn};

use crate::errors::Fault;
use crate::outcome::{self, Outcome};
use crate::tap::{Comparison, Tap};

pub const THROWS_DUE_TO_TEST_ERROR: &str = "Throws Due to Test Error";
pub const SHOULD_NOT_THROW: &str = "Should Not Throw";

impl Tap {
    /// Runs a body that completes immediately.
    pub fn test<F, R>(&self, description: &str, body: F) -> Tap
    where
        F: FnOnce(&Tap) -> R,
        R: Outcome,
    {
        self.begin(description);
        let fault = outcome::invoke(|| body(self));
        self.settle(description, fault);
        self.clone()
    }

    /// Runs a body that may suspend. The returned future resolves once the
    /// body and any fault conversion have settled.
    ///
    /// Nothing happens until the future is awaited: a block that is never
    /// awaited writes no comment and records no test points.
    pub async fn test_async<F, Fut, R>(&self, description: &str, body: F) -> Tap
    where
        F: FnOnce(Tap) -> Fut,
        Fut: Future<Output = R>,
        R: Outcome,
    {
        self.begin(description);
        let fault = match panic::catch_unwind(AssertUnwindSafe(|| body(self.clone()))) {
            Ok(future) => match AssertUnwindSafe(future).catch_unwind().await {
                Ok(outcome) => outcome.into_fault(),
                Err(payload) => Some(Fault::from_panic(payload)),
            },
            Err(payload) => Some(Fault::from_panic(payload)),
        };
        self.settle(description, fault);
        self.clone()
    }

    /// Records one failing test point for a raised error.
    pub(crate) fn record_fault(&self, fault: &Fault) {
        self.fail_with(
            fault.message.as_str(),
            Comparison::new(THROWS_DUE_TO_TEST_ERROR, SHOULD_NOT_THROW, false),
        );
    }

    fn begin(&self, description: &str) {
        self.reset_current();
        self.comment(description);
        debug!(description, total = self.total(), "test block started");
    }

    fn settle(&self, description: &str, fault: Option<Fault>) {
        if let Some(fault) = fault {
            warn!(description, error = %fault, "test body raised; recording a failure");
            self.record_fault(&fault);
        }
        debug!(
            description,
            total = self.total(),
            current = self.current(),
            failed = self.failed(),
            "test block settled"
        );
    }
}
