//! Final report emission.
//!
//! [`run`] owns the one and only emission of a report: it drives the whole
//! suite to completion on a single-threaded runtime, then prints the TAP
//! document and hands back the exit status. A panic that escapes the suite
//! outside any test block is recorded as one failing test point, and the
//! report is still printed. The only other path that prints is a terminating
//! `bail`, which ends the process right after.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use futures::FutureExt;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::{Fault, TapError};
use crate::grammar::{document, plan_line, version_line};
use crate::tap::Tap;

/// Maps a failure count to a process exit status.
pub fn exit_code(failed: usize) -> u8 {
    u8::try_from(failed)
        .ok()
        .filter(|code| *code < u8::MAX)
        .unwrap_or(u8::MAX)
}

/// Renders the complete TAP document for the current state.
pub fn render(tap: &Tap) -> String {
    let state = tap.snapshot();
    document(
        &version_line(tap.config().version),
        &plan_line(state.total, None),
        state.body.trim(),
    )
}

pub(crate) fn print(tap: &Tap) {
    let state = tap.snapshot();
    info!(total = state.total, failed = state.failed, "emitting report");
    println!("{}", render(tap));
}

/// Prints the report and returns the matching exit status.
pub fn emit(tap: &Tap) -> ExitCode {
    print(tap);
    ExitCode::from(exit_code(tap.failed()))
}

/// Runs `suite` with a configuration read from the environment.
///
/// ```rust,no_run
/// use std::process::ExitCode;
///
/// fn main() -> miette::Result<ExitCode> {
///     Ok(taplet::run(|t| async move {
///         t.test("arithmetic", |t| {
///             t.equal(9 * 3, 27, None);
///             t.plan(1);
///         });
///     })?)
/// }
/// ```
pub fn run<F, Fut>(suite: F) -> Result<ExitCode, TapError>
where
    F: FnOnce(Tap) -> Fut,
    Fut: Future<Output = ()>,
{
    run_with(Config::from_env()?, suite)
}

pub fn run_with<F, Fut>(config: Config, suite: F) -> Result<ExitCode, TapError>
where
    F: FnOnce(Tap) -> Fut,
    Fut: Future<Output = ()>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let tap = Tap::new(config);
    let escaped = match panic::catch_unwind(AssertUnwindSafe(|| suite(tap.clone()))) {
        Ok(future) => runtime
            .block_on(AssertUnwindSafe(future).catch_unwind())
            .err(),
        Err(payload) => Some(payload),
    };
    if let Some(payload) = escaped {
        let fault = Fault::from_panic(payload);
        warn!(error = %fault, "suite panicked outside a test block");
        tap.record_fault(&fault);
    }
    Ok(emit(&tap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_clamps() {
        assert_eq!(exit_code(0), 0);
        assert_eq!(exit_code(3), 3);
        assert_eq!(exit_code(254), 254);
        assert_eq!(exit_code(255), 255);
        assert_eq!(exit_code(10_000), 255);
    }

    #[test]
    fn render_wraps_trimmed_body() {
        let t = Tap::new(Config::self_test());
        t.test("only block", |t| {
            t.equal(9 * 3, 27, None);
            t.plan(1);
        });
        assert_eq!(
            render(&t),
            "TAP version 14\n1..2\n# only block\nok 1\nok 2 - plan(1)"
        );
    }

    #[test]
    fn render_with_no_test_points() {
        let t = Tap::default();
        assert_eq!(render(&t), "TAP version 14\n1..0\n");
    }

    #[test]
    fn run_with_drives_async_blocks_in_order() {
        let tap_total = std::rc::Rc::new(std::cell::Cell::new(0));
        let seen = tap_total.clone();
        run_with(Config::self_test(), |t| async move {
            t.test_async("timer", |t| async move {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                t.pass("after sleep");
            })
            .await;
            t.test("sync", |t| t.pass(None));
            seen.set(t.total());
        })
        .unwrap();
        assert_eq!(tap_total.get(), 2);
    }

    #[test]
    fn panic_between_blocks_is_recorded() {
        let slot: std::rc::Rc<std::cell::RefCell<Option<Tap>>> = Default::default();
        let captured = slot.clone();
        run_with(Config::self_test(), |t| async move {
            captured.replace(Some(t.clone()));
            t.test("first", |t| t.pass("reported"));
            let missing: Vec<u8> = Vec::new();
            std::hint::black_box(missing[3]);
        })
        .unwrap();

        let t = slot.borrow_mut().take().unwrap();
        assert!(t
            .body()
            .starts_with("# first\nok 1 - reported\nnot ok 2 - index out of bounds"));
        assert_eq!(t.failed(), 1);
        assert!(render(&t).starts_with("TAP version 14\n1..2\n# first\nok 1 - reported\n"));
    }
}
