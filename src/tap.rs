//! The assertion state and the handle every test block receives.
//!
//! One [`AssertionState`] exists per report. It is shared through [`Tap`], a
//! cheap `Rc` handle, so that numbering stays global across test blocks while
//! each block only resets its own `current` counter. The state is not meant
//! for concurrent mutation: callers run one block to completion (including
//! every suspension inside it) before starting the next.

use std::cell::{Ref, RefCell};
use std::process;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::{BacktraceMode, BailMode, Config};
use crate::errors::{Fault, TapError};
use crate::format::describe;
use crate::grammar::{bail_out_line, comment_lines, diagnostic_block, test_point_line};
use crate::outcome::{self, Outcome};
use crate::report;
use crate::value::{deep_equal, Value};

pub const FAILED_TEST: &str = "Failed Test";

/// Equality predicate consulted by `equal`, `not_equal`, `ok`, `not_ok` and `plan`.
pub type Equality = fn(&Value, &Value) -> bool;

/// Accumulated report text and counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssertionState {
    /// Rendered report content, append-only.
    pub body: String,
    /// Test points rendered across the whole report.
    pub total: usize,
    /// Test points rendered within the current block.
    pub current: usize,
    /// Failing test points across the whole report.
    pub failed: usize,
}

/// Operands attached to a recorded test point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub actual: Option<Value>,
    pub expected: Option<Value>,
    /// Whether the assertion expected the operands to be equal.
    pub equality: bool,
}

impl Comparison {
    pub fn new(actual: impl Into<Value>, expected: impl Into<Value>, equality: bool) -> Self {
        Self {
            actual: Some(actual.into()),
            expected: Some(expected.into()),
            equality,
        }
    }
}

struct Inner {
    state: RefCell<AssertionState>,
    config: Config,
    equals: Equality,
}

/// Shared handle to the assertion state.
#[derive(Clone)]
pub struct Tap(Rc<Inner>);

impl Default for Tap {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Tap {
    pub fn new(config: Config) -> Self {
        Self::with_equality(config, deep_equal)
    }

    pub fn with_equality(config: Config, equals: Equality) -> Self {
        Tap(Rc::new(Inner {
            state: RefCell::new(AssertionState::default()),
            config,
            equals,
        }))
    }

    pub fn config(&self) -> &Config {
        &self.0.config
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> AssertionState {
        self.state().clone()
    }

    pub fn body(&self) -> String {
        self.state().body.clone()
    }

    pub fn total(&self) -> usize {
        self.state().total
    }

    pub fn current(&self) -> usize {
        self.state().current
    }

    pub fn failed(&self) -> usize {
        self.state().failed
    }

    fn state(&self) -> Ref<'_, AssertionState> {
        self.0.state.borrow()
    }

    pub(crate) fn append(&self, fragment: &str) {
        self.0.state.borrow_mut().body.push_str(fragment);
    }

    pub(crate) fn reset_current(&self) {
        self.0.state.borrow_mut().current = 0;
    }

    #[cfg(test)]
    pub(crate) fn set_failed(&self, failed: usize) {
        self.0.state.borrow_mut().failed = failed;
    }

    // ========================================================================
    // ASSERTION VERBS
    // ========================================================================

    pub fn pass<'a>(&self, message: impl Into<Option<&'a str>>) {
        self.record(true, message.into(), &Comparison::default());
    }

    pub fn fail<'a>(&self, message: impl Into<Option<&'a str>>) {
        self.record(false, message.into(), &Comparison::default());
    }

    pub fn pass_with<'a>(&self, message: impl Into<Option<&'a str>>, comparison: Comparison) {
        self.record(true, message.into(), &comparison);
    }

    pub fn fail_with<'a>(&self, message: impl Into<Option<&'a str>>, comparison: Comparison) {
        self.record(false, message.into(), &comparison);
    }

    pub fn equal<'a>(
        &self,
        actual: impl Into<Value>,
        expected: impl Into<Value>,
        message: impl Into<Option<&'a str>>,
    ) {
        let message = message.into();
        self.compare(actual.into(), expected.into(), true, message, message);
    }

    pub fn not_equal<'a>(
        &self,
        actual: impl Into<Value>,
        expected: impl Into<Value>,
        message: impl Into<Option<&'a str>>,
    ) {
        let message = message.into();
        self.compare(actual.into(), expected.into(), false, message, message);
    }

    pub fn ok<'a>(&self, actual: impl Into<Value>, message: impl Into<Option<&'a str>>) {
        self.equal(actual, true, message);
    }

    pub fn not_ok<'a>(&self, actual: impl Into<Value>, message: impl Into<Option<&'a str>>) {
        self.equal(actual, false, message);
    }

    /// Checks that `n` test points were recorded in this block so far.
    ///
    /// `current` is read before the plan's own test point is counted.
    pub fn plan(&self, n: usize) {
        let current = self.current();
        let passing = format!("plan({})", n);
        let failing = format!("plan({}) === {}", n, current);
        self.compare(
            Value::from(current),
            Value::from(n),
            true,
            Some(passing.as_str()),
            Some(failing.as_str()),
        );
    }

    /// Writes a bail-out line and stops.
    ///
    /// With [`BailMode::Exit`] the report is printed and the process ends with
    /// one more failure counted. With [`BailMode::Raise`] this returns
    /// [`TapError::Bail`] instead.
    pub fn bail<'a>(&self, reason: impl Into<Option<&'a str>>) -> Result<(), TapError> {
        let reason = reason.into();
        self.append(&bail_out_line(reason));
        warn!(reason = reason.unwrap_or_default(), "bail out");

        match self.0.config.bail {
            BailMode::Exit => {
                self.0.state.borrow_mut().failed += 1;
                report::print(self);
                process::exit(i32::from(report::exit_code(self.failed())))
            }
            BailMode::Raise => Err(TapError::Bail {
                reason: reason.map(str::to_string),
            }),
        }
    }

    /// Passes when `f` returns `Err` or panics.
    pub fn throws<'a, F, R>(&self, f: F, message: impl Into<Option<&'a str>>)
    where
        F: FnOnce() -> R,
        R: Outcome,
    {
        let description = callable_description::<F>(message.into());
        match outcome::invoke(f) {
            Some(_) => self.pass(description.as_str()),
            None => self.fail(description.as_str()),
        }
    }

    /// Passes when `f` completes without an `Err` or a panic.
    pub fn does_not_throw<'a, F, R>(&self, f: F, message: impl Into<Option<&'a str>>)
    where
        F: FnOnce() -> R,
        R: Outcome,
    {
        let description = callable_description::<F>(message.into());
        match outcome::invoke(f) {
            Some(_) => self.fail(description.as_str()),
            None => self.pass(description.as_str()),
        }
    }

    pub fn comment(&self, message: &str) {
        self.append(&comment_lines(message));
    }

    // ========================================================================
    // PRIVATE HELPERS
    // ========================================================================

    fn compare(
        &self,
        actual: Value,
        expected: Value,
        equality: bool,
        on_pass: Option<&str>,
        on_fail: Option<&str>,
    ) {
        if (self.0.equals)(&actual, &expected) == equality {
            self.pass(on_pass);
        } else {
            self.fail_with(on_fail, Comparison::new(actual, expected, equality));
        }
    }

    fn record(&self, pass: bool, message: Option<&str>, comparison: &Comparison) {
        let actual = comparison.actual.as_ref();
        let expected = comparison.expected.as_ref();
        let description = describe(message, actual, expected, comparison.equality);

        let mut state = self.0.state.borrow_mut();
        state.total += 1;
        state.current += 1;
        let n = state.total;
        state.body.push_str(&test_point_line(pass, n, &description));

        if !pass {
            state.failed += 1;
            let fault = self.failure();
            state
                .body
                .push_str(&diagnostic_block(actual, expected, &fault));
            debug!(n, failed = state.failed, %description, "test point failed");
        }
    }

    fn failure(&self) -> Fault {
        match self.0.config.backtrace {
            BacktraceMode::Auto => Fault::new(FAILED_TEST),
            BacktraceMode::Always => Fault::forced(FAILED_TEST),
            BacktraceMode::Never => Fault::untraced(FAILED_TEST),
        }
    }
}

fn callable_description<F>(message: Option<&str>) -> String {
    match message {
        Some(message) => message.to_string(),
        None => std::any::type_name::<F>().to_string(),
    }
}
