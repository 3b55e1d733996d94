//! Taplet error handling.
//!
//! Assertion failures are never errors: they are recorded in the report. The
//! types here cover the three things that can actually go wrong around it:
//! a deliberate bail-out, bad configuration, and a runtime that will not start.
//! [`Fault`] is the normalized record of whatever a test body raised.

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum TapError {
    /// Raised by `bail` when the process is not allowed to terminate.
    #[error("BAIL")]
    #[diagnostic(
        code(taplet::bail),
        help("bail-out was requested; the report stops here")
    )]
    Bail { reason: Option<String> },

    #[error("invalid value '{value}' for {var}")]
    #[diagnostic(code(taplet::config))]
    Config {
        var: &'static str,
        value: String,
        #[help]
        help: Option<String>,
    },

    #[error("failed to start the async runtime")]
    #[diagnostic(code(taplet::runtime))]
    Runtime(#[from] std::io::Error),
}

impl TapError {
    pub fn is_bail(&self) -> bool {
        matches!(self, TapError::Bail { .. })
    }
}

/// Whatever a test body or a `throws` closure raised, reduced to a message and
/// a stack trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub message: String,
    pub stack: String,
}

impl Fault {
    /// Captures a stack trace at the call site.
    pub fn new(message: impl Into<String>) -> Self {
        Self::traced(message, Backtrace::capture())
    }

    /// Like [`Fault::new`] but ignores `RUST_BACKTRACE`.
    pub fn forced(message: impl Into<String>) -> Self {
        Self::traced(message, Backtrace::force_capture())
    }

    /// A fault whose stack holds only the `Error: {message}` header.
    pub fn untraced(message: impl Into<String>) -> Self {
        let message = message.into();
        let stack = format!("Error: {}", message);
        Self { message, stack }
    }

    pub fn with_stack(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: stack.into(),
        }
    }

    pub fn from_error<E: fmt::Display + ?Sized>(error: &E) -> Self {
        Self::new(error.to_string())
    }

    /// Normalizes a panic payload caught by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(s) => *s,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(s) => s.to_string(),
                Err(_) => "test body panicked".to_string(),
            },
        };
        Self::new(message)
    }

    fn traced(message: impl Into<String>, backtrace: Backtrace) -> Self {
        let mut fault = Self::untraced(message);
        if let std::backtrace::BacktraceStatus::Captured = backtrace.status() {
            fault.stack = format!("{}\n{}", fault.stack, backtrace);
        }
        fault
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    #[test]
    fn bail_displays_as_bail() {
        let err = TapError::Bail {
            reason: Some("testing bail!".to_string()),
        };
        assert_eq!(err.to_string(), "BAIL");
        assert!(err.is_bail());
    }

    #[test]
    fn config_error_renders_help() {
        let err = TapError::Config {
            var: "TAPLET_BACKTRACE",
            value: "sometimes".to_string(),
            help: Some("expected one of: auto, always, never".to_string()),
        };
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("taplet::config"));
        assert!(output.contains("expected one of"));
    }

    #[test]
    fn stack_always_starts_with_header() {
        let fault = Fault::new("Failed Test");
        assert!(fault.stack.starts_with("Error: Failed Test"));
        let forced = Fault::forced("Failed Test");
        assert!(forced.stack.lines().count() > 1);
    }

    #[test]
    fn panic_payloads_are_normalized() {
        let fault = Fault::from_panic(Box::new("boom"));
        assert_eq!(fault.message, "boom");
        let fault = Fault::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(fault.message, "owned boom");
        let fault = Fault::from_panic(Box::new(42_u8));
        assert_eq!(fault.message, "test body panicked");
    }
}
