pub use crate::config::{BacktraceMode, BailMode, Config};
pub use crate::errors::{Fault, TapError};
pub use crate::outcome::Outcome;
pub use crate::report::{run, run_with};
pub use crate::tap::{AssertionState, Comparison, Tap};
pub use crate::value::Value;

pub mod config;
pub mod errors;
pub mod format;
pub mod grammar;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod tap;
pub mod value;

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// The report goes to stdout, so log lines never interleave with it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
