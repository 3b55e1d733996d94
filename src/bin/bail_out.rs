//! Bail-out demo: the report is printed as soon as `bail` is called and the
//! process exits with the failure count, including the bail itself.
//!
//! ## Usage
//! ```bash
//! cargo run --bin bail_out
//! ```

use std::process::ExitCode;

use taplet::{Tap, TapError};

async fn suite(t: Tap) {
    t.test("before the bail", |t| {
        t.pass("this point is reported");
        t.plan(1);
    });

    t.test("bails", |t| -> Result<(), TapError> {
        t.bail("giving up\nearly")?;
        t.pass("never reported");
        Ok(())
    });

    t.test("after the bail", |t| t.pass("never reported"));
}

fn main() -> miette::Result<ExitCode> {
    taplet::init_tracing();
    Ok(taplet::run(suite)?)
}
