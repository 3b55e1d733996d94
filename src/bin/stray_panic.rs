//! Stray panic demo: the suite panics between two test blocks. The points
//! recorded before the panic are still reported, followed by one failing
//! point for the panic itself.
//!
//! ## Usage
//! ```bash
//! cargo run --bin stray_panic
//! ```

use std::process::ExitCode;

use taplet::Tap;

async fn suite(t: Tap) {
    t.test("first", |t| t.pass("reported"));

    let missing: Vec<u8> = Vec::new();
    std::hint::black_box(missing[3]);

    t.test("second", |t| t.pass("never reached"));
}

fn main() -> miette::Result<ExitCode> {
    taplet::init_tracing();
    Ok(taplet::run(suite)?)
}
